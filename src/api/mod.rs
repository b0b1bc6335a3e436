// src/api/mod.rs
pub mod client;
pub mod error;
pub mod types;

pub use client::ApiClient;
pub use error::RequestError;
