// src/export/mod.rs
//! Document export: pure layout of Markdown-flavored text into paginated
//! blocks, plus a writer that serializes those pages as a PDF file.

pub mod geometry;
pub mod layout;
pub mod pdf;
