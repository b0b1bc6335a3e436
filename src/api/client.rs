// src/api/client.rs
//! HTTP adapter for the scoring backend.
//!
//! Every request carries exactly one credential header. JSON bodies go through
//! `.json()`; multipart bodies go through `.multipart()` and the client never
//! sets a content-type of its own, so the runtime keeps control of the
//! boundary token.

use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

use super::error::RequestError;
use super::types::{AnalysisRequest, OptimizeRequest, OptimizeResult, Resume, ScoreResult};
use crate::auth::Credentials;

const RESUMES_ENDPOINT: &str = "/resumes/";
const UPLOAD_ENDPOINT: &str = "/resumes/upload_resume";
const DOWNLOAD_ENDPOINT: &str = "/resumes/download_resume";
const SCORE_ENDPOINT: &str = "/analysis/score";
const OPTIMIZE_ENDPOINT: &str = "/analysis/optimize";

pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    credentials: Credentials,
}

impl ApiClient {
    pub fn new(
        base_url: String,
        timeout_seconds: u64,
        credentials: Credentials,
    ) -> Result<Self, RequestError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    /// List resume records for the current session or user.
    pub async fn list_resumes(&self) -> Result<Vec<Resume>, RequestError> {
        self.get_json(RESUMES_ENDPOINT).await
    }

    /// Upload a resume as multipart field `file`. The backend extracts text
    /// and returns the created record.
    pub async fn upload_resume(
        &self,
        file_name: &str,
        content: Vec<u8>,
    ) -> Result<Resume, RequestError> {
        let part = Part::bytes(content)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")?;
        let form = Form::new().part("file", part);

        info!("Uploading resume: {}", file_name);
        let response = self
            .request(Method::POST, UPLOAD_ENDPOINT)
            .multipart(form)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// Fetch the stored file as raw bytes. A 404 means no such file; callers
    /// can detect it with [`RequestError::is_not_found`].
    pub async fn download_resume(&self, file_name: &str) -> Result<Vec<u8>, RequestError> {
        debug!("GET {}?file_name={}", DOWNLOAD_ENDPOINT, file_name);
        let response = self
            .request(Method::GET, DOWNLOAD_ENDPOINT)
            .query(&[("file_name", file_name)])
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    pub async fn score(&self, request: &AnalysisRequest) -> Result<ScoreResult, RequestError> {
        info!("Requesting score for resume {}", request.resume_id);
        self.post_json(SCORE_ENDPOINT, request).await
    }

    pub async fn optimize(
        &self,
        request: &OptimizeRequest,
    ) -> Result<OptimizeResult, RequestError> {
        info!("Requesting optimized resume for {}", request.resume_id);
        self.post_json(OPTIMIZE_ENDPOINT, request).await
    }

    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, endpoint);
        let (name, value) = self.credentials.header();
        self.client.request(method, url).header(name, value)
    }

    async fn get_json<R: DeserializeOwned>(&self, endpoint: &str) -> Result<R, RequestError> {
        debug!("GET {}", endpoint);
        let response = self.request(Method::GET, endpoint).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn post_json<T: Serialize, R: DeserializeOwned>(
        &self,
        endpoint: &str,
        payload: &T,
    ) -> Result<R, RequestError> {
        debug!("POST {}", endpoint);
        let response = self
            .request(Method::POST, endpoint)
            .json(payload)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// Normalize a non-success status into [`RequestError::Status`]. Reading
    /// the body is best-effort; an unreadable body degrades to the generic
    /// message rather than a second error.
    async fn check(response: Response) -> Result<Response, RequestError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(RequestError::from_error_body(status, &body))
    }
}
