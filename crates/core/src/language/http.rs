//! HTTP-backed language detector.
//! Posts the caption text as `text/plain` and expects `{"lang": "<tag>"}` back.

use super::{DetectionError, LanguageDetector, LanguageTag};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::trace;

/// Default timeout for a single detection request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Body returned by the detection endpoint.
#[derive(Debug, Deserialize)]
struct LangResponse {
    lang: LanguageTag,
}

/// Detector that delegates to a remote endpoint.
pub struct HttpLanguageDetector {
    client: Client,
    endpoint: String,
}

impl HttpLanguageDetector {
    /// Create a detector posting to `endpoint` with the given request timeout.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, DetectionError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl LanguageDetector for HttpLanguageDetector {
    /// Send `text` to the endpoint and read the detected tag.
    async fn detect(&self, text: &str) -> Result<LanguageTag, DetectionError> {
        trace!("detect(endpoint={}, len={})", self.endpoint, text.len());
        let resp = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "text/plain")
            .body(text.to_string())
            .send()
            .await?;
        if resp.status() != StatusCode::OK {
            return Err(DetectionError::Status(resp.status().as_u16()));
        }
        let body = resp.text().await?;
        let data: LangResponse = serde_json::from_str(&body)?;
        Ok(data.lang)
    }
}
