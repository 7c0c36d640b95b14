//! Language detection boundary.
//! The pipeline only sees the `LanguageDetector` trait so it can be tested
//! without a network.

use async_trait::async_trait;
use serde::Deserialize;
use std::fmt;
use thiserror::Error;
use tracing::{debug, trace, warn};

pub mod http;

/// Language tag such as `en-US`, compared exactly.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct LanguageTag(String);

impl LanguageTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Why a detection attempt produced no tag.
#[derive(Debug, Error)]
pub enum DetectionError {
    #[error("detection request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("detection service responded with status {0}")]
    Status(u16),
    #[error("unparseable detection response: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Detects the language of a block of text.
#[async_trait]
pub trait LanguageDetector: Send + Sync {
    async fn detect(&self, text: &str) -> Result<LanguageTag, DetectionError>;
}

/// Check that `text` is detected as `expected`.
/// Empty text and every detection failure count as a mismatch.
pub async fn validate_language<D>(text: &str, expected: &LanguageTag, detector: &D) -> bool
where
    D: LanguageDetector + ?Sized,
{
    trace!("validate_language(len={}, expected={})", text.len(), expected);
    if text.is_empty() {
        debug!("no caption text to detect");
        return false;
    }
    match detector.detect(text).await {
        Ok(tag) => {
            debug!("detected language {}", tag);
            &tag == expected
        }
        Err(err) => {
            warn!("language detection failed: {}", err);
            false
        }
    }
}
