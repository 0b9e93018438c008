//! AI generation types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::{LocalPage, PagePatch, StoreError};

/// The row fields a prompt is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSubject {
    pub service: String,
    pub city: String,
    pub zip: String,
}

impl From<&LocalPage> for PageSubject {
    fn from(page: &LocalPage) -> Self {
        Self {
            service: page.service_keyword.trim().to_string(),
            city: page.city.trim().to_string(),
            zip: page.zip.trim().to_string(),
        }
    }
}

/// Copy produced by a provider for one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedContent {
    pub intro: String,
    #[serde(default)]
    pub meta_title: String,
    #[serde(default)]
    pub meta_description: String,
}

impl From<GeneratedContent> for PagePatch {
    fn from(content: GeneratedContent) -> Self {
        PagePatch {
            ai_intro: Some(content.intro),
            meta_title: Some(content.meta_title),
            meta_description: Some(content.meta_description),
            ..Default::default()
        }
    }
}

#[derive(Debug, Error)]
pub enum AiError {
    #[error("AI API key not configured")]
    NotConfigured,

    #[error("AI request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("AI provider error: {0}")]
    Provider(String),

    #[error("AI provider returned no content")]
    EmptyResponse,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One row that failed during bulk generation.
#[derive(Debug, Clone, Serialize)]
pub struct BulkFailure {
    pub id: i64,
    pub error: String,
}

/// Outcome of a bulk generation run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BulkReport {
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub errors: Vec<BulkFailure>,
}
