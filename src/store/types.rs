//! Row types shared by the stores, the resolver and the admin API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One virtual landing page definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct LocalPage {
    pub id: i64,
    pub city: String,
    pub zip: String,
    pub service_keyword: String,
    /// Legacy identifier served under `/localseo/{slug}/`.
    pub slug: Option<String>,
    pub ai_intro: String,
    pub meta_title: String,
    pub meta_description: String,
    pub nearby_cities: String,
    pub local_landmarks: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LocalPage {
    /// True when any of the AI-generated fields is still blank.
    pub fn is_missing_ai_content(&self) -> bool {
        self.ai_intro.trim().is_empty()
            || self.meta_title.trim().is_empty()
            || self.meta_description.trim().is_empty()
    }
}

/// Fields accepted when creating a page.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct NewLocalPage {
    pub city: String,
    pub zip: String,
    pub service_keyword: String,
    /// Explicit slug; derived from service and city when absent.
    pub slug: Option<String>,
    pub ai_intro: String,
    pub meta_title: String,
    pub meta_description: String,
    pub nearby_cities: String,
    pub local_landmarks: String,
}

impl NewLocalPage {
    pub fn new(service_keyword: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            service_keyword: service_keyword.into(),
            city: city.into(),
            ..Default::default()
        }
    }
}

/// Partial update. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PagePatch {
    pub city: Option<String>,
    pub zip: Option<String>,
    pub service_keyword: Option<String>,
    /// `Some("")` clears the slug.
    pub slug: Option<String>,
    pub ai_intro: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub nearby_cities: Option<String>,
    pub local_landmarks: Option<String>,
}

impl PagePatch {
    pub fn is_empty(&self) -> bool {
        self.city.is_none()
            && self.zip.is_none()
            && self.service_keyword.is_none()
            && self.slug.is_none()
            && self.ai_intro.is_none()
            && self.meta_title.is_none()
            && self.meta_description.is_none()
            && self.nearby_cities.is_none()
            && self.local_landmarks.is_none()
    }
}

/// HTTP status used for a redirect rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u16", from = "serde_json::Value")]
pub enum RedirectType {
    Permanent,
    Temporary,
}

impl RedirectType {
    pub fn status_code(self) -> u16 {
        match self {
            RedirectType::Permanent => 301,
            RedirectType::Temporary => 302,
        }
    }
}

impl Default for RedirectType {
    fn default() -> Self {
        RedirectType::Permanent
    }
}

/// Anything other than 302 is coerced to a permanent redirect.
impl From<u16> for RedirectType {
    fn from(code: u16) -> Self {
        match code {
            302 => RedirectType::Temporary,
            _ => RedirectType::Permanent,
        }
    }
}

impl From<i64> for RedirectType {
    fn from(code: i64) -> Self {
        u16::try_from(code).map(RedirectType::from).unwrap_or_default()
    }
}

/// Admin input is lenient: numbers and numeric strings go through the
/// integer coercion, anything unparseable is permanent.
impl From<serde_json::Value> for RedirectType {
    fn from(value: serde_json::Value) -> Self {
        let code = match &value {
            serde_json::Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            serde_json::Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        code.map(RedirectType::from).unwrap_or_default()
    }
}

impl From<RedirectType> for u16 {
    fn from(kind: RedirectType) -> Self {
        kind.status_code()
    }
}

/// A static path rewrite.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RedirectRule {
    pub id: i64,
    pub source_path: String,
    pub target_url: String,
    pub redirect_type: RedirectType,
    pub hits: i64,
    pub created_at: DateTime<Utc>,
}

/// Fields accepted when creating a redirect rule.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NewRedirectRule {
    pub source_path: String,
    pub target_url: String,
    #[serde(default)]
    pub redirect_type: RedirectType,
}

/// Errors raised by the stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("no free slug for '{base}' after {attempts} attempts")]
    SlugCollisionExhausted { base: String, attempts: u32 },

    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                StoreError::ConstraintViolation(db_err.message().to_string())
            }
            _ => StoreError::Database(err),
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
