//! AI content generation.
//!
//! # Data Flow
//! ```text
//! LocalPage → PageSubject → prompt.rs (template + JSON instructions)
//!     → engine.rs (OpenAI / Anthropic over HTTP)
//!     → prompt.rs (parse JSON or fall back to plain text)
//!     → bulk.rs → PageStore::update
//! ```
//!
//! Generation runs out of band from request routing; a failing provider
//! only shows up in admin responses and logs.

pub mod bulk;
pub mod engine;
pub mod prompt;
pub mod types;

pub use bulk::{generate_for_page, generate_missing};
pub use engine::{ContentGenerator, HttpContentGenerator};
pub use types::{AiError, BulkFailure, BulkReport, GeneratedContent, PageSubject};
