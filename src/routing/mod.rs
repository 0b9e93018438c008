//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Request path
//!     → matcher.rs (canonical / legacy URL shape, captured segments)
//!     → resolver.rs (page store lookup)
//!     → Resolution: Serve | Redirect | NotFound | PassThrough
//!
//! Writes:
//!     service / city / slug text → slug.rs (normalize) → stored columns
//! ```
//!
//! # Design Decisions
//! - The same normalizer produces stored slugs and canonical URLs
//! - No regex in the hot path (segment matching only)
//! - Deterministic: first pattern that matches wins

pub mod matcher;
pub mod resolver;
pub mod slug;

pub use resolver::{canonical_path, Resolution, RouteResolver};
pub use slug::normalize;
