//! Security subsystem.
//!
//! # Design Decisions
//! - Response headers are opt-in through `[security] enable_headers`
//! - Body size and request timeouts are enforced by the HTTP layer

pub mod headers;
