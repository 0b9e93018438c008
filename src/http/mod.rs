//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID)
//!     → frontend.rs
//!         → redirect table (static rules)
//!         → route resolver (canonical / legacy page URLs)
//!         → page renderer
//!     → response.rs (404 pages, redirects)
//!     → Send to client
//! ```

pub mod frontend;
pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuidV4, RequestIdExt, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
