//! Admin API.
//!
//! Every route requires `Authorization: Bearer <admin.api_key>`.
//!
//! ```text
//! GET    /admin/status
//! GET    /admin/pages                    POST /admin/pages
//! GET    /admin/pages/{id}               PUT  /admin/pages/{id}   DELETE /admin/pages/{id}
//! POST   /admin/pages/{id}/generate
//! POST   /admin/pages/generate-missing
//! GET    /admin/redirects                POST /admin/redirects
//! DELETE /admin/redirects/{id}
//! ```

pub mod auth;
pub mod handlers;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use self::auth::admin_auth_middleware;
use self::handlers::*;
use crate::http::server::AppState;

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/admin/status", get(get_status))
        .route("/admin/pages", get(list_pages).post(create_page))
        .route("/admin/pages/generate-missing", post(generate_missing_content))
        .route(
            "/admin/pages/{id}",
            get(get_page).put(update_page).delete(delete_page),
        )
        .route("/admin/pages/{id}/generate", post(generate_page_content))
        .route("/admin/redirects", get(list_redirects).post(create_redirect))
        .route("/admin/redirects/{id}", delete(delete_redirect))
        .route_layer(middleware::from_fn_with_state(state, admin_auth_middleware))
}
