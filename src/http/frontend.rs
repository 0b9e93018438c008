//! Public request handling: redirect rules, page resolution, sitemap.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::time::Instant;

use crate::error::AppError;
use crate::http::response;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::redirects::is_exempt;
use crate::render::{render_page, render_sitemap, sitemap, PageContext, SITEMAP_PAGE_SIZE};
use crate::routing::Resolution;
use crate::store::StoreResult;

/// Fallback for every path no explicit route claims.
pub async fn frontend_handler(State(state): State<AppState>, uri: Uri) -> Response {
    let start = Instant::now();
    let path = uri.path();

    let (outcome, response) = match dispatch(&state, path).await {
        Ok(handled) => handled,
        Err(e) => ("error", AppError::from(e).into_response()),
    };

    metrics::record_request(outcome, response.status().as_u16(), start);
    response
}

async fn dispatch(state: &AppState, path: &str) -> StoreResult<(&'static str, Response)> {
    if !is_exempt(path) {
        if let Some(rule) = state.redirects.process(path).await? {
            let response = response::redirect(&rule.target_url, rule.redirect_type.status_code());
            return Ok(("redirect_rule", response));
        }
    }

    let resolution = state.resolver.resolve(path).await?;
    let outcome = resolution.outcome();
    let response = match resolution {
        Resolution::PassThrough => response::pass_through(),
        Resolution::NotFound => response::not_found_page(),
        Resolution::Redirect { location } => response::redirect(&location, 301),
        Resolution::Serve {
            page,
            canonical_path,
        } => {
            let ctx = PageContext::new(*page, canonical_path, state.site.load_full());
            Html(render_page(&ctx)).into_response()
        }
    };
    Ok((outcome, response))
}

#[derive(Debug, Deserialize)]
pub struct SitemapQuery {
    page: Option<i64>,
}

/// `GET /localseo-sitemap.xml?page=N`
pub async fn sitemap_handler(
    State(state): State<AppState>,
    Query(query): Query<SitemapQuery>,
) -> Result<Response, AppError> {
    let site = state.site.load_full();
    if !site.sitemap_enabled {
        return Ok(response::pass_through());
    }

    let page = query.page.unwrap_or(1);
    let total = state.pages.count().await?;
    if page < 1 || (page > 1 && page > sitemap::page_count(total)) {
        return Ok(response::pass_through());
    }

    let rows = state
        .pages
        .list_range(SITEMAP_PAGE_SIZE, (page - 1) * SITEMAP_PAGE_SIZE)
        .await?;
    let xml = render_sitemap(&rows, &site);

    Ok((
        [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
        xml,
    )
        .into_response())
}

/// `GET /health`
pub async fn health_handler(State(state): State<AppState>) -> Response {
    match state.pages.count().await {
        Ok(pages) => Json(json!({
            "status": "ok",
            "version": env!("CARGO_PKG_VERSION"),
            "pages": pages,
        }))
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable" })),
            )
                .into_response()
        }
    }
}
