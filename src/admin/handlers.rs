use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::ai::{self, BulkReport};
use crate::error::AppResult;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::routing::canonical_path;
use crate::store::{LocalPage, NewLocalPage, NewRedirectRule, PagePatch, RedirectRule, StoreError};

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub pages: i64,
    pub redirects: i64,
}

/// A page plus the URL it is served under.
#[derive(Serialize)]
pub struct PageView {
    #[serde(flatten)]
    pub page: LocalPage,
    pub canonical_path: String,
}

impl From<LocalPage> for PageView {
    fn from(page: LocalPage) -> Self {
        let canonical_path = canonical_path(&page);
        Self {
            page,
            canonical_path,
        }
    }
}

async fn refresh_page_gauge(state: &AppState) {
    if let Ok(count) = state.pages.count().await {
        metrics::record_page_count(count);
    }
}

pub async fn get_status(State(state): State<AppState>) -> AppResult<Json<SystemStatus>> {
    let pages = state.pages.count().await?;
    metrics::record_page_count(pages);
    Ok(Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        pages,
        redirects: state.redirects.count().await?,
    }))
}

pub async fn list_pages(State(state): State<AppState>) -> AppResult<Json<Vec<PageView>>> {
    let pages = state.pages.get_all().await?;
    Ok(Json(pages.into_iter().map(PageView::from).collect()))
}

pub async fn get_page(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<PageView>> {
    let page = state
        .pages
        .get_by_id(id)
        .await?
        .ok_or(StoreError::NotFound { entity: "page", id })?;
    Ok(Json(page.into()))
}

pub async fn create_page(
    State(state): State<AppState>,
    Json(page): Json<NewLocalPage>,
) -> AppResult<(StatusCode, Json<PageView>)> {
    let id = state.pages.insert(page).await?;
    let page = state
        .pages
        .get_by_id(id)
        .await?
        .ok_or(StoreError::NotFound { entity: "page", id })?;
    tracing::info!(id, slug = ?page.slug, "Page created");
    refresh_page_gauge(&state).await;
    Ok((StatusCode::CREATED, Json(page.into())))
}

pub async fn update_page(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<PagePatch>,
) -> AppResult<Json<PageView>> {
    let page = state.pages.update(id, patch).await?;
    tracing::info!(id, "Page updated");
    Ok(Json(page.into()))
}

pub async fn delete_page(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.pages.delete(id).await?;
    tracing::info!(id, "Page deleted");
    refresh_page_gauge(&state).await;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn generate_page_content(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<PageView>> {
    let page = ai::generate_for_page(&state.pages, state.generator.as_ref(), id).await?;
    Ok(Json(page.into()))
}

/// Runs to completion before responding.
pub async fn generate_missing_content(
    State(state): State<AppState>,
) -> AppResult<Json<BulkReport>> {
    let report =
        ai::generate_missing(&state.pages, state.generator.as_ref(), state.bulk_delay).await?;
    Ok(Json(report))
}

pub async fn list_redirects(State(state): State<AppState>) -> AppResult<Json<Vec<RedirectRule>>> {
    Ok(Json(state.redirects.list().await?))
}

pub async fn create_redirect(
    State(state): State<AppState>,
    Json(rule): Json<NewRedirectRule>,
) -> AppResult<(StatusCode, Json<RedirectRule>)> {
    let id = state.redirects.insert(rule).await?;
    let rule = state
        .redirects
        .get(id)
        .await?
        .ok_or(StoreError::NotFound { entity: "redirect", id })?;
    tracing::info!(id, source = %rule.source_path, target = %rule.target_url, "Redirect created");
    Ok((StatusCode::CREATED, Json(rule)))
}

pub async fn delete_redirect(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.redirects.delete(id).await?;
    tracing::info!(id, "Redirect deleted");
    Ok(StatusCode::NO_CONTENT)
}
