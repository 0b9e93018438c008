//! Writing generated copy back to the page store.

use std::time::Duration;

use crate::ai::engine::ContentGenerator;
use crate::ai::types::{AiError, BulkFailure, BulkReport, PageSubject};
use crate::observability::metrics;
use crate::store::{LocalPage, PageStore, StoreError};

/// Generate copy for one row and store it.
pub async fn generate_for_page(
    pages: &PageStore,
    generator: &dyn ContentGenerator,
    id: i64,
) -> Result<LocalPage, AiError> {
    let page = pages
        .get_by_id(id)
        .await?
        .ok_or(StoreError::NotFound { entity: "page", id })?;

    let result = generator.generate(&PageSubject::from(&page)).await;
    metrics::record_ai_generation(if result.is_ok() { "success" } else { "failure" });

    Ok(pages.update(id, result?.into()).await?)
}

/// Fill every row with missing AI fields, pausing `delay` between rows.
///
/// Per-row failures are collected in the report; only a failure to list
/// the rows aborts the run.
pub async fn generate_missing(
    pages: &PageStore,
    generator: &dyn ContentGenerator,
    delay: Duration,
) -> Result<BulkReport, AiError> {
    let rows = pages.get_rows_missing_ai_content().await?;
    let mut report = BulkReport::default();
    tracing::info!(rows = rows.len(), "Starting bulk AI generation");

    for (index, row) in rows.iter().enumerate() {
        if index > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        report.processed += 1;
        match generate_for_page(pages, generator, row.id).await {
            Ok(_) => report.succeeded += 1,
            Err(e) => {
                tracing::warn!(id = row.id, error = %e, "AI generation failed");
                report.failed += 1;
                report.errors.push(BulkFailure {
                    id: row.id,
                    error: e.to_string(),
                });
            }
        }
    }

    tracing::info!(
        succeeded = report.succeeded,
        failed = report.failed,
        "Bulk AI generation finished"
    );
    Ok(report)
}
