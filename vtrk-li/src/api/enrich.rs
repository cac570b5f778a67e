//! Bulk re-enrichment endpoint

use axum::{extract::State, routing::post, Json, Router};
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::services::importer;
use crate::AppState;

/// POST /api/enrich response
#[derive(Debug, Serialize)]
pub struct EnrichResponse {
    pub success: bool,
    /// Albums whose gaps were re-filled
    pub updated: usize,
    /// Albums that failed enrichment
    pub errors: usize,
    /// First few error messages; the full list is in the server log
    pub error_messages: Vec<String>,
}

/// POST /api/enrich
///
/// Parameterless fill-the-gaps pass over the whole store. Fully populated
/// albums are skipped; the rest re-run the catalog client under the same
/// pacing and error isolation as import.
pub async fn enrich_all(State(state): State<AppState>) -> ApiResult<Json<EnrichResponse>> {
    let outcome =
        importer::re_enrich_all(&state.db, &state.catalog, &state.import_settings)
            .await
            .map_err(|e| {
                let message = format!("Failed to enrich albums: {}", e);
                tracing::error!(error = %e, "bulk enrichment aborted");
                ApiError::Internal(message)
            })?;

    if let Some(first) = outcome.sample_errors.first() {
        state.record_error(first.clone()).await;
    }

    Ok(Json(EnrichResponse {
        success: true,
        updated: outcome.updated,
        errors: outcome.errors,
        error_messages: outcome.sample_errors,
    }))
}

/// Build enrichment routes
pub fn enrich_routes() -> Router<AppState> {
    Router::new().route("/api/enrich", post(enrich_all))
}
