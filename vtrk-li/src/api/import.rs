//! Checklist upload endpoint
//!
//! POST /api/import accepts the uploaded document as JSON (filename plus
//! content); the extension decides whether the RTF normalizer runs first.

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::db::albums::Album;
use crate::error::{ApiError, ApiResult};
use crate::ingest;
use crate::services::importer;
use crate::AppState;

/// Capped number of error strings returned to the caller
const ERROR_LIST_LIMIT: usize = 10;

/// POST /api/import request
#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    /// Original file name; an `.rtf` extension routes through the normalizer
    pub filename: String,
    /// Raw document text
    pub content: String,
}

/// POST /api/import response
#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub success: bool,
    pub imported_count: usize,
    pub error_count: usize,
    /// First few error messages; the full list is in the server log
    pub errors: Vec<String>,
    /// Created or status-updated albums
    pub albums: Vec<Album>,
}

/// POST /api/import
///
/// Parses the uploaded checklist and runs the enrichment orchestrator.
/// A request that enriches N new albums blocks for at least N seconds due
/// to catalog pacing; callers must tolerate the long-held connection.
pub async fn import_list(
    State(state): State<AppState>,
    Json(request): Json<ImportRequest>,
) -> ApiResult<Json<ImportResponse>> {
    if request.content.trim().is_empty() {
        return Err(ApiError::BadRequest("No file content provided".to_string()));
    }

    let plain_text = if request.filename.to_lowercase().ends_with(".rtf") {
        ingest::normalize(&request.content)
    } else {
        request.content
    };

    let entries = ingest::parse(&plain_text);
    if entries.is_empty() {
        return Err(ApiError::BadRequest(
            "No albums found in the file. Please check the format.".to_string(),
        ));
    }

    tracing::info!(
        filename = %request.filename,
        entries = entries.len(),
        "importing uploaded checklist"
    );

    let outcome = importer::import_parsed_entries(
        &state.db,
        &state.catalog,
        state.discogs.as_deref(),
        &entries,
        &state.import_settings,
    )
    .await;

    if let Some(first) = outcome.errors.first() {
        state.record_error(first.message.clone()).await;
    }

    Ok(Json(ImportResponse {
        success: true,
        imported_count: outcome.imported.len(),
        error_count: outcome.errors.len(),
        errors: outcome
            .errors
            .iter()
            .take(ERROR_LIST_LIMIT)
            .map(|e| e.message.clone())
            .collect(),
        albums: outcome.imported,
    }))
}

/// Build import routes
pub fn import_routes() -> Router<AppState> {
    Router::new().route("/api/import", post(import_list))
}
