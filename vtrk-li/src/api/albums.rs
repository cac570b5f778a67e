//! Album browsing and CRUD endpoints
//!
//! Thin record-store exposure for the display layer: list/search, fetch,
//! partial update (status toggling), delete.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::db::albums::{self, Album, AlbumPatch};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Query parameters for album listing
#[derive(Debug, Deserialize)]
pub struct AlbumsQuery {
    /// Case-insensitive substring over artist/title/genre/label
    pub q: Option<String>,
}

/// GET /api/albums[?q=...]
pub async fn list_albums(
    State(state): State<AppState>,
    Query(query): Query<AlbumsQuery>,
) -> ApiResult<Json<Vec<Album>>> {
    let albums = match query.q.as_deref().map(str::trim) {
        Some(q) if !q.is_empty() => albums::search_albums(&state.db, q).await?,
        _ => albums::list_albums(&state.db).await?,
    };

    Ok(Json(albums))
}

/// GET /api/albums/{id}
pub async fn get_album(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Album>> {
    let album = albums::get_album(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Album not found: {}", id)))?;

    Ok(Json(album))
}

/// PATCH /api/albums/{id}
///
/// Partial update; unset fields keep their stored value. Used by the
/// display layer for status toggling and notes.
pub async fn patch_album(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<AlbumPatch>,
) -> ApiResult<Json<Album>> {
    let album = albums::update_album(&state.db, id, &patch)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Album not found: {}", id)))?;

    tracing::debug!(album_id = %id, "album patched");

    Ok(Json(album))
}

/// DELETE /api/albums/{id}
pub async fn delete_album(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let deleted = albums::delete_album(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound(format!("Album not found: {}", id)));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Build album routes
pub fn album_routes() -> Router<AppState> {
    Router::new()
        .route("/api/albums", get(list_albums))
        .route(
            "/api/albums/:id",
            get(get_album).patch(patch_album).delete(delete_album),
        )
}
