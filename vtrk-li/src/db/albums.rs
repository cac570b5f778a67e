//! Album record store
//!
//! Plain key-sorted persistence for the want/have list. Albums are
//! unique on (artist, title); creation uses upsert semantics so a lost
//! find-or-create race updates the existing row instead of failing.

use crate::ingest::Status;
use anyhow::Result;
use serde::Serialize;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

/// Stored album record
#[derive(Debug, Clone, Serialize)]
pub struct Album {
    pub id: Uuid,
    pub artist: String,
    pub title: String,
    pub year: Option<i32>,
    pub format: Option<String>,
    pub genre: Option<String>,
    pub label: Option<String>,
    pub cover_image: Option<String>,
    pub discogs_id: Option<String>,
    pub discogs_url: Option<String>,
    pub apple_music_url: Option<String>,
    pub all_music_url: Option<String>,
    pub status: Status,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields for creating an album
#[derive(Debug, Clone, Default)]
pub struct AlbumInput {
    pub artist: String,
    pub title: String,
    pub year: Option<i32>,
    pub format: Option<String>,
    pub genre: Option<String>,
    pub label: Option<String>,
    pub cover_image: Option<String>,
    pub discogs_id: Option<String>,
    pub discogs_url: Option<String>,
    pub apple_music_url: Option<String>,
    pub all_music_url: Option<String>,
    pub status: Option<Status>,
    pub notes: Option<String>,
}

/// Partial update; unset fields keep their stored value
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct AlbumPatch {
    pub year: Option<i32>,
    pub format: Option<String>,
    pub genre: Option<String>,
    pub label: Option<String>,
    pub cover_image: Option<String>,
    pub discogs_id: Option<String>,
    pub discogs_url: Option<String>,
    pub apple_music_url: Option<String>,
    pub all_music_url: Option<String>,
    pub status: Option<Status>,
    pub notes: Option<String>,
}

const ALBUM_COLUMNS: &str = "id, artist, title, year, format, genre, label, cover_image, \
     discogs_id, discogs_url, apple_music_url, all_music_url, status, notes, \
     created_at, updated_at";

fn row_to_album(row: &SqliteRow) -> Result<Album> {
    let id_str: String = row.get("id");
    let status_str: String = row.get("status");

    Ok(Album {
        id: Uuid::parse_str(&id_str)?,
        artist: row.get("artist"),
        title: row.get("title"),
        year: row.get("year"),
        format: row.get("format"),
        genre: row.get("genre"),
        label: row.get("label"),
        cover_image: row.get("cover_image"),
        discogs_id: row.get("discogs_id"),
        discogs_url: row.get("discogs_url"),
        apple_music_url: row.get("apple_music_url"),
        all_music_url: row.get("all_music_url"),
        status: status_str
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))?,
        notes: row.get("notes"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

/// Create an album. If a row for (artist, title) already exists the status
/// is updated in place and the existing row is returned.
pub async fn create_album(pool: &SqlitePool, input: &AlbumInput) -> Result<Album> {
    let id = Uuid::new_v4();
    let status = input.status.unwrap_or(Status::Want);

    sqlx::query(
        r#"
        INSERT INTO albums (id, artist, title, year, format, genre, label, cover_image,
                            discogs_id, discogs_url, apple_music_url, all_music_url,
                            status, notes, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
        ON CONFLICT(artist, title) DO UPDATE SET
            status = excluded.status,
            updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(id.to_string())
    .bind(&input.artist)
    .bind(&input.title)
    .bind(input.year)
    .bind(&input.format)
    .bind(&input.genre)
    .bind(&input.label)
    .bind(&input.cover_image)
    .bind(&input.discogs_id)
    .bind(&input.discogs_url)
    .bind(&input.apple_music_url)
    .bind(&input.all_music_url)
    .bind(status.as_str())
    .bind(&input.notes)
    .execute(pool)
    .await?;

    find_by_artist_title(pool, &input.artist, &input.title)
        .await?
        .ok_or_else(|| anyhow::anyhow!("album vanished after insert"))
}

/// Exact-match lookup, case-sensitive as parsed
pub async fn find_by_artist_title(
    pool: &SqlitePool,
    artist: &str,
    title: &str,
) -> Result<Option<Album>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM albums WHERE artist = ? AND title = ?",
        ALBUM_COLUMNS
    ))
    .bind(artist)
    .bind(title)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(row_to_album).transpose()
}

/// Load one album by id
pub async fn get_album(pool: &SqlitePool, id: Uuid) -> Result<Option<Album>> {
    let row = sqlx::query(&format!("SELECT {} FROM albums WHERE id = ?", ALBUM_COLUMNS))
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(row_to_album).transpose()
}

/// Apply a partial update; returns None when the album does not exist
pub async fn update_album(
    pool: &SqlitePool,
    id: Uuid,
    patch: &AlbumPatch,
) -> Result<Option<Album>> {
    sqlx::query(
        r#"
        UPDATE albums SET
            year = COALESCE(?, year),
            format = COALESCE(?, format),
            genre = COALESCE(?, genre),
            label = COALESCE(?, label),
            cover_image = COALESCE(?, cover_image),
            discogs_id = COALESCE(?, discogs_id),
            discogs_url = COALESCE(?, discogs_url),
            apple_music_url = COALESCE(?, apple_music_url),
            all_music_url = COALESCE(?, all_music_url),
            status = COALESCE(?, status),
            notes = COALESCE(?, notes),
            updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        "#,
    )
    .bind(patch.year)
    .bind(&patch.format)
    .bind(&patch.genre)
    .bind(&patch.label)
    .bind(&patch.cover_image)
    .bind(&patch.discogs_id)
    .bind(&patch.discogs_url)
    .bind(&patch.apple_music_url)
    .bind(&patch.all_music_url)
    .bind(patch.status.map(|s| s.as_str()))
    .bind(&patch.notes)
    .bind(id.to_string())
    .execute(pool)
    .await?;

    get_album(pool, id).await
}

/// Update ownership status only
pub async fn set_status(pool: &SqlitePool, id: Uuid, status: Status) -> Result<Option<Album>> {
    update_album(
        pool,
        id,
        &AlbumPatch {
            status: Some(status),
            ..AlbumPatch::default()
        },
    )
    .await
}

/// Delete one album; false when no row matched
pub async fn delete_album(pool: &SqlitePool, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM albums WHERE id = ?")
        .bind(id.to_string())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// All albums, ordered by artist then title
pub async fn list_albums(pool: &SqlitePool) -> Result<Vec<Album>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM albums ORDER BY artist ASC, title ASC",
        ALBUM_COLUMNS
    ))
    .fetch_all(pool)
    .await?;

    rows.iter().map(row_to_album).collect()
}

/// Case-insensitive substring search over artist, title, genre, and label
pub async fn search_albums(pool: &SqlitePool, query: &str) -> Result<Vec<Album>> {
    let rows = sqlx::query(&format!(
        r#"
        SELECT {} FROM albums
        WHERE artist LIKE '%' || ?1 || '%'
           OR title LIKE '%' || ?1 || '%'
           OR genre LIKE '%' || ?1 || '%'
           OR label LIKE '%' || ?1 || '%'
        ORDER BY artist ASC, title ASC
        "#,
        ALBUM_COLUMNS
    ))
    .bind(query)
    .fetch_all(pool)
    .await?;

    rows.iter().map(row_to_album).collect()
}
