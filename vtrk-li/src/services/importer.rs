//! Enrichment orchestration
//!
//! Drives per-entry enrichment sequentially, never concurrently: the fixed
//! pause after each created record keeps the external catalogs under their
//! abuse thresholds. A batch runs to completion; per-entry failures are
//! collected, not propagated, so partial progress is always persisted.

use crate::db::albums::{self, Album, AlbumInput, AlbumPatch};
use crate::ingest::ParsedEntry;
use crate::services::catalog_client::CatalogClient;
use crate::services::discogs_client::DiscogsClient;
use sqlx::SqlitePool;
use std::time::Duration;
use tracing::{error, info};

/// Capped number of error messages returned by bulk re-enrichment; the full
/// list only reaches the server log
const ERROR_SAMPLE_LIMIT: usize = 5;

/// Orchestrator pacing configuration
#[derive(Debug, Clone)]
pub struct ImportSettings {
    /// Pause after each record that triggered catalog calls
    pub pause_between_creates: Duration,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            pause_between_creates: Duration::from_secs(1),
        }
    }
}

/// One failed entry with a human-readable message
#[derive(Debug, Clone, serde::Serialize)]
pub struct ImportFailure {
    pub artist: String,
    pub title: String,
    pub message: String,
}

/// Batch import result
#[derive(Debug)]
pub struct ImportOutcome {
    /// Created or status-updated albums, in entry order
    pub imported: Vec<Album>,
    pub errors: Vec<ImportFailure>,
}

/// Bulk re-enrichment result
#[derive(Debug)]
pub struct EnrichOutcome {
    pub updated: usize,
    pub errors: usize,
    pub sample_errors: Vec<String>,
}

/// Import parsed checklist entries into the record store.
///
/// Per entry: exact (artist, title) lookup; an existing album gets a
/// status-only update when the parsed status differs, and is skipped
/// otherwise. New pairs are enriched via the catalog client (plus Discogs
/// provenance when a client is configured) and created.
pub async fn import_parsed_entries(
    pool: &SqlitePool,
    catalog: &CatalogClient,
    discogs: Option<&DiscogsClient>,
    entries: &[ParsedEntry],
    settings: &ImportSettings,
) -> ImportOutcome {
    let mut imported = Vec::new();
    let mut errors = Vec::new();

    for entry in entries {
        match import_entry(pool, catalog, discogs, entry, settings).await {
            Ok(Some(album)) => imported.push(album),
            Ok(None) => {
                // Already stored with the same status
            }
            Err(e) => {
                error!(
                    artist = %entry.artist,
                    title = %entry.title,
                    error = %e,
                    "entry import failed"
                );
                errors.push(ImportFailure {
                    artist: entry.artist.clone(),
                    title: entry.title.clone(),
                    message: format!(
                        "Failed to import {} - {}: {}",
                        entry.artist, entry.title, e
                    ),
                });
            }
        }
    }

    info!(
        imported = imported.len(),
        errors = errors.len(),
        "checklist import finished"
    );

    ImportOutcome { imported, errors }
}

async fn import_entry(
    pool: &SqlitePool,
    catalog: &CatalogClient,
    discogs: Option<&DiscogsClient>,
    entry: &ParsedEntry,
    settings: &ImportSettings,
) -> anyhow::Result<Option<Album>> {
    if let Some(existing) = albums::find_by_artist_title(pool, &entry.artist, &entry.title).await?
    {
        if existing.status != entry.status {
            let updated = albums::set_status(pool, existing.id, entry.status)
                .await?
                .ok_or_else(|| anyhow::anyhow!("album deleted during import"))?;
            return Ok(Some(updated));
        }
        return Ok(None);
    }

    let data = catalog.find_album_data(&entry.artist, &entry.title).await;

    let mut input = AlbumInput {
        artist: entry.artist.clone(),
        title: entry.title.clone(),
        status: Some(entry.status),
        year: data.year,
        cover_image: data.cover_image_url,
        apple_music_url: Some(data.apple_music_search_url),
        all_music_url: Some(data.all_music_search_url),
        ..AlbumInput::default()
    };

    if let Some(discogs) = discogs {
        if let Some(best) = discogs.find_best_match(&entry.artist, &entry.title).await {
            input.format = best.format.as_ref().map(|f| f.join(", "));
            input.genre = best.genre.as_ref().map(|g| g.join(", "));
            input.label = best.label.as_ref().map(|l| l.join(", "));
            input.discogs_id = Some(best.id.to_string());
            input.discogs_url = Some(discogs.release_url(&best.uri));
            if input.year.is_none() {
                input.year = best.year;
            }
        }
    }

    let album = albums::create_album(pool, &input).await?;

    // Pacing for the external catalogs
    tokio::time::sleep(settings.pause_between_creates).await;

    Ok(Some(album))
}

/// Bulk fill-the-gaps pass over every stored album.
///
/// Albums already carrying a cover image and both search links are skipped
/// outright. For the rest the catalog client runs again: both search links
/// are refreshed, a cover is added when newly available, and the year only
/// when previously unset. Idempotent given unchanged catalog state.
pub async fn re_enrich_all(
    pool: &SqlitePool,
    catalog: &CatalogClient,
    settings: &ImportSettings,
) -> anyhow::Result<EnrichOutcome> {
    let all_albums = albums::list_albums(pool).await?;
    let total = all_albums.len();

    let mut updated = 0usize;
    let mut errors: Vec<String> = Vec::new();

    for album in all_albums {
        if album.cover_image.is_some()
            && album.apple_music_url.is_some()
            && album.all_music_url.is_some()
        {
            continue;
        }

        match enrich_album(pool, catalog, &album).await {
            Ok(()) => {
                updated += 1;
                tokio::time::sleep(settings.pause_between_creates).await;
            }
            Err(e) => {
                error!(
                    album_id = %album.id,
                    artist = %album.artist,
                    title = %album.title,
                    error = %e,
                    "re-enrichment failed"
                );
                errors.push(format!(
                    "Failed to enrich {} - {}: {}",
                    album.artist, album.title, e
                ));
            }
        }
    }

    info!(total, updated, errors = errors.len(), "bulk re-enrichment finished");

    let error_count = errors.len();
    Ok(EnrichOutcome {
        updated,
        errors: error_count,
        sample_errors: errors.into_iter().take(ERROR_SAMPLE_LIMIT).collect(),
    })
}

async fn enrich_album(
    pool: &SqlitePool,
    catalog: &CatalogClient,
    album: &Album,
) -> anyhow::Result<()> {
    let data = catalog.find_album_data(&album.artist, &album.title).await;

    let mut patch = AlbumPatch {
        apple_music_url: Some(data.apple_music_search_url),
        all_music_url: Some(data.all_music_search_url),
        ..AlbumPatch::default()
    };

    if let Some(cover) = data.cover_image_url {
        patch.cover_image = Some(cover);
    }
    if album.year.is_none() {
        patch.year = data.year;
    }

    albums::update_album(pool, album.id, &patch)
        .await?
        .ok_or_else(|| anyhow::anyhow!("album deleted during enrichment"))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::Status;
    use crate::services::catalog_client::{CatalogClient, CatalogConfig};

    /// Catalog client pointed at an unroutable endpoint: every lookup
    /// degrades to the synthesized search links, no network required.
    fn offline_catalog() -> CatalogClient {
        CatalogClient::new(CatalogConfig {
            musicbrainz_base_url: "http://127.0.0.1:1/ws/2".to_string(),
            coverart_base_url: "http://127.0.0.1:1".to_string(),
            search_timeout: Duration::from_millis(250),
            cover_timeout: Duration::from_millis(250),
        })
        .unwrap()
    }

    fn no_pause() -> ImportSettings {
        ImportSettings {
            pause_between_creates: Duration::ZERO,
        }
    }

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        crate::db::init_tables(&pool).await.unwrap();
        pool
    }

    fn entry(artist: &str, title: &str, status: Status) -> ParsedEntry {
        ParsedEntry {
            artist: artist.to_string(),
            title: title.to_string(),
            status,
            original_line: format!("- [ ] {} - {}", artist, title),
        }
    }

    #[tokio::test]
    async fn test_import_creates_with_fallback_links() {
        let pool = test_pool().await;
        let catalog = offline_catalog();

        let entries = vec![entry("Pink Floyd", "The Wall", Status::Want)];
        let outcome =
            import_parsed_entries(&pool, &catalog, None, &entries, &no_pause()).await;

        assert_eq!(outcome.imported.len(), 1);
        assert!(outcome.errors.is_empty());

        let album = &outcome.imported[0];
        assert_eq!(album.status, Status::Want);
        assert!(album.apple_music_url.is_some());
        assert!(album.all_music_url.is_some());
        assert!(album.cover_image.is_none());
        assert!(album.year.is_none());
    }

    #[tokio::test]
    async fn test_reimport_same_status_creates_no_duplicate() {
        let pool = test_pool().await;
        let catalog = offline_catalog();

        let entries = vec![entry("Miles Davis", "Kind of Blue", Status::Have)];
        import_parsed_entries(&pool, &catalog, None, &entries, &no_pause()).await;
        let second =
            import_parsed_entries(&pool, &catalog, None, &entries, &no_pause()).await;

        assert!(second.imported.is_empty());
        assert!(second.errors.is_empty());
        assert_eq!(albums::list_albums(&pool).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_reimport_changed_status_updates_in_place() {
        let pool = test_pool().await;
        let catalog = offline_catalog();

        let first = import_parsed_entries(
            &pool,
            &catalog,
            None,
            &[entry("Neil Young", "Harvest", Status::Want)],
            &no_pause(),
        )
        .await;
        let second = import_parsed_entries(
            &pool,
            &catalog,
            None,
            &[entry("Neil Young", "Harvest", Status::Have)],
            &no_pause(),
        )
        .await;

        assert_eq!(second.imported.len(), 1);
        assert_eq!(second.imported[0].id, first.imported[0].id);
        assert_eq!(second.imported[0].status, Status::Have);
        assert_eq!(albums::list_albums(&pool).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failing_entry_does_not_abort_batch() {
        let pool = test_pool().await;
        let catalog = offline_catalog();

        // Simulated store rejection for one specific artist
        sqlx::query(
            r#"
            CREATE TRIGGER reject_bad_artist BEFORE INSERT ON albums
            WHEN NEW.artist = 'Bad Artist'
            BEGIN
                SELECT RAISE(ABORT, 'simulated store failure');
            END
            "#,
        )
        .execute(&pool)
        .await
        .unwrap();

        let entries = vec![
            entry("Bad Artist", "Doomed Album", Status::Want),
            entry("Tom Waits", "Rain Dogs", Status::Want),
        ];
        let outcome =
            import_parsed_entries(&pool, &catalog, None, &entries, &no_pause()).await;

        assert_eq!(outcome.imported.len(), 1);
        assert_eq!(outcome.imported[0].artist, "Tom Waits");
        assert_eq!(outcome.errors.len(), 1);
        assert!(outcome.errors[0].message.contains("Bad Artist"));
        assert!(outcome.errors[0].message.contains("Doomed Album"));
    }

    #[tokio::test]
    async fn test_re_enrich_skips_fully_populated_albums() {
        let pool = test_pool().await;
        let catalog = offline_catalog();

        let full = AlbumInput {
            artist: "Beck".to_string(),
            title: "Odelay".to_string(),
            status: Some(Status::Want),
            cover_image: Some("https://covers.example/beck.jpg".to_string()),
            apple_music_url: Some("https://music.apple.com/search?term=x".to_string()),
            all_music_url: Some("https://www.allmusic.com/search/albums/x".to_string()),
            ..AlbumInput::default()
        };
        let before = albums::create_album(&pool, &full).await.unwrap();

        let outcome = re_enrich_all(&pool, &catalog, &no_pause()).await.unwrap();
        assert_eq!(outcome.updated, 0);
        assert_eq!(outcome.errors, 0);

        let after = albums::get_album(&pool, before.id).await.unwrap().unwrap();
        assert_eq!(after.apple_music_url, before.apple_music_url);
        assert_eq!(after.cover_image, before.cover_image);
    }

    #[tokio::test]
    async fn test_re_enrich_is_idempotent() {
        let pool = test_pool().await;
        let catalog = offline_catalog();

        // Bare album: no cover, no links
        albums::create_album(
            &pool,
            &AlbumInput {
                artist: "Pink Floyd".to_string(),
                title: "Animals".to_string(),
                status: Some(Status::Want),
                ..AlbumInput::default()
            },
        )
        .await
        .unwrap();

        let first = re_enrich_all(&pool, &catalog, &no_pause()).await.unwrap();
        assert_eq!(first.updated, 1);
        let snapshot: Vec<_> = albums::list_albums(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|a| {
                (
                    a.year,
                    a.cover_image,
                    a.apple_music_url,
                    a.all_music_url,
                )
            })
            .collect();

        let second = re_enrich_all(&pool, &catalog, &no_pause()).await.unwrap();
        let snapshot_after: Vec<_> = albums::list_albums(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|a| {
                (
                    a.year,
                    a.cover_image,
                    a.apple_music_url,
                    a.all_music_url,
                )
            })
            .collect();

        // No field changes on the second pass
        assert_eq!(snapshot, snapshot_after);
        assert_eq!(second.errors, 0);
    }
}
