//! Release-metadata catalog client
//!
//! Queries MusicBrainz for release candidates and the Cover Art Archive for
//! front covers, and synthesizes Apple Music / AllMusic search links. The
//! search links are pure functions of `(artist, title)` and are present on
//! every result; lookups are best-effort and every network failure degrades
//! to the synthesized links alone.

use chrono::{Datelike, Utc};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

const MUSICBRAINZ_BASE_URL: &str = "https://musicbrainz.org/ws/2";
const COVERART_BASE_URL: &str = "https://coverartarchive.org";
const APPLE_MUSIC_SEARCH_BASE: &str = "https://music.apple.com/search?term=";
const ALLMUSIC_SEARCH_BASE: &str = "https://www.allmusic.com/search/albums/";
const USER_AGENT: &str = "VinylTrack/0.1.0 (https://github.com/vinyltrack/vinyltrack)";

/// Candidates requested per release search; the first is taken as best match
const SEARCH_CANDIDATE_LIMIT: u32 = 5;

/// Catalog client errors (absorbed by [`CatalogClient::find_album_data`])
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// MusicBrainz release candidate
#[derive(Debug, Clone, Deserialize)]
pub struct MbRelease {
    /// Release MBID (MusicBrainz ID)
    pub id: String,
    /// Release title
    pub title: String,
    /// Release date, `YYYY` or `YYYY-MM-DD`
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReleaseSearchResponse {
    #[serde(default)]
    releases: Vec<MbRelease>,
}

#[derive(Debug, Deserialize)]
struct CoverArtResponse {
    #[serde(default)]
    images: Vec<CoverArtImage>,
}

#[derive(Debug, Deserialize)]
struct CoverArtImage {
    #[serde(default)]
    front: bool,
    image: Option<String>,
}

/// Best-effort enrichment result for one `(artist, title)` pair.
///
/// The two search URLs are always present; `year` and `cover_image_url`
/// only when the catalog lookup succeeded and supplied them.
#[derive(Debug, Clone)]
pub struct CatalogMatch {
    pub artist: String,
    pub title: String,
    pub year: Option<i32>,
    pub cover_image_url: Option<String>,
    pub apple_music_search_url: String,
    pub all_music_search_url: String,
}

/// Endpoints and timeouts, overridable for offline tests
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub musicbrainz_base_url: String,
    pub coverart_base_url: String,
    /// Release search timeout
    pub search_timeout: Duration,
    /// Cover-art lookup timeout (shorter; absence is common)
    pub cover_timeout: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            musicbrainz_base_url: MUSICBRAINZ_BASE_URL.to_string(),
            coverart_base_url: COVERART_BASE_URL.to_string(),
            search_timeout: Duration::from_secs(10),
            cover_timeout: Duration::from_secs(5),
        }
    }
}

/// Release-metadata catalog client
pub struct CatalogClient {
    http_client: reqwest::Client,
    config: CatalogConfig,
}

impl CatalogClient {
    pub fn new(config: CatalogConfig) -> Result<Self, CatalogError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| CatalogError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            config,
        })
    }

    /// Search release candidates by quoted artist and release title.
    ///
    /// Candidates come back in catalog relevance order; no further scoring
    /// is applied.
    pub async fn search_releases(
        &self,
        artist: &str,
        title: &str,
    ) -> Result<Vec<MbRelease>, CatalogError> {
        let query = format!(r#"release:"{}" AND artist:"{}""#, title, artist);
        let url = format!("{}/release", self.config.musicbrainz_base_url);
        let limit = SEARCH_CANDIDATE_LIMIT.to_string();

        debug!(artist = %artist, title = %title, "querying release catalog");

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("query", query.as_str()),
                ("fmt", "json"),
                ("limit", limit.as_str()),
            ])
            .timeout(self.config.search_timeout)
            .send()
            .await
            .map_err(|e| CatalogError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CatalogError::ApiError(status.as_u16(), error_text));
        }

        let parsed: ReleaseSearchResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::ParseError(e.to_string()))?;

        Ok(parsed.releases)
    }

    /// Fetch a cover image URL for a release, preferring the front cover.
    ///
    /// Missing cover art is expected and common; any failure yields `None`
    /// without error-level logging.
    pub async fn fetch_front_cover(&self, release_id: &str) -> Option<String> {
        let url = format!("{}/release/{}", self.config.coverart_base_url, release_id);

        let response = self
            .http_client
            .get(&url)
            .timeout(self.config.cover_timeout)
            .send()
            .await
            .ok()?;

        if !response.status().is_success() {
            return None;
        }

        let parsed: CoverArtResponse = response.json().await.ok()?;

        let front = parsed.images.iter().find(|img| img.front);
        let image = front.or_else(|| parsed.images.first())?;
        image.image.clone()
    }

    /// Build enrichment data for one album. Never fails the caller; lookup
    /// failures leave `year`/`cover_image_url` unset and the synthesized
    /// search links carry the result.
    pub async fn find_album_data(&self, artist: &str, title: &str) -> CatalogMatch {
        let mut data = CatalogMatch {
            artist: artist.to_string(),
            title: title.to_string(),
            year: None,
            cover_image_url: None,
            apple_music_search_url: apple_music_search_url(artist, title),
            all_music_search_url: all_music_search_url(artist, title),
        };

        match self.search_releases(artist, title).await {
            Ok(releases) => {
                if let Some(release) = releases.first() {
                    if let Some(date) = &release.date {
                        data.year = year_from_release_date(date);
                    }
                    data.cover_image_url = self.fetch_front_cover(&release.id).await;
                }
            }
            Err(e) => {
                warn!(
                    artist = %artist,
                    title = %title,
                    error = %e,
                    "catalog lookup failed; falling back to search links"
                );
            }
        }

        data
    }
}

/// Extract the 4-digit year prefix of a release date, accepted only within
/// `(1900, current year]`.
fn year_from_release_date(date: &str) -> Option<i32> {
    let year: i32 = date.get(..4)?.parse().ok()?;
    let current_year = Utc::now().year();
    (year > 1900 && year <= current_year).then_some(year)
}

/// Shared query-term synthesis: keep alphanumerics and spaces, join words
/// with `+`.
fn search_terms(artist: &str, title: &str) -> String {
    let combined = format!("{} {}", artist, title);
    let cleaned: String = combined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join("+")
}

/// Apple Music search URL for an album; pure function of `(artist, title)`
pub fn apple_music_search_url(artist: &str, title: &str) -> String {
    format!(
        "{}{}",
        APPLE_MUSIC_SEARCH_BASE,
        urlencoding::encode(&search_terms(artist, title))
    )
}

/// AllMusic album-search URL; pure function of `(artist, title)`
pub fn all_music_search_url(artist: &str, title: &str) -> String {
    format!(
        "{}{}",
        ALLMUSIC_SEARCH_BASE,
        urlencoding::encode(&search_terms(artist, title))
    )
}
