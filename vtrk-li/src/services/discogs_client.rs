//! Discogs search client
//!
//! Free-text release search against the Discogs database, filtered to the
//! vinyl format facet. Used to attach provenance (format, genre, label,
//! canonical release page) to imported albums when a personal access token
//! is configured.

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

const DISCOGS_BASE_URL: &str = "https://api.discogs.com";
const DISCOGS_WEB_ORIGIN: &str = "https://www.discogs.com";
const USER_AGENT: &str = "VinylTrack/0.1.0";

const SEARCH_PAGE_SIZE: u32 = 10;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Discogs client errors
#[derive(Debug, Error)]
pub enum DiscogsError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// One release candidate from the search endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct DiscogsSearchResult {
    pub id: i64,
    /// Candidate title; Discogs uses "Artist - Title" form
    pub title: String,
    pub year: Option<i32>,
    pub format: Option<Vec<String>>,
    pub genre: Option<Vec<String>>,
    pub label: Option<Vec<String>>,
    pub thumb: Option<String>,
    pub cover_image: Option<String>,
    /// Detail-page path; prefix with the web origin for a full URL
    pub uri: String,
}

#[derive(Debug, Deserialize)]
struct DiscogsSearchResponse {
    #[serde(default)]
    results: Vec<DiscogsSearchResult>,
}

/// Full release detail record
#[derive(Debug, Clone, Deserialize)]
pub struct DiscogsRelease {
    pub id: i64,
    pub title: String,
    pub year: Option<i32>,
    pub genres: Option<Vec<String>>,
    pub uri: Option<String>,
}

/// Discogs API client; the token is optional but unauthenticated requests
/// are heavily throttled by the service
pub struct DiscogsClient {
    http_client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl DiscogsClient {
    pub fn new(token: Option<String>) -> Result<Self, DiscogsError> {
        Self::with_base_url(DISCOGS_BASE_URL.to_string(), token)
    }

    pub fn with_base_url(base_url: String, token: Option<String>) -> Result<Self, DiscogsError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| DiscogsError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url,
            token,
        })
    }

    /// Search vinyl release candidates for an artist/title pair
    pub async fn search_releases(
        &self,
        artist: &str,
        title: &str,
    ) -> Result<Vec<DiscogsSearchResult>, DiscogsError> {
        let query = format!(r#"artist:"{}" release_title:"{}""#, artist, title);
        let url = format!("{}/database/search", self.base_url);
        let per_page = SEARCH_PAGE_SIZE.to_string();

        debug!(artist = %artist, title = %title, "searching Discogs");

        let mut request = self
            .http_client
            .get(&url)
            .query(&[
                ("q", query.as_str()),
                ("type", "release"),
                ("format", "vinyl"),
                ("per_page", per_page.as_str()),
            ]);

        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Discogs token={}", token));
        }

        let response = request
            .send()
            .await
            .map_err(|e| DiscogsError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(DiscogsError::ApiError(status.as_u16(), error_text));
        }

        let parsed: DiscogsSearchResponse = response
            .json()
            .await
            .map_err(|e| DiscogsError::ParseError(e.to_string()))?;

        Ok(parsed.results)
    }

    /// Fetch one release by id
    pub async fn get_release(&self, release_id: i64) -> Result<DiscogsRelease, DiscogsError> {
        let url = format!("{}/releases/{}", self.base_url, release_id);

        let mut request = self.http_client.get(&url);
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Discogs token={}", token));
        }

        let response = request
            .send()
            .await
            .map_err(|e| DiscogsError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(DiscogsError::ApiError(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| DiscogsError::ParseError(e.to_string()))
    }

    /// Best-match search: prefer candidates whose title contains the artist,
    /// else take the first result in catalog order. Search failures are
    /// absorbed and yield `None`.
    pub async fn find_best_match(
        &self,
        artist: &str,
        title: &str,
    ) -> Option<DiscogsSearchResult> {
        match self.search_releases(artist, title).await {
            Ok(results) => select_best_match(artist, results),
            Err(e) => {
                warn!(
                    artist = %artist,
                    title = %title,
                    error = %e,
                    "Discogs best-match search failed"
                );
                None
            }
        }
    }

    /// Canonical release-page URL from a detail-page path
    pub fn release_url(&self, uri: &str) -> String {
        format!("{}{}", DISCOGS_WEB_ORIGIN, uri)
    }
}

/// Pick the candidate whose title contains the artist (case-insensitive),
/// falling back to the first raw result
fn select_best_match(
    artist: &str,
    results: Vec<DiscogsSearchResult>,
) -> Option<DiscogsSearchResult> {
    if results.is_empty() {
        return None;
    }

    let needle = artist.to_lowercase();
    let position = results
        .iter()
        .position(|r| r.title.to_lowercase().contains(&needle));

    match position {
        Some(index) => results.into_iter().nth(index),
        None => results.into_iter().next(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: i64, title: &str) -> DiscogsSearchResult {
        DiscogsSearchResult {
            id,
            title: title.to_string(),
            year: None,
            format: None,
            genre: None,
            label: None,
            thumb: None,
            cover_image: None,
            uri: format!("/release/{}", id),
        }
    }

    #[test]
    fn test_best_match_prefers_artist_in_title() {
        let results = vec![
            candidate(1, "Tribute Band - The Wall"),
            candidate(2, "Pink Floyd - The Wall"),
        ];
        let best = select_best_match("pink floyd", results).unwrap();
        assert_eq!(best.id, 2);
    }

    #[test]
    fn test_best_match_falls_back_to_first_result() {
        let results = vec![
            candidate(7, "Someone Else - Covers"),
            candidate(8, "Another - Covers"),
        ];
        let best = select_best_match("Pink Floyd", results).unwrap();
        assert_eq!(best.id, 7);
    }

    #[test]
    fn test_best_match_empty_results_yield_none() {
        assert!(select_best_match("Pink Floyd", Vec::new()).is_none());
    }

    #[test]
    fn test_release_url_prefixes_web_origin() {
        let client = DiscogsClient::new(None).unwrap();
        assert_eq!(
            client.release_url("/release/12345"),
            "https://www.discogs.com/release/12345"
        );
    }

    #[tokio::test]
    async fn test_find_best_match_absorbs_network_failure() {
        let client =
            DiscogsClient::with_base_url("http://127.0.0.1:1".to_string(), None).unwrap();
        assert!(client.find_best_match("Pink Floyd", "The Wall").await.is_none());
    }
}
