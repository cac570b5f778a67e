//! Checklist line parsing
//!
//! Each line of the uploaded list looks like
//! `- [ ] Artist - Title (note)` (wanted) or `- [x] Artist - Title` (owned).
//! Artist/title splitting on the first `" - "` is a heuristic, not a
//! grammar; lines that contain the separator inside an artist or title will
//! mis-split, so the original line is kept on each entry for later review.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Unchecked checkbox marker (wanted)
const UNCHECKED_MARKER: &str = "- [ ]";
/// Checked checkbox marker (owned)
const CHECKED_MARKER: &str = "- [x]";

/// Artist/title separator
const SEPARATOR: &str = " - ";

/// Everything up to and including the first checkbox marker, plus the
/// whitespace that follows it
static MARKER_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^.*?- \[[ x]\]\s*").unwrap());

/// Leftover backslash-delimited escape remnants from inputs that bypassed
/// the RTF normalizer
static ESCAPE_REMNANTS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\[^\\]*\\").unwrap());

/// Trailing parenthesized annotation, e.g. a year or edition note
static TRAILING_PAREN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\([^)]*\)\s*$").unwrap());

/// Ownership status of a checklist entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    /// Desired but not owned (unchecked)
    Want,
    /// Owned (checked)
    Have,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Want => "WANT",
            Status::Have => "HAVE",
        }
    }
}

impl std::str::FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WANT" => Ok(Status::Want),
            "HAVE" => Ok(Status::Have),
            other => Err(format!("invalid status: {}", other)),
        }
    }
}

/// One parsed checklist entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEntry {
    pub artist: String,
    pub title: String,
    pub status: Status,
    /// Raw input line, kept for diagnostics and downstream review
    pub original_line: String,
}

/// Parse normalized plain text into checklist entries.
///
/// Lines without a checkbox marker are skipped; lines without the artist
/// separator are dropped with a warning. Never fails; worst case returns an
/// empty vec. Input line order is preserved.
pub fn parse(text: &str) -> Vec<ParsedEntry> {
    let mut entries = Vec::new();

    for line in text.lines() {
        let trimmed = line.trim();

        if trimmed.is_empty()
            || (!trimmed.contains(UNCHECKED_MARKER) && !trimmed.contains(CHECKED_MARKER))
        {
            continue;
        }

        let status = if trimmed.contains(CHECKED_MARKER) {
            Status::Have
        } else {
            Status::Want
        };

        // Drop everything through the first marker occurrence
        let album_text = MARKER_PREFIX.replace(trimmed, "");

        // Cleanup for inputs that bypassed the RTF normalizer
        let album_text = ESCAPE_REMNANTS.replace_all(&album_text, "");
        let album_text = album_text.replace(['{', '}'], "").replace("\\'", "'");
        let album_text = album_text.trim();

        if album_text.is_empty() {
            continue;
        }

        let Some(separator_at) = album_text.find(SEPARATOR) else {
            warn!(line = %album_text, "could not split artist/title; line dropped");
            continue;
        };

        let artist = album_text[..separator_at].trim();
        let title_candidate = &album_text[separator_at + SEPARATOR.len()..];
        let title_candidate = TRAILING_PAREN.replace(title_candidate, "");
        let title = title_candidate.trim();

        if artist.is_empty() || title.is_empty() {
            continue;
        }

        entries.push(ParsedEntry {
            artist: artist.to_string(),
            title: title.to_string(),
            status,
            original_line: line.to_string(),
        });
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unchecked_entry_is_want() {
        let entries = parse("- [ ] Pink Floyd - The Wall (1979)");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].artist, "Pink Floyd");
        assert_eq!(entries[0].title, "The Wall");
        assert_eq!(entries[0].status, Status::Want);
    }

    #[test]
    fn test_checked_entry_is_have() {
        let entries = parse("- [x] Miles Davis - Kind of Blue");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].artist, "Miles Davis");
        assert_eq!(entries[0].title, "Kind of Blue");
        assert_eq!(entries[0].status, Status::Have);
    }

    #[test]
    fn test_lines_without_markers_yield_nothing() {
        let text = "Shopping list\nPink Floyd - The Wall\n\n* Other bullet";
        assert!(parse(text).is_empty());
    }

    #[test]
    fn test_line_without_separator_is_dropped() {
        let text = "- [ ] NoSeparatorHere\n- [ ] Neil Young - Harvest";
        let entries = parse(text);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].artist, "Neil Young");
    }

    #[test]
    fn test_content_before_marker_is_discarded() {
        let entries = parse("some prefix - [ ] Tom Waits - Rain Dogs");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].artist, "Tom Waits");
        assert_eq!(entries[0].title, "Rain Dogs");
    }

    #[test]
    fn test_first_separator_wins() {
        let entries = parse("- [ ] Angus - Julia Stone - Down the Way");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].artist, "Angus");
        assert_eq!(entries[0].title, "Julia Stone - Down the Way");
    }

    #[test]
    fn test_trailing_parenthetical_is_stripped() {
        let entries = parse("- [x] Fleetwood Mac - Rumours (1977, 180g reissue)");
        assert_eq!(entries[0].title, "Rumours");
    }

    #[test]
    fn test_inner_parenthetical_is_kept() {
        let entries = parse("- [ ] Bob Dylan - Blood (On) the Tracks extra");
        assert_eq!(entries[0].title, "Blood (On) the Tracks extra");
    }

    #[test]
    fn test_escape_remnants_are_scrubbed() {
        let entries = parse("- [ ] Guns N\\' Roses - Appetite {for} Destruction");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].artist, "Guns N' Roses");
        assert_eq!(entries[0].title, "Appetite for Destruction");
    }

    #[test]
    fn test_order_is_preserved() {
        let text = "- [ ] B Artist - Second\n- [ ] A Artist - First";
        let entries = parse(text);
        assert_eq!(entries[0].artist, "B Artist");
        assert_eq!(entries[1].artist, "A Artist");
    }

    #[test]
    fn test_original_line_is_retained() {
        let line = "- [ ] Pink Floyd - Animals";
        let entries = parse(line);
        assert_eq!(entries[0].original_line, line);
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        assert!(parse("").is_empty());
    }
}
