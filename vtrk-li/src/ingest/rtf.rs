//! Minimal RTF-to-plain-text conversion
//!
//! Handles just enough of the RTF dialect emitted by the one checklist app
//! we ingest from: font/color table groups, control words, escaped
//! characters, and explicit line/paragraph breaks. This is a best-effort
//! textual transform with no validation; malformed markup degrades to
//! partial output but never errors.

use once_cell::sync::Lazy;
use regex::Regex;

/// `{\rtf...}` header group (up to its first closing brace)
static RTF_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\\rtf[^}]*\}").unwrap());

/// Font table declaration group
static FONT_TABLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\\fonttbl[^}]*\}").unwrap());

/// Color table declaration group
static COLOR_TABLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\\colortbl[^}]*\}").unwrap());

/// Any remaining `{\...}` control group; the trailing plain text survives
static CONTROL_GROUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\\[^}]*\}([^{]*)").unwrap());

/// Generic control word: backslash, letters, optional digits, optional
/// trailing whitespace
static CONTROL_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\\[a-z]+[0-9]*\s?").unwrap());

static SPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").unwrap());
static LINE_LEADING_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s+").unwrap());
static LINE_TRAILING_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+\n").unwrap());
static BLANK_LINE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n+").unwrap());

/// Convert an RTF document to plain text, preserving line structure.
///
/// Break tokens (`\line`, `\par`, doubled backslashes) become line feeds
/// before generic control-word stripping runs; stripping first would
/// consume the break tokens and lose line structure.
pub fn normalize(raw: &str) -> String {
    let text = RTF_HEADER.replace_all(raw, "");
    let text = FONT_TABLE.replace_all(&text, "");
    let text = COLOR_TABLE.replace_all(&text, "");

    // Drop remaining control groups, keeping their trailing content
    let text = CONTROL_GROUP.replace_all(&text, "${1}");

    // Break tokens to line feeds, ahead of control-word stripping
    let text = text
        .replace("\\line", "\n")
        .replace("\\par", "\n")
        .replace("\\\\", "\n");

    let text = CONTROL_WORD.replace_all(&text, "");
    let text = text.replace(['{', '}'], "");

    // Unescape quotes
    let text = text.replace("\\'", "'").replace("\\\"", "\"");

    // Collapse whitespace but keep line breaks
    let text = SPACE_RUNS.replace_all(&text, " ");
    let text = LINE_LEADING_WS.replace_all(&text, "\n");
    let text = LINE_TRAILING_WS.replace_all(&text, "\n");
    let text = BLANK_LINE_RUNS.replace_all(&text, "\n");

    text.trim().to_string()
}
