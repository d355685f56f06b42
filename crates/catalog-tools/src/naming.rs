//! Tool-name sanitizing.
//!
//! MCP clients constrain tool names to `[a-zA-Z0-9_-]` and 64 characters. Catalog feature names
//! and endpoint titles are free text ("Call Queue", "Get Location Details"), so they are folded into
//! that alphabet here.

use regex::Regex;
use std::sync::LazyLock;

pub const FEATURE_PART_MAX: usize = 20;
pub const TITLE_PART_MAX: usize = 40;
pub const TOOL_NAME_MAX: usize = 64;

/// Used when both name parts sanitize to nothing.
const FALLBACK_TOOL_NAME: &str = "endpoint";

static INVALID_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9_-]").expect("valid regex"));
static UNDERSCORE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_+").expect("valid regex"));

/// Fold arbitrary text into `[a-z0-9_-]` with no leading, trailing or repeated underscores.
///
/// Total and idempotent.
#[must_use]
pub fn sanitize_name(text: &str) -> String {
    let replaced = INVALID_CHARS.replace_all(text, "_");
    let collapsed = UNDERSCORE_RUNS.replace_all(&replaced, "_");
    collapsed.trim_matches('_').to_ascii_lowercase()
}

/// Prefix of at most `max` characters (not bytes).
#[must_use]
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Tool name for one endpoint: `feature[..20] + "_" + title[..40]`, capped at 64.
///
/// Truncation can cut right after an underscore; such dangling underscores are dropped so the
/// result stays in the sanitized alphabet.
#[must_use]
pub fn tool_name(feature: &str, title: &str) -> String {
    let feature = sanitize_name(feature);
    let title = sanitize_name(title);

    let parts: Vec<&str> = [
        truncate_chars(&feature, FEATURE_PART_MAX),
        truncate_chars(&title, TITLE_PART_MAX),
    ]
    .into_iter()
    .map(|p| p.trim_end_matches('_'))
    .filter(|p| !p.is_empty())
    .collect();

    if parts.is_empty() {
        return FALLBACK_TOOL_NAME.to_string();
    }

    let joined = parts.join("_");
    truncate_chars(&joined, TOOL_NAME_MAX).to_string()
}

/// `base` with a numeric suffix, shortened so the result still fits in [`TOOL_NAME_MAX`].
#[must_use]
pub fn suffixed_tool_name(base: &str, counter: usize) -> String {
    let suffix = format!("_{counter}");
    let room = TOOL_NAME_MAX.saturating_sub(suffix.len());
    let stem = truncate_chars(base, room).trim_end_matches('_');
    format!("{stem}{suffix}")
}
