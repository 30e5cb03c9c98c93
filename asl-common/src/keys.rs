//! Lookup-key and cache-filename normalization
//!
//! Two key forms exist:
//! - **Namespaced keys** (`digits/5`, `letters/a`, `phonetic/a_p`, `silence/1`):
//!   any path with a reserved segment keeps its full relative path.
//! - **Phrase keys** (`connected to`): everything else collapses to the
//!   lowercased basename with `-`/`_` turned into spaces.
//!
//! [`phrase_to_filename`] produces the filesystem-safe names used for
//! synthesized and concatenated units.

use md5::{Digest, Md5};
use std::path::{Component, Path};

/// Path segments that disable basename-only key simplification
pub const RESERVED_NAMESPACES: [&str; 4] = ["digits", "letters", "phonetic", "silence"];

/// Substituted when sanitizing leaves nothing behind
pub const EMPTY_FILENAME_PLACEHOLDER: &str = "text";

/// Number of hex characters of the content hash appended to truncated names
pub const HASH_SUFFIX_LEN: usize = 8;

/// Normalize a relative sound path (or `{braced}` key) into a lookup key.
///
/// The last extension is stripped in both modes. Paths that contain a
/// reserved namespace segment are returned with `/` separators and original
/// casing; all other paths reduce to [`phrase_key`] of their final segment.
///
/// ```
/// use asl_common::keys::path_to_key;
/// assert_eq!(path_to_key("digits/5.ulaw"), "digits/5");
/// assert_eq!(path_to_key("rpt/Connected-To.gsm"), "connected to");
/// ```
pub fn path_to_key(relative: &str) -> String {
    let path = Path::new(relative);
    let segments: Vec<String> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if segments
        .iter()
        .any(|segment| RESERVED_NAMESPACES.contains(&segment.as_str()))
    {
        let stripped = path.with_extension("");
        return stripped
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/");
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    phrase_key(&stem)
}

/// Basename-style normalization of a phrase.
///
/// Lowercases, turns underscores and hyphens into spaces and collapses
/// whitespace runs.
pub fn phrase_key(phrase: &str) -> String {
    phrase
        .to_lowercase()
        .replace(['_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build a filesystem-safe filename (without extension) from arbitrary text.
///
/// **Algorithm:**
/// 1. Keep the first `max_words` whitespace-separated words
/// 2. Lowercase, replace runs of spaces/underscores with one hyphen
/// 3. Drop everything outside `[a-z0-9-]`, trim trailing hyphens
/// 4. Fall back to [`EMPTY_FILENAME_PLACEHOLDER`] if nothing is left
/// 5. Only when words were dropped, append `-` and [`content_hash`] of the
///    original text
pub fn phrase_to_filename(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let truncated = words.len() > max_words;
    let kept = &words[..words.len().min(max_words)];

    let mut sanitized = String::with_capacity(text.len());
    let mut in_separator_run = false;
    for c in kept.join(" ").to_lowercase().chars() {
        if c == ' ' || c == '_' {
            if !in_separator_run {
                sanitized.push('-');
                in_separator_run = true;
            }
            continue;
        }
        in_separator_run = false;
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
            sanitized.push(c);
        }
    }

    let mut name = sanitized.trim_end_matches('-').to_string();
    if name.is_empty() {
        name = EMPTY_FILENAME_PLACEHOLDER.to_string();
    }

    if truncated {
        format!("{}-{}", name, content_hash(text))
    } else {
        name
    }
}

/// First [`HASH_SUFFIX_LEN`] hex characters of the MD5 digest of `text`
///
/// MD5 keeps generated names identical to files already seeded by the
/// earlier tooling.
pub fn content_hash(text: &str) -> String {
    let digest = Md5::digest(text.as_bytes());
    let mut hex = format!("{:x}", digest);
    hex.truncate(HASH_SUFFIX_LEN);
    hex
}
