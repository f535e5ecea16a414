//! Text normalization for cache keys and lyrics-site URL segments

use std::path::{Path, PathBuf};

/// Path of the cache entry for `artist`/`title` inside `cache_dir`.
///
/// Only `/` is rewritten (to `_`); any other character is passed through to
/// the filesystem as-is. Distinct pairs may map to the same file.
pub fn cache_filename(cache_dir: &Path, artist: &str, title: &str) -> PathBuf {
    let artist = artist.replace('/', "_");
    let title = title.replace('/', "_");
    cache_dir.join(format!("{}-{}", artist, title))
}

/// Keeps only alphabetic and numeric characters, in order.
pub fn alpha_digitize(s: &str) -> String {
    s.chars().filter(|c| c.is_alphanumeric()).collect()
}

/// Lowercased, alphanumeric-only form used in lyrics-site URLs.
pub fn url_key(s: &str) -> String {
    alpha_digitize(&s.to_lowercase())
}

/// Drops the trailing characters of `title` up to and including the last
/// bracket or parenthesis. Returns `false` once nothing is left to drop.
pub fn drop_bracketed_suffix(title: &mut String) -> bool {
    while let Some(c) = title.chars().last() {
        if matches!(c, '(' | ')' | '[' | ']') {
            break;
        }
        title.pop();
    }

    if title.is_empty() {
        return false;
    }
    title.pop();
    true
}
