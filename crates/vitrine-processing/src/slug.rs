//! SEO-friendly file naming
//!
//! Produces ASCII slugs from free text (alt text or the original file name):
//! lowercase, diacritics stripped, every other run of characters collapsed to
//! a single hyphen.

use std::path::Path;
use unicode_normalization::UnicodeNormalization;

/// Maximum slug length in characters
pub const MAX_SLUG_LENGTH: usize = 60;

/// Slug used when neither alt text nor file name yields anything
pub const FALLBACK_SLUG: &str = "image";

/// Extension of every stored asset
pub const OUTPUT_EXTENSION: &str = "webp";

fn is_combining_diacritic(c: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&c)
}

/// Turn arbitrary text into a slug of `[a-z0-9-]`.
///
/// The result never starts or ends with a hyphen before truncation, never
/// contains two hyphens in a row and is at most [`MAX_SLUG_LENGTH`] long.
/// May be empty.
pub fn sanitize(text: &str) -> String {
    let decomposed: String = text
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_diacritic(*c))
        .collect();

    let mut slug = String::with_capacity(decomposed.len());
    let mut pending_hyphen = false;

    for c in decomposed.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    // ASCII only at this point, byte truncation is char-safe
    slug.truncate(MAX_SLUG_LENGTH);
    slug
}

/// Pick the slug for an upload.
///
/// Alt text wins when it sanitizes to something. Otherwise the original file
/// name without its extension is used, and [`FALLBACK_SLUG`] when that also
/// sanitizes to nothing.
pub fn seo_slug(alt_text: Option<&str>, original_filename: Option<&str>) -> String {
    let from_alt = alt_text.map(sanitize).unwrap_or_default();
    if !from_alt.is_empty() {
        return from_alt;
    }

    let from_file_name = original_filename
        .map(|name| sanitize(file_stem(name)))
        .unwrap_or_default();
    if !from_file_name.is_empty() {
        return from_file_name;
    }

    FALLBACK_SLUG.to_string()
}

/// Build the stored file name: `<slug>-<millis>.webp`
pub fn generate_file_name(slug: &str, timestamp_millis: i64) -> String {
    format!("{}-{}.{}", slug, timestamp_millis, OUTPUT_EXTENSION)
}

/// Final path component without its last extension. A leading-dot name such
/// as `.png` is all extension and yields an empty stem.
fn file_stem(file_name: &str) -> &str {
    let name = Path::new(file_name)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(file_name);

    match name.rsplit_once('.') {
        Some((stem, _extension)) => stem,
        None => name,
    }
}
