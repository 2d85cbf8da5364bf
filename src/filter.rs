/// Substrings that mark an image source as decorative rather than content.
const DECORATIVE_MARKERS: [&str; 3] = ["logo", "icon", "favicon"];

/// Check whether an image source path looks like a logo, icon or favicon.
///
/// Matching is case-insensitive substring matching on the raw source value,
/// before URL resolution.
pub fn is_decorative(src: &str) -> bool {
    let lower = src.to_lowercase();
    DECORATIVE_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Check whether an image source is an inline base64-encoded payload.
///
/// `data:` sources are not downloadable as discrete assets and are skipped.
pub fn is_inline_data(src: &str) -> bool {
    src.starts_with("data:")
}
