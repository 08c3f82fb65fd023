//! Document MIME types for uploads.

use std::path::Path;

pub const FALLBACK_MIME: &str = "application/octet-stream";

/// Guesses a MIME type from the file extension, falling back to
/// [`FALLBACK_MIME`] when the extension is missing or unknown.
#[must_use]
pub fn mime_for_path(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}
