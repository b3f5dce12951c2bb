//! Normalization of stored photo references into S3 object keys
//!
//! Trips store either the raw object key returned by the upload endpoint or, for
//! older records, a full (possibly presigned) S3 URL. Every read path goes through
//! [`object_key_from_stored`] so both shapes resolve to the same key.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use url::Url;

/// Matches the key portion of a virtual-hosted S3 URL, up to the query string
static S3_HOST_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"amazonaws\.com/([^?]+)").expect("S3 host pattern is valid"));

/// Content type used when the extension is missing or unknown
pub const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";

/// Errors produced while normalizing a stored photo reference
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ObjectKeyError {
    /// A `%` not followed by two hex digits
    #[error("Malformed percent-encoding in {0:?}")]
    MalformedEscape(String),

    /// Percent-decoded bytes are not valid UTF-8
    #[error("Decoded key is not valid UTF-8: {0:?}")]
    InvalidUtf8(String),

    /// Nothing left after normalization
    #[error("Empty object key")]
    Empty,
}

/// Strict percent-decoding: malformed escapes are rejected instead of passed through
fn percent_decode(value: &str) -> Result<String, ObjectKeyError> {
    let well_formed = value.match_indices('%').all(|(idx, _)| {
        value
            .as_bytes()
            .get(idx + 1..idx + 3)
            .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit))
    });

    if !well_formed {
        return Err(ObjectKeyError::MalformedEscape(value.to_string()));
    }

    urlencoding::decode(value)
        .map(std::borrow::Cow::into_owned)
        .map_err(|_| ObjectKeyError::InvalidUtf8(value.to_string()))
}

/// Turns a stored photo reference (object key or URL) into a canonical object key
///
/// 1. Values without an `http://`/`https://` scheme are keys already.
/// 2. URLs contribute their path, minus the leading slash.
/// 3. Unparseable URLs fall back to everything after `amazonaws.com/`.
/// 4. Anything else is used as-is.
///
/// The result is always percent-decoded.
///
/// # Errors
///
/// Returns `ObjectKeyError` if the value has malformed percent-encoding, decodes to
/// invalid UTF-8, or normalizes to an empty key.
pub fn object_key_from_stored(stored: &str) -> Result<String, ObjectKeyError> {
    let key = if !stored.starts_with("http://") && !stored.starts_with("https://") {
        percent_decode(stored)?
    } else if let Ok(url) = Url::parse(stored) {
        let path = url.path();
        percent_decode(path.strip_prefix('/').unwrap_or(path))?
    } else if let Some(captures) = S3_HOST_KEY.captures(stored) {
        percent_decode(&captures[1])?
    } else {
        percent_decode(stored)?
    };

    if key.is_empty() {
        return Err(ObjectKeyError::Empty);
    }

    Ok(key)
}

/// Infers the image content type from the key's file extension
#[must_use]
pub fn content_type_for_key(key: &str) -> &'static str {
    let extension = key
        .rsplit_once('.')
        .map(|(_, extension)| extension.to_ascii_lowercase());

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("heic") => "image/heic",
        Some("heif") => "image/heif",
        _ => DEFAULT_CONTENT_TYPE,
    }
}
