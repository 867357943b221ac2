//! Header parsing utilities.

use axum::http::HeaderMap;

/// Header naming the session a request belongs to.
pub const SESSION_HEADER: &str = "X-Session";

/// Session used when a request does not name one.
pub const DEFAULT_SESSION: &str = "default";

/// Extension trait for convenient header parsing.
pub trait HeaderMapExt {
    /// Get a header value as a string, returning None if missing.
    fn get_str(&self, name: &str) -> Option<&str>;

    /// Session key of the request.
    ///
    /// Falls back to [`DEFAULT_SESSION`] when the header is missing, empty,
    /// longer than 64 bytes, or contains anything but ASCII alphanumerics,
    /// `-` and `_`.
    fn session_key(&self) -> String;
}

impl HeaderMapExt for HeaderMap {
    fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|v| v.to_str().ok())
    }

    fn session_key(&self) -> String {
        self.get_str(SESSION_HEADER)
            .map(str::trim)
            .filter(|s| is_valid_session(s))
            .unwrap_or(DEFAULT_SESSION)
            .to_string()
    }
}

/// Whether `key` is usable as a session key.
pub fn is_valid_session(key: &str) -> bool {
    !key.is_empty()
        && key.len() <= 64
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}
