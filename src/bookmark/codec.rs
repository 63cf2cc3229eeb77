//! Page token codec
//!
//! A token is `bookmark:` followed by the URL-safe base64 of the bookmark's
//! tagged JSON form. Anything else, including legacy numeric page numbers,
//! decodes to no bookmark.

use super::types::Bookmark;
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix distinguishing bookmark tokens from legacy page numbers
pub const BOOKMARK_PREFIX: &str = "bookmark:";

/// Opaque wire form of a bookmark
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageToken(String);

impl PageToken {
    /// Encode a bookmark into a token
    pub fn encode(bookmark: &Bookmark) -> Self {
        Self(encode(bookmark))
    }

    /// Get the token string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode the token back into a bookmark
    pub fn decode(&self) -> Option<Bookmark> {
        decode(&self.0)
    }
}

impl fmt::Display for PageToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PageToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<PageToken> for String {
    fn from(token: PageToken) -> Self {
        token.0
    }
}

/// Encode a bookmark into an opaque token string
pub fn encode(bookmark: &Bookmark) -> String {
    // Every map key in a bookmark's JSON form is a string, so this cannot fail
    let json = serde_json::to_vec(bookmark).unwrap_or_default();
    format!("{BOOKMARK_PREFIX}{}", URL_SAFE_NO_PAD.encode(json))
}

/// Decode a token from untrusted input
///
/// Returns `None` for every structural failure: missing prefix, bad base64,
/// invalid JSON or a JSON shape that is not a bookmark.
pub fn decode(token: &str) -> Option<Bookmark> {
    let Some(payload) = token.strip_prefix(BOOKMARK_PREFIX) else {
        tracing::debug!(token, "Ignoring page token without bookmark prefix");
        return None;
    };

    let Some(bytes) = decode_base64(payload) else {
        tracing::debug!(token, "Ignoring page token with invalid base64 payload");
        return None;
    };

    match serde_json::from_slice::<Bookmark>(&bytes) {
        Ok(bookmark) => Some(bookmark),
        Err(e) => {
            tracing::debug!(token, error = %e, "Ignoring page token with invalid bookmark");
            None
        }
    }
}

/// Accept both alphabets, padded or not
fn decode_base64(payload: &str) -> Option<Vec<u8>> {
    [&URL_SAFE_NO_PAD, &URL_SAFE, &STANDARD, &STANDARD_NO_PAD]
        .iter()
        .find_map(|engine| engine.decode(payload).ok())
}
