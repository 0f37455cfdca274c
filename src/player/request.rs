// SPDX-License-Identifier: MPL-2.0
//! Validation of user-entered stream addresses.

use crate::error::PlaybackError;
use url::Url;

/// A validated playback target.
///
/// Construction trims surrounding whitespace and requires an absolute URL.
/// The scheme is not restricted: anything the media framework cannot open
/// surfaces later as a load failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackRequest {
    url: Url,
}

impl PlaybackRequest {
    /// Parses raw input from the address box.
    ///
    /// # Errors
    ///
    /// Returns [`PlaybackError::EmptyUrl`] when the trimmed input is empty and
    /// [`PlaybackError::InvalidUrl`] when it is not an absolute URL.
    pub fn parse(input: &str) -> Result<Self, PlaybackError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(PlaybackError::EmptyUrl);
        }

        Url::parse(trimmed)
            .map(|url| Self { url })
            .map_err(|e| PlaybackError::InvalidUrl(e.to_string()))
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

/// Returns true when the input box holds something worth submitting.
#[must_use]
pub fn has_content(input: &str) -> bool {
    !input.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_whitespace_and_newlines() {
        let request = PlaybackRequest::parse("  https://example.com/live.m3u8 \n")
            .expect("valid url");
        assert_eq!(request.as_str(), "https://example.com/live.m3u8");
    }

    #[test]
    fn parse_rejects_empty_input() {
        assert_eq!(PlaybackRequest::parse(""), Err(PlaybackError::EmptyUrl));
        assert_eq!(PlaybackRequest::parse(" \t\n "), Err(PlaybackError::EmptyUrl));
    }

    #[test]
    fn parse_rejects_relative_input() {
        let result = PlaybackRequest::parse("not a url");
        assert!(matches!(result, Err(PlaybackError::InvalidUrl(_))));
    }

    #[test]
    fn parse_accepts_any_scheme() {
        let request = PlaybackRequest::parse("rtmp://media.example.com/app/stream").expect("url");
        assert_eq!(request.url().scheme(), "rtmp");
    }

    #[test]
    fn parse_keeps_query_string() {
        let request =
            PlaybackRequest::parse("https://cdn.example.com/a/index.m3u8?token=abc").expect("url");
        assert_eq!(request.url().query(), Some("token=abc"));
    }

    #[test]
    fn has_content_ignores_whitespace() {
        assert!(!has_content("   \n"));
        assert!(has_content(" x "));
    }
}
