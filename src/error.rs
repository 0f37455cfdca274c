// SPDX-License-Identifier: MPL-2.0
use crate::player::PlayerErrorInfo;
use std::fmt;

#[derive(Debug, Clone)]
pub enum Error {
    Io(String),
    Config(String),
    Playback(PlaybackError),
}

/// Recoverable failures of a playback attempt.
///
/// Every variant is shown to the user as a modal alert and returns the
/// orchestrator to idle; none of them stops the application.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackError {
    /// The trimmed input was empty.
    EmptyUrl,

    /// The input could not be parsed as an absolute URL.
    InvalidUrl(String),

    /// The media framework resolved the attempt (or a running stream) as failed.
    LoadFailed(PlayerErrorInfo),

    /// No status resolution happened before the load timeout elapsed.
    Timeout,
}

impl PlaybackError {
    /// Returns the i18n message key for this error type.
    pub fn i18n_key(&self) -> &'static str {
        match self {
            PlaybackError::EmptyUrl => "error-empty-url",
            PlaybackError::InvalidUrl(_) => "error-invalid-url",
            PlaybackError::LoadFailed(_) => "error-load-failed",
            PlaybackError::Timeout => "error-load-timeout",
        }
    }
}

impl fmt::Display for PlaybackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackError::EmptyUrl => write!(f, "No URL entered"),
            PlaybackError::InvalidUrl(reason) => write!(f, "Invalid URL: {}", reason),
            PlaybackError::LoadFailed(info) => write!(
                f,
                "Load failed ({} {}): {}",
                info.domain, info.code, info.description
            ),
            PlaybackError::Timeout => write!(f, "Playback attempt timed out"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
            Error::Playback(e) => write!(f, "Playback Error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<PlaybackError> for Error {
    fn from(err: PlaybackError) -> Self {
        Error::Playback(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_io_error() {
        let err = Error::Io("disk failure".to_string());
        assert_eq!(format!("{}", err), "I/O Error: disk failure");
    }

    #[test]
    fn from_io_error_produces_io_variant() {
        let io_error = std::io::Error::other("boom");
        let err: Error = io_error.into();
        match err {
            Error::Io(message) => assert!(message.contains("boom")),
            _ => panic!("expected Io variant"),
        }
    }

    #[test]
    fn config_error_formats_properly() {
        let err = Error::Config("bad field".into());
        assert_eq!(format!("{}", err), "Config Error: bad field");
    }

    #[test]
    fn playback_error_keys_are_distinct() {
        let keys = [
            PlaybackError::EmptyUrl.i18n_key(),
            PlaybackError::InvalidUrl(String::new()).i18n_key(),
            PlaybackError::LoadFailed(PlayerErrorInfo::new("FFmpeg", -5, "I/O error")).i18n_key(),
            PlaybackError::Timeout.i18n_key(),
        ];
        for (i, a) in keys.iter().enumerate() {
            for b in &keys[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn load_failed_display_includes_domain_and_code() {
        let err = PlaybackError::LoadFailed(PlayerErrorInfo::new(
            "FFmpeg",
            -110,
            "Connection timed out",
        ));
        let text = err.to_string();
        assert!(text.contains("FFmpeg"));
        assert!(text.contains("-110"));
        assert!(text.contains("Connection timed out"));
    }

    #[test]
    fn playback_error_converts_into_error() {
        let err: Error = PlaybackError::Timeout.into();
        assert!(matches!(err, Error::Playback(PlaybackError::Timeout)));
    }
}
