// SPDX-License-Identifier: MPL-2.0
//! Human-readable hints for media framework error codes.
//!
//! FFmpeg reports failures as negative `AVERROR` codes: either a negated
//! `errno` or a negated four-character tag. Known codes map to a canned hint;
//! anything else falls back to FFmpeg's own description.

use super::backend::PlayerErrorInfo;
use crate::i18n::fluent::I18n;
use std::io::ErrorKind;

/// Builds an FFmpeg error tag (`FFERRTAG` in libavutil).
const fn fferrtag(a: u8, b: u8, c: u8, d: u8) -> i32 {
    -((a as i32) | ((b as i32) << 8) | ((c as i32) << 16) | ((d as i32) << 24))
}

pub const AVERROR_INVALIDDATA: i32 = fferrtag(b'I', b'N', b'D', b'A');
pub const AVERROR_EXIT: i32 = fferrtag(b'E', b'X', b'I', b'T');
pub const AVERROR_EOF: i32 = fferrtag(b'E', b'O', b'F', b' ');
pub const AVERROR_HTTP_NOT_FOUND: i32 = fferrtag(0xF8, b'4', b'0', b'4');
pub const AVERROR_HTTP_FORBIDDEN: i32 = fferrtag(0xF8, b'4', b'0', b'3');
pub const AVERROR_PROTOCOL_NOT_FOUND: i32 = fferrtag(0xF8, b'P', b'R', b'O');
pub const AVERROR_DECODER_NOT_FOUND: i32 = fferrtag(0xF8, b'D', b'E', b'C');
pub const AVERROR_STREAM_NOT_FOUND: i32 = fferrtag(0xF8, b'S', b'T', b'R');

/// `EIO`, which FFmpeg's HTTP and HLS layers return for most transfer failures.
const EIO: i32 = 5;

/// Category of a recognized failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorHint {
    Network,
    Corrupted,
    Timeout,
    Unreachable,
    Interrupted,
    NotFound,
    Forbidden,
    Protocol,
    Decoder,
}

impl ErrorHint {
    /// Maps a raw error code to a hint, or `None` when the code is not recognized.
    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            AVERROR_INVALIDDATA | AVERROR_STREAM_NOT_FOUND => Some(ErrorHint::Corrupted),
            AVERROR_EXIT => Some(ErrorHint::Interrupted),
            AVERROR_HTTP_NOT_FOUND => Some(ErrorHint::NotFound),
            AVERROR_HTTP_FORBIDDEN => Some(ErrorHint::Forbidden),
            AVERROR_PROTOCOL_NOT_FOUND => Some(ErrorHint::Protocol),
            AVERROR_DECODER_NOT_FOUND => Some(ErrorHint::Decoder),
            code if code == -EIO => Some(ErrorHint::Network),
            code if code < 0 && code > -4096 => Self::from_errno(-code),
            _ => None,
        }
    }

    fn from_errno(errno: i32) -> Option<Self> {
        match std::io::Error::from_raw_os_error(errno).kind() {
            ErrorKind::TimedOut => Some(ErrorHint::Timeout),
            ErrorKind::ConnectionRefused
            | ErrorKind::HostUnreachable
            | ErrorKind::NetworkUnreachable => Some(ErrorHint::Unreachable),
            ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::NetworkDown
            | ErrorKind::BrokenPipe
            | ErrorKind::NotConnected => Some(ErrorHint::Network),
            ErrorKind::Interrupted => Some(ErrorHint::Interrupted),
            _ => None,
        }
    }

    fn key(self) -> &'static str {
        match self {
            ErrorHint::Network => "network",
            ErrorHint::Corrupted => "corrupted",
            ErrorHint::Timeout => "timeout",
            ErrorHint::Unreachable => "unreachable",
            ErrorHint::Interrupted => "interrupted",
            ErrorHint::NotFound => "not-found",
            ErrorHint::Forbidden => "forbidden",
            ErrorHint::Protocol => "protocol",
            ErrorHint::Decoder => "decoder",
        }
    }

    #[must_use]
    pub fn description_key(self) -> String {
        format!("error-hint-{}-description", self.key())
    }

    #[must_use]
    pub fn suggestion_key(self) -> String {
        format!("error-hint-{}-suggestion", self.key())
    }
}

/// Formats the multi-line error detail shown below an alert heading.
///
/// ```text
/// Error domain: FFmpeg
/// Error code: -5
/// Description: Network connection problem or unsupported media format
/// Suggestion: Check the network connection, try another network or retry later
/// ```
#[must_use]
pub fn format_error(i18n: &I18n, info: &PlayerErrorInfo) -> String {
    let code = info.code.to_string();
    let mut lines = vec![
        i18n.tr_with_args("error-line-domain", &[("domain", info.domain.as_str())]),
        i18n.tr_with_args("error-line-code", &[("code", code.as_str())]),
    ];

    match ErrorHint::from_code(info.code) {
        Some(hint) => {
            let description = i18n.tr(&hint.description_key());
            let suggestion = i18n.tr(&hint.suggestion_key());
            lines.push(i18n.tr_with_args(
                "error-line-description",
                &[("description", description.as_str())],
            ));
            lines.push(i18n.tr_with_args(
                "error-line-suggestion",
                &[("suggestion", suggestion.as_str())],
            ));
        }
        None => {
            let description = if info.description.trim().is_empty() {
                i18n.tr("error-hint-unknown")
            } else {
                info.description.clone()
            };
            lines.push(i18n.tr_with_args(
                "error-line-description",
                &[("description", description.as_str())],
            ));
        }
    }

    lines.join("\n")
}
