// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the application. Constants are organized by category.
//!
//! # Categories
//!
//! - **Loading**: Playback attempt timeout and status polling cadence
//! - **Startup**: Deferred autoplay and the one-shot play retry
//! - **Buffering**: Forward buffer hint for the decoder
//! - **Volume**: Audio playback volume settings
//! - **Overlay**: Playback controls auto-hide timeout

// ==========================================================================
// Loading Defaults
// ==========================================================================

/// Wall-clock limit for a playback attempt to resolve (in seconds).
pub const DEFAULT_LOAD_TIMEOUT_SECS: u32 = 15;

/// Minimum load timeout (in seconds).
pub const MIN_LOAD_TIMEOUT_SECS: u32 = 5;

/// Maximum load timeout (in seconds).
pub const MAX_LOAD_TIMEOUT_SECS: u32 = 120;

/// Cadence of status polling while an attempt is loading (in milliseconds).
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 1000;

/// Minimum poll interval (in milliseconds).
pub const MIN_POLL_INTERVAL_MS: u32 = 250;

/// Maximum poll interval (in milliseconds).
pub const MAX_POLL_INTERVAL_MS: u32 = 5000;

// ==========================================================================
// Startup Defaults
// ==========================================================================

/// Delay between revealing the playback view and issuing play (in milliseconds).
pub const DEFAULT_AUTOPLAY_DELAY_MS: u32 = 500;

/// Delay after play before checking that a frame was presented (in seconds).
pub const DEFAULT_STARTUP_RETRY_SECS: u32 = 2;

// ==========================================================================
// Buffering Defaults
// ==========================================================================

/// Preferred forward buffer duration (in seconds).
pub const DEFAULT_FORWARD_BUFFER_SECS: f64 = 5.0;

/// Minimum forward buffer duration (in seconds).
pub const MIN_FORWARD_BUFFER_SECS: f64 = 0.5;

/// Maximum forward buffer duration (in seconds).
pub const MAX_FORWARD_BUFFER_SECS: f64 = 30.0;

// ==========================================================================
// Volume Defaults
// ==========================================================================

/// Default playback volume (0.0 to 1.5, where 1.0 = 100%).
pub const DEFAULT_VOLUME: f32 = 1.0;

/// Minimum volume level.
pub const MIN_VOLUME: f32 = 0.0;

/// Maximum volume level (1.5 = 150% amplification).
pub const MAX_VOLUME: f32 = 1.5;

// ==========================================================================
// Overlay/Timeout Defaults
// ==========================================================================

/// Default auto-hide timeout for playback controls (in seconds).
pub const DEFAULT_OVERLAY_TIMEOUT_SECS: u32 = 3;

/// Minimum overlay timeout (in seconds).
pub const MIN_OVERLAY_TIMEOUT_SECS: u32 = 1;

/// Maximum overlay timeout (in seconds).
pub const MAX_OVERLAY_TIMEOUT_SECS: u32 = 30;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_defaults_are_within_bounds() {
        assert!((MIN_LOAD_TIMEOUT_SECS..=MAX_LOAD_TIMEOUT_SECS)
            .contains(&DEFAULT_LOAD_TIMEOUT_SECS));
        assert!((MIN_POLL_INTERVAL_MS..=MAX_POLL_INTERVAL_MS).contains(&DEFAULT_POLL_INTERVAL_MS));
    }

    #[test]
    fn poll_interval_is_shorter_than_timeout() {
        assert!(u64::from(DEFAULT_POLL_INTERVAL_MS) < u64::from(DEFAULT_LOAD_TIMEOUT_SECS) * 1000);
    }

    #[test]
    fn overlay_and_volume_defaults_are_within_bounds() {
        assert!((MIN_OVERLAY_TIMEOUT_SECS..=MAX_OVERLAY_TIMEOUT_SECS)
            .contains(&DEFAULT_OVERLAY_TIMEOUT_SECS));
        assert!((MIN_VOLUME..=MAX_VOLUME).contains(&DEFAULT_VOLUME));
        assert!((MIN_FORWARD_BUFFER_SECS..=MAX_FORWARD_BUFFER_SECS)
            .contains(&DEFAULT_FORWARD_BUFFER_SECS));
    }
}
