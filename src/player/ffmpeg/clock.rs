// SPDX-License-Identifier: MPL-2.0
//! Wall-clock pacing of decoded frames.

use std::time::{Duration, Instant};

/// Waits longer than this are treated as a timestamp discontinuity.
const MAX_FRAME_WAIT: Duration = Duration::from_secs(1);

/// Maps presentation timestamps onto the wall clock.
///
/// The first frame after a reset anchors the clock; later frames are due at
/// `anchor + (pts - anchor_pts)`. Backwards jumps and large gaps re-anchor,
/// which is common across HLS segment boundaries.
#[derive(Debug, Default)]
pub(super) struct PlaybackClock {
    anchor: Option<(Instant, f64)>,
}

impl PlaybackClock {
    /// Forgets the anchor, e.g. after a pause.
    pub(super) fn reset(&mut self) {
        self.anchor = None;
    }

    /// Returns how long to wait before presenting a frame with `pts_secs`.
    pub(super) fn delay_for(&mut self, pts_secs: f64, now: Instant) -> Duration {
        let Some((start, base_pts)) = self.anchor else {
            self.anchor = Some((now, pts_secs));
            return Duration::ZERO;
        };

        let offset = pts_secs - base_pts;
        if !offset.is_finite() || offset < 0.0 {
            self.anchor = Some((now, pts_secs));
            return Duration::ZERO;
        }

        let due = start + Duration::from_secs_f64(offset);
        let wait = due.saturating_duration_since(now);
        if wait > MAX_FRAME_WAIT {
            log::debug!("Timestamp gap of {:?}, re-anchoring clock", wait);
            self.anchor = Some((now, pts_secs));
            return Duration::ZERO;
        }
        wait
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_is_due_immediately() {
        let mut clock = PlaybackClock::default();
        assert_eq!(clock.delay_for(10.0, Instant::now()), Duration::ZERO);
    }

    #[test]
    fn later_frames_wait_for_their_offset() {
        let mut clock = PlaybackClock::default();
        let start = Instant::now();
        clock.delay_for(10.0, start);
        let wait = clock.delay_for(10.5, start);
        assert!((wait.as_secs_f64() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn late_frames_do_not_wait() {
        let mut clock = PlaybackClock::default();
        let start = Instant::now();
        clock.delay_for(0.0, start);
        let later = start + Duration::from_millis(200);
        assert_eq!(clock.delay_for(0.1, later), Duration::ZERO);
    }

    #[test]
    fn backwards_jump_reanchors() {
        let mut clock = PlaybackClock::default();
        let start = Instant::now();
        clock.delay_for(100.0, start);
        assert_eq!(clock.delay_for(2.0, start), Duration::ZERO);
        let wait = clock.delay_for(2.25, start);
        assert!((wait.as_secs_f64() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn large_gap_reanchors() {
        let mut clock = PlaybackClock::default();
        let start = Instant::now();
        clock.delay_for(0.0, start);
        assert_eq!(clock.delay_for(30.0, start), Duration::ZERO);
    }

    #[test]
    fn reset_forgets_anchor() {
        let mut clock = PlaybackClock::default();
        let start = Instant::now();
        clock.delay_for(0.0, start);
        clock.reset();
        assert_eq!(clock.delay_for(0.9, start), Duration::ZERO);
    }
}
