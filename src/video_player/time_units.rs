// SPDX-License-Identifier: MPL-2.0
//! Time unit conversion utilities for frame-indexed playback.
//!
//! Provides conversions between frame indices, seconds and milliseconds for:
//! - Position display (frame index to elapsed seconds)
//! - Seek targets (seconds to the nearest frame index)
//! - Frame clock timing (nominal duration and per-frame period)
//!
//! Every function that divides by a frame rate returns `None` when the rate
//! is not strictly positive, so callers can skip rate-dependent work when no
//! source is loaded.

/// Milliseconds per second as f64 for calculations.
pub const MILLIS_PER_SECOND: f64 = 1_000.0;

/// Returns true if the frame rate can be used as a divisor.
#[inline]
pub fn is_valid_frame_rate(frame_rate: f64) -> bool {
    frame_rate.is_finite() && frame_rate > 0.0
}

/// Converts a frame index to elapsed seconds.
///
/// # Examples
///
/// ```
/// use iced_review::video_player::time_units::frames_to_secs;
///
/// assert_eq!(frames_to_secs(50, 10.0), Some(5.0));
/// assert_eq!(frames_to_secs(50, 0.0), None);
/// ```
#[inline]
pub fn frames_to_secs(frame_index: u64, frame_rate: f64) -> Option<f64> {
    is_valid_frame_rate(frame_rate).then(|| frame_index as f64 / frame_rate)
}

/// Converts seconds to a signed frame offset, rounding to the nearest frame.
///
/// Used for `±Ns` jumps and the seconds entry field. The result is signed
/// because jumps can move backward.
///
/// # Examples
///
/// ```
/// use iced_review::video_player::time_units::secs_to_frames;
///
/// assert_eq!(secs_to_frames(5.0, 10.0), Some(50));
/// assert_eq!(secs_to_frames(-1.0, 29.97), Some(-30));
/// ```
#[inline]
pub fn secs_to_frames(secs: f64, frame_rate: f64) -> Option<i64> {
    is_valid_frame_rate(frame_rate).then(|| (secs * frame_rate).round() as i64)
}

/// Nominal playback duration in whole milliseconds (`frame_count / rate × 1000`).
#[inline]
pub fn nominal_duration_ms(frame_count: u64, frame_rate: f64) -> Option<u64> {
    frames_to_secs(frame_count, frame_rate).map(|secs| (secs * MILLIS_PER_SECOND) as u64)
}

/// Nominal per-frame period in whole milliseconds (`1000 / rate`), at least 1.
#[inline]
pub fn frame_period_ms(frame_rate: f64) -> Option<u64> {
    is_valid_frame_rate(frame_rate).then(|| ((MILLIS_PER_SECOND / frame_rate) as u64).max(1))
}

/// Clamps a signed frame target into `[0, frame_count]`.
#[inline]
pub fn clamp_frame_index(target: i64, frame_count: u64) -> u64 {
    if target <= 0 {
        0
    } else {
        (target as u64).min(frame_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::assert_abs_diff_eq;

    #[test]
    fn frames_to_secs_converts_correctly() {
        assert_eq!(frames_to_secs(0, 10.0), Some(0.0));
        assert_eq!(frames_to_secs(1, 10.0), Some(0.1));
        assert_abs_diff_eq!(frames_to_secs(30, 29.97).unwrap(), 1.001_001, epsilon = 1e-6);
    }

    #[test]
    fn rate_dependent_conversions_reject_zero_and_negative_rates() {
        assert_eq!(frames_to_secs(10, 0.0), None);
        assert_eq!(frames_to_secs(10, -5.0), None);
        assert_eq!(secs_to_frames(1.0, 0.0), None);
        assert_eq!(nominal_duration_ms(100, 0.0), None);
        assert_eq!(frame_period_ms(f64::NAN), None);
    }

    #[test]
    fn secs_to_frames_rounds_to_nearest() {
        assert_eq!(secs_to_frames(1.0, 10.0), Some(10));
        assert_eq!(secs_to_frames(0.149, 10.0), Some(1));
        assert_eq!(secs_to_frames(0.151, 10.0), Some(2));
        assert_eq!(secs_to_frames(-5.0, 10.0), Some(-50));
    }

    #[test]
    fn clock_timings_match_nominal_rate() {
        assert_eq!(nominal_duration_ms(100, 10.0), Some(10_000));
        assert_eq!(frame_period_ms(10.0), Some(100));
        assert_eq!(frame_period_ms(29.97), Some(33));
    }

    #[test]
    fn frame_period_is_never_zero() {
        assert_eq!(frame_period_ms(5_000.0), Some(1));
    }

    #[test]
    fn clamp_frame_index_bounds_target() {
        assert_eq!(clamp_frame_index(-3, 100), 0);
        assert_eq!(clamp_frame_index(42, 100), 42);
        assert_eq!(clamp_frame_index(100, 100), 100);
        assert_eq!(clamp_frame_index(250, 100), 100);
    }
}
