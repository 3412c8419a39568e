// SPDX-License-Identifier: MPL-2.0
//! Authoritative playback position and the text derived from it.
//!
//! A [`Position`] is only ever built from a frame index the decoder actually
//! reported, and elapsed seconds are always derived from it. The derived
//! strings live in [`PositionDisplay`] next to the user-owned scratch field.

use super::time_units;

/// Frame index with its derived elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    frame_index: u64,
    elapsed_secs: f64,
}

impl Position {
    /// Builds a position from a decoder-reported index.
    ///
    /// Returns `None` when the frame rate cannot be divided by, so no
    /// position update happens without a usable source.
    pub fn from_frame(frame_index: u64, frame_rate: f64) -> Option<Self> {
        time_units::frames_to_secs(frame_index, frame_rate).map(|elapsed_secs| Self {
            frame_index,
            elapsed_secs,
        })
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_secs
    }
}

/// Formats seconds with millisecond precision (`12.345`).
pub fn format_seconds(secs: f64) -> String {
    format!("{secs:.3}")
}

/// Formats seconds as `HH:MM:SS.mmm`.
///
/// Works on the rounded millisecond count so that 59.9996 s carries into the
/// next minute instead of printing `60.000` seconds. Hours are not bounded.
///
/// # Examples
///
/// ```
/// use iced_review::video_player::position::format_timecode;
///
/// assert_eq!(format_timecode(0.1), "00:00:00.100");
/// assert_eq!(format_timecode(3725.5), "01:02:05.500");
/// ```
pub fn format_timecode(secs: f64) -> String {
    let total_ms = (secs.max(0.0) * 1_000.0).round() as u64;
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms / 60_000) % 60;
    let seconds = (total_ms % 60_000) as f64 / 1_000.0;
    format!("{hours:02}:{minutes:02}:{seconds:06.3}")
}

/// Formats the end-of-video summary shown after opening a file.
pub fn format_end_info(frame_count: u64, duration_secs: f64) -> String {
    format!("{frame_count} frame; {duration_secs:.3}s")
}

/// Text shown in the position fields.
///
/// `frame_text`, `seconds_text` and `timecode_text` are rewritten on every
/// position change. `scratch_text` belongs to the user and is never derived.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionDisplay {
    pub frame_text: String,
    pub seconds_text: String,
    pub timecode_text: String,
    pub scratch_text: String,
}

impl PositionDisplay {
    /// Rewrites the derived fields from `position`.
    pub fn refresh(&mut self, position: &Position) {
        self.frame_text = position.frame_index().to_string();
        self.seconds_text = format_seconds(position.elapsed_secs());
        self.timecode_text = format_timecode(position.elapsed_secs());
    }

    /// Clears the derived fields, keeping the scratch text.
    pub fn clear_derived(&mut self) {
        self.frame_text.clear();
        self.seconds_text.clear();
        self.timecode_text.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{assert_abs_diff_eq, F64_EPSILON};

    #[test]
    fn position_derives_elapsed_seconds() {
        let position = Position::from_frame(25, 10.0).unwrap();
        assert_eq!(position.frame_index(), 25);
        assert_abs_diff_eq!(position.elapsed_secs(), 2.5, epsilon = F64_EPSILON);
    }

    #[test]
    fn position_requires_positive_rate() {
        assert!(Position::from_frame(25, 0.0).is_none());
        assert!(Position::from_frame(25, -1.0).is_none());
    }

    #[test]
    fn every_index_maps_to_index_over_rate() {
        for rate in [10.0, 24.0, 29.97, 60.0] {
            for index in [0_u64, 1, 7, 100, 1_799] {
                let position = Position::from_frame(index, rate).unwrap();
                assert_abs_diff_eq!(
                    position.elapsed_secs(),
                    index as f64 / rate,
                    epsilon = F64_EPSILON
                );
            }
        }
    }

    #[test]
    fn seconds_use_three_decimals() {
        assert_eq!(format_seconds(0.1), "0.100");
        assert_eq!(format_seconds(12.3456), "12.346");
    }

    #[test]
    fn timecode_pads_fields() {
        assert_eq!(format_timecode(0.0), "00:00:00.000");
        assert_eq!(format_timecode(0.1), "00:00:00.100");
        assert_eq!(format_timecode(61.25), "00:01:01.250");
    }

    #[test]
    fn timecode_carries_rounded_milliseconds() {
        assert_eq!(format_timecode(59.9996), "00:01:00.000");
        assert_eq!(format_timecode(3599.9999), "01:00:00.000");
        assert_eq!(format_timecode(3600.0), "01:00:00.000");
    }

    #[test]
    fn timecode_hours_are_unbounded() {
        assert_eq!(format_timecode(100.0 * 3600.0 + 1.0), "100:00:01.000");
    }

    #[test]
    fn end_info_matches_open_summary() {
        assert_eq!(format_end_info(100, 10.0), "100 frame; 10.000s");
    }

    #[test]
    fn refresh_leaves_scratch_text_alone() {
        let mut display = PositionDisplay {
            scratch_text: "keep me".into(),
            ..PositionDisplay::default()
        };
        display.refresh(&Position::from_frame(1, 10.0).unwrap());

        assert_eq!(display.frame_text, "1");
        assert_eq!(display.seconds_text, "0.100");
        assert_eq!(display.timecode_text, "00:00:00.100");
        assert_eq!(display.scratch_text, "keep me");

        display.clear_derived();
        assert!(display.frame_text.is_empty());
        assert_eq!(display.scratch_text, "keep me");
    }
}
