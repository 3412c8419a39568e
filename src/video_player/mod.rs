// SPDX-License-Identifier: MPL-2.0
//! Video playback engine for the review widget.
//!
//! This module holds the playback core: a frame-indexed decoder seam with an
//! FFmpeg backend, the frame clock that paces playback, and the state machine
//! that keeps position, slider and text fields consistent.

pub mod decoder;
pub mod ffmpeg_source;
pub mod fps_meter;
pub mod frame_clock;
pub mod input;
pub mod memory_source;
pub mod position;
pub mod position_control;
mod state;
pub mod time_units;

pub use decoder::{DecodedFrame, FrameSource, ReadOutcome, SourceMetadata, SourceOpener};
pub use ffmpeg_source::{FfmpegOpener, FfmpegSource};
pub use fps_meter::FpsMeter;
pub use frame_clock::{ClockEvent, ClockState, FrameClock};
pub use memory_source::{MemoryOpener, MemorySource};
pub use position::{Position, PositionDisplay};
pub use position_control::{PositionControl, SeekRequest};
pub use state::{Affordance, PlaybackState, VideoPlayer};

use crate::events::EventSender;

/// Creates a player backed by FFmpeg.
pub fn create_player(events: EventSender) -> VideoPlayer {
    VideoPlayer::new(Box::new(FfmpegOpener), events)
}
