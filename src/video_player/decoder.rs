// SPDX-License-Identifier: MPL-2.0
//! Decoder seam between the playback core and a concrete video backend.
//!
//! The player only ever talks to a [`FrameSource`]: a stateful cursor over
//! frame indices. Seeking is best effort, so callers must re-query
//! [`FrameSource::position`] after a seek instead of trusting the requested
//! index. Sources are created through a [`SourceOpener`], which lets tests
//! swap FFmpeg for a scripted in-memory source.

use crate::error::Result;
use std::path::Path;
use std::sync::Arc;

/// Metadata reported by a source, constant for the lifetime of the handle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceMetadata {
    /// Nominal frames per second.
    pub frame_rate: f64,

    /// Total number of frames in the stream.
    pub frame_count: u64,

    /// Frame width in pixels.
    pub width: u32,

    /// Frame height in pixels.
    pub height: u32,
}

impl SourceMetadata {
    /// Nominal duration in seconds, or 0.0 if the frame rate is unusable.
    pub fn duration_secs(&self) -> f64 {
        super::time_units::frames_to_secs(self.frame_count, self.frame_rate).unwrap_or(0.0)
    }
}

/// A decoded frame ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedFrame {
    /// RGBA pixel data (width × height × 4 bytes).
    pub rgba_data: Arc<Vec<u8>>,

    /// Frame width in pixels.
    pub width: u32,

    /// Frame height in pixels.
    pub height: u32,
}

impl DecodedFrame {
    /// Returns the total size in bytes.
    pub fn size_bytes(&self) -> usize {
        self.rgba_data.len()
    }
}

/// Result of reading one frame from the cursor.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadOutcome {
    /// The frame at the cursor position; the cursor moved forward by one.
    Frame(DecodedFrame),

    /// No frame left at or after the cursor.
    EndOfStream,
}

/// A stateful cursor over the frames of one opened video.
pub trait FrameSource {
    /// Returns the stream metadata.
    fn metadata(&self) -> SourceMetadata;

    /// Moves the cursor as close as the backend can to `frame_index`.
    fn seek_to_frame(&mut self, frame_index: u64) -> Result<()>;

    /// Index of the frame the next [`read_next_frame`](Self::read_next_frame) returns.
    fn position(&self) -> u64;

    /// Decodes the frame at the cursor and advances the cursor by one.
    fn read_next_frame(&mut self) -> Result<ReadOutcome>;

    /// Releases backend resources. Calling it more than once is harmless.
    fn release(&mut self);
}

/// Opens a path into a [`FrameSource`].
pub trait SourceOpener {
    fn open(&self, path: &Path) -> Result<Box<dyn FrameSource>>;
}
