// SPDX-License-Identifier: MPL-2.0
//! Synthetic in-memory frame source.
//!
//! Produces flat gray frames whose shade encodes the frame index, so the
//! player can be driven without FFmpeg or a file on disk. Seeking can be made
//! coarse (snapping down to a keyframe grid) and reads can be made to fail at
//! a given index, which covers the awkward decoder behaviors.

use super::decoder::{DecodedFrame, FrameSource, ReadOutcome, SourceMetadata, SourceOpener};
use crate::error::{Error, Result, VideoError};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Shade of the pixels in frame `index`.
pub fn shade_for_index(index: u64) -> u8 {
    (index % 256) as u8
}

#[derive(Debug)]
pub struct MemorySource {
    metadata: SourceMetadata,
    cursor: u64,
    keyframe_interval: u64,
    fail_at: Option<u64>,
    released: bool,
    live_handles: Arc<AtomicUsize>,
}

impl MemorySource {
    pub fn new(metadata: SourceMetadata) -> Self {
        Self::with_counter(metadata, Arc::new(AtomicUsize::new(0)))
    }

    fn with_counter(metadata: SourceMetadata, live_handles: Arc<AtomicUsize>) -> Self {
        live_handles.fetch_add(1, Ordering::SeqCst);
        Self {
            metadata,
            cursor: 0,
            keyframe_interval: 1,
            fail_at: None,
            released: false,
            live_handles,
        }
    }

    /// Seeks land on the closest multiple of `interval` at or before the target.
    pub fn with_keyframe_interval(mut self, interval: u64) -> Self {
        self.keyframe_interval = interval.max(1);
        self
    }

    /// Reading the frame at `index` fails with a decoding error.
    pub fn with_failure_at(mut self, index: u64) -> Self {
        self.fail_at = Some(index);
        self
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    fn render(&self, index: u64) -> DecodedFrame {
        let len = self.metadata.width as usize * self.metadata.height as usize * 4;
        DecodedFrame {
            rgba_data: Arc::new(vec![shade_for_index(index); len]),
            width: self.metadata.width,
            height: self.metadata.height,
        }
    }
}

impl FrameSource for MemorySource {
    fn metadata(&self) -> SourceMetadata {
        self.metadata
    }

    fn seek_to_frame(&mut self, frame_index: u64) -> Result<()> {
        if self.released {
            return Err(Error::Video(VideoError::Other("source released".into())));
        }
        let target = frame_index.min(self.metadata.frame_count);
        self.cursor = target - target % self.keyframe_interval;
        Ok(())
    }

    fn position(&self) -> u64 {
        self.cursor
    }

    fn read_next_frame(&mut self) -> Result<ReadOutcome> {
        if self.released {
            return Err(Error::Video(VideoError::Other("source released".into())));
        }
        if self.cursor >= self.metadata.frame_count {
            return Ok(ReadOutcome::EndOfStream);
        }
        if self.fail_at == Some(self.cursor) {
            return Err(Error::Video(VideoError::DecodingFailed(format!(
                "corrupt packet at frame {}",
                self.cursor
            ))));
        }
        let frame = self.render(self.cursor);
        self.cursor += 1;
        Ok(ReadOutcome::Frame(frame))
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.live_handles.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

impl Drop for MemorySource {
    fn drop(&mut self) {
        self.release();
    }
}

/// Opens every path as the same synthetic video, except the ones marked missing.
#[derive(Debug, Clone)]
pub struct MemoryOpener {
    metadata: SourceMetadata,
    keyframe_interval: u64,
    fail_at: Option<u64>,
    missing: HashSet<PathBuf>,
    live_handles: Arc<AtomicUsize>,
}

impl MemoryOpener {
    pub fn new(metadata: SourceMetadata) -> Self {
        Self {
            metadata,
            keyframe_interval: 1,
            fail_at: None,
            missing: HashSet::new(),
            live_handles: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_keyframe_interval(mut self, interval: u64) -> Self {
        self.keyframe_interval = interval;
        self
    }

    pub fn with_failure_at(mut self, index: u64) -> Self {
        self.fail_at = Some(index);
        self
    }

    /// Opening `path` will fail as if the file did not exist.
    pub fn with_missing(mut self, path: impl Into<PathBuf>) -> Self {
        self.missing.insert(path.into());
        self
    }

    /// Number of sources opened and not yet released.
    pub fn live_handles(&self) -> usize {
        self.live_handles.load(Ordering::SeqCst)
    }
}

impl SourceOpener for MemoryOpener {
    fn open(&self, path: &Path) -> Result<Box<dyn FrameSource>> {
        if self.missing.contains(path) {
            return Err(Error::Video(VideoError::IoError(format!(
                "No such file or directory: {}",
                path.display()
            ))));
        }
        if !super::time_units::is_valid_frame_rate(self.metadata.frame_rate) {
            return Err(Error::Video(VideoError::InvalidFrameRate(
                self.metadata.frame_rate,
            )));
        }

        let mut source = MemorySource::with_counter(self.metadata, Arc::clone(&self.live_handles))
            .with_keyframe_interval(self.keyframe_interval);
        if let Some(index) = self.fail_at {
            source = source.with_failure_at(index);
        }
        Ok(Box::new(source))
    }
}
