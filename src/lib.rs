// SPDX-License-Identifier: MPL-2.0
//! `iced_review` is a frame-accurate video review widget built with the Iced
//! GUI framework.
//!
//! The crate is split the way the widget is used:
//!
//! - [`video_player`] holds the playback core: the decoder seam, the frame
//!   clock, the authoritative position and the transport operations.
//! - [`ui`] holds the frame canvas (pan, wheel zoom, rubber band selection)
//!   and the transport controls.
//! - [`events`] is the outbound channel a host listens on.
//! - [`app`] is a standalone window hosting the widget.
//!
//! # Examples
//!
//! ```
//! use iced_review::events;
//! use iced_review::video_player::{MemoryOpener, SourceMetadata, VideoPlayer};
//! use std::path::Path;
//!
//! let opener = MemoryOpener::new(SourceMetadata {
//!     frame_rate: 25.0,
//!     frame_count: 250,
//!     width: 320,
//!     height: 240,
//! });
//! let (tx, mut rx) = events::channel();
//! let mut player = VideoPlayer::new(Box::new(opener), tx);
//!
//! player.set_video_file(Path::new("clip.mp4")).unwrap();
//! player.jump_seconds(2.0);
//! assert_eq!(player.position().frame_index(), 50);
//! assert!(!rx.drain().is_empty());
//! ```

pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod ui;
pub mod video_player;

#[cfg(test)]
mod test_utils;
