// SPDX-License-Identifier: MPL-2.0
//! Top-level messages and startup flags.

use crate::ui::controls;
use crate::ui::frame_canvas::CanvasMessage;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Clone)]
pub enum Message {
    Controls(controls::Message),
    Canvas(CanvasMessage),
    /// Frame clock timer fired.
    PlaybackTick(Instant),
    /// Zoom animation timer fired.
    ZoomTick(Instant),
    /// The open dialog closed, with the chosen file if any.
    FileDialogClosed(Option<PathBuf>),
}

impl From<CanvasMessage> for Message {
    fn from(message: CanvasMessage) -> Self {
        Message::Canvas(message)
    }
}

impl From<controls::Message> for Message {
    fn from(message: controls::Message) -> Self {
        Message::Controls(message)
    }
}

/// Runtime flags passed in from the CLI to tweak startup behavior.
#[derive(Debug, Default)]
pub struct Flags {
    /// Optional video path to preload on startup.
    pub file_path: Option<String>,
    /// Optional config directory override (for settings.toml).
    /// Takes precedence over `ICED_REVIEW_CONFIG_DIR` environment variable.
    pub config_dir: Option<String>,
}
