// SPDX-License-Identifier: MPL-2.0
//! Playback state machine for the review widget.
//!
//! [`VideoPlayer`] owns the open source, the frame clock, the position and
//! its displays, the slider model, the FPS meter and the cached frame, and is
//! the only thing that changes any of them. Every operation runs to
//! completion before returning:
//! - Stopped: nothing is advancing, the last shown frame stays up
//! - Playing: the frame clock drives one sequential read per tick
//! - Paused: the clock keeps its elapsed time until resumed
//!
//! Seeks (slider, steps, jumps, typed positions) are accepted in every state
//! and never touch the clock. With no source open every operation is a no-op.

use super::decoder::{DecodedFrame, FrameSource, ReadOutcome, SourceMetadata, SourceOpener};
use super::fps_meter::FpsMeter;
use super::frame_clock::{ClockEvent, FrameClock};
use super::input;
use super::position::{format_end_info, Position, PositionDisplay};
use super::position_control::{PositionControl, SeekRequest};
use super::time_units;
use crate::error::{Error, Result, VideoError};
use crate::events::{EventSender, PlayerEvent};
use std::path::Path;
use std::time::Instant;

/// Playback state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// Initial state, and where playback lands after the end of the video.
    #[default]
    Stopped,

    /// The frame clock is running.
    Playing,

    /// The frame clock is frozen at its elapsed time.
    Paused,
}

/// What the play/pause button offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affordance {
    Play,
    Pause,
}

impl PlaybackState {
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing)
    }

    pub fn is_paused(&self) -> bool {
        matches!(self, Self::Paused)
    }

    /// The action the toggle button performs from this state.
    pub fn affordance(&self) -> Affordance {
        match self {
            Self::Playing => Affordance::Pause,
            Self::Stopped | Self::Paused => Affordance::Play,
        }
    }
}

/// Video player that manages playback state and frame delivery.
pub struct VideoPlayer {
    opener: Box<dyn SourceOpener>,
    source: Option<Box<dyn FrameSource>>,
    metadata: Option<SourceMetadata>,
    state: PlaybackState,
    clock: FrameClock,
    position: Position,
    display: PositionDisplay,
    control: PositionControl,
    fps: FpsMeter,

    /// The one frame kept for display and re-rendering on pan or zoom.
    current_frame: Option<DecodedFrame>,

    /// Bumped every time `current_frame` is replaced or cleared.
    frame_generation: u64,

    controls_enabled: bool,
    end_info: String,
    events: EventSender,
}

impl std::fmt::Debug for VideoPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoPlayer")
            .field("metadata", &self.metadata)
            .field("state", &self.state)
            .field("position", &self.position)
            .field("controls_enabled", &self.controls_enabled)
            .finish_non_exhaustive()
    }
}

impl VideoPlayer {
    /// Creates a player with no source open and every control disabled.
    pub fn new(opener: Box<dyn SourceOpener>, events: EventSender) -> Self {
        Self {
            opener,
            source: None,
            metadata: None,
            state: PlaybackState::Stopped,
            clock: FrameClock::new(),
            position: Position::default(),
            display: PositionDisplay::default(),
            control: PositionControl::new(),
            fps: FpsMeter::new(),
            current_frame: None,
            frame_generation: 0,
            controls_enabled: false,
            end_info: String::new(),
            events,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn metadata(&self) -> Option<SourceMetadata> {
        self.metadata
    }

    pub fn is_open(&self) -> bool {
        self.source.is_some()
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn display(&self) -> &PositionDisplay {
        &self.display
    }

    pub fn control(&self) -> &PositionControl {
        &self.control
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn fps_meter(&self) -> &FpsMeter {
        &self.fps
    }

    pub fn fps_label(&self) -> String {
        self.fps.label()
    }

    pub fn current_frame(&self) -> Option<&DecodedFrame> {
        self.current_frame.as_ref()
    }

    pub fn frame_generation(&self) -> u64 {
        self.frame_generation
    }

    pub fn controls_enabled(&self) -> bool {
        self.controls_enabled
    }

    pub fn end_info(&self) -> &str {
        &self.end_info
    }

    /// Opens `path`, replacing whatever was open, and shows its first frame.
    ///
    /// On failure every control is disabled and an
    /// [`PlayerEvent::ErrorOccurred`] naming the path is published.
    pub fn set_video_file(&mut self, path: &Path) -> Result<()> {
        self.close();

        let source = match self.opener.open(path) {
            Ok(source) => source,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "failed to open video");
                self.events.send(PlayerEvent::ErrorOccurred(format!(
                    "can't open error: {}",
                    path.display()
                )));
                return Err(err);
            }
        };

        let metadata = source.metadata();
        if !time_units::is_valid_frame_rate(metadata.frame_rate) {
            let mut source = source;
            source.release();
            self.events.send(PlayerEvent::ErrorOccurred(format!(
                "can't open error: {}",
                path.display()
            )));
            return Err(Error::Video(VideoError::InvalidFrameRate(metadata.frame_rate)));
        }

        tracing::debug!(
            path = %path.display(),
            frame_rate = metadata.frame_rate,
            frame_count = metadata.frame_count,
            width = metadata.width,
            height = metadata.height,
            "opened video"
        );

        self.source = Some(source);
        self.metadata = Some(metadata);
        self.end_info = format_end_info(metadata.frame_count, metadata.duration_secs());
        self.control.set_range(metadata.frame_count);
        self.control.set_value_silently(0);
        self.clock.configure(metadata.frame_count, metadata.frame_rate);
        self.set_controls_enabled(true);

        self.position = Position::default();
        self.advance_sequentially(None);
        Ok(())
    }

    /// Stops playback and releases the open source, if any.
    pub fn close(&mut self) {
        self.clock.stop();
        if let Some(mut source) = self.source.take() {
            source.release();
        }
        self.metadata = None;
        self.state = PlaybackState::Stopped;
        self.position = Position::default();
        self.display.clear_derived();
        self.control.set_range(0);
        self.fps.reset();
        self.end_info.clear();
        self.replace_frame(None);
        self.set_controls_enabled(false);
    }

    /// The play/pause button.
    pub fn toggle_playback(&mut self, now: Instant) {
        let Some(metadata) = self.metadata else {
            return;
        };

        match self.state {
            PlaybackState::Stopped => {
                let at_end = self
                    .source
                    .as_ref()
                    .is_some_and(|source| source.position() >= metadata.frame_count);
                if at_end {
                    self.seek_to_frame(0);
                }
                self.fps.reset();
                self.clock.start(now);
                self.transition(PlaybackState::Playing);
            }
            PlaybackState::Playing => {
                self.clock.pause(now);
                self.transition(PlaybackState::Paused);
            }
            PlaybackState::Paused => {
                self.fps.reset();
                self.clock.resume(now);
                self.transition(PlaybackState::Playing);
            }
        }
    }

    /// Polls the frame clock. Called from the periodic timer while playing.
    ///
    /// Ticks that arrive after a pause or stop are ignored.
    pub fn on_timer(&mut self, now: Instant) {
        if !self.state.is_playing() {
            return;
        }

        match self.clock.poll(now) {
            None => {}
            Some(ClockEvent::Finished) => self.finish_playback(),
            Some(ClockEvent::Tick) => {
                // The cursor sits one past the frame on screen
                if let Some(cursor) = self.source.as_ref().map(|source| source.position()) {
                    if cursor != self.control.value() + 1 {
                        tracing::warn!(
                            cursor,
                            slider = self.control.value(),
                            "decoder cursor and slider disagree before tick"
                        );
                    }
                }
                self.advance_sequentially(Some(now));
            }
        }
    }

    /// Shows the next frame without seeking.
    pub fn step_forward(&mut self) {
        if self.source.is_none() {
            return;
        }
        self.advance_sequentially(Some(Instant::now()));
    }

    /// Shows the frame before the current one.
    pub fn step_backward(&mut self) {
        if self.source.is_none() {
            return;
        }
        let target = self.position.frame_index() as i64 - 1;
        self.seek_to_frame(target);
    }

    /// Moves by `secs` seconds relative to the slider position.
    pub fn jump_seconds(&mut self, secs: f64) {
        let Some(metadata) = self.metadata else {
            return;
        };
        let Some(delta) = time_units::secs_to_frames(secs, metadata.frame_rate) else {
            return;
        };
        self.seek_to_frame(self.control.value() as i64 + delta);
    }

    /// The user dragged or clicked the slider.
    pub fn slider_moved(&mut self, value: u64) {
        if let Some(SeekRequest(target)) = self.control.user_moved(value) {
            self.seek_to_frame(target as i64);
        }
    }

    /// Seeks to `target`, clamped to `[0, frame_count]`, and shows that frame.
    ///
    /// The decoder's reported cursor wins over the requested index.
    pub fn seek_to_frame(&mut self, target: i64) {
        let Some(metadata) = self.metadata else {
            return;
        };
        let Some(source) = self.source.as_mut() else {
            return;
        };

        let requested = time_units::clamp_frame_index(target, metadata.frame_count);
        if let Err(err) = source.seek_to_frame(requested) {
            self.fail_decode(err);
            return;
        }

        let actual = source.position();
        if actual != requested {
            tracing::warn!(requested, actual, "seek landed on a different frame");
        }

        match source.read_next_frame() {
            Ok(ReadOutcome::Frame(frame)) => {
                self.replace_frame(Some(frame));
                self.publish_position(actual);
                self.sample_fps(Instant::now());
            }
            Ok(ReadOutcome::EndOfStream) => {
                self.replace_frame(None);
                self.publish_position(metadata.frame_count);
            }
            Err(err) => self.fail_decode(err),
        }
    }

    /// Replaces the frame field text if it passes the keystroke filter.
    pub fn edit_frame_text(&mut self, text: String) {
        if input::accepts_frame_edit(&text) {
            self.display.frame_text = text;
        }
    }

    /// Replaces the seconds field text if it passes the keystroke filter.
    pub fn edit_seconds_text(&mut self, text: String) {
        if input::accepts_seconds_edit(&text) {
            self.display.seconds_text = text;
        }
    }

    /// Free-text copy field. Never parsed.
    pub fn set_scratch_text(&mut self, text: String) {
        self.display.scratch_text = text;
    }

    /// Seeks to the frame typed into the frame field.
    ///
    /// Malformed text is rejected and the field shows the current position again.
    pub fn submit_frame_text(&mut self) -> Result<()> {
        if self.source.is_none() {
            return Ok(());
        }
        match input::parse_frame_input(&self.display.frame_text) {
            Ok(target) => {
                self.seek_to_frame(target);
                Ok(())
            }
            Err(err) => {
                tracing::debug!(error = %err, "rejected frame input");
                self.display.refresh(&self.position);
                Err(err)
            }
        }
    }

    /// Seeks to the time typed into the seconds field.
    pub fn submit_seconds_text(&mut self) -> Result<()> {
        let Some(metadata) = self.metadata else {
            return Ok(());
        };
        let parsed = input::parse_seconds_input(&self.display.seconds_text).and_then(|secs| {
            time_units::secs_to_frames(secs, metadata.frame_rate)
                .ok_or_else(|| Error::InvalidInput(format!("no frame for {secs}s")))
        });

        match parsed {
            Ok(target) => {
                self.seek_to_frame(target);
                Ok(())
            }
            Err(err) => {
                tracing::debug!(error = %err, "rejected seconds input");
                self.display.refresh(&self.position);
                Err(err)
            }
        }
    }

    /// Reads the frame under the cursor and publishes the cursor's index.
    ///
    /// `now` is the display timestamp used for the FPS meter.
    fn advance_sequentially(&mut self, now: Option<Instant>) {
        let Some(metadata) = self.metadata else {
            return;
        };
        let Some(source) = self.source.as_mut() else {
            return;
        };

        let index = source.position();
        match source.read_next_frame() {
            Ok(ReadOutcome::Frame(frame)) => {
                self.replace_frame(Some(frame));
                self.publish_position(index);
                if let Some(now) = now {
                    self.sample_fps(now);
                }
            }
            Ok(ReadOutcome::EndOfStream) if self.state.is_playing() => self.finish_playback(),
            Ok(ReadOutcome::EndOfStream) => {
                self.replace_frame(None);
                self.publish_position(metadata.frame_count);
            }
            Err(err) => self.fail_decode(err),
        }
    }

    fn publish_position(&mut self, frame_index: u64) {
        let Some(metadata) = self.metadata else {
            return;
        };
        let Some(position) = Position::from_frame(frame_index, metadata.frame_rate) else {
            return;
        };

        self.position = position;
        self.control.set_value_silently(frame_index);
        self.display.refresh(&position);
        self.events
            .send(PlayerEvent::VideoPositionChanged(position.elapsed_secs()));
    }

    fn sample_fps(&mut self, now: Instant) {
        if self.state.is_playing() {
            self.fps.sample(now);
        }
    }

    fn replace_frame(&mut self, frame: Option<DecodedFrame>) {
        self.current_frame = frame;
        self.frame_generation = self.frame_generation.wrapping_add(1);
    }

    fn finish_playback(&mut self) {
        self.clock.stop();
        self.transition(PlaybackState::Stopped);
    }

    fn fail_decode(&mut self, err: Error) {
        tracing::error!(error = %err, "decoding failed");
        self.clock.stop();
        self.transition(PlaybackState::Stopped);
        self.events.send(PlayerEvent::ErrorOccurred(err.to_string()));
    }

    fn transition(&mut self, next: PlaybackState) {
        if self.state != next {
            tracing::debug!(from = ?self.state, to = ?next, "playback state changed");
        }
        self.state = next;
    }

    fn set_controls_enabled(&mut self, enabled: bool) {
        self.controls_enabled = enabled;
        self.control.set_enabled(enabled);
    }
}

impl Drop for VideoPlayer {
    fn drop(&mut self) {
        if let Some(mut source) = self.source.take() {
            source.release();
        }
    }
}
