// SPDX-License-Identifier: MPL-2.0
//! Standalone host for the review widget.
//!
//! The `App` struct owns the player, the canvas state and the receiving end of
//! the player's event channel. After every update it refreshes the cached
//! frame image and control snapshot, then drains the outbound events into
//! the log and the status line.

mod message;
pub mod paths;
mod subscription;

pub use message::{Flags, Message};

use crate::config::Config;
use crate::events::{self, EventReceiver, EventSender, PlayerEvent};
use crate::ui::controls::{self, ControlsState};
use crate::ui::frame_canvas::{CanvasMessage, FrameCanvas, FrameImage};
use crate::ui::selection::{DragMode, SelectionGesture, SelectionRect};
use crate::ui::viewport::Viewport;
use crate::video_player::{self, SourceOpener, VideoPlayer};
use iced::widget::{canvas, column, container, text};
use iced::{window, Element, Length, Subscription, Task, Theme};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;

const APP_TITLE: &str = "Iced Review";

pub const WINDOW_DEFAULT_WIDTH: u32 = 960;
pub const WINDOW_DEFAULT_HEIGHT: u32 = 720;
pub const MIN_WINDOW_WIDTH: u32 = 640;
pub const MIN_WINDOW_HEIGHT: u32 = 480;

/// File extensions offered by the open dialog.
const VIDEO_EXTENSIONS: [&str; 8] = ["mp4", "avi", "mov", "mkv", "webm", "m4v", "wmv", "mpg"];

/// Root Iced application state.
pub struct App {
    player: VideoPlayer,
    events_tx: EventSender,
    events_rx: EventReceiver,
    frame_image: FrameImage,
    controls: ControlsState,
    viewport: Viewport,
    selection: SelectionGesture,
    jump_steps: Vec<f64>,
    current_path: Option<PathBuf>,
    last_selection: Option<SelectionRect>,
    /// Last error or warning shown under the controls.
    status: Option<String>,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("player", &self.player)
            .field("current_path", &self.current_path)
            .field("status", &self.status)
            .finish()
    }
}

/// Builds the window settings.
pub fn window_settings() -> window::Settings {
    window::Settings {
        size: iced::Size::new(WINDOW_DEFAULT_WIDTH as f32, WINDOW_DEFAULT_HEIGHT as f32),
        min_size: Some(iced::Size::new(
            MIN_WINDOW_WIDTH as f32,
            MIN_WINDOW_HEIGHT as f32,
        )),
        ..window::Settings::default()
    }
}

/// Entry point used by `main.rs` to launch the Iced application loop.
pub fn run(flags: Flags, config: Config) -> iced::Result {
    use std::cell::RefCell;

    // iced calls boot through `Fn`, flags are consumed on the first call
    let boot_state = RefCell::new(Some((flags, config)));
    let boot = move || {
        let (flags, config) = boot_state.borrow_mut().take().unwrap_or_default();
        App::new(flags, config)
    };

    iced::application(boot, App::update, App::view)
        .title(App::title)
        .theme(App::theme)
        .window(window_settings())
        .subscription(App::subscription)
        .run()
}

impl App {
    /// Creates the app with an FFmpeg-backed player, preloading `flags.file_path`.
    fn new(flags: Flags, config: Config) -> (Self, Task<Message>) {
        let (events_tx, events_rx) = events::channel();
        let player = video_player::create_player(events_tx.clone());
        let mut app = Self::with_player(&config, player, events_tx, events_rx);

        if let Some(path) = flags.file_path {
            app.open_file(Path::new(&path));
        }
        (app, Task::none())
    }

    /// Creates the app around an opener, for hosts that decode elsewhere.
    pub fn with_opener(config: &Config, opener: Box<dyn SourceOpener>) -> Self {
        let (events_tx, events_rx) = events::channel();
        let player = VideoPlayer::new(opener, events_tx.clone());
        Self::with_player(config, player, events_tx, events_rx)
    }

    fn with_player(
        config: &Config,
        player: VideoPlayer,
        events_tx: EventSender,
        events_rx: EventReceiver,
    ) -> Self {
        let jump_steps = config.jump_steps();
        let controls = ControlsState::from_player(&player, &jump_steps);
        Self {
            player,
            events_tx,
            events_rx,
            frame_image: FrameImage::new(),
            controls,
            viewport: Viewport::new(
                config.initial_zoom(),
                config.zoom_animation(),
                config.zoom_update_interval(),
            ),
            selection: SelectionGesture::new(),
            jump_steps,
            current_path: None,
            last_selection: None,
            status: None,
        }
    }

    pub fn player(&self) -> &VideoPlayer {
        &self.player
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn last_selection(&self) -> Option<SelectionRect> {
        self.last_selection
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    fn title(&self) -> String {
        let file_name = self
            .current_path
            .as_ref()
            .and_then(|path| path.file_name())
            .and_then(|name| name.to_str());
        match file_name {
            Some(name) => format!("{name} - {APP_TITLE}"),
            None => APP_TITLE.to_string(),
        }
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }

    fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            subscription::create_playback_subscription(
                self.player.state().is_playing(),
                self.player.clock().update_interval(),
            ),
            subscription::create_zoom_subscription(
                self.viewport.is_animating(),
                self.viewport.update_interval(),
            ),
            subscription::create_keyboard_subscription(),
        ])
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        let task = match message {
            Message::Controls(message) => self.handle_controls(message),
            Message::Canvas(message) => {
                self.handle_canvas(message);
                Task::none()
            }
            Message::PlaybackTick(now) => {
                self.player.on_timer(now);
                Task::none()
            }
            Message::ZoomTick(now) => {
                self.viewport.poll(now);
                Task::none()
            }
            Message::FileDialogClosed(Some(path)) => {
                self.open_file(&path);
                Task::none()
            }
            Message::FileDialogClosed(None) => Task::none(),
        };

        self.refresh();
        task
    }

    fn handle_controls(&mut self, message: controls::Message) -> Task<Message> {
        match message {
            controls::Message::OpenFile => {
                return Task::perform(pick_video_file(), Message::FileDialogClosed);
            }
            controls::Message::TogglePlayback => self.player.toggle_playback(Instant::now()),
            controls::Message::StepBackward => self.player.step_backward(),
            controls::Message::StepForward => self.player.step_forward(),
            controls::Message::Jump(secs) => self.player.jump_seconds(secs),
            controls::Message::SliderMoved(value) => {
                self.player.slider_moved(value.max(0.0).round() as u64)
            }
            controls::Message::FrameTextChanged(text) => self.player.edit_frame_text(text),
            controls::Message::SecondsTextChanged(text) => self.player.edit_seconds_text(text),
            controls::Message::ScratchTextChanged(text) => self.player.set_scratch_text(text),
            controls::Message::FrameSubmitted => {
                if let Err(err) = self.player.submit_frame_text() {
                    self.status = Some(err.to_string());
                }
            }
            controls::Message::SecondsSubmitted => {
                if let Err(err) = self.player.submit_seconds_text() {
                    self.status = Some(err.to_string());
                }
            }
        }
        Task::none()
    }

    fn handle_canvas(&mut self, message: CanvasMessage) {
        match message {
            CanvasMessage::Pressed { button, point } => self.selection.press(button, point),
            CanvasMessage::Moved { point, delta } => match self.selection.mode() {
                DragMode::Pan => self.viewport.pan_by(delta),
                DragMode::RubberBand => self.selection.drag_to(point),
                DragMode::None => {}
            },
            CanvasMessage::Released { button, point } => {
                if let Some(rect) = self.selection.release(button, point) {
                    self.events_tx.send(PlayerEvent::AreaSelected(rect));
                }
            }
            CanvasMessage::Wheel { steps } => self.viewport.wheel(steps, Instant::now()),
        }
    }

    fn open_file(&mut self, path: &Path) {
        self.selection = SelectionGesture::new();
        match self.player.set_video_file(path) {
            Ok(()) => {
                self.viewport.reset();
                self.current_path = Some(path.to_path_buf());
                self.status = None;
            }
            Err(_) => self.current_path = None,
        }
        self.refresh();
    }

    /// Syncs derived view state and drains player events.
    fn refresh(&mut self) {
        self.frame_image.sync(&self.player);
        self.controls = ControlsState::from_player(&self.player, &self.jump_steps);

        for event in self.events_rx.drain() {
            match event {
                PlayerEvent::ErrorOccurred(message) => {
                    tracing::error!(%message, "player error");
                    self.status = Some(message);
                }
                PlayerEvent::AreaSelected(rect) => {
                    let area = rect.normalized();
                    tracing::info!(
                        x = area.x,
                        y = area.y,
                        width = area.width,
                        height = area.height,
                        "area selected"
                    );
                    self.last_selection = Some(rect);
                }
                PlayerEvent::VideoPositionChanged(secs) => {
                    tracing::trace!(secs, "position changed");
                }
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let frame_canvas = canvas(FrameCanvas {
            image: &self.frame_image,
            viewport: &self.viewport,
            band: self.selection.active_band(),
            panning: self.selection.mode() == DragMode::Pan,
        })
        .width(Length::Fill)
        .height(Length::Fill);

        let status = text(self.status.as_deref().unwrap_or_default()).size(13);

        column![
            container(frame_canvas).width(Length::Fill).height(Length::Fill),
            controls::view(&self.controls).map(Message::Controls),
            container(status).padding([2, 8]),
        ]
        .into()
    }
}

async fn pick_video_file() -> Option<PathBuf> {
    rfd::AsyncFileDialog::new()
        .set_title("Open video")
        .add_filter("Video", &VIDEO_EXTENSIONS)
        .pick_file()
        .await
        .map(|handle| handle.path().to_path_buf())
}
