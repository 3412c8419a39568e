// SPDX-License-Identifier: MPL-2.0
//! Transport controls for the review widget.
//!
//! Provides the toolbar under the frame canvas: open, play/pause, frame
//! steps, second jumps, the position fields, the FPS label and the position
//! slider. All of it is enabled or disabled together.

use crate::video_player::{Affordance, VideoPlayer};
use iced::widget::{button, column, row, slider, text, text_input, tooltip, Text};
use iced::{Alignment, Element, Length};

const FIELD_WIDTH: f32 = 90.0;
const SPACING: f32 = 6.0;

/// Messages emitted by control widgets.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    OpenFile,
    TogglePlayback,
    StepBackward,
    StepForward,

    /// Move by this many seconds (negative moves backward).
    Jump(f64),

    /// The slider was dragged or clicked.
    SliderMoved(f64),

    FrameTextChanged(String),
    FrameSubmitted,
    SecondsTextChanged(String),
    SecondsSubmitted,

    /// Free-text copy field edited.
    ScratchTextChanged(String),
}

/// Snapshot of what the controls display.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControlsState {
    pub enabled: bool,
    pub is_playing: bool,
    pub frame_text: String,
    pub seconds_text: String,
    pub timecode_text: String,
    pub scratch_text: String,
    pub end_info: String,
    pub fps_label: String,
    pub slider_value: u64,
    pub slider_max: u64,
    pub jump_steps: Vec<f64>,
}

impl ControlsState {
    pub fn from_player(player: &VideoPlayer, jump_steps: &[f64]) -> Self {
        let display = player.display();
        Self {
            enabled: player.controls_enabled(),
            is_playing: player.state().affordance() == Affordance::Pause,
            frame_text: display.frame_text.clone(),
            seconds_text: display.seconds_text.clone(),
            timecode_text: display.timecode_text.clone(),
            scratch_text: display.scratch_text.clone(),
            end_info: player.end_info().to_string(),
            fps_label: player.fps_label(),
            slider_value: player.control().value(),
            slider_max: player.control().maximum(),
            jump_steps: jump_steps.to_vec(),
        }
    }
}

/// Button label for a jump of `secs` seconds, e.g. `+5s` or `-1s`.
pub fn jump_label(secs: f64) -> String {
    if secs > 0.0 {
        format!("+{secs}s")
    } else {
        format!("{secs}s")
    }
}

fn with_tooltip<'a>(content: impl Into<Element<'a, Message>>, tip: &'a str) -> Element<'a, Message> {
    tooltip(content, Text::new(tip), tooltip::Position::Top)
        .gap(4)
        .into()
}

/// Renders the controls.
pub fn view(state: &ControlsState) -> Element<'_, Message> {
    let enabled = state.enabled;
    let when_enabled = |message: Message| enabled.then_some(message);

    let open_button = button(text("Open")).on_press(Message::OpenFile);

    let play_label = if state.is_playing { "Pause" } else { "Play" };
    let play_button = with_tooltip(
        button(text(play_label))
            .on_press_maybe(when_enabled(Message::TogglePlayback))
            .width(Length::Fixed(70.0)),
        if state.is_playing { "Pause playback" } else { "Start playback" },
    );

    let step_back = with_tooltip(
        button(text("≪")).on_press_maybe(when_enabled(Message::StepBackward)),
        "Previous frame",
    );
    let step_forward = with_tooltip(
        button(text("≫")).on_press_maybe(when_enabled(Message::StepForward)),
        "Next frame",
    );

    let mut transport = row![open_button, play_button, step_back, step_forward]
        .spacing(SPACING)
        .align_y(Alignment::Center);
    for &secs in &state.jump_steps {
        transport = transport
            .push(button(text(jump_label(secs))).on_press_maybe(when_enabled(Message::Jump(secs))));
    }

    let mut frame_field = text_input("frame", &state.frame_text).width(Length::Fixed(FIELD_WIDTH));
    let mut seconds_field =
        text_input("seconds", &state.seconds_text).width(Length::Fixed(FIELD_WIDTH));
    let mut scratch_field =
        text_input("hh:mm:ss.mmm", &state.scratch_text).width(Length::Fixed(120.0));
    if enabled {
        frame_field = frame_field
            .on_input(Message::FrameTextChanged)
            .on_submit(Message::FrameSubmitted);
        seconds_field = seconds_field
            .on_input(Message::SecondsTextChanged)
            .on_submit(Message::SecondsSubmitted);
        scratch_field = scratch_field.on_input(Message::ScratchTextChanged);
    }

    let fields = row![
        frame_field,
        seconds_field,
        text(&state.timecode_text),
        scratch_field,
        text(&state.end_info),
        iced::widget::Space::new().width(Length::Fill),
        text(&state.fps_label),
    ]
    .spacing(SPACING)
    .align_y(Alignment::Center);

    let position_slider = slider(
        0.0..=state.slider_max as f64,
        state.slider_value as f64,
        Message::SliderMoved,
    )
    .step(1.0)
    .width(Length::Fill);

    column![transport, fields, position_slider]
        .spacing(SPACING)
        .padding(SPACING)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events;
    use crate::video_player::{MemoryOpener, SourceMetadata};
    use std::path::Path;

    #[test]
    fn jump_labels_carry_sign() {
        assert_eq!(jump_label(5.0), "+5s");
        assert_eq!(jump_label(-1.0), "-1s");
        assert_eq!(jump_label(0.5), "+0.5s");
    }

    #[test]
    fn closed_player_disables_everything() {
        let (tx, _rx) = events::channel();
        let player = VideoPlayer::new(
            Box::new(MemoryOpener::new(SourceMetadata {
                frame_rate: 10.0,
                frame_count: 10,
                width: 2,
                height: 2,
            })),
            tx,
        );
        let state = ControlsState::from_player(&player, &[-1.0, 1.0]);
        assert!(!state.enabled);
        assert!(!state.is_playing);
        assert_eq!(state.slider_max, 0);
    }

    #[test]
    fn open_player_fills_fields() {
        let (tx, _rx) = events::channel();
        let mut player = VideoPlayer::new(
            Box::new(MemoryOpener::new(SourceMetadata {
                frame_rate: 10.0,
                frame_count: 100,
                width: 2,
                height: 2,
            })),
            tx,
        );
        player.set_video_file(Path::new("clip.mp4")).unwrap();
        player.seek_to_frame(12);

        let state = ControlsState::from_player(&player, &[-5.0, 5.0]);
        assert!(state.enabled);
        assert_eq!(state.frame_text, "12");
        assert_eq!(state.seconds_text, "1.200");
        assert_eq!(state.timecode_text, "00:00:01.200");
        assert_eq!(state.end_info, "100 frame; 10.000s");
        assert_eq!(state.slider_value, 12);
        assert_eq!(state.slider_max, 100);
        assert_eq!(state.fps_label, "FPS: 0");
    }

    #[test]
    fn view_renders() {
        let state = ControlsState {
            jump_steps: vec![-5.0, -1.0, 1.0, 5.0],
            ..ControlsState::default()
        };
        let _element = view(&state);
    }
}
