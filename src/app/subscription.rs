// SPDX-License-Identifier: MPL-2.0
//! Timer and keyboard subscriptions.
//!
//! Timers only exist while they have something to do: the playback timer
//! while playing, the zoom timer while a wheel animation runs. Dropping the
//! subscription is what stops the timer.

use super::Message;
use crate::ui::controls;
use iced::keyboard::{self, key::Named, Key};
use iced::{event, time, Subscription};
use std::time::Duration;

/// Periodic frame clock poll, only while playing.
pub fn create_playback_subscription(playing: bool, interval: Duration) -> Subscription<Message> {
    if playing {
        time::every(interval).map(Message::PlaybackTick)
    } else {
        Subscription::none()
    }
}

/// Periodic zoom animation poll, only while an animation runs.
pub fn create_zoom_subscription(animating: bool, interval: Duration) -> Subscription<Message> {
    if animating {
        time::every(interval).map(Message::ZoomTick)
    } else {
        Subscription::none()
    }
}

/// Left/Right step one frame, Space toggles playback.
///
/// Keys already handled by a widget (e.g. a focused text field) are skipped.
pub fn create_keyboard_subscription() -> Subscription<Message> {
    event::listen_with(|event, status, _window| {
        if status == event::Status::Captured {
            return None;
        }
        match event {
            event::Event::Keyboard(keyboard::Event::KeyPressed { key, .. }) => {
                key_message(&key).map(Message::Controls)
            }
            _ => None,
        }
    })
}

fn key_message(key: &Key) -> Option<controls::Message> {
    match key {
        Key::Named(Named::ArrowLeft) => Some(controls::Message::StepBackward),
        Key::Named(Named::ArrowRight) => Some(controls::Message::StepForward),
        Key::Named(Named::Space) => Some(controls::Message::TogglePlayback),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_step_frames() {
        assert_eq!(
            key_message(&Key::Named(Named::ArrowLeft)),
            Some(controls::Message::StepBackward)
        );
        assert_eq!(
            key_message(&Key::Named(Named::ArrowRight)),
            Some(controls::Message::StepForward)
        );
        assert_eq!(key_message(&Key::Named(Named::Escape)), None);
    }
}
