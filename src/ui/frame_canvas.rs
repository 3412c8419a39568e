// SPDX-License-Identifier: MPL-2.0
//! Canvas that renders the current video frame with pan, zoom and the
//! rubber band drawn on top.
//!
//! The canvas does not mutate anything itself: it translates pointer input
//! into [`CanvasMessage`]s carrying content coordinates and leaves the
//! gesture and viewport updates to the application.

use super::selection::{PointerButton, SelectionRect};
use super::viewport::{self, Viewport};
use crate::video_player::{DecodedFrame, VideoPlayer};
use iced::widget::canvas::{self, Frame, Geometry, Path, Stroke};
use iced::widget::{image, Action};
use iced::{mouse, Color, Point, Rectangle, Renderer, Size, Theme, Vector};

const BACKGROUND: Color = Color::from_rgb(0.1, 0.1, 0.1);
const BAND_STROKE: Color = Color::from_rgb(0.2, 0.6, 1.0);
const BAND_FILL: Color = Color::from_rgba(0.2, 0.6, 1.0, 0.15);

/// Pointer input on the canvas, in content coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasMessage {
    Pressed { button: PointerButton, point: Point },
    /// `delta` is the pointer motion in widget pixels, used for panning.
    Moved { point: Point, delta: Vector },
    Released { button: PointerButton, point: Point },
    Wheel { steps: f32 },
}

/// Image handle for the player's cached frame.
///
/// Rebuilt only when the player replaced its frame, so pan and zoom redraw
/// the same handle.
#[derive(Debug, Clone, Default)]
pub struct FrameImage {
    handle: Option<image::Handle>,
    width: u32,
    height: u32,
    generation: Option<u64>,
}

impl FrameImage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Picks up the player's current frame if it changed.
    pub fn sync(&mut self, player: &VideoPlayer) {
        if self.generation == Some(player.frame_generation()) {
            return;
        }
        self.generation = Some(player.frame_generation());
        match player.current_frame() {
            Some(frame) => self.set_frame(frame),
            None => self.handle = None,
        }
    }

    fn set_frame(&mut self, frame: &DecodedFrame) {
        let data = Vec::clone(&frame.rgba_data);
        self.handle = Some(image::Handle::from_rgba(frame.width, frame.height, data));
        self.width = frame.width;
        self.height = frame.height;
    }

    pub fn has_frame(&self) -> bool {
        self.handle.is_some()
    }

    /// Size of the last frame seen, kept after the frame is cleared.
    pub fn content_size(&self) -> Size {
        Size::new(self.width as f32, self.height as f32)
    }
}

/// Canvas program borrowing what it draws from the application.
pub struct FrameCanvas<'a> {
    pub image: &'a FrameImage,
    pub viewport: &'a Viewport,
    pub band: Option<SelectionRect>,
    pub panning: bool,
}

/// Last pointer position seen, for motion deltas.
#[derive(Debug, Default)]
pub struct PointerState {
    last: Option<Point>,
}

impl FrameCanvas<'_> {
    fn local_point(&self, cursor_position: Point, bounds: Rectangle) -> Point {
        Point::new(cursor_position.x - bounds.x, cursor_position.y - bounds.y)
    }

    fn to_content(&self, local: Point, bounds: Rectangle) -> Point {
        self.viewport
            .widget_to_content(local, bounds.size(), self.image.content_size())
    }
}

impl<Message> canvas::Program<Message> for FrameCanvas<'_>
where
    Message: From<CanvasMessage>,
{
    type State = PointerState;

    fn update(
        &self,
        state: &mut Self::State,
        event: &iced::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<Action<Message>> {
        let iced::Event::Mouse(mouse_event) = event else {
            return None;
        };

        let message = match mouse_event {
            mouse::Event::ButtonPressed(button) => {
                let button = PointerButton::from_mouse(*button)?;
                let position = cursor.position_in(bounds)?;
                state.last = Some(position);
                CanvasMessage::Pressed {
                    button,
                    point: self.to_content(position, bounds),
                }
            }
            mouse::Event::CursorMoved { position } => {
                let local = self.local_point(*position, bounds);
                let delta = state
                    .last
                    .map(|last| local - last)
                    .unwrap_or(Vector::new(0.0, 0.0));
                state.last = Some(local);
                CanvasMessage::Moved {
                    point: self.to_content(local, bounds),
                    delta,
                }
            }
            mouse::Event::ButtonReleased(button) => {
                let button = PointerButton::from_mouse(*button)?;
                let local = self.local_point(cursor.position()?, bounds);
                CanvasMessage::Released {
                    button,
                    point: self.to_content(local, bounds),
                }
            }
            mouse::Event::WheelScrolled { delta } => {
                cursor.position_in(bounds)?;
                let steps = match delta {
                    mouse::ScrollDelta::Lines { y, .. } => *y,
                    mouse::ScrollDelta::Pixels { y, .. } => *y / viewport::PIXELS_PER_STEP,
                };
                CanvasMessage::Wheel { steps }
            }
            _ => return None,
        };

        Some(Action::publish(Message::from(message)).and_capture())
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(Point::ORIGIN, bounds.size(), BACKGROUND);

        let content = self.image.content_size();
        if let Some(handle) = &self.image.handle {
            let origin = self.viewport.content_origin(bounds.size(), content);
            let scale = self.viewport.scale();
            frame.draw_image(
                Rectangle::new(
                    origin,
                    Size::new(content.width * scale, content.height * scale),
                ),
                canvas::Image::new(handle.clone()),
            );
        }

        if let Some(band) = self.band {
            let rect = band.normalized();
            let top_left = self
                .viewport
                .content_to_widget(rect.position(), bounds.size(), content);
            let size = Size::new(
                rect.width * self.viewport.scale(),
                rect.height * self.viewport.scale(),
            );
            frame.fill_rectangle(top_left, size, BAND_FILL);
            frame.stroke(
                &Path::rectangle(top_left, size),
                Stroke::default().with_width(1.0).with_color(BAND_STROKE),
            );
        }

        vec![frame.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        _state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if self.panning {
            mouse::Interaction::Grabbing
        } else if cursor.is_over(bounds) {
            mouse::Interaction::Crosshair
        } else {
            mouse::Interaction::default()
        }
    }
}
