// SPDX-License-Identifier: MPL-2.0
//! Rubber-band selection and pan gestures on the frame canvas.
//!
//! Points handed to the gesture are already in content (frame pixel)
//! coordinates. The gesture only tracks what the drag is doing and hands back
//! the finished rectangle on release; emitting it is up to the caller.

use iced::{Point, Rectangle, Size};

/// Pointer buttons the canvas distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}

impl PointerButton {
    /// Maps an iced mouse button, ignoring the ones the canvas does not use.
    pub fn from_mouse(button: iced::mouse::Button) -> Option<Self> {
        match button {
            iced::mouse::Button::Left => Some(Self::Primary),
            iced::mouse::Button::Middle => Some(Self::Middle),
            iced::mouse::Button::Right => Some(Self::Secondary),
            _ => None,
        }
    }
}

/// What a drag on the canvas currently does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragMode {
    #[default]
    None,
    RubberBand,
    Pan,
}

/// A selected region in content coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionRect {
    /// Where the drag started.
    pub origin: Point,
    /// Where the drag ended.
    pub corner: Point,
}

impl SelectionRect {
    /// A degenerate rectangle at `point`.
    pub fn at(point: Point) -> Self {
        Self {
            origin: point,
            corner: point,
        }
    }

    /// The normalized rectangle, whichever direction the drag went.
    pub fn normalized(&self) -> Rectangle {
        let x = self.origin.x.min(self.corner.x);
        let y = self.origin.y.min(self.corner.y);
        Rectangle::new(
            Point::new(x, y),
            Size::new(
                (self.origin.x - self.corner.x).abs(),
                (self.origin.y - self.corner.y).abs(),
            ),
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct SelectionGesture {
    mode: DragMode,
    band: Option<SelectionRect>,
}

impl SelectionGesture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> DragMode {
        self.mode
    }

    /// The band being dragged, for drawing.
    pub fn active_band(&self) -> Option<SelectionRect> {
        match self.mode {
            DragMode::RubberBand => self.band,
            _ => None,
        }
    }

    pub fn press(&mut self, button: PointerButton, point: Point) {
        match button {
            PointerButton::Primary => {
                self.mode = DragMode::RubberBand;
                self.band = Some(SelectionRect::at(point));
            }
            PointerButton::Middle => {
                self.mode = DragMode::Pan;
                self.band = None;
            }
            PointerButton::Secondary => {}
        }
    }

    /// Follows the pointer while a rubber band is being dragged.
    pub fn drag_to(&mut self, point: Point) {
        if self.mode == DragMode::RubberBand {
            if let Some(band) = self.band.as_mut() {
                band.corner = point;
            }
        }
    }

    /// Ends the gesture. Returns the rectangle if a primary drag completed.
    pub fn release(&mut self, button: PointerButton, point: Point) -> Option<SelectionRect> {
        let mode = std::mem::take(&mut self.mode);
        let band = self.band.take();

        match (button, mode, band) {
            (PointerButton::Primary, DragMode::RubberBand, Some(mut band)) => {
                band.corner = point;
                Some(band)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_drag_emits_rectangle() {
        let mut gesture = SelectionGesture::new();
        let p1 = Point::new(10.0, 20.0);
        let p2 = Point::new(110.0, 70.0);

        gesture.press(PointerButton::Primary, p1);
        assert_eq!(gesture.mode(), DragMode::RubberBand);

        let rect = gesture.release(PointerButton::Primary, p2);
        assert_eq!(
            rect,
            Some(SelectionRect {
                origin: p1,
                corner: p2
            })
        );
        assert_eq!(gesture.mode(), DragMode::None);
    }

    #[test]
    fn middle_drag_pans_without_rectangle() {
        let mut gesture = SelectionGesture::new();
        gesture.press(PointerButton::Middle, Point::new(5.0, 5.0));
        assert_eq!(gesture.mode(), DragMode::Pan);

        gesture.drag_to(Point::new(50.0, 50.0));
        assert!(gesture.active_band().is_none());

        assert_eq!(gesture.release(PointerButton::Middle, Point::new(50.0, 50.0)), None);
        assert_eq!(gesture.mode(), DragMode::None);
    }

    #[test]
    fn primary_release_after_middle_press_emits_nothing() {
        let mut gesture = SelectionGesture::new();
        gesture.press(PointerButton::Middle, Point::ORIGIN);
        assert_eq!(gesture.release(PointerButton::Primary, Point::new(3.0, 3.0)), None);
        assert_eq!(gesture.mode(), DragMode::None);
    }

    #[test]
    fn release_resets_mode_for_any_button() {
        let mut gesture = SelectionGesture::new();
        gesture.press(PointerButton::Primary, Point::ORIGIN);
        assert_eq!(gesture.release(PointerButton::Secondary, Point::ORIGIN), None);
        assert_eq!(gesture.mode(), DragMode::None);
        assert!(gesture.active_band().is_none());
    }

    #[test]
    fn drag_updates_live_band() {
        let mut gesture = SelectionGesture::new();
        gesture.press(PointerButton::Primary, Point::new(1.0, 1.0));
        gesture.drag_to(Point::new(4.0, 9.0));

        let band = gesture.active_band().unwrap();
        assert_eq!(band.corner, Point::new(4.0, 9.0));
    }

    #[test]
    fn normalized_handles_reverse_drags() {
        let rect = SelectionRect {
            origin: Point::new(30.0, 40.0),
            corner: Point::new(10.0, 15.0),
        };
        let normalized = rect.normalized();
        assert_eq!(normalized.x, 10.0);
        assert_eq!(normalized.y, 15.0);
        assert_eq!(normalized.width, 20.0);
        assert_eq!(normalized.height, 25.0);
    }
}
