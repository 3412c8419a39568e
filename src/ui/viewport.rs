// SPDX-License-Identifier: MPL-2.0
//! Pan and animated wheel zoom for the frame canvas.
//!
//! The frame is drawn centered in the canvas, scaled by `scale` and shifted by
//! `offset` (widget pixels). Zooming happens around the canvas center.
//!
//! Every wheel notch starts its own short animation. While any animation is
//! running, each of its fires multiplies the scale by
//! `1 + scheduled_steps / 300`, so fast scrolling accelerates the zoom and a
//! direction change takes over at once.

use iced::{Point, Size, Vector};
use std::time::{Duration, Instant};

/// Smallest allowed scale factor.
pub const MIN_SCALE: f32 = 0.05;

/// Largest allowed scale factor.
pub const MAX_SCALE: f32 = 20.0;

/// Divisor turning scheduled steps into a per-fire zoom factor.
const STEP_DIVISOR: f32 = 300.0;

/// Wheel angle in eighths of a degree per notch, as reported by most mice.
const EIGHTHS_PER_DEGREE: f32 = 8.0;
const DEGREES_PER_STEP: f32 = 15.0;

/// Pixels of touchpad scrolling treated as one wheel notch.
pub const PIXELS_PER_STEP: f32 = 40.0;

/// Converts a wheel angle delta (eighths of a degree) into zoom steps.
pub fn steps_from_angle(angle_delta_y: f32) -> f32 {
    angle_delta_y / EIGHTHS_PER_DEGREE / DEGREES_PER_STEP
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ZoomAnimation {
    ends_at: Instant,
    next_fire: Instant,
}

#[derive(Debug, Clone)]
pub struct Viewport {
    scale: f32,
    offset: Vector,
    initial_zoom: f32,
    scheduled_steps: f32,
    animations: Vec<ZoomAnimation>,
    animation_duration: Duration,
    update_interval: Duration,
}

impl Viewport {
    pub fn new(initial_zoom: f32, animation_duration: Duration, update_interval: Duration) -> Self {
        let initial_zoom = initial_zoom.clamp(MIN_SCALE, MAX_SCALE);
        Self {
            scale: initial_zoom,
            offset: Vector::new(0.0, 0.0),
            initial_zoom,
            scheduled_steps: 0.0,
            animations: Vec::new(),
            animation_duration,
            update_interval: update_interval.max(Duration::from_millis(1)),
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn offset(&self) -> Vector {
        self.offset
    }

    pub fn scheduled_steps(&self) -> f32 {
        self.scheduled_steps
    }

    pub fn update_interval(&self) -> Duration {
        self.update_interval
    }

    pub fn is_animating(&self) -> bool {
        !self.animations.is_empty()
    }

    /// Back to the initial zoom, centered, with no animation running.
    pub fn reset(&mut self) {
        self.scale = self.initial_zoom;
        self.offset = Vector::new(0.0, 0.0);
        self.scheduled_steps = 0.0;
        self.animations.clear();
    }

    /// Top-left corner of the drawn content, in widget coordinates.
    pub fn content_origin(&self, bounds: Size, content: Size) -> Point {
        Point::new(
            (bounds.width - content.width * self.scale) / 2.0 + self.offset.x,
            (bounds.height - content.height * self.scale) / 2.0 + self.offset.y,
        )
    }

    /// Maps a widget point to content (frame pixel) coordinates.
    pub fn widget_to_content(&self, point: Point, bounds: Size, content: Size) -> Point {
        let origin = self.content_origin(bounds, content);
        Point::new(
            (point.x - origin.x) / self.scale,
            (point.y - origin.y) / self.scale,
        )
    }

    /// Maps a content point back to widget coordinates.
    pub fn content_to_widget(&self, point: Point, bounds: Size, content: Size) -> Point {
        let origin = self.content_origin(bounds, content);
        Point::new(
            origin.x + point.x * self.scale,
            origin.y + point.y * self.scale,
        )
    }

    /// Moves the content with the pointer.
    pub fn pan_by(&mut self, delta: Vector) {
        self.offset = self.offset + delta;
    }

    /// Schedules zoom steps from one wheel event and starts its animation.
    pub fn wheel(&mut self, steps: f32, now: Instant) {
        if steps == 0.0 || !steps.is_finite() {
            return;
        }

        self.scheduled_steps += steps;
        if self.scheduled_steps * steps < 0.0 {
            self.scheduled_steps = steps;
        }

        self.animations.push(ZoomAnimation {
            ends_at: now + self.animation_duration,
            next_fire: now + self.update_interval,
        });
    }

    /// Advances running animations. Returns true if the scale changed.
    ///
    /// Each due animation fires once per poll; late polls do not catch up.
    pub fn poll(&mut self, now: Instant) -> bool {
        let mut changed = false;
        let mut finished = 0;

        for anim in &mut self.animations {
            if now >= anim.next_fire {
                anim.next_fire = now + self.update_interval;
                let factor = 1.0 + self.scheduled_steps / STEP_DIVISOR;
                changed |= apply_zoom(&mut self.scale, &mut self.offset, factor);
            }
            if now >= anim.ends_at {
                finished += 1;
            }
        }

        self.animations.retain(|anim| now < anim.ends_at);
        for _ in 0..finished {
            self.scheduled_steps = step_toward_zero(self.scheduled_steps);
        }

        changed
    }
}

/// Scales around the canvas center. Returns false if the clamp swallowed it.
fn apply_zoom(scale: &mut f32, offset: &mut Vector, factor: f32) -> bool {
    let next = (*scale * factor).clamp(MIN_SCALE, MAX_SCALE);
    if next == *scale {
        return false;
    }
    let applied = next / *scale;
    *offset = *offset * applied;
    *scale = next;
    true
}

fn step_toward_zero(steps: f32) -> f32 {
    if steps > 0.0 {
        (steps - 1.0).max(0.0)
    } else {
        (steps + 1.0).min(0.0)
    }
}
