// SPDX-License-Identifier: MPL-2.0
//! Widget pieces of the review surface.
//!
//! - [`frame_canvas`] - Canvas drawing the current frame, with pan and zoom
//! - [`viewport`] - Scale, pan offset and the wheel zoom animation
//! - [`selection`] - Rubber band and pan gesture tracking
//! - [`controls`] - Transport buttons, position fields and slider

pub mod controls;
pub mod frame_canvas;
pub mod selection;
pub mod viewport;
