// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! # Categories
//!
//! - **Playback**: initial zoom and jump buttons
//! - **Display**: wheel zoom animation timing
//! - **Logging**: default log filter

// ==========================================================================
// Playback Defaults
// ==========================================================================

/// Scale applied to the canvas when a video is opened.
pub const DEFAULT_INITIAL_ZOOM: f32 = 0.5;

/// Second jumps offered as buttons, in display order.
pub const DEFAULT_JUMP_STEPS_SECS: [f64; 4] = [-5.0, -1.0, 1.0, 5.0];

/// Largest jump accepted from the config file, in seconds.
pub const MAX_JUMP_STEP_SECS: f64 = 3600.0;

// ==========================================================================
// Display Defaults
// ==========================================================================

/// Length of one wheel zoom animation.
pub const DEFAULT_ZOOM_ANIMATION_MS: u64 = 350;

/// Interval between zoom animation updates.
pub const DEFAULT_ZOOM_UPDATE_INTERVAL_MS: u64 = 20;

/// Bounds for the configurable animation timings.
pub const MIN_ZOOM_TIMING_MS: u64 = 1;
pub const MAX_ZOOM_TIMING_MS: u64 = 5_000;

// ==========================================================================
// Logging Defaults
// ==========================================================================

/// Filter used when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_LOG_LEVEL: &str = "info";
