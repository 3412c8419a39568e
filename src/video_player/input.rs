// SPDX-License-Identifier: MPL-2.0
//! Validation for the editable position fields.
//!
//! Each field has two checks. The `accepts_*` filters run on every keystroke
//! and only let through text that is valid or can still become valid, like
//! `-` or `12.`. The `parse_*` functions run on submit and return
//! [`Error::InvalidInput`] for anything that must not reach the seek logic.

use crate::error::{Error, Result};

/// Upper bound of the seconds field.
pub const MAX_SECONDS_INPUT: f64 = 1000.0;

/// Decimal places accepted by the seconds field.
pub const SECONDS_DECIMALS: usize = 3;

/// Keystroke filter for the frame field: optional leading `-`, then digits.
pub fn accepts_frame_edit(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    digits.chars().all(|c| c.is_ascii_digit())
}

/// Keystroke filter for the seconds field.
///
/// Digits with at most one `.` and at most three decimals, and an integer
/// part that cannot exceed the field's upper bound.
pub fn accepts_seconds_edit(text: &str) -> bool {
    let (integer, fraction) = match text.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (text, None),
    };

    if !integer.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    if let Some(fraction) = fraction {
        if fraction.len() > SECONDS_DECIMALS || !fraction.chars().all(|c| c.is_ascii_digit()) {
            return false;
        }
    }

    integer
        .parse::<f64>()
        .map(|value| value <= MAX_SECONDS_INPUT)
        .unwrap_or(true)
}

/// Parses a submitted frame number.
pub fn parse_frame_input(text: &str) -> Result<i64> {
    let trimmed = text.trim();
    if trimmed.is_empty() || !accepts_frame_edit(trimmed) {
        return Err(Error::InvalidInput(format!("not a frame number: {trimmed:?}")));
    }
    trimmed
        .parse::<i64>()
        .map_err(|e| Error::InvalidInput(format!("frame number {trimmed:?}: {e}")))
}

/// Parses a submitted seconds value within `[0, 1000]`.
pub fn parse_seconds_input(text: &str) -> Result<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed == "." || !accepts_seconds_edit(trimmed) {
        return Err(Error::InvalidInput(format!("not a seconds value: {trimmed:?}")));
    }
    let value = trimmed
        .parse::<f64>()
        .map_err(|e| Error::InvalidInput(format!("seconds {trimmed:?}: {e}")))?;

    if (0.0..=MAX_SECONDS_INPUT).contains(&value) {
        Ok(value)
    } else {
        Err(Error::InvalidInput(format!(
            "seconds {value} outside 0..={MAX_SECONDS_INPUT}"
        )))
    }
}
