// SPDX-License-Identifier: MPL-2.0
//! Model behind the position slider.
//!
//! The slider reports user drags upward as seek requests. Programmatic
//! updates (ticks, steps, completed seeks) go through
//! [`PositionControl::set_value_silently`] so they never echo back as a
//! second seek.

/// A request to move the decoder to a frame, raised by the control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeekRequest(pub u64);

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionControl {
    value: u64,
    maximum: u64,
    enabled: bool,
    notifications_blocked: bool,
}

impl PositionControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn maximum(&self) -> u64 {
        self.maximum
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Sets the upper bound and clamps the current value into `[0, maximum]`.
    pub fn set_range(&mut self, maximum: u64) {
        self.maximum = maximum;
        self.value = self.value.min(maximum);
    }

    /// Assigns a value, notifying when it changed and notifications are on.
    pub fn set_value(&mut self, value: u64) -> Option<SeekRequest> {
        let value = value.min(self.maximum);
        let changed = value != self.value;
        self.value = value;
        (changed && !self.notifications_blocked).then_some(SeekRequest(value))
    }

    /// Assigns a value with notifications blocked for this one assignment.
    pub fn set_value_silently(&mut self, value: u64) {
        self.notifications_blocked = true;
        let _ = self.set_value(value);
        self.notifications_blocked = false;
    }

    /// A drag or click on the control. Always asks for a seek while enabled.
    pub fn user_moved(&mut self, value: u64) -> Option<SeekRequest> {
        if !self.enabled || self.notifications_blocked {
            return None;
        }
        self.value = value.min(self.maximum);
        Some(SeekRequest(self.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn control(maximum: u64) -> PositionControl {
        let mut control = PositionControl::new();
        control.set_range(maximum);
        control.set_enabled(true);
        control
    }

    #[test]
    fn silent_update_never_requests_seek() {
        let mut control = control(100);
        control.set_value_silently(42);
        control.set_value_silently(42);

        assert_eq!(control.value(), 42);
        // Notifications are back on after the silent assignment
        assert_eq!(control.set_value(43), Some(SeekRequest(43)));
    }

    #[test]
    fn set_value_notifies_only_on_change() {
        let mut control = control(100);
        assert_eq!(control.set_value(10), Some(SeekRequest(10)));
        assert_eq!(control.set_value(10), None);
    }

    #[test]
    fn user_move_requests_seek_even_without_change() {
        let mut control = control(100);
        control.set_value_silently(7);
        assert_eq!(control.user_moved(7), Some(SeekRequest(7)));
    }

    #[test]
    fn disabled_control_ignores_user() {
        let mut control = control(100);
        control.set_enabled(false);
        assert_eq!(control.user_moved(5), None);
        assert_eq!(control.value(), 0);
    }

    #[test]
    fn values_clamp_to_range() {
        let mut control = control(100);
        control.set_value_silently(500);
        assert_eq!(control.value(), 100);
        assert_eq!(control.user_moved(101), Some(SeekRequest(100)));

        control.set_range(50);
        assert_eq!(control.value(), 50);
    }
}
