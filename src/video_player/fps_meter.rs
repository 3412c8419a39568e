// SPDX-License-Identifier: MPL-2.0
//! Rolling measurement of the display rate actually achieved.
//!
//! Independent of the nominal source rate: it averages the wall-clock gaps
//! between frames that reached the screen since the last reset.

use std::time::Instant;

/// Label shown right after a reset.
pub const RESET_LABEL: &str = "FPS: 0";

#[derive(Debug, Clone, Default)]
pub struct FpsMeter {
    last_sample: Option<Instant>,
    sample_count: u32,
    total_elapsed_secs: f64,
}

impl FpsMeter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets every sample.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Records a displayed frame at `now`.
    ///
    /// The first sample after a reset only stores the timestamp.
    pub fn sample(&mut self, now: Instant) {
        if let Some(previous) = self.last_sample {
            self.total_elapsed_secs += now.saturating_duration_since(previous).as_secs_f64();
            self.sample_count += 1;
        }
        self.last_sample = Some(now);
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    pub fn total_elapsed_secs(&self) -> f64 {
        self.total_elapsed_secs
    }

    /// Average frames per second, if at least one interval was measured.
    pub fn average_fps(&self) -> Option<f64> {
        (self.sample_count > 0 && self.total_elapsed_secs > 0.0)
            .then(|| f64::from(self.sample_count) / self.total_elapsed_secs)
    }

    pub fn label(&self) -> String {
        match self.average_fps() {
            Some(fps) => format!("FPS: {fps:.2}"),
            None => RESET_LABEL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::assert_relative_eq;
    use std::time::Duration;

    #[test]
    fn first_sample_only_stores_timestamp() {
        let mut meter = FpsMeter::new();
        meter.sample(Instant::now());

        assert_eq!(meter.sample_count(), 0);
        assert_eq!(meter.average_fps(), None);
        assert_eq!(meter.label(), "FPS: 0");
    }

    #[test]
    fn average_is_samples_over_elapsed() {
        let mut meter = FpsMeter::new();
        let t0 = Instant::now();
        meter.sample(t0);
        meter.sample(t0 + Duration::from_millis(100));
        meter.sample(t0 + Duration::from_millis(200));
        meter.sample(t0 + Duration::from_millis(400));

        assert_eq!(meter.sample_count(), 3);
        assert_relative_eq!(meter.average_fps().unwrap(), 7.5, max_relative = 1e-9);
        assert_eq!(meter.label(), "FPS: 7.50");
    }

    #[test]
    fn zero_elapsed_time_yields_no_rate() {
        let mut meter = FpsMeter::new();
        let t0 = Instant::now();
        meter.sample(t0);
        meter.sample(t0);

        assert_eq!(meter.sample_count(), 1);
        assert_eq!(meter.average_fps(), None);
    }

    #[test]
    fn reset_clears_everything() {
        let mut meter = FpsMeter::new();
        let t0 = Instant::now();
        meter.sample(t0);
        meter.sample(t0 + Duration::from_millis(40));
        meter.reset();

        assert_eq!(meter.sample_count(), 0);
        assert_eq!(meter.total_elapsed_secs(), 0.0);
        assert_eq!(meter.label(), RESET_LABEL);

        // Next sample is a fresh starting point again
        meter.sample(t0 + Duration::from_secs(10));
        assert_eq!(meter.sample_count(), 0);
    }
}
