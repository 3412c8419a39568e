// SPDX-License-Identifier: MPL-2.0
//! Wall-clock timeline that paces playback at the source's nominal rate.
//!
//! The clock does not own a timer. The host polls it from a single periodic
//! timer and the clock decides whether that poll is a tick, the end of the
//! timeline, or nothing. Keeping time external makes the clock deterministic
//! under test and lets the host cancel it simply by not polling.
//!
//! Policy: one tick per due poll. The next deadline stays on the original
//! grid while polls arrive within one period of it, so timer jitter never
//! swallows a frame. A poll a whole period or more late restarts the grid
//! from the poll instant: a slow decode delays later frames instead of
//! producing a burst of catch-up ticks.

use super::time_units;
use std::time::{Duration, Instant};

/// Lifecycle of the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    NotRunning,
    Running,
    Paused,
}

/// What a poll produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockEvent {
    /// Advance exactly one frame.
    Tick,

    /// The nominal duration elapsed. Emitted once; the clock is stopped.
    Finished,
}

#[derive(Debug, Clone)]
pub struct FrameClock {
    duration: Duration,
    update_interval: Duration,
    state: ClockState,
    /// Elapsed timeline time accumulated before the current running segment.
    elapsed: Duration,
    segment_start: Option<Instant>,
    next_fire: Option<Instant>,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    /// Creates an unconfigured clock. It finishes immediately if started.
    #[must_use]
    pub fn new() -> Self {
        Self {
            duration: Duration::ZERO,
            update_interval: Duration::from_millis(1),
            state: ClockState::NotRunning,
            elapsed: Duration::ZERO,
            segment_start: None,
            next_fire: None,
        }
    }

    /// Sizes the timeline for a source and stops it.
    ///
    /// Does nothing but stop when the frame rate is unusable.
    pub fn configure(&mut self, frame_count: u64, frame_rate: f64) {
        self.stop();
        let (Some(duration_ms), Some(interval_ms)) = (
            time_units::nominal_duration_ms(frame_count, frame_rate),
            time_units::frame_period_ms(frame_rate),
        ) else {
            return;
        };
        self.duration = Duration::from_millis(duration_ms);
        self.update_interval = Duration::from_millis(interval_ms);
    }

    /// Total nominal playback duration.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Nominal per-frame period.
    pub fn update_interval(&self) -> Duration {
        self.update_interval
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration.as_millis() as u64
    }

    pub fn update_interval_ms(&self) -> u64 {
        self.update_interval.as_millis() as u64
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == ClockState::Running
    }

    /// Starts the timeline from zero.
    pub fn start(&mut self, now: Instant) {
        self.elapsed = Duration::ZERO;
        self.segment_start = Some(now);
        self.next_fire = Some(now + self.update_interval);
        self.state = ClockState::Running;
    }

    /// Freezes elapsed time. No-op unless running.
    pub fn pause(&mut self, now: Instant) {
        if self.state != ClockState::Running {
            return;
        }
        self.elapsed = self.current_time(now);
        self.segment_start = None;
        self.next_fire = None;
        self.state = ClockState::Paused;
    }

    /// Continues a paused timeline. No-op unless paused.
    pub fn resume(&mut self, now: Instant) {
        if self.state != ClockState::Paused {
            return;
        }
        self.segment_start = Some(now);
        self.next_fire = Some(now + self.update_interval);
        self.state = ClockState::Running;
    }

    /// Cancels the timeline. No event is produced afterwards.
    pub fn stop(&mut self) {
        self.elapsed = Duration::ZERO;
        self.segment_start = None;
        self.next_fire = None;
        self.state = ClockState::NotRunning;
    }

    /// Elapsed timeline time at `now`, capped at the duration.
    pub fn current_time(&self, now: Instant) -> Duration {
        let running = self
            .segment_start
            .map(|start| now.saturating_duration_since(start))
            .unwrap_or_default();
        (self.elapsed + running).min(self.duration)
    }

    /// Returns the event due at `now`, if any.
    pub fn poll(&mut self, now: Instant) -> Option<ClockEvent> {
        if self.state != ClockState::Running {
            return None;
        }

        if self.current_time(now) >= self.duration {
            self.elapsed = self.duration;
            self.segment_start = None;
            self.next_fire = None;
            self.state = ClockState::NotRunning;
            return Some(ClockEvent::Finished);
        }

        match self.next_fire {
            Some(due) if now >= due => {
                let on_grid = due + self.update_interval;
                self.next_fire = Some(if now < on_grid {
                    on_grid
                } else {
                    now + self.update_interval
                });
                Some(ClockEvent::Tick)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ten_second_clock() -> FrameClock {
        let mut clock = FrameClock::new();
        clock.configure(100, 10.0);
        clock
    }

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn configure_derives_duration_and_interval() {
        let clock = ten_second_clock();
        assert_eq!(clock.duration_ms(), 10_000);
        assert_eq!(clock.update_interval_ms(), 100);
        assert_eq!(clock.state(), ClockState::NotRunning);
    }

    #[test]
    fn configure_ignores_zero_rate() {
        let mut clock = FrameClock::new();
        clock.configure(100, 0.0);
        assert_eq!(clock.duration_ms(), 0);
        assert_eq!(clock.update_interval_ms(), 1);
    }

    #[test]
    fn ticks_once_per_interval() {
        let mut clock = ten_second_clock();
        let t0 = Instant::now();
        clock.start(t0);

        assert_eq!(clock.poll(t0 + ms(50)), None);
        assert_eq!(clock.poll(t0 + ms(100)), Some(ClockEvent::Tick));
        assert_eq!(clock.poll(t0 + ms(150)), None);
        assert_eq!(clock.poll(t0 + ms(200)), Some(ClockEvent::Tick));
    }

    #[test]
    fn late_poll_does_not_catch_up() {
        let mut clock = ten_second_clock();
        let t0 = Instant::now();
        clock.start(t0);

        // Five intervals late: still a single tick
        assert_eq!(clock.poll(t0 + ms(500)), Some(ClockEvent::Tick));
        assert_eq!(clock.poll(t0 + ms(500)), None);
        assert_eq!(clock.poll(t0 + ms(599)), None);
        assert_eq!(clock.poll(t0 + ms(600)), Some(ClockEvent::Tick));
    }

    #[test]
    fn jittered_polls_tick_every_time() {
        let mut clock = ten_second_clock();
        let t0 = Instant::now();
        clock.start(t0);

        let jitter = [2, 1, 3, 0, 4, 2, 1, 3, 2, 0, 1, 4, 3, 2, 1, 0, 2, 3, 1, 2];
        let ticks = jitter
            .iter()
            .enumerate()
            .filter(|(k, j)| {
                let at = t0 + ms(100 * (*k as u64 + 1) + **j);
                clock.poll(at) == Some(ClockEvent::Tick)
            })
            .count();
        assert_eq!(ticks, jitter.len());
    }

    #[test]
    fn early_poll_keeps_deadline_on_grid() {
        let mut clock = ten_second_clock();
        let t0 = Instant::now();
        clock.start(t0);

        assert_eq!(clock.poll(t0 + ms(104)), Some(ClockEvent::Tick));
        // Next deadline is 200, not 204
        assert_eq!(clock.poll(t0 + ms(201)), Some(ClockEvent::Tick));
    }

    #[test]
    fn finishes_exactly_once() {
        let mut clock = ten_second_clock();
        let t0 = Instant::now();
        clock.start(t0);

        assert_eq!(clock.poll(t0 + ms(10_000)), Some(ClockEvent::Finished));
        assert_eq!(clock.state(), ClockState::NotRunning);
        assert_eq!(clock.poll(t0 + ms(10_100)), None);
        assert_eq!(clock.poll(t0 + ms(20_000)), None);
    }

    #[test]
    fn no_tick_after_pause_returns() {
        let mut clock = ten_second_clock();
        let t0 = Instant::now();
        clock.start(t0);
        clock.pause(t0 + ms(50));

        assert_eq!(clock.poll(t0 + ms(100)), None);
        assert_eq!(clock.poll(t0 + ms(60_000)), None);
        assert_eq!(clock.state(), ClockState::Paused);
    }

    #[test]
    fn no_tick_after_stop_returns() {
        let mut clock = ten_second_clock();
        let t0 = Instant::now();
        clock.start(t0);
        clock.stop();

        assert_eq!(clock.poll(t0 + ms(100)), None);
        assert_eq!(clock.poll(t0 + ms(60_000)), None);
    }

    #[test]
    fn pause_preserves_elapsed_time() {
        let mut clock = ten_second_clock();
        let t0 = Instant::now();
        clock.start(t0);
        clock.pause(t0 + ms(4_000));

        assert_eq!(clock.current_time(t0 + ms(9_000)), ms(4_000));

        clock.resume(t0 + ms(9_000));
        assert_eq!(clock.current_time(t0 + ms(10_000)), ms(5_000));
        // Finishes after 10s of running time, not 10s of wall time
        assert_eq!(clock.poll(t0 + ms(14_999)), Some(ClockEvent::Tick));
        assert_eq!(clock.poll(t0 + ms(15_000)), Some(ClockEvent::Finished));
    }

    #[test]
    fn resume_waits_a_full_interval() {
        let mut clock = ten_second_clock();
        let t0 = Instant::now();
        clock.start(t0);
        clock.pause(t0 + ms(30));
        clock.resume(t0 + ms(1_000));

        assert_eq!(clock.poll(t0 + ms(1_050)), None);
        assert_eq!(clock.poll(t0 + ms(1_100)), Some(ClockEvent::Tick));
    }

    #[test]
    fn start_restarts_from_zero() {
        let mut clock = ten_second_clock();
        let t0 = Instant::now();
        clock.start(t0);
        assert_eq!(clock.poll(t0 + ms(10_000)), Some(ClockEvent::Finished));

        let t1 = t0 + ms(11_000);
        clock.start(t1);
        assert_eq!(clock.current_time(t1), Duration::ZERO);
        assert_eq!(clock.poll(t1 + ms(100)), Some(ClockEvent::Tick));
    }

    #[test]
    fn pause_and_resume_are_state_guarded() {
        let mut clock = ten_second_clock();
        let t0 = Instant::now();
        clock.resume(t0);
        assert_eq!(clock.state(), ClockState::NotRunning);

        clock.pause(t0);
        assert_eq!(clock.state(), ClockState::NotRunning);
    }
}
