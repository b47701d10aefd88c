use std::time::{Duration, Instant};

/// Splits variable frame times into fixed simulation steps.
///
/// Backlog beyond `max_backlog` is dropped, so a long stall (debugger,
/// window drag) costs a few ticks instead of a burst of catch-up.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: f64,
    max_backlog: f64,
    accumulator: f64,
}

impl FixedTimestep {
    pub fn new(rate_hz: f64, max_backlog: Duration) -> Self {
        Self {
            step: 1.0 / rate_hz,
            max_backlog: max_backlog.as_secs_f64(),
            accumulator: 0.0,
        }
    }

    pub fn step_seconds(&self) -> f32 {
        self.step as f32
    }

    /// Adds one frame's elapsed time and returns how many steps to run.
    pub fn advance(&mut self, frame_time: Duration) -> u32 {
        self.accumulator = (self.accumulator + frame_time.as_secs_f64()).min(self.max_backlog);
        let mut steps = 0;
        while self.accumulator >= self.step {
            self.accumulator -= self.step;
            steps += 1;
        }
        steps
    }
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(60.0, Duration::from_millis(250))
    }
}

/// Frames-per-second over a sliding report window.
#[derive(Debug)]
pub struct FpsCounter {
    interval: Duration,
    window_start: Instant,
    frames: u32,
}

impl FpsCounter {
    pub fn new(now: Instant, interval: Duration) -> Self {
        Self {
            interval,
            window_start: now,
            frames: 0,
        }
    }

    /// Counts a frame; returns the rate once per elapsed interval.
    pub fn frame(&mut self, now: Instant) -> Option<f64> {
        self.frames += 1;
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < self.interval {
            return None;
        }
        let fps = f64::from(self.frames) / elapsed.as_secs_f64();
        self.window_start = now;
        self.frames = 0;
        Some(fps)
    }
}
