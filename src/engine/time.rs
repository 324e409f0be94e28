use std::time::{Duration, Instant};

pub struct FrameTimer {
    last: Instant,
    pub dt: Duration,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
            dt: Duration::ZERO,
        }
    }

    pub fn tick(&mut self) {
        let now = Instant::now();
        self.dt = now.duration_since(self.last);
        self.last = now;
    }
}

/// Turns wall-clock time into a whole number of fixed simulation ticks.
pub struct FixedStep {
    step: Duration,
    accumulator: Duration,
}

impl FixedStep {
    pub fn new(step: Duration) -> Self {
        Self {
            step,
            accumulator: Duration::ZERO,
        }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    /// Add `dt` and return how many ticks are now due.
    pub fn advance(&mut self, dt: Duration) -> u32 {
        self.accumulator += dt;
        let mut due = 0;
        while !self.step.is_zero() && self.accumulator >= self.step {
            self.accumulator -= self.step;
            due += 1;
        }
        due
    }

    /// Fraction of the next tick already elapsed, in `[0, 1)`.
    pub fn alpha(&self) -> f32 {
        if self.step.is_zero() {
            return 0.0;
        }
        self.accumulator.as_secs_f32() / self.step.as_secs_f32()
    }
}
