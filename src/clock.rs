use std::time::Instant;

/// Monotonic time since the showcase started.
#[derive(Clone, Copy, Debug)]
pub struct Clock {
    start: Instant,
    last: f32,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self { start, last: 0.0 }
    }

    /// Seconds elapsed at `now`. Instants before the start count as zero.
    pub fn elapsed_at(&self, now: Instant) -> f32 {
        now.saturating_duration_since(self.start).as_secs_f32()
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed_at(Instant::now())
    }

    /// Sample the clock: returns `(elapsed, delta since previous tick)`.
    pub fn tick(&mut self) -> (f32, f32) {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> (f32, f32) {
        let elapsed = self.elapsed_at(now);
        let delta = (elapsed - self.last).max(0.0);
        self.last = elapsed;
        (elapsed, delta)
    }
}
