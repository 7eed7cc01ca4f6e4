use std::time::{Duration, Instant};

/// Admits at most one frame per target interval.
///
/// Callbacks arriving early are skipped outright rather than queued. On
/// admission the clock is rewound by the overshoot (`elapsed % interval`)
/// so the admitted cadence stays locked to the interval grid instead of
/// drifting later with every frame.
#[derive(Debug)]
pub struct FrameThrottle {
    interval: Duration,
    last: Instant,
}

impl FrameThrottle {
    pub fn new(interval: Duration, start: Instant) -> Self {
        Self {
            interval,
            last: start,
        }
    }

    pub fn from_fps(fps: u32, start: Instant) -> Self {
        Self::new(Duration::from_nanos(1_000_000_000 / u64::from(fps.max(1))), start)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Earliest instant the next frame will be admitted
    pub fn next_due(&self) -> Instant {
        self.last + self.interval
    }

    /// Whether a frame firing at `now` should run the step
    pub fn admit(&mut self, now: Instant) -> bool {
        let elapsed = now.saturating_duration_since(self.last);
        if elapsed < self.interval {
            return false;
        }

        let overshoot = elapsed.as_nanos() % self.interval.as_nanos().max(1);
        // overshoot < interval, which fits in a u64 of nanoseconds
        self.last = now - Duration::from_nanos(overshoot as u64);
        true
    }
}
