use web_time::{Duration, Instant};

/// Upper bound on ticks released by one frame; a longer stall drops the
/// backlog instead of fast-forwarding through it.
const MAX_STEPS_PER_FRAME: u32 = 60;

/// Converts wall-clock time between frames into whole animation ticks.
#[derive(Debug, Clone)]
pub struct FrameTiming {
    /// Milliseconds per tick.
    ms_per_step: f64,
    /// Last frame timestamp
    last_frame: Instant,
    /// Elapsed time not yet spent on a whole tick
    carry_ms: f64,
}

impl FrameTiming {
    /// Timer releasing one tick per `ms_per_step` milliseconds.
    #[must_use]
    pub fn new(ms_per_step: f64) -> Self {
        Self {
            ms_per_step: ms_per_step.max(1.0),
            last_frame: Instant::now(),
            carry_ms: 0.0,
        }
    }

    /// Ticks due since the previous call.
    pub fn steps_due(&mut self) -> u32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame);
        self.last_frame = now;
        self.steps_for(elapsed)
    }

    /// Ticks due after `elapsed`, carrying the remainder to the next frame.
    pub fn steps_for(&mut self, elapsed: Duration) -> u32 {
        self.carry_ms += elapsed.as_secs_f64() * 1000.0;
        let due = (self.carry_ms / self.ms_per_step).floor();
        if due >= f64::from(MAX_STEPS_PER_FRAME) {
            self.carry_ms = 0.0;
            return MAX_STEPS_PER_FRAME;
        }
        self.carry_ms -= due * self.ms_per_step;
        due as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remainder_carries_over() {
        let mut timing = FrameTiming::new(17.0);
        assert_eq!(timing.steps_for(Duration::from_millis(10)), 0);
        assert_eq!(timing.steps_for(Duration::from_millis(10)), 1);
        assert_eq!(timing.steps_for(Duration::from_millis(40)), 2);
    }

    #[test]
    fn long_stall_is_capped() {
        let mut timing = FrameTiming::new(17.0);
        assert_eq!(
            timing.steps_for(Duration::from_secs(10)),
            MAX_STEPS_PER_FRAME
        );
        assert_eq!(timing.steps_for(Duration::from_millis(1)), 0);
    }
}
