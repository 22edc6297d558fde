//! Frame timing
//!
//! The animation is advanced only by input events, so frame time never
//! drives the scene. It is still measured for the overlay and logs, and the
//! per-frame delta is clamped so a stall (window drag, breakpoint) reads as
//! one long frame rather than a jump.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Upper bound on a single frame delta, in seconds
pub const MAX_FRAME_DELTA: f32 = 0.03;

const DEFAULT_SAMPLES: usize = 60;

pub struct FrameClock {
    last: Option<Instant>,
    frame_times: VecDeque<Duration>,
    max_samples: usize,
    frames: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_samples(DEFAULT_SAMPLES)
    }

    /// Averages FPS over the last `max_samples` frames
    pub fn with_samples(max_samples: usize) -> Self {
        let max_samples = max_samples.max(1);
        Self {
            last: None,
            frame_times: VecDeque::with_capacity(max_samples),
            max_samples,
            frames: 0,
        }
    }

    /// Records a frame at `now` and returns the clamped delta in seconds.
    ///
    /// The first tick has no predecessor and returns 0.
    pub fn tick(&mut self, now: Instant) -> f32 {
        let delta = match self.last.replace(now) {
            Some(last) => now.saturating_duration_since(last),
            None => return 0.0,
        };

        if self.frame_times.len() == self.max_samples {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(delta);
        self.frames += 1;

        let dt = delta.as_secs_f32().min(MAX_FRAME_DELTA);
        log::trace!("frame {}: {:.2} ms", self.frames, delta.as_secs_f32() * 1000.0);
        dt
    }

    /// Average frames per second over the sample window, 0 until two ticks
    pub fn fps(&self) -> f32 {
        let total: Duration = self.frame_times.iter().sum();
        if total.is_zero() {
            return 0.0;
        }
        self.frame_times.len() as f32 / total.as_secs_f32()
    }

    /// Number of measured frame intervals
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
