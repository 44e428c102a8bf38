//! Frame clock for the animation loop.

use std::time::{Duration, Instant};

/// Longest frame the clock will report. A window drag or a debugger pause
/// would otherwise hand the scene a multi-second step.
pub const MAX_FRAME_DELTA: Duration = Duration::from_millis(100);

/// Manages frame timing and delta time calculation.
#[derive(Debug)]
pub struct Time {
    /// Time of the last frame.
    last_frame: Instant,
    /// Duration of the last frame (clamped).
    delta: Duration,
    /// Total scene time since start (sum of clamped deltas).
    elapsed: Duration,
    /// Frame count since start.
    frame_count: u64,
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

impl Time {
    /// Create a new clock starting now.
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Update timing at the start of a new frame from the wall clock.
    pub fn update(&mut self) {
        let now = Instant::now();
        let raw = now - self.last_frame;
        self.last_frame = now;
        self.advance(raw);
    }

    /// Advance the clock by an explicit step. Used by `update` and by tests
    /// that need a deterministic frame cadence.
    pub fn advance(&mut self, raw: Duration) {
        if raw > MAX_FRAME_DELTA {
            log::debug!("Frame hitch of {:.1} ms clamped", raw.as_secs_f32() * 1000.0);
        }
        self.delta = raw.min(MAX_FRAME_DELTA);
        self.elapsed += self.delta;
        self.frame_count += 1;
    }

    /// Get the delta time in seconds.
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Get the delta time as a Duration.
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Get total elapsed scene time in seconds.
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Get the current frame count.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the current FPS (from the last frame).
    pub fn fps(&self) -> f32 {
        if self.delta.as_secs_f32() > 0.0 {
            1.0 / self.delta.as_secs_f32()
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_accumulates_elapsed_and_frames() {
        let mut time = Time::new();
        for _ in 0..60 {
            time.advance(Duration::from_secs_f32(1.0 / 60.0));
        }
        assert_eq!(time.frame_count(), 60);
        assert!((time.elapsed_seconds() - 1.0).abs() < 1e-3);
    }

    #[test]
    fn long_frames_are_clamped() {
        let mut time = Time::new();
        time.advance(Duration::from_secs(5));
        assert_eq!(time.delta(), MAX_FRAME_DELTA);
        assert!((time.elapsed_seconds() - 0.1).abs() < 1e-6);
    }
}
