use std::time::{Duration, Instant};

const FPS_WINDOW: Duration = Duration::from_millis(1000);

/// Frame timing: per-frame delta and frames counted over one-second windows
pub struct FpsCounter {
    last_frame: Instant,
    window_start: Instant,
    frames_in_window: u32,
    fps: u32,
    delta_ms: f32,
}

impl FpsCounter {
    pub fn new(now: Instant) -> Self {
        Self {
            last_frame: now,
            window_start: now,
            frames_in_window: 0,
            fps: 0,
            delta_ms: 0.0,
        }
    }

    /// Record a frame at `now`; returns milliseconds since the previous frame
    pub fn tick(&mut self, now: Instant) -> f32 {
        self.frames_in_window += 1;
        self.delta_ms = now.saturating_duration_since(self.last_frame).as_secs_f32() * 1000.0;
        self.last_frame = now;

        if now.saturating_duration_since(self.window_start) >= FPS_WINDOW {
            self.fps = self.frames_in_window;
            self.frames_in_window = 0;
            self.window_start = now;
        }
        self.delta_ms
    }

    /// Frames counted in the last completed window
    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn delta_ms(&self) -> f32 {
        self.delta_ms
    }
}
