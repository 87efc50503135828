//! Gain stage for the background track
//!
//! Effects play at unit gain straight into the output. The music is routed
//! through one of these, created fresh for every play cycle.

/// Fixed attenuation applied to the background track
pub const DEFAULT_MUSIC_GAIN: f32 = 0.2;

/// Gain stage configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainStage {
    /// Gain multiplier (0.0-1.0)
    level: f32,
}

impl GainStage {
    /// Create a new gain stage
    pub fn new(level: f32) -> Self {
        Self {
            level: sanitize(level),
        }
    }

    /// Get the gain level
    pub fn level(&self) -> f32 {
        self.level
    }
}

impl Default for GainStage {
    fn default() -> Self {
        Self::new(DEFAULT_MUSIC_GAIN)
    }
}

fn sanitize(level: f32) -> f32 {
    if level.is_nan() {
        return 0.0;
    }
    level.clamp(0.0, 1.0)
}
