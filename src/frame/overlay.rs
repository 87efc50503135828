//! Text overlay drawn on top of the engine's frame
//!
//! Only describes what to draw; the presentation host does the painting.

use super::engine::RunState;

/// Named colors used by the overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayColor {
    Yellow,
    Red,
    LightGreen,
}

/// Centered message covering the frame
#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    pub text: &'static str,
    pub color: OverlayColor,
    pub font_px: f32,
}

/// Everything the host draws for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    /// Top-right score line
    pub score: String,
    /// Top-left timing line, when performance info is enabled
    pub performance: Option<String>,
    pub small_font_px: f32,
    /// Dim the frame with translucent black before drawing the banner
    pub dimmed: bool,
    pub banner: Option<Banner>,
}

/// Inputs of one overlay frame
pub struct OverlayInput {
    pub width: u32,
    pub height: u32,
    pub score: u32,
    pub run_state: RunState,
    /// Whether the current level has been running at least once
    pub started: bool,
    pub fps: u32,
    pub delta_ms: f32,
    pub show_performance_info: bool,
}

impl Overlay {
    pub fn compose(input: &OverlayInput) -> Self {
        let banner_px = input.width as f32 / 20.0;
        let banner = match input.run_state {
            RunState::GameOver => Some(Banner {
                text: "Game Over",
                color: OverlayColor::Red,
                font_px: banner_px,
            }),
            RunState::Paused if !input.started => Some(Banner {
                text: "Press space to start",
                color: OverlayColor::LightGreen,
                font_px: banner_px,
            }),
            RunState::Paused => Some(Banner {
                text: "Paused",
                color: OverlayColor::Yellow,
                font_px: banner_px,
            }),
            RunState::Running => None,
        };

        Self {
            score: format!("Score: {}", input.score),
            performance: input
                .show_performance_info
                .then(|| format!("FPS: {}, Delta: {:.2}", input.fps, input.delta_ms)),
            small_font_px: input.height as f32 / 50.0,
            dimmed: banner.is_some(),
            banner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(run_state: RunState, started: bool) -> OverlayInput {
        OverlayInput {
            width: 800,
            height: 600,
            score: 7,
            run_state,
            started,
            fps: 60,
            delta_ms: 16.5,
            show_performance_info: false,
        }
    }

    #[test]
    fn test_running_has_no_banner() {
        let overlay = Overlay::compose(&input(RunState::Running, true));
        assert_eq!(overlay.score, "Score: 7");
        assert!(overlay.banner.is_none());
        assert!(!overlay.dimmed);
        assert!(overlay.performance.is_none());
        assert_eq!(overlay.small_font_px, 12.0);
    }

    #[test]
    fn test_paused_banner_depends_on_started() {
        let before = Overlay::compose(&input(RunState::Paused, false));
        let banner = before.banner.unwrap();
        assert_eq!(banner.text, "Press space to start");
        assert_eq!(banner.color, OverlayColor::LightGreen);
        assert_eq!(banner.font_px, 40.0);

        let after = Overlay::compose(&input(RunState::Paused, true));
        assert_eq!(after.banner.unwrap().text, "Paused");
        assert!(after.dimmed);
    }

    #[test]
    fn test_game_over_and_performance_line() {
        let mut frame = input(RunState::GameOver, true);
        frame.show_performance_info = true;
        let overlay = Overlay::compose(&frame);

        assert_eq!(overlay.banner.unwrap().color, OverlayColor::Red);
        assert_eq!(overlay.performance.as_deref(), Some("FPS: 60, Delta: 16.50"));
    }
}
