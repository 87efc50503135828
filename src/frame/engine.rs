//! Contract of the external game engine
//!
//! Simulation, scoring and rendering live behind this trait. The frame
//! driver only steps it, reads its public state and listens to its events.

use crate::events::GameEvent;

/// Listener invoked synchronously for every event the engine emits
pub type GameEventListener = Box<dyn FnMut(GameEvent)>;

/// Run state reported by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Paused,
    GameOver,
}

/// External game engine driven once per frame
pub trait GameEngine {
    /// Advance the simulation by `delta_ms` milliseconds
    fn update(&mut self, delta_ms: f32);

    /// Draw the current state into the frame buffer
    fn render(&mut self);

    /// RGBA frame buffer, `width * height * 4` bytes
    fn frame_buffer(&self) -> &[u8];

    fn score(&self) -> u32;

    fn run_state(&self) -> RunState;

    fn level_names(&self) -> Vec<String>;

    fn load_level(&mut self, name: &str);

    /// Forward a key press by its key code (`"ArrowUp"`, `"Space"`, ...)
    fn key_down(&mut self, code: &str);

    fn add_game_event_listener(&mut self, listener: GameEventListener);
}
