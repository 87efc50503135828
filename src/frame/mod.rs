//! Frame driver
//!
//! Thin glue between the game engine and the audio session: steps the engine
//! every frame, forwards the events it emits unmodified to
//! [`AudioSessionManager::play_audio`](crate::audio_system::AudioSessionManager::play_audio),
//! and keeps the FPS and overlay bookkeeping for the presentation host.

pub mod driver;
pub mod engine;
pub mod fps;
pub mod overlay;
pub mod scripted;

pub use driver::{FrameDriver, FRAME_INTERVAL};
pub use engine::{GameEngine, GameEventListener, RunState};
pub use fps::FpsCounter;
pub use overlay::{Banner, Overlay, OverlayColor};
pub use scripted::{ScriptStep, ScriptedEngine};
