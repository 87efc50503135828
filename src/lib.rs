//! Audio session for a snake game
//!
//! Event-keyed one-shot effects, a pausable background track and the frame
//! driver that forwards engine events to them.

pub mod audio_system;
pub mod config;
pub mod error;
pub mod events;
pub mod frame;

pub use audio_system::{AudioSessionManager, MusicStatus, SessionSettings};
pub use config::Config;
pub use error::{AppResult, AudioError, ConfigError};
pub use events::{GameEvent, MusicTransition};
