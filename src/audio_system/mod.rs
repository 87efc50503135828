//! Audio system module
//!
//! Provides the audio session for the game:
//! - One-shot effects keyed by game event, played concurrently at unit gain
//! - A single looping background track that pauses and resumes in place
//! - Asynchronous asset loading with awaitable outcomes
//!
//! ## Architecture
//!
//! ```text
//! AudioSessionManager
//!   ├── EffectBank (GameEvent -> SoundBuffer)  ─▶ one-shots ─┐
//!   ├── BackgroundMusic (state machine)                      ├─▶ OutputGraph
//!   │     └── GainStage (0.2) ─▶ retained voice ─────────────┘     ├── RodioGraph
//!   └── LoadTask per asset (worker thread)                         └── SilentGraph
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use snake_audio::audio_system::{default_graph, AudioSessionManager, SessionSettings};
//! use snake_audio::GameEvent;
//!
//! let mut audio = AudioSessionManager::open(SessionSettings::new("audio/"), default_graph());
//!
//! // Register effects; wait on the task or let it finish in the background
//! audio.load_effect(GameEvent::EatFood, "eat.mp3").wait()?;
//! audio.load_effect(GameEvent::GameOver, "gameover.mp3");
//!
//! // Forward every engine event
//! audio.play_audio(GameEvent::GameStarted); // music starts
//! audio.play_audio(GameEvent::EatFood);     // effect plays
//! audio.play_audio(GameEvent::GamePaused);  // music pauses, cursor kept
//! ```

pub mod buffer;
pub mod effect_bank;
pub mod gain;
pub mod graph;
pub mod loader;
pub mod manager;
pub mod music;
pub mod shared;

/// Asset root used when none is configured
pub const DEFAULT_ASSET_ROOT: &str = "audio/";

/// Fixed file name of the background track under the asset root
pub const MUSIC_FILE_NAME: &str = "music.mp3";

// Re-export commonly used types
pub use buffer::{BufferSource, SoundBuffer};
pub use effect_bank::EffectBank;
pub use gain::{GainStage, DEFAULT_MUSIC_GAIN};
pub use graph::{default_graph, OutputGraph, PlaybackRequest, RodioGraph, SilentGraph, VoiceId};
pub use loader::{AssetRoot, LoadStatus, LoadTask};
pub use manager::{AudioSessionManager, SessionSettings};
pub use music::{BackgroundMusic, MusicStatus};
