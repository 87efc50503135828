//! Game events and their background-music routing
//!
//! The engine emits one of these for every discrete thing that happens in a
//! run. Each event may carry a one-shot effect and may drive the background
//! track through the fixed routing table in [`GameEvent::music_transition`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Discrete events emitted by the game engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameEvent {
    /// The snake ate a piece of food
    EatFood,

    /// A fresh run started (first start or restart after game over)
    GameStarted,

    /// The player paused a running game
    GamePaused,

    /// The player resumed a paused game
    GameResumed,

    /// The snake crashed
    GameOver,
}

/// Background-music transition requested by an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicTransition {
    Play,
    Pause,
    Stop,
}

impl GameEvent {
    /// Every event the engine can emit
    pub const ALL: [GameEvent; 5] = [
        GameEvent::EatFood,
        GameEvent::GameStarted,
        GameEvent::GamePaused,
        GameEvent::GameResumed,
        GameEvent::GameOver,
    ];

    /// Routing table from events to background-music transitions
    pub fn music_transition(&self) -> Option<MusicTransition> {
        match self {
            GameEvent::GameOver => Some(MusicTransition::Stop),
            GameEvent::GamePaused => Some(MusicTransition::Pause),
            GameEvent::GameStarted | GameEvent::GameResumed => Some(MusicTransition::Play),
            GameEvent::EatFood => None,
        }
    }
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameEvent::EatFood => write!(f, "Eat Food"),
            GameEvent::GameStarted => write!(f, "Game Started"),
            GameEvent::GamePaused => write!(f, "Game Paused"),
            GameEvent::GameResumed => write!(f, "Game Resumed"),
            GameEvent::GameOver => write!(f, "Game Over"),
        }
    }
}

impl fmt::Display for MusicTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MusicTransition::Play => write!(f, "play"),
            MusicTransition::Pause => write!(f, "pause"),
            MusicTransition::Stop => write!(f, "stop"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_display() {
        assert_eq!(GameEvent::EatFood.to_string(), "Eat Food");
        assert_eq!(GameEvent::GameOver.to_string(), "Game Over");
    }

    #[test]
    fn test_music_routing() {
        assert_eq!(GameEvent::GameOver.music_transition(), Some(MusicTransition::Stop));
        assert_eq!(GameEvent::GamePaused.music_transition(), Some(MusicTransition::Pause));
        assert_eq!(GameEvent::GameStarted.music_transition(), Some(MusicTransition::Play));
        assert_eq!(GameEvent::GameResumed.music_transition(), Some(MusicTransition::Play));
        assert_eq!(GameEvent::EatFood.music_transition(), None);
    }

    #[test]
    fn test_event_serde_names() {
        let json = serde_json::to_string(&GameEvent::EatFood).unwrap();
        assert_eq!(json, "\"EatFood\"");

        let event: GameEvent = serde_json::from_str("\"GameOver\"").unwrap();
        assert_eq!(event, GameEvent::GameOver);
    }
}
