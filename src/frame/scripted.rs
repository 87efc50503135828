//! Scripted stand-in for the game engine
//!
//! Replays a timeline of game events and honours the space-bar controls, so
//! the audio layer can be previewed and tested without the real simulation.

use serde::{Deserialize, Serialize};

use super::engine::{GameEngine, GameEventListener, RunState};
use crate::events::GameEvent;

const LEVELS: [&str; 2] = ["level01", "level02"];

/// One event of the timeline, fired once `at_ms` of engine time has passed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptStep {
    pub at_ms: u64,
    pub event: GameEvent,
}

impl ScriptStep {
    pub fn new(at_ms: u64, event: GameEvent) -> Self {
        Self { at_ms, event }
    }
}

/// Engine that replays a fixed script
pub struct ScriptedEngine {
    script: Vec<ScriptStep>,
    next_step: usize,
    elapsed_ms: f64,
    run_state: RunState,
    has_started: bool,
    score: u32,
    level: String,
    frame_buffer: Vec<u8>,
    listeners: Vec<GameEventListener>,
}

impl ScriptedEngine {
    pub fn new(width: u32, height: u32, mut script: Vec<ScriptStep>) -> Self {
        script.sort_by_key(|step| step.at_ms);
        Self {
            script,
            next_step: 0,
            elapsed_ms: 0.0,
            run_state: RunState::Paused,
            has_started: false,
            score: 0,
            level: LEVELS[0].to_string(),
            frame_buffer: vec![0; width as usize * height as usize * 4],
            listeners: Vec::new(),
        }
    }

    /// Whether every scripted step has fired
    pub fn is_finished(&self) -> bool {
        self.next_step >= self.script.len()
    }

    pub fn level(&self) -> &str {
        &self.level
    }

    fn emit(&mut self, event: GameEvent) {
        match event {
            GameEvent::EatFood => self.score += 1,
            GameEvent::GameStarted => {
                self.score = 0;
                self.has_started = true;
                self.run_state = RunState::Running;
            }
            GameEvent::GameResumed => self.run_state = RunState::Running,
            GameEvent::GamePaused => self.run_state = RunState::Paused,
            GameEvent::GameOver => self.run_state = RunState::GameOver,
        }

        tracing::debug!("Engine event: {}", event);
        for listener in self.listeners.iter_mut() {
            listener(event);
        }
    }
}

impl GameEngine for ScriptedEngine {
    fn update(&mut self, delta_ms: f32) {
        self.elapsed_ms += f64::from(delta_ms.max(0.0));

        while let Some(step) = self.script.get(self.next_step).copied() {
            if step.at_ms as f64 > self.elapsed_ms {
                break;
            }
            self.next_step += 1;
            self.emit(step.event);
        }
    }

    fn render(&mut self) {
        let shade = match self.run_state {
            RunState::Running => [0, 0, 0, 255],
            RunState::Paused => [16, 16, 16, 255],
            RunState::GameOver => [32, 0, 0, 255],
        };
        for pixel in self.frame_buffer.chunks_exact_mut(4) {
            pixel.copy_from_slice(&shade);
        }
    }

    fn frame_buffer(&self) -> &[u8] {
        &self.frame_buffer
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn run_state(&self) -> RunState {
        self.run_state
    }

    fn level_names(&self) -> Vec<String> {
        LEVELS.iter().map(|name| name.to_string()).collect()
    }

    fn load_level(&mut self, name: &str) {
        if !LEVELS.contains(&name) {
            tracing::warn!("Unknown level {}, keeping {}", name, self.level);
            return;
        }
        self.level = name.to_string();
        self.score = 0;
        self.has_started = false;
        self.run_state = RunState::Paused;
    }

    fn key_down(&mut self, code: &str) {
        if code != "Space" {
            return;
        }
        match self.run_state {
            RunState::Running => self.emit(GameEvent::GamePaused),
            RunState::Paused if self.has_started => self.emit(GameEvent::GameResumed),
            RunState::Paused | RunState::GameOver => self.emit(GameEvent::GameStarted),
        }
    }

    fn add_game_event_listener(&mut self, listener: GameEventListener) {
        self.listeners.push(listener);
    }
}
