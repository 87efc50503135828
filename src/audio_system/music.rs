//! Background music state machine
//!
//! A voice cannot be repositioned once started, so pausing tears the voice
//! down and remembers where it was; resuming starts a new voice from that
//! cursor. Each state carries only what is valid in it, so a live voice can
//! never exist while the track is logically stopped.
//!
//! ```text
//!            attach            play               pause
//! Unloaded ────────▶ Stopped ───────▶ Playing ───────────▶ Paused
//!                       ▲                │  ▲                 │
//!                       │      stop      │  └─────── play ────┘
//!                       └────────────────┴──────── stop ──────┘
//! ```

use std::sync::Arc;

use super::buffer::SoundBuffer;
use super::gain::GainStage;
use super::graph::{OutputGraph, PlaybackRequest, VoiceId};
use crate::events::MusicTransition;

/// Observable state of the background track
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MusicStatus {
    /// The track has not finished decoding (or never will)
    Unloaded,
    Stopped,
    Playing,
    Paused { cursor: f64 },
}

impl MusicStatus {
    pub fn is_playing(&self) -> bool {
        matches!(self, MusicStatus::Playing)
    }
}

struct LiveVoice {
    track: Arc<SoundBuffer>,
    voice: VoiceId,
    gain: GainStage,
    /// Graph clock when the voice started
    anchor: f64,
    /// Track position the voice started from
    seek: f64,
}

impl LiveVoice {
    /// Position within the current loop iteration at graph time `now`
    fn cursor_at(&self, now: f64) -> f64 {
        let duration = self.track.duration_secs();
        if !duration.is_finite() || duration <= 0.0 {
            return 0.0;
        }
        let elapsed = (now - self.anchor).max(0.0) + self.seek;
        let cursor = elapsed.rem_euclid(duration);
        if cursor.is_finite() && cursor < duration {
            cursor
        } else {
            0.0
        }
    }
}

enum MusicState {
    Unloaded,
    Stopped { track: Arc<SoundBuffer> },
    Playing(LiveVoice),
    Paused { track: Arc<SoundBuffer>, cursor: f64 },
}

/// The single background track and its playback state
pub struct BackgroundMusic {
    state: MusicState,
    gain: GainStage,
}

impl BackgroundMusic {
    pub fn new(gain: GainStage) -> Self {
        Self {
            state: MusicState::Unloaded,
            gain,
        }
    }

    /// Hand over the decoded track; only the first attach counts
    pub fn attach(&mut self, track: Arc<SoundBuffer>) {
        if let MusicState::Unloaded = self.state {
            tracing::debug!("Background track ready ({:.2}s)", track.duration_secs());
            self.state = MusicState::Stopped { track };
        }
    }

    pub fn is_loaded(&self) -> bool {
        !matches!(self.state, MusicState::Unloaded)
    }

    pub fn status(&self) -> MusicStatus {
        match &self.state {
            MusicState::Unloaded => MusicStatus::Unloaded,
            MusicState::Stopped { .. } => MusicStatus::Stopped,
            MusicState::Playing(_) => MusicStatus::Playing,
            MusicState::Paused { cursor, .. } => MusicStatus::Paused { cursor: *cursor },
        }
    }

    /// Remembered resume position; 0 unless paused
    pub fn cursor(&self) -> f64 {
        match &self.state {
            MusicState::Paused { cursor, .. } => *cursor,
            _ => 0.0,
        }
    }

    /// Voice currently sounding the track
    pub fn voice(&self) -> Option<VoiceId> {
        match &self.state {
            MusicState::Playing(live) => Some(live.voice),
            _ => None,
        }
    }

    pub fn gain(&self) -> GainStage {
        self.gain
    }

    /// Apply a routed transition; `looping` only matters for plays
    pub fn apply<G: OutputGraph + ?Sized>(
        &mut self,
        transition: MusicTransition,
        graph: &mut G,
        looping: bool,
    ) {
        match transition {
            MusicTransition::Play => self.play(graph, looping),
            MusicTransition::Pause => self.pause(graph),
            MusicTransition::Stop => self.stop(graph),
        }
    }

    /// Start from the beginning, or resume from the cursor when paused
    pub fn play<G: OutputGraph + ?Sized>(&mut self, graph: &mut G, looping: bool) {
        let (track, resume_from) = match std::mem::replace(&mut self.state, MusicState::Unloaded) {
            MusicState::Unloaded => {
                tracing::debug!("Background track not loaded yet, ignoring play");
                return;
            }
            MusicState::Playing(live) => {
                if graph.is_active(live.voice) {
                    self.state = MusicState::Playing(live);
                    return;
                }
                // A non-looping voice ran off the end of the track
                graph.stop_voice(live.voice);
                (live.track, None)
            }
            MusicState::Stopped { track } => (track, None),
            MusicState::Paused { track, cursor } => (track, Some(cursor)),
        };

        let seek = resume_from.unwrap_or(0.0);
        let gain = self.gain;
        let anchor = graph.clock();
        let request = PlaybackRequest {
            buffer: Arc::clone(&track),
            offset_secs: seek,
            looping,
            gain,
        };

        match graph.start_voice(request) {
            Ok(voice) => {
                tracing::info!("Background music playing from {:.2}s (loop: {})", seek, looping);
                self.state = MusicState::Playing(LiveVoice {
                    track,
                    voice,
                    gain,
                    anchor,
                    seek,
                });
            }
            Err(e) => {
                tracing::warn!("Failed to start background music: {}", e);
                self.state = match resume_from {
                    Some(cursor) => MusicState::Paused { track, cursor },
                    None => MusicState::Stopped { track },
                };
            }
        }
    }

    /// Remember the current position and release the voice
    pub fn pause<G: OutputGraph + ?Sized>(&mut self, graph: &mut G) {
        match std::mem::replace(&mut self.state, MusicState::Unloaded) {
            MusicState::Playing(live) if !graph.is_active(live.voice) => {
                // Ran off the end without looping; nothing left to resume
                graph.stop_voice(live.voice);
                tracing::info!("Background music already finished, stopped");
                self.state = MusicState::Stopped { track: live.track };
            }
            MusicState::Playing(live) => {
                let cursor = live.cursor_at(graph.clock());
                graph.stop_voice(live.voice);
                tracing::info!(
                    "Background music paused at {:.2}s (gain {})",
                    cursor,
                    live.gain.level()
                );
                self.state = MusicState::Paused {
                    track: live.track,
                    cursor,
                };
            }
            other => self.state = other,
        }
    }

    /// Release any voice and forget the cursor
    pub fn stop<G: OutputGraph + ?Sized>(&mut self, graph: &mut G) {
        self.state = match std::mem::replace(&mut self.state, MusicState::Unloaded) {
            MusicState::Unloaded => MusicState::Unloaded,
            MusicState::Stopped { track } => MusicState::Stopped { track },
            MusicState::Playing(live) => {
                graph.stop_voice(live.voice);
                tracing::info!("Background music stopped");
                MusicState::Stopped { track: live.track }
            }
            MusicState::Paused { track, .. } => {
                tracing::info!("Background music stopped while paused");
                MusicState::Stopped { track }
            }
        };
    }
}
