//! Silent output graph
//!
//! Keeps the full voice bookkeeping of a real graph without touching any
//! device. Used when no output device can be opened and in tests, where the
//! manual clock makes pause cursors deterministic.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use super::{OutputGraph, PlaybackRequest, VoiceId};
use crate::audio_system::buffer::SoundBuffer;
use crate::error::AudioError;

enum Clock {
    Wall(Instant),
    Manual(f64),
}

/// A retained voice as it was started
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceRecord {
    pub voice: VoiceId,
    pub offset_secs: f64,
    pub looping: bool,
    pub gain: f32,
    pub started_at: f64,
    /// Clock time the voice runs off the end of its track; `None` while looping
    pub ends_at: Option<f64>,
}

/// Output graph that plays nothing
pub struct SilentGraph {
    clock: Clock,
    active: HashMap<VoiceId, VoiceRecord>,
    history: Vec<VoiceRecord>,
    oneshots: usize,
    next_id: u64,
}

impl SilentGraph {
    /// Silent graph following wall-clock time
    pub fn new() -> Self {
        Self::with_clock(Clock::Wall(Instant::now()))
    }

    /// Silent graph whose clock only moves through [`SilentGraph::advance`]
    pub fn manual() -> Self {
        Self::with_clock(Clock::Manual(0.0))
    }

    fn with_clock(clock: Clock) -> Self {
        Self {
            clock,
            active: HashMap::new(),
            history: Vec::new(),
            oneshots: 0,
            next_id: 0,
        }
    }

    /// Move a manual clock forward; ignored on a wall clock
    pub fn advance(&mut self, secs: f64) {
        if let Clock::Manual(now) = &mut self.clock {
            *now += secs.max(0.0);
        }
    }

    /// Number of one-shots started so far
    pub fn oneshot_count(&self) -> usize {
        self.oneshots
    }

    /// Retained voices that have not been stopped
    pub fn active_voices(&self) -> Vec<VoiceRecord> {
        let mut voices: Vec<VoiceRecord> = self.active.values().cloned().collect();
        voices.sort_by_key(|record| record.voice.0);
        voices
    }

    /// Every retained voice ever started, oldest first
    ///
    /// Only kept on a manual clock; a wall-clock graph runs for the whole
    /// session and records nothing.
    pub fn voice_history(&self) -> &[VoiceRecord] {
        &self.history
    }
}

impl Default for SilentGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputGraph for SilentGraph {
    fn clock(&self) -> f64 {
        match self.clock {
            Clock::Wall(opened_at) => opened_at.elapsed().as_secs_f64(),
            Clock::Manual(now) => now,
        }
    }

    fn play_oneshot(&mut self, _buffer: &Arc<SoundBuffer>) -> Result<(), AudioError> {
        self.oneshots += 1;
        Ok(())
    }

    fn start_voice(&mut self, request: PlaybackRequest) -> Result<VoiceId, AudioError> {
        let voice = VoiceId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);

        let started_at = self.clock();
        let remaining = (request.buffer.duration_secs() - request.offset_secs.max(0.0)).max(0.0);
        let record = VoiceRecord {
            voice,
            offset_secs: request.offset_secs,
            looping: request.looping,
            gain: request.gain.level(),
            started_at,
            ends_at: (!request.looping).then_some(started_at + remaining),
        };
        if let Clock::Manual(_) = self.clock {
            self.history.push(record.clone());
        }
        self.active.insert(voice, record);
        Ok(voice)
    }

    fn stop_voice(&mut self, voice: VoiceId) {
        self.active.remove(&voice);
    }

    fn is_active(&self, voice: VoiceId) -> bool {
        let now = self.clock();
        self.active
            .get(&voice)
            .map(|record| record.ends_at.map_or(true, |end| now < end))
            .unwrap_or(false)
    }

    fn update(&mut self) {
        let now = self.clock();
        self.active
            .retain(|_voice, record| record.ends_at.map_or(true, |end| now < end));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio_system::gain::GainStage;

    fn request() -> PlaybackRequest {
        PlaybackRequest {
            buffer: Arc::new(SoundBuffer::from_samples(1, 10, vec![0; 10])),
            offset_secs: 0.25,
            looping: true,
            gain: GainStage::new(0.2),
        }
    }

    #[test]
    fn test_manual_clock() {
        let mut graph = SilentGraph::manual();
        assert_eq!(graph.clock(), 0.0);
        graph.advance(1.5);
        graph.advance(-3.0);
        assert_eq!(graph.clock(), 1.5);
    }

    #[test]
    fn test_voice_bookkeeping() {
        let mut graph = SilentGraph::manual();
        graph.advance(2.0);

        let voice = graph.start_voice(request()).unwrap();
        assert!(graph.is_active(voice));

        let record = &graph.active_voices()[0];
        assert_eq!(record.offset_secs, 0.25);
        assert_eq!(record.started_at, 2.0);
        assert_eq!(record.gain, 0.2);

        graph.stop_voice(voice);
        assert!(!graph.is_active(voice));
        assert!(graph.active_voices().is_empty());
        assert_eq!(graph.voice_history().len(), 1);
    }

    #[test]
    fn test_oneshots_are_counted_not_retained() {
        let mut graph = SilentGraph::manual();
        let buffer = Arc::new(SoundBuffer::from_samples(1, 10, vec![0; 10]));
        graph.play_oneshot(&buffer).unwrap();
        graph.play_oneshot(&buffer).unwrap();
        assert_eq!(graph.oneshot_count(), 2);
        assert!(graph.active_voices().is_empty());
    }

    #[test]
    fn test_non_looping_voice_runs_out() {
        let mut graph = SilentGraph::manual();
        let voice = graph
            .start_voice(PlaybackRequest {
                looping: false,
                ..request()
            })
            .unwrap();

        // 1.0s track seeded at 0.25s leaves 0.75s to play
        graph.advance(0.7);
        assert!(graph.is_active(voice));
        graph.advance(0.1);
        assert!(!graph.is_active(voice));

        graph.update();
        assert!(graph.active_voices().is_empty());
    }

    #[test]
    fn test_wall_clock_keeps_no_history() {
        let mut graph = SilentGraph::new();
        let voice = graph.start_voice(request()).unwrap();
        assert!(graph.is_active(voice));
        assert!(graph.voice_history().is_empty());
    }
}
