//! Audio output graph
//!
//! Platform-independent abstraction over the device the sounds end up on.
//! [`RodioGraph`] drives a real output device; [`SilentGraph`] keeps the same
//! bookkeeping without producing sound, for headless hosts and tests.

pub mod device;
pub mod silent;

use std::sync::Arc;

use super::buffer::SoundBuffer;
use super::gain::GainStage;
use crate::error::AudioError;

pub use device::RodioGraph;
pub use silent::SilentGraph;

/// Identifier of a retained voice in the output graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VoiceId(pub u64);

/// Everything needed to start a retained voice
#[derive(Debug, Clone)]
pub struct PlaybackRequest {
    pub buffer: Arc<SoundBuffer>,
    /// Start position in seconds
    pub offset_secs: f64,
    pub looping: bool,
    pub gain: GainStage,
}

/// Output graph the session manager plays into
///
/// Not `Send`: device streams are tied to the thread that opened them, and
/// the manager is driven from a single host thread.
pub trait OutputGraph {
    /// Seconds since the graph was opened, monotonic
    fn clock(&self) -> f64;

    /// Start a fire-and-forget voice at unit gain; it cleans up after itself
    fn play_oneshot(&mut self, buffer: &Arc<SoundBuffer>) -> Result<(), AudioError>;

    /// Start a voice that stays addressable until stopped
    fn start_voice(&mut self, request: PlaybackRequest) -> Result<VoiceId, AudioError>;

    /// Stop and release a voice; unknown ids are ignored
    fn stop_voice(&mut self, voice: VoiceId);

    /// Whether a retained voice is still producing sound
    fn is_active(&self, voice: VoiceId) -> bool;

    /// Per-frame housekeeping
    fn update(&mut self) {}
}

impl<G: OutputGraph + ?Sized> OutputGraph for Box<G> {
    fn clock(&self) -> f64 {
        (**self).clock()
    }

    fn play_oneshot(&mut self, buffer: &Arc<SoundBuffer>) -> Result<(), AudioError> {
        (**self).play_oneshot(buffer)
    }

    fn start_voice(&mut self, request: PlaybackRequest) -> Result<VoiceId, AudioError> {
        (**self).start_voice(request)
    }

    fn stop_voice(&mut self, voice: VoiceId) {
        (**self).stop_voice(voice)
    }

    fn is_active(&self, voice: VoiceId) -> bool {
        (**self).is_active(voice)
    }

    fn update(&mut self) {
        (**self).update()
    }
}

/// Open the default device, falling back to a silent graph when none is available
pub fn default_graph() -> Box<dyn OutputGraph> {
    match RodioGraph::open() {
        Ok(graph) => Box::new(graph),
        Err(e) => {
            tracing::warn!("No audio output available, continuing without sound: {}", e);
            Box::new(SilentGraph::new())
        }
    }
}

/// Graph that refuses every playback, like a device that went away
#[cfg(test)]
pub(crate) struct RefusingGraph;

#[cfg(test)]
impl OutputGraph for RefusingGraph {
    fn clock(&self) -> f64 {
        0.0
    }

    fn play_oneshot(&mut self, _buffer: &Arc<SoundBuffer>) -> Result<(), AudioError> {
        Err(AudioError::PlaybackFailed("device unavailable".into()))
    }

    fn start_voice(&mut self, _request: PlaybackRequest) -> Result<VoiceId, AudioError> {
        Err(AudioError::PlaybackFailed("device unavailable".into()))
    }

    fn stop_voice(&mut self, _voice: VoiceId) {}

    fn is_active(&self, _voice: VoiceId) -> bool {
        false
    }
}
