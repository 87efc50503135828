//! Rodio output graph
//!
//! One `Sink` per voice. One-shots are detached right after they start, the
//! background voice keeps its sink so it can be stopped.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use rodio::{OutputStream, OutputStreamHandle, Sink};

use super::{OutputGraph, PlaybackRequest, VoiceId};
use crate::audio_system::buffer::{BufferSource, SoundBuffer};
use crate::error::AudioError;

/// Output graph backed by the default rodio device
pub struct RodioGraph {
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
    voices: HashMap<VoiceId, Sink>,
    next_id: u64,
    opened_at: Instant,
}

impl RodioGraph {
    /// Open the default output device
    pub fn open() -> Result<Self, AudioError> {
        let (stream, stream_handle) =
            OutputStream::try_default().map_err(|e| AudioError::StreamInitFailed(Box::new(e)))?;

        tracing::info!("Audio output graph opened on default device");

        Ok(Self {
            _stream: stream,
            stream_handle,
            voices: HashMap::new(),
            next_id: 0,
            opened_at: Instant::now(),
        })
    }

    fn new_sink(&self) -> Result<Sink, AudioError> {
        Sink::try_new(&self.stream_handle).map_err(|e| AudioError::PlaybackFailed(Box::new(e)))
    }

    fn next_voice(&mut self) -> VoiceId {
        let id = VoiceId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Number of retained voices still held by the graph
    pub fn voice_count(&self) -> usize {
        self.voices.len()
    }
}

impl OutputGraph for RodioGraph {
    fn clock(&self) -> f64 {
        self.opened_at.elapsed().as_secs_f64()
    }

    fn play_oneshot(&mut self, buffer: &Arc<SoundBuffer>) -> Result<(), AudioError> {
        let sink = self.new_sink()?;
        sink.append(BufferSource::new(Arc::clone(buffer), 0.0, false));
        sink.detach();
        Ok(())
    }

    fn start_voice(&mut self, request: PlaybackRequest) -> Result<VoiceId, AudioError> {
        let sink = self.new_sink()?;
        sink.set_volume(request.gain.level());
        sink.append(BufferSource::new(
            request.buffer,
            request.offset_secs,
            request.looping,
        ));
        sink.play();

        let voice = self.next_voice();
        self.voices.insert(voice, sink);
        Ok(voice)
    }

    fn stop_voice(&mut self, voice: VoiceId) {
        if let Some(sink) = self.voices.remove(&voice) {
            sink.stop();
        }
    }

    fn is_active(&self, voice: VoiceId) -> bool {
        self.voices
            .get(&voice)
            .map(|sink| !sink.is_paused() && !sink.empty())
            .unwrap_or(false)
    }

    fn update(&mut self) {
        self.voices.retain(|_voice, sink| !sink.empty());
    }
}

impl Drop for RodioGraph {
    fn drop(&mut self) {
        for (_voice, sink) in self.voices.drain() {
            sink.stop();
        }
        tracing::debug!("Audio output graph closed");
    }
}
