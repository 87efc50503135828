//! Decoded sound buffers
//!
//! Assets are decoded once into interleaved PCM and shared behind an `Arc`.
//! Every playback creates a cheap [`BufferSource`] cursor over that data, so
//! replaying an effect or resuming the music never decodes again.

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use rodio::{Decoder, Source};

/// Decoded, ready-to-play audio buffer
#[derive(Debug, Clone)]
pub struct SoundBuffer {
    channels: u16,
    sample_rate: u32,
    samples: Arc<[i16]>,
}

impl SoundBuffer {
    /// Wrap already decoded interleaved samples
    pub fn from_samples(channels: u16, sample_rate: u32, samples: Vec<i16>) -> Self {
        Self {
            channels,
            sample_rate,
            samples: samples.into(),
        }
    }

    /// Decode an encoded asset (MP3, WAV, FLAC, Vorbis) held in memory
    pub fn decode(bytes: Vec<u8>) -> Result<Self, rodio::decoder::DecoderError> {
        let decoder = Decoder::new(Cursor::new(bytes))?;
        let channels = decoder.channels();
        let sample_rate = decoder.sample_rate();
        let samples: Vec<i16> = decoder.collect();

        Ok(Self::from_samples(channels, sample_rate, samples))
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    /// Number of sample frames (one sample per channel)
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            return 0;
        }
        self.samples.len() / self.channels as usize
    }

    /// Track length in seconds, 0 when the buffer is empty or malformed
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / self.sample_rate as f64
    }
}

/// Playback cursor over a shared [`SoundBuffer`]
///
/// Starts at an arbitrary offset and, when looping, wraps back to the start
/// of the track rather than to the offset it was seeded with.
pub struct BufferSource {
    buffer: Arc<SoundBuffer>,
    position: usize,
    looping: bool,
}

impl BufferSource {
    pub fn new(buffer: Arc<SoundBuffer>, offset_secs: f64, looping: bool) -> Self {
        let position = Self::frame_at(&buffer, offset_secs) * buffer.channels as usize;
        Self {
            buffer,
            position,
            looping,
        }
    }

    /// Frame index for an offset, clamped into the track
    fn frame_at(buffer: &SoundBuffer, offset_secs: f64) -> usize {
        let frames = buffer.frames();
        if frames == 0 || !offset_secs.is_finite() || offset_secs <= 0.0 {
            return 0;
        }
        let frame = (offset_secs * buffer.sample_rate as f64).floor() as usize;
        frame.min(frames - 1)
    }

    /// Current position in seconds
    pub fn position_secs(&self) -> f64 {
        if self.buffer.channels == 0 || self.buffer.sample_rate == 0 {
            return 0.0;
        }
        let frame = self.position / self.buffer.channels as usize;
        frame as f64 / self.buffer.sample_rate as f64
    }
}

impl Iterator for BufferSource {
    type Item = i16;

    fn next(&mut self) -> Option<i16> {
        let samples = self.buffer.samples();
        if self.position >= samples.len() {
            if !self.looping || samples.is_empty() {
                return None;
            }
            self.position = 0;
        }
        let sample = samples[self.position];
        self.position += 1;
        Some(sample)
    }
}

impl Source for BufferSource {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        self.buffer.channels
    }

    fn sample_rate(&self) -> u32 {
        self.buffer.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        if self.looping {
            return None;
        }
        let remaining = (self.buffer.duration_secs() - self.position_secs()).max(0.0);
        Some(Duration::from_secs_f64(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(frames: usize) -> Arc<SoundBuffer> {
        // Stereo, 10 Hz so one frame is 0.1s
        let samples = (0..frames * 2).map(|i| i as i16).collect();
        Arc::new(SoundBuffer::from_samples(2, 10, samples))
    }

    #[test]
    fn test_duration() {
        let buffer = ramp(25);
        assert_eq!(buffer.frames(), 25);
        assert!((buffer.duration_secs() - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_empty_buffer_has_zero_duration() {
        let buffer = SoundBuffer::from_samples(2, 44_100, Vec::new());
        assert_eq!(buffer.duration_secs(), 0.0);

        let malformed = SoundBuffer::from_samples(0, 0, vec![1, 2, 3]);
        assert_eq!(malformed.frames(), 0);
        assert_eq!(malformed.duration_secs(), 0.0);
    }

    #[test]
    fn test_source_starts_at_offset() {
        let mut source = BufferSource::new(ramp(10), 0.5, false);
        // Frame 5 of a stereo ramp starts at sample 10
        assert_eq!(source.next(), Some(10));
        assert_eq!(source.next(), Some(11));
    }

    #[test]
    fn test_source_offset_is_clamped() {
        let mut source = BufferSource::new(ramp(10), 99.0, false);
        assert_eq!(source.next(), Some(18));
        assert_eq!(source.next(), Some(19));
        assert_eq!(source.next(), None);

        let mut source = BufferSource::new(ramp(10), f64::NAN, false);
        assert_eq!(source.next(), Some(0));
    }

    #[test]
    fn test_looping_wraps_to_track_start() {
        let mut source = BufferSource::new(ramp(3), 0.2, true);
        let played: Vec<i16> = source.by_ref().take(6).collect();
        assert_eq!(played, vec![4, 5, 0, 1, 2, 3]);
        assert_eq!(source.total_duration(), None);
    }

    #[test]
    fn test_one_shot_ends() {
        let source = BufferSource::new(ramp(3), 0.0, false);
        assert_eq!(source.count(), 6);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let result = SoundBuffer::decode(b"definitely not an audio file".to_vec());
        assert!(result.is_err());
    }
}
