//! Event-keyed cache of decoded one-shot effects

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::buffer::SoundBuffer;
use crate::events::GameEvent;

/// Decoded effects, one buffer per event
///
/// Shared with loader threads, which publish finished decodes straight into
/// the bank. A later load for the same event replaces the earlier buffer.
#[derive(Clone, Default)]
pub struct EffectBank {
    buffers: Arc<RwLock<HashMap<GameEvent, Arc<SoundBuffer>>>>,
}

impl EffectBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a buffer for an event, returning the one it replaced
    pub fn insert(&self, event: GameEvent, buffer: Arc<SoundBuffer>) -> Option<Arc<SoundBuffer>> {
        self.buffers.write().insert(event, buffer)
    }

    pub fn get(&self, event: GameEvent) -> Option<Arc<SoundBuffer>> {
        self.buffers.read().get(&event).cloned()
    }

    pub fn contains(&self, event: GameEvent) -> bool {
        self.buffers.read().contains_key(&event)
    }

    pub fn len(&self) -> usize {
        self.buffers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(len: usize) -> Arc<SoundBuffer> {
        Arc::new(SoundBuffer::from_samples(1, 8_000, vec![0; len]))
    }

    #[test]
    fn test_insert_replaces() {
        let bank = EffectBank::new();
        assert!(bank.insert(GameEvent::EatFood, buffer(10)).is_none());

        let replaced = bank.insert(GameEvent::EatFood, buffer(20));
        assert_eq!(replaced.map(|b| b.frames()), Some(10));
        assert_eq!(bank.get(GameEvent::EatFood).map(|b| b.frames()), Some(20));
        assert_eq!(bank.len(), 1);
    }

    #[test]
    fn test_clones_share_storage() {
        let bank = EffectBank::new();
        let worker_view = bank.clone();
        worker_view.insert(GameEvent::GameOver, buffer(5));

        assert!(bank.contains(GameEvent::GameOver));
        assert!(!bank.contains(GameEvent::EatFood));
        assert!(!bank.is_empty());
    }
}
