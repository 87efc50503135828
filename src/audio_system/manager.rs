//! Audio session manager
//!
//! Owns the output graph, the event-keyed effect bank and the background
//! track. Playback state only changes through `&mut self`, so transitions are
//! atomic with respect to each other; loader threads only ever touch the
//! shared effect bank and their own task outcome.

use std::sync::Arc;

use super::buffer::SoundBuffer;
use super::effect_bank::EffectBank;
use super::gain::GainStage;
use super::graph::OutputGraph;
use super::loader::{AssetRoot, LoadStatus, LoadTask};
use super::music::{BackgroundMusic, MusicStatus};
use super::{DEFAULT_ASSET_ROOT, MUSIC_FILE_NAME};
use crate::events::GameEvent;

/// Construction settings for a session
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub asset_root: AssetRoot,
    pub music_gain: GainStage,
    /// Loop flag used by event-driven plays
    pub music_loop: bool,
}

impl SessionSettings {
    pub fn new(asset_root: &str) -> Self {
        Self {
            asset_root: AssetRoot::parse(asset_root),
            ..Self::default()
        }
    }

    pub fn with_music_gain(mut self, level: f32) -> Self {
        self.music_gain = GainStage::new(level);
        self
    }

    pub fn with_music_loop(mut self, looping: bool) -> Self {
        self.music_loop = looping;
        self
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            asset_root: AssetRoot::parse(DEFAULT_ASSET_ROOT),
            music_gain: GainStage::default(),
            music_loop: true,
        }
    }
}

/// Audio session manager
///
/// Plays one-shot effects for game events and drives the background track.
pub struct AudioSessionManager<G: OutputGraph = Box<dyn OutputGraph>> {
    root: AssetRoot,
    effects: EffectBank,
    music_task: LoadTask<Arc<SoundBuffer>>,
    music: BackgroundMusic,
    music_loop: bool,
    graph: G,
}

impl<G: OutputGraph> AudioSessionManager<G> {
    /// Open a session on `graph` and start loading the background track
    pub fn open(settings: SessionSettings, graph: G) -> Self {
        let root = settings.asset_root;
        let music_task = Self::load_music(&root);

        tracing::info!("Audio session opened (assets: {})", root);

        Self {
            root,
            effects: EffectBank::new(),
            music_task,
            music: BackgroundMusic::new(settings.music_gain),
            music_loop: settings.music_loop,
            graph,
        }
    }

    fn load_music(root: &AssetRoot) -> LoadTask<Arc<SoundBuffer>> {
        let worker_root = root.clone();
        LoadTask::spawn(root.locate(MUSIC_FILE_NAME), move || {
            worker_root
                .load(MUSIC_FILE_NAME)
                .map(Arc::new)
                .map_err(|e| {
                    tracing::error!("Error loading background music: {}", e);
                    e
                })
        })
    }

    /// Fetch and decode `file_name` under the asset root, then register it for `event`
    ///
    /// Replaces any buffer already registered for the event once the load
    /// completes. Failures are reported through the returned task only; wait
    /// on it or drop it to let the load finish in the background.
    pub fn load_effect(&self, event: GameEvent, file_name: &str) -> LoadTask<()> {
        let root = self.root.clone();
        let bank = self.effects.clone();
        let file_name = file_name.to_string();

        LoadTask::spawn(self.root.locate(&file_name), move || {
            let buffer = root.load(&file_name)?;
            if bank.insert(event, Arc::new(buffer)).is_some() {
                tracing::debug!("Replaced effect for {}", event);
            }
            Ok(())
        })
    }

    /// Register an already decoded effect
    pub fn insert_effect(&self, event: GameEvent, buffer: SoundBuffer) {
        self.effects.insert(event, Arc::new(buffer));
    }

    /// Play the effect registered for `event`; returns whether one started
    pub fn play_effect(&mut self, event: GameEvent) -> bool {
        let Some(buffer) = self.effects.get(event) else {
            return false;
        };

        match self.graph.play_oneshot(&buffer) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to play effect for {}: {}", event, e);
                false
            }
        }
    }

    /// Single entry point for engine events
    ///
    /// Applies the event's music transition first, then plays its effect.
    /// Neither step depends on the other.
    pub fn play_audio(&mut self, event: GameEvent) {
        self.sync_music();

        if let Some(transition) = event.music_transition() {
            tracing::debug!("{} -> music {}", event, transition);
            self.music.apply(transition, &mut self.graph, self.music_loop);
        }

        self.play_effect(event);
    }

    /// Start or resume the background track with the session's loop flag
    pub fn play_music(&mut self) {
        let looping = self.music_loop;
        self.play_music_with(looping);
    }

    /// Start or resume the background track with an explicit loop flag
    pub fn play_music_with(&mut self, looping: bool) {
        self.sync_music();
        self.music.play(&mut self.graph, looping);
    }

    pub fn pause_music(&mut self) {
        self.sync_music();
        self.music.pause(&mut self.graph);
    }

    pub fn stop_music(&mut self) {
        self.sync_music();
        self.music.stop(&mut self.graph);
    }

    /// Per-frame housekeeping
    pub fn update(&mut self) {
        self.sync_music();
        self.graph.update();
    }

    /// Pick up the background track once its load has finished
    fn sync_music(&mut self) {
        if self.music.is_loaded() {
            return;
        }
        if let Some(track) = self.music_task.loaded() {
            self.music.attach(track);
        }
    }

    pub fn music_status(&mut self) -> MusicStatus {
        self.sync_music();
        self.music.status()
    }

    /// Remembered resume position of the background track
    pub fn cursor(&self) -> f64 {
        self.music.cursor()
    }

    /// Load task of the background track
    pub fn music_task(&self) -> &LoadTask<Arc<SoundBuffer>> {
        &self.music_task
    }

    pub fn music_load_status(&self) -> LoadStatus {
        self.music_task.status()
    }

    pub fn has_effect(&self, event: GameEvent) -> bool {
        self.effects.contains(event)
    }

    /// Number of events with a registered effect
    pub fn effect_count(&self) -> usize {
        self.effects.len()
    }

    pub fn asset_root(&self) -> &AssetRoot {
        &self.root
    }

    pub fn graph(&self) -> &G {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut G {
        &mut self.graph
    }
}

impl<G: OutputGraph> Drop for AudioSessionManager<G> {
    fn drop(&mut self) {
        self.music.stop(&mut self.graph);
        tracing::debug!("Audio session disposed");
    }
}
