use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver};

use super::engine::{GameEngine, RunState};
use super::fps::FpsCounter;
use super::overlay::{Overlay, OverlayInput};
use crate::audio_system::{AudioSessionManager, OutputGraph};
use crate::events::GameEvent;

/// Pause between frames when running the loop on its own (~60 Hz)
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Steps the engine once per frame and forwards its events to the audio session
pub struct FrameDriver<E: GameEngine, G: OutputGraph = Box<dyn OutputGraph>> {
    engine: E,
    audio: AudioSessionManager<G>,
    events: Receiver<GameEvent>,
    fps: FpsCounter,
    width: u32,
    height: u32,
    score: u32,
    started: bool,
    show_performance_info: bool,
    frames: u64,
}

impl<E: GameEngine, G: OutputGraph> FrameDriver<E, G> {
    pub fn new(mut engine: E, audio: AudioSessionManager<G>, width: u32, height: u32) -> Self {
        let (tx, rx) = unbounded();
        engine.add_game_event_listener(Box::new(move |event| {
            // Receiver lives as long as the driver; nothing to do once it is gone
            let _ = tx.send(event);
        }));

        Self {
            engine,
            audio,
            events: rx,
            fps: FpsCounter::new(Instant::now()),
            width,
            height,
            score: 0,
            started: false,
            show_performance_info: false,
            frames: 0,
        }
    }

    pub fn set_show_performance_info(&mut self, show: bool) {
        self.show_performance_info = show;
    }

    /// Advance one frame ending at `now`; returns how many events were forwarded
    pub fn tick(&mut self, now: Instant) -> usize {
        let delta_ms = self.fps.tick(now);
        self.engine.update(delta_ms);
        self.score = self.engine.score();
        if self.engine.run_state() == RunState::Running {
            self.started = true;
        }

        let forwarded = self.forward_events();
        self.audio.update();
        self.frames += 1;
        forwarded
    }

    /// Render the engine frame and describe the overlay to draw over it
    pub fn render(&mut self) -> Overlay {
        self.engine.render();
        Overlay::compose(&OverlayInput {
            width: self.width,
            height: self.height,
            score: self.score,
            run_state: self.engine.run_state(),
            started: self.started,
            fps: self.fps.fps(),
            delta_ms: self.fps.delta_ms(),
            show_performance_info: self.show_performance_info,
        })
    }

    /// Forward a key press to the engine
    pub fn key_down(&mut self, code: &str) {
        self.engine.key_down(code);
        self.forward_events();
    }

    /// Switch level; the new level waits for a fresh start and the music stops
    pub fn select_level(&mut self, name: &str) {
        tracing::info!("Loading level {}", name);
        self.engine.load_level(name);
        self.started = false;
        self.audio.stop_music();
        self.forward_events();
    }

    /// Run the frame loop; `None` runs until the process exits
    pub fn run(&mut self, max_frames: Option<u64>) {
        tracing::info!(
            "Frame loop started ({}x{}, levels: {})",
            self.width,
            self.height,
            self.engine.level_names().join(", ")
        );

        while max_frames.map_or(true, |max| self.frames < max) {
            self.tick(Instant::now());
            let overlay = self.render();
            if let Some(banner) = &overlay.banner {
                tracing::trace!("{} | {}", overlay.score, banner.text);
            }
            thread::sleep(FRAME_INTERVAL);
        }

        tracing::info!("Frame loop finished after {} frames", self.frames);
    }

    fn forward_events(&mut self) -> usize {
        let mut forwarded = 0;
        for event in self.events.try_iter() {
            self.audio.play_audio(event);
            forwarded += 1;
        }
        forwarded
    }

    pub fn frame_buffer(&self) -> &[u8] {
        self.engine.frame_buffer()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn audio(&self) -> &AudioSessionManager<G> {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut AudioSessionManager<G> {
        &mut self.audio
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio_system::{SessionSettings, SilentGraph, SoundBuffer};
    use crate::frame::scripted::{ScriptStep, ScriptedEngine};

    fn driver(script: Vec<ScriptStep>) -> FrameDriver<ScriptedEngine, SilentGraph> {
        let root = std::env::temp_dir().join("snake-audio-driver-no-assets");
        let audio = AudioSessionManager::open(
            SessionSettings::new(&root.display().to_string()),
            SilentGraph::manual(),
        );
        audio.insert_effect(
            GameEvent::EatFood,
            SoundBuffer::from_samples(1, 8_000, vec![0; 80]),
        );
        FrameDriver::new(ScriptedEngine::new(40, 30, script), audio, 40, 30)
    }

    #[test]
    fn test_events_reach_audio_in_order() {
        let mut driver = driver(vec![
            ScriptStep::new(0, GameEvent::GameStarted),
            ScriptStep::new(10, GameEvent::EatFood),
            ScriptStep::new(10, GameEvent::EatFood),
        ]);

        let start = Instant::now();
        let forwarded = driver.tick(start + Duration::from_millis(20));

        assert_eq!(forwarded, 3);
        assert_eq!(driver.score(), 2);
        assert!(driver.started());
        assert_eq!(driver.audio().graph().oneshot_count(), 2);
    }

    #[test]
    fn test_overlay_before_first_start() {
        let mut driver = driver(Vec::new());
        let overlay = driver.render();
        assert_eq!(overlay.banner.unwrap().text, "Press space to start");
        assert_eq!(driver.frame_buffer().len(), 40 * 30 * 4);
    }

    #[test]
    fn test_space_forwards_engine_events() {
        let mut driver = driver(Vec::new());
        driver.key_down("Space");
        driver.tick(Instant::now());
        assert!(driver.started());

        driver.key_down("Space");
        let overlay = driver.render();
        assert_eq!(overlay.banner.unwrap().text, "Paused");
    }

    #[test]
    fn test_select_level_resets_started() {
        let mut driver = driver(Vec::new());
        driver.key_down("Space");
        driver.tick(Instant::now());
        assert!(driver.started());

        driver.select_level("level01");
        assert!(!driver.started());
        assert_eq!(driver.engine().run_state(), RunState::Paused);
    }

    #[test]
    fn test_run_stops_after_max_frames() {
        let mut driver = driver(Vec::new());
        driver.run(Some(3));
        assert_eq!(driver.frames(), 3);
    }
}
