// Integration tests for the snake audio session
// Assets are real WAV files written to a temp directory; playback runs on a
// silent graph with a manual clock.

use std::path::Path;
use std::time::Duration;

use snake_audio::audio_system::{
    AudioSessionManager, LoadStatus, SessionSettings, SilentGraph, MUSIC_FILE_NAME,
};
use snake_audio::frame::{FrameDriver, ScriptStep, ScriptedEngine};
use snake_audio::{AudioError, GameEvent, MusicStatus};
use tempfile::TempDir;

const SAMPLE_RATE: u32 = 8_000;

/// Write a mono 16-bit WAV of `secs` seconds
fn write_wav(path: &Path, secs: f32) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    let frames = (secs * SAMPLE_RATE as f32) as usize;
    for n in 0..frames {
        let sample = ((n as f32 * 0.05).sin() * 8_000.0) as i16;
        writer.write_sample(sample).unwrap();
    }
    writer.finalize().unwrap();
}

/// Asset directory with a 2 s track and two short effects
fn asset_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_wav(&dir.path().join(MUSIC_FILE_NAME), 2.0);
    write_wav(&dir.path().join("eat.mp3"), 0.1);
    write_wav(&dir.path().join("gameover.mp3"), 0.3);
    dir
}

fn open(dir: &Path) -> AudioSessionManager<SilentGraph> {
    let root = format!("{}/", dir.display());
    AudioSessionManager::open(SessionSettings::new(&root), SilentGraph::manual())
}

#[test]
fn test_full_game_scenario() {
    let dir = asset_dir();
    let mut audio = open(dir.path());

    audio.music_task().wait().unwrap();
    audio.load_effect(GameEvent::EatFood, "eat.mp3").wait().unwrap();
    audio
        .load_effect(GameEvent::GameOver, "gameover.mp3")
        .wait()
        .unwrap();
    assert_eq!(audio.effect_count(), 2);

    // Effect only; music untouched
    audio.play_audio(GameEvent::EatFood);
    assert_eq!(audio.graph().oneshot_count(), 1);
    assert_eq!(audio.music_status(), MusicStatus::Stopped);

    audio.play_audio(GameEvent::GameStarted);
    assert_eq!(audio.music_status(), MusicStatus::Playing);
    let voices = audio.graph().active_voices();
    assert_eq!(voices.len(), 1);
    assert_eq!(voices[0].offset_secs, 0.0);
    assert_eq!(voices[0].gain, 0.2);
    assert!(voices[0].looping);

    // 2.5 s into a 2 s looping track
    audio.graph_mut().advance(2.5);
    audio.play_audio(GameEvent::GamePaused);
    assert_eq!(audio.music_status(), MusicStatus::Paused { cursor: 0.5 });
    assert!(audio.graph().active_voices().is_empty());

    audio.play_audio(GameEvent::GameResumed);
    assert_eq!(audio.music_status(), MusicStatus::Playing);
    assert_eq!(audio.cursor(), 0.0);
    let voices = audio.graph().active_voices();
    assert_eq!(voices.len(), 1);
    assert_eq!(voices[0].offset_secs, 0.5);

    audio.graph_mut().advance(0.25);
    audio.play_audio(GameEvent::GameOver);
    assert_eq!(audio.music_status(), MusicStatus::Stopped);
    assert_eq!(audio.cursor(), 0.0);
    assert!(audio.graph().active_voices().is_empty());
    assert_eq!(audio.graph().oneshot_count(), 2);
    assert_eq!(audio.graph().voice_history().len(), 2);
}

#[test]
fn test_double_play_keeps_one_voice() {
    let dir = asset_dir();
    let mut audio = open(dir.path());
    audio.music_task().wait().unwrap();

    audio.play_music();
    audio.play_music();
    assert_eq!(audio.graph().active_voices().len(), 1);
    assert_eq!(audio.graph().voice_history().len(), 1);
}

#[test]
fn test_effect_load_failure_is_reported() {
    let dir = asset_dir();
    let mut audio = open(dir.path());

    let err = audio
        .load_effect(GameEvent::EatFood, "missing.mp3")
        .wait()
        .unwrap_err();
    assert!(matches!(*err, AudioError::FetchFailed { .. }));

    std::fs::write(dir.path().join("noise.mp3"), b"not audio").unwrap();
    let err = audio
        .load_effect(GameEvent::GameOver, "noise.mp3")
        .wait()
        .unwrap_err();
    assert!(matches!(*err, AudioError::DecodeFailed { .. }));

    // Nothing registered, so events stay silent
    audio.play_audio(GameEvent::EatFood);
    assert!(!audio.has_effect(GameEvent::EatFood));
    assert_eq!(audio.graph().oneshot_count(), 0);
}

#[test]
fn test_reloading_effect_replaces_buffer() {
    let dir = asset_dir();
    let audio = open(dir.path());

    audio.load_effect(GameEvent::EatFood, "eat.mp3").wait().unwrap();
    audio
        .load_effect(GameEvent::EatFood, "gameover.mp3")
        .wait()
        .unwrap();
    assert_eq!(audio.effect_count(), 1);
}

#[test]
fn test_missing_music_leaves_session_usable() {
    let dir = TempDir::new().unwrap();
    write_wav(&dir.path().join("eat.mp3"), 0.1);
    let mut audio = open(dir.path());

    assert!(audio.music_task().wait().is_err());
    assert_eq!(audio.music_load_status(), LoadStatus::Failed);

    audio.load_effect(GameEvent::EatFood, "eat.mp3").wait().unwrap();
    audio.play_audio(GameEvent::GameStarted);
    audio.play_audio(GameEvent::EatFood);

    assert_eq!(audio.music_status(), MusicStatus::Unloaded);
    assert!(audio.graph().active_voices().is_empty());
    assert_eq!(audio.graph().oneshot_count(), 1);
}

#[test]
fn test_unreachable_remote_root_fails_load() {
    let mut audio = AudioSessionManager::open(
        SessionSettings::new("http://127.0.0.1:9/audio/"),
        SilentGraph::manual(),
    );

    let outcome = audio.music_task().wait_timeout(Duration::from_secs(30));
    assert!(matches!(outcome, Some(Err(_))));
    audio.play_music();
    assert_eq!(audio.music_status(), MusicStatus::Unloaded);
}

#[test]
fn test_driver_routes_scripted_run() {
    let dir = asset_dir();
    let audio = open(dir.path());
    audio.music_task().wait().unwrap();
    audio.load_effect(GameEvent::EatFood, "eat.mp3").wait().unwrap();

    let engine = ScriptedEngine::new(
        80,
        60,
        vec![
            ScriptStep::new(0, GameEvent::GameStarted),
            ScriptStep::new(0, GameEvent::EatFood),
        ],
    );
    let mut driver = FrameDriver::new(engine, audio, 80, 60);
    driver.tick(std::time::Instant::now());

    assert_eq!(driver.score(), 1);
    assert_eq!(driver.audio_mut().music_status(), MusicStatus::Playing);
    assert_eq!(driver.audio().graph().oneshot_count(), 1);

    driver.select_level("level02");
    assert_eq!(driver.audio_mut().music_status(), MusicStatus::Stopped);
    assert!(!driver.started());
}
