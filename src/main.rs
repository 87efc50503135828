use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use sysinfo::System;

use snake_audio::audio_system::{default_graph, AudioSessionManager};
use snake_audio::config::Config;
use snake_audio::frame::{FrameDriver, ScriptedEngine};
use snake_audio::AppResult;

const LOG_TARGET_STARTUP: &str = "snake_audio::startup";

/// Upper bound on waiting for each effect before the loop starts
const EFFECT_LOAD_TIMEOUT: Duration = Duration::from_secs(10);

/// Command-line arguments for snake-audio
#[derive(Parser, Debug)]
#[command(name = "snake-audio")]
#[command(about = "Snake game audio session driven by a scripted engine")]
#[command(version)]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the asset root (directory or http(s) URL)
    #[arg(short, long)]
    asset_root: Option<String>,

    /// Stop after this many frames
    #[arg(short, long)]
    frames: Option<u64>,

    /// Show the FPS / delta line
    #[arg(long)]
    show_perf: bool,
}

/// Initialize tracing with file rotation
///
/// Logs are written to `<config_dir>/SnakeAudio/logs/snake-audio.YYYY-MM-DD.log`.
/// Debug builds also log to the console.
fn initialize_tracing() {
    use tracing_appender::rolling;
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let log_dir = dirs::config_dir()
        .map(|dir| dir.join("SnakeAudio").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"));

    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Warning: Failed to create log directory: {}", e);
    }

    let file_appender = rolling::daily(&log_dir, "snake-audio.log");

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true);

    #[cfg(debug_assertions)]
    {
        let console_layer = fmt::layer()
            .with_writer(std::io::stdout)
            .with_ansi(true)
            .with_target(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .with(console_layer)
            .init();
    }

    #[cfg(not(debug_assertions))]
    {
        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();
    }

    tracing::info!("Log directory: {}", log_dir.display());
}

fn log_runtime_environment() {
    let mut system = System::new();
    system.refresh_cpu();

    let version = env!("CARGO_PKG_VERSION");
    let os_name = System::long_os_version()
        .or_else(System::name)
        .unwrap_or_else(|| "Unknown OS".to_string());
    let kernel = System::kernel_version().unwrap_or_else(|| "Unknown Kernel".to_string());
    let architecture = std::env::consts::ARCH;

    tracing::info!(target: LOG_TARGET_STARTUP, "Starting Snake Audio v{} on ({})", version, architecture);
    tracing::info!(target: LOG_TARGET_STARTUP, "Operating System: {} (kernel {})", os_name, kernel);
    tracing::debug!(target: LOG_TARGET_STARTUP, "CPUs: {}", system.cpus().len());
}

fn main() -> AppResult<()> {
    initialize_tracing();
    log_runtime_environment();

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load config")?;
    if let Some(root) = cli.asset_root {
        config.asset_root = root;
    }
    config.show_performance_info |= cli.show_perf;

    let audio = AudioSessionManager::open(config.session_settings(), default_graph());

    let tasks: Vec<_> = config
        .effects
        .iter()
        .map(|entry| (entry.event, audio.load_effect(entry.event, &entry.file)))
        .collect();
    for (event, task) in tasks {
        match task.wait_timeout(EFFECT_LOAD_TIMEOUT) {
            Some(Ok(())) => {}
            Some(Err(e)) => tracing::warn!("No effect for {}: {}", event, e),
            None => tracing::warn!("Effect for {} still loading from {}", event, task.location()),
        }
    }

    let engine = ScriptedEngine::new(
        config.screen_width,
        config.screen_height,
        config.demo_script.clone(),
    );
    let mut driver = FrameDriver::new(engine, audio, config.screen_width, config.screen_height);
    driver.set_show_performance_info(config.show_performance_info);
    driver.run(cli.frames);

    tracing::info!(
        "Final score: {}, music: {:?}",
        driver.score(),
        driver.audio_mut().music_status()
    );
    Ok(())
}
