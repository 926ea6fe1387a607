use std::{fs, path::PathBuf, process};

use clap::Parser;
use embassy_executor::Spawner;
use embassy_time::{Duration, Instant, Timer};
use glance_core::{
    content::DEFAULT_TEXT,
    engine::{EngineConfig, PlaybackEngine},
    settings::SettingsStore,
};
use log::{LevelFilter, error, info, warn};

use file_settings::FileSettingsStore;
use settings_sync::SettingsSyncState;
use stdin_input::StdinInput;
use terminal::TerminalPresenter;

#[path = "main/file_settings.rs"]
mod file_settings;
#[path = "main/settings_sync.rs"]
mod settings_sync;
#[path = "main/stdin_input.rs"]
mod stdin_input;
#[path = "main/terminal.rs"]
mod terminal;

const SETTINGS_SAVE_DEBOUNCE_MS: u64 = 1_500;
const WPM_REPORT_INTERVAL: Duration = Duration::from_secs(5);
const ORP_ANCHOR_COLUMN: usize = 12;

#[derive(Parser, Debug)]
#[command(version, about = "Rapid serial visual presentation reader for the terminal")]
struct Cli {
    /// UTF-8 text file to read. The built-in sample is used when omitted.
    path: Option<PathBuf>,
    /// Starting reading speed; overrides the saved value.
    #[arg(long)]
    wpm: Option<u16>,
    /// File holding the persisted reading speed.
    #[arg(long)]
    settings: Option<PathBuf>,
}

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse();

    let text = match cli.path.as_deref() {
        Some(path) => match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                error!("could not read {}: {err}", path.display());
                process::exit(1);
            }
        },
        None => DEFAULT_TEXT.to_string(),
    };

    let config = EngineConfig::default();
    let mut engine = PlaybackEngine::new(TerminalPresenter::new(config.wpm), config);

    let mut settings_store = cli.settings.map(FileSettingsStore::new);
    match settings_store.as_mut() {
        Some(store) => match store.load() {
            Ok(Some(saved)) => {
                engine.apply_persisted_settings(saved);
                info!("settings restored from {}", store.path().display());
            }
            Ok(None) => info!("no saved settings at {}", store.path().display()),
            Err(err) => warn!("failed to read saved settings; using defaults: {err}"),
        },
        None => info!("no settings file given; speed changes will not persist"),
    }
    if let Some(wpm) = cli.wpm {
        engine.set_wpm(wpm);
        if engine.wpm() != wpm {
            warn!("wpm={} out of range, clamped to {}", wpm, engine.wpm());
        }
    }

    engine.set_text(&text);
    let mut settings_sync = SettingsSyncState::new(engine.persisted_settings());
    let mut input = StdinInput::spawn();

    info!(
        "Reader started: words={} specials={} wpm={} (keys: enter/p play, s stop, h/l word, j/k sentence, +/- speed, q quit)",
        engine.sequence().word_count(),
        engine.sequence().special_count(),
        engine.wpm()
    );

    let loop_start = Instant::now();
    let mut report_words = 0u64;
    let mut report_start = Instant::now();

    loop {
        let now_ms = loop_start.elapsed().as_millis();

        engine.process_inputs(&mut input, now_ms);
        engine.tick(now_ms);
        let wpm = engine.wpm();
        engine.listener_mut().set_wpm(wpm);

        settings_sync.track_current(engine.persisted_settings(), now_ms);
        settings_sync.flush_if_due(settings_store.as_mut(), now_ms);

        report_words = report_words.saturating_add(engine.drain_word_updates() as u64);

        let elapsed = report_start.elapsed();
        if elapsed >= WPM_REPORT_INTERVAL {
            let elapsed_ms = elapsed.as_millis().max(1);
            if report_words > 0 {
                let wpm_x100 = report_words * 6_000_000 / elapsed_ms;
                info!(
                    "effective_wpm={}.{:02} words={} elapsed_ms={}",
                    wpm_x100 / 100,
                    wpm_x100 % 100,
                    report_words,
                    elapsed_ms
                );
            }

            report_words = 0;
            report_start = Instant::now();
        }

        if should_exit(input.quit_requested(), input.closed(), engine.is_playing()) {
            settings_sync.flush_now(settings_store.as_mut(), now_ms);
            engine.listener_mut().finish();
            info!("Reader stopped at item {}", engine.current_index());
            process::exit(0);
        }

        Timer::after_millis(1).await;
    }
}

/// Quit on request. Once stdin is gone nothing can resume playback, so the
/// reader also stops as soon as it is no longer playing.
fn should_exit(quit_requested: bool, input_closed: bool, playing: bool) -> bool {
    quit_requested || (input_closed && !playing)
}
