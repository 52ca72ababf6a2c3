#![deny(clippy::large_stack_frames)]

use std::{
    fs::{self, OpenOptions},
    io::IsTerminal,
    path::PathBuf,
};

use aeroread_core::{
    reader::{FrameResult, ReaderSession},
    session::bookmark::MemoryBookmarks,
    settings::{ReaderConfig, SettingsStore},
};
use anyhow::Context;
use embassy_executor::Spawner;
use embassy_time::{Duration, Instant, Ticker};
use log::{error, info, warn};

use chapters::BookChapters;
use paths::AppPaths;
use settings_file::TomlSettingsStore;
use settings_sync::SettingsSyncState;
use terminal::{TerminalInput, TerminalScreen};

#[path = "main/chapters.rs"]
mod chapters;
#[path = "main/paths.rs"]
mod paths;
#[path = "main/settings_file.rs"]
mod settings_file;
#[path = "main/settings_sync.rs"]
mod settings_sync;
#[path = "main/terminal.rs"]
mod terminal;

const FRAME_INTERVAL_MS: u64 = 16;
const SETTINGS_SAVE_DEBOUNCE_MS: u64 = 1_500;

type Session = ReaderSession<BookChapters, MemoryBookmarks, TerminalInput>;

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let paths = AppPaths::new();
    init_logging(&paths);

    if let Err(err) = run(&paths).await {
        error!("aeroread: {:#}", err);
        eprintln!("aeroread: {err:#}");
        std::process::exit(1);
    }
}

/// Logs go to stderr when it is redirected, otherwise to a file so they do
/// not land on the reading screen.
fn init_logging(paths: &AppPaths) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

    if std::io::stderr().is_terminal() {
        let file = fs::create_dir_all(&paths.config_dir).and_then(|()| {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&paths.log_file)
        });
        match file {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(_) => {
                builder.filter_level(log::LevelFilter::Off);
            }
        }
    }

    builder.init();
}

async fn run(paths: &AppPaths) -> anyhow::Result<()> {
    let files: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    let chapters = if files.is_empty() {
        info!("boot: no files given, reading the built-in sample");
        BookChapters::sample()
    } else {
        info!("boot: {} chapter file(s)", files.len());
        BookChapters::from_paths(files)
    };

    let mut settings_store = TomlSettingsStore::new(&paths.settings_file);
    let saved = match settings_store.load() {
        Ok(Some(saved)) => {
            info!("settings restored from {}", settings_store.path().display());
            Some(saved)
        }
        Ok(None) => {
            info!("no saved settings; using defaults");
            None
        }
        Err(err) => {
            warn!("failed to read saved settings ({}); using defaults", err);
            None
        }
    };

    let bookmarks = MemoryBookmarks::with(saved.as_ref().and_then(|s| s.bookmark.clone()));
    let mut session: Box<Session> = Box::new(
        ReaderSession::new(
            chapters,
            0,
            bookmarks,
            TerminalInput,
            ReaderConfig::default(),
        )
        .context("failed to open the text")?,
    );
    if let Some(saved) = saved {
        session.apply_persisted_settings(saved);
    }

    let mut settings_sync = SettingsSyncState::new(session.persisted_settings());
    let mut screen = TerminalScreen::enter().context("failed to set up the terminal")?;

    info!(
        "reader started: wpm={} group={} fingerprint={}",
        session.config().wpm,
        session.config().group_size.get(),
        session.fingerprint()
    );

    let loop_start = Instant::now();
    let mut ticker = Ticker::every(Duration::from_millis(FRAME_INTERVAL_MS));
    loop {
        let now_ms = loop_start.elapsed().as_millis();

        if session.tick(now_ms) == FrameResult::RenderRequested {
            screen.render(&session.view()).context("failed to draw")?;
        }

        settings_sync.track_current(session.persisted_settings(), now_ms);
        if session.exit_requested() {
            settings_sync.flush(&mut settings_store, now_ms);
            break;
        }
        settings_sync.flush_if_due(&mut settings_store, now_ms);

        ticker.next().await;
    }

    drop(screen);
    if let Some(stats) = session.history().stats() {
        info!(
            "history: sessions={} avg_wpm={} words={} time_ms={}",
            stats.session_count, stats.average_wpm, stats.total_words, stats.total_time_ms
        );
        println!(
            "Read {} words at {} wpm on average.",
            stats.total_words, stats.average_wpm
        );
    }
    Ok(())
}
