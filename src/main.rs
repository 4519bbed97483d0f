use std::fs;
use std::path::{Path, PathBuf};

use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::window::WindowResolution;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use skirmish::game::GamePlugin;

const LOG_DIR: &str = "logs";
const LOG_PREFIX: &str = "skirmish";
/// Older session logs beyond this count are deleted at startup
const KEPT_SESSION_LOGS: usize = 25;
const DEFAULT_LOG_FILTER: &str = "wgpu=error,bevy_render=info,bevy_ecs=info,skirmish=info";

/// Install the tracing subscriber: stdout always, plus a per-session file when
/// the log directory is usable. Returns the session log path.
fn init_logging() -> Option<PathBuf> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let log_dir = PathBuf::from(LOG_DIR);
    if let Err(err) = fs::create_dir_all(&log_dir) {
        let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
        tracing_subscriber::registry().with(filter).with(stdout_layer).init();
        warn!("Session log disabled, cannot create {:?}: {}", log_dir, err);
        return None;
    }
    prune_session_logs(&log_dir, KEPT_SESSION_LOGS);

    let file_name = format!("{}_{}.log", LOG_PREFIX, chrono::Local::now().format("%Y%m%d_%H%M%S"));
    // One file per session; no rotation while the game runs
    let appender = RollingFileAppender::new(Rotation::NEVER, &log_dir, &file_name);
    let file_layer = fmt::layer().with_writer(appender).with_ansi(false);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();
    Some(log_dir.join(file_name))
}

fn is_session_log(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with(LOG_PREFIX) && name.ends_with(".log"))
}

fn prune_session_logs(log_dir: &Path, keep: usize) {
    let Ok(entries) = fs::read_dir(log_dir) else { return };
    let mut logs: Vec<_> = entries
        .filter_map(Result::ok)
        .filter(|entry| is_session_log(&entry.path()))
        .collect();
    if logs.len() <= keep {
        return;
    }

    // Oldest first
    logs.sort_by_key(|entry| entry.metadata().and_then(|meta| meta.modified()).ok());
    for entry in &logs[..logs.len() - keep] {
        let _ = fs::remove_file(entry.path());
    }
}

fn main() {
    match init_logging() {
        Some(path) => info!("Skirmish session log: {}", path.display()),
        None => info!("Skirmish starting without a session log"),
    }

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Skirmish: squad command".into(),
                        resolution: WindowResolution::new(1280, 720),
                        resizable: true,
                        ..default()
                    }),
                    ..default()
                })
                .build()
                // The subscriber above owns logging
                .disable::<LogPlugin>(),
        )
        .add_plugins(GamePlugin)
        .run();
}
