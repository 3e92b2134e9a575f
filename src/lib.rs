pub mod models;
pub mod services;
#[cfg(feature = "desktop")]
pub mod api;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Instant;
use tracing::info;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling;
use tracing_subscriber::{
    fmt::{self, writer::BoxMakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

static PROCESS_START: OnceLock<Instant> = OnceLock::new();
static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

const LOG_PREFIX: &str = "headline_detector_";
const LOGS_KEPT: usize = 30;

pub(crate) fn startup_elapsed_ms() -> u128 {
    PROCESS_START
        .get()
        .map(|t| t.elapsed().as_millis())
        .unwrap_or(0)
}

fn env_flag(key: &str) -> bool {
    matches!(
        std::env::var(key).as_deref(),
        Ok("1") | Ok("true") | Ok("TRUE")
    )
}

fn env_filter_or(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Console sink for log events.
struct Console {
    writer: BoxMakeWriter,
    ansi: bool,
    target: bool,
}

impl Console {
    /// Colored stdout while developing, plain stderr in release builds.
    fn for_build() -> Self {
        if cfg!(debug_assertions) {
            Self { writer: BoxMakeWriter::new(std::io::stdout), ansi: true, target: true }
        } else {
            Self { writer: BoxMakeWriter::new(std::io::stderr), ansi: false, target: true }
        }
    }

    /// stderr only, so stdout stays clean for verdicts and `--json`.
    fn terminal() -> Self {
        Self { writer: BoxMakeWriter::new(std::io::stderr), ansi: false, target: false }
    }
}

/// Install the global subscriber. A second call is a no-op.
fn install_subscriber(env_filter: EnvFilter, file: Option<NonBlocking>, console: Option<Console>) {
    let file_layer = file.map(|writer| {
        fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
    });
    let console_layer = console.map(|c| {
        fmt::layer()
            .with_writer(c.writer)
            .with_ansi(c.ansi)
            .with_target(c.target)
    });

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init();
}

/// Desktop logging: one timestamped file per session plus the build's console sink.
pub fn init_logging() {
    PROCESS_START.get_or_init(Instant::now);
    let env_filter = env_filter_or("info");

    if env_flag("HEADLINE_DETECTOR_DISABLE_FILE_LOG") {
        install_subscriber(env_filter, None, Some(Console::for_build()));
        info!("File logging disabled via HEADLINE_DETECTOR_DISABLE_FILE_LOG");
        return;
    }

    let logs_dir = match std::env::var("HEADLINE_DETECTOR_LOG_DIR") {
        Ok(p) if !p.trim().is_empty() => PathBuf::from(p),
        _ => get_logs_dir(),
    };

    if let Err(e) = fs::create_dir_all(&logs_dir) {
        eprintln!("Failed to create logs directory: {}", e);
        install_subscriber(env_filter, None, Some(Console::for_build()));
        info!("Falling back to console-only logging (log dir not writable)");
        return;
    }

    let log_filename = format!("{}{}.log", LOG_PREFIX, chrono::Local::now().format("%Y%m%d_%H%M%S"));
    let (file_writer, file_guard) =
        tracing_appender::non_blocking(rolling::never(&logs_dir, &log_filename));
    let _ = LOG_GUARD.set(file_guard);

    // Release builds have no console attached; the file is the only sink.
    let console = cfg!(debug_assertions).then(Console::for_build);
    install_subscriber(env_filter, Some(file_writer), console);

    info!("=== Headline Detector Started ===");
    info!("Log file: {}/{}", logs_dir.display(), log_filename);
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!(startup_ms = startup_elapsed_ms(), "logging.initialized");

    if !env_flag("HEADLINE_DETECTOR_DISABLE_LOG_CLEANUP") {
        std::thread::spawn(move || cleanup_old_logs(&logs_dir, LOGS_KEPT));
    }
}

/// Terminal logging for the `check_headline` binary.
pub fn init_cli_logging(default_level: &str) {
    PROCESS_START.get_or_init(Instant::now);
    install_subscriber(env_filter_or(default_level), None, Some(Console::terminal()));
}

fn get_logs_dir() -> PathBuf {
    if cfg!(debug_assertions) {
        return PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("logs");
    }
    dirs::data_local_dir()
        .map(|d| d.join("headline-detector").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

fn cleanup_old_logs(logs_dir: &Path, keep: usize) {
    let is_session_log = |name: &str| name.starts_with(LOG_PREFIX) && name.ends_with(".log");
    match services::retention::prune_oldest(logs_dir, keep, is_session_log) {
        Ok(0) => {}
        Ok(removed) => info!(removed, "logging.cleanup"),
        Err(e) => tracing::warn!(error = %e, "logging.cleanup_failed"),
    }
}

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use services::{ConfigStore, DetectorSources, HeadlineDetector};
    use tauri::Manager;

    init_logging();
    info!("Initializing Tauri application...");

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .setup(|app| {
            let store = ConfigStore::default_config_dir()
                .map(ConfigStore::new)
                .ok_or("No config directory available on this platform")?;
            let config = store.load()?;
            let sources = DetectorSources::default().resolve(&config);
            // Without a model the tool is unusable: abort startup.
            let detector = HeadlineDetector::load(&sources)?;
            app.manage(detector);
            app.manage(store);
            info!(startup_ms = startup_elapsed_ms(), model = %sources.model_path.display(), "tauri.setup");
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            api::check_headline,
            api::get_page_info,
            api::get_config,
            api::save_config,
            api::report_frontend_ready,
        ])
        .on_window_event(|window, event| {
            if let tauri::WindowEvent::CloseRequested { .. } = event {
                info!("Window close requested: {}", window.label());
            }
            if let tauri::WindowEvent::Destroyed = event {
                info!("=== Headline Detector Shutting Down ===");
            }
        })
        .run(tauri::generate_context!())
        .expect("error while running tauri application");

    info!("=== Headline Detector Exited ===");
}
