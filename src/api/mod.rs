// Tauri Commands
// Thin layer between the webview and the detector state

use tauri::State;
use tracing::{error, info};

use crate::models::{CheckOutcome, PageInfo};
use crate::services::{AppConfig, ConfigStore, HeadlineDetector};
use crate::startup_elapsed_ms;

#[tauri::command]
pub fn check_headline(headline: String, detector: State<'_, HeadlineDetector>) -> Result<CheckOutcome, String> {
    detector.check(&headline).map_err(|e| {
        error!(error = %e, "check_headline.failed");
        e.to_string()
    })
}

#[tauri::command]
pub fn get_page_info() -> PageInfo {
    PageInfo::default()
}

#[tauri::command]
pub fn get_config(store: State<'_, ConfigStore>) -> Result<AppConfig, String> {
    store.load()
}

/// Persist settings. Model and stopword paths take effect on next launch.
#[tauri::command]
pub fn save_config(config: AppConfig, store: State<'_, ConfigStore>) -> Result<(), String> {
    store.save(&config)?;
    info!(path = %store.config_file().display(), "config.saved");
    Ok(())
}

#[tauri::command]
pub fn report_frontend_ready(phase: Option<String>, client_ms: Option<f64>) -> Result<(), String> {
    info!(
        startup_ms = startup_elapsed_ms(),
        phase = phase.as_deref().unwrap_or("unknown"),
        client_ms = client_ms.unwrap_or(-1.0),
        "frontend.ready"
    );
    Ok(())
}
