use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{DiagramError, Result};
use crate::interaction::{DEFAULT_HANDLE_SIZE, Tool};

const SETTINGS_FILE: &str = "taskboard.toml";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Last document opened or saved.
    pub file_path: String,
    pub handle_size: f32,
    pub arrow_size: f32,
    /// Tool name as shown in the tool strip, e.g. `Select` or `Frame`.
    pub default_tool: String,
    pub log_filter: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            file_path: "taskboard.json".to_string(),
            handle_size: DEFAULT_HANDLE_SIZE,
            arrow_size: 15.0,
            default_tool: Tool::Select.name().to_string(),
            log_filter: "info".to_string(),
        }
    }
}

impl AppSettings {
    /// Falls back to `Select` for unknown names.
    pub fn tool(&self) -> Tool {
        Tool::from_name(&self.default_tool).unwrap_or_else(|| {
            warn!(name = %self.default_tool, "unknown default tool");
            Tool::Select
        })
    }
}

/// `$HOME/.config/taskboard.toml`, or `settings.toml` in the working
/// directory when no home is known.
pub fn settings_path() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".config").join(SETTINGS_FILE),
        None => PathBuf::from("settings.toml"),
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "toml")
}

fn parse_settings(path: &Path, text: &str) -> Result<AppSettings> {
    let from_toml = || toml::from_str::<AppSettings>(text).map_err(|e| e.to_string());
    let from_json = || serde_json::from_str::<AppSettings>(text).map_err(|e| e.to_string());
    let parsed = if is_toml(path) {
        from_toml().or_else(|_| from_json())
    } else {
        from_json().or_else(|_| from_toml())
    };
    parsed.map_err(|e| DiagramError::Settings(format!("{}: {e}", path.display())))
}

pub fn load_settings(path: &Path) -> Result<AppSettings> {
    let text = std::fs::read_to_string(path)?;
    parse_settings(path, &text)
}

/// First of `candidates` that exists and parses, else the defaults.
///
/// Files that exist but fail to load are skipped and returned alongside, so
/// the caller can report them once logging is up.
pub fn load_first(candidates: &[PathBuf]) -> (AppSettings, Vec<DiagramError>) {
    let mut skipped = Vec::new();
    for path in candidates.iter().filter(|p| p.exists()) {
        match load_settings(path) {
            Ok(settings) => {
                debug!(path = %path.display(), "settings loaded");
                return (settings, skipped);
            }
            Err(err) => skipped.push(err),
        }
    }
    (AppSettings::default(), skipped)
}

/// Loads from [`settings_path`], then `./settings.toml`, then defaults.
pub fn load_or_default() -> (AppSettings, Vec<DiagramError>) {
    load_first(&[settings_path(), PathBuf::from("settings.toml")])
}

pub fn save_settings(path: &Path, settings: &AppSettings) -> Result<()> {
    let text = if is_toml(path) {
        toml::to_string_pretty(settings).map_err(|e| DiagramError::Settings(e.to_string()))?
    } else {
        serde_json::to_string_pretty(settings).map_err(|e| DiagramError::Settings(e.to_string()))?
    };
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(path, text)?;
    Ok(())
}
