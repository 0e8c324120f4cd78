//! Configuration file loading with precedence handling.

use crate::gesture::DEFAULT_WHEEL_GESTURE_END;
use crate::session::SessionOptions;
use crate::viewport::{
    ViewportOptions, DEFAULT_PRESET_ZOOM_FACTORS, DEFAULT_SCROLLBAR_WIDTH, DEFAULT_TOOLBAR_HEIGHT,
};
use crate::zoom::{ZoomBehavior, ZoomCoordinator};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "PDFPANE_CONFIG";

/// Environment variable overriding the default zoom.
pub const DEFAULT_ZOOM_ENV_VAR: &str = "PDFPANE_DEFAULT_ZOOM";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax or unknown fields.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// The preset zoom list is empty, unsorted or not positive.
    #[error("Invalid preset zoom factors {factors:?}: {reason}")]
    InvalidZoomFactors {
        /// The rejected list.
        factors: Vec<f64>,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// The default zoom is not a positive number.
    #[error("Invalid default zoom {0}")]
    InvalidDefaultZoom(f64),
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/pdfpane/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Zoom factors stepped through by zoom in/out.
    #[serde(default)]
    pub preset_zoom_factors: Option<Vec<f64>>,

    /// Zoom used when a document first loads.
    #[serde(default)]
    pub default_zoom: Option<f64>,

    /// Scrollbar thickness in pixels.
    #[serde(default)]
    pub scrollbar_width: Option<f64>,

    /// Toolbar height in pixels.
    #[serde(default)]
    pub toolbar_height: Option<f64>,

    /// Quiet period that ends a ctrl-wheel pinch, in milliseconds.
    #[serde(default)]
    pub wheel_gesture_end_ms: Option<u64>,

    /// How the document zoom follows the host zoom.
    #[serde(default)]
    pub zoom_behavior: Option<ZoomBehavior>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Ascending zoom factors.
    pub preset_zoom_factors: Vec<f64>,
    /// Initial zoom.
    pub default_zoom: f64,
    /// Scrollbar thickness.
    pub scrollbar_width: f64,
    /// Toolbar height.
    pub toolbar_height: f64,
    /// Ctrl-wheel pinch quiet period.
    pub wheel_gesture_end: Duration,
    /// Host zoom behavior.
    pub zoom_behavior: ZoomBehavior,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            preset_zoom_factors: DEFAULT_PRESET_ZOOM_FACTORS.to_vec(),
            default_zoom: 1.0,
            scrollbar_width: DEFAULT_SCROLLBAR_WIDTH,
            toolbar_height: DEFAULT_TOOLBAR_HEIGHT,
            wheel_gesture_end: DEFAULT_WHEEL_GESTURE_END,
            zoom_behavior: ZoomBehavior::default(),
            log_file_path: default_log_path(),
        }
    }
}

impl ResolvedConfig {
    /// Session parameters for this configuration.
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            viewport: ViewportOptions {
                preset_zoom_factors: self.preset_zoom_factors.clone(),
                default_zoom: self.default_zoom,
                scrollbar_width: self.scrollbar_width,
                toolbar_height: self.toolbar_height,
            },
            wheel_gesture_end: self.wheel_gesture_end,
        }
    }

    /// A zoom coordinator for a host currently at `browser_zoom`.
    pub fn zoom_coordinator(&self, browser_zoom: f64) -> ZoomCoordinator {
        ZoomCoordinator::new(self.zoom_behavior, browser_zoom)
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/pdfpane/pdfpane.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("pdfpane").join("pdfpane.log")
    } else {
        PathBuf::from("pdfpane.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/pdfpane/config.toml` on Unix, appropriate path on other platforms.
/// Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("pdfpane").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `PDFPANE_CONFIG` environment variable
/// 3. Default path `~/.config/pdfpane/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Merge config file into defaults to create resolved config.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        preset_zoom_factors: config
            .preset_zoom_factors
            .unwrap_or(defaults.preset_zoom_factors),
        default_zoom: config.default_zoom.unwrap_or(defaults.default_zoom),
        scrollbar_width: config.scrollbar_width.unwrap_or(defaults.scrollbar_width),
        toolbar_height: config.toolbar_height.unwrap_or(defaults.toolbar_height),
        wheel_gesture_end: config
            .wheel_gesture_end_ms
            .map(Duration::from_millis)
            .unwrap_or(defaults.wheel_gesture_end),
        zoom_behavior: config.zoom_behavior.unwrap_or(defaults.zoom_behavior),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `PDFPANE_DEFAULT_ZOOM`: Override default zoom. Unparseable values are logged and
///   ignored.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(raw) = std::env::var(DEFAULT_ZOOM_ENV_VAR) {
        match raw.trim().parse::<f64>() {
            Ok(zoom) => config.default_zoom = zoom,
            Err(err) => warn!(value = %raw, error = %err, "ignoring invalid PDFPANE_DEFAULT_ZOOM"),
        }
    }

    config
}

/// Apply CLI argument overrides to resolved config.
///
/// Only applies overrides for flags that were explicitly set by the user.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    default_zoom_override: Option<f64>,
) -> ResolvedConfig {
    if let Some(zoom) = default_zoom_override {
        config.default_zoom = zoom;
    }

    config
}

/// Check the resolved values.
///
/// # Errors
///
/// Returns `ConfigError::InvalidZoomFactors` for an empty, unsorted or non-positive
/// preset list and `ConfigError::InvalidDefaultZoom` for a non-positive default zoom.
pub fn validate_config(config: ResolvedConfig) -> Result<ResolvedConfig, ConfigError> {
    let factors = &config.preset_zoom_factors;
    let reason = if factors.is_empty() {
        Some("list is empty")
    } else if factors.iter().any(|f| !f.is_finite() || *f <= 0.0) {
        Some("factors must be positive")
    } else if factors.windows(2).any(|pair| pair[0] >= pair[1]) {
        Some("factors must be strictly ascending")
    } else {
        None
    };

    if let Some(reason) = reason {
        return Err(ConfigError::InvalidZoomFactors {
            factors: factors.clone(),
            reason,
        });
    }

    if !config.default_zoom.is_finite() || config.default_zoom <= 0.0 {
        return Err(ConfigError::InvalidDefaultZoom(config.default_zoom));
    }

    Ok(config)
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
