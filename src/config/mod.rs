//! Configuration module.
//!
//! Settings resolve through a precedence chain: built-in defaults, then the TOML config
//! file, then environment variables, then command-line flags.

pub mod loader;

pub use loader::{
    apply_cli_overrides, apply_env_overrides, default_config_path, default_log_path,
    load_config_file, load_config_with_precedence, merge_config, validate_config, ConfigError,
    ConfigFile, ResolvedConfig,
};

/// Run the full precedence chain.
///
/// # Errors
///
/// Returns an error if a config file exists but cannot be read or parsed, or if the
/// resolved values are invalid.
pub fn resolve(
    config_path: Option<std::path::PathBuf>,
    default_zoom_override: Option<f64>,
) -> Result<ResolvedConfig, ConfigError> {
    let file = load_config_with_precedence(config_path)?;
    let merged = merge_config(file);
    let with_env = apply_env_overrides(merged);
    validate_config(apply_cli_overrides(with_env, default_zoom_override))
}
