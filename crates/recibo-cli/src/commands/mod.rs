//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod process;

use std::path::{Path, PathBuf};

use tracing::debug;

use recibo_core::models::config::ReciboConfig;

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("recibo")
        .join("config.json")
}

/// Resolve the configuration file: `--config` if given, else the default path.
pub fn config_path(explicit: Option<&str>) -> PathBuf {
    explicit
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path)
}

/// Load configuration with environment overrides applied.
///
/// An explicit path must exist; the default path is optional.
pub fn load_config(explicit: Option<&str>) -> anyhow::Result<ReciboConfig> {
    let path = config_path(explicit);
    let config = if path.exists() {
        debug!("Loading configuration from {}", path.display());
        ReciboConfig::from_file(&path)?
    } else if explicit.is_some() {
        anyhow::bail!("Config file not found: {}", path.display());
    } else {
        ReciboConfig::default()
    };
    Ok(config.apply_env_overrides())
}

/// File extensions the pipeline accepts.
pub fn is_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            matches!(
                e.to_lowercase().as_str(),
                "pdf" | "png" | "jpg" | "jpeg" | "tif" | "tiff" | "bmp" | "webp"
            )
        })
        .unwrap_or(false)
}
