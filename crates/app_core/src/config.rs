//! Application configuration

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub dialog: DialogConfig,
    pub view: ViewConfig,
}

/// File picker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogConfig {
    /// Directory the picker opens in; the working directory when unset or gone
    pub initial_directory: Option<PathBuf>,
    /// Filters in "Label|*.a;*.b" form
    pub filter: String,
    /// 1-based filter selected on open
    pub filter_index: usize,
    /// Entries stat'ed per metadata backfill
    pub metadata_batch: usize,
    /// strftime format for the modified column
    pub time_format: String,
    pub view_mode: ViewMode,
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            initial_directory: None,
            filter: "All images(*.png,*.hdr,*.jpg)|*.png;*.hdr;*.jpg".to_string(),
            filter_index: 1,
            metadata_batch: app_fs::DEFAULT_BATCH,
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            view_mode: ViewMode::List,
        }
    }
}

impl DialogConfig {
    /// The configured time format, or the default when chrono cannot render it
    pub fn effective_time_format(&self) -> &str {
        if app_fs::is_valid_time_format(&self.time_format) {
            &self.time_format
        } else {
            tracing::warn!(
                "Invalid time format {:?}, using {:?}",
                self.time_format,
                DEFAULT_TIME_FORMAT
            );
            DEFAULT_TIME_FORMAT
        }
    }
}

/// Viewer shell configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Device wheel units per notch
    pub wheel_step: i32,
    /// Store the last picked directory and filter back into the config
    pub remember_directory: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            wheel_step: 120,
            remember_directory: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewMode {
    #[serde(rename = "list")]
    List,
    #[serde(rename = "details")]
    Details,
}

impl AppConfig {
    /// Load configuration from the default location
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`, falling back to defaults when missing
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            tracing::info!("Configuration loaded from {:?}", path);
            Ok(config)
        } else {
            tracing::info!("Using default configuration");
            Ok(Self::default())
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        tracing::info!("Configuration saved to {:?}", path);
        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> PathBuf {
        ProjectDirs::from("com", "PlotView", "PlotView")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("./config.toml"))
    }
}
