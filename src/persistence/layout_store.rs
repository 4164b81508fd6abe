//! TOML-backed storage for layout and UI configuration.
//!
//! Files live under the platform config directory
//! (`<config dir>/chartdeck/`). Loading degrades to defaults on missing or
//! unparsable files; only saving surfaces errors to the caller.

use crate::persistence::{LayoutConfig, UIConfig};
use std::path::PathBuf;
use tracing::{debug, info, warn};

const CONFIG_DIR_NAME: &str = "chartdeck";
const LAYOUT_FILE: &str = "layout.toml";
const UI_CONFIG_FILE: &str = "ui.toml";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("config io failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("config serialization failed: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone)]
pub struct LayoutStore {
    base_dir: PathBuf,
}

impl LayoutStore {
    /// Store rooted at the platform config directory.
    pub fn open_default() -> Self {
        let base_dir = dirs::config_dir()
            .unwrap_or_else(|| {
                warn!("Could not determine config directory, using current directory");
                PathBuf::from(".")
            })
            .join(CONFIG_DIR_NAME);
        Self { base_dir }
    }

    /// Store rooted at an explicit directory.
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    fn layout_path(&self) -> PathBuf {
        self.base_dir.join(LAYOUT_FILE)
    }

    fn ui_config_path(&self) -> PathBuf {
        self.base_dir.join(UI_CONFIG_FILE)
    }

    /// Creates the config directory and default files on first run.
    pub async fn ensure_default(&self) -> Result<(), StoreError> {
        if !tokio::fs::try_exists(&self.base_dir).await? {
            info!("Creating default configuration in {:?}", self.base_dir);
            tokio::fs::create_dir_all(&self.base_dir).await?;
        }

        if !tokio::fs::try_exists(self.layout_path()).await? {
            self.save(&LayoutConfig::default(), &UIConfig::default())
                .await?;
        }
        Ok(())
    }

    /// Loads the layout, falling back to defaults on any failure.
    pub async fn load_layout(&self) -> LayoutConfig {
        match tokio::fs::read_to_string(self.layout_path()).await {
            Ok(content) => match toml::from_str(&content) {
                Ok(layout) => {
                    debug!("Loaded layout from {:?}", self.layout_path());
                    layout
                }
                Err(e) => {
                    warn!("Failed to parse layout file, using default: {}", e);
                    LayoutConfig::default()
                }
            },
            Err(e) => {
                warn!("Failed to read layout file, using default: {}", e);
                LayoutConfig::default()
            }
        }
    }

    /// Loads the UI configuration, falling back to defaults on any failure.
    pub async fn load_ui_config(&self) -> UIConfig {
        match tokio::fs::read_to_string(self.ui_config_path()).await {
            Ok(content) => match toml::from_str(&content) {
                Ok(ui_config) => ui_config,
                Err(e) => {
                    warn!("Failed to parse UI config file, using default: {}", e);
                    UIConfig::default()
                }
            },
            Err(e) => {
                warn!("Failed to read UI config file, using default: {}", e);
                UIConfig::default()
            }
        }
    }

    /// Writes both configuration files.
    pub async fn save(&self, layout: &LayoutConfig, ui_config: &UIConfig) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.base_dir).await?;

        let layout_content = toml::to_string_pretty(layout)?;
        tokio::fs::write(self.layout_path(), layout_content).await?;

        let ui_content = toml::to_string_pretty(ui_config)?;
        tokio::fs::write(self.ui_config_path(), ui_content).await?;

        debug!("Configuration saved to {:?}", self.base_dir);
        Ok(())
    }
}
