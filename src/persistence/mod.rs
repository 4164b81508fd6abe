//! # Persistence Module
//!
//! Data models and infrastructure for chartdeck's configuration management.
//! Panel placements are held in memory by the [`config_portal::ConfigPortal`]
//! and written to TOML files by the [`layout_store::LayoutStore`], driven by
//! the worker in [`persistence_worker`].
//!
//! Missing or corrupt configuration gracefully degrades to defaults rather
//! than preventing application startup.

pub mod config_portal;
pub mod layout_store;
pub mod persistence_worker;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Persisted position of a single panel, in screen points.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct PanelPlacement {
    pub x: f32,
    pub y: f32,
}

/// Registry of panel placements keyed by panel key.
///
/// Panels missing from the map fall back to their registry defaults, so a
/// layout file from an older build stays loadable.
#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct LayoutConfig {
    pub panels: HashMap<String, PanelPlacement>,
    /// Stamped by the store on every save.
    pub saved_at: Option<DateTime<Local>>,
}

impl LayoutConfig {
    pub fn placement(&self, key: &str) -> Option<PanelPlacement> {
        self.panels.get(key).copied()
    }
}

/// UI-specific configuration.
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct UIConfig {
    /// Target frames per second for UI rendering.
    pub fps: u8,
}

impl Default for UIConfig {
    fn default() -> Self {
        Self { fps: 30 }
    }
}
