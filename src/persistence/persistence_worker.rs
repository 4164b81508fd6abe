//! Async worker applying layout updates and driving saves.
//!
//! The UI thread queues [`LayoutAction`]s (fire-and-forget for drag results,
//! oneshot-acknowledged for explicit saves); the worker owns the portal
//! writes and file IO so the UI never blocks on persistence.

use super::config_portal::{ConfigPortal, ConfigResult, PortalAction};
use super::layout_store::{LayoutStore, StoreError};
use super::{LayoutConfig, PanelPlacement, UIConfig};
use chrono::Local;
use color_eyre::{eyre::eyre, Result};
use std::sync::Arc;
use tokio::sync::mpsc::{channel, Sender};
use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};

#[derive(Debug)]
pub enum LayoutAction {
    /// A drag session completed; record where the panel ended up.
    PanelMoved {
        key: String,
        placement: PanelPlacement,
    },
    /// Flush the current configuration to disk.
    SaveNow {
        response_tx: oneshot::Sender<Result<(), StoreError>>,
    },
}

pub struct PersistenceManager {
    tx: Sender<LayoutAction>,
    portal: Arc<ConfigPortal>,
    worker_handle: tokio::task::JoinHandle<()>,
    autosave_handle: tokio::task::JoinHandle<()>,
}

impl PersistenceManager {
    /// Loads configuration from the default store and spawns the worker and
    /// autosave tasks.
    pub async fn new() -> Result<Self> {
        Self::with_store(LayoutStore::open_default(), 60).await
    }

    pub async fn with_store(store: LayoutStore, autosave_secs: u64) -> Result<Self> {
        store
            .ensure_default()
            .await
            .map_err(|e| eyre!("Failed to prepare config directory: {}", e))?;

        let layout = store.load_layout().await;
        let ui_config = store.load_ui_config().await;
        info!(
            "Loaded layout with {} saved panel placements",
            layout.panels.len()
        );

        let portal = Arc::new(ConfigPortal::new(layout, ui_config));

        let (tx, mut rx) = channel::<LayoutAction>(64);
        let worker_portal = portal.clone();
        let worker_store = store.clone();
        let worker_handle = tokio::spawn(async move {
            while let Some(action) = rx.recv().await {
                match action {
                    LayoutAction::PanelMoved { key, placement } => {
                        debug!("Recording placement for panel {}: {:?}", key, placement);
                        let result = worker_portal.execute_portal_action(
                            PortalAction::WritePanelPlacement(key, placement),
                        );
                        if let ConfigResult::Failed(e) = result {
                            error!("Failed to record panel placement: {}", e);
                        }
                    }
                    LayoutAction::SaveNow { response_tx } => {
                        let result = save_snapshot(&worker_portal, &worker_store).await;
                        // Fire-and-forget callers drop the receiver.
                        if response_tx.send(result).is_err() {
                            debug!("Save response receiver dropped");
                        }
                    }
                }
            }
            debug!("Persistence worker channel closed");
        });

        let autosave_portal = portal.clone();
        let autosave_handle = tokio::spawn(async move {
            info!("Starting autosave task with interval: {}s", autosave_secs);
            let mut interval =
                tokio::time::interval(tokio::time::Duration::from_secs(autosave_secs));
            // The first tick fires immediately; skip it so startup does not
            // rewrite a file that was just loaded.
            interval.tick().await;

            loop {
                interval.tick().await;
                match save_snapshot(&autosave_portal, &store).await {
                    Ok(()) => debug!("Configuration autosaved successfully"),
                    Err(e) => error!("Failed to autosave configuration: {}", e),
                }
            }
        });

        Ok(Self {
            tx,
            portal,
            worker_handle,
            autosave_handle,
        })
    }

    pub fn sender(&self) -> Sender<LayoutAction> {
        self.tx.clone()
    }

    pub fn portal(&self) -> Arc<ConfigPortal> {
        self.portal.clone()
    }

    pub fn shutdown(&self) {
        self.worker_handle.abort();
        self.autosave_handle.abort();
    }
}

/// Snapshots the portal and writes it to disk.
async fn save_snapshot(portal: &ConfigPortal, store: &LayoutStore) -> Result<(), StoreError> {
    let layout = match portal.execute_portal_action(PortalAction::GetLayout) {
        ConfigResult::Layout(layout) => layout,
        other => {
            warn!("Could not retrieve valid layout for saving: {:?}", other);
            LayoutConfig::default()
        }
    };

    let ui_config = match portal.execute_portal_action(PortalAction::GetUIConfig) {
        ConfigResult::UIConfig(ui_config) => ui_config,
        other => {
            warn!("Could not retrieve valid UI config for saving: {:?}", other);
            UIConfig::default()
        }
    };

    let layout = LayoutConfig {
        saved_at: Some(Local::now()),
        ..layout
    };
    store.save(&layout, &ui_config).await
}
