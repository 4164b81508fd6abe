//! Central configuration hub with thread-safe access.
//!
//! The portal is the single source of truth for configuration shared between
//! the UI thread and the persistence tasks. Each section lives in its own
//! `Arc<RwLock<T>>` so layout updates do not contend with unrelated reads,
//! and all access goes through the action dispatch in
//! [`ConfigPortal::execute_portal_action`] so every operation uses the same
//! retry logic.

use crate::persistence::{LayoutConfig, PanelPlacement, UIConfig};
use crate::try_lock;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Configuration sections shared across threads.
#[derive(Default, Debug)]
pub struct ConfigPortal {
    /// Panel placements.
    pub layout: Arc<RwLock<LayoutConfig>>,

    /// User interface configuration.
    pub ui_config: Arc<RwLock<UIConfig>>,
}

impl ConfigPortal {
    pub fn new(layout: LayoutConfig, ui_config: UIConfig) -> Self {
        Self {
            layout: Arc::new(RwLock::new(layout)),
            ui_config: Arc::new(RwLock::new(ui_config)),
        }
    }

    /// Executes a configuration operation through the unified dispatch.
    ///
    /// Reads return cloned data; writes take owned data. Lock contention is
    /// retried with a bounded backoff and surfaces as
    /// [`ConfigResult::Failed`] rather than blocking indefinitely.
    pub fn execute_portal_action(&self, action: PortalAction) -> ConfigResult {
        let result = match action {
            PortalAction::GetLayout => {
                try_lock!(@read_lock_retry, self.layout.clone(), |guard: &LayoutConfig| {
                    ConfigResult::Layout(guard.clone())
                })
            }
            PortalAction::GetPanelPlacement(key) => {
                try_lock!(@read_lock_retry, self.layout.clone(), |guard: &LayoutConfig| {
                    ConfigResult::Placement(guard.placement(&key))
                })
            }
            PortalAction::WriteLayout(layout) => {
                try_lock!(@write_lock_retry, self.layout.clone(), |guard: &mut LayoutConfig| {
                    *guard = layout;
                })
            }
            PortalAction::WritePanelPlacement(key, placement) => {
                try_lock!(@write_lock_retry, self.layout.clone(), |guard: &mut LayoutConfig| {
                    guard.panels.insert(key, placement);
                })
            }

            PortalAction::GetUIConfig => {
                try_lock!(@read_lock_retry, self.ui_config.clone(), |guard: &UIConfig| {
                    ConfigResult::UIConfig(guard.clone())
                })
            }
            PortalAction::GetFps => {
                try_lock!(@read_lock_retry, self.ui_config.clone(), |guard: &UIConfig| {
                    ConfigResult::Fps(guard.fps)
                })
            }
            PortalAction::WriteUIConfig(ui_config) => {
                try_lock!(@write_lock_retry, self.ui_config.clone(), |guard: &mut UIConfig| {
                    *guard = ui_config;
                })
            }
            PortalAction::WriteFps(fps) => {
                try_lock!(@write_lock_retry, self.ui_config.clone(), |guard: &mut UIConfig| {
                    guard.fps = fps;
                })
            }
        };

        match result {
            Ok(res) => res,
            Err(e) => ConfigResult::Failed(e),
        }
    }
}

/// All configuration operations.
///
/// `Get*` reads return cloned data through [`ConfigResult`]; `Write*`
/// operations take owned data.
#[derive(Debug)]
pub enum PortalAction {
    GetLayout,
    GetPanelPlacement(String),
    WriteLayout(LayoutConfig),
    WritePanelPlacement(String, PanelPlacement),

    GetUIConfig,
    GetFps,
    WriteUIConfig(UIConfig),
    WriteFps(u8),
}

/// Type-safe return values for configuration operations.
#[derive(Debug)]
pub enum ConfigResult {
    Success,
    Layout(LayoutConfig),
    Placement(Option<PanelPlacement>),
    UIConfig(UIConfig),
    Fps(u8),
    Failed(Error),
}

/// Lock retry macro with timeout and logging.
///
/// Five attempts with 10ms delays, then [`Error::LockTimeout`] instead of
/// blocking indefinitely. Contention is logged for monitoring.
#[macro_export]
macro_rules! try_lock {
    // Write lock retry with timeout and error handling
    (@write_lock_retry, $accessor:expr, $operation:expr) => {{
        let mut attempts = 0;
        const MAX_ATTEMPTS: usize = 5;

        loop {
            match $accessor.try_write() {
                Ok(mut guard) => {
                    $operation(&mut *guard);
                    break Ok($crate::persistence::config_portal::ConfigResult::Success);
                }
                Err(e) => {
                    attempts += 1;
                    tracing::warn!(
                        "Write lock blocked: {} (attempt {}/{})",
                        e,
                        attempts,
                        MAX_ATTEMPTS
                    );

                    if attempts >= MAX_ATTEMPTS {
                        break Err($crate::persistence::config_portal::Error::LockTimeout);
                    }

                    std::thread::sleep(std::time::Duration::from_millis(10));
                }
            }
        }
    }};

    // Read lock retry with timeout and error handling
    (@read_lock_retry, $accessor:expr, $operation:expr) => {{
        let mut attempts = 0;
        const MAX_ATTEMPTS: usize = 5;

        loop {
            match $accessor.try_read() {
                Ok(guard) => {
                    let result = $operation(&*guard);
                    break Ok(result);
                }
                Err(e) => {
                    attempts += 1;
                    tracing::warn!(
                        "Read lock blocked: {} (attempt {}/{})",
                        e,
                        attempts,
                        MAX_ATTEMPTS
                    );

                    if attempts >= MAX_ATTEMPTS {
                        break Err($crate::persistence::config_portal::Error::LockTimeout);
                    }

                    std::thread::sleep(std::time::Duration::from_millis(10));
                }
            }
        }
    }};
}

/// Error types for configuration portal operations.
///
/// Lock timeouts indicate high contention; operations can be retried on the
/// next frame or tick.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Could not acquire lock after maximum retry attempts")]
    LockTimeout,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placement_round_trips_through_the_portal() {
        let portal = ConfigPortal::new(LayoutConfig::default(), UIConfig::default());

        let placement = PanelPlacement { x: 120.0, y: 48.0 };
        let result = portal.execute_portal_action(PortalAction::WritePanelPlacement(
            "throughput".to_string(),
            placement,
        ));
        assert!(matches!(result, ConfigResult::Success));

        match portal.execute_portal_action(PortalAction::GetPanelPlacement(
            "throughput".to_string(),
        )) {
            ConfigResult::Placement(Some(read_back)) => assert_eq!(read_back, placement),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn missing_placement_reads_as_none() {
        let portal = ConfigPortal::new(LayoutConfig::default(), UIConfig::default());

        match portal.execute_portal_action(PortalAction::GetPanelPlacement("ghost".to_string()))
        {
            ConfigResult::Placement(None) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn fps_defaults_and_updates() {
        let portal = ConfigPortal::new(LayoutConfig::default(), UIConfig::default());

        match portal.execute_portal_action(PortalAction::GetFps) {
            ConfigResult::Fps(fps) => assert_eq!(fps, 30),
            other => panic!("unexpected result: {:?}", other),
        }

        portal.execute_portal_action(PortalAction::WriteFps(60));
        match portal.execute_portal_action(PortalAction::GetFps) {
            ConfigResult::Fps(fps) => assert_eq!(fps, 60),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
