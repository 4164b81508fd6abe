pub mod drag;
pub mod persistence;
pub mod ui;

use crate::persistence::persistence_worker::PersistenceManager;
use crate::ui::ChartdeckUI;
use color_eyre::{eyre::eyre, Result};
use eframe::egui;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    setup()?;

    info!("Initializing layout persistence");
    let persistence = PersistenceManager::new().await?;
    let config_portal = persistence.portal();
    let layout_sender = persistence.sender();

    info!("Starting UI");
    let mut native_options = eframe::NativeOptions::default();
    native_options.viewport = egui::ViewportBuilder::default().with_inner_size([1280.0, 800.0]);

    eframe::run_native(
        "Chartdeck",
        native_options,
        Box::new(move |cc| Ok(Box::new(ChartdeckUI::new(cc, config_portal, layout_sender)))),
    )
    .map_err(|e| eyre!("UI terminated: {}", e))?;

    persistence.shutdown();
    Ok(())
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    setup_logging_env();
    Ok(())
}

fn setup_logging_env() {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();
}
