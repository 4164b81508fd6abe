//! # Chartdeck User Interface Module
//!
//! The UI is the host side of the drag contract: it reads the raw pointer
//! stream from egui once per frame, routes it through the board in arrival
//! order, applies the surface's text-selection flag to the egui style, and
//! renders every panel at its authoritative position. The layout follows a
//! three-panel structure: a top bar with panel toggles, the board in the
//! center, and a status bar at the bottom.
//!
//! Backend integration is channel-based: completed drags and the final save
//! on exit go to the persistence worker through the layout channel, while
//! configuration reads come straight from the config portal.

pub mod board;
pub mod common;
pub mod panels;

use eframe::egui::{self, Button, Vec2};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::persistence::config_portal::{ConfigPortal, ConfigResult, PortalAction};
use crate::persistence::persistence_worker::LayoutAction;
use board::Board;

pub struct ChartdeckUI {
    board: Board,

    /// Channel for layout persistence operations.
    layout_sender: mpsc::Sender<LayoutAction>,

    /// Repaint interval derived from the configured fps.
    frame_budget: Duration,
}

impl ChartdeckUI {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config_portal: Arc<ConfigPortal>,
        layout_sender: mpsc::Sender<LayoutAction>,
    ) -> Self {
        cc.egui_ctx.set_theme(egui::Theme::Dark);

        let fps = match config_portal.execute_portal_action(PortalAction::GetFps) {
            ConfigResult::Fps(fps) => fps.max(1),
            other => {
                warn!("Could not read fps setting: {:?}", other);
                30
            }
        };

        ChartdeckUI {
            board: Board::new(&config_portal, layout_sender.clone()),
            layout_sender,
            frame_budget: Duration::from_millis(1000 / fps as u64),
        }
    }
}

impl eframe::App for ChartdeckUI {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Route this frame's pointer stream before anything renders, in the
        // order the host delivered it. A trailing move is never dropped in
        // favor of an earlier one.
        let events = ctx.input(|i| i.events.clone());
        for event in &events {
            self.board.handle_event(event, ctx);
        }

        // The text-selection flag belongs to the active drag session.
        let selectable = self.board.text_selection_enabled();
        ctx.style_mut(|style| style.interaction.selectable_labels = selectable);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.ctx().request_repaint_after(self.frame_budget);
            let width = ui.available_width() - 60.0;
            let states = self.board.panel_states();

            // Top navigation panel with panel visibility toggles
            egui::TopBottomPanel::top("top_panel")
                .show_separator_line(false)
                .show_inside(ui, |ui| {
                    ui.horizontal_centered(|ui| {
                        for (key, title, open) in &states {
                            let label = if *open {
                                format!("Hide {}", title)
                            } else {
                                format!("Show {}", title)
                            };
                            let button = Button::new(label).min_size(Vec2 {
                                x: width / states.len() as f32,
                                y: 20.0,
                            });
                            if ui.add(button).clicked() {
                                self.board.toggle_panel(key);
                            }
                        }
                    });
                });

            // Bottom status panel
            egui::TopBottomPanel::bottom("bottom_panel")
                .show_separator_line(false)
                .show_inside(ui, |ui| {
                    ui.horizontal_centered(|ui| {
                        ui.label(format!(
                            "Panels: {}/{}",
                            self.board.open_count(),
                            states.len()
                        ));
                        match self.board.dragging_panel() {
                            Some(title) => ui.label(format!("Dragging: {}", title)),
                            None => ui.label("Drag a panel to rearrange the board"),
                        };
                    });
                });
        });

        // Panels float above the base layout at their authoritative
        // positions.
        self.board.render(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("UI exiting, requesting final layout save");
        let (response_tx, _response_rx) = tokio::sync::oneshot::channel();
        if let Err(e) = self
            .layout_sender
            .try_send(LayoutAction::SaveNow { response_tx })
        {
            warn!("Failed to queue final save: {}", e);
        }
    }
}
