//! The board: draggable panels over a shared pointer surface.
//!
//! The board is the host side of the drag contract. Pointer-down events are
//! hit-tested against panel rectangles derived from the authoritative
//! positions; move and up events go to whichever element holds the global
//! listener pair; every panel is rendered as an area fixed at its
//! authoritative position.

use eframe::egui::{self, pos2, Context, Id, LayerId, Order, Pos2, Rect, RichText};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::common::{self, UiColors};
use super::panels::{self, PanelMeta};
use crate::drag::{
    Draggable, DraggableConfig, ElementId, PointerEvent, PointerSurface, Position, SharedSurface,
    StopCallback,
};
use crate::persistence::config_portal::{ConfigPortal, ConfigResult, PortalAction};
use crate::persistence::persistence_worker::LayoutAction;
use crate::persistence::PanelPlacement;

pub struct BoardPanel {
    pub meta: PanelMeta,
    pub draggable: Draggable,
    pub open: bool,
}

pub struct Board {
    surface: SharedSurface,
    // Vec order is z-order, last on top.
    panels: Vec<BoardPanel>,
}

impl Board {
    pub fn new(config_portal: &ConfigPortal, layout_sender: mpsc::Sender<LayoutAction>) -> Self {
        let surface = PointerSurface::shared();

        let panels = panels::registry()
            .into_iter()
            .map(|meta| {
                let saved = match config_portal.execute_portal_action(
                    PortalAction::GetPanelPlacement(meta.key.to_string()),
                ) {
                    ConfigResult::Placement(placement) => placement,
                    other => {
                        warn!("Could not read placement for {}: {:?}", meta.key, other);
                        None
                    }
                };
                let default_position = saved
                    .map(|placement| Position::new(placement.x, placement.y))
                    .unwrap_or(meta.default_position);

                let draggable = Draggable::new(
                    surface.clone(),
                    DraggableConfig {
                        default_position,
                        on_stop: Some(stop_callback(meta.key, layout_sender.clone())),
                    },
                );
                BoardPanel {
                    meta,
                    draggable,
                    open: true,
                }
            })
            .collect();

        Self { surface, panels }
    }

    /// Routes one host input event, in arrival order.
    pub fn handle_event(&mut self, event: &egui::Event, ctx: &Context) {
        match event {
            egui::Event::PointerButton {
                pos,
                button: egui::PointerButton::Primary,
                pressed: true,
                ..
            } => {
                if let Some(index) = self.hit_test(*pos) {
                    // Raise the grabbed panel, in the vec and on screen.
                    let panel = self.panels.remove(index);
                    self.panels.push(panel);
                    if let Some(panel) = self.panels.last_mut() {
                        ctx.move_to_top(LayerId::new(Order::Middle, Id::new(panel.meta.key)));
                        panel.draggable.grab(&PointerEvent::down(pos.x, pos.y));
                        ctx.request_repaint();
                    }
                }
            }
            egui::Event::PointerMoved(pos) => {
                let event = PointerEvent::moved(pos.x, pos.y);
                if let Some(owner) = self.listener_owner() {
                    if let Some(panel) = self.panel_by_element_mut(owner) {
                        if panel.draggable.pointer_moved(&event) {
                            ctx.request_repaint();
                        }
                    }
                }
            }
            egui::Event::PointerButton {
                pos,
                button: egui::PointerButton::Primary,
                pressed: false,
                ..
            } => {
                let event = PointerEvent::up(pos.x, pos.y);
                if let Some(owner) = self.listener_owner() {
                    if let Some(panel) = self.panel_by_element_mut(owner) {
                        panel.draggable.pointer_released(&event);
                        ctx.request_repaint();
                    }
                }
            }
            _ => {}
        }
    }

    /// Shows or hides a panel. Hiding removes it from the rendering tree and
    /// tears its drag element down, mid-drag included.
    pub fn toggle_panel(&mut self, key: &str) {
        if let Some(panel) = self.panels.iter_mut().find(|panel| panel.meta.key == key) {
            if panel.open {
                panel.draggable.teardown();
                panel.open = false;
                info!("panel {} closed", key);
            } else {
                panel.open = true;
                debug!("panel {} reopened at {:?}", key, panel.draggable.position());
            }
        }
    }

    /// Draws every open panel at its authoritative position.
    pub fn render(&self, ctx: &Context) {
        for panel in &self.panels {
            if !panel.open {
                continue;
            }
            let position = panel.draggable.position();

            egui::Area::new(Id::new(panel.meta.key))
                .order(Order::Middle)
                .fixed_pos(pos2(position.x, position.y))
                .show(ctx, |ui| {
                    common::panel_frame(UiColors::INNER_BG, UiColors::BORDER).show(ui, |ui| {
                        ui.set_min_size(panel.meta.size);
                        ui.set_max_size(panel.meta.size);
                        ui.vertical(|ui| {
                            ui.label(RichText::new(panel.meta.title).strong());
                            ui.separator();
                            panels::render_content(&panel.meta, ui);
                        });
                    });
                });
        }
    }

    pub fn text_selection_enabled(&self) -> bool {
        self.surface.borrow().text_selection_enabled()
    }

    pub fn dragging_panel(&self) -> Option<&'static str> {
        self.panels
            .iter()
            .find(|panel| panel.draggable.is_dragging())
            .map(|panel| panel.meta.title)
    }

    pub fn open_count(&self) -> usize {
        self.panels.iter().filter(|panel| panel.open).count()
    }

    /// (key, title, open) for the navigation bar, in registry order.
    pub fn panel_states(&self) -> Vec<(&'static str, &'static str, bool)> {
        let mut states: Vec<_> = self
            .panels
            .iter()
            .map(|panel| (panel.meta.key, panel.meta.title, panel.open))
            .collect();
        // Vec order changes with z-order; keep the bar stable.
        states.sort_by_key(|(key, _, _)| *key);
        states
    }

    fn hit_test(&self, pos: Pos2) -> Option<usize> {
        self.panels
            .iter()
            .enumerate()
            .rev()
            .find(|(_, panel)| panel.open && panel_rect(panel).contains(pos))
            .map(|(index, _)| index)
    }

    fn listener_owner(&self) -> Option<ElementId> {
        self.surface.borrow().listener_owner()
    }

    fn panel_by_element_mut(&mut self, id: ElementId) -> Option<&mut BoardPanel> {
        self.panels
            .iter_mut()
            .find(|panel| panel.draggable.id() == id)
    }
}

fn panel_rect(panel: &BoardPanel) -> Rect {
    let position = panel.draggable.position();
    Rect::from_min_size(pos2(position.x, position.y), panel.meta.size)
}

// Forwards the completion report to the persistence worker. try_send keeps
// the callback non-blocking on the UI thread.
fn stop_callback(key: &'static str, sender: mpsc::Sender<LayoutAction>) -> StopCallback {
    Box::new(move |_event, position| {
        debug!(
            "panel {}: drag finished at ({}, {})",
            key, position.x, position.y
        );
        let action = LayoutAction::PanelMoved {
            key: key.to_string(),
            placement: PanelPlacement {
                x: position.x,
                y: position.y,
            },
        };
        if let Err(e) = sender.try_send(action) {
            warn!("Failed to queue placement update for {}: {}", key, e);
        }
    })
}
