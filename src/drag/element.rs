//! Host-facing draggable element.
//!
//! Binds one drag controller to the shared pointer surface and an optional
//! completion callback. All listener registration and text-selection
//! handling goes through this wrapper so that release, teardown and session
//! replacement share a single exit routine.

use tracing::{debug, info, warn};

use crate::drag::controller::{DragController, Dragging, Idle};
use crate::drag::event::{PointerEvent, Position};
use crate::drag::surface::{ElementId, SharedSurface};

/// Invoked once per completed session with the terminating event and the
/// final position.
pub type StopCallback = Box<dyn FnMut(&PointerEvent, Position)>;

pub struct DraggableConfig {
    pub default_position: Position,
    pub on_stop: Option<StopCallback>,
}

impl Default for DraggableConfig {
    fn default() -> Self {
        Self {
            default_position: Position::default(),
            on_stop: None,
        }
    }
}

enum Machine {
    Idle(DragController<Idle>),
    Dragging(DragController<Dragging>),
}

pub struct Draggable {
    id: ElementId,
    surface: SharedSurface,
    // Only None while a transition is in flight.
    machine: Option<Machine>,
    on_stop: Option<StopCallback>,
}

impl Draggable {
    pub fn new(surface: SharedSurface, config: DraggableConfig) -> Self {
        let id = ElementId::next();
        Self {
            id,
            surface,
            machine: Some(Machine::Idle(DragController::create(
                id,
                config.default_position,
            ))),
            on_stop: config.on_stop,
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn position(&self) -> Position {
        match self.machine.as_ref() {
            Some(Machine::Idle(controller)) => controller.position(),
            Some(Machine::Dragging(controller)) => controller.position(),
            None => Position::default(),
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.machine, Some(Machine::Dragging(_)))
    }

    /// Opens a session from a pointer-down on the owned element.
    ///
    /// Registers the global move/up listeners and suppresses text selection
    /// before entering Dragging. A refused registration leaves the element
    /// Idle. A grab during an active session replaces it: the old session is
    /// closed through the common exit routine without a completion report.
    pub fn grab(&mut self, event: &PointerEvent) {
        let idle = match self.machine.take() {
            Some(Machine::Idle(controller)) => controller,
            Some(Machine::Dragging(controller)) => {
                warn!(
                    "element {}: grab while a session is active, replacing session",
                    self.id
                );
                let idle = controller.abort();
                self.exit_session();
                idle
            }
            None => return,
        };

        let registered = self.surface.borrow_mut().register_listeners(self.id);
        match registered {
            Ok(()) => {
                self.surface.borrow_mut().suppress_text_selection();
                self.machine = Some(Machine::Dragging(idle.grab(event)));
            }
            Err(e) => {
                warn!("element {}: grab refused: {}", self.id, e);
                self.machine = Some(Machine::Idle(idle));
            }
        }
    }

    /// Feeds a move event from the global surface into the active session.
    ///
    /// Returns true when the event was consumed and the host should request
    /// a repaint. Moves without an active session are ignored.
    pub fn pointer_moved(&mut self, event: &PointerEvent) -> bool {
        if !self.owns_listeners() {
            debug!(
                "element {}: {:?} event without active session ignored",
                self.id, event.phase
            );
            return false;
        }

        match self.machine.as_mut() {
            Some(Machine::Dragging(controller)) => {
                controller.track(event);
                true
            }
            _ => {
                debug!("element {}: move event in idle state ignored", self.id);
                false
            }
        }
    }

    /// Closes the session on an up event from the global surface.
    ///
    /// Runs the exit routine before the callback, so the callback observes
    /// the surface already released and the position last rendered.
    pub fn pointer_released(&mut self, event: &PointerEvent) {
        if !self.owns_listeners() {
            debug!(
                "element {}: {:?} event without active session ignored",
                self.id, event.phase
            );
            return;
        }

        match self.machine.take() {
            Some(Machine::Dragging(controller)) => {
                let (idle, report) = controller.release(event);
                self.machine = Some(Machine::Idle(idle));
                self.exit_session();

                info!(
                    "element {}: session completed at ({}, {})",
                    self.id, report.position.x, report.position.y
                );
                if let Some(on_stop) = self.on_stop.as_mut() {
                    on_stop(&report.event, report.position);
                }
            }
            other => {
                self.machine = other;
            }
        }
    }

    /// Cleanup when the element leaves the rendering tree.
    ///
    /// Unconditional: runs the exit routine whether or not a session is
    /// active, and never invokes the completion callback. The position is
    /// retained; it simply stops changing.
    pub fn teardown(&mut self) {
        match self.machine.take() {
            Some(Machine::Dragging(controller)) => {
                info!("element {}: teardown mid-drag", self.id);
                self.machine = Some(Machine::Idle(controller.abort()));
            }
            other => self.machine = other,
        }
        self.exit_session();
    }

    fn owns_listeners(&self) -> bool {
        self.surface.borrow().listener_owner() == Some(self.id)
    }

    // Single exit routine shared by release, teardown and replacement:
    // listener removal and selection restore always happen together. When
    // another element's session is live, its suppression is left alone.
    fn exit_session(&mut self) {
        let mut surface = self.surface.borrow_mut();
        let foreign_session =
            matches!(surface.listener_owner(), Some(owner) if owner != self.id);
        surface.unregister_listeners(self.id);
        if !foreign_session {
            surface.restore_text_selection();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drag::surface::PointerSurface;
    use std::cell::RefCell;
    use std::rc::Rc;

    type StopLog = Rc<RefCell<Vec<Position>>>;

    fn recording_element(
        surface: &SharedSurface,
        default_position: Position,
    ) -> (Draggable, StopLog) {
        let log: StopLog = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        let element = Draggable::new(
            surface.clone(),
            DraggableConfig {
                default_position,
                on_stop: Some(Box::new(move |_event, position| {
                    sink.borrow_mut().push(position);
                })),
            },
        );
        (element, log)
    }

    #[test]
    fn full_session_reports_final_position_once() {
        let surface = PointerSurface::shared();
        let (mut element, log) = recording_element(&surface, Position::default());

        element.grab(&PointerEvent::down(100.0, 100.0));
        assert!(element.is_dragging());
        assert!(!surface.borrow().text_selection_enabled());

        assert!(element.pointer_moved(&PointerEvent::moved(150.0, 120.0)));
        assert_eq!(element.position(), Position::new(50.0, 20.0));
        assert!(element.pointer_moved(&PointerEvent::moved(200.0, 200.0)));
        assert_eq!(element.position(), Position::new(100.0, 100.0));

        element.pointer_released(&PointerEvent::up(200.0, 200.0));
        assert!(!element.is_dragging());
        assert_eq!(log.borrow().as_slice(), &[Position::new(100.0, 100.0)]);

        // Session closed: listeners are gone and selection is back.
        assert!(!surface.borrow().has_listeners());
        assert!(surface.borrow().text_selection_enabled());
    }

    #[test]
    fn moves_after_release_are_ignored() {
        let surface = PointerSurface::shared();
        let (mut element, log) = recording_element(&surface, Position::default());

        element.grab(&PointerEvent::down(10.0, 10.0));
        element.pointer_moved(&PointerEvent::moved(30.0, 30.0));
        element.pointer_released(&PointerEvent::up(30.0, 30.0));
        let settled = element.position();

        assert!(!element.pointer_moved(&PointerEvent::moved(500.0, 500.0)));
        assert_eq!(element.position(), settled);

        // A stray up does not produce a second report.
        element.pointer_released(&PointerEvent::up(500.0, 500.0));
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn teardown_mid_drag_releases_everything_without_a_report() {
        let surface = PointerSurface::shared();
        let (mut element, log) = recording_element(&surface, Position::default());

        element.grab(&PointerEvent::down(0.0, 0.0));
        element.pointer_moved(&PointerEvent::moved(25.0, 25.0));
        element.teardown();

        assert!(!element.is_dragging());
        assert!(!surface.borrow().has_listeners());
        assert!(surface.borrow().text_selection_enabled());
        assert!(log.borrow().is_empty());

        // Session is closed: later moves no longer land.
        let settled = element.position();
        assert!(!element.pointer_moved(&PointerEvent::moved(90.0, 90.0)));
        assert_eq!(element.position(), settled);
    }

    #[test]
    fn teardown_when_idle_is_a_no_op() {
        let surface = PointerSurface::shared();
        let (mut element, log) = recording_element(&surface, Position::new(3.0, 4.0));

        element.teardown();
        element.teardown();

        assert_eq!(element.position(), Position::new(3.0, 4.0));
        assert!(surface.borrow().text_selection_enabled());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn regrab_replaces_the_running_session() {
        let surface = PointerSurface::shared();
        let (mut element, log) = recording_element(&surface, Position::default());

        element.grab(&PointerEvent::down(100.0, 100.0));
        element.pointer_moved(&PointerEvent::moved(200.0, 200.0));
        assert_eq!(element.position(), Position::new(100.0, 100.0));

        // Second grab: old session ends silently, new offset measures from
        // the current position.
        element.grab(&PointerEvent::down(130.0, 140.0));
        assert!(element.is_dragging());
        assert!(log.borrow().is_empty());

        element.pointer_moved(&PointerEvent::moved(131.0, 141.0));
        assert_eq!(element.position(), Position::new(101.0, 101.0));

        element.pointer_released(&PointerEvent::up(131.0, 141.0));
        assert_eq!(log.borrow().as_slice(), &[Position::new(101.0, 101.0)]);
        assert!(surface.borrow().text_selection_enabled());
    }

    #[test]
    fn grab_is_refused_while_another_element_holds_listeners() {
        let surface = PointerSurface::shared();
        let (mut first, _) = recording_element(&surface, Position::default());
        let (mut second, second_log) = recording_element(&surface, Position::default());

        first.grab(&PointerEvent::down(10.0, 10.0));
        second.grab(&PointerEvent::down(20.0, 20.0));

        assert!(first.is_dragging());
        assert!(!second.is_dragging());

        // The refused element's events change nothing.
        assert!(!second.pointer_moved(&PointerEvent::moved(40.0, 40.0)));
        assert_eq!(second.position(), Position::default());

        // First element still drags normally.
        assert!(first.pointer_moved(&PointerEvent::moved(15.0, 15.0)));
        assert_eq!(first.position(), Position::new(5.0, 5.0));
        assert!(second_log.borrow().is_empty());
    }

    #[test]
    fn teardown_of_idle_element_leaves_foreign_session_intact() {
        let surface = PointerSurface::shared();
        let (mut dragging, _) = recording_element(&surface, Position::default());
        let (mut idle, _) = recording_element(&surface, Position::default());

        dragging.grab(&PointerEvent::down(0.0, 0.0));
        assert!(!surface.borrow().text_selection_enabled());

        idle.teardown();

        // The live session keeps its listeners and its suppression.
        assert_eq!(surface.borrow().listener_owner(), Some(dragging.id()));
        assert!(!surface.borrow().text_selection_enabled());

        assert!(dragging.pointer_moved(&PointerEvent::moved(7.0, 7.0)));
        assert_eq!(dragging.position(), Position::new(7.0, 7.0));
    }

    #[test]
    fn element_without_callback_completes_normally() {
        let surface = PointerSurface::shared();
        let mut element = Draggable::new(surface.clone(), DraggableConfig::default());

        element.grab(&PointerEvent::down(5.0, 5.0));
        element.pointer_moved(&PointerEvent::moved(10.0, 10.0));
        element.pointer_released(&PointerEvent::up(10.0, 10.0));

        assert_eq!(element.position(), Position::new(5.0, 5.0));
        assert!(!surface.borrow().has_listeners());
    }
}
