//! Drag session state machine.
//!
//! Two states, Idle and Dragging, with the session (grab offset and grab
//! time) carried as Dragging's state data. The controller owns the
//! authoritative position: it is mutated only by moves belonging to the
//! active session, and the rendering layer is asked to repaint after every
//! mutation rather than being used as the storage mechanism.

use statum::{machine, state};
use tracing::debug;

use crate::drag::event::{CompletionReport, GrabOffset, PointerEvent, Position};
use crate::drag::surface::ElementId;

/// Per-drag data, fixed from grab to release.
#[derive(Debug, Clone)]
pub struct DragSession {
    pub offset: GrabOffset,
    pub grabbed_at: chrono::DateTime<chrono::Local>,
}

#[state]
#[derive(Debug, Clone)]
pub enum DragPhase {
    Idle,
    Dragging(DragSession),
}

#[machine]
#[derive(Debug)]
pub struct DragController<S: DragPhase> {
    element: ElementId,
    position: Position,
}

impl<S: DragPhase> DragController<S> {
    pub fn element(&self) -> ElementId {
        self.element
    }

    /// The authoritative position, readable in any state.
    pub fn position(&self) -> Position {
        self.position
    }
}

impl DragController<Idle> {
    pub fn create(element: ElementId, default_position: Position) -> Self {
        debug!(
            "creating drag controller for element {} at {:?}",
            element, default_position
        );
        Self::new(element, default_position)
    }

    /// Opens a session from a pointer-down on the owned element.
    ///
    /// The grab offset is captured against the current position, so after a
    /// completed session a new grab measures from where the element ended up.
    pub fn grab(self, event: &PointerEvent) -> DragController<Dragging> {
        let offset = GrabOffset {
            dx: event.x - self.position.x,
            dy: event.y - self.position.y,
        };
        debug!(
            "element {}: grab at ({}, {}), offset ({}, {})",
            self.element, event.x, event.y, offset.dx, offset.dy
        );

        self.transition_with(DragSession {
            offset,
            grabbed_at: event.timestamp,
        })
    }
}

impl DragController<Dragging> {
    fn offset(&self) -> GrabOffset {
        // Dragging always carries its session; the fallback mirrors a zero
        // offset and keeps the handler total.
        self.get_state_data()
            .map(|session| session.offset)
            .unwrap_or_default()
    }

    /// Recomputes the position from a move event on the global surface.
    ///
    /// Position is device coordinates minus the session offset, recomputed
    /// from scratch each time. Duplicate events with identical coordinates
    /// land on the same value; nothing accumulates.
    pub fn track(&mut self, event: &PointerEvent) {
        let offset = self.offset();
        self.position = Position {
            x: event.x - offset.dx,
            y: event.y - offset.dy,
        };
    }

    /// Closes the session, reporting the final position.
    ///
    /// The report carries the snapshot already produced by the last move, not
    /// a recomputation from the up event's coordinates.
    pub fn release(self, event: &PointerEvent) -> (DragController<Idle>, CompletionReport) {
        let report = CompletionReport {
            event: event.clone(),
            position: self.position,
        };
        if let Some(session) = self.get_state_data() {
            let held_for = event.timestamp - session.grabbed_at;
            debug!(
                "element {}: session released at {:?} after {}ms",
                self.element,
                report.position,
                held_for.num_milliseconds()
            );
        }
        (self.transition(), report)
    }

    /// Forced exit without a report, for teardown and session replacement.
    pub fn abort(self) -> DragController<Idle> {
        debug!("element {}: session aborted", self.element);
        self.transition()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller_at(x: f32, y: f32) -> DragController<Idle> {
        DragController::create(ElementId::next(), Position::new(x, y))
    }

    #[test]
    fn grab_offset_measures_pointer_against_current_position() {
        let controller = controller_at(10.0, 20.0);
        let mut dragging = controller.grab(&PointerEvent::down(50.0, 60.0));

        let session = dragging.get_state_data().cloned().unwrap();
        assert_eq!(session.offset, GrabOffset { dx: 40.0, dy: 40.0 });

        dragging.track(&PointerEvent::moved(70.0, 90.0));
        assert_eq!(dragging.position(), Position::new(30.0, 50.0));
    }

    #[test]
    fn position_reflects_only_the_last_move() {
        let controller = controller_at(0.0, 0.0);
        let mut dragging = controller.grab(&PointerEvent::down(100.0, 100.0));

        for (x, y) in [(110.0, 90.0), (300.0, 300.0), (150.0, 120.0)] {
            dragging.track(&PointerEvent::moved(x, y));
        }

        // (last.x - dx, last.y - dy), independent of what came before.
        assert_eq!(dragging.position(), Position::new(50.0, 20.0));
    }

    #[test]
    fn duplicate_moves_recompute_to_the_same_value() {
        let controller = controller_at(0.0, 0.0);
        let mut dragging = controller.grab(&PointerEvent::down(100.0, 100.0));

        dragging.track(&PointerEvent::moved(150.0, 120.0));
        let first = dragging.position();
        dragging.track(&PointerEvent::moved(150.0, 120.0));

        assert_eq!(dragging.position(), first);
        assert_eq!(dragging.position(), Position::new(50.0, 20.0));
    }

    #[test]
    fn release_reports_the_position_of_the_final_move() {
        let controller = controller_at(0.0, 0.0);
        let mut dragging = controller.grab(&PointerEvent::down(100.0, 100.0));

        dragging.track(&PointerEvent::moved(150.0, 120.0));
        assert_eq!(dragging.position(), Position::new(50.0, 20.0));
        dragging.track(&PointerEvent::moved(200.0, 200.0));
        assert_eq!(dragging.position(), Position::new(100.0, 100.0));

        let (idle, report) = dragging.release(&PointerEvent::up(200.0, 200.0));
        assert_eq!(report.position, Position::new(100.0, 100.0));
        assert_eq!(idle.position(), Position::new(100.0, 100.0));
    }

    #[test]
    fn release_snapshot_ignores_up_event_coordinates() {
        let controller = controller_at(0.0, 0.0);
        let mut dragging = controller.grab(&PointerEvent::down(100.0, 100.0));
        dragging.track(&PointerEvent::moved(200.0, 200.0));

        // An up event somewhere else must not be combined with the offset.
        let (_, report) = dragging.release(&PointerEvent::up(999.0, 999.0));
        assert_eq!(report.position, Position::new(100.0, 100.0));
    }

    #[test]
    fn regrab_measures_offset_from_where_the_element_ended_up() {
        let controller = controller_at(0.0, 0.0);
        let mut dragging = controller.grab(&PointerEvent::down(100.0, 100.0));
        dragging.track(&PointerEvent::moved(200.0, 200.0));
        let (idle, _) = dragging.release(&PointerEvent::up(200.0, 200.0));

        let regrabbed = idle.grab(&PointerEvent::down(130.0, 140.0));
        let session = regrabbed.get_state_data().cloned().unwrap();
        assert_eq!(session.offset, GrabOffset { dx: 30.0, dy: 40.0 });
    }

    #[test]
    fn abort_keeps_the_last_tracked_position() {
        let controller = controller_at(5.0, 5.0);
        let mut dragging = controller.grab(&PointerEvent::down(10.0, 10.0));
        dragging.track(&PointerEvent::moved(42.0, 37.0));

        let idle = dragging.abort();
        assert_eq!(idle.position(), Position::new(37.0, 32.0));
    }
}
