use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

// Pointer event with precise chrono timestamps, stamped when the host event
// is converted.
#[derive(Debug, Clone)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub x: f32,
    pub y: f32,
    pub timestamp: DateTime<Local>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
}

impl PointerEvent {
    pub fn down(x: f32, y: f32) -> Self {
        Self::stamped(PointerPhase::Down, x, y)
    }

    pub fn moved(x: f32, y: f32) -> Self {
        Self::stamped(PointerPhase::Move, x, y)
    }

    pub fn up(x: f32, y: f32) -> Self {
        Self::stamped(PointerPhase::Up, x, y)
    }

    fn stamped(phase: PointerPhase, x: f32, y: f32) -> Self {
        Self {
            phase,
            x,
            y,
            timestamp: Local::now(),
        }
    }
}

/// Where the element currently is, in the host's layout coordinate space.
///
/// This is the single source of truth for the element's coordinates; the
/// rendering layer is a projection of it, requested after every mutation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Delta between the pointer and the element position, captured once at grab
/// time and fixed for the duration of the session.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GrabOffset {
    pub dx: f32,
    pub dy: f32,
}

/// One-shot end-of-drag report: the terminating input event and a snapshot of
/// the final position.
#[derive(Debug, Clone)]
pub struct CompletionReport {
    pub event: PointerEvent,
    pub position: Position,
}
