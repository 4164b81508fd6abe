//! Pointer-drag interaction for board panels.
//!
//! This module turns a raw pointer stream into a continuously updated
//! position and a single end-of-drag report. The controller keeps one
//! mutable source of truth for the position, the surface tracks the global
//! listener pair and the text-selection flag, and the element wrapper ties
//! both to a completion callback with a single cleanup path for every way a
//! session can end.

pub mod controller;
pub mod element;
pub mod event;
pub mod surface;

pub use controller::{DragController, DragSession};
pub use element::{Draggable, DraggableConfig, StopCallback};
pub use event::{CompletionReport, GrabOffset, PointerEvent, PointerPhase, Position};
pub use surface::{ElementId, PointerSurface, SharedSurface, SurfaceError};
