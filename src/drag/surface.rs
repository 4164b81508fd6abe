//! The global input surface shared by every draggable element.
//!
//! Two process-wide resources live here: the move/up listener registration
//! table and the document-wide text-selection flag. Both are owned by at most
//! one drag session at a time, and both must be released on every session
//! exit path. The surface makes that ownership explicit so acquisition and
//! release stay pair-wise instead of being scattered through the UI code.

use chrono::{DateTime, Local};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::{debug, warn};

/// Process-unique identifier for a draggable element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(u32);

static NEXT_ELEMENT_ID: AtomicU32 = AtomicU32::new(1);

impl ElementId {
    pub fn next() -> Self {
        Self(NEXT_ELEMENT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// Surface errors
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("move/up listeners already registered by element {0}")]
    AlreadyRegistered(ElementId),
}

// An active move/up listener pair and the element holding it.
#[derive(Debug, Clone)]
struct ListenerBinding {
    owner: ElementId,
    registered_at: DateTime<Local>,
}

/// The global listener table and text-selection flag.
///
/// Shared across elements on the UI thread via [`SharedSurface`]; the drag
/// path is single-threaded, so `Rc<RefCell<..>>` is sufficient.
#[derive(Debug)]
pub struct PointerSurface {
    binding: Option<ListenerBinding>,
    // Prior flag value, saved while a session holds the suppression.
    suppressed_prior: Option<bool>,
    selectable: bool,
}

pub type SharedSurface = Rc<RefCell<PointerSurface>>;

impl Default for PointerSurface {
    fn default() -> Self {
        Self {
            binding: None,
            suppressed_prior: None,
            selectable: true,
        }
    }
}

impl PointerSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedSurface {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Registers the global move/up listener pair for `owner`.
    ///
    /// At most one pair may be active; a second registration is refused so
    /// the caller can decide how to resolve the conflict.
    pub fn register_listeners(&mut self, owner: ElementId) -> Result<(), SurfaceError> {
        if let Some(binding) = &self.binding {
            return Err(SurfaceError::AlreadyRegistered(binding.owner));
        }

        debug!("registering global move/up listeners for element {}", owner);
        self.binding = Some(ListenerBinding {
            owner,
            registered_at: Local::now(),
        });
        Ok(())
    }

    /// Removes the listener pair held by `owner`.
    ///
    /// Tolerant no-op when nothing is registered. A mismatched owner is left
    /// alone: only the element holding the pair may remove it.
    pub fn unregister_listeners(&mut self, owner: ElementId) {
        match &self.binding {
            Some(binding) if binding.owner == owner => {
                let held_for = Local::now() - binding.registered_at;
                debug!(
                    "unregistering listeners for element {} (held {}ms)",
                    owner,
                    held_for.num_milliseconds()
                );
                self.binding = None;
            }
            Some(binding) => {
                warn!(
                    "element {} tried to unregister listeners held by element {}",
                    owner, binding.owner
                );
            }
            None => {
                debug!("element {}: no listeners registered, nothing to remove", owner);
            }
        }
    }

    pub fn listener_owner(&self) -> Option<ElementId> {
        self.binding.as_ref().map(|binding| binding.owner)
    }

    pub fn has_listeners(&self) -> bool {
        self.binding.is_some()
    }

    /// Disables document-wide text selection, remembering the prior value.
    pub fn suppress_text_selection(&mut self) {
        if self.suppressed_prior.is_none() {
            self.suppressed_prior = Some(self.selectable);
        }
        self.selectable = false;
    }

    /// Restores text selection to the value it had before suppression.
    ///
    /// No-op when nothing was suppressed; the flag is never left disabled
    /// past the session that disabled it.
    pub fn restore_text_selection(&mut self) {
        if let Some(prior) = self.suppressed_prior.take() {
            self.selectable = prior;
        }
    }

    pub fn text_selection_enabled(&self) -> bool {
        self.selectable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listener_registration_is_exclusive() {
        let mut surface = PointerSurface::new();
        let first = ElementId::next();
        let second = ElementId::next();

        surface.register_listeners(first).unwrap();
        assert_eq!(surface.listener_owner(), Some(first));

        let refused = surface.register_listeners(second);
        assert!(matches!(
            refused,
            Err(SurfaceError::AlreadyRegistered(owner)) if owner == first
        ));
        assert_eq!(surface.listener_owner(), Some(first));
    }

    #[test]
    fn unregister_is_tolerant_and_owner_checked() {
        let mut surface = PointerSurface::new();
        let owner = ElementId::next();
        let stranger = ElementId::next();

        // Nothing registered: no-op.
        surface.unregister_listeners(owner);
        assert!(!surface.has_listeners());

        surface.register_listeners(owner).unwrap();

        // A non-owner cannot clear the binding.
        surface.unregister_listeners(stranger);
        assert_eq!(surface.listener_owner(), Some(owner));

        surface.unregister_listeners(owner);
        assert!(!surface.has_listeners());

        // A new registration is possible after release.
        surface.register_listeners(stranger).unwrap();
        assert_eq!(surface.listener_owner(), Some(stranger));
    }

    #[test]
    fn text_selection_restores_prior_state() {
        let mut surface = PointerSurface::new();
        assert!(surface.text_selection_enabled());

        surface.suppress_text_selection();
        assert!(!surface.text_selection_enabled());

        // Double suppression keeps the original prior value.
        surface.suppress_text_selection();
        surface.restore_text_selection();
        assert!(surface.text_selection_enabled());

        // Restore without suppression is a no-op.
        surface.restore_text_selection();
        assert!(surface.text_selection_enabled());
    }

    #[test]
    fn suppression_preserves_an_already_disabled_flag() {
        let mut surface = PointerSurface::new();
        surface.suppress_text_selection();
        assert!(!surface.text_selection_enabled());

        // Something else had selection off already; restore must not force
        // it back on.
        surface.restore_text_selection();
        surface.selectable = false;
        surface.suppress_text_selection();
        surface.restore_text_selection();
        assert!(!surface.text_selection_enabled());
    }
}
