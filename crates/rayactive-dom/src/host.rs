#![forbid(unsafe_code)]

use std::fmt;
use std::rc::Rc;

use crate::error::{BoxError, DomError};

/// Opaque reference to one element of a host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementHandle(u64);

impl ElementHandle {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element#{}", self.0)
    }
}

/// An event as seen by a listener on an ancestor element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEvent {
    /// Event type, e.g. `click`.
    pub event_type: String,
    /// `id` attribute of the element the event was dispatched on.
    pub target_id: Option<String>,
}

impl HostEvent {
    #[must_use]
    pub fn new(event_type: impl Into<String>, target_id: Option<String>) -> Self {
        Self {
            event_type: event_type.into(),
            target_id,
        }
    }
}

/// Event listener callback.
pub type Listener = Rc<dyn Fn(&HostEvent) -> Result<(), BoxError>>;

/// The host document operations the engine relies on.
pub trait Host {
    /// Locate an element by its `id` attribute.
    fn get_element_by_id(&self, id: &str) -> Option<ElementHandle>;

    /// Replace the whole subtree under `element` with `markup`.
    fn set_inner_html(&self, element: &ElementHandle, markup: &str) -> Result<(), DomError>;

    /// Attach `listener` for `event_type` on `element`. Events dispatched on
    /// descendants bubble up to it.
    fn add_event_listener(
        &self,
        element: &ElementHandle,
        event_type: &str,
        listener: Listener,
    ) -> Result<(), DomError>;
}

impl<H: Host + ?Sized> Host for Rc<H> {
    fn get_element_by_id(&self, id: &str) -> Option<ElementHandle> {
        (**self).get_element_by_id(id)
    }

    fn set_inner_html(&self, element: &ElementHandle, markup: &str) -> Result<(), DomError> {
        (**self).set_inner_html(element, markup)
    }

    fn add_event_listener(
        &self,
        element: &ElementHandle,
        event_type: &str,
        listener: Listener,
    ) -> Result<(), DomError> {
        (**self).add_event_listener(element, event_type, listener)
    }
}
