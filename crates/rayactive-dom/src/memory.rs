#![forbid(unsafe_code)]

//! In-memory host document.
//!
//! Elements are registered up front by id and hold their inner markup as an
//! opaque string. Descendants created through `set_inner_html` are not
//! materialised as nodes; they are only visible through the `id=` attributes
//! of the current markup, which is enough to target them with
//! [`MemoryHost::dispatch`].
//!
//! # Invariants
//!
//! 1. `set_inner_html` replaces the previous markup entirely and bumps the
//!    element's write count by one.
//! 2. Listeners run in registration order.
//! 3. An event can only be dispatched on an id present in the current markup
//!    of the listening root.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::DomError;
use crate::host::{ElementHandle, Host, HostEvent, Listener};

static ID_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:^|\s)id=(?:"([^"]*)"|'([^']*)'|([^\s>"'/]+))"#).expect("valid id regex")
});

#[derive(Default)]
struct ElementNode {
    id: String,
    inner_html: String,
    writes: u64,
    listeners: Vec<(String, Listener)>,
}

#[derive(Default)]
struct DocumentState {
    next_handle: u64,
    elements: BTreeMap<ElementHandle, ElementNode>,
    by_id: BTreeMap<String, ElementHandle>,
}

impl DocumentState {
    fn node(&self, element: &ElementHandle) -> Result<&ElementNode, DomError> {
        self.elements
            .get(element)
            .ok_or(DomError::UnknownElement(*element))
    }

    fn node_mut(&mut self, element: &ElementHandle) -> Result<&mut ElementNode, DomError> {
        self.elements
            .get_mut(element)
            .ok_or(DomError::UnknownElement(*element))
    }
}

/// Headless host document.
#[derive(Default)]
pub struct MemoryHost {
    state: RefCell<DocumentState>,
}

impl MemoryHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`create_element`](Self::create_element).
    #[must_use]
    pub fn with_element(self, id: impl Into<String>) -> Self {
        self.create_element(id);
        self
    }

    /// Register a top-level element. Re-registering an id returns the
    /// existing handle.
    pub fn create_element(&self, id: impl Into<String>) -> ElementHandle {
        let id = id.into();
        let mut state = self.state.borrow_mut();
        if let Some(handle) = state.by_id.get(&id) {
            return *handle;
        }
        state.next_handle += 1;
        let handle = ElementHandle::new(state.next_handle);
        state.elements.insert(
            handle,
            ElementNode {
                id: id.clone(),
                ..ElementNode::default()
            },
        );
        state.by_id.insert(id, handle);
        handle
    }

    /// Current inner markup of `element`.
    pub fn inner_html(&self, element: &ElementHandle) -> Result<String, DomError> {
        Ok(self.state.borrow().node(element)?.inner_html.clone())
    }

    /// Number of `set_inner_html` calls on `element`.
    pub fn write_count(&self, element: &ElementHandle) -> Result<u64, DomError> {
        Ok(self.state.borrow().node(element)?.writes)
    }

    /// `id` attribute the element was registered under.
    pub fn element_id(&self, element: &ElementHandle) -> Result<String, DomError> {
        Ok(self.state.borrow().node(element)?.id.clone())
    }

    /// Number of listeners for `event_type` on `element`.
    pub fn listener_count(&self, element: &ElementHandle, event_type: &str) -> Result<usize, DomError> {
        Ok(self
            .state
            .borrow()
            .node(element)?
            .listeners
            .iter()
            .filter(|(ty, _)| ty == event_type)
            .count())
    }

    /// Distinct listened event types on `element`, in registration order.
    pub fn listened_types(&self, element: &ElementHandle) -> Result<Vec<String>, DomError> {
        let state = self.state.borrow();
        let mut types: Vec<String> = Vec::new();
        for (ty, _) in &state.node(element)?.listeners {
            if !types.contains(ty) {
                types.push(ty.clone());
            }
        }
        Ok(types)
    }

    /// Values of the `id=` attributes found in the current markup of
    /// `element`, in document order.
    pub fn rendered_ids(&self, element: &ElementHandle) -> Result<Vec<String>, DomError> {
        let state = self.state.borrow();
        let markup = &state.node(element)?.inner_html;
        Ok(ID_ATTR
            .captures_iter(markup)
            .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)))
            .map(|m| m.as_str().to_owned())
            .collect())
    }

    /// Dispatch `event_type` on the rendered descendant `target_id` of `root`
    /// and let it bubble to `root`'s listeners. Returns how many listeners ran.
    pub fn dispatch(
        &self,
        root: &ElementHandle,
        event_type: &str,
        target_id: &str,
    ) -> Result<usize, DomError> {
        if !self.rendered_ids(root)?.iter().any(|id| id == target_id) {
            return Err(DomError::TargetNotRendered {
                root: *root,
                id: target_id.to_owned(),
            });
        }

        // Listeners may write markup, so release the borrow before calling out.
        let listeners: Vec<Listener> = self
            .state
            .borrow()
            .node(root)?
            .listeners
            .iter()
            .filter(|(ty, _)| ty == event_type)
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        tracing::debug!(%root, event_type, target_id, listeners = listeners.len(), "host.dispatch");
        let event = HostEvent::new(event_type, Some(target_id.to_owned()));
        for listener in &listeners {
            listener(&event).map_err(|source| DomError::Listener {
                event_type: event_type.to_owned(),
                source,
            })?;
        }
        Ok(listeners.len())
    }
}

impl Host for MemoryHost {
    fn get_element_by_id(&self, id: &str) -> Option<ElementHandle> {
        self.state.borrow().by_id.get(id).copied()
    }

    fn set_inner_html(&self, element: &ElementHandle, markup: &str) -> Result<(), DomError> {
        let mut state = self.state.borrow_mut();
        let node = state.node_mut(element)?;
        node.inner_html = markup.to_owned();
        node.writes += 1;
        Ok(())
    }

    fn add_event_listener(
        &self,
        element: &ElementHandle,
        event_type: &str,
        listener: Listener,
    ) -> Result<(), DomError> {
        let mut state = self.state.borrow_mut();
        state
            .node_mut(element)?
            .listeners
            .push((event_type.to_owned(), listener));
        Ok(())
    }
}

impl std::fmt::Debug for MemoryHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("MemoryHost")
            .field("elements", &state.by_id)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoxError;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;
    use std::fmt;

    #[derive(Debug)]
    struct Refused;

    impl fmt::Display for Refused {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("refused")
        }
    }

    impl std::error::Error for Refused {}

    fn counting_listener(hits: &Rc<Cell<u32>>) -> Listener {
        let hits = Rc::clone(hits);
        Rc::new(move |_event: &HostEvent| -> Result<(), BoxError> {
            hits.set(hits.get() + 1);
            Ok(())
        })
    }

    #[test]
    fn elements_are_found_by_id() {
        let host = MemoryHost::new().with_element("root");
        let root = host.get_element_by_id("root").expect("root");
        assert_eq!(host.element_id(&root).expect("id"), "root");
        assert!(host.get_element_by_id("nope").is_none());
        assert_eq!(host.create_element("root"), root);
    }

    #[test]
    fn inner_html_is_replaced_and_counted() {
        let host = MemoryHost::new().with_element("root");
        let root = host.get_element_by_id("root").expect("root");
        host.set_inner_html(&root, "<p>a</p>").expect("write");
        host.set_inner_html(&root, "<p>b</p>").expect("write");
        assert_eq!(host.inner_html(&root).expect("markup"), "<p>b</p>");
        assert_eq!(host.write_count(&root).expect("count"), 2);
    }

    #[test]
    fn rendered_ids_accept_quoted_and_bare_values() {
        let host = MemoryHost::new().with_element("root");
        let root = host.get_element_by_id("root").expect("root");
        host.set_inner_html(
            &root,
            r#"<div id="a"><b data-id=x id='b'>x</b><i id=c>y</i></div>"#,
        )
        .expect("write");
        assert_eq!(host.rendered_ids(&root).expect("ids"), vec!["a", "b", "c"]);
    }

    #[test]
    fn dispatch_reaches_listeners_of_matching_type() {
        let host = MemoryHost::new().with_element("root");
        let root = host.get_element_by_id("root").expect("root");
        host.set_inner_html(&root, "<button id=go>x</button>").expect("write");

        let clicks = Rc::new(Cell::new(0));
        let keys = Rc::new(Cell::new(0));
        host.add_event_listener(&root, "click", counting_listener(&clicks))
            .expect("listen");
        host.add_event_listener(&root, "keydown", counting_listener(&keys))
            .expect("listen");

        assert_eq!(host.dispatch(&root, "click", "go").expect("dispatch"), 1);
        assert_eq!(clicks.get(), 1);
        assert_eq!(keys.get(), 0);
        assert_eq!(host.listened_types(&root).expect("types"), vec!["click", "keydown"]);
    }

    #[test]
    fn dispatch_on_discarded_target_is_refused() {
        let host = MemoryHost::new().with_element("root");
        let root = host.get_element_by_id("root").expect("root");
        host.set_inner_html(&root, "<button id=old>x</button>").expect("write");
        host.set_inner_html(&root, "<button id=new>x</button>").expect("write");
        let err = host.dispatch(&root, "click", "old").expect_err("gone");
        assert!(matches!(err, DomError::TargetNotRendered { ref id, .. } if id == "old"));
    }

    #[test]
    fn listener_errors_propagate() {
        let host = MemoryHost::new().with_element("root");
        let root = host.get_element_by_id("root").expect("root");
        host.set_inner_html(&root, "<a id=t>x</a>").expect("write");
        let failing: Listener =
            Rc::new(|_: &HostEvent| -> Result<(), BoxError> { Err(Box::new(Refused)) });
        host.add_event_listener(&root, "click", failing)
            .expect("listen");
        let err = host.dispatch(&root, "click", "t").expect_err("listener fails");
        assert_eq!(err.to_string(), "listener for `click` failed: refused");
    }

    #[test]
    fn listeners_may_rewrite_markup() {
        let host = Rc::new(MemoryHost::new().with_element("root"));
        let root = host.get_element_by_id("root").expect("root");
        host.set_inner_html(&root, "<a id=t>x</a>").expect("write");
        let weak = Rc::downgrade(&host);
        host.add_event_listener(
            &root,
            "click",
            Rc::new(move |_: &HostEvent| -> Result<(), BoxError> {
                if let Some(host) = weak.upgrade() {
                    host.set_inner_html(&root, "<a id=u>y</a>")?;
                }
                Ok(())
            }),
        )
        .expect("listen");
        host.dispatch(&root, "click", "t").expect("dispatch");
        assert_eq!(host.inner_html(&root).expect("markup"), "<a id=u>y</a>");
    }

    #[test]
    fn unknown_handles_are_rejected() {
        let host = MemoryHost::new();
        let ghost = ElementHandle::new(99);
        assert!(matches!(
            host.set_inner_html(&ghost, "x"),
            Err(DomError::UnknownElement(h)) if h == ghost
        ));
    }
}
