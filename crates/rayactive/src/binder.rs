#![forbid(unsafe_code)]

//! Delegated event listeners on the root element.
//!
//! Binding happens once, right after the first compile: one listener per
//! distinct event type found in the Event Binding Table at that moment. A
//! listener resolves the event target's id against the table as it is when
//! the event fires, so ids minted by later re-renders keep working. Event
//! types that only appear after binding are never listened to.

use std::rc::Rc;

use rayactive_dom::{BoxError, ElementHandle, Host, HostEvent, Listener};

use crate::compiler::SharedBindings;
use crate::error::{EngineError, Result};
use crate::this_proxy::ThisProxy;
use crate::view_model::Methods;

/// Attaches the delegated listeners for one engine.
pub struct EventBinder {
    host: Rc<dyn Host>,
    root: ElementHandle,
    bindings: SharedBindings,
    methods: Rc<Methods>,
    receiver: ThisProxy,
}

impl EventBinder {
    pub fn new(
        host: Rc<dyn Host>,
        root: ElementHandle,
        bindings: SharedBindings,
        methods: Rc<Methods>,
        receiver: ThisProxy,
    ) -> Self {
        Self {
            host,
            root,
            bindings,
            methods,
            receiver,
        }
    }

    /// Attach one listener per distinct event type currently in the table.
    /// Returns the types bound, in first-seen order.
    pub fn bind(&self) -> Result<Vec<String>> {
        let types = self.bindings.borrow().event_types();
        for event_type in &types {
            self.host
                .add_event_listener(&self.root, event_type, self.listener())?;
            tracing::debug!(root = %self.root, event_type = %event_type, "binder.listen");
        }
        Ok(types)
    }

    fn listener(&self) -> Listener {
        let bindings = Rc::clone(&self.bindings);
        let methods = Rc::clone(&self.methods);
        let receiver = self.receiver.clone();
        Rc::new(move |event: &HostEvent| -> std::result::Result<(), BoxError> {
            dispatch(&bindings, &methods, &receiver, event)?;
            Ok(())
        })
    }
}

/// Run the method bound to `event`'s target, if any. Returns whether a
/// method ran.
pub(crate) fn dispatch(
    bindings: &SharedBindings,
    methods: &Methods,
    receiver: &ThisProxy,
    event: &HostEvent,
) -> Result<bool> {
    let Some(target) = event.target_id.as_deref() else {
        return Ok(false);
    };
    // Release the table before running the method: it may re-render.
    let method_name = match bindings.borrow().find(target, &event.event_type) {
        Some(binding) => binding.method.clone(),
        None => return Ok(false),
    };
    let Some(method) = methods.get(&method_name).cloned() else {
        tracing::debug!(method = %method_name, target, "binder.missing_method");
        return Ok(false);
    };
    tracing::debug!(method = %method_name, target, event_type = %event.event_type, "binder.dispatch");
    method(receiver).map_err(|source| EngineError::Method {
        name: method_name,
        source,
    })?;
    Ok(true)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
