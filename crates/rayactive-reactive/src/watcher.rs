#![forbid(unsafe_code)]

//! Watchers: one tracked `(object, property)` pair plus a callback.
//!
//! Construction collects: the watcher enters the tracker's collection scope,
//! reads its property through the proxy (which registers it with that
//! object's [`Dep`](crate::Dep)) and keeps the value read as its baseline.
//!
//! The baseline is captured once and never refreshed. `update` compares the
//! current value against the value seen at construction, so after `v0 -> v1`
//! fires, a later `v1 -> v0` write does not fire (it equals the baseline),
//! while any other write keeps firing even when it repeats the previous one.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::{BoxError, ReactiveError};
use crate::observable::{Observable, WeakObservable};
use crate::value::Field;

/// Unique id of a watcher within one tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WatcherId(u64);

impl WatcherId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for WatcherId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.0)
    }
}

type Callback = Box<dyn Fn(&Field) -> Result<(), BoxError>>;

/// Registered interest in one property of one observable.
pub struct Watcher {
    id: WatcherId,
    source: WeakObservable,
    property: String,
    callback: Callback,
    baseline: RefCell<Field>,
}

impl Watcher {
    /// Create a watcher on `source[property]` and collect it.
    ///
    /// Fails if another watcher of the same data tree is collecting.
    pub fn new(
        source: &Observable,
        property: impl Into<String>,
        callback: impl Fn(&Field) -> Result<(), BoxError> + 'static,
    ) -> Result<Rc<Self>, ReactiveError> {
        let tracker = source.tracker();
        let watcher = Rc::new(Self {
            id: tracker.next_watcher_id(),
            source: source.downgrade(),
            property: property.into(),
            callback: Box::new(callback),
            baseline: RefCell::new(Field::undefined()),
        });

        let value = {
            let _scope = tracker.begin(Rc::clone(&watcher))?;
            source.get(&watcher.property)
        };
        tracing::trace!(
            watcher = %watcher.id,
            property = %watcher.property,
            baseline = %value,
            "watcher.created"
        );
        *watcher.baseline.borrow_mut() = value;
        Ok(watcher)
    }

    #[must_use]
    pub fn id(&self) -> WatcherId {
        self.id
    }

    #[must_use]
    pub fn property(&self) -> &str {
        &self.property
    }

    /// The value captured at construction.
    #[must_use]
    pub fn baseline(&self) -> Field {
        self.baseline.borrow().clone()
    }

    /// Re-read the property and run the callback if it differs from the
    /// baseline. A dropped source makes this a no-op.
    pub fn update(&self) -> Result<(), ReactiveError> {
        let Some(source) = self.source.upgrade() else {
            return Ok(());
        };
        let current = source.get(&self.property);
        let changed = !current.strict_eq(&self.baseline.borrow());
        if !changed {
            return Ok(());
        }
        tracing::trace!(watcher = %self.id, property = %self.property, value = %current, "watcher.update");
        (self.callback)(&current).map_err(|source| ReactiveError::Callback {
            watcher: self.id,
            property: self.property.clone(),
            source,
        })
    }
}

impl fmt::Debug for Watcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Watcher")
            .field("id", &self.id)
            .field("property", &self.property)
            .field("baseline", &self.baseline.borrow().to_string())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
