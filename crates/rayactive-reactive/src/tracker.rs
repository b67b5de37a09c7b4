#![forbid(unsafe_code)]

//! Explicit dependency-collection scope.
//!
//! A [`Tracker`] holds the single "currently collecting" watcher slot shared
//! by every observable of one data tree. Collection is scoped: [`Tracker::begin`]
//! fills the slot and the returned [`CollectionScope`] empties it on drop.
//!
//! # Invariants
//!
//! 1. At most one watcher collects at a time. `begin` while the slot is
//!    occupied fails with [`ReactiveError::CollectionInProgress`] and leaves
//!    the active watcher untouched.
//! 2. The slot is empty again as soon as the scope is dropped, including on
//!    early return or unwinding.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::error::ReactiveError;
use crate::watcher::{Watcher, WatcherId};

#[derive(Default)]
struct TrackerInner {
    active: RefCell<Option<Rc<Watcher>>>,
    next_id: Cell<u64>,
}

/// Shared collection context. Cloning yields a handle to the same slot.
#[derive(Clone, Default)]
pub struct Tracker {
    inner: Rc<TrackerInner>,
}

impl Tracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next watcher id. Ids start at 1 and never repeat.
    pub(crate) fn next_watcher_id(&self) -> WatcherId {
        let id = self.inner.next_id.get() + 1;
        self.inner.next_id.set(id);
        WatcherId::new(id)
    }

    /// Start collecting on behalf of `watcher`.
    pub fn begin(&self, watcher: Rc<Watcher>) -> Result<CollectionScope<'_>, ReactiveError> {
        let mut slot = self.inner.active.borrow_mut();
        if let Some(active) = slot.as_ref() {
            return Err(ReactiveError::CollectionInProgress {
                active: active.id(),
                requested: watcher.id(),
            });
        }
        tracing::trace!(watcher = %watcher.id(), "tracker.begin");
        *slot = Some(watcher);
        Ok(CollectionScope { tracker: self })
    }

    /// The watcher currently collecting, if any.
    #[must_use]
    pub fn active(&self) -> Option<Rc<Watcher>> {
        self.inner.active.borrow().clone()
    }

    #[must_use]
    pub fn is_collecting(&self) -> bool {
        self.inner.active.borrow().is_some()
    }

    /// Whether both handles share one slot.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Tracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracker")
            .field(
                "active",
                &self.inner.active.borrow().as_ref().map(|w| w.id()),
            )
            .field("issued", &self.inner.next_id.get())
            .finish()
    }
}

/// Guard for an in-progress collection. Clears the slot on drop.
#[must_use = "collection ends as soon as the scope is dropped"]
pub struct CollectionScope<'a> {
    tracker: &'a Tracker,
}

impl Drop for CollectionScope<'_> {
    fn drop(&mut self) {
        self.tracker.inner.active.borrow_mut().take();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observable::Observable;
    use crate::value::Map;

    fn noop_watcher(source: &Observable) -> Rc<Watcher> {
        Watcher::new(source, "x", |_| Ok(())).expect("watcher")
    }

    #[test]
    fn scope_clears_slot_on_drop() {
        let source = Observable::new(Map::new());
        let tracker = source.tracker().clone();
        let watcher = noop_watcher(&source);
        {
            let _scope = tracker.begin(Rc::clone(&watcher)).expect("begin");
            assert!(tracker.is_collecting());
            assert_eq!(tracker.active().map(|w| w.id()), Some(watcher.id()));
        }
        assert!(!tracker.is_collecting());
    }

    #[test]
    fn nested_begin_is_refused() {
        let source = Observable::new(Map::new());
        let tracker = source.tracker().clone();
        let first = noop_watcher(&source);
        let second = noop_watcher(&source);

        let _scope = tracker.begin(Rc::clone(&first)).expect("begin");
        let err = tracker.begin(Rc::clone(&second)).err().expect("refused");
        assert!(matches!(
            err,
            ReactiveError::CollectionInProgress { active, requested }
                if active == first.id() && requested == second.id()
        ));
        // The first collection is still the active one.
        assert_eq!(tracker.active().map(|w| w.id()), Some(first.id()));
    }

    #[test]
    fn watcher_ids_are_monotonic() {
        let tracker = Tracker::new();
        let a = tracker.next_watcher_id();
        let b = tracker.next_watcher_id();
        assert!(b.raw() > a.raw());
        assert_eq!(a.raw(), 1);
    }
}
