#![forbid(unsafe_code)]

//! Per-object dependency registry.
//!
//! Every [`Observable`](crate::Observable) owns exactly one [`Dep`]. Any
//! property read during a collection registers the collecting watcher here,
//! and any property write notifies every registered watcher, whichever
//! property it tracks.
//!
//! # Invariants
//!
//! 1. Registration is an unconditional append: a watcher read twice during
//!    one collection is registered twice and updates twice per notify.
//! 2. Watchers are updated in registration order.
//! 3. `notify` walks the list as it was when `notify` started.
//!
//! # Failure Modes
//!
//! - **Callback error**: the first failing watcher aborts the notification;
//!   watchers registered after it are not updated for that write.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::ReactiveError;
use crate::watcher::{Watcher, WatcherId};

/// Ordered list of watchers interested in one object.
#[derive(Clone, Default)]
pub struct Dep {
    watchers: Rc<RefCell<Vec<Rc<Watcher>>>>,
}

impl Dep {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `watcher`. No deduplication.
    pub fn add_watcher(&self, watcher: Rc<Watcher>) {
        self.watchers.borrow_mut().push(watcher);
    }

    /// Update every registered watcher in registration order.
    pub fn notify(&self) -> Result<(), ReactiveError> {
        let snapshot: Vec<Rc<Watcher>> = self.watchers.borrow().clone();
        tracing::trace!(watchers = snapshot.len(), "dep.notify");
        for watcher in &snapshot {
            watcher.update()?;
        }
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.watchers.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.watchers.borrow().is_empty()
    }

    /// Registered watcher ids, duplicates included.
    #[must_use]
    pub fn watcher_ids(&self) -> Vec<WatcherId> {
        self.watchers.borrow().iter().map(|w| w.id()).collect()
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.watchers, &other.watchers)
    }
}

impl fmt::Debug for Dep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dep")
            .field("watchers", &self.watcher_ids())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
