#![forbid(unsafe_code)]

//! Dependency-tracking reactivity for RayActive.
//!
//! - [`Observable`]: proxy over one data object; reads register the
//!   collecting watcher, writes notify.
//! - [`Dep`]: the per-object watcher list.
//! - [`Watcher`]: one `(object, property)` interest with a callback.
//! - [`Tracker`]: the explicit collection scope shared by one data tree.
//!
//! # Architecture
//!
//! Everything is single-threaded and synchronous: `Rc<RefCell<..>>` for shared
//! state, no deferral. A write calls `Dep::notify`, which calls each
//! watcher's `update`, which runs the callback before `set` returns.
//!
//! Granularity is per object, not per property: every watcher that read any
//! property of an object is updated by a write to any property of it.

mod dep;
mod error;
mod observable;
mod tracker;
mod value;
mod watcher;

pub use dep::Dep;
pub use error::{BoxError, ReactiveError};
pub use observable::{Observable, WeakObservable};
pub use tracker::{CollectionScope, Tracker};
pub use value::{Field, Map, Value};
pub use watcher::{Watcher, WatcherId};
