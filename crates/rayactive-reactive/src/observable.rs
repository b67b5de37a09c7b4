#![forbid(unsafe_code)]

//! Observable proxies over plain data objects.
//!
//! An [`Observable`] owns the property slots of one object together with that
//! object's [`Dep`]. Reads go through [`Observable::get`], writes through
//! [`Observable::set`].
//!
//! # Invariants
//!
//! 1. Object-valued slots are wrapped lazily: the first read replaces the
//!    plain object in its slot with a fresh nested proxy, and every later
//!    read returns that same proxy. A nested proxy belongs to exactly one
//!    parent slot.
//! 2. A read while a watcher is collecting registers that watcher with this
//!    object's `Dep`, whether or not the key exists.
//! 3. A write stores the value unconditionally (no equality check) and then
//!    notifies every watcher registered with this object, whichever property
//!    they track.
//! 4. Nested proxies share the root's [`Tracker`].
//!
//! # Failure Modes
//!
//! - **Callback error during a write**: the value is already stored; the
//!   error is returned from `set` and the remaining watchers are skipped.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::dep::Dep;
use crate::error::ReactiveError;
use crate::tracker::Tracker;
use crate::value::{Field, Map, Value};

enum Slot {
    Plain(Value),
    Observed(Observable),
}

impl Slot {
    fn read(&mut self, tracker: &Tracker) -> Field {
        if let Self::Plain(Value::Object(map)) = self {
            let nested = Observable::with_tracker(std::mem::take(map), tracker.clone());
            *self = Self::Observed(nested);
        }
        match self {
            Self::Plain(value) => Field::Value(value.clone()),
            Self::Observed(nested) => Field::Object(nested.clone()),
        }
    }

    fn snapshot(&self) -> Value {
        match self {
            Self::Plain(value) => value.clone(),
            Self::Observed(nested) => nested.snapshot(),
        }
    }
}

struct ObservableInner {
    slots: RefCell<BTreeMap<String, Slot>>,
    dep: Dep,
    tracker: Tracker,
}

/// Reactive proxy over one data object.
///
/// Cloning an `Observable` creates a new handle to the **same** object.
#[derive(Clone)]
pub struct Observable {
    inner: Rc<ObservableInner>,
}

impl Observable {
    /// Wrap `map` with a fresh tracker.
    #[must_use]
    pub fn new(map: Map) -> Self {
        Self::with_tracker(map, Tracker::new())
    }

    /// Wrap `map`, sharing an existing tracker.
    #[must_use]
    pub fn with_tracker(map: Map, tracker: Tracker) -> Self {
        let slots = map.into_iter().map(|(k, v)| (k, Slot::Plain(v))).collect();
        Self {
            inner: Rc::new(ObservableInner {
                slots: RefCell::new(slots),
                dep: Dep::new(),
                tracker,
            }),
        }
    }

    /// Wrap an object value; anything else is rejected.
    pub fn try_from_value(value: Value) -> Result<Self, ReactiveError> {
        match value {
            Value::Object(map) => Ok(Self::new(map)),
            other => Err(ReactiveError::NotAnObject {
                found: other.to_string(),
            }),
        }
    }

    /// Read `name`, wrapping a nested object on first access and registering
    /// the collecting watcher, if any.
    pub fn get(&self, name: &str) -> Field {
        let field = {
            let mut slots = self.inner.slots.borrow_mut();
            match slots.get_mut(name) {
                Some(slot) => slot.read(&self.inner.tracker),
                None => Field::undefined(),
            }
        };
        if let Some(watcher) = self.inner.tracker.active() {
            self.inner.dep.add_watcher(watcher);
        }
        field
    }

    /// Store `value` under `name` and notify this object's watchers.
    pub fn set(&self, name: impl Into<String>, value: impl Into<Value>) -> Result<(), ReactiveError> {
        let name = name.into();
        let value = value.into();
        tracing::trace!(property = %name, value = %value, watchers = self.inner.dep.len(), "observable.set");
        self.inner
            .slots
            .borrow_mut()
            .insert(name, Slot::Plain(value));
        self.inner.dep.notify()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.inner.slots.borrow().contains_key(name)
    }

    /// Property names in key order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.inner.slots.borrow().keys().cloned().collect()
    }

    /// Deep plain copy of the current state. Neither wraps nor registers.
    #[must_use]
    pub fn snapshot(&self) -> Value {
        Value::Object(
            self.inner
                .slots
                .borrow()
                .iter()
                .map(|(k, slot)| (k.clone(), slot.snapshot()))
                .collect(),
        )
    }

    /// This object's dependency registry.
    #[must_use]
    pub fn dep(&self) -> &Dep {
        &self.inner.dep
    }

    #[must_use]
    pub fn tracker(&self) -> &Tracker {
        &self.inner.tracker
    }

    /// Whether both handles point at the same object.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    #[must_use]
    pub fn downgrade(&self) -> WeakObservable {
        WeakObservable {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

impl fmt::Debug for Observable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("keys", &self.keys())
            .field("dep", &self.inner.dep)
            .finish()
    }
}

/// Non-owning handle to an [`Observable`].
#[derive(Clone, Debug)]
pub struct WeakObservable {
    inner: Weak<ObservableInner>,
}

impl WeakObservable {
    #[must_use]
    pub fn upgrade(&self) -> Option<Observable> {
        self.inner.upgrade().map(|inner| Observable { inner })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::watcher::Watcher;
    use std::cell::Cell;

    fn person() -> Observable {
        let value = Value::from(serde_json::json!({
            "name": "Ray",
            "age": 18,
            "profile": { "city": "NY" },
        }));
        Observable::try_from_value(value).expect("object")
    }

    fn counter() -> (Rc<Cell<u32>>, impl Fn(&Field) -> Result<(), crate::BoxError> + 'static) {
        let fired = Rc::new(Cell::new(0u32));
        let fired_cb = Rc::clone(&fired);
        (fired, move |_: &Field| {
            fired_cb.set(fired_cb.get() + 1);
            Ok(())
        })
    }

    #[test]
    fn reads_return_stored_values() {
        let data = person();
        assert_eq!(data.get("name").to_string(), "Ray");
        assert_eq!(data.get("age").to_string(), "18");
        assert_eq!(data.get("missing").to_string(), "undefined");
    }

    #[test]
    fn plain_reads_do_not_register() {
        let data = person();
        let _ = data.get("name");
        assert!(data.dep().is_empty());
    }

    #[test]
    fn nested_object_is_wrapped_once() {
        let data = person();
        let first = data.get("profile");
        let second = data.get("profile");
        let (Some(a), Some(b)) = (first.as_object(), second.as_object()) else {
            panic!("profile should read as a proxy");
        };
        assert!(a.ptr_eq(b));
        assert!(first.strict_eq(&second));
        assert!(a.tracker().ptr_eq(data.tracker()));
        assert!(!a.dep().ptr_eq(data.dep()));
    }

    #[test]
    fn nested_watcher_registers_on_nested_dep_only() {
        let data = person();
        let profile = data.get("profile").as_object().cloned().expect("proxy");

        let (root_fired, root_cb) = counter();
        let _root = Watcher::new(&data, "name", root_cb).expect("watcher");
        let (city_fired, city_cb) = counter();
        let _city = Watcher::new(&profile, "city", city_cb).expect("watcher");

        assert_eq!(data.dep().len(), 1);
        assert_eq!(profile.dep().len(), 1);

        profile.set("city", "LA").expect("set");
        assert_eq!(city_fired.get(), 1);
        assert_eq!(root_fired.get(), 0);
        assert_eq!(data.get("profile").as_object().map(|p| p.get("city").to_string()), Some("LA".into()));
    }

    #[test]
    fn write_to_untracked_property_notifies_all() {
        let data = person();
        let (fired, cb) = counter();
        let _w = Watcher::new(&data, "name", cb).expect("watcher");
        data.set("name", "Jack").expect("set");
        assert_eq!(fired.get(), 1);
        // `mood` is tracked by nobody, but the object's watchers still update.
        data.set("mood", "calm").expect("set");
        assert_eq!(fired.get(), 2);
    }

    #[test]
    fn writes_skip_equality_check() {
        let data = person();
        let (fired, cb) = counter();
        let _w = Watcher::new(&data, "age", cb).expect("watcher");
        data.set("age", 18).expect("set");
        // Notified, but the value equals the baseline.
        assert_eq!(fired.get(), 0);
    }

    #[test]
    fn overwriting_a_nested_object_rewraps_lazily() {
        let data = person();
        let old = data.get("profile").as_object().cloned().expect("proxy");
        let mut replacement = Map::new();
        replacement.insert("city".into(), Value::from("SF"));
        data.set("profile", replacement).expect("set");
        let new = data.get("profile").as_object().cloned().expect("proxy");
        assert!(!old.ptr_eq(&new));
        assert_eq!(new.get("city").to_string(), "SF");
    }

    #[test]
    fn snapshot_is_plain_and_deep() {
        let data = person();
        let _ = data.get("profile");
        let snap = data.snapshot().to_json();
        assert_eq!(snap["profile"]["city"], "NY");
        assert_eq!(snap["age"], 18.0);
    }

    #[test]
    fn try_from_value_rejects_scalars() {
        let err = Observable::try_from_value(Value::from(3)).expect_err("scalar");
        assert!(matches!(err, ReactiveError::NotAnObject { ref found } if found == "3"));
    }
}
