#![forbid(unsafe_code)]

//! Event Binding Table: binding id -> `(event type, method)`.
//!
//! Entries are only ever added. Each compile that renders the binding
//! attribute inserts a new id, so the table grows by one entry per re-render
//! and ids from discarded markup stay behind.

use ahash::AHashMap;

/// What one rendered binding attribute declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventBinding {
    pub event_type: String,
    pub method: String,
}

impl EventBinding {
    #[must_use]
    pub fn new(event_type: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            method: method.into(),
        }
    }
}

/// Insertion-ordered id -> binding map.
#[derive(Debug, Clone, Default)]
pub struct EventBindingTable {
    entries: AHashMap<String, EventBinding>,
    order: Vec<String>,
}

impl EventBindingTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `binding` under `id`. Re-using an id replaces its binding in
    /// place.
    pub fn insert(&mut self, id: impl Into<String>, binding: EventBinding) {
        let id = id.into();
        if self.entries.insert(id.clone(), binding).is_none() {
            self.order.push(id);
        }
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&EventBinding> {
        self.entries.get(id)
    }

    /// Binding for `id` whose event type is `event_type`.
    #[must_use]
    pub fn find(&self, id: &str, event_type: &str) -> Option<&EventBinding> {
        self.get(id).filter(|b| b.event_type == event_type)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &EventBinding)> {
        self.order
            .iter()
            .filter_map(|id| self.entries.get(id).map(|b| (id.as_str(), b)))
    }

    /// Most recently inserted id.
    #[must_use]
    pub fn latest_id(&self) -> Option<&str> {
        self.order.last().map(String::as_str)
    }

    /// Distinct event types, first-seen order.
    #[must_use]
    pub fn event_types(&self) -> Vec<String> {
        let mut types: Vec<String> = Vec::new();
        for (_, binding) in self.iter() {
            if !types.contains(&binding.event_type) {
                types.push(binding.event_type.clone());
            }
        }
        types
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
