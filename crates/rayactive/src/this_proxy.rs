#![forbid(unsafe_code)]

//! The receiver handed to view-model methods.
//!
//! Reads look in `data` first and fall back to a method of the same name when
//! the data value is falsy, yielding `undefined` if there is none. Writes always go through the observable proxy so
//! that method mutations reach the watchers.

use std::fmt;
use std::rc::Rc;

use rayactive_reactive::{Field, Observable, ReactiveError, Value};

use crate::error::{EngineError, Result};
use crate::view_model::{Method, Methods};

/// What a property read through the receiver resolved to.
#[derive(Clone)]
pub enum Member {
    Data(Field),
    Method(Method),
}

impl Member {
    #[must_use]
    pub fn as_field(&self) -> Option<&Field> {
        match self {
            Self::Data(field) => Some(field),
            Self::Method(_) => None,
        }
    }

    #[must_use]
    pub fn is_method(&self) -> bool {
        matches!(self, Self::Method(_))
    }
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Data(field) => f.debug_tuple("Data").field(field).finish(),
            Self::Method(_) => f.write_str("Method(..)"),
        }
    }
}

/// View-model proxy: `data` plus `methods`, writes forwarded to the observable.
#[derive(Clone)]
pub struct ThisProxy {
    data: Observable,
    methods: Rc<Methods>,
}

impl ThisProxy {
    pub(crate) fn new(data: Observable, methods: Rc<Methods>) -> Self {
        Self { data, methods }
    }

    /// `data[name] || methods[name]`: a falsy data value with no method of
    /// that name reads as `undefined`.
    #[must_use]
    pub fn get(&self, name: &str) -> Member {
        let field = self.data.get(name);
        if field.is_truthy() {
            return Member::Data(field);
        }
        match self.methods.get(name) {
            Some(method) => Member::Method(Rc::clone(method)),
            None => Member::Data(Field::undefined()),
        }
    }

    /// Read `data[name]` only.
    #[must_use]
    pub fn data(&self, name: &str) -> Field {
        self.data.get(name)
    }

    /// Write `data[name]` through the observable, notifying its watchers.
    pub fn set(&self, name: impl Into<String>, value: impl Into<Value>) -> std::result::Result<(), ReactiveError> {
        self.data.set(name, value)
    }

    /// Invoke another method with this same receiver.
    pub fn call(&self, name: &str) -> Result<()> {
        let method = self
            .methods
            .get(name)
            .cloned()
            .ok_or_else(|| EngineError::UnknownMethod {
                name: name.to_owned(),
            })?;
        method(self).map_err(|source| EngineError::Method {
            name: name.to_owned(),
            source,
        })
    }

    /// The observable behind `data`.
    #[must_use]
    pub fn observable(&self) -> &Observable {
        &self.data
    }
}

impl fmt::Debug for ThisProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThisProxy")
            .field("data", &self.data.keys())
            .field("methods", &self.methods)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
