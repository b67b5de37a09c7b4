#![forbid(unsafe_code)]

//! User-supplied view-model: data, template and methods.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use rayactive_reactive::{BoxError, Map, Value};

use crate::error::{EngineError, Result};
use crate::this_proxy::ThisProxy;

/// A view-model method. It takes no arguments; its receiver is the
/// [`ThisProxy`] of the running engine.
pub type Method = Rc<dyn Fn(&ThisProxy) -> std::result::Result<(), BoxError>>;

/// Named methods of a view-model.
#[derive(Clone, Default)]
pub struct Methods {
    table: BTreeMap<String, Method>,
}

impl Methods {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        name: impl Into<String>,
        method: impl Fn(&ThisProxy) -> std::result::Result<(), BoxError> + 'static,
    ) {
        self.table.insert(name.into(), Rc::new(method));
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Method> {
        self.table.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.table.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl fmt::Debug for Methods {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

/// Everything the engine consumes at startup.
#[derive(Debug, Clone, Default)]
pub struct ViewModel {
    data: Map,
    render: String,
    methods: Methods,
}

impl ViewModel {
    /// A view-model rendering `render`, with no data and no methods yet.
    #[must_use]
    pub fn new(render: impl Into<String>) -> Self {
        Self {
            render: render.into(),
            ..Self::default()
        }
    }

    /// A view-model whose data comes from a JSON object.
    pub fn from_json(data: serde_json::Value, render: impl Into<String>) -> Result<Self> {
        match Value::from(data) {
            Value::Object(map) => Ok(Self {
                data: map,
                render: render.into(),
                methods: Methods::new(),
            }),
            other => Err(EngineError::InvalidData {
                found: other.to_string(),
            }),
        }
    }

    #[must_use]
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_method(
        mut self,
        name: impl Into<String>,
        method: impl Fn(&ThisProxy) -> std::result::Result<(), BoxError> + 'static,
    ) -> Self {
        self.methods.insert(name, method);
        self
    }

    #[must_use]
    pub fn data(&self) -> &Map {
        &self.data
    }

    #[must_use]
    pub fn render(&self) -> &str {
        &self.render
    }

    #[must_use]
    pub fn methods(&self) -> &Methods {
        &self.methods
    }

    pub(crate) fn into_parts(self) -> (Map, String, Methods) {
        (self.data, self.render, self.methods)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_collects_parts() {
        let vm = ViewModel::new("<p>{{a}}</p>")
            .with_data("a", 1)
            .with_method("noop", |_| Ok(()));
        assert_eq!(vm.render(), "<p>{{a}}</p>");
        assert_eq!(vm.data().get("a"), Some(&Value::Number(1.0)));
        assert!(vm.methods().contains("noop"));
        assert_eq!(format!("{:?}", vm.methods()), r#"{"noop"}"#);
    }

    #[test]
    fn from_json_requires_an_object() {
        let vm = ViewModel::from_json(serde_json::json!({"name": "Ray"}), "{{name}}")
            .expect("object data");
        assert_eq!(vm.data().get("name"), Some(&Value::from("Ray")));

        let err = ViewModel::from_json(serde_json::json!(5), "x").expect_err("scalar data");
        assert!(matches!(err, EngineError::InvalidData { ref found } if found == "5"));
    }
}
