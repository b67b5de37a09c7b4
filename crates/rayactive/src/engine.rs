#![forbid(unsafe_code)]

//! The [`RayActive`] facade: wires data, compiler, binder and `this`.
//!
//! Construction runs in a fixed order:
//!
//! 1. resolve the root element;
//! 2. wrap the view-model data in an [`Observable`];
//! 3. compile once, which registers one watcher per placeholder and fills
//!    the Event Binding Table;
//! 4. bind one delegated listener per event type now in the table.
//!
//! After that the engine is driven entirely by data writes and host events.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use rayactive_dom::{ElementHandle, Host};
use rayactive_reactive::{Field, Observable};

use crate::binder::EventBinder;
use crate::compiler::{Compiler, SharedBindings};
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::events::EventBindingTable;
use crate::template::Template;
use crate::this_proxy::ThisProxy;
use crate::view_model::ViewModel;

/// A mounted view-model.
pub struct RayActive {
    host: Rc<dyn Host>,
    root: ElementHandle,
    data: Observable,
    compiler: Rc<Compiler>,
    this: ThisProxy,
    bindings: SharedBindings,
    bound_types: Vec<String>,
}

impl RayActive {
    /// Mount `vm` on the element with id `root` using random binding ids.
    pub fn new(vm: ViewModel, host: Rc<dyn Host>) -> Result<Self> {
        Self::with_config(vm, host, EngineConfig::default())
    }

    /// Mount `vm` according to `config`.
    pub fn with_config(vm: ViewModel, host: Rc<dyn Host>, config: EngineConfig) -> Result<Self> {
        let root = host
            .get_element_by_id(&config.root_id)
            .ok_or_else(|| EngineError::RootNotFound {
                id: config.root_id.clone(),
            })?;

        let (map, render, methods) = vm.into_parts();
        let data = Observable::new(map);
        let methods = Rc::new(methods);
        let bindings: SharedBindings = Rc::new(RefCell::new(EventBindingTable::new()));

        let compiler = Compiler::new(
            Template::parse(render),
            data.clone(),
            Rc::clone(&host),
            root,
            Rc::clone(&bindings),
            config.ids.generator(),
        );
        compiler.compile()?;

        let this = ThisProxy::new(data.clone(), Rc::clone(&methods));
        let binder = EventBinder::new(
            Rc::clone(&host),
            root,
            Rc::clone(&bindings),
            methods,
            this.clone(),
        );
        let bound_types = binder.bind()?;

        tracing::info!(
            root_id = %config.root_id,
            watchers = compiler.watcher_count(),
            bindings = bindings.borrow().len(),
            event_types = ?bound_types,
            "rayactive.mounted"
        );

        Ok(Self {
            host,
            root,
            data,
            compiler,
            this,
            bindings,
            bound_types,
        })
    }

    /// The observable view-model data. Writes re-render synchronously.
    #[must_use]
    pub fn data(&self) -> &Observable {
        &self.data
    }

    /// Shorthand for `data().get(name)`.
    #[must_use]
    pub fn get(&self, name: &str) -> Field {
        self.data.get(name)
    }

    /// The receiver methods run with.
    #[must_use]
    pub fn this(&self) -> &ThisProxy {
        &self.this
    }

    #[must_use]
    pub fn root(&self) -> ElementHandle {
        self.root
    }

    #[must_use]
    pub fn host(&self) -> &Rc<dyn Host> {
        &self.host
    }

    /// A copy of the Event Binding Table as it is now.
    #[must_use]
    pub fn bindings(&self) -> EventBindingTable {
        self.bindings.borrow().clone()
    }

    /// Event types that got a delegated listener at mount time.
    #[must_use]
    pub fn bound_event_types(&self) -> &[String] {
        &self.bound_types
    }

    /// Number of completed renders, the mount included.
    #[must_use]
    pub fn render_count(&self) -> u64 {
        self.compiler.render_count()
    }

    #[must_use]
    pub fn watcher_count(&self) -> usize {
        self.compiler.watcher_count()
    }

    /// Markup written by the most recent render.
    #[must_use]
    pub fn markup(&self) -> String {
        self.compiler.last_markup()
    }

    /// Render again without a data write. Mints a new binding id.
    pub fn recompile(&self) -> Result<()> {
        self.compiler.compile()
    }
}

impl fmt::Debug for RayActive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RayActive")
            .field("root", &self.root)
            .field("renders", &self.compiler.render_count())
            .field("watchers", &self.compiler.watcher_count())
            .field("bound_types", &self.bound_types)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IdStrategy;
    use pretty_assertions::assert_eq;
    use rayactive_dom::MemoryHost;

    fn sequential() -> EngineConfig {
        EngineConfig::default().with_ids(IdStrategy::sequential("e"))
    }

    #[test]
    fn missing_root_is_an_error() {
        let host = Rc::new(MemoryHost::new());
        let err = RayActive::new(ViewModel::new("<p>{{a}}</p>"), host).unwrap_err();
        assert!(matches!(err, EngineError::RootNotFound { ref id } if id == "root"));
    }

    #[test]
    fn custom_root_id_is_honored() {
        let host = Rc::new(MemoryHost::new().with_element("app"));
        let vm = ViewModel::new("<p>{{a}}</p>").with_data("a", 1);
        let engine = RayActive::with_config(vm, host.clone(), sequential().with_root_id("app"))
            .expect("mount");
        assert_eq!(host.inner_html(&engine.root()).expect("html"), "<p>1</p>");
    }

    #[test]
    fn mount_renders_and_binds() {
        let host = Rc::new(MemoryHost::new().with_element("root"));
        let vm = ViewModel::new(r#"<b>{{n}}</b><button @click="inc">+</button>"#)
            .with_data("n", 0)
            .with_method("inc", |this| {
                let n = match this.data("n").as_value() {
                    Some(rayactive_reactive::Value::Number(n)) => *n,
                    _ => 0.0,
                };
                this.set("n", n + 1.0)?;
                Ok(())
            });
        let engine = RayActive::with_config(vm, host.clone(), sequential()).expect("mount");

        assert_eq!(engine.markup(), r#"<b>0</b><button @click="inc" id=e1>+</button>"#);
        assert_eq!(engine.bound_event_types().to_vec(), vec!["click".to_owned()]);
        assert_eq!(engine.watcher_count(), 1);

        host.dispatch(&engine.root(), "click", "e1").expect("click");
        assert_eq!(engine.markup(), r#"<b>1</b><button @click="inc" id=e2>+</button>"#);
        assert_eq!(engine.render_count(), 2);
        assert_eq!(engine.bindings().len(), 2);
    }

    #[test]
    fn recompile_mints_a_fresh_id() {
        let host = Rc::new(MemoryHost::new().with_element("root"));
        let vm = ViewModel::new(r#"<a @click="x">{{t}}</a>"#).with_data("t", "hi");
        let engine = RayActive::with_config(vm, host, sequential()).expect("mount");
        engine.recompile().expect("recompile");
        assert_eq!(engine.markup(), r#"<a @click="x" id=e2>hi</a>"#);
        assert_eq!(engine.bindings().latest_id(), Some("e2"));
    }
}
