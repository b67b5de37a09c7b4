#![forbid(unsafe_code)]

//! Template compiler: interpolation, binding ids and full re-render.
//!
//! # Design
//!
//! A [`Compiler`] owns one parsed [`Template`] and the observable it reads
//! from. `compile` renders the whole template and replaces the root's markup.
//! The first compile also creates one [`Watcher`] per placeholder occurrence;
//! every watcher callback runs `compile` again, which is how a data write turns
//! into a re-render.
//!
//! # Invariants
//!
//! 1. Watchers are created during the first compile only. Later compiles
//!    substitute values and emit the binding but never collect.
//! 2. Every compile that renders a binding attribute draws a new id and adds a
//!    new entry to the Event Binding Table. Old entries are kept.
//! 3. The root's markup is replaced wholesale on every compile.
//! 4. An empty template never touches the host.
//!
//! # Failure Modes
//!
//! - **Host write fails**: the error is returned; the render counter and
//!   binding table already reflect the attempted render.
//! - **Compile fails inside a watcher callback**: the error surfaces from the
//!   data write that triggered it.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use rayactive_dom::{ElementHandle, Host};
use rayactive_reactive::{Observable, Watcher};

use crate::error::Result;
use crate::events::{EventBinding, EventBindingTable};
use crate::ids::IdGenerator;
use crate::template::Template;

/// Shared handle to the Event Binding Table.
pub type SharedBindings = Rc<RefCell<EventBindingTable>>;

/// Renders one template into one host element.
pub struct Compiler {
    template: Template,
    data: Observable,
    host: Rc<dyn Host>,
    root: ElementHandle,
    bindings: SharedBindings,
    ids: RefCell<Box<dyn IdGenerator>>,
    initialized: Cell<bool>,
    renders: Cell<u64>,
    watchers: RefCell<Vec<Rc<Watcher>>>,
    last_markup: RefCell<String>,
    this: Weak<Compiler>,
}

impl Compiler {
    pub fn new(
        template: Template,
        data: Observable,
        host: Rc<dyn Host>,
        root: ElementHandle,
        bindings: SharedBindings,
        ids: Box<dyn IdGenerator>,
    ) -> Rc<Self> {
        Rc::new_cyclic(|this| Self {
            template,
            data,
            host,
            root,
            bindings,
            ids: RefCell::new(ids),
            initialized: Cell::new(false),
            renders: Cell::new(0),
            watchers: RefCell::new(Vec::new()),
            last_markup: RefCell::new(String::new()),
            this: this.clone(),
        })
    }

    /// Render the template and write it to the root element.
    pub fn compile(&self) -> Result<()> {
        if self.template.is_empty() {
            tracing::debug!("empty template, nothing to render");
            return Ok(());
        }

        let first_pass = !self.initialized.get();
        let render = self.renders.get() + 1;
        let span = tracing::debug_span!(
            "rayactive.compile",
            first_pass,
            render,
            binding_id = tracing::field::Empty
        );
        let _guard = span.enter();

        if first_pass {
            for key in self.template.slots() {
                self.watch(key)?;
            }
        }

        let binding_id = match self.template.binding() {
            Some(site) => {
                let id = self.ids.borrow_mut().next_id()?;
                self.bindings
                    .borrow_mut()
                    .insert(id.clone(), EventBinding::new(site.event_type(), site.method()));
                span.record("binding_id", id.as_str());
                Some(id)
            }
            None => None,
        };

        let markup = self
            .template
            .render(|key| self.data.get(key).to_string(), binding_id.as_deref());

        self.initialized.set(true);
        self.renders.set(render);
        self.host.set_inner_html(&self.root, &markup)?;
        *self.last_markup.borrow_mut() = markup;
        Ok(())
    }

    fn watch(&self, key: &str) -> Result<()> {
        let compiler = self.this.clone();
        let watcher = Watcher::new(&self.data, key, move |_| {
            if let Some(compiler) = compiler.upgrade() {
                compiler.compile()?;
            }
            Ok(())
        })?;
        self.watchers.borrow_mut().push(watcher);
        Ok(())
    }

    #[must_use]
    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Whether the first compile has run.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized.get()
    }

    /// Completed renders so far.
    #[must_use]
    pub fn render_count(&self) -> u64 {
        self.renders.get()
    }

    /// Watchers created by the first compile.
    #[must_use]
    pub fn watcher_count(&self) -> usize {
        self.watchers.borrow().len()
    }

    /// Markup of the last successful render.
    #[must_use]
    pub fn last_markup(&self) -> String {
        self.last_markup.borrow().clone()
    }

    #[must_use]
    pub fn bindings(&self) -> &SharedBindings {
        &self.bindings
    }
}

impl fmt::Debug for Compiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compiler")
            .field("template", &self.template.source())
            .field("root", &self.root)
            .field("initialized", &self.initialized.get())
            .field("renders", &self.renders.get())
            .field("watchers", &self.watcher_count())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
