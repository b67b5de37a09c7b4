#![forbid(unsafe_code)]

//! RayActive: a minimal reactive view binding.
//!
//! A [`ViewModel`] carries a data object, an HTML template with `{{key}}`
//! placeholders and at most one `@event="method"` attribute, and a set of
//! methods. [`RayActive`] mounts it on a host element:
//!
//! - the template is rendered into the root element;
//! - every placeholder gets a watcher, so any write to the data re-renders
//!   the whole template synchronously;
//! - the bound element gets a fresh id per render, recorded in the Event
//!   Binding Table;
//! - one delegated listener per event type on the root runs the bound method
//!   with a [`ThisProxy`] receiver.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use rayactive::prelude::*;
//!
//! let host = Rc::new(MemoryHost::new().with_element("root"));
//! let vm = ViewModel::new("<p>{{name}}</p>").with_data("name", "Ray");
//! let engine = RayActive::new(vm, host.clone()).unwrap();
//!
//! engine.data().set("name", "Jack").unwrap();
//! assert_eq!(host.inner_html(&engine.root()).unwrap(), "<p>Jack</p>");
//! ```

pub mod binder;
pub mod compiler;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod ids;
pub mod template;
pub mod this_proxy;
pub mod view_model;

pub use compiler::{Compiler, SharedBindings};
pub use config::{DEFAULT_ID_PREFIX, DEFAULT_ROOT_ID, EngineConfig, IdStrategy};
pub use engine::RayActive;
pub use error::{EngineError, Result};
pub use events::{EventBinding, EventBindingTable};
pub use ids::{IdGenerator, RandomIds, SequentialIds};
pub use template::{BindingSite, Segment, Template};
pub use this_proxy::{Member, ThisProxy};
pub use view_model::{Method, Methods, ViewModel};

pub use rayactive_dom as dom;
pub use rayactive_reactive as reactive;

pub mod prelude {
    pub use crate::{EngineConfig, EngineError, IdStrategy, Member, RayActive, ThisProxy, ViewModel};
    pub use rayactive_dom::{ElementHandle, Host, HostEvent, MemoryHost};
    pub use rayactive_reactive::{BoxError, Field, Map, Observable, Value};
}
