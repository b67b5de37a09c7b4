#![forbid(unsafe_code)]

//! Host document boundary.
//!
//! The engine touches its host through three calls only: find an element by
//! id, replace an element's inner markup, and add an event listener to an
//! element. [`Host`] captures exactly those; [`MemoryHost`] implements them
//! over an in-memory document for tests and headless runs.

mod error;
mod host;
mod memory;

pub use error::{BoxError, DomError};
pub use host::{ElementHandle, Host, HostEvent, Listener};
pub use memory::MemoryHost;
