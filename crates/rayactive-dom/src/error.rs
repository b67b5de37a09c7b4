use thiserror::Error;

use crate::host::ElementHandle;

/// Boxed error raised by event listeners.
pub type BoxError = Box<dyn std::error::Error + 'static>;

#[derive(Debug, Error)]
pub enum DomError {
    #[error("unknown element handle {0}")]
    UnknownElement(ElementHandle),

    #[error("no element with id `{id}` is rendered under {root}")]
    TargetNotRendered { root: ElementHandle, id: String },

    #[error("listener for `{event_type}` failed: {source}")]
    Listener {
        event_type: String,
        #[source]
        source: BoxError,
    },
}
