use thiserror::Error;

use crate::watcher::WatcherId;

/// Boxed error raised by user callbacks.
pub type BoxError = Box<dyn std::error::Error + 'static>;

#[derive(Debug, Error)]
pub enum ReactiveError {
    #[error("watcher {requested} cannot start collecting while watcher {active} is collecting")]
    CollectionInProgress {
        active: WatcherId,
        requested: WatcherId,
    },

    #[error("callback of watcher {watcher} on `{property}` failed: {source}")]
    Callback {
        watcher: WatcherId,
        property: String,
        #[source]
        source: BoxError,
    },

    #[error("observable data must be an object, got {found}")]
    NotAnObject { found: String },
}
