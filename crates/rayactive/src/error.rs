use rayactive_dom::DomError;
use rayactive_reactive::{BoxError, ReactiveError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("root element not found: #{id}")]
    RootNotFound { id: String },

    #[error("view-model data must be an object, got {found}")]
    InvalidData { found: String },

    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("unknown method `{name}`")]
    UnknownMethod { name: String },

    #[error("method `{name}` failed: {source}")]
    Method {
        name: String,
        #[source]
        source: BoxError,
    },

    #[error("entropy source unavailable: {0}")]
    Entropy(getrandom::Error),

    #[error(transparent)]
    Reactive(#[from] ReactiveError),

    #[error(transparent)]
    Dom(#[from] DomError),
}

impl EngineError {
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}
