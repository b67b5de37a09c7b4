#![forbid(unsafe_code)]

//! Engine configuration.
//!
//! Defaults mount on the element with id `root` and generate random binding
//! ids. [`EngineConfig::from_env`] reads overrides from `RAYACTIVE_*`
//! variables:
//!
//! | variable | values |
//! |---|---|
//! | `RAYACTIVE_ROOT_ID` | any non-empty element id |
//! | `RAYACTIVE_ID_STRATEGY` | `random` or `sequential` |
//! | `RAYACTIVE_ID_PREFIX` | prefix for sequential ids (default `ra`) |

use crate::error::{EngineError, Result};
use crate::ids::{IdGenerator, RandomIds, SequentialIds};

/// Element id the engine mounts on unless configured otherwise.
pub const DEFAULT_ROOT_ID: &str = "root";

/// Prefix of sequential binding ids unless configured otherwise.
pub const DEFAULT_ID_PREFIX: &str = "ra";

/// How binding ids are generated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum IdStrategy {
    /// OS entropy, base-36.
    #[default]
    Random,
    /// `prefix` followed by a base-36 counter. Reproducible.
    Sequential { prefix: String },
}

impl IdStrategy {
    #[must_use]
    pub fn sequential(prefix: impl Into<String>) -> Self {
        Self::Sequential {
            prefix: prefix.into(),
        }
    }

    pub(crate) fn generator(&self) -> Box<dyn IdGenerator> {
        match self {
            Self::Random => Box::new(RandomIds),
            Self::Sequential { prefix } => Box::new(SequentialIds::new(prefix.clone())),
        }
    }
}

/// Configuration for [`RayActive`](crate::RayActive).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Id of the host element that receives the markup and the listeners.
    pub root_id: String,
    /// Binding id generation.
    pub ids: IdStrategy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            root_id: DEFAULT_ROOT_ID.to_owned(),
            ids: IdStrategy::default(),
        }
    }
}

impl EngineConfig {
    /// Mount on a different element.
    #[must_use]
    pub fn with_root_id(mut self, root_id: impl Into<String>) -> Self {
        self.root_id = root_id.into();
        self
    }

    /// Set the id strategy.
    #[must_use]
    pub fn with_ids(mut self, ids: IdStrategy) -> Self {
        self.ids = ids;
        self
    }

    /// Use sequential ids with `prefix`.
    #[must_use]
    pub fn with_sequential_ids(self, prefix: impl Into<String>) -> Self {
        self.with_ids(IdStrategy::sequential(prefix))
    }

    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(root_id) = lookup("RAYACTIVE_ROOT_ID") {
            if root_id.trim().is_empty() {
                return Err(EngineError::invalid_config("RAYACTIVE_ROOT_ID is empty"));
            }
            config.root_id = root_id;
        }

        let prefix = lookup("RAYACTIVE_ID_PREFIX").unwrap_or_else(|| DEFAULT_ID_PREFIX.to_owned());
        if let Some(strategy) = lookup("RAYACTIVE_ID_STRATEGY") {
            config.ids = match strategy.trim().to_ascii_lowercase().as_str() {
                "random" => IdStrategy::Random,
                "sequential" => IdStrategy::sequential(prefix),
                other => {
                    return Err(EngineError::invalid_config(format!(
                        "RAYACTIVE_ID_STRATEGY must be `random` or `sequential`, got `{other}`"
                    )));
                }
            };
        }

        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
