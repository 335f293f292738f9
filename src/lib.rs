pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::config::cli::LocalStorage;
#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::toml_config::{Assertion, RewriteConfig, Rule};
pub use crate::config::EmitFormat;

pub use crate::core::engine::{RewriteEngine, RewriteOutput, RewriteReport};
pub use crate::core::normalize::{CaseFold, Identity, KeyNormalizer};
pub use crate::core::odict::{CaselessOrderedMultiMap, OrderedMultiMap};
pub use crate::domain::model::{Entry, State, ValueList};
pub use crate::domain::ports::{StateObject, Storage};
pub use crate::utils::error::{OdictError, Result};
