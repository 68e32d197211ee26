//! Composing layered configuration into a validated settings object.

mod director;
mod store;
mod transform;
mod validate;

pub use director::{normalize_keys, SettingsDirector};
pub use store::SettingsStore;
pub use transform::{Chain, Defaults, Redact, RenameKeys, SettingsTransformer, TransformError};
pub use validate::{construct, UnknownKeys, ValidationError};

/// Flat mapping from configuration key to value.
pub type SettingsMap = toml::Table;
