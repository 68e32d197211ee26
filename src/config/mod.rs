//! Layered configuration loading.

mod builder;
mod env;
mod error;
mod file;
mod loader;
mod resolve;
mod source;

pub use builder::Config;
pub use env::EnvSource;
pub use error::ConfigError;
pub use file::{FileSource, DEFAULT_ENVIRONMENT};
pub use loader::Loader;
pub use source::{ConfigEntry, ConfigSource, DefaultsSource};
