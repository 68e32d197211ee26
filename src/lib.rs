//! Compose layered configuration into validated, typed application settings.
//!
//! A [`Config`] merges defaults, TOML files and environment variables. A
//! [`SettingsDirector`] turns that merged mapping into a settings struct:
//! keys are lower-cased, an optional [`SettingsTransformer`] rewrites the
//! mapping, and serde validates the result. A [`SettingsStore`] holds the
//! current settings for the rest of the application.
//!
//! ```no_run
//! use serde::Deserialize;
//! use setkit::{Config, Director, SettingsDirector, SettingsStore};
//!
//! #[derive(Deserialize)]
//! struct Settings {
//!     host: String,
//!     port: u16,
//! }
//!
//! let loader = Config::builder()
//!     .with_file("settings.toml", true)
//!     .with_env("APP", "__");
//!
//! let store = SettingsStore::new();
//! store.set(SettingsDirector::<Settings>::new().build(&loader)?);
//! # Ok::<(), setkit::Error>(())
//! ```

pub mod builder;
pub mod config;
pub mod context;
mod error;
pub mod settings;

pub use builder::{Builder, Director, FnBuilder};
pub use config::{Config, ConfigError, Loader};
pub use context::AppContext;
pub use error::Error;
pub use settings::{
    SettingsDirector, SettingsMap, SettingsStore, SettingsTransformer, UnknownKeys,
    ValidationError,
};
