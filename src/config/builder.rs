use std::path::Path;

use toml::Table;

use super::env::EnvSource;
use super::file::FileSource;
use super::resolve::resolve_references;
use super::source::{merge_at_path, ConfigSource, DefaultsSource};
use super::ConfigError;

/// Layered configuration loader.
///
/// Sources are merged in registration order, later sources overriding
/// earlier ones. Nested tables are merged recursively; other values
/// (including arrays) are replaced entirely.
///
/// Top-level keys are lower-cased as each layer is merged, so `HOST` in a
/// file and `host` from the defaults are the same key and the later layer
/// wins. Nested keys keep their case.
///
/// ## Variable References
///
/// String values can reference other values using `${path.to.field}`:
///
/// ```toml
/// host = "localhost"
/// port = 8080
/// url = "http://${host}:${port}/api"
/// ```
///
/// Use `$$` to escape a literal `$` (e.g., `$${VAR}` becomes `${VAR}`).
///
/// ## Example
///
/// ```no_run
/// use setkit::Config;
///
/// let loader = Config::builder()
///     .with_file("settings.toml", true)
///     .with_file("settings.local.toml", false)
///     .with_env("MYAPP", "__");
///
/// let merged = loader.load()?;
/// # Ok::<(), setkit::ConfigError>(())
/// ```
#[derive(Debug, Default)]
#[must_use = "a loader does nothing until .load() is called"]
pub struct Config {
    sources: Vec<Box<dyn ConfigSource>>,
    environment: Option<String>,
}

impl Config {
    /// Creates an empty loader.
    pub fn builder() -> Self {
        Self::default()
    }

    /// Adds an in-memory table of default values.
    ///
    /// Register defaults first so that every later layer can override them.
    pub fn with_defaults(self, defaults: Table) -> Self {
        self.with_source(DefaultsSource::new(defaults))
    }

    /// Adds a TOML file.
    ///
    /// If `required` is `true`, loading fails if the file doesn't exist.
    /// Optional files that are missing are skipped.
    pub fn with_file(self, path: impl AsRef<Path>, required: bool) -> Self {
        self.with_source(FileSource::new(path, required))
    }

    /// Adds environment variables with the given prefix.
    ///
    /// Environment variables are mapped to config paths by:
    /// 1. Removing the prefix and separator
    /// 2. Splitting remaining segments on the separator
    /// 3. Converting path segments to lowercase
    ///
    /// Values are coerced from strings to the most specific type:
    /// boolean, integer, float, or string (fallback).
    ///
    /// ```no_run
    /// # use setkit::Config;
    /// // defaults -> file -> env overrides
    /// let loader = Config::builder()
    ///     .with_file("settings.toml", true)
    ///     .with_env("MYAPP", "__");
    /// ```
    pub fn with_env(self, prefix: impl Into<String>, separator: impl Into<String>) -> Self {
        self.with_source(EnvSource::new(prefix, separator))
    }

    /// Adds a custom source.
    pub fn with_source(mut self, source: impl ConfigSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Reads files as environment sections.
    ///
    /// Each file's `[default]` table is applied, then the table named `env`.
    /// Defaults and environment variables are not sectioned.
    pub fn with_environment(mut self, env: impl Into<String>) -> Self {
        self.environment = Some(env.into());
        self
    }

    /// Loads every source, merges them, and resolves references.
    ///
    /// Sources are read again on every call; nothing is cached.
    pub fn load(&self) -> Result<Table, ConfigError> {
        let mut merged = Table::new();
        let environment = self.environment.as_deref();

        for source in &self.sources {
            for entry in source.entries(environment)? {
                let entry = entry.fold_top_level_case();
                merge_at_path(&mut merged, &entry.path, entry.value);
            }
        }

        resolve_references(&mut merged)?;

        tracing::debug!(
            sources = self.sources.len(),
            keys = merged.len(),
            environment = environment.unwrap_or("-"),
            "loaded layered configuration"
        );
        Ok(merged)
    }
}
