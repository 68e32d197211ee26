//! Caller-supplied rewrites of the normalized settings mapping.

use toml::Value;

use super::SettingsMap;

/// Error returned by a [`SettingsTransformer`].
pub type TransformError = Box<dyn std::error::Error + Send + Sync>;

/// One opaque rewrite step applied between key normalization and validation.
///
/// The mapping is moved in and handed back, so implementations are free to
/// mutate it or rebuild it from scratch.
///
/// Closures of the right shape are transformers:
///
/// ```
/// use setkit::settings::{SettingsMap, SettingsTransformer, TransformError};
///
/// let drop_secrets = |mut settings: SettingsMap| -> Result<SettingsMap, TransformError> {
///     settings.remove("secret_key");
///     Ok(settings)
/// };
/// let out = drop_secrets.transform(SettingsMap::new()).unwrap();
/// assert!(out.is_empty());
/// ```
pub trait SettingsTransformer: Send + Sync {
    fn transform(&self, settings: SettingsMap) -> Result<SettingsMap, TransformError>;
}

impl<F> SettingsTransformer for F
where
    F: Fn(SettingsMap) -> Result<SettingsMap, TransformError> + Send + Sync,
{
    fn transform(&self, settings: SettingsMap) -> Result<SettingsMap, TransformError> {
        self(settings)
    }
}

/// Renames keys. Keys that are absent are skipped.
#[derive(Debug, Clone, Default)]
pub struct RenameKeys {
    renames: Vec<(String, String)>,
}

impl RenameKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rename(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.renames.push((from.into(), to.into()));
        self
    }
}

impl SettingsTransformer for RenameKeys {
    fn transform(&self, mut settings: SettingsMap) -> Result<SettingsMap, TransformError> {
        for (from, to) in &self.renames {
            if from == to {
                continue;
            }
            let Some(value) = settings.remove(from) else {
                continue;
            };
            if settings.contains_key(to) {
                return Err(format!("cannot rename '{from}' to '{to}': key already present").into());
            }
            settings.insert(to.clone(), value);
        }
        Ok(settings)
    }
}

/// Inserts values for keys the loader did not provide.
#[derive(Default)]
pub struct Defaults {
    defaults: Vec<(String, Box<dyn Fn(&SettingsMap) -> Value + Send + Sync>)>,
}

impl Defaults {
    pub fn new() -> Self {
        Self::default()
    }

    /// A constant default.
    pub fn value(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let value = value.into();
        self.computed(key, move |_| value.clone())
    }

    /// A default derived from the rest of the mapping, e.g. a URL built from
    /// host and port. Computed defaults see earlier defaults.
    pub fn computed<F>(mut self, key: impl Into<String>, compute: F) -> Self
    where
        F: Fn(&SettingsMap) -> Value + Send + Sync + 'static,
    {
        self.defaults.push((key.into(), Box::new(compute)));
        self
    }
}

impl std::fmt::Debug for Defaults {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.defaults.iter().map(|(key, _)| key))
            .finish()
    }
}

impl SettingsTransformer for Defaults {
    fn transform(&self, mut settings: SettingsMap) -> Result<SettingsMap, TransformError> {
        for (key, compute) in &self.defaults {
            if !settings.contains_key(key) {
                let value = compute(&settings);
                settings.insert(key.clone(), value);
            }
        }
        Ok(settings)
    }
}

/// Replaces sensitive values with a marker.
#[derive(Debug, Clone)]
pub struct Redact {
    keys: Vec<String>,
    marker: String,
}

impl Redact {
    pub const MARKER: &'static str = "[REDACTED]";

    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            marker: Self::MARKER.to_string(),
        }
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }
}

impl SettingsTransformer for Redact {
    fn transform(&self, mut settings: SettingsMap) -> Result<SettingsMap, TransformError> {
        for key in &self.keys {
            if let Some(value) = settings.get_mut(key) {
                *value = Value::String(self.marker.clone());
            }
        }
        Ok(settings)
    }
}

/// Runs several transformers in order as a single step.
#[derive(Default)]
pub struct Chain {
    steps: Vec<Box<dyn SettingsTransformer>>,
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, step: impl SettingsTransformer + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }
}

impl std::fmt::Debug for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chain")
            .field("steps", &self.steps.len())
            .finish()
    }
}

impl SettingsTransformer for Chain {
    fn transform(&self, settings: SettingsMap) -> Result<SettingsMap, TransformError> {
        self.steps
            .iter()
            .try_fold(settings, |settings, step| step.transform(settings))
    }
}
