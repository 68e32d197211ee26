use std::marker::PhantomData;

use serde::de::DeserializeOwned;

use super::transform::SettingsTransformer;
use super::validate::{construct, UnknownKeys};
use super::SettingsMap;
use crate::builder::Director;
use crate::config::Loader;
use crate::Error;

/// Builds a validated settings object of type `T` from a [`Loader`].
///
/// Each build:
///
/// 1. loads the merged mapping once,
/// 2. lower-cases its top-level keys ([`normalize_keys`]),
/// 3. runs the transformer, if one is configured,
/// 4. deserializes into `T`, applying the [`UnknownKeys`] policy.
///
/// Nothing is cached between builds and the result is not published
/// anywhere; pass it to [`SettingsStore::set`](super::SettingsStore::set)
/// when it should become the current settings.
///
/// ```
/// use serde::Deserialize;
/// use setkit::{Director, SettingsDirector};
///
/// #[derive(Deserialize)]
/// struct Server {
///     host: String,
///     port: u16,
/// }
///
/// let loaded: toml::Table = toml::from_str("HOST = \"localhost\"\nPORT = 8080").unwrap();
/// let server = SettingsDirector::<Server>::new().build(&loaded)?;
///
/// assert_eq!(server.host, "localhost");
/// assert_eq!(server.port, 8080);
/// # Ok::<(), setkit::Error>(())
/// ```
#[must_use]
pub struct SettingsDirector<T> {
    transformer: Option<Box<dyn SettingsTransformer>>,
    unknown_keys: UnknownKeys,
    _model: PhantomData<fn() -> T>,
}

impl<T> SettingsDirector<T> {
    pub fn new() -> Self {
        Self {
            transformer: None,
            unknown_keys: UnknownKeys::default(),
            _model: PhantomData,
        }
    }

    /// Sets the transformer applied after key normalization.
    pub fn with_transformer(mut self, transformer: impl SettingsTransformer + 'static) -> Self {
        self.transformer = Some(Box::new(transformer));
        self
    }

    /// Sets the policy for keys `T` does not declare. Defaults to
    /// [`UnknownKeys::Reject`].
    pub fn unknown_keys(mut self, policy: UnknownKeys) -> Self {
        self.unknown_keys = policy;
        self
    }
}

impl<T> Default for SettingsDirector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for SettingsDirector<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsDirector")
            .field("model", &std::any::type_name::<T>())
            .field("transformer", &self.transformer.is_some())
            .field("unknown_keys", &self.unknown_keys)
            .finish()
    }
}

impl<'a, T, L> Director<&'a L> for SettingsDirector<T>
where
    T: DeserializeOwned,
    L: Loader + ?Sized,
{
    type Output = T;
    type Error = Error;

    fn build(&self, loader: &'a L) -> Result<T, Error> {
        let model = std::any::type_name::<T>();
        let settings = normalize_keys(loader.load()?);

        let settings = match &self.transformer {
            Some(transformer) => transformer.transform(settings).map_err(Error::Transform)?,
            None => settings,
        };

        let built = construct(settings, self.unknown_keys)?;
        tracing::debug!(model, "built settings");
        Ok(built)
    }
}

/// Lower-cases every top-level key.
///
/// Nested tables are values and keep their keys. When several keys collapse
/// to the same lower-case key, the one iterated last wins; `toml::Table`
/// iterates in sorted order, so an already lower-case key beats its
/// upper-case spellings. Each collision is logged at `warn`.
pub fn normalize_keys(settings: SettingsMap) -> SettingsMap {
    let mut normalized = SettingsMap::new();
    for (key, value) in settings {
        let lower = key.to_lowercase();
        if normalized.insert(lower.clone(), value).is_some() {
            tracing::warn!(key = %key, normalized = %lower, "settings key collision, later value wins");
        }
    }
    normalized
}
