//! Application context owning the current settings.

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::builder::Director;
use crate::config::Loader;
use crate::settings::{SettingsDirector, SettingsStore};
use crate::Error;

/// Central application context holding the settings store.
///
/// Generic over the settings type `C`. The store is shared, so handing
/// [`store()`](Self::store) to other components lets them observe later
/// [`refresh`](Self::refresh) calls.
///
/// ## Example
///
/// ```no_run
/// use setkit::{AppContext, Config, Director, SettingsDirector};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct MySettings {
///     name: String,
///     port: u16,
/// }
///
/// let loader = Config::builder().with_file("settings.toml", true);
/// let director = SettingsDirector::<MySettings>::new();
///
/// let ctx = AppContext::builder()
///     .with_config(director.build(&loader)?)
///     .build()?;
///
/// let settings = ctx.config()?;
/// ctx.refresh(&director, &loader)?;
/// # Ok::<(), setkit::Error>(())
/// ```
#[derive(Debug)]
pub struct AppContext<C> {
    settings: Arc<SettingsStore<C>>,
}

impl<C> AppContext<C> {
    /// Returns the current settings.
    pub fn config(&self) -> Result<Arc<C>, Error> {
        self.settings.get().ok_or(Error::MissingConfig)
    }

    /// The shared store backing this context.
    pub fn store(&self) -> &Arc<SettingsStore<C>> {
        &self.settings
    }

    /// Rebuilds the settings and publishes them.
    ///
    /// The store is only written after a successful build, so on error the
    /// previous settings stay current.
    pub fn refresh<L>(&self, director: &SettingsDirector<C>, loader: &L) -> Result<Arc<C>, Error>
    where
        C: DeserializeOwned,
        L: Loader + ?Sized,
    {
        let settings = Arc::new(director.build(loader)?);
        self.settings.set_arc(Arc::clone(&settings));
        tracing::debug!("application settings refreshed");
        Ok(settings)
    }
}

impl AppContext<()> {
    /// Creates a new builder for constructing an `AppContext`.
    pub fn builder() -> AppContextBuilder<()> {
        AppContextBuilder {
            store: None,
            config: None,
        }
    }
}

/// Builder for constructing an [`AppContext`].
///
/// The builder starts untyped (`AppContextBuilder<()>`) and becomes
/// `AppContextBuilder<C>` once settings or a store are attached.
#[derive(Debug)]
#[must_use = "builders do nothing until .build() is called"]
pub struct AppContextBuilder<C> {
    store: Option<Arc<SettingsStore<C>>>,
    config: Option<C>,
}

impl AppContextBuilder<()> {
    /// Attaches initial settings, published into a fresh store.
    pub fn with_config<C>(self, config: C) -> AppContextBuilder<C> {
        AppContextBuilder {
            store: None,
            config: Some(config),
        }
    }

    /// Uses an existing, already populated store.
    pub fn with_store<C>(self, store: Arc<SettingsStore<C>>) -> AppContextBuilder<C> {
        AppContextBuilder {
            store: Some(store),
            config: None,
        }
    }
}

impl<C> AppContextBuilder<C> {
    /// Builds the `AppContext`.
    ///
    /// Returns [`Error::MissingConfig`] if the context would start without
    /// settings.
    pub fn build(self) -> Result<AppContext<C>, Error> {
        let settings = self.store.unwrap_or_default();
        if let Some(config) = self.config {
            settings.set(config);
        }
        if !settings.is_set() {
            return Err(Error::MissingConfig);
        }
        Ok(AppContext { settings })
    }
}
