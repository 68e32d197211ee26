use toml::Table;

use super::{Config, ConfigError};

/// Produces the fully merged, flat configuration mapping.
///
/// The settings director calls [`load`](Loader::load) exactly once per build
/// and treats the result as opaque input.
pub trait Loader {
    fn load(&self) -> Result<Table, ConfigError>;
}

impl Loader for Config {
    fn load(&self) -> Result<Table, ConfigError> {
        Config::load(self)
    }
}

/// A fixed mapping, useful for tests and for values assembled elsewhere.
impl Loader for Table {
    fn load(&self) -> Result<Table, ConfigError> {
        Ok(self.clone())
    }
}

impl<L: Loader + ?Sized> Loader for &L {
    fn load(&self) -> Result<Table, ConfigError> {
        (**self).load()
    }
}
