//! Source abstraction and merge rules shared by every layer.

use toml::{Table, Value};

use super::ConfigError;

/// A value contributed by a source, placed at `path` in the merged table.
///
/// An empty path means the value is a table merged at the root.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigEntry {
    pub path: Vec<String>,
    pub value: Value,
}

impl ConfigEntry {
    pub fn root(table: Table) -> Self {
        Self {
            path: Vec::new(),
            value: Value::Table(table),
        }
    }

    pub fn at_path(path: Vec<String>, value: Value) -> Self {
        Self { path, value }
    }

    /// Lower-cases the top-level key this entry writes to.
    ///
    /// For a root entry that is every key of its table; spellings that fold
    /// together inside one table are merged in iteration order. Nested keys
    /// keep their case.
    pub fn fold_top_level_case(self) -> Self {
        let Self { mut path, value } = self;
        if let Some(first) = path.first_mut() {
            *first = first.to_lowercase();
            return Self { path, value };
        }

        match value {
            Value::Table(table) => {
                let mut folded = Table::new();
                for (key, value) in table {
                    merge_at_path(&mut folded, &[key.to_lowercase()], value);
                }
                Self::root(folded)
            }
            value => Self { path, value },
        }
    }
}

/// One layer of configuration.
///
/// `environment` is the active environment name when the loader was built
/// with [`Config::with_environment`](super::Config::with_environment).
/// Sources that have no notion of environments ignore it.
pub trait ConfigSource: Send + Sync + std::fmt::Debug {
    fn entries(&self, environment: Option<&str>) -> Result<Vec<ConfigEntry>, ConfigError>;
}

/// In-memory defaults, usually registered as the first layer.
#[derive(Debug, Clone, Default)]
pub struct DefaultsSource {
    table: Table,
}

impl DefaultsSource {
    pub fn new(table: Table) -> Self {
        Self { table }
    }
}

impl ConfigSource for DefaultsSource {
    fn entries(&self, _environment: Option<&str>) -> Result<Vec<ConfigEntry>, ConfigError> {
        Ok(vec![ConfigEntry::root(self.table.clone())])
    }
}

/// Merges `value` into `table` at `path`, creating intermediate tables.
///
/// A non-table value found on the way is replaced by a table.
pub fn merge_at_path(table: &mut Table, path: &[String], value: Value) {
    let Some((first, rest)) = path.split_first() else {
        if let Value::Table(overlay) = value {
            deep_merge(table, overlay);
        }
        return;
    };

    if rest.is_empty() {
        match (table.get_mut(first), value) {
            (Some(Value::Table(base)), Value::Table(overlay)) => deep_merge(base, overlay),
            (_, value) => {
                table.insert(first.clone(), value);
            }
        }
        return;
    }

    let nested = table
        .entry(first.clone())
        .or_insert(Value::Table(Table::new()));
    if !nested.is_table() {
        *nested = Value::Table(Table::new());
    }
    if let Value::Table(nested) = nested {
        merge_at_path(nested, rest, value);
    }
}

/// Recursively merges `overlay` into `base`. Tables merge, everything else
/// (arrays included) is replaced.
pub fn deep_merge(base: &mut Table, overlay: Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(Value::Table(base_table)), Value::Table(overlay_table)) => {
                deep_merge(base_table, overlay_table);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}
