//! Environment variable configuration source.

use toml::Value;

use super::source::{ConfigEntry, ConfigSource};
use super::ConfigError;

/// Reads variables named `<PREFIX><SEP><SEGMENT>[<SEP><SEGMENT>...]`.
///
/// `APP__DATABASE__PORT=5432` with prefix `APP` and separator `__` becomes
/// `database.port = 5432`.
#[derive(Debug, Clone)]
pub struct EnvSource {
    prefix: String,
    separator: String,
}

impl EnvSource {
    /// # Panics
    ///
    /// Panics if `separator` is empty.
    pub fn new(prefix: impl Into<String>, separator: impl Into<String>) -> Self {
        let separator = separator.into();
        assert!(!separator.is_empty(), "separator must not be empty");
        Self {
            prefix: prefix.into(),
            separator,
        }
    }

    fn entries_from<I>(&self, vars: I) -> Vec<ConfigEntry>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let prefix_with_sep = format!("{}{}", self.prefix, self.separator);

        vars.into_iter()
            .filter_map(|(key, value)| {
                let path_str = key.strip_prefix(&prefix_with_sep)?;
                if path_str.is_empty() {
                    return None;
                }
                let path: Vec<String> = path_str
                    .split(&self.separator)
                    .map(str::to_lowercase)
                    .collect();
                if path.iter().any(String::is_empty) {
                    tracing::debug!(var = %key, "skipping variable with empty path segment");
                    return None;
                }
                Some(ConfigEntry::at_path(path, coerce_value(&value)))
            })
            .collect()
    }
}

impl ConfigSource for EnvSource {
    fn entries(&self, _environment: Option<&str>) -> Result<Vec<ConfigEntry>, ConfigError> {
        let entries = self.entries_from(std::env::vars());
        tracing::debug!(
            prefix = %self.prefix,
            count = entries.len(),
            "collected environment overrides"
        );
        Ok(entries)
    }
}

/// Picks the most specific type: boolean, integer, float, then string.
fn coerce_value(s: &str) -> Value {
    if s.eq_ignore_ascii_case("true") {
        return Value::Boolean(true);
    }
    if s.eq_ignore_ascii_case("false") {
        return Value::Boolean(false);
    }

    if looks_like_integer(s) {
        if let Ok(i) = s.parse::<i64>() {
            return Value::Integer(i);
        }
    }

    if s.contains('.') {
        if let Ok(f) = s.parse::<f64>() {
            return Value::Float(f);
        }
    }

    Value::String(s.to_string())
}

fn looks_like_integer(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}
