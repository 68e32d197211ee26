//! TOML file configuration source.

use std::path::{Path, PathBuf};

use toml::{Table, Value};

use super::source::{deep_merge, ConfigEntry, ConfigSource};
use super::ConfigError;

/// Name of the section every environment inherits from.
pub const DEFAULT_ENVIRONMENT: &str = "default";

/// A configuration source that loads from a TOML file.
///
/// Required files that don't exist cause an error; optional files that don't
/// exist contribute nothing.
///
/// When an environment is active, the file is read as a set of sections:
/// `[default]` is applied first, then the section named after the active
/// environment. Other top-level keys are dropped.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    required: bool,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>, required: bool) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            required,
        }
    }
}

impl ConfigSource for FileSource {
    fn entries(&self, environment: Option<&str>) -> Result<Vec<ConfigEntry>, ConfigError> {
        let Some(table) = load_config_file(&self.path, self.required)? else {
            tracing::debug!(path = %self.path.display(), "optional config file missing, skipping");
            return Ok(vec![]);
        };

        let table = match environment {
            Some(env) => select_environment(table, env)?,
            None => table,
        };
        Ok(vec![ConfigEntry::root(table)])
    }
}

/// Flattens `[default]` and `[<env>]` into one table, the environment winning.
fn select_environment(mut table: Table, env: &str) -> Result<Table, ConfigError> {
    let mut selected = Table::new();
    for name in [DEFAULT_ENVIRONMENT, env] {
        match table.remove(name) {
            Some(Value::Table(section)) => deep_merge(&mut selected, section),
            Some(_) => return Err(ConfigError::InvalidEnvironment(name.to_string())),
            None => {}
        }
    }
    Ok(selected)
}

/// Returns `Ok(None)` if the file doesn't exist and `required` is false.
fn load_config_file(path: &Path, required: bool) -> Result<Option<Table>, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            let table = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                source: e,
            })?;
            Ok(Some(table))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            if required {
                Err(ConfigError::FileNotFound(path.to_path_buf()))
            } else {
                Ok(None)
            }
        }
        Err(e) => Err(ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn file_with(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{contents}").unwrap();
        file
    }

    #[test]
    fn test_file_source_loads_valid_file() {
        let file = file_with("HOST = \"localhost\"\n");

        let entries = FileSource::new(file.path(), true).entries(None).unwrap();

        assert_eq!(entries.len(), 1);
        let table = entries[0].value.as_table().unwrap();
        assert_eq!(table.get("HOST"), Some(&Value::String("localhost".into())));
    }

    #[test]
    fn test_file_source_required_missing() {
        let source = FileSource::new("/nonexistent/path/settings.toml", true);

        assert!(matches!(
            source.entries(None),
            Err(ConfigError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_file_source_optional_missing() {
        let source = FileSource::new("/nonexistent/path/settings.toml", false);

        assert!(source.entries(None).unwrap().is_empty());
    }

    #[test]
    fn test_file_source_parse_error() {
        let file = file_with("host = ");

        let result = FileSource::new(file.path(), true).entries(None);

        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_environment_section_overrides_default() {
        let file = file_with(
            r#"
            [default]
            host = "localhost"
            port = 8000

            [production]
            host = "prod.internal"

            [testing]
            host = "test.internal"
            "#,
        );

        let entries = FileSource::new(file.path(), true)
            .entries(Some("production"))
            .unwrap();
        let table = entries[0].value.as_table().unwrap();

        assert_eq!(table["host"].as_str(), Some("prod.internal"));
        assert_eq!(table["port"].as_integer(), Some(8000));
        assert!(!table.contains_key("testing"));
    }

    #[test]
    fn test_environment_missing_section_is_empty() {
        let file = file_with("[default]\nport = 1\n");

        let entries = FileSource::new(file.path(), true)
            .entries(Some("staging"))
            .unwrap();

        assert_eq!(entries[0].value["port"].as_integer(), Some(1));
    }

    #[test]
    fn test_environment_section_must_be_table() {
        let file = file_with("default = 3\n");

        let result = FileSource::new(file.path(), true).entries(Some("dev"));

        assert!(matches!(result, Err(ConfigError::InvalidEnvironment(name)) if name == "default"));
    }
}
