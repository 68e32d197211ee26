//! Schema validation: constructing the typed settings object.

use serde::de::DeserializeOwned;
use serde_ignored::Path;
use thiserror::Error;
use toml::Value;

use super::SettingsMap;

/// What to do with keys the settings type does not declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownKeys {
    /// Fail with [`ValidationError::UnknownKeys`].
    #[default]
    Reject,
    /// Drop them, logging each path at `debug`.
    Ignore,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("settings do not match the schema: {0}")]
    Invalid(#[from] toml::de::Error),

    #[error("unknown settings keys: {}", .0.join(", "))]
    UnknownKeys(Vec<String>),
}

/// Deserializes `settings` into `T`.
///
/// Types, required fields and defaults come from `T`'s `Deserialize` impl.
/// Unknown keys are reported with their full dotted path (`database.typo`).
pub fn construct<T: DeserializeOwned>(
    settings: SettingsMap,
    policy: UnknownKeys,
) -> Result<T, ValidationError> {
    let mut unknown: Vec<String> = Vec::new();
    let model: T = serde_ignored::deserialize(Value::Table(settings), |path| {
        let mut segments = Vec::new();
        collect_segments(&path, &mut segments);
        unknown.push(segments.join("."));
    })?;

    if unknown.is_empty() {
        return Ok(model);
    }
    unknown.sort();

    match policy {
        UnknownKeys::Reject => Err(ValidationError::UnknownKeys(unknown)),
        UnknownKeys::Ignore => {
            tracing::debug!(keys = ?unknown, "ignoring settings keys not declared by the schema");
            Ok(model)
        }
    }
}

/// Map keys and sequence indices from the root down; `Option` and newtype
/// wrappers add no segment.
fn collect_segments(path: &Path<'_>, segments: &mut Vec<String>) {
    match path {
        Path::Root => {}
        Path::Seq { parent, index } => {
            collect_segments(parent, segments);
            segments.push(index.to_string());
        }
        Path::Map { parent, key } => {
            collect_segments(parent, segments);
            segments.push(key.clone());
        }
        Path::Some { parent } | Path::NewtypeStruct { parent } | Path::NewtypeVariant { parent } => {
            collect_segments(parent, segments);
        }
    }
}
