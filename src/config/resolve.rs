//! `${path.to.field}` references between configuration values.
//!
//! References are resolved against the fully merged table, so a value can
//! point at a key contributed by any layer. `$$` produces a literal `$`.

use std::collections::HashMap;

use toml::{Table, Value};

use super::ConfigError;

/// Expands every reference in `table` in place.
///
/// Referenced strings are expanded recursively before substitution, and each
/// referenced path is expanded only once. A reference that leads back to
/// itself is a [`ConfigError::CircularReference`]. The first segment of a
/// reference matches top-level keys without regard to case, since the loader
/// lower-cases them while merging.
pub fn resolve_references(table: &mut Table) -> Result<(), ConfigError> {
    let root = table.clone();
    let mut resolver = Resolver {
        root: &root,
        visiting: Vec::new(),
        expanded: HashMap::new(),
    };
    for (_, value) in table.iter_mut() {
        resolver.resolve_value(value)?;
    }
    Ok(())
}

struct Resolver<'a> {
    root: &'a Table,
    visiting: Vec<String>,
    expanded: HashMap<String, String>,
}

impl Resolver<'_> {
    fn resolve_value(&mut self, value: &mut Value) -> Result<(), ConfigError> {
        match value {
            Value::String(s) => *s = self.expand(s)?,
            Value::Table(table) => {
                for (_, nested) in table.iter_mut() {
                    self.resolve_value(nested)?;
                }
            }
            Value::Array(items) => {
                for item in items.iter_mut() {
                    self.resolve_value(item)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn expand(&mut self, s: &str) -> Result<String, ConfigError> {
        let mut out = String::with_capacity(s.len());
        let mut rest = s;

        while let Some(pos) = rest.find('$') {
            out.push_str(&rest[..pos]);
            let after = &rest[pos + 1..];

            if let Some(tail) = after.strip_prefix('$') {
                out.push('$');
                rest = tail;
            } else if let Some(tail) = after.strip_prefix('{') {
                let end = tail.find('}').ok_or(ConfigError::UnclosedReference)?;
                out.push_str(&self.lookup(&tail[..end])?);
                rest = &tail[end + 1..];
            } else {
                out.push('$');
                rest = after;
            }
        }

        out.push_str(rest);
        Ok(out)
    }

    fn lookup(&mut self, path: &str) -> Result<String, ConfigError> {
        let mut segments: Vec<String> = path.split('.').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(ConfigError::InvalidReferencePath(path.to_string()));
        }
        segments[0] = segments[0].to_lowercase();
        let key = segments.join(".");
        if let Some(cached) = self.expanded.get(&key) {
            return Ok(cached.clone());
        }

        let not_found = || ConfigError::ReferenceNotFound(path.to_string());
        let root = self.root;
        let mut current = root.get(&segments[0]).ok_or_else(not_found)?;
        for segment in &segments[1..] {
            current = current
                .as_table()
                .and_then(|table| table.get(segment))
                .ok_or_else(not_found)?;
        }

        let expanded = match current {
            Value::String(s) => {
                if self.visiting.contains(&key) {
                    return Err(ConfigError::CircularReference(path.to_string()));
                }
                self.visiting.push(key.clone());
                let expanded = self.expand(s)?;
                self.visiting.pop();
                expanded
            }
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Datetime(dt) => dt.to_string(),
            Value::Array(_) | Value::Table(_) => {
                return Err(ConfigError::NonScalarReference(path.to_string()));
            }
        };
        self.expanded.insert(key, expanded.clone());
        Ok(expanded)
    }
}
