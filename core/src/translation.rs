//! Translation lookup boundary.
//!
//! The core never formats user-facing text itself beyond placeholder
//! substitution; it hands a key to a [`Translations`] implementation and
//! falls back to the key when nothing is registered.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Stable translation key for a waypoint category (e.g. `waypoint.private`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TranslationKey(&'static str);

impl TranslationKey {
    pub const fn new(key: &'static str) -> Self {
        Self(key)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }

    /// Key of the item display name (`<key>.display_name`)
    pub fn display_name(&self) -> String {
        format!("{}.display_name", self.0)
    }

    /// Key of the item description (`<key>.description`)
    pub fn description(&self) -> String {
        format!("{}.description", self.0)
    }
}

impl fmt::Display for TranslationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Opaque key -> display string resolver
pub trait Translations: Send + Sync {
    fn resolve(&self, key: &str) -> Option<String>;

    /// Resolve, falling back to the key itself
    fn resolve_or_key(&self, key: &str) -> String {
        self.resolve(key).unwrap_or_else(|| key.to_string())
    }
}

/// Flat key/value translation table, loadable from a TOML file
#[derive(Debug, Clone, Default)]
pub struct TranslationTable {
    entries: HashMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum TranslationError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl TranslationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse a TOML document. Nested tables are flattened into dotted keys,
    /// so `[waypoint.private] display_name = "..."` becomes
    /// `waypoint.private.display_name`.
    pub fn from_toml_str(source: &str) -> Result<Self, toml::de::Error> {
        let root: toml::Table = toml::from_str(source)?;
        let mut table = Self::new();
        flatten_into(&mut table.entries, None, &root);
        Ok(table)
    }

    pub fn load(path: &Path) -> Result<Self, TranslationError> {
        let contents = fs::read_to_string(path).map_err(|e| TranslationError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&contents).map_err(|e| TranslationError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

fn flatten_into(out: &mut HashMap<String, String>, prefix: Option<&str>, table: &toml::Table) {
    for (key, value) in table {
        let full = match prefix {
            Some(prefix) => format!("{prefix}.{key}"),
            None => key.clone(),
        };
        match value {
            toml::Value::Table(inner) => flatten_into(out, Some(&full), inner),
            toml::Value::String(s) => {
                out.insert(full, s.clone());
            }
            other => {
                out.insert(full, other.to_string());
            }
        }
    }
}

impl Translations for TranslationTable {
    fn resolve(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }
}

/// Replace `{name}` style placeholders in one pass over `template`.
/// Substituted values are never scanned again; unknown placeholders are
/// left as written.
pub fn fill_placeholders(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            rest = &rest[open..];
            break;
        };
        let name = &after[..close];
        match values.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[open..open + close + 2]),
        }
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_children() {
        let key = TranslationKey::new("waypoint.private");
        assert_eq!(key.display_name(), "waypoint.private.display_name");
        assert_eq!(key.description(), "waypoint.private.description");
    }

    #[test]
    fn test_table_from_toml_flattens() {
        let table = TranslationTable::from_toml_str(
            r#"
[waypoint.private]
display_name = "Private: {name}"
description = "Only you can see this"
"#,
        )
        .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.resolve("waypoint.private.display_name").as_deref(),
            Some("Private: {name}")
        );
        assert_eq!(table.resolve_or_key("missing.key"), "missing.key");
    }

    #[test]
    fn test_fill_placeholders() {
        let s = fill_placeholders("{name} in {world}", &[("name", "Home"), ("world", "overworld")]);
        assert_eq!(s, "Home in overworld");
        assert_eq!(fill_placeholders("{unknown}", &[]), "{unknown}");
        assert_eq!(fill_placeholders("open { brace", &[("name", "x")]), "open { brace");
    }

    #[test]
    fn test_fill_placeholders_does_not_rescan_values() {
        let s = fill_placeholders("{name} / {world}", &[("name", "{world}"), ("world", "nether")]);
        assert_eq!(s, "{world} / nether");
    }
}
