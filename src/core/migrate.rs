use crate::config::toml_config::MigrateConfig;
use crate::domain::model::Rewrite;
use crate::domain::ports::Rewriter;
use crate::utils::error::{DocfixError, Result};
use serde_json::Value;
use std::path::Path;

/// Renames a legacy object key to its replacement throughout a JSON tree.
///
/// An object is migrated only when it holds the legacy key and not the
/// replacement; objects that already carry the replacement are left as-is.
#[derive(Debug, Clone)]
pub struct KeyMigration {
    legacy_key: String,
    replacement_key: String,
}

impl KeyMigration {
    pub fn new(legacy_key: impl Into<String>, replacement_key: impl Into<String>) -> Self {
        Self {
            legacy_key: legacy_key.into(),
            replacement_key: replacement_key.into(),
        }
    }

    pub fn from_config(config: &MigrateConfig) -> Self {
        Self::new(&config.legacy_key, &config.replacement_key)
    }

    /// Migrates `value` in place, returning the number of renamed keys.
    pub fn migrate_value(&self, value: &mut Value) -> usize {
        match value {
            Value::Object(map) => {
                let mut renamed = 0;
                if !map.contains_key(&self.replacement_key) {
                    if let Some(moved) = map.shift_remove(&self.legacy_key) {
                        map.insert(self.replacement_key.clone(), moved);
                        renamed += 1;
                    }
                }
                renamed
                    + map
                        .values_mut()
                        .map(|child| self.migrate_value(child))
                        .sum::<usize>()
            }
            Value::Array(items) => items.iter_mut().map(|item| self.migrate_value(item)).sum(),
            _ => 0,
        }
    }

    pub fn migrate_str(&self, path: &Path, text: &str) -> Result<Rewrite> {
        let mut document: Value =
            serde_json::from_str(text).map_err(|source| DocfixError::JsonError {
                path: path.to_path_buf(),
                source,
            })?;

        let edits = self.migrate_value(&mut document);
        if edits == 0 {
            return Ok(Rewrite::unchanged(text));
        }

        let mut output =
            serde_json::to_string_pretty(&document).map_err(|source| DocfixError::JsonError {
                path: path.to_path_buf(),
                source,
            })?;
        output.push('\n');
        Ok(Rewrite { output, edits })
    }
}

impl Default for KeyMigration {
    fn default() -> Self {
        Self::from_config(&MigrateConfig::default())
    }
}

impl Rewriter for KeyMigration {
    fn name(&self) -> &'static str {
        "migrate"
    }

    fn extension(&self) -> &'static str {
        "json"
    }

    // An explicitly named file is migrated whatever its extension.
    fn filters_explicit_files(&self) -> bool {
        false
    }

    fn rewrite(&self, path: &Path, text: &str) -> Result<Rewrite> {
        self.migrate_str(path, text)
    }
}
