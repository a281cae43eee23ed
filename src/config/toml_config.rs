use crate::utils::error::{DocfixError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "docfix.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocfixConfig {
    pub chapters: ChaptersConfig,
    pub refs: RefsConfig,
    pub migrate: MigrateConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChaptersConfig {
    pub paths: Vec<PathBuf>,
    pub max_chapter: u32,
    pub link_prefix: String,
    pub file_prefix: String,
    pub number_width: usize,
}

impl Default for ChaptersConfig {
    fn default() -> Self {
        Self {
            paths: vec![PathBuf::from("docs/guide")],
            max_chapter: 12,
            link_prefix: "./".to_string(),
            file_prefix: "CHAPTER-".to_string(),
            number_width: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RefsConfig {
    pub paths: Vec<PathBuf>,
    /// Site-root prefix for link targets.
    pub base: String,
    pub documents: Vec<String>,
}

impl Default for RefsConfig {
    fn default() -> Self {
        Self {
            paths: vec![PathBuf::from("docs")],
            base: "/".to_string(),
            documents: vec!["SPEC".to_string(), "TECH-SPEC".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MigrateConfig {
    pub paths: Vec<PathBuf>,
    pub legacy_key: String,
    pub replacement_key: String,
}

impl Default for MigrateConfig {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            legacy_key: "cipher_meta".to_string(),
            replacement_key: "encrypted_meta".to_string(),
        }
    }
}

impl DocfixConfig {
    /// Loads an explicit config file, or `docfix.toml` from the working
    /// directory if present, or falls back to defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::from_file(fallback)
                } else {
                    tracing::debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!("Loading configuration from {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|e| DocfixError::io(path, e))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content)
            .map_err(|e| DocfixError::config(format!("TOML parsing error: {}", e)))
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are
    /// left verbatim.
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::LazyLock;

        static ENV_VAR_RE: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var regex"));

        ENV_VAR_RE
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| DocfixError::config(format!("TOML serialization error: {}", e)))
    }
}

fn validate_paths(field_name: &str, paths: &[PathBuf]) -> Result<()> {
    paths
        .iter()
        .try_for_each(|path| validation::validate_path(field_name, path))
}

impl Validate for ChaptersConfig {
    fn validate(&self) -> Result<()> {
        validate_paths("chapters.paths", &self.paths)?;
        validation::validate_range("chapters.max_chapter", self.max_chapter, 1, 999)?;
        validation::validate_range("chapters.number_width", self.number_width, 1, 6)?;
        validation::validate_non_empty_string("chapters.file_prefix", &self.file_prefix)
    }
}

impl Validate for RefsConfig {
    fn validate(&self) -> Result<()> {
        validate_paths("refs.paths", &self.paths)?;
        if self.documents.is_empty() {
            return Err(DocfixError::MissingConfigError {
                field: "refs.documents".to_string(),
            });
        }
        self.documents
            .iter()
            .try_for_each(|doc| validation::validate_non_empty_string("refs.documents", doc))
    }
}

impl Validate for MigrateConfig {
    fn validate(&self) -> Result<()> {
        validate_paths("migrate.paths", &self.paths)?;
        validation::validate_non_empty_string("migrate.legacy_key", &self.legacy_key)?;
        validation::validate_non_empty_string("migrate.replacement_key", &self.replacement_key)?;
        validation::validate_distinct(
            "migrate.replacement_key",
            &self.legacy_key,
            &self.replacement_key,
        )
    }
}

impl Validate for DocfixConfig {
    fn validate(&self) -> Result<()> {
        self.chapters.validate()?;
        self.refs.validate()?;
        self.migrate.validate()
    }
}
