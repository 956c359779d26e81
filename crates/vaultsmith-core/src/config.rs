//! Configuration schema (vaultsmith.toml)

use serde::{Deserialize, Serialize};

/// Key classifier configuration
///
/// Tokens are matched case-insensitively. Override patterns match either
/// `COLUMN` or `TABLE.COLUMN` and support `*` wildcards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Name suffixes marking relationship-key candidates
    #[serde(default = "default_key_suffixes")]
    pub key_suffixes: Vec<String>,

    /// Name prefixes marking relationship-key candidates
    #[serde(default)]
    pub key_prefixes: Vec<String>,

    /// Always classify as business key
    #[serde(default)]
    pub business_key_overrides: Vec<String>,

    /// Always classify as relationship key
    #[serde(default)]
    pub relationship_key_overrides: Vec<String>,

    /// Always classify as descriptive
    #[serde(default)]
    pub descriptive_overrides: Vec<String>,
}

fn default_key_suffixes() -> Vec<String> {
    ["_NO", "_ID", "_CODE", "_KEY"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            key_suffixes: default_key_suffixes(),
            key_prefixes: Vec::new(),
            business_key_overrides: Vec::new(),
            relationship_key_overrides: Vec::new(),
            descriptive_overrides: Vec::new(),
        }
    }
}

impl ClassifierConfig {
    /// Check if a column matches any pattern in the list
    pub fn matches_any(table: &str, column: &str, patterns: &[String]) -> bool {
        let qualified = format!("{}.{}", table, column);
        patterns.iter().any(|pattern| {
            let pattern = pattern.trim().to_ascii_uppercase();
            let target = if pattern.contains('.') { qualified.as_str() } else { column };
            if pattern.contains('*') {
                glob_match(&pattern, target)
            } else {
                pattern == target
            }
        })
    }

    /// The key token a column name carries, if any
    pub fn key_token<'a>(&'a self, column: &str) -> Option<&'a str> {
        let upper = column.to_ascii_uppercase();
        self.key_suffixes
            .iter()
            .find(|suffix| {
                let suffix = suffix.to_ascii_uppercase();
                upper.len() > suffix.len() && upper.ends_with(&suffix)
            })
            .or_else(|| {
                self.key_prefixes.iter().find(|prefix| {
                    let prefix = prefix.to_ascii_uppercase();
                    upper.len() > prefix.len() && upper.starts_with(&prefix)
                })
            })
            .map(|token| token.as_str())
    }
}

/// Entity and column naming rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    pub hash_key_prefix: String,
    pub hash_diff_column: String,
    pub hub_prefix: String,
    pub link_prefix: String,
    pub satellite_prefix: String,
    pub link_satellite_prefix: String,

    /// Report names that do not follow the prefixes
    pub enforce_conventions: bool,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            hash_key_prefix: "dv_hkey_".to_string(),
            hash_diff_column: "dv_hsh_diff".to_string(),
            hub_prefix: "HUB_".to_string(),
            link_prefix: "LNK_".to_string(),
            satellite_prefix: "SAT_".to_string(),
            link_satellite_prefix: "LSAT_".to_string(),
            enforce_conventions: true,
        }
    }
}

impl NamingConfig {
    /// Hash key column name for an entity
    pub fn hash_key_name(&self, entity: &str) -> String {
        format!("{}{}", self.hash_key_prefix, entity.to_lowercase())
    }

    /// Entity name without its Hub prefix (`HUB_CUSTOMER` -> `CUSTOMER`)
    pub fn hub_stem<'a>(&self, hub: &'a str) -> &'a str {
        hub.strip_prefix(self.hub_prefix.as_str()).unwrap_or(hub)
    }
}

/// Target type rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeMappingConfig {
    /// Length used for character columns without a declared length
    pub default_varchar_length: u32,

    /// dtype emitted for hash key and hash diff columns
    pub hash_key_dtype: String,
}

impl Default for TypeMappingConfig {
    fn default() -> Self {
        Self {
            default_varchar_length: 255,
            hash_key_dtype: "string".to_string(),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Fallback source schema when metadata carries none
    #[serde(default = "default_source_schema")]
    pub source_schema: String,

    /// Schema the Data Vault entities are materialized into
    #[serde(default = "default_target_schema")]
    pub target_schema: String,

    /// Key classifier tokens and overrides
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Naming rules
    #[serde(default)]
    pub naming: NamingConfig,

    /// Target type rendering
    #[serde(default)]
    pub types: TypeMappingConfig,
}

fn default_source_schema() -> String {
    "source".to_string()
}

fn default_target_schema() -> String {
    "integration".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_schema: default_source_schema(),
            target_schema: default_target_schema(),
            classifier: ClassifierConfig::default(),
            naming: NamingConfig::default(),
            types: TypeMappingConfig::default(),
        }
    }
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Self::from_toml(&contents)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save config to TOML file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }
}

/// Simple glob matching (`*` matches any run of characters)
fn glob_match(pattern: &str, text: &str) -> bool {
    if pattern == "*" {
        return true;
    }

    let parts: Vec<&str> = pattern.split('*').collect();
    let (first, rest) = match parts.split_first() {
        Some(split) => split,
        None => return text.is_empty(),
    };

    if !text.starts_with(first) {
        return false;
    }

    let mut remaining = &text[first.len()..];
    for (i, part) in rest.iter().enumerate() {
        let is_last = i == rest.len() - 1;
        if is_last {
            return remaining.ends_with(part);
        }
        match remaining.find(part) {
            Some(pos) => remaining = &remaining[pos + part.len()..],
            None => return false,
        }
    }

    remaining.is_empty()
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}
