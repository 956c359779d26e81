//! Grouping intent: the caller's declaration of which business keys become
//! Hubs, which Hubs are related by Links, and how attributes map to Satellites

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Declared Hub
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubIntent {
    pub name: String,
    pub business_keys: Vec<String>,
    pub source_tables: Vec<String>,
    #[serde(default)]
    pub description: String,
}

/// Declared Link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkIntent {
    pub name: String,
    pub related_hubs: Vec<String>,

    /// Explicit key set; derived from the related Hubs when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_keys: Option<Vec<String>>,

    pub source_tables: Vec<String>,
    #[serde(default)]
    pub description: String,
}

/// Declared Satellite
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SatelliteIntent {
    pub name: String,
    pub hub: String,

    /// Inherited from the parent Hub when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_keys: Option<Vec<String>>,

    pub source_table: String,

    /// Unconsumed descriptive columns of the source table when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descriptive_attrs: Option<Vec<String>>,

    #[serde(default)]
    pub description: String,
}

/// Declared Link-Satellite
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSatelliteIntent {
    pub name: String,
    pub link: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_keys: Option<Vec<String>>,

    pub source_table: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descriptive_attrs: Option<Vec<String>>,

    #[serde(default)]
    pub description: String,
}

/// Full grouping intent for one pipeline run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupingIntent {
    #[serde(default)]
    pub hubs: Vec<HubIntent>,

    #[serde(default)]
    pub links: Vec<LinkIntent>,

    #[serde(default)]
    pub satellites: Vec<SatelliteIntent>,

    #[serde(default)]
    pub link_satellites: Vec<LinkSatelliteIntent>,

    /// Create one Satellite per (Hub, source table) for leftover descriptive columns
    #[serde(default)]
    pub auto_satellites: bool,
}

impl GroupingIntent {
    /// Load from a `.json` or `.toml` file
    pub fn from_file(path: &Path) -> Result<Self, IntentError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| IntentError::IoError(path.display().to_string(), e.to_string()))?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml(&contents),
            _ => Self::from_json(&contents),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, IntentError> {
        serde_json::from_str(json).map_err(|e| IntentError::ParseError(e.to_string()))
    }

    pub fn from_toml(toml: &str) -> Result<Self, IntentError> {
        toml::from_str(toml).map_err(|e| IntentError::ParseError(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn is_empty(&self) -> bool {
        self.hubs.is_empty()
            && self.links.is_empty()
            && self.satellites.is_empty()
            && self.link_satellites.is_empty()
    }
}

/// Intent loading errors
#[derive(Debug, thiserror::Error)]
pub enum IntentError {
    #[error("Failed to read intent file {0}: {1}")]
    IoError(String, String),

    #[error("Failed to parse grouping intent: {0}")]
    ParseError(String),
}
