//! Exchange records (stable v1)
//!
//! The contract handed to serializers (YAML, DDL, catalog writers). Field
//! names are part of the public API; add fields, never rename them.

use serde::{Deserialize, Serialize};

use crate::report::{ReportVersion, ValidationStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubRecord {
    pub name: String,
    pub business_keys: Vec<String>,
    pub source_tables: Vec<String>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub name: String,
    pub related_hubs: Vec<String>,
    pub business_keys: Vec<String>,
    pub source_tables: Vec<String>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SatelliteRecord {
    pub name: String,
    pub hub: String,
    pub business_keys: Vec<String>,
    pub source_table: String,
    pub descriptive_attrs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSatelliteRecord {
    pub name: String,
    pub link: String,
    pub business_keys: Vec<String>,
    pub source_table: String,
    pub descriptive_attrs: Vec<String>,
}

/// Role of a mapped target column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingKeyType {
    HashKeyHub,
    HashKeyLnk,
    HashKeySat,
    HashDiff,
    BizKey,
    Descriptive,
}

impl From<crate::model::HashKeyType> for MappingKeyType {
    fn from(key_type: crate::model::HashKeyType) -> Self {
        use crate::model::HashKeyType;
        match key_type {
            HashKeyType::HashKeyHub => Self::HashKeyHub,
            HashKeyType::HashKeyLnk => Self::HashKeyLnk,
            HashKeyType::HashKeySat => Self::HashKeySat,
        }
    }
}

/// One target column and where it comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMappingRecord {
    pub target: String,
    pub dtype: String,
    pub key_type: MappingKeyType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    /// Source columns; canonical order for hash inputs
    pub source: Vec<String>,
}

/// Everything needed to render one target table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMapping {
    pub source_schema: String,
    pub source_table: String,
    pub target_schema: String,
    pub target_table: String,

    /// `hub`, `lnk`, `sat` or `lsat`
    pub target_entity_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_table: Option<String>,

    pub collision_code: String,
    pub description: String,
    pub columns: Vec<ColumnMappingRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub version: ReportVersion,
    pub created_at: String,
    pub validation_status: ValidationStatus,

    #[serde(default)]
    pub validation_warnings: Vec<String>,

    #[serde(default)]
    pub validation_errors: Vec<String>,

    /// Model fingerprint, stable across identical runs
    pub fingerprint: String,
}

/// Complete emitted model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmittedModel {
    pub metadata: ModelMetadata,
    pub hubs: Vec<HubRecord>,
    pub links: Vec<LinkRecord>,
    pub satellites: Vec<SatelliteRecord>,
    pub link_satellites: Vec<LinkSatelliteRecord>,
    pub mappings: Vec<EntityMapping>,
}

impl EmittedModel {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let json = self.to_json()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        std::fs::write(path, json)
    }

    /// Mapping for one target table
    pub fn mapping(&self, target_table: &str) -> Option<&EntityMapping> {
        self.mappings.iter().find(|m| m.target_table == target_table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HashKeyType;

    #[test]
    fn key_type_serialization() {
        let record = ColumnMappingRecord {
            target: "dv_hkey_hub_customer".to_string(),
            dtype: "string".to_string(),
            key_type: HashKeyType::HashKeyHub.into(),
            parent: None,
            source: vec!["CUSTOMER_NO".to_string()],
        };

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"key_type\":\"hash_key_hub\""));
        assert!(!json.contains("parent"));
    }

    #[test]
    fn satellite_record_uses_hub_field() {
        let record = SatelliteRecord {
            name: "SAT_CUSTOMER_RISK".to_string(),
            hub: "HUB_CUSTOMER".to_string(),
            business_keys: vec!["CUSTOMER_NO".to_string()],
            source_table: "STTM_CUSTOMER".to_string(),
            descriptive_attrs: vec!["RISK_CATEGORY".to_string()],
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["hub"], "HUB_CUSTOMER");
    }
}
