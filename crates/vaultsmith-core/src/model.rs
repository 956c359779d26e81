//! Data Vault model graph and the hash-key contract

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

use crate::diagnostic::EntityKind;
use crate::schema::SourceColumn;

/// Separator placed between business-key values before hashing
pub const HASH_INPUT_DELIMITER: &str = "||";

/// Sort column names into the canonical hash-input order
///
/// Case-insensitive lexicographic, ties broken by the raw name, duplicates
/// removed. Every hash input goes through here.
pub fn canonical_columns<I, S>(columns: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut sorted: Vec<String> = columns.into_iter().map(|c| c.as_ref().to_string()).collect();
    sorted.sort_by(|a, b| {
        a.to_ascii_uppercase()
            .cmp(&b.to_ascii_uppercase())
            .then_with(|| a.cmp(b))
    });
    sorted.dedup();
    sorted
}

/// Kind of hash key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashKeyType {
    HashKeyHub,
    HashKeyLnk,
    HashKeySat,
}

impl HashKeyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HashKeyHub => "hash_key_hub",
            Self::HashKeyLnk => "hash_key_lnk",
            Self::HashKeySat => "hash_key_sat",
        }
    }
}

impl std::fmt::Display for HashKeyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hash-key definition. The value itself is computed at materialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HashKeyColumn {
    /// Target column name, e.g. `dv_hkey_hub_customer`
    pub target_name: String,

    pub key_type: HashKeyType,

    /// Non-owning back-reference to the parent Hub/Link
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    /// Hash inputs in canonical order
    pub source_columns: Vec<String>,
}

impl HashKeyColumn {
    /// Create a definition; inputs are put into canonical order
    pub fn new<I, S>(target_name: impl Into<String>, key_type: HashKeyType, source_columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            target_name: target_name.into(),
            key_type,
            parent: None,
            source_columns: canonical_columns(source_columns),
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Materialize the hash for one source row
    ///
    /// Values are trimmed and upper-cased, joined in `source_columns` order
    /// with `||`, and hashed with SHA-256. Returns `None` if the row lacks an
    /// input column.
    pub fn compute(&self, row: &BTreeMap<String, String>) -> Option<String> {
        hash_values(&self.source_columns, row)
    }
}

/// Hash-diff definition over a Satellite's descriptive attributes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HashDiffColumn {
    pub target_name: String,

    /// Inputs in canonical order
    pub source_columns: Vec<String>,
}

impl HashDiffColumn {
    pub fn new<I, S>(target_name: impl Into<String>, source_columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            target_name: target_name.into(),
            source_columns: canonical_columns(source_columns),
        }
    }

    pub fn compute(&self, row: &BTreeMap<String, String>) -> Option<String> {
        hash_values(&self.source_columns, row)
    }
}

fn hash_values(columns: &[String], row: &BTreeMap<String, String>) -> Option<String> {
    let mut parts = Vec::with_capacity(columns.len());
    for column in columns {
        parts.push(row.get(column)?.trim().to_uppercase());
    }

    let mut hasher = Sha256::new();
    hasher.update(parts.join(HASH_INPUT_DELIMITER).as_bytes());
    Some(hex::encode(hasher.finalize()))
}

/// Business object identified by one or more business keys
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hub {
    pub name: String,

    /// Ordered set, declaration order
    pub business_keys: Vec<String>,

    pub source_tables: Vec<String>,

    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash_key: Option<HashKeyColumn>,
}

impl Hub {
    pub fn new(name: impl Into<String>, business_keys: Vec<String>, source_tables: Vec<String>) -> Self {
        Self {
            name: name.into(),
            business_keys,
            source_tables,
            description: String::new(),
            hash_key: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Relationship between two or more Hubs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub name: String,

    /// Hub names, declaration order
    pub related_hubs: Vec<String>,

    /// Keys actually carried (and hashed) by the Link
    pub business_keys: Vec<String>,

    pub source_tables: Vec<String>,

    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash_key: Option<HashKeyColumn>,

    /// One Hub hash key per related Hub
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hub_hash_keys: Vec<HashKeyColumn>,
}

impl Link {
    pub fn new(
        name: impl Into<String>,
        related_hubs: Vec<String>,
        business_keys: Vec<String>,
        source_tables: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            related_hubs,
            business_keys,
            source_tables,
            description: String::new(),
            hash_key: None,
            hub_hash_keys: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Descriptive attributes attached to a Hub (Satellite) or Link (Link-Satellite)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Satellite {
    pub name: String,

    /// Parent Hub or Link name
    pub parent: String,

    /// Inherited from the parent
    pub business_keys: Vec<String>,

    pub descriptive_attrs: Vec<String>,

    pub source_table: String,

    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash_key: Option<HashKeyColumn>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash_diff: Option<HashDiffColumn>,
}

/// Structurally identical to a Satellite; its parent is a Link
pub type LinkSatellite = Satellite;

impl Satellite {
    pub fn new(
        name: impl Into<String>,
        parent: impl Into<String>,
        business_keys: Vec<String>,
        descriptive_attrs: Vec<String>,
        source_table: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            parent: parent.into(),
            business_keys,
            descriptive_attrs,
            source_table: source_table.into(),
            description: String::new(),
            hash_key: None,
            hash_diff: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Root aggregate owning every entity of one pipeline run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataVaultModel {
    pub hubs: BTreeMap<String, Hub>,
    pub links: BTreeMap<String, Link>,
    pub satellites: BTreeMap<String, Satellite>,
    pub link_satellites: BTreeMap<String, LinkSatellite>,

    /// Snapshot of the source columns the model consumes, keyed `TABLE.COLUMN`
    #[serde(default)]
    pub columns: BTreeMap<String, SourceColumn>,

    /// Source schema per source table
    #[serde(default)]
    pub table_schemas: BTreeMap<String, String>,
}

impl DataVaultModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_hub(&mut self, hub: Hub) {
        self.hubs.insert(hub.name.clone(), hub);
    }

    pub fn add_link(&mut self, link: Link) {
        self.links.insert(link.name.clone(), link);
    }

    pub fn add_satellite(&mut self, satellite: Satellite) {
        self.satellites.insert(satellite.name.clone(), satellite);
    }

    pub fn add_link_satellite(&mut self, link_satellite: LinkSatellite) {
        self.link_satellites.insert(link_satellite.name.clone(), link_satellite);
    }

    /// Record a consumed source column
    pub fn add_column(&mut self, column: SourceColumn) {
        self.columns
            .insert(column_key(&column.source_table, &column.name), column);
    }

    /// Look up a consumed source column
    pub fn column(&self, table: &str, column: &str) -> Option<&SourceColumn> {
        self.columns.get(&column_key(table, column))
    }

    /// Every entity name with its kind, in collection order
    pub fn entity_names(&self) -> Vec<(EntityKind, &str)> {
        self.hubs
            .keys()
            .map(|n| (EntityKind::Hub, n.as_str()))
            .chain(self.links.keys().map(|n| (EntityKind::Link, n.as_str())))
            .chain(self.satellites.keys().map(|n| (EntityKind::Satellite, n.as_str())))
            .chain(
                self.link_satellites
                    .keys()
                    .map(|n| (EntityKind::LinkSatellite, n.as_str())),
            )
            .collect()
    }

    pub fn entity_count(&self) -> usize {
        self.hubs.len() + self.links.len() + self.satellites.len() + self.link_satellites.len()
    }

    /// SHA-256 of the model's canonical JSON
    ///
    /// Identical inputs must give identical fingerprints across runs.
    pub fn fingerprint(&self) -> Result<String, serde_json::Error> {
        let json = serde_json::to_string(self)?;
        let mut hasher = Sha256::new();
        hasher.update(json.as_bytes());
        Ok(hex::encode(hasher.finalize()))
    }
}

/// Key of the column snapshot map
pub fn column_key(table: &str, column: &str) -> String {
    format!("{}.{}", table, column)
}
