//! Metadata normalizer
//!
//! Converts heterogeneous source descriptions (per-table documents or flat
//! catalog rows) into canonical `SourceTable`s. Pure transform: a malformed
//! table is rejected on its own and never fails the batch.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use vaultsmith_core::{canonical_identifier, Config, SourceColumn, SourceTable};

/// Length as it appears in catalogs: a number, a string, `-` or blank
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawLength {
    Number(u64),
    Text(String),
}

impl RawLength {
    fn parse(&self) -> Option<u32> {
        match self {
            Self::Number(n) => u32::try_from(*n).ok().filter(|n| *n > 0),
            Self::Text(s) => {
                let s = s.trim();
                if s.is_empty() || s == "-" {
                    return None;
                }
                // Spreadsheet exports write 50 as "50.0"
                let s = s.strip_suffix(".0").unwrap_or(s);
                s.parse::<u32>().ok().filter(|n| *n > 0)
            }
        }
    }
}

/// Boolean flag as it appears in catalogs: `true`, `"Y"`, `"NO"`, `1`...
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawFlag {
    Bool(bool),
    Number(i64),
    Text(String),
}

impl RawFlag {
    fn parse(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Number(n) => Some(*n != 0),
            Self::Text(s) => match s.trim().to_ascii_uppercase().as_str() {
                "Y" | "YES" | "TRUE" | "1" => Some(true),
                "N" | "NO" | "FALSE" | "0" => Some(false),
                _ => None,
            },
        }
    }
}

/// Column of a per-table metadata document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawColumn {
    pub name: String,

    #[serde(default)]
    pub data_type: String,

    #[serde(default)]
    pub length: Option<RawLength>,

    #[serde(default)]
    pub nullable: Option<RawFlag>,

    #[serde(default, alias = "declared_key", alias = "is_key")]
    pub is_declared_key: Option<RawFlag>,

    #[serde(default)]
    pub description: Option<String>,
}

impl RawColumn {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            length: None,
            nullable: None,
            is_declared_key: None,
            description: None,
        }
    }

    pub fn with_length(mut self, length: u64) -> Self {
        self.length = Some(RawLength::Number(length));
        self
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = Some(RawFlag::Bool(nullable));
        self
    }

    pub fn declared_key(mut self) -> Self {
        self.is_declared_key = Some(RawFlag::Bool(true));
        self
    }
}

/// Per-table metadata document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTable {
    #[serde(default)]
    pub schema: String,

    #[serde(alias = "name")]
    pub table: String,

    #[serde(default)]
    pub columns: Vec<RawColumn>,
}

impl RawTable {
    pub fn new(schema: impl Into<String>, table: impl Into<String>, columns: Vec<RawColumn>) -> Self {
        Self {
            schema: schema.into(),
            table: table.into(),
            columns,
        }
    }
}

/// Flat catalog row (one per column), as exported from a data dictionary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct MetadataRow {
    #[serde(default)]
    pub schema_name: String,
    pub table_name: String,
    pub column_name: String,
    #[serde(default)]
    pub data_type: String,
    #[serde(default)]
    pub length: Option<RawLength>,
    #[serde(default)]
    pub nullable: Option<RawFlag>,
    #[serde(default)]
    pub is_key: Option<RawFlag>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Any accepted metadata file shape
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataDocument {
    Tables(Vec<RawTable>),
    Wrapped { tables: Vec<RawTable> },
    Rows(Vec<MetadataRow>),
}

impl MetadataDocument {
    /// Load from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, MetadataError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| MetadataError::IoError(path.display().to_string(), e.to_string()))?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self, MetadataError> {
        serde_json::from_str(json).map_err(|e| MetadataError::ParseError(e.to_string()))
    }

    /// Flatten into per-table documents
    pub fn into_tables(self) -> Vec<RawTable> {
        match self {
            Self::Tables(tables) | Self::Wrapped { tables } => tables,
            Self::Rows(rows) => group_rows(rows),
        }
    }
}

/// Group catalog rows by (schema, table), keeping first-seen order
pub fn group_rows(rows: Vec<MetadataRow>) -> Vec<RawTable> {
    let mut tables: Vec<RawTable> = Vec::new();

    for row in rows {
        let column = RawColumn {
            name: row.column_name,
            data_type: row.data_type,
            length: row.length,
            nullable: row.nullable,
            is_declared_key: row.is_key,
            description: row.description,
        };

        let schema = canonical_identifier(&row.schema_name);
        let table = canonical_identifier(&row.table_name);
        match tables
            .iter_mut()
            .find(|t| canonical_identifier(&t.schema) == schema && canonical_identifier(&t.table) == table)
        {
            Some(existing) => existing.columns.push(column),
            None => tables.push(RawTable::new(row.schema_name, row.table_name, vec![column])),
        }
    }

    tables
}

/// Metadata errors
///
/// `Malformed` is fatal to the one table it names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MetadataError {
    #[error("Malformed metadata for table '{table}': {reason}")]
    Malformed { table: String, reason: String },

    #[error("Failed to read metadata file {0}: {1}")]
    IoError(String, String),

    #[error("Failed to parse metadata: {0}")]
    ParseError(String),
}

impl MetadataError {
    fn malformed(table: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            table: table.into(),
            reason: reason.into(),
        }
    }
}

/// Result of normalizing a batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedBatch {
    /// Accepted tables, input order
    pub tables: Vec<SourceTable>,

    /// Rejected tables with the reason
    pub rejected: Vec<MetadataError>,
}

/// Normalize one table description
pub fn normalize_table(raw: &RawTable, config: &Config) -> Result<SourceTable, MetadataError> {
    let name = canonical_identifier(&raw.table);
    if name.is_empty() {
        return Err(MetadataError::malformed("<unnamed>", "table name is blank"));
    }

    if raw.columns.is_empty() {
        return Err(MetadataError::malformed(&name, "table has zero columns"));
    }

    let schema = match canonical_identifier(&raw.schema) {
        s if s.is_empty() => canonical_identifier(&config.source_schema),
        s => s,
    };

    let mut seen = HashSet::new();
    let mut columns = Vec::with_capacity(raw.columns.len());

    for (position, raw_col) in raw.columns.iter().enumerate() {
        let column_name = canonical_identifier(&raw_col.name);
        if column_name.is_empty() {
            return Err(MetadataError::malformed(
                &name,
                format!("column at position {} has a blank name", position + 1),
            ));
        }

        if !seen.insert(column_name.clone()) {
            return Err(MetadataError::malformed(
                &name,
                format!("duplicate column '{}'", column_name),
            ));
        }

        let mut column = SourceColumn::new(&name, column_name, raw_col.data_type.trim())
            .with_nullable(raw_col.nullable.as_ref().and_then(RawFlag::parse).unwrap_or(true))
            .with_declared_key(raw_col.is_declared_key.as_ref().and_then(RawFlag::parse).unwrap_or(false));

        if let Some(length) = raw_col.length.as_ref().and_then(RawLength::parse) {
            column = column.with_length(length);
        }

        if let Some(description) = raw_col.description.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
            column = column.with_description(description);
        }

        columns.push(column);
    }

    Ok(SourceTable::new(schema, name, columns))
}

/// Normalize a batch; malformed tables are collected, not propagated
pub fn normalize_batch(raws: &[RawTable], config: &Config) -> NormalizedBatch {
    let mut batch = NormalizedBatch::default();
    let mut names = HashSet::new();

    for raw in raws {
        match normalize_table(raw, config) {
            Ok(table) => {
                if !names.insert(table.name.clone()) {
                    tracing::warn!(table = %table.name, "rejecting duplicate table");
                    batch
                        .rejected
                        .push(MetadataError::malformed(&table.name, "table declared more than once"));
                    continue;
                }
                tracing::debug!(table = %table.name, columns = table.columns.len(), "normalized table");
                batch.tables.push(table);
            }
            Err(err) => {
                tracing::warn!(error = %err, "rejecting table");
                batch.rejected.push(err);
            }
        }
    }

    tracing::info!(
        accepted = batch.tables.len(),
        rejected = batch.rejected.len(),
        "metadata normalized"
    );

    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use vaultsmith_core::LogicalType;

    #[test]
    fn normalizes_names_and_attributes() {
        let raw = RawTable::new(
            "fcubs",
            " sttm_customer ",
            vec![
                RawColumn::new("customer_no", "VARCHAR2").with_length(9).with_nullable(false).declared_key(),
                RawColumn::new("Risk_Profile", "SDO_GEOMETRY"),
            ],
        );

        let table = normalize_table(&raw, &Config::default()).unwrap();
        assert_eq!(table.schema, "FCUBS");
        assert_eq!(table.name, "STTM_CUSTOMER");
        assert_eq!(table.column_names(), vec!["CUSTOMER_NO", "RISK_PROFILE"]);

        let key = &table.columns[0];
        assert_eq!(key.length, Some(9));
        assert!(!key.nullable);
        assert!(key.declared_key);
        assert_eq!(key.source_table, "STTM_CUSTOMER");

        // Unknown types pass through untouched
        let risk = &table.columns[1];
        assert_eq!(risk.data_type, "SDO_GEOMETRY");
        assert_eq!(risk.logical_type, LogicalType::Unknown);
        assert!(risk.nullable);
    }

    #[test]
    fn zero_columns_is_malformed() {
        let raw = RawTable::new("FCUBS", "EMPTY_TABLE", vec![]);
        let err = normalize_table(&raw, &Config::default()).unwrap_err();
        assert!(matches!(err, MetadataError::Malformed { ref table, .. } if table == "EMPTY_TABLE"));
    }

    #[test]
    fn duplicate_column_is_malformed() {
        let raw = RawTable::new(
            "FCUBS",
            "T",
            vec![RawColumn::new("A", "NUMBER"), RawColumn::new("a", "NUMBER")],
        );
        assert!(normalize_table(&raw, &Config::default()).is_err());
    }

    #[test]
    fn batch_keeps_good_tables() {
        let raws = vec![
            RawTable::new("FCUBS", "GOOD", vec![RawColumn::new("A", "NUMBER")]),
            RawTable::new("FCUBS", "BAD", vec![]),
            RawTable::new("FCUBS", "good", vec![RawColumn::new("B", "NUMBER")]),
        ];

        let batch = normalize_batch(&raws, &Config::default());
        assert_eq!(batch.tables.len(), 1);
        assert_eq!(batch.rejected.len(), 2);
    }

    #[test]
    fn blank_schema_falls_back_to_config() {
        let raw = RawTable::new("", "T", vec![RawColumn::new("A", "NUMBER")]);
        let table = normalize_table(&raw, &Config::default()).unwrap();
        assert_eq!(table.schema, "SOURCE");
    }

    #[test]
    fn catalog_rows_are_grouped() {
        let doc = MetadataDocument::from_json(
            r#"[
                {"SCHEMA_NAME": "FCUBS", "TABLE_NAME": "STTM_CUSTOMER", "COLUMN_NAME": "CUSTOMER_NO",
                 "DATA_TYPE": "VARCHAR2", "LENGTH": "9", "NULLABLE": "N", "DESCRIPTION": "Customer number"},
                {"SCHEMA_NAME": "FCUBS", "TABLE_NAME": "STTM_BRANCH", "COLUMN_NAME": "BRANCH_CODE",
                 "DATA_TYPE": "VARCHAR2", "LENGTH": "-", "NULLABLE": "Y", "DESCRIPTION": ""},
                {"SCHEMA_NAME": "FCUBS", "TABLE_NAME": "STTM_CUSTOMER", "COLUMN_NAME": "COUNTRY",
                 "DATA_TYPE": "VARCHAR2", "LENGTH": 3, "NULLABLE": "Y", "DESCRIPTION": "Country code"}
            ]"#,
        )
        .unwrap();

        let raws = doc.into_tables();
        assert_eq!(raws.len(), 2);
        assert_eq!(raws[0].table, "STTM_CUSTOMER");
        assert_eq!(raws[0].columns.len(), 2);

        let batch = normalize_batch(&raws, &Config::default());
        let customer = &batch.tables[0];
        assert_eq!(customer.columns[0].length, Some(9));
        assert!(!customer.columns[0].nullable);
        assert_eq!(customer.columns[0].description.as_deref(), Some("Customer number"));
        assert_eq!(customer.columns[1].length, Some(3));

        let branch = &batch.tables[1];
        assert_eq!(branch.columns[0].length, None);
        assert_eq!(branch.columns[0].description, None);
    }

    #[test]
    fn table_documents_parse() {
        let doc = MetadataDocument::from_json(
            r#"{"tables": [{"schema": "FCUBS", "table": "T", "columns": [
                {"name": "ID", "data_type": "NUMBER", "nullable": false, "is_declared_key": true}
            ]}]}"#,
        )
        .unwrap();

        let raws = doc.into_tables();
        let table = normalize_table(&raws[0], &Config::default()).unwrap();
        assert!(table.columns[0].declared_key);
        assert!(!table.columns[0].nullable);
    }
}
