//! Normalized source metadata and the coarse type system

use serde::{Deserialize, Serialize};

/// Coarse type family of a source column
///
/// Only used to decide how a target type is rendered; the raw type string
/// always travels alongside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalType {
    /// Boolean type
    Bool,

    /// Integer type (any precision)
    Int,

    /// Decimal / float / NUMBER
    Decimal,

    /// Character data
    String,

    /// Date (no time component)
    Date,

    /// Timestamp (with time component)
    Timestamp,

    /// Raw bytes / LOBs
    Binary,

    /// Unrecognized type string
    Unknown,
}

impl LogicalType {
    /// Classify a raw type string such as `VARCHAR2`, `NUMBER(10,2)` or `DATE`
    pub fn from_raw(data_type: &str) -> Self {
        let lower = data_type.trim().to_lowercase();
        let base = lower.split('(').next().unwrap_or("").trim();

        match base {
            "bool" | "boolean" | "bit" => Self::Bool,

            "int" | "integer" | "bigint" | "smallint" | "tinyint" | "int2" | "int4" | "int8"
            | "int64" | "pls_integer" => Self::Int,

            "number" | "numeric" | "decimal" | "float" | "double" | "real" | "float64"
            | "binary_float" | "binary_double" | "money" => Self::Decimal,

            "varchar" | "varchar2" | "nvarchar" | "nvarchar2" | "char" | "nchar" | "text"
            | "string" | "character" | "character varying" | "clob" | "nclob" => Self::String,

            "date" => Self::Date,

            s if s.starts_with("timestamp") || s == "datetime" || s == "datetime2" => Self::Timestamp,

            "blob" | "raw" | "long raw" | "bytea" | "binary" | "varbinary" => Self::Binary,

            _ => Self::Unknown,
        }
    }

    /// Whether the target type needs an explicit length
    pub fn is_character(&self) -> bool {
        matches!(self, Self::String)
    }
}

impl std::fmt::Display for LogicalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool => write!(f, "BOOL"),
            Self::Int => write!(f, "INT"),
            Self::Decimal => write!(f, "DECIMAL"),
            Self::String => write!(f, "STRING"),
            Self::Date => write!(f, "DATE"),
            Self::Timestamp => write!(f, "TIMESTAMP"),
            Self::Binary => write!(f, "BINARY"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Canonical form of a schema, table or column identifier
pub fn canonical_identifier(name: &str) -> String {
    name.trim().to_ascii_uppercase()
}

/// A column of a normalized source table. Immutable once normalized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceColumn {
    /// Column name (canonical)
    pub name: String,

    /// Raw type string, passed through verbatim
    pub data_type: String,

    /// Coarse type family
    pub logical_type: LogicalType,

    /// Declared length, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,

    /// Nullability
    pub nullable: bool,

    /// Owning table (canonical)
    pub source_table: String,

    /// Declared primary/business key hint from the catalog
    #[serde(default)]
    pub declared_key: bool,

    /// Free-form catalog description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SourceColumn {
    /// Create a nullable, non-key column
    pub fn new(
        source_table: impl Into<String>,
        name: impl Into<String>,
        data_type: impl Into<String>,
    ) -> Self {
        let data_type = data_type.into();
        Self {
            name: name.into(),
            logical_type: LogicalType::from_raw(&data_type),
            data_type,
            length: None,
            nullable: true,
            source_table: source_table.into(),
            declared_key: false,
            description: None,
        }
    }

    /// Set length
    pub fn with_length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    /// Set nullability
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Mark as a declared key
    pub fn with_declared_key(mut self, declared_key: bool) -> Self {
        self.declared_key = declared_key;
        self
    }

    /// Set description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A normalized source table with columns in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceTable {
    /// Schema name (canonical)
    pub schema: String,

    /// Table name (canonical)
    pub name: String,

    /// Ordered list of columns
    pub columns: Vec<SourceColumn>,
}

impl SourceTable {
    pub fn new(schema: impl Into<String>, name: impl Into<String>, columns: Vec<SourceColumn>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
            columns,
        }
    }

    /// Find a column by canonical name
    pub fn find_column(&self, name: &str) -> Option<&SourceColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.find_column(name).is_some()
    }

    /// Get column names
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// `SCHEMA.TABLE`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logical_type_from_raw() {
        assert_eq!(LogicalType::from_raw("VARCHAR2"), LogicalType::String);
        assert_eq!(LogicalType::from_raw("NUMBER(10,2)"), LogicalType::Decimal);
        assert_eq!(LogicalType::from_raw("date"), LogicalType::Date);
        assert_eq!(LogicalType::from_raw("TIMESTAMP(6) WITH TIME ZONE"), LogicalType::Timestamp);
        assert_eq!(LogicalType::from_raw("SDO_GEOMETRY"), LogicalType::Unknown);
    }

    #[test]
    fn table_operations() {
        let table = SourceTable::new(
            "FCUBS",
            "STTM_CUSTOMER",
            vec![
                SourceColumn::new("STTM_CUSTOMER", "CUSTOMER_NO", "VARCHAR2").with_declared_key(true),
                SourceColumn::new("STTM_CUSTOMER", "COUNTRY", "VARCHAR2"),
            ],
        );

        assert_eq!(table.column_names(), vec!["CUSTOMER_NO", "COUNTRY"]);
        assert!(table.has_column("COUNTRY"));
        assert!(!table.has_column("FAX_NUMBER"));
        assert_eq!(table.qualified_name(), "FCUBS.STTM_CUSTOMER");
    }

    #[test]
    fn identifiers_are_upper_cased() {
        assert_eq!(canonical_identifier("  customer_no "), "CUSTOMER_NO");
    }
}
