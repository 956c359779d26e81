//! Vaultsmith Core
//!
//! Core domain model with stable, versioned types.
//! Never rename issue codes or record fields - they are part of the public API.

pub mod diagnostic;
pub mod schema;
pub mod intent;
pub mod model;
pub mod report;
pub mod records;
pub mod config;

pub use diagnostic::{EntityKind, EntityRef, IssueCode, Severity, ValidationIssue};
pub use schema::{canonical_identifier, LogicalType, SourceColumn, SourceTable};
pub use intent::{GroupingIntent, HubIntent, IntentError, LinkIntent, LinkSatelliteIntent, SatelliteIntent};
pub use model::{
    canonical_columns, DataVaultModel, HashDiffColumn, HashKeyColumn, HashKeyType, Hub, Link,
    LinkSatellite, Satellite,
};
pub use report::{ReportSummary, ReportVersion, ValidationReport, ValidationStatus};
pub use records::{
    ColumnMappingRecord, EmittedModel, EntityMapping, HubRecord, LinkRecord, LinkSatelliteRecord,
    MappingKeyType, ModelMetadata, SatelliteRecord,
};
pub use config::{ClassifierConfig, Config, ConfigError, NamingConfig, TypeMappingConfig};
