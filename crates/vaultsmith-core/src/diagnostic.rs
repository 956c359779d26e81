//! Validation issue codes and severity
//!
//! IMPORTANT: Issue codes are versioned and stable.
//! NEVER rename or remove codes - downstream tooling keys on the strings.
//! Add new codes with new names only.

use serde::{Deserialize, Serialize};

/// Issue code registry (v1)
///
/// These codes are STABLE and VERSIONED.
/// Do NOT rename or remove codes - only add new ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCode {
    // Hub rules
    /// A Hub has no business keys
    HubEmptyBusinessKeys,

    // Link rules
    /// A Link does not carry every business key of a related Hub
    LinkMissingHubKeys,

    /// A Link carries no business key at all from one of its Hubs
    LinkNoHubKeys,

    /// A Link names a Hub that is not part of the model
    LinkHubNotFound,

    /// A Link relates fewer than two Hubs
    LinkTooFewHubs,

    // Satellite rules
    /// A Satellite or Link-Satellite references a parent missing from the model
    ParentNotFound,

    /// A Satellite has no descriptive attributes
    SatelliteNoAttributes,

    /// A Satellite carries only part of its parent's business keys
    SatelliteKeyMismatch,

    // Model-wide rules
    /// The same name is used by more than one entity
    DuplicateEntityName,

    /// Entity name does not follow the configured prefix convention
    NamingConvention,

    /// Entity has no hash key definition
    HashKeyMissing,
}

impl IssueCode {
    /// Get the issue code as a stable string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HubEmptyBusinessKeys => "HUB_EMPTY_BUSINESS_KEYS",
            Self::LinkMissingHubKeys => "LINK_MISSING_HUB_KEYS",
            Self::LinkNoHubKeys => "LINK_NO_HUB_KEYS",
            Self::LinkHubNotFound => "LINK_HUB_NOT_FOUND",
            Self::LinkTooFewHubs => "LINK_TOO_FEW_HUBS",
            Self::ParentNotFound => "PARENT_NOT_FOUND",
            Self::SatelliteNoAttributes => "SATELLITE_NO_ATTRIBUTES",
            Self::SatelliteKeyMismatch => "SATELLITE_KEY_MISMATCH",
            Self::DuplicateEntityName => "DUPLICATE_ENTITY_NAME",
            Self::NamingConvention => "NAMING_CONVENTION",
            Self::HashKeyMissing => "HASH_KEY_MISSING",
        }
    }

    /// Severity this code is always reported with
    pub fn severity(&self) -> Severity {
        match self {
            Self::HubEmptyBusinessKeys
            | Self::LinkHubNotFound
            | Self::LinkTooFewHubs
            | Self::ParentNotFound
            | Self::DuplicateEntityName
            | Self::HashKeyMissing => Severity::Error,
            Self::LinkMissingHubKeys
            | Self::LinkNoHubKeys
            | Self::SatelliteNoAttributes
            | Self::SatelliteKeyMismatch
            | Self::NamingConvention => Severity::Warning,
        }
    }
}

impl std::fmt::Display for IssueCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Issue severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Surfaced to the caller, does not block emission
    Warning,

    /// Makes the model invalid and blocks emission
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Kind of Data Vault entity an issue points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Hub,
    Link,
    Satellite,
    LinkSatellite,
}

impl EntityKind {
    /// Short entity type tag used in mapping records
    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::Hub => "hub",
            Self::Link => "lnk",
            Self::Satellite => "sat",
            Self::LinkSatellite => "lsat",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hub => write!(f, "hub"),
            Self::Link => write!(f, "link"),
            Self::Satellite => write!(f, "satellite"),
            Self::LinkSatellite => write!(f, "link satellite"),
        }
    }
}

/// Reference to the entity an issue is about
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    /// Entity kind
    pub kind: EntityKind,

    /// Entity name
    pub name: String,
}

impl EntityRef {
    pub fn new(kind: EntityKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }

    pub fn hub(name: impl Into<String>) -> Self {
        Self::new(EntityKind::Hub, name)
    }

    pub fn link(name: impl Into<String>) -> Self {
        Self::new(EntityKind::Link, name)
    }

    pub fn satellite(name: impl Into<String>) -> Self {
        Self::new(EntityKind::Satellite, name)
    }

    pub fn link_satellite(name: impl Into<String>) -> Self {
        Self::new(EntityKind::LinkSatellite, name)
    }
}

impl std::fmt::Display for EntityRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind, self.name)
    }
}

/// A validation finding with structured metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Stable issue code
    pub code: IssueCode,

    /// Severity level
    pub severity: Severity,

    /// Entity the issue is attached to
    pub entity: EntityRef,

    /// Human-readable message
    pub message: String,

    /// Columns involved (e.g. the missing keys), sorted
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<String>,

    /// Other entity involved (e.g. the Hub a missing key belongs to)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related: Option<String>,
}

impl ValidationIssue {
    /// Create a new issue; severity follows the code
    pub fn new(code: IssueCode, entity: EntityRef, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: code.severity(),
            entity,
            message: message.into(),
            columns: Vec::new(),
            related: None,
        }
    }

    /// Attach the columns involved
    pub fn with_columns(mut self, mut columns: Vec<String>) -> Self {
        columns.sort();
        columns.dedup();
        self.columns = columns;
        self
    }

    /// Attach the related entity name
    pub fn with_related(mut self, related: impl Into<String>) -> Self {
        self.related = Some(related.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.code, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_code_stability() {
        assert_eq!(IssueCode::HubEmptyBusinessKeys.as_str(), "HUB_EMPTY_BUSINESS_KEYS");
        assert_eq!(IssueCode::LinkMissingHubKeys.as_str(), "LINK_MISSING_HUB_KEYS");
        assert_eq!(IssueCode::ParentNotFound.as_str(), "PARENT_NOT_FOUND");
    }

    #[test]
    fn severity_follows_code() {
        assert_eq!(IssueCode::DuplicateEntityName.severity(), Severity::Error);
        assert_eq!(IssueCode::SatelliteNoAttributes.severity(), Severity::Warning);

        let issue = ValidationIssue::new(
            IssueCode::HubEmptyBusinessKeys,
            EntityRef::hub("HUB_CUSTOMER"),
            "Hub HUB_CUSTOMER has no business keys",
        );
        assert!(issue.is_error());
    }

    #[test]
    fn issue_serialization() {
        let issue = ValidationIssue::new(
            IssueCode::LinkMissingHubKeys,
            EntityRef::link("LNK_CUSTOMER_ADDRESS"),
            "missing keys",
        )
        .with_columns(vec!["UNIQUE_ID_VALUE".to_string()])
        .with_related("HUB_CUSTOMER");

        let json = serde_json::to_string(&issue).unwrap();
        assert!(json.contains("LINK_MISSING_HUB_KEYS"));
        assert!(json.contains("\"warning\""));
        assert!(json.contains("UNIQUE_ID_VALUE"));
    }
}
