//! Validation report schema (stable v1)
//!
//! This schema is STABLE and VERSIONED.
//! Breaking changes require a new version.

use serde::{Deserialize, Serialize};
use crate::diagnostic::{Severity, ValidationIssue};

/// Report schema version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportVersion {
    /// Major version (breaking changes)
    pub major: u32,

    /// Minor version (backward-compatible additions)
    pub minor: u32,
}

impl ReportVersion {
    /// Current report schema version
    pub const CURRENT: ReportVersion = ReportVersion { major: 1, minor: 0 };
}

impl std::fmt::Display for ReportVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Overall model status
///
/// Only `Invalid` blocks emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    Clean,
    Warnings,
    Invalid,
}

impl ValidationStatus {
    /// Derive the status from a set of issues
    pub fn from_issues(issues: &[ValidationIssue]) -> Self {
        if issues.iter().any(|i| i.severity == Severity::Error) {
            Self::Invalid
        } else if issues.is_empty() {
            Self::Clean
        } else {
            Self::Warnings
        }
    }

    pub fn is_loadable(&self) -> bool {
        !matches!(self, Self::Invalid)
    }
}

impl std::fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Clean => write!(f, "clean"),
            Self::Warnings => write!(f, "warnings"),
            Self::Invalid => write!(f, "invalid"),
        }
    }
}

/// Summary statistics for a report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Total number of issues
    pub total: usize,

    /// Number of errors
    pub errors: usize,

    /// Number of warnings
    pub warnings: usize,

    /// Number of entities checked
    pub entities_checked: usize,
}

/// Validation report (report.json v1)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Schema version
    pub version: ReportVersion,

    /// Timestamp (ISO 8601)
    pub timestamp: String,

    /// Derived status
    pub status: ValidationStatus,

    /// Summary statistics
    pub summary: ReportSummary,

    /// All issues, in rule order
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Create a new empty report
    pub fn new() -> Self {
        Self {
            version: ReportVersion::CURRENT,
            timestamp: chrono::Utc::now().to_rfc3339(),
            status: ValidationStatus::Clean,
            summary: ReportSummary::default(),
            issues: Vec::new(),
        }
    }

    /// Create a report from issues
    pub fn from_issues(issues: Vec<ValidationIssue>, entities_checked: usize) -> Self {
        let summary = ReportSummary {
            total: issues.len(),
            errors: issues.iter().filter(|i| i.severity == Severity::Error).count(),
            warnings: issues.iter().filter(|i| i.severity == Severity::Warning).count(),
            entities_checked,
        };

        Self {
            version: ReportVersion::CURRENT,
            timestamp: chrono::Utc::now().to_rfc3339(),
            status: ValidationStatus::from_issues(&issues),
            summary,
            issues,
        }
    }

    /// Add an issue to the report
    pub fn add_issue(&mut self, issue: ValidationIssue) {
        match issue.severity {
            Severity::Error => self.summary.errors += 1,
            Severity::Warning => self.summary.warnings += 1,
        }

        self.summary.total += 1;
        self.issues.push(issue);
        self.status = ValidationStatus::from_issues(&self.issues);
    }

    /// Check if the report has any errors
    pub fn has_errors(&self) -> bool {
        self.summary.errors > 0
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    /// Issues attached to one entity
    pub fn issues_for<'a>(&'a self, entity: &'a str) -> impl Iterator<Item = &'a ValidationIssue> + 'a {
        self.issues.iter().filter(move |i| i.entity.name == entity)
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Save to file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let json = self.to_json()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        std::fs::write(path, json)
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::{EntityRef, IssueCode};

    #[test]
    fn empty_report() {
        let report = ValidationReport::new();
        assert_eq!(report.version, ReportVersion::CURRENT);
        assert_eq!(report.summary.total, 0);
        assert_eq!(report.status, ValidationStatus::Clean);
        assert!(!report.has_errors());
    }

    #[test]
    fn warnings_only_is_loadable() {
        let report = ValidationReport::from_issues(
            vec![ValidationIssue::new(
                IssueCode::SatelliteNoAttributes,
                EntityRef::satellite("SAT_CUSTOMER"),
                "no attributes",
            )],
            3,
        );

        assert_eq!(report.status, ValidationStatus::Warnings);
        assert!(report.status.is_loadable());
        assert_eq!(report.summary.warnings, 1);
        assert_eq!(report.summary.entities_checked, 3);
    }

    #[test]
    fn any_error_is_invalid() {
        let mut report = ValidationReport::new();
        report.add_issue(ValidationIssue::new(
            IssueCode::LinkMissingHubKeys,
            EntityRef::link("LNK_A_B"),
            "missing",
        ));
        assert_eq!(report.status, ValidationStatus::Warnings);

        report.add_issue(ValidationIssue::new(
            IssueCode::HubEmptyBusinessKeys,
            EntityRef::hub("HUB_A"),
            "empty",
        ));
        assert_eq!(report.status, ValidationStatus::Invalid);
        assert!(!report.status.is_loadable());
        assert_eq!(report.errors().count(), 1);
        assert_eq!(report.issues_for("LNK_A_B").count(), 1);
    }

    #[test]
    fn report_serialization() {
        let report = ValidationReport::new();
        let json = report.to_json().unwrap();
        assert!(json.contains("\"version\""));
        assert!(json.contains("\"status\": \"clean\""));
    }
}
