//! Key classifier
//!
//! Assigns every column of a `SourceTable` exactly one role. Rules are
//! evaluated in a fixed precedence order and the first one with an opinion
//! wins; a column no rule claims is descriptive.

use serde::{Deserialize, Serialize};

use vaultsmith_core::{ClassifierConfig, SourceColumn, SourceTable};

/// Role a column plays in the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    BusinessKey,
    RelationshipKey,
    Descriptive,
}

impl std::fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BusinessKey => write!(f, "business_key"),
            Self::RelationshipKey => write!(f, "relationship_key"),
            Self::Descriptive => write!(f, "descriptive"),
        }
    }
}

/// Capability that decided a column's role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationSource {
    DeclaredHint,
    ExplicitOverride,
    NamingHeuristic,
    Default,
}

impl std::fmt::Display for ClassificationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DeclaredHint => write!(f, "declared_hint"),
            Self::ExplicitOverride => write!(f, "explicit_override"),
            Self::NamingHeuristic => write!(f, "naming_heuristic"),
            Self::Default => write!(f, "default"),
        }
    }
}

/// A classification rule
///
/// Returns `None` when the rule has no opinion about the column.
pub trait ClassificationRule: Send + Sync {
    /// Capability recorded against the columns this rule decides
    fn source(&self) -> ClassificationSource;

    fn classify(
        &self,
        table: &SourceTable,
        column: &SourceColumn,
        config: &ClassifierConfig,
    ) -> Option<ColumnRole>;
}

/// Catalog-declared keys are always business-key candidates
pub struct DeclaredHintRule;

impl ClassificationRule for DeclaredHintRule {
    fn source(&self) -> ClassificationSource {
        ClassificationSource::DeclaredHint
    }

    fn classify(&self, _: &SourceTable, column: &SourceColumn, _: &ClassifierConfig) -> Option<ColumnRole> {
        column.declared_key.then_some(ColumnRole::BusinessKey)
    }
}

/// Caller-supplied override lists
pub struct ExplicitOverrideRule;

impl ClassificationRule for ExplicitOverrideRule {
    fn source(&self) -> ClassificationSource {
        ClassificationSource::ExplicitOverride
    }

    fn classify(
        &self,
        table: &SourceTable,
        column: &SourceColumn,
        config: &ClassifierConfig,
    ) -> Option<ColumnRole> {
        let overrides = [
            (&config.business_key_overrides, ColumnRole::BusinessKey),
            (&config.relationship_key_overrides, ColumnRole::RelationshipKey),
            (&config.descriptive_overrides, ColumnRole::Descriptive),
        ];

        overrides
            .into_iter()
            .find(|(patterns, _)| ClassifierConfig::matches_any(&table.name, &column.name, patterns))
            .map(|(_, role)| role)
    }
}

/// Key-indicator suffixes and prefixes mark relationship keys
pub struct NamingHeuristicRule;

impl ClassificationRule for NamingHeuristicRule {
    fn source(&self) -> ClassificationSource {
        ClassificationSource::NamingHeuristic
    }

    fn classify(&self, _: &SourceTable, column: &SourceColumn, config: &ClassifierConfig) -> Option<ColumnRole> {
        config
            .key_token(&column.name)
            .map(|_| ColumnRole::RelationshipKey)
    }
}

/// Role assignment for one column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnClassification {
    pub column: String,
    pub role: ColumnRole,
    pub source: ClassificationSource,
}

/// A table with every column classified, declaration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedTable {
    pub table: SourceTable,
    pub columns: Vec<ColumnClassification>,
}

impl ClassifiedTable {
    pub fn name(&self) -> &str {
        &self.table.name
    }

    fn with_role(&self, role: ColumnRole) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.role == role)
            .map(|c| c.column.as_str())
            .collect()
    }

    pub fn business_key_candidates(&self) -> Vec<&str> {
        self.with_role(ColumnRole::BusinessKey)
    }

    pub fn relationship_key_candidates(&self) -> Vec<&str> {
        self.with_role(ColumnRole::RelationshipKey)
    }

    pub fn descriptive(&self) -> Vec<&str> {
        self.with_role(ColumnRole::Descriptive)
    }

    pub fn role_of(&self, column: &str) -> Option<ColumnRole> {
        self.columns.iter().find(|c| c.column == column).map(|c| c.role)
    }
}

/// Ordered rule set
pub struct KeyClassifier {
    rules: Vec<Box<dyn ClassificationRule>>,
}

impl KeyClassifier {
    /// Declared hint, then explicit override, then naming heuristic
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(DeclaredHintRule),
                Box::new(ExplicitOverrideRule),
                Box::new(NamingHeuristicRule),
            ],
        }
    }

    /// Append a rule after the built-in ones
    pub fn with_rule(mut self, rule: Box<dyn ClassificationRule>) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn classify_column(
        &self,
        table: &SourceTable,
        column: &SourceColumn,
        config: &ClassifierConfig,
    ) -> ColumnClassification {
        let (role, source) = self
            .rules
            .iter()
            .find_map(|rule| rule.classify(table, column, config).map(|role| (role, rule.source())))
            .unwrap_or((ColumnRole::Descriptive, ClassificationSource::Default));

        ColumnClassification {
            column: column.name.clone(),
            role,
            source,
        }
    }

    pub fn classify_table(&self, table: &SourceTable, config: &ClassifierConfig) -> ClassifiedTable {
        let columns: Vec<_> = table
            .columns
            .iter()
            .map(|column| self.classify_column(table, column, config))
            .collect();

        let classified = ClassifiedTable {
            table: table.clone(),
            columns,
        };

        tracing::debug!(
            table = %table.name,
            business_keys = ?classified.business_key_candidates(),
            relationship_keys = ?classified.relationship_key_candidates(),
            "classified table"
        );

        classified
    }
}

impl Default for KeyClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Classify a batch of tables with the default rule set
pub fn classify(tables: &[SourceTable], config: &ClassifierConfig) -> Vec<ClassifiedTable> {
    let classifier = KeyClassifier::new();
    tables
        .iter()
        .map(|table| classifier.classify_table(table, config))
        .collect()
}
