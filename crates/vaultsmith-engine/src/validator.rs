//! Model validator
//!
//! A pure read pass over a built model. Every finding becomes a
//! `ValidationIssue`; nothing here fails or mutates the model.

use regex::Regex;
use std::collections::BTreeMap;

use vaultsmith_core::{
    DataVaultModel, EntityKind, EntityRef, Hub, IssueCode, Link, NamingConfig, Satellite,
    ValidationIssue, ValidationReport,
};

/// Compiled `^<PREFIX>[A-Z0-9_]+$` patterns per entity kind
struct NamingRules {
    hub: Regex,
    link: Regex,
    satellite: Regex,
    link_satellite: Regex,
}

impl NamingRules {
    fn compile(naming: &NamingConfig) -> Result<Self, regex::Error> {
        let pattern = |prefix: &str| Regex::new(&format!("^{}[A-Z0-9_]+$", regex::escape(prefix)));
        Ok(Self {
            hub: pattern(&naming.hub_prefix)?,
            link: pattern(&naming.link_prefix)?,
            satellite: pattern(&naming.satellite_prefix)?,
            link_satellite: pattern(&naming.link_satellite_prefix)?,
        })
    }

    fn for_kind(&self, kind: EntityKind) -> &Regex {
        match kind {
            EntityKind::Hub => &self.hub,
            EntityKind::Link => &self.link,
            EntityKind::Satellite => &self.satellite,
            EntityKind::LinkSatellite => &self.link_satellite,
        }
    }
}

/// Structural and referential rule checker
pub struct Validator {
    naming: Option<NamingRules>,
}

impl Validator {
    pub fn new(naming: &NamingConfig) -> Self {
        let rules = if naming.enforce_conventions {
            match NamingRules::compile(naming) {
                Ok(rules) => Some(rules),
                Err(e) => {
                    tracing::warn!(error = %e, "naming patterns failed to compile; convention checks disabled");
                    None
                }
            }
        } else {
            None
        };

        Self { naming: rules }
    }

    /// Validate a model and derive its status
    pub fn validate(&self, model: &DataVaultModel) -> ValidationReport {
        let mut issues = Vec::new();

        for hub in model.hubs.values() {
            self.check_hub(hub, &mut issues);
        }

        for link in model.links.values() {
            self.check_link(model, link, &mut issues);
        }

        for satellite in model.satellites.values() {
            self.check_satellite(model, EntityKind::Satellite, satellite, &mut issues);
        }

        for satellite in model.link_satellites.values() {
            self.check_satellite(model, EntityKind::LinkSatellite, satellite, &mut issues);
        }

        check_duplicate_names(model, &mut issues);

        let report = ValidationReport::from_issues(issues, model.entity_count());
        tracing::info!(
            status = %report.status,
            errors = report.summary.errors,
            warnings = report.summary.warnings,
            "model validated"
        );
        report
    }

    fn check_hub(&self, hub: &Hub, issues: &mut Vec<ValidationIssue>) {
        let entity = EntityRef::hub(&hub.name);

        if hub.business_keys.is_empty() {
            issues.push(ValidationIssue::new(
                IssueCode::HubEmptyBusinessKeys,
                entity.clone(),
                format!("Hub {} has no business keys", hub.name),
            ));
        }

        if hub.hash_key.is_none() {
            issues.push(missing_hash_key(entity.clone()));
        }

        self.check_name(entity, issues);
    }

    fn check_link(&self, model: &DataVaultModel, link: &Link, issues: &mut Vec<ValidationIssue>) {
        let entity = EntityRef::link(&link.name);

        if link.related_hubs.len() < 2 {
            issues.push(ValidationIssue::new(
                IssueCode::LinkTooFewHubs,
                entity.clone(),
                format!(
                    "Link {} relates {} hub(s); at least 2 are required",
                    link.name,
                    link.related_hubs.len()
                ),
            ));
        }

        for hub_name in &link.related_hubs {
            let Some(hub) = model.hubs.get(hub_name) else {
                issues.push(
                    ValidationIssue::new(
                        IssueCode::LinkHubNotFound,
                        entity.clone(),
                        format!("Link {} references hub {} which is not in the model", link.name, hub_name),
                    )
                    .with_related(hub_name),
                );
                continue;
            };

            let missing: Vec<String> = hub
                .business_keys
                .iter()
                .filter(|k| !link.business_keys.contains(k))
                .cloned()
                .collect();

            if missing.is_empty() {
                continue;
            }

            let code = if missing.len() == hub.business_keys.len() {
                IssueCode::LinkNoHubKeys
            } else {
                IssueCode::LinkMissingHubKeys
            };

            issues.push(
                ValidationIssue::new(
                    code,
                    entity.clone(),
                    format!(
                        "Link {} is missing business keys from hub {}: [{}]",
                        link.name,
                        hub.name,
                        missing.join(", ")
                    ),
                )
                .with_columns(missing)
                .with_related(&hub.name),
            );
        }

        if link.hash_key.is_none() {
            issues.push(missing_hash_key(entity.clone()));
        }

        self.check_name(entity, issues);
    }

    fn check_satellite(
        &self,
        model: &DataVaultModel,
        kind: EntityKind,
        satellite: &Satellite,
        issues: &mut Vec<ValidationIssue>,
    ) {
        let entity = EntityRef::new(kind, &satellite.name);

        let parent_keys = match kind {
            EntityKind::LinkSatellite => model.links.get(&satellite.parent).map(|l| &l.business_keys),
            _ => model.hubs.get(&satellite.parent).map(|h| &h.business_keys),
        };

        match parent_keys {
            None => issues.push(
                ValidationIssue::new(
                    IssueCode::ParentNotFound,
                    entity.clone(),
                    format!(
                        "{} {} references parent {} which is not in the model",
                        capitalize(&kind.to_string()),
                        satellite.name,
                        satellite.parent
                    ),
                )
                .with_related(&satellite.parent),
            ),
            Some(parent_keys) => {
                let missing: Vec<String> = parent_keys
                    .iter()
                    .filter(|k| !satellite.business_keys.contains(k))
                    .cloned()
                    .collect();
                let foreign: Vec<String> = satellite
                    .business_keys
                    .iter()
                    .filter(|k| !parent_keys.contains(k))
                    .cloned()
                    .collect();

                if !missing.is_empty() || !foreign.is_empty() {
                    let mut columns = missing;
                    columns.extend(foreign);
                    issues.push(
                        ValidationIssue::new(
                            IssueCode::SatelliteKeyMismatch,
                            entity.clone(),
                            format!(
                                "{} {} does not carry the business keys of {}",
                                capitalize(&kind.to_string()),
                                satellite.name,
                                satellite.parent
                            ),
                        )
                        .with_columns(columns)
                        .with_related(&satellite.parent),
                    );
                }
            }
        }

        if satellite.descriptive_attrs.is_empty() {
            issues.push(ValidationIssue::new(
                IssueCode::SatelliteNoAttributes,
                entity.clone(),
                format!("{} {} has no descriptive attributes", capitalize(&kind.to_string()), satellite.name),
            ));
        }

        if satellite.hash_key.is_none() {
            issues.push(missing_hash_key(entity.clone()));
        }

        self.check_name(entity, issues);
    }

    fn check_name(&self, entity: EntityRef, issues: &mut Vec<ValidationIssue>) {
        let Some(rules) = &self.naming else {
            return;
        };

        let pattern = rules.for_kind(entity.kind);
        if !pattern.is_match(&entity.name) {
            let message = format!(
                "{} name {} does not match {}",
                capitalize(&entity.kind.to_string()),
                entity.name,
                pattern.as_str()
            );
            issues.push(ValidationIssue::new(IssueCode::NamingConvention, entity, message));
        }
    }
}

fn missing_hash_key(entity: EntityRef) -> ValidationIssue {
    let message = format!("{} has no hash key definition", entity);
    ValidationIssue::new(IssueCode::HashKeyMissing, entity, message)
}

/// Names shared by more than one collection
fn check_duplicate_names(model: &DataVaultModel, issues: &mut Vec<ValidationIssue>) {
    let mut kinds: BTreeMap<&str, Vec<EntityKind>> = BTreeMap::new();
    for (kind, name) in model.entity_names() {
        kinds.entry(name).or_default().push(kind);
    }

    for (name, kinds) in kinds {
        if kinds.len() < 2 {
            continue;
        }

        let described: Vec<String> = kinds.iter().map(|k| k.to_string()).collect();
        issues.push(ValidationIssue::new(
            IssueCode::DuplicateEntityName,
            EntityRef::new(kinds[0], name),
            format!("Name {} is used by more than one entity: {}", name, described.join(", ")),
        ));
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashkey::HashKeyGenerator;
    use vaultsmith_core::{Severity, ValidationStatus};

    fn keys(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn validate(mut model: DataVaultModel) -> ValidationReport {
        let naming = NamingConfig::default();
        HashKeyGenerator::new(&naming).generate(&mut model);
        Validator::new(&naming).validate(&model)
    }

    fn base_model() -> DataVaultModel {
        let mut model = DataVaultModel::new();
        model.add_hub(Hub::new("HUB_CUSTOMER", keys(&["CUSTOMER_NO"]), keys(&["STTM_CUSTOMER"])));
        model.add_hub(Hub::new("HUB_ADDRESS", keys(&["COUNTRY"]), keys(&["STTM_CUSTOMER"])));
        model.add_link(Link::new(
            "LNK_CUSTOMER_ADDRESS",
            keys(&["HUB_CUSTOMER", "HUB_ADDRESS"]),
            keys(&["CUSTOMER_NO", "COUNTRY"]),
            keys(&["STTM_CUSTOMER"]),
        ));
        model.add_satellite(Satellite::new(
            "SAT_CUSTOMER",
            "HUB_CUSTOMER",
            keys(&["CUSTOMER_NO"]),
            keys(&["RISK_PROFILE"]),
            "STTM_CUSTOMER",
        ));
        model
    }

    #[test]
    fn clean_model() {
        let report = validate(base_model());
        assert_eq!(report.status, ValidationStatus::Clean, "{:?}", report.issues);
        assert_eq!(report.summary.entities_checked, 4);
    }

    #[test]
    fn empty_hub_keys_is_invalid() {
        let mut model = base_model();
        model.add_hub(Hub::new("HUB_EMPTY", vec![], vec![]));

        let report = validate(model);
        assert_eq!(report.status, ValidationStatus::Invalid);
        assert_eq!(report.errors().next().map(|i| i.code), Some(IssueCode::HubEmptyBusinessKeys));
    }

    #[test]
    fn missing_link_keys_warn() {
        let mut model = base_model();
        model.hubs.get_mut("HUB_CUSTOMER").unwrap().business_keys = keys(&["CUSTOMER_NO", "UNIQUE_ID_VALUE"]);
        model.satellites.get_mut("SAT_CUSTOMER").unwrap().business_keys = keys(&["CUSTOMER_NO", "UNIQUE_ID_VALUE"]);

        let report = validate(model);
        assert_eq!(report.status, ValidationStatus::Warnings);
        assert_eq!(report.issues.len(), 1);

        let issue = &report.issues[0];
        assert_eq!(issue.code, IssueCode::LinkMissingHubKeys);
        assert_eq!(issue.severity, Severity::Warning);
        assert_eq!(issue.columns, keys(&["UNIQUE_ID_VALUE"]));
        assert_eq!(issue.related.as_deref(), Some("HUB_CUSTOMER"));
        assert_eq!(
            issue.message,
            "Link LNK_CUSTOMER_ADDRESS is missing business keys from hub HUB_CUSTOMER: [UNIQUE_ID_VALUE]"
        );
    }

    #[test]
    fn link_without_any_hub_key() {
        let mut model = base_model();
        model.links.get_mut("LNK_CUSTOMER_ADDRESS").unwrap().business_keys = keys(&["CUSTOMER_NO"]);

        let report = validate(model);
        assert_eq!(report.issues[0].code, IssueCode::LinkNoHubKeys);
        assert_eq!(report.status, ValidationStatus::Warnings);
    }

    #[test]
    fn orphan_satellite_is_invalid() {
        let mut model = base_model();
        model.add_satellite(Satellite::new("SAT_GHOST", "HUB_GHOST", vec![], keys(&["A"]), "T"));
        model.add_link_satellite(Satellite::new("LSAT_GHOST", "LNK_GHOST", vec![], keys(&["A"]), "T"));

        let report = validate(model);
        assert_eq!(report.status, ValidationStatus::Invalid);
        let orphans: Vec<_> = report
            .issues
            .iter()
            .filter(|i| i.code == IssueCode::ParentNotFound)
            .map(|i| i.entity.name.as_str())
            .collect();
        assert_eq!(orphans, vec!["SAT_GHOST", "LSAT_GHOST"]);
    }

    #[test]
    fn duplicate_names_across_collections() {
        let mut model = base_model();
        model.add_satellite(Satellite::new(
            "HUB_CUSTOMER",
            "HUB_CUSTOMER",
            keys(&["CUSTOMER_NO"]),
            keys(&["COUNTRY"]),
            "STTM_CUSTOMER",
        ));

        let report = validate(model);
        assert_eq!(report.status, ValidationStatus::Invalid);
        let duplicate = report
            .issues
            .iter()
            .find(|i| i.code == IssueCode::DuplicateEntityName)
            .unwrap();
        assert_eq!(duplicate.entity, EntityRef::hub("HUB_CUSTOMER"));
    }

    #[test]
    fn satellite_without_attributes_warns() {
        let mut model = base_model();
        model.satellites.get_mut("SAT_CUSTOMER").unwrap().descriptive_attrs.clear();

        let report = validate(model);
        assert_eq!(report.status, ValidationStatus::Warnings);
        assert_eq!(report.issues[0].code, IssueCode::SatelliteNoAttributes);
        assert!(report.status.is_loadable());
    }

    #[test]
    fn naming_conventions() {
        let mut model = base_model();
        model.add_hub(Hub::new("CUSTOMER_MASTER", keys(&["MASTER_ID"]), vec![]));

        let report = validate(model.clone());
        let naming: Vec<_> = report
            .issues
            .iter()
            .filter(|i| i.code == IssueCode::NamingConvention)
            .collect();
        assert_eq!(naming.len(), 1);
        assert_eq!(naming[0].entity.name, "CUSTOMER_MASTER");

        let relaxed = NamingConfig {
            enforce_conventions: false,
            ..NamingConfig::default()
        };
        HashKeyGenerator::new(&relaxed).generate(&mut model);
        assert_eq!(Validator::new(&relaxed).validate(&model).status, ValidationStatus::Clean);
    }

    #[test]
    fn missing_hash_keys_are_errors() {
        let report = Validator::new(&NamingConfig::default()).validate(&base_model());
        assert_eq!(report.status, ValidationStatus::Invalid);
        assert!(report.issues.iter().all(|i| i.code == IssueCode::HashKeyMissing));
        assert_eq!(report.summary.errors, 4);
    }
}
