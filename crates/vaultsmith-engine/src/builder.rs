//! Model builder
//!
//! Turns classified tables plus a grouping intent into a `DataVaultModel`.
//! All deduplication state lives in one `BuildState` per `build` call, so two
//! builds never observe each other.

use std::collections::{BTreeMap, HashMap, HashSet};

use vaultsmith_core::{
    canonical_columns, canonical_identifier, Config, DataVaultModel, EntityKind, GroupingIntent, Hub,
    HubIntent, Link, LinkIntent, Satellite,
};

use crate::classifier::{ClassifiedTable, ColumnRole};

/// Structural rule violated while building; fatal to the whole run
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelConstructionError {
    #[error("Link {link} declares {count} related hub(s); at least 2 are required")]
    TooFewHubs { link: String, count: usize },

    #[error("Link {link} references unknown hub {hub}")]
    UnknownHub { link: String, hub: String },

    #[error("{entity} references unknown source table {table}")]
    UnknownSourceTable { entity: String, table: String },

    #[error("{entity}: column {column} not found in source table(s) {tables}")]
    UnknownColumn {
        entity: String,
        column: String,
        tables: String,
    },

    #[error("Link {link} declares business key {column} which belongs to none of its hubs")]
    ForeignLinkKey { link: String, column: String },

    #[error("{satellite}: business keys {columns:?} are not keys of parent {parent}")]
    SatelliteKeysNotSubset {
        satellite: String,
        parent: String,
        columns: Vec<String>,
    },

    #[error("Duplicate {kind} name {name}")]
    DuplicateEntity { kind: EntityKind, name: String },
}

impl ModelConstructionError {
    /// Name of the offending entity
    pub fn entity(&self) -> &str {
        match self {
            Self::TooFewHubs { link, .. }
            | Self::UnknownHub { link, .. }
            | Self::ForeignLinkKey { link, .. } => link,
            Self::UnknownSourceTable { entity, .. } | Self::UnknownColumn { entity, .. } => entity,
            Self::SatelliteKeysNotSubset { satellite, .. } => satellite,
            Self::DuplicateEntity { name, .. } => name,
        }
    }
}

/// Builds one model per call from a fixed set of classified tables
pub struct ModelBuilder<'a> {
    config: &'a Config,
    tables: BTreeMap<&'a str, &'a ClassifiedTable>,
}

/// Per-build scratch state
#[derive(Default)]
struct BuildState {
    model: DataVaultModel,

    /// Sorted business-key tuple -> Hub name
    hub_index: HashMap<Vec<String>, String>,

    /// Deduplicated intent name -> surviving Hub name
    aliases: HashMap<String, String>,

    /// (table, column) -> Satellite holding it
    claimed: HashMap<(String, String), String>,
}

impl BuildState {
    fn resolve_hub(&self, name: &str) -> Option<&Hub> {
        let name = self.aliases.get(name).map(String::as_str).unwrap_or(name);
        self.model.hubs.get(name)
    }

    /// Claim a column for a Satellite, returning a different earlier owner
    fn claim(&mut self, table: &str, column: &str, owner: &str) -> Option<String> {
        let previous = self
            .claimed
            .insert((table.to_string(), column.to_string()), owner.to_string());
        previous.filter(|p| p != owner)
    }

    fn is_claimed(&self, table: &str, column: &str) -> bool {
        self.claimed.contains_key(&(table.to_string(), column.to_string()))
    }

    /// Business keys of Hubs and Links sourced from a table
    fn consumed_keys(&self, table: &str) -> HashSet<&str> {
        let hub_keys = self
            .model
            .hubs
            .values()
            .filter(|h| h.source_tables.iter().any(|t| t == table))
            .flat_map(|h| h.business_keys.iter());
        let link_keys = self
            .model
            .links
            .values()
            .filter(|l| l.source_tables.iter().any(|t| t == table))
            .flat_map(|l| l.business_keys.iter());
        hub_keys.chain(link_keys).map(String::as_str).collect()
    }

    /// Attributes that are already business keys of an entity over the table
    fn keyed_attrs(&self, table: &str, attrs: &[String]) -> Vec<String> {
        let consumed = self.consumed_keys(table);
        attrs
            .iter()
            .filter(|a| consumed.contains(a.as_str()))
            .cloned()
            .collect()
    }

    fn has_entity(&self, name: &str) -> bool {
        self.model.hubs.contains_key(name)
            || self.model.links.contains_key(name)
            || self.model.satellites.contains_key(name)
            || self.model.link_satellites.contains_key(name)
    }
}

/// Satellite or Link-Satellite, before its parent is resolved
struct SatelliteDraft<'i> {
    kind: EntityKind,
    name: &'i str,
    parent: &'i str,
    business_keys: &'i Option<Vec<String>>,
    source_table: &'i str,
    descriptive_attrs: &'i Option<Vec<String>>,
    description: &'i str,
}

impl<'a> ModelBuilder<'a> {
    pub fn new(tables: &'a [ClassifiedTable], config: &'a Config) -> Self {
        Self {
            config,
            tables: tables.iter().map(|t| (t.name(), t)).collect(),
        }
    }

    /// Build the model graph; hash keys are added later by the generator
    pub fn build(&self, intent: &GroupingIntent) -> Result<DataVaultModel, ModelConstructionError> {
        let mut state = BuildState::default();

        for hub in &intent.hubs {
            self.add_hub(&mut state, hub)?;
        }

        for link in &intent.links {
            self.add_link(&mut state, link)?;
        }

        let drafts: Vec<SatelliteDraft<'_>> = intent
            .satellites
            .iter()
            .map(|s| SatelliteDraft {
                kind: EntityKind::Satellite,
                name: &s.name,
                parent: &s.hub,
                business_keys: &s.business_keys,
                source_table: &s.source_table,
                descriptive_attrs: &s.descriptive_attrs,
                description: &s.description,
            })
            .chain(intent.link_satellites.iter().map(|s| SatelliteDraft {
                kind: EntityKind::LinkSatellite,
                name: &s.name,
                parent: &s.link,
                business_keys: &s.business_keys,
                source_table: &s.source_table,
                descriptive_attrs: &s.descriptive_attrs,
                description: &s.description,
            }))
            .collect();

        // Explicit attribute lists claim their columns up front so that
        // defaulted Satellites never repeat them
        for draft in &drafts {
            if let Some(attrs) = draft.descriptive_attrs {
                let table = canonical_identifier(draft.source_table);
                let owner = canonical_identifier(draft.name);
                for attr in canonical_list(attrs) {
                    if let Some(other) = state.claim(&table, &attr, &owner) {
                        tracing::warn!(
                            satellite = %owner,
                            other = %other,
                            column = %attr,
                            "descriptive attribute placed in more than one satellite"
                        );
                    }
                }
            }
        }

        for draft in &drafts {
            self.add_satellite(&mut state, draft)?;
        }

        if intent.auto_satellites {
            self.add_auto_satellites(&mut state, intent);
        }

        tracing::info!(
            hubs = state.model.hubs.len(),
            links = state.model.links.len(),
            satellites = state.model.satellites.len(),
            link_satellites = state.model.link_satellites.len(),
            "model built"
        );

        Ok(state.model)
    }

    fn table(&self, entity: &str, name: &str) -> Result<&'a ClassifiedTable, ModelConstructionError> {
        self.tables
            .get(name)
            .copied()
            .ok_or_else(|| ModelConstructionError::UnknownSourceTable {
                entity: entity.to_string(),
                table: name.to_string(),
            })
    }

    fn tables_for(&self, entity: &str, names: &[String]) -> Result<Vec<&'a ClassifiedTable>, ModelConstructionError> {
        names.iter().map(|name| self.table(entity, name)).collect()
    }

    /// Record consumed columns and their table schema on the model
    fn snapshot(&self, state: &mut BuildState, table: &ClassifiedTable, columns: &[String]) {
        state
            .model
            .table_schemas
            .insert(table.table.name.clone(), table.table.schema.clone());
        for column in columns {
            if let Some(source) = table.table.find_column(column) {
                state.model.add_column(source.clone());
            }
        }
    }

    fn add_hub(&self, state: &mut BuildState, intent: &HubIntent) -> Result<(), ModelConstructionError> {
        let name = canonical_identifier(&intent.name);
        let keys = canonical_list(&intent.business_keys);
        let table_names = canonical_list(&intent.source_tables);
        let tables = self.tables_for(&name, &table_names)?;

        for key in &keys {
            if !tables.iter().any(|t| t.table.has_column(key)) {
                return Err(ModelConstructionError::UnknownColumn {
                    entity: name,
                    column: key.clone(),
                    tables: table_names.join(", "),
                });
            }
        }

        for table in &tables {
            self.snapshot(state, table, &keys);
        }

        let dedup_key = canonical_columns(&keys);
        if !keys.is_empty() {
            if let Some(existing) = state.hub_index.get(&dedup_key).cloned() {
                tracing::debug!(hub = %name, into = %existing, "deduplicated hub");
                if let Some(hub) = state.model.hubs.get_mut(&existing) {
                    for table in table_names {
                        if !hub.source_tables.contains(&table) {
                            hub.source_tables.push(table);
                        }
                    }
                    if hub.description.is_empty() {
                        hub.description = intent.description.clone();
                    }
                }
                if name != existing {
                    state.aliases.insert(name, existing);
                }
                return Ok(());
            }
        }

        if state.model.hubs.contains_key(&name) {
            return Err(ModelConstructionError::DuplicateEntity {
                kind: EntityKind::Hub,
                name,
            });
        }

        if !keys.is_empty() {
            state.hub_index.insert(dedup_key, name.clone());
        }

        tracing::debug!(hub = %name, keys = ?keys, "built hub");
        state
            .model
            .add_hub(Hub::new(name, keys, table_names).with_description(&intent.description));
        Ok(())
    }

    fn add_link(&self, state: &mut BuildState, intent: &LinkIntent) -> Result<(), ModelConstructionError> {
        let name = canonical_identifier(&intent.name);

        if intent.related_hubs.len() < 2 {
            return Err(ModelConstructionError::TooFewHubs {
                link: name,
                count: intent.related_hubs.len(),
            });
        }

        let mut related: Vec<String> = Vec::new();
        for hub_name in canonical_list(&intent.related_hubs) {
            let hub = state
                .resolve_hub(&hub_name)
                .ok_or_else(|| ModelConstructionError::UnknownHub {
                    link: name.clone(),
                    hub: hub_name.clone(),
                })?;
            if !related.contains(&hub.name) {
                related.push(hub.name.clone());
            }
        }

        // Two aliases of the same Hub relate nothing
        if related.len() < 2 {
            return Err(ModelConstructionError::TooFewHubs {
                link: name,
                count: related.len(),
            });
        }

        let table_names = canonical_list(&intent.source_tables);
        let tables = self.tables_for(&name, &table_names)?;
        let available = |column: &str| tables.iter().any(|t| t.table.has_column(column));

        let hub_keys: Vec<&Hub> = related.iter().filter_map(|h| state.model.hubs.get(h)).collect();

        let keys = match &intent.business_keys {
            Some(declared) => {
                let declared = canonical_list(declared);
                if let Some(key) = declared
                    .iter()
                    .find(|key| !hub_keys.iter().any(|hub| hub.business_keys.contains(*key)))
                {
                    return Err(ModelConstructionError::ForeignLinkKey {
                        link: name,
                        column: key.clone(),
                    });
                }

                // Hub keys absent from the source tables leave the hash input
                let (present, absent): (Vec<String>, Vec<String>) =
                    declared.into_iter().partition(|key| available(key));
                if !absent.is_empty() {
                    tracing::warn!(
                        link = %name,
                        columns = ?absent,
                        tables = %table_names.join(", "),
                        "declared link keys not in source tables; omitted"
                    );
                }
                present
            }
            None => {
                let mut keys: Vec<String> = Vec::new();
                for hub in &hub_keys {
                    for key in &hub.business_keys {
                        if available(key) && !keys.contains(key) {
                            keys.push(key.clone());
                        }
                    }
                }
                keys
            }
        };

        for hub in &hub_keys {
            let missing: Vec<&String> = hub.business_keys.iter().filter(|k| !keys.contains(k)).collect();
            if !missing.is_empty() {
                tracing::warn!(link = %name, hub = %hub.name, missing = ?missing, "link omits hub keys");
            }
        }

        if state.model.links.contains_key(&name) {
            return Err(ModelConstructionError::DuplicateEntity {
                kind: EntityKind::Link,
                name,
            });
        }

        for table in &tables {
            self.snapshot(state, table, &keys);
        }

        tracing::debug!(link = %name, hubs = ?related, keys = ?keys, "built link");
        state
            .model
            .add_link(Link::new(name, related, keys, table_names).with_description(&intent.description));
        Ok(())
    }

    fn add_satellite(&self, state: &mut BuildState, draft: &SatelliteDraft<'_>) -> Result<(), ModelConstructionError> {
        let name = canonical_identifier(draft.name);
        let table_name = canonical_identifier(draft.source_table);
        let table = self.table(&name, &table_name)?;

        let (parent, parent_keys) = match draft.kind {
            EntityKind::LinkSatellite => {
                let parent = canonical_identifier(draft.parent);
                let keys = state.model.links.get(&parent).map(|l| l.business_keys.clone());
                (parent, keys)
            }
            _ => {
                let requested = canonical_identifier(draft.parent);
                match state.resolve_hub(&requested) {
                    Some(hub) => (hub.name.clone(), Some(hub.business_keys.clone())),
                    None => (requested, None),
                }
            }
        };

        if parent_keys.is_none() {
            tracing::warn!(satellite = %name, parent = %parent, "satellite parent not in model");
        }

        let keys = match (draft.business_keys, &parent_keys) {
            (Some(declared), Some(parent_keys)) => {
                let declared = canonical_list(declared);
                let extra: Vec<String> = declared
                    .iter()
                    .filter(|k| !parent_keys.contains(k))
                    .cloned()
                    .collect();
                if !extra.is_empty() {
                    return Err(ModelConstructionError::SatelliteKeysNotSubset {
                        satellite: name,
                        parent,
                        columns: extra,
                    });
                }
                declared
            }
            (Some(declared), None) => canonical_list(declared),
            (None, Some(parent_keys)) => parent_keys.clone(),
            (None, None) => Vec::new(),
        };

        let attrs = match draft.descriptive_attrs {
            Some(declared) => {
                let declared = canonical_list(declared);
                if let Some(missing) = declared.iter().find(|a| !table.table.has_column(a)) {
                    return Err(ModelConstructionError::UnknownColumn {
                        entity: name,
                        column: missing.clone(),
                        tables: table_name,
                    });
                }
                let keyed = state.keyed_attrs(&table_name, &declared);
                if !keyed.is_empty() {
                    tracing::warn!(
                        satellite = %name,
                        columns = ?keyed,
                        "descriptive attributes are also business keys"
                    );
                }
                declared
            }
            None => {
                let attrs = self.default_attrs(state, table);
                for attr in &attrs {
                    state.claim(&table_name, attr, &name);
                }
                attrs
            }
        };

        if state.model.satellites.contains_key(&name) || state.model.link_satellites.contains_key(&name) {
            return Err(ModelConstructionError::DuplicateEntity { kind: draft.kind, name });
        }

        self.snapshot(state, table, &keys);
        self.snapshot(state, table, &attrs);

        tracing::debug!(satellite = %name, parent = %parent, attrs = attrs.len(), "built satellite");
        let satellite =
            Satellite::new(name, parent, keys, attrs, table_name).with_description(draft.description);
        match draft.kind {
            EntityKind::LinkSatellite => state.model.add_link_satellite(satellite),
            _ => state.model.add_satellite(satellite),
        }
        Ok(())
    }

    /// One Satellite per (Hub, source table) for leftover descriptive columns
    fn add_auto_satellites(&self, state: &mut BuildState, intent: &GroupingIntent) {
        let mut seen = HashSet::new();
        let hub_names: Vec<String> = intent
            .hubs
            .iter()
            .filter_map(|h| state.resolve_hub(&canonical_identifier(&h.name)))
            .map(|h| h.name.clone())
            .filter(|name| seen.insert(name.clone()))
            .collect();

        for hub_name in hub_names {
            let Some(hub) = state.model.hubs.get(&hub_name) else {
                continue;
            };
            let keys = hub.business_keys.clone();
            let table_names = hub.source_tables.clone();
            let stem = self.config.naming.hub_stem(&hub_name).to_string();

            for table_name in table_names {
                let Some(table) = self.tables.get(table_name.as_str()).copied() else {
                    continue;
                };

                let attrs = self.default_attrs(state, table);
                if attrs.is_empty() {
                    continue;
                }

                let name = format!("{}{}_{}", self.config.naming.satellite_prefix, stem, table_name);
                if state.has_entity(&name) {
                    tracing::debug!(satellite = %name, "skipping auto satellite, name taken");
                    continue;
                }

                for attr in &attrs {
                    state.claim(&table_name, attr, &name);
                }
                self.snapshot(state, table, &attrs);

                tracing::debug!(satellite = %name, hub = %hub_name, attrs = attrs.len(), "built auto satellite");
                state.model.add_satellite(
                    Satellite::new(name, hub_name.clone(), keys.clone(), attrs, table_name.clone())
                        .with_description(format!("Descriptive attributes of {}", table_name)),
                );
            }
        }
    }

    /// Descriptive columns of a table no Hub, Link or Satellite has taken.
    /// Relationship-key candidates that no key consumed fall back to descriptive.
    fn default_attrs(&self, state: &BuildState, table: &ClassifiedTable) -> Vec<String> {
        let name = table.name();
        let consumed = state.consumed_keys(name);

        table
            .columns
            .iter()
            .filter(|c| c.role != ColumnRole::BusinessKey)
            .filter(|c| !consumed.contains(c.column.as_str()))
            .filter(|c| !state.is_claimed(name, &c.column))
            .map(|c| c.column.clone())
            .collect()
    }
}

/// Canonicalize identifiers, dropping blanks and repeats, keeping order
fn canonical_list(names: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        let name = canonical_identifier(name);
        if !name.is_empty() && !out.contains(&name) {
            out.push(name);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::classify;
    use vaultsmith_core::{HubIntent, SatelliteIntent, SourceColumn, SourceTable};

    fn customer_tables() -> Vec<ClassifiedTable> {
        let columns = ["CUSTOMER_NO", "UNIQUE_ID_VALUE", "COUNTRY", "RISK_PROFILE"]
            .iter()
            .map(|c| SourceColumn::new("STTM_CUSTOMER", *c, "VARCHAR2"))
            .collect();
        let table = SourceTable::new("FCUBS", "STTM_CUSTOMER", columns);
        classify(&[table], &Config::default().classifier)
    }

    fn hub(name: &str, keys: &[&str]) -> HubIntent {
        HubIntent {
            name: name.to_string(),
            business_keys: keys.iter().map(|k| k.to_string()).collect(),
            source_tables: vec!["STTM_CUSTOMER".to_string()],
            description: String::new(),
        }
    }

    #[test]
    fn reordered_keys_share_one_hub() {
        let tables = customer_tables();
        let config = Config::default();
        let intent = GroupingIntent {
            hubs: vec![
                hub("HUB_CUSTOMER", &["CUSTOMER_NO", "UNIQUE_ID_VALUE"]),
                hub("hub_client", &["unique_id_value", "customer_no"]),
            ],
            satellites: vec![SatelliteIntent {
                name: "SAT_CLIENT".to_string(),
                hub: "HUB_CLIENT".to_string(),
                business_keys: None,
                source_table: "STTM_CUSTOMER".to_string(),
                descriptive_attrs: None,
                description: String::new(),
            }],
            ..GroupingIntent::default()
        };

        let model = ModelBuilder::new(&tables, &config).build(&intent).unwrap();
        assert_eq!(model.hubs.len(), 1);

        // The alias resolves to the surviving Hub
        let sat = &model.satellites["SAT_CLIENT"];
        assert_eq!(sat.parent, "HUB_CUSTOMER");
        assert_eq!(sat.business_keys, vec!["CUSTOMER_NO", "UNIQUE_ID_VALUE"]);
        assert_eq!(sat.descriptive_attrs, vec!["COUNTRY", "RISK_PROFILE"]);
    }

    #[test]
    fn unknown_key_column_is_fatal() {
        let tables = customer_tables();
        let config = Config::default();
        let intent = GroupingIntent {
            hubs: vec![hub("HUB_CONTACT", &["FAX_NUMBER"])],
            ..GroupingIntent::default()
        };

        let err = ModelBuilder::new(&tables, &config).build(&intent).unwrap_err();
        assert!(matches!(err, ModelConstructionError::UnknownColumn { ref column, .. } if column == "FAX_NUMBER"));
        assert_eq!(err.entity(), "HUB_CONTACT");
    }

    #[test]
    fn same_name_different_keys_is_duplicate() {
        let tables = customer_tables();
        let config = Config::default();
        let intent = GroupingIntent {
            hubs: vec![hub("HUB_CUSTOMER", &["CUSTOMER_NO"]), hub("HUB_CUSTOMER", &["COUNTRY"])],
            ..GroupingIntent::default()
        };

        let err = ModelBuilder::new(&tables, &config).build(&intent).unwrap_err();
        assert!(matches!(err, ModelConstructionError::DuplicateEntity { kind: EntityKind::Hub, .. }));
    }

    #[test]
    fn builds_are_independent() {
        let tables = customer_tables();
        let config = Config::default();
        let builder = ModelBuilder::new(&tables, &config);

        let first = GroupingIntent {
            hubs: vec![hub("HUB_CUSTOMER", &["CUSTOMER_NO"])],
            ..GroupingIntent::default()
        };
        let second = GroupingIntent {
            hubs: vec![hub("HUB_CLIENT", &["CUSTOMER_NO"])],
            ..GroupingIntent::default()
        };

        builder.build(&first).unwrap();
        let model = builder.build(&second).unwrap();
        assert!(model.hubs.contains_key("HUB_CLIENT"));
        assert!(!model.hubs.contains_key("HUB_CUSTOMER"));
    }

    #[test]
    fn auto_satellites_take_leftovers() {
        let tables = customer_tables();
        let config = Config::default();
        let intent = GroupingIntent {
            hubs: vec![hub("HUB_CUSTOMER", &["CUSTOMER_NO"])],
            auto_satellites: true,
            ..GroupingIntent::default()
        };

        let model = ModelBuilder::new(&tables, &config).build(&intent).unwrap();
        let sat = &model.satellites["SAT_CUSTOMER_STTM_CUSTOMER"];
        assert_eq!(sat.parent, "HUB_CUSTOMER");
        assert_eq!(sat.descriptive_attrs, vec!["UNIQUE_ID_VALUE", "COUNTRY", "RISK_PROFILE"]);
        assert!(model.column("STTM_CUSTOMER", "RISK_PROFILE").is_some());
        assert_eq!(model.table_schemas["STTM_CUSTOMER"], "FCUBS");
    }

    #[test]
    fn claims_report_a_second_owner() {
        let mut state = BuildState::default();
        assert_eq!(state.claim("STTM_CUSTOMER", "COUNTRY", "SAT_A"), None);
        assert_eq!(state.claim("STTM_CUSTOMER", "COUNTRY", "SAT_A"), None);
        assert_eq!(
            state.claim("STTM_CUSTOMER", "COUNTRY", "SAT_B").as_deref(),
            Some("SAT_A")
        );
        assert!(state.is_claimed("STTM_CUSTOMER", "COUNTRY"));
        assert!(!state.is_claimed("STTM_BRANCH", "COUNTRY"));
    }

    #[test]
    fn keyed_attrs_finds_hub_keys_of_the_same_table() {
        let mut state = BuildState::default();
        state.model.add_hub(Hub::new(
            "HUB_CUSTOMER",
            vec!["CUSTOMER_NO".to_string()],
            vec!["STTM_CUSTOMER".to_string()],
        ));

        let attrs = vec!["CUSTOMER_NO".to_string(), "COUNTRY".to_string()];
        assert_eq!(state.keyed_attrs("STTM_CUSTOMER", &attrs), vec!["CUSTOMER_NO"]);
        assert!(state.keyed_attrs("STTM_BRANCH", &attrs).is_empty());
    }

    #[test]
    fn overlapping_explicit_attributes_still_build() {
        let tables = customer_tables();
        let config = Config::default();
        let sat = |name: &str, attrs: &[&str]| SatelliteIntent {
            name: name.to_string(),
            hub: "HUB_CUSTOMER".to_string(),
            business_keys: None,
            source_table: "STTM_CUSTOMER".to_string(),
            descriptive_attrs: Some(attrs.iter().map(|a| a.to_string()).collect()),
            description: String::new(),
        };
        let intent = GroupingIntent {
            hubs: vec![hub("HUB_CUSTOMER", &["CUSTOMER_NO"])],
            satellites: vec![sat("SAT_A", &["CUSTOMER_NO", "COUNTRY"]), sat("SAT_B", &["COUNTRY"])],
            ..GroupingIntent::default()
        };

        let model = ModelBuilder::new(&tables, &config).build(&intent).unwrap();
        assert_eq!(model.satellites["SAT_A"].descriptive_attrs, vec!["CUSTOMER_NO", "COUNTRY"]);
        assert_eq!(model.satellites["SAT_B"].descriptive_attrs, vec!["COUNTRY"]);
    }
}
