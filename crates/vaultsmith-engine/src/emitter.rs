//! Model emitter
//!
//! Deterministic projection of a validated model into the exchange records.
//! An `invalid` report is a hard gate: nothing is emitted.

use vaultsmith_core::{
    ColumnMappingRecord, Config, DataVaultModel, EmittedModel, EntityKind, EntityMapping,
    HashKeyColumn, HashKeyType, Hub, HubRecord, Link, LinkRecord, LinkSatelliteRecord, LogicalType,
    MappingKeyType, ModelMetadata, ReportVersion, Satellite, SatelliteRecord, ValidationReport,
};

use crate::dtype::target_dtype;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmitError {
    #[error("Model is invalid, {} blocking error(s): {}", .errors.len(), .errors.join("; "))]
    InvalidModel { errors: Vec<String> },

    #[error("Failed to fingerprint model: {0}")]
    Fingerprint(String),
}

pub struct ModelEmitter<'a> {
    config: &'a Config,
}

impl<'a> ModelEmitter<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Emit records for a model whose report is not `invalid`
    pub fn emit(&self, model: &DataVaultModel, report: &ValidationReport) -> Result<EmittedModel, EmitError> {
        if !report.status.is_loadable() {
            return Err(EmitError::InvalidModel {
                errors: report.errors().map(|i| i.to_string()).collect(),
            });
        }

        let fingerprint = model
            .fingerprint()
            .map_err(|e| EmitError::Fingerprint(e.to_string()))?;

        let metadata = ModelMetadata {
            version: ReportVersion::CURRENT,
            created_at: report.timestamp.clone(),
            validation_status: report.status,
            validation_warnings: report.warnings().map(|i| i.message.clone()).collect(),
            validation_errors: report.errors().map(|i| i.message.clone()).collect(),
            fingerprint,
        };

        let hubs = model
            .hubs
            .values()
            .map(|hub| HubRecord {
                name: hub.name.clone(),
                business_keys: hub.business_keys.clone(),
                source_tables: hub.source_tables.clone(),
                description: hub.description.clone(),
            })
            .collect();

        let links = model
            .links
            .values()
            .map(|link| LinkRecord {
                name: link.name.clone(),
                related_hubs: link.related_hubs.clone(),
                business_keys: link.business_keys.clone(),
                source_tables: link.source_tables.clone(),
                description: link.description.clone(),
            })
            .collect();

        let satellites = model
            .satellites
            .values()
            .map(|sat| SatelliteRecord {
                name: sat.name.clone(),
                hub: sat.parent.clone(),
                business_keys: sat.business_keys.clone(),
                source_table: sat.source_table.clone(),
                descriptive_attrs: sat.descriptive_attrs.clone(),
            })
            .collect();

        let link_satellites = model
            .link_satellites
            .values()
            .map(|sat| LinkSatelliteRecord {
                name: sat.name.clone(),
                link: sat.parent.clone(),
                business_keys: sat.business_keys.clone(),
                source_table: sat.source_table.clone(),
                descriptive_attrs: sat.descriptive_attrs.clone(),
            })
            .collect();

        let mut mappings = Vec::with_capacity(model.entity_count());
        mappings.extend(model.hubs.values().map(|hub| self.hub_mapping(model, hub)));
        mappings.extend(model.links.values().map(|link| self.link_mapping(model, link)));
        mappings.extend(
            model
                .satellites
                .values()
                .map(|sat| self.satellite_mapping(model, EntityKind::Satellite, sat)),
        );
        mappings.extend(
            model
                .link_satellites
                .values()
                .map(|sat| self.satellite_mapping(model, EntityKind::LinkSatellite, sat)),
        );

        tracing::info!(mappings = mappings.len(), status = %report.status, "model emitted");

        Ok(EmittedModel {
            metadata,
            hubs,
            links,
            satellites,
            link_satellites,
            mappings,
        })
    }

    fn mapping(
        &self,
        model: &DataVaultModel,
        kind: EntityKind,
        name: &str,
        source_table: &str,
        parent_table: Option<String>,
        description: &str,
    ) -> EntityMapping {
        EntityMapping {
            source_schema: model
                .table_schemas
                .get(source_table)
                .cloned()
                .unwrap_or_else(|| self.config.source_schema.clone()),
            source_table: source_table.to_string(),
            target_schema: self.config.target_schema.clone(),
            target_table: name.to_string(),
            target_entity_type: kind.as_tag().to_string(),
            parent_table,
            collision_code: collision_code(name),
            description: description.to_string(),
            columns: Vec::new(),
        }
    }

    fn hash_column(&self, key: &HashKeyColumn) -> ColumnMappingRecord {
        ColumnMappingRecord {
            target: key.target_name.clone(),
            dtype: self.config.types.hash_key_dtype.clone(),
            key_type: key.key_type.into(),
            parent: key.parent.clone(),
            source: key.source_columns.clone(),
        }
    }

    /// Plain column carried over from the first table that has it
    fn source_column(
        &self,
        model: &DataVaultModel,
        tables: &[String],
        column: &str,
        key_type: MappingKeyType,
    ) -> ColumnMappingRecord {
        let dtype = tables
            .iter()
            .find_map(|table| model.column(table, column))
            .map(|c| target_dtype(c, &self.config.types))
            .unwrap_or_else(|| LogicalType::Unknown.to_string());

        ColumnMappingRecord {
            target: column.to_string(),
            dtype,
            key_type,
            parent: None,
            source: vec![column.to_string()],
        }
    }

    fn hub_mapping(&self, model: &DataVaultModel, hub: &Hub) -> EntityMapping {
        let source_table = hub.source_tables.first().map(String::as_str).unwrap_or_default();
        let mut mapping = self.mapping(model, EntityKind::Hub, &hub.name, source_table, None, &hub.description);

        if let Some(key) = &hub.hash_key {
            mapping.columns.push(self.hash_column(key));
        }
        for key in &hub.business_keys {
            mapping
                .columns
                .push(self.source_column(model, &hub.source_tables, key, MappingKeyType::BizKey));
        }

        mapping
    }

    fn link_mapping(&self, model: &DataVaultModel, link: &Link) -> EntityMapping {
        let source_table = link.source_tables.first().map(String::as_str).unwrap_or_default();
        let mut mapping = self.mapping(model, EntityKind::Link, &link.name, source_table, None, &link.description);

        if let Some(key) = &link.hash_key {
            mapping.columns.push(self.hash_column(key));
        }
        mapping
            .columns
            .extend(link.hub_hash_keys.iter().map(|key| self.hash_column(key)));

        mapping
    }

    fn satellite_mapping(&self, model: &DataVaultModel, kind: EntityKind, sat: &Satellite) -> EntityMapping {
        let mut mapping = self.mapping(
            model,
            kind,
            &sat.name,
            &sat.source_table,
            Some(sat.parent.clone()),
            &sat.description,
        );

        if let Some(key) = &sat.hash_key {
            mapping.columns.push(self.hash_column(key));
        }

        // Join key back to the parent
        let parent_type = match kind {
            EntityKind::LinkSatellite => HashKeyType::HashKeyLnk,
            _ => HashKeyType::HashKeyHub,
        };
        let parent_key = HashKeyColumn::new(
            self.config.naming.hash_key_name(&sat.parent),
            parent_type,
            &sat.business_keys,
        )
        .with_parent(&sat.parent);
        mapping.columns.push(self.hash_column(&parent_key));

        if let Some(diff) = &sat.hash_diff {
            mapping.columns.push(ColumnMappingRecord {
                target: diff.target_name.clone(),
                dtype: self.config.types.hash_key_dtype.clone(),
                key_type: MappingKeyType::HashDiff,
                parent: None,
                source: diff.source_columns.clone(),
            });
        }

        let tables = [sat.source_table.clone()];
        for attr in &sat.descriptive_attrs {
            mapping
                .columns
                .push(self.source_column(model, &tables, attr, MappingKeyType::Descriptive));
        }

        mapping
    }
}

/// Second `_`-separated segment of an entity name (`HUB_CUSTOMER` -> `CUSTOMER`)
fn collision_code(name: &str) -> String {
    name.split('_')
        .nth(1)
        .filter(|segment| !segment.is_empty())
        .unwrap_or(name)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashkey::HashKeyGenerator;
    use crate::validator::Validator;
    use vaultsmith_core::{EntityRef, IssueCode, SourceColumn, ValidationIssue};

    fn keys(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn model(config: &Config) -> DataVaultModel {
        let mut model = DataVaultModel::new();
        model.add_hub(
            Hub::new("HUB_CUSTOMER", keys(&["CUSTOMER_NO"]), keys(&["STTM_CUSTOMER"]))
                .with_description("Customers"),
        );
        model.add_satellite(Satellite::new(
            "SAT_CUSTOMER_RISK",
            "HUB_CUSTOMER",
            keys(&["CUSTOMER_NO"]),
            keys(&["RISK_PROFILE", "RISK_CATEGORY"]),
            "STTM_CUSTOMER",
        ));
        model.add_column(SourceColumn::new("STTM_CUSTOMER", "CUSTOMER_NO", "VARCHAR2").with_length(9));
        model.add_column(SourceColumn::new("STTM_CUSTOMER", "RISK_PROFILE", "VARCHAR2"));
        model.add_column(SourceColumn::new("STTM_CUSTOMER", "RISK_CATEGORY", "NUMBER").with_length(3));
        model.table_schemas.insert("STTM_CUSTOMER".to_string(), "FCUBS".to_string());
        HashKeyGenerator::new(&config.naming).generate(&mut model);
        model
    }

    #[test]
    fn hub_mapping_columns() {
        let config = Config::default();
        let model = model(&config);
        let report = Validator::new(&config.naming).validate(&model);
        let emitted = ModelEmitter::new(&config).emit(&model, &report).unwrap();

        let hub = emitted.mapping("HUB_CUSTOMER").unwrap();
        assert_eq!(hub.source_schema, "FCUBS");
        assert_eq!(hub.target_schema, "integration");
        assert_eq!(hub.target_entity_type, "hub");
        assert_eq!(hub.collision_code, "CUSTOMER");
        assert_eq!(hub.description, "Customers");

        assert_eq!(hub.columns[0].target, "dv_hkey_hub_customer");
        assert_eq!(hub.columns[0].key_type, MappingKeyType::HashKeyHub);
        assert_eq!(hub.columns[0].dtype, "string");
        assert_eq!(hub.columns[1].target, "CUSTOMER_NO");
        assert_eq!(hub.columns[1].dtype, "VARCHAR2(9)");
        assert_eq!(hub.columns[1].key_type, MappingKeyType::BizKey);
    }

    #[test]
    fn satellite_mapping_columns() {
        let config = Config::default();
        let model = model(&config);
        let report = Validator::new(&config.naming).validate(&model);
        let emitted = ModelEmitter::new(&config).emit(&model, &report).unwrap();

        let sat = emitted.mapping("SAT_CUSTOMER_RISK").unwrap();
        assert_eq!(sat.parent_table.as_deref(), Some("HUB_CUSTOMER"));
        let targets: Vec<_> = sat.columns.iter().map(|c| c.target.as_str()).collect();
        assert_eq!(
            targets,
            vec![
                "dv_hkey_sat_customer_risk",
                "dv_hkey_hub_customer",
                "dv_hsh_diff",
                "RISK_PROFILE",
                "RISK_CATEGORY"
            ]
        );
        assert_eq!(sat.columns[2].source, keys(&["RISK_CATEGORY", "RISK_PROFILE"]));
        assert_eq!(sat.columns[3].dtype, "VARCHAR2(255)");
        assert_eq!(sat.columns[4].dtype, "NUMBER(3)");

        assert_eq!(emitted.satellites[0].hub, "HUB_CUSTOMER");
        assert_eq!(emitted.metadata.validation_status, report.status);
        assert_eq!(emitted.metadata.fingerprint, model.fingerprint().unwrap());
    }

    #[test]
    fn invalid_model_is_not_emitted() {
        let config = Config::default();
        let model = model(&config);
        let mut report = Validator::new(&config.naming).validate(&model);
        report.add_issue(ValidationIssue::new(
            IssueCode::ParentNotFound,
            EntityRef::satellite("SAT_GHOST"),
            "Satellite SAT_GHOST references parent HUB_GHOST which is not in the model",
        ));

        let err = ModelEmitter::new(&config).emit(&model, &report).unwrap_err();
        match err {
            EmitError::InvalidModel { errors } => {
                assert_eq!(errors.len(), 1);
                assert!(errors[0].contains("PARENT_NOT_FOUND"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn collision_codes() {
        assert_eq!(collision_code("HUB_CUSTOMER"), "CUSTOMER");
        assert_eq!(collision_code("LNK_CUSTOMER_ADDRESS"), "CUSTOMER");
        assert_eq!(collision_code("CUSTOMERS"), "CUSTOMERS");
    }
}
