//! Pipeline orchestration
//!
//! Normalizer -> classifier -> builder -> hash keys -> validator -> emitter.
//! A `Pipeline` holds only immutable configuration, so independent runs can
//! execute on separate threads without sharing any model state.

use vaultsmith_core::{Config, DataVaultModel, EmittedModel, GroupingIntent, ValidationReport};

use crate::builder::{ModelBuilder, ModelConstructionError};
use crate::classifier::{ClassifiedTable, KeyClassifier};
use crate::emitter::{EmitError, ModelEmitter};
use crate::hashkey::HashKeyGenerator;
use crate::normalizer::{normalize_batch, MetadataDocument, MetadataError, RawTable};
use crate::validator::Validator;

/// Fatal pipeline errors
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error("Model construction failed: {0}")]
    Construction(#[from] ModelConstructionError),

    #[error(transparent)]
    Emit(#[from] EmitError),
}

/// Everything one run produces
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub classified: Vec<ClassifiedTable>,
    pub model: DataVaultModel,
    pub report: ValidationReport,

    /// Tables the normalizer rejected
    pub rejected: Vec<MetadataError>,

    /// Absent when the model is invalid
    pub emitted: Option<EmittedModel>,
}

impl PipelineOutput {
    pub fn is_loadable(&self) -> bool {
        self.report.status.is_loadable()
    }
}

pub struct Pipeline {
    config: Config,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read a metadata file in either accepted shape
    pub fn load_metadata(path: &std::path::Path) -> Result<Vec<RawTable>, PipelineError> {
        Ok(MetadataDocument::from_file(path)?.into_tables())
    }

    /// Normalize and classify only
    pub fn classify(&self, raw_tables: &[RawTable]) -> (Vec<ClassifiedTable>, Vec<MetadataError>) {
        let batch = normalize_batch(raw_tables, &self.config);
        let classifier = KeyClassifier::new();
        let classified = batch
            .tables
            .iter()
            .map(|table| classifier.classify_table(table, &self.config.classifier))
            .collect();
        (classified, batch.rejected)
    }

    /// Build, key and validate a model without emitting it
    pub fn build(
        &self,
        classified: &[ClassifiedTable],
        intent: &GroupingIntent,
    ) -> Result<(DataVaultModel, ValidationReport), ModelConstructionError> {
        let mut model = ModelBuilder::new(classified, &self.config).build(intent)?;
        HashKeyGenerator::new(&self.config.naming).generate(&mut model);
        let report = Validator::new(&self.config.naming).validate(&model);
        Ok((model, report))
    }

    /// Run every stage
    ///
    /// Rejected tables do not abort the run; a construction error does. An
    /// invalid model is returned with its report but without emitted records.
    pub fn run(&self, raw_tables: &[RawTable], intent: &GroupingIntent) -> Result<PipelineOutput, PipelineError> {
        let (classified, rejected) = self.classify(raw_tables);
        let (model, report) = self.build(&classified, intent)?;

        let emitted = if report.status.is_loadable() {
            Some(ModelEmitter::new(&self.config).emit(&model, &report)?)
        } else {
            tracing::warn!(errors = report.summary.errors, "model is invalid; emission skipped");
            None
        };

        Ok(PipelineOutput {
            classified,
            model,
            report,
            rejected,
            emitted,
        })
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::RawColumn;
    use vaultsmith_core::{HubIntent, ValidationStatus};

    fn raw_tables() -> Vec<RawTable> {
        vec![
            RawTable::new(
                "FCUBS",
                "STTM_CUSTOMER",
                vec![
                    RawColumn::new("CUSTOMER_NO", "VARCHAR2").with_length(9).declared_key(),
                    RawColumn::new("COUNTRY", "VARCHAR2").with_length(3),
                ],
            ),
            RawTable::new("FCUBS", "EMPTY", vec![]),
        ]
    }

    fn intent(hub_table: &str) -> GroupingIntent {
        GroupingIntent {
            hubs: vec![HubIntent {
                name: "HUB_CUSTOMER".to_string(),
                business_keys: vec!["CUSTOMER_NO".to_string()],
                source_tables: vec![hub_table.to_string()],
                description: String::new(),
            }],
            auto_satellites: true,
            ..GroupingIntent::default()
        }
    }

    #[test]
    fn run_emits_loadable_models() {
        let output = Pipeline::default().run(&raw_tables(), &intent("STTM_CUSTOMER")).unwrap();

        assert_eq!(output.rejected.len(), 1);
        assert_eq!(output.report.status, ValidationStatus::Clean);
        let emitted = output.emitted.unwrap();
        assert_eq!(emitted.hubs.len(), 1);
        assert_eq!(emitted.satellites.len(), 1);
    }

    #[test]
    fn rejected_table_is_not_buildable() {
        let err = Pipeline::default().run(&raw_tables(), &intent("EMPTY")).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Construction(ModelConstructionError::UnknownSourceTable { .. })
        ));
    }
}
