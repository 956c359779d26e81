//! Vaultsmith engine - model inference and validation
//!
//! Pipeline stages, leaves first:
//! - Metadata normalizer
//! - Key classifier (and intent proposer)
//! - Model builder
//! - Hash key generator
//! - Validator
//! - Model emitter (with target type mapping)

pub mod normalizer;
pub mod classifier;
pub mod proposer;
pub mod builder;
pub mod hashkey;
pub mod validator;
pub mod dtype;
pub mod emitter;
pub mod pipeline;

pub use normalizer::{
    group_rows, normalize_batch, normalize_table, MetadataDocument, MetadataError, MetadataRow,
    NormalizedBatch, RawColumn, RawFlag, RawLength, RawTable,
};
pub use classifier::{
    classify, ClassificationRule, ClassificationSource, ClassifiedTable, ColumnClassification,
    ColumnRole, DeclaredHintRule, ExplicitOverrideRule, KeyClassifier, NamingHeuristicRule,
};
pub use proposer::propose_intent;
pub use builder::{ModelBuilder, ModelConstructionError};
pub use hashkey::HashKeyGenerator;
pub use validator::Validator;
pub use dtype::target_dtype;
pub use emitter::{EmitError, ModelEmitter};
pub use pipeline::{Pipeline, PipelineError, PipelineOutput};
