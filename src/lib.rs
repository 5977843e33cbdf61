//! Privflow - Privacy-Preserving Workflow Analysis Engine
//!
//! Turns raw development-session records into behavioral traces, applies
//! configurable privacy transformations to them, and measures how much
//! analytical value survives:
//! - Trace extraction from conversation, code-delta and file-change records
//! - Pattern redaction and per-token suppression
//! - Laplace noise on integer fields (differential privacy)
//! - Five-level trace abstraction (token → workflow)
//! - Expressiveness scoring (clustering, classification proxy, sequence
//!   preservation, token retention)
//!
//! # Architecture
//!
//! - **Types**: workflows, traces and the abstraction taxonomy
//! - **Extraction**: session records into ordered workflows
//! - **Privacy**: redactor, noise injector, abstractor and the pipeline
//! - **Evaluation**: expressiveness metrics over original/transformed pairs
//! - **Engine**: the caller-facing boundary with a current-config wrapper
//!
//! # Example
//!
//! ```ignore
//! use privflow_core::{PrivacyConfig, PrivacyEngine, SessionRecord};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! fn main() -> privflow_core::Result<()> {
//!     let engine = PrivacyEngine::default();
//!     let records: Vec<SessionRecord> = serde_json::from_str(&input)?;
//!     let mut rng = StdRng::seed_from_u64(42);
//!
//!     let original = engine.collect(&records);
//!     let transformed = engine.transform(&original, &PrivacyConfig::default(), &mut rng)?;
//!     let metrics = engine.evaluate(&original, &transformed, &mut rng)?;
//!     println!("expressiveness: {:.3}", metrics.expressiveness_score);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod evaluation;
pub mod extraction;
pub mod privacy;
pub mod types;

// Re-export commonly used types
pub use config::{
    AbstractionLevel, EngineConfig, EvaluationConfig, PrivacyConfig, PrivacyConfigUpdate,
    ScoreWeights,
};
pub use engine::{AnalysisReport, PrivacyEngine, MAX_WORKFLOWS_PER_CALL};
pub use error::{PrivflowError, Result};
pub use evaluation::{ExpressivenessEvaluator, ExpressivenessMetrics};
pub use extraction::{ExtractionReport, SessionRecord, SkippedRecord, TraceExtractor};
pub use privacy::TransformationPipeline;
pub use types::{AbstractedType, Trace, TraceEvent, TraceKind, Workflow, WorkflowMetadata};
