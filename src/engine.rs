//! Engine boundary: the four caller-facing operations plus a current-config
//! wrapper.
//!
//! The pipeline and evaluator are stateless and take their config
//! explicitly. `PrivacyEngine` only adds a last-write-wins "current"
//! [`PrivacyConfig`] for callers that do not want to thread one through.

use std::sync::{PoisonError, RwLock};

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{EngineConfig, EvaluationConfig, PrivacyConfig, PrivacyConfigUpdate};
use crate::error::Result;
use crate::evaluation::{ExpressivenessEvaluator, ExpressivenessMetrics};
use crate::extraction::{SessionRecord, SkippedRecord, TraceExtractor};
use crate::privacy::TransformationPipeline;
use crate::types::Workflow;

/// Batch size above which a single call gets slow (cost is quadratic)
pub const MAX_WORKFLOWS_PER_CALL: usize = 1000;

/// Everything produced by one collect → transform → evaluate run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub original: Vec<Workflow>,
    pub transformed: Vec<Workflow>,
    pub skipped: Vec<SkippedRecord>,
    pub metrics: ExpressivenessMetrics,
}

/// Privacy-preserving workflow analysis engine
#[derive(Debug)]
pub struct PrivacyEngine {
    config: RwLock<PrivacyConfig>,
    evaluator: ExpressivenessEvaluator,
    extractor: TraceExtractor,
}

impl PrivacyEngine {
    /// Create an engine with the given current config
    pub fn new(privacy: PrivacyConfig, evaluation: EvaluationConfig) -> Result<Self> {
        privacy.validate()?;
        Ok(Self {
            config: RwLock::new(privacy),
            evaluator: ExpressivenessEvaluator::new(evaluation)?,
            extractor: TraceExtractor::new(),
        })
    }

    pub fn from_config(config: EngineConfig) -> Result<Self> {
        Self::new(config.privacy, config.evaluation)
    }

    /// Snapshot of the current privacy config
    pub fn config(&self) -> PrivacyConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn evaluation_config(&self) -> &EvaluationConfig {
        self.evaluator.config()
    }

    /// Extract workflows from raw records; malformed records are skipped
    pub fn collect(&self, records: &[SessionRecord]) -> Vec<Workflow> {
        self.extractor.extract_batch(records).workflows
    }

    /// Transform under an explicit config
    pub fn transform<R: Rng + ?Sized>(
        &self,
        workflows: &[Workflow],
        config: &PrivacyConfig,
        rng: &mut R,
    ) -> Result<Vec<Workflow>> {
        check_batch_size(workflows.len());
        Ok(TransformationPipeline::new(config)?.transform(workflows, rng))
    }

    /// Transform under the current config
    pub fn transform_current<R: Rng + ?Sized>(
        &self,
        workflows: &[Workflow],
        rng: &mut R,
    ) -> Result<Vec<Workflow>> {
        let config = self.config();
        self.transform(workflows, &config, rng)
    }

    pub fn evaluate<R: Rng + ?Sized>(
        &self,
        original: &[Workflow],
        transformed: &[Workflow],
        rng: &mut R,
    ) -> Result<ExpressivenessMetrics> {
        self.evaluator.evaluate(original, transformed, rng)
    }

    /// Merge `update` into the current config.
    ///
    /// The merged value is validated before it is stored; on error the
    /// previous config stays in place.
    pub fn update_config(&self, update: PrivacyConfigUpdate) -> Result<PrivacyConfig> {
        let mut current = self.config.write().unwrap_or_else(PoisonError::into_inner);
        if update.is_empty() {
            return Ok(current.clone());
        }

        let merged = current.merged(&update)?;
        *current = merged.clone();
        info!(
            "Privacy config updated: epsilon={}, redaction_level={}, abstraction_level={}",
            merged.epsilon, merged.redaction_level, merged.abstraction_level
        );
        Ok(merged)
    }

    /// Collect, transform under the current config, and evaluate
    pub fn analyze<R: Rng + ?Sized>(
        &self,
        records: &[SessionRecord],
        rng: &mut R,
    ) -> Result<AnalysisReport> {
        let config = self.config();
        let pipeline = TransformationPipeline::new(&config)?;

        let extraction = self.extractor.extract_batch(records);
        check_batch_size(extraction.workflows.len());

        let transformed = pipeline.transform(&extraction.workflows, rng);
        let metrics = self.evaluate(&extraction.workflows, &transformed, rng)?;
        debug!(
            "Analysis finished: {} workflows, {} skipped",
            extraction.workflows.len(),
            extraction.skipped.len()
        );

        Ok(AnalysisReport {
            original: extraction.workflows,
            transformed,
            skipped: extraction.skipped,
            metrics,
        })
    }
}

impl Default for PrivacyEngine {
    fn default() -> Self {
        Self {
            config: RwLock::new(PrivacyConfig::default()),
            evaluator: ExpressivenessEvaluator::default(),
            extractor: TraceExtractor::new(),
        }
    }
}

fn check_batch_size(len: usize) {
    if len > MAX_WORKFLOWS_PER_CALL {
        warn!(
            "Batch of {} workflows exceeds the recommended {} per call",
            len, MAX_WORKFLOWS_PER_CALL
        );
    }
}
