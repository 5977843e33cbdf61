//! Redact → noise → abstract, per trace, per workflow.

use rand::Rng;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::config::PrivacyConfig;
use crate::error::Result;
use crate::privacy::abstractor::Abstractor;
use crate::privacy::noise::NoiseInjector;
use crate::privacy::redactor::Redactor;
use crate::types::{Trace, TraceEvent, Workflow};

/// Hex characters kept from the digest
const PSEUDONYM_HEX_LEN: usize = 16;

/// Deterministic one-way replacement for a workflow id.
///
/// The epsilon is part of the hashed input, so the same id maps to a
/// different pseudonym under a different privacy setting.
pub fn pseudonymize(id: &str, epsilon: f64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{}:{}", id, epsilon).as_bytes());
    let digest = hasher.finalize();

    let hex: String = digest
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<String>()
        .chars()
        .take(PSEUDONYM_HEX_LEN)
        .collect();
    format!("wf_{}", hex)
}

/// Applies one privacy config to batches of workflows
#[derive(Debug, Clone)]
pub struct TransformationPipeline {
    config: PrivacyConfig,
    redactor: Redactor,
    noise: NoiseInjector,
    abstractor: Abstractor,
}

impl TransformationPipeline {
    /// Fails with `InvalidConfig` before any work if the config is out of range
    pub fn new(config: &PrivacyConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: config.clone(),
            redactor: Redactor::new(config),
            noise: NoiseInjector::new(config.epsilon)?,
            abstractor: Abstractor::new(config.abstraction_level),
        })
    }

    pub fn config(&self) -> &PrivacyConfig {
        &self.config
    }

    /// Transform a batch; the inputs are left untouched
    pub fn transform<R: Rng + ?Sized>(&self, workflows: &[Workflow], rng: &mut R) -> Vec<Workflow> {
        let transformed: Vec<Workflow> = workflows
            .iter()
            .map(|workflow| self.transform_workflow(workflow, rng))
            .collect();

        info!(
            "Transformed {} workflows (epsilon={}, redaction_level={}, abstraction_level={})",
            transformed.len(),
            self.config.epsilon,
            self.config.redaction_level,
            self.config.abstraction_level
        );

        transformed
    }

    pub fn transform_workflow<R: Rng + ?Sized>(&self, workflow: &Workflow, rng: &mut R) -> Workflow {
        let traces = workflow
            .traces
            .iter()
            .map(|trace| self.transform_trace(trace, rng))
            .collect();

        let mut metadata = workflow.metadata;
        metadata.duration = self.noise.noisy_count(metadata.duration, rng);

        let id = pseudonymize(&workflow.id, self.config.epsilon);
        debug!("Workflow {} transformed as {}", workflow.id, id);

        Workflow {
            id,
            timestamp: workflow.timestamp,
            intent: workflow.intent.clone(),
            outcome: workflow.outcome.clone(),
            traces,
            metadata,
        }
    }

    pub fn transform_trace<R: Rng + ?Sized>(&self, trace: &Trace, rng: &mut R) -> Trace {
        let redacted = if self.redaction_enabled() {
            self.redact_trace(trace, rng)
        } else {
            trace.clone()
        };
        let noised = self.noise_trace(redacted, rng);
        self.abstractor.abstract_trace(&noised)
    }

    /// Redaction is skipped entirely at level 0, so level 0 is the identity
    fn redaction_enabled(&self) -> bool {
        self.config.redaction_level > 0.0
    }

    fn redact_trace<R: Rng + ?Sized>(&self, trace: &Trace, rng: &mut R) -> Trace {
        let event = match &trace.event {
            TraceEvent::Conversation {
                role,
                content,
                tokens,
            } => TraceEvent::Conversation {
                role: role.clone(),
                content: self.redactor.redact(content),
                tokens: self.redactor.redact_tokens(tokens, rng),
            },
            TraceEvent::CodeChange {
                file_path,
                change_type,
                before,
                after,
                diff,
                line_count,
            } => TraceEvent::CodeChange {
                file_path: file_path.clone(),
                change_type: change_type.clone(),
                before: self.redactor.redact(before),
                after: self.redactor.redact(after),
                diff: self.redactor.redact(diff),
                line_count: *line_count,
            },
            TraceEvent::FileChange { .. } => trace.event.clone(),
        };

        Trace {
            timestamp: trace.timestamp,
            event,
            abstracted_type: trace.abstracted_type,
        }
    }

    fn noise_trace<R: Rng + ?Sized>(&self, mut trace: Trace, rng: &mut R) -> Trace {
        if let TraceEvent::CodeChange { line_count, .. } = &mut trace.event {
            *line_count = self.noise.noisy_count(*line_count, rng);
        }
        trace
    }
}

/// Transform `workflows` under `config`
pub fn transform<R: Rng + ?Sized>(
    workflows: &[Workflow],
    config: &PrivacyConfig,
    rng: &mut R,
) -> Result<Vec<Workflow>> {
    Ok(TransformationPipeline::new(config)?.transform(workflows, rng))
}
