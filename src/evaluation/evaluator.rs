//! Expressiveness evaluation: how much analytical value survives a
//! privacy transformation.
//!
//! # Metrics
//!
//! - **clustering_quality**: silhouette of k-means over transformed features,
//!   in [-1, 1]
//! - **classification_accuracy**: majority-intent share scaled by retention,
//!   floored at half the majority share
//! - **workflow_preservation**: mean normalized edit similarity of trace labels
//! - **information_retention**: mean share of non-sentinel tokens kept
//!
//! The composite is a weighted sum using [`ScoreWeights`].

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{EvaluationConfig, ScoreWeights};
use crate::error::{PrivflowError, Result};
use crate::evaluation::clustering::{silhouette_score, KMeans};
use crate::evaluation::features::FeatureExtractor;
use crate::evaluation::retention::{information_retention, majority_baseline};
use crate::evaluation::sequence::workflow_preservation;
use crate::types::Workflow;

/// Usefulness scores for one original/transformed pair of batches
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpressivenessMetrics {
    pub clustering_quality: f64,
    pub classification_accuracy: f64,
    pub workflow_preservation: f64,
    pub information_retention: f64,
    pub expressiveness_score: f64,
}

impl ExpressivenessMetrics {
    fn new(
        weights: &ScoreWeights,
        clustering_quality: f64,
        classification_accuracy: f64,
        workflow_preservation: f64,
        information_retention: f64,
    ) -> Self {
        let expressiveness_score = weights.clustering * clustering_quality
            + weights.classification * classification_accuracy
            + weights.preservation * workflow_preservation
            + weights.retention * information_retention;

        Self {
            clustering_quality,
            classification_accuracy,
            workflow_preservation,
            information_retention,
            expressiveness_score,
        }
    }
}

/// Intent predictability that survives transformation
pub fn classification_proxy(baseline: f64, retention: f64) -> f64 {
    (baseline * retention).max(baseline / 2.0)
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Scores transformed workflows against their originals
#[derive(Debug, Clone, Default)]
pub struct ExpressivenessEvaluator {
    config: EvaluationConfig,
    features: FeatureExtractor,
}

impl ExpressivenessEvaluator {
    pub fn new(config: EvaluationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            features: FeatureExtractor::new(),
        })
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    /// Evaluate index-aligned batches.
    ///
    /// Fails with `ShapeMismatch` when the batch lengths differ.
    pub fn evaluate<R: Rng + ?Sized>(
        &self,
        original: &[Workflow],
        transformed: &[Workflow],
        rng: &mut R,
    ) -> Result<ExpressivenessMetrics> {
        if original.len() != transformed.len() {
            return Err(PrivflowError::ShapeMismatch {
                original: original.len(),
                transformed: transformed.len(),
            });
        }

        let weights = &self.config.weights;
        if original.is_empty() {
            warn!("Evaluating an empty batch; returning neutral metrics");
            return Ok(ExpressivenessMetrics::new(weights, 0.0, 0.0, 1.0, 1.0));
        }

        let clustering = finite_or_zero(self.clustering_quality(transformed, rng));
        let retention = finite_or_zero(information_retention(original, transformed));
        let baseline = majority_baseline(original);
        let classification = finite_or_zero(classification_proxy(baseline, retention));
        let preservation = finite_or_zero(workflow_preservation(original, transformed));

        let metrics =
            ExpressivenessMetrics::new(weights, clustering, classification, preservation, retention);

        info!(
            "Evaluated {} workflows: expressiveness {:.3} (clustering {:.3}, classification {:.3}, preservation {:.3}, retention {:.3})",
            original.len(),
            metrics.expressiveness_score,
            clustering,
            classification,
            preservation,
            retention
        );

        Ok(metrics)
    }

    fn clustering_quality<R: Rng + ?Sized>(&self, workflows: &[Workflow], rng: &mut R) -> f64 {
        let vectors = self.features.extract(workflows);
        let clustering =
            KMeans::new(self.config.cluster_count, self.config.max_iterations).fit(&vectors, rng);

        if clustering.non_empty_clusters() < 2 {
            debug!(
                "Only {} non-empty clusters over {} workflows; clustering quality is 0",
                clustering.non_empty_clusters(),
                workflows.len()
            );
            return 0.0;
        }

        silhouette_score(&vectors, &clustering.assignments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Trace, TraceEvent, WorkflowMetadata};
    use chrono::Utc;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn create_test_workflow(intent: &str, duration: u64, words: &[&str]) -> Workflow {
        Workflow {
            id: format!("{}-{}", intent, duration),
            timestamp: Utc::now(),
            intent: intent.to_string(),
            outcome: "success".to_string(),
            traces: vec![Trace::new(
                Utc::now(),
                TraceEvent::Conversation {
                    role: "user".to_string(),
                    content: words.join(" "),
                    tokens: words.iter().map(|w| w.to_string()).collect(),
                },
            )],
            metadata: WorkflowMetadata {
                duration,
                file_count: 1,
                change_count: 0,
            },
        }
    }

    fn create_test_batch() -> Vec<Workflow> {
        vec![
            create_test_workflow("debug", 10, &["fix", "the", "crash"]),
            create_test_workflow("debug", 12, &["stack", "trace"]),
            create_test_workflow("explore", 600, &["read", "the", "docs"]),
            create_test_workflow("explore", 620, &["browse", "code"]),
        ]
    }

    #[test]
    fn test_shape_mismatch() {
        let evaluator = ExpressivenessEvaluator::default();
        let batch = create_test_batch();
        let mut rng = StdRng::seed_from_u64(1);

        let result = evaluator.evaluate(&batch[..3], &batch, &mut rng);
        match result {
            Err(PrivflowError::ShapeMismatch {
                original,
                transformed,
            }) => {
                assert_eq!(original, 3);
                assert_eq!(transformed, 4);
            }
            other => panic!("expected shape mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_batch_is_neutral() {
        let evaluator = ExpressivenessEvaluator::default();
        let mut rng = StdRng::seed_from_u64(1);
        let metrics = evaluator.evaluate(&[], &[], &mut rng).unwrap();

        assert_eq!(metrics.clustering_quality, 0.0);
        assert_eq!(metrics.classification_accuracy, 0.0);
        assert_eq!(metrics.workflow_preservation, 1.0);
        assert_eq!(metrics.information_retention, 1.0);
        assert!((metrics.expressiveness_score - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_untransformed_batch_scores() {
        let evaluator = ExpressivenessEvaluator::default();
        let batch = create_test_batch();
        let mut rng = StdRng::seed_from_u64(7);
        let metrics = evaluator.evaluate(&batch, &batch, &mut rng).unwrap();

        assert_eq!(metrics.workflow_preservation, 1.0);
        assert_eq!(metrics.information_retention, 1.0);
        assert_eq!(metrics.classification_accuracy, 0.5);
        assert!(metrics.clustering_quality >= -1.0 && metrics.clustering_quality <= 1.0);

        let expected = 0.3 * metrics.clustering_quality + 0.3 * 0.5 + 0.2 + 0.2;
        assert!((metrics.expressiveness_score - expected).abs() < 1e-12);
    }

    #[test]
    fn test_single_workflow_clusters_to_zero() {
        let evaluator = ExpressivenessEvaluator::default();
        let batch = vec![create_test_workflow("debug", 5, &["hi"])];
        let mut rng = StdRng::seed_from_u64(3);
        let metrics = evaluator.evaluate(&batch, &batch, &mut rng).unwrap();
        assert_eq!(metrics.clustering_quality, 0.0);
        assert_eq!(metrics.classification_accuracy, 1.0);
    }

    #[test]
    fn test_classification_proxy_floor() {
        assert_eq!(classification_proxy(0.8, 1.0), 0.8);
        assert_eq!(classification_proxy(0.8, 0.0), 0.4);
        assert_eq!(classification_proxy(0.0, 1.0), 0.0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EvaluationConfig {
            cluster_count: 0,
            ..Default::default()
        };
        assert!(matches!(
            ExpressivenessEvaluator::new(config),
            Err(PrivflowError::InvalidConfig(_))
        ));
    }
}
