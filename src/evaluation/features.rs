//! Fixed-dimension numeric features for clustering transformed workflows.
//!
//! Layout (16 dimensions):
//! - one-hot intent over [`INTENT_VOCABULARY`] (6)
//! - one-hot outcome over [`OUTCOME_VOCABULARY`] (4)
//! - duration, file count, change count, each divided by the batch maximum (3)
//! - conversation, code change, file change share of the trace count (3)
//!
//! Only computed statistics enter the vector; no trace content does.

use crate::types::{TraceKind, Workflow};

pub const INTENT_VOCABULARY: [&str; 6] =
    ["explore", "implement", "debug", "document", "refactor", "test"];

pub const OUTCOME_VOCABULARY: [&str; 4] = ["success", "partial", "failure", "abandoned"];

pub const FEATURE_DIMENSIONS: usize = INTENT_VOCABULARY.len() + OUTCOME_VOCABULARY.len() + 3 + 3;

pub type FeatureVector = [f64; FEATURE_DIMENSIONS];

/// Per-batch maxima used to normalize metadata
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct MetadataScale {
    duration: f64,
    file_count: f64,
    change_count: f64,
}

impl MetadataScale {
    fn of(workflows: &[Workflow]) -> Self {
        workflows.iter().fold(Self::default(), |scale, w| Self {
            duration: scale.duration.max(w.metadata.duration as f64),
            file_count: scale.file_count.max(w.metadata.file_count as f64),
            change_count: scale.change_count.max(w.metadata.change_count as f64),
        })
    }
}

fn normalized(value: u64, max: f64) -> f64 {
    if max > 0.0 {
        value as f64 / max
    } else {
        0.0
    }
}

fn one_hot(vector: &mut [f64], vocabulary: &[&str], label: &str) {
    let label = label.trim().to_lowercase();
    if let Some(index) = vocabulary.iter().position(|v| *v == label) {
        vector[index] = 1.0;
    }
}

/// Extracts clustering features from a batch of workflows
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureExtractor;

impl FeatureExtractor {
    pub fn new() -> Self {
        Self
    }

    /// One vector per workflow, in input order
    pub fn extract(&self, workflows: &[Workflow]) -> Vec<FeatureVector> {
        let scale = MetadataScale::of(workflows);
        workflows
            .iter()
            .map(|workflow| self.vectorize(workflow, &scale))
            .collect()
    }

    fn vectorize(&self, workflow: &Workflow, scale: &MetadataScale) -> FeatureVector {
        let mut vector = [0.0; FEATURE_DIMENSIONS];
        let intents = INTENT_VOCABULARY.len();
        let outcomes = OUTCOME_VOCABULARY.len();

        one_hot(&mut vector[..intents], &INTENT_VOCABULARY, &workflow.intent);
        one_hot(
            &mut vector[intents..intents + outcomes],
            &OUTCOME_VOCABULARY,
            &workflow.outcome,
        );

        let base = intents + outcomes;
        vector[base] = normalized(workflow.metadata.duration, scale.duration);
        vector[base + 1] = normalized(workflow.metadata.file_count, scale.file_count);
        vector[base + 2] = normalized(workflow.metadata.change_count, scale.change_count);

        let total = workflow.traces.len();
        if total > 0 {
            for (offset, kind) in TraceKind::ALL.iter().enumerate() {
                vector[base + 3 + offset] = workflow.count_kind(*kind) as f64 / total as f64;
            }
        }

        vector
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Trace, TraceEvent, WorkflowMetadata};
    use chrono::Utc;

    fn workflow(intent: &str, outcome: &str, duration: u64, traces: Vec<Trace>) -> Workflow {
        Workflow {
            id: "w".to_string(),
            timestamp: Utc::now(),
            intent: intent.to_string(),
            outcome: outcome.to_string(),
            traces,
            metadata: WorkflowMetadata {
                duration,
                file_count: 2,
                change_count: 0,
            },
        }
    }

    fn file_change() -> Trace {
        Trace::new(
            Utc::now(),
            TraceEvent::FileChange {
                file_path: "a.py".to_string(),
                change_type: "modified".to_string(),
                line_range: None,
            },
        )
    }

    fn conversation() -> Trace {
        Trace::new(
            Utc::now(),
            TraceEvent::Conversation {
                role: "user".to_string(),
                content: "hi".to_string(),
                tokens: vec!["hi".to_string()],
            },
        )
    }

    #[test]
    fn test_dimension_layout() {
        assert_eq!(FEATURE_DIMENSIONS, 16);

        let batch = vec![
            workflow("Debug", "success", 50, vec![conversation(), file_change(), file_change(), conversation()]),
            workflow("explore", "failure", 100, vec![]),
        ];
        let vectors = FeatureExtractor::new().extract(&batch);

        let first = &vectors[0];
        assert_eq!(&first[..6], &[0.0, 0.0, 1.0, 0.0, 0.0, 0.0]);
        assert_eq!(&first[6..10], &[1.0, 0.0, 0.0, 0.0]);
        assert_eq!(first[10], 0.5);
        assert_eq!(first[11], 1.0);
        // No workflow has changes: max is zero, value stays zero
        assert_eq!(first[12], 0.0);
        assert_eq!(&first[13..], &[0.5, 0.0, 0.5]);

        let second = &vectors[1];
        assert_eq!(second[0], 1.0);
        assert_eq!(second[8], 1.0);
        assert_eq!(second[10], 1.0);
        assert_eq!(&second[13..], &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_unknown_labels_encode_as_zeros() {
        let batch = vec![workflow("unknown", "n/a", 0, vec![])];
        let vector = FeatureExtractor::new().extract(&batch)[0];
        assert!(vector[..10].iter().all(|v| *v == 0.0));
        assert!(vector.iter().all(|v| v.is_finite()));
    }
}
