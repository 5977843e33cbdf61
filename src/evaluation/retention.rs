//! Token retention and the intent baseline used by the classification proxy.

use std::collections::HashMap;

use crate::privacy::is_sentinel;
use crate::types::Workflow;

/// Share of a workflow's conversation tokens that survived transformation.
///
/// Sentinel tokens in the transformed copy do not count as retained.
/// Returns 1 when the original carries no tokens.
pub fn token_retention(original: &Workflow, transformed: &Workflow) -> f64 {
    let total = original.tokens().count();
    if total == 0 {
        return 1.0;
    }

    let kept = transformed.tokens().filter(|t| !is_sentinel(t)).count();
    (kept as f64 / total as f64).clamp(0.0, 1.0)
}

/// Mean token retention over index-aligned pairs; 1 for an empty batch
pub fn information_retention(original: &[Workflow], transformed: &[Workflow]) -> f64 {
    let pairs = original.len().min(transformed.len());
    if pairs == 0 {
        return 1.0;
    }

    let total: f64 = original
        .iter()
        .zip(transformed)
        .map(|(o, t)| token_retention(o, t))
        .sum();
    total / pairs as f64
}

/// Share of the most frequent intent (case-insensitive); 0 for no workflows
pub fn majority_baseline(workflows: &[Workflow]) -> f64 {
    if workflows.is_empty() {
        return 0.0;
    }

    let mut counts: HashMap<String, usize> = HashMap::new();
    for workflow in workflows {
        *counts
            .entry(workflow.intent.trim().to_lowercase())
            .or_insert(0) += 1;
    }

    let majority = counts.values().copied().max().unwrap_or(0);
    majority as f64 / workflows.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Trace, TraceEvent, WorkflowMetadata};
    use chrono::Utc;

    fn with_tokens(intent: &str, tokens: &[&str]) -> Workflow {
        Workflow {
            id: "w".to_string(),
            timestamp: Utc::now(),
            intent: intent.to_string(),
            outcome: "success".to_string(),
            traces: vec![Trace::new(
                Utc::now(),
                TraceEvent::Conversation {
                    role: "user".to_string(),
                    content: tokens.join(" "),
                    tokens: tokens.iter().map(|t| t.to_string()).collect(),
                },
            )],
            metadata: WorkflowMetadata::default(),
        }
    }

    #[test]
    fn test_sentinels_are_not_retained() {
        let original = with_tokens("debug", &["fix", "bug", "42", "now"]);
        let transformed = with_tokens("debug", &["fix", "bug", "[NUM]", "[REDACTED]"]);
        assert_eq!(token_retention(&original, &transformed), 0.5);
    }

    #[test]
    fn test_no_tokens_means_full_retention() {
        let original = with_tokens("debug", &[]);
        assert_eq!(token_retention(&original, &original), 1.0);
        assert_eq!(information_retention(&[], &[]), 1.0);
    }

    #[test]
    fn test_majority_baseline() {
        let batch = vec![
            with_tokens("Debug", &[]),
            with_tokens("debug", &[]),
            with_tokens("explore", &[]),
            with_tokens("implement", &[]),
        ];
        assert_eq!(majority_baseline(&batch), 0.5);
        assert_eq!(majority_baseline(&[]), 0.0);
    }
}
