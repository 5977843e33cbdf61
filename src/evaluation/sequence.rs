//! Trace-sequence similarity between original and transformed workflows.

use crate::types::{Trace, Workflow};

/// Levenshtein distance with unit insert, delete and substitute costs.
///
/// Uses a single rolling row, so memory is O(min(m, n)).
pub fn edit_distance<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };

    let mut row: Vec<usize> = (0..=short.len()).collect();
    for (i, x) in long.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, y) in short.iter().enumerate() {
            let substitution = diagonal + usize::from(x != y);
            diagonal = row[j + 1];
            row[j + 1] = substitution.min(row[j] + 1).min(diagonal + 1);
        }
    }

    row[short.len()]
}

/// Similarity in [0, 1] between two label sequences; 1 when both are empty
pub fn sequence_similarity<T: PartialEq>(a: &[T], b: &[T]) -> f64 {
    let longest = a.len().max(b.len());
    if longest == 0 {
        return 1.0;
    }
    1.0 - edit_distance(a, b) as f64 / longest as f64
}

fn labels(workflow: &Workflow) -> Vec<&'static str> {
    workflow.traces.iter().map(Trace::label).collect()
}

/// Mean sequence similarity over index-aligned pairs; 1 for an empty batch
pub fn workflow_preservation(original: &[Workflow], transformed: &[Workflow]) -> f64 {
    let pairs = original.len().min(transformed.len());
    if pairs == 0 {
        return 1.0;
    }

    let total: f64 = original
        .iter()
        .zip(transformed)
        .map(|(o, t)| sequence_similarity(&labels(o), &labels(t)))
        .sum();
    total / pairs as f64
}
