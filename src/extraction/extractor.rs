//! Session record → workflow extraction.
//!
//! Extraction is privacy-neutral: entry fields are copied verbatim and only
//! the workflow metadata is computed. A record missing its identity or start
//! time is reported and skipped; it never fails the batch.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{PrivflowError, Result};
use crate::extraction::record::{CodeDeltaEntry, ConversationEntry, FileChangeEntry, SessionRecord};
use crate::types::{Trace, TraceEvent, TraceKind, Workflow, WorkflowMetadata};

/// Placeholder for a missing intent or outcome
pub const UNKNOWN: &str = "unknown";

/// A record that could not be extracted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedRecord {
    pub record_id: Option<String>,
    pub reason: String,
}

/// Outcome of extracting a batch
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    pub workflows: Vec<Workflow>,
    pub skipped: Vec<SkippedRecord>,
}

/// Converts session records into workflows
#[derive(Debug, Clone, Copy, Default)]
pub struct TraceExtractor;

impl TraceExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract one record
    pub fn extract(&self, record: &SessionRecord) -> Result<Workflow> {
        let id = match record.id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => {
                return Err(PrivflowError::MalformedRecord {
                    record_id: None,
                    reason: "missing session id".to_string(),
                })
            }
        };

        let start = record
            .start_time
            .ok_or_else(|| PrivflowError::MalformedRecord {
                record_id: Some(id.clone()),
                reason: "missing start_time".to_string(),
            })?;

        let mut traces = Vec::new();
        if let Some(entries) = &record.conversations {
            traces.extend(entries.iter().map(|e| conversation_trace(e, start)));
        }
        if let Some(entries) = &record.code_deltas {
            traces.extend(entries.iter().map(|e| code_change_trace(e, start)));
        }
        if let Some(entries) = &record.file_changes {
            traces.extend(entries.iter().map(|e| file_change_trace(e, start)));
        }

        // Stable, so simultaneous events keep conversation → code → file order
        traces.sort_by_key(|t| t.timestamp);

        let metadata = compute_metadata(start, record.end_time, &traces);

        debug!(
            "Extracted workflow {} with {} traces ({} files, {} changes)",
            id,
            traces.len(),
            metadata.file_count,
            metadata.change_count
        );

        Ok(Workflow {
            id,
            timestamp: start,
            intent: label_or_unknown(record.intent.as_deref()),
            outcome: label_or_unknown(record.outcome.as_deref()),
            traces,
            metadata,
        })
    }

    /// Extract a batch, skipping malformed records
    pub fn extract_batch(&self, records: &[SessionRecord]) -> ExtractionReport {
        let mut report = ExtractionReport::default();

        for record in records {
            match self.extract(record) {
                Ok(workflow) => report.workflows.push(workflow),
                Err(PrivflowError::MalformedRecord { record_id, reason }) => {
                    warn!(
                        "Skipping malformed record {}: {}",
                        record_id.as_deref().unwrap_or("<unidentified>"),
                        reason
                    );
                    report.skipped.push(SkippedRecord { record_id, reason });
                }
                Err(e) => {
                    warn!("Skipping record after unexpected error: {}", e);
                    report.skipped.push(SkippedRecord {
                        record_id: record.id.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Extracted {} workflows from {} records ({} skipped)",
            report.workflows.len(),
            records.len(),
            report.skipped.len()
        );

        report
    }
}

fn label_or_unknown(label: Option<&str>) -> String {
    match label.map(str::trim) {
        Some(l) if !l.is_empty() => l.to_string(),
        _ => UNKNOWN.to_string(),
    }
}

fn conversation_trace(entry: &ConversationEntry, start: DateTime<Utc>) -> Trace {
    let tokens = entry
        .tokens
        .clone()
        .unwrap_or_else(|| entry.content.split_whitespace().map(String::from).collect());

    Trace::new(
        entry.timestamp.unwrap_or(start),
        TraceEvent::Conversation {
            role: entry.role.clone(),
            content: entry.content.clone(),
            tokens,
        },
    )
}

fn code_change_trace(entry: &CodeDeltaEntry, start: DateTime<Utc>) -> Trace {
    let diff = entry.diff.clone().unwrap_or_default();
    let line_count = entry.line_count.unwrap_or_else(|| changed_lines(&diff));

    Trace::new(
        entry.timestamp.unwrap_or(start),
        TraceEvent::CodeChange {
            file_path: entry.file_path.clone(),
            change_type: entry.change_type.clone(),
            before: entry.before.clone().unwrap_or_default(),
            after: entry.after.clone().unwrap_or_default(),
            diff,
            line_count,
        },
    )
}

fn file_change_trace(entry: &FileChangeEntry, start: DateTime<Utc>) -> Trace {
    Trace::new(
        entry.timestamp.unwrap_or(start),
        TraceEvent::FileChange {
            file_path: entry.file_path.clone(),
            change_type: entry.change_type.clone(),
            line_range: entry.line_range,
        },
    )
}

/// Count added/removed lines in a unified diff, ignoring file headers
pub(crate) fn changed_lines(diff: &str) -> u64 {
    diff.lines()
        .filter(|line| {
            (line.starts_with('+') && !line.starts_with("+++"))
                || (line.starts_with('-') && !line.starts_with("---"))
        })
        .count() as u64
}

fn compute_metadata(
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
    traces: &[Trace],
) -> WorkflowMetadata {
    let duration = end
        .map(|end| (end - start).num_seconds().max(0) as u64)
        .unwrap_or(0);

    let files: HashSet<&str> = traces
        .iter()
        .filter_map(Trace::file_path)
        .filter(|p| !p.is_empty())
        .collect();

    let change_count = traces
        .iter()
        .filter(|t| t.kind() == TraceKind::CodeChange)
        .count() as u64;

    WorkflowMetadata {
        duration,
        file_count: files.len() as u64,
        change_count,
    }
}
