//! Raw session records as delivered by the collecting side.
//!
//! Every field is optional at this layer; the extractor decides what is
//! required. Entries without their own timestamp inherit the session start.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::LineRange;

/// One recorded editor session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionRecord {
    pub id: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub intent: Option<String>,
    pub outcome: Option<String>,
    pub conversations: Option<Vec<ConversationEntry>>,
    pub code_deltas: Option<Vec<CodeDeltaEntry>>,
    pub file_changes: Option<Vec<FileChangeEntry>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationEntry {
    pub timestamp: Option<DateTime<Utc>>,
    pub role: String,
    pub content: String,
    /// Pre-tokenized content; derived by whitespace split when absent
    pub tokens: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeDeltaEntry {
    pub timestamp: Option<DateTime<Utc>>,
    pub file_path: String,
    pub change_type: String,
    pub before: Option<String>,
    pub after: Option<String>,
    pub diff: Option<String>,
    pub line_count: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileChangeEntry {
    pub timestamp: Option<DateTime<Utc>>,
    pub file_path: String,
    pub change_type: String,
    pub line_range: Option<LineRange>,
}
