//! Common test utilities and helpers

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use privflow_core::extraction::{CodeDeltaEntry, ConversationEntry, FileChangeEntry};
use privflow_core::{AbstractionLevel, PrivacyConfig, SessionRecord};

/// Fixed session start so test output is stable
pub fn test_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 3, 10, 0, 0).unwrap()
}

/// Create a conversation entry `offset` seconds into the session
pub fn conversation(offset: i64, role: &str, content: &str) -> ConversationEntry {
    ConversationEntry {
        timestamp: Some(test_start() + Duration::seconds(offset)),
        role: role.to_string(),
        content: content.to_string(),
        tokens: None,
    }
}

/// Create a code delta with a one-line diff
pub fn code_delta(offset: i64, file_path: &str, before: &str, after: &str) -> CodeDeltaEntry {
    CodeDeltaEntry {
        timestamp: Some(test_start() + Duration::seconds(offset)),
        file_path: file_path.to_string(),
        change_type: "modified".to_string(),
        before: Some(before.to_string()),
        after: Some(after.to_string()),
        diff: Some(format!("-{}\n+{}", before, after)),
        line_count: None,
    }
}

pub fn file_change(offset: i64, file_path: &str) -> FileChangeEntry {
    FileChangeEntry {
        timestamp: Some(test_start() + Duration::seconds(offset)),
        file_path: file_path.to_string(),
        change_type: "modified".to_string(),
        line_range: None,
    }
}

/// Create a session record with a single user message
pub fn create_test_record(id: &str, intent: &str, message: &str) -> SessionRecord {
    SessionRecord {
        id: Some(id.to_string()),
        start_time: Some(test_start()),
        end_time: Some(test_start() + Duration::seconds(900)),
        intent: Some(intent.to_string()),
        outcome: Some("success".to_string()),
        conversations: Some(vec![conversation(5, "user", message)]),
        code_deltas: None,
        file_changes: None,
    }
}

/// A small, varied batch covering every trace kind
pub fn create_test_batch() -> Vec<SessionRecord> {
    let mut debugging = create_test_record(
        "session-debug",
        "debug",
        "the parser fails on line 12 when reading /var/log/app/error.log",
    );
    debugging.code_deltas = Some(vec![code_delta(
        60,
        "src/parser.py",
        "tokens = line.split()",
        "tokens = line.strip().split()",
    )]);
    debugging.file_changes = Some(vec![file_change(90, "src/parser.py")]);

    let mut docs = create_test_record(
        "session-docs",
        "document",
        "update the readme with install steps",
    );
    docs.file_changes = Some(vec![file_change(30, "README.md"), file_change(45, "docs/setup.md")]);
    docs.end_time = Some(test_start() + Duration::seconds(300));

    let mut feature = create_test_record(
        "session-feature",
        "implement",
        "add a plot of training loss per epoch",
    );
    feature.conversations = Some(vec![
        conversation(5, "user", "add a plot of training loss per epoch"),
        conversation(20, "assistant", "use matplotlib and the history object"),
    ]);
    feature.code_deltas = Some(vec![code_delta(
        120,
        "notebooks/train.py",
        "model.fit(x, y)",
        "history = model.fit(x, y)",
    )]);

    let exploring = create_test_record(
        "session-explore",
        "explore",
        "how is the dataframe grouped before export",
    );

    vec![debugging, docs, feature, exploring]
}

/// Config that should leave content untouched apart from the id
pub fn identity_config() -> PrivacyConfig {
    PrivacyConfig {
        epsilon: f64::INFINITY,
        redaction_level: 0.0,
        abstraction_level: AbstractionLevel::Token,
        ..Default::default()
    }
}
