//! Core data types for the privflow analysis engine
//!
//! This module defines the structures shared by every stage: workflows, their
//! typed trace events, and the abstraction taxonomy a trace can be collapsed
//! into. Workflows are immutable once extracted; every privacy stage produces
//! a new value rather than mutating its input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One analyzed session: an ordered trace plus summary metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    /// Session identifier (pseudonymized after transformation)
    pub id: String,

    /// Session start time
    pub timestamp: DateTime<Utc>,

    /// What the user set out to do (e.g. "debug", "implement")
    pub intent: String,

    /// How the session ended (e.g. "success", "failure")
    pub outcome: String,

    /// Events ordered ascending by timestamp
    pub traces: Vec<Trace>,

    /// Aggregates computed at extraction
    pub metadata: WorkflowMetadata,
}

impl Workflow {
    /// Number of traces of the given kind
    pub fn count_kind(&self, kind: TraceKind) -> usize {
        self.traces.iter().filter(|t| t.kind() == kind).count()
    }

    /// All conversation tokens in trace order
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.traces.iter().flat_map(|t| match &t.event {
            TraceEvent::Conversation { tokens, .. } => tokens.as_slice(),
            _ => &[],
        })
        .map(String::as_str)
    }
}

/// Summary metadata for a workflow
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowMetadata {
    /// Session length in whole seconds
    pub duration: u64,

    /// Distinct file paths referenced by any trace
    pub file_count: u64,

    /// Number of code_change traces
    pub change_count: u64,
}

/// One typed event within a workflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub timestamp: DateTime<Utc>,

    #[serde(flatten)]
    pub event: TraceEvent,

    /// Category assigned by the abstractor (absent at token level)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abstracted_type: Option<AbstractedType>,
}

impl Trace {
    pub fn new(timestamp: DateTime<Utc>, event: TraceEvent) -> Self {
        Self {
            timestamp,
            event,
            abstracted_type: None,
        }
    }

    pub fn kind(&self) -> TraceKind {
        self.event.kind()
    }

    /// Label used for sequence comparison: the abstracted type when present,
    /// otherwise the trace kind.
    pub fn label(&self) -> &'static str {
        match &self.abstracted_type {
            Some(abstracted) => abstracted.label(),
            None => self.kind().label(),
        }
    }

    /// File path referenced by this trace, if any
    pub fn file_path(&self) -> Option<&str> {
        match &self.event {
            TraceEvent::Conversation { .. } => None,
            TraceEvent::CodeChange { file_path, .. } | TraceEvent::FileChange { file_path, .. } => {
                Some(file_path)
            }
        }
    }
}

/// Kind-specific payload of a trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TraceEvent {
    /// A conversation turn
    Conversation {
        role: String,
        content: String,
        tokens: Vec<String>,
    },

    /// An edit captured with before/after content
    CodeChange {
        file_path: String,
        change_type: String,
        before: String,
        after: String,
        diff: String,
        /// Changed lines in the diff
        line_count: u64,
    },

    /// A file-system level change
    FileChange {
        file_path: String,
        change_type: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        line_range: Option<LineRange>,
    },
}

impl TraceEvent {
    pub fn kind(&self) -> TraceKind {
        match self {
            TraceEvent::Conversation { .. } => TraceKind::Conversation,
            TraceEvent::CodeChange { .. } => TraceKind::CodeChange,
            TraceEvent::FileChange { .. } => TraceKind::FileChange,
        }
    }
}

/// Inclusive line span touched by a file change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRange {
    pub start: u64,
    pub end: u64,
}

/// Trace kind discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceKind {
    Conversation,
    CodeChange,
    FileChange,
}

impl TraceKind {
    pub const ALL: [TraceKind; 3] = [
        TraceKind::Conversation,
        TraceKind::CodeChange,
        TraceKind::FileChange,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TraceKind::Conversation => "conversation",
            TraceKind::CodeChange => "code_change",
            TraceKind::FileChange => "file_change",
        }
    }
}

impl fmt::Display for TraceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Statement-level categories (abstraction level 2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementCategory {
    FunctionDefinition,
    ImportStatement,
    ConditionalStatement,
    LoopStatement,
    AssignmentStatement,
    OtherStatement,
}

/// Function-level domain taxonomy (abstraction level 3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionCategory {
    DataProcessing,
    Visualization,
    MachineLearning,
    ApiCall,
    FileIo,
    Testing,
    GeneralFunction,
}

/// Module-level categories (abstraction level 4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleCategory {
    PythonModule,
    JavascriptModule,
    NotebookModule,
    DocumentationModule,
    ConfigModule,
    OtherModule,
    ModuleOperation,
}

/// Workflow-level categories (abstraction level 5)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowCategory {
    Explore,
    Implement,
    Debug,
    Document,
    Refactor,
    GeneralWorkflow,
}

/// Category a trace was collapsed into.
///
/// Serializes as the bare snake_case label; the label sets of the four
/// levels are disjoint so deserialization is unambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AbstractedType {
    Statement(StatementCategory),
    Function(FunctionCategory),
    Module(ModuleCategory),
    Workflow(WorkflowCategory),
}

impl AbstractedType {
    pub fn label(&self) -> &'static str {
        match self {
            AbstractedType::Statement(c) => match c {
                StatementCategory::FunctionDefinition => "function_definition",
                StatementCategory::ImportStatement => "import_statement",
                StatementCategory::ConditionalStatement => "conditional_statement",
                StatementCategory::LoopStatement => "loop_statement",
                StatementCategory::AssignmentStatement => "assignment_statement",
                StatementCategory::OtherStatement => "other_statement",
            },
            AbstractedType::Function(c) => match c {
                FunctionCategory::DataProcessing => "data_processing",
                FunctionCategory::Visualization => "visualization",
                FunctionCategory::MachineLearning => "machine_learning",
                FunctionCategory::ApiCall => "api_call",
                FunctionCategory::FileIo => "file_io",
                FunctionCategory::Testing => "testing",
                FunctionCategory::GeneralFunction => "general_function",
            },
            AbstractedType::Module(c) => match c {
                ModuleCategory::PythonModule => "python_module",
                ModuleCategory::JavascriptModule => "javascript_module",
                ModuleCategory::NotebookModule => "notebook_module",
                ModuleCategory::DocumentationModule => "documentation_module",
                ModuleCategory::ConfigModule => "config_module",
                ModuleCategory::OtherModule => "other_module",
                ModuleCategory::ModuleOperation => "module_operation",
            },
            AbstractedType::Workflow(c) => match c {
                WorkflowCategory::Explore => "explore",
                WorkflowCategory::Implement => "implement",
                WorkflowCategory::Debug => "debug",
                WorkflowCategory::Document => "document",
                WorkflowCategory::Refactor => "refactor",
                WorkflowCategory::GeneralWorkflow => "general_workflow",
            },
        }
    }
}

impl fmt::Display for AbstractedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
