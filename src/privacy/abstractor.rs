//! Multi-level trace abstraction.
//!
//! Each level has an ordered rule table of `(category, keywords)` pairs; the
//! first rule with a keyword present in the lower-cased trace text wins.
//!
//! | Level | Applies to | Categories |
//! |-------|------------|------------|
//! | 1 token | nothing | no-op |
//! | 2 statement | code changes | function definition … other statement |
//! | 3 function | all traces | data processing … general function |
//! | 4 module | file changes by extension, others `module_operation` | python … other module |
//! | 5 workflow | level-3 category plus text | explore … general workflow |

use std::path::Path;

use crate::config::AbstractionLevel;
use crate::types::{
    AbstractedType, FunctionCategory, ModuleCategory, StatementCategory, Trace, TraceEvent,
    WorkflowCategory,
};

/// Keyword rule: matches when any keyword occurs in the text
struct Rule<C: 'static> {
    category: C,
    any_of: &'static [&'static str],
}

impl<C: Copy> Rule<C> {
    fn matches(&self, text: &str) -> bool {
        self.any_of.iter().any(|keyword| text.contains(keyword))
    }
}

fn first_match<C: Copy>(rules: &[Rule<C>], text: &str) -> Option<C> {
    rules.iter().find(|rule| rule.matches(text)).map(|rule| rule.category)
}

const STATEMENT_RULES: &[Rule<StatementCategory>] = &[
    Rule {
        category: StatementCategory::FunctionDefinition,
        any_of: &["def ", "function ", "fn ", "func ", "lambda "],
    },
    Rule {
        category: StatementCategory::ImportStatement,
        any_of: &["import ", "require(", "#include", "use "],
    },
    Rule {
        category: StatementCategory::ConditionalStatement,
        any_of: &["if ", "if(", "elif ", "else", "switch", "match "],
    },
    Rule {
        category: StatementCategory::LoopStatement,
        any_of: &["for ", "for(", "while ", "while(", ".foreach(", "loop "],
    },
    Rule {
        category: StatementCategory::AssignmentStatement,
        any_of: &["="],
    },
];

const FUNCTION_RULES: &[Rule<FunctionCategory>] = &[
    Rule {
        category: FunctionCategory::DataProcessing,
        any_of: &[
            "pandas", "dataframe", "numpy", "csv", "groupby", "filter(", "parse", "transform",
        ],
    },
    Rule {
        category: FunctionCategory::Visualization,
        any_of: &["matplotlib", "seaborn", "plotly", "plot", "chart", "visuali"],
    },
    Rule {
        category: FunctionCategory::MachineLearning,
        any_of: &[
            "sklearn", "tensorflow", "torch", "keras", "model", "train", "predict", "fit(",
        ],
    },
    Rule {
        category: FunctionCategory::ApiCall,
        any_of: &["fetch(", "requests.", "axios", "http", "api.", "/api", "endpoint"],
    },
    Rule {
        category: FunctionCategory::FileIo,
        any_of: &["open(", "read(", "write(", "readfile", "writefile", "fs.", "file"],
    },
    Rule {
        category: FunctionCategory::Testing,
        any_of: &["test", "assert", "expect(", "pytest", "jest", "mock"],
    },
];

/// Level-5 rule: matches on the level-3 category or on a keyword
struct WorkflowRule {
    category: WorkflowCategory,
    functions: &'static [FunctionCategory],
    any_of: &'static [&'static str],
}

const WORKFLOW_RULES: &[WorkflowRule] = &[
    WorkflowRule {
        category: WorkflowCategory::Explore,
        functions: &[FunctionCategory::DataProcessing, FunctionCategory::Visualization],
        any_of: &["explore", "investigate", "inspect", "understand"],
    },
    WorkflowRule {
        category: WorkflowCategory::Implement,
        functions: &[
            FunctionCategory::MachineLearning,
            FunctionCategory::ApiCall,
            FunctionCategory::FileIo,
        ],
        any_of: &["implement", "feature"],
    },
    WorkflowRule {
        category: WorkflowCategory::Debug,
        functions: &[FunctionCategory::Testing],
        any_of: &["debug", "bug", "error", "fix", "exception", "traceback", "crash"],
    },
    WorkflowRule {
        category: WorkflowCategory::Document,
        functions: &[],
        any_of: &["readme", "docstring", "docs", "document"],
    },
    WorkflowRule {
        category: WorkflowCategory::Refactor,
        functions: &[],
        any_of: &["refactor", "rename", "cleanup", "clean up", "simplify"],
    },
];

/// Text a trace is classified on, lower-cased
fn trace_text(trace: &Trace) -> String {
    match &trace.event {
        TraceEvent::Conversation { content, .. } => content.to_lowercase(),
        TraceEvent::CodeChange {
            file_path,
            after,
            diff,
            ..
        } => format!("{}\n{}\n{}", file_path, after, diff).to_lowercase(),
        TraceEvent::FileChange { file_path, .. } => file_path.to_lowercase(),
    }
}

/// Level 2: only code changes carry statements
pub fn classify_statement(trace: &Trace) -> Option<StatementCategory> {
    match &trace.event {
        TraceEvent::CodeChange { after, diff, .. } => {
            let content = if after.trim().is_empty() { diff } else { after };
            let content = content.to_lowercase();
            Some(first_match(STATEMENT_RULES, &content).unwrap_or(StatementCategory::OtherStatement))
        }
        _ => None,
    }
}

/// Level 3
pub fn classify_function(trace: &Trace) -> FunctionCategory {
    first_match(FUNCTION_RULES, &trace_text(trace)).unwrap_or(FunctionCategory::GeneralFunction)
}

/// Level 4
pub fn classify_module(trace: &Trace) -> ModuleCategory {
    let TraceEvent::FileChange { file_path, .. } = &trace.event else {
        return ModuleCategory::ModuleOperation;
    };

    let extension = Path::new(file_path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "py" => ModuleCategory::PythonModule,
        "js" | "jsx" | "ts" | "tsx" | "mjs" | "cjs" => ModuleCategory::JavascriptModule,
        "ipynb" => ModuleCategory::NotebookModule,
        "md" | "rst" | "txt" => ModuleCategory::DocumentationModule,
        "json" | "yaml" | "yml" | "toml" | "ini" | "cfg" | "conf" | "env" => {
            ModuleCategory::ConfigModule
        }
        _ => ModuleCategory::OtherModule,
    }
}

/// Level 5
pub fn classify_workflow(trace: &Trace) -> WorkflowCategory {
    let function = classify_function(trace);
    let text = trace_text(trace);

    WORKFLOW_RULES
        .iter()
        .find(|rule| {
            rule.functions.contains(&function)
                || rule.any_of.iter().any(|keyword| text.contains(keyword))
        })
        .map(|rule| rule.category)
        .unwrap_or(WorkflowCategory::GeneralWorkflow)
}

/// Collapses traces to the categories of one abstraction level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Abstractor {
    level: AbstractionLevel,
}

impl Abstractor {
    pub fn new(level: AbstractionLevel) -> Self {
        Self { level }
    }

    pub fn level(&self) -> AbstractionLevel {
        self.level
    }

    /// Category for `trace` at this level, if the level assigns one
    pub fn classify(&self, trace: &Trace) -> Option<AbstractedType> {
        match self.level {
            AbstractionLevel::Token => None,
            AbstractionLevel::Statement => classify_statement(trace).map(AbstractedType::Statement),
            AbstractionLevel::Function => Some(AbstractedType::Function(classify_function(trace))),
            AbstractionLevel::Module => Some(AbstractedType::Module(classify_module(trace))),
            AbstractionLevel::Workflow => Some(AbstractedType::Workflow(classify_workflow(trace))),
        }
    }

    /// New trace carrying this level's category; the input is untouched
    pub fn abstract_trace(&self, trace: &Trace) -> Trace {
        let mut abstracted = trace.clone();
        if let Some(category) = self.classify(trace) {
            abstracted.abstracted_type = Some(category);
        }
        abstracted
    }
}
