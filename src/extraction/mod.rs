//! Trace extraction: raw session records into ordered workflows.

pub mod extractor;
pub mod record;

pub use extractor::{ExtractionReport, SkippedRecord, TraceExtractor, UNKNOWN};
pub use record::{CodeDeltaEntry, ConversationEntry, FileChangeEntry, SessionRecord};
