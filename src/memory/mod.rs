//! Memory system — encode, weave, retrieve, synthesize
//!
//! Statements flow through the components in that order: the encoder turns a
//! raw statement into a [`record::MemoryRecord`] via the language-model
//! collaborator, the weaver merges the record into the persistent graph, the
//! retriever answers free-text queries from the graph, and the synthesizer
//! periodically derives insight records from patterns across it.

pub mod encoder;
pub mod record;
pub mod retriever;
pub mod synthesizer;
pub mod weaver;

pub use encoder::MemoryEncoder;
pub use record::{MemoryKind, MemoryRecord, RecordContent, Sentiment};
pub use retriever::MemoryRetriever;
pub use synthesizer::MemorySynthesizer;
pub use weaver::MemoryWeaver;
