//! Memloom - Knowledge-graph memory agent for a single user
//!
//! Memloom keeps a persistent, queryable memory of facts about one user,
//! derived from free-text statements and organized as a graph linking the
//! user to entities (people, tools, topics) via typed relationships.
//!
//! ## Architecture
//!
//! ```text
//!  statement ──► MemoryEncoder ──► MemoryRecord ──► MemoryWeaver ─┐
//!                     │                                           │
//!              LanguageModel ◄──────────── MemorySynthesizer ◄────┤
//!              (external LLM)                     │               │
//!                                                 ▼               ▼
//!      query ──► MemoryRetriever ◄──────────── GraphStore ◄── KnowledgeGraph
//!                     │                            │
//!                     ▼                            ▼
//!              matching source texts      data/memory_graph.json
//! ```
//!
//! The graph store owns the data: a single fixed user node, one node per
//! entity ever mentioned, and at most one attributed edge per (user, entity)
//! pair. Weaving upserts nodes and edges with last-write-wins semantics and
//! rewrites the whole file after every change. Retrieval is a one-hop,
//! exact-token match over the user's edges. Synthesis pattern-matches entity
//! categories and asks the language model to phrase a derived insight, which
//! flows back through the weaver.
//!
//! ## Modules
//!
//! - [`graph`]: owned adjacency structure and JSON node-link persistence
//! - [`memory`]: encoder, weaver, retriever, and synthesizer components
//! - [`llm`]: narrow language-model capability and the Gemini client
//! - [`config`]: configuration management
//! - [`error`]: crate error type

pub mod config;
pub mod error;
pub mod graph;
pub mod llm;
pub mod memory;

pub use config::MemloomConfig;
pub use error::{Error, Result};
