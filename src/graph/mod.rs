//! Knowledge graph — user-centric memory graph
//!
//! An undirected, attributed graph with a single fixed user node at the
//! center. Entities the user has mentioned become nodes; the relationship
//! between the user and an entity is an attributed edge. The graph is simple:
//! at most one edge per node pair, enforced by the data structure itself.

pub mod model;
pub mod store;

pub use model::{EdgeAttrs, EdgeKey, KnowledgeGraph, NodeAttrs};
pub use store::{GraphDocument, GraphStore, LinkEntry, NodeEntry};
