//! Owned adjacency structure for the knowledge graph
//!
//! Nodes are keyed by id in a `BTreeMap`; edges are keyed by an unordered
//! endpoint pair. Both invariants the rest of the crate relies on live here:
//! the user node is always present with fixed attributes, and a node pair
//! carries at most one edge. Map keying makes the second structural; the
//! mutation API guards the first.
//!
//! `BTreeMap` rather than `HashMap` so that iteration, and with it
//! serialization and synthesis grouping, is deterministic.

use crate::memory::record::Sentiment;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Node type label for the user node
pub const USER_KIND: &str = "user";

/// Display label for the user node
pub const USER_LABEL: &str = "User";

/// Attributes carried by every node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeAttrs {
    /// Type label: `"user"` for the user node, otherwise the category of the
    /// memory that last touched the entity
    pub kind: String,
    /// Display label; for entity nodes this is the entity name itself
    pub label: String,
    /// Finer-grained label, most-recently-written wins; empty when absent
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub subcategory: String,
}

impl NodeAttrs {
    /// Fixed attributes of the user node
    pub fn user() -> Self {
        Self {
            kind: USER_KIND.to_string(),
            label: USER_LABEL.to_string(),
            subcategory: String::new(),
        }
    }
}

/// Attributes carried by every (user, entity) edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeAttrs {
    /// Verb phrase describing how the user relates to the entity
    pub relationship: String,
    /// Sentiment of the memory that wrote this edge
    pub sentiment: Sentiment,
    /// Original statement the memory was derived from
    #[serde(rename = "sourceText")]
    pub source_text: String,
    /// Creation time of the memory that wrote this edge
    pub timestamp: DateTime<Utc>,
}

/// Unordered endpoint pair identifying an edge.
///
/// Endpoints are stored in lexicographic order so that `(a, b)` and `(b, a)`
/// name the same edge.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct EdgeKey {
    a: String,
    b: String,
}

impl EdgeKey {
    /// Create a key for the pair `(x, y)`, normalizing endpoint order
    pub fn new(x: impl Into<String>, y: impl Into<String>) -> Self {
        let (x, y) = (x.into(), y.into());
        if x <= y {
            Self { a: x, b: y }
        } else {
            Self { a: y, b: x }
        }
    }

    /// The two endpoints, in normalized order
    pub fn endpoints(&self) -> (&str, &str) {
        (&self.a, &self.b)
    }

    /// Given one endpoint, return the other; `None` if `node` is not an
    /// endpoint of this edge
    pub fn other(&self, node: &str) -> Option<&str> {
        if self.a == node {
            Some(&self.b)
        } else if self.b == node {
            Some(&self.a)
        } else {
            None
        }
    }
}

/// The in-memory knowledge graph.
///
/// Construction establishes the user node; no mutation can remove it or
/// change its attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeGraph {
    user_id: String,
    nodes: BTreeMap<String, NodeAttrs>,
    edges: BTreeMap<EdgeKey, EdgeAttrs>,
}

impl KnowledgeGraph {
    /// Create an empty graph containing only the user node
    pub fn new(user_id: impl Into<String>) -> Self {
        let mut graph = Self {
            user_id: user_id.into(),
            nodes: BTreeMap::new(),
            edges: BTreeMap::new(),
        };
        graph.ensure_user_node();
        graph
    }

    /// Id of the user node
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Idempotently pin the user node and its fixed attributes.
    ///
    /// Inserts the node when absent and resets its attributes when a loaded
    /// file carried something else.
    pub fn ensure_user_node(&mut self) {
        self.nodes.insert(self.user_id.clone(), NodeAttrs::user());
    }

    /// Insert or overwrite an entity node.
    ///
    /// Last write wins for `kind` and `subcategory`. The user node cannot be
    /// shadowed by an entity of the same name; such an upsert is ignored.
    pub fn upsert_entity(
        &mut self,
        name: impl Into<String>,
        kind: impl Into<String>,
        subcategory: impl Into<String>,
    ) {
        let name = name.into();
        if name == self.user_id {
            return;
        }
        let attrs = NodeAttrs {
            kind: kind.into(),
            label: name.clone(),
            subcategory: subcategory.into(),
        };
        self.nodes.insert(name, attrs);
    }

    /// Insert or overwrite the edge between the user and `entity`.
    ///
    /// The graph is simple, so a second write to the same pair replaces the
    /// previous attributes entirely. A self-edge on the user node is ignored.
    pub fn upsert_user_edge(&mut self, entity: &str, attrs: EdgeAttrs) {
        if entity == self.user_id {
            return;
        }
        self.edges
            .insert(EdgeKey::new(self.user_id.clone(), entity), attrs);
    }

    /// Insert a node with explicit attributes, as read from a persisted
    /// document. The user node stays pinned regardless of input.
    pub fn insert_raw_node(&mut self, id: impl Into<String>, attrs: NodeAttrs) {
        let id = id.into();
        if id == self.user_id {
            return;
        }
        self.nodes.insert(id, attrs);
    }

    /// Insert an edge between two existing nodes, as read from a persisted
    /// document. Returns false (and inserts nothing) when either endpoint is
    /// unknown or the edge would be a self-loop.
    pub fn insert_raw_edge(&mut self, source: &str, target: &str, attrs: EdgeAttrs) -> bool {
        if source == target || !self.nodes.contains_key(source) || !self.nodes.contains_key(target)
        {
            return false;
        }
        self.edges.insert(EdgeKey::new(source, target), attrs);
        true
    }

    /// Attributes of a node, if present
    pub fn node(&self, id: &str) -> Option<&NodeAttrs> {
        self.nodes.get(id)
    }

    /// All nodes, in id order
    pub fn nodes(&self) -> impl Iterator<Item = (&str, &NodeAttrs)> {
        self.nodes.iter().map(|(id, attrs)| (id.as_str(), attrs))
    }

    /// All entity nodes (everything except the user node), in id order
    pub fn entities(&self) -> impl Iterator<Item = (&str, &NodeAttrs)> {
        self.nodes().filter(move |(id, _)| *id != self.user_id)
    }

    /// All edges, in key order
    pub fn edges(&self) -> impl Iterator<Item = (&EdgeKey, &EdgeAttrs)> {
        self.edges.iter()
    }

    /// Edges incident to the user node, as (entity id, edge attributes)
    pub fn user_edges(&self) -> impl Iterator<Item = (&str, &EdgeAttrs)> {
        self.edges.iter().filter_map(move |(key, attrs)| {
            key.other(&self.user_id).map(|entity| (entity, attrs))
        })
    }

    /// Number of nodes, user node included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
