//! Graph store with file-based JSON persistence
//!
//! The persisted form is a node-link document:
//!
//! ```text
//! { "nodes": [ { "id": "...", "kind": "...", "label": "...", "subcategory": "..." }, ... ],
//!   "links": [ { "source": "...", "target": "...", "relationship": "...",
//!                "sentiment": "...", "sourceText": "...", "timestamp": "..." }, ... ] }
//! ```
//!
//! Loading is tolerant: a missing file yields an empty graph, a corrupt file
//! is logged and replaced by an empty graph. The user node is re-established
//! after every load. Saving rewrites the whole document through a temp file
//! plus rename, so a crash mid-write leaves the previous version intact.

use super::model::{EdgeAttrs, KnowledgeGraph, NodeAttrs};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Node-link document, the persisted wire format of the graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphDocument {
    /// All nodes with their attributes
    #[serde(default)]
    pub nodes: Vec<NodeEntry>,
    /// All edges with their attributes
    #[serde(default)]
    pub links: Vec<LinkEntry>,
}

/// One node in the persisted document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeEntry {
    /// Node id
    pub id: String,
    /// Node attributes, flattened alongside the id
    #[serde(flatten)]
    pub attrs: NodeAttrs,
}

/// One edge in the persisted document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkEntry {
    /// Source endpoint node id
    pub source: String,
    /// Target endpoint node id
    pub target: String,
    /// Edge attributes, flattened alongside the endpoints
    #[serde(flatten)]
    pub attrs: EdgeAttrs,
}

/// Persistent store owning the knowledge graph.
///
/// The graph is loaded once at construction and held in memory; every weave
/// rewrites the full document synchronously. Exactly one in-process owner is
/// assumed; there is no cross-process locking.
pub struct GraphStore {
    path: PathBuf,
    graph: Arc<RwLock<KnowledgeGraph>>,
}

impl GraphStore {
    /// Open a store backed by `path` for the given user.
    ///
    /// Never fails: an unreadable or unparseable file is logged and replaced
    /// by an empty graph. The user node is present afterward in all cases.
    pub async fn open(path: impl Into<PathBuf>, user_id: impl Into<String>) -> Self {
        let path = path.into();
        let graph = Self::load(&path, user_id.into()).await;
        Self {
            path,
            graph: Arc::new(RwLock::new(graph)),
        }
    }

    /// File the graph persists to
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted document and rebuild the graph from it
    async fn load(path: &Path, user_id: String) -> KnowledgeGraph {
        let mut graph = KnowledgeGraph::new(user_id);

        let data = match tokio::fs::read_to_string(path).await {
            Ok(data) => data,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!("Failed to read graph file {}: {}", path.display(), e);
                }
                return graph;
            }
        };

        let document: GraphDocument = match serde_json::from_str(&data) {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!(
                    "Could not parse graph file {}, starting empty: {}",
                    path.display(),
                    e
                );
                return graph;
            }
        };

        for node in document.nodes {
            graph.insert_raw_node(node.id, node.attrs);
        }
        for link in document.links {
            if !graph.insert_raw_edge(&link.source, &link.target, link.attrs) {
                tracing::warn!(
                    "Dropping edge ({}, {}) with unknown endpoint",
                    link.source,
                    link.target
                );
            }
        }
        graph.ensure_user_node();
        graph
    }

    /// Serialize the full graph to its file.
    ///
    /// The containing directory is created as needed. The document is written
    /// to a temp file and renamed into place; on failure the previous file is
    /// left untouched and a distinct persistence error is returned.
    pub async fn save(&self) -> Result<()> {
        let document = {
            let graph = self.graph.read().await;
            Self::to_document(&graph)
        };

        let json = serde_json::to_string_pretty(&document)
            .map_err(|e| Error::Persistence(format!("failed to serialize graph: {e}")))?;

        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                tokio::fs::create_dir_all(dir).await.map_err(|e| {
                    Error::Persistence(format!("failed to create {}: {e}", dir.display()))
                })?;
            }
        }

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| Error::Persistence(format!("failed to write {}: {e}", tmp.display())))?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            Error::Persistence(format!(
                "failed to move graph into place at {}: {e}",
                self.path.display()
            ))
        })?;

        Ok(())
    }

    /// Idempotently pin the user node and its fixed attributes
    pub async fn ensure_user_node(&self) {
        self.graph.write().await.ensure_user_node();
    }

    /// Insert or overwrite an entity node (last write wins)
    pub async fn upsert_entity(&self, name: &str, kind: &str, subcategory: &str) {
        self.graph
            .write()
            .await
            .upsert_entity(name, kind, subcategory);
    }

    /// Insert or overwrite the (user, entity) edge
    pub async fn upsert_user_edge(&self, entity: &str, attrs: EdgeAttrs) {
        self.graph.write().await.upsert_user_edge(entity, attrs);
    }

    /// Snapshot of the current in-memory graph
    pub async fn graph(&self) -> KnowledgeGraph {
        self.graph.read().await.clone()
    }

    /// Node-link view of the current graph, for inspection and display
    pub async fn summary(&self) -> GraphDocument {
        let graph = self.graph.read().await;
        Self::to_document(&graph)
    }

    fn to_document(graph: &KnowledgeGraph) -> GraphDocument {
        let nodes = graph
            .nodes()
            .map(|(id, attrs)| NodeEntry {
                id: id.to_string(),
                attrs: attrs.clone(),
            })
            .collect();
        let links = graph
            .edges()
            .map(|(key, attrs)| {
                let (source, target) = key.endpoints();
                LinkEntry {
                    source: source.to_string(),
                    target: target.to_string(),
                    attrs: attrs.clone(),
                }
            })
            .collect();
        GraphDocument { nodes, links }
    }
}
