//! Weaving memory records into the knowledge graph
//!
//! Weave is the only write path into the graph: each entity in a record is
//! upserted as a node, the (user, entity) edge is upserted with the record's
//! attributes, and the whole graph is persisted synchronously. Node and edge
//! upserts are last-write-wins; a later memory touching the same entity
//! replaces what an earlier one wrote.

use super::record::MemoryRecord;
use crate::error::Result;
use crate::graph::{EdgeAttrs, GraphStore};
use std::sync::Arc;

/// Merges memory records into the persistent graph
#[derive(Clone)]
pub struct MemoryWeaver {
    store: Arc<GraphStore>,
}

impl MemoryWeaver {
    /// Create a weaver over the given store
    pub fn new(store: Arc<GraphStore>) -> Self {
        Self { store }
    }

    /// The store this weaver writes to
    pub fn store(&self) -> &Arc<GraphStore> {
        &self.store
    }

    /// Weave one record into the graph and persist it.
    ///
    /// A record with no entities is a no-op: the statement counts as
    /// processed but neither the graph nor the file changes. A persistence
    /// failure is returned as [`crate::error::Error::Persistence`]; the
    /// in-memory mutation is kept, so disk may be behind memory afterward.
    pub async fn weave(&self, record: &MemoryRecord) -> Result<()> {
        if record.content.entities.is_empty() {
            tracing::debug!(
                "Memory '{}' names no entities, nothing to weave",
                record.source_text
            );
            return Ok(());
        }

        for entity in &record.content.entities {
            self.store
                .upsert_entity(entity, &record.category, &record.subcategory)
                .await;
            self.store
                .upsert_user_edge(
                    entity,
                    EdgeAttrs {
                        relationship: record.content.relationship.clone(),
                        sentiment: record.content.sentiment,
                        source_text: record.source_text.clone(),
                        timestamp: record.timestamp,
                    },
                )
                .await;
        }

        self.store.save().await?;
        tracing::info!("Wove memory '{}' into the graph", record.source_text);
        Ok(())
    }
}
