//! Token-based memory retrieval
//!
//! Retrieval is a strict one-hop, exact-token, case-insensitive match over
//! the edges incident to the user node. No stemming, no fuzzy matching, no
//! ranking: a query token either equals an entity name, equals an entity's
//! kind, or intersects the entity's subcategory words, and each match
//! contributes that edge's source text to the result set.

use crate::graph::GraphStore;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Closed stop-word set removed from queries before matching.
///
/// Tests depend on this exact membership; extend it only together with the
/// retrieval tests.
const STOP_WORDS: &[&str] = &[
    "a", "about", "am", "an", "and", "are", "as", "at", "be", "by", "do", "for", "from", "how",
    "i", "in", "is", "it", "my", "of", "on", "or", "that", "the", "this", "to", "was", "what",
    "when", "where", "who", "will", "with", "you",
];

/// Punctuation stripped from the ends of each query token
const TOKEN_TRIM: &[char] = &['.', ',', '?', '!'];

/// Answers free-text queries from the knowledge graph
pub struct MemoryRetriever {
    store: Arc<GraphStore>,
}

impl MemoryRetriever {
    /// Create a retriever over the given store
    pub fn new(store: Arc<GraphStore>) -> Self {
        Self { store }
    }

    /// Return the distinct source texts of memories matching `query`.
    ///
    /// Results are in lexicographic order; retrieval itself never fails, an
    /// unmatched query simply returns an empty list.
    pub async fn retrieve(&self, query: &str) -> Vec<String> {
        let tokens = tokenize(query);
        if tokens.is_empty() {
            return Vec::new();
        }

        let graph = self.store.graph().await;
        let mut matched = BTreeSet::new();

        for (entity, edge) in graph.user_edges() {
            let Some(node) = graph.node(entity) else {
                continue;
            };

            // Entity name match
            if tokens.contains(&entity.to_lowercase()) {
                matched.insert(edge.source_text.clone());
                continue;
            }

            // Kind match
            let kind = node.kind.to_lowercase();
            if !kind.is_empty() && tokens.contains(&kind) {
                matched.insert(edge.source_text.clone());
                continue;
            }

            // Subcategory word match: the subcategory may be a multi-word
            // phrase, so any shared word counts
            let subcategory = node.subcategory.to_lowercase();
            if !subcategory.is_empty()
                && subcategory
                    .split_whitespace()
                    .any(|word| tokens.contains(word))
            {
                matched.insert(edge.source_text.clone());
            }
        }

        matched.into_iter().collect()
    }
}

/// Lowercase, split on whitespace, strip surrounding punctuation, and drop
/// stop words.
fn tokenize(query: &str) -> BTreeSet<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .map(|word| word.trim_matches(TOKEN_TRIM))
        .filter(|word| !word.is_empty() && !STOP_WORDS.contains(word))
        .map(str::to_string)
        .collect()
}
