//! Synthesis of insight records from graph patterns
//!
//! The synthesizer scans entity nodes for recurring categories. When more
//! than one entity shares a kind, the group's facts are handed to the
//! language model to phrase a single insight sentence, which becomes a new
//! `Insight` record and is woven back into the graph. One insight per call,
//! from the first qualifying group.
//!
//! Groups are examined in lexicographic order of category name and entities
//! within a group in node-id order, so repeated runs over the same graph
//! pick the same pattern.

use super::record::MemoryRecord;
use super::weaver::MemoryWeaver;
use crate::error::Result;
use crate::graph::{model::USER_KIND, GraphStore};
use crate::llm::LanguageModel;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Derives higher-level insight records from the knowledge graph
pub struct MemorySynthesizer {
    store: Arc<GraphStore>,
    weaver: MemoryWeaver,
    model: Arc<dyn LanguageModel>,
}

impl MemorySynthesizer {
    /// Create a synthesizer over the given store and model
    pub fn new(store: Arc<GraphStore>, model: Arc<dyn LanguageModel>) -> Self {
        let weaver = MemoryWeaver::new(store.clone());
        Self {
            store,
            weaver,
            model,
        }
    }

    /// Look for a category pattern and turn it into an insight record.
    ///
    /// `Ok(None)` when no category holds more than one entity or the model
    /// produced no usable insight text; in both cases the graph is left
    /// untouched. `Err` only surfaces a persistence failure while weaving
    /// the new insight.
    pub async fn synthesize(&self) -> Result<Option<MemoryRecord>> {
        let graph = self.store.graph().await;

        let mut groups: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for (id, attrs) in graph.entities() {
            if attrs.kind.is_empty() || attrs.kind == USER_KIND {
                continue;
            }
            groups.entry(attrs.kind.as_str()).or_default().push(id);
        }

        let Some((category, entities)) = groups.into_iter().find(|(_, group)| group.len() > 1)
        else {
            tracing::debug!("No category with multiple entities, nothing to synthesize");
            return Ok(None);
        };

        tracing::info!(
            "Found a pattern: multiple entities in the '{}' category: {:?}",
            category,
            entities
        );

        let facts: Vec<String> = entities
            .iter()
            .map(|entity| format!("User is associated with '{entity}' ({category})"))
            .collect();
        let prompt = Self::synthesis_prompt(&facts);

        let Some(response) = self.model.structured_completion(&prompt).await else {
            tracing::warn!("No structured response from {} for synthesis", self.model.name());
            return Ok(None);
        };

        let Some(insight_text) = response
            .get("insight")
            .and_then(Value::as_str)
            .filter(|text| !text.is_empty())
        else {
            tracing::warn!("Synthesis response carried no usable insight text");
            return Ok(None);
        };

        let record = MemoryRecord::insight(
            insight_text,
            category,
            entities.iter().map(|entity| entity.to_string()).collect(),
        );
        self.weaver.weave(&record).await?;
        tracing::info!("Generated insight: {}", insight_text);
        Ok(Some(record))
    }

    fn synthesis_prompt(facts: &[String]) -> String {
        let fact_list = facts.join("\n- ");
        format!(
            r#"Analyze the following facts about a user and generate a single, concise insight.
The insight should be a logical conclusion drawn from the combination of these facts.
Your output must be a single JSON object with one key: "insight".

Facts:
- {fact_list}

Example:
Facts:
- User uses 'VS Code' for 'Python'.
- User's job is 'Software Developer'.
Your JSON output:
{{
    "insight": "The user is a software developer who likely uses VS Code as their primary editor for Python development."
}}

Now, analyze the facts provided at the top and generate the JSON object."#
        )
    }
}
