//! Statement encoding through the language-model collaborator
//!
//! The encoder is a thin pass-through: it builds the classification prompt,
//! hands it to the [`LanguageModel`], and fills a [`MemoryRecord`] from
//! whatever came back. Missing fields get defaults (`Unknown` kind and
//! category, empty subcategory and entities, `unknown` relationship, neutral
//! sentiment); a response that is not a JSON object at all yields `None`,
//! never a half-built record.

use super::record::{MemoryKind, MemoryRecord, RecordContent, Sentiment};
use crate::llm::LanguageModel;
use serde::Deserialize;
use std::sync::Arc;

/// Converts raw user statements into structured memory records
pub struct MemoryEncoder {
    model: Arc<dyn LanguageModel>,
}

/// Classification fields as the collaborator returns them.
///
/// Every field is optional; absent ones take the documented defaults. A
/// field of the wrong JSON type makes the whole response malformed.
#[derive(Debug, Deserialize)]
struct ClassifiedRecord {
    #[serde(rename = "type", default)]
    kind: MemoryKind,
    #[serde(default = "default_category")]
    category: String,
    #[serde(default)]
    subcategory: String,
    #[serde(default)]
    content: ClassifiedContent,
}

#[derive(Debug, Deserialize)]
struct ClassifiedContent {
    #[serde(default)]
    entities: Vec<String>,
    #[serde(default = "default_relationship")]
    relationship: String,
    #[serde(default)]
    sentiment: Sentiment,
}

impl Default for ClassifiedContent {
    fn default() -> Self {
        Self {
            entities: Vec::new(),
            relationship: default_relationship(),
            sentiment: Sentiment::Neutral,
        }
    }
}

fn default_category() -> String {
    "Unknown".to_string()
}

fn default_relationship() -> String {
    "unknown".to_string()
}

impl MemoryEncoder {
    /// Create an encoder backed by the given model
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Encode one statement into a memory record.
    ///
    /// `None` when the collaborator produced nothing usable; the caller
    /// should skip the statement and move on.
    pub async fn encode(&self, text: &str) -> Option<MemoryRecord> {
        let prompt = Self::encoder_prompt(text);
        let value = match self.model.structured_completion(&prompt).await {
            Some(value) => value,
            None => {
                tracing::warn!("No structured response from {} for statement", self.model.name());
                return None;
            }
        };

        if !value.is_object() {
            tracing::warn!("Classification response is not an object, skipping statement");
            return None;
        }

        let classified: ClassifiedRecord = match serde_json::from_value(value) {
            Ok(classified) => classified,
            Err(e) => {
                tracing::warn!("Malformed classification response: {}", e);
                return None;
            }
        };

        Some(MemoryRecord::new(
            text,
            classified.kind,
            classified.category,
            classified.subcategory,
            RecordContent {
                entities: classified.content.entities,
                relationship: classified.content.relationship,
                sentiment: classified.content.sentiment,
            },
        ))
    }

    fn encoder_prompt(text: &str) -> String {
        format!(
            r#"Analyze the following user statement to extract a memory.
Your output must be a single JSON object.

User statement: "{text}"

From this statement, extract the following information:
1. "type": Classify the memory. Is it a "Preference", a "Fact", an "Objective", or a "PersonalDetail"?
2. "category": What is the general topic? Examples: "Software", "Food", "Work", "LifeGoal", "Hobby".
3. "subcategory": A more specific category if available. Examples: "Productivity Tool", "Programming Language", "Restaurant". If not applicable, use an empty string.
4. "content": This must be a JSON object with three keys:
   - "entities": A list of key nouns or subjects.
   - "relationship": How the user relates to the entities (e.g., "uses", "likes", "is", "wants_to_learn").
   - "sentiment": The user's sentiment. "positive", "negative", or "neutral".

Example:
User statement: "I use Shram and Magnet as productivity tools."
Your JSON output:
{{
    "type": "Fact",
    "category": "Software",
    "subcategory": "Productivity Tool",
    "content": {{
        "entities": ["Shram", "Magnet"],
        "relationship": "uses",
        "sentiment": "neutral"
    }}
}}

Now, analyze the user statement provided at the top and generate the JSON object."#
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::stub::StubModel;
    use serde_json::json;

    fn encoder(model: StubModel) -> MemoryEncoder {
        MemoryEncoder::new(Arc::new(model))
    }

    #[tokio::test]
    async fn test_encode_full_response() {
        let encoder = encoder(StubModel::always(json!({
            "type": "Fact",
            "category": "Software",
            "subcategory": "Productivity Tool",
            "content": {
                "entities": ["Shram", "Magnet"],
                "relationship": "uses",
                "sentiment": "neutral"
            }
        })));

        let record = encoder
            .encode("I use Shram and Magnet as productivity tools.")
            .await
            .unwrap();

        assert_eq!(record.kind, MemoryKind::Fact);
        assert_eq!(record.category, "Software");
        assert_eq!(record.subcategory, "Productivity Tool");
        assert_eq!(record.content.entities, vec!["Shram", "Magnet"]);
        assert_eq!(record.content.relationship, "uses");
        assert_eq!(record.content.sentiment, Sentiment::Neutral);
        assert_eq!(
            record.source_text,
            "I use Shram and Magnet as productivity tools."
        );
        assert!(record.id.starts_with("m_"));
    }

    #[tokio::test]
    async fn test_encode_fills_defaults_for_missing_fields() {
        let encoder = encoder(StubModel::always(json!({})));

        let record = encoder.encode("My favorite color is blue.").await.unwrap();

        assert_eq!(record.kind, MemoryKind::Unknown);
        assert_eq!(record.category, "Unknown");
        assert_eq!(record.subcategory, "");
        assert!(record.content.entities.is_empty());
        assert_eq!(record.content.relationship, "unknown");
        assert_eq!(record.content.sentiment, Sentiment::Neutral);
    }

    #[tokio::test]
    async fn test_encode_unknown_kind_passes_through() {
        let encoder = encoder(StubModel::always(json!({
            "type": "Daydream",
            "category": "LifeGoal",
            "content": { "entities": ["sailing"], "relationship": "wants_to_learn" }
        })));

        let record = encoder.encode("Someday I want to learn sailing.").await.unwrap();
        assert_eq!(record.kind, MemoryKind::Unknown);
        assert_eq!(record.category, "LifeGoal");
    }

    #[tokio::test]
    async fn test_encode_none_when_model_fails() {
        let encoder = encoder(StubModel::failing());
        assert!(encoder.encode("I use Shram.").await.is_none());
    }

    #[tokio::test]
    async fn test_encode_none_when_response_not_object() {
        let encoder = encoder(StubModel::always(json!(["not", "an", "object"])));
        assert!(encoder.encode("I use Shram.").await.is_none());
    }

    #[tokio::test]
    async fn test_encode_none_when_content_not_object() {
        let encoder = encoder(StubModel::always(json!({
            "type": "Fact",
            "category": "Software",
            "content": "oops"
        })));
        assert!(encoder.encode("I use Shram.").await.is_none());
    }

    #[tokio::test]
    async fn test_encode_prompt_carries_statement() {
        let stub = Arc::new(StubModel::failing());
        let encoder = MemoryEncoder::new(stub.clone());
        let _ = encoder.encode("I am a project manager.").await;

        let prompts = stub.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("User statement: \"I am a project manager.\""));
        assert!(prompts[0].contains("\"entities\""));
        assert!(prompts[0].contains("\"sentiment\""));
    }
}
