//! Memory record data types
//!
//! A `MemoryRecord` is one structured fact, preference, or objective
//! extracted from a single user statement. Records are produced by the
//! encoder (or by synthesis) and consumed by the weaver; the original
//! statement travels with the record as `source_text` and is the atomic unit
//! retrieval hands back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Classification of a memory record.
///
/// Open to extension: values the classifier invents that are not listed here
/// deserialize as [`MemoryKind::Unknown`] rather than failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MemoryKind {
    /// Something the user likes or prefers
    Preference,
    /// A plain statement of fact
    Fact,
    /// A goal the user wants to reach
    Objective,
    /// A personal attribute of the user
    PersonalDetail,
    /// A derived memory produced by synthesis, not stated directly
    Insight,
    /// Anything the classifier produced that is not recognized
    Unknown,
}

impl Default for MemoryKind {
    fn default() -> Self {
        Self::Unknown
    }
}

impl<'de> Deserialize<'de> for MemoryKind {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(match value.as_str() {
            "Preference" => Self::Preference,
            "Fact" => Self::Fact,
            "Objective" => Self::Objective,
            "PersonalDetail" => Self::PersonalDetail,
            "Insight" => Self::Insight,
            _ => Self::Unknown,
        })
    }
}

/// Sentiment of the user toward the entities of a memory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    /// Favorable
    Positive,
    /// Unfavorable
    Negative,
    /// Neither, or unrecognized classifier output
    Neutral,
}

impl Default for Sentiment {
    fn default() -> Self {
        Self::Neutral
    }
}

impl<'de> Deserialize<'de> for Sentiment {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(match value.as_str() {
            "positive" => Self::Positive,
            "negative" => Self::Negative,
            _ => Self::Neutral,
        })
    }
}

/// Structured payload of a memory record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordContent {
    /// Entity names the statement mentions, in statement order; may be empty
    pub entities: Vec<String>,
    /// Verb phrase describing how the user relates to the entities
    pub relationship: String,
    /// The user's sentiment toward the entities
    pub sentiment: Sentiment,
}

/// One structured memory derived from a user statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryRecord {
    /// Opaque unique id, assigned at creation and never reused
    pub id: String,
    /// Creation time
    pub timestamp: DateTime<Utc>,
    /// The original natural-language statement
    pub source_text: String,
    /// Classification of the memory
    pub kind: MemoryKind,
    /// Topical label, e.g. "Software" or "Food"; may be empty
    pub category: String,
    /// Finer-grained label; empty when absent
    pub subcategory: String,
    /// Structured payload
    pub content: RecordContent,
}

impl MemoryRecord {
    /// Create a record for an encoded statement with a fresh id and timestamp
    pub fn new(
        source_text: impl Into<String>,
        kind: MemoryKind,
        category: impl Into<String>,
        subcategory: impl Into<String>,
        content: RecordContent,
    ) -> Self {
        Self {
            id: format!("m_{}", Uuid::new_v4()),
            timestamp: Utc::now(),
            source_text: source_text.into(),
            kind,
            category: category.into(),
            subcategory: subcategory.into(),
            content,
        }
    }

    /// Create a synthesized insight record over a group of entities.
    ///
    /// Insights are derived, not stated: the relationship is always
    /// `has_pattern` with neutral sentiment, and the insight sentence itself
    /// becomes the source text.
    pub fn insight(
        insight_text: impl Into<String>,
        category: impl Into<String>,
        entities: Vec<String>,
    ) -> Self {
        Self {
            id: format!("m_insight_{}", Uuid::new_v4()),
            timestamp: Utc::now(),
            source_text: insight_text.into(),
            kind: MemoryKind::Insight,
            category: category.into(),
            subcategory: String::new(),
            content: RecordContent {
                entities,
                relationship: "has_pattern".to_string(),
                sentiment: Sentiment::Neutral,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_id_prefix() {
        let record = MemoryRecord::new(
            "I use Shram.",
            MemoryKind::Fact,
            "Software",
            "",
            RecordContent {
                entities: vec!["Shram".to_string()],
                relationship: "uses".to_string(),
                sentiment: Sentiment::Neutral,
            },
        );
        assert!(record.id.starts_with("m_"));
        assert!(!record.id.starts_with("m_insight_"));
    }

    #[test]
    fn test_records_get_unique_ids() {
        let content = RecordContent {
            entities: vec![],
            relationship: "uses".to_string(),
            sentiment: Sentiment::Neutral,
        };
        let a = MemoryRecord::new("a", MemoryKind::Fact, "Software", "", content.clone());
        let b = MemoryRecord::new("b", MemoryKind::Fact, "Software", "", content);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_insight_record_shape() {
        let record = MemoryRecord::insight(
            "The user relies on several productivity tools.",
            "Software",
            vec!["Shram".to_string(), "Magnet".to_string()],
        );
        assert!(record.id.starts_with("m_insight_"));
        assert_eq!(record.kind, MemoryKind::Insight);
        assert_eq!(record.category, "Software");
        assert_eq!(record.subcategory, "");
        assert_eq!(record.content.relationship, "has_pattern");
        assert_eq!(record.content.sentiment, Sentiment::Neutral);
        assert_eq!(record.content.entities.len(), 2);
    }

    #[test]
    fn test_memory_kind_unknown_values_pass_through() {
        let kind: MemoryKind = serde_json::from_str("\"Rumor\"").unwrap();
        assert_eq!(kind, MemoryKind::Unknown);
        assert_eq!(serde_json::to_string(&kind).unwrap(), "\"Unknown\"");
    }

    #[test]
    fn test_memory_kind_known_values() {
        for (json, kind) in [
            ("\"Preference\"", MemoryKind::Preference),
            ("\"Fact\"", MemoryKind::Fact),
            ("\"Objective\"", MemoryKind::Objective),
            ("\"PersonalDetail\"", MemoryKind::PersonalDetail),
            ("\"Insight\"", MemoryKind::Insight),
        ] {
            let parsed: MemoryKind = serde_json::from_str(json).unwrap();
            assert_eq!(parsed, kind);
            assert_eq!(serde_json::to_string(&kind).unwrap(), json);
        }
    }

    #[test]
    fn test_sentiment_lowercase_and_fallback() {
        let positive: Sentiment = serde_json::from_str("\"positive\"").unwrap();
        assert_eq!(positive, Sentiment::Positive);
        assert_eq!(serde_json::to_string(&positive).unwrap(), "\"positive\"");

        let odd: Sentiment = serde_json::from_str("\"ecstatic\"").unwrap();
        assert_eq!(odd, Sentiment::Neutral);
    }

    #[test]
    fn test_record_serialization_round_trip() {
        let record = MemoryRecord::new(
            "I am a project manager at a tech company.",
            MemoryKind::PersonalDetail,
            "Work",
            "",
            RecordContent {
                entities: vec!["project manager".to_string()],
                relationship: "is".to_string(),
                sentiment: Sentiment::Neutral,
            },
        );
        let json = serde_json::to_string(&record).unwrap();
        let parsed: MemoryRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
        // Field naming follows the record schema, not Rust convention
        assert!(json.contains("\"sourceText\""));
    }
}
