//! Context Extractor: five independent slot extractors run once per message.
//!
//! Location, role, skills and company are detected by case-insensitive
//! substring matching against the vocabularies the store currently holds.
//! The experience bucket is purely pattern-based.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::chat::collaborators::{Vocabulary, VocabularySource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExperienceBucket {
    #[serde(rename = "fresher")]
    Fresher,
    #[serde(rename = "0-2 years")]
    Junior,
    #[serde(rename = "2-5 years")]
    MidLevel,
    #[serde(rename = "5+ years")]
    Senior,
}

impl ExperienceBucket {
    pub fn label(&self) -> &'static str {
        match self {
            ExperienceBucket::Fresher => "fresher",
            ExperienceBucket::Junior => "0-2 years",
            ExperienceBucket::MidLevel => "2-5 years",
            ExperienceBucket::Senior => "5+ years",
        }
    }

    /// Representative years of experience handed to collaborators.
    pub fn representative_years(&self) -> i32 {
        match self {
            ExperienceBucket::Fresher => 0,
            ExperienceBucket::Junior => 1,
            ExperienceBucket::MidLevel => 3,
            ExperienceBucket::Senior => 6,
        }
    }
}

/// Slot values found in one message. Every field is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedContext {
    pub location: Option<String>,
    pub role: Option<String>,
    pub experience: Option<ExperienceBucket>,
    pub skills: Vec<String>,
    pub company: Option<String>,
}

impl ExtractedContext {
    pub fn experience_years(&self) -> i32 {
        self.experience
            .map(|b| b.representative_years())
            .unwrap_or(0)
    }
}

// Bucket order matters: "0-2 years" hits `fresher` through the bare `0`.
const EXPERIENCE_TABLE: &[(ExperienceBucket, &str)] = &[
    (
        ExperienceBucket::Fresher,
        r"\b(?:fresher|recent graduate|0|no experience|entry level)\b",
    ),
    (ExperienceBucket::Junior, r"\b(?:0-2|1-2|2 years?|junior)\b"),
    (ExperienceBucket::MidLevel, r"\b(?:2-5|3-5|mid level|mid-level)\b"),
    (
        ExperienceBucket::Senior,
        r"\b(?:5\+|5-8|8\+|senior|lead|principal)\b",
    ),
];

static EXPERIENCE_PATTERNS: LazyLock<Vec<(ExperienceBucket, Regex)>> = LazyLock::new(|| {
    EXPERIENCE_TABLE
        .iter()
        .map(|(bucket, pattern)| {
            let re = RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .expect("experience patterns are static and valid");
            (*bucket, re)
        })
        .collect()
});

pub fn extract_experience(message: &str) -> Option<ExperienceBucket> {
    EXPERIENCE_PATTERNS
        .iter()
        .find(|(_, re)| re.is_match(message))
        .map(|(bucket, _)| *bucket)
}

/// First value (in the given order) whose lowercase form occurs in `message`.
/// Returns the value with its original casing. Empty values never match.
pub fn first_mentioned(values: &[String], message: &str) -> Option<String> {
    let message = message.to_lowercase();
    values
        .iter()
        .find(|v| mentions(&message, v))
        .cloned()
}

/// Every value whose lowercase form occurs in `message`, de-duplicated, in order.
pub fn all_mentioned(values: &[String], message: &str) -> Vec<String> {
    let message = message.to_lowercase();
    let mut found: Vec<String> = Vec::new();
    for value in values {
        if mentions(&message, value) && !found.contains(value) {
            found.push(value.clone());
        }
    }
    found
}

fn mentions(message_lower: &str, value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && message_lower.contains(&value.to_lowercase())
}

/// Runs all five extractors. A vocabulary that cannot be fetched leaves its
/// field empty and does not affect the other fields.
pub async fn extract_context(message: &str, vocabulary: &dyn VocabularySource) -> ExtractedContext {
    let location = lookup(vocabulary, Vocabulary::Locations)
        .await
        .and_then(|values| first_mentioned(&values, message));
    let role = lookup(vocabulary, Vocabulary::Roles)
        .await
        .and_then(|values| first_mentioned(&values, message));
    let experience = extract_experience(message);
    let skills = lookup(vocabulary, Vocabulary::Skills)
        .await
        .map(|values| all_mentioned(&values, message))
        .unwrap_or_default();
    let company = lookup(vocabulary, Vocabulary::Companies)
        .await
        .and_then(|values| first_mentioned(&values, message));

    ExtractedContext {
        location,
        role,
        experience,
        skills,
        company,
    }
}

async fn lookup(vocabulary: &dyn VocabularySource, kind: Vocabulary) -> Option<Vec<String>> {
    match vocabulary.distinct(kind).await {
        Ok(values) => Some(values),
        Err(e) => {
            warn!("Could not load {kind} vocabulary, leaving slot empty: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::test_support::FakeVocabulary;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_location_match_preserves_store_casing() {
        let locations = strings(&["Bangalore", "Pune"]);
        assert_eq!(
            first_mentioned(&locations, "jobs in bangalore"),
            Some("Bangalore".to_string())
        );
    }

    #[test]
    fn test_first_value_in_store_order_wins() {
        let locations = strings(&["Pune", "Bangalore"]);
        assert_eq!(
            first_mentioned(&locations, "bangalore or pune"),
            Some("Pune".to_string())
        );
    }

    #[test]
    fn test_empty_store_values_never_match() {
        let values = strings(&["", "  "]);
        assert_eq!(first_mentioned(&values, "anything"), None);
        assert!(all_mentioned(&values, "anything").is_empty());
    }

    #[test]
    fn test_substring_matching_accepts_false_positives() {
        // "Goa" sits inside "goal"; substring matching reports it anyway.
        let locations = strings(&["Goa"]);
        assert_eq!(
            first_mentioned(&locations, "my goal is a new role"),
            Some("Goa".to_string())
        );
    }

    #[test]
    fn test_all_skills_are_collected_once() {
        let skills = strings(&["Python", "SQL", "Java", "SQL"]);
        assert_eq!(
            all_mentioned(&skills, "python and sql roles"),
            strings(&["Python", "SQL"])
        );
    }

    #[test]
    fn test_experience_buckets() {
        assert_eq!(extract_experience("i am a fresher"), Some(ExperienceBucket::Fresher));
        assert_eq!(extract_experience("junior developer"), Some(ExperienceBucket::Junior));
        assert_eq!(extract_experience("i have 2 years"), Some(ExperienceBucket::Junior));
        assert_eq!(extract_experience("mid-level engineer"), Some(ExperienceBucket::MidLevel));
        assert_eq!(extract_experience("3-5 years in qa"), Some(ExperienceBucket::MidLevel));
        assert_eq!(extract_experience("senior architect"), Some(ExperienceBucket::Senior));
        assert_eq!(extract_experience("looking for work"), None);
    }

    #[test]
    fn test_zero_to_two_years_hits_fresher_first() {
        assert_eq!(extract_experience("0-2 years"), Some(ExperienceBucket::Fresher));
    }

    #[test]
    fn test_bucket_labels_serialize_verbatim() {
        let json = serde_json::to_string(&ExperienceBucket::Senior).unwrap();
        assert_eq!(json, "\"5+ years\"");
        assert_eq!(ExperienceBucket::Junior.label(), "0-2 years");
    }

    #[test]
    fn test_experience_years_mapping() {
        let mut ctx = ExtractedContext::default();
        assert_eq!(ctx.experience_years(), 0);
        ctx.experience = Some(ExperienceBucket::MidLevel);
        assert_eq!(ctx.experience_years(), 3);
        ctx.experience = Some(ExperienceBucket::Senior);
        assert_eq!(ctx.experience_years(), 6);
    }

    #[tokio::test]
    async fn test_extract_context_fills_all_slots() {
        let vocab = FakeVocabulary::standard();
        let ctx = extract_context("senior data scientist python jobs at infosys in pune", &vocab).await;
        assert_eq!(ctx.location.as_deref(), Some("Pune"));
        assert_eq!(ctx.role.as_deref(), Some("Data Scientist"));
        assert_eq!(ctx.experience, Some(ExperienceBucket::Senior));
        assert_eq!(ctx.skills, vec!["Python".to_string()]);
        assert_eq!(ctx.company.as_deref(), Some("Infosys"));
    }

    #[tokio::test]
    async fn test_failing_vocabulary_degrades_only_that_slot() {
        let vocab = FakeVocabulary::standard().failing(Vocabulary::Locations);
        let ctx = extract_context("data scientist jobs in pune for a fresher", &vocab).await;
        assert_eq!(ctx.location, None);
        assert_eq!(ctx.role.as_deref(), Some("Data Scientist"));
        assert_eq!(ctx.experience, Some(ExperienceBucket::Fresher));
    }

    #[tokio::test]
    async fn test_extraction_is_idempotent() {
        let vocab = FakeVocabulary::standard();
        let msg = "python developer roles in bangalore";
        let first = extract_context(msg, &vocab).await;
        let second = extract_context(msg, &vocab).await;
        assert_eq!(first, second);
    }
}
