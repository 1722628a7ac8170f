use crate::types::VideoMetadata;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Fixed vocabulary of learning-related keywords, matched case-insensitively
/// as substrings of title + description.
pub const TOPIC_VOCABULARY: &[&str] = &[
    "tutorial",
    "course",
    "lesson",
    "lecture",
    "learn",
    "education",
    "how to",
    "explained",
    "programming",
    "python",
    "rust",
    "javascript",
    "algorithm",
    "data structures",
    "machine learning",
    "math",
    "physics",
    "chemistry",
    "biology",
    "history",
    "science",
];

/// Anything longer than this is treated as long-form content and accepted
/// even without a keyword match.
pub const EDUCATIONAL_DURATION_FLOOR_SECS: u32 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub is_educational: bool,
    pub matched_topics: BTreeSet<String>,
}

pub fn match_topics(metadata: &VideoMetadata) -> BTreeSet<String> {
    let haystack = format!(
        "{} {}",
        metadata.title,
        metadata.description.as_deref().unwrap_or_default()
    )
    .to_lowercase();

    TOPIC_VOCABULARY
        .iter()
        .filter(|keyword| haystack.contains(*keyword))
        .map(|keyword| keyword.to_string())
        .collect()
}

/// Permissive heuristic: a keyword hit or long-form duration is enough.
/// There are no ground-truth labels, so false positives are preferred
/// over false negatives.
pub fn classify(metadata: &VideoMetadata) -> Classification {
    let matched_topics = match_topics(metadata);
    let long_form = metadata
        .duration_seconds
        .is_some_and(|d| d > EDUCATIONAL_DURATION_FLOOR_SECS);

    Classification {
        is_educational: !matched_topics.is_empty() || long_form,
        matched_topics,
    }
}
