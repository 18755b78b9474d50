use serde::{Deserialize, Serialize};

/// Highest sub-score the matcher may report.
const MAX_PURPOSE_SCORE: u8 = 10;
/// Points awarded per distinct purpose keyword found in the facility text.
const POINTS_PER_KEYWORD: u8 = 3;
/// Tokens shorter than this never count as keywords.
const MIN_TOKEN_LEN: usize = 3;

/// Filler words that would otherwise match almost any facility description.
const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "with", "from", "this", "that", "will", "our", "area", "use", "ang",
    "para", "mga",
];

/// Delegated purpose-to-facility keyword matcher. Reports a sub-score out
/// of ten; the heuristic scales it down before adding it to the relevance
/// score.
#[derive(Debug, Clone, Default)]
pub struct PurposeMatcher;

/// Outcome of one purpose/facility comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurposeMatch {
    pub score: u8,
    pub keywords: Vec<String>,
}

impl PurposeMatch {
    pub fn summary(&self) -> String {
        format!("purpose keywords matched: {}", self.keywords.join(", "))
    }
}

impl PurposeMatcher {
    /// Case-insensitive token overlap between the purpose and the facility
    /// text. `purpose` and `facility_text` are expected pre-lowercased by
    /// the caller; the matcher lowercases defensively anyway.
    pub fn match_purpose(&self, purpose: &str, facility_text: &str) -> PurposeMatch {
        let haystack = facility_text.to_lowercase();
        let mut keywords = Vec::new();
        let mut score: u8 = 0;

        for token in tokenize(purpose) {
            if score >= MAX_PURPOSE_SCORE {
                break;
            }
            if haystack.contains(&token) && !keywords.contains(&token) {
                score = (score + POINTS_PER_KEYWORD).min(MAX_PURPOSE_SCORE);
                keywords.push(token);
            }
        }

        PurposeMatch { score, keywords }
    }
}

fn tokenize(purpose: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for raw in purpose
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
    {
        if raw.len() < MIN_TOKEN_LEN || STOP_WORDS.contains(&raw) {
            continue;
        }
        let token = raw.to_string();
        if !tokens.contains(&token) {
            tokens.push(token);
        }
    }
    tokens
}
