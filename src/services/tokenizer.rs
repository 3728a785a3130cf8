use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

/// Lowercased word tokens of one report, in order and with duplicates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct ReportTokens {
    tokens: Vec<String>,
    lookup: HashSet<String>,
}

impl From<Vec<String>> for ReportTokens {
    fn from(tokens: Vec<String>) -> Self {
        let lookup = tokens.iter().cloned().collect();
        Self { tokens, lookup }
    }
}

impl From<ReportTokens> for Vec<String> {
    fn from(t: ReportTokens) -> Self {
        t.tokens
    }
}

impl PartialEq for ReportTokens {
    fn eq(&self, other: &Self) -> bool {
        self.tokens == other.tokens
    }
}

impl ReportTokens {
    pub fn as_slice(&self) -> &[String] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.lookup.contains(&word.to_lowercase())
    }
}

/// Splits on Unicode (UAX #29) word boundaries. Runs of punctuation and whitespace
/// never form a token; hyphens split words while in-word apostrophes do not.
pub fn tokenize(raw: &str) -> ReportTokens {
    raw.unicode_words()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .into()
}

/// Keyword cell normalization: same boundaries as reports, first occurrence wins.
pub fn normalize_keywords(raw: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    tokenize(raw)
        .tokens
        .into_iter()
        .filter(|k| seen.insert(k.clone()))
        .collect()
}
