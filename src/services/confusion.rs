use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// "Often confused with" pairs, as produced by an external similarity service.
/// Pairs are unordered: listing B under A also relates A to B.
#[derive(Debug, Default, Clone)]
pub struct ConfusionMap {
    related: BTreeMap<String, BTreeSet<String>>,
}

impl ConfusionMap {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let pairs: BTreeMap<String, Vec<String>> = serde_json::from_str(&raw)?;
        Ok(Self::from_pairs(pairs))
    }

    pub fn from_pairs(pairs: BTreeMap<String, Vec<String>>) -> Self {
        let mut related: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (code, others) in pairs {
            for other in others {
                if other == code {
                    continue;
                }
                related
                    .entry(code.clone())
                    .or_default()
                    .insert(other.clone());
                related.entry(other).or_default().insert(code.clone());
            }
        }
        Self { related }
    }

    pub fn related(&self, code: &str) -> Vec<String> {
        self.related
            .get(code)
            .map(|s| s.iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::ConfusionMap;
    use std::collections::BTreeMap;

    #[test]
    fn pairs_are_symmetric_and_deduplicated() {
        let mut pairs = BTreeMap::new();
        pairs.insert("FL01".to_string(), vec!["FL02".to_string(), "FL01".to_string()]);
        pairs.insert("FL02".to_string(), vec!["FL01".to_string(), "ST01".to_string()]);
        let m = ConfusionMap::from_pairs(pairs);
        assert_eq!(m.related("FL01"), vec!["FL02"]);
        assert_eq!(m.related("FL02"), vec!["FL01", "ST01"]);
        assert_eq!(m.related("ST01"), vec!["FL02"]);
        assert!(m.related("XX").is_empty());
    }
}
