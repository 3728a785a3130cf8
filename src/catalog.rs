use crate::services::tokenizer::normalize_keywords;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct HazardDefinition {
    pub code: String,
    pub name: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub upstream_hazards: Vec<String>,
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Read-only hazard table. Row order is the evaluation order of the engine.
#[derive(Debug, Clone)]
pub struct Catalog {
    hazards: Vec<HazardDefinition>,
    by_code: HashMap<String, usize>,
    digest: String,
}

#[derive(thiserror::Error, Debug)]
pub enum CatalogLoadError {
    #[error("cannot read catalog {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed catalog: {0}")]
    Malformed(String),
    #[error("catalog row {row} is missing required column `{column}`")]
    MissingColumn { row: usize, column: &'static str },
    #[error("catalog row {row} has an empty hazard code")]
    EmptyCode { row: usize },
    #[error("duplicate hazard code: {0}")]
    DuplicateCode(String),
}

/// Canonical column name followed by the spreadsheet header it may also appear under.
const CODE: (&str, &str) = ("code", "Hazard_Code");
const NAME: (&str, &str) = ("name", "Hazard_Name");
const DESCRIPTION: (&str, &str) = ("description", "Hazard_Description");
const KEYWORDS: (&str, &str) = ("keywords", "Keywords");
const UPSTREAM: (&str, &str) = ("upstream_hazards", "Upstream_Hazards");
const QUESTION: (&str, &str) = ("question", "Questions");
const CATEGORY: (&str, &str) = ("category", "Hazard_Category");

fn column<'a>(
    row: &'a Map<String, Value>,
    idx: usize,
    (canonical, alias): (&'static str, &str),
) -> Result<&'a Value, CatalogLoadError> {
    row.get(canonical)
        .or_else(|| row.get(alias))
        .ok_or(CatalogLoadError::MissingColumn {
            row: idx,
            column: canonical,
        })
}

fn text(value: &Value, idx: usize, column: &str) -> Result<String, CatalogLoadError> {
    match value {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s.trim().to_string()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(CatalogLoadError::Malformed(format!(
            "row {}: column `{}` must be text, got {}",
            idx, column, other
        ))),
    }
}

fn split_upstream(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .map(|c| c.to_string())
        .collect()
}

fn parse_row(row: &Map<String, Value>, idx: usize) -> Result<HazardDefinition, CatalogLoadError> {
    let code = text(column(row, idx, CODE)?, idx, CODE.0)?;
    if code.is_empty() {
        return Err(CatalogLoadError::EmptyCode { row: idx });
    }
    let category = match row.get(CATEGORY.0).or_else(|| row.get(CATEGORY.1)) {
        Some(v) => Some(text(v, idx, CATEGORY.0)?).filter(|c| !c.is_empty()),
        None => None,
    };
    Ok(HazardDefinition {
        code,
        name: text(column(row, idx, NAME)?, idx, NAME.0)?,
        description: text(column(row, idx, DESCRIPTION)?, idx, DESCRIPTION.0)?,
        keywords: normalize_keywords(&text(column(row, idx, KEYWORDS)?, idx, KEYWORDS.0)?),
        upstream_hazards: split_upstream(&text(column(row, idx, UPSTREAM)?, idx, UPSTREAM.0)?),
        question: text(column(row, idx, QUESTION)?, idx, QUESTION.0)?,
        category,
    })
}

impl Catalog {
    pub fn load(path: &Path) -> Result<Self, CatalogLoadError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogLoadError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json_str(&raw)?;
        tracing::info!(
            path = %path.display(),
            hazards = catalog.len(),
            "loaded hazard catalog"
        );
        Ok(catalog)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, CatalogLoadError> {
        let rows: Vec<Map<String, Value>> = serde_json::from_str(raw)
            .map_err(|e| CatalogLoadError::Malformed(e.to_string()))?;
        let mut hazards = Vec::with_capacity(rows.len());
        for (idx, row) in rows.iter().enumerate() {
            hazards.push(parse_row(row, idx)?);
        }

        let mut by_code = HashMap::new();
        for (idx, h) in hazards.iter().enumerate() {
            if by_code.insert(h.code.to_lowercase(), idx).is_some() {
                return Err(CatalogLoadError::DuplicateCode(h.code.clone()));
            }
        }

        // Upstream references take the spelling of the code they point at.
        let spelled: Vec<String> = hazards.iter().map(|h| h.code.clone()).collect();
        for h in &mut hazards {
            for u in &mut h.upstream_hazards {
                if let Some(&idx) = by_code.get(&u.to_lowercase()) {
                    *u = spelled[idx].clone();
                }
            }
        }

        let mut hasher = Sha256::new();
        hasher.update(raw.as_bytes());
        let digest = hex::encode(hasher.finalize());

        let catalog = Self {
            hazards,
            by_code,
            digest,
        };
        for (code, upstream) in catalog.dangling_references() {
            tracing::debug!(%code, %upstream, "upstream reference not in catalog");
        }
        Ok(catalog)
    }

    pub fn hazards(&self) -> &[HazardDefinition] {
        &self.hazards
    }

    pub fn len(&self) -> usize {
        self.hazards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hazards.is_empty()
    }

    /// SHA-256 of the source text, used to pin saved sessions to the catalog they started on.
    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn get(&self, code: &str) -> Option<&HazardDefinition> {
        self.by_code
            .get(&code.trim().to_lowercase())
            .map(|&idx| &self.hazards[idx])
    }

    /// `(hazard, upstream)` pairs whose upstream code names no catalog entry.
    pub fn dangling_references(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        for h in &self.hazards {
            for u in &h.upstream_hazards {
                if self.get(u).is_none() {
                    out.push((h.code.clone(), u.clone()));
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::{Catalog, CatalogLoadError};
    use serde_json::json;

    fn catalog(rows: serde_json::Value) -> Result<Catalog, CatalogLoadError> {
        Catalog::from_json_str(&rows.to_string())
    }

    #[test]
    fn keywords_are_tokenized_lowercased_and_stripped_of_punctuation() {
        let c = catalog(json!([{
            "code": "FL01", "name": "Flood", "description": "d",
            "keywords": "Flood, flash-flood; INUNDATION !",
            "upstream_hazards": null, "question": "Was there a flood?"
        }]))
        .unwrap();
        assert_eq!(
            c.hazards()[0].keywords,
            vec!["flood", "flash", "inundation"]
        );
        assert!(c.hazards()[0].upstream_hazards.is_empty());
    }

    #[test]
    fn upstream_hazards_split_on_comma_in_order() {
        let c = catalog(json!([{
            "code": "LS01", "name": "Landslide", "description": "d",
            "keywords": null, "upstream_hazards": "MH0101, GH0301,MH0102",
            "question": "q"
        }]))
        .unwrap();
        assert!(c.hazards()[0].keywords.is_empty());
        assert_eq!(
            c.hazards()[0].upstream_hazards,
            vec!["MH0101", "GH0301", "MH0102"]
        );
    }

    #[test]
    fn spreadsheet_headers_are_accepted() {
        let c = catalog(json!([{
            "Hazard_Code": "GH0101", "Hazard_Name": "Earthquake",
            "Hazard_Description": "Ground shaking", "Keywords": "earthquake tremor",
            "Upstream_Hazards": "", "Questions": "Did the ground shake?",
            "Hazard_Category": "Geohazards"
        }]))
        .unwrap();
        let h = c.get("gh0101").expect("case-insensitive lookup");
        assert_eq!(h.name, "Earthquake");
        assert_eq!(h.category.as_deref(), Some("Geohazards"));
        assert_eq!(h.keywords, vec!["earthquake", "tremor"]);
    }

    #[test]
    fn missing_column_fails_load() {
        let err = catalog(json!([{
            "code": "H1", "name": "n", "description": "d", "keywords": "k"
        }]))
        .unwrap_err();
        assert!(matches!(
            err,
            CatalogLoadError::MissingColumn {
                row: 0,
                column: "upstream_hazards"
            }
        ));
    }

    #[test]
    fn duplicate_codes_fail_fast() {
        let row = json!({
            "code": "H1", "name": "n", "description": "d",
            "keywords": "", "upstream_hazards": "", "question": "q"
        });
        let mut lower = row.clone();
        lower["code"] = json!("h1");
        let err = catalog(json!([row, lower])).unwrap_err();
        assert!(matches!(err, CatalogLoadError::DuplicateCode(code) if code == "h1"));
    }

    #[test]
    fn non_array_source_is_malformed() {
        let err = Catalog::from_json_str("{\"code\": \"H1\"}").unwrap_err();
        assert!(matches!(err, CatalogLoadError::Malformed(_)));
    }

    #[test]
    fn empty_code_is_rejected() {
        let err = catalog(json!([{
            "code": " ", "name": "n", "description": "d",
            "keywords": "", "upstream_hazards": "", "question": "q"
        }]))
        .unwrap_err();
        assert!(matches!(err, CatalogLoadError::EmptyCode { row: 0 }));
    }

    #[test]
    fn dangling_upstream_references_are_reported_not_fatal() {
        let c = catalog(json!([{
            "code": "H2", "name": "n", "description": "d",
            "keywords": "", "upstream_hazards": "H1, H9", "question": "q"
        }, {
            "code": "H1", "name": "n", "description": "d",
            "keywords": "", "upstream_hazards": "", "question": "q"
        }]))
        .unwrap();
        assert_eq!(
            c.dangling_references(),
            vec![("H2".to_string(), "H9".to_string())]
        );
    }

    #[test]
    fn upstream_codes_take_the_catalog_spelling() {
        let c = catalog(json!([{
            "code": "H1", "name": "n", "description": "d",
            "keywords": "fire", "upstream_hazards": "", "question": "q"
        }, {
            "code": "H2", "name": "n", "description": "d",
            "keywords": "", "upstream_hazards": "h1, zz9", "question": "q"
        }]))
        .unwrap();
        assert_eq!(c.hazards()[1].upstream_hazards, vec!["H1", "zz9"]);
        assert_eq!(
            c.dangling_references(),
            vec![("H2".to_string(), "zz9".to_string())]
        );
    }

    #[test]
    fn unreadable_path_is_a_load_error() {
        let err = Catalog::load(std::path::Path::new("/nonexistent/hazards.json")).unwrap_err();
        assert!(matches!(err, CatalogLoadError::Unreadable { .. }));
    }
}
