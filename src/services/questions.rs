//! Stateless question planning for front ends that collect answers in bulk.

use crate::catalog::{Catalog, HazardDefinition};
use crate::domain::models::QuestionItem;
use crate::services::engine::Trigger;
use crate::services::tokenizer::ReportTokens;
use std::collections::HashSet;

fn item(h: &HazardDefinition, trigger: Trigger) -> QuestionItem {
    QuestionItem {
        code: h.code.clone(),
        question: h.question.clone(),
        trigger: trigger.to_string(),
    }
}

/// One question per hazard with at least one keyword in the report.
pub fn keyword_questions(catalog: &Catalog, tokens: &ReportTokens) -> Vec<QuestionItem> {
    catalog
        .hazards()
        .iter()
        .filter_map(|h| {
            h.keywords
                .iter()
                .find(|k| tokens.contains(k))
                .map(|k| item(h, Trigger::Keyword(k.clone())))
        })
        .collect()
}

/// One question per undecided hazard with a confirmed upstream hazard. Codes compare
/// case-insensitively.
pub fn upstream_questions(
    catalog: &Catalog,
    confirmed: &[String],
    rejected: &[String],
) -> Vec<QuestionItem> {
    let confirmed: HashSet<String> = confirmed.iter().map(|c| c.trim().to_lowercase()).collect();
    let rejected: HashSet<String> = rejected.iter().map(|c| c.trim().to_lowercase()).collect();
    catalog
        .hazards()
        .iter()
        .filter(|h| {
            let code = h.code.to_lowercase();
            !confirmed.contains(&code) && !rejected.contains(&code)
        })
        .filter_map(|h| {
            h.upstream_hazards
                .iter()
                .find(|u| confirmed.contains(&u.to_lowercase()))
                .map(|u| item(h, Trigger::Upstream(u.clone())))
        })
        .collect()
}

/// Definitions for the requested codes in request order; unknown codes are skipped.
pub fn hazards_by_code<'a>(catalog: &'a Catalog, codes: &[String]) -> Vec<&'a HazardDefinition> {
    let mut seen = HashSet::new();
    codes
        .iter()
        .filter_map(|c| catalog.get(c))
        .filter(|h| seen.insert(h.code.clone()))
        .collect()
}
