use crate::catalog::{Catalog, HazardDefinition};
use crate::domain::models::{
    ClassificationReport, ExportedClassification, HazardEntry, InvalidInput, TranscriptEntry,
};
use crate::services::confusion::ConfusionMap;
use crate::services::engine::ClassificationState;

fn entry(h: &HazardDefinition, confusion: Option<&ConfusionMap>) -> HazardEntry {
    HazardEntry {
        code: h.code.clone(),
        name: h.name.clone(),
        often_confused_with: confusion.map(|c| c.related(&h.code)).unwrap_or_default(),
    }
}

fn entries(
    catalog: &Catalog,
    confusion: Option<&ConfusionMap>,
    decided: impl Fn(&str) -> bool,
) -> Vec<HazardEntry> {
    catalog
        .hazards()
        .iter()
        .filter(|h| decided(&h.code))
        .map(|h| entry(h, confusion))
        .collect()
}

/// Confirmed and rejected hazards in catalog order. Codes the catalog does not know are dropped.
pub fn build_report(
    catalog: &Catalog,
    state: &ClassificationState,
    transcript: Vec<TranscriptEntry>,
    passes: u32,
    complete: bool,
    confusion: Option<&ConfusionMap>,
) -> ClassificationReport {
    for code in state.confirmed().iter().chain(state.rejected()) {
        if catalog.get(code).is_none() {
            tracing::warn!(%code, "decided code not in catalog, omitted from report");
        }
    }
    ClassificationReport {
        complete,
        passes,
        confirmed: entries(catalog, confusion, |c| state.is_confirmed(c)),
        rejected: entries(catalog, confusion, |c| state.is_rejected(c)),
        transcript,
    }
}

pub fn export(report: &ClassificationReport) -> ExportedClassification {
    ExportedClassification {
        confirmed: report.confirmed.clone(),
        rejected: report.rejected.clone(),
    }
}

/// Accepts a bare export or the `{"ok": true, "data": ...}` envelope printed by `--json`.
pub fn parse_export(raw: &str) -> anyhow::Result<ExportedClassification> {
    let mut value: serde_json::Value = serde_json::from_str(raw)
        .map_err(|e| InvalidInput(format!("seed is not valid JSON: {}", e)))?;
    if let Some(data) = value.get_mut("data") {
        value = data.take();
    }
    if let Some(report) = value.get_mut("report").filter(|r| !r.is_null()) {
        value = report.take();
    }
    Ok(serde_json::from_value(value)
        .map_err(|e| InvalidInput(format!("seed is not a classification export: {}", e)))?)
}

/// Seeds a fresh state from an export. Codes take the catalog's spelling; codes the catalog
/// does not know are dropped with a warning.
pub fn import(
    catalog: &Catalog,
    export: &ExportedClassification,
) -> anyhow::Result<ClassificationState> {
    let resolve = |entries: &[HazardEntry]| -> Vec<String> {
        entries
            .iter()
            .filter_map(|e| match catalog.get(&e.code) {
                Some(h) => Some(h.code.clone()),
                None => {
                    tracing::warn!(code = %e.code, "seeded code not in catalog, ignored");
                    None
                }
            })
            .collect()
    };
    ClassificationState::seeded(resolve(&export.confirmed[..]), resolve(&export.rejected[..]))
        .map_err(|e| InvalidInput(e).into())
}

pub fn render_text(report: &ClassificationReport) -> String {
    let mut out = Vec::new();
    if !report.complete {
        out.push("(incomplete run)".to_string());
    }
    if report.confirmed.is_empty() {
        out.push("no hazards identified".to_string());
    }
    for e in &report.confirmed {
        let mut line = format!("{}\t{}", e.code, e.name);
        if !e.often_confused_with.is_empty() {
            line.push_str(&format!(
                "\toften confused with: {}",
                e.often_confused_with.join(", ")
            ));
        }
        out.push(line);
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn catalog() -> Catalog {
        let rows: Vec<_> = ["C3", "A1", "B2"]
            .iter()
            .map(|c| {
                json!({"code": c, "name": format!("Name {}", c), "description": "",
                       "keywords": "", "upstream_hazards": "", "question": "q"})
            })
            .collect();
        Catalog::from_json_str(&serde_json::Value::Array(rows).to_string()).unwrap()
    }

    fn state() -> ClassificationState {
        ClassificationState::seeded(
            vec!["B2".to_string(), "C3".to_string(), "ZZ".to_string()],
            vec!["A1".to_string()],
        )
        .unwrap()
    }

    #[test]
    fn report_follows_catalog_order_and_drops_unknown_codes() {
        let r = build_report(&catalog(), &state(), vec![], 3, true, None);
        let codes: Vec<_> = r.confirmed.iter().map(|e| e.code.as_str()).collect();
        assert_eq!(codes, ["C3", "B2"]);
        assert_eq!(r.rejected[0].name, "Name A1");
    }

    #[test]
    fn confusion_decoration_is_optional() {
        let mut pairs = BTreeMap::new();
        pairs.insert("C3".to_string(), vec!["A1".to_string()]);
        let m = ConfusionMap::from_pairs(pairs);
        let r = build_report(&catalog(), &state(), vec![], 3, true, Some(&m));
        assert_eq!(r.confirmed[0].often_confused_with, vec!["A1"]);
        assert!(r.confirmed[1].often_confused_with.is_empty());
        assert!(render_text(&r).contains("often confused with: A1"));
    }

    #[test]
    fn export_round_trips_into_fresh_state() {
        let c = catalog();
        let original = ClassificationState::seeded(
            vec!["B2".to_string(), "C3".to_string()],
            vec!["A1".to_string()],
        )
        .unwrap();
        let report = build_report(&c, &original, vec![], 3, true, None);
        let raw = serde_json::to_string(&json!({"ok": true, "data": report})).unwrap();
        let restored = import(&c, &parse_export(&raw).unwrap()).unwrap();
        assert_eq!(restored, original);

        let bare = serde_json::to_string(&export(&report)).unwrap();
        assert_eq!(import(&c, &parse_export(&bare).unwrap()).unwrap(), original);
    }

    #[test]
    fn overlapping_export_is_invalid_input() {
        let raw = r#"{"confirmed":[{"code":"A1","name":"x"}],"rejected":[{"code":"A1","name":"x"}]}"#;
        let err = import(&catalog(), &parse_export(raw).unwrap()).unwrap_err();
        assert!(err.downcast_ref::<InvalidInput>().is_some());
    }

    #[test]
    fn import_takes_catalog_spelling_and_drops_unknown_codes() {
        let raw = r#"{"confirmed":[{"code":"b2","name":"x"},{"code":"zz","name":"x"}],"rejected":[]}"#;
        let st = import(&catalog(), &parse_export(raw).unwrap()).unwrap();
        assert!(st.is_confirmed("B2"));
        assert_eq!(st.confirmed().len(), 1);

        let raw = r#"{"confirmed":[{"code":"a1","name":"x"}],"rejected":[{"code":"A1","name":"x"}]}"#;
        let err = import(&catalog(), &parse_export(raw).unwrap()).unwrap_err();
        assert!(err.downcast_ref::<InvalidInput>().is_some());
    }

    #[test]
    fn empty_report_text() {
        let r = build_report(
            &catalog(),
            &ClassificationState::default(),
            vec![],
            3,
            false,
            None,
        );
        assert_eq!(render_text(&r), "(incomplete run)\nno hazards identified");
    }
}
