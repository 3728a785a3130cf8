use crate::*;

fn validate_catalog(catalog: &Catalog) -> CatalogReport {
    let mut issues: Vec<CatalogIssue> = catalog
        .dangling_references()
        .into_iter()
        .map(|(code, upstream)| CatalogIssue {
            code,
            status: "dangling_upstream".to_string(),
            detail: upstream,
        })
        .collect();
    for h in catalog.hazards() {
        if h.keywords.is_empty() && h.upstream_hazards.is_empty() {
            issues.push(CatalogIssue {
                code: h.code.clone(),
                status: "never_asked".to_string(),
                detail: "no keywords and no upstream hazards".to_string(),
            });
        }
    }
    CatalogReport {
        overall: if issues.is_empty() { "ok" } else { "warnings" }.to_string(),
        hazards: catalog.len(),
        digest: catalog.digest().to_string(),
        issues,
    }
}

pub fn handle_catalog_commands(ctx: &Context, command: &CatalogCommands) -> anyhow::Result<()> {
    let catalog = ctx.load_catalog()?;
    match command {
        CatalogCommands::List => {
            print_out(ctx.json, catalog.hazards(), |h| {
                format!("{}\t{}", h.code, h.name)
            })?;
        }
        CatalogCommands::Show { codes } => {
            let found = hazards_by_code(&catalog, codes);
            print_out(ctx.json, &found, |h| {
                let mut lines = vec![
                    format!("code: {}", h.code),
                    format!("name: {}", h.name),
                    format!("question: {}", h.question),
                    format!("description: {}", h.description),
                ];
                if !h.keywords.is_empty() {
                    lines.push(format!("keywords: {}", h.keywords.join(", ")));
                }
                if !h.upstream_hazards.is_empty() {
                    lines.push(format!("upstream: {}", h.upstream_hazards.join(", ")));
                }
                lines.join("\n")
            })?;
        }
        CatalogCommands::Validate => {
            let report = validate_catalog(&catalog);
            print_one(ctx.json, report, |r| {
                let mut lines = vec![
                    format!("overall: {}", r.overall),
                    format!("hazards: {}", r.hazards),
                ];
                for i in &r.issues {
                    lines.push(format!("{}\t{}\t{}", i.code, i.status, i.detail));
                }
                lines.join("\n")
            })?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::validate_catalog;
    use crate::catalog::Catalog;
    use serde_json::json;

    #[test]
    fn validation_flags_dangling_and_unreachable_hazards() {
        let c = Catalog::from_json_str(
            &json!([
                {"code": "A", "name": "a", "description": "", "keywords": "fire",
                 "upstream_hazards": "ZZ", "question": "q"},
                {"code": "B", "name": "b", "description": "", "keywords": null,
                 "upstream_hazards": null, "question": "q"}
            ])
            .to_string(),
        )
        .unwrap();
        let r = validate_catalog(&c);
        assert_eq!(r.overall, "warnings");
        let statuses: Vec<_> = r.issues.iter().map(|i| (i.code.as_str(), i.status.as_str())).collect();
        assert_eq!(statuses, [("A", "dangling_upstream"), ("B", "never_asked")]);
    }
}
