use crate::*;
use std::path::Path;

fn read_report(input: &ReportInput) -> anyhow::Result<String> {
    match (&input.text, &input.report) {
        (Some(text), _) => Ok(text.clone()),
        (None, Some(path)) => std::fs::read_to_string(path).map_err(|e| {
            InvalidInput(format!("cannot read report {}: {}", path.display(), e)).into()
        }),
        (None, None) => Err(InvalidInput("a report is required".to_string()).into()),
    }
}

fn load_seed(path: Option<&Path>, catalog: &Catalog) -> anyhow::Result<ClassificationState> {
    let Some(path) = path else {
        return Ok(ClassificationState::default());
    };
    let raw = std::fs::read_to_string(path)
        .map_err(|e| InvalidInput(format!("cannot read seed {}: {}", path.display(), e)))?;
    import(catalog, &parse_export(&raw)?)
}

fn view(
    id: &str,
    catalog: &Catalog,
    session: &Session<'_>,
    step: Step,
    confusion: Option<&ConfusionMap>,
) -> SessionView {
    match step {
        Step::Ask(q) => SessionView {
            session: id.to_string(),
            question: Some(q),
            report: None,
        },
        Step::Done => SessionView {
            session: id.to_string(),
            question: None,
            report: Some(build_report(
                catalog,
                session.state(),
                session.transcript().to_vec(),
                session.passes(),
                session.is_finished(),
                confusion,
            )),
        },
    }
}

fn render_view(v: &SessionView) -> String {
    match (&v.question, &v.report) {
        (Some(q), _) => {
            let mut lines = vec![format!("session {}", v.session)];
            match (q.mode, &q.detail) {
                (AnswerMode::Binary, Some(detail)) => {
                    lines.push(detail.clone());
                    lines.push("(y/n)".to_string());
                }
                _ => {
                    lines.push(format!("[{}] {}", q.trigger, q.code));
                    lines.push(format!("{} - {}", q.text, q.name));
                    lines.push("(y/n/d/r)".to_string());
                }
            }
            lines.join("\n")
        }
        (None, Some(report)) => format!("session {} finished\n{}", v.session, render_text(report)),
        (None, None) => format!("session {}", v.session),
    }
}

/// Loads a saved session's catalog and refuses it if the file changed underneath.
fn open_session(id: &str) -> anyhow::Result<(SavedSession, Catalog, Option<ConfusionMap>)> {
    let saved = load_session(id)?;
    let catalog = Catalog::load(&saved.catalog_path)?;
    if catalog.digest() != saved.catalog_digest {
        return Err(SessionError::CatalogChanged(id.to_string()).into());
    }
    let confusion = saved
        .confusion_path
        .as_deref()
        .map(ConfusionMap::load)
        .transpose()?;
    Ok((saved, catalog, confusion))
}

pub fn handle_runtime_commands(ctx: &Context, command: &Commands) -> anyhow::Result<()> {
    match command {
        Commands::Run {
            input,
            engine,
            answers,
            export_to,
        } => {
            let text = read_report(input)?;
            let catalog = ctx.load_catalog()?;
            let confusion = ctx.load_confusion()?;
            let policy = pass_policy(&ctx.config, engine.passes, engine.until_stable)?;
            let seed = load_seed(engine.seed.as_deref(), &catalog)?;
            let tokens = tokenize(&text);
            tracing::info!(tokens = tokens.len(), ?policy, "starting classification");

            let (mut session, step) = Session::start(&catalog, &tokens, seed, policy);
            let complete = match answers {
                Some(list) => {
                    let mut provider = ScriptedProvider::new(list.clone());
                    drive(&mut session, step, &mut provider)?
                }
                None => {
                    let stdin = std::io::stdin();
                    let mut provider = TerminalProvider::new(stdin.lock(), std::io::stderr());
                    drive(&mut session, step, &mut provider)?
                }
            };
            let passes = session.passes();
            let (state, transcript) = session.into_parts();
            let report = build_report(
                &catalog,
                &state,
                transcript,
                passes,
                complete,
                confusion.as_ref(),
            );
            if let Some(path) = export_to {
                std::fs::write(path, serde_json::to_string_pretty(&export(&report))?)?;
                tracing::info!(path = %path.display(), "wrote classification export");
            }
            print_one(ctx.json, report, render_text)?;
        }
        Commands::Start { input, engine } => {
            let text = read_report(input)?;
            let catalog = ctx.load_catalog()?;
            let confusion = ctx.load_confusion()?;
            let policy = pass_policy(&ctx.config, engine.passes, engine.until_stable)?;
            let seed = load_seed(engine.seed.as_deref(), &catalog)?;
            let tokens = tokenize(&text);

            let (session, step) = Session::start(&catalog, &tokens, seed, policy);
            let saved = SavedSession {
                id: new_session_id(&text, catalog.digest()),
                catalog_path: std::fs::canonicalize(&ctx.catalog_path)
                    .unwrap_or_else(|_| ctx.catalog_path.clone()),
                catalog_digest: catalog.digest().to_string(),
                confusion_path: ctx
                    .confusion_path
                    .as_ref()
                    .map(|p| std::fs::canonicalize(p).unwrap_or_else(|_| p.clone())),
                tokens: tokens.clone(),
                continuation: session.continuation(),
            };
            save_session(&saved)?;
            audit(
                "session_start",
                serde_json::json!({"session": saved.id, "hazards": catalog.len()}),
            );
            let v = view(&saved.id, &catalog, &session, step, confusion.as_ref());
            print_one(ctx.json, v, render_view)?;
        }
        Commands::Answer { session: id, answer } => {
            let (mut saved, catalog, confusion) = open_session(id)?;
            let mut session = Session::resume(&catalog, &saved.tokens, saved.continuation.clone())?;
            let step = session.submit(answer)?;
            saved.continuation = session.continuation();
            save_session(&saved)?;
            audit(
                "session_answer",
                serde_json::json!({"session": id, "answer": answer}),
            );
            if step == Step::Done {
                audit(
                    "session_finish",
                    serde_json::json!({
                        "session": id,
                        "confirmed": session.state().confirmed(),
                        "rejected": session.state().rejected(),
                    }),
                );
            }
            let v = view(id, &catalog, &session, step, confusion.as_ref());
            print_one(ctx.json, v, render_view)?;
        }
        Commands::Status { session: id } => {
            let (saved, catalog, confusion) = open_session(id)?;
            let session = Session::resume(&catalog, &saved.tokens, saved.continuation.clone())?;
            let step = session.current();
            let v = view(id, &catalog, &session, step, confusion.as_ref());
            print_one(ctx.json, v, render_view)?;
        }
        Commands::Questions { input } => {
            let text = read_report(input)?;
            let catalog = ctx.load_catalog()?;
            let items = keyword_questions(&catalog, &tokenize(&text));
            print_out(ctx.json, &items, |q| {
                format!("{}\t{}\t{}", q.code, q.trigger, q.question)
            })?;
        }
        Commands::Refine {
            confirmed,
            rejected,
        } => {
            let catalog = ctx.load_catalog()?;
            let items = upstream_questions(&catalog, confirmed, rejected);
            print_out(ctx.json, &items, |q| {
                format!("{}\t{}\t{}", q.code, q.trigger, q.question)
            })?;
        }
        Commands::Tokens { text } => {
            let tokens = tokenize(text);
            print_one(ctx.json, tokens, |t| t.as_slice().join(" "))?;
        }
        Commands::Catalog { command } => handle_catalog_commands(ctx, command)?,
    }
    Ok(())
}
