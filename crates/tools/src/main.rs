use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use catalog::ReferenceCatalog;
use compute::{ApplyOutcome, GlobeController};
use foundation::EntityKind;
use serde::Serialize;
use streaming::ApiConfig;
use tracing_subscriber::EnvFilter;

const CATALOG_ENV: &str = "EARTH_CATALOG";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let mut args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(usage());
    }

    let cmd = args[1].clone();
    args.drain(0..2);

    match cmd.as_str() {
        "questions" => cmd_questions(args),
        "regions" => cmd_regions(args),
        "apply" => cmd_apply(args),
        "details" => cmd_details(args),
        _ => Err(usage()),
    }
}

/// Flags shared by every command that needs a catalog.
#[derive(Debug, Default)]
struct CommonArgs {
    catalog: Option<PathBuf>,
    json: bool,
    positional: Vec<String>,
}

fn parse_common(args: Vec<String>) -> Result<CommonArgs, String> {
    let mut out = CommonArgs::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--catalog" => {
                i += 1;
                if i >= args.len() {
                    return Err("--catalog requires a value".to_string());
                }
                out.catalog = Some(PathBuf::from(&args[i]));
            }
            "--json" => out.json = true,
            s if s.starts_with('-') => {
                return Err(format!("unknown arg: {s}\n\n{}", usage()));
            }
            _ => out.positional.push(args[i].clone()),
        }
        i += 1;
    }
    Ok(out)
}

fn load_catalog(path: Option<PathBuf>) -> Result<ReferenceCatalog, String> {
    let path = path.or_else(|| env::var(CATALOG_ENV).ok().map(PathBuf::from));
    match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading catalog");
            let payload = fs::read_to_string(&path)
                .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
            ReferenceCatalog::from_json_str(&payload)
                .map_err(|e| format!("invalid catalog {}: {e}", path.display()))
        }
        None => ReferenceCatalog::builtin().map_err(|e| format!("invalid builtin catalog: {e}")),
    }
}

fn cmd_questions(args: Vec<String>) -> Result<(), String> {
    // earth questions [--json]
    let common = parse_common(args)?;
    let api = ApiConfig::from_env();
    let questions = streaming::questions();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if common.json {
        let json = serde_json::to_string_pretty(questions).map_err(|e| e.to_string())?;
        writeln!(out, "{json}").map_err(|e| e.to_string())?;
        return Ok(());
    }
    for q in questions {
        writeln!(
            out,
            "{:<22} {:<8} {}  ({})",
            q.id,
            q.target,
            q.label,
            api.url_for(q.endpoint)
        )
        .map_err(|e| e.to_string())?;
    }
    Ok(())
}

fn cmd_regions(args: Vec<String>) -> Result<(), String> {
    // earth regions [--catalog PATH]
    let common = parse_common(args)?;
    let catalog = load_catalog(common.catalog)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for region in catalog.regions() {
        let codes: Vec<&str> = region.countries.iter().map(|c| c.as_str()).collect();
        writeln!(out, "{} [{}]: {}", region.name, region.slug, codes.join(", "))
            .map_err(|e| e.to_string())?;
    }
    writeln!(out, "{} countries", catalog.countries().len()).map_err(|e| e.to_string())?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct ApplyReport {
    question: &'static str,
    matched: Vec<String>,
    polygons: BTreeMap<String, String>,
    visible_markers: Vec<String>,
}

/// Replays a saved response against a fresh controller.
fn replay(
    catalog: ReferenceCatalog,
    question_id: &str,
    response_path: &str,
) -> Result<(GlobeController, ApplyOutcome), String> {
    let body = fs::read_to_string(response_path)
        .map_err(|e| format!("failed to read {response_path}: {e}"))?;

    let mut controller = GlobeController::new(catalog, ApiConfig::from_env());
    controller.attach_catalog_scene();
    let pending = controller
        .select_question(question_id)
        .map_err(|e| e.to_string())?;
    let outcome = controller
        .apply_response(pending.request, &body)
        .map_err(|e| e.to_string())?;
    Ok((controller, outcome))
}

fn cmd_apply(args: Vec<String>) -> Result<(), String> {
    // earth apply <question-id> <response.json> [--catalog PATH] [--json]
    let common = parse_common(args)?;
    let [question_id, response_path] = common.positional.as_slice() else {
        return Err(usage());
    };
    let catalog = load_catalog(common.catalog)?;
    let (controller, outcome) = replay(catalog, question_id, response_path)?;
    let scene = controller
        .scene()
        .ok_or_else(|| "scene not attached".to_string())?;

    let report = ApplyReport {
        question: outcome.question.id,
        matched: outcome.matched.iter().map(|c| c.to_string()).collect(),
        polygons: scene
            .polygons()
            .iter()
            .map(|p| (p.code.to_string(), p.color.to_hex()))
            .collect(),
        visible_markers: scene
            .markers()
            .iter()
            .filter(|m| m.is_visible())
            .map(|m| m.dom_id())
            .collect(),
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if common.json {
        let json = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
        writeln!(out, "{json}").map_err(|e| e.to_string())?;
        return Ok(());
    }

    writeln!(
        out,
        "{}: {} matched, {} polygons highlighted, {} inactive",
        report.question,
        report.matched.len(),
        outcome.coloring.highlighted,
        outcome.coloring.inactive
    )
    .map_err(|e| e.to_string())?;
    for (code, color) in &report.polygons {
        writeln!(out, "  {code:<6} {color}").map_err(|e| e.to_string())?;
    }
    writeln!(out, "visible markers: {}", report.visible_markers.join(" "))
        .map_err(|e| e.to_string())?;

    let target = outcome.question.target;
    if target == EntityKind::Country {
        let metric = compute::DEFAULT_METRIC;
        if let Some(summary) = controller.metric_summary(target, metric) {
            writeln!(
                out,
                "{metric}: min {} max {} mean {:.2} over {} countries",
                summary.min, summary.max, summary.mean, summary.count
            )
            .map_err(|e| e.to_string())?;
        }
    }
    Ok(())
}

fn cmd_details(args: Vec<String>) -> Result<(), String> {
    // earth details <question-id> <response.json> <CODE> [--catalog PATH]
    let common = parse_common(args)?;
    let [question_id, response_path, code] = common.positional.as_slice() else {
        return Err(usage());
    };
    let catalog = load_catalog(common.catalog)?;
    let (mut controller, _) = replay(catalog, question_id, response_path)?;
    controller.open_modal(code).map_err(|e| e.to_string())?;
    let detail = controller
        .modal()
        .ok_or_else(|| format!("no details for {code}"))?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", detail.code).map_err(|e| e.to_string())?;
    if detail.fields.is_empty() {
        writeln!(out, "  (no metrics)").map_err(|e| e.to_string())?;
    }
    for (field, value) in &detail.fields {
        writeln!(out, "  {field}: {value}").map_err(|e| e.to_string())?;
    }
    Ok(())
}

fn usage() -> String {
    let exe = env::args().next().unwrap_or_else(|| "earth".to_string());
    format!(
        "Usage:\n  {exe} questions [--json]\n  {exe} regions [--catalog PATH]\n  {exe} apply <question-id> <response.json> [--catalog PATH] [--json]\n  {exe} details <question-id> <response.json> <CODE> [--catalog PATH]\n\nNotes:\n- The catalog defaults to ${CATALOG_ENV}, then to the builtin catalog.\n- Question URLs use $EARTH_API_URL (default http://localhost:8000/api).\n- Set RUST_LOG=debug to trace the recoloring stages on stderr.\n"
    )
}
