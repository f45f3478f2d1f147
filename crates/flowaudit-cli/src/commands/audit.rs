//! `flowaudit audit` subcommand implementation.
//!
//! Loads workflow exports from a file or directory, runs the audit engine,
//! and renders the reports as tables or JSON.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use clap::{Args, ValueEnum};
use comfy_table::{Table, presets::UTF8_FULL};
use flowaudit_risk::{AuditEngine, CategorySelection, Location, RiskReport, RiskSection};
use flowaudit_types::{AuditCorpus, CredentialRecord, FlowauditError, WorkflowDefinition};
use serde_json::Value;

use crate::config_loader;

/// Output format for audit results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Arguments for `flowaudit audit`.
#[derive(Args, Debug)]
pub struct AuditArgs {
    /// Workflow export file, or a directory searched for `*.json` files.
    pub path: PathBuf,

    /// Comma-separated categories to audit (default: all).
    #[arg(long, value_delimiter = ',')]
    pub categories: Vec<String>,

    /// Output format.
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Credential store inventory (JSON array or `{ "credentials": [...] }`).
    #[arg(long)]
    pub credentials: Option<PathBuf>,

    /// Config file path (overrides auto-discovery).
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Run the audit. Returns `true` when any report was produced.
pub fn run(args: AuditArgs) -> anyhow::Result<bool> {
    // Validate categories before touching the filesystem.
    let selection = CategorySelection::parse(&args.categories)?;
    let config = config_loader::load_config(args.config.as_deref())?;

    let workflows = load_workflows(&args.path)?;
    let credentials = match &args.credentials {
        Some(path) => load_credentials(path)?,
        None => Vec::new(),
    };
    let corpus = AuditCorpus {
        workflows,
        credentials,
        as_of: Some(Utc::now()),
    };

    let reports = AuditEngine::new(config).run(&selection, &corpus);

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
        OutputFormat::Text => print_text_report(&corpus, &reports),
    }

    Ok(!reports.is_empty())
}

/// Every workflow found at `path`, in sorted file order.
pub fn load_workflows(path: &Path) -> anyhow::Result<Vec<WorkflowDefinition>> {
    let mut files = Vec::new();
    if path.is_dir() {
        collect_json_files(path, &mut files)?;
        files.sort();
    } else if path.is_file() {
        files.push(path.to_path_buf());
    } else {
        anyhow::bail!("path does not exist: {}", path.display());
    }

    let mut workflows = Vec::new();
    for file in &files {
        let contents = std::fs::read_to_string(file)
            .with_context(|| format!("failed to read {}", file.display()))?;
        let value: Value = serde_json::from_str(&contents)
            .map_err(|e| corpus_error(file, e.to_string()))?;
        let loaded = parse_workflows(value).map_err(|reason| corpus_error(file, reason))?;
        tracing::debug!(file = %file.display(), workflows = loaded.len(), "loaded export");
        workflows.extend(loaded);
    }

    tracing::info!(files = files.len(), workflows = workflows.len(), "corpus loaded");
    Ok(workflows)
}

fn collect_json_files(dir: &Path, files: &mut Vec<PathBuf>) -> anyhow::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let path = entry.path();
        if file_type.is_dir() {
            // Skip hidden directories
            let name = path.file_name().unwrap_or_default().to_string_lossy();
            if name.starts_with('.') {
                continue;
            }
            collect_json_files(&path, files)?;
        } else if file_type.is_symlink() && path.is_dir() {
            tracing::debug!(path = %path.display(), "skipping symlinked directory");
        } else if path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    Ok(())
}

/// Accepts a single workflow, an array of workflows, or `{ "workflows": [...] }`.
fn parse_workflows(value: Value) -> Result<Vec<WorkflowDefinition>, String> {
    let value = match value {
        Value::Object(mut map) if map.get("workflows").is_some_and(Value::is_array) => {
            map.remove("workflows").unwrap_or_default()
        }
        other => other,
    };
    match value {
        Value::Array(_) => serde_json::from_value(value).map_err(|e| e.to_string()),
        Value::Object(_) => serde_json::from_value(value)
            .map(|wf| vec![wf])
            .map_err(|e| e.to_string()),
        _ => Err("expected a workflow object or an array of workflows".into()),
    }
}

/// Credential inventory from a JSON array or `{ "credentials": [...] }`.
pub fn load_credentials(path: &Path) -> anyhow::Result<Vec<CredentialRecord>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read credentials file {}", path.display()))?;
    let value: Value =
        serde_json::from_str(&contents).map_err(|e| corpus_error(path, e.to_string()))?;
    let value = match value {
        Value::Object(mut map) => map
            .remove("credentials")
            .ok_or_else(|| corpus_error(path, "missing \"credentials\" array".into()))?,
        other => other,
    };
    Ok(serde_json::from_value(value).map_err(|e| corpus_error(path, e.to_string()))?)
}

fn corpus_error(path: &Path, reason: String) -> FlowauditError {
    FlowauditError::CorpusInvalid {
        source_name: path.display().to_string(),
        reason,
    }
}

fn print_text_report(corpus: &AuditCorpus, reports: &[RiskReport]) {
    println!("Workflow Risk Audit");
    println!("===================");
    println!("Workflows:   {}", corpus.workflows.len());
    println!("Nodes:       {}", corpus.node_count());
    println!("Credentials: {}", corpus.credentials.len());
    println!(
        "Findings:    {}",
        reports.iter().map(RiskReport::location_count).sum::<usize>()
    );
    println!();

    if reports.is_empty() {
        println!("No risks found.");
        return;
    }

    for report in reports {
        println!("[{}]", report.risk);
        for section in &report.sections {
            print_section(section);
        }
    }
}

fn print_section(section: &RiskSection) {
    println!("  {} ({})", section.title, section.location.len());
    println!("  {}", section.description);
    println!("  Recommendation: {}", section.recommendation);

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    if section.location.iter().all(|loc| matches!(loc, Location::Other { .. })) {
        table.set_header(vec!["Detail"]);
        for loc in &section.location {
            table.add_row(vec![loc.to_string()]);
        }
    } else {
        table.set_header(vec!["Workflow", "Node", "Type"]);
        for loc in &section.location {
            match loc {
                Location::Node {
                    workflow_name,
                    node_name,
                    node_type,
                    ..
                } => table.add_row(vec![workflow_name.as_str(), node_name.as_str(), node_type.as_str()]),
                Location::Other { description } => table.add_row(vec![description.as_str(), "", ""]),
            };
        }
    }
    println!("{table}");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn wf(id: &str) -> Value {
        json!({ "id": id, "name": id, "nodes": [], "connections": {} })
    }

    #[test]
    fn parse_single_workflow() {
        let workflows = parse_workflows(wf("a")).unwrap();
        assert_eq!(workflows.len(), 1);
        assert_eq!(workflows[0].id, "a");
    }

    #[test]
    fn parse_array_and_export_envelope() {
        assert_eq!(parse_workflows(json!([wf("a"), wf("b")])).unwrap().len(), 2);
        let exported = parse_workflows(json!({ "workflows": [wf("a"), wf("b"), wf("c")] })).unwrap();
        let ids: Vec<_> = exported.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn parse_rejects_scalars() {
        assert!(parse_workflows(json!("nope")).is_err());
        assert!(parse_workflows(json!([1, 2])).is_err());
    }

    #[test]
    fn directory_loading_is_sorted_and_recursive() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.json"), wf("b").to_string()).unwrap();
        std::fs::write(dir.path().join("a.json"), wf("a").to_string()).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested/c.json"), json!([wf("c")]).to_string()).unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();
        std::fs::write(dir.path().join(".git/x.json"), wf("x").to_string()).unwrap();

        let ids: Vec<_> = load_workflows(dir.path())
            .unwrap()
            .into_iter()
            .map(|w| w.id)
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directories_not_followed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.json"), wf("a").to_string()).unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested/b.json"), wf("b").to_string()).unwrap();
        std::os::unix::fs::symlink(dir.path(), dir.path().join("nested/loop")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("a.json"), dir.path().join("linked.json")).unwrap();

        let ids: Vec<_> = load_workflows(dir.path())
            .unwrap()
            .into_iter()
            .map(|w| w.id)
            .collect();
        assert_eq!(ids, vec!["a", "a", "b"]);
    }

    #[test]
    fn invalid_export_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("broken.json");
        std::fs::write(&file, "{ not json").unwrap();
        let err = load_workflows(&file).unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn credentials_array_or_envelope() {
        let dir = tempfile::tempdir().unwrap();
        let record = json!({ "id": "c1", "name": "Prod DB", "type": "postgres" });

        let bare = dir.path().join("bare.json");
        std::fs::write(&bare, json!([record]).to_string()).unwrap();
        assert_eq!(load_credentials(&bare).unwrap()[0].id, "c1");

        let wrapped = dir.path().join("wrapped.json");
        std::fs::write(&wrapped, json!({ "credentials": [record] }).to_string()).unwrap();
        assert_eq!(load_credentials(&wrapped).unwrap()[0].credential_type, "postgres");

        let missing = dir.path().join("missing.json");
        std::fs::write(&missing, json!({ "items": [] }).to_string()).unwrap();
        assert!(load_credentials(&missing).is_err());
    }
}
