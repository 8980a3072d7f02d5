//! groundtruth - command-line front end for a labeling session.
//!
//! Usage:
//!   groundtruth --import questions.csv
//!   groundtruth --import questions.csv --tag weather --export tagged.csv
//!   groundtruth --import questions.csv --train --json

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use groundtruth_core::{ClassifierStatus, ItemKind, TaggingResult, TrainingSession};
use groundtruth_services::{InMemoryClassRepository, InMemoryTextRepository, ServiceConfig};

#[derive(Debug, Default)]
struct Args {
    import: Option<PathBuf>,
    tag: Option<String>,
    export: Option<PathBuf>,
    train: bool,
    json: bool,
}

fn print_usage() {
    eprintln!(
        "Usage: groundtruth --import <file.csv> [--tag <label>] [--export <file.csv>] [--train] [--json]"
    );
}

fn parse_args() -> anyhow::Result<Args> {
    let args: Vec<String> = env::args().collect();
    let mut result = Args::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--import" | "-i" => {
                i += 1;
                let path = args.get(i).context("--import needs a file path")?;
                result.import = Some(PathBuf::from(path));
            }
            "--tag" | "-t" => {
                i += 1;
                let label = args.get(i).context("--tag needs a class label")?;
                result.tag = Some(label.clone());
            }
            "--export" | "-o" => {
                i += 1;
                let path = args.get(i).context("--export needs a file path")?;
                result.export = Some(PathBuf::from(path));
            }
            "--train" => result.train = true,
            "--json" => result.json = true,
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => {
                print_usage();
                bail!("Unknown argument: {}", other);
            }
        }
        i += 1;
    }

    if result.import.is_none() {
        print_usage();
        bail!("--import is required");
    }
    Ok(result)
}

/// Install the tracing subscriber.
///
/// Environment variables:
///   LOG_FORMAT  - "json" or "text" (default: "text")
///   LOG_FILE    - path to log file (optional, enables file logging)
///   RUST_LOG    - standard env filter (default: "groundtruth=info,...")
fn init_tracing() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = env::var("LOG_FILE").ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "groundtruth=info,groundtruth_core=info,groundtruth_services=info".into()
    });
    let registry = tracing_subscriber::registry().with(env_filter);

    if let Some(ref path) = log_file {
        let path = std::path::Path::new(path);
        let file_dir = path.parent().unwrap_or(std::path::Path::new("."));
        let file_name = path
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("groundtruth.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(false),
                )
                .init();
        }
        Some(guard)
    } else {
        // stdout carries the summary, logs go to stderr
        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        } else {
            registry
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
        None
    }
}

#[derive(Debug, Serialize)]
struct ClassSummary {
    label: String,
    texts: usize,
}

#[derive(Debug, Serialize)]
struct Summary {
    classes: Vec<ClassSummary>,
    texts: usize,
    untagged: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    classifier: Option<ClassifierStatus>,
}

/// Tag every untagged text with `label`, creating the class when needed.
async fn tag_untagged(session: &mut TrainingSession, label: &str) -> anyhow::Result<TaggingResult> {
    if session.state().find_class(label).is_none() {
        session.create_class(label).await?;
    }

    let state = session.state_mut();
    state.check_all(ItemKind::Text, false);
    state.check_all(ItemKind::Class, false);
    let untagged: Vec<usize> = state
        .texts()
        .iter()
        .enumerate()
        .filter(|(_, t)| t.classes.is_empty())
        .map(|(i, _)| i)
        .collect();
    for index in untagged {
        state.check_text(index, true);
    }
    state.check_class(label, true);

    Ok(session.tag_checked_texts().await?)
}

fn summarize(session: &TrainingSession, classifier: Option<ClassifierStatus>) -> Summary {
    let state = session.state();
    Summary {
        classes: state
            .classes()
            .iter()
            .map(|c| ClassSummary {
                label: c.label.clone(),
                texts: state.count_texts_with_class(&c.label),
            })
            .collect(),
        texts: state.texts().len(),
        untagged: state.texts().iter().filter(|t| t.classes.is_empty()).count(),
        classifier,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();
    let _log_guard = init_tracing();

    let args = parse_args()?;
    let config = ServiceConfig::from_env()?;
    info!(backend = %config.backend, "Starting groundtruth session");

    let mut session = TrainingSession::new(
        config.training_service(),
        Arc::new(InMemoryClassRepository::new()),
        Arc::new(InMemoryTextRepository::new()),
    );

    if let Some(path) = &args.import {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        session.import_file(&content).await?;
    }

    if let Some(label) = &args.tag {
        let result = tag_untagged(&mut session, label).await?;
        info!(label = %label, text_count = result.text_indices.len(), "Tagged untagged texts");
    }

    if let Some(path) = &args.export {
        let content = session.export_to_file().await?;
        tokio::fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    let classifier = if args.train {
        Some(session.train().await?)
    } else {
        None
    };

    let summary = summarize(&session, classifier);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        for class in &summary.classes {
            println!("{:<30} {:>6}", class.label, class.texts);
        }
        println!("{} texts, {} untagged", summary.texts, summary.untagged);
        if let Some(status) = &summary.classifier {
            println!(
                "classifier {} ({}): {}",
                status.classifier_id, status.name, status.status
            );
        }
    }

    Ok(())
}
