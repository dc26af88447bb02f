use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use serde::{Deserialize, Serialize};

use lastseen_core::ChangeDetector;
use lastseen_diff::{text_diff, DiffItem, DiffOperation};
use lastseen_store::TrackingConfig;
use lastseen_types::{Body, Essence, FieldPath, Patch};

use crate::cli::*;

/// Settings file layout: tracking settings plus the watched extra fields.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    #[serde(flatten)]
    tracking: TrackingConfig,
    extra_fields: Vec<FieldPath>,
}

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let detector = build_detector(&cli)?;
    match &cli.command {
        Command::Key => cmd_key(&detector, &cli.format),
        Command::Essence(args) => cmd_essence(&detector, args),
        Command::Diff(args) => cmd_diff(&detector, args, &cli.format),
        Command::Refresh(args) => cmd_refresh(&detector, args, &cli.format),
        Command::Reason(args) => cmd_reason(&detector, args, &cli.format),
    }
}

fn build_detector(cli: &Cli) -> anyhow::Result<ChangeDetector> {
    let mut file_config = match &cli.config {
        Some(path) => load_config(path)?,
        None => FileConfig::default(),
    };
    if let Some(prefix) = &cli.prefix {
        file_config.tracking.prefix = Some(prefix.clone());
    }
    tracing::debug!(
        key = %file_config.tracking.annotation_key(),
        extra_fields = file_config.extra_fields.len() + cli.fields.len(),
        "tracking configuration loaded"
    );
    Ok(ChangeDetector::new(file_config.tracking)
        .with_extra_fields(file_config.extra_fields)
        .with_extra_fields(cli.fields.iter().cloned()))
}

fn load_config(path: &Path) -> anyhow::Result<FileConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

fn read_body(source: &str) -> anyhow::Result<Body> {
    let text = if source == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("reading body from stdin")?;
        text
    } else {
        fs::read_to_string(source).with_context(|| format!("reading body {source}"))?
    };
    Body::from_json(&text).with_context(|| format!("parsing body {source}"))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn cmd_key(detector: &ChangeDetector, format: &OutputFormat) -> anyhow::Result<()> {
    let key = detector.config().annotation_key();
    match format {
        OutputFormat::Json => print_json(&key),
        OutputFormat::Text => {
            println!("{}", key.bold());
            Ok(())
        }
    }
}

/// The essence is a JSON document in either output format.
fn cmd_essence(detector: &ChangeDetector, args: &BodyArgs) -> anyhow::Result<()> {
    let body = read_body(&args.body)?;
    print_json(&detector.essence(&body))
}

fn cmd_diff(
    detector: &ChangeDetector,
    args: &DiffArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let body = read_body(&args.input.body)?;
    let essential = detector.essential_diff(&body)?;

    if let OutputFormat::Json = format {
        return print_json(&essential);
    }

    if essential.old.is_none() {
        println!("{} no essence stored yet", "!".yellow().bold());
    }
    if essential.is_empty() {
        println!("{} No essential changes.", "✓".green());
        return Ok(());
    }

    if args.text {
        let rendered = text_diff(
            essential.old.as_ref().map(Essence::as_value),
            Some(essential.new.as_value()),
            ("stored", "current"),
        );
        for line in rendered.lines() {
            print_diff_line(line);
        }
    } else {
        for item in &essential.diff {
            print_item(item);
        }
    }

    println!(
        "\n{} added, {} changed, {} removed",
        essential.diff.additions().to_string().green(),
        essential.diff.changes().to_string().yellow(),
        essential.diff.removals().to_string().red(),
    );
    Ok(())
}

fn print_diff_line(line: &str) {
    if line.starts_with("---") || line.starts_with("+++") {
        println!("{}", line.bold());
    } else if line.starts_with("@@") {
        println!("{}", line.cyan());
    } else if line.starts_with('+') {
        println!("{}", line.green());
    } else if line.starts_with('-') {
        println!("{}", line.red());
    } else {
        println!("{line}");
    }
}

fn print_item(item: &DiffItem) {
    let line = item.to_string();
    match item.operation {
        DiffOperation::Add => println!("  {} {}", "+".green().bold(), line.green()),
        DiffOperation::Change => println!("  {} {}", "~".yellow().bold(), line.yellow()),
        DiffOperation::Remove => println!("  {} {}", "-".red().bold(), line.red()),
    }
}

fn cmd_refresh(
    detector: &ChangeDetector,
    args: &BodyArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let body = read_body(&args.body)?;
    let mut patch = Patch::new();
    let changed = detector.refresh(&body, &mut patch)?;
    match format {
        OutputFormat::Json => print_json(&patch),
        OutputFormat::Text if changed => print_json(&patch),
        OutputFormat::Text => {
            println!("{} Essence up to date, nothing to patch.", "✓".green());
            Ok(())
        }
    }
}

fn cmd_reason(
    detector: &ChangeDetector,
    args: &BodyArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let body = read_body(&args.body)?;
    let reason = detector.reason(&body)?;
    match format {
        OutputFormat::Json => print_json(&reason),
        OutputFormat::Text => {
            println!("{}", reason.to_string().bold());
            Ok(())
        }
    }
}
