//! Analyze a ZIP of financial filing PDFs and emit a JSON report.
//!
//! Usage:
//!   findoc filing.zip
//!   findoc filing.zip --output report.json --workers 4
//!   findoc filing.zip --config filing_rules.json

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use tracing::info;

use analysis_engine::{Analyzer, AnalyzerConfig};
use shared_types::{ChecklistSpec, PairSpec};

#[derive(Parser, Debug)]
#[command(name = "findoc")]
#[command(about = "Analyze a ZIP archive of financial filing PDFs")]
struct Args {
    /// Path to the ZIP archive
    archive: PathBuf,

    /// Write the JSON report here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// JSON file with a custom checklist and verification pairs
    #[arg(long)]
    config: Option<PathBuf>,

    /// Classification worker threads (defaults to available cores, capped)
    #[arg(long)]
    workers: Option<usize>,

    /// Pages with at most this many text characters count as blank
    #[arg(long, default_value = "0")]
    blank_chars: usize,
}

/// On-disk shape of `--config`: both fields optional, defaults fill the rest.
#[derive(Debug, Deserialize)]
struct RunRules {
    checklist: Option<ChecklistSpec>,
    pairs: Option<Vec<PairSpec>>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let (checklist, pairs) = load_rules(args.config.as_deref())?;

    let mut config = AnalyzerConfig::default();
    if let Some(workers) = args.workers {
        config.worker_threads = workers.max(1);
    }
    config.inspect.blank_text_max_chars = args.blank_chars;

    let analyzer = Analyzer::new(checklist, pairs)
        .with_config(config)
        .on_progress(|p| info!(completed = p.completed, total = p.total, "classified"));

    let archive = File::open(&args.archive)
        .with_context(|| format!("failed to open {}", args.archive.display()))?;
    let report = analyzer
        .analyze(BufReader::new(archive))
        .context("analysis failed")?;

    match &args.output {
        Some(path) => {
            let out = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            serde_json::to_writer_pretty(out, &report)?;
            info!(report = %path.display(), "report written");
        }
        None => {
            let stdout = std::io::stdout().lock();
            serde_json::to_writer_pretty(stdout, &report)?;
            println!();
        }
    }

    Ok(())
}

fn load_rules(path: Option<&std::path::Path>) -> Result<(ChecklistSpec, Vec<PairSpec>)> {
    let Some(path) = path else {
        return Ok((ChecklistSpec::standard_filing(), PairSpec::standard_filing()));
    };
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let rules: RunRules = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("invalid rules file {}", path.display()))?;
    Ok((
        rules.checklist.unwrap_or_else(ChecklistSpec::standard_filing),
        rules.pairs.unwrap_or_else(PairSpec::standard_filing),
    ))
}
