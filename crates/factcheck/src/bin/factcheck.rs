//! Factcheck CLI
//!
//! Usage:
//!     factcheck build --csv data/trusted_facts.csv
//!     factcheck check "The Eiffel Tower is located in Berlin."
//!     echo "IREDA sanctioned ₹2,005 crore" | factcheck check --json

use std::io::BufRead;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use factcheck::core::ClaimExtractor;
use factcheck::index::{ingest_csv, EmbeddingIndex};
use factcheck::{
    is_blank, CheckReport, Config, FactChecker, PipelineError, PipelineSettings, Result,
    VerdictSynthesizer,
};
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "factcheck")]
#[command(about = "Verify statements against a trusted fact corpus")]
#[command(version)]
struct Args {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the fact CSV and index artifacts
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Print reports as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the embedding index from a fact CSV with a `statement` column
    Build {
        /// Fact CSV (defaults to <data-dir>/trusted_facts.csv)
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Check statements given as arguments, or one per stdin line
    Check {
        /// Text to verify
        text: Vec<String>,

        /// Number of facts to retrieve
        #[arg(long)]
        top_k: Option<usize>,

        /// Minimum evidence similarity
        #[arg(long)]
        threshold: Option<f32>,
    },
}

#[tokio::main]
async fn main() -> std::result::Result<ExitCode, Box<dyn std::error::Error>> {
    let args = Args::parse();
    factcheck::tracing::init_with_filter(&args.log_level);

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(dir) = args.data_dir {
        config.data_dir = dir;
    }

    match args.command {
        Command::Build { csv } => {
            if let Some(csv) = csv {
                config.facts_csv = Some(csv);
            }
            config.validate()?;
            build(&config)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Check {
            text,
            top_k,
            threshold,
        } => {
            if let Some(top_k) = top_k {
                config.top_k = top_k;
            }
            if let Some(threshold) = threshold {
                config.confidence_threshold = threshold;
            }
            config.validate()?;
            Ok(check(&config, text, args.json).await?)
        }
    }
}

fn build(config: &Config) -> Result<()> {
    let csv = config.facts_csv_path();
    info!("Starting database build from {}", csv.display());

    let statements = ingest_csv(&csv)?;
    let index = EmbeddingIndex::new(config.index_paths(), config.build_embedder()?);
    let count = index.build(&statements)?;

    println!(
        "Indexed {} facts into {}",
        count,
        config.index_paths().vectors.display()
    );
    Ok(())
}

async fn check(config: &Config, text: Vec<String>, json: bool) -> Result<ExitCode> {
    let inputs = if text.is_empty() {
        read_stdin_lines()?
    } else {
        vec![text.join(" ")]
    };
    if inputs.iter().all(|input| is_blank(input)) {
        warn!("No text to check");
        eprintln!("Please enter some text to check.");
        return Ok(ExitCode::from(2));
    }

    if config.api_token().is_none() {
        warn!("No adjudicator API token configured; requests are sent unauthenticated");
    }
    let generator = config.adjudicator.build_generator()?;
    info!(
        "Adjudicator {} at {}",
        config.adjudicator.model,
        generator.endpoint()
    );
    let synthesizer =
        VerdictSynthesizer::new(Arc::new(generator), config.adjudicator.retry_policy());
    let index = Arc::new(EmbeddingIndex::new(
        config.index_paths(),
        config.build_embedder()?,
    ));
    let checker = FactChecker::new(
        index,
        ClaimExtractor::new(),
        synthesizer,
        PipelineSettings {
            top_k: config.top_k,
            confidence_threshold: config.confidence_threshold,
        },
    );

    let mut status = ExitCode::SUCCESS;
    for input in inputs.iter().filter(|input| !is_blank(input)) {
        let report = match checker.run(input).await {
            Ok(report) => report,
            Err(e @ PipelineError::IndexMissing(_)) => {
                error!("{}", e);
                print_report(&CheckReport::failure(input, &e), json)?;
                status = ExitCode::FAILURE;
                break;
            }
            Err(e) => {
                error!("Pipeline failed: {}", e);
                status = ExitCode::FAILURE;
                CheckReport::failure(input, &e)
            }
        };
        print_report(&report, json)?;
    }

    checker.close();
    Ok(status)
}

fn read_stdin_lines() -> std::io::Result<Vec<String>> {
    let stdin = std::io::stdin();
    let mut lines = Vec::new();
    for line in stdin.lock().lines() {
        let line = line?;
        if !is_blank(&line) {
            lines.push(line);
        }
    }
    Ok(lines)
}

fn print_report(report: &CheckReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("Input:      {}", report.input_text);
    println!("Claim:      {}", report.extracted_claim);
    println!("Verdict:    {}", report.verdict);
    println!("Confidence: {}", report.confidence);
    println!("Reasoning:  {}", report.reasoning);
    if !report.evidence.is_empty() {
        println!("Evidence:");
        for item in &report.evidence {
            println!("  - {}", item);
        }
    }
    println!();
    Ok(())
}
