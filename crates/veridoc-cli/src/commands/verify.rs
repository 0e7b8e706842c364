//! Verify command - run the full verification pipeline over a document.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::{Args, ValueEnum};
use console::style;
use tracing::{debug, info};

use veridoc_core::signals::summarize;
use veridoc_core::{
    Decision, ExpectedProfile, RawDocument, VerificationPipeline, VerificationRun,
};

use super::{build_engine, load_config, mime_from_extension};

/// Arguments for the verify command.
#[derive(Args)]
pub struct VerifyArgs {
    /// Input file (PDF or image)
    #[arg(required = true)]
    input: PathBuf,

    /// Expected profile JSON ({"company_name", "registration_number", "address"})
    #[arg(short, long)]
    expected: Option<PathBuf>,

    /// Run identifier (defaults to the document hash)
    #[arg(long)]
    run_id: Option<String>,

    /// Subject identity being verified
    #[arg(short, long, default_value = "unknown")]
    subject: String,

    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable signal table
    Text,
    /// The full finalized run as JSON
    Json,
}

pub async fn run(args: VerifyArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let expected: Option<ExpectedProfile> = match &args.expected {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            Some(serde_json::from_str(&content)?)
        }
        None => None,
    };

    let bytes = fs::read(&args.input)?;
    let doc = RawDocument::new(bytes, mime_from_extension(&args.input));

    let run_id = args
        .run_id
        .clone()
        .unwrap_or_else(|| format!("run-{}", &doc.content_hash()[..12]));

    info!("Verifying {} as run {}", args.input.display(), run_id);

    let engine = build_engine(args.model_dir.as_deref())?;
    let pipeline = VerificationPipeline::new(engine, config);

    let mut run = VerificationRun::new(run_id, args.subject.clone());
    let outcome = pipeline
        .run_verification(&mut run, &doc, expected.as_ref())
        .await?;

    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&run)?);
        }
        OutputFormat::Text => {
            println!("{}", style("Signals").bold());
            for signal in &run.signals {
                let marker = if signal.passed {
                    style("✓").green()
                } else {
                    style("✗").red()
                };
                println!("  {} {}", marker, summarize(signal));
            }
            println!();

            let decision = match outcome.decision {
                Decision::Approve => style(outcome.decision.to_string()).green().bold(),
                Decision::Reject => style(outcome.decision.to_string()).red().bold(),
                Decision::ManualReview => style(outcome.decision.to_string()).yellow().bold(),
            };
            println!("Decision   : {}", decision);
            println!("Risk score : {:.2}", outcome.risk_score);
            if let Some(name) = &outcome.parsed.company_name {
                println!("Company    : {}", name);
            }
        }
    }

    debug!("Total verification time: {:?}", start.elapsed());

    Ok(())
}
