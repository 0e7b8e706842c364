//! Process command - OCR, classify, and parse a single document.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::{Args, ValueEnum};
use console::style;
use serde::Serialize;
use tracing::{debug, info};

use veridoc_core::{
    DocumentType, ExtractedText, ParsedDocument, RawDocument, VerificationPipeline,
};

use super::{build_engine, load_config, mime_from_extension};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF or image)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Override the classifier
    #[arg(long, value_enum)]
    forced_type: Option<ForcedType>,

    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Show extraction confidence scores
    #[arg(long)]
    show_confidence: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text summary
    Text,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ForcedType {
    Cv,
    CompanyDoc,
}

impl From<ForcedType> for DocumentType {
    fn from(value: ForcedType) -> Self {
        match value {
            ForcedType::Cv => DocumentType::Cv,
            ForcedType::CompanyDoc => DocumentType::CompanyDoc,
        }
    }
}

/// Shape of the JSON document report.
#[derive(Serialize)]
struct ProcessReport {
    #[serde(rename = "type")]
    doc_type: DocumentType,
    ocr_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    ocr_confidence: Option<f32>,
    parsed: ParsedDocument,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let bytes = fs::read(&args.input)?;
    let doc = RawDocument::new(bytes, mime_from_extension(&args.input));

    let engine = build_engine(args.model_dir.as_deref())?;
    let pipeline = VerificationPipeline::new(engine, config);

    let analysis = pipeline
        .ocr_and_parse(&doc, args.forced_type.map(Into::into))
        .await;

    let report = ProcessReport {
        doc_type: analysis.doc_type,
        ocr_confidence: analysis.text.ocr_confidence,
        ocr_text: analysis.text.text.clone(),
        parsed: analysis.parsed,
    };

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&report)?,
        OutputFormat::Text => text_summary(&report, &analysis.text),
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_confidence {
        println!();
        if let Some(confidence) = analysis.text.ocr_confidence {
            println!(
                "{} OCR confidence: {:.1}%",
                style("ℹ").blue(),
                confidence
            );
        } else {
            println!("{} Text source: embedded PDF text", style("ℹ").blue());
        }
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn text_summary(report: &ProcessReport, text: &ExtractedText) -> String {
    let mut out = String::new();
    out.push_str(&format!("Document type : {}\n", report.doc_type));
    out.push_str(&format!(
        "Text          : {} chars ({:?})\n",
        text.text.len(),
        text.source
    ));

    match &report.parsed {
        ParsedDocument::CompanyDoc(parsed) => {
            out.push_str(&format!(
                "Company name  : {}\n",
                parsed.company_name.as_deref().unwrap_or("-")
            ));
            if let Some(reg) = &parsed.registration_number {
                out.push_str(&format!("Registration  : {:?} {}\n", reg.id_type, reg.value));
            }
            out.push_str(&format!(
                "Address       : {}\n",
                parsed.address.as_deref().unwrap_or("-")
            ));
            if !parsed.issue_dates.is_empty() {
                let dates: Vec<String> =
                    parsed.issue_dates.iter().map(|d| d.to_string()).collect();
                out.push_str(&format!("Issue dates   : {}\n", dates.join(", ")));
            }
        }
        ParsedDocument::Cv(parsed) => {
            out.push_str(&format!(
                "Full name     : {}\n",
                parsed.person.full_name.as_deref().unwrap_or("-")
            ));
            out.push_str(&format!("Emails        : {}\n", parsed.person.emails.join(", ")));
            out.push_str(&format!("Skills        : {}\n", parsed.skills.join(", ")));
            out.push_str(&format!(
                "Experience    : {} entries\n",
                parsed.experience.len()
            ));
        }
    }

    out
}
