//! Models command - download and manage OCR model files.

use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;
use futures_util::StreamExt;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Arguments for the models command.
#[derive(Args)]
pub struct ModelsArgs {
    #[command(subcommand)]
    command: ModelsCommand,
}

#[derive(Subcommand)]
enum ModelsCommand {
    /// List the model files the OCR engine needs
    List,

    /// Download models
    Download(DownloadArgs),

    /// Check model status
    Status,

    /// Remove downloaded models
    Clean,
}

#[derive(Args)]
struct DownloadArgs {
    /// Output directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Force re-download even if files exist
    #[arg(long)]
    force: bool,
}

/// Model file information with download URL.
struct ModelInfo {
    filename: &'static str,
    size_bytes: u64,
    description: &'static str,
    url: &'static str,
}

// Models are served from: https://github.com/example/veridoc/tree/main/models
const MODELS: [ModelInfo; 3] = [
    ModelInfo {
        filename: "det.onnx",
        size_bytes: 4_500_000,
        description: "PP-OCRv3 mobile detection",
        url: "https://github.com/example/veridoc/raw/main/models/det.onnx",
    },
    ModelInfo {
        filename: "latin_rec.onnx",
        size_bytes: 7_500_000,
        description: "Latin recognition (covers French + English)",
        url: "https://github.com/example/veridoc/raw/main/models/latin_rec.onnx",
    },
    ModelInfo {
        filename: "latin_dict.txt",
        size_bytes: 2_000,
        description: "Latin character dictionary",
        url: "https://github.com/example/veridoc/raw/main/models/latin_dict.txt",
    },
];

/// Default model directory under the user data dir.
pub fn default_model_dir() -> PathBuf {
    super::data_dir().join("models")
}

pub async fn run(args: ModelsArgs) -> anyhow::Result<()> {
    match args.command {
        ModelsCommand::List => list_models(),
        ModelsCommand::Download(download_args) => download_models(download_args).await,
        ModelsCommand::Status => check_status(),
        ModelsCommand::Clean => clean_models(),
    }
}

fn list_models() -> anyhow::Result<()> {
    println!("{}", style("OCR model files").bold());
    println!();

    for model in &MODELS {
        println!(
            "  {:<20} {:>10}  {}",
            model.filename,
            format_size(model.size_bytes),
            model.description
        );
    }

    println!();
    println!("Download with: veridoc models download (~12MB)");

    Ok(())
}

async fn download_models(args: DownloadArgs) -> anyhow::Result<()> {
    let output_dir = args.output.unwrap_or_else(default_model_dir);
    fs::create_dir_all(&output_dir)?;

    println!(
        "{} Downloading models to {}",
        style("ℹ").blue(),
        output_dir.display()
    );
    println!();

    let client = reqwest::Client::builder()
        .user_agent("veridoc-cli/0.1.0")
        .timeout(std::time::Duration::from_secs(300))
        .build()?;

    let multi_progress = MultiProgress::new();
    let mut success_count = 0;
    let mut skip_count = 0;
    let mut error_count = 0;

    for model in &MODELS {
        let path = output_dir.join(model.filename);

        if path.exists() && !args.force {
            let metadata = fs::metadata(&path)?;
            // A partial download shows up as a suspiciously small file
            if metadata.len() > model.size_bytes / 2 {
                println!(
                    "  {} {} (already exists, {})",
                    style("✓").green(),
                    model.filename,
                    format_size(metadata.len())
                );
                skip_count += 1;
                continue;
            }
        }

        let pb = multi_progress.add(ProgressBar::new(model.size_bytes));
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  {spinner:.green} {msg:<30} [{bar:25.cyan/blue}] {bytes}/{total_bytes}")?
                .progress_chars("=>-"),
        );
        pb.set_message(model.filename.to_string());

        match download_file(&client, model.url, &path, &pb).await {
            Ok(()) => {
                pb.finish_with_message(format!("{} {}", style("✓").green(), model.filename));
                success_count += 1;
            }
            Err(e) => {
                pb.finish_with_message(format!(
                    "{} {} - {}",
                    style("✗").red(),
                    model.filename,
                    e
                ));
                error_count += 1;
            }
        }
    }

    println!();

    if error_count == 0 {
        println!(
            "{} Models ready ({} downloaded, {} already present)",
            style("✓").green().bold(),
            success_count,
            skip_count
        );
    } else {
        println!(
            "{} Download completed with errors: {} downloaded, {} skipped, {} failed",
            style("⚠").yellow().bold(),
            success_count,
            skip_count,
            error_count
        );
        println!("Retry with: veridoc models download --force");
    }

    Ok(())
}

async fn download_file(
    client: &reqwest::Client,
    url: &str,
    path: &PathBuf,
    pb: &ProgressBar,
) -> anyhow::Result<()> {
    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        anyhow::bail!("HTTP {}", response.status());
    }

    if let Some(content_length) = response.content_length() {
        pb.set_length(content_length);
    }

    // Download into a temp file, rename on success
    let temp_path = path.with_extension("tmp");
    let mut file = File::create(&temp_path)?;

    let mut stream = response.bytes_stream();
    let mut downloaded: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk)?;
        downloaded += chunk.len() as u64;
        pb.set_position(downloaded);
    }

    file.flush()?;
    drop(file);

    fs::rename(&temp_path, path)?;

    Ok(())
}

fn check_status() -> anyhow::Result<()> {
    let model_dir = default_model_dir();

    println!("{}", style("Model status").bold());
    println!("Directory: {}", model_dir.display());
    println!();

    let mut missing = 0;
    for model in &MODELS {
        let path = model_dir.join(model.filename);
        match fs::metadata(&path) {
            Ok(metadata) => println!(
                "  {} {:<20} {}",
                style("✓").green(),
                model.filename,
                format_size(metadata.len())
            ),
            Err(_) => {
                println!("  {} {:<20} missing", style("✗").red(), model.filename);
                missing += 1;
            }
        }
    }

    if missing > 0 {
        println!();
        println!("Run: veridoc models download");
    }

    Ok(())
}

fn clean_models() -> anyhow::Result<()> {
    let model_dir = default_model_dir();

    if !model_dir.exists() {
        println!("{} Nothing to clean", style("ℹ").blue());
        return Ok(());
    }

    fs::remove_dir_all(&model_dir)?;
    println!(
        "{} Removed {}",
        style("✓").green(),
        model_dir.display()
    );

    Ok(())
}

fn format_size(bytes: u64) -> String {
    if bytes >= 1_000_000 {
        format!("{:.1} MB", bytes as f64 / 1_000_000.0)
    } else if bytes >= 1_000 {
        format!("{:.1} KB", bytes as f64 / 1_000.0)
    } else {
        format!("{} B", bytes)
    }
}
