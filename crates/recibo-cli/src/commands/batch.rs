//! Batch processing command for multiple receipt files.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use recibo_core::models::ProcessResponse;
use recibo_core::{DocumentProcessor, ProcessOptions, Upload};

use super::process::{format_response, OutputFormat};
use super::{is_supported_extension, load_config};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern matching the input files
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Skip QR code recovery
    #[arg(long)]
    no_qr: bool,

    /// Request LLM analysis of the extracted text
    #[arg(long)]
    enrich: bool,
}

/// Outcome for one file of the batch.
struct BatchEntry {
    path: PathBuf,
    response: ProcessResponse,
}

impl BatchEntry {
    fn filename(&self) -> &str {
        self.path.file_name().and_then(|s| s.to_str()).unwrap_or("")
    }
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| is_supported_extension(p))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let defaults = ProcessOptions::from_config(&config);
    let options = defaults
        .with_qr(defaults.extract_qr && !args.no_qr)
        .with_enrichment(defaults.enrich || args.enrich);
    let processor = DocumentProcessor::from_config(&config);

    let mut entries = Vec::with_capacity(files.len());

    for path in files {
        let response = match Upload::from_path(&path, None) {
            Ok(upload) => processor.handle(&upload, options).await,
            Err(e) => ProcessResponse::rejected(e.to_string()),
        };

        if !response.is_success() {
            if args.continue_on_error {
                warn!("Failed to process {}: {}", path.display(), response.message);
            } else {
                error!("Failed to process {}: {}", path.display(), response.message);
                pb.abandon();
                anyhow::bail!("Processing failed for {}: {}", path.display(), response.message);
            }
        }

        entries.push(BatchEntry { path, response });
        pb.inc(1);
    }

    pb.finish_with_message("Complete");

    let (successful, failed): (Vec<&BatchEntry>, Vec<&BatchEntry>) =
        entries.iter().partition(|e| e.response.is_success());

    if let Some(output_dir) = &args.output_dir {
        for entry in &successful {
            let output_path = output_path_for(output_dir, &entry.path, args.format);
            fs::write(&output_path, format_response(&entry.response, args.format)?)?;
            debug!("Wrote output to {}", output_path.display());
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &entries)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let valid = successful
        .iter()
        .filter(|e| e.response.comprobante.as_ref().is_some_and(|c| c.is_valid))
        .count();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        entries.len(),
        start.elapsed()
    );
    println!(
        "   {} successful ({} valid receipts), {} failed",
        style(successful.len()).green(),
        valid,
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for entry in &failed {
            println!("  - {}: {}", entry.path.display(), entry.response.message);
        }
    }

    Ok(())
}

fn output_path_for(output_dir: &Path, input: &Path, format: OutputFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("comprobante");

    let extension = match format {
        OutputFormat::Json => "json",
        OutputFormat::Csv => "csv",
        OutputFormat::Text => "txt",
    };

    output_dir.join(format!("{}.{}", stem, extension))
}

fn write_summary(path: &Path, entries: &[BatchEntry]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "es_comprobante_valido",
        "punto_venta",
        "numero_comprobante",
        "fecha_emision",
        "cuit_emisor",
        "razon_social_emisor",
        "importe_total",
        "cantidad_copias",
        "processing_time_ms",
        "error",
    ])?;

    for entry in entries {
        let status = serde_json::to_value(entry.response.status)?;
        let status = status.as_str().unwrap_or_default();
        let time = entry
            .response
            .processing_time_ms
            .map(|ms| ms.to_string())
            .unwrap_or_default();

        match &entry.response.comprobante {
            Some(c) => wtr.write_record([
                entry.filename(),
                status,
                if c.is_valid { "true" } else { "false" },
                c.point_of_sale.as_deref().unwrap_or_default(),
                c.receipt_number.as_deref().unwrap_or_default(),
                c.issue_date.as_deref().unwrap_or_default(),
                c.issuer_tax_id.as_deref().unwrap_or_default(),
                c.issuer_name.as_deref().unwrap_or_default(),
                c.total_amount.as_deref().unwrap_or_default(),
                c.copy_count.to_string().as_str(),
                time.as_str(),
                "",
            ])?,
            None => wtr.write_record([
                entry.filename(),
                status,
                "false",
                "",
                "",
                "",
                "",
                "",
                "",
                "",
                time.as_str(),
                entry.response.message.as_str(),
            ])?,
        }
    }

    wtr.flush()?;
    Ok(())
}
