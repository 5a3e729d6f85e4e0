//! Process command - extract data from a single receipt file.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use recibo_core::invoice::rules::format_cuit;
use recibo_core::models::{Comprobante, ProcessResponse, ENRICHMENT_KEY};
use recibo_core::{DocumentProcessor, ProcessOptions, Upload};

use super::load_config;

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

    /// Declared content type (default: guessed from the extension)
    #[arg(long)]
    content_type: Option<String>,

    /// Skip QR code recovery
    #[arg(long)]
    no_qr: bool,

    /// Request LLM analysis of the extracted text
    #[arg(long)]
    enrich: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// Full response envelope as JSON
    Json,
    /// One CSV row with the main fields
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.set_message(format!("Processing {}...", args.input.display()));
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let upload = Upload::from_path(&args.input, args.content_type.as_deref())?;
    let defaults = ProcessOptions::from_config(&config);
    let options = defaults
        .with_qr(defaults.extract_qr && !args.no_qr)
        .with_enrichment(defaults.enrich || args.enrich);

    let processor = DocumentProcessor::from_config(&config);
    let response = processor.handle(&upload, options).await;

    pb.finish_and_clear();

    if !response.is_success() {
        anyhow::bail!("{} (HTTP {})", response.message, response.status.http_status());
    }

    let output = format_response(&response, args.format)?;

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

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

pub(crate) fn format_response(response: &ProcessResponse, format: OutputFormat) -> anyhow::Result<String> {
    let comprobante = response
        .comprobante
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("Response carries no record"))?;

    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(response)?),
        OutputFormat::Csv => format_csv(comprobante),
        OutputFormat::Text => Ok(format_text(comprobante)),
    }
}

fn format_csv(c: &Comprobante) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "archivo",
        "es_comprobante_valido",
        "punto_venta",
        "numero_comprobante",
        "fecha_emision",
        "cuit_emisor",
        "razon_social_emisor",
        "cuit_receptor",
        "importe_total",
        "cae_numero",
        "cantidad_copias",
    ])?;

    wtr.write_record([
        c.filename.as_str(),
        if c.is_valid { "true" } else { "false" },
        c.point_of_sale.as_deref().unwrap_or_default(),
        c.receipt_number.as_deref().unwrap_or_default(),
        c.issue_date.as_deref().unwrap_or_default(),
        c.issuer_tax_id.as_deref().unwrap_or_default(),
        c.issuer_name.as_deref().unwrap_or_default(),
        c.recipient_tax_id.as_deref().unwrap_or_default(),
        c.total_amount.as_deref().unwrap_or_default(),
        c.cae_number.as_deref().unwrap_or_default(),
        c.copy_count.to_string().as_str(),
    ])?;

    Ok(String::from_utf8(wtr.into_inner()?)?)
}

fn format_text(c: &Comprobante) -> String {
    let mut output = String::new();
    let show = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());

    output.push_str(&format!("File: {} ({}, {} bytes)\n", c.filename, c.content_type, c.size));
    output.push_str(&format!(
        "Valid receipt: {}\n",
        if c.is_valid { "yes" } else { "no" }
    ));
    output.push('\n');

    output.push_str(&format!(
        "Comprobante: {}-{}\n",
        show(&c.point_of_sale),
        show(&c.receipt_number)
    ));
    output.push_str(&format!("Date: {}\n", show(&c.issue_date)));
    if c.billed_from.is_some() || c.billed_to.is_some() {
        output.push_str(&format!(
            "Period: {} - {}\n",
            show(&c.billed_from),
            show(&c.billed_to)
        ));
    }
    output.push('\n');

    output.push_str("Issuer:\n");
    output.push_str(&format!("  {}\n", show(&c.issuer_name)));
    if let Some(cuit) = &c.issuer_tax_id {
        output.push_str(&format!("  CUIT: {}\n", format_cuit(cuit)));
    }
    if let Some(category) = &c.issuer_tax_category {
        output.push_str(&format!("  IVA: {}\n", category));
    }
    output.push('\n');

    output.push_str("Recipient:\n");
    output.push_str(&format!("  {}\n", show(&c.recipient_name)));
    if let Some(cuit) = &c.recipient_tax_id {
        output.push_str(&format!("  CUIT: {}\n", format_cuit(cuit)));
    }
    output.push('\n');

    output.push_str(&format!("Total: $ {}\n", show(&c.total_amount)));
    if let Some(cae) = &c.cae_number {
        output.push_str(&format!(
            "CAE: {} (expires {})\n",
            cae,
            show(&c.cae_expiry_date)
        ));
    }
    if c.copy_count > 0 {
        output.push_str(&format!("Copies: {}\n", c.copy_count));
    }
    if let Some(qr) = &c.qr_content {
        output.push_str(&format!("QR: {}\n", qr));
    }
    if let Some(analysis) = c.unformatted.get(ENRICHMENT_KEY) {
        output.push_str(&format!("\nAnalysis:\n{}\n", analysis));
    }

    if !c.diagnostics.is_empty() {
        output.push_str("\nDiagnostics:\n");
        for line in &c.diagnostics {
            output.push_str(&format!("  - {}\n", line));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Comprobante {
        Comprobante {
            filename: "factura.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            size: 1024,
            is_valid: true,
            point_of_sale: Some("0001".to_string()),
            receipt_number: Some("123".to_string()),
            issue_date: Some("01/01/2024".to_string()),
            total_amount: Some("100,00".to_string()),
            issuer_tax_id: Some("20123456786".to_string()),
            issuer_name: Some("ACME".to_string()),
            ..Comprobante::default()
        }
    }

    #[test]
    fn test_text_summary_formats_cuit() {
        let text = format_text(&sample());
        assert!(text.contains("Comprobante: 0001-123"));
        assert!(text.contains("CUIT: 20-12345678-6"));
        assert!(text.contains("Total: $ 100,00"));
        assert!(!text.contains("Diagnostics"));
    }

    #[test]
    fn test_csv_has_header_and_row() {
        let csv = format_csv(&sample()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("archivo,es_comprobante_valido"));
        assert!(lines[1].starts_with("factura.pdf,true,0001,123"));
    }
}
