//! `recibo` - turn AFIP receipts (PDF or photo) into structured records.
//!
//! Text comes from the PDF text layer or Tesseract OCR, QR payloads from the
//! first page, and fields from the AFIP label catalog in `recibo-core`.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, config, process};

/// Read Argentine receipts (Factura / Recibo / Nota) into JSON or CSV records
#[derive(Parser)]
#[command(name = "recibo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log pipeline steps to stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (default: <config dir>/recibo/config.json)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract one receipt and print its record
    Process(process::ProcessArgs),

    /// Extract every receipt matching a glob, with an optional CSV summary
    Batch(batch::BatchArgs),

    /// Show or edit OCR, PDF, QR and enrichment settings
    Config(config::ConfigArgs),
}

/// Log level for a `-v` count. Diagnostics stay on the record regardless.
fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stdout carries the record, so logs go to stderr
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level(cli.verbose))
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Process(args) => process::run(args, config_path).await,
        Commands::Batch(args) => batch::run(args, config_path).await,
        Commands::Config(args) => config::run(args, config_path).await,
    }
}
