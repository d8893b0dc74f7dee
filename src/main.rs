//! invoice-forge – command-line invoice → PDF generator.
//!
//! Usage:
//!   invoice-forge <invoice.json> [output.pdf] [--download] [--landscape]
//!                 [--title "Invoice"] [--date 2024-03-07] [--layout-json layout.json]
//!
//! If `output.pdf` is omitted the PDF is written next to the input file using
//! the suggested filename for the chosen intent (`invoice.pdf` for preview,
//! `Invoice.pdf` for download).

use std::{fs, path::PathBuf, process};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;

use invoice_forge::clock::{Clock, FixedClock, SystemClock};
use invoice_forge::pipeline::{compute_layout_config, generate_invoice_pdf, PageOrientation, PipelineConfig};
use invoice_forge::{DocumentIntent, Invoice, InvoiceError};

/// Exit status when the invoice itself is rejected.
const EXIT_INVALID_INVOICE: i32 = 2;

#[derive(Debug, Parser)]
#[command(name = "invoice-forge", version, about = "Render a JSON invoice to PDF")]
struct Cli {
    /// Invoice JSON (clientName, clientEmail, clientAddress, items[])
    input: PathBuf,

    /// Output path (default: input directory + suggested filename)
    output: Option<PathBuf>,

    /// Use the download filename (Invoice.pdf) instead of the preview one
    #[arg(long)]
    download: bool,

    /// Use landscape page orientation (A4 841×595 pt)
    #[arg(long, short = 'l')]
    landscape: bool,

    /// Document title in PDF metadata
    #[arg(long, short = 't', default_value = "Invoice")]
    title: String,

    /// Date printed on the invoice, YYYY-MM-DD (default: today)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Also write the computed page layout as JSON
    #[arg(long)]
    layout_json: Option<PathBuf>,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        let rejected = e
            .downcast_ref::<InvoiceError>()
            .is_some_and(InvoiceError::is_client_error);
        process::exit(if rejected { EXIT_INVALID_INVOICE } else { 1 });
    }
}

fn run(cli: Cli) -> Result<()> {
    let intent = if cli.download {
        DocumentIntent::Download
    } else {
        DocumentIntent::Preview
    };

    let output = cli.output.clone().unwrap_or_else(|| {
        cli.input
            .parent()
            .map(|dir| dir.join(intent.file_name()))
            .unwrap_or_else(|| PathBuf::from(intent.file_name()))
    });

    let json = fs::read_to_string(&cli.input)
        .with_context(|| format!("reading '{}'", cli.input.display()))?;
    let invoice = Invoice::from_json(&json)?;

    let clock: Box<dyn Clock> = match cli.date {
        Some(date) => Box::new(FixedClock(date)),
        None => Box::new(SystemClock),
    };

    let config = PipelineConfig {
        title: cli.title.clone(),
        orientation: if cli.landscape {
            PageOrientation::Landscape
        } else {
            PageOrientation::Portrait
        },
        ..PipelineConfig::default()
    };

    if let Some(path) = &cli.layout_json {
        let layout = compute_layout_config(&invoice, clock.as_ref(), &config)?;
        fs::write(path, layout.to_json()?)
            .with_context(|| format!("writing '{}'", path.display()))?;
    }

    let rendered = generate_invoice_pdf(&invoice, clock.as_ref(), &config)?;

    // Create output directory if necessary.
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).context("creating output directory")?;
        }
    }
    fs::write(&output, &rendered.bytes)
        .with_context(|| format!("writing '{}'", output.display()))?;

    let pages = rendered.page_count;
    eprintln!(
        "Wrote '{}' ({} bytes, {} page{}, total {}, {})",
        output.display(),
        rendered.bytes.len(),
        pages,
        if pages == 1 { "" } else { "s" },
        invoice_forge::money::format_currency(rendered.total_amount),
        intent.content_type()
    );
    Ok(())
}
