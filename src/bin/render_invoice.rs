//! render-invoice: fill the invoice template for one invoice and convert it
//! to PDF with the office suite.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;

use report_render_service::config::LoggingConfig;
use report_render_service::convert::{DocumentConverter, OfficeConverter};
use report_render_service::loader::{load_json, load_template};
use report_render_service::report::{invoice_context, InvoiceBook};
use report_render_service::telemetry::init_tracing;
use report_render_service::template::{render, Dialect, RenderOptions, ResolvePolicy};

#[derive(Parser, Debug)]
#[command(name = "render-invoice")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Invoice data file (`{"invoices": [...]}`)
    #[arg(long, default_value = "data/data.json")]
    data: PathBuf,
    /// Rich-text invoice template
    #[arg(long, default_value = "templates/template2.rtf")]
    template: PathBuf,
    /// Zero-based index of the invoice to render
    #[arg(long, default_value_t = 0)]
    invoice: usize,
    /// Unresolved placeholders: `strict` keeps them, `lenient` blanks them
    #[arg(long, default_value = "strict")]
    policy: ResolvePolicy,
    /// Where to write the filled rich text
    #[arg(long, default_value = "filled.rtf")]
    rtf: PathBuf,
    /// Where to write the PDF
    #[arg(long, default_value = "invoice.pdf")]
    output: PathBuf,
    /// Stop after writing the filled rich text
    #[arg(long)]
    no_convert: bool,
    /// Office suite executable
    #[arg(long, default_value = "soffice")]
    converter: String,
    /// Converter timeout in seconds
    #[arg(long, default_value_t = 60)]
    timeout: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&LoggingConfig::default())?;

    let body = load_template(&cli.template).await?;
    let book: InvoiceBook = load_json(&cli.data).await?;

    let Some(invoice) = book.get(cli.invoice) else {
        bail!(
            "invoice {} not found in {} ({} invoices)",
            cli.invoice,
            cli.data.display(),
            book.len()
        );
    };

    let options = RenderOptions::new(Dialect::detect(&body), cli.policy);
    let filled = render(&body, &invoice_context(invoice), options)
        .with_context(|| format!("rendering {}", cli.template.display()))?;

    tokio::fs::write(&cli.rtf, &filled)
        .await
        .with_context(|| format!("writing {}", cli.rtf.display()))?;
    tracing::info!(path = %cli.rtf.display(), "Filled rich text written");

    if cli.no_convert {
        return Ok(());
    }

    let converter = OfficeConverter::new(cli.converter, Duration::from_secs(cli.timeout));
    converter
        .convert(&cli.rtf, &cli.output)
        .await
        .with_context(|| format!("converting {} to PDF", cli.rtf.display()))?;
    tracing::info!(path = %cli.output.display(), "PDF written");

    Ok(())
}
