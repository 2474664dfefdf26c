//! Command-line interface for e-book catalogs.
//!
//! `scan` prints what a directory of archives contains; `serve` scans it once
//! and then serves the rendered catalog over HTTP.

use catalog::{scan, Catalog, CatalogTemplate, ErrorPolicy, ScanOptions};
use catalog_cli::{start_server, AppState};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "ebook-catalog")]
#[command(version, about = "Build and serve an HTML catalog of e-books", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a directory and print the catalog
    Scan {
        #[command(flatten)]
        args: ScanArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Scan a directory, then serve the catalog over HTTP
    Serve {
        #[command(flatten)]
        args: ScanArgs,

        /// Address to listen on
        #[arg(long, env = "EBOOK_CATALOG_ADDR", default_value = "0.0.0.0:8080")]
        addr: String,

        /// HTML template file (upon syntax); the built-in template is used if omitted
        #[arg(long)]
        template: Option<PathBuf>,
    },
}

#[derive(Args)]
struct ScanArgs {
    /// Directory containing the e-books
    #[arg(default_value = "./books")]
    dir: PathBuf,

    /// What to do with an archive that fails to extract: abort, skip
    #[arg(long, default_value = "abort")]
    on_error: ErrorPolicy,

    /// Archive file extension, without the dot
    #[arg(long, default_value = "epub")]
    extension: String,
}

impl From<&ScanArgs> for ScanOptions {
    fn from(args: &ScanArgs) -> Self {
        ScanOptions {
            extension: args.extension.clone(),
            on_error: args.on_error,
        }
    }
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Scan { args, json } => handle_scan(&args, json),
        Commands::Serve {
            args,
            addr,
            template,
        } => handle_serve(&args, &addr, template.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Scan with a spinner showing the archive currently being read
fn scan_with_progress(args: &ScanArgs) -> Result<Catalog, Box<dyn std::error::Error>> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(100));

    let progress_cb = |path: &Path| spinner.set_message(path.display().to_string());
    let result = scan(&args.dir, &ScanOptions::from(args), &progress_cb);
    spinner.finish_and_clear();

    let catalog = result?;
    for skipped in catalog.skipped() {
        eprintln!("Skipped {}: {}", skipped.path.display(), skipped.reason);
    }
    Ok(catalog)
}

fn handle_scan(args: &ScanArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = scan_with_progress(args)?;

    if json {
        println!("{}", serde_json::to_string_pretty(catalog.records())?);
        return Ok(());
    }

    for record in catalog.records() {
        let cover = record
            .cover
            .as_ref()
            .map(|c| c.display().to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{}\t{}\t{}\t{}",
            record.title,
            record.creator,
            record.path.display(),
            cover
        );
    }
    println!("{} books", catalog.len());
    Ok(())
}

fn handle_serve(
    args: &ScanArgs,
    addr: &str,
    template: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    // Compiled before the scan; template errors never reach a request.
    let template = match template {
        Some(path) => CatalogTemplate::from_file(path)?,
        None => CatalogTemplate::builtin()?,
    };
    let catalog = scan_with_progress(args)?;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(start_server(addr, AppState::new(catalog, template)))?;
    Ok(())
}
