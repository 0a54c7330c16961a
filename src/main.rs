mod config;
mod extract;
mod fetch;
mod ids;
mod pipeline;
mod render;
mod store;
mod urls;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{error, warn};

use crate::config::ScrapeConfig;
use crate::fetch::{Fetch, HttpFetcher};
use crate::render::ChromeRenderer;

#[derive(Parser)]
#[command(name = "qs_scraper", about = "University rankings scraper")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape the configured listing pages and write records + schema
    Run {
        /// Inclusive upper page index (overrides config)
        #[arg(short = 'n', long)]
        pages: Option<u32>,
        /// JSON config file (built-in defaults if omitted)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Output directory
        #[arg(long, default_value = "data")]
        out_dir: PathBuf,
    },
    /// Write only the schema descriptor document
    Schema {
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, default_value = "data")]
        out_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            pages,
            config,
            out_dir,
        } => run(pages, config.as_deref(), &out_dir).await,
        Commands::Schema { config, out_dir } => {
            let cfg = ScrapeConfig::load(config.as_deref())?;
            std::fs::create_dir_all(&out_dir)?;
            let path = out_dir.join(&cfg.schema_file);
            store::write_schema(&path)?;
            println!("Schema saved to {}", path.display());
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

async fn run(pages: Option<u32>, config: Option<&Path>, out_dir: &Path) -> Result<()> {
    let mut cfg = ScrapeConfig::load(config)?;
    if let Some(pages) = pages {
        cfg.max_page = pages;
    }

    println!(
        "Scraping pages 0..={} from {} ...",
        cfg.max_page, cfg.source.domain
    );

    let renderer = ChromeRenderer::launch(Duration::from_secs(cfg.wait_timeout_secs)).await?;
    let fetcher: Arc<dyn Fetch> =
        Arc::new(HttpFetcher::new(Duration::from_secs(cfg.fetch_timeout_secs))?);

    // Release the browser on both exit paths before inspecting the outcome.
    let outcome = pipeline::run(&cfg, &renderer, fetcher).await;
    if let Err(e) = renderer.close().await {
        warn!("Failed to shut down browser: {}", e);
    }
    let report = outcome?;

    println!(
        "Collected {} records from {} pages ({} detail errors, {} pages skipped).",
        report.records.len(),
        report.pages_scraped,
        report.detail_errors,
        report.pages_skipped
    );

    if let Err(e) = std::fs::create_dir_all(out_dir) {
        error!("Failed to create {}: {}", out_dir.display(), e);
    }

    // Two independent writes; one failing must not stop the other, and
    // neither failure changes the exit code once collection succeeded.
    let records_path = out_dir.join(&cfg.records_file);
    match store::write_records(&records_path, &report.records) {
        Ok(()) => println!("Records saved to {}", records_path.display()),
        Err(e) => error!("Failed to write records: {:#}", e),
    }

    let schema_path = out_dir.join(&cfg.schema_file);
    match store::write_schema(&schema_path) {
        Ok(()) => println!("Schema saved to {}", schema_path.display()),
        Err(e) => error!("Failed to write schema: {:#}", e),
    }

    Ok(())
}

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
