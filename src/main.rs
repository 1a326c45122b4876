use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use apidoc_scraper::config::{DEFAULT_TIMEOUT_SECS, DEFAULT_URL};
use apidoc_scraper::{build_catalog, derive_name, Catalog, CatalogOptions, Fetcher, ScrapeConfig, Selectors};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use regex::Regex;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "apidoc_scraper", about = "API reference scraper: endpoints and response shapes")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the reference page and print its endpoint catalog
    Scrape {
        /// Page to scrape
        #[arg(long, default_value = DEFAULT_URL)]
        url: String,
        /// How to load the page (spider needs SPIDER_API_KEY)
        #[arg(long, value_enum, default_value_t = FetcherKind::Http)]
        fetcher: FetcherKind,
        /// Seconds before giving up on the page
        #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
        timeout: u64,
        #[command(flatten)]
        catalog: CatalogArgs,
    },
    /// Build the catalog from a saved HTML file
    Parse {
        /// HTML file to read
        path: PathBuf,
        #[command(flatten)]
        catalog: CatalogArgs,
    },
    /// Print the response-shape name for a method and URL
    Name {
        /// HTTP method, any case
        method: String,
        /// URL template, e.g. /v1/files/:file_key
        #[arg(default_value = "")]
        url: String,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FetcherKind {
    Http,
    Spider,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Table,
}

#[derive(Args)]
struct CatalogArgs {
    /// Only process sections whose id matches this regex
    #[arg(long)]
    only: Option<String>,
    /// Parse endpoints one at a time, in document order
    #[arg(long)]
    sequential: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
    #[arg(long)]
    section_selector: Option<String>,
    #[arg(long)]
    endpoint_selector: Option<String>,
    #[arg(long)]
    label_selector: Option<String>,
    #[arg(long)]
    response_selector: Option<String>,
}

impl CatalogArgs {
    fn options(&self) -> anyhow::Result<CatalogOptions> {
        let defaults = Selectors::default();
        let section_filter = self
            .only
            .as_deref()
            .map(Regex::new)
            .transpose()
            .context("Invalid --only pattern")?;

        Ok(CatalogOptions {
            selectors: Selectors {
                section: self.section_selector.clone().unwrap_or(defaults.section),
                endpoint: self.endpoint_selector.clone().unwrap_or(defaults.endpoint),
                label: self.label_selector.clone().unwrap_or(defaults.label),
                response: self.response_selector.clone().unwrap_or(defaults.response),
            },
            section_filter,
            parallel: !self.sequential,
        })
    }
}

/// What gets printed: the catalog plus where and when it came from.
#[derive(Serialize)]
struct CatalogReport<'a> {
    source: &'a str,
    scraped_at: DateTime<Utc>,
    #[serde(flatten)]
    catalog: &'a Catalog,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Scrape { url, fetcher, timeout, catalog } => {
            let config = ScrapeConfig {
                url,
                timeout: Duration::from_secs(timeout),
                catalog: catalog.options()?,
            };
            let fetcher = match fetcher {
                FetcherKind::Http => Fetcher::http(config.timeout),
                FetcherKind::Spider => Fetcher::spider_from_env(config.timeout)?,
            };

            let pb = ProgressBar::new_spinner();
            pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
            pb.set_message(format!("Fetching {}", config.url));
            pb.enable_steady_tick(Duration::from_millis(120));
            let page = fetcher.open(&config.url).await;
            pb.finish_and_clear();

            let page = page.with_context(|| format!("Failed to open {}", config.url))?;
            let built = build_catalog(&page, &config.catalog)
                .with_context(|| format!("Failed to build catalog from {}", config.url))?;
            print_catalog(page.source(), &built, catalog.format)
        }
        Commands::Parse { path, catalog } => {
            let options = catalog.options()?;
            let html = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let source = path.display().to_string();
            let page = apidoc_scraper::HtmlPage::parse(source.as_str(), &html);
            let built = build_catalog(&page, &options)
                .with_context(|| format!("Failed to build catalog from {}", source))?;
            print_catalog(&source, &built, catalog.format)
        }
        Commands::Name { method, url } => {
            println!("{}", derive_name(&method, &url));
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        eprintln!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn print_catalog(source: &str, catalog: &Catalog, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            let report = CatalogReport {
                source,
                scraped_at: Utc::now(),
                catalog,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Table => print_table(catalog),
    }
    Ok(())
}

fn print_table(catalog: &Catalog) {
    println!(
        "{:>3} | {:<24} | {:<6} | {:<48} | {:<32}",
        "#", "Section", "Method", "URL", "Response"
    );
    println!("{}", "-".repeat(125));

    let mut i = 0;
    for section in &catalog.sections {
        for endpoint in &section.endpoints {
            i += 1;
            let method = endpoint.method.map(|m| m.as_str()).unwrap_or("-");
            let response = endpoint.response.as_deref().unwrap_or("-");
            println!(
                "{:>3} | {:<24} | {:<6} | {:<48} | {:<32}",
                i,
                truncate(&section.id, 24),
                method,
                truncate(&endpoint.url, 48),
                truncate(response, 32)
            );
        }
    }

    let s = &catalog.stats;
    println!(
        "\n{} sections ({} skipped) | {} endpoints ({} unreadable) | {} shapes ({} collisions)",
        catalog.sections.len(),
        s.sections_skipped,
        catalog.endpoint_count(),
        s.endpoints_skipped,
        catalog.shapes.len(),
        s.shape_collisions,
    );
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
