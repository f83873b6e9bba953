use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use tdoll_lib::gfwiki_api::{Client, DEFAULT_BASE_URL};
use tdoll_lib::{CharacterRecord, ScrapeConfig, ScrapeError, ScrapeProgress, Scraper};

#[derive(Args)]
pub struct ScrapeArgs {
    /// Wiki root the index and character pages are fetched from
    #[arg(long, env = "GFWIKI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Seconds to wait after every successful request
    #[arg(long, default_value = "20")]
    pub delay_secs: u64,

    /// Directory for tdoll_data.json and tdoll_data.csv
    #[arg(long, default_value = "saves")]
    pub saves_dir: PathBuf,

    /// Directory for downloaded profile images
    #[arg(long, default_value = "images")]
    pub images_dir: PathBuf,

    /// Only scrape the first N names of the index
    #[arg(long)]
    pub limit: Option<usize>,
}

/// Echoes names and failures above an indicatif bar.
struct BarProgress {
    pb: ProgressBar,
}

impl ScrapeProgress for BarProgress {
    fn listed(&self, total: usize) {
        self.pb.set_length(total as u64);
    }

    fn started(&self, _index: usize, name: &str) {
        self.pb.println(name);
        self.pb.set_message(name.to_string());
    }

    fn scraped(&self, _record: &CharacterRecord) {
        self.pb.inc(1);
    }

    fn failed(&self, name: &str, error: &ScrapeError) {
        self.pb
            .println(format!("Error: {}, Aborted scraping {}", error, name));
        self.pb.inc(1);
    }
}

pub async fn run(args: &ScrapeArgs) -> Result<()> {
    let client = Client::with_base_url(&args.base_url)
        .with_context(|| format!("invalid base url {}", args.base_url))?
        .with_crawl_delay(Duration::from_secs(args.delay_secs));
    let config = ScrapeConfig {
        saves_dir: args.saves_dir.clone(),
        images_dir: args.images_dir.clone(),
        limit: args.limit,
    };
    let scraper = Scraper::new(client, config);

    let pb = ProgressBar::new(0);
    pb.set_style(ProgressStyle::with_template(
        "[{elapsed_precise}] {bar:40.cyan/blue} {pos:>4}/{len:4} {msg}",
    )?);
    pb.println("Now scraping...");

    let progress = BarProgress { pb };
    let summary = scraper
        .run(&progress)
        .await
        .context("scrape aborted before any T-Doll was processed")?;
    progress.pb.finish_and_clear();

    println!(
        "Data harvest complete. Check {}/ directory for results.",
        args.saves_dir.display()
    );
    eprintln!(
        "{} listed, {} saved, {} skipped",
        summary.total,
        summary.scraped,
        summary.skipped()
    );
    for failure in &summary.failures {
        eprintln!("  {}: {}", failure.name, failure.message);
    }
    if !summary.json_only.is_empty() {
        eprintln!(
            "  in the JSON file but missing from the CSV file: {}",
            summary.json_only.join(", ")
        );
    }

    Ok(())
}
