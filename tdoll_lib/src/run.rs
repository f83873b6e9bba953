//! The scrape loop: index page, then every character in turn.

use std::fs;
use std::path::PathBuf;

use gfwiki_api::{Client, INDEX_PATH};
use scraper::Html;
use tracing::{info, warn};

use crate::error::ScrapeError;
use crate::extract;
use crate::persist::{CsvWriter, JsonArrayWriter};
use crate::record::{self, CharacterRecord};

/// Stem shared by the JSON and CSV output files.
pub const DATA_STEM: &str = "tdoll_data";

/// Where output goes and how much of the index to process.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub saves_dir: PathBuf,
    pub images_dir: PathBuf,
    /// Process only the first `limit` names of the index.
    pub limit: Option<usize>,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            saves_dir: PathBuf::from("saves"),
            images_dir: PathBuf::from("images"),
            limit: None,
        }
    }
}

impl ScrapeConfig {
    pub fn json_path(&self) -> PathBuf {
        self.saves_dir.join(format!("{DATA_STEM}.json"))
    }

    pub fn csv_path(&self) -> PathBuf {
        self.saves_dir.join(format!("{DATA_STEM}.csv"))
    }
}

/// Hooks for reporting progress while the loop runs.
pub trait ScrapeProgress {
    /// Called once the index is read, before the first character.
    fn listed(&self, _total: usize) {}
    fn started(&self, _index: usize, _name: &str) {}
    fn scraped(&self, _record: &CharacterRecord) {}
    fn failed(&self, _name: &str, _error: &ScrapeError) {}
}

/// Progress sink that ignores everything.
pub struct Silent;

impl ScrapeProgress for Silent {}

/// A character that was skipped, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub name: String,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct ScrapeSummary {
    /// Names attempted.
    pub total: usize,
    /// Records written to both output files.
    pub scraped: usize,
    pub failures: Vec<Failure>,
    /// Characters saved to the JSON file whose CSV row could not be written.
    pub json_only: Vec<String>,
}

impl ScrapeSummary {
    pub fn skipped(&self) -> usize {
        self.failures.len()
    }
}

pub struct Scraper {
    client: Client,
    config: ScrapeConfig,
}

impl Scraper {
    pub fn new(client: Client, config: ScrapeConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    /// Names listed on the T-Doll index page.
    pub async fn character_names(&self) -> Result<Vec<String>, ScrapeError> {
        let html = self.client.get_page(INDEX_PATH).await?;
        let doc = Html::parse_document(&html);
        Ok(extract::index_names(&doc)?)
    }

    /// Runs a full scrape.
    ///
    /// Output files are truncated first. A failure while processing one
    /// character skips that character and is recorded in the summary; only
    /// setup failures and an unreadable index page end the run early.
    pub async fn run(&self, progress: &dyn ScrapeProgress) -> Result<ScrapeSummary, ScrapeError> {
        let mut json = JsonArrayWriter::create(self.config.json_path())?;
        let csv = CsvWriter::create(self.config.csv_path())?;
        fs::create_dir_all(&self.config.images_dir)?;

        let mut names = self.character_names().await?;
        if let Some(limit) = self.config.limit {
            names.truncate(limit);
        }
        info!("{} T-Dolls listed on the index", names.len());
        progress.listed(names.len());

        let mut summary = ScrapeSummary {
            total: names.len(),
            ..Default::default()
        };

        for (index, name) in names.iter().enumerate() {
            progress.started(index, name);
            match self.scrape_one(name, &mut json, &csv, &mut summary).await {
                Ok(record) => {
                    summary.scraped += 1;
                    progress.scraped(&record);
                }
                Err(err) => {
                    warn!("Aborted scraping {}: {}", name, err);
                    progress.failed(name, &err);
                    summary.failures.push(Failure {
                        name: name.clone(),
                        message: err.to_string(),
                    });
                }
            }
        }

        json.finish()?;
        Ok(summary)
    }

    /// Fetch, extract, persist, then fetch the profile image.
    ///
    /// The record is written before the image is looked up, so a failed
    /// image leaves the record in place. The two sinks are not
    /// transactional: a CSV failure after the JSON append is noted in
    /// `summary.json_only`.
    async fn scrape_one(
        &self,
        name: &str,
        json: &mut JsonArrayWriter,
        csv: &CsvWriter,
        summary: &mut ScrapeSummary,
    ) -> Result<CharacterRecord, ScrapeError> {
        let html = self.client.get_page(&record::character_path(name)).await?;
        let doc = Html::parse_document(&html);
        let record = record::assemble(name, &doc)?;

        json.append(&record)?;
        if let Err(err) = csv.append(&record) {
            warn!(
                "{} saved to {} but not to {}",
                record.name,
                json.path().display(),
                csv.path().display()
            );
            summary.json_only.push(record.name.clone());
            return Err(err);
        }
        info!("Saved {} ({} {})", record.name, record.rarity, record.wclass);

        let src = extract::profile_image_src(&doc)?;
        let dest = self
            .config
            .images_dir
            .join(record::profile_image_filename(&record.name));
        self.client.download(&src, &dest).await?;

        Ok(record)
    }
}
