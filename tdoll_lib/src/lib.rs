//! Library layer for the T-Doll scraper: page extraction, record assembly,
//! JSON/CSV persistence and the scrape loop.
//!
//! Wraps the `gfwiki_api` HTTP client with the field selectors and keyword
//! tables needed to turn wiki pages into flat records.

pub mod aura;
pub mod class;
pub mod error;
pub mod extract;
pub mod persist;
pub mod record;
pub mod run;

pub use gfwiki_api;
pub use scraper::Html;

pub use class::{BuffValueShape, ClassTraits, WeaponClass};
pub use error::{ExtractError, ScrapeError};
pub use persist::{CsvWriter, JsonArrayWriter};
pub use record::{assemble, AuraBuffValues, CharacterRecord, FIELD_NAMES};
pub use run::{Failure, ScrapeConfig, ScrapeProgress, ScrapeSummary, Scraper, Silent};
