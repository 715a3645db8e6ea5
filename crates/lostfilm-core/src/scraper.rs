//! Main LostFilm scraper API
//!
//! This module combines the HTTP client with the parsers and the XML writer:
//! fetch the catalog, fetch every detail page one after another, aggregate the
//! records and write the three output documents.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::client::{ClientConfig, LostfilmClient};
use crate::error::Result;
use crate::normalize::{tokenize, FIELD_SEPARATORS};
use crate::parser::{CatalogParser, DetailParser};
use crate::types::{Aggregate, CatalogEntry, SeriesRecord};
use crate::xml::{OutputEncoding, XmlWriter};

/// Path of the catalog page
const CATALOG_PATH: &str = "/serials.php";

/// Configuration for a scraper run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Base URL, timeout and source codepage
    pub client: ClientConfig,
    /// Path of the catalog page (default: /serials.php)
    pub catalog_path: String,
    /// Directory the XML documents are written to (default: current directory)
    pub output_dir: PathBuf,
    /// Encoding of the XML documents (default: UTF-8)
    pub output_encoding: OutputEncoding,
    /// Capitalize the first letter of country tokens (default: false)
    pub capitalize_countries: bool,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            client: ClientConfig::default(),
            catalog_path: CATALOG_PATH.to_string(),
            output_dir: PathBuf::from("."),
            output_encoding: OutputEncoding::Utf8,
            capitalize_countries: false,
        }
    }
}

/// Main scraper API for LostFilm.tv
///
/// All fetches are sequential: each page is received and parsed before the
/// next request is sent.
///
/// # Example
/// ```no_run
/// use lostfilm_core::LostfilmScraper;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let scraper = LostfilmScraper::new()?;
///     let aggregate = scraper.run().await?;
///     println!("Scraped {} series", aggregate.records.len());
///     Ok(())
/// }
/// ```
pub struct LostfilmScraper {
    client: LostfilmClient,
    config: ScraperConfig,
    catalog_parser: CatalogParser,
    detail_parser: DetailParser,
}

impl LostfilmScraper {
    /// Create a new scraper with default configuration.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new() -> Result<Self> {
        Self::with_config(ScraperConfig::default())
    }

    /// Create a new scraper with custom configuration.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_config(config: ScraperConfig) -> Result<Self> {
        let client = LostfilmClient::with_config(config.client.clone())?;
        Ok(Self {
            client,
            config,
            catalog_parser: CatalogParser::new(),
            detail_parser: DetailParser::new(),
        })
    }

    /// Run the whole pipeline once and write the output documents.
    ///
    /// # Returns
    /// * `Ok(Aggregate)` - records and distinct token sets that were written
    /// * `Err(ScrapeError)` - the catalog could not be fetched, or an output
    ///   document could not be written
    pub async fn run(&self) -> Result<Aggregate> {
        let entries = self.fetch_catalog().await?;
        let aggregate = self.aggregate(entries).await;
        self.xml_writer().write_all(&aggregate)?;
        Ok(aggregate)
    }

    /// Fetch and parse the catalog page.
    ///
    /// # Errors
    /// Any fetch error; there is nothing to aggregate without a catalog.
    pub async fn fetch_catalog(&self) -> Result<Vec<CatalogEntry>> {
        let page = self.client.fetch(&self.config.catalog_path).await?;
        let entries = self.catalog_parser.parse(&page);
        log::info!("Received {} URLs", entries.len());
        for entry in &entries {
            log::debug!(
                "url: {}, loc: {}, orig: {}",
                entry.relative_path,
                entry.localized_name,
                entry.original_name
            );
        }
        Ok(entries)
    }

    /// Fetch and parse the detail page of one catalog entry.
    ///
    /// # Errors
    /// - Any fetch error for the detail page
    /// - `ScrapeError::ParseMiss` if the description block is not on the page
    pub async fn fetch_series(&self, entry: CatalogEntry) -> Result<SeriesRecord> {
        let page = self.client.fetch(&entry.relative_path).await?;
        let detail = self
            .detail_parser
            .parse(&page, &entry.localized_name, &entry.original_name)?;
        Ok(SeriesRecord::new(entry, detail))
    }

    /// Build records for all entries and collect the distinct tokens.
    ///
    /// An entry whose page cannot be fetched or parsed is logged and skipped,
    /// so the result has at most `entries.len()` records.
    pub async fn aggregate(&self, entries: Vec<CatalogEntry>) -> Aggregate {
        let total = entries.len();
        let mut received = 0usize;
        let mut records = Vec::with_capacity(total);

        for entry in entries {
            let name = entry.localized_name.clone();
            match self.fetch_series(entry).await {
                Ok(record) => {
                    received += 1;
                    log::info!("<{}> Received info about {}", received, name);
                    records.push(record);
                }
                Err(e) => log::warn!("Skipping {}: {}", name, e),
            }
        }

        if received < total {
            log::warn!("{} of {} series skipped", total - received, total);
        }

        let genres = collect_tokens(records.iter().map(|r| r.genre.as_str()), true);
        let countries = collect_tokens(
            records.iter().map(|r| r.country.as_str()),
            self.config.capitalize_countries,
        );

        Aggregate {
            records,
            genres,
            countries,
        }
    }

    /// XML writer matching this scraper's output configuration
    pub fn xml_writer(&self) -> XmlWriter {
        XmlWriter::new(self.config.output_dir.clone(), self.config.output_encoding)
            .with_capitalized_countries(self.config.capitalize_countries)
    }
}

/// Union of the tokens of every field.
pub fn collect_tokens<'a, I>(fields: I, capitalize_first: bool) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a str>,
{
    fields
        .into_iter()
        .flat_map(|field| tokenize(field, FIELD_SEPARATORS, capitalize_first))
        .collect()
}
