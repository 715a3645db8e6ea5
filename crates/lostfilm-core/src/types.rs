//! Data types for the LostFilm scraper
//!
//! This module contains the core data structures passed between the parsers,
//! the aggregator and the XML writer. All types implement Serialize and
//! Deserialize for JSON compatibility.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One row of the catalog page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Relative URL of the detail page (e.g. "/browse.php?cat=42")
    pub relative_path: String,
    /// Localized (Russian) name
    pub localized_name: String,
    /// Original (usually English) name
    pub original_name: String,
}

impl CatalogEntry {
    /// Create a new catalog entry
    pub fn new(
        relative_path: impl Into<String>,
        localized_name: impl Into<String>,
        original_name: impl Into<String>,
    ) -> Self {
        Self {
            relative_path: relative_path.into(),
            localized_name: localized_name.into(),
            original_name: original_name.into(),
        }
    }
}

/// Fields scraped from a series detail page.
///
/// A field that is absent on the page is an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesDetail {
    pub country: String,
    pub release_year: String,
    pub genre: String,
    pub seasons_amount: String,
    pub status: String,
}

/// Catalog entry merged with its detail page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesRecord {
    pub relative_path: String,
    pub localized_name: String,
    pub original_name: String,
    pub country: String,
    pub release_year: String,
    pub genre: String,
    pub seasons_amount: String,
    pub status: String,
}

impl SeriesRecord {
    /// Merge a catalog entry with the fields of its detail page
    pub fn new(entry: CatalogEntry, detail: SeriesDetail) -> Self {
        Self {
            relative_path: entry.relative_path,
            localized_name: entry.localized_name,
            original_name: entry.original_name,
            country: detail.country,
            release_year: detail.release_year,
            genre: detail.genre,
            seasons_amount: detail.seasons_amount,
            status: detail.status,
        }
    }
}

impl fmt::Display for SeriesRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Path:           {}", self.relative_path)?;
        writeln!(f, "Locale name:    {}", self.localized_name)?;
        writeln!(f, "Original name:  {}", self.original_name)?;
        writeln!(f, "Country:        {}", self.country)?;
        writeln!(f, "Release year:   {}", self.release_year)?;
        writeln!(f, "Genre:          {}", self.genre)?;
        writeln!(f, "Seasons amount: {}", self.seasons_amount)?;
        write!(f, "Status:         {}", self.status)
    }
}

/// Result of one aggregation run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Aggregate {
    /// One record per successfully scraped catalog entry, in catalog order
    pub records: Vec<SeriesRecord>,
    /// Distinct genre tokens across all records
    pub genres: BTreeSet<String>,
    /// Distinct country tokens across all records
    pub countries: BTreeSet<String>,
}
