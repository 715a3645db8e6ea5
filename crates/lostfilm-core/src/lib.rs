//! LostFilm Scraper Core Library
//!
//! This crate provides the core scraping functionality for the LostFilm.tv
//! series catalog.
//!
//! # Features
//! - Parse the full series catalog
//! - Scrape country, year, genre, season count and status per series
//! - Collect the distinct genres and countries
//! - Write the results as XML in UTF-8 or windows-1251

pub mod client;
pub mod error;
pub mod normalize;
pub mod parser;
pub mod scraper;
pub mod types;
pub mod xml;

// Re-export main types for convenience
pub use client::{ClientConfig, LostfilmClient};
pub use error::{Result, ScrapeError};
pub use scraper::{LostfilmScraper, ScraperConfig};
pub use types::{Aggregate, CatalogEntry, SeriesDetail, SeriesRecord};
pub use xml::{OutputEncoding, XmlWriter};
