//! Page parsers for LostFilm.tv
//!
//! This module contains parsers for extracting data from LostFilm pages:
//! - `catalog`: Parse the full series list
//! - `detail`: Parse a series detail page

use scraper::Html;

pub mod catalog;
pub mod detail;

// Re-export main parsing types and functions
pub use catalog::{parse_catalog, CatalogParser, CATALOG_END_MARKER, CATALOG_START_MARKER};
pub use detail::{detail_heading, parse_detail, DetailParser, DETAIL_END_MARKER};

/// Text content of an HTML fragment, whitespace-trimmed.
///
/// Tags are dropped and entities such as `&amp;` or `&laquo;` are decoded.
pub(crate) fn text_content(fragment: &str) -> String {
    let html = Html::parse_fragment(fragment);
    html.root_element()
        .text()
        .collect::<String>()
        .trim()
        .to_string()
}
