//! Series detail parser for LostFilm.tv
//!
//! Parses a `/browse.php?cat=N` page into the five descriptive fields.

use regex_lite::Regex;

use super::text_content;
use crate::error::{Result, ScrapeError};
use crate::types::SeriesDetail;

/// Marker that closes the description block
pub const DETAIL_END_MARKER: &str = r#"<div class="content">"#;

/// Text of the `<h1>` heading that opens the description block.
pub fn detail_heading(localized_name: &str, original_name: &str) -> String {
    format!("{} ({})", localized_name, original_name)
}

/// Parser for series detail pages.
///
/// Each field has its own label-anchored pattern, searched independently
/// over the description block. Patterns are compiled once.
pub struct DetailParser {
    heading: Regex,
    country: Regex,
    release_year: Regex,
    genre: Regex,
    seasons_amount: Regex,
    status: Regex,
}

impl DetailParser {
    /// Create a new detail parser
    pub fn new() -> Self {
        let compile = |pattern: &str| Regex::new(pattern).expect("detail field pattern is valid");
        Self {
            heading: compile(r"<h1>(.*?)</h1>"),
            country: compile(r"Страна:\s*(.+?)<br\s*/?>"),
            release_year: compile(r"Год выхода:\s*<span>(.+?)</span>"),
            genre: compile(r"Жанр:\s*<span>(.+?)</span>"),
            seasons_amount: compile(r"Количество сезонов:\s*<span>(.+?)</span>"),
            status: compile(r"Статус:\s*(.+?)<br\s*/?>"),
        }
    }

    /// Parse the description block of a detail page.
    ///
    /// # Arguments
    /// * `page` - Decoded text of the detail page
    /// * `localized_name` - Localized name, as decoded from the catalog
    /// * `original_name` - Original name, as decoded from the catalog
    ///
    /// # Returns
    /// * `Ok(SeriesDetail)` - fields missing from the block are empty strings
    /// * `Err(ScrapeError::ParseMiss)` - heading or closing marker not found
    pub fn parse(&self, page: &str, localized_name: &str, original_name: &str) -> Result<SeriesDetail> {
        let block = self.description_block(page, localized_name, original_name)?;

        Ok(SeriesDetail {
            country: search_field(&self.country, block),
            release_year: search_field(&self.release_year, block),
            genre: search_field(&self.genre, block),
            seasons_amount: search_field(&self.seasons_amount, block),
            status: search_field(&self.status, block),
        })
    }

    /// Slice of the page from the matching heading up to the closing marker.
    ///
    /// Headings are compared by their text, so `&nbsp;` in the page matches a
    /// no-break space in the name.
    fn description_block<'a>(
        &self,
        page: &'a str,
        localized_name: &str,
        original_name: &str,
    ) -> Result<&'a str> {
        let heading = detail_heading(localized_name, original_name);
        let start = self
            .heading
            .captures_iter(page)
            .find(|caps| text_content(&caps[1]) == heading)
            .and_then(|caps| caps.get(0))
            .map(|m| m.start())
            .ok_or_else(|| ScrapeError::ParseMiss(format!("<h1>{}</h1>", heading)))?;

        let end = page[start..]
            .find(DETAIL_END_MARKER)
            .map(|offset| start + offset)
            .ok_or_else(|| {
                ScrapeError::ParseMiss(format!("{} after <h1>{}</h1>", DETAIL_END_MARKER, heading))
            })?;

        Ok(&page[start..end])
    }
}

impl Default for DetailParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a detail page with a freshly compiled parser.
pub fn parse_detail(page: &str, localized_name: &str, original_name: &str) -> Result<SeriesDetail> {
    DetailParser::new().parse(page, localized_name, original_name)
}

/// First capture of `re` in `block`, reduced to its text, or empty.
fn search_field(re: &Regex, block: &str) -> String {
    re.captures(block)
        .and_then(|caps| caps.get(1))
        .map(|m| text_content(m.as_str()))
        .unwrap_or_default()
}
