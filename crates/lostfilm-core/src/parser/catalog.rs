//! Catalog page parser for LostFilm.tv
//!
//! Parses the full series list on `/serials.php` into catalog entries.

use regex_lite::Regex;

use super::text_content;
use crate::types::CatalogEntry;

/// Comment that precedes the full series list
pub const CATALOG_START_MARKER: &str = "<!-- ### Полный список сериалов -->";

/// Comment that follows the full series list
pub const CATALOG_END_MARKER: &str = "<!-- ### Текстовая информация -->";

/// One series row:
/// `<a href="/browse.php?cat=42" class="bb_a">Остаться в живых<br><span>(Lost)</span></a>`
const ROW_PATTERN: &str =
    r#"<a href="([^"]+)" class="bb_a">(.*?)<br\s*/?>\s*<span>\((.*?)\)</span></a>"#;

/// Parser for the catalog page.
///
/// The row pattern is compiled once and reused for every call.
pub struct CatalogParser {
    row: Regex,
}

impl CatalogParser {
    /// Create a new catalog parser
    pub fn new() -> Self {
        Self {
            row: Regex::new(ROW_PATTERN).expect("catalog row pattern is valid"),
        }
    }

    /// Extract catalog entries from the catalog page.
    ///
    /// Only lines strictly between [`CATALOG_START_MARKER`] and
    /// [`CATALOG_END_MARKER`] are considered. Lines without a series row are
    /// skipped. Entries keep document order. Names are reduced to their text,
    /// so entities like `&nbsp;` or `&laquo;` are decoded.
    ///
    /// # Arguments
    /// * `page` - Decoded text of the catalog page
    ///
    /// # Returns
    /// The entries found; empty if the start marker is missing
    pub fn parse(&self, page: &str) -> Vec<CatalogEntry> {
        let mut lines = page.lines();

        // Skip everything up to and including the start marker
        if !lines.any(|line| line.contains(CATALOG_START_MARKER)) {
            log::warn!("Catalog start marker not found");
            return Vec::new();
        }

        let mut entries = Vec::new();
        for line in lines.take_while(|line| !line.contains(CATALOG_END_MARKER)) {
            for caps in self.row.captures_iter(line) {
                entries.push(CatalogEntry::new(
                    caps[1].trim(),
                    text_content(&caps[2]),
                    text_content(&caps[3]),
                ));
            }
        }

        entries
    }
}

impl Default for CatalogParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse the catalog page with a freshly compiled parser.
pub fn parse_catalog(page: &str) -> Vec<CatalogEntry> {
    CatalogParser::new().parse(page)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"<html>
<a href="/browse.php?cat=1" class="bb_a">До маркера<br><span>(Before Marker)</span></a>
<!-- ### Полный список сериалов -->
<div class="mid">
<a href="/browse.php?cat=42" class="bb_a">Остаться в живых<br><span>(Lost)</span></a>

<a href="/browse.php?cat=130" class="bb_a">Во все тяжкие<br><span>(Breaking Bad)</span></a>
</div>
<!-- ### Текстовая информация -->
<a href="/browse.php?cat=7" class="bb_a">После маркера<br><span>(After Marker)</span></a>
</html>"#;

    #[test]
    fn test_parse_catalog_between_markers() {
        let entries = parse_catalog(FIXTURE);
        assert_eq!(
            entries,
            vec![
                CatalogEntry::new("/browse.php?cat=42", "Остаться в живых", "Lost"),
                CatalogEntry::new("/browse.php?cat=130", "Во все тяжкие", "Breaking Bad"),
            ]
        );
    }

    #[test]
    fn test_parse_catalog_without_start_marker() {
        let page = r#"<a href="/browse.php?cat=42" class="bb_a">Остаться в живых<br><span>(Lost)</span></a>"#;
        assert!(parse_catalog(page).is_empty());
    }

    #[test]
    fn test_parse_catalog_without_end_marker_reads_to_end() {
        let page = format!(
            "{}\n{}\n",
            CATALOG_START_MARKER,
            r#"<a href="/browse.php?cat=5" class="bb_a">Доктор Хаус<br /><span>(House M.D.)</span></a>"#
        );
        let entries = parse_catalog(&page);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].original_name, "House M.D.");
    }

    #[test]
    fn test_parse_catalog_several_rows_on_one_line() {
        let page = format!(
            "{}\n{}{}\n{}",
            CATALOG_START_MARKER,
            r#"<a href="/browse.php?cat=2" class="bb_a">Кости<br><span>(Bones)</span></a>"#,
            r#"<a href="/browse.php?cat=3" class="bb_a">Касл<br><span>(Castle)</span></a>"#,
            CATALOG_END_MARKER
        );
        let names: Vec<_> = parse_catalog(&page)
            .into_iter()
            .map(|e| e.original_name)
            .collect();
        assert_eq!(names, vec!["Bones", "Castle"]);
    }

    #[test]
    fn test_parse_catalog_keeps_parentheses_in_original_name() {
        let page = format!(
            "{}\n{}\n{}",
            CATALOG_START_MARKER,
            r#"<a href="/browse.php?cat=9" class="bb_a">Офис<br><span>(The Office (US))</span></a>"#,
            CATALOG_END_MARKER
        );
        assert_eq!(parse_catalog(&page)[0].original_name, "The Office (US)");
    }

    #[test]
    fn test_parse_catalog_decodes_entities_in_names() {
        let page = format!(
            "{}\n{}\n{}",
            CATALOG_START_MARKER,
            r#"<a href="/browse.php?cat=5" class="bb_a">Доктор&nbsp;Хаус<br><span>(&laquo;House&raquo;)</span></a>"#,
            CATALOG_END_MARKER
        );
        assert_eq!(
            parse_catalog(&page),
            vec![CatalogEntry::new("/browse.php?cat=5", "Доктор\u{a0}Хаус", "\u{ab}House\u{bb}")]
        );
    }
}
