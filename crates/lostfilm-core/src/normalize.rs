//! Text normalization for scraped fields
//!
//! Splits delimiter-separated fields (genres, countries) into tokens and
//! escapes text for embedding in XML.

use std::sync::OnceLock;

use regex_lite::Regex;

/// Separators used by the site in genre and country fields
pub const FIELD_SEPARATORS: &str = ",./";

/// Split `text` on any character of `separators` into trimmed tokens.
///
/// Empty pieces are dropped. With `capitalize_first` the first character of
/// each token is uppercased and the rest is left as is.
///
/// # Examples
/// ```
/// use lostfilm_core::normalize::tokenize;
///
/// assert_eq!(tokenize(" Drama, Comedy ,  Crime.", ",./", false), vec!["Drama", "Comedy", "Crime"]);
/// assert_eq!(tokenize("action", ",./", true), vec!["Action"]);
/// ```
pub fn tokenize(text: &str, separators: &str, capitalize_first: bool) -> Vec<String> {
    text.split(|c: char| separators.contains(c))
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(|piece| {
            if capitalize_first {
                capitalize(piece)
            } else {
                piece.to_string()
            }
        })
        .collect()
}

/// Uppercase the first character only.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Matches a reference XML understands without a DTD at the start of the input.
fn entity_regex() -> &'static Regex {
    static ENTITY: OnceLock<Regex> = OnceLock::new();
    ENTITY.get_or_init(|| {
        Regex::new(r"^&(?:amp|lt|gt|quot|apos|#[0-9]+|#[xX][0-9A-Fa-f]+);")
            .expect("entity pattern is valid")
    })
}

/// Replace every `&` that does not start an XML reference with `&amp;`.
///
/// The five predefined entities and numeric references such as `&#39;` or
/// `&#x27;` are kept, so the function is idempotent. HTML-only entities like
/// `&nbsp;` are escaped.
///
/// # Examples
/// ```
/// use lostfilm_core::normalize::escape_ampersand;
///
/// assert_eq!(escape_ampersand("Tom & Jerry"), "Tom &amp; Jerry");
/// assert_eq!(escape_ampersand("Tom &amp; Jerry"), "Tom &amp; Jerry");
/// ```
pub fn escape_ampersand(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    let mut last = 0;
    for (pos, _) in text.match_indices('&') {
        escaped.push_str(&text[last..pos]);
        if entity_regex().is_match(&text[pos..]) {
            escaped.push('&');
        } else {
            escaped.push_str("&amp;");
        }
        last = pos + 1;
    }
    escaped.push_str(&text[last..]);
    escaped
}

/// Escape text for an XML attribute value or text node.
///
/// Applies [`escape_ampersand`] and then escapes `<`, `>` and `"`.
pub fn escape_markup(text: &str) -> String {
    escape_ampersand(text)
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
