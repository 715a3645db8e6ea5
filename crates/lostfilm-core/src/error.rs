//! Error types for the LostFilm scraper
//!
//! This module defines all error types used throughout the library.
//! ScrapeError implements Serialize so it can be reported as plain text.

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Error type for LostFilm scraper operations
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// Transport failure: connection refused, timeout, malformed status line
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with something other than 200 OK
    #[error("Unexpected HTTP status {status} {reason} for {url}")]
    Status {
        status: u16,
        reason: String,
        url: String,
    },

    /// Page body is not valid in the source codepage
    #[error("Malformed {charset} content: {context}")]
    Encoding { charset: String, context: String },

    /// Expected markup was not found in a page
    #[error("Markup not found: {0}")]
    ParseMiss(String),

    /// Writing an output document failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Rendering an output document failed
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Serialize ScrapeError as its display string
impl Serialize for ScrapeError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Result type alias for LostFilm scraper operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_status() {
        let error = ScrapeError::Status {
            status: 404,
            reason: "Not Found".to_string(),
            url: "http://www.lostfilm.tv/browse.php?cat=42".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Unexpected HTTP status 404 Not Found for http://www.lostfilm.tv/browse.php?cat=42"
        );
    }

    #[test]
    fn test_display_encoding() {
        let error = ScrapeError::Encoding {
            charset: "windows-1251".to_string(),
            context: "/serials.php".to_string(),
        };
        assert_eq!(error.to_string(), "Malformed windows-1251 content: /serials.php");
    }

    #[test]
    fn test_display_parse_miss() {
        let error = ScrapeError::ParseMiss("<div class=\"content\">".to_string());
        assert_eq!(error.to_string(), "Markup not found: <div class=\"content\">");
    }

    #[test]
    fn test_display_config() {
        let error = ScrapeError::Config("unknown output encoding: koi8".to_string());
        assert_eq!(error.to_string(), "Invalid configuration: unknown output encoding: koi8");
    }

    #[test]
    fn test_serialize() {
        let error = ScrapeError::ParseMiss("test".to_string());
        let json = serde_json::to_string(&error).unwrap();
        assert_eq!(json, "\"Markup not found: test\"");
    }
}
