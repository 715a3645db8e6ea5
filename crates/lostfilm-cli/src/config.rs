//! Run configuration from environment variables
//!
//! Every setting has a default; unset or unparsable values fall back to it.
//! An unknown output encoding is reported as an error instead.

use std::env;
use std::path::PathBuf;

use lostfilm_core::{ClientConfig, OutputEncoding, ScrapeError, ScraperConfig};

pub const ENV_BASE_URL: &str = "LOSTFILM_BASE_URL";
pub const ENV_CATALOG_PATH: &str = "LOSTFILM_CATALOG_PATH";
pub const ENV_TIMEOUT_SECS: &str = "LOSTFILM_TIMEOUT_SECS";
pub const ENV_SOURCE_CHARSET: &str = "LOSTFILM_SOURCE_CHARSET";
pub const ENV_OUTPUT_ENCODING: &str = "LOSTFILM_OUTPUT_ENCODING";
pub const ENV_OUTPUT_DIR: &str = "LOSTFILM_OUTPUT_DIR";
pub const ENV_CAPITALIZE_COUNTRIES: &str = "LOSTFILM_CAPITALIZE_COUNTRIES";

/// Load configuration from the process environment
pub fn from_env() -> Result<ScraperConfig, ScrapeError> {
    from_lookup(|key| env::var(key).ok())
}

/// Load configuration from any key/value source
pub fn from_lookup<F>(lookup: F) -> Result<ScraperConfig, ScrapeError>
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = ScraperConfig::default();
    let client_defaults = ClientConfig::default();

    let output_encoding = match lookup(ENV_OUTPUT_ENCODING) {
        Some(value) => value.parse::<OutputEncoding>()?,
        None => defaults.output_encoding,
    };

    Ok(ScraperConfig {
        client: ClientConfig {
            base_url: lookup(ENV_BASE_URL).unwrap_or(client_defaults.base_url),
            timeout_secs: lookup(ENV_TIMEOUT_SECS)
                .and_then(|v| v.parse().ok())
                .unwrap_or(client_defaults.timeout_secs),
            source_charset: lookup(ENV_SOURCE_CHARSET).unwrap_or(client_defaults.source_charset),
        },
        catalog_path: lookup(ENV_CATALOG_PATH).unwrap_or(defaults.catalog_path),
        output_dir: lookup(ENV_OUTPUT_DIR)
            .map(PathBuf::from)
            .unwrap_or(defaults.output_dir),
        output_encoding,
        capitalize_countries: lookup(ENV_CAPITALIZE_COUNTRIES)
            .and_then(|v| parse_flag(&v))
            .unwrap_or(defaults.capitalize_countries),
    })
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
