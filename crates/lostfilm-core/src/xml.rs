//! XML output for scraped series
//!
//! Renders the full dataset and the distinct genre and country lists as three
//! XML documents. Text is kept as Unicode until the last step, where the whole
//! document is encoded in the configured output encoding. The declaration is
//! produced from the same [`OutputEncoding`] value, so it always names the
//! encoding the bytes are actually in.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::str::FromStr;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScrapeError};
use crate::normalize::{escape_markup, tokenize, FIELD_SEPARATORS};
use crate::types::{Aggregate, SeriesRecord};

/// File name of the full dataset
pub const FULL_DATA_FILE: &str = "tvseries.xml";
/// File name of the distinct genre list
pub const GENRES_FILE: &str = "genres.xml";
/// File name of the distinct country list
pub const COUNTRIES_FILE: &str = "countries.xml";

/// Character encoding of the output documents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputEncoding {
    /// UTF-8
    #[default]
    Utf8,
    /// Legacy Cyrillic codepage
    Windows1251,
}

impl OutputEncoding {
    /// Label written to the XML declaration
    pub fn label(self) -> &'static str {
        match self {
            OutputEncoding::Utf8 => "utf-8",
            OutputEncoding::Windows1251 => "windows-1251",
        }
    }

    /// Encode a rendered document.
    ///
    /// Characters the codepage cannot represent become numeric character
    /// references.
    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            OutputEncoding::Utf8 => text.as_bytes().to_vec(),
            OutputEncoding::Windows1251 => {
                let (bytes, _, _) = encoding_rs::WINDOWS_1251.encode(text);
                bytes.into_owned()
            }
        }
    }
}

impl fmt::Display for OutputEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OutputEncoding {
    type Err = ScrapeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(OutputEncoding::Utf8),
            "windows-1251" | "cp1251" | "win1251" => Ok(OutputEncoding::Windows1251),
            other => Err(ScrapeError::Config(format!("unknown output encoding: {}", other))),
        }
    }
}

/// Writer for the three output documents
#[derive(Debug, Clone)]
pub struct XmlWriter {
    output_dir: PathBuf,
    encoding: OutputEncoding,
    capitalize_countries: bool,
}

impl XmlWriter {
    /// Create a writer that puts its files in `output_dir`
    pub fn new(output_dir: impl Into<PathBuf>, encoding: OutputEncoding) -> Self {
        Self {
            output_dir: output_dir.into(),
            encoding,
            capitalize_countries: false,
        }
    }

    /// Capitalize per-record country tokens in the full dataset
    pub fn with_capitalized_countries(mut self, capitalize: bool) -> Self {
        self.capitalize_countries = capitalize;
        self
    }

    /// Write all three documents and return their paths.
    pub fn write_all(&self, aggregate: &Aggregate) -> Result<Vec<PathBuf>> {
        Ok(vec![
            self.write_full_data(&aggregate.records)?,
            self.write_genres(&aggregate.genres)?,
            self.write_countries(&aggregate.countries)?,
        ])
    }

    /// Write `tvseries.xml`
    pub fn write_full_data(&self, records: &[SeriesRecord]) -> Result<PathBuf> {
        let document = self.render_full_data(records)?;
        self.write_file(FULL_DATA_FILE, &document)
    }

    /// Write `genres.xml`
    pub fn write_genres(&self, genres: &BTreeSet<String>) -> Result<PathBuf> {
        let document = self.render_list("genres", "genre", genres)?;
        self.write_file(GENRES_FILE, &document)
    }

    /// Write `countries.xml`
    pub fn write_countries(&self, countries: &BTreeSet<String>) -> Result<PathBuf> {
        let document = self.render_list("countries", "country", countries)?;
        self.write_file(COUNTRIES_FILE, &document)
    }

    /// Render the full dataset document.
    pub fn render_full_data(&self, records: &[SeriesRecord]) -> Result<Vec<u8>> {
        let mut writer = self.start_document()?;
        writer.write_event(Event::Start(BytesStart::new("tvseries")))?;

        for record in records {
            let name = escape_markup(&record.original_name);
            let locname = escape_markup(&record.localized_name);
            let year = escape_markup(&record.release_year);
            let mut tvs = BytesStart::new("tvs");
            tvs.push_attribute(("name".as_bytes(), name.as_bytes()));
            tvs.push_attribute(("locname".as_bytes(), locname.as_bytes()));
            tvs.push_attribute(("year".as_bytes(), year.as_bytes()));
            writer.write_event(Event::Start(tvs))?;

            let amount = escape_markup(&record.seasons_amount);
            let status = escape_markup(&record.status);
            let path = escape_markup(&record.relative_path);
            let mut info = BytesStart::new("info");
            info.push_attribute(("amount".as_bytes(), amount.as_bytes()));
            info.push_attribute(("status".as_bytes(), status.as_bytes()));
            info.push_attribute(("path".as_bytes(), path.as_bytes()));
            writer.write_event(Event::Empty(info))?;

            let genres = tokenize(&record.genre, FIELD_SEPARATORS, true);
            write_leaves(&mut writer, "genres", "genre", &genres)?;

            let countries = tokenize(&record.country, FIELD_SEPARATORS, self.capitalize_countries);
            write_leaves(&mut writer, "countries", "country", &countries)?;

            writer.write_event(Event::End(BytesEnd::new("tvs")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("tvseries")))?;
        self.finish_document(writer)
    }

    /// Render a flat list document such as `<genres><genre>..</genre></genres>`.
    pub fn render_list(&self, root: &str, leaf: &str, items: &BTreeSet<String>) -> Result<Vec<u8>> {
        let mut writer = self.start_document()?;
        write_leaves(&mut writer, root, leaf, items)?;
        self.finish_document(writer)
    }

    fn start_document(&self) -> Result<Writer<Vec<u8>>> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some(self.encoding.label()), None)))?;
        Ok(writer)
    }

    fn finish_document(&self, writer: Writer<Vec<u8>>) -> Result<Vec<u8>> {
        let mut rendered = String::from_utf8(writer.into_inner())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        rendered.push('\n');
        Ok(self.encoding.encode(&rendered))
    }

    fn write_file(&self, file_name: &str, document: &[u8]) -> Result<PathBuf> {
        let path = self.output_dir.join(file_name);
        fs::write(&path, document)?;
        log::info!("Wrote {} ({}, {} bytes)", path.display(), self.encoding, document.len());
        Ok(path)
    }
}

/// `<root><leaf>item</leaf>...</root>`
fn write_leaves<I, S>(writer: &mut Writer<Vec<u8>>, root: &str, leaf: &str, items: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    writer.write_event(Event::Start(BytesStart::new(root)))?;
    for item in items {
        writer.write_event(Event::Start(BytesStart::new(leaf)))?;
        writer.write_event(Event::Text(BytesText::from_escaped(escape_markup(item.as_ref()))))?;
        writer.write_event(Event::End(BytesEnd::new(leaf)))?;
    }
    writer.write_event(Event::End(BytesEnd::new(root)))?;
    Ok(())
}
