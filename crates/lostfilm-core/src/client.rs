//! HTTP client for LostFilm.tv
//!
//! This module provides the page fetcher used by the scraper. Each fetch is a
//! single GET with no retries; the body is decoded from the site's legacy
//! codepage into a Rust string.

use std::time::Duration;

use encoding_rs::Encoding;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONNECTION};
use reqwest::{StatusCode, Version};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScrapeError};

/// Base URL for LostFilm.tv
const LOSTFILM_BASE_URL: &str = "http://www.lostfilm.tv";

/// Codepage the site serves its pages in
const DEFAULT_SOURCE_CHARSET: &str = "windows-1251";

/// User-Agent sent with every request
const DEFAULT_USER_AGENT: &str = concat!("lostfilm-scraper/", env!("CARGO_PKG_VERSION"));

/// Configuration for the LostFilm HTTP client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Scheme and host every path is appended to (default: http://www.lostfilm.tv)
    pub base_url: String,
    /// Connect and read timeout in seconds (default: 60)
    pub timeout_secs: u64,
    /// Label of the codepage page bodies are encoded in (default: windows-1251)
    pub source_charset: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: LOSTFILM_BASE_URL.to_string(),
            timeout_secs: 60,
            source_charset: DEFAULT_SOURCE_CHARSET.to_string(),
        }
    }
}

/// HTTP client for LostFilm.tv
///
/// The client:
/// - Requires `200 OK`, every other status is an error
/// - Speaks HTTP/1.0 and sends `Accept: */*` and `Connection: close`
/// - Decodes bodies from the configured codepage
pub struct LostfilmClient {
    /// Underlying HTTP client
    client: reqwest::Client,
    base_url: String,
    encoding: &'static Encoding,
}

impl LostfilmClient {
    /// Create a new client with default configuration
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    ///
    /// # Errors
    /// - `ScrapeError::Config` - `source_charset` is not a known encoding label
    /// - `ScrapeError::Http` - the HTTP client cannot be created
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let encoding = Encoding::for_label(config.source_charset.as_bytes()).ok_or_else(|| {
            ScrapeError::Config(format!("unknown source charset: {}", config.source_charset))
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        headers.insert(CONNECTION, HeaderValue::from_static("close"));

        let client = reqwest::Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .default_headers(headers)
            .http1_only()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            encoding,
        })
    }

    /// Fetch a page and decode it to text
    ///
    /// # Arguments
    /// * `path` - Path with query on the site (e.g., "/browse.php?cat=42")
    ///
    /// # Errors
    /// - `ScrapeError::Http` - Connection, timeout or protocol error
    /// - `ScrapeError::Status` - Server answered with a status other than 200
    /// - `ScrapeError::Encoding` - Body is not valid in the source codepage
    pub async fn fetch(&self, path: &str) -> Result<String> {
        let url = format!("{}{}", self.base_url, path);
        log::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .version(Version::HTTP_10)
            .send()
            .await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(ScrapeError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
                url,
            });
        }

        let body = response.bytes().await?;
        self.decode(&body, path)
    }

    /// Decode a page body from the source codepage
    fn decode(&self, bytes: &[u8], context: &str) -> Result<String> {
        self.encoding
            .decode_without_bom_handling_and_without_replacement(bytes)
            .map(|text| text.into_owned())
            .ok_or_else(|| ScrapeError::Encoding {
                charset: self.encoding.name().to_string(),
                context: context.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> LostfilmClient {
        LostfilmClient::with_config(ClientConfig {
            base_url: server.uri(),
            timeout_secs: 5,
            ..ClientConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://www.lostfilm.tv");
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.source_charset, "windows-1251");
    }

    #[test]
    fn test_client_creation() {
        let client = LostfilmClient::new().unwrap();
        assert_eq!(client.base_url, "http://www.lostfilm.tv");
        assert_eq!(client.encoding, encoding_rs::WINDOWS_1251);
    }

    #[test]
    fn test_client_unknown_charset() {
        let config = ClientConfig {
            source_charset: "no-such-charset".to_string(),
            ..ClientConfig::default()
        };
        match LostfilmClient::with_config(config) {
            Err(ScrapeError::Config(msg)) => assert!(msg.contains("no-such-charset")),
            _ => panic!("Expected Config error"),
        }
    }

    #[test]
    fn test_decode_cp1251() {
        let client = LostfilmClient::new().unwrap();
        let (bytes, _, _) = encoding_rs::WINDOWS_1251.encode("Жанр: драма");
        assert_eq!(client.decode(&bytes, "/").unwrap(), "Жанр: драма");
    }

    #[test]
    fn test_decode_malformed_bytes() {
        let client = LostfilmClient::with_config(ClientConfig {
            source_charset: "utf-8".to_string(),
            ..ClientConfig::default()
        })
        .unwrap();
        let result = client.decode(&[b'a', 0xFF, b'b'], "/serials.php");
        match result {
            Err(ScrapeError::Encoding { charset, context }) => {
                assert_eq!(charset, "UTF-8");
                assert_eq!(context, "/serials.php");
            }
            _ => panic!("Expected Encoding error"),
        }
    }

    #[tokio::test]
    async fn test_fetch_decodes_body() {
        let server = MockServer::start().await;
        let (body, _, _) = encoding_rs::WINDOWS_1251.encode("<h1>Остаться в живых (Lost)</h1>");
        Mock::given(method("GET"))
            .and(path("/browse.php"))
            .and(query_param("cat", "42"))
            .and(header("accept", "*/*"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body.into_owned()))
            .mount(&server)
            .await;

        let page = client_for(&server).fetch("/browse.php?cat=42").await.unwrap();
        assert_eq!(page, "<h1>Остаться в живых (Lost)</h1>");
    }

    #[tokio::test]
    async fn test_fetch_non_200_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        match client_for(&server).fetch("/browse.php?cat=1").await {
            Err(ScrapeError::Status { status, reason, url }) => {
                assert_eq!(status, 404);
                assert_eq!(reason, "Not Found");
                assert!(url.ends_with("/browse.php?cat=1"));
            }
            other => panic!("Expected Status error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_fetch_other_success_status_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let result = client_for(&server).fetch("/serials.php").await;
        assert!(matches!(result, Err(ScrapeError::Status { status: 204, .. })));
    }

    #[tokio::test]
    async fn test_fetch_sends_http_1_0_request_line() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket
                .write_all(b"HTTP/1.0 200 OK\r\nContent-Length: 2\r\n\r\nok")
                .await
                .unwrap();
            String::from_utf8(request).unwrap()
        });

        let client = LostfilmClient::with_config(ClientConfig {
            base_url: format!("http://{}", addr),
            timeout_secs: 5,
            ..ClientConfig::default()
        })
        .unwrap();
        assert_eq!(client.fetch("/serials.php").await.unwrap(), "ok");

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /serials.php HTTP/1.0\r\n"), "{}", request);
        assert!(request.to_ascii_lowercase().contains("connection: close"));
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        let client = LostfilmClient::with_config(ClientConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            timeout_secs: 5,
            ..ClientConfig::default()
        })
        .unwrap();

        let result = client.fetch("/serials.php").await;
        assert!(matches!(result, Err(ScrapeError::Http(_))));
    }
}
