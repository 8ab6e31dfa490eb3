use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};

/// Watch pages served to plain API-style clients lack most metadata, so the
/// client identifies itself as a desktop browser.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// # Panics
/// Panics when the client cannot be constructed, which only happens on a
/// broken TLS backend.
#[must_use]
pub fn init_http_client() -> reqwest::Client {
    let mut headers = HeaderMap::new();
    headers.insert("User-Agent", HeaderValue::from_static(BROWSER_USER_AGENT));

    reqwest::Client::builder()
        .default_headers(headers)
        .timeout(REQUEST_TIMEOUT)
        .build()
        .expect("Unable to build HTTP client")
}
