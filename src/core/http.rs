use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::error::{FetchError, FetchResult};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/115.0 Safari/537.36";
const BROWSER_ACCEPT: &str = "application/json,text/plain,*/*";
const BROWSER_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Anything that can answer a GET with a JSON document.
#[async_trait]
pub trait JsonSource: Send + Sync {
    async fn get_json(&self, url: &str, timeout: Duration) -> FetchResult<Value>;
}

/// reqwest client dressed up as a desktop browser. The Yahoo chart endpoint
/// is unofficial and turns away requests without realistic headers.
pub struct BrowserClient {
    client: Client,
}

impl BrowserClient {
    pub fn new() -> Self {
        let client = Client::builder()
            .default_headers(browser_headers())
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }

    /// GET with the default 30 second timeout.
    pub async fn fetch(&self, url: &str) -> FetchResult<Value> {
        self.get_json(url, DEFAULT_TIMEOUT).await
    }
}

impl Default for BrowserClient {
    fn default() -> Self {
        Self::new()
    }
}

pub fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(BROWSER_ACCEPT_LANGUAGE));
    headers
}

#[async_trait]
impl JsonSource for BrowserClient {
    async fn get_json(&self, url: &str, timeout: Duration) -> FetchResult<Value> {
        log::debug!("GET {}", redact_api_key(url));

        let resp = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::Http { status, body });
        }

        let json: Value = resp.json().await?;
        Ok(json)
    }
}

/// Hide the value of any `api_key` query parameter so it never reaches a log.
pub fn redact_api_key(url: &str) -> String {
    match url.find("api_key=") {
        Some(idx) => {
            let start = idx + "api_key=".len();
            let end = url[start..].find('&').map(|i| start + i).unwrap_or(url.len());
            format!("{}***{}", &url[..start], &url[end..])
        }
        None => url.to_string(),
    }
}
