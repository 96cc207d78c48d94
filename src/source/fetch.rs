//! HTTP fetching through the proxy.

use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;

use super::{FeedFetcher, FeedSource, ProxyFormat};
use crate::error::{FeedError, Result};

/// Some feed hosts refuse requests without a browser-looking agent.
const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) note-feed/0.1";

/// Shape of a JSON-envelope proxy response.  Only `contents` matters.
#[derive(Debug, Deserialize)]
struct Envelope {
    contents: Option<String>,
}

/// [`FeedFetcher`] backed by a shared [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client })
    }
}

impl FeedFetcher for HttpFetcher {
    async fn fetch_markup(&self, source: &FeedSource) -> Result<String> {
        let url = source.proxy_url(Utc::now().timestamp_millis());
        tracing::debug!("requesting {url}");

        let response = self
            .client
            .get(&url)
            .timeout(source.timeout)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("proxy response status: {status}");
        if !status.is_success() {
            return Err(FeedError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        unwrap_body(source.proxy_format, &body)
    }
}

/// Pull the feed markup out of a proxy response body.
pub(crate) fn unwrap_body(format: ProxyFormat, body: &str) -> Result<String> {
    match format {
        ProxyFormat::Raw => Ok(body.to_string()),
        ProxyFormat::JsonEnvelope => {
            let envelope: Envelope = serde_json::from_str(body)?;
            envelope
                .contents
                .filter(|c| !c.trim().is_empty())
                .ok_or(FeedError::MissingContents)
        }
    }
}
