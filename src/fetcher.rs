//! HTTP retrieval of single URLs
//!
//! [`Fetcher`] is the seam between the pipeline and the network. Production code
//! uses [`HttpFetcher`]; tests plug in their own implementations to simulate
//! failures without a server.

use crate::config::FetchConfig;
use crate::error::FetchError;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::USER_AGENT;
use tracing::debug;
use url::Url;

/// How the response body is handed back
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResponseMode {
    /// Decode using the response charset and return UTF-8 bytes
    Text,
    /// Return the body untouched
    Raw,
}

/// Per-call fetch options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchOptions {
    /// Send the configured browser User-Agent
    pub browser_identity: bool,
    /// Body handling
    pub mode: ResponseMode,
}

impl FetchOptions {
    /// Options for the primary document: browser identity, decoded text
    pub fn document() -> Self {
        Self {
            browser_identity: true,
            mode: ResponseMode::Text,
        }
    }

    /// Options for assets: raw bytes, default client identity
    pub fn asset() -> Self {
        Self {
            browser_identity: false,
            mode: ResponseMode::Raw,
        }
    }
}

/// Retrieves the body of one absolute URL
///
/// One attempt per call; retry is layered by the caller.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch `url`, failing on transport errors and non-success status codes
    async fn fetch(&self, url: &Url, options: FetchOptions) -> Result<Bytes, FetchError>;
}

/// [`Fetcher`] backed by a shared reqwest client
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: reqwest::Client,
    user_agent: String,
}

impl HttpFetcher {
    /// Build the client from configuration
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self {
            client,
            user_agent: config.user_agent.clone(),
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url, options: FetchOptions) -> Result<Bytes, FetchError> {
        let mut request = self.client.get(url.as_str());
        if options.browser_identity {
            request = request.header(USER_AGENT, &self.user_agent);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FetchError::transport(url.as_str(), &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = match options.mode {
            ResponseMode::Text => response.text().await.map(Bytes::from),
            ResponseMode::Raw => response.bytes().await,
        }
        .map_err(|e| FetchError::transport(url.as_str(), &e))?;

        debug!(url = %url, bytes = body.len(), "fetched");
        Ok(body)
    }
}
