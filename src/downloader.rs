//! Concurrent, isolated retrieval of resolved assets
//!
//! Every asset is an independent unit of work: its failure is captured as an
//! [`AssetResult::Failure`] and never cancels or delays its siblings. Units run
//! through `buffer_unordered`, so outcomes come back in completion order and
//! [`AssetDownloader::download_all`] returns only once every unit is terminal.

use crate::config::{Config, RetryConfig};
use crate::fetcher::{FetchOptions, Fetcher};
use crate::retry::download_with_retry;
use crate::types::{AssetOutcome, AssetResult, ResolvedAsset};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{debug, warn};

/// Fans asset fetches out and joins their outcomes
#[derive(Clone)]
pub struct AssetDownloader {
    fetcher: Arc<dyn Fetcher>,
    max_concurrent: Option<usize>,
    retry: RetryConfig,
}

impl AssetDownloader {
    /// Create a downloader using the fan-out and retry settings from `config`
    pub fn new(fetcher: Arc<dyn Fetcher>, config: &Config) -> Self {
        Self {
            fetcher,
            max_concurrent: config.downloader.max_concurrent_assets,
            retry: config.fetch.retry.clone(),
        }
    }

    /// Number of units in flight for a batch of `count` assets
    ///
    /// Without a configured ceiling every asset gets its own unit.
    pub fn concurrency_for(&self, count: usize) -> usize {
        let count = count.max(1);
        match self.max_concurrent {
            Some(limit) => limit.clamp(1, count),
            None => count,
        }
    }

    /// Fetch every asset and report one outcome per asset, in completion order
    pub async fn download_all(&self, assets: Vec<ResolvedAsset>) -> Vec<AssetOutcome> {
        if assets.is_empty() {
            return Vec::new();
        }

        let concurrency = self.concurrency_for(assets.len());
        debug!(assets = assets.len(), concurrency, "starting asset downloads");

        stream::iter(assets)
            .map(|asset| self.download_one(asset))
            .buffer_unordered(concurrency)
            .collect()
            .await
    }

    async fn download_one(&self, asset: ResolvedAsset) -> AssetOutcome {
        let url = &asset.absolute_url;
        debug!(url = %url, path = %asset.archive_path(), "downloading asset");

        let fetched = download_with_retry(&self.retry, move || {
            self.fetcher.fetch(url, FetchOptions::asset())
        })
        .await;

        let result = match fetched {
            Ok(body) => {
                debug!(url = %url, bytes = body.len(), "asset downloaded");
                AssetResult::Success(body)
            }
            Err(e) => {
                warn!(url = %url, error = %e, "asset download failed, omitting from archive");
                AssetResult::Failure(e.to_string())
            }
        };

        AssetOutcome { asset, result }
    }
}
