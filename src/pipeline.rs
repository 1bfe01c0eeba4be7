//! Bundling pipeline
//!
//! Sequences one request through its stages:
//!
//! ```text
//! Received -> FetchingDocument -> Extracting -> Downloading -> Archiving -> Completed
//!                    |
//!                    +-> FetchFailed
//! ```
//!
//! Only the primary document fetch (and archive serialization) can fail the
//! request. Unresolvable references and failed assets are logged and left out
//! of the archive.

use crate::archive::ArchiveBuilder;
use crate::config::Config;
use crate::downloader::AssetDownloader;
use crate::error::{ArchiveError, Error, Result};
use crate::extractor::extract_references;
use crate::fetcher::{FetchOptions, Fetcher, HttpFetcher};
use crate::resolver::resolve;
use crate::types::{Bundle, BundleReport, DownloadRequest, ResolvedAsset, Stage};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use url::Url;

/// Turns a page URL into a zip of the page and its stylesheets and scripts
#[derive(Clone)]
pub struct AssetBundler {
    fetcher: Arc<dyn Fetcher>,
    downloader: AssetDownloader,
}

impl AssetBundler {
    /// Create a bundler that fetches over HTTP
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        let fetcher = HttpFetcher::new(&config.fetch)?;
        Ok(Self::with_fetcher(Arc::new(fetcher), config))
    }

    /// Create a bundler around a custom [`Fetcher`]
    pub fn with_fetcher(fetcher: Arc<dyn Fetcher>, config: &Config) -> Self {
        let downloader = AssetDownloader::new(fetcher.clone(), config);
        Self {
            fetcher,
            downloader,
        }
    }

    /// Run the whole pipeline for one request
    pub async fn bundle(&self, request: &DownloadRequest) -> Result<Bundle> {
        let target = &request.target_url;
        transition(target, Stage::Received);

        transition(target, Stage::FetchingDocument);
        let document = match self.fetcher.fetch(target, FetchOptions::document()).await {
            Ok(document) => document,
            Err(e) => {
                error!(url = %target, error = %e, "primary document fetch failed");
                transition(target, Stage::FetchFailed);
                return Err(Error::Fetch(e));
            }
        };
        debug!(url = %target, bytes = document.len(), "primary document fetched");

        transition(target, Stage::Extracting);
        let references = extract_references(&document);
        let mut report = BundleReport {
            discovered: references.len(),
            ..BundleReport::default()
        };

        let mut resolved: Vec<ResolvedAsset> = Vec::with_capacity(references.len());
        for reference in &references {
            match resolve(reference, target) {
                Ok(asset) => resolved.push(asset),
                Err(e) => {
                    warn!(reference = %reference.raw_location, error = %e, "skipping unresolvable reference");
                    report.unresolved += 1;
                }
            }
        }

        transition(target, Stage::Downloading);
        let outcomes = self.downloader.download_all(resolved).await;

        transition(target, Stage::Archiving);
        let mut builder = ArchiveBuilder::new(document);
        for outcome in &outcomes {
            if outcome.is_success() {
                report.downloaded += 1;
            } else {
                report.failed += 1;
            }
            builder.insert(outcome);
        }
        let entries = builder.entry_count();
        debug!(url = %target, paths = ?builder.entry_paths(), "archive entries");
        let bytes = tokio::task::spawn_blocking(move || builder.build())
            .await
            .map_err(|e| ArchiveError::Task(e.to_string()))??;

        let file_name = archive_file_name(target);
        transition(target, Stage::Completed);
        info!(
            url = %target,
            file_name = %file_name,
            bytes = bytes.len(),
            entries,
            discovered = report.discovered,
            unresolved = report.unresolved,
            downloaded = report.downloaded,
            failed = report.failed,
            "bundle ready"
        );

        Ok(Bundle {
            file_name,
            bytes,
            report,
        })
    }
}

fn transition(url: &Url, stage: Stage) {
    if stage.is_terminal() {
        info!(url = %url, stage = %stage, "pipeline finished");
    } else {
        info!(url = %url, stage = %stage, "pipeline stage");
    }
}

/// Suggested download name, `<host>-assets.zip`
pub fn archive_file_name(url: &Url) -> String {
    format!("{}-assets.zip", url.host_str().unwrap_or("download"))
}
