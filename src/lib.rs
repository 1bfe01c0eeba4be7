//! # page-bundler
//!
//! Fetch a web page, download the stylesheets and scripts it references, and
//! hand the lot back as a single zip archive.
//!
//! ## Pipeline
//!
//! 1. Fetch the target document with a browser-like identity
//! 2. Extract `<link rel="stylesheet" href>` and `<script src>` references
//! 3. Resolve each reference against the page URL
//! 4. Download every asset concurrently; a failed asset never fails the bundle
//! 5. Write `index.html` plus `css/<name>` and `js/<name>` entries into a zip
//!
//! ## Quick Start
//!
//! ```no_run
//! use page_bundler::{AssetBundler, Config, DownloadRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bundler = AssetBundler::new(&Config::default())?;
//!
//!     let request = DownloadRequest::parse("https://example.com/")?;
//!     let bundle = bundler.bundle(&request).await?;
//!
//!     std::fs::write(&bundle.file_name, &bundle.bytes)?;
//!     println!("{} assets downloaded", bundle.report.downloaded);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// REST API module
pub mod api;
/// Zip archive assembly
pub mod archive;
/// Configuration types
pub mod config;
/// Concurrent asset downloads
pub mod downloader;
/// Error types
pub mod error;
/// Asset reference extraction from HTML
pub mod extractor;
/// HTTP fetching
pub mod fetcher;
/// End-to-end bundling pipeline
pub mod pipeline;
/// Reference resolution and archive naming
pub mod resolver;
/// Retry logic with exponential backoff
pub mod retry;
/// Core types
pub mod types;

// Re-export commonly used types
pub use config::{Config, DownloaderConfig, FetchConfig, RetryConfig};
pub use error::{ApiError, Error, Result, ToHttpStatus};
pub use fetcher::{FetchOptions, Fetcher, HttpFetcher};
pub use pipeline::AssetBundler;
pub use types::{
    AssetCategory, AssetOutcome, AssetReference, AssetResult, Bundle, BundleReport,
    DownloadRequest, ResolvedAsset, Stage,
};

/// Resolve once SIGTERM or SIGINT is received (Ctrl+C on non-Unix).
///
/// Used as the graceful-shutdown trigger for [`api::start_api_server`].
#[cfg(unix)]
pub async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Handlers may fail to register in restricted environments (containers, tests)
    let sigterm_result = signal(SignalKind::terminate());
    let sigint_result = signal(SignalKind::interrupt());

    match (sigterm_result, sigint_result) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C)");
                }
            }
        }
        (Err(e), _) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for SIGINT only");
            if let Ok(mut sigint) = signal(SignalKind::interrupt()) {
                sigint.recv().await;
                tracing::info!("Received SIGINT signal (Ctrl+C)");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
        (_, Err(e)) => {
            tracing::warn!(error = %e, "Could not register SIGINT handler, waiting for SIGTERM only");
            if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
                sigterm.recv().await;
                tracing::info!("Received SIGTERM signal");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
    }
}

/// Resolve once Ctrl+C is received.
///
/// Used as the graceful-shutdown trigger for [`api::start_api_server`].
#[cfg(not(unix))]
pub async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
        }
    }
}
