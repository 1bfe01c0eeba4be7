//! Core types flowing through the bundling pipeline

use crate::error::{Error, Result};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// A validated request to bundle one page
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadRequest {
    /// Absolute http(s) URL of the page to bundle
    pub target_url: Url,
}

impl DownloadRequest {
    /// Validate a raw target URL
    ///
    /// The URL must be absolute, use `http` or `https` and carry a host, since
    /// the host names the resulting archive.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(Error::Validation("URL is required.".to_string()));
        }

        let target_url = Url::parse(raw)
            .map_err(|e| Error::Validation(format!("Invalid URL '{}': {}", raw, e)))?;

        if !matches!(target_url.scheme(), "http" | "https") {
            return Err(Error::Validation(format!(
                "Unsupported URL scheme '{}': only http and https are allowed.",
                target_url.scheme()
            )));
        }

        if target_url.host_str().is_none_or(str::is_empty) {
            return Err(Error::Validation(format!("URL '{}' has no host.", raw)));
        }

        Ok(Self { target_url })
    }
}

/// Kind of asset referenced by the page
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetCategory {
    /// `<link rel="stylesheet" href=...>`
    Stylesheet,
    /// `<script src=...>`
    Script,
}

impl AssetCategory {
    /// Archive folder holding assets of this category
    pub fn folder(&self) -> &'static str {
        match self {
            AssetCategory::Stylesheet => "css",
            AssetCategory::Script => "js",
        }
    }
}

impl fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.folder())
    }
}

/// Raw location string found in the markup
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetReference {
    /// Attribute value as written, possibly relative
    pub raw_location: String,
    /// What kind of asset it points at
    pub category: AssetCategory,
}

impl AssetReference {
    /// Create a reference
    pub fn new(raw_location: impl Into<String>, category: AssetCategory) -> Self {
        Self {
            raw_location: raw_location.into(),
            category,
        }
    }
}

/// Reference resolved against the page URL
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedAsset {
    /// Absolute URL to fetch
    pub absolute_url: Url,
    /// What kind of asset it is
    pub category: AssetCategory,
    /// File name used inside the archive
    pub derived_name: String,
}

impl ResolvedAsset {
    /// Path of this asset inside the archive (`css/<name>` or `js/<name>`)
    pub fn archive_path(&self) -> String {
        format!("{}/{}", self.category.folder(), self.derived_name)
    }
}

/// Terminal result of retrieving one asset
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssetResult {
    /// Body bytes of the asset
    Success(Bytes),
    /// Reason the asset could not be retrieved
    Failure(String),
}

/// Outcome of one download unit
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetOutcome {
    /// The asset that was attempted
    pub asset: ResolvedAsset,
    /// What happened
    pub result: AssetResult,
}

impl AssetOutcome {
    /// Whether the asset was retrieved
    pub fn is_success(&self) -> bool {
        matches!(self.result, AssetResult::Success(_))
    }
}

/// Orchestrator state for a single request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Request accepted
    Received,
    /// Fetching the primary document
    FetchingDocument,
    /// Scanning the document for asset references
    Extracting,
    /// Fetching assets concurrently
    Downloading,
    /// Serializing the archive
    Archiving,
    /// Archive produced
    Completed,
    /// Primary document could not be fetched
    FetchFailed,
}

impl Stage {
    /// Snake-case name used in log fields
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Received => "received",
            Stage::FetchingDocument => "fetching_document",
            Stage::Extracting => "extracting",
            Stage::Downloading => "downloading",
            Stage::Archiving => "archiving",
            Stage::Completed => "completed",
            Stage::FetchFailed => "fetch_failed",
        }
    }

    /// Whether no further transition can happen
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Completed | Stage::FetchFailed)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counters describing one bundling run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleReport {
    /// References found in the document
    pub discovered: usize,
    /// References that could not be resolved to a fetchable URL
    pub unresolved: usize,
    /// Assets fetched successfully
    pub downloaded: usize,
    /// Assets whose fetch failed
    pub failed: usize,
}

/// Finished archive ready to hand to the caller
#[derive(Clone, Debug)]
pub struct Bundle {
    /// Suggested download name, `<host>-assets.zip`
    pub file_name: String,
    /// Serialized zip archive
    pub bytes: Vec<u8>,
    /// What happened while building it
    pub report: BundleReport,
}
