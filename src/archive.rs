//! In-memory zip assembly
//!
//! The archive always holds `index.html` at its root, plus `css/<name>` and
//! `js/<name>` for every asset that was retrieved. Failed assets leave no trace.
//! Insertion happens from a single task after all downloads have joined, so
//! no locking is involved; when two assets share a path, the later insertion
//! wins.

use crate::error::ArchiveError;
use crate::types::{AssetOutcome, AssetResult};
use bytes::Bytes;
use std::collections::BTreeMap;
use std::io::{Cursor, Write};
use tracing::debug;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Archive path of the primary document
pub const INDEX_PATH: &str = "index.html";

/// Accumulates archive entries until serialization
#[derive(Clone, Debug)]
pub struct ArchiveBuilder {
    document: Bytes,
    assets: BTreeMap<String, Bytes>,
}

impl ArchiveBuilder {
    /// Start an archive around the primary document
    pub fn new(document: impl Into<Bytes>) -> Self {
        Self {
            document: document.into(),
            assets: BTreeMap::new(),
        }
    }

    /// Add a successful outcome at its archive path; failures are skipped
    ///
    /// Returns `true` when the outcome replaced an existing entry.
    pub fn insert(&mut self, outcome: &AssetOutcome) -> bool {
        match &outcome.result {
            AssetResult::Success(body) => {
                let path = outcome.asset.archive_path();
                let replaced = self.assets.insert(path.clone(), body.clone()).is_some();
                if replaced {
                    debug!(path = %path, url = %outcome.asset.absolute_url, "archive entry overwritten");
                }
                replaced
            }
            AssetResult::Failure(_) => false,
        }
    }

    /// Paths that [`build`](Self::build) will write, in write order
    pub fn entry_paths(&self) -> Vec<String> {
        std::iter::once(INDEX_PATH.to_string())
            .chain(self.assets.keys().cloned())
            .collect()
    }

    /// Number of entries including `index.html`
    pub fn entry_count(&self) -> usize {
        1 + self.assets.len()
    }

    /// Serialize to a deflate-compressed zip
    pub fn build(self) -> Result<Vec<u8>, ArchiveError> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(0o644);

        zip.start_file(INDEX_PATH, options)?;
        zip.write_all(&self.document)?;

        for (path, body) in &self.assets {
            zip.start_file(path.as_str(), options)?;
            zip.write_all(body)?;
        }

        let bytes = zip.finish()?.into_inner();
        debug!(
            entries = self.entry_count(),
            bytes = bytes.len(),
            "archive serialized"
        );
        Ok(bytes)
    }
}

/// Build an archive from the document and the joined outcomes
///
/// Outcomes are inserted in the order given, which for the downloader is
/// completion order.
pub fn build_archive(
    document: impl Into<Bytes>,
    outcomes: &[AssetOutcome],
) -> Result<Vec<u8>, ArchiveError> {
    let mut builder = ArchiveBuilder::new(document);
    for outcome in outcomes {
        builder.insert(outcome);
    }
    builder.build()
}
