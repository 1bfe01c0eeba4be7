//! Application state for the API server

use crate::{AssetBundler, Config};
use std::sync::Arc;

/// Shared application state accessible to all route handlers
///
/// Cloned for each request (cheap Arc clone). Holds no per-request data;
/// every bundle is built from scratch.
#[derive(Clone)]
pub struct AppState {
    /// Pipeline used by the download endpoint
    pub bundler: Arc<AssetBundler>,

    /// Configuration (read-only)
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(bundler: Arc<AssetBundler>, config: Arc<Config>) -> Self {
        Self { bundler, config }
    }
}
