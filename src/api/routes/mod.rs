//! Route handlers for the REST API
//!
//! - [`download`] - Page bundling
//! - [`system`] - Liveness, health, OpenAPI

use serde::{Deserialize, Serialize};

mod download;
mod system;

pub use download::*;
pub use system::*;

/// Query parameters for GET /download
#[derive(Debug, Deserialize, Serialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DownloadQuery {
    /// Absolute http(s) URL of the page to bundle
    pub url: Option<String>,
}
