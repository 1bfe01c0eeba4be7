//! Download handler: bundle a page and stream back the zip.

use crate::api::AppState;
use crate::error::{Error, Result};
use crate::types::{Bundle, DownloadRequest};
use axum::{
    extract::{Query, State, rejection::QueryRejection},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::{error, info, warn};

use super::DownloadQuery;

/// Message returned when the `url` query parameter is absent
pub const MISSING_URL_MESSAGE: &str = "URL is required.";

/// GET /download?url= - Bundle a page with its stylesheets and scripts
#[utoipa::path(
    get,
    path = "/download",
    tag = "download",
    params(DownloadQuery),
    responses(
        (status = 200, description = "Zip archive of the page and its assets", content_type = "application/zip"),
        (status = 400, description = "Missing or malformed url parameter", body = crate::error::ApiError),
        (status = 500, description = "The page could not be fetched or archived", body = crate::error::ApiError)
    )
)]
pub async fn download(
    State(state): State<AppState>,
    query: std::result::Result<Query<DownloadQuery>, QueryRejection>,
) -> Result<Response> {
    let request = parse_request(query).inspect_err(|e| {
        warn!(error = %e, "rejecting download request");
    })?;

    info!(url = %request.target_url, "starting download");
    let bundle = state.bundler.bundle(&request).await.inspect_err(|e| {
        error!(url = %request.target_url, error = %e, "download failed");
    })?;

    zip_response(bundle)
}

fn parse_request(
    query: std::result::Result<Query<DownloadQuery>, QueryRejection>,
) -> Result<DownloadRequest> {
    let Query(query) = query.map_err(|e| Error::Validation(e.body_text()))?;
    match query.url.as_deref() {
        Some(raw) if !raw.trim().is_empty() => DownloadRequest::parse(raw),
        _ => Err(Error::Validation(MISSING_URL_MESSAGE.to_string())),
    }
}

fn zip_response(bundle: Bundle) -> Result<Response> {
    let disposition = format!("attachment; filename=\"{}\"", bundle.file_name);
    let disposition = HeaderValue::from_str(&disposition)
        .map_err(|e| Error::ApiServerError(format!("invalid Content-Disposition: {}", e)))?;

    Ok((
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/zip"),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bundle.bytes,
    )
        .into_response())
}
