//! Resolution of raw references against the page URL

use crate::error::ResolutionError;
use crate::types::{AssetReference, ResolvedAsset};
use url::Url;

/// Name used when a URL has no usable final path segment
pub const UNKNOWN_NAME: &str = "unknown";

/// Parse a base document URL, requiring it to be absolute
pub fn parse_base(base: &str) -> Result<Url, ResolutionError> {
    Url::parse(base).map_err(|e| ResolutionError::InvalidBase {
        base: base.to_string(),
        reason: e.to_string(),
    })
}

/// Resolve `reference` against `base`
///
/// Handles absolute, scheme-relative and path-relative references the way a
/// browser does. Only http(s) results are fetchable; anything else (e.g.
/// `data:` or `javascript:`) is rejected.
pub fn resolve(reference: &AssetReference, base: &Url) -> Result<ResolvedAsset, ResolutionError> {
    if base.cannot_be_a_base() {
        return Err(ResolutionError::InvalidBase {
            base: base.to_string(),
            reason: "URL cannot be used as a base".to_string(),
        });
    }

    let absolute_url =
        base.join(&reference.raw_location)
            .map_err(|e| ResolutionError::InvalidReference {
                reference: reference.raw_location.clone(),
                base: base.to_string(),
                reason: e.to_string(),
            })?;

    if !matches!(absolute_url.scheme(), "http" | "https") {
        return Err(ResolutionError::UnsupportedScheme {
            scheme: absolute_url.scheme().to_string(),
            url: absolute_url.to_string(),
        });
    }

    let derived_name = derive_name(&absolute_url);
    Ok(ResolvedAsset {
        absolute_url,
        category: reference.category,
        derived_name,
    })
}

/// Archive file name for a resolved URL
///
/// The text after the final `/` of the path, cut at the first `?`, or
/// [`UNKNOWN_NAME`] when that is empty.
pub fn derive_name(url: &Url) -> String {
    let path = url.path();
    let last = path.rsplit('/').next().unwrap_or(path);
    let name = last.split('?').next().unwrap_or(last);

    if name.is_empty() {
        UNKNOWN_NAME.to_string()
    } else {
        name.to_string()
    }
}
