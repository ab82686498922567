//! Preferred download resolution.
//!
//! Large images (1024 px) are the best fit for both the Vision API and the
//! posting platform; originals can be tens of megabytes and are only used
//! when nothing smaller was returned.

use super::types::ResolutionUrls;
use crate::error::{Error, Result};

/// Pick the URL to download for a photo.
///
/// Fails when none of the four tiers is present. The search always asks for
/// all four, so this indicates a malformed search result.
pub fn pick_url(id: &str, urls: &ResolutionUrls) -> Result<String> {
    urls.preferred()
        .map(str::to_string)
        .ok_or_else(|| Error::NoResolutionUrl { id: id.to_string() })
}
