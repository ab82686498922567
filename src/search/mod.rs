//! Photo search and ingestion.
//!
//! [`PhotoSearch`] is the seam to the photo source; [`FlickrClient`] is the
//! Flickr implementation. [`ingest_terms`] walks results for each search
//! term and writes any photos not yet in the store.

mod flickr;
mod raw;

pub use flickr::FlickrClient;
pub use raw::RawPhoto;

use crate::error::Result;
use crate::output::progress;
use crate::record::PhotoRecord;
use crate::store::DocumentStore;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Parameters for one search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    /// Free-text query.
    pub text: String,
    /// Comma-separated license ids.
    pub licenses: String,
    /// Sort order.
    pub sort: String,
    /// Results per page.
    pub per_page: u32,
    /// Only photos uploaded at or after this time.
    pub min_upload_date: DateTime<Utc>,
}

/// One page of search results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchPage {
    /// This page's number, starting at 1.
    pub page: u32,
    /// Total page count.
    pub pages: u32,
    /// Photos on this page.
    pub photos: Vec<RawPhoto>,
}

/// Photo search service.
#[allow(async_fn_in_trait)]
pub trait PhotoSearch {
    /// Fetch page `page` (1-based) of results.
    async fn search_page(&self, params: &SearchParams, page: u32) -> Result<SearchPage>;
}

/// Walk result pages for `params`, stopping at the last page or `max_pages`.
pub async fn walk<S: PhotoSearch>(
    search: &S,
    params: &SearchParams,
    max_pages: u32,
) -> Result<Vec<RawPhoto>> {
    let mut photos = Vec::new();
    let mut page = 1;
    loop {
        let result = search.search_page(params, page).await?;
        let last = result.pages.min(max_pages);
        let empty = result.photos.is_empty();
        photos.extend(result.photos);
        if empty || page >= last {
            break;
        }
        page += 1;
    }
    debug!(
        "'{}': {} result(s) over {} page(s)",
        params.text,
        photos.len(),
        page
    );
    Ok(photos)
}

/// Counts reported at the end of a search run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchSummary {
    /// Valid photos returned by the search.
    pub found: usize,
    /// Of those, photos not previously stored.
    pub created: usize,
    /// Results that failed validation.
    pub skipped: usize,
}

impl std::ops::AddAssign for SearchSummary {
    fn add_assign(&mut self, rhs: Self) {
        self.found += rhs.found;
        self.created += rhs.created;
        self.skipped += rhs.skipped;
    }
}

/// Search one term and store photos that are not stored yet.
///
/// Existing records are never overwritten, so classification results and
/// post history survive re-running a search.
pub async fn ingest<P, S>(
    search: &P,
    store: &S,
    params: &SearchParams,
    max_pages: u32,
) -> Result<SearchSummary>
where
    P: PhotoSearch,
    S: DocumentStore,
{
    let raw = walk(search, params, max_pages).await?;
    let mut summary = SearchSummary::default();
    let mut seen = HashSet::new();
    let mut fresh: Vec<PhotoRecord> = Vec::new();

    for photo in raw {
        let record = match photo.into_record(&params.text) {
            Ok(record) => record,
            Err(e) => {
                warn!("Skipping search result: {}", e);
                summary.skipped += 1;
                continue;
            }
        };
        if !seen.insert(record.key.clone()) {
            continue;
        }
        summary.found += 1;
        if store.get(&record.key).await?.is_none() {
            fresh.push(record);
        }
    }

    summary.created = fresh.len();
    if !fresh.is_empty() {
        store.put_many(&fresh).await?;
    }
    info!(
        "Found {} photo(s) of '{}' uploaded since {}, {} new",
        summary.found,
        params.text,
        params.min_upload_date.format("%Y-%m-%d"),
        summary.created
    );
    Ok(summary)
}

/// Run [`ingest`] for every term, sharing the other parameters.
///
/// A failing term is logged and the remaining terms still run.
pub async fn ingest_terms<P, S>(
    search: &P,
    store: &S,
    terms: &[String],
    template: &SearchParams,
    max_pages: u32,
    show_progress: bool,
) -> SearchSummary
where
    P: PhotoSearch,
    S: DocumentStore,
{
    let mut total = SearchSummary::default();
    let spinner = progress::create_spinner("Searching", show_progress);

    for (i, term) in terms.iter().enumerate() {
        progress::set_message(
            spinner.as_ref(),
            format!("Searching '{}' ({}/{})", term, i + 1, terms.len()),
        );
        let params = SearchParams {
            text: term.clone(),
            ..template.clone()
        };
        match ingest(search, store, &params, max_pages).await {
            Ok(summary) => total += summary,
            Err(e) => warn!("Search for '{}' failed: {}", term, e),
        }
    }

    progress::finish_progress(spinner, "done");
    total
}
