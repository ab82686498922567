//! Document store collaborator.

mod json;

pub use json::JsonStore;

use crate::constants::PHOTO_KIND;
use crate::error::Result;
use crate::record::{PhotoRecord, RecordKey, RecordPatch};
use chrono::{DateTime, Utc};

/// A filter on an indexed record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    /// `is_classified == value`.
    Classified(bool),
    /// `is_target == value`. Unclassified records never match.
    Target(bool),
    /// `last_posted <= time`.
    PostedAtOrBefore(DateTime<Utc>),
}

impl Filter {
    fn matches(&self, record: &PhotoRecord) -> bool {
        match *self {
            Self::Classified(v) => record.is_classified == v,
            Self::Target(v) => record.is_target == Some(v),
            Self::PostedAtOrBefore(t) => record.last_posted <= t,
        }
    }
}

/// A kind plus a conjunction of filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Record kind.
    pub kind: String,
    /// All filters must match.
    pub filters: Vec<Filter>,
}

impl Query {
    /// Query over photo records.
    pub fn photos() -> Self {
        Self {
            kind: PHOTO_KIND.to_string(),
            filters: Vec::new(),
        }
    }

    /// Add a filter.
    #[must_use]
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Whether `record` satisfies this query.
    pub fn matches(&self, record: &PhotoRecord) -> bool {
        record.key.kind == self.kind && self.filters.iter().all(|f| f.matches(record))
    }
}

/// Persistent record storage.
#[allow(async_fn_in_trait)]
pub trait DocumentStore {
    /// Point lookup.
    async fn get(&self, key: &RecordKey) -> Result<Option<PhotoRecord>>;

    /// Return the stored record for `record.key`, inserting `record` if absent.
    ///
    /// The flag is `true` when the record was inserted.
    async fn get_or_create(&self, record: PhotoRecord) -> Result<(PhotoRecord, bool)>;

    /// Upsert one record.
    async fn put(&self, record: &PhotoRecord) -> Result<()>;

    /// Upsert many records, batched.
    async fn put_many(&self, records: &[PhotoRecord]) -> Result<()>;

    /// Apply a partial update and return the updated record.
    async fn update(&self, key: &RecordKey, patch: &RecordPatch) -> Result<PhotoRecord>;

    /// Records matching `query`.
    async fn query(&self, query: &Query) -> Result<Vec<PhotoRecord>>;

    /// Keys of records matching `query`.
    async fn query_keys(&self, query: &Query) -> Result<Vec<RecordKey>> {
        Ok(self
            .query(query)
            .await?
            .into_iter()
            .map(|r| r.key)
            .collect())
    }
}
