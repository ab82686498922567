//! Photo record type definitions.

use super::labels::LabelSet;
use super::safety::SafetyScores;
use crate::constants::{NEVER_POSTED_UNIX, PHOTO_KIND};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Composite store key: kind plus name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordKey {
    /// Record kind, e.g. `Photo`.
    pub kind: String,
    /// Unique name within the kind, e.g. `Flickr-36092472285`.
    pub name: String,
}

impl RecordKey {
    /// Key for a photo record.
    pub fn photo(name: impl Into<String>) -> Self {
        Self {
            kind: PHOTO_KIND.to_string(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.name)
    }
}

/// Available image URLs by size tier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionUrls {
    /// Large, 1024 px on the longest side (`url_l`).
    pub large: Option<String>,
    /// Medium, 800 px (`url_c`).
    pub medium_large: Option<String>,
    /// Medium, 640 px (`url_z`).
    pub medium: Option<String>,
    /// Original upload (`url_o`).
    pub original: Option<String>,
}

impl ResolutionUrls {
    /// First available URL in order large, medium-large, medium, original.
    ///
    /// Empty strings count as absent.
    pub fn preferred(&self) -> Option<&str> {
        [&self.large, &self.medium_large, &self.medium, &self.original]
            .into_iter()
            .filter_map(Option::as_deref)
            .find(|url| !url.is_empty())
    }
}

/// Persisted state of one discovered photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoRecord {
    /// Store key.
    pub key: RecordKey,
    /// Source service, e.g. `Flickr`.
    pub source: String,
    /// Identifier at the source.
    pub source_id: String,
    /// Search terms that found this photo.
    pub search_terms: String,
    /// Photo title.
    pub title: String,
    /// Photographer display name.
    pub owner_name: String,
    /// Source license id.
    #[serde(default)]
    pub license: Option<String>,
    /// Image URLs by size.
    #[serde(default)]
    pub urls: ResolutionUrls,
    /// Upload time at the source.
    pub uploaded_at: DateTime<Utc>,
    /// URL chosen for download.
    pub download_url: String,
    /// Whether a classification decision has been reached.
    #[serde(default)]
    pub is_classified: bool,
    /// Whether the photo shows a target subject; `None` until classified.
    #[serde(default)]
    pub is_target: Option<bool>,
    /// Labels gathered during classification.
    #[serde(default)]
    pub labels: Vec<String>,
    /// Safe-search scores, if the detector returned them.
    #[serde(default)]
    pub safety: Option<SafetyScores>,
    /// Last time this photo was posted.
    pub last_posted: DateTime<Utc>,
    /// Source fields not modelled above.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl PhotoRecord {
    /// Timestamp used for records that were never posted.
    pub fn never_posted() -> DateTime<Utc> {
        DateTime::from_timestamp(NEVER_POSTED_UNIX, 0).unwrap_or_default()
    }

    /// Record the outcome of a classification pass.
    pub fn mark_classified(
        &mut self,
        is_target: bool,
        labels: &LabelSet,
        label_byte_budget: usize,
    ) {
        self.is_target = Some(is_target);
        self.labels = super::truncate_labels(labels.iter(), label_byte_budget);
        self.is_classified = true;
    }

    /// Apply a partial update in place.
    pub fn apply(&mut self, patch: &RecordPatch) {
        if let Some(v) = patch.is_classified {
            self.is_classified = v;
        }
        if let Some(v) = patch.is_target {
            self.is_target = Some(v);
        }
        if let Some(v) = &patch.labels {
            self.labels.clone_from(v);
        }
        if let Some(v) = patch.safety {
            self.safety = Some(v);
        }
        if let Some(v) = patch.last_posted {
            self.last_posted = v;
        }
    }
}

/// Field-level partial update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordPatch {
    /// New classification status.
    pub is_classified: Option<bool>,
    /// New match flag.
    pub is_target: Option<bool>,
    /// New label list.
    pub labels: Option<Vec<String>>,
    /// New safety scores.
    pub safety: Option<SafetyScores>,
    /// New last-posted time.
    pub last_posted: Option<DateTime<Utc>>,
}
