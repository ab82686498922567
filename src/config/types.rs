//! Configuration type definitions.

use crate::constants::{DEFAULT_LABEL_BYTE_BUDGET, api, classify, post, search, storage};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Photo search settings.
    pub search: SearchConfig,

    /// Classification settings.
    pub classify: ClassifyConfig,

    /// Posting settings.
    pub post: PostConfig,

    /// Where images and records live.
    pub storage: StorageConfig,

    /// Remote service endpoints and timeouts.
    pub api: ApiConfig,
}

/// Photo search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Free-text queries, each searched separately.
    pub terms: Vec<String>,

    /// Comma-separated license ids to accept.
    pub licenses: String,

    /// Result ordering, e.g. `relevance` or `date-posted-desc`.
    pub sort: String,

    /// Results per page.
    pub per_page: u32,

    /// Stop after this many pages per term.
    pub max_pages: u32,

    /// Only photos uploaded since the first day of the month this many
    /// months back.
    pub lookback_months: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            terms: search::DEFAULT_TERMS.iter().map(ToString::to_string).collect(),
            licenses: search::LICENSES.to_string(),
            sort: search::DEFAULT_SORT.to_string(),
            per_page: search::DEFAULT_PER_PAGE,
            max_pages: search::DEFAULT_MAX_PAGES,
            lookback_months: search::DEFAULT_LOOKBACK_MONTHS,
        }
    }
}

/// Classification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifyConfig {
    /// Labels that count as a match.
    pub targets: Vec<String>,

    /// Byte budget for the stored label list.
    pub label_byte_budget: usize,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            targets: classify::DEFAULT_TARGETS
                .iter()
                .map(ToString::to_string)
                .collect(),
            label_byte_budget: DEFAULT_LABEL_BYTE_BUDGET,
        }
    }
}

/// Posting settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PostConfig {
    /// Hashtag appended to every message.
    pub hashtag: String,

    /// Months before a photo may be posted again.
    pub cooldown_months: u32,

    /// Message length limit in characters.
    pub max_chars: usize,
}

impl Default for PostConfig {
    fn default() -> Self {
        Self {
            hashtag: post::DEFAULT_HASHTAG.to_string(),
            cooldown_months: post::DEFAULT_COOLDOWN_MONTHS,
            max_chars: post::MAX_CHARS,
        }
    }
}

/// Storage locations. Unset paths resolve under the platform data directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Image cache directory.
    pub assets_dir: Option<PathBuf>,

    /// JSON record store file.
    pub store_path: Option<PathBuf>,
}

/// Remote service endpoints and HTTP timeouts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Flickr REST endpoint.
    pub flickr_base: String,

    /// Cloud Vision base URL.
    pub vision_base: String,

    /// Twitter API base URL.
    pub twitter_base: String,

    /// TCP connect timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Whole-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            flickr_base: api::FLICKR_BASE.to_string(),
            vision_base: api::VISION_BASE.to_string(),
            twitter_base: api::TWITTER_BASE.to_string(),
            connect_timeout_secs: api::CONNECT_TIMEOUT_SECS,
            request_timeout_secs: api::REQUEST_TIMEOUT_SECS,
        }
    }
}

impl StorageConfig {
    /// Image cache directory, falling back to `<data_dir>/assets`.
    pub fn assets_dir_or(&self, data_dir: &std::path::Path) -> PathBuf {
        self.assets_dir
            .clone()
            .unwrap_or_else(|| data_dir.join(storage::DEFAULT_ASSETS_DIR))
    }

    /// Store file, falling back to `<data_dir>/photos.json`.
    pub fn store_path_or(&self, data_dir: &std::path::Path) -> PathBuf {
        self.store_path
            .clone()
            .unwrap_or_else(|| data_dir.join(storage::DEFAULT_STORE_FILE))
    }
}
