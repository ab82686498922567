//! Application-wide constants.
//!
//! All magic numbers and strings are defined here to ensure consistency
//! and make changes easy to track.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "birbybot";

/// Datastore kind for photo records.
pub const PHOTO_KIND: &str = "Photo";

/// Maximum number of records written in one batch.
pub const MAX_BATCH_WRITE: usize = 500;

/// Byte budget for the serialized label list.
///
/// Matches the Cloud Datastore limit for indexed string properties.
pub const DEFAULT_LABEL_BYTE_BUDGET: usize = 1500;

/// Timestamp given to freshly created records (2018-01-01T00:00:00Z).
pub const NEVER_POSTED_UNIX: i64 = 1_514_764_800;

/// Environment variables holding collaborator credentials.
pub mod env {
    /// Flickr API key.
    pub const FLICKR_KEY: &str = "FLICKR_KEY";
    /// Google Cloud Vision API key.
    pub const VISION_API_KEY: &str = "GOOGLE_VISION_API_KEY";
    /// OAuth 2.0 user access token for the posting account.
    pub const TWITTER_ACCESS_TOKEN: &str = "TWITTER_ACCESS_TOKEN";
}

/// Flickr search defaults.
pub mod search {
    /// Source name stored on every record.
    pub const SOURCE: &str = "Flickr";

    /// All licenses except "All Rights Reserved" (0) and "No known copyright
    /// restrictions" (7).
    pub const LICENSES: &str = "1,2,3,4,5,6,8,9,10";

    /// Extra fields requested for every search result.
    pub const EXTRAS: &str = "license,date_upload,owner_name,url_z,url_c,url_l,url_o";

    /// Default sort order.
    pub const DEFAULT_SORT: &str = "relevance";

    /// Default page size.
    pub const DEFAULT_PER_PAGE: u32 = 100;

    /// Default cap on pages walked per search term.
    pub const DEFAULT_MAX_PAGES: u32 = 10;

    /// Default lookback window in months.
    pub const DEFAULT_LOOKBACK_MONTHS: u32 = 1;

    /// Default search terms.
    pub const DEFAULT_TERMS: &[&str] = &[
        "plover chick",
        "plover hatchling",
        "plover baby",
        "sandpiper chick",
        "sandpiper hatchling",
        "sandpiper baby",
    ];
}

/// Classification defaults.
pub mod classify {
    /// Default target terms (birds and close synonyms).
    pub const DEFAULT_TARGETS: &[&str] = &["bird", "seabird", "beak", "egg"];
}

/// Posting defaults.
pub mod post {
    /// Default hashtag appended to every message.
    pub const DEFAULT_HASHTAG: &str = "#birbybot";

    /// Default cooldown before a record may be posted again.
    pub const DEFAULT_COOLDOWN_MONTHS: u32 = 1;

    /// Platform message length limit in characters.
    pub const MAX_CHARS: usize = 280;

    /// Flickr short link prefix.
    pub const SHORT_URL_PREFIX: &str = "https://flic.kr/p/";

    /// Flickr base58 alphabet (no 0, O, I, l).
    pub const BASE58_ALPHABET: &[u8; 58] =
        b"123456789abcdefghijkmnopqrstuvwxyzABCDEFGHJKLMNPQRSTUVWXYZ";
}

/// Default API endpoints.
pub mod api {
    /// Flickr REST endpoint.
    pub const FLICKR_BASE: &str = "https://api.flickr.com/services/rest/";
    /// Cloud Vision annotate endpoint base.
    pub const VISION_BASE: &str = "https://vision.googleapis.com";
    /// Twitter/X API base.
    pub const TWITTER_BASE: &str = "https://api.x.com";
    /// Connect timeout in seconds.
    pub const CONNECT_TIMEOUT_SECS: u64 = 30;
    /// Request timeout in seconds.
    pub const REQUEST_TIMEOUT_SECS: u64 = 120;
}

/// On-disk layout.
pub mod storage {
    /// Default image cache directory.
    pub const DEFAULT_ASSETS_DIR: &str = "assets";
    /// Subdirectory for negatives awaiting manual review.
    pub const NEGATIVE_DIR: &str = "negative";
    /// Extension of cached images.
    pub const IMAGE_EXTENSION: &str = "jpg";
    /// Default document store file name.
    pub const DEFAULT_STORE_FILE: &str = "photos.json";
}
