//! Error types for birbybot.

/// Result type alias for birbybot operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for birbybot.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration directory could not be determined.
    #[error("could not determine configuration directory for this platform")]
    ConfigDirNotFound,

    /// Data directory could not be determined.
    #[error("could not determine data directory for this platform")]
    DataDirNotFound,

    /// Failed to read configuration file.
    #[error("failed to read config file '{path}'")]
    ConfigRead {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}'")]
    ConfigParse {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// Failed to write configuration file.
    #[error("failed to write config file '{path}'")]
    ConfigWrite {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize configuration.
    #[error("failed to serialize config")]
    ConfigSerialize {
        /// Underlying serialization error.
        #[source]
        source: toml::ser::Error,
    },

    /// A required credential is not set in the environment.
    #[error("missing required environment variable {name}")]
    MissingCredential {
        /// Name of the environment variable.
        name: &'static str,
    },

    /// Failed to build the HTTP client.
    #[error("failed to create HTTP client: {reason}")]
    HttpClient {
        /// Description of the failure.
        reason: String,
    },

    /// HTTP request could not be completed.
    #[error("request to {endpoint} failed")]
    Request {
        /// Endpoint without query string (query may carry credentials).
        endpoint: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// HTTP request returned a non-success status.
    #[error("request to {endpoint} returned HTTP {status}: {body}")]
    HttpStatus {
        /// Endpoint without query string.
        endpoint: String,
        /// HTTP status code.
        status: u16,
        /// Response body (possibly truncated).
        body: String,
    },

    /// Response body could not be decoded.
    #[error("failed to decode response from {endpoint}")]
    ResponseParse {
        /// Endpoint without query string.
        endpoint: String,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// Remote API reported an application-level error.
    #[error("{service} API error: {message}")]
    Api {
        /// Service name.
        service: &'static str,
        /// Error message reported by the service.
        message: String,
    },

    /// Image download failed.
    #[error("failed to download from '{url}': {source}")]
    DownloadFailed {
        /// URL that failed.
        url: String,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Record carries none of the resolution URLs.
    #[error("photo '{id}' has no resolution URL")]
    NoResolutionUrl {
        /// Photo identifier.
        id: String,
    },

    /// Search result could not be turned into a record.
    #[error("invalid search result '{id}': {reason}")]
    InvalidRecord {
        /// Photo identifier, if known.
        id: String,
        /// Description of the problem.
        reason: String,
    },

    /// Failed to open or decode an image.
    #[error("failed to decode image '{path}'")]
    ImageDecode {
        /// Path to the image.
        path: std::path::PathBuf,
        /// Underlying image error.
        #[source]
        source: image::ImageError,
    },

    /// Failed to encode a cropped image.
    #[error("failed to encode image crop")]
    ImageEncode {
        /// Underlying image error.
        #[source]
        source: image::ImageError,
    },

    /// Crop box has no area.
    #[error("invalid crop box ({left}, {upper}, {right}, {lower})")]
    InvalidCropBox {
        /// Left edge.
        left: u32,
        /// Upper edge.
        upper: u32,
        /// Right edge.
        right: u32,
        /// Lower edge.
        lower: u32,
    },

    /// Failed to read the document store.
    #[error("failed to read store '{path}'")]
    StoreRead {
        /// Path to the store file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the document store.
    #[error("failed to parse store '{path}'")]
    StoreParse {
        /// Path to the store file.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// Failed to write the document store.
    #[error("failed to write store '{path}'")]
    StoreWrite {
        /// Path to the store file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize store contents.
    #[error("failed to serialize store")]
    StoreSerialize {
        /// Underlying serialization error.
        #[source]
        source: serde_json::Error,
    },

    /// Record does not exist in the store.
    #[error("record '{key}' not found")]
    RecordNotFound {
        /// Record key.
        key: String,
    },

    /// No record is eligible for posting.
    #[error("no eligible photo to post")]
    NothingToPost,

    /// Internal error (for unexpected failures).
    #[error("internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}
