//! Configuration loading and management.

mod credentials;
mod file;
mod paths;
mod types;
mod validate;

pub use credentials::require;
pub use file::{init_default_config, load_config_file, load_default_config, save_config};
pub use paths::{config_dir, config_file_path, data_dir};
pub use types::{ApiConfig, ClassifyConfig, Config, PostConfig, SearchConfig, StorageConfig};
pub use validate::validate_config;
