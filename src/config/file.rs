//! Reading and writing `config.toml`.

use super::{Config, config_file_path};
use crate::error::{Error, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Parse the TOML file at `path`; a missing file yields [`Config::default`].
pub fn load_config_file(path: &Path) -> Result<Config> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Config::default());
        }
        Err(e) => {
            return Err(Error::ConfigRead {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    debug!("Loading config from {}", path.display());
    toml::from_str(&contents).map_err(|e| Error::ConfigParse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Config from the platform config directory, or defaults when there is none.
pub fn load_default_config() -> Result<Config> {
    match config_file_path() {
        Ok(path) => load_config_file(&path),
        Err(e) => {
            debug!("{}, using defaults", e);
            Ok(Config::default())
        }
    }
}

/// Write `config` to `path`, creating parent directories.
///
/// The file is replaced through a `.toml.tmp` sibling and a rename.
pub fn save_config(config: &Config, path: &Path) -> Result<()> {
    let write_error = |e: std::io::Error| Error::ConfigWrite {
        path: path.to_path_buf(),
        source: e,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(write_error)?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| Error::ConfigSerialize { source: e })?;

    let tmp = path.with_extension("toml.tmp");
    std::fs::write(&tmp, contents).map_err(write_error)?;
    std::fs::rename(&tmp, path).map_err(write_error)
}

/// Write a default `config.toml` unless one already exists.
///
/// Returns the config path and whether a new file was written.
pub fn init_default_config() -> Result<(PathBuf, bool)> {
    let path = config_file_path()?;
    if path.exists() {
        return Ok((path, false));
    }
    save_config(&Config::default(), &path)?;
    Ok((path, true))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_load_nonexistent_file_returns_default() {
        let config = load_config_file(Path::new("/nonexistent/path/config.toml")).unwrap();
        assert_eq!(config.post.hashtag, "#birbybot");
    }

    #[test]
    fn test_load_valid_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[search]
terms = ["killdeer chick"]
max_pages = 2

[storage]
store_path = "/srv/birbybot/photos.json"
"#
        )
        .unwrap();

        let config = load_config_file(file.path()).unwrap();
        assert_eq!(config.search.terms, vec!["killdeer chick"]);
        assert_eq!(config.search.max_pages, 2);
        assert_eq!(config.search.per_page, 100);
        assert_eq!(
            config.storage.store_path.as_deref(),
            Some(Path::new("/srv/birbybot/photos.json"))
        );
    }

    #[test]
    fn test_load_invalid_toml_returns_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "this is not valid toml {{{{").unwrap();

        let err = load_config_file(file.path()).unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
    }

    #[test]
    fn test_load_directory_is_read_error() {
        let dir = TempDir::new().unwrap();
        let err = load_config_file(dir.path()).unwrap_err();
        assert!(matches!(err, Error::ConfigRead { .. }));
    }

    #[test]
    fn test_save_replaces_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[post]\nhashtag = \"#old\"\n").unwrap();

        save_config(&Config::default(), &path).unwrap();

        assert_eq!(load_config_file(&path).unwrap().post.hashtag, "#birbybot");
        assert!(!dir.path().join("config.toml.tmp").exists());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sub").join("config.toml");
        let mut config = Config::default();
        config.classify.targets = vec!["bat".to_string()];

        save_config(&config, &path).unwrap();
        let loaded = load_config_file(&path).unwrap();
        assert_eq!(loaded.classify.targets, vec!["bat"]);
    }
}
