//! On-disk image cache.
//!
//! Images are stored as `<assets>/<name>.jpg`. A cached file is reused
//! without checking the remote copy.

use crate::constants::storage::{IMAGE_EXTENSION, NEGATIVE_DIR};
use crate::error::{Error, Result};
use futures_util::StreamExt;
use reqwest::Client;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Download cache rooted at an assets directory.
pub struct ImageCache {
    http: Client,
    root: PathBuf,
}

impl ImageCache {
    /// Create a cache under `root`.
    pub fn new(http: Client, root: impl Into<PathBuf>) -> Self {
        Self {
            http,
            root: root.into(),
        }
    }

    /// Cache directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path an image named `name` is cached at.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.{IMAGE_EXTENSION}"))
    }

    /// Return the cached path for `name`, downloading `url` first if needed.
    pub async fn fetch(&self, url: &str, name: &str) -> Result<PathBuf> {
        let dest = self.path_for(name);
        if tokio::fs::try_exists(&dest).await.unwrap_or(false) {
            debug!("{} already cached", dest.display());
            return Ok(dest);
        }

        tokio::fs::create_dir_all(&self.root).await?;
        debug!("Downloading {} to {}", url, dest.display());

        // Write to a partial file so a failed download never looks cached.
        let partial = dest.with_extension("part");
        if let Err(e) = self.download(url, &partial).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(e);
        }
        tokio::fs::rename(&partial, &dest).await?;

        Ok(dest)
    }

    async fn download(&self, url: &str, dest: &Path) -> Result<()> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| Error::DownloadFailed {
                url: url.to_string(),
                source: Box::new(e),
            })?;

        if !response.status().is_success() {
            return Err(Error::DownloadFailed {
                url: url.to_string(),
                source: format!("HTTP {}", response.status()).into(),
            });
        }

        let mut file = File::create(dest).await?;
        let mut stream = response.bytes_stream();
        let mut downloaded = 0u64;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| Error::DownloadFailed {
                url: url.to_string(),
                source: Box::new(e),
            })?;
            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;
        }
        file.flush().await?;

        debug!("Saved {} bytes to {}", downloaded, dest.display());
        Ok(())
    }

    /// Move an image into the negative holding area and return its new path.
    pub async fn quarantine(&self, path: &Path) -> Result<PathBuf> {
        let dir = self.root.join(NEGATIVE_DIR);
        tokio::fs::create_dir_all(&dir).await?;

        let file_name = path.file_name().ok_or_else(|| Error::Internal {
            message: format!("not a file path: {}", path.display()),
        })?;
        let dest = dir.join(file_name);
        tokio::fs::rename(path, &dest).await?;

        info!("Moved {} to {}", path.display(), dest.display());
        Ok(dest)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_fetch_downloads_once() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/photo_l.jpg");
                then.status(200).body(b"\xFF\xD8jpeg-bytes");
            })
            .await;

        let dir = TempDir::new().unwrap();
        let cache = ImageCache::new(Client::new(), dir.path());
        let url = server.url("/photo_l.jpg");

        let first = cache.fetch(&url, "Flickr-1").await.unwrap();
        let second = cache.fetch(&url, "Flickr-1").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first, dir.path().join("Flickr-1.jpg"));
        assert_eq!(std::fs::read(&first).unwrap(), b"\xFF\xD8jpeg-bytes");
        mock.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn test_cached_file_needs_no_network() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("Flickr-2.jpg"), b"cached").unwrap();
        let cache = ImageCache::new(Client::new(), dir.path());

        // Port 9 (discard) on localhost: any request would fail.
        let path = cache
            .fetch("http://127.0.0.1:9/never.jpg", "Flickr-2")
            .await
            .unwrap();
        assert_eq!(path, dir.path().join("Flickr-2.jpg"));
    }

    #[tokio::test]
    async fn test_http_error_leaves_no_file() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/gone.jpg");
                then.status(404);
            })
            .await;

        let dir = TempDir::new().unwrap();
        let cache = ImageCache::new(Client::new(), dir.path());
        let err = cache
            .fetch(&server.url("/gone.jpg"), "Flickr-3")
            .await
            .unwrap_err();

        assert!(matches!(err, Error::DownloadFailed { .. }));
        assert!(!cache.path_for("Flickr-3").exists());
        assert!(!dir.path().join("Flickr-3.part").exists());
    }

    #[tokio::test]
    async fn test_quarantine_moves_file() {
        let dir = TempDir::new().unwrap();
        let cache = ImageCache::new(Client::new(), dir.path());
        let original = cache.path_for("Flickr-4");
        std::fs::write(&original, b"x").unwrap();

        let moved = cache.quarantine(&original).await.unwrap();

        assert_eq!(moved, dir.path().join("negative").join("Flickr-4.jpg"));
        assert!(moved.exists());
        assert!(!original.exists());
    }
}
