//! JSON-file-backed document store.

use super::{DocumentStore, Query};
use crate::constants::MAX_BATCH_WRITE;
use crate::error::{Error, Result};
use crate::record::{PhotoRecord, RecordKey, RecordPatch};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

type Records = BTreeMap<String, PhotoRecord>;

/// Document store persisted as one pretty-printed JSON object keyed by
/// `kind/name`.
///
/// Every write rewrites the file through a temporary sibling and a rename,
/// so an interrupted run leaves the previous contents intact.
pub struct JsonStore {
    path: PathBuf,
    records: Mutex<Records>,
}

impl JsonStore {
    /// Open the store at `path`; a missing file is an empty store.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let records = if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            let contents =
                tokio::fs::read_to_string(&path)
                    .await
                    .map_err(|e| Error::StoreRead {
                        path: path.clone(),
                        source: e,
                    })?;
            serde_json::from_str(&contents).map_err(|e| Error::StoreParse {
                path: path.clone(),
                source: e,
            })?
        } else {
            Records::new()
        };
        debug!("Opened store {} with {} records", path.display(), records.len());

        Ok(Self {
            path,
            records: Mutex::new(records),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn flush(&self, records: &Records) -> Result<()> {
        let contents =
            serde_json::to_string_pretty(records).map_err(|e| Error::StoreSerialize { source: e })?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.write_error(e))?;
        }

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, contents)
            .await
            .map_err(|e| self.write_error(e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| self.write_error(e))
    }

    fn write_error(&self, source: std::io::Error) -> Error {
        Error::StoreWrite {
            path: self.path.clone(),
            source,
        }
    }
}

impl DocumentStore for JsonStore {
    async fn get(&self, key: &RecordKey) -> Result<Option<PhotoRecord>> {
        Ok(self.records.lock().await.get(&key.to_string()).cloned())
    }

    async fn get_or_create(&self, record: PhotoRecord) -> Result<(PhotoRecord, bool)> {
        let mut records = self.records.lock().await;
        let id = record.key.to_string();
        if let Some(existing) = records.get(&id) {
            return Ok((existing.clone(), false));
        }
        records.insert(id, record.clone());
        self.flush(&records).await?;
        Ok((record, true))
    }

    async fn put(&self, record: &PhotoRecord) -> Result<()> {
        let mut records = self.records.lock().await;
        records.insert(record.key.to_string(), record.clone());
        self.flush(&records).await
    }

    async fn put_many(&self, batch: &[PhotoRecord]) -> Result<()> {
        let mut records = self.records.lock().await;
        for chunk in batch.chunks(MAX_BATCH_WRITE) {
            debug!("Writing chunk of {} records", chunk.len());
            for record in chunk {
                records.insert(record.key.to_string(), record.clone());
            }
            self.flush(&records).await?;
        }
        Ok(())
    }

    async fn update(&self, key: &RecordKey, patch: &RecordPatch) -> Result<PhotoRecord> {
        let mut records = self.records.lock().await;
        let record = records
            .get_mut(&key.to_string())
            .ok_or_else(|| Error::RecordNotFound {
                key: key.to_string(),
            })?;
        record.apply(patch);
        let updated = record.clone();
        self.flush(&records).await?;
        Ok(updated)
    }

    async fn query(&self, query: &Query) -> Result<Vec<PhotoRecord>> {
        let records = self.records.lock().await;
        Ok(records
            .values()
            .filter(|r| query.matches(r))
            .cloned()
            .collect())
    }
}
