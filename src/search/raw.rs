//! Loosely-typed search results and their validation into records.

use crate::constants::search::SOURCE;
use crate::error::{Error, Result};
use crate::record::{PhotoRecord, RecordKey, ResolutionUrls, pick_url};
use chrono::DateTime;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// One photo as returned by `flickr.photos.search`.
///
/// Flickr sends most scalars as strings but is not consistent about it, so
/// scalar fields are kept as raw JSON until validated.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawPhoto {
    /// Photo id.
    #[serde(default)]
    pub id: Option<Value>,
    /// Title; may be empty.
    #[serde(default)]
    pub title: Option<String>,
    /// Owner display name.
    #[serde(default)]
    pub ownername: Option<String>,
    /// License id.
    #[serde(default)]
    pub license: Option<Value>,
    /// Upload time in unix seconds.
    #[serde(default)]
    pub dateupload: Option<Value>,
    /// Large image URL.
    #[serde(default)]
    pub url_l: Option<String>,
    /// Medium 800 image URL.
    #[serde(default)]
    pub url_c: Option<String>,
    /// Medium 640 image URL.
    #[serde(default)]
    pub url_z: Option<String>,
    /// Original image URL.
    #[serde(default)]
    pub url_o: Option<String>,
    /// Everything else (`secret`, `server`, `farm`, sizes, ...).
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

fn scalar(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl RawPhoto {
    /// Photo id as a string, if present.
    pub fn id(&self) -> Option<String> {
        scalar(self.id.as_ref())
    }

    /// Validate into a fresh, unclassified record found by `search_terms`.
    pub fn into_record(self, search_terms: &str) -> Result<PhotoRecord> {
        let id = self.id().ok_or_else(|| Error::InvalidRecord {
            id: "<missing>".to_string(),
            reason: "no photo id".to_string(),
        })?;

        let uploaded_at = scalar(self.dateupload.as_ref())
            .and_then(|s| s.parse::<i64>().ok())
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .ok_or_else(|| Error::InvalidRecord {
                id: id.clone(),
                reason: format!("bad dateupload {:?}", self.dateupload),
            })?;

        let urls = ResolutionUrls {
            large: self.url_l,
            medium_large: self.url_c,
            medium: self.url_z,
            original: self.url_o,
        };
        let download_url = pick_url(&id, &urls)?;

        Ok(PhotoRecord {
            key: RecordKey::photo(format!("{SOURCE}-{id}")),
            source: SOURCE.to_string(),
            source_id: id,
            search_terms: search_terms.to_string(),
            title: self.title.unwrap_or_default(),
            owner_name: self.ownername.unwrap_or_default(),
            license: scalar(self.license.as_ref()),
            urls,
            uploaded_at,
            download_url,
            is_classified: false,
            is_target: None,
            labels: Vec::new(),
            safety: None,
            last_posted: PhotoRecord::never_posted(),
            extra: self.extra,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawPhoto {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_valid_photo_becomes_record() {
        let photo = raw(json!({
            "id": "36092472285",
            "owner": "1234@N05",
            "secret": "abc",
            "title": "Snowy plover chick",
            "license": "4",
            "dateupload": "1519862400",
            "ownername": "Jane",
            "url_z": "https://live.staticflickr.com/z.jpg",
            "url_c": "https://live.staticflickr.com/c.jpg",
            "height_c": 533
        }));

        let record = photo.into_record("plover chick").unwrap();

        assert_eq!(record.key, RecordKey::photo("Flickr-36092472285"));
        assert_eq!(record.source, "Flickr");
        assert_eq!(record.source_id, "36092472285");
        assert_eq!(record.license.as_deref(), Some("4"));
        assert_eq!(record.uploaded_at.timestamp(), 1_519_862_400);
        assert_eq!(record.download_url, "https://live.staticflickr.com/c.jpg");
        assert!(!record.is_classified);
        assert_eq!(record.is_target, None);
        assert_eq!(record.last_posted, PhotoRecord::never_posted());
        assert_eq!(record.extra.get("secret"), Some(&json!("abc")));
        assert_eq!(record.extra.get("height_c"), Some(&json!(533)));
    }

    #[test]
    fn test_numeric_scalars_are_accepted() {
        let photo = raw(json!({
            "id": 42,
            "license": 9,
            "dateupload": 1_519_862_400,
            "url_o": "https://example.com/o.jpg"
        }));
        let record = photo.into_record("x").unwrap();
        assert_eq!(record.source_id, "42");
        assert_eq!(record.license.as_deref(), Some("9"));
        assert_eq!(record.title, "");
    }

    #[test]
    fn test_missing_id_is_rejected() {
        let photo = raw(json!({"dateupload": "1", "url_l": "u"}));
        assert!(matches!(
            photo.into_record("x"),
            Err(Error::InvalidRecord { .. })
        ));
    }

    #[test]
    fn test_bad_upload_date_is_rejected() {
        let photo = raw(json!({"id": "1", "dateupload": "yesterday", "url_l": "u"}));
        assert!(matches!(
            photo.into_record("x"),
            Err(Error::InvalidRecord { .. })
        ));
    }

    #[test]
    fn test_no_urls_is_rejected() {
        let photo = raw(json!({"id": "1", "dateupload": "1", "url_l": ""}));
        assert!(matches!(
            photo.into_record("x"),
            Err(Error::NoResolutionUrl { .. })
        ));
    }
}
