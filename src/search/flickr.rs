//! Flickr REST search client.

use super::raw::RawPhoto;
use super::{PhotoSearch, SearchPage, SearchParams};
use crate::constants::search::EXTRAS;
use crate::error::{Error, Result};
use crate::http::{read_json, request_error};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct Envelope {
    stat: String,
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    photos: Option<Photos>,
}

#[derive(Debug, Deserialize)]
struct Photos {
    page: u32,
    pages: u32,
    #[serde(default)]
    photo: Vec<RawPhoto>,
}

/// Flickr API client authenticated with an API key.
pub struct FlickrClient {
    http: Client,
    endpoint: String,
    api_key: String,
}

impl FlickrClient {
    /// Create a client for the REST `endpoint`.
    pub fn new(http: Client, endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }
}

impl PhotoSearch for FlickrClient {
    async fn search_page(&self, params: &SearchParams, page: u32) -> Result<SearchPage> {
        let per_page = params.per_page.to_string();
        let page_str = page.to_string();
        let min_upload = params.min_upload_date.timestamp().to_string();
        let query = [
            ("method", "flickr.photos.search"),
            ("api_key", self.api_key.as_str()),
            ("text", params.text.as_str()),
            ("license", params.licenses.as_str()),
            ("media", "photos"),
            ("content_type", "1"),
            ("safe_search", "1"),
            ("extras", EXTRAS),
            ("sort", params.sort.as_str()),
            ("per_page", per_page.as_str()),
            ("page", page_str.as_str()),
            ("min_upload_date", min_upload.as_str()),
            ("format", "json"),
            ("nojsoncallback", "1"),
        ];

        debug!("Searching '{}' page {}", params.text, page);
        let response = self
            .http
            .get(&self.endpoint)
            .query(&query)
            .send()
            .await
            .map_err(request_error(&self.endpoint))?;

        let envelope: Envelope = read_json(&self.endpoint, response).await?;
        if envelope.stat != "ok" {
            return Err(Error::Api {
                service: "Flickr",
                message: format!(
                    "{} (code {})",
                    envelope.message.unwrap_or_default(),
                    envelope.code.unwrap_or_default()
                ),
            });
        }

        let photos = envelope.photos.ok_or_else(|| Error::Api {
            service: "Flickr",
            message: "response has no photos".to_string(),
        })?;
        Ok(SearchPage {
            page: photos.page,
            pages: photos.pages,
            photos: photos.photo,
        })
    }
}
