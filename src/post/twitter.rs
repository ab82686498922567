//! Twitter API v2 client.

use super::Poster;
use crate::error::Result;
use crate::http::{read_json, request_error};
use chrono::{DateTime, Utc};
use reqwest::header::DATE;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct Media {
    id: String,
}

#[derive(Debug, Deserialize)]
struct Tweet {
    id: String,
}

#[derive(Serialize)]
struct NewTweet<'a> {
    text: &'a str,
    media: TweetMedia<'a>,
}

#[derive(Serialize)]
struct TweetMedia<'a> {
    media_ids: [&'a str; 1],
}

/// Client posting as the user owning an OAuth 2.0 access token.
pub struct TwitterClient {
    http: Client,
    base_url: String,
    token: String,
}

impl TwitterClient {
    /// Create a client for `base_url` (e.g. `https://api.x.com`).
    pub fn new(http: Client, base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }
}

/// Server time from the `Date` header, or local time if absent.
fn server_time(response: &Response) -> DateTime<Utc> {
    response
        .headers()
        .get(DATE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| DateTime::parse_from_rfc2822(v).ok())
        .map_or_else(Utc::now, |t| t.with_timezone(&Utc))
}

impl Poster for TwitterClient {
    async fn upload_media(&self, image: Vec<u8>, file_name: &str) -> Result<String> {
        let endpoint = format!("{}/2/media/upload", self.base_url);
        let part = Part::bytes(image)
            .file_name(file_name.to_string())
            .mime_str("image/jpeg")
            .map_err(request_error(&endpoint))?;
        let form = Form::new()
            .text("media_category", "tweet_image")
            .part("media", part);

        let response = self
            .http
            .post(&endpoint)
            .bearer_auth(&self.token)
            .multipart(form)
            .send()
            .await
            .map_err(request_error(&endpoint))?;

        let media: Envelope<Media> = read_json(&endpoint, response).await?;
        debug!("Uploaded media {}", media.data.id);
        Ok(media.data.id)
    }

    async fn publish(&self, text: &str, media_id: &str) -> Result<DateTime<Utc>> {
        let endpoint = format!("{}/2/tweets", self.base_url);
        let body = NewTweet {
            text,
            media: TweetMedia {
                media_ids: [media_id],
            },
        };

        let response = self
            .http
            .post(&endpoint)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .map_err(request_error(&endpoint))?;

        let posted_at = server_time(&response);
        let tweet: Envelope<Tweet> = read_json(&endpoint, response).await?;
        debug!("Published tweet {} at {}", tweet.data.id, posted_at);
        Ok(posted_at)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::Error;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_upload_then_publish() {
        let server = MockServer::start_async().await;
        let upload = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/2/media/upload")
                    .header("authorization", "Bearer tok")
                    .body_contains("tweet_image");
                then.status(200)
                    .json_body(json!({"data": {"id": "710511363345354753", "media_key": "3_1"}}));
            })
            .await;
        let tweet = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/2/tweets")
                    .header("authorization", "Bearer tok")
                    .json_body(json!({
                        "text": "Chick by Jane https://flic.kr/p/2 #birbybot",
                        "media": {"media_ids": ["710511363345354753"]}
                    }));
                then.status(201)
                    .header("date", "Thu, 01 Mar 2018 12:00:00 GMT")
                    .json_body(json!({"data": {"id": "1", "text": "Chick"}}));
            })
            .await;

        let client = TwitterClient::new(Client::new(), server.base_url(), "tok");
        let posted_at = client
            .post_photo(
                "Chick by Jane https://flic.kr/p/2 #birbybot",
                b"\xFF\xD8".to_vec(),
                "Flickr-2.jpg",
            )
            .await
            .unwrap();

        upload.assert_async().await;
        tweet.assert_async().await;
        assert_eq!(posted_at.to_rfc3339(), "2018-03-01T12:00:00+00:00");
    }

    #[tokio::test]
    async fn test_rejected_upload_is_status_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/2/media/upload");
                then.status(401).body("Unauthorized");
            })
            .await;

        let client = TwitterClient::new(Client::new(), server.base_url(), "expired");
        let err = client
            .upload_media(b"x".to_vec(), "x.jpg")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::HttpStatus { status: 401, .. }));
    }
}
