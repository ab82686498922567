//! Shared HTTP client construction and response handling.

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Longest response body echoed back in error messages.
const MAX_ERROR_BODY: usize = 512;

/// Build the HTTP client shared by every collaborator in a run.
pub fn build_client(api: &ApiConfig) -> Result<Client> {
    Client::builder()
        .connect_timeout(Duration::from_secs(api.connect_timeout_secs))
        .timeout(Duration::from_secs(api.request_timeout_secs))
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| Error::HttpClient {
            reason: e.to_string(),
        })
}

/// Turn a non-success status into [`Error::HttpStatus`].
pub async fn ensure_success(endpoint: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let mut body = response.text().await.unwrap_or_default();
    if body.len() > MAX_ERROR_BODY {
        let cut = (0..=MAX_ERROR_BODY)
            .rev()
            .find(|&i| body.is_char_boundary(i))
            .unwrap_or(0);
        body.truncate(cut);
    }

    Err(Error::HttpStatus {
        endpoint: endpoint.to_string(),
        status: status.as_u16(),
        body,
    })
}

/// Check the status, then decode a JSON body.
pub async fn read_json<T: DeserializeOwned>(endpoint: &str, response: Response) -> Result<T> {
    let response = ensure_success(endpoint, response).await?;
    let text = response.text().await.map_err(|e| Error::Request {
        endpoint: endpoint.to_string(),
        source: e,
    })?;
    serde_json::from_str(&text).map_err(|e| Error::ResponseParse {
        endpoint: endpoint.to_string(),
        source: e,
    })
}

/// Map a transport error for `endpoint`.
pub fn request_error(endpoint: &str) -> impl FnOnce(reqwest::Error) -> Error + '_ {
    move |e| Error::Request {
        endpoint: endpoint.to_string(),
        source: e,
    }
}
