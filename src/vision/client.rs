//! Google Cloud Vision REST client.

use super::wire::{BatchRequest, BatchResponse, FeatureRequest, ImageContent, ImageRequest};
use super::{Annotations, Detector, Feature};
use crate::error::{Error, Result};
use crate::http::{read_json, request_error};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Client;
use tracing::debug;

/// Labels and objects requested per feature.
const MAX_RESULTS: u32 = 50;

/// Cloud Vision client authenticated with an API key.
pub struct VisionClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl VisionClient {
    /// Create a client for `base_url` (e.g. `https://vision.googleapis.com`).
    pub fn new(http: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/images:annotate", self.base_url)
    }
}

impl Detector for VisionClient {
    async fn annotate(&self, image: &[u8], features: &[Feature]) -> Result<Annotations> {
        let endpoint = self.endpoint();
        let body = BatchRequest {
            requests: [ImageRequest {
                image: ImageContent {
                    content: STANDARD.encode(image),
                },
                features: features
                    .iter()
                    .map(|f| FeatureRequest::new(*f, MAX_RESULTS))
                    .collect(),
            }],
        };

        debug!(
            "Requesting {:?} for {} byte image",
            features,
            image.len()
        );
        let response = self
            .http
            .post(&endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(request_error(&endpoint))?;

        let batch: BatchResponse = read_json(&endpoint, response).await?;
        let response = batch.responses.into_iter().next().unwrap_or_default();

        if let Some(status) = &response.error
            && status.code != 0
        {
            return Err(Error::Api {
                service: "Vision",
                message: format!("{} (code {})", status.message, status.code),
            });
        }

        let annotations = Annotations::from(response);
        debug!(
            "Vision returned {} labels, {} objects",
            annotations.labels.len(),
            annotations.objects.len()
        );
        Ok(annotations)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::record::Likelihood;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client(server: &MockServer) -> VisionClient {
        VisionClient::new(Client::new(), server.base_url(), "test-key")
    }

    #[tokio::test]
    async fn test_annotate_parses_labels_objects_and_safety() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/images:annotate")
                    .query_param("key", "test-key")
                    .body_contains("LABEL_DETECTION")
                    .body_contains("OBJECT_LOCALIZATION");
                then.status(200).json_body(json!({
                    "responses": [{
                        "labelAnnotations": [
                            {"description": "Bird", "score": 0.97},
                            {"description": "Beak", "score": 0.91}
                        ],
                        "localizedObjectAnnotations": [{
                            "name": "Bird",
                            "score": 0.88,
                            "boundingPoly": {"normalizedVertices": [
                                {"y": 0.1},
                                {"x": 0.5, "y": 0.1},
                                {"x": 0.5, "y": 0.6},
                                {"y": 0.6}
                            ]}
                        }],
                        "safeSearchAnnotation": {
                            "adult": "VERY_UNLIKELY",
                            "spoof": "POSSIBLE",
                            "medical": "UNLIKELY",
                            "violence": "VERY_UNLIKELY",
                            "racy": "VERY_UNLIKELY"
                        }
                    }]
                }));
            })
            .await;

        let annotations = client(&server)
            .annotate(
                b"jpeg",
                &[Feature::Labels, Feature::Objects, Feature::SafeSearch],
            )
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(annotations.labels, vec!["Bird", "Beak"]);
        assert_eq!(annotations.objects.len(), 1);
        assert_eq!(annotations.objects[0].name, "bird");
        assert_eq!(annotations.objects[0].vertices[0].x, 0.0);
        assert_eq!(annotations.objects[0].vertices[2].y, 0.6);
        let safety = annotations.safety.unwrap();
        assert_eq!(safety.spoofed, Likelihood::Possible);
    }

    #[tokio::test]
    async fn test_empty_response_is_not_an_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/images:annotate");
                then.status(200).json_body(json!({"responses": [{}]}));
            })
            .await;

        let vision = client(&server);
        assert!(vision.detect_labels(b"jpeg").await.unwrap().is_empty());
        assert!(vision.localize_objects(b"jpeg").await.unwrap().is_empty());
        assert!(vision.safe_search(b"jpeg").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_per_image_error_is_reported() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/images:annotate");
                then.status(200).json_body(json!({
                    "responses": [{"error": {"code": 3, "message": "Bad image data."}}]
                }));
            })
            .await;

        let err = client(&server).detect_labels(b"nope").await.unwrap_err();
        assert!(matches!(err, Error::Api { service: "Vision", .. }));
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/images:annotate");
                then.status(403).body("API key not valid");
            })
            .await;

        let err = client(&server).safe_search(b"jpeg").await.unwrap_err();
        assert!(matches!(err, Error::HttpStatus { status: 403, .. }));
    }
}
