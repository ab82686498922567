//! Cloud Vision `images:annotate` JSON shapes.

use super::{Annotations, Feature, NormalizedVertex, ObjectAnnotation};
use crate::record::{Likelihood, SafetyScores};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(super) struct BatchRequest<'a> {
    pub requests: [ImageRequest<'a>; 1],
}

#[derive(Debug, Serialize)]
pub(super) struct ImageRequest<'a> {
    pub image: ImageContent,
    pub features: Vec<FeatureRequest<'a>>,
}

#[derive(Debug, Serialize)]
pub(super) struct ImageContent {
    /// Base64-encoded image bytes.
    pub content: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct FeatureRequest<'a> {
    #[serde(rename = "type")]
    pub kind: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
}

impl FeatureRequest<'_> {
    pub const fn new(feature: Feature, max_results: u32) -> Self {
        let kind = match feature {
            Feature::Labels => "LABEL_DETECTION",
            Feature::Objects => "OBJECT_LOCALIZATION",
            Feature::SafeSearch => "SAFE_SEARCH_DETECTION",
        };
        let max_results = match feature {
            Feature::SafeSearch => None,
            Feature::Labels | Feature::Objects => Some(max_results),
        };
        Self { kind, max_results }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct BatchResponse {
    #[serde(default)]
    pub responses: Vec<ImageResponse>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(super) struct ImageResponse {
    pub label_annotations: Vec<EntityAnnotation>,
    pub localized_object_annotations: Vec<LocalizedObject>,
    pub safe_search_annotation: Option<SafeSearch>,
    pub error: Option<Status>,
}

#[derive(Debug, Deserialize)]
pub(super) struct EntityAnnotation {
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct LocalizedObject {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub score: f32,
    #[serde(default)]
    pub bounding_poly: BoundingPoly,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(super) struct BoundingPoly {
    pub normalized_vertices: Vec<Vertex>,
}

/// Zero coordinates are omitted from the JSON, hence the defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct Vertex {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct SafeSearch {
    pub adult: Likelihood,
    pub spoof: Likelihood,
    pub medical: Likelihood,
    pub violence: Likelihood,
    pub racy: Likelihood,
}

#[derive(Debug, Deserialize)]
pub(super) struct Status {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

impl From<ImageResponse> for Annotations {
    fn from(response: ImageResponse) -> Self {
        let labels = response
            .label_annotations
            .into_iter()
            .map(|a| a.description)
            .filter(|d| !d.is_empty())
            .collect();

        let objects = response
            .localized_object_annotations
            .into_iter()
            .map(|o| ObjectAnnotation {
                name: o.name.to_lowercase(),
                score: o.score,
                vertices: o
                    .bounding_poly
                    .normalized_vertices
                    .into_iter()
                    .map(|v| NormalizedVertex { x: v.x, y: v.y })
                    .collect(),
            })
            .collect();

        let safety = response.safe_search_annotation.map(|s| SafetyScores {
            adult: s.adult,
            medical: s.medical,
            spoofed: s.spoof,
            violence: s.violence,
            racy: s.racy,
        });

        Self {
            labels,
            objects,
            safety,
        }
    }
}
