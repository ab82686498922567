//! Image detection collaborator.
//!
//! [`Detector`] is the seam the classifier depends on; [`VisionClient`]
//! implements it against the Google Cloud Vision REST API.

mod client;
mod wire;

pub use client::VisionClient;

use crate::error::Result;
use crate::record::SafetyScores;

/// Detection features that can be requested together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    /// Whole-image label detection.
    Labels,
    /// Object localization.
    Objects,
    /// Safe-search scoring.
    SafeSearch,
}

/// A point in normalized image coordinates (0.0 to 1.0).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NormalizedVertex {
    /// Horizontal position.
    pub x: f32,
    /// Vertical position.
    pub y: f32,
}

/// A localized object.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectAnnotation {
    /// Object name, lower-cased.
    pub name: String,
    /// Detection confidence.
    pub score: f32,
    /// Bounding polygon, clockwise from the top-left corner.
    pub vertices: Vec<NormalizedVertex>,
}

/// Results of one annotate request.
///
/// Empty lists mean the detector found nothing; that is a valid outcome,
/// not an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Annotations {
    /// Label descriptions.
    pub labels: Vec<String>,
    /// Localized objects.
    pub objects: Vec<ObjectAnnotation>,
    /// Safe-search scores, when requested and returned.
    pub safety: Option<SafetyScores>,
}

/// Image detection service.
#[allow(async_fn_in_trait)]
pub trait Detector {
    /// Run the requested features on raw image bytes.
    async fn annotate(&self, image: &[u8], features: &[Feature]) -> Result<Annotations>;

    /// Label detection only.
    async fn detect_labels(&self, image: &[u8]) -> Result<Vec<String>> {
        Ok(self.annotate(image, &[Feature::Labels]).await?.labels)
    }

    /// Object localization only.
    async fn localize_objects(&self, image: &[u8]) -> Result<Vec<ObjectAnnotation>> {
        Ok(self.annotate(image, &[Feature::Objects]).await?.objects)
    }

    /// Safe-search scoring only.
    async fn safe_search(&self, image: &[u8]) -> Result<Option<SafetyScores>> {
        Ok(self.annotate(image, &[Feature::SafeSearch]).await?.safety)
    }
}
