//! Target matching and the multi-pass classification decision.
//!
//! Pass one unions whole-image labels with localized object names. If no
//! target term is present, each object region is cropped and sent back to
//! the label detector until a target shows up or the regions run out.

use super::crop::{CropBox, CropSource};
use crate::record::LabelSet;
use crate::vision::Detector;
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, warn};

/// Category words whose presence in a label set is a positive match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetTerms(BTreeSet<String>);

impl TargetTerms {
    /// Build from terms, lower-cased; blank terms are dropped.
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            terms
                .into_iter()
                .map(|t| t.as_ref().trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
        )
    }

    /// Whether no terms are configured.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate terms.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Exact, case-insensitive membership of any target term in `labels`.
///
/// `"blackbird"` does not match `"bird"`.
pub fn is_match(labels: &LabelSet, targets: &TargetTerms) -> bool {
    targets.iter().any(|t| labels.contains(t))
}

/// An object found by localization.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalizedObject {
    /// Object name.
    pub name: String,
    /// Detection confidence.
    pub score: f32,
    /// Pixel region, if the polygon had area.
    pub crop: Option<CropBox>,
}

/// What the first detection pass saw.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Observation {
    /// Whole-image labels.
    pub labels: Vec<String>,
    /// Localized objects.
    pub objects: Vec<LocalizedObject>,
}

impl Observation {
    /// Distinct crop boxes in the order they are tried.
    ///
    /// Highest detection score first; ties go top to bottom, then left to
    /// right.
    pub fn crop_order(&self) -> Vec<CropBox> {
        let mut candidates: Vec<(f32, CropBox)> = self
            .objects
            .iter()
            .filter_map(|o| o.crop.map(|c| (o.score, c)))
            .collect();
        candidates.sort_by(|(sa, a), (sb, b)| {
            sb.total_cmp(sa)
                .then(a.upper().cmp(&b.upper()))
                .then(a.left().cmp(&b.left()))
        });

        let mut seen = HashSet::new();
        candidates
            .into_iter()
            .map(|(_, c)| c)
            .filter(|c| seen.insert(*c))
            .collect()
    }
}

/// Outcome of a classification pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    /// Whether a target term was found.
    pub is_target: bool,
    /// Every label gathered, including from crops.
    pub labels: LabelSet,
    /// Crop label requests made.
    pub crops_tried: usize,
    /// Crop requests that failed and were skipped.
    pub crops_failed: usize,
}

/// Decide whether an image shows a target.
///
/// Crop failures (encoding or detector errors) are logged and that crop is
/// skipped; they never fail the decision.
pub async fn decide<D, C>(
    detector: &D,
    source: &C,
    observation: &Observation,
    targets: &TargetTerms,
) -> Decision
where
    D: Detector,
    C: CropSource,
{
    let mut labels: LabelSet = observation.labels.iter().collect();
    labels.extend(observation.objects.iter().map(|o| o.name.as_str()));

    let mut decision = Decision {
        is_target: is_match(&labels, targets),
        labels,
        crops_tried: 0,
        crops_failed: 0,
    };
    if decision.is_target {
        return decision;
    }

    let crops = observation.crop_order();
    if crops.is_empty() {
        return decision;
    }

    debug!("No target in first pass, trying {} crop(s)", crops.len());
    for crop in crops {
        let bytes = match source.encode_crop(crop) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Skipping crop {:?}: {}", crop, e);
                decision.crops_failed += 1;
                continue;
            }
        };

        decision.crops_tried += 1;
        match detector.detect_labels(&bytes).await {
            Ok(found) => {
                debug!("Crop {:?} labels: {:?}", crop, found);
                decision.labels.extend(found);
            }
            Err(e) => {
                warn!("Label detection failed for crop {:?}: {}", crop, e);
                decision.crops_failed += 1;
                continue;
            }
        }

        if is_match(&decision.labels, targets) {
            decision.is_target = true;
            break;
        }
    }

    decision
}
