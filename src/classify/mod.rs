//! Image classification.

mod crop;
mod decision;
mod runner;

pub use crop::{CropBox, CropSource};
pub use decision::{Decision, LocalizedObject, Observation, TargetTerms, decide, is_match};
pub use runner::{ClassifySettings, ClassifySummary, classify_pending, classify_record};
