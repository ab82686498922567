//! Photo records and the values attached to them.

mod labels;
mod resolution;
mod safety;
mod types;

pub use labels::{LabelSet, truncate_labels};
pub use resolution::pick_url;
pub use safety::{Likelihood, SafetyCategory, SafetyScores, is_safe};
pub use types::{PhotoRecord, RecordKey, RecordPatch, ResolutionUrls};
