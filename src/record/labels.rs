//! Label sets and label list truncation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Deduplicated set of lower-cased labels.
///
/// Iteration order is lexicographic so persisted label lists are stable
/// between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelSet(BTreeSet<String>);

impl LabelSet {
    /// Create an empty label set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a label, lower-casing it. Returns `true` if it was new.
    pub fn insert(&mut self, label: impl AsRef<str>) -> bool {
        let label = label.as_ref().trim();
        if label.is_empty() {
            return false;
        }
        self.0.insert(label.to_lowercase())
    }

    /// Whether the set holds `label` (case-insensitive).
    pub fn contains(&self, label: &str) -> bool {
        self.0.contains(&label.to_lowercase())
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate labels in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for LabelSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<S: AsRef<str>> Extend<S> for LabelSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for label in iter {
            self.insert(label);
        }
    }
}

/// Keep the longest prefix of whole labels whose JSON array encoding fits
/// in `byte_budget` bytes.
///
/// Labels are never split. A budget smaller than the empty array `[]`
/// yields an empty list.
pub fn truncate_labels<'a>(
    labels: impl IntoIterator<Item = &'a str>,
    byte_budget: usize,
) -> Vec<String> {
    const BRACKETS: usize = 2;

    let mut kept = Vec::new();
    let mut used = BRACKETS;
    for label in labels {
        // Encoded length includes quotes and escapes.
        let encoded = serde_json::to_string(label).map_or(usize::MAX, |s| s.len());
        let separator = usize::from(!kept.is_empty());
        let needed = used.saturating_add(separator).saturating_add(encoded);
        if needed > byte_budget {
            break;
        }
        used = needed;
        kept.push(label.to_string());
    }
    kept
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_lowercases_and_dedups() {
        let mut set = LabelSet::new();
        assert!(set.insert("Bird"));
        assert!(!set.insert("bird"));
        assert!(!set.insert("BIRD"));
        assert_eq!(set.len(), 1);
        assert!(set.contains("Bird"));
    }

    #[test]
    fn test_blank_labels_are_ignored() {
        let set: LabelSet = ["", "  ", "wing"].into_iter().collect();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["wing"]);
    }

    #[test]
    fn test_iteration_is_sorted() {
        let set: LabelSet = ["tree", "Animal", "sky"].into_iter().collect();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["animal", "sky", "tree"]);
    }

    #[test]
    fn test_truncate_keeps_everything_under_budget() {
        let labels = ["bird", "beak", "sand"];
        let kept = truncate_labels(labels, 1500);
        assert_eq!(kept, vec!["bird", "beak", "sand"]);
    }

    #[test]
    fn test_truncate_result_fits_budget_exactly() {
        // ["bird","beak"] is 15 bytes
        let labels = ["bird", "beak", "sand"];
        let kept = truncate_labels(labels, 15);
        assert_eq!(kept, vec!["bird", "beak"]);
        assert_eq!(serde_json::to_string(&kept).unwrap().len(), 15);

        let kept = truncate_labels(labels, 14);
        assert_eq!(kept, vec!["bird"]);
    }

    #[test]
    fn test_truncate_counts_escapes() {
        // "a\"b" encodes to 6 bytes, array to 8.
        let kept = truncate_labels(["a\"b"], 7);
        assert!(kept.is_empty());
        let kept = truncate_labels(["a\"b"], 8);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_truncate_tiny_budget() {
        assert!(truncate_labels(["bird"], 0).is_empty());
        assert!(truncate_labels(["bird"], 2).is_empty());
    }

    #[test]
    fn test_truncate_large_label_set_stays_under_limit() {
        let labels: Vec<String> = (0..500).map(|i| format!("label number {i}")).collect();
        let kept = truncate_labels(labels.iter().map(String::as_str), 1500);
        assert!(!kept.is_empty());
        assert!(kept.len() < labels.len());
        assert!(serde_json::to_string(&kept).unwrap().len() <= 1500);
    }
}
