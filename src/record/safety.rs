//! Safe-search likelihood scores and the safety gate.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Likelihood that an image belongs to a safe-search category.
///
/// Variants are ordered from least to most severe.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Likelihood {
    /// No score available.
    #[default]
    Unknown,
    /// Very unlikely.
    VeryUnlikely,
    /// Unlikely.
    Unlikely,
    /// Possible.
    Possible,
    /// Likely.
    Likely,
    /// Very likely.
    VeryLikely,
}

impl Likelihood {
    /// All levels, least severe first.
    pub const ALL: [Self; 6] = [
        Self::Unknown,
        Self::VeryUnlikely,
        Self::Unlikely,
        Self::Possible,
        Self::Likely,
        Self::VeryLikely,
    ];

    /// Whether this level disqualifies an image from being used.
    pub const fn is_flagged(self) -> bool {
        matches!(self, Self::Likely | Self::VeryLikely)
    }

    /// Wire name as used by the Vision API.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::VeryUnlikely => "VERY_UNLIKELY",
            Self::Unlikely => "UNLIKELY",
            Self::Possible => "POSSIBLE",
            Self::Likely => "LIKELY",
            Self::VeryLikely => "VERY_LIKELY",
        }
    }
}

impl fmt::Display for Likelihood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Likelihood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|l| l.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown likelihood: {s}"))
    }
}

/// Safe-search category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SafetyCategory {
    /// Adult content.
    Adult,
    /// Medical imagery.
    Medical,
    /// Spoofed or altered imagery.
    Spoofed,
    /// Violent content.
    Violence,
    /// Racy content.
    Racy,
}

impl SafetyCategory {
    /// Every category, in a fixed order.
    pub const ALL: [Self; 5] = [
        Self::Adult,
        Self::Medical,
        Self::Spoofed,
        Self::Violence,
        Self::Racy,
    ];
}

impl fmt::Display for SafetyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Adult => "adult",
            Self::Medical => "medical",
            Self::Spoofed => "spoofed",
            Self::Violence => "violence",
            Self::Racy => "racy",
        };
        f.write_str(name)
    }
}

/// One likelihood per safe-search category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyScores {
    /// Adult content likelihood.
    pub adult: Likelihood,
    /// Medical imagery likelihood.
    pub medical: Likelihood,
    /// Spoof likelihood.
    pub spoofed: Likelihood,
    /// Violence likelihood.
    pub violence: Likelihood,
    /// Racy content likelihood.
    pub racy: Likelihood,
}

impl SafetyScores {
    /// Score for a single category.
    pub const fn get(&self, category: SafetyCategory) -> Likelihood {
        match category {
            SafetyCategory::Adult => self.adult,
            SafetyCategory::Medical => self.medical,
            SafetyCategory::Spoofed => self.spoofed,
            SafetyCategory::Violence => self.violence,
            SafetyCategory::Racy => self.racy,
        }
    }

    /// Iterate `(category, likelihood)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (SafetyCategory, Likelihood)> + '_ {
        SafetyCategory::ALL.into_iter().map(|c| (c, self.get(c)))
    }

    /// Categories scored likely or very likely.
    pub fn flagged(&self) -> Vec<SafetyCategory> {
        self.iter()
            .filter(|(_, l)| l.is_flagged())
            .map(|(c, _)| c)
            .collect()
    }
}

/// Returns `true` if no category is scored likely or very likely.
///
/// `Possible` and below are acceptable.
pub fn is_safe(scores: &SafetyScores) -> bool {
    scores.iter().all(|(_, likelihood)| !likelihood.is_flagged())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(
        adult: Likelihood,
        medical: Likelihood,
        spoofed: Likelihood,
        violence: Likelihood,
        racy: Likelihood,
    ) -> SafetyScores {
        SafetyScores {
            adult,
            medical,
            spoofed,
            violence,
            racy,
        }
    }

    #[test]
    fn test_is_safe_with_possible_spoof() {
        use Likelihood::{Possible, Unlikely, VeryUnlikely};
        let s = scores(VeryUnlikely, Unlikely, Possible, VeryUnlikely, VeryUnlikely);
        assert!(is_safe(&s));
    }

    #[test]
    fn test_is_not_safe_with_likely_violence() {
        use Likelihood::{Likely, Possible, Unlikely, VeryLikely, VeryUnlikely};
        let s = scores(VeryUnlikely, Unlikely, Possible, Likely, VeryLikely);
        assert!(!is_safe(&s));
        assert_eq!(
            s.flagged(),
            vec![SafetyCategory::Violence, SafetyCategory::Racy]
        );
    }

    #[test]
    fn test_all_possible_is_safe() {
        let p = Likelihood::Possible;
        assert!(is_safe(&scores(p, p, p, p, p)));
    }

    #[test]
    fn test_gate_matches_flagged_levels_for_every_mapping() {
        // 6^5 mappings: cheap enough to check exhaustively.
        for a in Likelihood::ALL {
            for m in Likelihood::ALL {
                for s in Likelihood::ALL {
                    for v in Likelihood::ALL {
                        for r in Likelihood::ALL {
                            let mapping = scores(a, m, s, v, r);
                            let any_flagged = [a, m, s, v, r]
                                .iter()
                                .any(|l| matches!(l, Likelihood::Likely | Likelihood::VeryLikely));
                            assert_eq!(is_safe(&mapping), !any_flagged, "{mapping:?}");
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_likelihood_is_ordered() {
        assert!(Likelihood::Unknown < Likelihood::VeryUnlikely);
        assert!(Likelihood::Possible < Likelihood::Likely);
        assert!(Likelihood::Likely < Likelihood::VeryLikely);
    }

    #[test]
    fn test_likelihood_from_wire_name() {
        assert_eq!(
            "VERY_LIKELY".parse::<Likelihood>().ok(),
            Some(Likelihood::VeryLikely)
        );
        assert_eq!(
            "possible".parse::<Likelihood>().ok(),
            Some(Likelihood::Possible)
        );
        assert!("MAYBE".parse::<Likelihood>().is_err());
    }

    #[test]
    fn test_likelihood_serde_uses_wire_names() {
        let json = serde_json::to_string(&Likelihood::VeryUnlikely).unwrap_or_default();
        assert_eq!(json, "\"VERY_UNLIKELY\"");
    }
}
