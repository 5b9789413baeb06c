//! Similarity metrics for fuzzy text comparison.
//!
//! This module provides four independent, pure similarity measures and a
//! selector that picks one of them based on input length:
//!
//! - [`levenshtein`]: Bounded edit distance and threshold-aware similarity
//! - [`jaro`]: Jaro-Winkler similarity for short strings and typos
//! - [`ngram`]: Cosine similarity over n-gram frequency vectors
//! - [`hash_jaccard`]: Jaccard similarity over rolling-hash chunk fingerprints
//! - [`selector`]: Length-ratio fast reject plus size-tiered dispatch
//!
//! All lengths are measured in Unicode scalar values (`char`s), never bytes.
//!
//! # Example
//!
//! ```
//! use promptdupe::similarity::{smart_similarity, SimilarityScore};
//!
//! assert_eq!(smart_similarity("hello", "hello", 0.9), SimilarityScore::Score(1.0));
//! assert_eq!(
//!     smart_similarity("hi", "a much longer string", 0.9),
//!     SimilarityScore::BelowThreshold
//! );
//! ```

pub mod hash_jaccard;
pub mod jaro;
pub mod levenshtein;
pub mod ngram;
pub mod selector;

use serde::Serialize;

pub use hash_jaccard::hash_jaccard;
pub use jaro::jaro_winkler;
pub use levenshtein::{bounded_levenshtein, threshold_similarity};
pub use ngram::cosine_ngram;
pub use selector::{smart_similarity, smart_similarity_with, Metric, Metrics, StandardMetrics};

/// Default threshold used by [`smart_similarity`] callers that have no opinion.
pub const DEFAULT_THRESHOLD: f64 = 0.9;

/// Result of a threshold-aware similarity computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum SimilarityScore {
    /// Exact similarity in `[0, 1]`.
    Score(f64),
    /// Provably below the requested threshold; exact value not computed.
    BelowThreshold,
}

impl SimilarityScore {
    /// The numeric score, or `None` for [`SimilarityScore::BelowThreshold`].
    #[must_use]
    pub fn value(self) -> Option<f64> {
        match self {
            Self::Score(v) => Some(v),
            Self::BelowThreshold => None,
        }
    }

    /// True when a numeric score is strictly greater than `cutoff`.
    ///
    /// [`SimilarityScore::BelowThreshold`] never exceeds anything.
    #[must_use]
    pub fn exceeds(self, cutoff: f64) -> bool {
        self.value().is_some_and(|v| v > cutoff)
    }

    /// Check if this is the below-threshold sentinel.
    #[must_use]
    pub fn is_below_threshold(self) -> bool {
        matches!(self, Self::BelowThreshold)
    }
}

impl std::fmt::Display for SimilarityScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Score(v) => write!(f, "{:.4}", v),
            Self::BelowThreshold => write!(f, "below threshold"),
        }
    }
}

/// Number of chars in a string.
pub(crate) fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_value() {
        assert_eq!(SimilarityScore::Score(0.5).value(), Some(0.5));
        assert_eq!(SimilarityScore::BelowThreshold.value(), None);
    }

    #[test]
    fn test_score_exceeds_is_strict() {
        assert!(SimilarityScore::Score(0.91).exceeds(0.9));
        assert!(!SimilarityScore::Score(0.9).exceeds(0.9));
        assert!(!SimilarityScore::BelowThreshold.exceeds(0.0));
    }

    #[test]
    fn test_score_display() {
        assert_eq!(SimilarityScore::Score(1.0).to_string(), "1.0000");
        assert_eq!(
            SimilarityScore::BelowThreshold.to_string(),
            "below threshold"
        );
    }

    #[test]
    fn test_char_len_counts_scalars() {
        assert_eq!(char_len(""), 0);
        assert_eq!(char_len("héllo"), 5);
    }
}
