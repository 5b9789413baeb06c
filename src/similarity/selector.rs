//! Adaptive metric selection.
//!
//! # Overview
//!
//! [`smart_similarity`] picks the cheapest metric that is still faithful for
//! the size of its inputs:
//!
//! | longest operand | metric                                   | threshold handling |
//! |-----------------|------------------------------------------|--------------------|
//! | `< 100`         | Jaro-Winkler                             | post-hoc           |
//! | `< 1000`        | bounded edit distance                    | internal           |
//! | `< 10000`       | cosine over trigrams                     | post-hoc           |
//! | `>= 10000`      | Jaccard over 200-char rolling hashes     | post-hoc           |
//!
//! Before any metric runs, equal operands short-circuit to `1.0` and operands
//! whose length ratio is below the threshold short-circuit to
//! [`SimilarityScore::BelowThreshold`]: no metric can score two strings higher
//! than `min_len / max_len`.

use serde::Serialize;

use super::{char_len, SimilarityScore};

/// Longest operand (exclusive) handled by Jaro-Winkler.
pub const JARO_WINKLER_MAX_LEN: usize = 100;
/// Longest operand (exclusive) handled by bounded edit distance.
pub const LEVENSHTEIN_MAX_LEN: usize = 1_000;
/// Longest operand (exclusive) handled by n-gram cosine.
pub const COSINE_MAX_LEN: usize = 10_000;

/// N-gram size used in the cosine tier.
pub const SELECTOR_NGRAM: usize = 3;
/// Chunk size used in the hash-Jaccard tier.
pub const SELECTOR_CHUNK_SIZE: usize = 200;

/// The four similarity metrics, as seen by the selector.
///
/// Every method has a default implementation delegating to the free
/// function of the same name, so [`StandardMetrics`] is an empty impl.
/// Instrumented implementations can override individual methods.
pub trait Metrics {
    /// Jaro-Winkler with the default prefix scale.
    fn jaro_winkler(&self, a: &str, b: &str) -> f64 {
        super::jaro_winkler(a, b, super::jaro::DEFAULT_PREFIX_SCALE)
    }

    /// Threshold-aware edit-distance similarity.
    fn threshold_similarity(&self, a: &str, b: &str, threshold: f64) -> SimilarityScore {
        super::threshold_similarity(a, b, threshold)
    }

    /// Cosine similarity over `n`-grams.
    fn cosine_ngram(&self, a: &str, b: &str, n: usize) -> f64 {
        super::cosine_ngram(a, b, n)
    }

    /// Jaccard similarity over rolling-hash chunks.
    fn hash_jaccard(&self, a: &str, b: &str, chunk_size: usize) -> f64 {
        super::hash_jaccard(a, b, chunk_size)
    }
}

/// The production metric implementations.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardMetrics;

impl Metrics for StandardMetrics {}

/// Identifies one similarity metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Metric {
    /// Jaro-Winkler similarity
    JaroWinkler,
    /// Bounded Levenshtein similarity
    Levenshtein,
    /// Trigram cosine similarity
    Cosine,
    /// Rolling-hash Jaccard similarity
    HashJaccard,
}

impl Metric {
    /// The metric [`smart_similarity`] uses when the longest operand has
    /// `max_len` chars.
    ///
    /// # Example
    ///
    /// ```
    /// use promptdupe::similarity::Metric;
    ///
    /// assert_eq!(Metric::for_length(99), Metric::JaroWinkler);
    /// assert_eq!(Metric::for_length(100), Metric::Levenshtein);
    /// assert_eq!(Metric::for_length(10_000), Metric::HashJaccard);
    /// ```
    #[must_use]
    pub fn for_length(max_len: usize) -> Self {
        if max_len < JARO_WINKLER_MAX_LEN {
            Self::JaroWinkler
        } else if max_len < LEVENSHTEIN_MAX_LEN {
            Self::Levenshtein
        } else if max_len < COSINE_MAX_LEN {
            Self::Cosine
        } else {
            Self::HashJaccard
        }
    }

    /// Human-readable metric name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::JaroWinkler => "jaro-winkler",
            Self::Levenshtein => "levenshtein",
            Self::Cosine => "cosine",
            Self::HashJaccard => "hash-jaccard",
        }
    }

    /// Run this metric directly with the selector's tier parameters.
    ///
    /// Only [`Metric::Levenshtein`] looks at `threshold`; the other metrics
    /// always return their exact score.
    #[must_use]
    pub fn score<M: Metrics + ?Sized>(
        self,
        metrics: &M,
        a: &str,
        b: &str,
        threshold: f64,
    ) -> SimilarityScore {
        match self {
            Self::JaroWinkler => SimilarityScore::Score(metrics.jaro_winkler(a, b)),
            Self::Levenshtein => metrics.threshold_similarity(a, b, threshold),
            Self::Cosine => SimilarityScore::Score(metrics.cosine_ngram(a, b, SELECTOR_NGRAM)),
            Self::HashJaccard => {
                SimilarityScore::Score(metrics.hash_jaccard(a, b, SELECTOR_CHUNK_SIZE))
            }
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Compare two strings with the metric best suited to their size.
///
/// `threshold` is expected to lie in `[0, 1]`.
///
/// # Example
///
/// ```
/// use promptdupe::similarity::{smart_similarity, SimilarityScore};
///
/// let score = smart_similarity("Translate to French", "Translate to Frnech", 0.8);
/// assert!(score.exceeds(0.8));
///
/// assert_eq!(
///     smart_similarity("short", "a considerably longer string", 0.9),
///     SimilarityScore::BelowThreshold
/// );
/// ```
#[must_use]
pub fn smart_similarity(a: &str, b: &str, threshold: f64) -> SimilarityScore {
    smart_similarity_with(&StandardMetrics, a, b, threshold)
}

/// [`smart_similarity`] driven by a caller-supplied [`Metrics`] implementation.
#[must_use]
pub fn smart_similarity_with<M: Metrics + ?Sized>(
    metrics: &M,
    a: &str,
    b: &str,
    threshold: f64,
) -> SimilarityScore {
    debug_assert!(
        (0.0..=1.0).contains(&threshold),
        "threshold {} outside [0, 1]",
        threshold
    );

    if a == b {
        return SimilarityScore::Score(1.0);
    }

    let (a_len, b_len) = (char_len(a), char_len(b));
    let (min_len, max_len) = (a_len.min(b_len), a_len.max(b_len));

    // max_len > 0 here: two empty strings are equal
    if (min_len as f64 / max_len as f64) < threshold {
        return SimilarityScore::BelowThreshold;
    }

    let metric = Metric::for_length(max_len);
    log::trace!(
        "smart_similarity: {} chars vs {} chars using {}",
        a_len,
        b_len,
        metric
    );

    match metric.score(metrics, a, b, threshold) {
        SimilarityScore::Score(value) if metric != Metric::Levenshtein && value < threshold => {
            SimilarityScore::BelowThreshold
        }
        score => score,
    }
}
