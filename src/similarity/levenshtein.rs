//! Bounded Levenshtein distance and threshold-aware similarity.
//!
//! # Overview
//!
//! The distance is computed with two rolling rows of length
//! `min(|a|, |b|) + 1`, so memory is linear in the shorter operand. A
//! `max_distance` budget enables two early exits:
//!
//! 1. **Length difference**: `|b| - |a|` is a lower bound on the distance.
//! 2. **Row minimum**: once every cell of a row exceeds the budget, no
//!    alignment through that row can come back under it.
//!
//! `None` means the distance exceeded the budget. A finite value is only ever
//! returned when it is the exact edit distance.

use super::{char_len, SimilarityScore};

/// Compute the edit distance between `a` and `b`, giving up past `max_distance`.
///
/// Insertions, deletions and substitutions all cost 1. Pass `None` for an
/// unbounded computation.
///
/// # Returns
///
/// `Some(distance)` if the distance is within the budget, `None` otherwise.
///
/// # Example
///
/// ```
/// use promptdupe::similarity::bounded_levenshtein;
///
/// assert_eq!(bounded_levenshtein("kitten", "sitting", None), Some(3));
/// assert_eq!(bounded_levenshtein("kitten", "sitting", Some(2)), None);
/// assert_eq!(bounded_levenshtein("", "abc", Some(3)), Some(3));
/// ```
#[must_use]
pub fn bounded_levenshtein(a: &str, b: &str, max_distance: Option<usize>) -> Option<usize> {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    // Shorter operand sizes the rows
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let max = max_distance.unwrap_or(usize::MAX);

    if long.len() - short.len() > max {
        return None;
    }

    if short.is_empty() {
        return within(long.len(), max);
    }

    let mut prev: Vec<usize> = (0..=short.len()).collect();
    let mut curr: Vec<usize> = vec![0; short.len() + 1];

    for (j, &lc) in long.iter().enumerate() {
        curr[0] = j + 1;
        let mut row_min = curr[0];

        for (i, &sc) in short.iter().enumerate() {
            let cost = usize::from(sc != lc);
            let value = (prev[i] + cost).min(prev[i + 1] + 1).min(curr[i] + 1);
            curr[i + 1] = value;
            row_min = row_min.min(value);
        }

        if row_min > max {
            log::trace!(
                "Levenshtein early exit at row {} of {} (row minimum {} > {})",
                j + 1,
                long.len(),
                row_min,
                max
            );
            return None;
        }

        std::mem::swap(&mut prev, &mut curr);
    }

    within(prev[short.len()], max)
}

fn within(distance: usize, max: usize) -> Option<usize> {
    (distance <= max).then_some(distance)
}

/// Edit-distance similarity that never finishes work it can prove is wasted.
///
/// The distance budget is `floor(longer_len * (1 - threshold))`. If the
/// bounded distance exceeds it the result is
/// [`SimilarityScore::BelowThreshold`]; otherwise the score is
/// `(longer_len - distance) / longer_len`.
///
/// Unlike [`jaro_winkler`](super::jaro_winkler), an empty operand against a
/// non-empty one yields an exact `0.0` when `threshold` is `0.0`.
///
/// # Example
///
/// ```
/// use promptdupe::similarity::{threshold_similarity, SimilarityScore};
///
/// assert_eq!(threshold_similarity("", "", 0.9), SimilarityScore::Score(1.0));
/// assert_eq!(threshold_similarity("abcd", "abcf", 0.0), SimilarityScore::Score(0.75));
/// assert_eq!(threshold_similarity("abcd", "wxyz", 0.5), SimilarityScore::BelowThreshold);
/// ```
#[must_use]
pub fn threshold_similarity(a: &str, b: &str, threshold: f64) -> SimilarityScore {
    let (a_len, b_len) = (char_len(a), char_len(b));
    if a_len == 0 && b_len == 0 {
        return SimilarityScore::Score(1.0);
    }

    let (longer, shorter, longer_len) = if a_len >= b_len {
        (a, b, a_len)
    } else {
        (b, a, b_len)
    };

    let max_distance = (longer_len as f64 * (1.0 - threshold)).floor().max(0.0) as usize;

    match bounded_levenshtein(longer, shorter, Some(max_distance)) {
        Some(distance) => {
            SimilarityScore::Score((longer_len - distance) as f64 / longer_len as f64)
        }
        None => SimilarityScore::BelowThreshold,
    }
}
