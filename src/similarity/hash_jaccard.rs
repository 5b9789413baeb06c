//! Jaccard similarity over rolling-hash chunk fingerprints.
//!
//! Designed for very long entries: every fixed-size window of the text is
//! reduced to a 32-bit polynomial hash in O(1) amortized time, so the whole
//! comparison is linear. Hash collisions are an accepted approximation.

use std::collections::HashSet;

/// Default window size in chars.
pub const DEFAULT_CHUNK_SIZE: usize = 100;

/// Rolling hash base.
const BASE: u32 = 31;

/// Compute Jaccard similarity between the chunk-hash sets of `a` and `b`.
///
/// # Returns
///
/// - `1.0` if both strings are empty, or equal
/// - `0.0` if exactly one string is empty
/// - `|A ∩ B| / |A ∪ B|` over the hash sets otherwise; `0.0` when both
///   non-equal strings are shorter than `chunk_size` and so have no windows
///
/// # Example
///
/// ```
/// use promptdupe::similarity::hash_jaccard;
///
/// assert_eq!(hash_jaccard("", "", 4), 1.0);
/// assert_eq!(hash_jaccard("", "abcd", 4), 0.0);
/// assert_eq!(hash_jaccard("abcdef", "abcdxx", 4), 0.2);
/// ```
#[must_use]
pub fn hash_jaccard(a: &str, b: &str, chunk_size: usize) -> f64 {
    if a == b {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let a_hashes = chunk_hashes(a, chunk_size.max(1));
    let b_hashes = chunk_hashes(b, chunk_size.max(1));

    let intersection = a_hashes.intersection(&b_hashes).count();
    let union = a_hashes.len() + b_hashes.len() - intersection;
    if union == 0 {
        return 0.0;
    }

    intersection as f64 / union as f64
}

/// Hash every `chunk_size`-char window of `s` with a base-31 rolling hash.
fn chunk_hashes(s: &str, chunk_size: usize) -> HashSet<u32> {
    let chars: Vec<u32> = s.chars().map(u32::from).collect();
    if chars.len() < chunk_size {
        return HashSet::new();
    }

    // BASE^(chunk_size - 1), for removing the outgoing char
    let high = (1..chunk_size).fold(1u32, |acc, _| acc.wrapping_mul(BASE));

    let mut hash = chars[..chunk_size]
        .iter()
        .fold(0u32, |h, &c| h.wrapping_mul(BASE).wrapping_add(c));

    let mut hashes = HashSet::with_capacity(chars.len() - chunk_size + 1);
    hashes.insert(hash);

    for i in chunk_size..chars.len() {
        let outgoing = chars[i - chunk_size];
        hash = hash
            .wrapping_sub(outgoing.wrapping_mul(high))
            .wrapping_mul(BASE)
            .wrapping_add(chars[i]);
        hashes.insert(hash);
    }

    hashes
}
