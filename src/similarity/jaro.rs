//! Jaro-Winkler similarity.
//!
//! Cheap and well suited to short strings such as titles, where most
//! differences are typos or small transpositions.

/// Maximum prefix length rewarded by the Winkler boost.
const MAX_PREFIX: usize = 4;

/// Default Winkler prefix scale.
pub const DEFAULT_PREFIX_SCALE: f64 = 0.1;

/// Compute Jaro-Winkler similarity between two strings.
///
/// The matching window is `floor(max(|a|, |b|) / 2) - 1`. Characters are
/// matched greedily inside the window, transpositions are counted over the
/// matched characters, and the Jaro score is boosted by
/// `prefix * prefix_scale * (1 - jaro)` for a common prefix of up to four
/// characters.
///
/// # Returns
///
/// - `1.0` for identical strings (including two empty strings)
/// - `0.0` if exactly one string is empty or no characters match
///
/// # Example
///
/// ```
/// use promptdupe::similarity::jaro_winkler;
///
/// assert_eq!(jaro_winkler("prompt", "prompt", 0.1), 1.0);
/// assert_eq!(jaro_winkler("", "prompt", 0.1), 0.0);
/// assert!((jaro_winkler("MARTHA", "MARHTA", 0.1) - 0.9611).abs() < 1e-4);
/// ```
#[must_use]
pub fn jaro_winkler(a: &str, b: &str, prefix_scale: f64) -> f64 {
    if a == b {
        return 1.0;
    }

    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    // Canonical operand order keeps greedy matching symmetric
    let (a, b) = if (a.len(), &a) <= (b.len(), &b) {
        (a, b)
    } else {
        (b, a)
    };

    let jaro = jaro(&a, &b);
    if jaro == 0.0 {
        return 0.0;
    }

    let prefix = a
        .iter()
        .zip(b.iter())
        .take(MAX_PREFIX)
        .take_while(|(x, y)| x == y)
        .count();

    (jaro + prefix as f64 * prefix_scale * (1.0 - jaro)).min(1.0)
}

fn jaro(a: &[char], b: &[char]) -> f64 {
    let window = (a.len().max(b.len()) / 2).saturating_sub(1);

    let mut a_matched = vec![false; a.len()];
    let mut b_matched = vec![false; b.len()];
    let mut matches = 0usize;

    for (i, &ca) in a.iter().enumerate() {
        let start = i.saturating_sub(window);
        let end = (i + window + 1).min(b.len());
        for j in start..end {
            if !b_matched[j] && b[j] == ca {
                a_matched[i] = true;
                b_matched[j] = true;
                matches += 1;
                break;
            }
        }
    }

    if matches == 0 {
        return 0.0;
    }

    let a_seq = a.iter().zip(&a_matched).filter(|(_, &m)| m).map(|(c, _)| c);
    let b_seq = b.iter().zip(&b_matched).filter(|(_, &m)| m).map(|(c, _)| c);
    let half_transpositions = a_seq.zip(b_seq).filter(|(x, y)| x != y).count();
    let transpositions = half_transpositions / 2;

    let m = matches as f64;
    (m / a.len() as f64 + m / b.len() as f64 + (m - transpositions as f64) / m) / 3.0
}
