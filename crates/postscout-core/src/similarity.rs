//! Text normalization and similarity scoring.
//!
//! Feed posts rarely render byte-for-byte identical to the text a user
//! copied out of them (smart quotes survive, whitespace does not), so the
//! fuzzy strategy compares normalized strings with a matching-blocks ratio.

/// Collapse runs of whitespace to single spaces, trim, and lowercase.
///
/// Idempotent: `normalize(normalize(s)) == normalize(s)`.
pub fn normalize(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Similarity ratio of two raw strings in `[0.0, 1.0]`.
///
/// Both inputs are normalized first; a score of 1.0 means the normalized
/// strings are identical.
pub fn similarity(a: &str, b: &str) -> f64 {
    ratio(&normalize(a), &normalize(b))
}

/// Matching-blocks ratio of two strings in `[0.0, 1.0]`.
///
/// Computed as `2*M / (len(a) + len(b))` where `M` is the total length of
/// the matching blocks found by recursively taking the longest common run
/// and matching the left and right remainders. Two empty strings score 1.0;
/// one empty string scores 0.0.
///
/// Deterministic: when several longest runs tie, the earliest one in `a`
/// (then `b`) wins. Symmetric except in the degenerate tie case, which
/// normalized post text does not produce.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let matched = matching_len(&a, &b);
    (2.0 * matched as f64) / ((a.len() + b.len()) as f64)
}

/// Total length of matching blocks between `a` and `b`.
fn matching_len(a: &[char], b: &[char]) -> usize {
    let (ai, bi, n) = longest_common_run(a, b);
    if n == 0 {
        return 0;
    }
    n + matching_len(&a[..ai], &b[..bi]) + matching_len(&a[ai + n..], &b[bi + n..])
}

/// Longest common contiguous run of `a` and `b`.
///
/// Returns `(start_in_a, start_in_b, length)`; `(0, 0, 0)` when the strings
/// share no character.
fn longest_common_run(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0usize, 0usize, 0usize);
    // Row-by-row DP; prev[j] is the run length ending at a[i-1], b[j-1].
    let mut prev = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        let mut cur = vec![0usize; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            if ca == cb {
                let run = prev[j] + 1;
                cur[j + 1] = run;
                if run > best.2 {
                    best = (i + 1 - run, j + 1 - run, run);
                }
            }
        }
        prev = cur;
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize("  Hello   World \n"), "hello world");
        assert_eq!(normalize("a\tb\nc"), "a b c");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let inputs = ["  MiXeD   CaSe \t text ", "", "already normal", "один Два"];
        for s in inputs {
            let once = normalize(s);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn test_ratio_identity() {
        assert_eq!(ratio("same text", "same text"), 1.0);
        assert_eq!(similarity("Same   Text", "same text"), 1.0);
    }

    #[test]
    fn test_ratio_empty_strings() {
        assert_eq!(ratio("", ""), 1.0);
        assert_eq!(ratio("abc", ""), 0.0);
        assert_eq!(ratio("", "abc"), 0.0);
    }

    #[test]
    fn test_ratio_in_unit_interval() {
        let pairs = [
            ("abcd", "bcde"),
            ("completely different", "unrelated words"),
            ("a", "b"),
            ("short", "a much longer string with short inside"),
        ];
        for (a, b) in pairs {
            let r = ratio(a, b);
            assert!((0.0..=1.0).contains(&r), "ratio({a:?}, {b:?}) = {r}");
        }
    }

    #[test]
    fn test_ratio_known_value() {
        // Matching block "bcd": 2*3 / (4+4)
        assert_eq!(ratio("abcd", "bcde"), 0.75);
    }

    #[test]
    fn test_ratio_disjoint_is_zero() {
        assert_eq!(ratio("aaaa", "bbbb"), 0.0);
    }

    #[test]
    fn test_similarity_tolerates_case_and_spacing() {
        let a = "People often think that Honor and Deception cannot be combined";
        let b = "people  often think that honor and deception cannot be combined";
        assert_eq!(similarity(a, b), 1.0);
    }

    #[test]
    fn test_single_substitution_scores_high() {
        // One swapped character out of 43 leaves 42 matched per side:
        // 2*42 / 86 ~ 0.977.
        let a = "the quick brown fox jumps over the lazy dog";
        let b = "the quick brown fax jumps over the lazy dog";
        let r = ratio(a, b);
        assert!(r > 0.95 && r < 1.0, "r = {r}");
    }
}
