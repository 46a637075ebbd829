//! Character-level similarity between two tokens.

/// Longest-common-subsequence ratio in `[0, 1]`.
///
/// Computed as `LCS(a, b) / max(|a|, |b|)` over Unicode scalar values; two
/// empty strings are identical.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let longest = a.len().max(b.len());
    if longest == 0 {
        return 1.0;
    }
    lcs_len(&a, &b) as f64 / longest as f64
}

/// Length of the longest common subsequence, using two rolling rows.
pub fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}
