// src/similarity.rs

/// Strategy seam for label matching, so the linear-scan reconciler can later
/// swap in an indexed approximate matcher without touching callers.
pub trait SimilarityScorer {
    /// Score in `[0, 1]`; 0 means no similarity, 1 means identical.
    fn score(&self, a: &str, b: &str) -> f64;
}

/// Letter-by-letter similarity: `1 - levenshtein(a, b) / max(len(a), len(b))`.
///
/// Case-sensitive, no whitespace normalization; callers trim if they need to.
/// Two empty strings score 1.0 (the `max_len == 0` case is defined, not a
/// division by zero).
#[derive(Debug, Default, Clone, Copy)]
pub struct LevenshteinScorer;

impl SimilarityScorer for LevenshteinScorer {
    fn score(&self, a: &str, b: &str) -> f64 {
        strsim::normalized_levenshtein(a, b)
    }
}
