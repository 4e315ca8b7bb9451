//! Term-frequency vectorization and cosine similarity.
//!
//! The same `vectorize` runs over document chunks at index time and over
//! queries at search time; that symmetry is what makes the cosine score
//! meaningful.

use bothive_store::TermFreq;

/// Lowercase, map non-word characters to whitespace, split, and drop tokens
/// of length <= 2.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .filter(|token| token.chars().count() > 2)
        .map(|token| token.to_string())
        .collect()
}

/// Turn raw text into a sparse term-frequency vector.
pub fn vectorize(text: &str) -> TermFreq {
    let mut freq = TermFreq::new();
    for token in tokenize(text) {
        *freq.entry(token).or_insert(0) += 1;
    }
    freq
}

/// Cosine similarity over the union of token keys. Zero when either vector
/// has zero magnitude.
pub fn cosine_similarity(a: &TermFreq, b: &TermFreq) -> f64 {
    let mut dot = 0.0f64;
    let mut mag_a = 0.0f64;
    let mut mag_b = 0.0f64;

    for (term, &count) in a {
        let va = count as f64;
        mag_a += va * va;
        if let Some(&other) = b.get(term) {
            dot += va * other as f64;
        }
    }
    for &count in b.values() {
        let vb = count as f64;
        mag_b += vb * vb;
    }

    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }
    dot / (mag_a.sqrt() * mag_b.sqrt())
}
