//! Formatting helpers for scores and similarities.

/// Group score on the 0-100 scale, two decimals.
pub fn format_score(score: f64) -> String {
    format!("{score:.2}")
}

/// Similarity in `[0, 1]` as a percentage with one decimal, e.g. `98.2%`.
pub fn format_similarity(similarity: f64) -> String {
    format!("{:.1}%", similarity * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_fixed_precision() {
        assert_eq!(format_score(85.0), "85.00");
        assert_eq!(format_score(8.4502), "8.45");
        assert_eq!(format_similarity(0.982), "98.2%");
        assert_eq!(format_similarity(0.0), "0.0%");
    }
}
