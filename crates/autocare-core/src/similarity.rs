//! String similarity scoring used by the matcher.

use std::collections::HashMap;

/// Scores how alike two strings are, in `[0, 1]`.
pub trait Similarity: Send + Sync {
    fn similarity(&self, a: &str, b: &str) -> f64;
}

/// Sørensen–Dice coefficient over character bigrams.
///
/// Whitespace is ignored and the comparison is case-insensitive. Bigrams are
/// counted as a multiset, so repeated pairs only match as often as they occur
/// in both inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiceCoefficient;

impl Similarity for DiceCoefficient {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        let a: Vec<char> = a
            .chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();
        let b: Vec<char> = b
            .chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();

        if a == b {
            return if a.is_empty() { 0.0 } else { 1.0 };
        }
        if a.len() < 2 || b.len() < 2 {
            return 0.0;
        }

        let mut first: HashMap<(char, char), usize> = HashMap::new();
        for pair in a.windows(2) {
            *first.entry((pair[0], pair[1])).or_insert(0) += 1;
        }

        let mut intersection = 0usize;
        for pair in b.windows(2) {
            if let Some(count) = first.get_mut(&(pair[0], pair[1])) {
                if *count > 0 {
                    *count -= 1;
                    intersection += 1;
                }
            }
        }

        #[allow(clippy::cast_precision_loss)]
        let score = (2 * intersection) as f64 / (a.len() + b.len() - 2) as f64;
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dice(a: &str, b: &str) -> f64 {
        DiceCoefficient.similarity(a, b)
    }

    #[test]
    fn identical_strings_score_one() {
        assert!((dice("Quick Lube", "Quick Lube") - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn case_and_whitespace_are_ignored() {
        assert!((dice("QUICK LUBE", "quicklube") - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn disjoint_strings_score_zero() {
        assert!(dice("abc", "xyz").abs() < f64::EPSILON);
    }

    #[test]
    fn single_characters_score_zero_unless_equal() {
        assert!(dice("a", "b").abs() < f64::EPSILON);
        assert!((dice("a", "a") - 1.0).abs() < f64::EPSILON);
        assert!(dice("", "").abs() < f64::EPSILON);
    }

    #[test]
    fn known_pair() {
        // "night" vs "nacht": bigrams ni,ig,gh,ht / na,ac,ch,ht -> 1 shared
        assert!((dice("night", "nacht") - 0.25).abs() < 1e-9);
    }

    #[test]
    fn repeated_bigrams_count_once_per_occurrence() {
        // "aaaa" has three "aa"; "aa" has one
        assert!((dice("aaaa", "aa") - 0.5).abs() < 1e-9);
    }
}
