//! Three-pass label classification: exact, similar, then part match

use serde::Serialize;
use similar::TextDiff;

use crate::config::Thresholds;
use crate::field::PositionedField;
use crate::normalize::canonical;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchKind {
    ExactSelected,
    ExactNotSelected,
    SimilarSelected,
    SimilarNotSelected,
    NotFound,
}

impl MatchKind {
    pub fn is_selected(self) -> bool {
        matches!(self, MatchKind::ExactSelected | MatchKind::SimilarSelected)
    }

    fn exact(selected: bool) -> Self {
        if selected {
            MatchKind::ExactSelected
        } else {
            MatchKind::ExactNotSelected
        }
    }

    fn similar(selected: bool) -> Self {
        if selected {
            MatchKind::SimilarSelected
        } else {
            MatchKind::SimilarNotSelected
        }
    }
}

/// Result of classifying one label against a candidate pool
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatchOutcome {
    pub kind: MatchKind,
    /// Page of the matching field
    pub page: usize,
    /// Matching field was recognized with low confidence
    pub uncertain: bool,
}

impl MatchOutcome {
    pub fn not_found() -> Self {
        Self {
            kind: MatchKind::NotFound,
            page: 0,
            uncertain: true,
        }
    }

    pub fn is_found(&self) -> bool {
        self.kind != MatchKind::NotFound
    }

    fn from_field(kind: MatchKind, candidate: &Candidate) -> Self {
        Self {
            kind,
            page: candidate.page,
            uncertain: candidate.uncertain,
        }
    }
}

/// Canonicalized view of a field, computed once per selector evaluation
#[derive(Debug, Clone)]
pub struct Candidate {
    pub key: String,
    pub selected: bool,
    pub uncertain: bool,
    pub page: usize,
}

impl Candidate {
    pub fn new(positioned: &PositionedField, thresholds: &Thresholds) -> Self {
        Self {
            key: canonical(&positioned.field.key),
            selected: positioned.field.is_selected(),
            uncertain: thresholds.is_low_confidence(positioned.field.confidence),
            page: positioned.page,
        }
    }
}

pub fn candidates(fields: &[PositionedField], thresholds: &Thresholds) -> Vec<Candidate> {
    fields.iter().map(|f| Candidate::new(f, thresholds)).collect()
}

/// Similarity of two strings in [0, 1]: `2 * LCS / (len(a) + len(b))`
pub fn similarity(a: &str, b: &str) -> f32 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    TextDiff::from_chars(a, b).ratio()
}

/// Classify `label` against already filtered candidates
pub fn classify(label: &str, candidates: &[Candidate], thresholds: &Thresholds) -> MatchOutcome {
    let wanted = canonical(label);

    exact_match(&wanted, candidates)
        .or_else(|| similar_match(&wanted, candidates, thresholds))
        .or_else(|| {
            if label.chars().count() > thresholds.part_match_min_label_len {
                part_match(&wanted, candidates)
            } else {
                None
            }
        })
        .unwrap_or_else(MatchOutcome::not_found)
}

fn exact_match(wanted: &str, candidates: &[Candidate]) -> Option<MatchOutcome> {
    candidates
        .iter()
        .find(|c| c.key == wanted)
        .map(|c| MatchOutcome::from_field(MatchKind::exact(c.selected), c))
}

/// Best candidate strictly above the threshold; earlier candidates win ties
fn similar_match(
    wanted: &str,
    candidates: &[Candidate],
    thresholds: &Thresholds,
) -> Option<MatchOutcome> {
    let mut best_ratio = thresholds.similarity_threshold;
    let mut best = None;

    for candidate in candidates {
        let ratio = similarity(wanted, &candidate.key);
        if ratio > best_ratio {
            best_ratio = ratio;
            best = Some(candidate);
        }
    }

    best.map(|c| MatchOutcome::from_field(MatchKind::similar(c.selected), c))
}

/// First candidate whose key is contained in the label
fn part_match(wanted: &str, candidates: &[Candidate]) -> Option<MatchOutcome> {
    candidates
        .iter()
        .find(|c| wanted.contains(c.key.as_str()))
        .map(|c| MatchOutcome::from_field(MatchKind::similar(c.selected), c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Field, NOT_SELECTED, SELECTED};

    fn pool(fields: &[(usize, &str, Option<&str>, f64)]) -> Vec<Candidate> {
        let thresholds = Thresholds::default();
        fields
            .iter()
            .map(|(page, key, value, confidence)| {
                Candidate::new(
                    &PositionedField::new(*page, Field::new(*key, *value, *confidence)),
                    &thresholds,
                )
            })
            .collect()
    }

    #[test]
    fn test_similarity_ratio() {
        assert_eq!(similarity("abc", "abc"), 1.0);
        assert_eq!(similarity("abc", "xyz"), 0.0);
        assert!((similarity("abcd", "abce") - 0.75).abs() < 1e-6);
        assert_eq!(similarity("abcd", "abce"), similarity("abce", "abcd"));
    }

    #[test]
    fn test_exact_match_selected_state() {
        let t = Thresholds::default();
        let candidates = pool(&[
            (0, "Option 1", Some(NOT_SELECTED), 90.0),
            (1, "Option 2", Some(SELECTED), 20.0),
            (1, "Option 3", None, 95.0),
        ]);

        let first = classify("option1", &candidates, &t);
        assert_eq!(first.kind, MatchKind::ExactNotSelected);
        assert!(!first.uncertain);

        let second = classify("Option 2", &candidates, &t);
        assert_eq!(second.kind, MatchKind::ExactSelected);
        assert_eq!(second.page, 1);
        assert!(second.uncertain);

        // No value block at all counts as checked
        assert_eq!(classify("Option-3", &candidates, &t).kind, MatchKind::ExactSelected);
    }

    #[test]
    fn test_first_exact_match_wins() {
        let t = Thresholds::default();
        let candidates = pool(&[
            (0, "Yes", Some(NOT_SELECTED), 90.0),
            (1, "Yes", Some(SELECTED), 90.0),
        ]);

        let outcome = classify("Yes", &candidates, &t);
        assert_eq!(outcome.kind, MatchKind::ExactNotSelected);
        assert_eq!(outcome.page, 0);
    }

    #[test]
    fn test_exact_beats_similar() {
        let t = Thresholds::default();
        let candidates = pool(&[
            (0, "Either thls way", Some(SELECTED), 90.0),
            (1, "Either this way", Some(NOT_SELECTED), 90.0),
        ]);

        let outcome = classify("Either this way", &candidates, &t);
        assert_eq!(outcome.kind, MatchKind::ExactNotSelected);
        assert_eq!(outcome.page, 1);
    }

    #[test]
    fn test_similar_picks_highest_ratio() {
        let t = Thresholds::default();
        // Both are above the threshold, the second one is closer
        let candidates = pool(&[
            (0, "Pleose choose one of the fallowing", Some(NOT_SELECTED), 90.0),
            (1, "Please choose one of the fallowing", Some(SELECTED), 90.0),
        ]);

        let outcome = classify("Please choose one of the following", &candidates, &t);
        assert_eq!(outcome.kind, MatchKind::SimilarSelected);
        assert_eq!(outcome.page, 1);
    }

    #[test]
    fn test_short_label_below_threshold_not_found() {
        let t = Thresholds::default();
        let candidates = pool(&[(0, "Optlon 1", Some(SELECTED), 90.0)]);

        // 12/14 is not above 0.9
        assert_eq!(classify("Option 1", &candidates, &t), MatchOutcome::not_found());
    }

    #[test]
    fn test_part_match_only_for_long_labels() {
        let t = Thresholds::default();
        let candidates = pool(&[(2, "completely different", Some(SELECTED), 90.0)]);

        let outcome = classify("Or something completely different", &candidates, &t);
        assert_eq!(outcome.kind, MatchKind::SimilarSelected);
        assert_eq!(outcome.page, 2);

        let candidates = pool(&[(0, "Red", Some(SELECTED), 90.0)]);
        assert_eq!(classify("Dark red", &candidates, &t).kind, MatchKind::NotFound);
    }

    #[test]
    fn test_similarity_threshold_is_exclusive() {
        let t = Thresholds::default();

        // 18/20 is exactly 0.9
        let candidates = pool(&[(0, "abcdefghix", Some(SELECTED), 90.0)]);
        assert_eq!(similarity("abcdefghij", "abcdefghix"), 0.9);
        assert_eq!(classify("abcdefghij", &candidates, &t).kind, MatchKind::NotFound);

        // 20/22 is just above
        let candidates = pool(&[(0, "abcdefghijx", Some(SELECTED), 90.0)]);
        assert_eq!(classify("abcdefghijk", &candidates, &t).kind, MatchKind::SimilarSelected);
    }

    #[test]
    fn test_part_match_label_length_is_exclusive() {
        let t = Thresholds::default();
        let candidates = pool(&[(0, "Color", Some(SELECTED), 90.0)]);

        assert_eq!("Favourite color".chars().count(), 15);
        assert_eq!(classify("Favourite color", &candidates, &t).kind, MatchKind::NotFound);

        assert_eq!("Favourite colors".chars().count(), 16);
        assert_eq!(
            classify("Favourite colors", &candidates, &t).kind,
            MatchKind::SimilarSelected
        );
    }

    #[test]
    fn test_part_match_requires_key_inside_label() {
        let t = Thresholds::default();
        let candidates = pool(&[(0, "Or something completely different, really not the same", Some(SELECTED), 90.0)]);

        assert_eq!(
            classify("Or something completely different", &candidates, &t).kind,
            MatchKind::NotFound
        );
    }

    #[test]
    fn test_classification_is_deterministic() {
        let t = Thresholds::default();
        let candidates = pool(&[
            (0, "Green", Some(NOT_SELECTED), 80.0),
            (0, "Gren", Some(SELECTED), 30.0),
            (1, "Black", None, 90.0),
        ]);

        for label in ["Green", "Black", "Purple"] {
            assert_eq!(classify(label, &candidates, &t), classify(label, &candidates, &t));
        }
    }

    #[test]
    fn test_empty_pool() {
        let t = Thresholds::default();
        let outcome = classify("Anything at all, long enough", &[], &t);
        assert_eq!(outcome, MatchOutcome::not_found());
        assert!(outcome.uncertain);
    }
}
