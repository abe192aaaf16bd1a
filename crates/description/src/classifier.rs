use fabricator_common::{ShapeHint, ShapeKind};
use tracing::debug;

use crate::vocabulary::TextVocabulary;

/// Picks a shape kind from keyword synonyms
#[derive(Debug, Clone, Copy)]
pub struct ShapeTypeClassifier<'v> {
    vocabulary: &'v TextVocabulary,
}

impl<'v> ShapeTypeClassifier<'v> {
    pub fn new(vocabulary: &'v TextVocabulary) -> Self {
        Self { vocabulary }
    }

    /// Classify normalized text.
    ///
    /// An explicit hint is returned as-is. Otherwise the first keyword group
    /// (circle, rectangle, triangle, hexagon, polygon) that matches wins, and
    /// text matching none of them is a circle.
    pub fn classify(&self, normalized: &str, hint: ShapeHint) -> ShapeKind {
        if let Some(kind) = hint.shape() {
            return kind;
        }

        let kind = self
            .vocabulary
            .shape_groups()
            .iter()
            .find(|(_, pattern)| pattern.is_match(normalized))
            .map(|(kind, _)| *kind)
            .unwrap_or(ShapeKind::Circle);

        debug!(%kind, "classified description");
        kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(text: &str) -> ShapeKind {
        let vocabulary = TextVocabulary::shared();
        ShapeTypeClassifier::new(vocabulary).classify(&vocabulary.normalize(text), ShapeHint::Auto)
    }

    #[test]
    fn test_synonyms() {
        assert_eq!(classify("a circular plate"), ShapeKind::Circle);
        assert_eq!(classify("a Box"), ShapeKind::Rectangle);
        assert_eq!(classify("square tile"), ShapeKind::Rectangle);
        assert_eq!(classify("small pyramid"), ShapeKind::Triangle);
        assert_eq!(classify("hex nut"), ShapeKind::Hexagon);
        assert_eq!(classify("odd figure"), ShapeKind::Polygon);
    }

    #[test]
    fn test_group_order_decides_ties() {
        // circle group is checked before rectangle
        assert_eq!(classify("a square ring"), ShapeKind::Circle);
        // any concrete group beats the generic polygon words
        assert_eq!(classify("triangle shape"), ShapeKind::Triangle);
    }

    #[test]
    fn test_whole_words_only() {
        assert_eq!(classify("rectangles everywhere"), ShapeKind::Circle);
        assert_eq!(classify("hexagonal bolt"), ShapeKind::Hexagon);
    }

    #[test]
    fn test_defaults_to_circle() {
        assert_eq!(classify("hello world"), ShapeKind::Circle);
        assert_eq!(classify(""), ShapeKind::Circle);
    }

    #[test]
    fn test_hint_bypasses_detection() {
        let vocabulary = TextVocabulary::shared();
        let classifier = ShapeTypeClassifier::new(vocabulary);
        assert_eq!(
            classifier.classify("a big circle", ShapeHint::Shape(ShapeKind::Hexagon)),
            ShapeKind::Hexagon
        );
        assert_eq!(
            classifier.classify("a big circle", "Triangle".parse().unwrap()),
            ShapeKind::Triangle
        );
    }
}
