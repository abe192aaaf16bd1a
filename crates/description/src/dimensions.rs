use std::collections::BTreeMap;

use strum::{Display, EnumIter};
use tracing::debug;

use crate::units::to_millimeters;
use crate::vocabulary::TextVocabulary;

/// Dimension labels the extractor understands, in scan order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum DimensionKind {
    Radius,
    Diameter,
    Width,
    Height,
    Length,
    Side,
}

/// Extracted dimensions in millimeters; only detected kinds are present
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dimensions {
    values: BTreeMap<DimensionKind, f64>,
}

impl Dimensions {
    pub fn get(&self, kind: DimensionKind) -> Option<f64> {
        self.values.get(&kind).copied()
    }

    pub fn contains(&self, kind: DimensionKind) -> bool {
        self.values.contains_key(&kind)
    }

    /// Set a value, overwriting any earlier one
    pub fn insert(&mut self, kind: DimensionKind, millimeters: f64) {
        self.values.insert(kind, millimeters);
    }

    /// Set a value only when the kind has not been seen yet
    pub fn fill(&mut self, kind: DimensionKind, millimeters: f64) {
        self.values.entry(kind).or_insert(millimeters);
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}

/// Pulls labeled and unlabeled measurements out of normalized text
#[derive(Debug, Clone, Copy)]
pub struct DimensionExtractor<'v> {
    vocabulary: &'v TextVocabulary,
}

impl<'v> DimensionExtractor<'v> {
    pub fn new(vocabulary: &'v TextVocabulary) -> Self {
        Self { vocabulary }
    }

    /// Extract dimensions from text already passed through
    /// [`TextVocabulary::normalize`].
    ///
    /// Labeled values come first (the last occurrence of a label wins). The
    /// "A by B" rule then fills gaps, and a bare "<number><unit>" is used
    /// only when nothing else was found.
    pub fn extract(&self, normalized: &str) -> Dimensions {
        let mut dimensions = Dimensions::default();

        for (kind, pattern) in self.vocabulary.dimension_patterns() {
            for caps in pattern.captures_iter(normalized) {
                let unit = caps.get(2).map_or("mm", |m| m.as_str());
                if let Some(millimeters) = parse_millimeters(&caps[1], unit) {
                    dimensions.insert(*kind, millimeters);
                }
            }
        }

        self.apply_size_pairs(normalized, &mut dimensions);
        if dimensions.is_empty() {
            self.apply_bare_measurement(normalized, &mut dimensions);
        }

        debug!(?dimensions, "extracted dimensions");
        dimensions
    }

    fn apply_size_pairs(&self, text: &str, dimensions: &mut Dimensions) {
        let round = self.vocabulary.mentions_round(text);

        for caps in self.vocabulary.size_pair().captures_iter(text) {
            let first_unit = caps.get(2).map(|m| m.as_str());
            let second_unit = caps.get(4).map(|m| m.as_str());

            // A unit written on one side of the pair applies to the other
            let first = parse_millimeters(&caps[1], first_unit.or(second_unit).unwrap_or("mm"));
            let second = parse_millimeters(&caps[3], second_unit.or(first_unit).unwrap_or("mm"));
            let (Some(first), Some(second)) = (first, second) else {
                continue;
            };

            if round {
                dimensions.fill(DimensionKind::Diameter, first.max(second));
            } else {
                dimensions.fill(DimensionKind::Width, first);
                dimensions.fill(DimensionKind::Height, second);
            }
        }
    }

    fn apply_bare_measurement(&self, text: &str, dimensions: &mut Dimensions) {
        let Some(caps) = self.vocabulary.bare_measurement().captures(text) else {
            return;
        };
        let Some(millimeters) = parse_millimeters(&caps[1], &caps[2]) else {
            return;
        };

        if self.vocabulary.mentions_round(text) {
            dimensions.insert(DimensionKind::Radius, millimeters / 2.0);
        } else {
            dimensions.insert(DimensionKind::Width, millimeters);
            dimensions.insert(DimensionKind::Height, millimeters);
        }
    }
}

/// Parse a number and convert it to millimeters; values that overflow are dropped
fn parse_millimeters(number: &str, unit: &str) -> Option<f64> {
    let value = number.parse::<f64>().ok()?;
    Some(to_millimeters(value, unit)).filter(|millimeters| millimeters.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> Dimensions {
        let vocabulary = TextVocabulary::shared();
        DimensionExtractor::new(vocabulary).extract(&vocabulary.normalize(text))
    }

    #[test]
    fn test_labeled_with_separator_and_unit() {
        let dims = extract("radius = 2.5 cm");
        assert_eq!(dims.get(DimensionKind::Radius), Some(25.0));
        assert_eq!(dims.len(), 1);
    }

    #[test]
    fn test_labeled_without_separator() {
        let dims = extract("A circle with radius 25mm");
        assert_eq!(dims.get(DimensionKind::Radius), Some(25.0));
        assert!(!dims.contains(DimensionKind::Width));
    }

    #[test]
    fn test_single_letter_aliases() {
        let dims = extract("w=10 h:4in");
        assert_eq!(dims.get(DimensionKind::Width), Some(10.0));
        assert_eq!(dims.get(DimensionKind::Height), Some(101.6));
    }

    #[test]
    fn test_last_label_wins() {
        let dims = extract("width=10 then width=20");
        assert_eq!(dims.get(DimensionKind::Width), Some(20.0));
    }

    #[test]
    fn test_unknown_unit_word_is_millimeters() {
        let dims = extract("side=5xyz");
        assert_eq!(dims.get(DimensionKind::Side), Some(5.0));
    }

    #[test]
    fn test_by_pattern_assigns_width_and_height() {
        let dims = extract("Rectangle 100mm by 50mm");
        assert_eq!(dims.get(DimensionKind::Width), Some(100.0));
        assert_eq!(dims.get(DimensionKind::Height), Some(50.0));
    }

    #[test]
    fn test_by_pattern_shares_trailing_unit() {
        let dims = extract("box 2 x 3 cm");
        assert_eq!(dims.get(DimensionKind::Width), Some(20.0));
        assert_eq!(dims.get(DimensionKind::Height), Some(30.0));
    }

    #[test]
    fn test_by_pattern_for_round_shapes_sets_diameter() {
        let dims = extract("a disk 30 × 40 mm");
        assert_eq!(dims.get(DimensionKind::Diameter), Some(40.0));
        assert!(!dims.contains(DimensionKind::Width));
    }

    #[test]
    fn test_by_pattern_only_fills_gaps() {
        let dims = extract("width=7 panel 100 x 50");
        assert_eq!(dims.get(DimensionKind::Width), Some(7.0));
        assert_eq!(dims.get(DimensionKind::Height), Some(50.0));
    }

    #[test]
    fn test_bare_measurement_for_round_shape_is_halved() {
        let dims = extract("a round plate 80mm");
        assert_eq!(dims.get(DimensionKind::Radius), Some(40.0));
        assert_eq!(dims.len(), 1);
    }

    #[test]
    fn test_bare_measurement_for_other_shapes_is_square() {
        let dims = extract("square 2in");
        assert_eq!(dims.get(DimensionKind::Width), Some(50.8));
        assert_eq!(dims.get(DimensionKind::Height), Some(50.8));
    }

    #[test]
    fn test_bare_measurement_ignored_when_labeled_found() {
        let dims = extract("square 2in with height=10");
        assert_eq!(dims.get(DimensionKind::Height), Some(10.0));
        assert!(!dims.contains(DimensionKind::Width));
    }

    #[test]
    fn test_overflowing_conversion_is_dropped() {
        let huge = "9".repeat(308);
        let dims = extract(&format!("circle radius {huge} m"));
        assert!(!dims.contains(DimensionKind::Radius));
        assert!(dims.is_empty());

        let dims = extract(&format!("panel {huge} x 5 m"));
        assert!(dims.get(DimensionKind::Width).is_none_or(f64::is_finite));
        assert!(dims.get(DimensionKind::Height).is_none_or(f64::is_finite));

        let dims = extract(&format!("radius={huge}"));
        assert!(dims.get(DimensionKind::Radius).is_some_and(f64::is_finite));
    }

    #[test]
    fn test_nothing_recognizable() {
        assert!(extract("hello world").is_empty());
        assert!(extract("").is_empty());
    }
}
