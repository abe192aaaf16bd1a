//! Compiled pattern tables shared by the text pipeline.
//!
//! Everything here is built once and only ever read afterwards.

use std::sync::LazyLock;

use fabricator_common::ShapeKind;
use regex::Regex;
use strum::IntoEnumIterator;

use crate::dimensions::DimensionKind;
use crate::units::LengthUnit;

const NUMBER: &str = r"(\d+(?:\.\d+)?)";

/// Standalone abbreviations and synonyms rewritten during normalization
const ALIASES: &[(&str, &str)] = &[
    (r"\b(?:r|radius)\b", "radius"),
    (r"\b(?:d|diameter)\b", "diameter"),
    (r"\b(?:w|width)\b", "width"),
    (r"\b(?:h|height)\b", "height"),
    (r"\b(?:l|length)\b", "length"),
    (r"\b(?:s|side)\b", "side"),
    (r"\bside length\b", "side"),
    (r"\bbase\b", "width"),
];

/// Words that mark an explicitly named shape (confidence boost)
const EXPLICIT_SHAPE_WORDS: &[&str] = &["circle", "rectangle", "triangle", "hexagon"];

static SHARED: LazyLock<TextVocabulary> =
    LazyLock::new(|| TextVocabulary::new().expect("built-in text patterns are valid"));

/// Immutable regex tables for normalization, classification and extraction
#[derive(Debug)]
pub struct TextVocabulary {
    whitespace: Regex,
    aliases: Vec<(Regex, &'static str)>,
    shape_groups: Vec<(ShapeKind, Regex)>,
    dimension_patterns: Vec<(DimensionKind, Regex)>,
    size_pair: Regex,
    bare_measurement: Regex,
    unit_token: Regex,
}

impl TextVocabulary {
    /// Compile every pattern
    pub fn new() -> Result<Self, regex::Error> {
        let units = LengthUnit::pattern_alternation();

        let aliases = ALIASES
            .iter()
            .map(|(pattern, replacement)| Ok((Regex::new(pattern)?, *replacement)))
            .collect::<Result<Vec<_>, regex::Error>>()?;

        let shape_groups = ShapeKind::iter()
            .map(|kind| Ok((kind, Regex::new(&format!(r"\b(?:{})\b", shape_synonyms(kind)))?)))
            .collect::<Result<Vec<_>, regex::Error>>()?;

        let dimension_patterns = DimensionKind::iter()
            .map(|kind| {
                let pattern = format!(r"\b{kind}\s*[=:]?\s*{NUMBER}\s*([a-z]+)?\b");
                Ok((kind, Regex::new(&pattern)?))
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;

        Ok(Self {
            whitespace: Regex::new(r"\s+")?,
            aliases,
            shape_groups,
            dimension_patterns,
            size_pair: Regex::new(&format!(
                r"{NUMBER}\s*({units})?\s*(?:by|x|×)\s*{NUMBER}\s*(?:({units})\b)?"
            ))?,
            bare_measurement: Regex::new(&format!(r"{NUMBER}\s*({units})\b"))?,
            unit_token: Regex::new(&format!(r"(?:^|[^a-z])(?:{units})\b"))?,
        })
    }

    /// The process-wide vocabulary
    pub fn shared() -> &'static TextVocabulary {
        &SHARED
    }

    /// Lower-case, collapse whitespace and expand label aliases
    pub fn normalize(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        let mut normalized = self.whitespace.replace_all(&lowered, " ").into_owned();
        for (pattern, replacement) in &self.aliases {
            normalized = pattern.replace_all(&normalized, *replacement).into_owned();
        }
        normalized.trim().to_string()
    }

    /// Keyword groups in evaluation order
    pub fn shape_groups(&self) -> &[(ShapeKind, Regex)] {
        &self.shape_groups
    }

    /// Labeled dimension patterns; capture 1 is the number, capture 2 the unit word
    pub fn dimension_patterns(&self) -> &[(DimensionKind, Regex)] {
        &self.dimension_patterns
    }

    /// "A by B" pattern; captures: A, unit of A, B, unit of B
    pub fn size_pair(&self) -> &Regex {
        &self.size_pair
    }

    /// "<number> <unit>" pattern; captures: number, unit
    pub fn bare_measurement(&self) -> &Regex {
        &self.bare_measurement
    }

    /// True when the text uses circle vocabulary (circle, round, disk, ...)
    pub fn mentions_round(&self, text: &str) -> bool {
        self.shape_groups
            .iter()
            .any(|(kind, pattern)| *kind == ShapeKind::Circle && pattern.is_match(text))
    }

    /// True when a length unit appears as a token of its own or right after a number
    pub fn mentions_unit(&self, text: &str) -> bool {
        self.unit_token.is_match(text)
    }

    /// True when one of the primary shape names appears in the text
    pub fn names_shape(&self, text: &str) -> bool {
        EXPLICIT_SHAPE_WORDS.iter().any(|word| text.contains(word))
    }
}

fn shape_synonyms(kind: ShapeKind) -> &'static str {
    match kind {
        ShapeKind::Circle => "circle|round|circular|disk|ring",
        ShapeKind::Rectangle => "rectangle|rect|square|box|rectangular",
        ShapeKind::Triangle => "triangle|triangular|pyramid",
        ShapeKind::Hexagon => "hexagon|hex|hexagonal",
        ShapeKind::Polygon => "polygon|poly|shape|figure",
    }
}
