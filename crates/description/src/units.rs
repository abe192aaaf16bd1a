use std::str::FromStr;

use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Length units recognized in shape descriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum LengthUnit {
    #[strum(to_string = "mm", serialize = "millimeter", serialize = "millimeters")]
    Millimeter,
    #[strum(to_string = "cm", serialize = "centimeter", serialize = "centimeters")]
    Centimeter,
    #[strum(to_string = "m", serialize = "meter", serialize = "meters")]
    Meter,
    #[strum(to_string = "in", serialize = "inch", serialize = "inches")]
    Inch,
    #[strum(to_string = "ft", serialize = "foot", serialize = "feet")]
    Foot,
}

impl LengthUnit {
    /// Millimeters per one of this unit
    pub fn millimeters(self) -> f64 {
        match self {
            Self::Millimeter => 1.0,
            Self::Centimeter => 10.0,
            Self::Meter => 1000.0,
            Self::Inch => 25.4,
            Self::Foot => 304.8,
        }
    }

    /// Every spelling accepted for this unit
    pub fn tokens(self) -> &'static [&'static str] {
        match self {
            Self::Millimeter => &["mm", "millimeter", "millimeters"],
            Self::Centimeter => &["cm", "centimeter", "centimeters"],
            Self::Meter => &["m", "meter", "meters"],
            Self::Inch => &["in", "inch", "inches"],
            Self::Foot => &["ft", "foot", "feet"],
        }
    }

    /// Regex alternation of every unit token, longest first so that a
    /// prefix such as `m` never shadows `mm` or `meters`
    pub fn pattern_alternation() -> String {
        let mut tokens: Vec<&str> = Self::iter().flat_map(|unit| unit.tokens().iter().copied()).collect();
        tokens.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
        tokens.join("|")
    }
}

/// Convert `value` expressed in `unit` to millimeters.
///
/// Unknown tokens leave the value unchanged (it is taken to already be in
/// millimeters).
pub fn to_millimeters(value: f64, unit: &str) -> f64 {
    match LengthUnit::from_str(unit.trim()) {
        Ok(unit) => value * unit.millimeters(),
        Err(_) => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_units() {
        assert_eq!(to_millimeters(5.0, "cm"), 50.0);
        assert_eq!(to_millimeters(5.0, "mm"), 5.0);
        assert_eq!(to_millimeters(2.0, "m"), 2000.0);
        assert_eq!(to_millimeters(2.0, "inches"), 50.8);
        assert_eq!(to_millimeters(1.0, "feet"), 304.8);
    }

    #[test]
    fn test_units_ignore_case() {
        assert_eq!(to_millimeters(5.0, "CM"), 50.0);
        assert_eq!(to_millimeters(1.0, "Inch"), 25.4);
        assert_eq!(to_millimeters(3.0, "Millimeters"), 3.0);
    }

    #[test]
    fn test_unknown_unit_is_identity() {
        assert_eq!(to_millimeters(5.0, "xyz"), 5.0);
        assert_eq!(to_millimeters(7.5, ""), 7.5);
    }

    #[test]
    fn test_every_token_parses_to_its_unit() {
        for unit in LengthUnit::iter() {
            for token in unit.tokens() {
                assert_eq!(token.parse::<LengthUnit>().unwrap(), unit, "token {token}");
            }
        }
    }

    #[test]
    fn test_pattern_alternation_is_longest_first() {
        let alternation = LengthUnit::pattern_alternation();
        let position = |token: &str| {
            alternation
                .split('|')
                .position(|t| t == token)
                .unwrap()
        };
        assert!(position("mm") < position("m"));
        assert!(position("meters") < position("meter"));
        assert!(position("inches") < position("in"));
        assert_eq!(alternation.split('|').count(), 15);
    }
}
