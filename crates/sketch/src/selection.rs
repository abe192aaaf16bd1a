use fabricator_common::{Geometry, Point2D, ShapeHint, ShapeRecord, Source};
use tracing::{info, warn};

use crate::detection::Hypothesis;

pub const FALLBACK_RADIUS: f64 = 50.0;
pub const FALLBACK_CONFIDENCE: f64 = 50.0;

/// Record returned when no contour produced any hypothesis
pub fn fallback_record() -> ShapeRecord {
    ShapeRecord::new(
        Geometry::circle(FALLBACK_RADIUS),
        Point2D::origin(),
        FALLBACK_CONFIDENCE,
        Source::SketchInput,
    )
    .with_vertices(0)
}

/// Pick the winning hypothesis.
///
/// With a shape hint, the best hypothesis of that kind wins whenever one
/// exists, however confident the others are. Otherwise the most confident
/// hypothesis overall wins. Ties go to the earliest hypothesis.
pub fn select_best(hypotheses: &[Hypothesis], hint: ShapeHint) -> Option<&Hypothesis> {
    if let Some(kind) = hint.shape() {
        if let Some(best) = stable_max(hypotheses.iter().filter(|h| h.kind == kind)) {
            return Some(best);
        }
    }
    stable_max(hypotheses.iter())
}

/// Selected hypothesis as a record, or the fallback circle
pub fn select_record(hypotheses: &[Hypothesis], hint: ShapeHint) -> ShapeRecord {
    match select_best(hypotheses, hint) {
        Some(best) => {
            info!(kind = %best.kind, confidence = best.confidence, %hint, "selected hypothesis");
            best.to_record()
        }
        None => {
            warn!("no shape hypotheses; using fallback circle");
            fallback_record()
        }
    }
}

/// Maximum by confidence keeping the first of equal elements
fn stable_max<'a>(hypotheses: impl Iterator<Item = &'a Hypothesis>) -> Option<&'a Hypothesis> {
    hypotheses.fold(None, |best: Option<&Hypothesis>, candidate| match best {
        Some(current) if candidate.confidence <= current.confidence => Some(current),
        _ => Some(candidate),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::types::{Contour, ContourCandidate};
    use fabricator_common::ShapeKind;

    fn hypothesis(geometry: Geometry, confidence: f64, x: f64) -> Hypothesis {
        let candidate = Arc::new(ContourCandidate::new(Contour::new(vec![])));
        Hypothesis::new(geometry, Point2D::new(x, 0.0), confidence, 0, candidate)
    }

    #[test]
    fn test_fallback_when_empty() {
        assert!(select_best(&[], ShapeHint::Auto).is_none());

        let record = select_record(&[], ShapeHint::Shape(ShapeKind::Hexagon));
        assert_eq!(record.kind(), ShapeKind::Circle);
        assert_eq!(record.geometry(), &Geometry::circle(50.0));
        assert_eq!(record.center(), Point2D::origin());
        assert_eq!(record.confidence(), 50.0);
        assert_eq!(record.vertices(), 0);
        assert_eq!(record.source(), Source::SketchInput);
    }

    #[test]
    fn test_highest_confidence_wins() {
        let hypotheses = vec![
            hypothesis(Geometry::circle(10.0), 71.0, 0.0),
            hypothesis(Geometry::rectangle(5.0, 5.0), 93.0, 1.0),
            hypothesis(Geometry::triangle(5.0, 5.0), 88.0, 2.0),
        ];
        let best = select_best(&hypotheses, ShapeHint::Auto).expect("Should select");
        assert_eq!(best.kind, ShapeKind::Rectangle);
    }

    #[test]
    fn test_ties_go_to_first() {
        let hypotheses = vec![
            hypothesis(Geometry::circle(10.0), 90.0, 0.0),
            hypothesis(Geometry::hexagon(5.0), 90.0, 1.0),
            hypothesis(Geometry::circle(12.0), 90.0, 2.0),
        ];
        let best = select_best(&hypotheses, ShapeHint::Auto).expect("Should select");
        assert_eq!(best.center.x, 0.0);

        let hinted = select_best(&hypotheses, ShapeHint::Shape(ShapeKind::Circle)).expect("Should select");
        assert_eq!(hinted.center.x, 0.0);
    }

    #[test]
    fn test_hint_beats_confidence() {
        let hypotheses = vec![
            hypothesis(Geometry::circle(10.0), 99.0, 0.0),
            hypothesis(Geometry::hexagon(5.0), 60.0, 1.0),
            hypothesis(Geometry::hexagon(6.0), 75.0, 2.0),
        ];
        let best = select_best(&hypotheses, ShapeHint::Shape(ShapeKind::Hexagon)).expect("Should select");
        assert_eq!(best.kind, ShapeKind::Hexagon);
        assert_eq!(best.confidence, 75.0);
    }

    #[test]
    fn test_unmatched_hint_falls_back_to_global_best() {
        let hypotheses = vec![
            hypothesis(Geometry::circle(10.0), 80.0, 0.0),
            hypothesis(Geometry::rectangle(5.0, 5.0), 85.0, 1.0),
        ];
        let best = select_best(&hypotheses, ShapeHint::Shape(ShapeKind::Triangle)).expect("Should select");
        assert_eq!(best.kind, ShapeKind::Rectangle);
    }
}
