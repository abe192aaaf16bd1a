use fabricator_common::Point2D;
use geo_types::{Coord, LineString};

use crate::types::EnclosingCircle;

const CONTAINMENT_EPSILON: f64 = 1e-7;

/// Smallest circle containing every point.
///
/// The candidate set is first reduced to the convex hull, then the
/// incremental (Welzl style) construction runs over the hull vertices.
/// Returns `None` for an empty input.
pub fn min_enclosing_circle(points: &[[f64; 2]]) -> Option<EnclosingCircle> {
    let hull = convex_hull(points);
    let (&first, rest) = hull.split_first()?;

    let mut circle = Circle::point(first);
    for (i, &p) in rest.iter().enumerate() {
        if circle.contains(p) {
            continue;
        }
        circle = Circle::point(p);
        for (j, &q) in hull[..=i].iter().enumerate() {
            if circle.contains(q) {
                continue;
            }
            circle = Circle::diameter(p, q);
            for &r in &hull[..j] {
                if !circle.contains(r) {
                    circle = Circle::through(p, q, r);
                }
            }
        }
    }

    Some(EnclosingCircle {
        center: Point2D::new(circle.center[0], circle.center[1]),
        radius: circle.radius,
    })
}

fn convex_hull(points: &[[f64; 2]]) -> Vec<[f64; 2]> {
    use geo::ConvexHull;

    if points.len() < 3 {
        return points.to_vec();
    }

    let line = LineString::new(points.iter().map(|&[x, y]| Coord { x, y }).collect());
    let hull = line.convex_hull();
    let mut vertices: Vec<[f64; 2]> = hull.exterior().coords().map(|c| [c.x, c.y]).collect();
    if vertices.len() > 1 && vertices.first() == vertices.last() {
        vertices.pop();
    }
    if vertices.is_empty() {
        // Collinear input can produce an empty hull
        return points.to_vec();
    }
    vertices
}

#[derive(Debug, Clone, Copy)]
struct Circle {
    center: [f64; 2],
    radius: f64,
}

impl Circle {
    fn point(p: [f64; 2]) -> Self {
        Self { center: p, radius: 0.0 }
    }

    fn diameter(a: [f64; 2], b: [f64; 2]) -> Self {
        let center = [(a[0] + b[0]) / 2.0, (a[1] + b[1]) / 2.0];
        Self { center, radius: distance(center, a) }
    }

    /// Circumcircle of three points, or the widest two-point circle when
    /// they are collinear
    fn through(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> Self {
        let (bx, by) = (b[0] - a[0], b[1] - a[1]);
        let (cx, cy) = (c[0] - a[0], c[1] - a[1]);
        let d = 2.0 * (bx * cy - by * cx);

        if d.abs() < f64::EPSILON {
            return [Self::diameter(a, b), Self::diameter(a, c), Self::diameter(b, c)]
                .into_iter()
                .fold(Self::point(a), |widest, circle| {
                    if circle.radius > widest.radius { circle } else { widest }
                });
        }

        let b2 = bx * bx + by * by;
        let c2 = cx * cx + cy * cy;
        let ux = (cy * b2 - by * c2) / d;
        let uy = (bx * c2 - cx * b2) / d;
        let center = [a[0] + ux, a[1] + uy];
        Self { center, radius: (ux * ux + uy * uy).sqrt() }
    }

    fn contains(&self, p: [f64; 2]) -> bool {
        distance(self.center, p) <= self.radius + CONTAINMENT_EPSILON * self.radius.max(1.0)
    }
}

fn distance(a: [f64; 2], b: [f64; 2]) -> f64 {
    ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)).sqrt()
}
