use geo_types::{Coord, LineString};

/// Douglas-Peucker approximation of a closed ring using geo's implementation.
///
/// The ring is closed before simplifying so the start point is not forced
/// to survive as a corner on its own merit; the returned polygon is open
/// (no repeated closing point), so its length is the vertex count.
pub fn approximate_polygon(points: &[[f64; 2]], epsilon: f64) -> Vec<[f64; 2]> {
    use geo::Simplify;

    if points.len() < 3 {
        return points.to_vec();
    }

    let mut coords: Vec<Coord<f64>> = points.iter().map(|&[x, y]| Coord { x, y }).collect();
    coords.push(coords[0]);

    let simplified = LineString::new(coords).simplify(&epsilon);
    let mut approx: Vec<[f64; 2]> = simplified.coords().map(|coord| [coord.x, coord.y]).collect();

    if approx.len() > 1 && approx.first() == approx.last() {
        approx.pop();
    }
    approx
}
