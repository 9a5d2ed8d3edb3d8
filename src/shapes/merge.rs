//! Shape merger
//!
//! Approximates the outer boundary of a shape cluster without a boolean
//! polygon library:
//! 1. keep every edge whose midpoint is buried in at most `max_burial`
//!    other shapes,
//! 2. add all pairwise intersections between kept edges,
//! 3. deduplicate on a rounded grid,
//! 4. order the points by angle around their centroid.
//!
//! The angular ordering always yields a loop that is star-shaped around the
//! centroid, but for deeply concave clusters it is not the true union. The
//! generation pipeline validates the result and falls back when needed.

use std::collections::HashSet;
use std::f32::consts::TAU;

use crate::cartesian_to_polar;
use crate::geometry::{Point, Segment, centroid, edges, is_point_inside_polygon};
use crate::settings::MergeSettings;

use super::primitive::Shape;

/// Reduce a shape set to one ordered outline.
///
/// An empty set yields an empty outline; a single shape yields its own
/// vertices unchanged.
pub fn merge_shapes(shapes: &[Shape], settings: &MergeSettings) -> Vec<Point> {
    match shapes {
        [] => return Vec::new(),
        [only] => return only.vertices(),
        _ => {}
    }

    let polygons: Vec<Vec<Point>> = shapes.iter().map(Shape::vertices).collect();
    let boundary = visible_edges(&polygons, settings.max_burial);
    let crossings = edge_intersections(&boundary);

    let endpoints = boundary.iter().flat_map(|e| [e.start, e.end]);
    let points = dedupe_rounded(endpoints.chain(crossings), settings.dedupe_decimals);

    log::debug!(
        "merge: {} shapes, {} boundary edges, {} unique points",
        shapes.len(),
        boundary.len(),
        points.len()
    );

    order_radially(&points, settings.angle_tie_epsilon)
}

/// Edges whose midpoint lies inside at most `max_burial` shapes other than
/// the edge's owner
pub fn visible_edges(polygons: &[Vec<Point>], max_burial: usize) -> Vec<Segment> {
    let mut kept = Vec::new();
    for (owner, polygon) in polygons.iter().enumerate() {
        for edge in edges(polygon) {
            let mid = edge.midpoint();
            let burial = polygons
                .iter()
                .enumerate()
                .filter(|(other, poly)| *other != owner && is_point_inside_polygon(mid, poly))
                .count();
            if burial <= max_burial {
                kept.push(edge);
            }
        }
    }
    kept
}

/// Every intersection point between pairs of segments
pub fn edge_intersections(segments: &[Segment]) -> Vec<Point> {
    let mut points = Vec::new();
    for (i, a) in segments.iter().enumerate() {
        for b in &segments[i + 1..] {
            if let Some(p) = a.intersection(b) {
                points.push(p);
            }
        }
    }
    points
}

/// Keep the first point seen per grid cell of `10^-decimals` units
pub fn dedupe_rounded(points: impl IntoIterator<Item = Point>, decimals: u32) -> Vec<Point> {
    let factor = 10f32.powi(decimals as i32);
    let mut seen = HashSet::new();
    points
        .into_iter()
        .filter(|p| {
            let key = ((p.x * factor).round() as i64, (p.y * factor).round() as i64);
            seen.insert(key)
        })
        .collect()
}

/// Sort points by angle around their centroid.
///
/// Runs of points whose angles are within `tie_epsilon` of the run's first
/// angle are ordered by ascending distance from the centroid. Angles wrap, so
/// a run may straddle the ±π seam; such a run is moved to the front.
pub fn order_radially(points: &[Point], tie_epsilon: f32) -> Vec<Point> {
    let Ok(center) = centroid(points) else {
        return Vec::new();
    };

    let mut polar: Vec<(f32, f32, Point)> = points
        .iter()
        .map(|&p| {
            let (dist, angle) = cartesian_to_polar(p - center);
            (angle, dist, p)
        })
        .collect();
    polar.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));

    // Trailing points just below +π join the run at -π
    let seam = polar.first().map_or(0.0, |p| p.0) + TAU;
    let mut wrapped = 0;
    while wrapped + 1 < polar.len()
        && seam - polar[polar.len() - 1 - wrapped].0 < tie_epsilon
    {
        wrapped += 1;
    }
    polar.rotate_right(wrapped);
    for entry in &mut polar[..wrapped] {
        entry.0 -= TAU;
    }

    let mut start = 0;
    while start < polar.len() {
        let anchor = polar[start].0;
        let mut end = start + 1;
        while end < polar.len() && polar[end].0 - anchor < tie_epsilon {
            end += 1;
        }
        polar[start..end].sort_by(|a, b| a.1.total_cmp(&b.1));
        start = end;
    }

    polar.into_iter().map(|(_, _, p)| p).collect()
}
