//! Ear-clipping triangulation
//!
//! Outlines are small (tens of points), so the O(n²) search per clipped ear is
//! fine. A polygon that runs out of ears (self-intersecting input) yields the
//! triangles found so far; an empty result tells the caller to fall back.

use super::{Point, Triangle, points_equal, signed_area};

const DUPLICATE_EPSILON: f32 = 1e-6;

/// Triangulate a closed outline by repeatedly clipping ears.
pub fn triangulate(outline: &[Point]) -> Vec<Triangle> {
    let n = outline.len();
    if n < 3 {
        return Vec::new();
    }

    // Work in positive winding so "ear" means non-negative signed area
    let mut indices: Vec<usize> = if signed_area(outline) < 0.0 {
        (0..n).rev().collect()
    } else {
        (0..n).collect()
    };

    let mut triangles = Vec::with_capacity(n - 2);
    let budget = 2 * n;
    let mut iterations = 0;

    while indices.len() > 3 && iterations < budget {
        iterations += 1;

        let Some(ear) = find_ear(outline, &indices) else {
            log::debug!(
                "triangulate: no ear among {} remaining vertices",
                indices.len()
            );
            break;
        };

        let len = indices.len();
        let prev = indices[(ear + len - 1) % len];
        let next = indices[(ear + 1) % len];
        triangles.push([outline[prev], outline[indices[ear]], outline[next]]);
        indices.remove(ear);
    }

    if indices.len() == 3 {
        triangles.push([
            outline[indices[0]],
            outline[indices[1]],
            outline[indices[2]],
        ]);
    }

    triangles
}

/// Position (within `indices`) of the first clippable ear
fn find_ear(outline: &[Point], indices: &[usize]) -> Option<usize> {
    let len = indices.len();
    (0..len).find(|&i| {
        let a = outline[indices[(i + len - 1) % len]];
        let b = outline[indices[i]];
        let c = outline[indices[(i + 1) % len]];
        is_ear(a, b, c, outline, indices)
    })
}

fn is_ear(a: Point, b: Point, c: Point, outline: &[Point], indices: &[usize]) -> bool {
    // Reflex corner
    if (b - a).perp_dot(c - b) < 0.0 {
        return false;
    }

    indices.iter().map(|&idx| outline[idx]).all(|p| {
        let is_corner = points_equal(p, a, DUPLICATE_EPSILON)
            || points_equal(p, b, DUPLICATE_EPSILON)
            || points_equal(p, c, DUPLICATE_EPSILON);
        is_corner || !strictly_inside_triangle(p, a, b, c)
    })
}

/// Barycentric sign test; points on an edge are not inside
fn strictly_inside_triangle(p: Point, a: Point, b: Point, c: Point) -> bool {
    let d1 = (b - a).perp_dot(p - a);
    let d2 = (c - b).perp_dot(p - b);
    let d3 = (a - c).perp_dot(p - c);
    (d1 > 0.0 && d2 > 0.0 && d3 > 0.0) || (d1 < 0.0 && d2 < 0.0 && d3 < 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{polygon_area, triangle_area};
    use glam::Vec2;

    fn total_area(tris: &[Triangle]) -> f32 {
        tris.iter().map(triangle_area).sum()
    }

    #[test]
    fn test_square_two_triangles() {
        let sq = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ];
        let tris = triangulate(&sq);
        assert_eq!(tris.len(), 2);
        assert!((total_area(&tris) - 100.0).abs() < 1e-4);
    }

    #[test]
    fn test_clockwise_input() {
        let sq = vec![
            Vec2::new(0.0, 10.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(0.0, 0.0),
        ];
        let tris = triangulate(&sq);
        assert_eq!(tris.len(), 2);
        assert!((total_area(&tris) - 100.0).abs() < 1e-4);
    }

    #[test]
    fn test_concave_area_conserved() {
        let u = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(4.0, 0.0),
            Vec2::new(4.0, 6.0),
            Vec2::new(6.0, 6.0),
            Vec2::new(6.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ];
        let tris = triangulate(&u);
        assert_eq!(tris.len(), u.len() - 2);
        assert!((total_area(&tris) - polygon_area(&u)).abs() < 1e-3);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(triangulate(&[]).is_empty());
        assert!(triangulate(&[Vec2::ZERO, Vec2::ONE]).is_empty());
        let tri = [Vec2::ZERO, Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)];
        assert_eq!(triangulate(&tri).len(), 1);
    }

    #[test]
    fn test_self_intersecting_does_not_hang() {
        let bowtie = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(0.0, 10.0),
        ];
        let tris = triangulate(&bowtie);
        assert!(tris.len() <= 2);
    }
}
