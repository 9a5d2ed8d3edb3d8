//! Polygon geometry kernel
//!
//! Pure functions over point lists. A polygon is an ordered `&[Point]` read
//! cyclically (the last vertex connects back to the first).
//!
//! Degenerate input is expected here: the shape pipeline probes candidate
//! polygons before it knows they are valid, so containment, intersection and
//! triangulation answer with safe defaults instead of errors.

pub mod triangulate;

pub use triangulate::triangulate;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{PARALLEL_EPSILON, POINT_EPSILON};
use crate::error::GeometryError;

/// A 2D point in canvas space (y grows downward)
pub type Point = Vec2;

/// Three corners of a triangle
pub type Triangle = [Point; 3];

/// A directed line segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn midpoint(&self) -> Point {
        (self.start + self.end) * 0.5
    }

    /// Intersection point with another segment, if any
    pub fn intersection(&self, other: &Segment) -> Option<Point> {
        segment_intersection(self.start, self.end, other.start, other.end)
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Bounds {
    pub fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Bounds of a point list, `None` when empty
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let mut bounds = Self::new(first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            bounds.min_x = bounds.min_x.min(p.x);
            bounds.min_y = bounds.min_y.min(p.y);
            bounds.max_x = bounds.max_x.max(p.x);
            bounds.max_y = bounds.max_y.max(p.y);
        }
        Some(bounds)
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    #[inline]
    pub fn center(&self) -> Point {
        Vec2::new(
            (self.min_x + self.max_x) * 0.5,
            (self.min_y + self.max_y) * 0.5,
        )
    }

    /// Shrink every side by `margin`
    pub fn inset(&self, margin: f32) -> Bounds {
        Bounds::new(
            self.min_x + margin,
            self.min_y + margin,
            self.max_x - margin,
            self.max_y - margin,
        )
    }

    /// True if `other` lies entirely within this box (edges inclusive)
    pub fn contains(&self, other: &Bounds) -> bool {
        other.min_x >= self.min_x
            && other.min_y >= self.min_y
            && other.max_x <= self.max_x
            && other.max_y <= self.max_y
    }
}

/// Ray-casting parity test.
///
/// The strict `>` on y makes a ray passing exactly through a vertex count the
/// two edges sharing it once. Fewer than 3 vertices is never "inside".
pub fn is_point_inside_polygon(point: Point, vertices: &[Point]) -> bool {
    if vertices.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let vi = vertices[i];
        let vj = vertices[j];
        if (vi.y > point.y) != (vj.y > point.y) {
            let x_cross = (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x;
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Intersection of segments `a1-a2` and `b1-b2`.
///
/// Parallel and collinear segments (determinant near zero) yield `None`
/// rather than an infinite solution set.
pub fn segment_intersection(a1: Point, a2: Point, b1: Point, b2: Point) -> Option<Point> {
    let d = a2 - a1;
    let e = b2 - b1;
    let denom = d.perp_dot(e);
    if denom.abs() < PARALLEL_EPSILON {
        return None;
    }

    let offset = b1 - a1;
    let t = offset.perp_dot(e) / denom;
    let u = offset.perp_dot(d) / denom;

    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(a1 + d * t)
    } else {
        None
    }
}

/// Arithmetic mean of the points
pub fn centroid(points: &[Point]) -> Result<Point, GeometryError> {
    if points.is_empty() {
        return Err(GeometryError::EmptyInput);
    }
    let sum: Vec2 = points.iter().copied().sum();
    Ok(sum / points.len() as f32)
}

/// Consecutive vertex pairs, wrapping from the last vertex to the first
pub fn edges(vertices: &[Point]) -> Vec<Segment> {
    if vertices.len() < 2 {
        return Vec::new();
    }
    (0..vertices.len())
        .map(|i| Segment::new(vertices[i], vertices[(i + 1) % vertices.len()]))
        .collect()
}

/// Shoelace area, positive when vertices wind with increasing angle
/// (counter-clockwise in y-up math coordinates)
pub fn signed_area(vertices: &[Point]) -> f32 {
    if vertices.len() < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for i in 0..vertices.len() {
        let a = vertices[i];
        let b = vertices[(i + 1) % vertices.len()];
        twice += a.perp_dot(b);
    }
    twice * 0.5
}

/// Unsigned polygon area
pub fn polygon_area(vertices: &[Point]) -> f32 {
    signed_area(vertices).abs()
}

/// Unsigned triangle area via the cross product
#[inline]
pub fn triangle_area(tri: &Triangle) -> f32 {
    ((tri[1] - tri[0]).perp_dot(tri[2] - tri[0])).abs() * 0.5
}

/// True if no two non-adjacent edges of the closed loop intersect.
///
/// Collinear overlaps are not detected (they read as parallel), which is
/// acceptable for the outlines the merger produces.
pub fn is_simple_polygon(vertices: &[Point]) -> bool {
    let n = vertices.len();
    if n < 3 {
        return false;
    }
    let segs = edges(vertices);
    for i in 0..n {
        for j in (i + 1)..n {
            let adjacent = j == i + 1 || (i == 0 && j == n - 1);
            if adjacent {
                continue;
            }
            if segs[i].intersection(&segs[j]).is_some() {
                return false;
            }
        }
    }
    true
}

/// Drop points that repeat their predecessor (cyclically) within `epsilon`
pub fn dedupe_consecutive(points: &[Point], epsilon: f32) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(points.len());
    for &p in points {
        if out.last().is_none_or(|last| !points_equal(*last, p, epsilon)) {
            out.push(p);
        }
    }
    while out.len() > 1 && points_equal(out[0], out[out.len() - 1], epsilon) {
        out.pop();
    }
    out
}

#[inline]
pub fn points_equal(a: Point, b: Point, epsilon: f32) -> bool {
    (a.x - b.x).abs() < epsilon && (a.y - b.y).abs() < epsilon
}

/// A point strictly inside the polygon, preferring the centroid.
///
/// Concave outlines can have their centroid outside; the centroid of the
/// first vertex-triangle that lands inside is used then.
pub fn interior_point(vertices: &[Point]) -> Option<Point> {
    let center = centroid(vertices).ok()?;
    if is_point_inside_polygon(center, vertices) {
        return Some(center);
    }

    let n = vertices.len();
    (0..n).find_map(|i| {
        let prev = vertices[(i + n - 1) % n];
        let next = vertices[(i + 1) % n];
        let candidate = (prev + vertices[i] + next) / 3.0;
        is_point_inside_polygon(candidate, vertices).then_some(candidate)
    })
}

/// Ramer-Douglas-Peucker simplification of an open polyline.
///
/// The first and last points are always kept.
pub fn simplify_outline(points: &[Point], tolerance: f32) -> Vec<Point> {
    if points.len() <= 2 {
        return points.to_vec();
    }

    let first = points[0];
    let last = points[points.len() - 1];
    let (max_index, max_distance) = points[1..points.len() - 1]
        .iter()
        .enumerate()
        .map(|(i, &p)| (i + 1, perpendicular_distance(p, first, last)))
        .fold((0, 0.0_f32), |best, cur| if cur.1 > best.1 { cur } else { best });

    if max_distance > tolerance {
        let mut left = simplify_outline(&points[..=max_index], tolerance);
        let right = simplify_outline(&points[max_index..], tolerance);
        left.pop();
        left.extend(right);
        left
    } else {
        vec![first, last]
    }
}

fn perpendicular_distance(point: Point, start: Point, end: Point) -> f32 {
    let line = end - start;
    let len = line.length();
    if len < POINT_EPSILON {
        return point.distance(start);
    }
    line.perp_dot(point - start).abs() / len
}

/// Uniform scale and offset that fits one box into a canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasFit {
    pub scale: f32,
    pub offset: Vec2,
}

impl CanvasFit {
    /// Fit `bounds` into `fraction` of a `width` x `height` canvas, centered
    pub fn new(bounds: &Bounds, width: f32, height: f32, fraction: f32) -> Self {
        let span_x = bounds.width().max(POINT_EPSILON);
        let span_y = bounds.height().max(POINT_EPSILON);
        let scale = ((width * fraction) / span_x).min((height * fraction) / span_y);
        let canvas_center = Vec2::new(width * 0.5, height * 0.5);
        Self {
            scale,
            offset: canvas_center - bounds.center() * scale,
        }
    }

    #[inline]
    pub fn apply(&self, p: Point) -> Point {
        p * self.scale + self.offset
    }
}
