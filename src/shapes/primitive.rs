//! Primitive shapes
//!
//! A shape stores only its origin, accumulated rotation and size parameters.
//! Vertices are recomputed from those on every call, so repeated
//! translate/rotate during placement search never accumulates drift.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::STAR_INNER_RATIO;
use crate::geometry::{Bounds, Point};
use crate::polar_to_cartesian;

/// Size parameters per primitive type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ShapeKind {
    /// Axis-aligned (before rotation) box
    Rectangle { width: f32, height: f32 },
    /// Regular polygon approximating a circle
    Circle { radius: f32, segments: u32 },
    /// Equilateral triangle with side `size`, apex up
    Triangle { size: f32 },
    /// Star alternating outer and inner (0.4x) radius
    Star { radius: f32, points: u32 },
}

/// A placed primitive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub origin: Point,
    /// Accumulated rotation (radians)
    pub angle: f32,
    pub kind: ShapeKind,
}

impl Shape {
    pub fn new(origin: Point, kind: ShapeKind) -> Self {
        Self {
            origin,
            angle: 0.0,
            kind,
        }
    }

    pub fn rectangle(origin: Point, width: f32, height: f32) -> Self {
        Self::new(origin, ShapeKind::Rectangle { width, height })
    }

    pub fn circle(origin: Point, radius: f32, segments: u32) -> Self {
        Self::new(
            origin,
            ShapeKind::Circle {
                radius,
                segments: segments.max(3),
            },
        )
    }

    pub fn triangle(origin: Point, size: f32) -> Self {
        Self::new(origin, ShapeKind::Triangle { size })
    }

    pub fn star(origin: Point, radius: f32, points: u32) -> Self {
        Self::new(
            origin,
            ShapeKind::Star {
                radius,
                points: points.max(2),
            },
        )
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.origin += Vec2::new(dx, dy);
    }

    /// Move the origin to `target`
    pub fn move_to(&mut self, target: Point) {
        let delta = target - self.origin;
        self.translate(delta.x, delta.y);
    }

    pub fn rotate(&mut self, delta_angle: f32) {
        self.angle = (self.angle + delta_angle).rem_euclid(TAU);
    }

    pub fn scale(&mut self, factor: f32) {
        match &mut self.kind {
            ShapeKind::Rectangle { width, height } => {
                *width *= factor;
                *height *= factor;
            }
            ShapeKind::Circle { radius, .. } | ShapeKind::Star { radius, .. } => {
                *radius *= factor;
            }
            ShapeKind::Triangle { size } => *size *= factor,
        }
    }

    /// Ordered outline of the shape in canvas space
    pub fn vertices(&self) -> Vec<Point> {
        match self.kind {
            ShapeKind::Rectangle { width, height } => {
                let (hw, hh) = (width / 2.0, height / 2.0);
                let corners = [
                    Vec2::new(-hw, -hh),
                    Vec2::new(hw, -hh),
                    Vec2::new(hw, hh),
                    Vec2::new(-hw, hh),
                ];
                self.place(&corners)
            }
            ShapeKind::Circle { radius, segments } => (0..segments)
                .map(|i| {
                    let theta = i as f32 / segments as f32 * TAU + self.angle;
                    self.origin + polar_to_cartesian(radius, theta)
                })
                .collect(),
            ShapeKind::Triangle { size } => {
                let height = size * 3.0_f32.sqrt() / 2.0;
                let corners = [
                    Vec2::new(0.0, -height / 2.0),
                    Vec2::new(size / 2.0, height / 2.0),
                    Vec2::new(-size / 2.0, height / 2.0),
                ];
                self.place(&corners)
            }
            ShapeKind::Star { radius, points } => {
                let inner = radius * STAR_INNER_RATIO;
                (0..points * 2)
                    .map(|i| {
                        let theta = i as f32 * PI / points as f32 + self.angle;
                        let r = if i % 2 == 0 { radius } else { inner };
                        self.origin + polar_to_cartesian(r, theta)
                    })
                    .collect()
            }
        }
    }

    /// Axis-aligned bounds; a circle reports its true disc bounds
    pub fn bounds(&self) -> Bounds {
        if let ShapeKind::Circle { radius, .. } = self.kind {
            return Bounds::new(
                self.origin.x - radius,
                self.origin.y - radius,
                self.origin.x + radius,
                self.origin.y + radius,
            );
        }
        let (x, y) = (self.origin.x, self.origin.y);
        Bounds::from_points(&self.vertices()).unwrap_or_else(|| Bounds::new(x, y, x, y))
    }

    /// Half of the larger bounds side
    pub fn half_extent(&self) -> f32 {
        let b = self.bounds();
        b.width().max(b.height()) * 0.5
    }

    /// Rotate local corners by the shape angle and move them to the origin
    fn place(&self, corners: &[Vec2]) -> Vec<Point> {
        let rotation = Vec2::from_angle(self.angle);
        corners
            .iter()
            .map(|&c| self.origin + rotation.rotate(c))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{centroid, is_point_inside_polygon, polygon_area};

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn test_rectangle_vertices_and_bounds() {
        let rect = Shape::rectangle(Vec2::new(50.0, 50.0), 20.0, 10.0);
        let v = rect.vertices();
        assert_eq!(v.len(), 4);
        assert!(close(v[0], Vec2::new(40.0, 45.0)));
        assert!(close(v[2], Vec2::new(60.0, 55.0)));
        let b = rect.bounds();
        assert!((b.width() - 20.0).abs() < 1e-4);
        assert!((polygon_area(&v) - 200.0).abs() < 1e-2);
    }

    #[test]
    fn test_rotation_is_recomputed_not_accumulated() {
        let mut rect = Shape::rectangle(Vec2::new(0.0, 0.0), 20.0, 10.0);
        let original = rect.vertices();
        // Ten full turns in sevenths
        for _ in 0..70 {
            rect.rotate(TAU / 7.0);
        }
        let v = rect.vertices();
        for (a, b) in original.iter().zip(&v) {
            assert!((*a - *b).length() < 1e-2, "{a:?} vs {b:?}");
        }
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let mut rect = Shape::rectangle(Vec2::ZERO, 20.0, 10.0);
        rect.rotate(PI / 2.0);
        let b = rect.bounds();
        assert!((b.width() - 10.0).abs() < 1e-3);
        assert!((b.height() - 20.0).abs() < 1e-3);
    }

    #[test]
    fn test_circle_segments() {
        let circle = Shape::circle(Vec2::new(10.0, 10.0), 5.0, 12);
        let v = circle.vertices();
        assert_eq!(v.len(), 12);
        for p in &v {
            assert!((p.distance(Vec2::new(10.0, 10.0)) - 5.0).abs() < 1e-4);
        }
        assert_eq!(circle.bounds(), Bounds::new(5.0, 5.0, 15.0, 15.0));
        assert_eq!(Shape::circle(Vec2::ZERO, 1.0, 1).vertices().len(), 3);
    }

    #[test]
    fn test_triangle_is_equilateral() {
        let tri = Shape::triangle(Vec2::ZERO, 10.0);
        let v = tri.vertices();
        assert_eq!(v.len(), 3);
        for i in 0..3 {
            assert!((v[i].distance(v[(i + 1) % 3]) - 10.0).abs() < 1e-4);
        }
        assert!(is_point_inside_polygon(Vec2::ZERO, &v));
    }

    #[test]
    fn test_star_alternates_radii() {
        let star = Shape::star(Vec2::ZERO, 10.0, 5);
        let v = star.vertices();
        assert_eq!(v.len(), 10);
        assert!((v[0].length() - 10.0).abs() < 1e-4);
        assert!((v[1].length() - 4.0).abs() < 1e-4);
        assert!(close(centroid(&v).unwrap(), Vec2::ZERO));
    }

    #[test]
    fn test_translate_and_scale() {
        let mut star = Shape::star(Vec2::ZERO, 10.0, 5);
        star.translate(5.0, -3.0);
        assert_eq!(star.origin, Vec2::new(5.0, -3.0));
        star.move_to(Vec2::new(100.0, 100.0));
        assert_eq!(star.origin, Vec2::new(100.0, 100.0));
        star.scale(2.0);
        assert_eq!(star.kind, ShapeKind::Star { radius: 20.0, points: 5 });
        // Outer tips at 72 and 288 degrees set the height
        assert!((star.half_extent() - 20.0 * 72.0_f32.to_radians().sin()).abs() < 0.1);
    }
}
