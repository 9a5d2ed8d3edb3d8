//! Wall containment and particle-particle contact
//!
//! Neither test is continuous: a particle moving faster than its radius per
//! tick can tunnel. Gravity and damping keep speeds low enough in practice.

use glam::Vec2;

use crate::geometry::{Point, centroid, interior_point, is_point_inside_polygon};

/// Overlap between two particle disks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit vector from the other particle toward this one
    pub normal: Vec2,
    /// How far the disks overlap
    pub penetration: f32,
}

/// Contact between particle `a` and particle `b`, seen from `a`.
///
/// Exactly coincident centers are split along the x axis; the lower id moves
/// left so both sides of the pair agree.
pub fn particle_contact(
    a_id: u32,
    a_pos: Vec2,
    a_radius: f32,
    b_id: u32,
    b_pos: Vec2,
    b_radius: f32,
) -> Option<Contact> {
    let min_dist = a_radius + b_radius;
    let offset = a_pos - b_pos;
    let dist = offset.length();
    if dist >= min_dist {
        return None;
    }

    let normal = if dist > f32::EPSILON {
        offset / dist
    } else if a_id < b_id {
        Vec2::NEG_X
    } else {
        Vec2::X
    };

    Some(Contact {
        normal,
        penetration: min_dist - dist,
    })
}

/// Pushes escaped particles back inside an outline.
///
/// Built once per tick: the centroid and the fallback position only depend on
/// the outline.
#[derive(Debug, Clone)]
pub struct Containment<'a> {
    outline: &'a [Point],
    centroid: Point,
    fallback: Point,
    step: f32,
    max_steps: u32,
}

impl<'a> Containment<'a> {
    /// `None` for outlines that cannot contain anything (fewer than 3 points)
    pub fn new(outline: &'a [Point], step: f32, max_steps: u32) -> Option<Self> {
        if outline.len() < 3 {
            return None;
        }
        let centroid = centroid(outline).ok()?;
        let fallback = interior_point(outline).unwrap_or(centroid);
        Some(Self {
            outline,
            centroid,
            fallback,
            step,
            max_steps,
        })
    }

    pub fn contains(&self, pos: Point) -> bool {
        is_point_inside_polygon(pos, self.outline)
    }

    /// Walk `pos` toward the centroid in fixed steps until it is inside.
    ///
    /// Returns `None` when `pos` was already inside. When the walk reaches the
    /// centroid without entering the outline, or runs out of steps, the
    /// particle lands on the fallback interior point.
    pub fn correct(&self, pos: Point) -> Option<Point> {
        if self.contains(pos) {
            return None;
        }

        let mut current = pos;
        for _ in 0..self.max_steps {
            let to_center = self.centroid - current;
            if to_center.length() <= self.step {
                if self.contains(self.centroid) {
                    return Some(self.centroid);
                }
                break;
            }
            current += to_center.normalize() * self.step;
            if self.contains(current) {
                return Some(current);
            }
        }

        log::debug!("containment: {pos} snapped to fallback {}", self.fallback);
        Some(self.fallback)
    }
}
