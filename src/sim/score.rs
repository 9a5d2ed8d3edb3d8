//! Fill scoring

use super::state::Particle;
use crate::geometry::{Triangle, triangle_area};

/// Total triangulated area of the region
pub fn region_area(triangles: &[Triangle]) -> f32 {
    triangles.iter().map(triangle_area).sum()
}

/// Total disk area of all particles (overlaps counted twice)
pub fn filled_area(particles: &[Particle]) -> f32 {
    particles.iter().map(Particle::area).sum()
}

/// Particle area as a percentage of region area, clamped to `0..=100`.
///
/// An empty or zero-area region scores 0.
pub fn compute_fill_percentage(triangles: &[Triangle], particles: &[Particle]) -> f32 {
    let region = region_area(triangles);
    if region <= 0.0 {
        return 0.0;
    }
    (filled_area(particles) / region * 100.0).clamp(0.0, 100.0)
}
