//! Ball Packing - fill a procedurally generated shape with falling balls
//!
//! Core modules:
//! - `geometry`: Pure polygon helpers (containment, intersections, triangulation)
//! - `shapes`: Primitive shapes, the composer/merger pipeline and spout selection
//! - `sim`: Deterministic particle simulation, scoring and the session state machine
//! - `outline`: External outline documents (alternative playfield source)
//! - `settings`: Data-driven tuning, loadable from JSON

pub mod error;
pub mod geometry;
pub mod outline;
pub mod settings;
pub mod shapes;
pub mod sim;

pub use error::{GeometryError, OutlineError, SettingsError};
pub use geometry::{Point, Triangle};
pub use settings::{QualityPreset, Settings};
pub use shapes::{Playfield, generate_compound_shape};
pub use sim::{FillSession, Particle, compute_fill_percentage, step_simulation};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Default canvas dimensions
    pub const CANVAS_WIDTH: f32 = 400.0;
    pub const CANVAS_HEIGHT: f32 = 400.0;

    /// Downward acceleration per tick (screen y grows downward)
    pub const GRAVITY: f32 = 0.5;
    /// Velocity multiplier applied on wall or particle contact
    pub const BOUNCE_FACTOR: f32 = 0.5;
    /// Per-tick velocity damping
    pub const DAMPING: f32 = 0.99;
    /// Distance moved toward the centroid per containment iteration
    pub const CORRECTION_STEP: f32 = 0.5;
    /// Containment iterations before snapping to the fallback position
    pub const MAX_CORRECTION_STEPS: u32 = 4096;

    /// Fill percentage that wins the round
    pub const WIN_PERCENTAGE: f32 = 90.0;

    /// Primitive shapes per compound shape (inclusive)
    pub const MIN_SHAPES: usize = 3;
    pub const MAX_SHAPES: usize = 10;
    /// Placement attempts per shape before giving up on it
    pub const PLACEMENT_ATTEMPTS: u32 = 80;

    /// Spouts per playfield (inclusive)
    pub const MIN_SPOUTS: usize = 1;
    pub const MAX_SPOUTS: usize = 3;

    /// Star inner radius as a fraction of the outer radius
    pub const STAR_INNER_RATIO: f32 = 0.4;

    /// Two outline points closer than this are considered the same point
    pub const POINT_EPSILON: f32 = 1e-3;
    /// Determinant magnitude below which segments count as parallel
    pub const PARALLEL_EPSILON: f32 = 1e-6;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta)
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), pos.y.atan2(pos.x))
}

/// Pack an HSL color (hue in degrees, saturation/lightness in 0..=1) as 0xRRGGBB
pub fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> u32 {
    let h = hue.rem_euclid(360.0) / 60.0;
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = lightness - c / 2.0;
    let channel = |v: f32| (((v + m) * 255.0).round().clamp(0.0, 255.0)) as u32;
    (channel(r) << 16) | (channel(g) << 8) | channel(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polar_roundtrip() {
        let p = polar_to_cartesian(10.0, 0.75);
        let (r, theta) = cartesian_to_polar(p);
        assert!((r - 10.0).abs() < 1e-4);
        assert!((theta - 0.75).abs() < 1e-4);
    }

    #[test]
    fn test_hsl_primaries() {
        assert_eq!(hsl_to_rgb(0.0, 1.0, 0.5), 0xFF0000);
        assert_eq!(hsl_to_rgb(120.0, 1.0, 0.5), 0x00FF00);
        assert_eq!(hsl_to_rgb(240.0, 1.0, 0.5), 0x0000FF);
        assert_eq!(hsl_to_rgb(42.0, 0.0, 1.0), 0xFFFFFF);
    }
}
