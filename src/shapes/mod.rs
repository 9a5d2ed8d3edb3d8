//! Procedural playfield generation
//!
//! compose -> merge -> validate -> {triangulate, select spouts}. Any failure
//! along the way substitutes the fallback polygon, so generation always
//! produces a playable field.

pub mod compose;
pub mod merge;
pub mod primitive;
pub mod spout;

pub use compose::{compose_shapes, fallback_polygon, partially_overlaps};
pub use merge::merge_shapes;
pub use primitive::{Shape, ShapeKind};
pub use spout::select_spouts;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::POINT_EPSILON;
use crate::geometry::{
    Point, Triangle, dedupe_consecutive, is_simple_polygon, polygon_area, triangle_area,
    triangulate,
};
use crate::settings::Settings;

/// Everything the simulation needs from a generated (or loaded) shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub outline: Vec<Point>,
    pub triangles: Vec<Triangle>,
    pub spouts: Vec<Point>,
    /// The fallback polygon replaced the composed shape
    #[serde(default)]
    pub used_fallback: bool,
}

impl Playfield {
    /// Validate and triangulate an outline. `None` when it is not usable.
    pub fn from_outline(outline: &[Point], spouts: Vec<Point>) -> Option<Self> {
        let outline = dedupe_consecutive(outline, POINT_EPSILON);
        if outline.len() < 3 || !is_simple_polygon(&outline) || polygon_area(&outline) <= 0.0 {
            return None;
        }
        let triangles = triangulate(&outline);
        let covered: f32 = triangles.iter().map(triangle_area).sum();
        let area = polygon_area(&outline);
        // A partial triangulation leaves part of the outline unscored
        if triangles.is_empty() || (covered - area).abs() > area * 1e-3 {
            return None;
        }
        Some(Self {
            outline,
            triangles,
            spouts,
            used_fallback: false,
        })
    }

    /// Total triangulated area
    pub fn region_area(&self) -> f32 {
        self.triangles.iter().map(triangle_area).sum()
    }
}

/// Generate a compound shape with its triangulation and spouts.
///
/// Never fails: settings are normalized first, and an unusable cluster is
/// replaced by the fallback polygon.
pub fn generate_compound_shape(
    width: f32,
    height: f32,
    settings: &Settings,
    rng: &mut impl Rng,
) -> Playfield {
    let settings = &settings.clone().validated();
    let merged = compose_shapes(width, height, settings, rng)
        .map(|shapes| merge_shapes(&shapes, &settings.merge))
        .unwrap_or_default();

    let mut playfield = match Playfield::from_outline(&merged, Vec::new()) {
        Some(field) => field,
        None => {
            log::warn!(
                "Shape generation failed ({} merged points), using fallback polygon",
                merged.len()
            );
            fallback_playfield(width, height, settings, rng)
        }
    };

    playfield.spouts = select_spouts(&playfield.outline, &settings.spouts, rng);
    log::debug!(
        "generated outline: {} points, {} triangles, {} spouts, area {:.1}",
        playfield.outline.len(),
        playfield.triangles.len(),
        playfield.spouts.len(),
        playfield.region_area()
    );
    playfield
}

/// Fallback polygon as a playfield. Its points are at strictly increasing
/// angles around the center, so it is simple and always triangulates.
fn fallback_playfield(
    width: f32,
    height: f32,
    settings: &Settings,
    rng: &mut impl Rng,
) -> Playfield {
    let outline = fallback_polygon(width, height, &settings.composer, rng);
    let triangles = triangulate(&outline);
    Playfield {
        outline,
        triangles,
        spouts: Vec::new(),
        used_fallback: true,
    }
}
