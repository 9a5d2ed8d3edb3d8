//! Shape composer
//!
//! Grows a connected cluster of primitives: every new shape must partially
//! overlap one already placed (some of its vertices inside, some outside)
//! and stay within the canvas margin. Placement failures are local; only a
//! cluster smaller than the configured minimum counts as a failure, and the
//! caller substitutes [`fallback_polygon`].

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::primitive::Shape;
use crate::geometry::{Bounds, Point, is_point_inside_polygon};
use crate::polar_to_cartesian;
use crate::settings::{ComposerSettings, Settings};

/// Place a cluster of overlapping primitives on a `width` x `height` canvas.
///
/// Returns `None` when fewer than `min_shapes` could be placed. Inverted
/// ranges in `settings` are read low to high.
pub fn compose_shapes(
    width: f32,
    height: f32,
    settings: &Settings,
    rng: &mut impl Rng,
) -> Option<Vec<Shape>> {
    let cfg = &settings.composer;
    let short_side = width.min(height);
    let (min_fraction, max_fraction) = ordered(cfg.min_size_fraction, cfg.max_size_fraction);
    let min_size = min_fraction * short_side;
    let max_size = max_fraction * short_side;
    let area = Bounds::new(0.0, 0.0, width, height).inset(max_size * cfg.margin_factor);

    let (min_shapes, max_shapes) = ordered(cfg.min_shapes.max(1), cfg.max_shapes.max(1));
    let target = rng.random_range(min_shapes..=max_shapes);
    let mut shapes = Vec::with_capacity(target);

    // Seed shape near the canvas center
    let mut first = random_primitive(min_size, max_size, settings, rng);
    let jitter = short_side * 0.05;
    first.move_to(
        area.center()
            + Vec2::new(
                rng.random_range(-jitter..=jitter),
                rng.random_range(-jitter..=jitter),
            ),
    );
    first.rotate(rng.random_range(0.0..TAU));
    if !area.contains(&first.bounds()) {
        first.move_to(area.center());
        if !area.contains(&first.bounds()) {
            log::debug!("compose: seed shape does not fit a {width}x{height} canvas");
            return None;
        }
    }
    shapes.push(first);

    for index in 1..target {
        let candidate = random_primitive(min_size, max_size, settings, rng);
        match place_candidate(candidate, &shapes, &area, cfg.placement_attempts, rng) {
            Some(shape) => shapes.push(shape),
            None => log::debug!(
                "compose: shape {index} not placed after {} attempts",
                cfg.placement_attempts
            ),
        }
    }

    if shapes.len() < min_shapes {
        log::debug!(
            "compose: placed {} of minimum {} shapes",
            shapes.len(),
            min_shapes
        );
        return None;
    }

    log::debug!("compose: placed {} of {} target shapes", shapes.len(), target);
    Some(shapes)
}

/// Search for a position where `candidate` partially overlaps a placed shape
fn place_candidate(
    mut candidate: Shape,
    placed: &[Shape],
    area: &Bounds,
    attempts: u32,
    rng: &mut impl Rng,
) -> Option<Shape> {
    if placed.is_empty() {
        return None;
    }
    let reach = candidate.half_extent();

    for _ in 0..attempts {
        let reference = &placed[rng.random_range(0..placed.len())];

        let target = if rng.random_bool(0.5) {
            // Random offset from the reference's bounding-box center
            let ref_bounds = reference.bounds();
            let spread = ref_bounds.width().max(ref_bounds.height()) * 0.5 + reach;
            let distance = spread * rng.random_range(0.3_f32..=0.9);
            ref_bounds.center() + polar_to_cartesian(distance, rng.random_range(0.0..TAU))
        } else {
            // Near one of the reference's vertices, along its outward direction
            let vertices = reference.vertices();
            if vertices.is_empty() {
                continue;
            }
            let anchor = vertices[rng.random_range(0..vertices.len())];
            let outward = (anchor - reference.origin).normalize_or_zero();
            anchor + outward * reach * rng.random_range(-0.5_f32..=0.5)
        };

        candidate.move_to(target);
        candidate.rotate(rng.random_range(0.0..TAU));

        if area.contains(&candidate.bounds()) && partially_overlaps(&candidate, reference) {
            return Some(candidate);
        }
    }

    None
}

/// At least one candidate vertex inside `reference` and at least one outside.
///
/// Full containment and disjoint shapes both fail.
pub fn partially_overlaps(candidate: &Shape, reference: &Shape) -> bool {
    let reference_vertices = reference.vertices();
    let mut inside = false;
    let mut outside = false;
    for v in candidate.vertices() {
        if is_point_inside_polygon(v, &reference_vertices) {
            inside = true;
        } else {
            outside = true;
        }
        if inside && outside {
            return true;
        }
    }
    false
}

fn random_primitive(
    min_size: f32,
    max_size: f32,
    settings: &Settings,
    rng: &mut impl Rng,
) -> Shape {
    let cfg = &settings.composer;
    let size = rng.random_range(min_size..=max_size);
    match rng.random_range(0..4) {
        0 => Shape::rectangle(Vec2::ZERO, size, size * rng.random_range(0.5_f32..=1.0)),
        1 => Shape::circle(Vec2::ZERO, size / 2.0, settings.circle_segments()),
        2 => Shape::triangle(Vec2::ZERO, size),
        _ => {
            let (min_points, max_points) =
                ordered(cfg.min_star_points.max(3), cfg.max_star_points.max(3));
            Shape::star(Vec2::ZERO, size / 2.0, rng.random_range(min_points..=max_points))
        }
    }
}

/// `(low, high)` regardless of argument order
fn ordered<T: PartialOrd>(a: T, b: T) -> (T, T) {
    if a > b { (b, a) } else { (a, b) }
}

/// Always-playable substitute: points evenly spaced around the canvas center
/// with per-point radius jitter. Increasing angles keep it simple.
pub fn fallback_polygon(
    width: f32,
    height: f32,
    cfg: &ComposerSettings,
    rng: &mut impl Rng,
) -> Vec<Point> {
    let center = Vec2::new(width / 2.0, height / 2.0);
    let base = width.min(height) * cfg.fallback_radius_fraction;
    // Jitter at or above 1 could fold points through the center
    let jitter = cfg.fallback_jitter.abs().min(0.9);
    let (min_points, max_points) =
        ordered(cfg.fallback_min_points.max(3), cfg.fallback_max_points.max(3));
    let count = rng.random_range(min_points..=max_points);

    (0..count)
        .map(|i| {
            let theta = i as f32 / count as f32 * TAU;
            let r = base * (1.0 + rng.random_range(-jitter..=jitter));
            center + polar_to_cartesian(r, theta)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{is_simple_polygon, signed_area};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_partial_overlap_rules() {
        let reference = Shape::rectangle(Vec2::new(50.0, 50.0), 40.0, 40.0);

        let straddling = Shape::rectangle(Vec2::new(70.0, 50.0), 20.0, 20.0);
        assert!(partially_overlaps(&straddling, &reference));

        let contained = Shape::rectangle(Vec2::new(50.0, 50.0), 10.0, 10.0);
        assert!(!partially_overlaps(&contained, &reference));

        let disjoint = Shape::rectangle(Vec2::new(200.0, 50.0), 10.0, 10.0);
        assert!(!partially_overlaps(&disjoint, &reference));
    }

    #[test]
    fn test_compose_respects_count_and_margin() {
        let settings = Settings::default();
        for seed in 0..20 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let shapes = compose_shapes(400.0, 400.0, &settings, &mut rng);
            assert!(shapes.is_some(), "seed {seed}");
            let shapes = shapes.unwrap();
            assert!(shapes.len() >= settings.composer.min_shapes);
            assert!(shapes.len() <= settings.composer.max_shapes);
            for shape in &shapes {
                let b = shape.bounds();
                assert!(b.min_x >= 0.0 && b.max_x <= 400.0);
                assert!(b.min_y >= 0.0 && b.max_y <= 400.0);
            }
        }
    }

    #[test]
    fn test_each_shape_overlaps_an_earlier_one() {
        let settings = Settings::default();
        let mut rng = Pcg32::seed_from_u64(7);
        let shapes = compose_shapes(400.0, 400.0, &settings, &mut rng).unwrap();
        assert!(shapes.len() >= 2);
        for (i, shape) in shapes.iter().enumerate().skip(1) {
            assert!(
                shapes[..i].iter().any(|prev| partially_overlaps(shape, prev)),
                "shape {i} floats free"
            );
        }
    }

    #[test]
    fn test_impossible_canvas_fails() {
        let mut settings = Settings::default();
        settings.composer.margin_factor = 10.0;
        let mut rng = Pcg32::seed_from_u64(1);
        assert!(compose_shapes(400.0, 400.0, &settings, &mut rng).is_none());
    }

    #[test]
    fn test_fallback_polygon_is_simple() {
        let cfg = ComposerSettings::default();
        for seed in 0..10 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let poly = fallback_polygon(400.0, 400.0, &cfg, &mut rng);
            assert!((6..=9).contains(&poly.len()));
            assert!(is_simple_polygon(&poly));
            assert!(signed_area(&poly) > 0.0);
        }
    }

    #[test]
    fn test_inverted_ranges_are_reordered() {
        let mut settings = Settings::default();
        settings.composer.min_shapes = 8;
        settings.composer.max_shapes = 4;
        settings.composer.min_size_fraction = 0.35;
        settings.composer.max_size_fraction = 0.15;
        settings.composer.min_star_points = 8;
        settings.composer.max_star_points = 5;
        for seed in 0..10 {
            let mut rng = Pcg32::seed_from_u64(seed);
            if let Some(shapes) = compose_shapes(400.0, 400.0, &settings, &mut rng) {
                assert!((4..=8).contains(&shapes.len()), "seed {seed}");
            }
        }

        let mut cfg = ComposerSettings::default();
        cfg.fallback_min_points = 9;
        cfg.fallback_max_points = 6;
        cfg.fallback_jitter = -0.2;
        let mut rng = Pcg32::seed_from_u64(3);
        let poly = fallback_polygon(400.0, 400.0, &cfg, &mut rng);
        assert!((6..=9).contains(&poly.len()));
        assert!(is_simple_polygon(&poly));
    }
}
