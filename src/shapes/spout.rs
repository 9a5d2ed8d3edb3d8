//! Spout selection
//!
//! Spouts are drawn from the upper half of the outline (smallest screen y),
//! where dropped particles have the most room to fall.

use rand::Rng;
use rand::seq::index;

use crate::geometry::Point;
use crate::settings::SpoutSettings;

/// Pick `min_spouts..=max_spouts` distinct outline points from the upper half.
///
/// The count is clamped to the number of candidates, so a tiny outline can
/// yield fewer spouts than `min_spouts`. An empty outline yields none.
pub fn select_spouts(
    outline: &[Point],
    settings: &SpoutSettings,
    rng: &mut impl Rng,
) -> Vec<Point> {
    let mut sorted = outline.to_vec();
    sorted.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));
    sorted.dedup();

    let upper = &sorted[..sorted.len().div_ceil(2)];
    if upper.is_empty() {
        return Vec::new();
    }

    let min = settings.min_spouts.min(settings.max_spouts);
    let max = settings.max_spouts.max(min);
    let count = rng.random_range(min..=max).min(upper.len());

    index::sample(rng, upper.len(), count)
        .into_iter()
        .map(|i| upper[i])
        .collect()
}
