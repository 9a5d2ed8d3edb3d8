//! Game settings and tuning
//!
//! Every section deserializes with `#[serde(default)]`, so a JSON file only
//! needs the keys it wants to override. Defaults come from [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SettingsError;
use crate::sim::{SizeClass, default_size_classes};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Segments used to approximate circle primitives
    pub fn circle_segments(&self) -> u32 {
        match self {
            QualityPreset::Low => 6,
            QualityPreset::Medium => 12,
            QualityPreset::High => 16,
        }
    }
}

/// Shape composer tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposerSettings {
    /// Shapes per cluster (inclusive range); fewer than `min_shapes` placed
    /// means generation failed
    pub min_shapes: usize,
    pub max_shapes: usize,
    /// Placement attempts per shape
    pub placement_attempts: u32,
    /// Primitive size range, as fractions of the shorter canvas side
    pub min_size_fraction: f32,
    pub max_size_fraction: f32,
    /// Canvas margin as a fraction of the largest primitive size
    pub margin_factor: f32,
    /// Star point count range (inclusive)
    pub min_star_points: u32,
    pub max_star_points: u32,
    /// Fallback polygon point count range (inclusive)
    pub fallback_min_points: usize,
    pub fallback_max_points: usize,
    /// Fallback polygon radius, as a fraction of the shorter canvas side
    pub fallback_radius_fraction: f32,
    /// Per-point radius jitter of the fallback polygon (0.2 = +-20%)
    pub fallback_jitter: f32,
}

impl Default for ComposerSettings {
    fn default() -> Self {
        Self {
            min_shapes: MIN_SHAPES,
            max_shapes: MAX_SHAPES,
            placement_attempts: PLACEMENT_ATTEMPTS,
            min_size_fraction: 0.15,
            max_size_fraction: 0.35,
            margin_factor: 0.25,
            min_star_points: 5,
            max_star_points: 7,
            fallback_min_points: 6,
            fallback_max_points: 9,
            fallback_radius_fraction: 0.3,
            fallback_jitter: 0.2,
        }
    }
}

/// Shape merger tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeSettings {
    /// An edge survives while its midpoint sits inside at most this many
    /// other shapes
    pub max_burial: usize,
    /// Decimal places kept when deduplicating boundary points
    pub dedupe_decimals: u32,
    /// Angles closer than this (radians) are ordered by distance instead
    pub angle_tie_epsilon: f32,
}

impl Default for MergeSettings {
    fn default() -> Self {
        Self {
            max_burial: 1,
            dedupe_decimals: 1,
            angle_tie_epsilon: 1e-4,
        }
    }
}

/// Spout selection tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpoutSettings {
    pub min_spouts: usize,
    pub max_spouts: usize,
}

impl Default for SpoutSettings {
    fn default() -> Self {
        Self {
            min_spouts: MIN_SPOUTS,
            max_spouts: MAX_SPOUTS,
        }
    }
}

/// Particle integrator constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    pub gravity: f32,
    pub bounce_factor: f32,
    pub damping: f32,
    pub correction_step: f32,
    pub max_correction_steps: u32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            bounce_factor: BOUNCE_FACTOR,
            damping: DAMPING,
            correction_step: CORRECTION_STEP,
            max_correction_steps: MAX_CORRECTION_STEPS,
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub canvas_width: f32,
    pub canvas_height: f32,
    /// Circle fidelity
    pub quality: QualityPreset,
    pub composer: ComposerSettings,
    pub merge: MergeSettings,
    pub spouts: SpoutSettings,
    pub physics: PhysicsSettings,
    /// Weighted particle size table
    pub size_classes: Vec<SizeClass>,
    /// Fill percentage that wins the round
    pub win_threshold: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            quality: QualityPreset::Medium,
            composer: ComposerSettings::default(),
            merge: MergeSettings::default(),
            spouts: SpoutSettings::default(),
            physics: PhysicsSettings::default(),
            size_classes: default_size_classes(),
            win_threshold: WIN_PERCENTAGE,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Parse (partial) settings from JSON and normalize them
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.validated())
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Segments used for circle primitives
    pub fn circle_segments(&self) -> u32 {
        self.quality.circle_segments()
    }

    /// Repair settings that would break generation: inverted ranges,
    /// non-positive sizes, and size weights that don't sum to 1.
    pub fn validated(mut self) -> Self {
        let defaults = Settings::default();

        if !(self.canvas_width > 0.0 && self.canvas_height > 0.0) {
            log::warn!("Invalid canvas size, using defaults");
            self.canvas_width = defaults.canvas_width;
            self.canvas_height = defaults.canvas_height;
        }

        let c = &mut self.composer;
        order_range(&mut c.min_shapes, &mut c.max_shapes);
        c.min_shapes = c.min_shapes.max(1);
        c.max_shapes = c.max_shapes.max(c.min_shapes);
        c.placement_attempts = c.placement_attempts.max(1);
        order_range(&mut c.min_size_fraction, &mut c.max_size_fraction);
        if c.min_size_fraction <= 0.0 {
            c.min_size_fraction = defaults.composer.min_size_fraction;
            c.max_size_fraction = c.max_size_fraction.max(c.min_size_fraction);
        }
        c.margin_factor = c.margin_factor.max(0.0);
        order_range(&mut c.min_star_points, &mut c.max_star_points);
        c.min_star_points = c.min_star_points.max(3);
        c.max_star_points = c.max_star_points.max(c.min_star_points);
        order_range(&mut c.fallback_min_points, &mut c.fallback_max_points);
        c.fallback_min_points = c.fallback_min_points.max(3);
        c.fallback_max_points = c.fallback_max_points.max(c.fallback_min_points);
        if c.fallback_radius_fraction <= 0.0 {
            c.fallback_radius_fraction = defaults.composer.fallback_radius_fraction;
        }
        c.fallback_jitter = c.fallback_jitter.clamp(0.0, 0.9);

        order_range(&mut self.spouts.min_spouts, &mut self.spouts.max_spouts);
        self.spouts.min_spouts = self.spouts.min_spouts.max(1);
        self.spouts.max_spouts = self.spouts.max_spouts.max(self.spouts.min_spouts);

        let p = &mut self.physics;
        if p.correction_step <= 0.0 {
            p.correction_step = CORRECTION_STEP;
        }
        p.max_correction_steps = p.max_correction_steps.max(1);

        self.size_classes
            .retain(|class| class.weight > 0.0 && class.radius > 0.0);
        if self.size_classes.is_empty() {
            log::warn!("No usable size classes, using defaults");
            self.size_classes = default_size_classes();
        }
        let total: f32 = self.size_classes.iter().map(|class| class.weight).sum();
        if (total - 1.0).abs() > 1e-4 {
            for class in &mut self.size_classes {
                class.weight /= total;
            }
        }

        self.win_threshold = self.win_threshold.clamp(0.0, 100.0);
        self
    }
}

fn order_range<T: PartialOrd>(min: &mut T, max: &mut T) {
    if *min > *max {
        std::mem::swap(min, max);
    }
}
