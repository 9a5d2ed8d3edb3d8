//! Outline documents
//!
//! An alternative playfield source: an outline traced from an image by an
//! external pipeline, stored as JSON in the original image's pixel space.
//!
//! ```json
//! {
//!   "vertices": [[12.0, 40.5], [80.0, 22.0], [140.0, 90.0]],
//!   "bounds": { "minX": 12.0, "minY": 22.0, "maxX": 140.0, "maxY": 90.0 },
//!   "spoutPoints": [[80.0, 22.0]],
//!   "originalWidth": 256,
//!   "originalHeight": 256
//! }
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::OutlineError;
use crate::geometry::{Bounds, CanvasFit, Point, simplify_outline};
use crate::settings::Settings;
use crate::shapes::{Playfield, select_spouts};

/// Share of the canvas a fitted outline covers
const CANVAS_FILL: f32 = 0.8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineDocument {
    pub vertices: Vec<Point>,
    /// Precomputed vertex bounds; derived from the vertices when absent
    #[serde(default)]
    pub bounds: Option<Bounds>,
    #[serde(default)]
    pub spout_points: Vec<Point>,
    #[serde(default)]
    pub original_width: f32,
    #[serde(default)]
    pub original_height: f32,
}

impl OutlineDocument {
    pub fn new(vertices: Vec<Point>) -> Self {
        Self {
            vertices,
            bounds: None,
            spout_points: Vec::new(),
            original_width: 0.0,
            original_height: 0.0,
        }
    }

    /// Parse and validate a document
    pub fn from_json(json: &str) -> Result<Self, OutlineError> {
        let doc: OutlineDocument = serde_json::from_str(json)?;
        doc.validate()?;
        Ok(doc)
    }

    pub fn to_json(&self) -> Result<String, OutlineError> {
        Ok(serde_json::to_string(self)?)
    }

    /// At least 3 vertices, all coordinates finite
    pub fn validate(&self) -> Result<(), OutlineError> {
        if self.vertices.len() < 3 {
            return Err(OutlineError::TooFewVertices {
                got: self.vertices.len(),
            });
        }
        if let Some(index) = self.vertices.iter().position(|v| !v.is_finite()) {
            return Err(OutlineError::NonFinite { index });
        }
        Ok(())
    }

    /// Vertex bounds, preferring the stored ones
    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds.or_else(|| Bounds::from_points(&self.vertices))
    }

    /// Drop vertices closer than `tolerance` to the simplified outline.
    ///
    /// Traced outlines carry hundreds of points; the triangulator is
    /// quadratic, so simplify before building a playfield.
    pub fn simplified(&self, tolerance: f32) -> Self {
        let mut closed = self.vertices.clone();
        if let Some(&first) = closed.first() {
            closed.push(first);
        }
        let mut vertices = simplify_outline(&closed, tolerance);
        if vertices.len() > 1 {
            vertices.pop();
        }
        if vertices.len() < 3 {
            log::debug!("outline: tolerance {tolerance} collapses the outline, keeping it");
            return self.clone();
        }
        Self {
            vertices,
            ..self.clone()
        }
    }

    /// Fit the outline to the canvas and build a playfield.
    ///
    /// Document spouts are transformed with the outline; when there are none,
    /// spouts are selected from the fitted outline.
    pub fn into_playfield(
        self,
        width: f32,
        height: f32,
        settings: &Settings,
        rng: &mut impl Rng,
    ) -> Result<Playfield, OutlineError> {
        self.validate()?;
        let bounds = self.bounds().ok_or(OutlineError::TooFewVertices { got: 0 })?;
        let fit = CanvasFit::new(&bounds, width, height, CANVAS_FILL);

        let outline: Vec<Point> = self.vertices.iter().map(|&v| fit.apply(v)).collect();
        let spouts: Vec<Point> = self.spout_points.iter().map(|&s| fit.apply(s)).collect();

        let mut playfield =
            Playfield::from_outline(&outline, spouts).ok_or(OutlineError::Untriangulable)?;
        if playfield.spouts.is_empty() {
            playfield.spouts = select_spouts(&playfield.outline, &settings.spouts, rng);
        }

        log::info!(
            "Loaded outline document: {} vertices ({}x{} source), {} spouts",
            playfield.outline.len(),
            self.original_width,
            self.original_height,
            playfield.spouts.len()
        );
        Ok(playfield)
    }
}
