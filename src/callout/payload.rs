use serde::{Deserialize, Serialize};

use crate::geometry::PercentPoint;

pub const DEFAULT_BLUR_INTENSITY: f64 = 8.0;
pub const DEFAULT_MAGNIFIER_ZOOM: f64 = 2.0;
pub const DEFAULT_POLYGON_SIDES: u8 = 6;
pub const DEFAULT_FREEHAND_STROKE_WIDTH: f64 = 3.0;

const POLYGON_MIN_SIDES: u8 = 3;
const POLYGON_MAX_SIDES: u8 = 12;
const MAGNIFIER_MIN_ZOOM: f64 = 1.0;
const MAGNIFIER_MAX_ZOOM: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlurKind {
    #[default]
    Blur,
    Pixelate,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlurData {
    #[serde(default = "default_blur_intensity")]
    pub intensity: f64,
    #[serde(default, rename = "type")]
    pub kind: BlurKind,
}

impl Default for BlurData {
    fn default() -> Self {
        Self {
            intensity: DEFAULT_BLUR_INTENSITY,
            kind: BlurKind::Blur,
        }
    }
}

impl BlurData {
    pub fn intensity(&self) -> f64 {
        if self.intensity.is_finite() {
            self.intensity.max(0.0)
        } else {
            DEFAULT_BLUR_INTENSITY
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MagnifierData {
    #[serde(default = "default_magnifier_zoom")]
    pub zoom_level: f64,
    #[serde(default = "default_true")]
    pub show_border: bool,
}

impl Default for MagnifierData {
    fn default() -> Self {
        Self {
            zoom_level: DEFAULT_MAGNIFIER_ZOOM,
            show_border: true,
        }
    }
}

impl MagnifierData {
    pub fn zoom_level(&self) -> f64 {
        if self.zoom_level.is_finite() {
            self.zoom_level.clamp(MAGNIFIER_MIN_ZOOM, MAGNIFIER_MAX_ZOOM)
        } else {
            DEFAULT_MAGNIFIER_ZOOM
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolygonData {
    #[serde(default = "default_polygon_sides")]
    pub sides: u8,
}

impl Default for PolygonData {
    fn default() -> Self {
        Self {
            sides: DEFAULT_POLYGON_SIDES,
        }
    }
}

impl PolygonData {
    pub fn sides(&self) -> u8 {
        self.sides.clamp(POLYGON_MIN_SIDES, POLYGON_MAX_SIDES)
    }
}

/// Freehand vertices in the same percentage space as the callout's bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreehandData {
    pub path: Vec<PercentPoint>,
    #[serde(default = "default_freehand_stroke_width")]
    pub stroke_width: f64,
}

impl FreehandData {
    pub fn stroke_width(&self) -> f64 {
        if self.stroke_width.is_finite() && self.stroke_width > 0.0 {
            self.stroke_width
        } else {
            DEFAULT_FREEHAND_STROKE_WIDTH
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapePayload<'a> {
    Blur(&'a BlurData),
    Magnifier(&'a MagnifierData),
    Polygon(&'a PolygonData),
    Freehand(&'a FreehandData),
}

fn default_blur_intensity() -> f64 {
    DEFAULT_BLUR_INTENSITY
}

fn default_magnifier_zoom() -> f64 {
    DEFAULT_MAGNIFIER_ZOOM
}

fn default_polygon_sides() -> u8 {
    DEFAULT_POLYGON_SIDES
}

fn default_freehand_stroke_width() -> f64 {
    DEFAULT_FREEHAND_STROKE_WIDTH
}

const fn default_true() -> bool {
    true
}
