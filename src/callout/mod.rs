//! Persisted callout records and the screenshot collection that owns them.

mod payload;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::PercentRect;
use crate::shapes::ShapeKind;

pub use payload::{
    BlurData, BlurKind, FreehandData, MagnifierData, PolygonData, ShapePayload,
    DEFAULT_BLUR_INTENSITY, DEFAULT_FREEHAND_STROKE_WIDTH, DEFAULT_MAGNIFIER_ZOOM,
    DEFAULT_POLYGON_SIDES,
};

pub type CalloutResult<T> = std::result::Result<T, CalloutError>;

#[derive(Debug, Error)]
pub enum CalloutError {
    #[error("failed to decode screenshot callouts")]
    Decode(#[source] serde_json::Error),
    #[error("failed to encode screenshot callouts")]
    Encode(#[source] serde_json::Error),
}

/// Optional per-callout appearance overrides. Absent fields use the shape registry defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalloutStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_color: Option<String>,
}

/// A callout before the host has assigned it an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalloutDraft {
    pub shape: ShapeKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<CalloutStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reveal_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blur_data: Option<BlurData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub magnifier_data: Option<MagnifierData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polygon_data: Option<PolygonData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freehand_data: Option<FreehandData>,
}

/// One persisted annotation on a screenshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Callout {
    pub id: String,
    #[serde(flatten)]
    pub draft: CalloutDraft,
}

impl CalloutDraft {
    pub fn new(shape: ShapeKind, bounds: PercentRect, color: impl Into<String>) -> Self {
        Self {
            shape,
            x: bounds.x,
            y: bounds.y,
            width: bounds.width,
            height: bounds.height,
            color: color.into(),
            style: None,
            number: None,
            reveal_text: None,
            text: None,
            blur_data: None,
            magnifier_data: None,
            polygon_data: None,
            freehand_data: None,
        }
    }

    pub fn bounds(&self) -> PercentRect {
        PercentRect::new(self.x, self.y, self.width, self.height)
    }

    /// The payload that belongs to this record's shape, ignoring stray payloads of other kinds.
    pub fn payload(&self) -> Option<ShapePayload<'_>> {
        match self.shape {
            ShapeKind::Blur => self.blur_data.as_ref().map(ShapePayload::Blur),
            ShapeKind::Magnifier => self.magnifier_data.as_ref().map(ShapePayload::Magnifier),
            ShapeKind::Polygon => self.polygon_data.as_ref().map(ShapePayload::Polygon),
            ShapeKind::Freehand => self.freehand_data.as_ref().map(ShapePayload::Freehand),
            ShapeKind::Circle
            | ShapeKind::Rectangle
            | ShapeKind::Arrow
            | ShapeKind::Number
            | ShapeKind::Oval
            | ShapeKind::Unknown => None,
        }
    }

    pub fn set_blur(&mut self, data: BlurData) {
        self.clear_payloads();
        self.blur_data = Some(data);
    }

    pub fn set_magnifier(&mut self, data: MagnifierData) {
        self.clear_payloads();
        self.magnifier_data = Some(data);
    }

    pub fn set_polygon(&mut self, data: PolygonData) {
        self.clear_payloads();
        self.polygon_data = Some(data);
    }

    pub fn set_freehand(&mut self, data: FreehandData) {
        self.clear_payloads();
        self.freehand_data = Some(data);
    }

    fn clear_payloads(&mut self) {
        self.blur_data = None;
        self.magnifier_data = None;
        self.polygon_data = None;
        self.freehand_data = None;
    }

    /// Reveal text if it is present and not blank.
    pub fn reveal_text(&self) -> Option<&str> {
        self.reveal_text
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }

    pub fn has_reveal(&self) -> bool {
        self.shape == ShapeKind::Number && self.reveal_text().is_some()
    }

    pub fn into_callout(self, id: impl Into<String>) -> Callout {
        Callout {
            id: id.into(),
            draft: self,
        }
    }
}

impl std::ops::Deref for Callout {
    type Target = CalloutDraft;

    fn deref(&self) -> &Self::Target {
        &self.draft
    }
}

impl std::ops::DerefMut for Callout {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.draft
    }
}

/// Smallest positive integer not used by any `number` callout in `callouts`.
pub fn next_callout_number(callouts: &[Callout]) -> u32 {
    let mut used = callouts
        .iter()
        .filter(|callout| callout.shape == ShapeKind::Number)
        .filter_map(|callout| callout.number)
        .filter(|number| *number > 0)
        .collect::<Vec<_>>();
    used.sort_unstable();
    used.dedup();

    let mut expected = 1_u32;
    for number in used {
        if number != expected {
            break;
        }
        expected = expected.saturating_add(1);
    }
    expected
}

/// A screenshot image and its ordered callouts (order is z-order is creation order).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Screenshot {
    pub image_ref: String,
    #[serde(default)]
    pub callouts: Vec<Callout>,
}

impl Screenshot {
    pub fn new(image_ref: impl Into<String>) -> Self {
        Self {
            image_ref: image_ref.into(),
            callouts: Vec::new(),
        }
    }

    pub fn from_json(json: &str) -> CalloutResult<Self> {
        serde_json::from_str(json).map_err(CalloutError::Decode)
    }

    pub fn to_json(&self) -> CalloutResult<String> {
        serde_json::to_string(self).map_err(CalloutError::Encode)
    }

    pub fn callout(&self, id: &str) -> Option<&Callout> {
        self.callouts.iter().find(|callout| callout.id == id)
    }

    /// Appends a new callout with a fresh UUID and returns its id.
    pub fn push_draft(&mut self, draft: CalloutDraft) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        self.callouts.push(draft.into_callout(id.clone()));
        id
    }

    /// Replaces the callout with the same id. Returns `false` when no such callout exists.
    pub fn replace(&mut self, callout: Callout) -> bool {
        match self.callouts.iter_mut().find(|existing| existing.id == callout.id) {
            Some(existing) => {
                *existing = callout;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<Callout> {
        let index = self.callouts.iter().position(|callout| callout.id == id)?;
        Some(self.callouts.remove(index))
    }
}
