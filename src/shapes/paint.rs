use std::f64::consts::PI;

use crate::callout::{BlurData, BlurKind, Callout, MagnifierData, PolygonData, ShapePayload};
use crate::geometry::{HexColor, PercentPoint, PercentRect};

use super::{Aspect, NumberBadge, ShapeKind};

const DEFAULT_BORDER_WIDTH: f64 = 3.0;
const DEFAULT_FONT_SIZE: f64 = 14.0;
const DEFAULT_FONT_FAMILY: &str = "sans-serif";
const BADGE_FONT_COLOR: HexColor = HexColor::new(255, 255, 255);
const RECTANGLE_RADIUS_PX: f64 = 4.0;

/// Arrow silhouette in percent of its box, pointing right.
pub const ARROW_SILHOUETTE: [PercentPoint; 7] = [
    PercentPoint::new(0.0, 30.0),
    PercentPoint::new(60.0, 30.0),
    PercentPoint::new(60.0, 0.0),
    PercentPoint::new(100.0, 50.0),
    PercentPoint::new(60.0, 100.0),
    PercentPoint::new(60.0, 70.0),
    PercentPoint::new(0.0, 70.0),
];

/// Inputs every renderer must share when painting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaintContext<'a> {
    pub image_ref: &'a str,
    pub floor_px: f64,
    pub default_color: HexColor,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: HexColor,
    pub width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fill {
    pub color: HexColor,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub size: f64,
    pub family: String,
    pub color: HexColor,
}

/// Renderer-agnostic drawing instructions. Geometry is in percent of the plan's frame,
/// except `Lens::focus` which is in percent of the image container.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Ellipse {
        stroke: Option<Stroke>,
        fill: Option<Fill>,
    },
    RoundedBox {
        radius_px: f64,
        stroke: Stroke,
        fill: Option<Fill>,
    },
    Polygon {
        points: Vec<PercentPoint>,
        stroke: Option<Stroke>,
        fill: Option<Fill>,
    },
    Path {
        points: Vec<PercentPoint>,
        stroke: Stroke,
    },
    Label {
        text: String,
        font: Font,
    },
    Badge {
        number: u32,
        font: Font,
    },
    Obscure {
        intensity: f64,
        kind: BlurKind,
    },
    Lens {
        image_ref: String,
        zoom: f64,
        focus: PercentPoint,
        border: Option<Stroke>,
    },
}

/// Everything a renderer needs to draw one callout.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintPlan {
    pub shape: ShapeKind,
    /// Frame in percent of the image container.
    pub frame: PercentRect,
    pub aspect: Aspect,
    /// Minimum frame side in pixels; zero when the floor does not apply.
    pub floor_px: f64,
    pub ops: Vec<DrawOp>,
}

/// Style overrides merged over the registry defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStyle {
    pub color: HexColor,
    pub border_width: f64,
    pub fill_opacity: f64,
    pub font: Font,
}

/// Family lists such as `Georgia, serif` pass; anything that could close the declaration,
/// open a block or start a string does not.
fn is_plain_font_family(family: &str) -> bool {
    let plain = !family.trim().is_empty()
        && !family
            .chars()
            .any(|ch| matches!(ch, ';' | '{' | '}' | '"' | '\'' | '\\') || ch.is_control());
    if !plain {
        tracing::debug!(family, "ignoring unusable font family");
    }
    plain
}

impl ResolvedStyle {
    pub fn resolve(callout: &Callout, default_color: HexColor) -> Self {
        let color = HexColor::parse(&callout.color).unwrap_or(default_color);
        let style = callout.style.clone().unwrap_or_default();
        let default_fill = match callout.shape {
            ShapeKind::Number | ShapeKind::Arrow => 1.0,
            _ => 0.0,
        };
        let default_font_color = match callout.shape {
            ShapeKind::Number => BADGE_FONT_COLOR,
            _ => color,
        };

        Self {
            color,
            border_width: positive_or(style.border_width, DEFAULT_BORDER_WIDTH),
            fill_opacity: style
                .fill_opacity
                .filter(|opacity| opacity.is_finite())
                .map(|opacity| opacity.clamp(0.0, 1.0))
                .unwrap_or(default_fill),
            font: Font {
                size: positive_or(style.font_size, DEFAULT_FONT_SIZE),
                family: style
                    .font_family
                    .filter(|family| is_plain_font_family(family))
                    .unwrap_or_else(|| DEFAULT_FONT_FAMILY.to_string()),
                color: style
                    .font_color
                    .as_deref()
                    .and_then(HexColor::parse)
                    .unwrap_or(default_font_color),
            },
        }
    }

    fn stroke(&self) -> Stroke {
        Stroke {
            color: self.color,
            width: self.border_width,
        }
    }

    fn fill(&self) -> Option<Fill> {
        (self.fill_opacity > 0.0).then_some(Fill {
            color: self.color,
            opacity: self.fill_opacity,
        })
    }
}

fn positive_or(value: Option<f64>, default: f64) -> f64 {
    value
        .filter(|value| value.is_finite() && *value >= 0.0)
        .unwrap_or(default)
}

/// Vertices of a regular polygon inscribed in a 100x100 box, first vertex at the top.
pub fn regular_polygon_points(sides: u8) -> Vec<PercentPoint> {
    let sides = sides.max(3);
    (0..sides)
        .map(|index| {
            let angle = -PI / 2.0 + 2.0 * PI * f64::from(index) / f64::from(sides);
            PercentPoint::new(50.0 + 50.0 * angle.cos(), 50.0 + 50.0 * angle.sin())
        })
        .collect()
}

/// Describes how to draw `callout`. `None` for unknown shapes or unusable geometry.
/// Whether [`paint`] draws anything for `callout`. Callouts that paint nothing are also
/// never hit, selected or revealed.
pub fn is_paintable(callout: &Callout) -> bool {
    let Some(spec) = callout.shape.spec() else {
        return false;
    };
    if !callout.bounds().is_finite() {
        return false;
    }
    if spec.number == NumberBadge::Required && !callout.number.is_some_and(|number| number > 0) {
        return false;
    }
    match callout.shape {
        ShapeKind::Freehand => matches!(
            callout.payload(),
            Some(ShapePayload::Freehand(data))
                if data.path.len() >= 2 && data.path.iter().all(|point| point.is_finite())
        ),
        _ => true,
    }
}

pub fn paint(callout: &Callout, context: &PaintContext<'_>) -> Option<PaintPlan> {
    let spec = callout.shape.spec()?;
    let bounds = callout.bounds();
    if !bounds.is_finite() {
        tracing::debug!(id = %callout.id, "skipping callout with non-finite geometry");
        return None;
    }

    let style = ResolvedStyle::resolve(callout, context.default_color);
    let frame = match callout.shape {
        ShapeKind::Freehand => PercentRect::new(0.0, 0.0, 100.0, 100.0),
        _ => bounds,
    };
    let floor_px = if spec.min_floor {
        context.floor_px.max(0.0)
    } else {
        0.0
    };

    let mut ops = Vec::new();
    match callout.shape {
        ShapeKind::Circle | ShapeKind::Oval => {
            ops.push(DrawOp::Ellipse {
                stroke: Some(style.stroke()),
                fill: style.fill(),
            });
        }
        ShapeKind::Number => {
            ops.push(DrawOp::Ellipse {
                stroke: None,
                fill: Some(Fill {
                    color: style.color,
                    opacity: style.fill_opacity.max(0.0),
                }),
            });
        }
        ShapeKind::Rectangle => {
            ops.push(DrawOp::RoundedBox {
                radius_px: RECTANGLE_RADIUS_PX,
                stroke: style.stroke(),
                fill: style.fill(),
            });
        }
        ShapeKind::Arrow => {
            ops.push(DrawOp::Polygon {
                points: ARROW_SILHOUETTE.to_vec(),
                stroke: None,
                fill: Some(Fill {
                    color: style.color,
                    opacity: style.fill_opacity,
                }),
            });
        }
        ShapeKind::Polygon => {
            let sides = match callout.payload() {
                Some(ShapePayload::Polygon(data)) => data.sides(),
                _ => PolygonData::default().sides(),
            };
            ops.push(DrawOp::Polygon {
                points: regular_polygon_points(sides),
                stroke: Some(style.stroke()),
                fill: style.fill(),
            });
        }
        ShapeKind::Blur => {
            let blur = match callout.payload() {
                Some(ShapePayload::Blur(data)) => *data,
                _ => BlurData::default(),
            };
            ops.push(DrawOp::Obscure {
                intensity: blur.intensity(),
                kind: blur.kind,
            });
        }
        ShapeKind::Magnifier => {
            let magnifier = match callout.payload() {
                Some(ShapePayload::Magnifier(data)) => *data,
                _ => MagnifierData::default(),
            };
            ops.push(DrawOp::Lens {
                image_ref: context.image_ref.to_string(),
                zoom: magnifier.zoom_level(),
                focus: bounds.center(),
                border: magnifier.show_border.then(|| style.stroke()),
            });
        }
        ShapeKind::Freehand => {
            let Some(ShapePayload::Freehand(data)) = callout.payload() else {
                tracing::debug!(id = %callout.id, "freehand callout without a path");
                return None;
            };
            if data.path.len() < 2 || data.path.iter().any(|point| !point.is_finite()) {
                return None;
            }
            ops.push(DrawOp::Path {
                points: data.path.clone(),
                stroke: Stroke {
                    color: style.color,
                    width: data.stroke_width(),
                },
            });
        }
        ShapeKind::Unknown => return None,
    }

    if spec.accepts_text {
        if let Some(text) = callout.text.as_deref().filter(|text| !text.trim().is_empty()) {
            ops.push(DrawOp::Label {
                text: text.to_string(),
                font: style.font.clone(),
            });
        }
    }

    match (spec.number, callout.number) {
        (NumberBadge::Required, number) => {
            // numbered callouts without a positive number are corrupt records
            let number = number.filter(|number| *number > 0)?;
            ops.push(DrawOp::Badge {
                number,
                font: style.font.clone(),
            });
        }
        (NumberBadge::Optional, Some(number)) if number > 0 => {
            ops.push(DrawOp::Badge {
                number,
                font: style.font.clone(),
            });
        }
        _ => {}
    }

    Some(PaintPlan {
        shape: callout.shape,
        frame,
        aspect: spec.aspect,
        floor_px,
        ops,
    })
}
