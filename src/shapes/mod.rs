//! Shape registry: per-shape defaults, capabilities, paint descriptions and hit tests.

mod hit;
mod paint;

use serde::{Deserialize, Serialize};

pub use hit::{effective_frame, hit_test, topmost_hit};
pub use paint::{
    is_paintable, paint, regular_polygon_points, DrawOp, Fill, Font, PaintContext, PaintPlan,
    ResolvedStyle, Stroke, ARROW_SILHOUETTE,
};

pub const DEFAULT_MIN_PIXEL_SIZE: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Circle,
    Rectangle,
    Arrow,
    Number,
    Oval,
    Polygon,
    Blur,
    Magnifier,
    Freehand,
    /// Any shape this build does not know. Renders nothing and never hits.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberBadge {
    None,
    Optional,
    Required,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aspect {
    Free,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeSpec {
    /// Default placement size in percent; `None` when the size comes from the payload.
    pub default_size: Option<(f64, f64)>,
    pub accepts_text: bool,
    pub number: NumberBadge,
    pub aspect: Aspect,
    /// Whether the paint-time minimum pixel floor applies.
    pub min_floor: bool,
}

impl ShapeSpec {
    const fn sized(width: f64, height: f64) -> Self {
        Self {
            default_size: Some((width, height)),
            accepts_text: false,
            number: NumberBadge::None,
            aspect: Aspect::Free,
            min_floor: true,
        }
    }

    const fn square(self) -> Self {
        Self {
            aspect: Aspect::Square,
            ..self
        }
    }

    const fn with_text(self) -> Self {
        Self {
            accepts_text: true,
            ..self
        }
    }

    const fn with_number(self, number: NumberBadge) -> Self {
        Self { number, ..self }
    }
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 9] = [
        ShapeKind::Circle,
        ShapeKind::Rectangle,
        ShapeKind::Arrow,
        ShapeKind::Number,
        ShapeKind::Oval,
        ShapeKind::Polygon,
        ShapeKind::Blur,
        ShapeKind::Magnifier,
        ShapeKind::Freehand,
    ];

    pub const fn spec(self) -> Option<ShapeSpec> {
        match self {
            Self::Circle => Some(
                ShapeSpec::sized(6.0, 6.0)
                    .square()
                    .with_number(NumberBadge::Optional),
            ),
            Self::Rectangle => Some(ShapeSpec::sized(15.0, 10.0).with_text()),
            Self::Arrow => Some(ShapeSpec::sized(10.0, 8.0).with_text()),
            Self::Number => Some(
                ShapeSpec::sized(6.0, 6.0)
                    .square()
                    .with_number(NumberBadge::Required),
            ),
            Self::Oval => Some(ShapeSpec::sized(10.0, 8.0).square()),
            Self::Polygon => Some(ShapeSpec::sized(10.0, 10.0)),
            Self::Blur => Some(ShapeSpec::sized(20.0, 15.0)),
            Self::Magnifier => Some(ShapeSpec::sized(12.0, 12.0)),
            Self::Freehand => Some(ShapeSpec {
                default_size: None,
                accepts_text: false,
                number: NumberBadge::None,
                aspect: Aspect::Free,
                min_floor: false,
            }),
            Self::Unknown => None,
        }
    }

    pub const fn default_size(self) -> Option<(f64, f64)> {
        match self.spec() {
            Some(spec) => spec.default_size,
            None => None,
        }
    }

    pub const fn is_point_shape(self) -> bool {
        !matches!(self, Self::Freehand | Self::Unknown)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::Rectangle => "rectangle",
            Self::Arrow => "arrow",
            Self::Number => "number",
            Self::Oval => "oval",
            Self::Polygon => "polygon",
            Self::Blur => "blur",
            Self::Magnifier => "magnifier",
            Self::Freehand => "freehand",
            Self::Unknown => "unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sizes_match_registry_table() {
        let expected = [
            (ShapeKind::Circle, Some((6.0, 6.0))),
            (ShapeKind::Rectangle, Some((15.0, 10.0))),
            (ShapeKind::Arrow, Some((10.0, 8.0))),
            (ShapeKind::Number, Some((6.0, 6.0))),
            (ShapeKind::Oval, Some((10.0, 8.0))),
            (ShapeKind::Polygon, Some((10.0, 10.0))),
            (ShapeKind::Blur, Some((20.0, 15.0))),
            (ShapeKind::Magnifier, Some((12.0, 12.0))),
            (ShapeKind::Freehand, None),
        ];
        for (shape, size) in expected {
            assert_eq!(shape.default_size(), size, "{shape:?} default size");
        }
    }

    #[test]
    fn only_rectangle_and_arrow_accept_text() {
        for shape in ShapeKind::ALL {
            let spec = shape.spec().expect("known shapes have a spec");
            let expected = matches!(shape, ShapeKind::Rectangle | ShapeKind::Arrow);
            assert_eq!(spec.accepts_text, expected, "{shape:?} text capability");
        }
    }

    #[test]
    fn number_badges_follow_registry() {
        assert_eq!(
            ShapeKind::Number.spec().map(|spec| spec.number),
            Some(NumberBadge::Required)
        );
        assert_eq!(
            ShapeKind::Circle.spec().map(|spec| spec.number),
            Some(NumberBadge::Optional)
        );
        assert_eq!(
            ShapeKind::Blur.spec().map(|spec| spec.number),
            Some(NumberBadge::None)
        );
    }

    #[test]
    fn round_shapes_force_square_aspect() {
        for shape in [ShapeKind::Circle, ShapeKind::Number, ShapeKind::Oval] {
            assert_eq!(shape.spec().map(|spec| spec.aspect), Some(Aspect::Square));
        }
        assert_eq!(
            ShapeKind::Arrow.spec().map(|spec| spec.aspect),
            Some(Aspect::Free)
        );
    }

    #[test]
    fn unknown_shape_has_no_spec() {
        assert!(ShapeKind::Unknown.spec().is_none());
        assert!(!ShapeKind::Unknown.is_point_shape());
        assert!(!ShapeKind::Freehand.is_point_shape());
    }
}
