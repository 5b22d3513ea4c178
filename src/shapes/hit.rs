use crate::callout::{Callout, ShapePayload};
use crate::geometry::{PercentPoint, PercentRect, PixelPoint, PixelRect, PixelSize, PERCENT_MAX};

use super::paint::{is_paintable, regular_polygon_points, ARROW_SILHOUETTE};
use super::{Aspect, ShapeKind};

const FREEHAND_HIT_SLOP_PX: f64 = 4.0;

/// The on-screen frame of a callout in pixels relative to the container, after the
/// paint-time floor and aspect rule. Both renderers' CSS resolves to exactly this box.
pub fn effective_frame(
    frame: PercentRect,
    aspect: Aspect,
    floor_px: f64,
    container: PixelSize,
) -> PixelRect {
    let raw = frame.to_pixels(container);
    let floor_px = floor_px.max(0.0);
    match aspect {
        Aspect::Square => {
            let side = raw.width.max(floor_px);
            PixelRect::new(raw.x, raw.y, side, side)
        }
        Aspect::Free => PixelRect::new(
            raw.x,
            raw.y,
            raw.width.max(floor_px),
            raw.height.max(floor_px),
        ),
    }
}

/// Whether `point` (pixels relative to the container) lands on `callout`.
pub fn hit_test(callout: &Callout, point: PixelPoint, container: PixelSize, floor_px: f64) -> bool {
    let Some(spec) = callout.shape.spec() else {
        return false;
    };
    if !container.is_measured() || !is_paintable(callout) {
        return false;
    }
    let floor_px = if spec.min_floor { floor_px } else { 0.0 };
    let frame = effective_frame(callout.bounds(), spec.aspect, floor_px, container);

    match callout.shape {
        ShapeKind::Circle | ShapeKind::Number | ShapeKind::Oval | ShapeKind::Magnifier => {
            inside_ellipse(frame, point)
        }
        ShapeKind::Rectangle | ShapeKind::Blur => frame.contains(point),
        ShapeKind::Arrow => inside_polygon(&frame_points(frame, &ARROW_SILHOUETTE), point),
        ShapeKind::Polygon => {
            let sides = match callout.payload() {
                Some(ShapePayload::Polygon(data)) => data.sides(),
                _ => crate::callout::PolygonData::default().sides(),
            };
            inside_polygon(&frame_points(frame, &regular_polygon_points(sides)), point)
        }
        ShapeKind::Freehand => match callout.payload() {
            Some(ShapePayload::Freehand(data)) => {
                let tolerance = data.stroke_width() / 2.0 + FREEHAND_HIT_SLOP_PX;
                near_polyline(&container_points(container, &data.path), point, tolerance)
            }
            _ => false,
        },
        ShapeKind::Unknown => false,
    }
}

/// The last (topmost) callout under `point`, honoring z-order.
pub fn topmost_hit<'a>(
    callouts: &'a [Callout],
    point: PixelPoint,
    container: PixelSize,
    floor_px: f64,
) -> Option<&'a Callout> {
    callouts
        .iter()
        .rev()
        .find(|callout| hit_test(callout, point, container, floor_px))
}

fn inside_ellipse(frame: PixelRect, point: PixelPoint) -> bool {
    let rx = frame.width / 2.0;
    let ry = frame.height / 2.0;
    if rx <= 0.0 || ry <= 0.0 {
        return false;
    }
    let center = frame.center();
    let dx = (point.x - center.x) / rx;
    let dy = (point.y - center.y) / ry;
    dx * dx + dy * dy <= 1.0
}

fn frame_points(frame: PixelRect, points: &[PercentPoint]) -> Vec<PixelPoint> {
    points
        .iter()
        .map(|point| {
            PixelPoint::new(
                frame.x + point.x * frame.width / PERCENT_MAX,
                frame.y + point.y * frame.height / PERCENT_MAX,
            )
        })
        .collect()
}

fn container_points(container: PixelSize, points: &[PercentPoint]) -> Vec<PixelPoint> {
    frame_points(
        PixelRect::new(0.0, 0.0, container.width, container.height),
        points,
    )
}

/// Even-odd ray casting.
fn inside_polygon(vertices: &[PixelPoint], point: PixelPoint) -> bool {
    if vertices.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut previous = vertices[vertices.len() - 1];
    for &current in vertices {
        let crosses = (current.y > point.y) != (previous.y > point.y);
        if crosses {
            let x_at_y = previous.x
                + (point.y - previous.y) / (current.y - previous.y) * (current.x - previous.x);
            if point.x < x_at_y {
                inside = !inside;
            }
        }
        previous = current;
    }
    inside
}

fn near_polyline(points: &[PixelPoint], point: PixelPoint, tolerance: f64) -> bool {
    points
        .windows(2)
        .any(|segment| distance_to_segment(point, segment[0], segment[1]) <= tolerance)
}

fn distance_to_segment(point: PixelPoint, start: PixelPoint, end: PixelPoint) -> f64 {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let length_sq = dx * dx + dy * dy;
    let t = if length_sq > 0.0 {
        (((point.x - start.x) * dx + (point.y - start.y) * dy) / length_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let closest_x = start.x + t * dx;
    let closest_y = start.y + t * dy;
    ((point.x - closest_x).powi(2) + (point.y - closest_y).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callout::{CalloutDraft, FreehandData};

    const CONTAINER: PixelSize = PixelSize::new(400.0, 300.0);

    fn callout(shape: ShapeKind, bounds: PercentRect) -> Callout {
        CalloutDraft::new(shape, bounds, "#ef4444").into_callout("hit")
    }

    #[test]
    fn numbered_callout_without_positive_number_is_never_hit() {
        let center = PixelPoint::new(200.0, 150.0);
        let mut number = callout(ShapeKind::Number, PercentRect::new(47.0, 47.0, 6.0, 6.0));
        assert!(!hit_test(&number, center, CONTAINER, 40.0));

        number.draft.number = Some(0);
        assert!(!hit_test(&number, center, CONTAINER, 40.0));

        number.draft.number = Some(3);
        assert!(hit_test(&number, center, CONTAINER, 40.0));
    }

    #[test]
    fn square_frame_uses_width_and_floor() {
        let frame = effective_frame(
            PercentRect::new(47.0, 47.0, 6.0, 6.0),
            Aspect::Square,
            40.0,
            CONTAINER,
        );
        assert_eq!(frame, PixelRect::new(188.0, 141.0, 40.0, 40.0));

        let large = effective_frame(
            PercentRect::new(0.0, 0.0, 20.0, 5.0),
            Aspect::Square,
            40.0,
            CONTAINER,
        );
        assert_eq!(large.width, 80.0);
        assert_eq!(large.height, 80.0);
    }

    #[test]
    fn free_frame_floors_each_axis() {
        let frame = effective_frame(
            PercentRect::new(10.0, 10.0, 15.0, 10.0),
            Aspect::Free,
            40.0,
            CONTAINER,
        );
        assert_eq!(frame, PixelRect::new(40.0, 30.0, 60.0, 40.0));
    }

    #[test]
    fn circle_hit_uses_floored_ellipse() {
        let circle = callout(ShapeKind::Circle, PercentRect::new(47.0, 47.0, 6.0, 6.0));
        // floored frame is 188..228 x 141..181
        assert!(hit_test(&circle, PixelPoint::new(208.0, 161.0), CONTAINER, 40.0));
        assert!(!hit_test(&circle, PixelPoint::new(189.0, 142.0), CONTAINER, 40.0));
        assert!(!hit_test(&circle, PixelPoint::new(208.0, 161.0), PixelSize::new(0.0, 0.0), 40.0));
    }

    #[test]
    fn arrow_hit_follows_silhouette() {
        let arrow = callout(ShapeKind::Arrow, PercentRect::new(0.0, 0.0, 25.0, 20.0));
        // frame is 100x60 px
        assert!(hit_test(&arrow, PixelPoint::new(20.0, 30.0), CONTAINER, 40.0));
        assert!(!hit_test(&arrow, PixelPoint::new(20.0, 5.0), CONTAINER, 40.0));
        assert!(hit_test(&arrow, PixelPoint::new(95.0, 30.0), CONTAINER, 40.0));
    }

    #[test]
    fn freehand_hit_tests_near_the_stroke_only() {
        let mut freehand = callout(ShapeKind::Freehand, PercentRect::new(10.0, 10.0, 40.0, 0.0));
        freehand.set_freehand(FreehandData {
            path: vec![PercentPoint::new(10.0, 10.0), PercentPoint::new(50.0, 10.0)],
            stroke_width: 4.0,
        });
        assert!(hit_test(&freehand, PixelPoint::new(100.0, 33.0), CONTAINER, 40.0));
        assert!(!hit_test(&freehand, PixelPoint::new(100.0, 60.0), CONTAINER, 40.0));
    }

    #[test]
    fn unknown_shape_never_hits_and_topmost_prefers_later_callouts() {
        let unknown = callout(ShapeKind::Unknown, PercentRect::new(0.0, 0.0, 100.0, 100.0));
        assert!(!hit_test(&unknown, PixelPoint::new(10.0, 10.0), CONTAINER, 40.0));

        let below = CalloutDraft::new(
            ShapeKind::Rectangle,
            PercentRect::new(0.0, 0.0, 50.0, 50.0),
            "#000",
        )
        .into_callout("below");
        let above = CalloutDraft::new(
            ShapeKind::Blur,
            PercentRect::new(10.0, 10.0, 20.0, 15.0),
            "#000",
        )
        .into_callout("above");
        let callouts = vec![below, above];

        let hit = topmost_hit(&callouts, PixelPoint::new(60.0, 40.0), CONTAINER, 40.0)
            .expect("point lies inside both callouts");
        assert_eq!(hit.id, "above");
        let hit = topmost_hit(&callouts, PixelPoint::new(10.0, 10.0), CONTAINER, 40.0)
            .expect("point lies inside the rectangle");
        assert_eq!(hit.id, "below");
    }
}
