//! Shared element description for both callout renderers.
//!
//! Geometry and appearance are decided once here, from a [`PaintPlan`], as a small element
//! tree. The live renderer hands that tree to the host as DOM properties and the export
//! renderer serializes it to HTML, so the two cannot drift apart.

pub mod export;
pub mod live;

use crate::callout::{BlurKind, Callout};
use crate::geometry::{format_number, PercentPoint, PercentRect, PERCENT_MAX};
use crate::shapes::{paint, Aspect, DrawOp, Fill, Font, PaintContext, PaintPlan, Stroke};

pub type Declarations = Vec<(&'static str, String)>;
pub type Attributes = Vec<(&'static str, String)>;

/// One element of a rendered callout.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Node {
    pub tag: &'static str,
    pub attrs: Attributes,
    pub style: Declarations,
    pub text: Option<String>,
    pub children: Vec<Node>,
}

impl Node {
    fn new(tag: &'static str) -> Self {
        Self {
            tag,
            ..Self::default()
        }
    }

    fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    fn style(mut self, declarations: Declarations) -> Self {
        self.style.extend(declarations);
        self
    }

    fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    fn child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn attr_value(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(attr, _)| *attr == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Paints `callout` and describes it as an element tree. `None` for callouts that paint
/// nothing, such as unknown shapes.
pub fn callout_node(callout: &Callout, context: &PaintContext<'_>) -> Option<Node> {
    let Some(plan) = paint(callout, context) else {
        tracing::debug!(id = %callout.id, shape = ?callout.shape, "callout renders nothing");
        return None;
    };
    Some(plan_node(&callout.id, &plan))
}

pub fn plan_node(id: &str, plan: &PaintPlan) -> Node {
    let mut node = Node::new("div")
        .attr("data-callout-id", id)
        .attr("data-shape", plan.shape.label())
        .style(frame_style(plan));
    node.children = plan.ops.iter().map(|op| op_node(op, plan)).collect();
    node
}

/// Positioning declarations for a callout frame: percentage box, the pixel floor and the
/// square aspect rule.
pub fn frame_style(plan: &PaintPlan) -> Declarations {
    let frame = plan.frame;
    let mut style = vec![
        ("position", "absolute".to_string()),
        ("left", percent(frame.x)),
        ("top", percent(frame.y)),
        ("width", percent(frame.width)),
    ];
    match plan.aspect {
        Aspect::Square => style.push(("aspect-ratio", "1 / 1".to_string())),
        Aspect::Free => style.push(("height", percent(frame.height))),
    }
    if plan.floor_px > 0.0 {
        style.push(("min-width", pixels(plan.floor_px)));
        style.push(("min-height", pixels(plan.floor_px)));
    }
    style.push(("box-sizing", "border-box".to_string()));
    style
}

/// Element for one paint instruction, filling its callout frame.
pub fn op_node(op: &DrawOp, plan: &PaintPlan) -> Node {
    match op {
        DrawOp::Ellipse { stroke, fill } => {
            Node::new("div").style(box_style("50%".to_string(), stroke.as_ref(), fill.as_ref()))
        }
        DrawOp::RoundedBox {
            radius_px,
            stroke,
            fill,
        } => Node::new("div").style(box_style(pixels(*radius_px), Some(stroke), fill.as_ref())),
        DrawOp::Polygon {
            points,
            stroke,
            fill,
        } => {
            let mut shape = Node::new("polygon").attr("points", polygon_points(points));
            shape.attrs.extend(svg_paint(stroke.as_ref(), fill.as_ref()));
            svg_canvas().child(shape.style(vec![(
                "vector-effect",
                "non-scaling-stroke".to_string(),
            )]))
        }
        DrawOp::Path { points, stroke } => {
            let mut path = Node::new("path").attr("d", path_data(points));
            path.attrs.extend(svg_paint(Some(stroke), None));
            path.attrs.push(("stroke-linecap", "round".to_string()));
            path.attrs.push(("stroke-linejoin", "round".to_string()));
            svg_canvas().child(path.style(vec![(
                "vector-effect",
                "non-scaling-stroke".to_string(),
            )]))
        }
        DrawOp::Label { text, font } => {
            Node::new("div").style(text_style(font, false)).text(text.clone())
        }
        DrawOp::Badge { number, font } => {
            Node::new("span").style(text_style(font, true)).text(number.to_string())
        }
        DrawOp::Obscure { intensity, kind } => {
            let filter = format!("blur({})", pixels(*intensity));
            let kind = match kind {
                BlurKind::Blur => "blur",
                BlurKind::Pixelate => "pixelate",
            };
            Node::new("div").attr("data-obscure", kind).style(vec![
                ("position", "absolute".to_string()),
                ("inset", "0".to_string()),
                ("backdrop-filter", filter.clone()),
                ("-webkit-backdrop-filter", filter),
            ])
        }
        DrawOp::Lens {
            image_ref,
            zoom,
            focus,
            border,
        } => Node::new("div").style(lens_style(image_ref, *zoom, *focus, plan.frame, border.as_ref())),
    }
}

fn box_style(radius: String, stroke: Option<&Stroke>, fill: Option<&Fill>) -> Declarations {
    let mut style = vec![
        ("position", "absolute".to_string()),
        ("inset", "0".to_string()),
        ("box-sizing", "border-box".to_string()),
        ("border-radius", radius),
    ];
    if let Some(stroke) = stroke {
        style.push(("border", border(stroke)));
    }
    if let Some(fill) = fill {
        style.push(("background-color", fill.color.to_css_rgba(fill.opacity)));
    }
    style
}

fn text_style(font: &Font, bold: bool) -> Declarations {
    let mut style = vec![
        ("position", "absolute".to_string()),
        ("inset", "0".to_string()),
        ("display", "flex".to_string()),
        ("align-items", "center".to_string()),
        ("justify-content", "center".to_string()),
        ("text-align", "center".to_string()),
        ("color", font.color.to_hex()),
        ("font-size", pixels(font.size)),
        ("font-family", font.family.clone()),
        ("line-height", "1".to_string()),
    ];
    if bold {
        style.push(("font-weight", "700".to_string()));
    }
    style
}

fn lens_style(
    image_ref: &str,
    zoom: f64,
    focus: PercentPoint,
    frame: PercentRect,
    border_stroke: Option<&Stroke>,
) -> Declarations {
    let scale_x = image_scale(zoom, frame.width);
    let scale_y = image_scale(zoom, frame.height);
    let mut style = vec![
        ("position", "absolute".to_string()),
        ("inset", "0".to_string()),
        ("box-sizing", "border-box".to_string()),
        ("border-radius", "50%".to_string()),
        ("overflow", "hidden".to_string()),
        ("background-image", format!("url(\"{}\")", css_string(image_ref))),
        ("background-repeat", "no-repeat".to_string()),
        (
            "background-size",
            format!("{} {}", percent(scale_x * PERCENT_MAX), percent(scale_y * PERCENT_MAX)),
        ),
        (
            "background-position",
            format!(
                "{} {}",
                percent(focus_position(scale_x, focus.x)),
                percent(focus_position(scale_y, focus.y))
            ),
        ),
    ];
    if let Some(stroke) = border_stroke {
        style.push(("border", border(stroke)));
    }
    style
}

/// Size of the zoomed image relative to the lens box along one axis.
fn image_scale(zoom: f64, frame_extent: f64) -> f64 {
    if frame_extent > 0.0 {
        zoom * PERCENT_MAX / frame_extent
    } else {
        zoom
    }
}

/// CSS percentage background position that puts `focus` (percent of the image) at the
/// center of the lens.
fn focus_position(scale: f64, focus: f64) -> f64 {
    if (scale - 1.0).abs() < f64::EPSILON {
        return 50.0;
    }
    (0.5 - scale * focus / PERCENT_MAX) / (1.0 - scale) * PERCENT_MAX
}

fn svg_canvas() -> Node {
    Node::new("svg")
        .attr("viewBox", "0 0 100 100")
        .attr("preserveAspectRatio", "none")
        .style(vec![
            ("position", "absolute".to_string()),
            ("inset", "0".to_string()),
            ("width", "100%".to_string()),
            ("height", "100%".to_string()),
            ("overflow", "visible".to_string()),
        ])
}

fn svg_paint(stroke: Option<&Stroke>, fill: Option<&Fill>) -> Attributes {
    let mut attrs = Vec::new();
    match fill {
        Some(fill) => {
            attrs.push(("fill", fill.color.to_hex()));
            attrs.push(("fill-opacity", format_number(fill.opacity)));
        }
        None => attrs.push(("fill", "none".to_string())),
    }
    match stroke {
        Some(stroke) => {
            attrs.push(("stroke", stroke.color.to_hex()));
            attrs.push(("stroke-width", format_number(stroke.width)));
        }
        None => attrs.push(("stroke", "none".to_string())),
    }
    attrs
}

/// SVG `points` list, vertices in order.
pub fn polygon_points(points: &[PercentPoint]) -> String {
    points
        .iter()
        .map(|point| format!("{},{}", format_number(point.x), format_number(point.y)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// SVG path data visiting every vertex in order, without resampling.
pub fn path_data(points: &[PercentPoint]) -> String {
    let mut data = String::with_capacity(points.len() * 12);
    for (index, point) in points.iter().enumerate() {
        if index > 0 {
            data.push(' ');
        }
        data.push(if index == 0 { 'M' } else { 'L' });
        data.push_str(&format_number(point.x));
        data.push(' ');
        data.push_str(&format_number(point.y));
    }
    data
}

/// Joins declarations into an inline `style` value.
pub fn style_text(style: &[(&'static str, String)]) -> String {
    style
        .iter()
        .map(|(property, value)| format!("{property}: {value}"))
        .collect::<Vec<_>>()
        .join("; ")
}

pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Contents of a double-quoted CSS string. Control characters become hex escapes so a
/// newline cannot end the string early.
fn css_string(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' | '"' => {
                out.push('\\');
                out.push(ch);
            }
            ch if ch.is_control() => out.push_str(&format!("\\{:x} ", u32::from(ch))),
            ch => out.push(ch),
        }
    }
    out
}

fn border(stroke: &Stroke) -> String {
    format!("{} solid {}", pixels(stroke.width), stroke.color.to_hex())
}

fn percent(value: f64) -> String {
    format!("{}%", format_number(value))
}

fn pixels(value: f64) -> String {
    format!("{}px", format_number(value))
}
