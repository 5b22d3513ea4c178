//! Percentage geometry, client-space containers and colors shared by the controller and renderers.

use serde::{Deserialize, Serialize};

pub const PERCENT_MAX: f64 = 100.0;

/// A point in percent of the rendered image box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentPoint {
    pub x: f64,
    pub y: f64,
}

impl PercentPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Top-left anchored box in percent of the rendered image box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PercentRect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Places a `width` x `height` box so `center` becomes its center, then shifts it back
    /// inside `[0, 100]` on both axes without changing its size.
    pub fn centered_at(center: PercentPoint, width: f64, height: f64) -> Self {
        Self::centered_with_drawn_extent(center, width, height, (width, height))
    }

    /// Like [`Self::centered_at`], but the edge shift uses `drawn`, the extent the box
    /// occupies once painted. That can exceed `width` x `height` when a pixel floor or a
    /// square aspect applies.
    pub fn centered_with_drawn_extent(
        center: PercentPoint,
        width: f64,
        height: f64,
        drawn: (f64, f64),
    ) -> Self {
        let width = width.clamp(0.0, PERCENT_MAX);
        let height = height.clamp(0.0, PERCENT_MAX);
        Self {
            x: shift_into_range(center.x - width / 2.0, drawn.0.max(width)),
            y: shift_into_range(center.y - height / 2.0, drawn.1.max(height)),
            width,
            height,
        }
    }

    /// Smallest box containing every point, or `None` for an empty or non-finite set.
    pub fn bounding(points: &[PercentPoint]) -> Option<Self> {
        let first = *points.first()?;
        let mut min_x = first.x;
        let mut max_x = first.x;
        let mut min_y = first.y;
        let mut max_y = first.y;
        for point in points {
            if !point.is_finite() {
                return None;
            }
            min_x = min_x.min(point.x);
            max_x = max_x.max(point.x);
            min_y = min_y.min(point.y);
            max_y = max_y.max(point.y);
        }
        Some(Self::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }

    pub fn center(&self) -> PercentPoint {
        PercentPoint::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }

    /// Converts to pixels relative to the container's own top-left corner.
    pub fn to_pixels(&self, container: PixelSize) -> PixelRect {
        PixelRect::new(
            self.x * container.width / PERCENT_MAX,
            self.y * container.height / PERCENT_MAX,
            self.width * container.width / PERCENT_MAX,
            self.height * container.height / PERCENT_MAX,
        )
    }
}

fn shift_into_range(start: f64, extent: f64) -> f64 {
    let overflow = (start + extent - PERCENT_MAX).max(0.0);
    (start - overflow).max(0.0)
}

pub fn clamp_percent(value: f64) -> f64 {
    value.clamp(0.0, PERCENT_MAX)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelSize {
    pub width: f64,
    pub height: f64,
}

impl PixelSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_measured(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> PixelPoint {
        PixelPoint::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, point: PixelPoint) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

/// The image container's bounding client rectangle at the time of an event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ContainerRect {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn size(&self) -> PixelSize {
        PixelSize::new(self.width, self.height)
    }

    pub fn is_measured(&self) -> bool {
        self.left.is_finite() && self.top.is_finite() && self.size().is_measured()
    }

    /// Client coordinates to clamped container percentages. `None` when the container has
    /// not been laid out or the input is not finite.
    pub fn to_percent(&self, client_x: f64, client_y: f64) -> Option<PercentPoint> {
        if !self.is_measured() || !client_x.is_finite() || !client_y.is_finite() {
            return None;
        }
        Some(PercentPoint::new(
            clamp_percent((client_x - self.left) * PERCENT_MAX / self.width),
            clamp_percent((client_y - self.top) * PERCENT_MAX / self.height),
        ))
    }

    /// Client coordinates to pixels relative to the container's top-left corner.
    pub fn to_local(&self, client_x: f64, client_y: f64) -> PixelPoint {
        PixelPoint::new(client_x - self.left, client_y - self.top)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rgb` or `#rrggbb` (leading `#` optional).
    pub fn parse(value: &str) -> Option<Self> {
        let digits = value.trim().strip_prefix('#').unwrap_or(value.trim());
        if !digits.is_ascii() {
            return None;
        }
        match digits.len() {
            3 => {
                let mut channels = digits
                    .chars()
                    .map(|digit| digit.to_digit(16).map(|v| (v * 17) as u8));
                Some(Self::new(
                    channels.next()??,
                    channels.next()??,
                    channels.next()??,
                ))
            }
            6 => Some(Self::new(
                u8::from_str_radix(&digits[0..2], 16).ok()?,
                u8::from_str_radix(&digits[2..4], 16).ok()?,
                u8::from_str_radix(&digits[4..6], 16).ok()?,
            )),
            _ => None,
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_css_rgba(self, alpha: f64) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            self.r,
            self.g,
            self.b,
            format_number(alpha.clamp(0.0, 1.0))
        )
    }
}

/// Formats a number for CSS/SVG output: at most four decimals, no trailing zeros.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let rounded = (value * 10_000.0).round() / 10_000.0;
    let text = format!("{rounded:.4}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_percent_maps_center_of_container() {
        let container = ContainerRect::new(10.0, 20.0, 400.0, 300.0);
        let point = container
            .to_percent(210.0, 170.0)
            .expect("measured container should convert");
        assert_eq!(point, PercentPoint::new(50.0, 50.0));
    }

    #[test]
    fn to_percent_clamps_outside_points() {
        let container = ContainerRect::new(0.0, 0.0, 200.0, 100.0);
        let point = container
            .to_percent(-50.0, 1000.0)
            .expect("measured container should convert");
        assert_eq!(point, PercentPoint::new(0.0, 100.0));
    }

    #[test]
    fn to_percent_rejects_unmeasured_container_and_nan_input() {
        assert!(ContainerRect::new(0.0, 0.0, 0.0, 300.0)
            .to_percent(1.0, 1.0)
            .is_none());
        assert!(ContainerRect::new(0.0, 0.0, 400.0, 300.0)
            .to_percent(f64::NAN, 1.0)
            .is_none());
    }

    #[test]
    fn to_percent_stays_within_range_for_sweep() {
        let container = ContainerRect::new(-30.0, 12.5, 333.0, 77.0);
        for step in -20..=60 {
            let client = f64::from(step) * 9.7;
            let point = container
                .to_percent(client, client)
                .expect("measured container should convert");
            assert!((0.0..=100.0).contains(&point.x), "x out of range: {point:?}");
            assert!((0.0..=100.0).contains(&point.y), "y out of range: {point:?}");
        }
    }

    #[test]
    fn centered_at_shifts_instead_of_resizing_near_edges() {
        let rect = PercentRect::centered_at(PercentPoint::new(98.0, 1.0), 6.0, 6.0);
        assert_eq!(rect, PercentRect::new(94.0, 0.0, 6.0, 6.0));
    }

    #[test]
    fn drawn_extent_pulls_box_further_from_edges() {
        let rect = PercentRect::centered_with_drawn_extent(
            PercentPoint::new(100.0, 100.0),
            6.0,
            6.0,
            (10.0, 20.0),
        );
        assert_eq!(rect, PercentRect::new(90.0, 80.0, 6.0, 6.0));

        let centered = PercentRect::centered_with_drawn_extent(
            PercentPoint::new(50.0, 50.0),
            6.0,
            6.0,
            (10.0, 20.0),
        );
        assert_eq!(centered, PercentRect::new(47.0, 47.0, 6.0, 6.0));
    }

    #[test]
    fn centered_at_anchors_center_when_there_is_room() {
        let rect = PercentRect::centered_at(PercentPoint::new(50.0, 50.0), 6.0, 6.0);
        assert_eq!(rect, PercentRect::new(47.0, 47.0, 6.0, 6.0));
    }

    #[test]
    fn bounding_covers_all_points() {
        let rect = PercentRect::bounding(&[
            PercentPoint::new(10.0, 40.0),
            PercentPoint::new(30.0, 20.0),
            PercentPoint::new(15.0, 35.0),
        ])
        .expect("non-empty set should have bounds");
        assert_eq!(rect, PercentRect::new(10.0, 20.0, 20.0, 20.0));
        assert!(PercentRect::bounding(&[]).is_none());
    }

    #[test]
    fn hex_color_parses_short_and_long_forms() {
        assert_eq!(HexColor::parse("#fff"), Some(HexColor::new(255, 255, 255)));
        assert_eq!(HexColor::parse("#EF4444"), Some(HexColor::new(239, 68, 68)));
        assert_eq!(HexColor::parse("12ab34"), Some(HexColor::new(0x12, 0xab, 0x34)));
        assert_eq!(HexColor::parse("#12ab3"), None);
        assert_eq!(HexColor::parse("#zzz"), None);
        assert_eq!(HexColor::new(1, 2, 255).to_hex(), "#0102ff");
    }

    #[test]
    fn format_number_trims_trailing_zeros() {
        assert_eq!(format_number(47.0), "47");
        assert_eq!(format_number(12.5), "12.5");
        assert_eq!(format_number(1.0 / 3.0), "0.3333");
        assert_eq!(format_number(f64::NAN), "0");
        assert_eq!(format_number(-0.00001), "0");
    }
}
