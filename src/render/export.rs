//! Static HTML export of a screenshot's callouts.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::callout::{Callout, Screenshot};
use crate::config::OverlayConfig;
use crate::geometry::{format_number, HexColor};
use crate::shapes::PaintContext;

use super::{callout_node, escape_html, style_text, Node};

const SUMMARY_STYLE: &str = "position: absolute; inset: 0; list-style: none; cursor: pointer";
const REVEAL_STYLE: &str = "position: absolute; left: 50%; top: 50%; \
     transform: translate(-50%, calc(-100% - 8px)); z-index: 10";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to read image dimensions from {}", path.display())]
    ImageProbe {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

pub type ExportResult<T> = std::result::Result<T, ExportError>;

#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    /// Width of the image box in percent of the page.
    pub image_box_percent: f64,
    /// Emit reveal callouts as `<details>` disclosures.
    pub interactive: bool,
    pub floor_px: f64,
    pub default_color: HexColor,
    /// Intrinsic image size, written as `width`/`height` on the `<img>`.
    pub image_size: Option<(u32, u32)>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::from_config(&OverlayConfig::default())
    }
}

impl ExportOptions {
    pub fn from_config(config: &OverlayConfig) -> Self {
        Self {
            image_box_percent: config.image_box_percent(),
            interactive: config.export_interactive,
            floor_px: config.min_pixel_size(),
            default_color: config.default_color(),
            image_size: None,
        }
    }

    /// Records the pixel size of the image at `path`.
    pub fn with_image_file(mut self, path: impl AsRef<Path>) -> ExportResult<Self> {
        let path = path.as_ref();
        let size = image::image_dimensions(path).map_err(|source| ExportError::ImageProbe {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(?path, width = size.0, height = size.1, "probed export image size");
        self.image_size = Some(size);
        Ok(self)
    }
}

/// Overlay layer markup: one absolutely positioned element per paintable callout. The layer
/// spans `image_box_percent` of its positioned parent's width, matching an image drawn at
/// that width from the parent's left edge.
pub fn render_callouts_to_markup(
    callouts: &[Callout],
    image_ref: &str,
    options: &ExportOptions,
) -> String {
    let context = PaintContext {
        image_ref,
        floor_px: options.floor_px,
        default_color: options.default_color,
    };
    let mut out = String::new();
    let _ = write!(
        out,
        "<div class=\"stepmark-overlay\" style=\"position: absolute; left: 0; top: 0; \
         width: {}%; height: 100%\">",
        format_number(options.image_box_percent)
    );
    let mut rendered = 0_usize;
    for callout in callouts {
        let Some(node) = callout_node(callout, &context) else {
            continue;
        };
        rendered += 1;
        match callout.reveal_text().filter(|_| options.interactive && callout.has_reveal()) {
            Some(reveal) => write_disclosure(&mut out, &node, reveal),
            None => write_node(&mut out, &node),
        }
    }
    out.push_str("</div>");
    tracing::debug!(total = callouts.len(), rendered, "exported callout markup");
    out
}

/// A self-contained figure: the image at `image_box_percent` of the page width with its
/// overlay on top.
pub fn render_screenshot_figure(screenshot: &Screenshot, options: &ExportOptions) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "<figure class=\"stepmark-figure\" style=\"position: relative; margin: 0\">\
         <img src=\"{}\" alt=\"\"",
        escape_html(&screenshot.image_ref)
    );
    if let Some((width, height)) = options.image_size {
        let _ = write!(out, " width=\"{width}\" height=\"{height}\"");
    }
    let _ = write!(
        out,
        " style=\"display: block; width: {}%; height: auto\">",
        format_number(options.image_box_percent)
    );
    out.push_str(&render_callouts_to_markup(
        &screenshot.callouts,
        &screenshot.image_ref,
        options,
    ));
    out.push_str("</figure>");
    out
}

/// Writes the callout frame as `<details>`, its painted content as the `<summary>` and the
/// reveal text as the disclosed body.
fn write_disclosure(out: &mut String, node: &Node, reveal: &str) {
    let frame = Node {
        tag: "details",
        attrs: node.attrs.clone(),
        style: node.style.clone(),
        ..Node::default()
    };
    write_open_tag(out, &frame);
    let _ = write!(out, "<summary style=\"{SUMMARY_STYLE}\">");
    for child in &node.children {
        write_node(out, child);
    }
    out.push_str("</summary>");
    let _ = write!(
        out,
        "<div class=\"stepmark-reveal\" role=\"note\" style=\"{REVEAL_STYLE}\">{}</div>",
        escape_html(reveal)
    );
    out.push_str("</details>");
}

fn write_node(out: &mut String, node: &Node) {
    write_open_tag(out, node);
    if let Some(text) = &node.text {
        out.push_str(&escape_html(text));
    }
    for child in &node.children {
        write_node(out, child);
    }
    let _ = write!(out, "</{}>", node.tag);
}

fn write_open_tag(out: &mut String, node: &Node) {
    let _ = write!(out, "<{}", node.tag);
    for (name, value) in &node.attrs {
        let _ = write!(out, " {name}=\"{}\"", escape_html(value));
    }
    if !node.style.is_empty() {
        let _ = write!(out, " style=\"{}\"", escape_html(&style_text(&node.style)));
    }
    out.push('>');
}
