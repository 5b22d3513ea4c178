//! Live overlay renderer: produces DOM properties for the host to apply.

use crate::callout::Callout;
use crate::geometry::{format_number, HexColor, PixelSize};
use crate::reveal::{popup_anchor_for, RevealState};
use crate::shapes::{is_paintable, PaintContext};

use super::{callout_node, Declarations, Node};

const SELECTION_OUTLINE: &str = "2px dashed #3b82f6";

#[derive(Debug, Clone, Copy)]
pub struct LiveContext<'a> {
    pub image_ref: &'a str,
    pub floor_px: f64,
    pub default_color: HexColor,
    /// Current size of the image container.
    pub container: PixelSize,
    pub editing: bool,
    pub selected: Option<&'a str>,
    pub reveal: Option<&'a RevealState>,
}

impl<'a> LiveContext<'a> {
    fn paint_context(&self) -> PaintContext<'a> {
        PaintContext {
            image_ref: self.image_ref,
            floor_px: self.floor_px,
            default_color: self.default_color,
        }
    }
}

/// A DOM element description: tag, inline style, attributes and children.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveElement {
    pub tag: &'static str,
    pub callout_id: Option<String>,
    pub style: Declarations,
    pub attrs: Vec<(&'static str, String)>,
    pub text: Option<String>,
    pub children: Vec<LiveElement>,
    /// Whether the element should receive pointer events.
    pub interactive: bool,
}

impl LiveElement {
    fn from_node(node: Node) -> Self {
        Self {
            tag: node.tag,
            callout_id: None,
            style: node.style,
            attrs: node.attrs,
            text: node.text,
            children: node.children.into_iter().map(Self::from_node).collect(),
            interactive: false,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(attr, _)| *attr == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn style_value(&self, property: &str) -> Option<&str> {
        self.style
            .iter()
            .find(|(name, _)| *name == property)
            .map(|(_, value)| value.as_str())
    }
}

/// Renders every paintable callout in z-order, followed by the open reveal popup if any.
pub fn render_live(callouts: &[Callout], context: &LiveContext<'_>) -> Vec<LiveElement> {
    let paint_context = context.paint_context();
    let mut elements = callouts
        .iter()
        .filter_map(|callout| {
            let node = callout_node(callout, &paint_context)?;
            Some(decorate(callout, LiveElement::from_node(node), context))
        })
        .collect::<Vec<_>>();

    if !context.editing {
        if let Some(popup) = reveal_popup(callouts, context) {
            elements.push(popup);
        }
    }
    elements
}

fn decorate(callout: &Callout, mut element: LiveElement, context: &LiveContext<'_>) -> LiveElement {
    element.callout_id = Some(callout.id.clone());
    if context.editing {
        element.interactive = true;
        if context.selected == Some(callout.id.as_str()) {
            element.attrs.push(("data-selected", "true".to_string()));
            element.children.push(selection_outline());
        }
        return element;
    }

    if callout.has_reveal() {
        element.interactive = true;
        element.attrs.push(("role", "button".to_string()));
        let revealed = context
            .reveal
            .is_some_and(|reveal| reveal.is_revealed(&callout.id));
        if revealed {
            element.attrs.push(("data-revealed", "true".to_string()));
        }
    }
    element
}

fn selection_outline() -> LiveElement {
    LiveElement {
        tag: "div",
        callout_id: None,
        style: vec![
            ("position", "absolute".to_string()),
            ("inset", "-4px".to_string()),
            ("outline", SELECTION_OUTLINE.to_string()),
            ("pointer-events", "none".to_string()),
        ],
        attrs: vec![("data-selection", "true".to_string())],
        text: None,
        children: Vec::new(),
        interactive: false,
    }
}

fn reveal_popup(callouts: &[Callout], context: &LiveContext<'_>) -> Option<LiveElement> {
    let active = context.reveal?.active()?;
    let callout = callouts
        .iter()
        .find(|callout| callout.id == active)
        .filter(|callout| is_paintable(callout))?;
    let text = callout.reveal_text()?;
    let anchor = popup_anchor_for(callout, context.container, context.floor_px)?;

    Some(LiveElement {
        tag: "div",
        callout_id: Some(callout.id.clone()),
        style: vec![
            ("position", "absolute".to_string()),
            ("left", format!("{}px", format_number(anchor.x))),
            ("top", format!("{}px", format_number(anchor.y))),
            ("transform", "translate(-50%, calc(-100% - 8px))".to_string()),
            ("z-index", "10".to_string()),
        ],
        attrs: vec![("role", "tooltip".to_string())],
        text: Some(text.to_string()),
        children: Vec::new(),
        interactive: true,
    })
}
