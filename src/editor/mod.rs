//! Interaction controller: turns pointer and keyboard input into callout mutations.
//!
//! The controller never owns the callout collection. It reads the host's current callouts
//! and reports every change through [`CalloutHost`], which persists them.

mod edits;
mod placement;

use thiserror::Error;

use crate::callout::{Callout, CalloutDraft, Screenshot};
use crate::config::OverlayConfig;
use crate::geometry::PercentPoint;
use crate::input::{
    resolve_shortcut, InputContext, ShortcutAction, ShortcutKey, ShortcutModifiers,
};
use crate::shapes::ShapeKind;
use crate::state::{InteractionEvent, InteractionMachine, InteractionState, StateError};

/// Receiver of overlay mutations. Mirrors the host callbacks of the step editor.
pub trait CalloutHost {
    fn callouts(&self) -> &[Callout];
    fn on_callout_add(&mut self, draft: CalloutDraft);
    fn on_callout_update(&mut self, callout: Callout);
    fn on_callout_delete(&mut self, id: &str);
}

impl CalloutHost for Screenshot {
    fn callouts(&self) -> &[Callout] {
        &self.callouts
    }

    fn on_callout_add(&mut self, draft: CalloutDraft) {
        let id = self.push_draft(draft);
        tracing::debug!(%id, "callout added to screenshot");
    }

    fn on_callout_update(&mut self, callout: Callout) {
        let id = callout.id.clone();
        if !self.replace(callout) {
            tracing::warn!(%id, "update for unknown callout ignored");
        }
    }

    fn on_callout_delete(&mut self, id: &str) {
        if self.remove(id).is_none() {
            tracing::debug!(%id, "delete for unknown callout ignored");
        }
    }
}

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("shape {0:?} cannot be placed")]
    UnsupportedTool(ShapeKind),
    #[error("overlay is not in edit mode")]
    NotEditing,
    #[error("no callout is selected")]
    NoSelection,
    #[error("no callout with id {0}")]
    CalloutNotFound(String),
    #[error("shape {0:?} does not accept a text label")]
    TextNotAccepted(ShapeKind),
    #[error("no numbered callout is waiting for reveal text")]
    NothingStaged,
    #[error("invalid color {0:?}")]
    InvalidColor(String),
    #[error(transparent)]
    State(#[from] StateError),
}

pub type EditorResult<T> = std::result::Result<T, EditorError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerOutcome {
    /// A callout was handed to the host.
    Committed(ShapeKind),
    /// A numbered callout is staged; the host should prompt for reveal text.
    AwaitingRevealText { number: u32 },
    DrawingStarted,
    VertexAppended,
    Selected(String),
    Deselected,
    /// A freehand path too short to keep was dropped.
    Discarded,
    /// Malformed input or an unmeasured container cancelled the operation.
    Aborted,
    Ignored,
}

#[derive(Debug)]
pub struct OverlayController {
    machine: InteractionMachine,
    tool: Option<ShapeKind>,
    pending_callout: Option<CalloutDraft>,
    freehand_path: Vec<PercentPoint>,
    selected: Option<String>,
    is_editing: bool,
    color: String,
    freehand_stroke_width: f64,
    floor_px: f64,
}

impl Default for OverlayController {
    fn default() -> Self {
        Self::new(&OverlayConfig::default())
    }
}

impl OverlayController {
    pub fn new(config: &OverlayConfig) -> Self {
        Self {
            machine: InteractionMachine::new(),
            tool: None,
            pending_callout: None,
            freehand_path: Vec::new(),
            selected: None,
            is_editing: false,
            color: config.default_color().to_hex(),
            freehand_stroke_width: config.freehand_stroke_width(),
            floor_px: config.min_pixel_size(),
        }
    }

    pub fn state(&self) -> InteractionState {
        self.machine.state()
    }

    pub fn active_tool(&self) -> Option<ShapeKind> {
        self.tool
    }

    pub fn is_editing(&self) -> bool {
        self.is_editing
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn pending_callout(&self) -> Option<&CalloutDraft> {
        self.pending_callout.as_ref()
    }

    pub fn freehand_path(&self) -> &[PercentPoint] {
        &self.freehand_path
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn floor_px(&self) -> f64 {
        self.floor_px
    }

    /// Switches between edit and view mode. Leaving edit mode cancels any placement in
    /// progress and clears the selection.
    pub fn set_editing(&mut self, editing: bool) {
        if self.is_editing && !editing {
            self.cancel();
            self.selected = None;
        }
        self.is_editing = editing;
    }

    /// Color used for callouts placed from now on.
    pub fn set_color(&mut self, color: &str) -> EditorResult<()> {
        let parsed = crate::geometry::HexColor::parse(color)
            .ok_or_else(|| EditorError::InvalidColor(color.to_string()))?;
        self.color = parsed.to_hex();
        Ok(())
    }

    /// Activates a placement tool (`idle -> placing`, or switches tools while placing).
    pub fn begin_placement(&mut self, tool: ShapeKind) -> EditorResult<()> {
        if !self.is_editing {
            return Err(EditorError::NotEditing);
        }
        if tool.spec().is_none() {
            return Err(EditorError::UnsupportedTool(tool));
        }
        self.machine.transition(InteractionEvent::ChooseTool)?;
        self.tool = Some(tool);
        self.selected = None;
        tracing::debug!(tool = tool.label(), "placement tool active");
        Ok(())
    }

    /// Escape: drops any staged callout or in-progress path and returns to idle. Returns
    /// whether anything was in progress. Safe to call in any state.
    pub fn cancel(&mut self) -> bool {
        let was_busy = !self.state().is_idle()
            || self.pending_callout.is_some()
            || !self.freehand_path.is_empty();
        self.reset(InteractionEvent::Cancel);
        if was_busy {
            tracing::debug!("placement cancelled");
        }
        was_busy
    }

    fn abort(&mut self, reason: &'static str) -> PointerOutcome {
        tracing::warn!(
            machine = %self.machine,
            last = ?self.machine.last_transition(),
            reason,
            "aborting placement"
        );
        self.reset(InteractionEvent::Abort);
        PointerOutcome::Aborted
    }

    fn reset(&mut self, event: InteractionEvent) {
        self.pending_callout = None;
        self.freehand_path.clear();
        self.tool = None;
        if !self.state().is_idle() {
            // cancel and abort are accepted from every state
            let _ = self.machine.transition(event);
        }
    }

    pub fn input_context(&self) -> InputContext {
        let state = self.state();
        InputContext {
            prompt_open: state == InteractionState::AwaitingRevealText,
            drawing: state == InteractionState::DrawingFreehand,
            tool_active: state == InteractionState::Placing,
            has_selection: self.selected.is_some(),
            editing: self.is_editing,
        }
    }

    /// Resolves and applies a keyboard shortcut. `RevealConfirm` is returned without being
    /// applied because the host owns the prompt's text; it should follow up with
    /// [`OverlayController::resolve_reveal_text`].
    pub fn handle_key<H: CalloutHost>(
        &mut self,
        host: &mut H,
        key: ShortcutKey,
        modifiers: ShortcutModifiers,
    ) -> Option<ShortcutAction> {
        let action = resolve_shortcut(key, modifiers, self.input_context())?;
        match action {
            ShortcutAction::RevealConfirm => {}
            ShortcutAction::RevealSkip => {
                if let Err(err) = self.resolve_reveal_text(host, None) {
                    tracing::debug!(?err, "reveal skip without staged callout");
                }
            }
            ShortcutAction::CancelPlacement => {
                self.cancel();
            }
            ShortcutAction::ClearSelection => {
                self.selected = None;
            }
            ShortcutAction::DeleteSelection => {
                self.delete_selected(host);
            }
            ShortcutAction::ChooseTool(tool) => {
                if let Err(err) = self.begin_placement(tool) {
                    tracing::debug!(?err, "tool shortcut rejected");
                    return None;
                }
            }
        }
        Some(action)
    }
}
