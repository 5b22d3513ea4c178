use crate::callout::{
    next_callout_number, BlurData, CalloutDraft, FreehandData, MagnifierData, PolygonData,
};
use crate::geometry::{ContainerRect, PercentPoint, PercentRect, PixelSize, PERCENT_MAX};
use crate::input::{PointerButton, PointerEvent};
use crate::shapes::{effective_frame, topmost_hit, ShapeKind};
use crate::state::{InteractionEvent, InteractionState};

use super::{CalloutHost, EditorError, EditorResult, OverlayController, PointerOutcome};

/// A freehand stroke needs two distinct vertices to be worth keeping.
const MIN_FREEHAND_VERTICES: usize = 2;

impl OverlayController {
    /// Primary-button press on the image container.
    pub fn pointer_down<H: CalloutHost>(
        &mut self,
        host: &mut H,
        container: &ContainerRect,
        event: PointerEvent,
    ) -> PointerOutcome {
        if event.button != PointerButton::Primary {
            return PointerOutcome::Ignored;
        }
        match self.state() {
            InteractionState::Placing => self.place_at(host, container, event),
            InteractionState::Idle if self.is_editing => self.select_at(host, container, event),
            InteractionState::Idle
            | InteractionState::AwaitingRevealText
            | InteractionState::DrawingFreehand => PointerOutcome::Ignored,
        }
    }

    /// Pointer motion. Only an in-progress freehand stroke listens; each call appends at
    /// most one vertex.
    pub fn pointer_move(&mut self, container: &ContainerRect, event: PointerEvent) -> PointerOutcome {
        if self.state() != InteractionState::DrawingFreehand {
            return PointerOutcome::Ignored;
        }
        let Some(point) = event.percent_in(container) else {
            return self.abort("malformed pointer move while drawing");
        };
        if self.push_vertex(point) {
            PointerOutcome::VertexAppended
        } else {
            PointerOutcome::Ignored
        }
    }

    /// Pointer release. Finishes a freehand stroke; the freehand tool stays active.
    pub fn pointer_up<H: CalloutHost>(
        &mut self,
        host: &mut H,
        container: &ContainerRect,
        event: PointerEvent,
    ) -> PointerOutcome {
        if self.state() != InteractionState::DrawingFreehand {
            return PointerOutcome::Ignored;
        }
        let Some(point) = event.percent_in(container) else {
            return self.abort("malformed pointer release while drawing");
        };
        self.push_vertex(point);

        let path = std::mem::take(&mut self.freehand_path);
        if let Err(err) = self.machine.transition(InteractionEvent::ReleaseFreehand) {
            tracing::warn!(?err, "freehand release rejected");
            return self.abort("freehand release out of order");
        }

        let Some(bounds) = PercentRect::bounding(&path).filter(|_| path.len() >= MIN_FREEHAND_VERTICES)
        else {
            tracing::debug!(vertices = path.len(), "discarding degenerate freehand stroke");
            return PointerOutcome::Discarded;
        };

        let mut draft = CalloutDraft::new(ShapeKind::Freehand, bounds, self.color.clone());
        draft.set_freehand(FreehandData {
            path,
            stroke_width: self.freehand_stroke_width,
        });
        tracing::debug!(?bounds, "freehand callout committed");
        host.on_callout_add(draft);
        PointerOutcome::Committed(ShapeKind::Freehand)
    }

    /// Completes a staged numbered callout. Blank text stores no reveal text; `None` is the
    /// skip path. The callout is committed either way.
    pub fn resolve_reveal_text<H: CalloutHost>(
        &mut self,
        host: &mut H,
        text: Option<String>,
    ) -> EditorResult<u32> {
        if self.state() != InteractionState::AwaitingRevealText {
            return Err(EditorError::NothingStaged);
        }
        let mut draft = self.pending_callout.take().ok_or(EditorError::NothingStaged)?;
        self.machine.transition(InteractionEvent::ResolveReveal)?;

        let taken = host
            .callouts()
            .iter()
            .any(|callout| callout.shape == ShapeKind::Number && callout.number == draft.number);
        if taken || draft.number.is_none() {
            draft.number = Some(next_callout_number(host.callouts()));
        }
        draft.reveal_text = text.filter(|text| !text.trim().is_empty());
        self.tool = None;

        let number = draft.number.unwrap_or(1);
        tracing::debug!(number, has_reveal = draft.reveal_text.is_some(), "numbered callout committed");
        host.on_callout_add(draft);
        Ok(number)
    }

    fn place_at<H: CalloutHost>(
        &mut self,
        host: &mut H,
        container: &ContainerRect,
        event: PointerEvent,
    ) -> PointerOutcome {
        let Some(tool) = self.tool else {
            return self.abort("placing without a tool");
        };
        let Some(point) = event.percent_in(container) else {
            return self.abort("pointer press without usable coordinates");
        };

        if tool == ShapeKind::Freehand {
            if let Err(err) = self.machine.transition(InteractionEvent::PressFreehand) {
                tracing::warn!(?err, "freehand press rejected");
                return PointerOutcome::Ignored;
            }
            self.freehand_path.clear();
            self.freehand_path.push(point);
            return PointerOutcome::DrawingStarted;
        }

        let Some(draft) = self.point_draft(tool, point, container.size()) else {
            return self.abort("tool has no default size");
        };

        if tool == ShapeKind::Number {
            let number = next_callout_number(host.callouts());
            let mut draft = draft;
            draft.number = Some(number);
            if let Err(err) = self.machine.transition(InteractionEvent::StageNumber) {
                tracing::warn!(?err, "number staging rejected");
                return PointerOutcome::Ignored;
            }
            self.pending_callout = Some(draft);
            return PointerOutcome::AwaitingRevealText { number };
        }

        if let Err(err) = self.machine.transition(InteractionEvent::PlacePoint) {
            tracing::warn!(?err, "placement rejected");
            return PointerOutcome::Ignored;
        }
        self.tool = None;
        tracing::debug!(tool = tool.label(), x = draft.x, y = draft.y, "callout placed");
        host.on_callout_add(draft);
        PointerOutcome::Committed(tool)
    }

    /// Builds a default-size callout centered on `point` with the shape's default payload.
    /// The box is kept inside the container at the size it will be painted at.
    fn point_draft(
        &self,
        tool: ShapeKind,
        point: PercentPoint,
        container: PixelSize,
    ) -> Option<CalloutDraft> {
        let spec = tool.spec()?;
        let (width, height) = spec.default_size?;
        let floor_px = if spec.min_floor { self.floor_px } else { 0.0 };
        let drawn = effective_frame(
            PercentRect::new(0.0, 0.0, width, height),
            spec.aspect,
            floor_px,
            container,
        );
        let bounds = PercentRect::centered_with_drawn_extent(
            point,
            width,
            height,
            (
                drawn.width * PERCENT_MAX / container.width,
                drawn.height * PERCENT_MAX / container.height,
            ),
        );
        let mut draft = CalloutDraft::new(tool, bounds, self.color.clone());
        match tool {
            ShapeKind::Blur => draft.set_blur(BlurData::default()),
            ShapeKind::Magnifier => draft.set_magnifier(MagnifierData::default()),
            ShapeKind::Polygon => draft.set_polygon(PolygonData::default()),
            _ => {}
        }
        Some(draft)
    }

    fn select_at<H: CalloutHost>(
        &mut self,
        host: &mut H,
        container: &ContainerRect,
        event: PointerEvent,
    ) -> PointerOutcome {
        let Some(point) = event.local_in(container) else {
            return PointerOutcome::Ignored;
        };
        let hit = topmost_hit(host.callouts(), point, container.size(), self.floor_px)
            .map(|callout| callout.id.clone());
        match hit {
            Some(id) if self.selected.as_deref() == Some(id.as_str()) => {
                self.selected = None;
                PointerOutcome::Deselected
            }
            Some(id) => {
                self.selected = Some(id.clone());
                PointerOutcome::Selected(id)
            }
            None if self.selected.take().is_some() => PointerOutcome::Deselected,
            None => PointerOutcome::Ignored,
        }
    }

    fn push_vertex(&mut self, point: PercentPoint) -> bool {
        if self.freehand_path.last() == Some(&point) {
            return false;
        }
        self.freehand_path.push(point);
        true
    }
}
