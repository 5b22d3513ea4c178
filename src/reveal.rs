//! Click-to-reveal state for numbered callouts carrying hidden text.
//!
//! Each eligible callout moves one way from unrevealed to revealed the first time it is
//! clicked. Independently, at most one popup is open at a time. None of this is persisted.

use std::collections::HashSet;

use crate::callout::Callout;
use crate::geometry::{ContainerRect, PixelPoint, PixelSize};
use crate::input::PointerEvent;
use crate::shapes::{effective_frame, is_paintable, topmost_hit};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealOutcome {
    Opened,
    Switched { from: String },
    Closed,
    Ignored,
}

#[derive(Debug, Clone, Default)]
pub struct RevealState {
    revealed: HashSet<String>,
    active: Option<String>,
}

impl RevealState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn is_revealed(&self, id: &str) -> bool {
        self.revealed.contains(id)
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed.len()
    }

    /// Toggles the popup for `callout`. Callouts without reveal text, or that paint
    /// nothing, are ignored.
    pub fn click(&mut self, callout: &Callout) -> RevealOutcome {
        if !callout.has_reveal() || !is_paintable(callout) {
            return RevealOutcome::Ignored;
        }

        self.revealed.insert(callout.id.clone());
        let outcome = match self.active.take() {
            Some(active) if active == callout.id => RevealOutcome::Closed,
            Some(active) => {
                self.active = Some(callout.id.clone());
                RevealOutcome::Switched { from: active }
            }
            None => {
                self.active = Some(callout.id.clone());
                RevealOutcome::Opened
            }
        };
        tracing::debug!(id = %callout.id, ?outcome, "reveal toggled");
        outcome
    }

    /// View-mode click routing: the topmost callout under the pointer gets the click, and
    /// a click on empty space closes any open popup.
    pub fn click_at(
        &mut self,
        callouts: &[Callout],
        container: &ContainerRect,
        event: PointerEvent,
        floor_px: f64,
    ) -> RevealOutcome {
        let Some(point) = event.local_in(container) else {
            return RevealOutcome::Ignored;
        };
        match topmost_hit(callouts, point, container.size(), floor_px) {
            Some(callout) => self.click(callout),
            None if self.dismiss() => RevealOutcome::Closed,
            None => RevealOutcome::Ignored,
        }
    }

    /// Closes the open popup, if any. Returns whether one was open.
    pub fn dismiss(&mut self) -> bool {
        self.active.take().is_some()
    }

    /// Forgets callouts that are no longer in the collection.
    pub fn prune(&mut self, callouts: &[Callout]) {
        let live = callouts
            .iter()
            .map(|callout| callout.id.as_str())
            .collect::<HashSet<_>>();
        self.revealed.retain(|id| live.contains(id.as_str()));
        if self
            .active
            .as_deref()
            .is_some_and(|active| !live.contains(active))
        {
            self.active = None;
        }
    }

    /// Center of the active callout's on-screen frame for the container's current size.
    pub fn popup_anchor(
        &self,
        callouts: &[Callout],
        container: PixelSize,
        floor_px: f64,
    ) -> Option<PixelPoint> {
        let active = self.active.as_deref()?;
        let callout = callouts.iter().find(|callout| callout.id == active)?;
        popup_anchor_for(callout, container, floor_px)
    }
}

pub fn popup_anchor_for(callout: &Callout, container: PixelSize, floor_px: f64) -> Option<PixelPoint> {
    if !container.is_measured() {
        return None;
    }
    let spec = callout.shape.spec()?;
    let floor_px = if spec.min_floor { floor_px } else { 0.0 };
    Some(effective_frame(callout.bounds(), spec.aspect, floor_px, container).center())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callout::CalloutDraft;
    use crate::geometry::PercentRect;
    use crate::shapes::ShapeKind;

    fn numbered(id: &str, number: u32, reveal: Option<&str>) -> Callout {
        let mut draft = CalloutDraft::new(
            ShapeKind::Number,
            PercentRect::new(47.0, 47.0, 6.0, 6.0),
            "#ef4444",
        );
        draft.number = Some(number);
        draft.reveal_text = reveal.map(str::to_string);
        draft.into_callout(id)
    }

    #[test]
    fn second_click_closes_but_keeps_revealed() {
        let callout = numbered("a", 1, Some("Check the voltage"));
        let mut state = RevealState::new();

        assert_eq!(state.click(&callout), RevealOutcome::Opened);
        assert_eq!(state.active(), Some("a"));
        assert!(state.is_revealed("a"));

        assert_eq!(state.click(&callout), RevealOutcome::Closed);
        assert_eq!(state.active(), None);
        assert!(state.is_revealed("a"));
    }

    #[test]
    fn numbered_callout_without_a_number_cannot_be_revealed() {
        let mut callout = numbered("a", 1, Some("hidden"));
        callout.draft.number = None;
        let mut state = RevealState::new();

        assert_eq!(state.click(&callout), RevealOutcome::Ignored);
        assert_eq!(state.active(), None);
        assert!(!state.is_revealed("a"));

        callout.draft.number = Some(0);
        let container = ContainerRect::new(0.0, 0.0, 400.0, 300.0);
        assert_eq!(
            state.click_at(&[callout], &container, PointerEvent::at(200.0, 150.0), 40.0),
            RevealOutcome::Ignored
        );
    }

    #[test]
    fn clicking_other_eligible_callout_switches_popup() {
        let first = numbered("a", 1, Some("one"));
        let second = numbered("b", 2, Some("two"));
        let mut state = RevealState::new();

        state.click(&first);
        assert_eq!(
            state.click(&second),
            RevealOutcome::Switched {
                from: "a".to_string()
            }
        );
        assert_eq!(state.active(), Some("b"));
        assert_eq!(state.revealed_count(), 2);
    }

    #[test]
    fn ineligible_callouts_are_ignored() {
        let plain = numbered("a", 1, None);
        let blank = numbered("b", 2, Some("  "));
        let circle = CalloutDraft::new(
            ShapeKind::Circle,
            PercentRect::new(0.0, 0.0, 6.0, 6.0),
            "#000",
        )
        .into_callout("c");
        let eligible = numbered("d", 3, Some("text"));
        let mut state = RevealState::new();
        state.click(&eligible);

        for callout in [&plain, &blank, &circle] {
            assert_eq!(state.click(callout), RevealOutcome::Ignored);
        }
        assert_eq!(state.active(), Some("d"));
        assert_eq!(state.revealed_count(), 1);
    }

    #[test]
    fn click_on_empty_space_dismisses_and_dismiss_is_idempotent() {
        let callouts = vec![numbered("a", 1, Some("text"))];
        let container = ContainerRect::new(0.0, 0.0, 400.0, 300.0);
        let mut state = RevealState::new();

        assert_eq!(
            state.click_at(&callouts, &container, PointerEvent::at(208.0, 161.0), 40.0),
            RevealOutcome::Opened
        );
        assert_eq!(
            state.click_at(&callouts, &container, PointerEvent::at(5.0, 5.0), 40.0),
            RevealOutcome::Closed
        );
        assert_eq!(
            state.click_at(&callouts, &container, PointerEvent::at(5.0, 5.0), 40.0),
            RevealOutcome::Ignored
        );
        assert!(!state.dismiss());
        assert!(state.is_revealed("a"));
    }

    #[test]
    fn popup_anchor_tracks_container_resize() {
        let callouts = vec![numbered("a", 1, Some("text"))];
        let mut state = RevealState::new();
        state.click(&callouts[0]);

        let small = state
            .popup_anchor(&callouts, PixelSize::new(400.0, 300.0), 40.0)
            .expect("anchor for open popup");
        assert_eq!(small, PixelPoint::new(208.0, 161.0));

        let large = state
            .popup_anchor(&callouts, PixelSize::new(1600.0, 1200.0), 40.0)
            .expect("anchor for open popup");
        // square frames take their side from the width
        assert_eq!(large, PixelPoint::new(800.0, 612.0));

        assert!(state
            .popup_anchor(&callouts, PixelSize::new(0.0, 0.0), 40.0)
            .is_none());
    }

    #[test]
    fn prune_forgets_deleted_callouts() {
        let callout = numbered("a", 1, Some("text"));
        let mut state = RevealState::new();
        state.click(&callout);
        state.prune(&[]);
        assert_eq!(state.active(), None);
        assert!(!state.is_revealed("a"));
    }
}
