use std::collections::VecDeque;

use super::error::{StateError, StateResult};
use super::{event::StateTransition, InteractionEvent, InteractionState};

const TRANSITION_HISTORY_LIMIT: usize = 64;

#[derive(Debug)]
pub struct InteractionMachine {
    state: InteractionState,
    transition_history: VecDeque<StateTransition>,
}

impl InteractionMachine {
    pub fn new() -> Self {
        Self {
            state: InteractionState::default(),
            transition_history: VecDeque::new(),
        }
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn next_state(&self, event: InteractionEvent) -> Option<InteractionState> {
        use InteractionEvent::*;
        use InteractionState::*;
        match (self.state, event) {
            (Idle | Placing, ChooseTool) => Some(Placing),
            (Placing, PlacePoint) => Some(Idle),
            (Placing, StageNumber) => Some(AwaitingRevealText),
            (AwaitingRevealText, ResolveReveal) => Some(Idle),
            (Placing, PressFreehand) => Some(DrawingFreehand),
            (DrawingFreehand, ReleaseFreehand) => Some(Placing),
            (_, Cancel) | (_, Abort) => Some(Idle),
            _ => None,
        }
    }

    pub fn transition(&mut self, event: InteractionEvent) -> StateResult<InteractionState> {
        tracing::debug!(from = ?self.state, event = ?event, "request interaction transition");
        let next = self.next_state(event).ok_or_else(|| {
            let from = self.state;
            tracing::warn!(from = ?from, event = ?event, "invalid interaction transition requested");
            StateError::InvalidStateTransition { from, event }
        })?;

        if self.transition_history.len() == TRANSITION_HISTORY_LIMIT {
            self.transition_history.pop_front();
        }
        self.transition_history
            .push_back(StateTransition::new(self.state, event, next));
        self.state = next;

        Ok(self.state)
    }

    pub fn last_transition(&self) -> Option<&StateTransition> {
        self.transition_history.back()
    }
}

#[cfg(test)]
impl InteractionMachine {
    fn can_transition(&self, event: InteractionEvent) -> bool {
        self.next_state(event).is_some()
    }

    fn history(&self) -> impl Iterator<Item = &StateTransition> {
        self.transition_history.iter()
    }
}

impl Default for InteractionMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for InteractionMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "InteractionState::{:?}", self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_transition_tracks_valid_and_invalid_events() {
        let mut machine = InteractionMachine::new();
        assert!(machine.can_transition(InteractionEvent::ChooseTool));
        assert!(machine.can_transition(InteractionEvent::Cancel));
        assert!(!machine.can_transition(InteractionEvent::PlacePoint));
        assert!(!machine.can_transition(InteractionEvent::ReleaseFreehand));

        let _ = machine
            .transition(InteractionEvent::ChooseTool)
            .expect("idle -> placing should transition");

        assert!(machine.can_transition(InteractionEvent::PlacePoint));
        assert!(machine.can_transition(InteractionEvent::PressFreehand));
        assert!(!machine.can_transition(InteractionEvent::ResolveReveal));
    }

    #[test]
    fn transition_records_history_with_ordered_entries() {
        let mut machine = InteractionMachine::new();
        for event in [
            InteractionEvent::ChooseTool,
            InteractionEvent::PressFreehand,
            InteractionEvent::ReleaseFreehand,
            InteractionEvent::StageNumber,
            InteractionEvent::ResolveReveal,
        ] {
            let _ = machine
                .transition(event)
                .expect("scripted transition should work");
        }

        assert_eq!(machine.state(), InteractionState::Idle);
        let history = machine.history().copied().collect::<Vec<_>>();
        assert_eq!(history.len(), 5);
        assert_eq!(
            history[1],
            StateTransition::new(
                InteractionState::Placing,
                InteractionEvent::PressFreehand,
                InteractionState::DrawingFreehand
            )
        );
        assert_eq!(
            history[3],
            StateTransition::new(
                InteractionState::Placing,
                InteractionEvent::StageNumber,
                InteractionState::AwaitingRevealText
            )
        );
    }

    #[test]
    fn cancel_is_valid_from_every_state() {
        for setup in [
            &[][..],
            &[InteractionEvent::ChooseTool][..],
            &[InteractionEvent::ChooseTool, InteractionEvent::PressFreehand][..],
            &[InteractionEvent::ChooseTool, InteractionEvent::StageNumber][..],
        ] {
            let mut machine = InteractionMachine::new();
            for event in setup {
                let _ = machine.transition(*event).expect("setup should work");
            }
            assert_eq!(
                machine
                    .transition(InteractionEvent::Cancel)
                    .expect("cancel always works"),
                InteractionState::Idle
            );
        }
    }

    #[test]
    fn invalid_transition_returns_error_without_mutating_history() {
        let mut machine = InteractionMachine::new();

        let err = machine
            .transition(InteractionEvent::ResolveReveal)
            .expect_err("idle -> resolve reveal should fail");
        assert!(matches!(
            err,
            StateError::InvalidStateTransition {
                from: InteractionState::Idle,
                event: InteractionEvent::ResolveReveal
            }
        ));
        assert_eq!(machine.state(), InteractionState::Idle);
        assert_eq!(machine.history().count(), 0);
    }

    #[test]
    fn history_is_bounded() {
        let mut machine = InteractionMachine::new();
        for _ in 0..(TRANSITION_HISTORY_LIMIT * 2) {
            let _ = machine
                .transition(InteractionEvent::Cancel)
                .expect("cancel always works");
        }
        assert_eq!(machine.history().count(), TRANSITION_HISTORY_LIMIT);
    }

    #[test]
    fn last_transition_and_display_describe_current_state() {
        let mut machine = InteractionMachine::new();
        assert!(machine.last_transition().is_none());
        assert_eq!(machine.to_string(), "InteractionState::Idle");

        let _ = machine
            .transition(InteractionEvent::ChooseTool)
            .expect("idle -> placing should transition");
        assert_eq!(
            machine.last_transition().copied(),
            Some(StateTransition::new(
                InteractionState::Idle,
                InteractionEvent::ChooseTool,
                InteractionState::Placing,
            ))
        );
        assert_eq!(machine.to_string(), "InteractionState::Placing");
    }
}
