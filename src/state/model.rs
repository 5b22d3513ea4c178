/// Placement/drawing state of the overlay. Selection is tracked separately by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Placing,
    /// A numbered callout is staged while the host collects its reveal text.
    AwaitingRevealText,
    DrawingFreehand,
}

impl InteractionState {
    pub const fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }
}
