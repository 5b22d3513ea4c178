use crate::geometry::{ContainerRect, PercentPoint, PixelPoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerButton {
    #[default]
    Primary,
    Secondary,
    Other,
}

/// A raw pointer event as delivered by the host. Coordinates are client-space and may be
/// missing on malformed events.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerEvent {
    pub client_x: Option<f64>,
    pub client_y: Option<f64>,
    pub button: PointerButton,
}

impl PointerEvent {
    pub const fn at(client_x: f64, client_y: f64) -> Self {
        Self {
            client_x: Some(client_x),
            client_y: Some(client_y),
            button: PointerButton::Primary,
        }
    }

    pub const fn malformed() -> Self {
        Self {
            client_x: None,
            client_y: None,
            button: PointerButton::Primary,
        }
    }

    pub fn client_position(&self) -> Option<(f64, f64)> {
        let x = self.client_x.filter(|x| x.is_finite())?;
        let y = self.client_y.filter(|y| y.is_finite())?;
        Some((x, y))
    }

    /// Percent position inside `container`, or `None` for malformed events and
    /// unmeasured containers.
    pub fn percent_in(&self, container: &ContainerRect) -> Option<PercentPoint> {
        let (x, y) = self.client_position()?;
        container.to_percent(x, y)
    }

    pub fn local_in(&self, container: &ContainerRect) -> Option<PixelPoint> {
        let (x, y) = self.client_position()?;
        container
            .is_measured()
            .then(|| container.to_local(x, y))
    }
}
