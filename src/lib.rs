//! Callout overlay engine for illustrated standard operating procedures.
//!
//! Callouts are stored as percentages of the screenshot they annotate. The
//! [`editor::OverlayController`] turns pointer and keyboard input into callout mutations,
//! [`reveal::RevealState`] tracks click-to-reveal popups, and the two renderers in
//! [`render`] draw the same callouts live and as exported HTML.

pub mod callout;
pub mod config;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod input;
pub mod logging;
pub mod render;
pub mod reveal;
pub mod shapes;
pub mod state;

pub use callout::{Callout, CalloutDraft, Screenshot};
pub use editor::{CalloutHost, OverlayController};
pub use error::{AppError, AppResult};
pub use shapes::ShapeKind;

/// Parses a screenshot document and renders it as an exported HTML figure.
pub fn export_screenshot_json(json: &str, config: &config::OverlayConfig) -> AppResult<String> {
    let screenshot = Screenshot::from_json(json)?;
    tracing::info!(
        image = %screenshot.image_ref,
        callouts = screenshot.callouts.len(),
        "exporting screenshot"
    );
    let options = render::export::ExportOptions::from_config(config);
    Ok(render::export::render_screenshot_figure(&screenshot, &options))
}
