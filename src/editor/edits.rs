use crate::callout::{Callout, CalloutStyle};
use crate::geometry::HexColor;
use crate::shapes::ShapeKind;

use super::{CalloutHost, EditorError, EditorResult, OverlayController};

impl OverlayController {
    /// Deletes the selected callout through the host. Returns the deleted id.
    pub fn delete_selected<H: CalloutHost>(&mut self, host: &mut H) -> Option<String> {
        let id = self.selected.take()?;
        if !host.callouts().iter().any(|callout| callout.id == id) {
            tracing::debug!(%id, "selected callout already gone");
            return None;
        }
        host.on_callout_delete(&id);
        tracing::debug!(%id, "callout deleted");
        Some(id)
    }

    /// Drops the selection if the host no longer has the selected callout.
    pub fn sync_selection<H: CalloutHost>(&mut self, host: &H) {
        let missing = self
            .selected
            .as_deref()
            .is_some_and(|id| !host.callouts().iter().any(|callout| callout.id == id));
        if missing {
            self.selected = None;
        }
    }

    pub fn recolor_selected<H: CalloutHost>(&mut self, host: &mut H, color: &str) -> EditorResult<()> {
        let color = HexColor::parse(color)
            .ok_or_else(|| EditorError::InvalidColor(color.to_string()))?
            .to_hex();
        let id = self.selected.clone().ok_or(EditorError::NoSelection)?;
        self.update_callout(host, &id, |callout| {
            callout.color = color;
            Ok(())
        })
    }

    /// Replaces the hidden text of a numbered callout. Blank text clears it.
    pub fn update_reveal_text<H: CalloutHost>(
        &mut self,
        host: &mut H,
        id: &str,
        text: Option<String>,
    ) -> EditorResult<()> {
        self.update_callout(host, id, |callout| {
            if callout.shape != ShapeKind::Number {
                return Err(EditorError::TextNotAccepted(callout.shape));
            }
            callout.reveal_text = text.filter(|text| !text.trim().is_empty());
            Ok(())
        })
    }

    /// Sets the visible label of a shape that carries one.
    pub fn update_label<H: CalloutHost>(
        &mut self,
        host: &mut H,
        id: &str,
        text: Option<String>,
    ) -> EditorResult<()> {
        self.update_callout(host, id, |callout| {
            let accepts_text = callout.shape.spec().is_some_and(|spec| spec.accepts_text);
            if !accepts_text {
                return Err(EditorError::TextNotAccepted(callout.shape));
            }
            callout.text = text.filter(|text| !text.trim().is_empty());
            Ok(())
        })
    }

    pub fn update_style<H: CalloutHost>(
        &mut self,
        host: &mut H,
        id: &str,
        style: CalloutStyle,
    ) -> EditorResult<()> {
        self.update_callout(host, id, |callout| {
            callout.style = (style != CalloutStyle::default()).then_some(style);
            Ok(())
        })
    }

    fn update_callout<H, F>(&mut self, host: &mut H, id: &str, apply: F) -> EditorResult<()>
    where
        H: CalloutHost,
        F: FnOnce(&mut Callout) -> EditorResult<()>,
    {
        if !self.is_editing {
            return Err(EditorError::NotEditing);
        }
        let mut callout = host
            .callouts()
            .iter()
            .find(|callout| callout.id == id)
            .cloned()
            .ok_or_else(|| EditorError::CalloutNotFound(id.to_string()))?;
        apply(&mut callout)?;
        host.on_callout_update(callout);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callout::{CalloutDraft, Screenshot};
    use crate::geometry::PercentRect;
    use crate::input::{ShortcutAction, ShortcutKey, ShortcutModifiers};

    fn screenshot_with(shapes: &[ShapeKind]) -> Screenshot {
        let mut screenshot = Screenshot::new("img.png");
        for shape in shapes {
            screenshot.push_draft(CalloutDraft::new(
                *shape,
                PercentRect::new(10.0, 10.0, 15.0, 10.0),
                "#ef4444",
            ));
        }
        screenshot
    }

    fn editing() -> OverlayController {
        let mut controller = OverlayController::default();
        controller.set_editing(true);
        controller
    }

    #[test]
    fn delete_key_removes_selected_callout() {
        let mut screenshot = screenshot_with(&[ShapeKind::Rectangle]);
        let id = screenshot.callouts[0].id.clone();
        let mut controller = editing();
        controller.selected = Some(id.clone());

        let action = controller.handle_key(
            &mut screenshot,
            ShortcutKey::Delete,
            ShortcutModifiers::default(),
        );
        assert_eq!(action, Some(ShortcutAction::DeleteSelection));
        assert!(screenshot.callouts.is_empty());
        assert_eq!(controller.selected(), None);
    }

    #[test]
    fn delete_selected_ignores_stale_selection() {
        let mut screenshot = screenshot_with(&[]);
        let mut controller = editing();
        controller.selected = Some("gone".to_string());
        assert_eq!(controller.delete_selected(&mut screenshot), None);
        assert_eq!(controller.selected(), None);
    }

    #[test]
    fn sync_selection_clears_missing_ids() {
        let screenshot = screenshot_with(&[ShapeKind::Circle]);
        let mut controller = editing();
        controller.selected = Some(screenshot.callouts[0].id.clone());
        controller.sync_selection(&screenshot);
        assert!(controller.selected().is_some());

        controller.selected = Some("gone".to_string());
        controller.sync_selection(&screenshot);
        assert_eq!(controller.selected(), None);
    }

    #[test]
    fn recolor_selected_normalizes_hex() {
        let mut screenshot = screenshot_with(&[ShapeKind::Oval]);
        let mut controller = editing();
        controller.selected = Some(screenshot.callouts[0].id.clone());
        controller
            .recolor_selected(&mut screenshot, "#0F0")
            .expect("valid color applies");
        assert_eq!(screenshot.callouts[0].color, "#00ff00");
        assert!(matches!(
            controller.recolor_selected(&mut screenshot, "green"),
            Err(EditorError::InvalidColor(_))
        ));
    }

    #[test]
    fn labels_only_apply_to_text_shapes() {
        let mut screenshot = screenshot_with(&[ShapeKind::Rectangle, ShapeKind::Blur]);
        let rect_id = screenshot.callouts[0].id.clone();
        let blur_id = screenshot.callouts[1].id.clone();
        let mut controller = editing();

        controller
            .update_label(&mut screenshot, &rect_id, Some("Open panel".to_string()))
            .expect("rectangles take labels");
        assert_eq!(screenshot.callouts[0].text.as_deref(), Some("Open panel"));
        assert!(matches!(
            controller.update_label(&mut screenshot, &blur_id, Some("x".to_string())),
            Err(EditorError::TextNotAccepted(ShapeKind::Blur))
        ));
    }

    #[test]
    fn reveal_text_updates_require_numbered_callout() {
        let mut screenshot = screenshot_with(&[ShapeKind::Number, ShapeKind::Circle]);
        let number_id = screenshot.callouts[0].id.clone();
        let circle_id = screenshot.callouts[1].id.clone();
        let mut controller = editing();

        controller
            .update_reveal_text(&mut screenshot, &number_id, Some("Hidden".to_string()))
            .expect("numbered callouts take reveal text");
        assert_eq!(screenshot.callouts[0].reveal_text(), Some("Hidden"));
        controller
            .update_reveal_text(&mut screenshot, &number_id, Some(" ".to_string()))
            .expect("blank text clears");
        assert_eq!(screenshot.callouts[0].reveal_text, None);
        assert!(controller
            .update_reveal_text(&mut screenshot, &circle_id, Some("x".to_string()))
            .is_err());
    }

    #[test]
    fn update_style_and_missing_ids() {
        let mut screenshot = screenshot_with(&[ShapeKind::Circle]);
        let id = screenshot.callouts[0].id.clone();
        let mut controller = editing();

        let style = CalloutStyle {
            border_width: Some(5.0),
            ..CalloutStyle::default()
        };
        controller
            .update_style(&mut screenshot, &id, style.clone())
            .expect("style applies");
        assert_eq!(screenshot.callouts[0].style, Some(style));

        controller
            .update_style(&mut screenshot, &id, CalloutStyle::default())
            .expect("empty style clears overrides");
        assert_eq!(screenshot.callouts[0].style, None);

        assert!(matches!(
            controller.update_style(&mut screenshot, "missing", CalloutStyle::default()),
            Err(EditorError::CalloutNotFound(_))
        ));
    }

    #[test]
    fn edits_require_edit_mode() {
        let mut screenshot = screenshot_with(&[ShapeKind::Circle]);
        let id = screenshot.callouts[0].id.clone();
        let mut controller = OverlayController::default();
        assert!(matches!(
            controller.update_style(&mut screenshot, &id, CalloutStyle::default()),
            Err(EditorError::NotEditing)
        ));
    }
}
