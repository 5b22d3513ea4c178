use crate::shapes::ShapeKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutKey {
    Character(char),
    Enter,
    Escape,
    Delete,
    Backspace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShortcutModifiers {
    pub ctrl: bool,
    pub shift: bool,
}

impl ShortcutModifiers {
    pub const fn new(ctrl: bool, shift: bool) -> Self {
        Self { ctrl, shift }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputContext {
    pub prompt_open: bool,
    pub drawing: bool,
    pub tool_active: bool,
    pub has_selection: bool,
    pub editing: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    RevealConfirm,
    RevealSkip,
    CancelPlacement,
    ClearSelection,
    DeleteSelection,
    ChooseTool(ShapeKind),
}

fn resolve_prompt_shortcut(key: ShortcutKey) -> Option<ShortcutAction> {
    match key {
        ShortcutKey::Enter => Some(ShortcutAction::RevealConfirm),
        ShortcutKey::Escape => Some(ShortcutAction::RevealSkip),
        _ => None,
    }
}

fn resolve_placement_shortcut(key: ShortcutKey) -> Option<ShortcutAction> {
    match key {
        ShortcutKey::Escape => Some(ShortcutAction::CancelPlacement),
        _ => None,
    }
}

fn resolve_tool_shortcut(key: ShortcutKey) -> Option<ShortcutAction> {
    let shape = match key {
        ShortcutKey::Character('c') => ShapeKind::Circle,
        ShortcutKey::Character('r') => ShapeKind::Rectangle,
        ShortcutKey::Character('a') => ShapeKind::Arrow,
        ShortcutKey::Character('n') => ShapeKind::Number,
        ShortcutKey::Character('o') => ShapeKind::Oval,
        ShortcutKey::Character('p') => ShapeKind::Polygon,
        ShortcutKey::Character('b') => ShapeKind::Blur,
        ShortcutKey::Character('m') => ShapeKind::Magnifier,
        ShortcutKey::Character('f') => ShapeKind::Freehand,
        _ => return None,
    };
    Some(ShortcutAction::ChooseTool(shape))
}

fn resolve_editor_shortcut(
    key: ShortcutKey,
    modifiers: ShortcutModifiers,
    context: InputContext,
) -> Option<ShortcutAction> {
    match (key, modifiers.ctrl, modifiers.shift) {
        (ShortcutKey::Delete, false, false) | (ShortcutKey::Backspace, false, false)
            if context.has_selection =>
        {
            Some(ShortcutAction::DeleteSelection)
        }
        (ShortcutKey::Escape, _, _) if context.has_selection => {
            Some(ShortcutAction::ClearSelection)
        }
        (ShortcutKey::Escape, _, _) => Some(ShortcutAction::CancelPlacement),
        (_, false, false) => resolve_tool_shortcut(key),
        _ => None,
    }
}

pub fn resolve_shortcut(
    key: ShortcutKey,
    modifiers: ShortcutModifiers,
    context: InputContext,
) -> Option<ShortcutAction> {
    if context.prompt_open {
        return resolve_prompt_shortcut(key);
    }

    if context.drawing || context.tool_active {
        return resolve_placement_shortcut(key);
    }

    if context.editing {
        return resolve_editor_shortcut(key, modifiers, context);
    }

    // view mode still honors escape so cancellation is always safe
    resolve_placement_shortcut(key)
}
