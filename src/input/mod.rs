mod pointer;
mod shortcut;

pub use pointer::{PointerButton, PointerEvent};
pub use shortcut::{
    resolve_shortcut, InputContext, ShortcutAction, ShortcutKey, ShortcutModifiers,
};
