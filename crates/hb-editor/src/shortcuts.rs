//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. On macOS `meta`
//! is ⌘; elsewhere `ctrl` plays the same role.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    /// Escape: leave well placement and dismiss the segment panel.
    Cancel,
    Undo,
}

pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action, or `None` if the combo is unbound.
    pub fn resolve(
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
    ) -> Option<ShortcutAction> {
        let cmd = ctrl || meta;

        if cmd && !shift && !alt {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Undo),
                _ => None,
            };
        }

        match key {
            "Escape" | "Esc" => Some(ShortcutAction::Cancel),
            _ => None,
        }
    }
}
