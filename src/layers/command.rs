use std::str::FromStr;

use crate::foundation::core::Vec2;
use crate::foundation::error::QuireError;
use crate::plugin::kernel::Editor;
use crate::workspace::guides::PrintGuideKind;

/// A host UI command. Hotkeys and menu entries map 1:1 onto these.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HostCommand {
    /// Raise the selected object one step.
    Raise,
    /// Raise the selected object to the top of its band.
    RaiseToTop,
    /// Lower the selected object one step.
    Lower,
    /// Lower the selected object to the bottom of its band.
    LowerToBottom,
    /// Delete the selection with companions.
    Delete,
    /// Lock the selection.
    Lock,
    /// Unlock the selection.
    Unlock,
    /// Show the selection.
    Show,
    /// Hide the selection.
    Hide,
    /// Group the selection.
    Group,
    /// Ungroup the selected group.
    Ungroup,
    /// Move the selection by a fixed offset.
    Nudge(Vec2),
    /// Step back in history.
    Undo,
    /// Step forward in history.
    Redo,
    /// Flip rulers on or off.
    ToggleRuler,
    /// Flip one print guide.
    ToggleGuide(PrintGuideKind),
}

const NUDGE: f64 = 1.0;
const NUDGE_LARGE: f64 = 10.0;

impl HostCommand {
    /// Command bound to a hotkey such as `"ctrl+]"` or `"shift+arrowleft"`.
    pub fn from_hotkey(hotkey: &str) -> Option<Self> {
        let key = hotkey.to_ascii_lowercase().replace(' ', "");
        let step = |big: bool| if big { NUDGE_LARGE } else { NUDGE };
        let (shift, base) = match key.strip_prefix("shift+") {
            Some(rest) => (true, rest),
            None => (false, key.as_str()),
        };
        let cmd = match base {
            "ctrl+]" => {
                if shift {
                    HostCommand::RaiseToTop
                } else {
                    HostCommand::Raise
                }
            }
            "ctrl+[" => {
                if shift {
                    HostCommand::LowerToBottom
                } else {
                    HostCommand::Lower
                }
            }
            "delete" | "backspace" => HostCommand::Delete,
            "ctrl+l" => {
                if shift {
                    HostCommand::Unlock
                } else {
                    HostCommand::Lock
                }
            }
            "ctrl+h" => {
                if shift {
                    HostCommand::Show
                } else {
                    HostCommand::Hide
                }
            }
            "ctrl+g" => {
                if shift {
                    HostCommand::Ungroup
                } else {
                    HostCommand::Group
                }
            }
            "ctrl+z" => {
                if shift {
                    HostCommand::Redo
                } else {
                    HostCommand::Undo
                }
            }
            "ctrl+y" if !shift => HostCommand::Redo,
            "ctrl+r" if !shift => HostCommand::ToggleRuler,
            "arrowleft" => HostCommand::Nudge(Vec2::new(-step(shift), 0.0)),
            "arrowright" => HostCommand::Nudge(Vec2::new(step(shift), 0.0)),
            "arrowup" => HostCommand::Nudge(Vec2::new(0.0, -step(shift))),
            "arrowdown" => HostCommand::Nudge(Vec2::new(0.0, step(shift))),
            _ => return None,
        };
        Some(cmd)
    }
}

impl FromStr for HostCommand {
    type Err = QuireError;

    /// Parse a command name (`raise`, `delete`, `toggle-cut-border`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cmd = match s {
            "raise" => HostCommand::Raise,
            "raise-to-top" => HostCommand::RaiseToTop,
            "lower" => HostCommand::Lower,
            "lower-to-bottom" => HostCommand::LowerToBottom,
            "delete" => HostCommand::Delete,
            "lock" => HostCommand::Lock,
            "unlock" => HostCommand::Unlock,
            "show" => HostCommand::Show,
            "hide" => HostCommand::Hide,
            "group" => HostCommand::Group,
            "ungroup" => HostCommand::Ungroup,
            "undo" => HostCommand::Undo,
            "redo" => HostCommand::Redo,
            "toggle-ruler" => HostCommand::ToggleRuler,
            "toggle-cut-border" => HostCommand::ToggleGuide(PrintGuideKind::CutBorder),
            "toggle-safe-border" => HostCommand::ToggleGuide(PrintGuideKind::SafeBorder),
            other => {
                return Err(QuireError::validation(format!("unknown command '{other}'")));
            }
        };
        Ok(cmd)
    }
}

impl Editor {
    /// Run one host command. Returns `true` when it changed anything.
    pub fn execute(&mut self, cmd: HostCommand) -> bool {
        tracing::debug!(?cmd, "execute");
        match cmd {
            HostCommand::Raise => self.raise_selected(),
            HostCommand::RaiseToTop => self.raise_selected_to_top(),
            HostCommand::Lower => self.lower_selected(),
            HostCommand::LowerToBottom => self.lower_selected_to_bottom(),
            HostCommand::Delete => !self.delete_selected().is_empty(),
            HostCommand::Lock => self.lock_selected() > 0,
            HostCommand::Unlock => self.unlock_selected() > 0,
            HostCommand::Show => self.set_selected_visible(true) > 0,
            HostCommand::Hide => self.set_selected_visible(false) > 0,
            HostCommand::Group => match self.group_selected() {
                Ok(key) => key.is_some(),
                Err(e) => {
                    tracing::warn!(error = %e, "group failed");
                    false
                }
            },
            HostCommand::Ungroup => match self.ungroup_selected() {
                Ok(keys) => !keys.is_empty(),
                Err(e) => {
                    tracing::warn!(error = %e, "ungroup failed");
                    false
                }
            },
            HostCommand::Nudge(delta) => self.nudge_selected(delta),
            HostCommand::Undo => self.undo(),
            HostCommand::Redo => self.redo(),
            HostCommand::ToggleRuler => {
                let next = !self.ruler_enabled();
                self.set_ruler_enabled(next);
                self.ruler_enabled() == next
            }
            HostCommand::ToggleGuide(kind) => {
                self.toggle_print_guide(kind);
                true
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layers/command.rs"]
mod tests;
