//! Trigger dispatch.
//!
//! The three record operations (submit, next, previous) can be invoked from
//! several input sources: key bindings, clickable buttons, or a host program
//! calling the session directly. Every source produces a [`Trigger`]; the
//! [`Keymap`] is just the keyboard producer.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// A request for one of the core record operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// Write the edit form into the current record.
    Submit,
    /// Advance to the next record.
    Next,
    /// Go back to the previous record.
    Previous,
}

impl Trigger {
    pub const ALL: [Self; 3] = [Self::Submit, Self::Next, Self::Previous];

    /// Human-readable label used on buttons and in help.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Submit => "Save",
            Self::Next => "Next",
            Self::Previous => "Previous",
        }
    }
}

/// A key plus the modifiers that must be held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn matches(&self, key: &KeyEvent) -> bool {
        // Shift is implied by the character itself on most layouts.
        let mods = key.modifiers - KeyModifiers::SHIFT;
        self.code == key.code && self.modifiers == mods
    }

    /// Short label such as `Enter` or `2`.
    pub fn label(&self) -> String {
        let key = match self.code {
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Char(' ') => "Space".to_string(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::F(n) => format!("F{n}"),
            KeyCode::PageDown => "PageDown".to_string(),
            KeyCode::PageUp => "PageUp".to_string(),
            other => format!("{other:?}"),
        };
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            format!("Ctrl-{key}")
        } else if self.modifiers.contains(KeyModifiers::ALT) {
            format!("Alt-{key}")
        } else {
            key
        }
    }
}

/// Maps keys to triggers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keymap {
    bindings: Vec<(KeyBinding, Trigger)>,
}

impl Default for Keymap {
    fn default() -> Self {
        Self {
            bindings: vec![
                (KeyBinding::plain(KeyCode::Enter), Trigger::Submit),
                (KeyBinding::plain(KeyCode::Char('2')), Trigger::Next),
                (KeyBinding::plain(KeyCode::Char('3')), Trigger::Previous),
            ],
        }
    }
}

impl Keymap {
    /// A keymap with no bindings.
    pub const fn empty() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Add a binding. Earlier bindings for the same key win.
    #[must_use]
    pub fn bind(mut self, binding: KeyBinding, trigger: Trigger) -> Self {
        self.bindings.push((binding, trigger));
        self
    }

    /// Trigger for a key press, if any.
    ///
    /// Release events never trigger, so terminals that report both press
    /// and release do not fire an operation twice.
    pub fn trigger_for(&self, key: &KeyEvent) -> Option<Trigger> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        self.bindings
            .iter()
            .find(|(binding, _)| binding.matches(key))
            .map(|(_, trigger)| *trigger)
    }

    /// Labels of every key bound to `trigger`, joined with `/`.
    pub fn keys_for(&self, trigger: Trigger) -> String {
        self.bindings
            .iter()
            .filter(|(_, t)| *t == trigger)
            .map(|(binding, _)| binding.label())
            .collect::<Vec<_>>()
            .join("/")
    }
}
