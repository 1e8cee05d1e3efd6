//! Screen geometry.
//!
//! Rendering and mouse handling both derive their rectangles from these
//! functions so a click always lands on what was drawn.

use ratatui::layout::{Constraint, Layout, Rect};
use unicode_width::UnicodeWidthStr;

use crate::app::{Message, Model};
use crate::input::{Keymap, Trigger};

const TITLE_HEIGHT: u16 = 3;
const ABSTRACT_MIN_HEIGHT: u16 = 3;

/// The regions of the record view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub title: Rect,
    pub abstract_text: Rect,
    pub fields: Rect,
    pub actions: Rect,
    pub toast: Rect,
    pub status: Rect,
}

impl ScreenLayout {
    /// Field index drawn on terminal row `row`, if any.
    ///
    /// `focus` must be the focused input so the scroll offset matches what
    /// [`render`](crate::ui::render) drew.
    pub fn field_at_row(&self, row: u16, field_count: usize, focus: usize) -> Option<usize> {
        let top = self.fields.y + 1;
        let bottom = self.fields.y + self.fields.height.saturating_sub(1);
        if row < top || row >= bottom {
            return None;
        }
        let idx = field_scroll_start(self.fields, focus) + usize::from(row - top);
        (idx < field_count).then_some(idx)
    }
}

pub fn screen_layout(area: Rect, model: &Model) -> ScreenLayout {
    // One row per input plus borders; keep room for the empty-form hint.
    #[allow(clippy::cast_possible_truncation)]
    let field_rows = model.form.len().max(1).min(usize::from(u16::MAX - 2)) as u16;
    let toast_rows = u16::from(model.active_toast().is_some());
    let chunks = Layout::vertical([
        Constraint::Length(TITLE_HEIGHT),
        Constraint::Min(ABSTRACT_MIN_HEIGHT),
        Constraint::Length(field_rows + 2),
        Constraint::Length(1),
        Constraint::Length(toast_rows),
        Constraint::Length(1),
    ])
    .split(area);
    ScreenLayout {
        title: chunks[0],
        abstract_text: chunks[1],
        fields: chunks[2],
        actions: chunks[3],
        toast: chunks[4],
        status: chunks[5],
    }
}

/// Input rows inside the bordered fields block.
pub const fn field_rows(fields: Rect) -> usize {
    fields.height.saturating_sub(2) as usize
}

/// First input drawn so the focused one stays visible.
pub const fn field_scroll_start(fields: Rect, focus: usize) -> usize {
    selector_scroll_start(focus, field_rows(fields))
}

/// A clickable control in the action bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionButton {
    Trigger(Trigger),
    Export,
}

impl ActionButton {
    pub const ALL: [Self; 4] = [
        Self::Trigger(Trigger::Submit),
        Self::Trigger(Trigger::Next),
        Self::Trigger(Trigger::Previous),
        Self::Export,
    ];

    pub fn message(self) -> Message {
        match self {
            Self::Trigger(trigger) => Message::from(trigger),
            Self::Export => Message::Export,
        }
    }

    /// Button text, including the keys bound to it.
    pub fn label(self, keymap: &Keymap) -> String {
        let (name, keys) = match self {
            Self::Trigger(trigger) => (trigger.label(), keymap.keys_for(trigger)),
            Self::Export => ("Export", "x".to_string()),
        };
        if keys.is_empty() {
            format!("[ {name} ]")
        } else {
            format!("[ {name} ({keys}) ]")
        }
    }
}

/// Buttons laid out left to right in `area`, clipped to its width.
pub fn action_buttons(area: Rect, keymap: &Keymap) -> Vec<(ActionButton, String, Rect)> {
    let mut buttons = Vec::with_capacity(ActionButton::ALL.len());
    let mut x = area.x + 1;
    let right = area.x + area.width;
    for button in ActionButton::ALL {
        let label = button.label(keymap);
        let width = u16::try_from(label.width()).unwrap_or(u16::MAX);
        if x >= right {
            break;
        }
        let width = width.min(right - x);
        buttons.push((button, label, Rect::new(x, area.y, width, 1)));
        x = x.saturating_add(width + 2);
    }
    buttons
}

/// Popup rectangle for the field selector.
pub fn selector_rect(area: Rect, candidates: usize) -> Rect {
    let popup_width = area.width.saturating_sub(16).clamp(36, 60);
    // Candidates + blank + hint + borders
    #[allow(clippy::cast_possible_truncation)]
    let needed_rows = (candidates.min(usize::from(u16::MAX - 4)) as u16) + 4;
    let popup_height = needed_rows.min(area.height.saturating_sub(2).max(6));
    centered_popup_rect(popup_width, popup_height, area)
}

/// First terminal row of the selector's checkbox list.
pub const fn selector_content_top(popup: Rect) -> u16 {
    popup.y + 1
}

/// Rows available for checkboxes inside the selector popup.
pub const fn selector_visible_rows(popup: Rect) -> usize {
    popup.height.saturating_sub(4) as usize
}

/// First candidate shown so the highlighted row stays visible.
pub const fn selector_scroll_start(highlighted: usize, visible_rows: usize) -> usize {
    if visible_rows == 0 {
        return highlighted;
    }
    (highlighted + 1).saturating_sub(visible_rows)
}

pub fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w) / 2);
    let y = area.y + (area.height.saturating_sub(h) / 2);
    Rect::new(x, y, w, h)
}

pub const fn point_in_rect(col: u16, row: u16, rect: Rect) -> bool {
    col >= rect.x && col < rect.x + rect.width && row >= rect.y && row < rect.y + rect.height
}
