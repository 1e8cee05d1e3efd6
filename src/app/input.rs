use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::layout::Rect;

use crate::app::{App, Message, Mode, Model};
use crate::ui::layout::{point_in_rect, selector_visible_rows};

use super::event_loop::ResizeDebouncer;

impl App {
    pub(super) fn handle_event(
        &self,
        event: Event,
        model: &Model,
        now_ms: u64,
        resize_debouncer: &mut ResizeDebouncer,
    ) -> Option<Message> {
        match event {
            Event::Key(key) => self.handle_key(key, model),
            Event::Mouse(mouse) if self.mouse_enabled => self.handle_mouse(mouse, model),
            Event::Paste(text) => Self::handle_paste(&text, model),
            Event::Resize(w, h) => {
                resize_debouncer.queue(w, h, now_ms);
                None
            }
            _ => None,
        }
    }

    pub(super) fn handle_key(&self, key: KeyEvent, model: &Model) -> Option<Message> {
        // Terminals with keyboard enhancement report releases too.
        if key.kind == KeyEventKind::Release {
            return None;
        }

        if model.help_visible {
            return Some(Message::HideHelp);
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && key.code == KeyCode::Char('c') {
            return Some(Message::Quit);
        }

        match model.mode {
            Mode::SelectFields => Self::handle_selector_key(key),
            Mode::Insert => Self::handle_insert_key(key, model),
            Mode::Normal => Self::handle_normal_key(key, model),
        }
    }

    /// Pasted text goes into the focused field as a single line.
    fn handle_paste(text: &str, model: &Model) -> Option<Message> {
        if model.mode != Mode::Insert || model.help_visible {
            return None;
        }
        let line = text
            .trim_end_matches(['\r', '\n'])
            .replace("\r\n", " ")
            .replace(['\r', '\n'], " ");
        (!line.is_empty()).then_some(Message::InsertText(line))
    }

    fn handle_selector_key(key: KeyEvent) -> Option<Message> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => Some(Message::SelectorDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Message::SelectorUp),
            KeyCode::Char(' ') => Some(Message::SelectorToggle),
            KeyCode::Enter => Some(Message::SelectorConfirm),
            KeyCode::Esc => Some(Message::SelectorCancel),
            KeyCode::Char('?') | KeyCode::F(1) => Some(Message::ToggleHelp),
            _ => None,
        }
    }

    fn handle_insert_key(key: KeyEvent, model: &Model) -> Option<Message> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        match key.code {
            KeyCode::Esc => Some(Message::ExitInsert),
            KeyCode::Tab => Some(Message::FocusNext),
            KeyCode::BackTab => Some(Message::FocusPrev),
            KeyCode::Backspace => Some(Message::DeleteBack),
            KeyCode::Delete => Some(Message::DeleteForward),
            KeyCode::Left if ctrl => Some(Message::WordLeft),
            KeyCode::Right if ctrl => Some(Message::WordRight),
            KeyCode::Left => Some(Message::CursorLeft),
            KeyCode::Right => Some(Message::CursorRight),
            KeyCode::Home => Some(Message::CursorHome),
            KeyCode::End => Some(Message::CursorEnd),
            KeyCode::Char('u') if ctrl => Some(Message::ClearField),
            KeyCode::Char('a') if ctrl => Some(Message::CursorHome),
            KeyCode::Char('e') if ctrl => Some(Message::CursorEnd),
            // Plain characters are text; only non-character keys can be
            // triggers while editing.
            KeyCode::Char(c) if !ctrl && !alt => Some(Message::InsertChar(c)),
            _ => model.keymap.trigger_for(&key).map(Message::from),
        }
    }

    fn handle_normal_key(key: KeyEvent, model: &Model) -> Option<Message> {
        if let Some(trigger) = model.keymap.trigger_for(&key) {
            return Some(Message::from(trigger));
        }
        match key.code {
            KeyCode::Char('j') | KeyCode::Down | KeyCode::Tab => Some(Message::FocusNext),
            KeyCode::Char('k') | KeyCode::Up | KeyCode::BackTab => Some(Message::FocusPrev),
            KeyCode::Char('i' | 'e') => Some(Message::EnterInsert),
            KeyCode::Char('u') => Some(Message::RevertField),
            KeyCode::Char('x') => Some(Message::Export),
            KeyCode::Char('r') => Some(Message::Reload),
            KeyCode::Char('f') => Some(Message::OpenFieldSelector),
            KeyCode::Char('?') | KeyCode::F(1) => Some(Message::ToggleHelp),
            KeyCode::Char('q') => Some(Message::Quit),
            KeyCode::Char('l') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Message::Redraw)
            }
            _ => None,
        }
    }

    pub(super) fn handle_mouse(&self, mouse: MouseEvent, model: &Model) -> Option<Message> {
        if !matches!(mouse.kind, MouseEventKind::Up(MouseButton::Left)) {
            return match (model.mode, mouse.kind) {
                (Mode::SelectFields, MouseEventKind::ScrollDown) => Some(Message::SelectorDown),
                (Mode::SelectFields, MouseEventKind::ScrollUp) => Some(Message::SelectorUp),
                _ => None,
            };
        }
        if model.help_visible {
            return Some(Message::HideHelp);
        }

        let area = Rect::new(0, 0, model.screen.0, model.screen.1);

        if let Some(selector) = &model.selector {
            let popup = crate::ui::selector_rect(area, selector.candidates.len());
            if !point_in_rect(mouse.column, mouse.row, popup) {
                return None;
            }
            let content_top = crate::ui::selector_content_top(popup);
            let visible = selector_visible_rows(popup);
            if mouse.row < content_top {
                return None;
            }
            let rel = usize::from(mouse.row - content_top);
            if rel >= visible {
                return None;
            }
            let idx = crate::ui::selector_scroll_start(selector.highlighted, visible) + rel;
            return (idx < selector.candidates.len()).then_some(Message::SelectorClick(idx));
        }

        let layout = crate::ui::screen_layout(area, model);
        if point_in_rect(mouse.column, mouse.row, layout.actions) {
            return crate::ui::action_buttons(layout.actions, &model.keymap)
                .into_iter()
                .find(|(_, _, rect)| point_in_rect(mouse.column, mouse.row, *rect))
                .map(|(button, _, _)| button.message());
        }
        if point_in_rect(mouse.column, mouse.row, layout.fields) {
            return layout
                .field_at_row(mouse.row, model.form.len(), model.form.focus())
                .map(Message::FocusField);
        }
        None
    }
}
