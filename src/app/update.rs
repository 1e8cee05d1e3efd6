use tracing::{debug, warn};

use crate::app::model::Mode;
use crate::app::{Model, ToastLevel};
use crate::input::Trigger;

/// All possible events and actions in the application.
///
/// These represent user input, system events, and internal actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Record operations
    /// Write the edit form into the current record
    Submit,
    /// Advance to the next record
    NextRecord,
    /// Go back to the previous record
    PreviousRecord,

    // Form
    /// Focus the next input
    FocusNext,
    /// Focus the previous input
    FocusPrev,
    /// Focus an input by index and start editing it
    FocusField(usize),
    /// Start editing the focused input
    EnterInsert,
    /// Stop editing, keeping the buffer
    ExitInsert,
    /// Insert a character at the field cursor
    InsertChar(char),
    /// Insert pasted text at the field cursor
    InsertText(String),
    /// Delete character before the field cursor (Backspace)
    DeleteBack,
    /// Delete character at the field cursor (Delete)
    DeleteForward,
    /// Move field cursor left
    CursorLeft,
    /// Move field cursor right
    CursorRight,
    /// Move field cursor to start
    CursorHome,
    /// Move field cursor to end
    CursorEnd,
    /// Move field cursor one word left
    WordLeft,
    /// Move field cursor one word right
    WordRight,
    /// Clear the focused field
    ClearField,
    /// Restore the focused field to the stored cell value
    RevertField,

    // Field selection
    /// Open the field selector
    OpenFieldSelector,
    /// Move selector highlight up
    SelectorUp,
    /// Move selector highlight down
    SelectorDown,
    /// Toggle the highlighted checkbox
    SelectorToggle,
    /// Toggle a checkbox by index (mouse)
    SelectorClick(usize),
    /// Apply the checked fields
    SelectorConfirm,
    /// Close the selector without applying
    SelectorCancel,

    // File
    /// Reload the source file from disk
    Reload,
    /// Export the table to the output path
    Export,

    // Window
    /// Terminal resized
    Resize(u16, u16),
    /// Toggle help overlay
    ToggleHelp,
    /// Hide help overlay
    HideHelp,
    /// Redraw screen
    Redraw,

    // Application
    /// Quit the application
    Quit,
}

impl From<Trigger> for Message {
    fn from(trigger: Trigger) -> Self {
        match trigger {
            Trigger::Submit => Self::Submit,
            Trigger::Next => Self::NextRecord,
            Trigger::Previous => Self::PreviousRecord,
        }
    }
}

/// Pure function that updates the model based on a message.
///
/// This is the core of TEA - all state transitions happen here.
/// File I/O (reload, export) happens in the side-effect handler.
pub fn update(mut model: Model, msg: Message) -> Model {
    // Reset confirmation flags on any action other than the confirmed one.
    if !matches!(msg, Message::Quit) {
        model.quit_confirmed = false;
    }
    if !matches!(msg, Message::Reload) {
        model.reload_confirmed = false;
    }

    match msg {
        // Record operations
        Message::Submit => submit(&mut model),
        Message::NextRecord => {
            let discarded = model.form.is_dirty();
            if let Some(notice) = model.session.next() {
                model.show_toast(ToastLevel::Info, notice.to_string());
            } else {
                model.reseed_form();
                if discarded {
                    model.show_toast(ToastLevel::Warning, "Unsaved edits discarded");
                }
            }
        }
        Message::PreviousRecord => {
            let discarded = model.form.is_dirty();
            if model.session.previous() {
                model.reseed_form();
                if discarded {
                    model.show_toast(ToastLevel::Warning, "Unsaved edits discarded");
                }
            }
        }

        // Form
        Message::FocusNext => model.form.focus_next(),
        Message::FocusPrev => model.form.focus_prev(),
        Message::FocusField(idx) => {
            if idx < model.form.len() {
                model.form.focus_index(idx);
                model.mode = Mode::Insert;
            }
        }
        Message::EnterInsert => {
            if model.form.is_empty() {
                model.show_toast(ToastLevel::Info, "No editable fields (press f to choose)");
            } else {
                model.mode = Mode::Insert;
            }
        }
        Message::ExitInsert => {
            if model.mode == Mode::Insert {
                model.mode = Mode::Normal;
            }
        }
        Message::InsertChar(ch) => {
            if let Some(buf) = model.form.focused_buffer_mut() {
                buf.insert_char(ch);
            }
        }
        Message::InsertText(text) => {
            if let Some(buf) = model.form.focused_buffer_mut() {
                buf.insert_str(&text);
            }
        }
        Message::DeleteBack => {
            if let Some(buf) = model.form.focused_buffer_mut() {
                buf.delete_back();
            }
        }
        Message::DeleteForward => {
            if let Some(buf) = model.form.focused_buffer_mut() {
                buf.delete_forward();
            }
        }
        Message::CursorLeft => {
            if let Some(buf) = model.form.focused_buffer_mut() {
                buf.move_left();
            }
        }
        Message::CursorRight => {
            if let Some(buf) = model.form.focused_buffer_mut() {
                buf.move_right();
            }
        }
        Message::CursorHome => {
            if let Some(buf) = model.form.focused_buffer_mut() {
                buf.move_home();
            }
        }
        Message::CursorEnd => {
            if let Some(buf) = model.form.focused_buffer_mut() {
                buf.move_end();
            }
        }
        Message::WordLeft => {
            if let Some(buf) = model.form.focused_buffer_mut() {
                buf.move_word_left();
            }
        }
        Message::WordRight => {
            if let Some(buf) = model.form.focused_buffer_mut() {
                buf.move_word_right();
            }
        }
        Message::ClearField => {
            if let Some(buf) = model.form.focused_buffer_mut() {
                buf.clear();
            }
        }
        Message::RevertField => {
            let stored = model.form.focused_name().and_then(|name| {
                model
                    .session
                    .current_record()
                    .and_then(|r| r.get(name))
                    .map(str::to_owned)
            });
            if let (Some(stored), Some(buf)) = (stored, model.form.focused_buffer_mut()) {
                buf.set_text(&stored);
                buf.mark_clean();
            }
        }

        // Field selection
        Message::OpenFieldSelector => {
            if model.session.is_loaded() {
                model.open_field_selector();
            } else {
                model.show_toast(ToastLevel::Warning, "No table loaded");
            }
        }
        Message::SelectorUp => {
            if let Some(selector) = &mut model.selector {
                selector.move_up();
            }
        }
        Message::SelectorDown => {
            if let Some(selector) = &mut model.selector {
                selector.move_down();
            }
        }
        Message::SelectorToggle => {
            if let Some(selector) = &mut model.selector {
                let idx = selector.highlighted;
                selector.toggle(idx);
            }
        }
        Message::SelectorClick(idx) => {
            if let Some(selector) = &mut model.selector {
                selector.toggle(idx);
            }
        }
        Message::SelectorConfirm => confirm_selection(&mut model),
        Message::SelectorCancel => {
            model.selector = None;
            if model.mode == Mode::SelectFields {
                model.mode = Mode::Normal;
            }
        }

        // File
        Message::Reload => {
            if model.file_path.is_none() {
                model.show_toast(ToastLevel::Warning, "No file to reload");
            } else if model.has_unsaved_work() && !model.reload_confirmed {
                model.show_toast(
                    ToastLevel::Warning,
                    "Unexported changes! Press r again to reload and discard them",
                );
                model.reload_confirmed = true;
            } else {
                model.reload_requested = true;
            }
        }
        // Export: handled in side effects (writes a file)
        // Redraw: no state change needed
        Message::Export | Message::Redraw => {}

        // Window
        Message::Resize(width, height) => {
            model.screen = (width, height);
        }
        Message::ToggleHelp => {
            model.help_visible = !model.help_visible;
        }
        Message::HideHelp => {
            model.help_visible = false;
        }

        // Application
        Message::Quit => {
            if model.has_unsaved_work() && !model.quit_confirmed {
                model.show_toast(
                    ToastLevel::Warning,
                    "Unexported changes! Press q again to quit, or x to export",
                );
                model.quit_confirmed = true;
            } else {
                model.should_quit = true;
            }
        }
    }
    model
}

fn submit(model: &mut Model) {
    if !model.session.is_loaded() {
        model.show_toast(ToastLevel::Warning, "No table loaded");
        return;
    }
    // The form must describe the record on screen; anything else means the
    // display is stale, so refresh it instead of writing.
    if model.form.record() != model.session.cursor() {
        warn!(
            form = model.form.record(),
            cursor = model.session.cursor(),
            "stale edit form, reseeding"
        );
        model.reseed_form();
        model.show_toast(ToastLevel::Warning, "Record changed; form refreshed");
        return;
    }
    let notice = model.session.submit(&model.form.values());
    debug!(?notice, "submit applied");
    model.form.mark_saved();
    if model.mode == Mode::Insert {
        model.mode = Mode::Normal;
    }
    model.show_toast(ToastLevel::Info, notice.to_string());
}

fn confirm_selection(model: &mut Model) {
    let Some(selector) = &model.selector else {
        return;
    };
    let selection = selector.selection();
    match model.session.set_editable_fields(&selection) {
        Ok(()) => {
            model.form.reseed_keeping_edits(&model.session);
            model.selector = None;
            model.mode = Mode::Normal;
            if selection.is_empty() {
                model.show_toast(ToastLevel::Info, "No fields selected for editing");
            } else {
                model.show_toast(
                    ToastLevel::Info,
                    format!("Editing: {}", selection.join(", ")),
                );
            }
        }
        Err(err) => {
            model.show_toast(ToastLevel::Error, err.to_string());
        }
    }
}
