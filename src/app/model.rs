use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::SessionError;
use crate::form::EditForm;
use crate::input::Keymap;
use crate::session::{DEFAULT_EXPORT_NAME, Notice, Session};

/// How long a toast stays on screen.
const TOAST_DURATION: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// Which part of the UI receives keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Keys are commands and triggers.
    #[default]
    Normal,
    /// Keys edit the focused field.
    Insert,
    /// The field-selection overlay is open.
    SelectFields,
}

/// Checkbox list shown while choosing editable fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSelector {
    /// Selectable column names in table order.
    pub candidates: Vec<String>,
    /// Checked state, parallel to `candidates`.
    pub checked: Vec<bool>,
    /// Highlighted row.
    pub highlighted: usize,
}

impl FieldSelector {
    /// Build a selector over `session`'s candidates, pre-checking the active set.
    pub fn for_session(session: &Session) -> Self {
        let candidates: Vec<String> = session
            .candidate_fields()
            .into_iter()
            .map(str::to_owned)
            .collect();
        let checked = candidates.iter().map(|c| session.is_editable(c)).collect();
        Self {
            candidates,
            checked,
            highlighted: 0,
        }
    }

    pub fn toggle(&mut self, idx: usize) {
        if let Some(flag) = self.checked.get_mut(idx) {
            *flag = !*flag;
            self.highlighted = idx;
        }
    }

    pub const fn move_up(&mut self) {
        self.highlighted = self.highlighted.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.highlighted + 1 < self.candidates.len() {
            self.highlighted += 1;
        }
    }

    /// Names of the checked fields.
    pub fn selection(&self) -> Vec<String> {
        self.candidates
            .iter()
            .zip(&self.checked)
            .filter(|(_, checked)| **checked)
            .map(|(name, _)| name.clone())
            .collect()
    }
}

/// The complete application state.
///
/// All state lives here - no global or scattered state.
pub struct Model {
    /// The record editor session
    pub session: Session,
    /// Edit buffers for the displayed record
    pub form: EditForm,
    /// Current input mode
    pub mode: Mode,
    /// Field selector state while `mode == SelectFields`
    pub selector: Option<FieldSelector>,
    /// Key bindings for the record triggers
    pub keymap: Keymap,
    /// Source file the table was loaded from
    pub file_path: Option<PathBuf>,
    /// Export destination
    pub output_path: PathBuf,
    /// Fields to select automatically after each load
    pub preset_fields: Vec<String>,
    /// Terminal size (width, height), used for mouse hit testing
    pub screen: (u16, u16),
    /// Global config path shown in help
    pub config_global_path: Option<PathBuf>,
    /// Local override path shown in help
    pub config_local_path: Option<PathBuf>,
    /// Whether help overlay is visible
    pub help_visible: bool,
    toast: Option<Toast>,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Set after first quit attempt with unexported changes; allows second quit to proceed
    pub quit_confirmed: bool,
    /// Set after first reload attempt with unexported changes; allows second reload to proceed
    pub reload_confirmed: bool,
    /// Reload approved by `update`, performed by the side-effect handler
    pub reload_requested: bool,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("file_path", &self.file_path)
            .field("cursor", &self.session.cursor())
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl Model {
    /// Create a model with an empty session.
    pub fn new(file_path: Option<PathBuf>, screen: (u16, u16)) -> Self {
        Self {
            session: Session::new(),
            form: EditForm::default(),
            mode: Mode::Normal,
            selector: None,
            keymap: Keymap::default(),
            file_path,
            output_path: PathBuf::from(DEFAULT_EXPORT_NAME),
            preset_fields: Vec::new(),
            screen,
            config_global_path: None,
            config_local_path: None,
            help_visible: false,
            toast: None,
            should_quit: false,
            quit_confirmed: false,
            reload_confirmed: false,
            reload_requested: false,
        }
    }

    /// Set the export destination.
    #[must_use]
    pub fn with_output_path(mut self, path: PathBuf) -> Self {
        self.output_path = path;
        self
    }

    /// Fields to select after every successful load.
    #[must_use]
    pub fn with_preset_fields(mut self, fields: Vec<String>) -> Self {
        self.preset_fields = fields;
        self
    }

    /// Load a table into the session and reset the form.
    ///
    /// Preset fields are applied when they are valid for the new table;
    /// otherwise the field selector opens.
    ///
    /// # Errors
    ///
    /// Returns the parse error unchanged; the model is untouched in that case.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<Notice, SessionError> {
        let notice = self.session.load(bytes)?;
        self.mode = Mode::Normal;
        self.selector = None;

        let preset_applied = !self.preset_fields.is_empty()
            && match self.session.set_editable_fields(&self.preset_fields) {
                Ok(()) => true,
                Err(err) => {
                    warn!(%err, "preset fields rejected");
                    self.show_toast(ToastLevel::Warning, err.to_string());
                    false
                }
            };
        if !preset_applied {
            self.open_field_selector();
        }
        self.form = EditForm::seed(&self.session);
        debug!(preset_applied, "model loaded table");
        Ok(notice)
    }

    pub fn open_field_selector(&mut self) {
        self.selector = Some(FieldSelector::for_session(&self.session));
        self.mode = Mode::SelectFields;
    }

    /// Seed the form from the record now under the cursor.
    pub fn reseed_form(&mut self) {
        self.form = EditForm::seed(&self.session);
        if self.form.is_empty() && self.mode == Mode::Insert {
            self.mode = Mode::Normal;
        }
    }

    /// Whether quitting now would lose work.
    pub fn has_unsaved_work(&self) -> bool {
        self.session.has_unexported_changes() || self.form.is_dirty()
    }

    pub fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + TOAST_DURATION,
        });
    }

    pub fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }

    /// Display name of the loaded file.
    pub fn file_name(&self) -> String {
        self.file_path
            .as_ref()
            .and_then(|p| p.file_name())
            .map_or_else(
                || "untitled".to_string(),
                |s| s.to_string_lossy().to_string(),
            )
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new(None, (80, 24))
    }
}
