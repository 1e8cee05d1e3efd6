//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use model::{FieldSelector, Mode, Model, ToastLevel};
pub use update::{Message, update};

use std::path::PathBuf;

use crate::session::DEFAULT_EXPORT_NAME;

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    file_path: PathBuf,
    output_path: PathBuf,
    fields: Vec<String>,
    mouse_enabled: bool,
    config_global_path: Option<PathBuf>,
    config_local_path: Option<PathBuf>,
}

impl App {
    /// Create a new application for the given CSV file.
    pub fn new(file_path: PathBuf) -> Self {
        Self {
            file_path,
            output_path: PathBuf::from(DEFAULT_EXPORT_NAME),
            fields: Vec::new(),
            mouse_enabled: true,
            config_global_path: None,
            config_local_path: None,
        }
    }

    /// Set the export destination.
    #[must_use]
    pub fn with_output_path(mut self, path: PathBuf) -> Self {
        self.output_path = path;
        self
    }

    /// Preselect editable fields instead of asking after load.
    #[must_use]
    pub fn with_fields(mut self, fields: Vec<String>) -> Self {
        self.fields = fields;
        self
    }

    /// Enable or disable mouse capture.
    #[must_use]
    pub const fn with_mouse(mut self, enabled: bool) -> Self {
        self.mouse_enabled = enabled;
        self
    }

    /// Set config paths to show in help.
    #[must_use]
    pub fn with_config_paths(
        mut self,
        global_path: Option<PathBuf>,
        local_path: Option<PathBuf>,
    ) -> Self {
        self.config_global_path = global_path;
        self.config_local_path = local_path;
        self
    }
}
