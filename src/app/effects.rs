use tracing::{error, info};

use crate::app::{App, Message, Model, ToastLevel};

impl App {
    /// Perform the I/O that `update` requested.
    pub(super) fn handle_message_side_effects(model: &mut Model, msg: &Message) {
        match msg {
            Message::Export => Self::export(model),
            Message::Reload if model.reload_requested => {
                model.reload_requested = false;
                Self::reload(model);
            }
            _ => {}
        }
    }

    fn export(model: &mut Model) {
        if !model.session.is_loaded() {
            model.show_toast(ToastLevel::Warning, "Nothing to export");
            return;
        }
        match model.session.export_to(&model.output_path) {
            Ok(notice) => {
                info!(path = %model.output_path.display(), %notice, "export finished");
                if model.form.is_dirty() {
                    model.show_toast(
                        ToastLevel::Warning,
                        format!("{notice}; unsaved form edits were not included"),
                    );
                } else {
                    model.show_toast(
                        ToastLevel::Info,
                        format!("{notice} to {}", model.output_path.display()),
                    );
                }
            }
            Err(err) => {
                error!(%err, "export failed");
                model.show_toast(ToastLevel::Error, err.to_string());
            }
        }
    }

    fn reload(model: &mut Model) {
        let Some(path) = model.file_path.clone() else {
            return;
        };
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) => {
                error!(path = %path.display(), %err, "reload read failed");
                model.show_toast(ToastLevel::Error, format!("Reload failed: {err}"));
                return;
            }
        };
        match model.load_bytes(&bytes) {
            Ok(notice) => {
                info!(path = %path.display(), %notice, "reloaded");
                // A rejected preset already left a warning toast.
                if model.selector.is_none() || model.preset_fields.is_empty() {
                    model.show_toast(ToastLevel::Info, format!("Reloaded: {notice}"));
                }
            }
            Err(err) => {
                error!(path = %path.display(), %err, "reload parse failed");
                model.show_toast(ToastLevel::Error, format!("Reload failed: {err}"));
            }
        }
    }
}
