use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{Mode, Model};

use super::style;

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let record_info = if model.session.is_loaded() {
        format!(
            "Record {}/{}",
            model.session.cursor(),
            model.session.row_count()
        )
    } else {
        "No table".to_string()
    };
    let modified = if model.session.has_unexported_changes() {
        " [modified]"
    } else {
        ""
    };
    let mode = match model.mode {
        Mode::Normal => "NORMAL",
        Mode::Insert => "INSERT",
        Mode::SelectFields => "FIELDS",
    };

    let status = format!(
        " {}  {}{}  {}  -> {}  ?:help",
        model.file_name(),
        record_info,
        modified,
        mode,
        model.output_path.display()
    );

    let status_bar =
        Paragraph::new(status).style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(status_bar, area);
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = style::toast_style(level);
    let toast = Paragraph::new(format!("{prefix} {message}")).style(style);
    frame.render_widget(toast, area);
}
