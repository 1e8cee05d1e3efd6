use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::{Mode, Model};
use crate::table::{ABSTRACT_COLUMN, TITLE_COLUMN};

use super::layout::{action_buttons, field_rows, field_scroll_start, screen_layout};
use super::{FIELD_LABEL_MAX_WIDTH, overlays, status, style};

const NEWLINE_MARKER: char = '\u{21b5}';

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let area = frame.area();
    let layout = screen_layout(area, model);

    render_read_only(model, frame, layout.title, TITLE_COLUMN);
    render_read_only(model, frame, layout.abstract_text, ABSTRACT_COLUMN);
    render_fields(model, frame, layout.fields);
    render_action_bar(model, frame, layout.actions);
    status::render_toast_bar(model, frame, layout.toast);
    status::render_status_bar(model, frame, layout.status);

    if model.help_visible {
        overlays::render_help_overlay(model, frame, area);
    } else if let Some(selector) = &model.selector {
        overlays::render_field_selector_overlay(selector, frame, area);
    }
}

fn render_read_only(model: &Model, frame: &mut Frame, area: Rect, column: &str) {
    let block = Block::default().title(column).borders(Borders::ALL);
    // Text splits on newlines, so multi-paragraph cells keep their breaks.
    let body = if !model.session.is_loaded() {
        Text::styled("No table loaded", style::dim_style())
    } else if let Some(record) = model.session.current_record() {
        match record.get(column) {
            Some(text) => Text::styled(text.to_string(), style::read_only_style()),
            None => Text::styled(format!("(no {column} column)"), style::dim_style()),
        }
    } else {
        Text::styled("Table has no records", style::dim_style())
    };
    let paragraph = Paragraph::new(body)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_fields(model: &Model, frame: &mut Frame, area: Rect) {
    let editing = model.mode == Mode::Insert;
    let block = Block::default()
        .title(if model.form.is_dirty() {
            "Fields [edited]"
        } else {
            "Fields"
        })
        .borders(Borders::ALL)
        .border_style(style::fields_border_style(editing));

    let fields = model.form.fields();
    if fields.is_empty() {
        let hint = if model.session.current_record().is_some() {
            "No editable fields (press f to choose)"
        } else {
            ""
        };
        let paragraph = Paragraph::new(Line::styled(hint, style::dim_style())).block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let label_width = fields
        .iter()
        .map(|f| f.name.width())
        .max()
        .unwrap_or(0)
        .min(usize::from(FIELD_LABEL_MAX_WIDTH));
    let inner_width = usize::from(area.width.saturating_sub(2));
    // " name │ value"
    let value_width = inner_width.saturating_sub(label_width + 4);

    let start = field_scroll_start(area, model.form.focus());
    let lines: Vec<Line> = fields
        .iter()
        .enumerate()
        .skip(start)
        .take(field_rows(area))
        .map(|(idx, field)| {
            let focused = idx == model.form.focus();
            let marker = if focused { ">" } else { " " };
            let label = pad_to_width(&field.name, label_width);
            let mut spans = vec![
                Span::raw(marker),
                Span::styled(label, style::field_label_style(focused)),
                Span::styled(" \u{2502} ", style::dim_style()),
            ];
            if focused && editing {
                let (before, after) = field.buffer.split_at_cursor();
                spans.extend(cursor_spans(
                    &(single_line(&before), single_line(&after)),
                    value_width,
                ));
            } else {
                spans.push(Span::raw(single_line(&field.buffer.text())));
            }
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Value text with a block cursor, scrolled so the cursor stays visible.
fn cursor_spans((before, after): &(String, String), width: usize) -> Vec<Span<'static>> {
    let before = visible_tail(before, width.saturating_sub(1));
    let mut chars = after.chars();
    let under = chars.next().map_or_else(|| " ".to_string(), String::from);
    vec![
        Span::raw(before.to_string()),
        Span::styled(under, Style::default().add_modifier(Modifier::REVERSED)),
        Span::raw(chars.as_str().to_string()),
    ]
}

/// Inputs are one row tall; embedded line breaks show as a marker of the
/// same char count so the cursor column is unchanged.
fn single_line(text: &str) -> String {
    text.chars()
        .map(|ch| if matches!(ch, '\n' | '\r') { NEWLINE_MARKER } else { ch })
        .collect()
}

/// Longest suffix of `text` that fits in `width` columns.
fn visible_tail(text: &str, width: usize) -> &str {
    let mut used = 0;
    for (idx, ch) in text.char_indices().rev() {
        used += ch.width().unwrap_or(0);
        if used > width {
            return &text[idx + ch.len_utf8()..];
        }
    }
    text
}

fn pad_to_width(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push_str(&" ".repeat(width - used));
    out
}

fn render_action_bar(model: &Model, frame: &mut Frame, area: Rect) {
    for (_, label, rect) in action_buttons(area, &model.keymap) {
        frame.render_widget(Paragraph::new(label).style(style::button_style()), rect);
    }
}
