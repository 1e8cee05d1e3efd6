use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::app::{FieldSelector, Model};
use crate::input::Trigger;

use super::layout::{
    centered_popup_rect, selector_rect, selector_scroll_start, selector_visible_rows,
};
use super::style;

pub fn render_field_selector_overlay(selector: &FieldSelector, frame: &mut Frame, area: Rect) {
    let popup = selector_rect(area, selector.candidates.len());
    let visible_rows = selector_visible_rows(popup);
    let start = selector_scroll_start(selector.highlighted, visible_rows);

    let mut lines: Vec<Line> = Vec::new();
    if selector.candidates.is_empty() {
        lines.push(Line::styled(" (no editable columns)", style::dim_style()));
    }
    for (idx, (name, checked)) in selector
        .candidates
        .iter()
        .zip(&selector.checked)
        .enumerate()
        .skip(start)
        .take(visible_rows)
    {
        let mark = if *checked { "[x]" } else { "[ ]" };
        let line_style = if idx == selector.highlighted {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        lines.push(Line::styled(format!(" {mark} {name}"), line_style));
    }
    lines.push(Line::raw(""));
    lines.push(Line::styled(
        " Space toggles \u{2502} Enter applies \u{2502} Esc cancels",
        style::dim_style(),
    ));

    let block = Block::default()
        .title("Select fields to edit")
        .borders(Borders::ALL)
        .style(style::popup_style());
    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

pub fn render_help_overlay(model: &Model, frame: &mut Frame, area: Rect) {
    let popup_width = area.width.saturating_sub(12).max(48);
    let popup_height = area.height.saturating_sub(2).max(12);
    let popup = centered_popup_rect(popup_width, popup_height, area);

    let global_cfg = model
        .config_global_path
        .as_ref()
        .map_or_else(|| "<unknown>".to_string(), |p| p.display().to_string());
    let local_cfg = model
        .config_local_path
        .as_ref()
        .map_or_else(|| "<none>".to_string(), |p| p.display().to_string());

    let section_style = style::section_style();
    let trigger_line = |trigger: Trigger, what: &str| {
        let keys = model.keymap.keys_for(trigger);
        let keys = if keys.is_empty() {
            "(unbound)".to_string()
        } else {
            keys
        };
        Line::raw(format!("  {keys:<20}{what}"))
    };

    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::styled("Records", section_style));
    lines.push(trigger_line(Trigger::Submit, "Save the form into the record"));
    lines.push(trigger_line(Trigger::Next, "Next record"));
    lines.push(trigger_line(Trigger::Previous, "Previous record"));
    lines.push(Line::raw("  x                   Export to output file"));
    lines.push(Line::raw("  r                   Reload the source file"));
    lines.push(Line::raw(""));

    lines.push(Line::styled("Fields", section_style));
    lines.push(Line::raw("  j/k, Tab/Shift-Tab  Focus next / previous"));
    lines.push(Line::raw("  i / e / click       Edit focused field"));
    lines.push(Line::raw("  u                   Revert field to stored value"));
    lines.push(Line::raw("  f                   Choose editable fields"));
    lines.push(Line::raw(""));

    lines.push(Line::styled("Editing", section_style));
    lines.push(Line::raw("  Enter               Save"));
    lines.push(Line::raw("  Esc                 Stop editing"));
    lines.push(Line::raw("  Arrows, Home/End    Move cursor (Ctrl: by word)"));
    lines.push(Line::raw("  Ctrl-u              Clear field"));
    lines.push(Line::raw(""));

    lines.push(Line::styled("Other", section_style));
    lines.push(Line::raw("  q / Ctrl-c          Quit"));
    lines.push(Line::raw("  ? / F1              Toggle help"));
    lines.push(Line::raw(""));

    lines.push(Line::styled("Config", section_style));
    lines.push(Line::raw(format!("  Global: {global_cfg}")));
    lines.push(Line::raw(format!("  Local override: {local_cfg}")));

    let block = Block::default()
        .title("Help")
        .title_bottom(Line::styled(" any key closes ", style::dim_style()))
        .borders(Borders::ALL)
        .padding(Padding::horizontal(1))
        .style(style::popup_style());

    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}
