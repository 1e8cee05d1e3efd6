use super::*;
use crate::app::{Message, Model, update};
use crate::input::{KeyBinding, Keymap, Trigger};
use crossterm::event::KeyCode;
use ratatui::layout::Rect;
use std::path::PathBuf;

fn screen_rows(model: &Model) -> Vec<String> {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    let mut terminal = Terminal::new(TestBackend::new(model.screen.0, model.screen.1)).unwrap();
    terminal.draw(|frame| render(model, frame)).unwrap();
    let buffer = terminal.backend().buffer();
    (0..buffer.area.height)
        .map(|y| {
            (0..buffer.area.width)
                .map(|x| buffer[(x, y)].symbol())
                .collect()
        })
        .collect()
}

/// One record with `count` editable columns named F00, F01, ...
fn model_with_many_fields(count: usize, screen: (u16, u16)) -> Model {
    let names: Vec<String> = (0..count).map(|i| format!("F{i:02}")).collect();
    let csv = format!(
        "Title,Abstract,{}\nA,Text,{}\n",
        names.join(","),
        vec!["v"; count].join(",")
    );
    let mut model = Model::new(Some(PathBuf::from("t.csv")), screen).with_preset_fields(names);
    model.load_bytes(csv.as_bytes()).unwrap();
    model
}

fn model_with_fields(fields: &[&str], screen: (u16, u16)) -> Model {
    let csv = "Title,Abstract,Year,Reviewer,Score,Notes\nA,Text,2020,,,\nB,More,2021,,,\n";
    let mut model = Model::new(Some(PathBuf::from("t.csv")), screen)
        .with_preset_fields(fields.iter().map(|f| (*f).to_string()).collect());
    model.load_bytes(csv.as_bytes()).unwrap();
    model
}

#[test]
fn test_screen_layout_stacks_regions_top_to_bottom() {
    let model = model_with_fields(&["Year", "Reviewer"], (80, 24));
    let layout = screen_layout(Rect::new(0, 0, 80, 24), &model);

    assert_eq!(layout.title.y, 0);
    assert_eq!(layout.title.height, 3);
    assert_eq!(layout.fields.height, 4);
    assert_eq!(layout.actions.height, 1);
    assert_eq!(layout.status.y, 23);
    assert_eq!(layout.toast.height, 0);
    assert!(layout.abstract_text.y < layout.fields.y);
    assert!(layout.fields.y < layout.actions.y);
}

#[test]
fn test_screen_layout_reserves_toast_row_when_active() {
    let mut model = model_with_fields(&["Year"], (80, 24));
    model.show_toast(crate::app::ToastLevel::Info, "hello");
    let layout = screen_layout(Rect::new(0, 0, 80, 24), &model);
    assert_eq!(layout.toast.height, 1);
    assert_eq!(layout.toast.y, 22);
}

#[test]
fn test_field_at_row_skips_borders() {
    let model = model_with_fields(&["Year", "Reviewer", "Score"], (80, 24));
    let layout = screen_layout(Rect::new(0, 0, 80, 24), &model);
    let top = layout.fields.y;

    assert_eq!(layout.field_at_row(top, 3, 0), None);
    assert_eq!(layout.field_at_row(top + 1, 3, 0), Some(0));
    assert_eq!(layout.field_at_row(top + 3, 3, 0), Some(2));
    assert_eq!(layout.field_at_row(top + 4, 3, 0), None);
}

#[test]
fn test_action_buttons_follow_keymap() {
    let area = Rect::new(0, 10, 120, 1);
    let buttons = action_buttons(area, &Keymap::default());
    let labels: Vec<&str> = buttons.iter().map(|(_, label, _)| label.as_str()).collect();
    assert_eq!(
        labels,
        vec![
            "[ Save (Enter) ]",
            "[ Next (2) ]",
            "[ Previous (3) ]",
            "[ Export (x) ]"
        ]
    );
    // Buttons do not overlap and sit on the bar's row.
    for pair in buttons.windows(2) {
        assert!(pair[0].2.x + pair[0].2.width < pair[1].2.x);
    }
    assert!(buttons.iter().all(|(_, _, rect)| rect.y == 10));
}

#[test]
fn test_action_button_labels_show_extra_bindings() {
    let keymap = Keymap::default().bind(KeyBinding::plain(KeyCode::Right), Trigger::Next);
    let label = ActionButton::Trigger(Trigger::Next).label(&keymap);
    assert_eq!(label, "[ Next (2/Right) ]");
    assert_eq!(
        ActionButton::Trigger(Trigger::Submit).label(&Keymap::empty()),
        "[ Save ]"
    );
}

#[test]
fn test_action_buttons_clip_to_narrow_bar() {
    let area = Rect::new(0, 0, 20, 1);
    let buttons = action_buttons(area, &Keymap::default());
    assert!(!buttons.is_empty());
    assert!(
        buttons
            .iter()
            .all(|(_, _, rect)| rect.x + rect.width <= area.width)
    );
}

#[test]
fn test_action_button_messages() {
    assert_eq!(
        ActionButton::Trigger(Trigger::Previous).message(),
        Message::PreviousRecord
    );
    assert_eq!(ActionButton::Export.message(), Message::Export);
}

#[test]
fn test_selector_rect_fits_inside_area() {
    let area = Rect::new(0, 0, 50, 10);
    let popup = selector_rect(area, 40);
    assert!(popup.x + popup.width <= area.width);
    assert!(popup.y + popup.height <= area.height);
    assert_eq!(selector_content_top(popup), popup.y + 1);
}

#[test]
fn test_selector_scroll_keeps_highlight_visible() {
    assert_eq!(selector_scroll_start(0, 5), 0);
    assert_eq!(selector_scroll_start(4, 5), 0);
    assert_eq!(selector_scroll_start(5, 5), 1);
    assert_eq!(selector_scroll_start(12, 5), 8);
}

#[test]
fn test_render_shows_cursor_in_insert_mode() {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::style::Modifier;

    let model = model_with_fields(&["Year"], (60, 20));
    let model = update(model, Message::EnterInsert);
    let model = update(model, Message::CursorHome);
    let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
    terminal.draw(|frame| render(&model, frame)).unwrap();

    let buffer = terminal.backend().buffer();
    let layout = screen_layout(Rect::new(0, 0, 60, 20), &model);
    let row = layout.fields.y + 1;
    let cursor_cell = (0..60_u16)
        .map(|x| &buffer[(x, row)])
        .find(|cell| cell.modifier.contains(Modifier::REVERSED))
        .expect("cursor cell");
    assert_eq!(cursor_cell.symbol(), "2");
}

#[test]
fn test_render_hint_when_no_fields_selected() {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    let model = model_with_fields(&[], (80, 24));
    let model = update(model, Message::SelectorCancel);
    let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
    terminal.draw(|frame| render(&model, frame)).unwrap();
    let buffer = terminal.backend().buffer();
    let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
    assert!(text.contains("No editable fields (press f to choose)"));
}

#[test]
fn test_render_keeps_abstract_line_breaks() {
    let csv = "Title,Abstract,Year\nA,\"First paragraph.\nSecond paragraph.\",2020\n";
    let mut model =
        Model::new(Some(PathBuf::from("t.csv")), (60, 20)).with_preset_fields(vec!["Year".into()]);
    model.load_bytes(csv.as_bytes()).unwrap();

    let rows = screen_rows(&model);
    let first = rows
        .iter()
        .position(|row| row.contains("First paragraph."))
        .expect("first paragraph drawn");
    let second = rows
        .iter()
        .position(|row| row.contains("Second paragraph."))
        .expect("second paragraph drawn");
    assert_eq!(second, first + 1);
    assert!(!rows[first].contains("Second"));
}

#[test]
fn test_fields_scroll_to_keep_focus_visible() {
    let mut model = model_with_many_fields(30, (60, 20));
    for _ in 0..25 {
        model = update(model, Message::FocusNext);
    }
    assert_eq!(model.form.focused_name(), Some("F25"));

    let rows = screen_rows(&model);
    let focused_row = rows
        .iter()
        .position(|row| row.contains(">F25"))
        .expect("focused field drawn");
    assert!(!rows.iter().any(|row| row.contains("F00")));

    // Clicking the drawn row resolves to the same field.
    let layout = screen_layout(Rect::new(0, 0, 60, 20), &model);
    let row = u16::try_from(focused_row).unwrap();
    assert_eq!(
        layout.field_at_row(row, model.form.len(), model.form.focus()),
        Some(25)
    );
}

#[test]
fn test_fields_start_unscrolled_when_they_fit() {
    let model = model_with_many_fields(3, (60, 20));
    let rows = screen_rows(&model);
    for name in ["F00", "F01", "F02"] {
        assert!(rows.iter().any(|row| row.contains(name)), "{name} drawn");
    }
}
