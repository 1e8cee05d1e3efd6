//! End-to-end review of a small paper list through the public API.

use std::collections::HashMap;

use recedit::app::{App, Message, Mode, update};
use recedit::error::{FieldRejection, SessionError};
use recedit::session::{Notice, Session, SessionRegistry};
use recedit::table::Table;

const PAPERS: &str = "\
Title,Abstract,Year,Venue
Deep Nets,We study nets.,,NeurIPS
Graph Cuts,\"Cuts, graphs and flows.\",,CVPR
Type Systems,Sound types.,,POPL
";

#[test]
fn test_year_backfill_scenario() {
    let mut session = Session::new();
    assert_eq!(
        session.load(PAPERS.as_bytes()).unwrap(),
        Notice::Loaded { rows: 3, columns: 4 }
    );
    session.set_editable_fields(["Year"]).unwrap();

    let years = ["2020", "2019", "2021"];
    for (idx, year) in years.iter().enumerate() {
        assert_eq!(session.cursor(), idx + 1);
        let values = HashMap::from([("Year", *year)]);
        session.submit(&values);
        let notice = session.next();
        assert_eq!(notice.is_some(), idx == years.len() - 1);
    }
    assert_eq!(session.cursor(), 3);
    assert_eq!(session.next(), Some(Notice::EndOfData));

    let exported = Table::from_csv_bytes(&session.export().unwrap()).unwrap();
    assert_eq!(exported.row_count(), 3);
    assert_eq!(exported.headers(), ["Title", "Abstract", "Year", "Venue"]);
    for (row, year) in years.iter().enumerate() {
        assert_eq!(exported.cell(row, "Year"), Some(*year));
    }
    assert_eq!(exported.cell(1, "Abstract"), Some("Cuts, graphs and flows."));
}

#[test]
fn test_read_only_columns_cannot_be_selected() {
    let mut session = Session::new();
    session.load(PAPERS.as_bytes()).unwrap();
    session.set_editable_fields(["Venue"]).unwrap();

    let err = session.set_editable_fields(["Venue", "Abstract"]).unwrap_err();
    assert!(matches!(
        err,
        SessionError::InvalidField {
            reason: FieldRejection::ReadOnly,
            ..
        }
    ));
    assert_eq!(session.editable_fields(), ["Venue"]);
}

#[test]
fn test_malformed_reload_keeps_previous_table() {
    let mut session = Session::new();
    session.load(PAPERS.as_bytes()).unwrap();
    let _ = session.next();

    let err = session.load(b"Title,Year\nA,1,2\n").unwrap_err();
    assert!(matches!(err, SessionError::Parse(_)));
    assert_eq!(session.row_count(), 3);
    assert_eq!(session.cursor(), 2);
}

#[test]
fn test_tui_model_review_and_export() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("papers.csv");
    let output = dir.path().join("updated_data.csv");
    std::fs::write(&source, PAPERS).unwrap();

    let app = App::new(source).with_output_path(output.clone());
    let mut model = app.prepare_model((100, 30)).unwrap();
    assert_eq!(model.mode, Mode::SelectFields);

    // Check "Year" (first candidate) and apply.
    for msg in [Message::SelectorToggle, Message::SelectorConfirm] {
        model = update(model, msg);
    }
    assert_eq!(model.session.editable_fields(), ["Year"]);

    for year in ["2020", "2019"] {
        model = update(model, Message::EnterInsert);
        for ch in year.chars() {
            model = update(model, Message::InsertChar(ch));
        }
        model = update(model, Message::Submit);
        model = update(model, Message::NextRecord);
    }
    assert_eq!(model.session.cursor(), 3);

    model.session.export_to(&model.output_path).unwrap();
    let written = Table::from_csv_bytes(&std::fs::read(&output).unwrap()).unwrap();
    assert_eq!(written.cell(0, "Year"), Some("2020"));
    assert_eq!(written.cell(1, "Year"), Some("2019"));
    assert_eq!(written.cell(2, "Year"), Some(""));
    assert!(!model.session.has_unexported_changes());
}

#[test]
fn test_registry_sessions_are_isolated() {
    let registry = SessionRegistry::new();
    let alice = registry.open();
    let bob = registry.open();

    for key in [alice, bob] {
        registry
            .with_session(key, |s| s.load(PAPERS.as_bytes()))
            .unwrap()
            .unwrap();
    }
    registry.with_session(alice, |s| {
        let _ = s.next();
        let _ = s.next();
    });

    assert_eq!(registry.with_session(alice, |s| s.cursor()), Some(3));
    assert_eq!(registry.with_session(bob, |s| s.cursor()), Some(1));
}
