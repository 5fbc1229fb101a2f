use opdoc_catalog::{Catalog, CopyState};
use opdoc_highlight::Language;
use opdoc_render::{ClipboardError, CopyOutcome, MemoryClipboard, Viewer};
use pretty_assertions::assert_eq;

fn viewer() -> Viewer {
    let catalog = Catalog::embedded().expect("embedded catalog");
    Viewer::new(catalog, Language::JavaScript)
}

#[test]
fn defer_displays_description_and_examples() {
    let mut viewer = viewer();
    let displayed = viewer.navigate("defer").expect("defer displayed");

    assert!(displayed.description.contains("惰性方式"));
    assert_eq!(displayed.examples.len(), 2);
    assert_eq!(displayed.examples[0].title, "基础示例");
}

#[test]
fn unknown_identifier_shows_empty_state() {
    let mut viewer = viewer();
    viewer.navigate("defer");
    assert!(viewer.navigate("does-not-exist").is_none());
    assert!(viewer.examples().is_empty());
    assert!(viewer.description().is_none());
}

#[test]
fn displayed_examples_match_authored_order() {
    let catalog = Catalog::embedded().expect("embedded catalog");
    let mut viewer = Viewer::new(catalog.clone(), Language::JavaScript);
    for (identifier, record) in catalog.iter() {
        viewer.navigate(identifier);
        let titles: Vec<_> = viewer.examples().iter().map(|e| e.title.clone()).collect();
        let authored: Vec<_> = record.examples.iter().map(|e| e.title.clone()).collect();
        assert_eq!(titles, authored, "{identifier}");
        assert!(viewer
            .examples()
            .iter()
            .all(|example| example.copy_state == CopyState::NotCopied));
    }
}

#[test]
fn copying_first_of_example_writes_literal_code() {
    let mut viewer = viewer();
    viewer.navigate("of");
    let mut clipboard = MemoryClipboard::new();

    assert_eq!(viewer.copy(0, &mut clipboard), CopyOutcome::Copied);
    let written = clipboard.last().expect("clipboard write");
    assert!(written.starts_with("import { of } from 'rxjs';"));
    assert!(!written.contains("hljs"));
    assert_eq!(viewer.examples()[0].copy_state, CopyState::Copied);
    assert_eq!(viewer.examples()[1].copy_state, CopyState::NotCopied);
}

#[test]
fn copy_state_resets_after_navigating_away_and_back() {
    let mut viewer = viewer();
    let mut clipboard = MemoryClipboard::new();

    viewer.navigate("defer");
    assert_eq!(viewer.copy(0, &mut clipboard), CopyOutcome::Copied);
    assert_eq!(viewer.examples()[0].copy_state, CopyState::Copied);

    viewer.navigate("of");
    viewer.navigate("defer");
    assert_eq!(viewer.examples()[0].copy_state, CopyState::NotCopied);
}

#[test]
fn renavigating_yields_identical_markup() {
    let mut viewer = viewer();
    let first = viewer.navigate("forkJoin").cloned().expect("forkJoin");
    let second = viewer.navigate("forkJoin").cloned().expect("forkJoin");
    assert_eq!(first, second);
}

#[test]
fn failed_write_leaves_state_unchanged() {
    let mut viewer = viewer();
    viewer.navigate("of");

    let mut failing = MemoryClipboard::failing();
    assert_eq!(viewer.copy(0, &mut failing), CopyOutcome::Failed);
    assert_eq!(viewer.examples()[0].copy_state, CopyState::NotCopied);

    let mut clipboard = MemoryClipboard::new();
    viewer.copy(0, &mut clipboard);
    let ticket = viewer.request_copy(0).expect("ticket");
    assert_eq!(
        viewer.complete_copy(ticket, Err(ClipboardError::Unavailable)),
        CopyOutcome::Failed
    );
    assert_eq!(viewer.examples()[0].copy_state, CopyState::Copied);
}

#[test]
fn ticket_from_previous_navigation_is_discarded() {
    let mut viewer = viewer();
    viewer.navigate("defer");
    let ticket = viewer.request_copy(0).expect("ticket");
    assert!(ticket.code().contains("defer"));

    viewer.navigate("of");
    assert_eq!(viewer.complete_copy(ticket, Ok(())), CopyOutcome::Superseded);
    assert!(viewer
        .examples()
        .iter()
        .all(|example| example.copy_state == CopyState::NotCopied));
}

#[test]
fn ticket_is_discarded_even_when_returning_to_same_operator() {
    let mut viewer = viewer();
    viewer.navigate("defer");
    let ticket = viewer.request_copy(1).expect("ticket");
    viewer.navigate("defer");
    assert_eq!(viewer.complete_copy(ticket, Ok(())), CopyOutcome::Superseded);
    assert_eq!(viewer.examples()[1].copy_state, CopyState::NotCopied);
}

#[test]
fn paths_route_to_operators() {
    let mut viewer = viewer();

    let root = viewer.navigate_path("").expect("root redirects");
    assert_eq!(root.identifier, "defer");

    let of = viewer.navigate_path("/operator/of").expect("of");
    assert_eq!(of.identifier, "of");

    let encoded = viewer
        .navigate_path("/operator/%66orkJoin")
        .expect("decoded identifier");
    assert_eq!(encoded.identifier, "forkJoin");

    assert!(viewer.navigate_path("/elsewhere").is_none());
    assert!(viewer.examples().is_empty());
    assert!(viewer.current_identifier().is_none());
}

#[test]
fn configured_default_operator_is_used_for_root() {
    let catalog = Catalog::embedded().expect("embedded catalog");
    let mut viewer = Viewer::new(catalog, Language::JavaScript).with_default_operator("zip");
    let displayed = viewer.navigate_path("/").expect("zip");
    assert_eq!(displayed.identifier, "zip");
}
