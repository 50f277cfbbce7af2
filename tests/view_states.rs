//! Page rendering across the generate flow

use scraper::{Html, Selector};
use tabloid::error::{classify_failure, QUOTA_EXCEEDED_MESSAGE};
use tabloid::view::{page, render_page, SECTIONS};
use tabloid::{AppState, GeneratedDocument, ViewState};

fn fixture() -> GeneratedDocument {
    GeneratedDocument::from_json(include_str!("fixtures/document.json")).unwrap()
}

fn select<'a>(doc: &'a Html, css: &str) -> Vec<scraper::ElementRef<'a>> {
    let sel = Selector::parse(css).unwrap();
    doc.select(&sel).collect()
}

fn active_view(html: &str) -> String {
    let doc = Html::parse_document(html);
    let views = select(&doc, "[data-view]");
    assert_eq!(views.len(), 1, "exactly one view must be visible");
    views[0].value().attr("data-view").unwrap().to_string()
}

fn generate_button(html: &str) -> (String, bool) {
    let doc = Html::parse_document(html);
    let button = select(&doc, "button#generate")[0];
    let label = button.text().collect::<String>();
    (label, button.value().attr("disabled").is_some())
}

#[test]
fn first_visit_shows_empty_state() {
    let html = render_page(&ViewState::Idle);
    assert_eq!(active_view(&html), "empty");
    assert!(html.contains(page::EMPTY_HEADING));

    let (label, disabled) = generate_button(&html);
    assert_eq!(label, page::GENERATE_LABEL);
    assert!(!disabled);
}

#[test]
fn loading_disables_generate_and_shows_skeleton() {
    let mut state = AppState::new();
    state.trigger().unwrap();
    let html = render_page(state.view());
    assert_eq!(active_view(&html), "loading");

    let (label, disabled) = generate_button(&html);
    assert_eq!(label, page::GENERATING_LABEL);
    assert!(disabled);
}

#[test]
fn success_renders_sections_in_order() {
    let mut state = AppState::new();
    let id = state.trigger().unwrap();
    assert!(state.resolve(id, Ok(fixture())));

    let html = render_page(state.view());
    assert_eq!(active_view(&html), "result");

    let doc = Html::parse_document(&html);
    let keys: Vec<_> = select(&doc, "#tabloid section")
        .iter()
        .map(|s| s.value().attr("data-section").unwrap().to_string())
        .collect();
    let expected: Vec<_> = SECTIONS.iter().map(|s| s.key().to_string()).collect();
    assert_eq!(keys, expected);

    let verses: Vec<String> = select(&doc, "p.verse").iter().map(|p| p.text().collect()).collect();
    assert_eq!(verses, fixture().poem.content);

    let paths = select(&doc, "figure svg path");
    assert_eq!(paths.len(), 2);
    assert_eq!(paths[1].value().attr("d"), Some(fixture().illustration_ideas.items[1].svg_path.as_str()));

    let slogans: Vec<String> = select(&doc, "ul.slogans li").iter().map(|li| li.text().collect()).collect();
    assert_eq!(slogans[0], "\"强国有我，青春无悔\"");
}

#[test]
fn failure_then_retry() {
    let mut state = AppState::new();
    let first = state.trigger().unwrap();
    state.resolve(first, Err(classify_failure("RESOURCE_EXHAUSTED")));

    let html = render_page(state.view());
    assert_eq!(active_view(&html), "error");
    let doc = Html::parse_document(&html);
    let alert: String = select(&doc, "[role=alert] .message")[0].text().collect();
    assert_eq!(alert, QUOTA_EXCEEDED_MESSAGE);

    // a new attempt clears the error
    let second = state.trigger().unwrap();
    assert_eq!(active_view(&render_page(state.view())), "loading");
    assert!(state.resolve(second, Ok(fixture())));
    assert_eq!(active_view(&render_page(state.view())), "result");
}

#[test]
fn stale_outcome_never_replaces_newer_result() {
    let mut state = AppState::new();
    let first = state.trigger().unwrap();
    state.resolve(first, Err(classify_failure("timeout")));
    let second = state.trigger().unwrap();
    assert!(state.resolve(second, Ok(fixture())));

    assert!(!state.resolve(first, Err(classify_failure("late 429"))));
    assert_eq!(state.document().unwrap().main_title, "强国有我");
}
