use crate::{
    Document, GraphBuilder, ImportConfig, MarkupEvent, MarkupId, PathError, PathResolver,
};

fn import(events: Vec<MarkupEvent>) -> Document {
    GraphBuilder::import(events, ImportConfig::default())
        .into_committed()
        .unwrap()
}

fn paths(document: &Document) -> Vec<String> {
    PathResolver::new(document)
        .all_paths()
        .unwrap()
        .into_iter()
        .map(|(_, path)| path)
        .collect()
}

#[test]
fn test_nested_chain() {
    let document = import(vec![
        MarkupEvent::open("a"),
        MarkupEvent::open("b"),
        MarkupEvent::open("c"),
        MarkupEvent::text("x"),
        MarkupEvent::close("c"),
        MarkupEvent::close("b"),
        MarkupEvent::close("a"),
    ]);

    assert_eq!(paths(&document), vec!["a", "a/b", "a/b/c"]);
}

#[test]
fn test_same_tag_siblings_are_indexed() {
    let document = import(vec![
        MarkupEvent::open("a"),
        MarkupEvent::open("l"),
        MarkupEvent::open("n"),
        MarkupEvent::text("x"),
        MarkupEvent::close("n"),
        MarkupEvent::close("l"),
        MarkupEvent::open("l"),
        MarkupEvent::open("n"),
        MarkupEvent::text("y"),
        MarkupEvent::close("n"),
        MarkupEvent::close("l"),
        MarkupEvent::close("a"),
    ]);

    assert_eq!(
        paths(&document),
        vec!["a", "a/l[1]", "a/l[1]/n", "a/l[2]", "a/l[2]/n"]
    );
}

#[test]
fn test_index_counts_only_same_tag() {
    let document = import(vec![
        MarkupEvent::open("a"),
        MarkupEvent::open("head"),
        MarkupEvent::text("x"),
        MarkupEvent::close("head"),
        MarkupEvent::open("l"),
        MarkupEvent::text("y"),
        MarkupEvent::close("l"),
        MarkupEvent::close("a"),
    ]);

    assert_eq!(paths(&document), vec!["a", "a/head", "a/l"]);
}

#[test]
fn test_top_level_siblings_are_indexed() {
    let document = import(vec![
        MarkupEvent::open("p"),
        MarkupEvent::text("x"),
        MarkupEvent::close("p"),
        MarkupEvent::open("p"),
        MarkupEvent::text("y"),
        MarkupEvent::close("p"),
    ]);

    assert_eq!(paths(&document), vec!["p[1]", "p[2]"]);
}

#[test]
fn test_single_layer_qualifier() {
    let document = import(vec![
        MarkupEvent::open_in("text", ["L"]),
        MarkupEvent::open_in("line", ["L"]),
        MarkupEvent::text("x"),
        MarkupEvent::close("line"),
        MarkupEvent::close("text"),
    ]);

    assert_eq!(paths(&document), vec!["text|L", "text/line|L"]);
}

#[test]
fn test_unknown_markup() {
    let document = import(vec![MarkupEvent::open("a"), MarkupEvent::close("a")]);
    let missing = MarkupId(9);
    assert_eq!(
        PathResolver::new(&document).path(missing),
        Err(PathError::UnknownMarkup(missing))
    );
    assert_eq!(
        PathError::UnknownMarkup(missing).to_string(),
        "unknown markup m9"
    );
}
