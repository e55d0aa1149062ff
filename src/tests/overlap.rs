use std::collections::BTreeSet;

use crate::{
    Document, GraphBuilder, ImportConfig, LayerSet, MarkupEvent, MarkupId, PathConfig, PathError,
    PathResolver,
};

/// `text|A,B` holding `line|A` over "one two" and `s|B` over "two three".
fn overlapping() -> Document {
    GraphBuilder::import(
        vec![
            MarkupEvent::open_in("text", ["A", "B"]),
            MarkupEvent::open_in("line", ["A"]),
            MarkupEvent::text("one"),
            MarkupEvent::open_in("s", ["B"]),
            MarkupEvent::text("two"),
            MarkupEvent::close_in("line", ["A"]),
            MarkupEvent::text("three"),
            MarkupEvent::close_in("s", ["B"]),
            MarkupEvent::close_in("text", ["A", "B"]),
        ],
        ImportConfig::default(),
    )
    .into_committed()
    .unwrap()
}

fn find(document: &Document, tag: &str) -> MarkupId {
    document
        .markup_ids()
        .find(|id| document.markup(*id).unwrap().tag == tag)
        .unwrap()
}

#[test]
fn test_overlap_across_layers_is_not_an_error() {
    let document = overlapping();
    let text = find(&document, "text");
    let line = find(&document, "line");
    let s = find(&document, "s");

    let expected: BTreeSet<String> = ["A", "B"].iter().map(|l| l.to_string()).collect();
    assert_eq!(document.layer_names(), expected);
    assert!(!document.has_layer(""));

    assert_eq!(document.layer_root("A"), Ok(text));
    assert_eq!(document.layer_root("B"), Ok(text));
    assert_eq!(document.child_markup(text, "A"), vec![line]);
    assert_eq!(document.child_markup(text, "B"), vec![s]);

    assert_eq!(document.markup_text(line), "onetwo");
    assert_eq!(document.markup_text(s), "twothree");
    assert!(document.is_continuous(line));
    assert!(document.is_continuous(s));
}

#[test]
fn test_markups_for_text_node_filters_by_layer() {
    let document = overlapping();
    let text = find(&document, "text");
    let line = find(&document, "line");
    let s = find(&document, "s");
    let two = document.text_nodes().nth(1).unwrap();

    assert_eq!(document.markups_for_text_node(two, None), vec![text, line, s]);
    assert_eq!(
        document.markups_for_text_node(two, Some(&LayerSet::new(["B"]))),
        vec![text, s]
    );
    let mut inner_first = document.markups_for_text_node(two, None);
    inner_first.reverse();
    assert_eq!(inner_first[0], s);
}

#[test]
fn test_layer_sequences() {
    let document = overlapping();
    let all: Vec<_> = document.text_nodes().collect();
    assert_eq!(document.text_node_sequence("A"), all);
    assert_eq!(document.text_node_sequence("B"), all);
    assert!(document.text_node_sequence("").is_empty());
}

#[test]
fn test_multi_layer_paths() {
    let document = overlapping();
    let text = find(&document, "text");
    let resolver = PathResolver::new(&document);

    assert_eq!(resolver.path(text).unwrap(), "text|A,B");
    assert_eq!(resolver.path(find(&document, "line")).unwrap(), "text/line|A");
    assert_eq!(resolver.path(find(&document, "s")).unwrap(), "text/s|B");

    let strict = PathResolver::with_config(
        &document,
        PathConfig::new().with_reject_ambiguous_layers(true),
    );
    assert_eq!(
        strict.path(text),
        Err(PathError::AmbiguousLayerForPath {
            markup: text,
            layers: "A,B".into(),
        })
    );
    assert_eq!(strict.path(find(&document, "s")).unwrap(), "text/s|B");
}

#[test]
fn test_same_tag_in_two_layers_needs_layers_on_close() {
    let result = GraphBuilder::import(
        vec![
            MarkupEvent::open_in("x", ["A"]),
            MarkupEvent::open_in("x", ["B"]),
            MarkupEvent::text("t"),
            MarkupEvent::close_in("x", ["A"]),
            MarkupEvent::text("u"),
            MarkupEvent::close_in("x", ["B"]),
        ],
        ImportConfig::default(),
    );
    assert!(!result.has_errors());

    let document = result.value;
    let a = document.layer_root("A").unwrap();
    let b = document.layer_root("B").unwrap();
    assert_eq!(document.markup_text(a), "t");
    assert_eq!(document.markup_text(b), "tu");
}
