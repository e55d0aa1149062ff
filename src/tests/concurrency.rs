use crate::{Document, GraphBuilder, ImportConfig, LayerDisplay, MarkupEvent, PathResolver};

fn document() -> Document {
    let mut events = vec![MarkupEvent::open("text")];
    for n in 0..50 {
        events.push(MarkupEvent::open("l"));
        events.push(MarkupEvent::text(format!("line {}", n)));
        events.push(MarkupEvent::close("l"));
    }
    events.push(MarkupEvent::close("text"));
    GraphBuilder::import(events, ImportConfig::default())
        .into_committed()
        .unwrap()
}

#[test]
fn test_readers_share_a_document() {
    let document = document();
    let expected = PathResolver::new(&document).all_paths().unwrap();

    std::thread::scope(|scope| {
        let paths = scope.spawn(|| PathResolver::new(&document).all_paths().unwrap());
        let display = scope.spawn(|| {
            let mut display = LayerDisplay::new(&document, "");
            display.include_all();
            display.to_string()
        });
        let sequence = scope.spawn(|| document.text_node_sequence("").len());

        assert_eq!(paths.join().unwrap(), expected);
        assert_eq!(display.join().unwrap().lines().count(), 52);
        assert_eq!(sequence.join().unwrap(), 50);
    });

    assert_eq!(expected[1].1, "text/l[1]");
    assert_eq!(expected[50].1, "text/l[50]");
}
