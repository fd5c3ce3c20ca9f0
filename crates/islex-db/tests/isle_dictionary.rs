use std::env;

use islex_db::{CaseInsensitive, IndexCache, ParseOptions, Source};
use islex_types::EntryClass;

fn dict_source() -> Option<Source> {
    env::var("ISLEX_DICT").ok().map(Source::new)
}

#[test]
fn loads_full_isle_dictionary() {
    let Some(source) = dict_source() else {
        eprintln!("skipping: ISLEX_DICT not set");
        return;
    };
    let mut stream = source
        .stream(ParseOptions::clean(), |_| {})
        .expect("open isle dictionary");
    let mut classes = [0usize; 3];
    for word in stream.by_ref() {
        let slot = EntryClass::ALL
            .iter()
            .position(|c| *c == word.class())
            .unwrap();
        classes[slot] += 1;
    }
    stream.lines_mut().finish().expect("read isle dictionary to the end");
    let total: usize = classes.iter().sum();
    assert!(total > 100_000, "dictionary too small: {total}");
    assert!(
        stream.skipped() * 100 < stream.lines_read(),
        "too many bad lines: {} of {}",
        stream.skipped(),
        stream.lines_read()
    );
    assert!(classes.iter().all(|n| *n > 0), "empty class: {classes:?}");

    let mut cache = IndexCache::new(ParseOptions::clean());
    let index = cache.orthography(&source).expect("orthography index");
    let view = CaseInsensitive::new(&index);
    assert!(view.contains_key("dog"));
    assert!(view.contains_key("Read"));
}
