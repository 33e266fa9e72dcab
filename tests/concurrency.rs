//! Grammars hold no per-invocation state, so one grammar can serve many threads at once.

mod common;

use common::{json, Json};
use parsnip::prelude::*;
use std::thread;

fn assert_send_sync<T: Send + Sync>(_: &T) {}

#[test]
fn grammars_are_send_and_sync() {
    let grammar = json::<[u8]>();
    assert_send_sync(&grammar);
    assert_send_sync(&grammar.clone().boxed());
    assert_send_sync(&Recursive::<[char], ()>::declare());
}

#[test]
fn one_grammar_many_threads() {
    let documents: Vec<String> = (0..8)
        .map(|i| format!(r#"{{"id": {i}, "tags": ["t{i}", null, true]}}"#))
        .collect();
    let grammar = json::<[u8]>();

    let results: Vec<ParseResult<Json>> = thread::scope(|scope| {
        let handles: Vec<_> = documents
            .iter()
            .map(|doc| {
                let grammar = &grammar;
                scope.spawn(move || grammar.parse(doc.as_bytes()))
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });

    for (i, (doc, result)) in documents.iter().zip(results).enumerate() {
        let expected = Json::Object(vec![
            ("id".to_string(), Json::Num(i as f64)),
            (
                "tags".to_string(),
                Json::Array(vec![Json::Str(format!("t{i}")), Json::Null, Json::Bool(true)]),
            ),
        ]);
        assert_eq!(result, Ok(Success::new(doc.len(), expected)));
    }
}

#[test]
fn clones_share_a_recursive_definition() {
    let grammar = json::<[u8]>();
    let copy = grammar.clone();
    drop(grammar);

    assert_eq!(copy.parse("[[]]".as_bytes()), Ok(Success::new(4, Json::Array(vec![Json::Array(vec![])]))));
}
