//! This is a parser for JSON.
//! Run it with the following command:
//! cargo run --example json -- demos/sample.json
//!
//! Set `RUST_LOG=parsnip=trace` to watch the value parser at work.

use ariadne::{Color, Fmt, Label, Report, ReportKind, Source};
use parsnip::prelude::*;
use std::{collections::HashMap, env, fs};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug)]
#[allow(dead_code)]
enum Json {
    Null,
    Bool(bool),
    Str(String),
    Num(f64),
    Array(Vec<Json>),
    Object(HashMap<String, Json>),
}

fn separated<'a, P>(item: P) -> impl Parser<'a, [u8], Output = Vec<P::Output>> + Clone + Send + Sync
where
    P: Parser<'a, [u8]> + Clone + Send + Sync,
{
    item.clone()
        .then_with(preceded(literal(","), item.cut()).star(), |first, mut rest: Vec<_>| {
            rest.insert(0, first);
            rest
        })
        .or_not()
        .map(Option::unwrap_or_default)
}

fn parser<'a>() -> impl Parser<'a, [u8], Output = Json> {
    recursive(|value| {
        let number = literal("-")
            .or_not()
            .then(text::int(10))
            .then(preceded(literal("."), text::digits(10)).or_not())
            .then(
                preceded(
                    choice((literal("e"), literal("E"))),
                    choice((literal("+"), literal("-"))).or_not().then(text::digits(10)),
                )
                .or_not(),
            )
            .recognize()
            .map(|s: String| s.parse::<f64>().unwrap())
            .labelled("number");

        let escape = preceded(
            literal("\\"),
            choice((
                literal("\\").to('\\'),
                literal("/").to('/'),
                literal("\"").to('"'),
                literal("b").to('\x08'),
                literal("f").to('\x0C'),
                literal("n").to('\n'),
                literal("r").to('\r'),
                literal("t").to('\t'),
            ))
            .expected(["escape character"])
            .cut(),
        );

        let string = delimited(
            literal("\""),
            choice((satisfy(|c: char| c != '\\' && c != '"'), escape)).star(),
            literal("\""),
        )
        .cut_after_open()
        .map(|chars: Vec<char>| chars.into_iter().collect::<String>())
        .labelled("string");

        let array = delimited(literal("["), separated(value.clone()), literal("]").padded())
            .cut_after_open()
            .map(Json::Array);

        let member = string
            .clone()
            .padded()
            .then_ignore(literal(":").cut())
            .then(value);
        let object = delimited(literal("{"), separated(member), literal("}").padded())
            .cut_after_open()
            .map(|members: Vec<(String, Json)>| Json::Object(members.into_iter().collect()));

        // Every kind of value can be told apart by its first character
        let mut value = dispatch([
            ('n', literal("null").to(Json::Null).boxed()),
            ('t', literal("true").to(Json::Bool(true)).boxed()),
            ('f', literal("false").to(Json::Bool(false)).boxed()),
            ('"', string.map(Json::Str).boxed()),
            ('[', array.boxed()),
            ('{', object.boxed()),
        ]);
        for c in "-0123456789".chars() {
            value = value.on(c, number.clone().map(Json::Num));
        }

        value.expected(["value"]).debug("value").padded()
    })
    .complete()
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let src = fs::read_to_string(env::args().nth(1).expect("Expected file argument"))
        .expect("Failed to read file");

    let result = parser().parse(src.as_bytes());
    match result {
        Ok(json) => println!("{:#?}", json.value),
        Err(failure) => {
            let found = src.as_bytes().char_at(failure.offset);
            let span = failure.offset..failure.offset + found.map_or(0, |(_, width)| width);

            Report::build(ReportKind::Error, ((), span.clone()))
                .with_config(ariadne::Config::new().with_index_type(ariadne::IndexType::Byte))
                .with_code(3)
                .with_message(failure.to_string())
                .with_label(
                    Label::new(((), span))
                        .with_message(format!(
                            "Unexpected {}",
                            found
                                .map(|(c, _)| format!("character {}", format!("{c:?}").fg(Color::Red)))
                                .unwrap_or_else(|| "end of input".to_string())
                        ))
                        .with_color(Color::Red),
                )
                .finish()
                .eprint(Source::from(&src))
                .unwrap();
        }
    }
}
