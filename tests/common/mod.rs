#![allow(dead_code)]

use parsnip::prelude::*;

#[derive(Clone, Debug, PartialEq)]
pub enum Json {
    Null,
    Bool(bool),
    Str(String),
    Num(f64),
    Array(Vec<Json>),
    Object(Vec<(String, Json)>),
}

pub fn chars(s: &str) -> Vec<char> {
    s.chars().collect()
}

/// The code point offset corresponding to a byte offset into `s`.
pub fn char_offset(s: &str, byte_offset: usize) -> usize {
    s[..byte_offset].chars().count()
}

/// Zero or more items separated by commas. Once a comma is seen, an item must follow.
pub fn separated<'a, I, P>(item: P) -> impl Parser<'a, I, Output = Vec<P::Output>> + Clone + Send + Sync
where
    I: Input + ?Sized,
    P: Parser<'a, I> + Clone + Send + Sync,
{
    item.clone()
        .then_with(
            preceded(literal(","), item.cut()).star(),
            |first, mut rest: Vec<_>| {
                rest.insert(0, first);
                rest
            },
        )
        .or_not()
        .map(Option::unwrap_or_default)
}

pub fn json<'a, I: Input + ?Sized>() -> impl Parser<'a, I, Output = Json> + Clone + Send + Sync {
    let value = recursive(|value| {
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

        let array = delimited(
            literal("["),
            separated(value.clone()),
            literal("]").padded(),
        )
        .cut_after_open()
        .map(Json::Array);

        let member = string
            .clone()
            .padded()
            .then_ignore(literal(":").cut())
            .then(value);

        let object = delimited(
            literal("{"),
            separated(member),
            literal("}").padded(),
        )
        .cut_after_open()
        .map(Json::Object);

        choice((
            literal("null").to(Json::Null),
            literal("true").to(Json::Bool(true)),
            literal("false").to(Json::Bool(false)),
            number.map(Json::Num),
            string.map(Json::Str),
            array,
            object,
        ))
        .labelled("value")
        .padded()
    });

    value.complete()
}
