//! The same grammar must make the same decisions on code points and on UTF-8 bytes.

mod common;

use common::{char_offset, chars, json};
use parsnip::prelude::*;
use test_case::test_case;

/// Whitespace separated words, each either an identifier or a quoted run of anything but quotes.
fn words<'a, I: Input + ?Sized>() -> impl Parser<'a, I, Output = Vec<String>> + Clone {
    let quoted = delimited(
        literal("«"),
        take_while(|c: char| c != '»').recognize(),
        literal("»"),
    )
    .cut_after_open();

    choice((text::ident(), quoted))
        .padded()
        .plus()
        .complete()
}

/// Convert a byte-indexed outcome into the code point indexed one expected from the textual form.
fn to_text<T>(s: &str, result: ParseResult<T>) -> ParseResult<T> {
    match result {
        Ok(success) => Ok(Success::new(char_offset(s, success.offset), success.value)),
        Err(failure) => Err(Failure {
            offset: char_offset(s, failure.offset),
            ..failure
        }),
    }
}

#[test_case("größe straße" ; "latin")]
#[test_case("λ «über alles» μ" ; "quoted")]
#[test_case("日本 語" ; "cjk")]
#[test_case("naïve «unterminated" ; "unterminated quote")]
#[test_case("ok 🦀" ; "symbol")]
#[test_case("" ; "empty")]
fn words_agree(s: &str) {
    let text = chars(s);
    let by_char = words::<[char]>().parse(text.as_slice());
    let by_byte = words::<[u8]>().parse(s.as_bytes());

    assert_eq!(to_text(s, by_byte), by_char);
}

#[test_case(r#"{"ключ": ["значение", 1]}"# ; "cyrillic")]
#[test_case(r#"["€", "🦀", "\n"]"# ; "escapes and wide code points")]
#[test_case(r#"{"€": tru}"# ; "bad literal")]
#[test_case(r#"["ü"  ,  ]"# ; "trailing comma")]
#[test_case(r#""ö"#; "unterminated")]
fn json_agrees(s: &str) {
    let text = chars(s);
    let by_char = json::<[char]>().parse(text.as_slice());
    let by_byte = json::<[u8]>().parse(s.as_bytes());

    assert_eq!(to_text(s, by_byte), by_char);
}

#[test]
fn offsets_differ_only_in_units() {
    let s = "€x";
    let text = chars(s);

    assert_eq!(
        preceded(any(), literal("y")).parse(text.as_slice()),
        Err(Failure::new(1, ["y"])),
    );
    assert_eq!(
        preceded(any(), literal("y")).parse(s.as_bytes()),
        Err(Failure::new(3, ["y"])),
    );
}

#[test]
fn byte_offsets_may_start_mid_text() {
    let s = "ab€cd";
    let text = chars(s);

    // Both forms accept starting at the same code point
    assert_eq!(
        literal("€cd").parse_at(text.as_slice(), 2),
        Ok(Success::new(5, "€cd")),
    );
    assert_eq!(
        literal("€cd").parse_at(s.as_bytes(), 2),
        Ok(Success::new(7, "€cd")),
    );
}
