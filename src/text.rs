//! Text-specific parsers and utilities.
//!
//! *“Ford!" he said, "there's an infinite number of monkeys outside who want to talk to us about this script for
//! Hamlet they've worked out.”*
//!
//! The parsers in this module are generic over every [`Input`], so the same helper works on code points and on UTF-8
//! bytes alike.

use super::*;

fn is_inline_whitespace(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn is_ident_start(c: char) -> bool {
    c == '_' || unicode_ident::is_xid_start(c)
}

fn is_ident_continue(c: char) -> bool {
    unicode_ident::is_xid_continue(c)
}

/// The offset of the first code point at or after `offset` that is not whitespace.
fn skip_whitespace<I: Input + ?Sized>(input: &I, mut offset: usize) -> usize {
    while let Some((c, width)) = input.char_at(offset) {
        if !c.is_whitespace() {
            break;
        }
        offset += width;
    }
    offset
}

/// A parser that accepts (and ignores) any amount of whitespace, newlines included.
///
/// This parser never fails: zero whitespace is fine.
pub fn whitespace<I: Input + ?Sized>() -> TakeWhile<fn(char) -> bool, I> {
    take_while(char::is_whitespace as fn(char) -> bool)
}

/// A parser that accepts (and ignores) any amount of spaces and tabs, but not newlines.
pub fn inline_whitespace<I: Input + ?Sized>() -> TakeWhile<fn(char) -> bool, I> {
    take_while(is_inline_whitespace as fn(char) -> bool)
}

/// A parser that accepts a single newline.
///
/// `\r\n` counts as one newline, as do the Unicode next line, line separator and paragraph separator characters.
///
/// # Examples
///
/// ```
/// # use parsnip::prelude::*;
/// let newline = text::newline::<[u8]>();
///
/// assert_eq!(newline.parse("\r\nx".as_bytes()), Ok(Success::new(2, ())));
/// assert_eq!(newline.parse("\nx".as_bytes()), Ok(Success::new(1, ())));
/// assert_eq!(newline.parse("\u{2029}".as_bytes()), Ok(Success::new(3, ())));
/// assert_eq!(newline.parse("x".as_bytes()), Err(Failure::new(0, ["newline"])));
/// ```
pub fn newline<'a, I: Input + ?Sized>() -> impl Parser<'a, I, Output = ()> + Copy + Send + Sync {
    custom(|input: &'a I, offset: usize| {
        if let Some(width) = input.match_literal(offset, "\r\n") {
            return Ok(Success::new(offset + width, ()));
        }
        match input.char_at(offset) {
            Some(('\n' | '\r' | '\x0B' | '\x0C' | '\u{0085}' | '\u{2028}' | '\u{2029}', width)) => {
                Ok(Success::new(offset + width, ()))
            }
            _ => Err(Failure::new(offset, ["newline"])),
        }
    })
}

/// A parser that accepts one or more digits of the given radix.
///
/// # Panics
///
/// Panics if `radix` is greater than 36, like [`char::is_digit`] does.
pub fn digits<'a, I: Input + ?Sized>(radix: u32) -> impl Parser<'a, I, Output = ()> + Clone + Send + Sync {
    take_while1(move |c: char| c.is_digit(radix), ["digit"])
}

/// A parser that accepts a non-negative integer of the given radix, yielding its text.
///
/// An integer is either a lone `0` or a non-zero digit followed by any number of digits, so leading zeroes are not
/// consumed.
///
/// # Examples
///
/// ```
/// # use parsnip::prelude::*;
/// let dec = text::int::<[u8]>(10);
///
/// assert_eq!(dec.parse("0".as_bytes()), Ok(Success::new(1, "0".to_string())));
/// assert_eq!(dec.parse("1987".as_bytes()), Ok(Success::new(4, "1987".to_string())));
/// // No leading zeroes
/// assert_eq!(dec.parse("0123".as_bytes()), Ok(Success::new(1, "0".to_string())));
/// assert_eq!(dec.parse("x".as_bytes()), Err(Failure::new(0, ["integer"])));
///
/// let hex = text::int::<[u8]>(16);
/// assert_eq!(hex.parse("ff".as_bytes()), Ok(Success::new(2, "ff".to_string())));
/// ```
pub fn int<'a, I: Input + ?Sized>(radix: u32) -> impl Parser<'a, I, Output = String> + Clone + Send + Sync {
    satisfy(move |c: char| c.is_digit(radix) && c != '0')
        .then(take_while(move |c: char| c.is_digit(radix)))
        .ignored()
        .or(literal("0").ignored())
        .recognize()
        .labelled("integer")
}

/// A parser that accepts an identifier, yielding its text.
///
/// An identifier is a code point with the Unicode `XID_Start` property (or an underscore) followed by any number of
/// code points with the `XID_Continue` property.
///
/// # Examples
///
/// ```
/// # use parsnip::prelude::*;
/// let input: Vec<char> = "größe = 1".chars().collect();
/// let ident = text::ident::<[char]>();
///
/// assert_eq!(ident.parse(&input), Ok(Success::new(5, "größe".to_string())));
/// assert_eq!(ident.parse(&input[5..]), Err(Failure::new(0, ["identifier"])));
/// ```
pub fn ident<'a, I: Input + ?Sized>() -> impl Parser<'a, I, Output = String> + Clone + Send + Sync {
    satisfy(is_ident_start as fn(char) -> bool)
        .then(take_while(is_ident_continue as fn(char) -> bool))
        .recognize()
        .labelled("identifier")
}

/// A parser that accepts the given keyword, as long as it is not merely the prefix of a longer identifier.
///
/// # Examples
///
/// ```
/// # use parsnip::prelude::*;
/// let def = text::keyword::<[u8]>("def");
///
/// assert_eq!(def.parse("def f".as_bytes()), Ok(Success::new(3, ())));
/// assert_eq!(def.parse("define".as_bytes()), Err(Failure::new(0, ["def"])));
/// ```
pub fn keyword<'a, I: Input + ?Sized>(
    keyword: &'static str,
) -> impl Parser<'a, I, Output = ()> + Clone + Send + Sync {
    ident()
        .filter(move |s: &String| s.as_str() == keyword, [keyword])
        .ignored()
}

/// See [`Parser::padded`].
#[derive(Copy, Clone)]
pub struct Padded<A> {
    pub(crate) parser: A,
}

impl<'a, I, A> Parser<'a, I> for Padded<A>
where
    I: Input + ?Sized,
    A: Parser<'a, I>,
{
    type Output = A::Output;

    #[inline]
    fn parse_at(&self, input: &'a I, offset: usize) -> ParseResult<A::Output> {
        let inner = self.parser.parse_at(input, skip_whitespace(input, offset))?;
        Ok(Success::new(
            skip_whitespace(input, inner.offset),
            inner.value,
        ))
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use test_case::test_case;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn whitespace_never_fails() {
        assert_eq!(text::whitespace().parse(" \t\n x".as_bytes()), Ok(Success::new(4, ())));
        assert_eq!(text::whitespace().parse("x".as_bytes()), Ok(Success::new(0, ())));
        assert_eq!(text::inline_whitespace().parse(" \t\n x".as_bytes()), Ok(Success::new(2, ())));
    }

    #[test_case("0", Some(1) ; "zero")]
    #[test_case("42", Some(2) ; "plain")]
    #[test_case("007", Some(1) ; "leading zeroes")]
    #[test_case("", None ; "empty")]
    #[test_case("-1", None ; "sign")]
    fn int_consumes(s: &str, end: Option<usize>) {
        let input = chars(s);
        let int = text::int::<[char]>(10);
        assert_eq!(int.parse(&input).ok().map(|s| s.offset), end);
    }

    #[test]
    fn digits_need_one() {
        let bin = text::digits::<[u8]>(2);
        assert_eq!(bin.parse("1102".as_bytes()), Ok(Success::new(3, ())));
        assert_eq!(bin.parse("2".as_bytes()), Err(Failure::new(0, ["digit"])));
    }

    #[test]
    fn ident_allows_underscores_and_unicode() {
        let ident = text::ident::<[u8]>();
        assert_eq!(ident.parse("_x1 ".as_bytes()), Ok(Success::new(3, "_x1".to_string())));
        assert_eq!(ident.parse("λx".as_bytes()), Ok(Success::new(3, "λx".to_string())));
        assert_eq!(ident.parse("1x".as_bytes()), Err(Failure::new(0, ["identifier"])));
    }

    #[test]
    fn padded_skips_both_sides() {
        let item = literal("x").padded();
        assert_eq!(item.parse("  x \n y".as_bytes()), Ok(Success::new(6, "x")));
        assert_eq!(item.parse("  y".as_bytes()), Err(Failure::new(2, ["x"])));
    }
}
