mod common;

use common::{char_offset, chars};
use parsnip::prelude::*;
use proptest::prelude::*;

fn assorted<'a>() -> Vec<Boxed<'a, [u8], ()>> {
    vec![
        literal("ab").ignored().boxed(),
        text::ident().ignored().boxed(),
        text::whitespace().boxed(),
        literal("a").or(literal("b")).star().ignored().boxed(),
        literal("a").peek().star().ignored().boxed(),
        text::int(10).padded().plus().ignored().boxed(),
        delimited(literal("("), text::digits(10), literal(")")).cut_after_open().boxed(),
        parsnip::primitive::any().except(literal("x"), ["not x"]).plus_consumed().boxed(),
        skip(2).boxed(),
        end().boxed(),
    ]
}

proptest! {
    #[test]
    fn parsers_never_move_backward(s in "[ab()x0-9 ]{0,12}", offset in 0usize..13) {
        let offset = offset.min(s.len());
        for parser in assorted() {
            match parser.parse_at(s.as_bytes(), offset) {
                Ok(success) => {
                    prop_assert!(success.offset >= offset);
                    prop_assert!(success.offset <= s.len());
                }
                Err(failure) => {
                    prop_assert!(failure.offset >= offset);
                    prop_assert!(failure.offset <= s.len());
                }
            }
        }
    }

    #[test]
    fn peek_is_zero_width(s in "[ab ]{0,8}") {
        let ahead = text::ident().peek().parse(s.as_bytes());
        let really = text::ident().parse(s.as_bytes());

        prop_assert_eq!(ahead.clone().map(|a| a.offset), really.clone().map(|_| 0));
        prop_assert_eq!(ahead.map(|a| a.value), really.map(|r| r.value));
    }

    #[test]
    fn tied_alternatives_concatenate(s in "[cd]{0,3}") {
        let result = choice((literal("a"), literal("b"))).parse(s.as_bytes());
        prop_assert_eq!(result, Err(Failure::new(0, ["a", "b"])));
    }

    #[test]
    fn complete_consumes_everything(s in "[a ]{0,10}") {
        if let Ok(success) = literal("a").padded().star().complete().parse(s.as_bytes()) {
            prop_assert_eq!(success.offset, s.len());
        }
    }

    #[test]
    fn text_and_bytes_agree(s in "\\PC{0,12}") {
        let text = chars(&s);
        let by_char = text::ident::<[char]>().padded().star().parse(text.as_slice());
        let by_byte = text::ident::<[u8]>().padded().star().parse(s.as_bytes());

        prop_assert_eq!(
            by_byte.map(|b| Success::new(char_offset(&s, b.offset), b.value)),
            by_char,
        );
    }
}
