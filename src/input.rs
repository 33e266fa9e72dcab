//! The input representations parsers operate on.
//!
//! *“What’s up?” “I don’t know,” said Marvin, “I’ve never been there.”*
//!
//! Two representations are supported side by side:
//!
//! - `[char]`: text indexed by code point. Every code point is one offset unit wide.
//! - `[u8]`: UTF-8 bytes indexed by byte. Code points are decoded on demand (see [`crate::utf8`]) and are 1 to 4
//!   offset units wide.
//!
//! Every primitive is written against [`Input`], so a grammar behaves identically on both representations for
//! equivalent inputs. Only the offsets differ.

use super::*;

/// A sequence that parsers can inspect by offset.
pub trait Input: 'static {
    /// The borrowed form of a contiguous part of the input.
    type Slice: ?Sized;

    /// The offset one past the last unit of the input.
    fn len(&self) -> usize;

    /// Returns true if the input has no units at all.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decode the code point at `offset`, together with the number of offset units it occupies.
    ///
    /// Yields `None` at or beyond the end of the input, or where no code point can be decoded.
    fn char_at(&self, offset: usize) -> Option<(char, usize)>;

    /// If the input at `offset` begins with `token`, yields the number of offset units it occupies.
    fn match_literal(&self, offset: usize, token: &str) -> Option<usize>;

    /// Borrow the units in the given range.
    fn slice(&self, range: Range<usize>) -> &Self::Slice;

    /// Reconstruct the text in the given range.
    fn text(&self, range: Range<usize>) -> String;
}

impl Input for [char] {
    type Slice = [char];

    #[inline]
    fn len(&self) -> usize {
        <[char]>::len(self)
    }

    #[inline]
    fn char_at(&self, offset: usize) -> Option<(char, usize)> {
        self.get(offset).map(|c| (*c, 1))
    }

    fn match_literal(&self, offset: usize, token: &str) -> Option<usize> {
        if offset > <[char]>::len(self) {
            return None;
        }
        let mut end = offset;
        for expected in token.chars() {
            if self.get(end) != Some(&expected) {
                return None;
            }
            end += 1;
        }
        Some(end - offset)
    }

    #[inline]
    fn slice(&self, range: Range<usize>) -> &Self::Slice {
        &self[range]
    }

    fn text(&self, range: Range<usize>) -> String {
        self[range].iter().collect()
    }
}

/// # Panics
///
/// Decoding panics when it meets a byte that cannot begin a UTF-8 sequence. Such input is outside the domain of every
/// parser and is not reported as a [`Failure`].
impl Input for [u8] {
    type Slice = [u8];

    #[inline]
    fn len(&self) -> usize {
        <[u8]>::len(self)
    }

    #[inline]
    fn char_at(&self, offset: usize) -> Option<(char, usize)> {
        utf8::decode_or_panic(self, offset)
    }

    fn match_literal(&self, offset: usize, token: &str) -> Option<usize> {
        let token = token.as_bytes();
        self.get(offset..)
            .filter(|rest| rest.starts_with(token))
            .map(|_| token.len())
    }

    #[inline]
    fn slice(&self, range: Range<usize>) -> &Self::Slice {
        &self[range]
    }

    fn text(&self, range: Range<usize>) -> String {
        utf8::decode_span(self, range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn char_widths() {
        let text = chars("a€🦀");
        assert_eq!(text.as_slice().char_at(2), Some(('🦀', 1)));
        assert_eq!(text.as_slice().char_at(3), None);

        let bytes = "a€🦀".as_bytes();
        assert_eq!(bytes.char_at(1), Some(('€', 3)));
        assert_eq!(bytes.char_at(4), Some(('🦀', 4)));
        assert_eq!(bytes.char_at(8), None);
        assert_eq!(bytes.char_at(100), None);
    }

    #[test]
    fn literal_widths() {
        let text = chars("x€uro");
        assert_eq!(text.as_slice().match_literal(1, "€u"), Some(2));
        assert_eq!(text.as_slice().match_literal(1, "€x"), None);
        assert_eq!(text.as_slice().match_literal(4, "ox"), None);
        assert_eq!(text.as_slice().match_literal(5, ""), Some(0));
        assert_eq!(text.as_slice().match_literal(9, ""), None);

        let bytes = "x€uro".as_bytes();
        assert_eq!(bytes.match_literal(1, "€u"), Some(4));
        assert_eq!(bytes.match_literal(6, "ox"), None);
        assert_eq!(bytes.match_literal(9, ""), None);
    }

    #[test]
    fn text_of_range() {
        let text = chars("a€🦀b");
        assert_eq!(text.as_slice().text(1..3), "€🦀");

        let bytes = "a€🦀b".as_bytes();
        assert_eq!(bytes.text(1..8), "€🦀");
    }
}
