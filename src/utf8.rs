//! On-the-fly UTF-8 decoding for byte input.
//!
//! Byte input is never validated up front. Instead, every primitive that needs a code point decodes exactly one from
//! the bytes at its offset. A sequence that stops short (missing or malformed continuation bytes) decodes to no code
//! point at all, which primitives treat exactly like the end of the input. A byte that cannot begin any sequence is a
//! broken precondition rather than a parse failure and is reported as an [`InvalidLeadByte`].

use super::*;

/// A byte that matches none of the 1, 2, 3 or 4-byte leading patterns of UTF-8.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct InvalidLeadByte {
    /// The offending byte.
    pub byte: u8,
    /// Where it was found.
    pub offset: usize,
}

impl fmt::Display for InvalidLeadByte {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid UTF-8 leading byte 0x{:02x} at offset {}",
            self.byte, self.offset
        )
    }
}

impl std::error::Error for InvalidLeadByte {}

/// The number of bytes in a sequence introduced by the given leading byte, if it is one.
#[inline]
pub fn sequence_width(lead: u8) -> Option<usize> {
    match lead {
        0x00..=0x7F => Some(1),
        0xC0..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF7 => Some(4),
        _ => None,
    }
}

/// Decode the code point starting at `offset`, yielding it alongside its encoded width in bytes.
///
/// Returns `Ok(None)` at or past the end of the input and for sequences that are cut short or do not encode a
/// Unicode scalar value.
///
/// # Examples
///
/// ```
/// # use parsnip::utf8::decode;
/// let bytes = "aé€😀".as_bytes();
/// assert_eq!(decode(bytes, 0), Ok(Some(('a', 1))));
/// assert_eq!(decode(bytes, 1), Ok(Some(('é', 2))));
/// assert_eq!(decode(bytes, 3), Ok(Some(('€', 3))));
/// assert_eq!(decode(bytes, 6), Ok(Some(('😀', 4))));
/// assert_eq!(decode(bytes, 10), Ok(None));
/// assert_eq!(decode(&bytes[..2], 1), Ok(None));
/// assert!(decode(bytes, 2).is_err());
/// ```
pub fn decode(bytes: &[u8], offset: usize) -> Result<Option<(char, usize)>, InvalidLeadByte> {
    let Some(&lead) = bytes.get(offset) else {
        return Ok(None);
    };
    let width = sequence_width(lead).ok_or(InvalidLeadByte { byte: lead, offset })?;
    if width == 1 {
        return Ok(Some((lead as char, 1)));
    }

    let Some(tail) = bytes.get(offset + 1..offset + width) else {
        return Ok(None);
    };
    let lead_bits = u32::from(lead) & (0x7F >> width);
    let mut code = lead_bits;
    for &b in tail {
        if b & 0xC0 != 0x80 {
            return Ok(None);
        }
        code = (code << 6) | u32::from(b & 0x3F);
    }

    Ok(char::from_u32(code).map(|c| (c, width)))
}

/// Reconstruct the text of a byte span by walking it one code point at a time.
///
/// The span must start and end on code point boundaries, which holds for every span a built-in parser consumes. A
/// [`custom`](crate::primitive::custom) parser that advances by raw bytes can break this: in release builds the
/// walk then stops at the first position that does not decode (or runs past the end to finish the last code
/// point), so the text does not match the span.
///
/// # Panics
///
/// Panics if the span contains a byte that cannot begin a UTF-8 sequence. With debug assertions enabled, also
/// panics if the walk does not end exactly at `range.end`.
pub fn decode_span(bytes: &[u8], range: Range<usize>) -> String {
    let mut text = String::with_capacity(range.len());
    let mut offset = range.start;
    while offset < range.end {
        match decode_or_panic(bytes, offset) {
            Some((c, width)) => {
                text.push(c);
                offset += width;
            }
            None => break,
        }
    }
    debug_assert_eq!(
        offset, range.end,
        "byte span {range:?} does not end on a code point boundary",
    );
    text
}

#[inline]
pub(crate) fn decode_or_panic(bytes: &[u8], offset: usize) -> Option<(char, usize)> {
    match decode(bytes, offset) {
        Ok(decoded) => decoded,
        Err(err) => panic!("{}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_follow_leading_bits() {
        assert_eq!(sequence_width(b'a'), Some(1));
        assert_eq!(sequence_width(0xC3), Some(2));
        assert_eq!(sequence_width(0xE2), Some(3));
        assert_eq!(sequence_width(0xF0), Some(4));
        assert_eq!(sequence_width(0x80), None);
        assert_eq!(sequence_width(0xF8), None);
        assert_eq!(sequence_width(0xFF), None);
    }

    #[test]
    fn decodes_every_width() {
        for c in ['\0', 'z', '\u{7f}', '\u{80}', 'ß', '\u{7ff}', '\u{800}', '€', '\u{ffff}', '\u{10000}', '🦀', '\u{10ffff}'] {
            let mut buf = [0; 4];
            let encoded = c.encode_utf8(&mut buf).as_bytes();
            assert_eq!(decode(encoded, 0), Ok(Some((c, c.len_utf8()))), "{:?}", c);
        }
    }

    #[test]
    fn truncated_sequence_is_no_code_point() {
        let bytes = "€".as_bytes();
        assert_eq!(decode(&bytes[..1], 0), Ok(None));
        assert_eq!(decode(&bytes[..2], 0), Ok(None));
    }

    #[test]
    fn bad_continuation_is_no_code_point() {
        assert_eq!(decode(&[0xC3, b'a'], 0), Ok(None));
        assert_eq!(decode(&[0xE2, 0x82, 0xC0], 0), Ok(None));
    }

    #[test]
    fn surrogates_are_no_code_point() {
        // 0xED 0xA0 0x80 would encode U+D800
        assert_eq!(decode(&[0xED, 0xA0, 0x80], 0), Ok(None));
    }

    #[test]
    fn invalid_lead_is_an_error() {
        assert_eq!(
            decode(&[b'a', 0x80], 1),
            Err(InvalidLeadByte { byte: 0x80, offset: 1 })
        );
        assert_eq!(
            decode(&[0xFE], 0).unwrap_err().to_string(),
            "invalid UTF-8 leading byte 0xfe at offset 0"
        );
    }

    #[test]
    fn span_round_trips_text() {
        let s = "añ€🦀b";
        assert_eq!(decode_span(s.as_bytes(), 0..s.len()), s);
        assert_eq!(decode_span(s.as_bytes(), 1..6), "ñ€");
    }

    #[test]
    #[should_panic(expected = "invalid UTF-8 leading byte")]
    fn span_panics_on_invalid_lead() {
        decode_span(&[b'a', 0xFF, b'b'], 0..3);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "does not end on a code point boundary")]
    fn span_cut_inside_a_code_point() {
        decode_span(&"a€".as_bytes()[..3], 0..3);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "does not end on a code point boundary")]
    fn span_ending_inside_a_code_point() {
        decode_span("a€".as_bytes(), 0..2);
    }
}
