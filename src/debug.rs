//! Utilities for debugging parsers.
//!
//! *“He was staring at the instruments with the air of one who is trying to convert Fahrenheit to centigrade in his
//! head while his house is burning down.”*
//!
//! [`Parser::debug`] wraps a parser so that every invocation is reported through [`tracing`]. Nothing is printed unless
//! the application installs a subscriber, so debug wrappers can stay in place at no cost beyond the disabled-event
//! check.

use super::*;

use tracing::{debug, trace};

/// See [`Parser::debug`].
#[derive(Clone)]
pub struct Debug<A> {
    pub(crate) parser: A,
    pub(crate) label: Cow<'static, str>,
    pub(crate) location: Location<'static>,
}

impl<A> Debug<A> {
    /// The label given to this parser.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Where in the source code this parser was labelled.
    pub fn location(&self) -> Location<'static> {
        self.location
    }
}

impl<'a, I, A> Parser<'a, I> for Debug<A>
where
    I: Input + ?Sized,
    A: Parser<'a, I>,
{
    type Output = A::Output;

    fn parse_at(&self, input: &'a I, offset: usize) -> ParseResult<A::Output> {
        let label = &*self.label;
        trace!(label, offset, at = %self.location, "enter");

        let result = self.parser.parse_at(input, offset);
        match &result {
            Ok(success) => trace!(label, offset, end = success.offset, "matched"),
            Err(failure) => debug!(
                label,
                offset,
                failed_at = failure.offset,
                expected = ?failure.expected,
                fatal = failure.fatal,
                at = %self.location,
                "failed"
            ),
        }
        result
    }
}
