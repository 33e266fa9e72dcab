#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

mod blanket;
pub mod combinator;
pub mod debug;
pub mod error;
pub mod incremental;
pub mod input;
pub mod primitive;
pub mod recursive;
pub mod text;
pub mod utf8;

pub use crate::{
    error::{Expected, Failure},
    input::Input,
};

/// Commonly used functions, traits and types.
pub mod prelude {
    pub use super::{
        combinator::{delimited, followed, not, preceded},
        error::{Expected, Failure},
        incremental::{lift, IncrementalParser, Step},
        input::Input,
        primitive::{
            any, choice, custom, dispatch, empty, end, literal, range, satisfy, skip, start,
            take_while, take_while1,
        },
        recursive::{recursive, Recursive},
        text, Boxed, ParseResult, Parser, Success,
    };
}

use std::{
    borrow::Cow,
    cmp::Ordering,
    collections::VecDeque,
    fmt,
    marker::PhantomData,
    ops::{Range, RangeInclusive},
    panic::Location,
    rc::Rc,
    sync::{Arc, OnceLock, Weak},
};

use hashbrown::HashMap;

use self::{combinator::*, error::expected_list, primitive::*, text::Padded};

/// A successful parse.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Success<T> {
    /// The offset immediately after the consumed input.
    pub offset: usize,
    /// The value produced by the parser.
    pub value: T,
}

impl<T> Success<T> {
    /// Create a new successful outcome.
    pub fn new(offset: usize, value: T) -> Self {
        Self { offset, value }
    }

    /// Map the value, keeping the offset.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Success<U> {
        Success {
            offset: self.offset,
            value: f(self.value),
        }
    }
}

/// The outcome of invoking a parser: either a [`Success`] or a [`Failure`].
pub type ParseResult<T> = Result<Success<T>, Failure>;

/// A trait implemented by parsers.
///
/// A parser is a pure function from an input and a starting offset to a [`ParseResult`]. It keeps no state between
/// invocations: the same input and offset always produce the same outcome, so a parser may be invoked any number of
/// times, from any number of threads.
///
/// Parsers are built by composing the [primitives](crate::primitive) through the methods of this trait. Building a
/// parser does no work; parsing only happens when [`Parser::parse_at`] (or [`Parser::parse`]) is invoked.
///
/// # Examples
///
/// ```
/// # use parsnip::prelude::*;
/// let input: Vec<char> = "zzazz".chars().collect();
/// let zaz = literal("zaz");
///
/// assert_eq!(zaz.parse_at(input.as_slice(), 1), Ok(Success::new(4, "zaz")));
/// assert_eq!(zaz.parse_at(input.as_slice(), 0), Err(Failure::new(0, ["zaz"])));
///
/// // A parser is tied to one input representation, but the same expression builds one for the other
/// assert_eq!(literal("zaz").parse_at("zzazz".as_bytes(), 1), Ok(Success::new(4, "zaz")));
/// ```
pub trait Parser<'a, I: Input + ?Sized> {
    /// The type of value this parser produces on success.
    type Output;

    /// Parse the input, starting at the given offset.
    fn parse_at(&self, input: &'a I, offset: usize) -> ParseResult<Self::Output>;

    /// Parse the input from its beginning.
    ///
    /// Note that this does not require the whole input to be consumed. See [`Parser::complete`] for that.
    fn parse(&self, input: &'a I) -> ParseResult<Self::Output>
    where
        Self: Sized,
    {
        self.parse_at(input, 0)
    }

    /// Map the output of this parser to another value.
    ///
    /// # Examples
    ///
    /// ```
    /// # use parsnip::prelude::*;
    /// let len = literal("abc").map(|s: &str| s.len());
    /// assert_eq!(len.parse("abc".as_bytes()), Ok(Success::new(3, 3)));
    /// ```
    fn map<O, F: Fn(Self::Output) -> O>(self, f: F) -> Map<Self, F>
    where
        Self: Sized,
    {
        Map {
            parser: self,
            mapper: f,
        }
    }

    /// Transform all outputs of this parser to a predetermined value.
    fn to<O: Clone>(self, to: O) -> To<Self, O>
    where
        Self: Sized,
    {
        To { parser: self, to }
    }

    /// Ignore the output of this parser, yielding `()` instead.
    ///
    /// This is useful for dropping uninteresting matches (punctuation, whitespace) from sequences.
    #[doc(alias = "consume")]
    fn ignored(self) -> Ignored<Self>
    where
        Self: Sized,
    {
        Ignored { parser: self }
    }

    /// Re-validate the output of this parser.
    ///
    /// If the predicate rejects the output, the parse fails *at the starting offset* with the given expected list,
    /// discarding whatever input the inner parser consumed. Use [`Filter::fatal`] to make the rejection fatal.
    ///
    /// # Examples
    ///
    /// ```
    /// # use parsnip::prelude::*;
    /// let even = text::int(10)
    ///     .filter(|s: &String| s.parse::<u64>().map_or(false, |n| n % 2 == 0), ["even number"]);
    ///
    /// assert_eq!(even.parse("42".as_bytes()), Ok(Success::new(2, "42".to_string())));
    /// assert_eq!(even.parse("41".as_bytes()), Err(Failure::new(0, ["even number"])));
    /// ```
    fn filter<F, E, S>(self, f: F, expected: E) -> Filter<Self, F>
    where
        Self: Sized,
        F: Fn(&Self::Output) -> bool,
        E: IntoIterator<Item = S>,
        S: Into<Expected>,
    {
        Filter {
            parser: self,
            filter: f,
            expected: expected_list(expected),
            fatal: false,
        }
    }

    /// Describe the pattern parsed by this parser for more useful error messages.
    ///
    /// A recoverable failure reported at the offset this parser started from has its expected list replaced by the
    /// label. Failures deeper in the input, and fatal failures, are left alone.
    fn labelled<L: Into<Expected>>(self, label: L) -> Labelled<Self>
    where
        Self: Sized,
    {
        Labelled {
            parser: self,
            label: label.into(),
        }
    }

    /// Parse one thing and then another thing, yielding a tuple of the two outputs.
    fn then<B: Parser<'a, I>>(self, other: B) -> Then<Self, B>
    where
        Self: Sized,
    {
        Then {
            parser_a: self,
            parser_b: other,
        }
    }

    /// Parse one thing and then another thing, combining the two outputs with the given function.
    ///
    /// # Examples
    ///
    /// ```
    /// # use parsnip::prelude::*;
    /// let sum = text::int(10)
    ///     .then_ignore(literal("+"))
    ///     .then_with(text::int(10), |a: String, b: String| {
    ///         a.parse::<u32>().unwrap() + b.parse::<u32>().unwrap()
    ///     });
    ///
    /// assert_eq!(sum.parse("12+30".as_bytes()), Ok(Success::new(5, 42)));
    /// ```
    fn then_with<B, O, F>(self, other: B, join: F) -> ThenWith<Self, B, F>
    where
        Self: Sized,
        B: Parser<'a, I>,
        F: Fn(Self::Output, B::Output) -> O,
    {
        ThenWith {
            parser_a: self,
            parser_b: other,
            join,
        }
    }

    /// Parse one thing and then another thing, yielding only the output of the latter.
    ///
    /// See also [`preceded`](crate::combinator::preceded).
    fn ignore_then<B: Parser<'a, I>>(self, other: B) -> IgnoreThen<Self, B>
    where
        Self: Sized,
    {
        IgnoreThen {
            parser_a: self,
            parser_b: other,
        }
    }

    /// Parse one thing and then another thing, yielding only the output of the former.
    ///
    /// See also [`followed`](crate::combinator::followed).
    fn then_ignore<B: Parser<'a, I>>(self, other: B) -> ThenIgnore<Self, B>
    where
        Self: Sized,
    {
        ThenIgnore {
            parser_a: self,
            parser_b: other,
        }
    }

    /// Parse the pattern surrounded by the given delimiters, yielding the output of the pattern.
    ///
    /// See [`delimited`](crate::combinator::delimited) for a variant that commits after the opening delimiter.
    fn delimited_by<B, C>(self, open: B, close: C) -> Delimited<B, Self, C>
    where
        Self: Sized,
        B: Parser<'a, I>,
        C: Parser<'a, I>,
    {
        delimited(open, self, close)
    }

    /// Parse the pattern, skipping any whitespace on either side of it.
    fn padded(self) -> Padded<Self>
    where
        Self: Sized,
    {
        Padded { parser: self }
    }

    /// Parse one thing or, on failure, another thing.
    ///
    /// This is [`choice`] with two alternatives, and follows the same rules for reporting failures.
    ///
    /// # Examples
    ///
    /// ```
    /// # use parsnip::prelude::*;
    /// let op = literal("+").or(literal("-"));
    ///
    /// assert_eq!(op.parse("-".as_bytes()), Ok(Success::new(1, "-")));
    /// assert_eq!(op.parse("*".as_bytes()), Err(Failure::new(0, ["+", "-"])));
    /// ```
    fn or<B: Parser<'a, I, Output = Self::Output>>(self, other: B) -> Choice<(Self, B)>
    where
        Self: Sized,
    {
        choice((self, other))
    }

    /// Attempt to parse something, but only if it exists.
    ///
    /// A recoverable failure becomes a successful `None` at the starting offset. A fatal failure is returned as-is.
    #[doc(alias = "optional")]
    fn or_not(self) -> OrNot<Self>
    where
        Self: Sized,
    {
        OrNot { parser: self }
    }

    /// Parse a pattern any number of times (including zero times), collecting the outputs.
    ///
    /// Repetition ends at the first recoverable failure. A fatal failure is returned immediately. An iteration that
    /// succeeds without consuming input is recorded and then ends the repetition, so this never loops forever.
    ///
    /// # Examples
    ///
    /// ```
    /// # use parsnip::prelude::*;
    /// let a = literal("a");
    ///
    /// assert_eq!(a.clone().star().parse("aab".as_bytes()), Ok(Success::new(2, vec!["a", "a"])));
    /// assert_eq!(a.peek().star().parse("a".as_bytes()), Ok(Success::new(0, vec!["a"])));
    /// ```
    #[doc(alias = "repeated")]
    fn star(self) -> Star<Self>
    where
        Self: Sized,
    {
        Star { parser: self }
    }

    /// Like [`Parser::star`], but discards the outputs and keeps only the consumed span.
    fn star_consumed(self) -> StarConsumed<Self>
    where
        Self: Sized,
    {
        StarConsumed { parser: self }
    }

    /// Parse a pattern one or more times, collecting the outputs.
    ///
    /// The first occurrence is required; its failure is returned unchanged. Further occurrences follow the rules of
    /// [`Parser::star`].
    fn plus(self) -> Plus<Self>
    where
        Self: Sized,
    {
        Plus { parser: self }
    }

    /// Like [`Parser::plus`], but discards the outputs and keeps only the consumed span.
    fn plus_consumed(self) -> PlusConsumed<Self>
    where
        Self: Sized,
    {
        PlusConsumed { parser: self }
    }

    /// Remove the `None` entries from a parser producing a `Vec<Option<T>>`.
    ///
    /// This allows value-producing and value-discarding alternatives to share a single repetition.
    ///
    /// # Examples
    ///
    /// ```
    /// # use parsnip::prelude::*;
    /// let words = text::ident()
    ///     .map(Some)
    ///     .or(literal(" ").to(None))
    ///     .star()
    ///     .filter_none();
    ///
    /// assert_eq!(
    ///     words.parse("ab  cd".as_bytes()),
    ///     Ok(Success::new(6, vec!["ab".to_string(), "cd".to_string()])),
    /// );
    /// ```
    #[doc(alias = "filter_undefined")]
    fn filter_none<T>(self) -> FilterNone<Self>
    where
        Self: Parser<'a, I, Output = Vec<Option<T>>> + Sized,
    {
        FilterNone { parser: self }
    }

    /// Discard the output of this parser and instead yield the text it consumed.
    ///
    /// For byte input the text is rebuilt by decoding the consumed span one code point at a time.
    fn recognize(self) -> Recognize<Self>
    where
        Self: Sized,
    {
        Recognize { parser: self }
    }

    /// Discard the output of this parser and instead yield a borrowed slice of the input it consumed.
    fn slice(self) -> Slice<Self>
    where
        Self: Sized,
    {
        Slice { parser: self }
    }

    /// Parse a pattern without consuming any input.
    ///
    /// On success the output is kept and the offset is reset to where this parser started.
    #[doc(alias = "rewind")]
    fn peek(self) -> Peek<Self>
    where
        Self: Sized,
    {
        Peek { parser: self }
    }

    /// Succeed, consuming nothing, only if this parser fails. See [`not`](crate::combinator::not).
    fn not<E, S>(self, expected: E) -> Not<Self>
    where
        Self: Sized,
        E: IntoIterator<Item = S>,
        S: Into<Expected>,
    {
        not(self, expected)
    }

    /// Parse this pattern, but only where `excluded` does not match.
    ///
    /// # Examples
    ///
    /// ```
    /// # use parsnip::prelude::*;
    /// let name = text::ident().except(text::keyword("let"), ["name"]);
    ///
    /// assert_eq!(name.parse("lettuce".as_bytes()), Ok(Success::new(7, "lettuce".to_string())));
    /// assert_eq!(name.parse("let".as_bytes()), Err(Failure::new(0, ["name"])));
    /// ```
    fn except<B, E, S>(self, excluded: B, expected: E) -> Except<Self, B>
    where
        Self: Sized,
        B: Parser<'a, I>,
        E: IntoIterator<Item = S>,
        S: Into<Expected>,
    {
        preceded(not(excluded, expected), self)
    }

    /// Commit to this parser: any failure it reports becomes fatal.
    ///
    /// A fatal failure stops every enclosing [`choice`], [`Parser::or_not`] and [`Parser::star`] from trying
    /// anything else, so the specific, deep failure is reported instead of a generic one at the start of the choice.
    ///
    /// # Examples
    ///
    /// ```
    /// # use parsnip::prelude::*;
    /// let call = literal("f(").ignore_then(literal("x").cut()).then_ignore(literal(")"));
    /// let any_call = call.or(literal("f(y)"));
    ///
    /// // The second alternative would match, but the first one has committed.
    /// assert_eq!(any_call.parse("f(y)".as_bytes()), Err(Failure::new(2, ["x"]).into_fatal()));
    /// ```
    fn cut(self) -> Cut<Self>
    where
        Self: Sized,
    {
        Cut { parser: self }
    }

    /// Require this parser to consume the whole input.
    fn complete(self) -> Complete<Self, I>
    where
        Self: Sized,
    {
        followed(self, end())
    }

    /// Emit a [`tracing`] event for every invocation of this parser.
    ///
    /// Events are emitted at `TRACE` level on entry and success and at `DEBUG` level on failure, and carry the label,
    /// the offsets involved and the source location this method was called from.
    #[track_caller]
    fn debug<L: Into<Cow<'static, str>>>(self, label: L) -> debug::Debug<Self>
    where
        Self: Sized,
    {
        debug::Debug {
            parser: self,
            label: label.into(),
            location: *Location::caller(),
        }
    }

    /// Box the parser, yielding a parser that performs parsing through dynamic dispatch.
    ///
    /// Boxing is required to store parsers of different types side by side, as in a [`dispatch`] table. The box is
    /// reference counted, so cloning it is cheap.
    fn boxed(self) -> Boxed<'a, I, Self::Output>
    where
        Self: Sized + Send + Sync + 'a,
    {
        Boxed {
            inner: Arc::new(self),
        }
    }

    /// Turn this parser into an [incremental parser](crate::incremental) that yields its output as a single item.
    fn incremental(self) -> incremental::Lift<Self>
    where
        Self: Sized,
    {
        incremental::lift(self)
    }
}

/// See [`Parser::boxed`].
pub struct Boxed<'a, I: Input + ?Sized, O> {
    inner: Arc<dyn Parser<'a, I, Output = O> + Send + Sync + 'a>,
}

impl<'a, I: Input + ?Sized, O> Clone for Boxed<'a, I, O> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, I: Input + ?Sized, O> Parser<'a, I> for Boxed<'a, I, O> {
    type Output = O;

    #[inline]
    fn parse_at(&self, input: &'a I, offset: usize) -> ParseResult<O> {
        self.inner.parse_at(input, offset)
    }

    fn boxed(self) -> Boxed<'a, I, O>
    where
        Self: Sized + Send + Sync + 'a,
    {
        self
    }
}
