//! Combinators that allow combining and extending existing parsers.
//!
//! *“Ford... you're turning into a penguin. Stop it.”*
//!
//! Although it's *sometimes* useful to be able to name their type, most of these parsers are much easier to work with
//! when accessed through their respective methods on [`Parser`].

use super::*;

/// See [`Parser::map`].
#[derive(Copy, Clone)]
pub struct Map<A, F> {
    pub(crate) parser: A,
    pub(crate) mapper: F,
}

impl<'a, I, A, F, O> Parser<'a, I> for Map<A, F>
where
    I: Input + ?Sized,
    A: Parser<'a, I>,
    F: Fn(A::Output) -> O,
{
    type Output = O;

    #[inline]
    fn parse_at(&self, input: &'a I, offset: usize) -> ParseResult<O> {
        self.parser
            .parse_at(input, offset)
            .map(|s| s.map(&self.mapper))
    }
}

/// See [`Parser::to`].
#[derive(Copy, Clone)]
pub struct To<A, O> {
    pub(crate) parser: A,
    pub(crate) to: O,
}

impl<'a, I, A, O> Parser<'a, I> for To<A, O>
where
    I: Input + ?Sized,
    A: Parser<'a, I>,
    O: Clone,
{
    type Output = O;

    #[inline]
    fn parse_at(&self, input: &'a I, offset: usize) -> ParseResult<O> {
        self.parser
            .parse_at(input, offset)
            .map(|s| Success::new(s.offset, self.to.clone()))
    }
}

/// See [`Parser::ignored`].
#[derive(Copy, Clone)]
pub struct Ignored<A> {
    pub(crate) parser: A,
}

impl<'a, I, A> Parser<'a, I> for Ignored<A>
where
    I: Input + ?Sized,
    A: Parser<'a, I>,
{
    type Output = ();

    #[inline]
    fn parse_at(&self, input: &'a I, offset: usize) -> ParseResult<()> {
        self.parser.parse_at(input, offset).map(|s| s.map(|_| ()))
    }
}

/// See [`Parser::filter`].
#[derive(Clone)]
pub struct Filter<A, F> {
    pub(crate) parser: A,
    pub(crate) filter: F,
    pub(crate) expected: Vec<Expected>,
    pub(crate) fatal: bool,
}

impl<A, F> Filter<A, F> {
    /// Make a rejection by the predicate fatal.
    pub fn fatal(self) -> Self {
        Self {
            fatal: true,
            ..self
        }
    }
}

impl<'a, I, A, F> Parser<'a, I> for Filter<A, F>
where
    I: Input + ?Sized,
    A: Parser<'a, I>,
    F: Fn(&A::Output) -> bool,
{
    type Output = A::Output;

    fn parse_at(&self, input: &'a I, offset: usize) -> ParseResult<A::Output> {
        let success = self.parser.parse_at(input, offset)?;
        if (self.filter)(&success.value) {
            Ok(success)
        } else {
            Err(Failure {
                offset,
                expected: self.expected.clone(),
                fatal: self.fatal,
            })
        }
    }
}

/// See [`Parser::labelled`].
#[derive(Clone)]
pub struct Labelled<A> {
    pub(crate) parser: A,
    pub(crate) label: Expected,
}

impl<'a, I, A> Parser<'a, I> for Labelled<A>
where
    I: Input + ?Sized,
    A: Parser<'a, I>,
{
    type Output = A::Output;

    fn parse_at(&self, input: &'a I, offset: usize) -> ParseResult<A::Output> {
        self.parser.parse_at(input, offset).map_err(|failure| {
            if !failure.fatal && failure.offset == offset {
                Failure {
                    expected: vec![self.label.clone()],
                    ..failure
                }
            } else {
                failure
            }
        })
    }
}

/// See [`Parser::then`].
#[derive(Copy, Clone)]
pub struct Then<A, B> {
    pub(crate) parser_a: A,
    pub(crate) parser_b: B,
}

impl<'a, I, A, B> Parser<'a, I> for Then<A, B>
where
    I: Input + ?Sized,
    A: Parser<'a, I>,
    B: Parser<'a, I>,
{
    type Output = (A::Output, B::Output);

    #[inline]
    fn parse_at(&self, input: &'a I, offset: usize) -> ParseResult<Self::Output> {
        let a = self.parser_a.parse_at(input, offset)?;
        let b = self.parser_b.parse_at(input, a.offset)?;
        Ok(Success::new(b.offset, (a.value, b.value)))
    }
}

/// See [`Parser::then_with`].
#[derive(Copy, Clone)]
pub struct ThenWith<A, B, F> {
    pub(crate) parser_a: A,
    pub(crate) parser_b: B,
    pub(crate) join: F,
}

impl<'a, I, A, B, F, O> Parser<'a, I> for ThenWith<A, B, F>
where
    I: Input + ?Sized,
    A: Parser<'a, I>,
    B: Parser<'a, I>,
    F: Fn(A::Output, B::Output) -> O,
{
    type Output = O;

    #[inline]
    fn parse_at(&self, input: &'a I, offset: usize) -> ParseResult<O> {
        let a = self.parser_a.parse_at(input, offset)?;
        let b = self.parser_b.parse_at(input, a.offset)?;
        Ok(Success::new(b.offset, (self.join)(a.value, b.value)))
    }
}

/// See [`Parser::ignore_then`].
#[derive(Copy, Clone)]
pub struct IgnoreThen<A, B> {
    pub(crate) parser_a: A,
    pub(crate) parser_b: B,
}

impl<'a, I, A, B> Parser<'a, I> for IgnoreThen<A, B>
where
    I: Input + ?Sized,
    A: Parser<'a, I>,
    B: Parser<'a, I>,
{
    type Output = B::Output;

    #[inline]
    fn parse_at(&self, input: &'a I, offset: usize) -> ParseResult<B::Output> {
        let a = self.parser_a.parse_at(input, offset)?;
        self.parser_b.parse_at(input, a.offset)
    }
}

/// See [`Parser::then_ignore`].
#[derive(Copy, Clone)]
pub struct ThenIgnore<A, B> {
    pub(crate) parser_a: A,
    pub(crate) parser_b: B,
}

impl<'a, I, A, B> Parser<'a, I> for ThenIgnore<A, B>
where
    I: Input + ?Sized,
    A: Parser<'a, I>,
    B: Parser<'a, I>,
{
    type Output = A::Output;

    #[inline]
    fn parse_at(&self, input: &'a I, offset: usize) -> ParseResult<A::Output> {
        let a = self.parser_a.parse_at(input, offset)?;
        let b = self.parser_b.parse_at(input, a.offset)?;
        Ok(Success::new(b.offset, a.value))
    }
}

/// Parse `before`, then `parser`, yielding only the output of `parser`.
pub fn preceded<B, A>(before: B, parser: A) -> IgnoreThen<B, A> {
    IgnoreThen {
        parser_a: before,
        parser_b: parser,
    }
}

/// Parse `parser`, then `after`, yielding only the output of `parser`.
pub fn followed<A, B>(parser: A, after: B) -> ThenIgnore<A, B> {
    ThenIgnore {
        parser_a: parser,
        parser_b: after,
    }
}

/// See [`delimited`] and [`Parser::delimited_by`].
#[derive(Copy, Clone)]
pub struct Delimited<B, A, C> {
    pub(crate) open: B,
    pub(crate) parser: A,
    pub(crate) close: C,
    pub(crate) cut: bool,
}

impl<B, A, C> Delimited<B, A, C> {
    /// Commit to this parser once the opening delimiter has matched: any failure of the inner pattern or of the
    /// closing delimiter becomes fatal.
    pub fn cut_after_open(self) -> Self {
        Self { cut: true, ..self }
    }
}

impl<'a, I, B, A, C> Parser<'a, I> for Delimited<B, A, C>
where
    I: Input + ?Sized,
    B: Parser<'a, I>,
    A: Parser<'a, I>,
    C: Parser<'a, I>,
{
    type Output = A::Output;

    fn parse_at(&self, input: &'a I, offset: usize) -> ParseResult<A::Output> {
        let open = self.open.parse_at(input, offset)?;
        let commit = |failure: Failure| {
            if self.cut {
                failure.into_fatal()
            } else {
                failure
            }
        };
        let inner = self.parser.parse_at(input, open.offset).map_err(commit)?;
        let close = self.close.parse_at(input, inner.offset).map_err(commit)?;
        Ok(Success::new(close.offset, inner.value))
    }
}

/// Parse `open`, then `parser`, then `close`, yielding only the output of `parser`.
///
/// # Examples
///
/// ```
/// # use parsnip::prelude::*;
/// let parens = delimited(literal("("), literal("a"), literal(")")).cut_after_open();
///
/// assert_eq!(parens.parse("(a)".as_bytes()), Ok(Success::new(3, "a")));
/// assert_eq!(parens.parse("[a]".as_bytes()), Err(Failure::new(0, ["("])));
/// assert_eq!(parens.parse("(b)".as_bytes()), Err(Failure::new(1, ["a"]).into_fatal()));
/// ```
pub fn delimited<B, A, C>(open: B, parser: A, close: C) -> Delimited<B, A, C> {
    Delimited {
        open,
        parser,
        close,
        cut: false,
    }
}

/// See [`Parser::or_not`].
#[derive(Copy, Clone)]
pub struct OrNot<A> {
    pub(crate) parser: A,
}

impl<'a, I, A> Parser<'a, I> for OrNot<A>
where
    I: Input + ?Sized,
    A: Parser<'a, I>,
{
    type Output = Option<A::Output>;

    #[inline]
    fn parse_at(&self, input: &'a I, offset: usize) -> ParseResult<Self::Output> {
        match self.parser.parse_at(input, offset) {
            Ok(s) => Ok(s.map(Some)),
            Err(failure) if failure.fatal => Err(failure),
            Err(_) => Ok(Success::new(offset, None)),
        }
    }
}

/// Drive a repetition from `offset`, handing each output to `each`.
///
/// Yields the offset the repetition ended at. A recoverable failure ends the repetition where the failing iteration
/// started, a fatal one is returned as-is, and a success that does not advance ends it right after being recorded.
#[inline]
fn repeat<'a, I, A, F>(parser: &A, input: &'a I, mut offset: usize, mut each: F) -> Result<usize, Failure>
where
    I: Input + ?Sized,
    A: Parser<'a, I>,
    F: FnMut(A::Output),
{
    loop {
        match parser.parse_at(input, offset) {
            Ok(s) => {
                each(s.value);
                if s.offset <= offset {
                    return Ok(offset);
                }
                offset = s.offset;
            }
            Err(failure) if failure.fatal => return Err(failure),
            Err(_) => return Ok(offset),
        }
    }
}

/// See [`Parser::star`].
#[derive(Copy, Clone)]
pub struct Star<A> {
    pub(crate) parser: A,
}

impl<'a, I, A> Parser<'a, I> for Star<A>
where
    I: Input + ?Sized,
    A: Parser<'a, I>,
{
    type Output = Vec<A::Output>;

    fn parse_at(&self, input: &'a I, offset: usize) -> ParseResult<Self::Output> {
        let mut values = Vec::new();
        let end = repeat(&self.parser, input, offset, |value| values.push(value))?;
        Ok(Success::new(end, values))
    }
}

/// See [`Parser::star_consumed`].
#[derive(Copy, Clone)]
pub struct StarConsumed<A> {
    pub(crate) parser: A,
}

impl<'a, I, A> Parser<'a, I> for StarConsumed<A>
where
    I: Input + ?Sized,
    A: Parser<'a, I>,
{
    type Output = ();

    fn parse_at(&self, input: &'a I, offset: usize) -> ParseResult<()> {
        let end = repeat(&self.parser, input, offset, drop)?;
        Ok(Success::new(end, ()))
    }
}

/// See [`Parser::plus`].
#[derive(Copy, Clone)]
pub struct Plus<A> {
    pub(crate) parser: A,
}

impl<'a, I, A> Parser<'a, I> for Plus<A>
where
    I: Input + ?Sized,
    A: Parser<'a, I>,
{
    type Output = Vec<A::Output>;

    fn parse_at(&self, input: &'a I, offset: usize) -> ParseResult<Self::Output> {
        let first = self.parser.parse_at(input, offset)?;
        let mut values = vec![first.value];
        let end = repeat(&self.parser, input, first.offset, |value| {
            values.push(value)
        })?;
        Ok(Success::new(end, values))
    }
}

/// See [`Parser::plus_consumed`].
#[derive(Copy, Clone)]
pub struct PlusConsumed<A> {
    pub(crate) parser: A,
}

impl<'a, I, A> Parser<'a, I> for PlusConsumed<A>
where
    I: Input + ?Sized,
    A: Parser<'a, I>,
{
    type Output = ();

    fn parse_at(&self, input: &'a I, offset: usize) -> ParseResult<()> {
        let first = self.parser.parse_at(input, offset)?;
        let end = repeat(&self.parser, input, first.offset, drop)?;
        Ok(Success::new(end, ()))
    }
}

/// See [`Parser::filter_none`].
#[derive(Copy, Clone)]
pub struct FilterNone<A> {
    pub(crate) parser: A,
}

impl<'a, I, A, T> Parser<'a, I> for FilterNone<A>
where
    I: Input + ?Sized,
    A: Parser<'a, I, Output = Vec<Option<T>>>,
{
    type Output = Vec<T>;

    #[inline]
    fn parse_at(&self, input: &'a I, offset: usize) -> ParseResult<Vec<T>> {
        self.parser
            .parse_at(input, offset)
            .map(|s| s.map(|values| values.into_iter().flatten().collect()))
    }
}

/// See [`Parser::recognize`].
#[derive(Copy, Clone)]
pub struct Recognize<A> {
    pub(crate) parser: A,
}

impl<'a, I, A> Parser<'a, I> for Recognize<A>
where
    I: Input + ?Sized,
    A: Parser<'a, I>,
{
    type Output = String;

    #[inline]
    fn parse_at(&self, input: &'a I, offset: usize) -> ParseResult<String> {
        let s = self.parser.parse_at(input, offset)?;
        Ok(Success::new(s.offset, input.text(offset..s.offset)))
    }
}

/// See [`Parser::slice`].
#[derive(Copy, Clone)]
pub struct Slice<A> {
    pub(crate) parser: A,
}

impl<'a, I, A> Parser<'a, I> for Slice<A>
where
    I: Input + ?Sized,
    I::Slice: 'a,
    A: Parser<'a, I>,
{
    type Output = &'a I::Slice;

    #[inline]
    fn parse_at(&self, input: &'a I, offset: usize) -> ParseResult<&'a I::Slice> {
        let s = self.parser.parse_at(input, offset)?;
        Ok(Success::new(s.offset, input.slice(offset..s.offset)))
    }
}

/// See [`Parser::peek`].
#[derive(Copy, Clone)]
pub struct Peek<A> {
    pub(crate) parser: A,
}

impl<'a, I, A> Parser<'a, I> for Peek<A>
where
    I: Input + ?Sized,
    A: Parser<'a, I>,
{
    type Output = A::Output;

    #[inline]
    fn parse_at(&self, input: &'a I, offset: usize) -> ParseResult<A::Output> {
        let s = self.parser.parse_at(input, offset)?;
        Ok(Success::new(offset, s.value))
    }
}

/// See [`not`] and [`Parser::not`].
#[derive(Clone)]
pub struct Not<A> {
    pub(crate) parser: A,
    pub(crate) expected: Vec<Expected>,
}

impl<'a, I, A> Parser<'a, I> for Not<A>
where
    I: Input + ?Sized,
    A: Parser<'a, I>,
{
    type Output = ();

    #[inline]
    fn parse_at(&self, input: &'a I, offset: usize) -> ParseResult<()> {
        match self.parser.parse_at(input, offset) {
            Ok(_) => Err(Failure {
                offset,
                expected: self.expected.clone(),
                fatal: false,
            }),
            Err(_) => Ok(Success::new(offset, ())),
        }
    }
}

/// Succeed without consuming input only if `parser` fails here, fatally or not.
///
/// If `parser` succeeds, this fails at the same offset with the given expected list.
///
/// # Examples
///
/// ```
/// # use parsnip::prelude::*;
/// let not_end = not(literal("*/"), ["comment text"]);
///
/// assert_eq!(not_end.parse("a*/".as_bytes()), Ok(Success::new(0, ())));
/// assert_eq!(not_end.parse("*/".as_bytes()), Err(Failure::new(0, ["comment text"])));
/// ```
pub fn not<A, E, S>(parser: A, expected: E) -> Not<A>
where
    E: IntoIterator<Item = S>,
    S: Into<Expected>,
{
    Not {
        parser,
        expected: expected_list(expected),
    }
}

/// See [`Parser::except`].
pub type Except<A, B> = IgnoreThen<Not<B>, A>;

/// See [`Parser::cut`].
#[derive(Copy, Clone)]
pub struct Cut<A> {
    pub(crate) parser: A,
}

impl<'a, I, A> Parser<'a, I> for Cut<A>
where
    I: Input + ?Sized,
    A: Parser<'a, I>,
{
    type Output = A::Output;

    #[inline]
    fn parse_at(&self, input: &'a I, offset: usize) -> ParseResult<A::Output> {
        self.parser
            .parse_at(input, offset)
            .map_err(Failure::into_fatal)
    }
}

/// See [`Parser::complete`].
pub type Complete<A, I> = ThenIgnore<A, End<I>>;
