//! Parser primitives that inspect the input directly.
//!
//! *“These creatures you call mice, you see, they are not quite as they appear. They are merely the protrusion into
//! our dimension of vastly hyperintelligent pandimensional beings.”*
//!
//! Parsers are created by combining together smaller parsers. Right at the bottom of the pile are the primitives.
//! Each of them is very easy to understand in isolation, usually only doing one thing.
//!
//! ## The Important Ones
//!
//! - [`literal`]: parses a specific token
//! - [`satisfy`]: parses a single code point accepted by a predicate
//! - [`take_while`]: greedily consumes code points accepted by a predicate
//! - [`end`]: parses the end of the input
//! - [`choice`]: tries several parsers in turn, reporting the furthest failure
//! - [`dispatch`]: picks a parser by looking at the next code point

use super::*;

/// See [`custom`].
#[derive(Copy, Clone)]
pub struct Custom<F> {
    f: F,
}

impl<'a, I, F, O> Parser<'a, I> for Custom<F>
where
    I: Input + ?Sized,
    F: Fn(&'a I, usize) -> ParseResult<O>,
{
    type Output = O;

    #[inline]
    fn parse_at(&self, input: &'a I, offset: usize) -> ParseResult<O> {
        (self.f)(input, offset)
    }
}

/// Declare a parser from a plain function of the input and the starting offset.
///
/// The function must behave like any other parser: it must not move backward, and it must yield the same outcome
/// whenever it is given the same input and offset.
///
/// # Examples
///
/// ```
/// # use parsnip::prelude::*;
/// // Succeeds only at even offsets
/// let even = custom(|_: &[u8], offset: usize| {
///     if offset % 2 == 0 {
///         Ok(Success::new(offset, ()))
///     } else {
///         Err(Failure::new(offset, ["even offset"]))
///     }
/// });
///
/// assert_eq!(even.parse_at("ab".as_bytes(), 0), Ok(Success::new(0, ())));
/// assert_eq!(even.parse_at("ab".as_bytes(), 1), Err(Failure::new(1, ["even offset"])));
/// ```
pub fn custom<F>(f: F) -> Custom<F> {
    Custom { f }
}

/// See [`literal`].
pub struct Literal<T, I: ?Sized> {
    token: T,
    expected: Expected,
    phantom: PhantomData<fn(&I)>,
}

impl<T: Clone, I: ?Sized> Clone for Literal<T, I> {
    fn clone(&self) -> Self {
        Self {
            token: self.token.clone(),
            expected: self.expected.clone(),
            phantom: PhantomData,
        }
    }
}

impl<'a, I, T> Parser<'a, I> for Literal<T, I>
where
    I: Input + ?Sized,
    T: AsRef<str> + Clone,
{
    type Output = T;

    #[inline]
    fn parse_at(&self, input: &'a I, offset: usize) -> ParseResult<T> {
        match input.match_literal(offset, self.token.as_ref()) {
            Some(width) => Ok(Success::new(offset + width, self.token.clone())),
            None => Err(Failure {
                offset,
                expected: vec![self.expected.clone()],
                fatal: false,
            }),
        }
    }
}

/// Parse exactly the given token, yielding the token itself.
///
/// On failure the token is reported as the only expected item.
///
/// # Examples
///
/// ```
/// # use parsnip::prelude::*;
/// let question = literal("?");
///
/// assert_eq!(question.parse("?".as_bytes()), Ok(Success::new(1, "?")));
/// assert_eq!(question.parse("!".as_bytes()), Err(Failure::new(0, ["?"])));
/// ```
pub fn literal<T, I>(token: T) -> Literal<T, I>
where
    T: AsRef<str> + Clone + Into<Expected>,
    I: Input + ?Sized,
{
    Literal {
        expected: token.clone().into(),
        token,
        phantom: PhantomData,
    }
}

/// See [`satisfy`].
pub struct Satisfy<F, I: ?Sized> {
    filter: F,
    expected: Vec<Expected>,
    phantom: PhantomData<fn(&I)>,
}

impl<F: Clone, I: ?Sized> Clone for Satisfy<F, I> {
    fn clone(&self) -> Self {
        Self {
            filter: self.filter.clone(),
            expected: self.expected.clone(),
            phantom: PhantomData,
        }
    }
}

impl<F, I: ?Sized> Satisfy<F, I> {
    /// What to report when the predicate rejects the code point, or there is none.
    pub fn expected<E, S>(self, expected: E) -> Self
    where
        E: IntoIterator<Item = S>,
        S: Into<Expected>,
    {
        Self {
            expected: expected_list(expected),
            ..self
        }
    }
}

impl<'a, I, F> Parser<'a, I> for Satisfy<F, I>
where
    I: Input + ?Sized,
    F: Fn(char) -> bool,
{
    type Output = char;

    #[inline]
    fn parse_at(&self, input: &'a I, offset: usize) -> ParseResult<char> {
        match input.char_at(offset) {
            Some((c, width)) if (self.filter)(c) => Ok(Success::new(offset + width, c)),
            _ => Err(Failure {
                offset,
                expected: self.expected.clone(),
                fatal: false,
            }),
        }
    }
}

/// Parse a single code point accepted by the given predicate.
///
/// The failure carries no expected items unless they are given with [`Satisfy::expected`].
///
/// # Examples
///
/// ```
/// # use parsnip::prelude::*;
/// let lowercase = satisfy(|c: char| c.is_ascii_lowercase());
///
/// assert_eq!(lowercase.parse("x".as_bytes()), Ok(Success::new(1, 'x')));
/// assert_eq!(lowercase.parse("X".as_bytes()), Err(Failure::at(0)));
/// assert_eq!(lowercase.parse("".as_bytes()), Err(Failure::at(0)));
///
/// let vowel = satisfy(|c: char| "aeiou".contains(c)).expected(["vowel"]);
/// assert_eq!(vowel.parse("x".as_bytes()), Err(Failure::new(0, ["vowel"])));
/// ```
pub fn satisfy<F, I>(f: F) -> Satisfy<F, I>
where
    F: Fn(char) -> bool,
    I: Input + ?Sized,
{
    Satisfy {
        filter: f,
        expected: Vec::new(),
        phantom: PhantomData,
    }
}

/// See [`any`].
pub struct Any<I: ?Sized>(PhantomData<fn(&I)>);

impl<I: ?Sized> Copy for Any<I> {}
impl<I: ?Sized> Clone for Any<I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, I> Parser<'a, I> for Any<I>
where
    I: Input + ?Sized,
{
    type Output = char;

    #[inline]
    fn parse_at(&self, input: &'a I, offset: usize) -> ParseResult<char> {
        match input.char_at(offset) {
            Some((c, width)) => Ok(Success::new(offset + width, c)),
            None => Err(Failure::new(offset, ["any character"])),
        }
    }
}

/// Parse any single code point.
pub const fn any<I: Input + ?Sized>() -> Any<I> {
    Any(PhantomData)
}

/// See [`take_while`] and [`take_while1`].
pub struct TakeWhile<F, I: ?Sized> {
    filter: F,
    expected: Option<Vec<Expected>>,
    phantom: PhantomData<fn(&I)>,
}

impl<F: Clone, I: ?Sized> Clone for TakeWhile<F, I> {
    fn clone(&self) -> Self {
        Self {
            filter: self.filter.clone(),
            expected: self.expected.clone(),
            phantom: PhantomData,
        }
    }
}

impl<'a, I, F> Parser<'a, I> for TakeWhile<F, I>
where
    I: Input + ?Sized,
    F: Fn(char) -> bool,
{
    type Output = ();

    fn parse_at(&self, input: &'a I, offset: usize) -> ParseResult<()> {
        let mut end = offset;
        while let Some((c, width)) = input.char_at(end) {
            if !(self.filter)(c) {
                break;
            }
            end += width;
        }

        match &self.expected {
            Some(expected) if end == offset => Err(Failure {
                offset,
                expected: expected.clone(),
                fatal: false,
            }),
            _ => Ok(Success::new(end, ())),
        }
    }
}

/// Greedily consume code points for as long as the predicate accepts them. This never fails.
///
/// Use [`Parser::recognize`] or [`Parser::slice`] to get at the consumed text.
///
/// # Examples
///
/// ```
/// # use parsnip::prelude::*;
/// let spaces = take_while(|c: char| c == ' ');
///
/// assert_eq!(spaces.parse("   x".as_bytes()), Ok(Success::new(3, ())));
/// assert_eq!(spaces.parse("x".as_bytes()), Ok(Success::new(0, ())));
/// ```
pub fn take_while<F, I>(f: F) -> TakeWhile<F, I>
where
    F: Fn(char) -> bool,
    I: Input + ?Sized,
{
    TakeWhile {
        filter: f,
        expected: None,
        phantom: PhantomData,
    }
}

/// Like [`take_while`], but fails with the given expected list if not even one code point is accepted.
pub fn take_while1<F, I, E, S>(f: F, expected: E) -> TakeWhile<F, I>
where
    F: Fn(char) -> bool,
    I: Input + ?Sized,
    E: IntoIterator<Item = S>,
    S: Into<Expected>,
{
    TakeWhile {
        filter: f,
        expected: Some(expected_list(expected)),
        phantom: PhantomData,
    }
}

/// See [`range`].
pub struct CharRange<I: ?Sized> {
    range: RangeInclusive<char>,
    expected: Vec<Expected>,
    phantom: PhantomData<fn(&I)>,
}

impl<I: ?Sized> CharRange<I> {
    /// Replace the default `first-last` description.
    pub fn expected<E, S>(self, expected: E) -> Self
    where
        E: IntoIterator<Item = S>,
        S: Into<Expected>,
    {
        Self {
            expected: expected_list(expected),
            ..self
        }
    }
}

impl<I: ?Sized> Clone for CharRange<I> {
    fn clone(&self) -> Self {
        Self {
            range: self.range.clone(),
            expected: self.expected.clone(),
            phantom: PhantomData,
        }
    }
}

impl<'a, I> Parser<'a, I> for CharRange<I>
where
    I: Input + ?Sized,
{
    type Output = char;

    #[inline]
    fn parse_at(&self, input: &'a I, offset: usize) -> ParseResult<char> {
        match input.char_at(offset) {
            Some((c, width)) if self.range.contains(&c) => Ok(Success::new(offset + width, c)),
            _ => Err(Failure {
                offset,
                expected: self.expected.clone(),
                fatal: false,
            }),
        }
    }
}

/// Parse a single code point within the given inclusive range.
///
/// Failures expect a description of the range in the form `first-last`, unless [`CharRange::expected`] says
/// otherwise.
///
/// # Examples
///
/// ```
/// # use parsnip::prelude::*;
/// let digit = range('0'..='9');
///
/// assert_eq!(digit.parse("7".as_bytes()), Ok(Success::new(1, '7')));
/// assert_eq!(digit.parse("x".as_bytes()), Err(Failure::new(0, ["0-9"])));
/// ```
pub fn range<I: Input + ?Sized>(range: RangeInclusive<char>) -> CharRange<I> {
    CharRange {
        expected: vec![format!("{}-{}", range.start(), range.end()).into()],
        range,
        phantom: PhantomData,
    }
}

/// See [`skip`].
pub struct Skip<I: ?Sized> {
    count: usize,
    phantom: PhantomData<fn(&I)>,
}

impl<I: ?Sized> Copy for Skip<I> {}
impl<I: ?Sized> Clone for Skip<I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, I> Parser<'a, I> for Skip<I>
where
    I: Input + ?Sized,
{
    type Output = ();

    fn parse_at(&self, input: &'a I, offset: usize) -> ParseResult<()> {
        let mut end = offset;
        for _ in 0..self.count {
            match input.char_at(end) {
                Some((_, width)) => end += width,
                None => return Err(Failure::new(offset, ["any character"])),
            }
        }
        Ok(Success::new(end, ()))
    }
}

/// Skip exactly `count` code points, whatever they are.
///
/// Fails at the starting offset if fewer than `count` remain.
pub const fn skip<I: Input + ?Sized>(count: usize) -> Skip<I> {
    Skip {
        count,
        phantom: PhantomData,
    }
}

/// See [`start`].
pub struct Start<I: ?Sized>(PhantomData<fn(&I)>);

impl<I: ?Sized> Copy for Start<I> {}
impl<I: ?Sized> Clone for Start<I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, I> Parser<'a, I> for Start<I>
where
    I: Input + ?Sized,
{
    type Output = ();

    #[inline]
    fn parse_at(&self, _input: &'a I, offset: usize) -> ParseResult<()> {
        if offset == 0 {
            Ok(Success::new(offset, ()))
        } else {
            Err(Failure::new(offset, ["start of input"]))
        }
    }
}

/// A parser that accepts only the start of input, consuming nothing.
pub const fn start<I: Input + ?Sized>() -> Start<I> {
    Start(PhantomData)
}

/// See [`end`].
pub struct End<I: ?Sized>(PhantomData<fn(&I)>);

impl<I: ?Sized> Copy for End<I> {}
impl<I: ?Sized> Clone for End<I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, I> Parser<'a, I> for End<I>
where
    I: Input + ?Sized,
{
    type Output = ();

    #[inline]
    fn parse_at(&self, input: &'a I, offset: usize) -> ParseResult<()> {
        if offset == input.len() {
            Ok(Success::new(offset, ()))
        } else {
            Err(Failure::new(offset, ["end of input"]))
        }
    }
}

/// A parser that accepts only the end of input, consuming nothing.
///
/// # Examples
///
/// ```
/// # use parsnip::prelude::*;
/// assert_eq!(end().parse_at("ab".as_bytes(), 2), Ok(Success::new(2, ())));
/// assert_eq!(end().parse_at("ab".as_bytes(), 1), Err(Failure::new(1, ["end of input"])));
/// ```
pub const fn end<I: Input + ?Sized>() -> End<I> {
    End(PhantomData)
}

/// See [`empty`].
pub struct Empty<I: ?Sized>(PhantomData<fn(&I)>);

impl<I: ?Sized> Copy for Empty<I> {}
impl<I: ?Sized> Clone for Empty<I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, I> Parser<'a, I> for Empty<I>
where
    I: Input + ?Sized,
{
    type Output = ();

    #[inline]
    fn parse_at(&self, _input: &'a I, offset: usize) -> ParseResult<()> {
        Ok(Success::new(offset, ()))
    }
}

/// A parser that always succeeds, consuming nothing.
pub const fn empty<I: Input + ?Sized>() -> Empty<I> {
    Empty(PhantomData)
}

/// See [`choice`].
#[derive(Clone)]
pub struct Choice<T> {
    parsers: T,
    expected: Option<Vec<Expected>>,
}

impl<T> Choice<T> {
    /// Report the given list whenever every alternative fails recoverably, instead of merging their expected lists.
    ///
    /// The failure is still reported at the furthest offset any alternative reached.
    pub fn expected<E, S>(self, expected: E) -> Self
    where
        E: IntoIterator<Item = S>,
        S: Into<Expected>,
    {
        Self {
            expected: Some(expected_list(expected)),
            ..self
        }
    }
}

/// Parse using the first of several alternatives that succeeds.
///
/// Alternatives are tried in order from the same offset. The first success wins. A fatal failure is returned at once
/// without trying the remaining alternatives. When every alternative fails recoverably, the failure that got furthest
/// into the input is reported; failures tied at that offset have their expected lists concatenated, unless
/// [`Choice::expected`] provides an explicit list. With no alternatives at all, the choice fails where it started.
///
/// The alternatives may be given as a tuple of up to 26 parsers sharing an output type, or as an array or [`Vec`] of
/// parsers of a single type.
///
/// # Examples
///
/// ```
/// # use parsnip::prelude::*;
/// let abd = choice((
///     preceded(literal("a"), literal("b")).then(literal("c")).ignored(),
///     preceded(literal("a"), literal("c")).ignored(),
/// ));
///
/// // The first alternative got furthest
/// assert_eq!(abd.parse("abd".as_bytes()), Err(Failure::new(2, ["c"])));
///
/// let op = choice([literal("+"), literal("-")]).expected(["operator"]);
/// assert_eq!(op.parse("*".as_bytes()), Err(Failure::new(0, ["operator"])));
/// ```
pub const fn choice<T>(parsers: T) -> Choice<T> {
    Choice {
        parsers,
        expected: None,
    }
}

/// Fold the failure of one more alternative into the failures seen so far.
#[inline]
fn fold_failure(running: Option<Failure>, failure: Failure, merge: bool) -> Failure {
    match running {
        Some(running) => running.prioritize(failure, merge),
        None => failure,
    }
}

fn conclude(running: Option<Failure>, offset: usize, expected: Option<&[Expected]>) -> Failure {
    match (running, expected) {
        (Some(running), Some(expected)) => Failure {
            expected: expected.to_vec(),
            ..running
        },
        (Some(running), None) => running,
        (None, expected) => Failure {
            offset,
            expected: expected.map(<[Expected]>::to_vec).unwrap_or_default(),
            fatal: false,
        },
    }
}

fn choose<'a, 'b, I, P>(
    parsers: impl IntoIterator<Item = &'b P>,
    input: &'a I,
    offset: usize,
    expected: Option<&[Expected]>,
) -> ParseResult<P::Output>
where
    I: Input + ?Sized,
    P: Parser<'a, I> + 'b,
{
    let merge = expected.is_none();
    let mut running = None;
    for parser in parsers {
        match parser.parse_at(input, offset) {
            Ok(success) => return Ok(success),
            Err(failure) if failure.fatal => return Err(failure),
            Err(failure) => running = Some(fold_failure(running, failure, merge)),
        }
    }
    Err(conclude(running, offset, expected))
}

macro_rules! impl_choice_for_tuple {
    () => {};
    ($head:ident $($X:ident)*) => {
        impl_choice_for_tuple!($($X)*);
        impl_choice_for_tuple!(~ $head $($X)*);
    };
    (~ $($X:ident)*) => {
        #[allow(unused_variables, non_snake_case)]
        impl<'a, I, O, $($X),*> Parser<'a, I> for Choice<($($X,)*)>
        where
            I: Input + ?Sized,
            $($X: Parser<'a, I, Output = O>),*
        {
            type Output = O;

            fn parse_at(&self, input: &'a I, offset: usize) -> ParseResult<O> {
                let Choice { parsers: ($($X,)*), expected } = self;
                let merge = expected.is_none();

                let mut running: Option<Failure> = None;
                $(
                    match $X.parse_at(input, offset) {
                        Ok(success) => return Ok(success),
                        Err(failure) if failure.fatal => return Err(failure),
                        Err(failure) => running = Some(fold_failure(running, failure, merge)),
                    }
                )*

                Err(conclude(running, offset, expected.as_deref()))
            }
        }
    };
}

impl_choice_for_tuple!(A_ B_ C_ D_ E_ F_ G_ H_ I_ J_ K_ L_ M_ N_ O_ P_ Q_ R_ S_ T_ U_ V_ W_ X_ Y_ Z_);

impl<'a, I, P, const N: usize> Parser<'a, I> for Choice<[P; N]>
where
    I: Input + ?Sized,
    P: Parser<'a, I>,
{
    type Output = P::Output;

    #[inline]
    fn parse_at(&self, input: &'a I, offset: usize) -> ParseResult<P::Output> {
        choose(&self.parsers, input, offset, self.expected.as_deref())
    }
}

impl<'a, I, P> Parser<'a, I> for Choice<Vec<P>>
where
    I: Input + ?Sized,
    P: Parser<'a, I>,
{
    type Output = P::Output;

    #[inline]
    fn parse_at(&self, input: &'a I, offset: usize) -> ParseResult<P::Output> {
        choose(&self.parsers, input, offset, self.expected.as_deref())
    }
}

/// See [`dispatch`].
pub struct Dispatch<'a, I: Input + ?Sized, O> {
    table: HashMap<char, Boxed<'a, I, O>>,
    otherwise: Option<Boxed<'a, I, O>>,
    extra_offset: usize,
    expected: Vec<Expected>,
}

impl<'a, I: Input + ?Sized, O> Clone for Dispatch<'a, I, O> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            otherwise: self.otherwise.clone(),
            extra_offset: self.extra_offset,
            expected: self.expected.clone(),
        }
    }
}

impl<'a, I: Input + ?Sized, O> Dispatch<'a, I, O> {
    /// Add an entry to the table, replacing any parser previously registered for the same code point.
    pub fn on<P>(mut self, c: char, parser: P) -> Self
    where
        P: Parser<'a, I, Output = O> + Send + Sync + 'a,
    {
        self.table.insert(c, parser.boxed());
        self
    }

    /// Parser to invoke when the table has no entry for the code point, or when there is no code point at all.
    pub fn otherwise<P>(self, parser: P) -> Self
    where
        P: Parser<'a, I, Output = O> + Send + Sync + 'a,
    {
        Self {
            otherwise: Some(parser.boxed()),
            ..self
        }
    }

    /// Look at the code point this many offset units past the starting offset, rather than at the starting offset.
    ///
    /// This lets nested dispatches look progressively further ahead. The looked-at offset must fall on a code point
    /// boundary.
    pub fn extra_offset(self, extra_offset: usize) -> Self {
        Self {
            extra_offset,
            ..self
        }
    }

    /// What to report when no parser can be picked and there is no fallback.
    pub fn expected<E, S>(self, expected: E) -> Self
    where
        E: IntoIterator<Item = S>,
        S: Into<Expected>,
    {
        Self {
            expected: expected_list(expected),
            ..self
        }
    }
}

impl<'a, I: Input + ?Sized, O> Parser<'a, I> for Dispatch<'a, I, O> {
    type Output = O;

    fn parse_at(&self, input: &'a I, offset: usize) -> ParseResult<O> {
        let branch = input
            .char_at(offset + self.extra_offset)
            .and_then(|(c, _)| self.table.get(&c))
            .or(self.otherwise.as_ref());

        match branch {
            Some(parser) => parser.parse_at(input, offset),
            None => Err(Failure {
                offset,
                expected: self.expected.clone(),
                fatal: false,
            }),
        }
    }
}

/// Pick a parser by looking at the next code point.
///
/// The code point is looked up in a table. The parser found there (or the [`Dispatch::otherwise`] fallback) is then
/// invoked from the starting offset, so it sees the looked-at code point too. Unlike a [`choice`], no other
/// alternative is ever attempted, and the lookup takes constant time however many entries the table holds.
///
/// # Examples
///
/// ```
/// # use parsnip::prelude::*;
/// let value = dispatch([
///     ('t', literal("true").to(true).boxed()),
///     ('f', literal("false").to(false).boxed()),
/// ])
/// .expected(["boolean"]);
///
/// assert_eq!(value.parse("false".as_bytes()), Ok(Success::new(5, false)));
/// assert_eq!(value.parse("tru".as_bytes()), Err(Failure::new(0, ["true"])));
/// assert_eq!(value.parse("nil".as_bytes()), Err(Failure::new(0, ["boolean"])));
/// ```
pub fn dispatch<'a, I, O, T>(table: T) -> Dispatch<'a, I, O>
where
    I: Input + ?Sized,
    T: IntoIterator<Item = (char, Boxed<'a, I, O>)>,
{
    Dispatch {
        table: table.into_iter().collect(),
        otherwise: None,
        extra_offset: 0,
        expected: Vec::new(),
    }
}
