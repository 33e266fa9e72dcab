//! Incremental parsers: parsers that hand out their output piece by piece.
//!
//! *“The ships hung in the sky in much the same way that bricks don't.”*
//!
//! An ordinary [`Parser`] produces its whole output at once, when it concludes. An [`IncrementalParser`] instead
//! produces a sequence of items, each one surfaced as soon as the step that produced it has committed to success, and
//! concludes afterwards with the final offset or a [`Failure`]. This lets a caller consume the results of a long or
//! unbounded match without holding the whole parsed structure in memory.
//!
//! Incremental parsers are driven by the caller: nothing happens until [`IncrementalParser::resume`] is called (usually
//! through a [`Stream`]), and a caller that has seen enough can simply stop.
//!
//! Every incremental grammar accepts and rejects exactly the same inputs as its synchronous counterpart, failing at
//! the same offset:
//!
//! | incremental                      | synchronous                                        |
//! |----------------------------------|----------------------------------------------------|
//! | `lift(p)`                        | `p.map(\|x\| vec![x])`                             |
//! | `a.then(b)`                      | `a.then_with(b, \|a, b\| [a, b].concat())`         |
//! | `a.star()`                       | `a.star().map(\|xs\| xs.concat())`                 |
//! | `a.optional()`                   | `a.or_not().map(Option::unwrap_or_default)`        |
//! | `a.complete()`                   | `a.complete()`                                     |
//!
//! # Examples
//!
//! ```
//! # use parsnip::prelude::*;
//! let number = text::int::<[u8]>(10).then_ignore(literal(",").or_not());
//! let numbers = lift(number).star().complete();
//!
//! let mut stream = numbers.stream("1,2,3,x".as_bytes(), 0);
//! assert_eq!(stream.next(), Some("1".to_string()));
//! assert_eq!(stream.next(), Some("2".to_string()));
//! assert_eq!(stream.next(), Some("3".to_string()));
//! assert_eq!(stream.next(), None);
//! // The items already handed out stand, even though the whole parse fails
//! assert_eq!(stream.finish(), Err(Failure::new(6, ["end of input"])));
//! ```

use super::*;

/// One step of an incremental parser.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step<T> {
    /// An item that is committed: it will never be retracted.
    Yield(T),
    /// The parser has concluded, with the offset it ended at or with the failure that stopped it.
    Done(Result<usize, Failure>),
}

/// A trait implemented by incremental parsers.
///
/// Each invocation is represented by an explicit state, created by [`IncrementalParser::start`] and advanced by
/// [`IncrementalParser::resume`]. Once `resume` has returned [`Step::Done`] it keeps returning the same conclusion.
pub trait IncrementalParser<'a, I: Input + ?Sized> {
    /// The type of the items this parser yields.
    type Item;

    /// The resumable state of one invocation.
    type State;

    /// Begin an invocation at the given offset. No input is inspected until the state is resumed.
    fn start(&self, offset: usize) -> Self::State;

    /// Run the invocation until it yields its next item or concludes.
    fn resume(&self, input: &'a I, state: &mut Self::State) -> Step<Self::Item>;

    /// Invoke this parser at the given offset, exposing its items as an [`Iterator`].
    fn stream<'p>(&'p self, input: &'a I, offset: usize) -> Stream<'p, 'a, I, Self>
    where
        Self: Sized,
    {
        Stream {
            parser: self,
            input,
            state: self.start(offset),
            outcome: None,
        }
    }

    /// Invoke this parser at the given offset, collecting all of its items.
    ///
    /// A failure discards the items, exactly as the synchronous form of the grammar would.
    fn run(&self, input: &'a I, offset: usize) -> ParseResult<Vec<Self::Item>>
    where
        Self: Sized,
    {
        let mut stream = self.stream(input, offset);
        let items = stream.by_ref().collect();
        stream.finish().map(|end| Success::new(end, items))
    }

    /// Run this parser and then, if it succeeded, the other one from where this one ended.
    ///
    /// Items from either stage are handed out as soon as that stage yields them.
    fn then<B>(self, other: B) -> Then<Self, B>
    where
        Self: Sized,
        B: IncrementalParser<'a, I, Item = Self::Item>,
    {
        Then {
            first: self,
            second: other,
        }
    }

    /// Repeat this parser any number of times (including zero times).
    ///
    /// The items of an iteration are only handed out once the whole iteration has succeeded. The rules for ending the
    /// repetition are those of [`Parser::star`].
    fn star(self) -> Star<Self>
    where
        Self: Sized,
    {
        Star { parser: self }
    }

    /// Repeat this parser one or more times.
    fn plus(self) -> Then<Self, Star<Self>>
    where
        Self: Sized + Clone,
    {
        self.clone().then(self.star())
    }

    /// Attempt this parser, handing out its items only if it fully succeeds.
    ///
    /// A recoverable failure becomes a success at the starting offset with no items.
    fn optional(self) -> Optional<Self>
    where
        Self: Sized,
    {
        Optional { parser: self }
    }

    /// Require the input to end where this parser ends. Items are handed out as this parser yields them.
    fn complete(self) -> Complete<Self>
    where
        Self: Sized,
    {
        Complete { parser: self }
    }
}

/// See [`IncrementalParser::stream`].
pub struct Stream<'p, 'a, I, P>
where
    I: Input + ?Sized,
    P: IncrementalParser<'a, I>,
{
    parser: &'p P,
    input: &'a I,
    state: P::State,
    outcome: Option<Result<usize, Failure>>,
}

impl<'p, 'a, I, P> Stream<'p, 'a, I, P>
where
    I: Input + ?Sized,
    P: IncrementalParser<'a, I>,
{
    /// How the parser concluded, if it has.
    pub fn outcome(&self) -> Option<&Result<usize, Failure>> {
        self.outcome.as_ref()
    }

    /// Drive the parser to its conclusion, discarding any items not yet pulled.
    pub fn finish(mut self) -> Result<usize, Failure> {
        loop {
            if let Some(outcome) = self.outcome.take() {
                return outcome;
            }
            let _ = self.next();
        }
    }
}

impl<'p, 'a, I, P> Iterator for Stream<'p, 'a, I, P>
where
    I: Input + ?Sized,
    P: IncrementalParser<'a, I>,
{
    type Item = P::Item;

    fn next(&mut self) -> Option<P::Item> {
        if self.outcome.is_some() {
            return None;
        }
        match self.parser.resume(self.input, &mut self.state) {
            Step::Yield(item) => Some(item),
            Step::Done(outcome) => {
                self.outcome = Some(outcome);
                None
            }
        }
    }
}

impl<'p, 'a, I, P> core::iter::FusedIterator for Stream<'p, 'a, I, P>
where
    I: Input + ?Sized,
    P: IncrementalParser<'a, I>,
{
}

/// See [`lift`] and [`Parser::incremental`].
#[derive(Copy, Clone)]
pub struct Lift<A> {
    parser: A,
}

/// Lift an ordinary parser into an incremental one that yields its output as a single item.
pub fn lift<A>(parser: A) -> Lift<A> {
    Lift { parser }
}

/// The state of an invocation of [`Lift`].
pub struct LiftState {
    offset: usize,
    done: Option<Result<usize, Failure>>,
}

impl<'a, I, A> IncrementalParser<'a, I> for Lift<A>
where
    I: Input + ?Sized,
    A: Parser<'a, I>,
{
    type Item = A::Output;
    type State = LiftState;

    fn start(&self, offset: usize) -> LiftState {
        LiftState { offset, done: None }
    }

    fn resume(&self, input: &'a I, state: &mut LiftState) -> Step<A::Output> {
        if let Some(done) = &state.done {
            return Step::Done(done.clone());
        }
        match self.parser.parse_at(input, state.offset) {
            Ok(success) => {
                state.done = Some(Ok(success.offset));
                Step::Yield(success.value)
            }
            Err(failure) => {
                state.done = Some(Err(failure.clone()));
                Step::Done(Err(failure))
            }
        }
    }
}

/// See [`IncrementalParser::then`].
#[derive(Copy, Clone)]
pub struct Then<A, B> {
    first: A,
    second: B,
}

enum ThenStage<SA, SB> {
    First(SA),
    Second(SB),
    Finished(Result<usize, Failure>),
}

/// The state of an invocation of [`Then`].
pub struct ThenState<SA, SB>(ThenStage<SA, SB>);

impl<'a, I, A, B> IncrementalParser<'a, I> for Then<A, B>
where
    I: Input + ?Sized,
    A: IncrementalParser<'a, I>,
    B: IncrementalParser<'a, I, Item = A::Item>,
{
    type Item = A::Item;
    type State = ThenState<A::State, B::State>;

    fn start(&self, offset: usize) -> Self::State {
        ThenState(ThenStage::First(self.first.start(offset)))
    }

    fn resume(&self, input: &'a I, state: &mut Self::State) -> Step<A::Item> {
        loop {
            match &mut state.0 {
                ThenStage::First(first) => match self.first.resume(input, first) {
                    Step::Yield(item) => return Step::Yield(item),
                    Step::Done(Ok(end)) => state.0 = ThenStage::Second(self.second.start(end)),
                    Step::Done(Err(failure)) => {
                        state.0 = ThenStage::Finished(Err(failure.clone()));
                        return Step::Done(Err(failure));
                    }
                },
                ThenStage::Second(second) => match self.second.resume(input, second) {
                    Step::Yield(item) => return Step::Yield(item),
                    Step::Done(outcome) => {
                        state.0 = ThenStage::Finished(outcome.clone());
                        return Step::Done(outcome);
                    }
                },
                ThenStage::Finished(outcome) => return Step::Done(outcome.clone()),
            }
        }
    }
}

/// Run one invocation of `parser` from `offset` to its conclusion, keeping its items aside.
fn buffered<'a, I, A>(
    parser: &A,
    input: &'a I,
    offset: usize,
    buffer: &mut VecDeque<A::Item>,
) -> Result<usize, Failure>
where
    I: Input + ?Sized,
    A: IncrementalParser<'a, I>,
{
    let mut state = parser.start(offset);
    loop {
        match parser.resume(input, &mut state) {
            Step::Yield(item) => buffer.push_back(item),
            Step::Done(outcome) => return outcome,
        }
    }
}

/// See [`IncrementalParser::star`].
#[derive(Copy, Clone)]
pub struct Star<A> {
    parser: A,
}

/// The state of an invocation of [`Star`].
pub struct StarState<T> {
    offset: usize,
    buffer: VecDeque<T>,
    done: Option<Result<usize, Failure>>,
}

impl<'a, I, A> IncrementalParser<'a, I> for Star<A>
where
    I: Input + ?Sized,
    A: IncrementalParser<'a, I>,
{
    type Item = A::Item;
    type State = StarState<A::Item>;

    fn start(&self, offset: usize) -> Self::State {
        StarState {
            offset,
            buffer: VecDeque::new(),
            done: None,
        }
    }

    fn resume(&self, input: &'a I, state: &mut Self::State) -> Step<A::Item> {
        loop {
            if let Some(item) = state.buffer.pop_front() {
                return Step::Yield(item);
            }
            if let Some(done) = &state.done {
                return Step::Done(done.clone());
            }

            let before = state.offset;
            match buffered(&self.parser, input, before, &mut state.buffer) {
                Ok(end) if end > before => state.offset = end,
                // Release the items of a non-advancing iteration, then stop
                Ok(_) => state.done = Some(Ok(before)),
                Err(failure) => {
                    state.buffer.clear();
                    state.done = Some(if failure.fatal {
                        Err(failure)
                    } else {
                        Ok(before)
                    });
                }
            }
        }
    }
}

/// See [`IncrementalParser::optional`].
#[derive(Copy, Clone)]
pub struct Optional<A> {
    parser: A,
}

/// The state of an invocation of [`Optional`].
pub struct OptionalState<T> {
    offset: usize,
    buffer: VecDeque<T>,
    done: Option<Result<usize, Failure>>,
}

impl<'a, I, A> IncrementalParser<'a, I> for Optional<A>
where
    I: Input + ?Sized,
    A: IncrementalParser<'a, I>,
{
    type Item = A::Item;
    type State = OptionalState<A::Item>;

    fn start(&self, offset: usize) -> Self::State {
        OptionalState {
            offset,
            buffer: VecDeque::new(),
            done: None,
        }
    }

    fn resume(&self, input: &'a I, state: &mut Self::State) -> Step<A::Item> {
        let done = match &state.done {
            Some(done) => done.clone(),
            None => {
                let outcome = match buffered(&self.parser, input, state.offset, &mut state.buffer) {
                    Ok(end) => Ok(end),
                    Err(failure) => {
                        state.buffer.clear();
                        if failure.fatal {
                            Err(failure)
                        } else {
                            Ok(state.offset)
                        }
                    }
                };
                state.done = Some(outcome.clone());
                outcome
            }
        };

        match state.buffer.pop_front() {
            Some(item) => Step::Yield(item),
            None => Step::Done(done),
        }
    }
}

/// See [`IncrementalParser::complete`].
#[derive(Copy, Clone)]
pub struct Complete<A> {
    parser: A,
}

/// The state of an invocation of [`Complete`].
pub struct CompleteState<S> {
    inner: S,
    done: Option<Result<usize, Failure>>,
}

impl<'a, I, A> IncrementalParser<'a, I> for Complete<A>
where
    I: Input + ?Sized,
    A: IncrementalParser<'a, I>,
{
    type Item = A::Item;
    type State = CompleteState<A::State>;

    fn start(&self, offset: usize) -> Self::State {
        CompleteState {
            inner: self.parser.start(offset),
            done: None,
        }
    }

    fn resume(&self, input: &'a I, state: &mut Self::State) -> Step<A::Item> {
        if let Some(done) = &state.done {
            return Step::Done(done.clone());
        }
        match self.parser.resume(input, &mut state.inner) {
            Step::Yield(item) => Step::Yield(item),
            Step::Done(outcome) => {
                let outcome = outcome.and_then(|at| end().parse_at(input, at).map(|s| s.offset));
                state.done = Some(outcome.clone());
                Step::Done(outcome)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    fn number<'a>() -> impl Parser<'a, [u8], Output = u32> + Clone {
        text::int(10).map(|s: String| s.parse::<u32>().unwrap())
    }

    #[test]
    fn lift_yields_once() {
        let p = number().incremental();

        let mut stream = p.stream("12".as_bytes(), 0);
        assert_eq!(stream.next(), Some(12));
        assert_eq!(stream.next(), None);
        assert_eq!(stream.outcome(), Some(&Ok(2)));

        assert_eq!(p.run("x".as_bytes(), 0), Err(Failure::new(0, ["integer"])));
    }

    #[test]
    fn then_forwards_both_stages() {
        let pair = lift(number()).then(lift(preceded(literal("+"), number())));

        assert_eq!(pair.run("1+2".as_bytes(), 0), Ok(Success::new(3, vec![1, 2])));

        let mut stream = pair.stream("1-2".as_bytes(), 0);
        assert_eq!(stream.next(), Some(1));
        assert_eq!(stream.next(), None);
        assert_eq!(stream.finish(), Err(Failure::new(1, ["+"])));
    }

    #[test]
    fn star_yields_committed_iterations() {
        let item = lift(number().then_ignore(literal(",")));
        let items = item.star();

        let mut stream = items.stream("1,2,3".as_bytes(), 0);
        assert_eq!(stream.next(), Some(1));
        assert_eq!(stream.next(), Some(2));
        // "3" is not followed by a comma, so its iteration never commits
        assert_eq!(stream.next(), None);
        assert_eq!(stream.finish(), Ok(4));
    }

    #[test]
    fn star_stops_on_fatal() {
        let items = lift(number().then_ignore(literal(",").cut())).star();
        let mut stream = items.stream("1,2".as_bytes(), 0);

        assert_eq!(stream.next(), Some(1));
        assert_eq!(stream.next(), None);
        assert_eq!(stream.finish(), Err(Failure::new(3, [","]).into_fatal()));
    }

    #[test]
    fn star_stops_after_a_non_advancing_iteration() {
        let peeked = lift(literal("a").peek()).star();
        assert_eq!(peeked.run("aa".as_bytes(), 0), Ok(Success::new(0, vec!["a"])));
    }

    #[test]
    fn plus_requires_one() {
        let digits = lift(range('0'..='9')).plus();

        assert_eq!(digits.run("42x".as_bytes(), 0), Ok(Success::new(2, vec!['4', '2'])));
        assert_eq!(digits.run("x".as_bytes(), 0), Err(Failure::new(0, ["0-9"])));
    }

    #[test]
    fn optional_discards_partial_items() {
        let pair = lift(literal("a")).then(lift(literal("b")));
        let maybe = pair.optional().then(lift(literal("a")));

        assert_eq!(maybe.run("ab".as_bytes(), 0), Err(Failure::new(2, ["a"])));
        assert_eq!(maybe.run("aba".as_bytes(), 0), Ok(Success::new(3, vec!["a", "b", "a"])));
        // The pair yields "a" before failing; that item must not leak out
        let mut stream = maybe.stream("a".as_bytes(), 0);
        assert_eq!(stream.next(), Some("a"));
        assert_eq!(stream.next(), None);
        assert_eq!(stream.finish(), Ok(1));
    }

    #[test]
    fn optional_forwards_fatal() {
        let committed = lift(literal("a").then(literal("b").cut()).ignored()).optional();
        assert_eq!(
            committed.run("ax".as_bytes(), 0),
            Err(Failure::new(1, ["b"]).into_fatal()),
        );
    }

    #[test]
    fn complete_reports_trailing_input() {
        let all = lift(number()).complete();

        assert_eq!(all.run("7".as_bytes(), 0), Ok(Success::new(1, vec![7])));

        let mut stream = all.stream("7!".as_bytes(), 0);
        assert_eq!(stream.next(), Some(7));
        assert_eq!(stream.finish(), Err(Failure::new(1, ["end of input"])));
    }

    #[test]
    fn dropping_a_stream_cancels_it() {
        let many = lift(literal("a")).star();
        let first: Vec<_> = many.stream("aaaa".as_bytes(), 0).take(2).collect();
        assert_eq!(first, vec!["a", "a"]);
    }
}
