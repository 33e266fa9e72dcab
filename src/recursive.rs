//! Recursive parsers (parser that include themselves within their patterns).
//!
//! *“It's unpleasantly like being drunk."
//! "What's so unpleasant about being drunk?"
//! "You ask a glass of water.”*
//!
//! The [`recursive()`] function covers most cases, but sometimes it's necessary to manually control the declaration and
//! definition of parsers more carefully, particularly for mutually-recursive parsers. In such cases, the functions on
//! [`Recursive`] allow for this.
//!
//! With the `stacker` feature (enabled by default), every entry into a recursive parser grows the stack on demand, so
//! deeply nested input does not overflow it.

use super::*;

/// Minimum stack space left before a recursive parser is entered.
#[cfg(feature = "stacker")]
const RED_ZONE: usize = 100 * 1024;

/// Size of each new stack segment.
#[cfg(feature = "stacker")]
const STACK_PER_RECURSION: usize = 1024 * 1024;

#[cfg(feature = "stacker")]
#[inline]
fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[cfg(not(feature = "stacker"))]
#[inline]
fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

enum RecursiveInner<T> {
    Owned(Arc<T>),
    Unowned(Weak<T>),
}

type OnceParser<'a, I, O> = OnceLock<Box<dyn Parser<'a, I, Output = O> + Send + Sync + 'a>>;

/// A parser that can be defined in terms of itself by separating its [declaration](Recursive::declare) from its
/// [definition](Recursive::define).
///
/// Prefer to use [`recursive()`], which exists as a convenient wrapper around both operations, if possible.
pub struct Recursive<'a, I: Input + ?Sized, O> {
    inner: RecursiveInner<OnceParser<'a, I, O>>,
}

impl<'a, I: Input + ?Sized, O> Recursive<'a, I, O> {
    /// Declare the existence of a recursive parser, allowing it to be used to construct parser combinators before
    /// being fully defined.
    ///
    /// Declaring a parser before defining it is required for a parser to reference itself.
    ///
    /// This should be followed by **exactly one** call to the [`Recursive::define`] method prior to using the parser
    /// for parsing (i.e: via the [`Parser::parse`] method or similar).
    ///
    /// # Examples
    ///
    /// ```
    /// # use parsnip::prelude::*;
    /// #[derive(Debug, PartialEq)]
    /// enum Chain {
    ///     End,
    ///     Link(char, Box<Chain>),
    /// }
    ///
    /// // Declare the existence of the parser before defining it so that it can reference itself
    /// let mut chain = Recursive::<[u8], Chain>::declare();
    ///
    /// // Define the parser in terms of itself.
    /// // In this case, the parser parses a right-recursive list of '+' into a singly linked list
    /// chain.define(
    ///     satisfy(|c: char| c == '+')
    ///         .then(chain.clone())
    ///         .map(|(c, chain): (char, Chain)| Chain::Link(c, Box::new(chain)))
    ///         .or_not()
    ///         .map(|chain: Option<Chain>| chain.unwrap_or(Chain::End)),
    /// );
    ///
    /// assert_eq!(chain.parse("".as_bytes()), Ok(Success::new(0, Chain::End)));
    /// assert_eq!(
    ///     chain.parse("++".as_bytes()),
    ///     Ok(Success::new(2, Chain::Link('+', Box::new(Chain::Link('+', Box::new(Chain::End)))))),
    /// );
    /// ```
    pub fn declare() -> Self {
        Recursive {
            inner: RecursiveInner::Owned(Arc::new(OnceLock::new())),
        }
    }

    /// Defines the parser after declaring it, allowing it to be used for parsing.
    ///
    /// # Panics
    ///
    /// Panics if the parser has already been defined.
    pub fn define<P>(&mut self, parser: P)
    where
        P: Parser<'a, I, Output = O> + Send + Sync + 'a,
    {
        if self.parser().set(Box::new(parser)).is_err() {
            panic!("recursive parser already defined");
        }
    }

    fn parser(&self) -> Arc<OnceParser<'a, I, O>> {
        match &self.inner {
            RecursiveInner::Owned(x) => x.clone(),
            RecursiveInner::Unowned(x) => x
                .upgrade()
                .expect("Recursive parser used before being defined"),
        }
    }
}

impl<'a, I: Input + ?Sized, O> Clone for Recursive<'a, I, O> {
    fn clone(&self) -> Self {
        Self {
            inner: match &self.inner {
                RecursiveInner::Owned(x) => RecursiveInner::Owned(x.clone()),
                RecursiveInner::Unowned(x) => RecursiveInner::Unowned(x.clone()),
            },
        }
    }
}

impl<'a, I: Input + ?Sized, O> Parser<'a, I> for Recursive<'a, I, O> {
    type Output = O;

    fn parse_at(&self, input: &'a I, offset: usize) -> ParseResult<O> {
        let parser = self.parser();
        let parser = parser
            .get()
            .expect("Recursive parser used before being defined");

        ensure_sufficient_stack(|| parser.parse_at(input, offset))
    }
}

/// Construct a recursive parser (i.e: a parser that may contain itself as part of its pattern).
///
/// The given function must create the parser. The parser must not be used to parse input before this function returns.
///
/// This is a wrapper around [`Recursive::declare`] and [`Recursive::define`]. The handle passed to the function does
/// not keep the parser alive, so the finished parser does not leak by referring to itself.
///
/// # Examples
///
/// ```
/// # use parsnip::prelude::*;
/// #[derive(Debug, PartialEq)]
/// enum Tree {
///     Leaf(String),
///     Branch(Vec<Tree>),
/// }
///
/// // Parser that recursively parses nested lists
/// let tree = recursive::<[u8], Tree, _, _>(|tree| {
///     delimited(literal("["), tree.star(), literal("]"))
///         .map(Tree::Branch)
///         .or(text::ident().map(Tree::Leaf))
///         .padded()
/// });
///
/// assert_eq!(tree.parse("hello".as_bytes()), Ok(Success::new(5, Tree::Leaf("hello".to_string()))));
/// // The parser can deal with arbitrarily complex nested lists
/// assert_eq!(tree.parse("[[a b] c [d [e]]]".as_bytes()), Ok(Success::new(17, Tree::Branch(vec![
///     Tree::Branch(vec![
///         Tree::Leaf("a".to_string()),
///         Tree::Leaf("b".to_string()),
///     ]),
///     Tree::Leaf("c".to_string()),
///     Tree::Branch(vec![
///         Tree::Leaf("d".to_string()),
///         Tree::Branch(vec![Tree::Leaf("e".to_string())]),
///     ]),
/// ]))));
/// ```
pub fn recursive<'a, I, O, A, F>(f: F) -> Recursive<'a, I, O>
where
    I: Input + ?Sized,
    A: Parser<'a, I, Output = O> + Send + Sync + 'a,
    F: FnOnce(Recursive<'a, I, O>) -> A,
{
    let rc: Arc<OnceParser<'a, I, O>> = Arc::new(OnceLock::new());
    let parser = f(Recursive {
        inner: RecursiveInner::Unowned(Arc::downgrade(&rc)),
    });
    if rc.set(Box::new(parser)).is_err() {
        unreachable!("recursive parser defined while it was being built");
    }
    Recursive {
        inner: RecursiveInner::Owned(rc),
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    fn nested<'a>() -> Recursive<'a, [u8], usize> {
        recursive(|nested| {
            delimited(literal("("), nested.or_not(), literal(")"))
                .map(|inner: Option<usize>| inner.map_or(1, |depth| depth + 1))
        })
    }

    #[test]
    fn counts_nesting() {
        assert_eq!(nested().parse("((()))".as_bytes()), Ok(Success::new(6, 3)));
        assert_eq!(nested().parse("(()".as_bytes()), Err(Failure::new(3, [")"])));
    }

    #[test]
    fn deep_nesting_does_not_overflow() {
        let depth = 20_000;
        let input = format!("{}{}", "(".repeat(depth), ")".repeat(depth));
        assert_eq!(
            nested().parse(input.as_bytes()),
            Ok(Success::new(2 * depth, depth)),
        );
    }

    #[test]
    fn mutual_recursion() {
        // a := "a" b? ; b := "b" a?
        let mut a = Recursive::<[u8], usize>::declare();
        let mut b = Recursive::<[u8], usize>::declare();
        a.define(
            literal("a")
                .ignore_then(b.clone().or_not())
                .map(|rest: Option<usize>| rest.unwrap_or(0) + 1),
        );
        b.define(
            literal("b")
                .ignore_then(a.clone().or_not())
                .map(|rest: Option<usize>| rest.unwrap_or(0) + 1),
        );

        assert_eq!(a.parse("ababa".as_bytes()), Ok(Success::new(5, 5)));
        assert_eq!(b.parse("ba".as_bytes()), Ok(Success::new(2, 2)));
    }

    #[test]
    #[should_panic(expected = "Recursive parser used before being defined")]
    fn undefined_panics() {
        let p = Recursive::<[u8], ()>::declare();
        let _ = p.parse("".as_bytes());
    }

    #[test]
    #[should_panic(expected = "recursive parser already defined")]
    fn double_definition_panics() {
        let mut p = Recursive::<[u8], ()>::declare();
        p.define(empty());
        p.define(empty());
    }
}
