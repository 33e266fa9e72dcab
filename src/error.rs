//! Parse failures and the rules for combining them.
//!
//! A failed parse is ordinary data: a [`Failure`] records where the mismatch was detected, a list of descriptions of
//! what would have been accepted there, and whether the failure is *fatal*. Fatal failures are produced by
//! [`Parser::cut`] (and by [`Delimited::cut_after_open`]) and stop every enclosing choice or repetition from trying
//! anything else.

use super::*;

/// A description of something a parser would have accepted.
///
/// Literal tokens and static descriptions such as `"end of input"` are stored borrowed, so reporting them never
/// allocates.
pub type Expected = Cow<'static, str>;

/// Collect anything string-like into a list of [`Expected`] descriptions.
pub(crate) fn expected_list<E, S>(expected: E) -> Vec<Expected>
where
    E: IntoIterator<Item = S>,
    S: Into<Expected>,
{
    expected.into_iter().map(Into::into).collect()
}

/// A failed parse.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Failure {
    /// The offset at which the mismatch was detected.
    pub offset: usize,
    /// What would have been accepted at [`Failure::offset`], in the order the alternatives were tried.
    pub expected: Vec<Expected>,
    /// Whether this failure suppresses backtracking in enclosing choices and repetitions.
    pub fatal: bool,
}

impl Failure {
    /// Create a recoverable failure at the given offset.
    pub fn new<E, S>(offset: usize, expected: E) -> Self
    where
        E: IntoIterator<Item = S>,
        S: Into<Expected>,
    {
        Self {
            offset,
            expected: expected_list(expected),
            fatal: false,
        }
    }

    /// Create a recoverable failure that expects nothing in particular.
    pub fn at(offset: usize) -> Self {
        Self {
            offset,
            expected: Vec::new(),
            fatal: false,
        }
    }

    /// Promote this failure to a fatal one.
    pub fn into_fatal(self) -> Self {
        Self {
            fatal: true,
            ..self
        }
    }

    /// Returns true if this failure suppresses backtracking.
    pub fn is_fatal(&self) -> bool {
        self.fatal
    }

    /// Combine two failures of sibling alternatives, keeping the one that got furthest into the input.
    ///
    /// When both were detected at the same offset and `merge` is set, the expected list of `other` is appended to
    /// that of `self`. Ties without `merge` keep `self` untouched.
    pub fn prioritize(mut self, other: Self, merge: bool) -> Self {
        match self.offset.cmp(&other.offset) {
            Ordering::Less => other,
            Ordering::Greater => self,
            Ordering::Equal => {
                if merge {
                    self.expected.extend(other.expected);
                }
                self
            }
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.expected.as_slice() {
            [] => write!(f, "unexpected input")?,
            [only] => write!(f, "expected {:?}", only)?,
            [a, b] => write!(f, "expected either {:?} or {:?}", a, b)?,
            [init @ .., last] => {
                write!(f, "expected one of ")?;
                for e in init {
                    write!(f, "{:?}, ", e)?;
                }
                write!(f, "or {:?}", last)?;
            }
        }
        write!(f, " at offset {}", self.offset)
    }
}

impl std::error::Error for Failure {}

#[cfg(test)]
mod tests;
