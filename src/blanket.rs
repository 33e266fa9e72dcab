use super::*;

impl<'a, 'b, I, P> Parser<'a, I> for &'b P
where
    I: Input + ?Sized,
    P: Parser<'a, I> + ?Sized,
{
    type Output = P::Output;

    #[inline]
    fn parse_at(&self, input: &'a I, offset: usize) -> ParseResult<P::Output> {
        (**self).parse_at(input, offset)
    }
}

impl<'a, I, P> Parser<'a, I> for Box<P>
where
    I: Input + ?Sized,
    P: Parser<'a, I> + ?Sized,
{
    type Output = P::Output;

    #[inline]
    fn parse_at(&self, input: &'a I, offset: usize) -> ParseResult<P::Output> {
        (**self).parse_at(input, offset)
    }
}

impl<'a, I, P> Parser<'a, I> for Rc<P>
where
    I: Input + ?Sized,
    P: Parser<'a, I> + ?Sized,
{
    type Output = P::Output;

    #[inline]
    fn parse_at(&self, input: &'a I, offset: usize) -> ParseResult<P::Output> {
        (**self).parse_at(input, offset)
    }
}

impl<'a, I, P> Parser<'a, I> for Arc<P>
where
    I: Input + ?Sized,
    P: Parser<'a, I> + ?Sized,
{
    type Output = P::Output;

    #[inline]
    fn parse_at(&self, input: &'a I, offset: usize) -> ParseResult<P::Output> {
        (**self).parse_at(input, offset)
    }
}
