//! The short-circuiting success/failure container

use log::trace;

use crate::must::Must;

mod future;

/// Either a failure `E` (left) or a success `A` (right)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[must_use = "an Either may be a failure which should be handled"]
pub enum Either<E, A> {
    Left(E),
    Right(A),
}

pub use Either::{Left, Right};

pub fn left<E, A>(e: E) -> Either<E, A> {
    Left(e)
}

pub fn right<E, A>(a: A) -> Either<E, A> {
    Right(a)
}

/// Collect a sequence into one result
///
/// Gives every success in order, or the first failure. Items after the first
/// failure are never pulled from the iterator.
pub fn all<E, A>(es: impl IntoIterator<Item = Either<E, A>>) -> Either<E, Vec<A>> {
    let mut out = Vec::new();

    for (idx, e) in es.into_iter().enumerate() {
        match e {
            Right(a) => out.push(a),
            Left(e) => {
                trace!("all stopped at failed item {}", idx);
                return Left(e);
            }
        }
    }

    Right(out)
}

impl<E, A> Either<E, A> {
    // {{{ Success side

    /// Continue with `f` if this is a success, `f` is not called on failure
    pub fn chain<B>(self, f: impl FnOnce(A) -> Either<E, B>) -> Either<E, B> {
        match self {
            Left(e) => Left(e),
            Right(a) => f(a),
        }
    }

    /// Like [`Either::chain`] where the step has a wider error type
    pub fn chain_into<F, B>(self, f: impl FnOnce(A) -> Either<F, B>) -> Either<F, B>
    where
        F: From<E>,
    {
        match self {
            Left(e) => Left(F::from(e)),
            Right(a) => f(a),
        }
    }

    pub fn map<B>(self, f: impl FnOnce(A) -> B) -> Either<E, B> {
        self.chain(|a| Right(f(a)))
    }

    // }}}

    // {{{ Failure side

    /// Continue with `f` if this is a failure, successes pass through
    pub fn chain_left<F>(self, f: impl FnOnce(E) -> Either<F, A>) -> Either<F, A> {
        match self {
            Left(e) => f(e),
            Right(a) => Right(a),
        }
    }

    pub fn map_left<F>(self, f: impl FnOnce(E) -> F) -> Either<F, A> {
        self.chain_left(|e| Left(f(e)))
    }

    // }}}

    /// Run exactly one of `f` (failure) or `g` (success)
    pub fn fold<F, B>(
        self,
        f: impl FnOnce(E) -> Either<F, B>,
        g: impl FnOnce(A) -> Either<F, B>,
    ) -> Either<F, B> {
        match self {
            Left(e) => f(e),
            Right(a) => g(a),
        }
    }

    /// The success, or a value made from the failure
    pub fn or_else(self, f: impl FnOnce(E) -> A) -> A {
        match self {
            Left(e) => f(e),
            Right(a) => a,
        }
    }

    pub fn or_null(self) -> Option<A> {
        match self {
            Left(_) => None,
            Right(a) => Some(a),
        }
    }

    /// Bring both sides to one type
    pub fn get_or_else<B>(self, f: impl FnOnce(A) -> B, g: impl FnOnce(E) -> B) -> B {
        self.map(f).or_else(g)
    }

    pub fn is_right(&self) -> bool {
        matches!(self, Right(_))
    }

    pub fn is_left(&self) -> bool {
        matches!(self, Left(_))
    }

    pub fn as_ref(&self) -> Either<&E, &A> {
        match self {
            Left(e) => Left(e),
            Right(a) => Right(a),
        }
    }

    /// Move into the accumulating model
    ///
    /// A success keeps its value with no errors, a failure becomes `or` with the
    /// failure as its only error.
    pub fn into_must(self, or: A) -> Must<E, A> {
        match self {
            Left(e) => Must::with_errors(or, vec![e]),
            Right(a) => Must::new(a),
        }
    }

    pub fn into_result(self) -> Result<A, E> {
        match self {
            Left(e) => Err(e),
            Right(a) => Ok(a),
        }
    }
}

impl<E, A> From<Result<A, E>> for Either<E, A> {
    fn from(r: Result<A, E>) -> Self {
        match r {
            Ok(a) => Right(a),
            Err(e) => Left(e),
        }
    }
}
