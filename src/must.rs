//! The error accumulating container
//!
//! A [`Must`] always carries a usable value next to every error collected so
//! far. Steps are written either as ordinary fallible operations returning an
//! [`Either`], or as further accumulating computations returning a [`Must`].

use log::trace;

use crate::either::{Either, Left, Right};

/// What a step hands back to [`Must`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step<E, A> {
    /// A fallible step, its failure is appended
    Either(Either<E, A>),

    /// An accumulating step, its errors are appended and its value adopted
    Must(Must<E, A>),
}

impl<E, A> From<Either<E, A>> for Step<E, A> {
    fn from(e: Either<E, A>) -> Self {
        Step::Either(e)
    }
}

impl<E, A> From<Must<E, A>> for Step<E, A> {
    fn from(m: Must<E, A>) -> Self {
        Step::Must(m)
    }
}

/// A best effort value together with every error met producing it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Must<E, A> {
    value: A,
    errors: Vec<E>,
}

impl<E, A> Must<E, A> {
    pub fn new(value: A) -> Self {
        Self {
            value,
            errors: Vec::new(),
        }
    }

    pub fn with_errors(value: A, errors: Vec<E>) -> Self {
        Self { value, errors }
    }

    fn push(mut self, error: E) -> Self {
        self.errors.push(error);
        trace!("Must collected error #{}", self.errors.len());
        self
    }

    fn extend(mut self, errors: Vec<E>) -> Self {
        self.errors.extend(errors);
        self
    }

    /// Run `f` on the current value
    ///
    /// On failure the current value is kept and the error appended.
    pub fn chain<S>(self, f: impl FnOnce(&A) -> S) -> Must<E, A>
    where
        S: Into<Step<E, A>>,
    {
        match f(&self.value).into() {
            Step::Either(Right(b)) => Must::with_errors(b, self.errors),
            Step::Either(Left(e)) => self.push(e),
            Step::Must(m) => Must::with_errors(m.value, self.errors).extend(m.errors),
        }
    }

    /// Like [`Must::chain`], except a failed step leaves `or` as the value
    pub fn chain_or<B, S>(self, f: impl FnOnce(A) -> S, or: B) -> Must<E, B>
    where
        S: Into<Step<E, B>>,
    {
        let Must { value, errors } = self;

        match f(value).into() {
            Step::Either(Right(b)) => Must::with_errors(b, errors),
            Step::Either(Left(e)) => Must::with_errors(or, errors).push(e),
            Step::Must(m) => Must::with_errors(m.value, errors).extend(m.errors),
        }
    }

    pub fn map<B>(self, f: impl FnOnce(A) -> B) -> Must<E, B> {
        Must {
            value: f(self.value),
            errors: self.errors,
        }
    }

    /// Attempt recovery from everything collected so far
    ///
    /// A successful recovery clears the errors. A failed one appends its error,
    /// keeping the current value.
    pub fn chain_left<S>(self, f: impl FnOnce(&[E]) -> S) -> Must<E, A>
    where
        S: Into<Step<E, A>>,
    {
        match f(self.errors.as_slice()).into() {
            Step::Either(Right(b)) => Must::new(b),
            Step::Either(Left(e)) => self.push(e),
            Step::Must(m) => Must::with_errors(m.value, self.errors).extend(m.errors),
        }
    }

    /// Like [`Must::chain_left`], except a failed recovery leaves `or` as the value
    pub fn chain_left_or<B, S>(self, f: impl FnOnce(&[E]) -> S, or: B) -> Must<E, B>
    where
        S: Into<Step<E, B>>,
    {
        let step = f(self.errors.as_slice()).into();

        match step {
            Step::Either(Right(b)) => Must::new(b),
            Step::Either(Left(e)) => Must::with_errors(or, self.errors).push(e),
            Step::Must(m) => Must::with_errors(m.value, self.errors).extend(m.errors),
        }
    }

    /// Rewrite the whole error list, the value is untouched
    pub fn map_left<F>(self, f: impl FnOnce(Vec<E>) -> Vec<F>) -> Must<F, A> {
        Must {
            value: self.value,
            errors: f(self.errors),
        }
    }

    pub fn get(&self) -> &A {
        &self.value
    }

    pub fn errors(&self) -> &[E] {
        &self.errors
    }

    pub fn into_parts(self) -> (A, Vec<E>) {
        (self.value, self.errors)
    }

    /// Back to the short-circuiting model: the value if nothing went wrong,
    /// otherwise every collected error
    pub fn into_either(self) -> Either<Vec<E>, A> {
        if self.errors.is_empty() {
            Right(self.value)
        } else {
            Left(self.errors)
        }
    }
}
