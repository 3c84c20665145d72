//! Async counterparts of the [`Either`] combinators
//!
//! The step future is only created, and so only polled, when the step applies.
//! A failed value resolves straight away without touching the success steps.

use std::future::Future;

use super::*;

impl<E, A> Either<E, A> {
    pub async fn chain_async<B, Fut>(self, f: impl FnOnce(A) -> Fut) -> Either<E, B>
    where
        Fut: Future<Output = Either<E, B>>,
    {
        match self {
            Left(e) => Left(e),
            Right(a) => f(a).await,
        }
    }

    pub async fn map_async<B, Fut>(self, f: impl FnOnce(A) -> Fut) -> Either<E, B>
    where
        Fut: Future<Output = B>,
    {
        self.chain_async(|a| async move { Right(f(a).await) }).await
    }

    pub async fn chain_left_async<F, Fut>(self, f: impl FnOnce(E) -> Fut) -> Either<F, A>
    where
        Fut: Future<Output = Either<F, A>>,
    {
        match self {
            Left(e) => f(e).await,
            Right(a) => Right(a),
        }
    }

    pub async fn map_left_async<F, Fut>(self, f: impl FnOnce(E) -> Fut) -> Either<F, A>
    where
        Fut: Future<Output = F>,
    {
        self.chain_left_async(|e| async move { Left(f(e).await) })
            .await
    }

    pub async fn fold_async<F, B, FutL, FutR>(
        self,
        f: impl FnOnce(E) -> FutL,
        g: impl FnOnce(A) -> FutR,
    ) -> Either<F, B>
    where
        FutL: Future<Output = Either<F, B>>,
        FutR: Future<Output = Either<F, B>>,
    {
        match self {
            Left(e) => f(e).await,
            Right(a) => g(a).await,
        }
    }
}
