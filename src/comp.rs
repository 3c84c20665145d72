//! Sequential record building that stops at the first failure
//!
//! An [`EitherComp`] is a deferred pipeline. Every `bind` schedules one step
//! that sees the record built so far and adds fields to it. Nothing runs until
//! [`EitherComp::finish`] is awaited, and once a step fails no later step is
//! ever called.
//!
//! ```
//! use forkpath::prelude::*;
//! use futures::{executor::block_on, FutureExt};
//!
//! forkpath::keys! { Base => "base", Doubled => "doubled" }
//!
//! let out = block_on(
//!     empty::<&str, ()>()
//!         .bind_flat(Base, |_| right(21))
//!         .bind(Doubled, |ns| async move { right(ns.get(Base) * 2) }.boxed_local())
//!         .finish(|ns| ns.take(Doubled)),
//! );
//!
//! assert_eq!(out, right(42));
//! ```

use std::future::Future;

use futures::{future::LocalBoxFuture, FutureExt};
use log::{debug, trace};

use crate::{
    either::Either,
    failure::Failure,
    namespace::{Cons, Key, Nil, Record, Swap},
};

/// A step run against the record, borrowing it while it runs
pub type StepFuture<'n, C, X, V> = LocalBoxFuture<'n, Either<Failure<C, X>, V>>;

/// Deferred builder of the record `NS`, failing with `Failure<C, X>`
#[must_use = "an EitherComp does nothing until it is finished"]
pub struct EitherComp<'f, C, X, NS> {
    inner: LocalBoxFuture<'f, Either<Failure<C, X>, NS>>,
}

/// A successful builder with no fields
pub fn empty<'f, C: 'f, X: 'f>() -> EitherComp<'f, C, X, Nil> {
    namespace(Nil)
}

/// A successful builder seeded with `ns`
pub fn namespace<'f, C: 'f, X: 'f, NS: Record + 'f>(ns: NS) -> EitherComp<'f, C, X, NS> {
    from_either(Either::Right(ns))
}

/// A builder seeded from an existing result, failures stay failed
pub fn from_either<'f, C: 'f, X: 'f, NS: Record + 'f>(
    e: Either<Failure<C, X>, NS>,
) -> EitherComp<'f, C, X, NS> {
    EitherComp::deferred(async move { e })
}

impl<'f, C: 'f, X: 'f, NS: Record + 'f> EitherComp<'f, C, X, NS> {
    fn deferred(fut: impl Future<Output = Either<Failure<C, X>, NS>> + 'f) -> Self {
        Self {
            inner: fut.boxed_local(),
        }
    }

    /// Schedule `f` after every step so far, skipping it once failed
    fn step<Out, Fut>(
        self,
        keys: Vec<&'static str>,
        f: impl FnOnce(NS) -> Fut + 'f,
    ) -> EitherComp<'f, C, X, Out>
    where
        Out: Record + 'f,
        Fut: Future<Output = Either<Failure<C, X>, Out>> + 'f,
    {
        let prior = self.inner;

        EitherComp::deferred(async move {
            let ns = prior.await;
            if ns.is_left() {
                trace!("Skipping {:?}, an earlier step failed", keys);
            } else {
                debug!("Binding {:?}", keys);
            }
            ns.chain_async(f).await
        })
    }

    /// Add field `K` from the async step `f`
    ///
    /// `f` is not called if an earlier step failed. If `f` fails the whole
    /// builder fails with its failure.
    pub fn bind<K, V, F>(self, key: K, f: F) -> EitherComp<'f, C, X, Cons<K, V, NS>>
    where
        K: Key + 'f,
        V: 'f,
        F: for<'n> FnOnce(&'n NS) -> StepFuture<'n, C, X, V> + 'f,
    {
        self.step(vec![K::NAME], move |ns| async move {
            let field = f(&ns).await;
            field.map(|v| ns.with(key, v))
        })
    }

    /// Add field `K` from the synchronous step `f`
    pub fn bind_flat<K, V, F>(self, key: K, f: F) -> EitherComp<'f, C, X, Cons<K, V, NS>>
    where
        K: Key + 'f,
        V: 'f,
        F: FnOnce(&NS) -> Either<Failure<C, X>, V> + 'f,
    {
        self.step(vec![K::NAME], move |ns| async move {
            let field = f(&ns);
            field.map(|v| ns.with(key, v))
        })
    }

    /// Add two fields from one step, both or neither
    pub fn bind2<K1, K2, V1, V2, F>(
        self,
        k1: K1,
        k2: K2,
        f: F,
    ) -> EitherComp<'f, C, X, Cons<K2, V2, Cons<K1, V1, NS>>>
    where
        K1: Key + 'f,
        K2: Key + 'f,
        V1: 'f,
        V2: 'f,
        F: for<'n> FnOnce(&'n NS) -> StepFuture<'n, C, X, (V1, V2)> + 'f,
    {
        self.step(vec![K1::NAME, K2::NAME], move |ns| async move {
            let fields = f(&ns).await;
            fields.map(|(v1, v2)| ns.with(k1, v1).with(k2, v2))
        })
    }

    /// Add three fields from one step, all or none
    #[allow(clippy::type_complexity)]
    pub fn bind3<K1, K2, K3, V1, V2, V3, F>(
        self,
        k1: K1,
        k2: K2,
        k3: K3,
        f: F,
    ) -> EitherComp<'f, C, X, Cons<K3, V3, Cons<K2, V2, Cons<K1, V1, NS>>>>
    where
        K1: Key + 'f,
        K2: Key + 'f,
        K3: Key + 'f,
        V1: 'f,
        V2: 'f,
        V3: 'f,
        F: for<'n> FnOnce(&'n NS) -> StepFuture<'n, C, X, (V1, V2, V3)> + 'f,
    {
        self.step(vec![K1::NAME, K2::NAME, K3::NAME], move |ns| async move {
            let fields = f(&ns).await;
            fields.map(|(v1, v2, v3)| ns.with(k1, v1).with(k2, v2).with(k3, v3))
        })
    }

    /// Overwrite the existing field `K` from the async step `f`
    ///
    /// The new value may have a different type than the one it replaces.
    pub fn rebind<K, I, V, F>(self, _key: K, f: F) -> EitherComp<'f, C, X, NS::Output>
    where
        K: Key + 'f,
        V: 'f,
        NS: Swap<K, I, V>,
        NS::Output: Record + 'f,
        F: for<'n> FnOnce(&'n NS) -> StepFuture<'n, C, X, V> + 'f,
    {
        self.step(vec![K::NAME], move |ns| async move {
            let field = f(&ns).await;
            field.map(|v| ns.swap(v))
        })
    }

    /// Overwrite the existing field `K` from the synchronous step `f`
    pub fn rebind_flat<K, I, V, F>(self, _key: K, f: F) -> EitherComp<'f, C, X, NS::Output>
    where
        K: Key + 'f,
        V: 'f,
        NS: Swap<K, I, V>,
        NS::Output: Record + 'f,
        F: FnOnce(&NS) -> Either<Failure<C, X>, V> + 'f,
    {
        self.step(vec![K::NAME], move |ns| async move {
            let field = f(&ns);
            field.map(|v| ns.swap(v))
        })
    }

    /// Run every scheduled step and turn the record into the final value
    pub async fn finish<B>(self, f: impl FnOnce(NS) -> B) -> Either<Failure<C, X>, B> {
        self.inner.await.map(f)
    }

    /// Run every scheduled step and hand back the record itself
    pub async fn resolve(self) -> Either<Failure<C, X>, NS> {
        self.inner.await
    }
}

impl<'f, C, X, NS> std::fmt::Debug for EitherComp<'f, C, X, NS> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EitherComp").finish_non_exhaustive()
    }
}
