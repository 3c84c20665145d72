//! Typed result values that either stop at the first failure or keep going
//! and collect them
//!
//! * [`Either`](either::Either) short-circuits: the first failure is the only
//!   one a caller ever sees, and steps after it never run.
//! * [`EitherComp`](comp::EitherComp) builds a record field by field on top
//!   of `Either`, skipping every later step once one fails.
//! * [`Must`](must::Must) accumulates: it keeps a usable value and every
//!   failure met along the way.

extern crate console;
extern crate futures;
extern crate log;
extern crate serde;
extern crate thiserror;

pub mod comp;
pub mod either;
pub mod failure;
pub mod must;
pub mod namespace;
pub mod option;

pub use comp::EitherComp;
pub use either::{all, left, right, Either};
pub use failure::{fail, Failure};
pub use must::Must;
pub use option::Maybe;

/// Everything needed to write pipelines
pub mod prelude {
    pub use crate::comp::{empty, from_either, namespace, EitherComp, StepFuture};
    pub use crate::either::{all, left, right, Either, Left, Right};
    pub use crate::failure::{fail, Code, Diagnostics, Failure, HeadlineError, TraceMode};
    pub use crate::must::{Must, Step};
    pub use crate::namespace::{Key, Nil, Record};
    pub use crate::option::{from_nullable, none, some, Maybe};
}
