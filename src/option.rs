//! [`Either`] without information on the failure side

use crate::either::{Either, Left, Right};

/// Present (right) or absent (left)
pub type Maybe<A> = Either<(), A>;

pub fn some<A>(a: A) -> Maybe<A> {
    Right(a)
}

pub fn none<A>() -> Maybe<A> {
    Left(())
}

pub fn from_nullable<A>(a: Option<A>) -> Maybe<A> {
    match a {
        Some(a) => some(a),
        None => none(),
    }
}
