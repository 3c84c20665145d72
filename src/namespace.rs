//! Statically typed, growing records for [`EitherComp`](crate::comp::EitherComp)
//!
//! A record is a chain of [`Cons`] cells ending in [`Nil`]. Every cell is
//! labelled by a zero sized key type, so looking a field up by key is
//! resolved by the compiler and a missing key is a type error.
//!
//! ```
//! use forkpath::namespace::{Nil, Record};
//!
//! forkpath::keys! { pub Name => "name", pub Age => "age" }
//!
//! let ns = Nil.with(Name, "ada").with(Age, 36);
//! assert_eq!(*ns.get(Age), 36);
//! assert_eq!(ns.keys(), vec!["name", "age"]);
//! ```

use std::{fmt::Debug, marker::PhantomData};

/// A field label
pub trait Key: Copy + Debug {
    const NAME: &'static str;
}

/// Declare key types
///
/// Each key is a unit struct carrying the name it is listed under.
#[macro_export]
macro_rules! keys {
    ($($vis:vis $name:ident => $tag:literal),+ $(,)?) => {
        $(
            #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
            $vis struct $name;

            impl $crate::namespace::Key for $name {
                const NAME: &'static str = $tag;
            }
        )+
    };
}

/// The empty record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Nil;

/// A record with field `K` of type `V` in front of the rest `T`
#[derive(Clone, PartialEq, Eq)]
pub struct Cons<K, V, T> {
    value: V,
    tail: T,
    key: PhantomData<K>,
}

/// Index proving the key sits in the head cell
#[derive(Debug)]
pub enum Here {}

/// Index proving the key sits somewhere in the tail
#[derive(Debug)]
pub struct There<I>(PhantomData<I>);

/// Records that hold a field labelled `K`
///
/// `I` is inferred, it only steers the compiler to the cell holding `K`.
pub trait Has<K, I> {
    type Value;

    fn field(&self) -> &Self::Value;
    fn into_field(self) -> Self::Value;
}

impl<K, V, T> Has<K, Here> for Cons<K, V, T> {
    type Value = V;

    fn field(&self) -> &V {
        &self.value
    }

    fn into_field(self) -> V {
        self.value
    }
}

impl<K, J, V, T, I> Has<K, There<I>> for Cons<J, V, T>
where
    T: Has<K, I>,
{
    type Value = T::Value;

    fn field(&self) -> &Self::Value {
        self.tail.field()
    }

    fn into_field(self) -> Self::Value {
        self.tail.into_field()
    }
}

/// Records whose field `K` can be overwritten with a value of type `W`
pub trait Swap<K, I, W> {
    type Output;

    fn swap(self, value: W) -> Self::Output;
}

impl<K, V, T, W> Swap<K, Here, W> for Cons<K, V, T> {
    type Output = Cons<K, W, T>;

    fn swap(self, value: W) -> Self::Output {
        Cons {
            value,
            tail: self.tail,
            key: PhantomData,
        }
    }
}

impl<K, J, V, T, I, W> Swap<K, There<I>, W> for Cons<J, V, T>
where
    T: Swap<K, I, W>,
{
    type Output = Cons<J, V, T::Output>;

    fn swap(self, value: W) -> Self::Output {
        Cons {
            value: self.value,
            tail: self.tail.swap(value),
            key: PhantomData,
        }
    }
}

/// Behaviour shared by every record
pub trait Record: Sized {
    /// Key names, oldest field first
    fn keys(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        self.collect_keys(&mut out);
        out
    }

    #[doc(hidden)]
    fn collect_keys(&self, out: &mut Vec<&'static str>);

    /// Add field `K`
    fn with<K: Key, V>(self, _key: K, value: V) -> Cons<K, V, Self> {
        Cons {
            value,
            tail: self,
            key: PhantomData,
        }
    }

    fn get<K, I>(&self, _key: K) -> &<Self as Has<K, I>>::Value
    where
        Self: Has<K, I>,
    {
        <Self as Has<K, I>>::field(self)
    }

    /// Take field `K` out of the record, dropping the rest
    fn take<K, I>(self, _key: K) -> <Self as Has<K, I>>::Value
    where
        Self: Has<K, I>,
    {
        <Self as Has<K, I>>::into_field(self)
    }

    /// Overwrite field `K`, possibly changing its type
    fn set<K, I, W>(self, _key: K, value: W) -> <Self as Swap<K, I, W>>::Output
    where
        Self: Swap<K, I, W>,
    {
        <Self as Swap<K, I, W>>::swap(self, value)
    }
}

impl Record for Nil {
    fn collect_keys(&self, _out: &mut Vec<&'static str>) {}
}

impl<K: Key, V, T: Record> Record for Cons<K, V, T> {
    fn collect_keys(&self, out: &mut Vec<&'static str>) {
        self.tail.collect_keys(out);
        out.push(K::NAME);
    }
}

impl<K: Key, V: Debug, T: Debug> Debug for Cons<K, V, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} <- {} = {:?}", self.tail, K::NAME, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::keys! { Left => "left", Right => "right", Total => "total" }

    #[test]
    fn fields_resolve_by_key() {
        let ns = Nil.with(Left, 2).with(Right, "three");

        assert_eq!(*ns.get(Left), 2);
        assert_eq!(*ns.get(Right), "three");
        assert_eq!(ns.keys(), vec!["left", "right"]);
    }

    #[test]
    fn set_replaces_value_and_type_in_place() {
        let ns = Nil.with(Left, 2).with(Right, 3).set(Left, "two");

        assert_eq!(*ns.get(Left), "two");
        assert_eq!(*ns.get(Right), 3);
        assert_eq!(ns.keys(), vec!["left", "right"]);
    }

    #[test]
    fn take_moves_the_field_out() {
        let ns = Nil.with(Total, vec![1, 2]).with(Left, 0);

        assert_eq!(ns.take(Total), vec![1, 2]);
    }

    #[test]
    fn debug_lists_fields_in_order() {
        let ns = Nil.with(Left, 1).with(Total, 'x');

        assert_eq!(format!("{:?}", ns), "Nil <- left = 1 <- total = 'x'");
    }
}
