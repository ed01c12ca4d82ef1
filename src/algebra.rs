//! Semigroups and monoids, the capability [`Promise::concat`](crate::Promise::concat)
//! and [`Promise::empty`](crate::Promise::empty) are built on.
//!
//! The empty value is chosen by type, never read off an instance:
//!
//! ```
//! use pacta::{Monoid, Semigroup};
//!
//! assert_eq!(Vec::<i32>::empty(), Vec::<i32>::new());
//! assert_eq!(String::empty(), "");
//! assert_eq!(vec![1].combine(vec![2, 3]), vec![1, 2, 3]);
//! assert_eq!(String::from("foo").combine("bar".into()), "foobar");
//! ```

/// A type with an associative `combine`:
/// `a.combine(b).combine(c) == a.combine(b.combine(c))`.
pub trait Semigroup {
    fn combine(self, other: Self) -> Self;
}

/// A semigroup with an identity element:
/// `a.combine(Self::empty()) == a == Self::empty().combine(a)`.
pub trait Monoid: Semigroup {
    fn empty() -> Self;
}

impl<A> Semigroup for Vec<A> {
    fn combine(mut self, other: Self) -> Self {
        self.extend(other);
        self
    }
}

impl<A> Monoid for Vec<A> {
    fn empty() -> Self {
        Vec::new()
    }
}

impl Semigroup for String {
    fn combine(mut self, other: Self) -> Self {
        self.push_str(&other);
        self
    }
}

impl Monoid for String {
    fn empty() -> Self {
        String::new()
    }
}
