//! Combinators over [`Promise`].
//!
//! Each combinator returns a new pending promise and drives it purely through
//! [`Promise::register`] on its sources and [`Promise::resolve`] on the result,
//! on the scheduler of the promise it was derived from. Nothing here polls.
use crate::{
    algebra::{Monoid, Semigroup},
    Error, Promise,
};
use serde_json::Value;

/// Resolves a promise owned by a combinator. A caller holding a clone of the
/// result may have resolved it first, in which case their value stands.
fn settle<T: Clone + Send + 'static>(target: &Promise<T>, value: T) {
    let _ = target.resolve(value);
}

impl<T: Clone + Send + 'static> Promise<T> {
    /// Applies `f` to the value once it arrives.
    ///
    /// ```
    /// use pacta::Promise;
    ///
    /// let p = Promise::new();
    /// let q = p.map(|x: &str| format!("{x}!"));
    /// p.resolve("foo").unwrap();
    /// assert_eq!(q.peek().as_deref(), Some("foo!"));
    /// ```
    pub fn map<U, F>(&self, f: F) -> Promise<U>
    where
        U: Clone + Send + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        let out = Promise::new_in(self.scheduler());
        let target = out.clone();
        self.register(move |x| settle(&target, f(x)));
        out
    }

    /// Feeds the value to `f` and resolves with whatever the promise returned
    /// by `f` resolves to, whenever that happens.
    pub fn chain<U, F>(&self, f: F) -> Promise<U>
    where
        U: Clone + Send + 'static,
        F: FnOnce(T) -> Promise<U> + Send + 'static,
    {
        let out = Promise::new_in(self.scheduler());
        let target = out.clone();
        self.register(move |x| f(x).register(move |y| settle(&target, y)));
        out
    }

    /// Resolves with `f(a, b)` once both `self` and `other` have resolved, in
    /// either order.
    fn join_with<U, V, F>(&self, other: &Promise<U>, f: F) -> Promise<V>
    where
        U: Clone + Send + 'static,
        V: Clone + Send + 'static,
        F: FnOnce(T, U) -> V + Send + 'static,
    {
        let out = Promise::new_in(self.scheduler());
        let (target, other) = (out.clone(), other.clone());
        self.register(move |a| other.register(move |b| settle(&target, f(a, b))));
        out
    }

    /// Collects both values into one sequence. Sequences are spliced in, one
    /// level deep; single values are pushed as they are.
    ///
    /// ```
    /// use pacta::Promise;
    /// use serde_json::json;
    ///
    /// let p = Promise::of(json!("foo")).conjoin(&Promise::of(json!([2, 3])));
    /// assert_eq!(p.peek(), Some(vec![json!("foo"), json!(2), json!(3)]));
    /// ```
    pub fn conjoin<U, I>(&self, other: &Promise<U>) -> Promise<Vec<I>>
    where
        T: Splice<I>,
        U: Splice<I> + Clone + Send + 'static,
        I: Clone + Send + 'static,
    {
        self.join_with(other, |a, b| {
            let mut items = Vec::new();
            a.splice_into(&mut items);
            b.splice_into(&mut items);
            items
        })
    }

    /// Calls `f` with the elements of a tuple, array or `Vec` as separate
    /// arguments. A `Vec` is checked against the arity of `f` once it arrives,
    /// so spreading one resolves to a `Result`.
    ///
    /// ```
    /// use pacta::{Error, Promise};
    ///
    /// let p = Promise::of([1, 2, 3]).spread(|x: i32, y: i32, z: i32| x + y + z);
    /// assert_eq!(p.peek(), Some(6));
    ///
    /// let p = Promise::of(vec![1, 2, 3]).spread(|x: i32, y: i32| x + y);
    /// assert_eq!(p.peek(), Some(Err(Error::Arity { expected: 2, got: 3 })));
    /// ```
    pub fn spread<F, Args>(&self, f: F) -> Promise<<T as Spread<F, Args>>::Output>
    where
        T: Spread<F, Args>,
        F: Send + 'static,
        <T as Spread<F, Args>>::Output: Clone + Send + 'static,
    {
        self.map(move |args| args.spread(f))
    }
}

impl<F: Clone + Send + 'static> Promise<F> {
    /// Applies the function this promise resolves to, to the value `arg`
    /// resolves to.
    ///
    /// ```
    /// use pacta::Promise;
    ///
    /// let f = Promise::of(|x: i32| x * 2);
    /// assert_eq!(f.ap(&Promise::of(21)).peek(), Some(42));
    /// ```
    pub fn ap<A, B>(&self, arg: &Promise<A>) -> Promise<B>
    where
        F: FnOnce(A) -> B,
        A: Clone + Send + 'static,
        B: Clone + Send + 'static,
    {
        self.join_with(arg, |f, a| f(a))
    }
}

impl<T: Semigroup + Clone + Send + 'static> Promise<T> {
    pub fn concat(&self, other: &Promise<T>) -> Promise<T> {
        self.join_with(other, Semigroup::combine)
    }
}

impl<T: Monoid + Clone + Send + 'static> Promise<T> {
    /// A resolved promise holding the identity of `T`'s [`Monoid`].
    pub fn empty(&self) -> Promise<T> {
        Promise::of_in(T::empty(), self.scheduler())
    }
}

impl<A: Clone + Send + 'static> Promise<Vec<A>> {
    /// Pushes the value of `other` onto the sequence as one element.
    pub fn append(&self, other: &Promise<A>) -> Promise<Vec<A>> {
        self.join_with(other, |mut items, item| {
            items.push(item);
            items
        })
    }

    /// Left fold over the sequence. Without an `initial` value the first
    /// element seeds the fold, and an empty sequence resolves to
    /// [`Error::EmptyReduce`].
    ///
    /// ```
    /// use pacta::{Error, Promise};
    ///
    /// let sum = Promise::of(vec![1, 2, 3]).reduce(|a, e| a + e, Some(0));
    /// assert_eq!(sum.peek(), Some(Ok(6)));
    ///
    /// let none = Promise::of(Vec::<i32>::new()).reduce(|a, e| a + e, None);
    /// assert_eq!(none.peek(), Some(Err(Error::EmptyReduce)));
    /// ```
    pub fn reduce<F>(&self, f: F, initial: Option<A>) -> Promise<Result<A, Error>>
    where
        F: FnMut(A, A) -> A + Send + 'static,
    {
        self.map(move |items: Vec<A>| -> Result<A, Error> {
            let mut items = items.into_iter();
            let seed = match initial {
                Some(seed) => seed,
                None => items.next().ok_or(Error::EmptyReduce)?,
            };
            Ok(items.fold(seed, f))
        })
    }

    /// Left fold into an accumulator of another type.
    pub fn fold<B, F>(&self, init: B, f: F) -> Promise<B>
    where
        B: Clone + Send + 'static,
        F: FnMut(B, A) -> B + Send + 'static,
    {
        self.map(move |items| items.into_iter().fold(init, f))
    }
}

/// How a value lands in the sequence built by [`Promise::conjoin`].
pub trait Splice<I> {
    fn splice_into(self, out: &mut Vec<I>);
}

impl<I> Splice<I> for Vec<I> {
    fn splice_into(self, out: &mut Vec<I>) {
        out.extend(self)
    }
}

impl Splice<Value> for Value {
    fn splice_into(self, out: &mut Vec<Value>) {
        match self {
            Value::Array(items) => out.extend(items),
            other => out.push(other),
        }
    }
}

macro_rules! splice_scalar {
    ($($t:ty),* $(,)?) => {
        $(
            impl Splice<$t> for $t {
                fn splice_into(self, out: &mut Vec<$t>) {
                    out.push(self)
                }
            }
        )*
    };
}

splice_scalar!(
    String,
    &'static str,
    char,
    bool,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
);

/// A sequence that can be unpacked into the arguments of `F`. `Args` is the
/// tuple of argument types, which lets one sequence type fit functions of
/// several arities.
pub trait Spread<F, Args> {
    type Output;
    fn spread(self, f: F) -> Self::Output;
}

macro_rules! spread_tuple {
    ($($t:ident $v:ident),+) => {
        impl<F, R, $($t),+> Spread<F, ($($t,)+)> for ($($t,)+)
        where
            F: FnOnce($($t),+) -> R,
        {
            type Output = R;
            fn spread(self, f: F) -> R {
                let ($($v,)+) = self;
                f($($v),+)
            }
        }
    };
}

spread_tuple!(A a);
spread_tuple!(A a, B b);
spread_tuple!(A a, B b, C c);
spread_tuple!(A a, B b, C c, D d);
spread_tuple!(A a, B b, C c, D d, E e);
spread_tuple!(A a, B b, C c, D d, E e, G g);

macro_rules! spread_seq {
    (@elem $v:ident) => { A };
    ($n:literal; $($v:ident),+) => {
        impl<F, R, A> Spread<F, ($(spread_seq!(@elem $v),)+)> for [A; $n]
        where
            F: FnOnce($(spread_seq!(@elem $v)),+) -> R,
        {
            type Output = R;
            fn spread(self, f: F) -> R {
                let [$($v),+] = self;
                f($($v),+)
            }
        }

        impl<F, R, A> Spread<F, ($(spread_seq!(@elem $v),)+)> for Vec<A>
        where
            F: FnOnce($(spread_seq!(@elem $v)),+) -> R,
        {
            type Output = Result<R, Error>;
            fn spread(self, f: F) -> Result<R, Error> {
                let [$($v),+]: [A; $n] = self.try_into().map_err(|rest: Vec<A>| Error::Arity {
                    expected: $n,
                    got: rest.len(),
                })?;
                Ok(f($($v),+))
            }
        }
    };
}

spread_seq!(1; a);
spread_seq!(2; a, b);
spread_seq!(3; a, b, c);
spread_seq!(4; a, b, c, d);
spread_seq!(5; a, b, c, d, e);
spread_seq!(6; a, b, c, d, e, g);
