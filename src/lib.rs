//! # pacta
//!
//! A deferred value that is resolved exactly once by whoever holds it, and a
//! set of combinators that compose such values without callback bookkeeping.
//!
//! A [`Promise`] starts pending. Consumers attach callbacks (directly with
//! [`Promise::register`] or through a combinator such as [`Promise::map`]) at
//! any time, before or after resolution; each callback runs exactly once with
//! the resolved value.
//!
//! ```
//! use pacta::Promise;
//! use std::{thread, time::Duration};
//!
//! let p = Promise::<String>::new();
//! let shouted = p.map(|x| x + "!");
//!
//! let producer = p.clone();
//! thread::spawn(move || {
//!     thread::sleep(Duration::from_millis(10));
//!     producer.resolve("foo".into()).unwrap();
//! })
//! .join()
//! .unwrap();
//!
//! assert_eq!(shouted.peek(), Some("foo!".to_string()));
//! ```
//!
//! Combinators follow the usual algebraic laws:
//!
//! - functor: [`Promise::map`]
//! - monad: [`Promise::chain`]
//! - applicative: [`Promise::of`], [`Promise::ap`]
//! - semigroup/monoid: [`Promise::concat`], [`Promise::empty`]
//!
//! plus the list helpers [`Promise::conjoin`], [`Promise::append`],
//! [`Promise::spread`], [`Promise::reduce`] and [`Promise::fold`].

pub mod algebra;
mod combinators;
pub mod pair;
mod promise;
pub mod scheduler;
mod wait;

pub use algebra::{Monoid, Semigroup};
pub use combinators::{Splice, Spread};
pub use pair::Resolver;
pub use promise::Promise;
pub use scheduler::{Inline, Scheduler, Task, TaskQueue};
pub use wait::Wait;

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("promise was already resolved")]
    AlreadyResolved,
    #[error("cannot reduce an empty sequence without an initial value")]
    EmptyReduce,
    #[error("resolver dropped before resolving")]
    ResolverDropped,
    #[error("cannot spread {got} values over {expected} arguments")]
    Arity { expected: usize, got: usize },
}
