//! A producer handle that can resolve its promise at most once.
//!
//! [`Resolver::resolve`] takes `self`, so a second resolution through the same
//! resolver does not compile. Dropping a resolver that never resolved makes
//! any [`Wait`](crate::Wait) polled while the promise is still pending finish
//! with [`Error::ResolverDropped`]: the resolver was dropped. Other handles on
//! the promise can still resolve it.
use crate::{Error, Promise, Scheduler};
use std::sync::Arc;

/// # Examples
///
/// ```
/// use pacta::Resolver;
/// use futures::executor::block_on;
/// use std::thread;
/// let (resolver, promise) = Resolver::<String>::new();
///
/// let task1 = thread::spawn(move || block_on(async {
///     promise.wait().await
/// }));
/// resolver.resolve("Hi".into()).unwrap();
/// assert_eq!(task1.join().expect("The task1 thread has panicked."), Ok(String::from("Hi")));
/// ```
#[derive(Debug)]
pub struct Resolver<T: Clone + Send + 'static> {
    promise: Promise<T>,
}

impl<T: Clone + Send + 'static> Resolver<T> {
    pub fn new() -> (Self, Promise<T>) {
        Self::from_promise(Promise::new())
    }

    pub fn new_in(scheduler: Arc<dyn Scheduler>) -> (Self, Promise<T>) {
        Self::from_promise(Promise::new_in(scheduler))
    }

    fn from_promise(promise: Promise<T>) -> (Self, Promise<T>) {
        (
            Self {
                promise: promise.clone(),
            },
            promise,
        )
    }

    /// Fails only if some other handle resolved the promise first.
    pub fn resolve(self, value: T) -> Result<(), Error> {
        self.promise.resolve(value)
    }
}

impl<T: Clone + Send + 'static> Promise<T> {
    /// A pending promise along with its [`Resolver`].
    pub fn pair() -> (Resolver<T>, Promise<T>) {
        Resolver::new()
    }
}

impl<T: Clone + Send + 'static> Drop for Resolver<T> {
    /// If this is an unresolved resolver, wake the waiters with an error.
    fn drop(&mut self) {
        if !self.promise.is_resolved() {
            tracing::warn!("resolver dropped before resolving its promise");
            self.promise.abandon();
        }
    }
}
