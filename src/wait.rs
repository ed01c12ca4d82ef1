use crate::{Error, Promise};
use std::{
    future::{Future, IntoFuture},
    pin::Pin,
    task::{Context, Poll},
};

/// Future returned by [`Promise::wait`]. Many `Wait`s may be pending on one
/// promise; each yields its own clone of the value.
///
/// # Examples
///
/// ```
/// use pacta::Promise;
/// use futures::executor::block_on;
/// use std::thread;
///
/// let p = Promise::<String>::new();
/// let consumer = p.clone();
/// let task1 = thread::spawn(move || block_on(async {
///     consumer.await.unwrap()
/// }));
/// p.resolve("Hi".into()).unwrap();
/// assert_eq!(task1.join().expect("The task1 thread has panicked."), "Hi");
/// ```
#[derive(Debug)]
pub struct Wait<T: 'static> {
    promise: Promise<T>,
}

impl<T: Clone + Send + 'static> Promise<T> {
    /// A future that completes with the resolved value, or with
    /// [`Error::ResolverDropped`] if it is polled after the promise's
    /// [`Resolver`](crate::Resolver) was dropped unresolved. Any clone of the
    /// promise may still resolve it afterwards; a later `Wait` then yields
    /// the value.
    pub fn wait(&self) -> Wait<T> {
        Wait {
            promise: self.clone(),
        }
    }
}

impl<T: Clone + Send + 'static> Future for Wait<T> {
    type Output = Result<T, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.promise.poll_value(cx.waker())
    }
}

impl<T: Clone + Send + 'static> IntoFuture for Promise<T> {
    type Output = Result<T, Error>;
    type IntoFuture = Wait<T>;

    fn into_future(self) -> Self::IntoFuture {
        Wait { promise: self }
    }
}
