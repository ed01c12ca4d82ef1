use crate::{
    scheduler::{Inline, Scheduler},
    Error,
};
use std::{
    fmt::Debug,
    sync::{Arc, Mutex},
    task::{Poll, Waker},
};

type Callback<T> = Box<dyn FnOnce(T) + Send + 'static>;

/// A value that is not known yet and gets resolved exactly once.
///
/// `Promise` is a handle: clones share the same state, so a producer can keep
/// one clone to resolve while consumers attach callbacks to others.
///
/// # Examples
///
/// ```
/// use pacta::Promise;
/// use std::sync::{Arc, Mutex};
///
/// let p = Promise::new();
/// let seen = Arc::new(Mutex::new(vec![]));
/// for i in 0..3 {
///     let seen = seen.clone();
///     p.register(move |x: i32| seen.lock().unwrap().push(x + i));
/// }
/// p.resolve(10).unwrap();
/// assert_eq!(*seen.lock().unwrap(), vec![10, 11, 12]);
/// ```
pub struct Promise<T: 'static> {
    inner: Arc<Mutex<Inner<T>>>,
}

struct Inner<T: 'static> {
    state: State<T>,
    callbacks: Vec<Callback<T>>,
    wakers: Vec<Waker>,
    // Set while `resolve` is handing out queued callbacks. Registrations that
    // arrive meanwhile join the queue so they run after the earlier ones.
    draining: bool,
    abandoned: bool,
    scheduler: Arc<dyn Scheduler>,
}

impl<T: 'static> Drop for Inner<T> {
    fn drop(&mut self) {
        // Callbacks own the promises derived from this one. Releasing them on
        // the inline scheduler unwinds a long unresolved chain without
        // recursing once per link.
        let callbacks = std::mem::take(&mut self.callbacks);
        if !callbacks.is_empty() {
            Inline.schedule(Box::new(move || drop(callbacks)));
        }
    }
}

#[derive(Debug)]
enum State<T> {
    Pending,
    Resolved(T),
}

impl<T: 'static> Clone for Promise<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Debug + 'static> Debug for Promise<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock().unwrap();
        f.debug_struct("Promise")
            .field("state", &inner.state)
            .field("callbacks", &inner.callbacks.len())
            .finish()
    }
}

impl<T: 'static> Default for Promise<T> {
    fn default() -> Self {
        Self::with_state(State::Pending, Arc::new(Inline))
    }
}

impl<T: 'static> Promise<T> {
    fn with_state(state: State<T>, scheduler: Arc<dyn Scheduler>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                state,
                callbacks: vec![],
                wakers: vec![],
                draining: false,
                abandoned: false,
                scheduler,
            })),
        }
    }

    /// A pending promise whose callbacks run inline.
    pub fn new() -> Self {
        Self::default()
    }

    /// A pending promise whose callbacks run on `scheduler`. Promises derived
    /// from it through combinators share the scheduler.
    pub fn new_in(scheduler: Arc<dyn Scheduler>) -> Self {
        Self::with_state(State::Pending, scheduler)
    }

    /// A promise that is already resolved with `value`.
    pub fn of(value: T) -> Self {
        Self::of_in(value, Arc::new(Inline))
    }

    pub fn of_in(value: T, scheduler: Arc<dyn Scheduler>) -> Self {
        Self::with_state(State::Resolved(value), scheduler)
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.inner.lock().unwrap().state, State::Resolved(_))
    }

    pub(crate) fn scheduler(&self) -> Arc<dyn Scheduler> {
        self.inner.lock().unwrap().scheduler.clone()
    }

    /// Marks a pending promise as given up on by its producer and wakes its
    /// waiters. Callbacks stay queued.
    pub(crate) fn abandon(&self) {
        let wakers = {
            let mut inner = self.inner.lock().unwrap();
            if matches!(inner.state, State::Resolved(_)) {
                return;
            }
            inner.abandoned = true;
            std::mem::take(&mut inner.wakers)
        };
        for waker in wakers {
            waker.wake()
        }
    }
}

impl<T: Clone + Send + 'static> Promise<T> {
    /// Resolves a pending promise and runs its queued callbacks in the order
    /// they were registered.
    ///
    /// A promise resolves once. Later calls return [`Error::AlreadyResolved`]
    /// and leave the first value in place.
    ///
    /// ```
    /// use pacta::{Error, Promise};
    ///
    /// let p = Promise::new();
    /// assert_eq!(p.resolve("foo"), Ok(()));
    /// assert_eq!(p.resolve("bar"), Err(Error::AlreadyResolved));
    /// assert_eq!(p.peek(), Some("foo"));
    /// ```
    pub fn resolve(&self, value: T) -> Result<(), Error> {
        let wakers = {
            let mut inner = self.inner.lock().unwrap();
            if let State::Resolved(_) = inner.state {
                tracing::debug!("rejected second resolution of a promise");
                return Err(Error::AlreadyResolved);
            }
            inner.state = State::Resolved(value.clone());
            inner.draining = true;
            std::mem::take(&mut inner.wakers)
        };
        for waker in wakers {
            waker.wake()
        }
        self.drain(&value);
        Ok(())
    }

    fn drain(&self, value: &T) {
        loop {
            let (callbacks, scheduler) = {
                let mut inner = self.inner.lock().unwrap();
                if inner.callbacks.is_empty() {
                    inner.draining = false;
                    return;
                }
                (std::mem::take(&mut inner.callbacks), inner.scheduler.clone())
            };
            tracing::trace!(callbacks = callbacks.len(), "dispatching promise callbacks");
            for callback in callbacks {
                let value = value.clone();
                scheduler.schedule(Box::new(move || callback(value)));
            }
        }
    }

    /// Runs `f` with the resolved value, exactly once.
    ///
    /// On a pending promise `f` waits in the queue. On a resolved promise it
    /// is handed to the scheduler right away.
    pub fn register<F>(&self, f: F)
    where
        F: FnOnce(T) + Send + 'static,
    {
        let mut inner = self.inner.lock().unwrap();
        let late = match &inner.state {
            State::Resolved(value) if !inner.draining => Some(value.clone()),
            _ => None,
        };
        match late {
            Some(value) => {
                let scheduler = inner.scheduler.clone();
                drop(inner);
                tracing::trace!("callback registered on a resolved promise");
                scheduler.schedule(Box::new(move || f(value)));
            }
            None => inner.callbacks.push(Box::new(f)),
        }
    }

    /// The resolved value, if there is one yet.
    pub fn peek(&self) -> Option<T> {
        match &self.inner.lock().unwrap().state {
            State::Resolved(value) => Some(value.clone()),
            State::Pending => None,
        }
    }

    pub(crate) fn poll_value(&self, waker: &Waker) -> Poll<Result<T, Error>> {
        let mut guard = self.inner.lock().unwrap();
        let inner = &mut *guard;
        match inner.state {
            State::Resolved(ref value) => Poll::Ready(Ok(value.clone())),
            State::Pending if inner.abandoned => Poll::Ready(Err(Error::ResolverDropped)),
            State::Pending => {
                if !inner.wakers.iter().any(|w| w.will_wake(waker)) {
                    inner.wakers.push(waker.clone());
                }
                Poll::Pending
            }
        }
    }
}
