//! Where promise callbacks run.
//!
//! A promise never runs a callback itself; it hands a [`Task`] to its
//! [`Scheduler`]. [`Inline`] runs the task on the calling thread before
//! `schedule` returns. [`TaskQueue`] holds it until the owner drains the
//! queue, which is how an external event loop or a test can control "later".
//!
//! ```
//! use pacta::{Promise, TaskQueue};
//! use std::sync::Arc;
//!
//! let queue = Arc::new(TaskQueue::new());
//! let p = Promise::of_in(1, queue.clone());
//! let q = p.map(|x| x + 1);
//!
//! assert_eq!(q.peek(), None);
//! queue.run_until_idle();
//! assert_eq!(q.peek(), Some(2));
//! ```
use std::{cell::RefCell, collections::VecDeque, fmt::Debug, sync::Mutex};

pub type Task = Box<dyn FnOnce() + Send + 'static>;

pub trait Scheduler: Send + Sync {
    fn schedule(&self, task: Task);
}

/// Runs every task on the calling thread before `schedule` returns.
///
/// Tasks scheduled by a task that is already running are queued and run,
/// in order, once it returns. Resolving a long chain of promises therefore
/// takes constant stack depth.
#[derive(Debug, Default, Clone, Copy)]
pub struct Inline;

thread_local! {
    // `Some` while an inline task is running on this thread.
    static INLINE: RefCell<Option<VecDeque<Task>>> = const { RefCell::new(None) };
}

/// Clears the thread's inline queue when the outermost task finishes, even
/// by unwinding.
struct Running;

impl Drop for Running {
    fn drop(&mut self) {
        let leftover = INLINE.try_with(|slot| slot.borrow_mut().take());
        drop(leftover);
    }
}

impl Scheduler for Inline {
    fn schedule(&self, task: Task) {
        let mut task = Some(task);
        let entered = INLINE.try_with(|slot| {
            let mut slot = slot.borrow_mut();
            match slot.as_mut() {
                Some(queue) => {
                    queue.extend(task.take());
                    false
                }
                None => {
                    *slot = Some(VecDeque::new());
                    true
                }
            }
        });
        match (entered, task) {
            (Ok(true), Some(task)) => {
                let _running = Running;
                task();
                while let Some(next) = INLINE
                    .try_with(|slot| slot.borrow_mut().as_mut().and_then(VecDeque::pop_front))
                    .ok()
                    .flatten()
                {
                    next();
                }
            }
            // Thread-local storage is gone while the thread shuts down.
            (Err(_), Some(task)) => task(),
            _ => {}
        }
    }
}

/// First-in first-out queue of deferred tasks.
#[derive(Default)]
pub struct TaskQueue {
    tasks: Mutex<VecDeque<Task>>,
}

impl Debug for TaskQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskQueue").field("len", &self.len()).finish()
    }
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tasks.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Runs the oldest queued task, if any. Returns whether a task ran.
    pub fn run_next(&self) -> bool {
        // The lock is released before the task runs: tasks schedule more tasks.
        let task = self.tasks.lock().unwrap().pop_front();
        match task {
            Some(task) => {
                task();
                true
            }
            None => false,
        }
    }

    /// Runs tasks until the queue is empty, including tasks queued while
    /// draining. Returns how many ran.
    pub fn run_until_idle(&self) -> usize {
        let mut ran = 0;
        while self.run_next() {
            ran += 1;
        }
        tracing::trace!(ran, "task queue idle");
        ran
    }
}

impl Scheduler for TaskQueue {
    fn schedule(&self, task: Task) {
        self.tasks.lock().unwrap().push_back(task);
    }
}
