#![forbid(unsafe_code)]

//! FIFO deferred-task queue.
//!
//! A task handed to [`Scheduler::defer`] runs on a strictly later turn of
//! the event loop than the code that deferred it: the host dispatches its
//! current event fully, then calls [`Scheduler::run_until_idle`]. This is
//! the "zero-delay deferral" used to keep a panel's dismissal listeners
//! from seeing the very input event that opened the panel.
//!
//! # Invariants
//!
//! - Tasks run in FIFO order.
//! - A task deferred while the queue is draining runs in the same
//!   `run_until_idle` call, after everything queued before it.
//! - The queue borrow is never held while a task runs, so tasks may defer
//!   further tasks freely.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

type Task = Box<dyn FnOnce()>;

/// Cheap-clone handle to a shared deferred-task queue.
#[derive(Clone, Default)]
pub struct Scheduler {
    queue: Rc<RefCell<VecDeque<Task>>>,
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("pending", &self.queue.borrow().len())
            .finish()
    }
}

impl Scheduler {
    /// Create an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a task for the next turn of the event loop.
    pub fn defer(&self, task: impl FnOnce() + 'static) {
        let mut queue = self.queue.borrow_mut();
        queue.push_back(Box::new(task));
        tracing::trace!(pending = queue.len(), "task deferred");
    }

    /// Run queued tasks until the queue is empty, including tasks queued
    /// by tasks run in this call.
    pub fn run_until_idle(&self) {
        loop {
            let task = self.queue.borrow_mut().pop_front();
            match task {
                Some(task) => task(),
                None => break,
            }
        }
    }

    /// Number of tasks currently queued.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }
}
