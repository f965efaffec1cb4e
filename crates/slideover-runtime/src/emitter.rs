#![forbid(unsafe_code)]

//! Publish/subscribe notification channel.
//!
//! # Invariants
//!
//! 1. Subscribers are notified in registration order.
//! 2. Dropping a [`Subscription`] removes the callback before the next
//!    emission.
//! 3. A subscriber that unsubscribes another (or itself) mid-emission
//!    suppresses the removed callback for the rest of that emission.
//! 4. A subscriber added mid-emission first fires on the next emission.
//!
//! # Failure Modes
//!
//! - Emitting with no subscribers is a no-op.
//! - A `Subscription` outliving its `Emitter` is inert; dropping it does
//!   nothing.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

struct EmitterInner<T> {
    next_id: u64,
    subscribers: Vec<(u64, Rc<dyn Fn(&T)>)>,
}

/// Single-threaded notification channel carrying values of type `T`.
///
/// Clones share the same subscriber list.
pub struct Emitter<T> {
    inner: Rc<RefCell<EmitterInner<T>>>,
}

impl<T> Clone for Emitter<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: 'static> Default for Emitter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Emitter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emitter")
            .field("subscribers", &self.inner.borrow().subscribers.len())
            .finish()
    }
}

impl<T: 'static> Emitter<T> {
    /// Create a channel with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(EmitterInner {
                next_id: 1,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Register a callback. The callback fires on every emission until
    /// the returned [`Subscription`] is dropped.
    #[must_use = "dropping the Subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.subscribers.push((id, Rc::new(callback)));
            id
        };

        let weak: Weak<RefCell<EmitterInner<T>>> = Rc::downgrade(&self.inner);
        Subscription {
            cleanup: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.borrow_mut().subscribers.retain(|(sid, _)| *sid != id);
                }
            })),
        }
    }

    /// Notify all current subscribers.
    pub fn emit(&self, value: &T) {
        // Snapshot so callbacks can subscribe/unsubscribe freely.
        let snapshot: Vec<(u64, Rc<dyn Fn(&T)>)> = self
            .inner
            .borrow()
            .subscribers
            .iter()
            .map(|(id, cb)| (*id, Rc::clone(cb)))
            .collect();

        for (id, callback) in snapshot {
            let alive = self
                .inner
                .borrow()
                .subscribers
                .iter()
                .any(|(sid, _)| *sid == id);
            if alive {
                callback(value);
            }
        }
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }
}

/// RAII guard for a subscription; dropping it unsubscribes.
pub struct Subscription {
    cleanup: Option<Box<dyn FnOnce()>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish()
    }
}
