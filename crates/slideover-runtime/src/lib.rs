#![forbid(unsafe_code)]

//! Cooperative single-threaded plumbing for the slideover widget:
//!
//! - [`Emitter`]: a publish/subscribe notification channel with RAII
//!   [`Subscription`] guards.
//! - [`Scheduler`]: a FIFO deferred-task queue modelling "run this on a
//!   later turn of the event loop".
//!
//! Everything here is `Rc`-based and meant for the host UI thread; none of
//! it blocks.

pub mod emitter;
pub mod scheduler;

pub use emitter::{Emitter, Subscription};
pub use scheduler::Scheduler;
