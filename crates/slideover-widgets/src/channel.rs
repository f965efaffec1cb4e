#![forbid(unsafe_code)]

//! External open/close request channel.
//!
//! Code outside the widget (a toolbar button, a keyboard shortcut layer)
//! holds a [`SidebarChannel`] and calls [`request_open`](SidebarChannel::request_open)
//! or [`request_close`](SidebarChannel::request_close); a connected
//! [`Sidebar`](crate::Sidebar) consumes each notification at most once and
//! dedupes it against already-applied state.

use slideover_runtime::{Emitter, Subscription};

/// Two one-shot-per-call request streams feeding the sidebar.
#[derive(Clone, Debug, Default)]
pub struct SidebarChannel {
    open_requests: Emitter<()>,
    close_requests: Emitter<()>,
}

impl SidebarChannel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the connected sidebar to open.
    pub fn request_open(&self) {
        self.open_requests.emit(&());
    }

    /// Ask the connected sidebar to close.
    pub fn request_close(&self) {
        self.close_requests.emit(&());
    }

    /// Subscribe to open requests.
    #[must_use = "dropping the Subscription unsubscribes immediately"]
    pub fn on_open(&self, callback: impl Fn() + 'static) -> Subscription {
        self.open_requests.subscribe(move |()| callback())
    }

    /// Subscribe to close requests.
    #[must_use = "dropping the Subscription unsubscribes immediately"]
    pub fn on_close(&self, callback: impl Fn() + 'static) -> Subscription {
        self.close_requests.subscribe(move |()| callback())
    }

    /// Live open-request subscriptions.
    #[must_use]
    pub fn open_subscriber_count(&self) -> usize {
        self.open_requests.subscriber_count()
    }

    /// Live close-request subscriptions.
    #[must_use]
    pub fn close_subscriber_count(&self) -> usize {
        self.close_requests.subscriber_count()
    }
}
