#![forbid(unsafe_code)]

//! Sliding sidebar widget: an accessible, dismissable panel anchored to
//! one edge of a host surface.
//!
//! The widget is assembled from small parts. [`SidebarConfig`] carries the
//! inputs and [`ConfigChanges`] diffs two of them field by field.
//! [`VisualState`] is the render contract derived from `open`, `animate`
//! and `position`. [`FocusGuard`] owns focus bookkeeping and
//! [`DismissalListeners`] the outside-click and dismiss-key slots.
//! [`SidebarChannel`] lets unrelated code request opens and closes.
//! [`Sidebar`] orchestrates all of it against a `slideover-dom`
//! [`Document`](slideover_dom::Document) and a `slideover-runtime`
//! [`Scheduler`](slideover_runtime::Scheduler), emitting [`SidebarEvent`]s
//! along the way.
//!
//! ```
//! use slideover_dom::{Document, Element, Tag};
//! use slideover_runtime::Scheduler;
//! use slideover_widgets::{Sidebar, SidebarChannel, SidebarConfig};
//!
//! let document = Document::new();
//! let scheduler = Scheduler::new();
//! let channel = SidebarChannel::new();
//! let panel = Element::new(Tag::Aside);
//! document.body().append_child(&panel);
//!
//! let sidebar = Sidebar::initialize(
//!     &document,
//!     &scheduler,
//!     Some(&panel),
//!     &channel,
//!     SidebarConfig::new().close_on_click_outside(true),
//! );
//! channel.request_open();
//! scheduler.run_until_idle();
//! assert!(sidebar.is_open());
//! ```

pub mod channel;
pub mod config;
pub mod dismiss;
pub mod focus;
pub mod sidebar;
pub mod state;

pub use channel::SidebarChannel;
pub use config::{ConfigChanges, KEY_CODE_ESCAPE, Mode, Position, SidebarConfig};
pub use dismiss::DismissalListeners;
pub use focus::{FocusGuard, PREV_TAB_INDEX_ATTR};
pub use sidebar::Sidebar;
pub use state::{SidebarEvent, TransitionEvent, VisualState};
