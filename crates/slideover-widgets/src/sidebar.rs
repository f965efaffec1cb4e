#![forbid(unsafe_code)]

//! The sliding panel orchestrator.
//!
//! A [`Sidebar`] ties the host [`Document`] and [`Scheduler`] to one panel
//! subtree and runs the open/close lifecycle over it: visual state
//! transitions, focus capture/trap/restore, dismissal listener management,
//! and lifecycle event emission.
//!
//! # Invariants
//!
//! - All open paths (direct, config, bridge) converge on one open edge,
//!   all close paths on one close edge; duplicate requests are dropped
//!   before either edge runs.
//! - The interior state cell is never borrowed across a focus dispatch or
//!   a lifecycle emission, so handlers and subscribers may call back into
//!   the sidebar freely.
//! - Dismissal listeners are attached via deferred, idempotent install
//!   tasks and are torn down synchronously on close or teardown.

use std::cell::RefCell;
use std::rc::Rc;

use slideover_dom::{Document, DomEvent, Element, EventKind, ListenerId, Phase};
use slideover_runtime::{Emitter, Scheduler, Subscription};

use crate::channel::SidebarChannel;
use crate::config::{ConfigChanges, Mode, SidebarConfig};
use crate::dismiss::DismissalListeners;
use crate::focus::FocusGuard;
use crate::state::{SidebarEvent, TransitionEvent, VisualState};

/// A sliding panel bound to a host document.
///
/// Dropping the sidebar tears it down: trap and dismissal listeners are
/// removed from the document and bridge subscriptions are released.
pub struct Sidebar {
    core: Rc<RefCell<SidebarCore>>,
}

struct SidebarCore {
    document: Document,
    scheduler: Scheduler,
    config: SidebarConfig,
    panel_root: Option<Element>,
    visual_state: VisualState,
    backdrop_visible: bool,
    /// True only between a completed open transition and the start of the
    /// next close; gates the focus trap.
    settled: bool,
    focus: FocusGuard,
    trap_listener: Option<ListenerId>,
    dismiss: DismissalListeners,
    channel_subs: Vec<Subscription>,
    events: Emitter<SidebarEvent>,
    torn_down: bool,
}

/// Everything an edge needs after the state cell is released: focus moves
/// and emissions happen strictly borrow-free.
struct EdgePlan {
    emitter: Emitter<SidebarEvent>,
    document: Document,
    focus_target: Option<Element>,
    transition: TransitionEvent,
    animate: bool,
}

impl Sidebar {
    /// Bind a sidebar to `document` with the given panel subtree and
    /// configuration, and wire it to `channel` for external open/close
    /// requests.
    ///
    /// If `config` starts open the open edge runs immediately, before any
    /// subscriber can attach.
    #[must_use]
    pub fn initialize(
        document: &Document,
        scheduler: &Scheduler,
        panel_root: Option<&Element>,
        channel: &SidebarChannel,
        config: SidebarConfig,
    ) -> Self {
        let start_open = config.open;
        let core = Rc::new(RefCell::new(SidebarCore {
            document: document.clone(),
            scheduler: scheduler.clone(),
            config: SidebarConfig { open: false, ..config },
            panel_root: panel_root.cloned(),
            visual_state: VisualState::Collapsed(config.position),
            backdrop_visible: false,
            settled: false,
            focus: FocusGuard::new(),
            trap_listener: None,
            dismiss: DismissalListeners::new(),
            channel_subs: Vec::new(),
            events: Emitter::new(),
            torn_down: false,
        }));

        let open_sub = {
            let weak = Rc::downgrade(&core);
            channel.on_open(move || {
                if let Some(core) = weak.upgrade() {
                    request_open(&core);
                }
            })
        };
        let close_sub = {
            let weak = Rc::downgrade(&core);
            channel.on_close(move || {
                if let Some(core) = weak.upgrade() {
                    request_close(&core);
                }
            })
        };
        core.borrow_mut().channel_subs = vec![open_sub, close_sub];

        if start_open {
            request_open(&core);
        }
        Self { core }
    }

    /// Subscribe to lifecycle events. The subscription unsubscribes on
    /// drop.
    #[must_use]
    pub fn subscribe(&self, callback: impl Fn(&SidebarEvent) + 'static) -> Subscription {
        let emitter = self.core.borrow().events.clone();
        emitter.subscribe(callback)
    }

    /// Request the open (`true`) or closed (`false`) state. A request for
    /// the current state is dropped without side effects.
    pub fn set_open(&self, open: bool) {
        if open {
            request_open(&self.core);
        } else {
            request_close(&self.core);
        }
    }

    /// Replace the configuration, reacting to each field that changed.
    ///
    /// An `open` flip runs the full open or close edge. Dismissal trigger
    /// flips re-evaluate the listener set (detach disabled kinds now,
    /// schedule installs for enabled ones). A position change recomputes
    /// the collapsed edge and defers its notification by one scheduler
    /// turn; a mode change notifies synchronously.
    pub fn apply_config(&self, new: SidebarConfig) {
        let changes = {
            let mut c = self.core.borrow_mut();
            if c.torn_down {
                return;
            }
            let changes = ConfigChanges::between(&c.config, &new);
            c.config = new;
            changes
        };
        if changes.is_empty() {
            return;
        }
        tracing::debug!(?changes, "sidebar config changed");

        if changes.contains(ConfigChanges::OPEN) {
            if new.open {
                open_edge(&self.core);
            } else {
                close_edge(&self.core);
            }
        }
        if changes.intersects(ConfigChanges::CLOSE_ON_CLICK_OUTSIDE | ConfigChanges::KEY_CLOSE) {
            reevaluate_dismissal(&self.core);
        }
        if changes.contains(ConfigChanges::POSITION) {
            {
                let mut c = self.core.borrow_mut();
                c.visual_state = VisualState::derive(
                    c.config.open,
                    c.config.animate,
                    c.config.position,
                );
            }
            let weak = Rc::downgrade(&self.core);
            let scheduler = self.core.borrow().scheduler.clone();
            scheduler.defer(move || {
                let Some(core) = weak.upgrade() else { return };
                let (emitter, position, torn_down) = {
                    let c = core.borrow();
                    (c.events.clone(), c.config.position, c.torn_down)
                };
                if !torn_down {
                    emitter.emit(&SidebarEvent::PositionChanged(position));
                }
            });
        }
        if changes.contains(ConfigChanges::MODE) {
            let emitter = self.core.borrow().events.clone();
            emitter.emit(&SidebarEvent::ModeChanged(new.mode));
        }
        if changes.intersects(ConfigChanges::ANIMATE | ConfigChanges::SHOW_BACKDROP) {
            let mut c = self.core.borrow_mut();
            c.visual_state =
                VisualState::derive(c.config.open, c.config.animate, c.config.position);
            c.backdrop_visible = c.config.open && c.config.show_backdrop;
        }
    }

    /// Report that the host finished animating a transition.
    ///
    /// Only meaningful with `animate` enabled; without animation both
    /// transition boundaries fire back-to-back on the edge itself and the
    /// host has nothing to report.
    pub fn animation_done(&self, transition: TransitionEvent) {
        if self.core.borrow().torn_down {
            return;
        }
        finish_transition(&self.core, transition);
    }

    /// Release every document listener and bridge subscription. Idempotent;
    /// also runs on drop.
    pub fn teardown(&self) {
        teardown(&self.core);
    }

    /// Attach or replace the panel subtree this sidebar manages.
    pub fn set_panel_root(&self, panel_root: &Element) {
        self.core.borrow_mut().panel_root = Some(panel_root.clone());
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.core.borrow().config.open
    }

    /// Whether the last transition has completed (the trap gate).
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.core.borrow().settled
    }

    #[must_use]
    pub fn visual_state(&self) -> VisualState {
        self.core.borrow().visual_state
    }

    #[must_use]
    pub fn backdrop_visible(&self) -> bool {
        self.core.borrow().backdrop_visible
    }

    #[must_use]
    pub fn config(&self) -> SidebarConfig {
        self.core.borrow().config
    }

    /// Rendered panel width, `0` without a panel root.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.core.borrow().panel_root.as_ref().map_or(0, Element::width)
    }

    /// Rendered panel height, `0` without a panel root.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.core.borrow().panel_root.as_ref().map_or(0, Element::height)
    }
}

impl Drop for Sidebar {
    fn drop(&mut self) {
        teardown(&self.core);
    }
}

fn request_open(core: &Rc<RefCell<SidebarCore>>) {
    let ignore = {
        let c = core.borrow();
        c.torn_down || c.config.open
    };
    if ignore {
        return;
    }
    core.borrow_mut().config.open = true;
    open_edge(core);
}

fn request_close(core: &Rc<RefCell<SidebarCore>>) {
    let ignore = {
        let c = core.borrow();
        c.torn_down || !c.config.open
    };
    if ignore {
        return;
    }
    core.borrow_mut().config.open = false;
    close_edge(core);
}

/// Run the closed-to-open edge. `config.open` is already `true`.
fn open_edge(core: &Rc<RefCell<SidebarCore>>) {
    let plan = {
        let mut guard = core.borrow_mut();
        let c = &mut *guard;
        let prev = c.visual_state;
        c.visual_state = VisualState::derive(true, c.config.animate, c.config.position);
        c.backdrop_visible = c.config.show_backdrop;

        match c.panel_root.clone() {
            Some(root) => c.focus.rescan(&root),
            None => c.focus.clear(),
        }
        c.focus.capture_prior_focus(&c.document);
        c.focus.restore_focusability();
        let focus_target = if c.config.auto_focus {
            c.focus.first_focusable()
        } else {
            None
        };

        if c.trap_listener.is_none() {
            let weak = Rc::downgrade(core);
            let document = c.document.clone();
            let id = c
                .document
                .add_listener(EventKind::FocusIn, Phase::Capture, move |event| {
                    handle_focus_in(&weak, &document, event);
                });
            c.trap_listener = Some(id);
        }
        if c.config.close_on_click_outside || c.config.key_close {
            schedule_dismissal_install(core, &c.scheduler);
        }
        tracing::debug!(state = ?c.visual_state, "sidebar opening");

        EdgePlan {
            emitter: c.events.clone(),
            document: c.document.clone(),
            focus_target,
            transition: TransitionEvent::new(prev, c.visual_state),
            animate: c.config.animate,
        }
    };

    plan.emitter.emit(&SidebarEvent::OpenChanged(true));
    if let Some(target) = &plan.focus_target {
        plan.document.focus(target);
    }
    plan.emitter.emit(&SidebarEvent::AnimationStarted(plan.transition));
    plan.emitter.emit(&SidebarEvent::OpenStart);
    if !plan.animate {
        finish_transition(core, plan.transition);
    }
}

/// Run the open-to-closed edge. `config.open` is already `false`.
fn close_edge(core: &Rc<RefCell<SidebarCore>>) {
    let plan = {
        let mut guard = core.borrow_mut();
        let c = &mut *guard;
        let prev = c.visual_state;
        c.visual_state = VisualState::Collapsed(c.config.position);
        c.backdrop_visible = false;

        match c.panel_root.clone() {
            Some(root) => c.focus.rescan(&root),
            None => c.focus.clear(),
        }
        c.focus.suppress_focusability();
        let prior = c.focus.take_prior_focus();
        let focus_target = if c.config.auto_focus { prior } else { None };

        if let Some(id) = c.trap_listener.take() {
            c.document.remove_listener(id);
        }
        let document = c.document.clone();
        c.dismiss.tear_down(&document);
        tracing::debug!(state = ?c.visual_state, "sidebar closing");

        EdgePlan {
            emitter: c.events.clone(),
            document,
            focus_target,
            transition: TransitionEvent::new(prev, c.visual_state),
            animate: c.config.animate,
        }
    };

    plan.emitter.emit(&SidebarEvent::OpenChanged(false));
    if let Some(target) = &plan.focus_target {
        plan.document.focus(target);
    }
    plan.emitter.emit(&SidebarEvent::AnimationStarted(plan.transition));
    plan.emitter.emit(&SidebarEvent::CloseStart);
    if !plan.animate {
        finish_transition(core, plan.transition);
    }
}

/// Emit the transition-done pair and settle the panel in its current
/// open state.
fn finish_transition(core: &Rc<RefCell<SidebarCore>>, transition: TransitionEvent) {
    let (emitter, open) = {
        let mut c = core.borrow_mut();
        let open = c.config.open;
        c.settled = open;
        (c.events.clone(), open)
    };
    emitter.emit(&SidebarEvent::AnimationDone(transition));
    emitter.emit(if open {
        &SidebarEvent::Opened
    } else {
        &SidebarEvent::Closed
    });
}

/// Capture-phase focus trap. Redirects focus that lands outside the panel
/// back to its first focusable, but only once the open transition has
/// settled, in over mode, with trapping enabled.
fn handle_focus_in(
    weak: &std::rc::Weak<RefCell<SidebarCore>>,
    document: &Document,
    event: &DomEvent,
) {
    let Some(core) = weak.upgrade() else { return };
    let DomEvent::FocusIn { target } = event else { return };
    let redirect = {
        let c = core.borrow();
        if c.settled && c.config.trap_focus && c.config.mode == Mode::Over {
            match &c.panel_root {
                Some(root) if !root.contains(target) => c.focus.first_focusable(),
                _ => None,
            }
        } else {
            None
        }
    };
    if let Some(first) = redirect {
        tracing::trace!("focus trapped back into panel");
        document.focus(&first);
    }
}

/// Queue an idempotent dismissal install for the next scheduler turn, so
/// the interaction that opened the panel cannot also dismiss it.
fn schedule_dismissal_install(core: &Rc<RefCell<SidebarCore>>, scheduler: &Scheduler) {
    let weak = Rc::downgrade(core);
    scheduler.defer(move || {
        if let Some(core) = weak.upgrade() {
            install_dismissal(&core);
        }
    });
}

/// Attach whichever dismissal listeners are enabled, open, and not yet
/// attached. Safe to run any number of times.
fn install_dismissal(core: &Rc<RefCell<SidebarCore>>) {
    let mut guard = core.borrow_mut();
    let c = &mut *guard;
    if c.torn_down || !c.config.open {
        return;
    }
    let document = c.document.clone();

    if c.config.close_on_click_outside && !c.dismiss.click_attached() {
        let weak = Rc::downgrade(core);
        c.dismiss.attach_click(&document, move |event| {
            let DomEvent::Click { target } = event else { return };
            let Some(core) = weak.upgrade() else { return };
            let outside = {
                let c = core.borrow();
                c.dismiss.click_attached()
                    && match &c.panel_root {
                        Some(root) => !root.contains(target),
                        None => false,
                    }
            };
            if outside {
                request_close(&core);
            }
        });
    }
    if c.config.key_close && !c.dismiss.key_attached() {
        let weak = Rc::downgrade(core);
        c.dismiss.attach_key(&document, move |event| {
            let DomEvent::KeyDown { key_code } = event else { return };
            let Some(core) = weak.upgrade() else { return };
            let dismiss = {
                let c = core.borrow();
                c.dismiss.key_attached() && c.config.dismiss_key_code == *key_code
            };
            if dismiss {
                request_close(&core);
            }
        });
    }
}

/// Detach listener kinds whose trigger was just disabled, then schedule an
/// install for any that are enabled.
fn reevaluate_dismissal(core: &Rc<RefCell<SidebarCore>>) {
    let mut guard = core.borrow_mut();
    let c = &mut *guard;
    if c.torn_down {
        return;
    }
    let document = c.document.clone();
    if !c.config.close_on_click_outside {
        c.dismiss.detach_click(&document);
    }
    if !c.config.key_close {
        c.dismiss.detach_key(&document);
    }
    if c.config.open && (c.config.close_on_click_outside || c.config.key_close) {
        schedule_dismissal_install(core, &c.scheduler);
    }
}

/// Teardown order: trap listener, dismissal listeners, bridge
/// subscriptions.
fn teardown(core: &Rc<RefCell<SidebarCore>>) {
    let mut guard = core.borrow_mut();
    let c = &mut *guard;
    if c.torn_down {
        return;
    }
    c.torn_down = true;
    if let Some(id) = c.trap_listener.take() {
        c.document.remove_listener(id);
    }
    let document = c.document.clone();
    c.dismiss.tear_down(&document);
    c.channel_subs.clear();
    tracing::debug!("sidebar torn down");
}
