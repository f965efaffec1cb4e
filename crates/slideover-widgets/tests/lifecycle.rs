//! End-to-end lifecycle tests: a sidebar wired to a live document,
//! scheduler, and bridge channel.

use std::cell::RefCell;
use std::rc::Rc;

use slideover_dom::{Document, Element, EventKind, Phase, Tag};
use slideover_runtime::{Scheduler, Subscription};
use slideover_widgets::{
    Mode, Position, Sidebar, SidebarChannel, SidebarConfig, SidebarEvent, TransitionEvent,
    VisualState,
};

struct Fixture {
    document: Document,
    scheduler: Scheduler,
    channel: SidebarChannel,
    panel: Element,
    inside_input: Element,
    outside_button: Element,
}

fn fixture() -> Fixture {
    let document = Document::new();
    let panel = Element::new(Tag::Aside);
    let inside_input = Element::new(Tag::Input);
    let inside_button = Element::new(Tag::Button);
    panel.append_child(&inside_input);
    panel.append_child(&inside_button);
    document.body().append_child(&panel);

    let outside_button = Element::new(Tag::Button);
    document.body().append_child(&outside_button);

    Fixture {
        document,
        scheduler: Scheduler::new(),
        channel: SidebarChannel::new(),
        panel,
        inside_input,
        outside_button,
    }
}

fn record(sidebar: &Sidebar) -> (Rc<RefCell<Vec<SidebarEvent>>>, Subscription) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    let sub = sidebar.subscribe(move |event| sink.borrow_mut().push(*event));
    (log, sub)
}

fn count(log: &RefCell<Vec<SidebarEvent>>, wanted: &SidebarEvent) -> usize {
    log.borrow().iter().filter(|ev| *ev == wanted).count()
}

#[test]
fn lifecycle_event_order_without_animation() {
    let fx = fixture();
    let sidebar = Sidebar::initialize(
        &fx.document,
        &fx.scheduler,
        Some(&fx.panel),
        &fx.channel,
        SidebarConfig::new().animate(false),
    );
    let (log, _sub) = record(&sidebar);

    sidebar.set_open(true);
    let opening = TransitionEvent::new(VisualState::Collapsed(Position::Left), VisualState::Expanded);
    assert_eq!(
        *log.borrow(),
        vec![
            SidebarEvent::OpenChanged(true),
            SidebarEvent::AnimationStarted(opening),
            SidebarEvent::OpenStart,
            SidebarEvent::AnimationDone(opening),
            SidebarEvent::Opened,
        ]
    );

    log.borrow_mut().clear();
    sidebar.set_open(false);
    let closing = TransitionEvent::new(VisualState::Expanded, VisualState::Collapsed(Position::Left));
    assert_eq!(
        *log.borrow(),
        vec![
            SidebarEvent::OpenChanged(false),
            SidebarEvent::AnimationStarted(closing),
            SidebarEvent::CloseStart,
            SidebarEvent::AnimationDone(closing),
            SidebarEvent::Closed,
        ]
    );
}

#[test]
fn animated_cycle_waits_for_the_host_on_both_edges() {
    let fx = fixture();
    let sidebar = Sidebar::initialize(
        &fx.document,
        &fx.scheduler,
        Some(&fx.panel),
        &fx.channel,
        SidebarConfig::new(),
    );
    let (log, _sub) = record(&sidebar);

    sidebar.set_open(true);
    assert_eq!(log.borrow().last(), Some(&SidebarEvent::OpenStart));
    assert!(!sidebar.is_settled());
    assert_eq!(sidebar.visual_state(), VisualState::ExpandedAnimated);

    let opening = TransitionEvent::new(
        VisualState::Collapsed(Position::Left),
        VisualState::ExpandedAnimated,
    );
    sidebar.animation_done(opening);
    assert_eq!(log.borrow().last(), Some(&SidebarEvent::Opened));
    assert!(sidebar.is_settled());

    sidebar.set_open(false);
    assert_eq!(log.borrow().last(), Some(&SidebarEvent::CloseStart));
    let closing = TransitionEvent::new(
        VisualState::ExpandedAnimated,
        VisualState::Collapsed(Position::Left),
    );
    sidebar.animation_done(closing);
    assert_eq!(log.borrow().last(), Some(&SidebarEvent::Closed));
    assert!(!sidebar.is_settled());
}

#[test]
fn focus_moves_into_panel_and_restores_on_close() {
    let fx = fixture();
    let sidebar = Sidebar::initialize(
        &fx.document,
        &fx.scheduler,
        Some(&fx.panel),
        &fx.channel,
        SidebarConfig::new().animate(false),
    );
    fx.document.focus(&fx.outside_button);

    sidebar.set_open(true);
    assert_eq!(fx.document.active_element(), Some(fx.inside_input.clone()));

    sidebar.set_open(false);
    assert_eq!(fx.document.active_element(), Some(fx.outside_button.clone()));
}

#[test]
fn auto_focus_off_leaves_focus_alone() {
    let fx = fixture();
    let sidebar = Sidebar::initialize(
        &fx.document,
        &fx.scheduler,
        Some(&fx.panel),
        &fx.channel,
        SidebarConfig::new().animate(false).auto_focus(false),
    );
    fx.document.focus(&fx.outside_button);

    sidebar.set_open(true);
    assert_eq!(fx.document.active_element(), Some(fx.outside_button.clone()));
    sidebar.set_open(false);
    assert_eq!(fx.document.active_element(), Some(fx.outside_button.clone()));
}

#[test]
fn settled_over_panel_traps_focus() {
    let fx = fixture();
    let sidebar = Sidebar::initialize(
        &fx.document,
        &fx.scheduler,
        Some(&fx.panel),
        &fx.channel,
        SidebarConfig::new().animate(false),
    );
    sidebar.set_open(true);

    fx.document.focus(&fx.outside_button);
    assert_eq!(fx.document.active_element(), Some(fx.inside_input.clone()));
}

#[test]
fn push_mode_does_not_trap_focus() {
    let fx = fixture();
    let sidebar = Sidebar::initialize(
        &fx.document,
        &fx.scheduler,
        Some(&fx.panel),
        &fx.channel,
        SidebarConfig::new().animate(false).mode(Mode::Push),
    );
    sidebar.set_open(true);

    fx.document.focus(&fx.outside_button);
    assert_eq!(fx.document.active_element(), Some(fx.outside_button.clone()));
}

#[test]
fn trap_is_inactive_mid_transition() {
    let fx = fixture();
    let sidebar = Sidebar::initialize(
        &fx.document,
        &fx.scheduler,
        Some(&fx.panel),
        &fx.channel,
        SidebarConfig::new(),
    );
    sidebar.set_open(true);
    assert!(!sidebar.is_settled());

    fx.document.focus(&fx.outside_button);
    assert_eq!(fx.document.active_element(), Some(fx.outside_button.clone()));
}

#[test]
fn outside_click_closes_exactly_once() {
    let fx = fixture();
    let sidebar = Sidebar::initialize(
        &fx.document,
        &fx.scheduler,
        Some(&fx.panel),
        &fx.channel,
        SidebarConfig::new().animate(false).close_on_click_outside(true),
    );
    let (log, _sub) = record(&sidebar);
    sidebar.set_open(true);
    fx.scheduler.run_until_idle();
    assert_eq!(fx.document.listener_count(EventKind::Click, Phase::Bubble), 1);

    fx.document.dispatch_click(&fx.outside_button);
    assert!(!sidebar.is_open());
    assert_eq!(count(&log, &SidebarEvent::CloseStart), 1);
    assert_eq!(fx.document.listener_count(EventKind::Click, Phase::Bubble), 0);

    fx.document.dispatch_click(&fx.outside_button);
    assert_eq!(count(&log, &SidebarEvent::CloseStart), 1);
}

#[test]
fn click_inside_the_panel_does_not_dismiss() {
    let fx = fixture();
    let sidebar = Sidebar::initialize(
        &fx.document,
        &fx.scheduler,
        Some(&fx.panel),
        &fx.channel,
        SidebarConfig::new().animate(false).close_on_click_outside(true),
    );
    sidebar.set_open(true);
    fx.scheduler.run_until_idle();

    fx.document.dispatch_click(&fx.inside_input);
    assert!(sidebar.is_open());
    fx.document.dispatch_click(&fx.panel);
    assert!(sidebar.is_open());
}

#[test]
fn opening_interaction_cannot_dismiss_in_the_same_dispatch() {
    let fx = fixture();
    let sidebar = Rc::new(Sidebar::initialize(
        &fx.document,
        &fx.scheduler,
        Some(&fx.panel),
        &fx.channel,
        SidebarConfig::new().animate(false).close_on_click_outside(true),
    ));

    // Toolbar handler: the same click that opens the panel keeps bubbling
    // after the open request.
    let toolbar = {
        let channel = fx.channel.clone();
        fx.document
            .add_listener(EventKind::Click, Phase::Bubble, move |_| channel.request_open())
    };
    fx.document.dispatch_click(&fx.outside_button);
    assert!(sidebar.is_open());
    assert_eq!(fx.document.listener_count(EventKind::Click, Phase::Bubble), 1);

    fx.scheduler.run_until_idle();
    assert_eq!(fx.document.listener_count(EventKind::Click, Phase::Bubble), 2);

    fx.document.remove_listener(toolbar);
    fx.document.dispatch_click(&fx.outside_button);
    assert!(!sidebar.is_open());
}

#[test]
fn dismiss_key_matches_configured_code_only() {
    let fx = fixture();
    let sidebar = Sidebar::initialize(
        &fx.document,
        &fx.scheduler,
        Some(&fx.panel),
        &fx.channel,
        SidebarConfig::new().animate(false).key_close(true),
    );
    let (log, _sub) = record(&sidebar);
    sidebar.set_open(true);
    fx.scheduler.run_until_idle();

    fx.document.dispatch_keydown(9);
    assert!(sidebar.is_open());

    fx.document.dispatch_keydown(27);
    assert!(!sidebar.is_open());
    assert_eq!(count(&log, &SidebarEvent::CloseStart), 1);

    fx.document.dispatch_keydown(27);
    assert_eq!(count(&log, &SidebarEvent::CloseStart), 1);
}

#[test]
fn custom_dismiss_key_code() {
    let fx = fixture();
    let sidebar = Sidebar::initialize(
        &fx.document,
        &fx.scheduler,
        Some(&fx.panel),
        &fx.channel,
        SidebarConfig::new().animate(false).key_close(true).dismiss_key_code(13),
    );
    sidebar.set_open(true);
    fx.scheduler.run_until_idle();

    fx.document.dispatch_keydown(27);
    assert!(sidebar.is_open());
    fx.document.dispatch_keydown(13);
    assert!(!sidebar.is_open());
}

#[test]
fn repeated_install_scheduling_attaches_each_listener_once() {
    let fx = fixture();
    let sidebar = Sidebar::initialize(
        &fx.document,
        &fx.scheduler,
        Some(&fx.panel),
        &fx.channel,
        SidebarConfig::new().animate(false).key_close(true),
    );
    sidebar.set_open(true);
    // Enabling a second trigger queues another install before the first ran.
    sidebar.apply_config(
        SidebarConfig::new()
            .open(true)
            .animate(false)
            .key_close(true)
            .close_on_click_outside(true),
    );
    assert!(fx.scheduler.pending() >= 2);

    fx.scheduler.run_until_idle();
    assert_eq!(fx.document.listener_count(EventKind::Click, Phase::Bubble), 1);
    assert_eq!(fx.document.listener_count(EventKind::KeyDown, Phase::Bubble), 1);
}

#[test]
fn disabling_a_trigger_detaches_its_listener_immediately() {
    let fx = fixture();
    let sidebar = Sidebar::initialize(
        &fx.document,
        &fx.scheduler,
        Some(&fx.panel),
        &fx.channel,
        SidebarConfig::new()
            .animate(false)
            .key_close(true)
            .close_on_click_outside(true),
    );
    sidebar.set_open(true);
    fx.scheduler.run_until_idle();
    assert_eq!(fx.document.listener_count(EventKind::Click, Phase::Bubble), 1);

    sidebar.apply_config(
        SidebarConfig::new().open(true).animate(false).key_close(true),
    );
    assert_eq!(fx.document.listener_count(EventKind::Click, Phase::Bubble), 0);
    fx.scheduler.run_until_idle();
    assert_eq!(fx.document.listener_count(EventKind::KeyDown, Phase::Bubble), 1);
}

#[test]
fn without_a_panel_root_outside_clicks_are_neutral() {
    let fx = fixture();
    let sidebar = Sidebar::initialize(
        &fx.document,
        &fx.scheduler,
        None,
        &fx.channel,
        SidebarConfig::new().animate(false).close_on_click_outside(true),
    );
    sidebar.set_open(true);
    fx.scheduler.run_until_idle();

    fx.document.dispatch_click(&fx.outside_button);
    assert!(sidebar.is_open());
}

#[test]
fn position_change_is_applied_now_and_notified_later() {
    let fx = fixture();
    let sidebar = Sidebar::initialize(
        &fx.document,
        &fx.scheduler,
        Some(&fx.panel),
        &fx.channel,
        SidebarConfig::new(),
    );
    let (log, _sub) = record(&sidebar);

    sidebar.apply_config(SidebarConfig::new().position(Position::Bottom));
    assert_eq!(sidebar.visual_state(), VisualState::Collapsed(Position::Bottom));
    assert!(log.borrow().is_empty());

    fx.scheduler.run_until_idle();
    assert_eq!(*log.borrow(), vec![SidebarEvent::PositionChanged(Position::Bottom)]);
}

#[test]
fn mode_change_notifies_synchronously() {
    let fx = fixture();
    let sidebar = Sidebar::initialize(
        &fx.document,
        &fx.scheduler,
        Some(&fx.panel),
        &fx.channel,
        SidebarConfig::new(),
    );
    let (log, _sub) = record(&sidebar);

    sidebar.apply_config(SidebarConfig::new().mode(Mode::Push));
    assert_eq!(*log.borrow(), vec![SidebarEvent::ModeChanged(Mode::Push)]);
}

#[test]
fn backdrop_follows_open_state_and_flag() {
    let fx = fixture();
    let sidebar = Sidebar::initialize(
        &fx.document,
        &fx.scheduler,
        Some(&fx.panel),
        &fx.channel,
        SidebarConfig::new().animate(false).show_backdrop(true),
    );
    assert!(!sidebar.backdrop_visible());

    sidebar.set_open(true);
    assert!(sidebar.backdrop_visible());

    sidebar.apply_config(SidebarConfig::new().open(true).animate(false));
    assert!(!sidebar.backdrop_visible());

    sidebar.apply_config(
        SidebarConfig::new().open(true).animate(false).show_backdrop(true),
    );
    assert!(sidebar.backdrop_visible());

    sidebar.set_open(false);
    assert!(!sidebar.backdrop_visible());
}

#[test]
fn bridge_requests_dedupe_against_current_state() {
    let fx = fixture();
    let sidebar = Sidebar::initialize(
        &fx.document,
        &fx.scheduler,
        Some(&fx.panel),
        &fx.channel,
        SidebarConfig::new().animate(false),
    );
    let (log, _sub) = record(&sidebar);

    fx.channel.request_close();
    assert!(log.borrow().is_empty());

    fx.channel.request_open();
    fx.channel.request_open();
    assert_eq!(count(&log, &SidebarEvent::OpenChanged(true)), 1);

    fx.channel.request_close();
    fx.channel.request_close();
    assert_eq!(count(&log, &SidebarEvent::OpenChanged(false)), 1);
}

#[test]
fn close_via_click_then_reopen_works_repeatedly() {
    let fx = fixture();
    let sidebar = Sidebar::initialize(
        &fx.document,
        &fx.scheduler,
        Some(&fx.panel),
        &fx.channel,
        SidebarConfig::new().animate(false).close_on_click_outside(true),
    );
    let (log, _sub) = record(&sidebar);

    for _ in 0..2 {
        sidebar.set_open(true);
        fx.scheduler.run_until_idle();
        fx.document.dispatch_click(&fx.outside_button);
        assert!(!sidebar.is_open());
    }
    assert_eq!(count(&log, &SidebarEvent::CloseStart), 2);
    assert_eq!(count(&log, &SidebarEvent::OpenChanged(true)), 2);
}

#[test]
fn teardown_releases_every_listener_and_subscription() {
    let fx = fixture();
    let sidebar = Sidebar::initialize(
        &fx.document,
        &fx.scheduler,
        Some(&fx.panel),
        &fx.channel,
        SidebarConfig::new()
            .animate(false)
            .key_close(true)
            .close_on_click_outside(true),
    );
    sidebar.set_open(true);
    fx.scheduler.run_until_idle();
    assert_eq!(fx.document.listener_count(EventKind::FocusIn, Phase::Capture), 1);

    sidebar.teardown();
    assert_eq!(fx.document.listener_count(EventKind::Click, Phase::Bubble), 0);
    assert_eq!(fx.document.listener_count(EventKind::KeyDown, Phase::Bubble), 0);
    assert_eq!(fx.document.listener_count(EventKind::FocusIn, Phase::Capture), 0);
    assert_eq!(fx.channel.open_subscriber_count(), 0);
    assert_eq!(fx.channel.close_subscriber_count(), 0);

    fx.channel.request_open();
    assert!(!sidebar.is_open());
}

#[test]
fn drop_tears_down_and_pending_tasks_become_no_ops() {
    let fx = fixture();
    let sidebar = Sidebar::initialize(
        &fx.document,
        &fx.scheduler,
        Some(&fx.panel),
        &fx.channel,
        SidebarConfig::new().animate(false).close_on_click_outside(true),
    );
    sidebar.set_open(true);
    assert!(fx.scheduler.pending() > 0);

    drop(sidebar);
    fx.scheduler.run_until_idle();
    assert_eq!(fx.document.listener_count(EventKind::Click, Phase::Bubble), 0);
    assert_eq!(fx.document.listener_count(EventKind::FocusIn, Phase::Capture), 0);
    assert_eq!(fx.channel.open_subscriber_count(), 0);
}

#[test]
fn hidden_panel_content_is_keyboard_unreachable() {
    let fx = fixture();
    let sidebar = Sidebar::initialize(
        &fx.document,
        &fx.scheduler,
        Some(&fx.panel),
        &fx.channel,
        SidebarConfig::new().animate(false),
    );

    sidebar.set_open(true);
    sidebar.set_open(false);
    assert_eq!(fx.inside_input.attribute("tabindex").as_deref(), Some("-1"));

    // Reopening lifts the suppression again.
    sidebar.set_open(true);
    assert_eq!(fx.inside_input.attribute("tabindex"), None);
}

#[test]
fn suppression_shadows_and_restores_an_author_tab_index() {
    let fx = fixture();
    let sidebar = Sidebar::initialize(
        &fx.document,
        &fx.scheduler,
        Some(&fx.panel),
        &fx.channel,
        SidebarConfig::new().animate(false),
    );
    sidebar.set_open(true);
    fx.inside_input.set_attribute("tabindex", "2");

    sidebar.set_open(false);
    assert_eq!(fx.inside_input.attribute("tabindex").as_deref(), Some("-1"));

    sidebar.set_open(true);
    assert_eq!(fx.inside_input.attribute("tabindex").as_deref(), Some("2"));
}
