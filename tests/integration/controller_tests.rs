//! End-to-end tests for the controller: link startup, input polling and
//! dispatch, all against mock adapters on simulated time.

use std::cell::Cell;
use std::rc::Rc;

use pressnotify::app::events::AppEvent;
use pressnotify::app::link::LinkState;
use pressnotify::app::notify::DispatchOutcome;
use pressnotify::app::ports::Watchdog;
use pressnotify::app::service::Controller;
use pressnotify::config::NotifierConfig;
use pressnotify::error::{LinkError, TransportError};

use super::mock_hw::{
    ADDRESS, MockLink, MockTransport, MockWatchdog, RecordingSink, Reply, ScriptedPin, SimTime,
    TransportLog, WatchdogLog, test_config,
};

type TestController<'a> =
    Controller<'a, MockLink, MockTransport, ScriptedPin, SimTime, RecordingSink>;

struct Rig {
    time: SimTime,
    log: TransportLog,
    reads: Rc<Cell<u32>>,
}

fn build<'a>(
    config: &'a NotifierConfig,
    link: MockLink,
    reply: Reply,
    presses: Vec<(u64, u64)>,
) -> (TestController<'a>, Rig) {
    let time = SimTime::new();
    let transport = MockTransport::replying(reply);
    let log = transport.log.clone();
    let pin = ScriptedPin::new(time.clone(), presses);
    let reads = pin.reads.clone();
    let controller = Controller::new(
        config,
        link,
        transport,
        pin,
        time.clone(),
        RecordingSink::new(),
    );
    (controller, Rig { time, log, reads })
}

/// Poll the way `run` does, for `duration_ms` of simulated time.
fn poll_for(controller: &mut TestController<'_>, time: &SimTime, duration_ms: u64) -> Vec<DispatchOutcome> {
    poll_watched(controller, &mut MockWatchdog::new(), time, duration_ms)
}

fn poll_watched(
    controller: &mut TestController<'_>,
    watchdog: &mut MockWatchdog,
    time: &SimTime,
    duration_ms: u64,
) -> Vec<DispatchOutcome> {
    let end = time.now() + duration_ms;
    let mut outcomes = Vec::new();
    while time.now() < end {
        outcomes.extend(controller.step(watchdog));
        watchdog.feed();
        time.advance(10);
    }
    outcomes
}

fn dispatches(sink: &RecordingSink) -> Vec<DispatchOutcome> {
    sink.events
        .iter()
        .filter_map(|e| match e {
            AppEvent::Dispatch(o) => Some(*o),
            _ => None,
        })
        .collect()
}

#[test]
fn press_after_startup_sends_one_message() {
    let config = test_config();
    let (mut controller, rig) = build(
        &config,
        MockLink::ready_after(2),
        Reply::Status(201),
        vec![(2100, 2300)],
    );

    let mut delay = rig.time.clone();
    assert_eq!(controller.start(&mut delay), Ok(ADDRESS));
    assert_eq!(rig.time.now(), 2000);

    let outcomes = poll_for(&mut controller, &rig.time, 1000);
    assert_eq!(outcomes, vec![DispatchOutcome::Success]);

    let requests = rig.log.requests.borrow();
    assert_eq!(requests.len(), 1);
    let form = requests[0].form();
    assert!(form.contains(&("To".to_owned(), "+15551234567".to_owned())));
    assert!(form.contains(&("From".to_owned(), "+15005550006".to_owned())));
    assert!(form.contains(&("Body".to_owned(), "Button Pressed!".to_owned())));

    assert_eq!(dispatches(controller.sink()), vec![DispatchOutcome::Success]);
    assert_eq!(rig.log.open_now.get(), 0);
}

#[test]
fn startup_events_in_order() {
    let config = test_config();
    let (mut controller, rig) =
        build(&config, MockLink::ready_after(2), Reply::Status(201), vec![]);

    let mut delay = rig.time.clone();
    controller.start(&mut delay).unwrap();

    let events = &controller.sink().events;
    assert!(matches!(events.first(), Some(AppEvent::LinkConnecting { .. })));
    assert_eq!(events.last(), Some(&AppEvent::LinkConnected(ADDRESS)));
    let waits = events
        .iter()
        .filter(|e| matches!(e, AppEvent::LinkWaiting { .. }))
        .count();
    assert_eq!(waits, 2);
}

#[test]
fn link_timeout_ends_run_without_sampling_input() {
    let config = test_config();
    let (mut controller, rig) = build(
        &config,
        MockLink::never_ready(),
        Reply::Status(201),
        vec![(0, 60_000)],
    );

    let subscribed = Rc::new(Cell::new(false));
    let watchdog = MockWatchdog::new();
    let feeds = watchdog.log.feeds.clone();
    let mut delay = rig.time.clone();
    let err = controller
        .run(&mut delay, || {
            subscribed.set(true);
            watchdog
        })
        .unwrap_err();

    assert_eq!(err, LinkError::Timeout { waited_ms: 30_000 });
    assert_eq!(rig.time.now(), 30_000);
    assert_eq!(rig.reads.get(), 0);
    assert!(!subscribed.get());
    assert_eq!(feeds.get(), 0);
    assert!(rig.log.requests.borrow().is_empty());
    assert_eq!(controller.link().state(), LinkState::Disconnected);
}

#[test]
fn step_before_start_does_not_sample() {
    let config = test_config();
    let (mut controller, rig) = build(
        &config,
        MockLink::ready_after(0),
        Reply::Status(201),
        vec![(0, 1000)],
    );

    let outcomes = poll_for(&mut controller, &rig.time, 500);

    assert!(outcomes.is_empty());
    assert_eq!(rig.reads.get(), 0);
}

#[test]
fn presses_within_cooldown_send_once() {
    let config = test_config();
    // Second press starts 400 ms after the first activation.
    let (mut controller, rig) = build(
        &config,
        MockLink::ready_after(0),
        Reply::Status(201),
        vec![(100, 200), (500, 600)],
    );

    let mut delay = rig.time.clone();
    controller.start(&mut delay).unwrap();
    let outcomes = poll_for(&mut controller, &rig.time, 1500);

    assert_eq!(outcomes, vec![DispatchOutcome::Success]);
    assert_eq!(rig.log.requests.borrow().len(), 1);
}

#[test]
fn presses_after_cooldown_each_send() {
    let config = test_config();
    let (mut controller, rig) = build(
        &config,
        MockLink::ready_after(0),
        Reply::Status(201),
        vec![(100, 200), (1300, 1400)],
    );

    let mut delay = rig.time.clone();
    controller.start(&mut delay).unwrap();
    let outcomes = poll_for(&mut controller, &rig.time, 2000);

    assert_eq!(outcomes, vec![DispatchOutcome::Success, DispatchOutcome::Success]);
    let sequences: Vec<u32> = controller
        .sink()
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::Activation(a) => Some(a.sequence),
            _ => None,
        })
        .collect();
    assert_eq!(sequences, vec![1, 2]);
}

#[test]
fn failed_dispatch_keeps_monitoring() {
    let config = test_config();
    let (mut controller, rig) = build(
        &config,
        MockLink::ready_after(0),
        Reply::PostFails(TransportError::Timeout),
        vec![(100, 200), (1300, 1400)],
    );

    let mut delay = rig.time.clone();
    controller.start(&mut delay).unwrap();
    let outcomes = poll_for(&mut controller, &rig.time, 2000);

    assert_eq!(
        outcomes,
        vec![DispatchOutcome::TransportError(TransportError::Timeout); 2]
    );
    assert_eq!(rig.log.open_now.get(), 0);
}

#[test]
fn each_activation_is_followed_by_its_dispatch() {
    let config = test_config();
    let (mut controller, rig) = build(
        &config,
        MockLink::ready_after(0),
        Reply::Status(401),
        vec![(100, 200)],
    );

    let mut delay = rig.time.clone();
    controller.start(&mut delay).unwrap();
    poll_for(&mut controller, &rig.time, 500);

    let tail: Vec<_> = controller
        .sink()
        .events
        .iter()
        .skip_while(|e| !matches!(e, AppEvent::Activation(_)))
        .collect();
    assert_eq!(tail.len(), 2);
    assert_eq!(tail[1], &AppEvent::Dispatch(DispatchOutcome::AuthFailure));
}

#[test]
fn watchdog_is_suspended_only_for_the_gateway_call() {
    let config = test_config();
    let watchdog_log = WatchdogLog::default();
    let time = SimTime::new();
    let transport = MockTransport::replying(Reply::Status(201)).observing(&watchdog_log);
    let log = transport.log.clone();
    let mut controller = Controller::new(
        &config,
        MockLink::ready_after(0),
        transport,
        ScriptedPin::new(time.clone(), vec![(100, 200), (1300, 1400)]),
        time.clone(),
        RecordingSink::new(),
    );

    let mut delay = time.clone();
    controller.start(&mut delay).unwrap();
    let mut watchdog = MockWatchdog { log: watchdog_log.clone() };
    let outcomes = poll_watched(&mut controller, &mut watchdog, &time, 2000);

    assert_eq!(outcomes.len(), 2);
    assert_eq!(*log.supervised_at_post.borrow(), vec![false, false]);
    assert_eq!(watchdog_log.suspends.get(), 2);
    assert!(watchdog_log.supervised.get(), "supervision restored after dispatch");
}

#[test]
fn watchdog_is_restored_after_failed_dispatch() {
    let config = test_config();
    let (mut controller, rig) = build(
        &config,
        MockLink::ready_after(0),
        Reply::OpenFails(TransportError::Connect),
        vec![(100, 200)],
    );

    let mut delay = rig.time.clone();
    controller.start(&mut delay).unwrap();
    let mut watchdog = MockWatchdog::new();
    let outcomes = poll_watched(&mut controller, &mut watchdog, &rig.time, 500);

    assert_eq!(outcomes, vec![DispatchOutcome::TransportError(TransportError::Connect)]);
    assert_eq!(watchdog.log.suspends.get(), 1);
    assert!(watchdog.log.supervised.get());
}
