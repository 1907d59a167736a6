//! Controller loop — the hexagonal core's orchestration.
//!
//! [`Controller`] owns the link manager, notification client and input
//! monitor and wires them together.  It has no business rules of its own:
//!
//! ```text
//!  start():  LinkManager::ensure_connected ── Err ──▶ fatal
//!  step():   InputMonitor::poll ─▶ [activation] ─▶ NotificationClient::notify
//!                                                 └─▶ EventSink (one line)
//! ```
//!
//! Activations are handled one at a time, in detection order.  The only
//! blocking calls are the startup link wait and the gateway request; the
//! watchdog is suspended for the latter, whose worst case is several
//! socket timeouts plus an unbounded DNS lookup.

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;
use log::{debug, info};

use crate::config::NotifierConfig;
use crate::drivers::button::InputMonitor;
use crate::error::LinkError;

use super::events::AppEvent;
use super::link::{LinkManager, LinkPolicy};
use super::notify::{DispatchOutcome, NotificationClient};
use super::ports::{Address, Clock, EventSink, HttpTransport, NetworkLink, Watchdog};

// ───────────────────────────────────────────────────────────────
// Controller
// ───────────────────────────────────────────────────────────────

pub struct Controller<'a, L, T, P, C, S> {
    config: &'a NotifierConfig,
    link: LinkManager<L>,
    client: NotificationClient<'a, T>,
    input: InputMonitor<P>,
    clock: C,
    sink: S,
}

impl<'a, L, T, P, C, S> Controller<'a, L, T, P, C, S>
where
    L: NetworkLink,
    T: HttpTransport,
    P: InputPin,
    C: Clock,
    S: EventSink,
{
    pub fn new(
        config: &'a NotifierConfig,
        link: L,
        transport: T,
        pin: P,
        clock: C,
        sink: S,
    ) -> Self {
        Self {
            config,
            link: LinkManager::new(link),
            client: NotificationClient::new(
                transport,
                &config.credentials,
                &config.gateway,
                config.timing.request_timeout_ms,
            ),
            input: InputMonitor::new(pin, &config.timing),
            clock,
            sink,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Bring the link up once.  An error here is fatal to the firmware.
    pub fn start(&mut self, delay: &mut impl DelayNs) -> Result<Address, LinkError> {
        let policy = LinkPolicy::from(&self.config.timing);
        self.link.ensure_connected(
            &self.config.credentials,
            policy,
            &self.clock,
            delay,
            &mut self.sink,
        )
    }

    /// Poll the input once; on an activation, dispatch and report.
    ///
    /// Does nothing until [`start`](Self::start) has succeeded.
    pub fn step(&mut self, watchdog: &mut impl Watchdog) -> Option<DispatchOutcome> {
        if !self.link.is_connected() {
            debug!("Controller: link not up, input not polled");
            return None;
        }

        let activation = self.input.poll(self.clock.now_ms())?;
        self.sink.emit(&AppEvent::Activation(activation));

        watchdog.suspend();
        let outcome = self.client.notify(&self.config.message);
        watchdog.resume();
        self.sink.emit(&AppEvent::Dispatch(outcome));
        Some(outcome)
    }

    /// Start, then poll forever at `poll_interval_ms`.
    ///
    /// Returns only if the link cannot be established; in that case no
    /// input has been sampled.  The watchdog is subscribed after the link
    /// is up and fed on every iteration.
    pub fn run<W: Watchdog>(
        &mut self,
        delay: &mut impl DelayNs,
        subscribe_watchdog: impl FnOnce() -> W,
    ) -> Result<Infallible, LinkError> {
        let address = self.start(delay)?;
        info!("Controller: link up at {}, monitoring input", address);

        let mut watchdog = subscribe_watchdog();
        let interval = self.config.timing.poll_interval_ms;
        loop {
            self.step(&mut watchdog);
            watchdog.feed();
            delay.delay_ms(interval);
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn link(&self) -> &LinkManager<L> {
        &self.link
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
