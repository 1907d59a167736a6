//! Mock adapters for integration tests.
//!
//! Every mock records what the domain asked of it so tests can assert on
//! the full interaction history without touching WiFi, sockets or GPIO.
//! Time is simulated: [`SimTime`] is both the [`Clock`] and the delay, so
//! a blocking wait advances the clock instead of sleeping.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin};

use pressnotify::app::events::AppEvent;
use pressnotify::app::ports::{
    Address, Clock, EventSink, HttpConnection, HttpTransport, NetworkLink, Watchdog,
};
use pressnotify::config::{Credentials, NotifierConfig};
use pressnotify::error::{LinkError, TransportError};

pub const ADDRESS: Address = Address::new(10, 0, 0, 7);

pub fn test_config() -> NotifierConfig {
    let credentials = Credentials::new(
        "HomeWiFi",
        "mysecret8",
        "AC123",
        "secret",
        "+15005550006",
        "+15551234567",
    )
    .unwrap();
    NotifierConfig::new(credentials)
}

// ── SimTime ───────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct SimTime(Rc<Cell<u64>>);

impl SimTime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u64 {
        self.0.get()
    }

    pub fn advance(&self, ms: u64) {
        self.0.set(self.0.get() + ms);
    }
}

impl Clock for SimTime {
    fn now_ms(&self) -> u64 {
        self.0.get()
    }
}

impl DelayNs for SimTime {
    fn delay_ns(&mut self, ns: u32) {
        self.advance(u64::from(ns) / 1_000_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.advance(u64::from(ms));
    }
}

// ── MockLink ──────────────────────────────────────────────────

/// Becomes ready after `ready_after` readiness checks following
/// `connect()`; `None` never becomes ready.
pub struct MockLink {
    ready_after: Option<u32>,
    connected: bool,
    checks: Cell<u32>,
    pub connect_calls: u32,
}

impl MockLink {
    pub fn ready_after(checks: u32) -> Self {
        Self {
            ready_after: Some(checks),
            connected: false,
            checks: Cell::new(0),
            connect_calls: 0,
        }
    }

    pub fn never_ready() -> Self {
        Self {
            ready_after: None,
            connected: false,
            checks: Cell::new(0),
            connect_calls: 0,
        }
    }

    fn up(&self) -> bool {
        match self.ready_after {
            Some(n) => self.connected && self.checks.get() > n,
            None => false,
        }
    }
}

impl NetworkLink for MockLink {
    fn connect(&mut self, _network_id: &str, _secret: &str) -> Result<(), LinkError> {
        self.connect_calls += 1;
        self.connected = true;
        Ok(())
    }

    fn is_ready(&self) -> bool {
        if self.connected {
            self.checks.set(self.checks.get() + 1);
        }
        self.up()
    }

    fn address(&self) -> Option<Address> {
        self.up().then_some(ADDRESS)
    }
}

// ── MockTransport ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Decoded form fields, in order.
    pub fn form(&self) -> Vec<(String, String)> {
        self.body
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .map(|(k, v)| (form_decode(k), form_decode(v)))
            .collect()
    }
}

fn form_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' if i + 2 < bytes.len() => {
                let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).unwrap();
                out.push(u8::from_str_radix(hex, 16).unwrap());
                i += 2;
            }
            b => out.push(b),
        }
        i += 1;
    }
    String::from_utf8(out).unwrap()
}

/// What the mock gateway does with the next request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    Status(u16),
    /// `open()` fails.
    OpenFails(TransportError),
    /// `post()` fails after the connection is open.
    PostFails(TransportError),
}

/// Shared view of what happened on the transport.
#[derive(Clone, Default)]
pub struct TransportLog {
    pub requests: Rc<RefCell<Vec<RecordedRequest>>>,
    pub opened: Rc<Cell<u32>>,
    pub open_now: Rc<Cell<u32>>,
    pub timeouts: Rc<RefCell<Vec<u32>>>,
    /// Watchdog state at each `post()`, when a watchdog is attached.
    pub supervised_at_post: Rc<RefCell<Vec<bool>>>,
}

pub struct MockTransport {
    reply: Reply,
    body: &'static [u8],
    watchdog: Option<WatchdogLog>,
    pub log: TransportLog,
}

impl MockTransport {
    pub fn replying(reply: Reply) -> Self {
        Self {
            reply,
            body: b"",
            watchdog: None,
            log: TransportLog::default(),
        }
    }

    /// Record whether `watchdog` is supervising at each request.
    pub fn observing(mut self, watchdog: &WatchdogLog) -> Self {
        self.watchdog = Some(watchdog.clone());
        self
    }

    pub fn with_body(mut self, body: &'static [u8]) -> Self {
        self.body = body;
        self
    }
}

impl HttpTransport for MockTransport {
    type Connection = MockConnection;

    fn open(&mut self, timeout_ms: u32) -> Result<MockConnection, TransportError> {
        self.log.timeouts.borrow_mut().push(timeout_ms);
        if let Reply::OpenFails(e) = self.reply {
            return Err(e);
        }
        self.log.opened.set(self.log.opened.get() + 1);
        self.log.open_now.set(self.log.open_now.get() + 1);
        Ok(MockConnection {
            reply: self.reply,
            body: self.body,
            pos: 0,
            watchdog: self.watchdog.clone(),
            log: self.log.clone(),
        })
    }
}

pub struct MockConnection {
    reply: Reply,
    body: &'static [u8],
    pos: usize,
    watchdog: Option<WatchdogLog>,
    log: TransportLog,
}

impl HttpConnection for MockConnection {
    fn post(
        &mut self,
        url: &str,
        headers: &[(&str, &str)],
        body: &[u8],
    ) -> Result<u16, TransportError> {
        self.log.requests.borrow_mut().push(RecordedRequest {
            url: url.to_owned(),
            headers: headers
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect(),
            body: String::from_utf8(body.to_vec()).unwrap(),
        });
        if let Some(wd) = &self.watchdog {
            self.log.supervised_at_post.borrow_mut().push(wd.supervised.get());
        }
        match self.reply {
            Reply::Status(s) => Ok(s),
            Reply::PostFails(e) | Reply::OpenFails(e) => Err(e),
        }
    }

    fn read_body(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
        let rest = &self.body[self.pos..];
        let n = rest.len().min(buf.len());
        buf[..n].copy_from_slice(&rest[..n]);
        self.pos += n;
        Ok(n)
    }
}

impl Drop for MockConnection {
    fn drop(&mut self) {
        self.log.open_now.set(self.log.open_now.get() - 1);
    }
}

// ── ScriptedPin ───────────────────────────────────────────────

/// Reads low (pressed) while simulated time lies in one of the
/// `[start, end)` windows.
pub struct ScriptedPin {
    time: SimTime,
    pressed: Vec<(u64, u64)>,
    pub reads: Rc<Cell<u32>>,
}

impl ScriptedPin {
    pub fn new(time: SimTime, pressed: Vec<(u64, u64)>) -> Self {
        Self {
            time,
            pressed,
            reads: Rc::new(Cell::new(0)),
        }
    }

    fn is_pressed(&self) -> bool {
        let now = self.time.now();
        self.pressed.iter().any(|&(s, e)| now >= s && now < e)
    }
}

impl ErrorType for ScriptedPin {
    type Error = Infallible;
}

impl InputPin for ScriptedPin {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        self.reads.set(self.reads.get() + 1);
        Ok(!self.is_pressed())
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        self.reads.set(self.reads.get() + 1);
        Ok(self.is_pressed())
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── MockWatchdog ──────────────────────────────────────────────

/// Shared view of a [`MockWatchdog`].
#[derive(Clone)]
pub struct WatchdogLog {
    pub feeds: Rc<Cell<u32>>,
    pub suspends: Rc<Cell<u32>>,
    pub supervised: Rc<Cell<bool>>,
}

impl Default for WatchdogLog {
    fn default() -> Self {
        Self {
            feeds: Rc::new(Cell::new(0)),
            suspends: Rc::new(Cell::new(0)),
            supervised: Rc::new(Cell::new(true)),
        }
    }
}

#[derive(Default)]
pub struct MockWatchdog {
    pub log: WatchdogLog,
}

impl MockWatchdog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Watchdog for MockWatchdog {
    fn feed(&mut self) {
        self.log.feeds.set(self.log.feeds.get() + 1);
    }

    fn suspend(&mut self) {
        self.log.suspends.set(self.log.suspends.get() + 1);
        self.log.supervised.set(false);
    }

    fn resume(&mut self) {
        self.log.supervised.set(true);
    }
}
