//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ LinkManager / NotificationClient / Controller
//! ```
//!
//! The digital input and blocking delays use the `embedded-hal` 1.0
//! traits directly ([`embedded_hal::digital::InputPin`],
//! [`embedded_hal::delay::DelayNs`]); everything else the domain needs
//! is declared here so the core never touches ESP-IDF.

use crate::error::{LinkError, TransportError};

/// Network-layer address assigned to the station interface.
pub type Address = core::net::Ipv4Addr;

// ───────────────────────────────────────────────────────────────
// Network link (driven adapter: domain → WiFi driver)
// ───────────────────────────────────────────────────────────────

/// Platform wireless link.  Owned exclusively by the
/// [`LinkManager`](super::link::LinkManager).
pub trait NetworkLink {
    /// Start associating with `network_id`.  Must not block until ready;
    /// readiness is observed through [`is_ready`](Self::is_ready).
    fn connect(&mut self, network_id: &str, secret: &str) -> Result<(), LinkError>;

    /// Associated *and* holding an address.
    fn is_ready(&self) -> bool;

    /// Current station address, if one has been assigned.
    fn address(&self) -> Option<Address>;
}

// ───────────────────────────────────────────────────────────────
// HTTP transport (driven adapter: domain → HTTPS client)
// ───────────────────────────────────────────────────────────────

/// Factory for single-request HTTP connections.
///
/// A connection is an owned value; dropping it releases the socket and
/// any buffered response.  Callers therefore get release-on-every-path
/// for free by keeping the connection in a local binding.
pub trait HttpTransport {
    type Connection: HttpConnection;

    /// Open a connection whose request and response are bounded by `timeout_ms`.
    fn open(&mut self, timeout_ms: u32) -> Result<Self::Connection, TransportError>;
}

/// One request/response exchange.
pub trait HttpConnection {
    /// Send a `POST` and wait for the response status line.
    fn post(
        &mut self,
        url: &str,
        headers: &[(&str, &str)],
        body: &[u8],
    ) -> Result<u16, TransportError>;

    /// Read up to `buf.len()` bytes of the response body.  `Ok(0)` at end.
    fn read_body(&mut self, buf: &mut [u8]) -> Result<usize, TransportError>;
}

// ───────────────────────────────────────────────────────────────
// Time
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain reports progress and outcomes as
/// [`AppEvent`](super::events::AppEvent)s; adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Liveness
// ───────────────────────────────────────────────────────────────

/// Hardware or task watchdog fed once per controller iteration.
pub trait Watchdog {
    fn feed(&mut self);

    /// Stop supervising the caller until [`resume`](Self::resume).
    /// Brackets blocking calls whose worst case exceeds the reset timeout.
    fn suspend(&mut self);

    /// Supervise the caller again, with a fresh timeout.
    fn resume(&mut self);
}
