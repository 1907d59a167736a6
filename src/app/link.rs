//! Link manager — owns the wireless link lifecycle.
//!
//! ```text
//!   Disconnected ──connect()──▶ Connecting ──is_ready()──▶ Connected(addr)
//!         ▲                          │
//!         └──────── timeout ─────────┘
//! ```
//!
//! [`LinkManager::ensure_connected`] is one of the two blocking points in
//! the firmware: it polls the platform link at a fixed interval until the
//! station holds an address or the configured bound elapses.  There is no
//! reconnect-on-drop; a link lost mid-operation surfaces as a transport
//! error on the next dispatch.

use embedded_hal::delay::DelayNs;
use log::{error, info};

use crate::config::{Credentials, TimingConfig};
use crate::encoding::is_printable_ascii;
use crate::error::LinkError;

use super::events::AppEvent;
use super::ports::{Address, Clock, EventSink, NetworkLink};

// ───────────────────────────────────────────────────────────────
// State + policy
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Disconnected,
    Connecting,
    Connected(Address),
}

/// Bounds for the startup wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkPolicy {
    pub poll_interval_ms: u32,
    pub timeout_ms: u32,
}

impl From<&TimingConfig> for LinkPolicy {
    fn from(t: &TimingConfig) -> Self {
        Self {
            poll_interval_ms: t.link_poll_interval_ms,
            timeout_ms: t.link_timeout_ms,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Validation
// ───────────────────────────────────────────────────────────────

fn validate_network_id(ssid: &str) -> Result<(), LinkError> {
    if ssid.is_empty() || ssid.len() > 32 || !is_printable_ascii(ssid) {
        return Err(LinkError::InvalidCredentials(
            "SSID must be 1-32 printable ASCII bytes",
        ));
    }
    Ok(())
}

fn validate_secret(secret: &str) -> Result<(), LinkError> {
    if secret.is_empty() {
        return Ok(());
    }
    if secret.len() < 8 || secret.len() > 64 {
        return Err(LinkError::InvalidCredentials(
            "password must be 8-64 bytes for WPA2, or empty for open",
        ));
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// LinkManager
// ───────────────────────────────────────────────────────────────

pub struct LinkManager<L> {
    link: L,
    state: LinkState,
}

impl<L: NetworkLink> LinkManager<L> {
    pub fn new(link: L) -> Self {
        Self {
            link,
            state: LinkState::Disconnected,
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.state, LinkState::Connected(_))
    }

    /// Address recorded by the last successful [`ensure_connected`](Self::ensure_connected).
    pub fn current_address(&self) -> Option<Address> {
        match self.state {
            LinkState::Connected(addr) => Some(addr),
            _ => None,
        }
    }

    /// Read-only access to the platform link.
    pub fn link(&self) -> &L {
        &self.link
    }

    /// Bring the link up, or confirm it is already up.
    ///
    /// Returns immediately when the platform already reports ready.
    /// Otherwise issues one connect request and polls every
    /// `policy.poll_interval_ms` until ready or `policy.timeout_ms` has
    /// elapsed on `clock`.
    pub fn ensure_connected(
        &mut self,
        credentials: &Credentials,
        policy: LinkPolicy,
        clock: &impl Clock,
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
    ) -> Result<Address, LinkError> {
        if let Some(addr) = self.ready_address() {
            self.state = LinkState::Connected(addr);
            return Ok(addr);
        }

        validate_network_id(&credentials.network_id)?;
        validate_secret(&credentials.network_secret)?;

        info!("Link: connecting to '{}'", credentials.network_id);
        self.state = LinkState::Connecting;
        sink.emit(&AppEvent::LinkConnecting {
            network_id: credentials.network_id.clone(),
        });

        if let Err(e) = self
            .link
            .connect(&credentials.network_id, &credentials.network_secret)
        {
            error!("Link: connect request failed: {}", e);
            self.state = LinkState::Disconnected;
            return Err(e);
        }

        let started = clock.now_ms();
        let timeout = u64::from(policy.timeout_ms);

        loop {
            if let Some(addr) = self.ready_address() {
                self.state = LinkState::Connected(addr);
                info!("Link: connected, address {}", addr);
                sink.emit(&AppEvent::LinkConnected(addr));
                return Ok(addr);
            }

            let elapsed = clock.now_ms().saturating_sub(started);
            if elapsed >= timeout {
                error!("Link: not ready after {} ms, giving up", elapsed);
                self.state = LinkState::Disconnected;
                sink.emit(&AppEvent::LinkTimedOut { waited_ms: elapsed });
                return Err(LinkError::Timeout { waited_ms: elapsed });
            }

            // Never sleep past the deadline.
            let remaining = (timeout - elapsed).min(u64::from(policy.poll_interval_ms));
            delay.delay_ms(remaining as u32);

            sink.emit(&AppEvent::LinkWaiting {
                elapsed_ms: clock.now_ms().saturating_sub(started),
            });
        }
    }

    fn ready_address(&self) -> Option<Address> {
        if self.link.is_ready() {
            self.link.address()
        } else {
            None
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
