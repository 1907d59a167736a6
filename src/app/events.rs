//! Outbound application events.
//!
//! The link manager and controller emit these through the
//! [`EventSink`](super::ports::EventSink) port.  Every dispatch attempt
//! produces exactly one [`AppEvent::Dispatch`].

use crate::drivers::button::ActivationEvent;

use super::notify::DispatchOutcome;
use super::ports::Address;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// A connect request was issued for this SSID.
    LinkConnecting { network_id: heapless::String<32> },

    /// Still waiting for the link after `elapsed_ms`.
    LinkWaiting { elapsed_ms: u64 },

    /// The link is ready with this address.
    LinkConnected(Address),

    /// The startup wait gave up.
    LinkTimedOut { waited_ms: u64 },

    /// A debounced press was detected.
    Activation(ActivationEvent),

    /// Result of one notification attempt.
    Dispatch(DispatchOutcome),
}
