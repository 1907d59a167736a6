//! Error types for the PressNotify firmware.
//!
//! Each subsystem owns a small `Copy` error enum with a hand-written
//! `Display`.  Only [`LinkError`] is fatal; [`TransportError`] travels
//! inside [`DispatchOutcome`](crate::app::notify::DispatchOutcome) and never
//! escapes the control loop.

use core::fmt;

// ---------------------------------------------------------------------------
// Link errors
// ---------------------------------------------------------------------------

/// Failures while bringing the wireless link up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    /// SSID or secret failed validation before any radio activity.
    InvalidCredentials(&'static str),
    /// The platform driver refused the connect request.
    Rejected,
    /// The link did not report ready within the configured bound.
    Timeout { waited_ms: u64 },
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCredentials(why) => write!(f, "invalid network credentials: {why}"),
            Self::Rejected => write!(f, "network driver rejected the connect request"),
            Self::Timeout { waited_ms } => write!(f, "link not ready after {waited_ms} ms"),
        }
    }
}

impl core::error::Error for LinkError {}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

/// Network-level failure before a gateway status code was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// DNS, TCP or TLS setup failed.
    Connect,
    /// Writing the request headers or body failed.
    Send,
    /// No (readable) response arrived.
    Receive,
    /// The request exceeded its timeout.
    Timeout,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connect => write!(f, "connection failed"),
            Self::Send => write!(f, "request send failed"),
            Self::Receive => write!(f, "no response received"),
            Self::Timeout => write!(f, "request timed out"),
        }
    }
}

impl core::error::Error for TransportError {}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A required value was not supplied.  Carries the key name.
    Missing(&'static str),
    /// A value was supplied but failed validation.
    Invalid(&'static str),
    /// The provisioning blob was not valid JSON for [`NotifierConfig`](crate::config::NotifierConfig).
    Parse,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing(key) => write!(f, "missing config value: {key}"),
            Self::Invalid(why) => write!(f, "invalid config: {why}"),
            Self::Parse => write!(f, "config blob could not be parsed"),
        }
    }
}

impl core::error::Error for ConfigError {}
