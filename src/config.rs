//! Notifier configuration
//!
//! Everything the firmware needs to know before the first button press:
//! network and gateway credentials, gateway endpoint, and the timing
//! bounds for the link wait, debounce and HTTP request.
//!
//! Loaded once at boot (from compile-time environment or a JSON
//! provisioning blob) and then passed by reference; nothing here is
//! mutated after [`NotifierConfig::validate`] succeeds.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::encoding::is_printable_ascii;
use crate::error::ConfigError;

/// Message sent on every activation unless overridden.
pub const DEFAULT_MESSAGE: &str = "Button Pressed!";

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// Immutable network + gateway credentials.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// WiFi SSID.
    pub network_id: heapless::String<32>,
    /// WiFi passphrase (empty for an open network).
    pub network_secret: heapless::String<64>,
    /// Gateway account SID.
    pub gateway_account_id: heapless::String<64>,
    /// Gateway auth token.
    pub gateway_auth_token: heapless::String<64>,
    /// Gateway-provisioned sender number.
    pub sender_address: heapless::String<24>,
    /// Destination number.
    pub recipient_address: heapless::String<24>,
}

impl Credentials {
    pub fn new(
        network_id: &str,
        network_secret: &str,
        gateway_account_id: &str,
        gateway_auth_token: &str,
        sender_address: &str,
        recipient_address: &str,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            network_id: bounded(network_id, "network_id too long")?,
            network_secret: bounded(network_secret, "network_secret too long")?,
            gateway_account_id: bounded(gateway_account_id, "gateway_account_id too long")?,
            gateway_auth_token: bounded(gateway_auth_token, "gateway_auth_token too long")?,
            sender_address: bounded(sender_address, "sender_address too long")?,
            recipient_address: bounded(recipient_address, "recipient_address too long")?,
        })
    }
}

// Secrets never reach the serial console.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("network_id", &self.network_id)
            .field("network_secret", &"<redacted>")
            .field("gateway_account_id", &self.gateway_account_id)
            .field("gateway_auth_token", &"<redacted>")
            .field("sender_address", &self.sender_address)
            .field("recipient_address", &self.recipient_address)
            .finish()
    }
}

fn bounded<const N: usize>(
    value: &str,
    why: &'static str,
) -> Result<heapless::String<N>, ConfigError> {
    let mut s = heapless::String::new();
    s.push_str(value).map_err(|()| ConfigError::Invalid(why))?;
    Ok(s)
}

// ---------------------------------------------------------------------------
// Gateway endpoint
// ---------------------------------------------------------------------------

/// How the `Authorization: Basic` credential is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AuthEncoding {
    /// RFC 7617: `base64(account_id ":" auth_token)`.
    #[default]
    Standard,
    /// Unencoded `account_id:auth_token`.
    Verbatim,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// API host, without scheme.
    pub host: heapless::String<64>,
    /// Path segment before `/Accounts`.
    pub api_version: heapless::String<16>,
    pub auth_encoding: AuthEncoding,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        let mut host = heapless::String::new();
        let _ = host.push_str("api.twilio.com");
        let mut api_version = heapless::String::new();
        let _ = api_version.push_str("2010-04-01");
        Self {
            host,
            api_version,
            auth_encoding: AuthEncoding::Standard,
        }
    }
}

// ---------------------------------------------------------------------------
// Timing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Raw level must be stable this long before it is believed.
    pub debounce_ms: u32,
    /// Minimum gap between two reported activations.
    pub cooldown_ms: u32,
    /// Controller loop period.
    pub poll_interval_ms: u32,
    /// Link readiness poll period during the startup wait.
    pub link_poll_interval_ms: u32,
    /// Upper bound on the startup link wait.
    pub link_timeout_ms: u32,
    /// Timeout for each socket operation of a gateway request.
    pub request_timeout_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 50,
            cooldown_ms: 1000,
            poll_interval_ms: 10,         // 100 Hz
            link_poll_interval_ms: 1000,  // 1 Hz
            link_timeout_ms: 30_000,
            request_timeout_ms: 8000,     // per socket operation
        }
    }
}

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifierConfig {
    pub credentials: Credentials,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default = "default_message")]
    pub message: heapless::String<160>,
}

fn default_message() -> heapless::String<160> {
    let mut m = heapless::String::new();
    let _ = m.push_str(DEFAULT_MESSAGE);
    m
}

impl NotifierConfig {
    /// Config with default gateway, timing and message.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            gateway: GatewayConfig::default(),
            timing: TimingConfig::default(),
            message: default_message(),
        }
    }

    /// Parse and validate a JSON provisioning blob.
    pub fn from_json(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_slice(bytes).map_err(|_| ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Build from `PRESSNOTIFY_*` variables captured at compile time.
    pub fn from_build_env() -> Result<Self, ConfigError> {
        let credentials = Credentials::new(
            required(option_env!("PRESSNOTIFY_WIFI_SSID"), "PRESSNOTIFY_WIFI_SSID")?,
            option_env!("PRESSNOTIFY_WIFI_PASSWORD").unwrap_or(""),
            required(option_env!("PRESSNOTIFY_ACCOUNT_SID"), "PRESSNOTIFY_ACCOUNT_SID")?,
            required(option_env!("PRESSNOTIFY_AUTH_TOKEN"), "PRESSNOTIFY_AUTH_TOKEN")?,
            required(option_env!("PRESSNOTIFY_FROM"), "PRESSNOTIFY_FROM")?,
            required(option_env!("PRESSNOTIFY_TO"), "PRESSNOTIFY_TO")?,
        )?;
        let config = Self::new(credentials);
        config.validate()?;
        Ok(config)
    }

    /// Range and format checks.  Rejects rather than clamps.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.credentials;
        if c.network_id.is_empty() {
            return Err(ConfigError::Missing("network_id"));
        }
        if c.gateway_account_id.is_empty() || !is_printable_ascii(&c.gateway_account_id) {
            return Err(ConfigError::Invalid("gateway_account_id must be printable ASCII"));
        }
        if c.gateway_auth_token.is_empty() {
            return Err(ConfigError::Missing("gateway_auth_token"));
        }
        if c.sender_address.is_empty() {
            return Err(ConfigError::Missing("sender_address"));
        }
        if !is_e164(&c.recipient_address) {
            return Err(ConfigError::Invalid("recipient_address must be E.164 (+ and 7-15 digits)"));
        }
        if self.gateway.host.is_empty() || self.gateway.api_version.is_empty() {
            return Err(ConfigError::Invalid("gateway host and api_version must be set"));
        }
        if self.message.is_empty() {
            return Err(ConfigError::Invalid("message must not be empty"));
        }

        let t = &self.timing;
        if t.debounce_ms == 0 || t.poll_interval_ms == 0 || t.link_poll_interval_ms == 0 {
            return Err(ConfigError::Invalid("intervals must be non-zero"));
        }
        if t.link_timeout_ms < t.link_poll_interval_ms {
            return Err(ConfigError::Invalid("link_timeout_ms shorter than one link poll"));
        }
        if t.request_timeout_ms == 0 {
            return Err(ConfigError::Invalid("request_timeout_ms must be non-zero"));
        }
        Ok(())
    }
}

fn required(value: Option<&'static str>, key: &'static str) -> Result<&'static str, ConfigError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ConfigError::Missing(key)),
    }
}

fn is_e164(number: &str) -> bool {
    let Some(digits) = number.strip_prefix('+') else {
        return false;
    };
    (7..=15).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit())
}
