//! Notification client — one SMS per call through the messaging gateway.
//!
//! ## Wire contract
//!
//! ```text
//! POST https://<host>/<api_version>/Accounts/<account_id>/Messages.json
//! Authorization: Basic <credential>
//! Content-Type: application/x-www-form-urlencoded
//!
//! To=<recipient>&From=<sender>&Body=<message>
//! ```
//!
//! ## Outcome classification
//!
//! | Result                               | Outcome                   |
//! |--------------------------------------|---------------------------|
//! | 2xx (201 Created from the gateway)   | `Success`                 |
//! | 401                                  | `AuthFailure`             |
//! | any other status                     | `GatewayError(status)`    |
//! | no status obtained                   | `TransportError(cause)`   |
//!
//! Exactly one attempt per call.  The connection is a local binding, so
//! it is dropped (socket closed, response discarded) on every return path.

use core::fmt;

use log::{debug, info, warn};
use serde::Deserialize;

use crate::config::{AuthEncoding, Credentials, GatewayConfig};
use crate::encoding::{base64_encode, form_body};
use crate::error::TransportError;

use super::ports::{HttpConnection, HttpTransport};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Only the head of the gateway reply is kept for diagnostics.
const MAX_REPLY_LEN: usize = 1024;

// ───────────────────────────────────────────────────────────────
// DispatchOutcome
// ───────────────────────────────────────────────────────────────

/// Classified result of one notification attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Success,
    /// The gateway rejected the account credentials (HTTP 401).
    AuthFailure,
    /// The gateway answered with a non-success status.
    GatewayError(u16),
    /// No status was obtained.
    TransportError(TransportError),
}

impl DispatchOutcome {
    /// Map an HTTP status to an outcome.
    pub fn from_status(status: u16) -> Self {
        match status {
            200..=299 => Self::Success,
            401 => Self::AuthFailure,
            other => Self::GatewayError(other),
        }
    }
}

impl fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "message sent successfully"),
            Self::AuthFailure => write!(
                f,
                "authentication failed, check account id, auth token and numbers"
            ),
            Self::GatewayError(status) => write!(f, "gateway refused message (HTTP {status})"),
            Self::TransportError(e) => write!(f, "transport error: {e}"),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Request construction
// ───────────────────────────────────────────────────────────────

/// Fully rendered gateway request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsRequest {
    pub url: String,
    pub authorization: String,
    pub body: String,
}

impl SmsRequest {
    pub fn build(credentials: &Credentials, gateway: &GatewayConfig, message: &str) -> Self {
        let url = format!(
            "https://{}/{}/Accounts/{}/Messages.json",
            gateway.host, gateway.api_version, credentials.gateway_account_id
        );

        let pair = format!(
            "{}:{}",
            credentials.gateway_account_id, credentials.gateway_auth_token
        );
        let authorization = match gateway.auth_encoding {
            AuthEncoding::Standard => format!("Basic {}", base64_encode(pair.as_bytes())),
            AuthEncoding::Verbatim => format!("Basic {pair}"),
        };

        let body = form_body(&[
            ("To", credentials.recipient_address.as_str()),
            ("From", credentials.sender_address.as_str()),
            ("Body", message),
        ]);

        Self {
            url,
            authorization,
            body,
        }
    }
}

/// Fields of interest in the gateway's JSON reply.  Absent fields and
/// unparseable bodies are tolerated.
#[derive(Debug, Default, Deserialize)]
struct GatewayReply<'a> {
    #[serde(borrow, default)]
    sid: Option<&'a str>,
    #[serde(default)]
    code: Option<u32>,
    #[serde(borrow, default)]
    message: Option<&'a str>,
}

// ───────────────────────────────────────────────────────────────
// NotificationClient
// ───────────────────────────────────────────────────────────────

pub struct NotificationClient<'a, T> {
    transport: T,
    credentials: &'a Credentials,
    gateway: &'a GatewayConfig,
    request_timeout_ms: u32,
}

impl<'a, T: HttpTransport> NotificationClient<'a, T> {
    pub fn new(
        transport: T,
        credentials: &'a Credentials,
        gateway: &'a GatewayConfig,
        request_timeout_ms: u32,
    ) -> Self {
        Self {
            transport,
            credentials,
            gateway,
            request_timeout_ms,
        }
    }

    /// Send `message` to the configured recipient.  Caller guarantees
    /// the link is up.
    pub fn notify(&mut self, message: &str) -> DispatchOutcome {
        info!("SMS: sending to {}", self.credentials.recipient_address);
        let request = SmsRequest::build(self.credentials, self.gateway, message);

        let mut reply = [0u8; MAX_REPLY_LEN];
        match self.exchange(&request, &mut reply) {
            Ok((status, len)) => {
                let outcome = DispatchOutcome::from_status(status);
                log_reply(outcome, status, &reply[..len]);
                outcome
            }
            Err(e) => {
                warn!("SMS: no response from gateway: {}", e);
                DispatchOutcome::TransportError(e)
            }
        }
    }

    /// One request/response.  The connection is released when this
    /// returns, whichever path it takes.
    fn exchange(
        &mut self,
        request: &SmsRequest,
        reply: &mut [u8],
    ) -> Result<(u16, usize), TransportError> {
        let mut conn = self.transport.open(self.request_timeout_ms)?;

        let content_length = request.body.len().to_string();
        let headers = [
            ("Authorization", request.authorization.as_str()),
            ("Content-Type", FORM_CONTENT_TYPE),
            ("Content-Length", content_length.as_str()),
            ("Accept", "application/json"),
        ];
        let status = conn.post(&request.url, &headers, request.body.as_bytes())?;

        Ok((status, read_reply(&mut conn, reply)))
    }
}

/// Fill `buf` from the response body.  A failing read after the status
/// line only truncates the diagnostics.
fn read_reply(conn: &mut impl HttpConnection, buf: &mut [u8]) -> usize {
    let mut filled = 0;
    while filled < buf.len() {
        match conn.read_body(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) => {
                debug!("SMS: reply body truncated at {} bytes: {}", filled, e);
                break;
            }
        }
    }
    filled
}

fn log_reply(outcome: DispatchOutcome, status: u16, body: &[u8]) {
    let reply: GatewayReply<'_> = serde_json::from_slice(body).unwrap_or_default();
    match outcome {
        DispatchOutcome::Success => {
            debug!("SMS: gateway accepted (HTTP {}, sid={:?})", status, reply.sid);
        }
        _ => {
            warn!(
                "SMS: gateway replied HTTP {} (code={:?}, message={:?})",
                status, reply.code, reply.message
            );
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
