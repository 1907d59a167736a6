//! HTTPS client adapter.
//!
//! Implements [`HttpTransport`] / [`HttpConnection`] — one owned
//! connection per gateway request.  Dropping an [`HttpsConnection`]
//! closes the socket and frees the response buffers.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: `esp_idf_svc::http::client::EspHttpConnection`
//!   (esp_http_client + mbedTLS) with the built-in CA certificate bundle.
//! - **all other targets**: simulation stub that accepts every request
//!   with `201 Created` and a canned JSON body.

use log::debug;

#[cfg(target_os = "espidf")]
use log::warn;

#[cfg(target_os = "espidf")]
use esp_idf_svc::http::client::{Configuration, EspHttpConnection};
#[cfg(target_os = "espidf")]
use esp_idf_svc::{http::Method, io::Write};

use crate::app::ports::{HttpConnection, HttpTransport};
use crate::error::TransportError;

/// Codes from `esp_err.h` / `esp_http_client.h`.
#[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
mod esp_err {
    pub const ESP_ERR_TIMEOUT: i32 = 0x107;
    pub const ESP_ERR_HTTP_BASE: i32 = 0x7000;
    pub const ESP_ERR_HTTP_CONNECT: i32 = ESP_ERR_HTTP_BASE + 2;
    pub const ESP_ERR_HTTP_EAGAIN: i32 = ESP_ERR_HTTP_BASE + 7;
}

use esp_err::*;

/// Map an `esp_http_client` error code to the port's error.  `stage` is
/// used for codes that say nothing more specific.
#[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
fn classify(code: i32, stage: TransportError) -> TransportError {
    match code {
        ESP_ERR_TIMEOUT | ESP_ERR_HTTP_EAGAIN => TransportError::Timeout,
        ESP_ERR_HTTP_CONNECT => TransportError::Connect,
        _ => stage,
    }
}

/// Simulation: body returned for every request.
#[cfg(not(target_os = "espidf"))]
const SIM_REPLY: &[u8] = br#"{"sid":"SM00000000000000000000000000000000","status":"queued"}"#;

// ───────────────────────────────────────────────────────────────
// Transport (connection factory)
// ───────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct HttpsTransport;

impl HttpsTransport {
    pub fn new() -> Self {
        Self
    }
}

impl HttpTransport for HttpsTransport {
    type Connection = HttpsConnection;

    #[cfg(target_os = "espidf")]
    fn open(&mut self, timeout_ms: u32) -> Result<HttpsConnection, TransportError> {
        let config = Configuration {
            timeout: Some(core::time::Duration::from_millis(u64::from(timeout_ms))),
            crt_bundle_attach: Some(esp_idf_svc::sys::esp_crt_bundle_attach),
            ..Default::default()
        };
        let conn = EspHttpConnection::new(&config).map_err(|e| {
            warn!("HTTP: client init failed: {}", e);
            TransportError::Connect
        })?;
        Ok(HttpsConnection { conn })
    }

    #[cfg(not(target_os = "espidf"))]
    fn open(&mut self, timeout_ms: u32) -> Result<HttpsConnection, TransportError> {
        debug!("HTTP(sim): open (timeout {} ms)", timeout_ms);
        Ok(HttpsConnection {
            status: None,
            read_pos: 0,
        })
    }
}

// ───────────────────────────────────────────────────────────────
// Connection
// ───────────────────────────────────────────────────────────────

pub struct HttpsConnection {
    #[cfg(target_os = "espidf")]
    conn: EspHttpConnection,

    // ── Simulation fields ───────────────────────────────────────
    #[cfg(not(target_os = "espidf"))]
    status: Option<u16>,
    #[cfg(not(target_os = "espidf"))]
    read_pos: usize,
}

impl HttpConnection for HttpsConnection {
    #[cfg(target_os = "espidf")]
    fn post(
        &mut self,
        url: &str,
        headers: &[(&str, &str)],
        body: &[u8],
    ) -> Result<u16, TransportError> {
        self.conn
            .initiate_request(Method::Post, url, headers)
            .map_err(|e| {
                warn!("HTTP: request to gateway failed: {}", e);
                classify(e.code(), TransportError::Connect)
            })?;
        self.conn.write_all(body).map_err(|e| {
            warn!("HTTP: body write failed: {}", e);
            classify(e.0.code(), TransportError::Send)
        })?;
        self.conn.initiate_response().map_err(|e| {
            warn!("HTTP: no response: {}", e);
            classify(e.code(), TransportError::Receive)
        })?;

        let status = self.conn.status();
        debug!("HTTP: POST {} -> {}", url, status);
        Ok(status)
    }

    #[cfg(not(target_os = "espidf"))]
    fn post(
        &mut self,
        url: &str,
        _headers: &[(&str, &str)],
        body: &[u8],
    ) -> Result<u16, TransportError> {
        debug!("HTTP(sim): POST {} ({} bytes) -> 201", url, body.len());
        self.status = Some(201);
        Ok(201)
    }

    #[cfg(target_os = "espidf")]
    fn read_body(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
        self.conn.read(buf).map_err(|e| {
            debug!("HTTP: body read failed: {}", e);
            classify(e.code(), TransportError::Receive)
        })
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_body(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
        if self.status.is_none() {
            return Err(TransportError::Receive);
        }
        let rest = &SIM_REPLY[self.read_pos..];
        let n = rest.len().min(buf.len());
        buf[..n].copy_from_slice(&rest[..n]);
        self.read_pos += n;
        Ok(n)
    }
}
