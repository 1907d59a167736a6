//! WiFi station-mode adapter.
//!
//! Implements [`NetworkLink`] — the hexagonal boundary for network
//! connectivity.  `connect()` only starts association; readiness (associated
//! and holding a DHCP lease) is observed by polling `is_ready()`.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver calls via `esp_idf_svc::wifi`.
//! - **all other targets**: simulation stub that becomes ready a fixed
//!   number of polls after `connect()`.

use log::info;

#[cfg(target_os = "espidf")]
use log::error;

#[cfg(target_os = "espidf")]
use esp_idf_svc::wifi::{AuthMethod, ClientConfiguration, Configuration, EspWifi};

use crate::app::ports::{Address, NetworkLink};
use crate::error::LinkError;

/// Simulation: readiness checks after `connect()` before the link is up.
#[cfg(not(target_os = "espidf"))]
const SIM_READY_AFTER_CHECKS: u32 = 3;

/// Simulation: address handed out by the fake DHCP server.
#[cfg(not(target_os = "espidf"))]
const SIM_ADDRESS: Address = Address::new(192, 168, 4, 2);

// ───────────────────────────────────────────────────────────────
// WiFi adapter
// ───────────────────────────────────────────────────────────────

pub struct WifiLink {
    #[cfg(target_os = "espidf")]
    wifi: EspWifi<'static>,

    // ── Simulation fields ───────────────────────────────────────
    #[cfg(not(target_os = "espidf"))]
    associating: bool,
    #[cfg(not(target_os = "espidf"))]
    checks: core::cell::Cell<u32>,
}

impl WifiLink {
    #[cfg(target_os = "espidf")]
    pub fn new(wifi: EspWifi<'static>) -> Self {
        Self { wifi }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Self {
        Self {
            associating: false,
            checks: core::cell::Cell::new(0),
        }
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_connect(&mut self, ssid: &str, secret: &str) -> Result<(), LinkError> {
        let auth_method = if secret.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        let config = Configuration::Client(ClientConfiguration {
            ssid: ssid
                .try_into()
                .map_err(|()| LinkError::InvalidCredentials("SSID too long"))?,
            password: secret
                .try_into()
                .map_err(|()| LinkError::InvalidCredentials("password too long"))?,
            auth_method,
            ..Default::default()
        });

        self.wifi.set_configuration(&config).map_err(|e| {
            error!("WiFi: set_configuration failed: {}", e);
            LinkError::Rejected
        })?;
        if !self.wifi.is_started().unwrap_or(false) {
            self.wifi.start().map_err(|e| {
                error!("WiFi: start failed: {}", e);
                LinkError::Rejected
            })?;
        }
        // Non-blocking: association and DHCP complete in the background.
        self.wifi.connect().map_err(|e| {
            error!("WiFi: connect failed: {}", e);
            LinkError::Rejected
        })
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_connect(&mut self, ssid: &str, _secret: &str) -> Result<(), LinkError> {
        info!("WiFi(sim): associating with '{}'", ssid);
        self.associating = true;
        self.checks.set(0);
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_is_ready(&self) -> bool {
        self.wifi.is_connected().unwrap_or(false) && self.wifi.is_up().unwrap_or(false)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_is_ready(&self) -> bool {
        if !self.associating {
            return false;
        }
        let n = self.checks.get().saturating_add(1);
        self.checks.set(n);
        n > SIM_READY_AFTER_CHECKS
    }

    #[cfg(target_os = "espidf")]
    fn platform_address(&self) -> Option<Address> {
        self.wifi
            .sta_netif()
            .get_ip_info()
            .ok()
            .map(|info| info.ip)
            .filter(|ip| !ip.is_unspecified())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_address(&self) -> Option<Address> {
        (self.checks.get() > SIM_READY_AFTER_CHECKS).then_some(SIM_ADDRESS)
    }
}

#[cfg(not(target_os = "espidf"))]
impl Default for WifiLink {
    fn default() -> Self {
        Self::new()
    }
}

// ───────────────────────────────────────────────────────────────
// NetworkLink
// ───────────────────────────────────────────────────────────────

impl NetworkLink for WifiLink {
    fn connect(&mut self, network_id: &str, secret: &str) -> Result<(), LinkError> {
        info!("WiFi: connect request for '{}'", network_id);
        self.platform_connect(network_id, secret)
    }

    fn is_ready(&self) -> bool {
        self.platform_is_ready()
    }

    fn address(&self) -> Option<Address> {
        self.platform_address()
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
