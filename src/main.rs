//! Press-to-notify firmware — main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  WifiLink        HttpsTransport     LogEventSink  SystemClock│
//! │  (NetworkLink)   (HttpTransport)    (EventSink)   (Clock)    │
//! │  PinDriver       TaskWatchdog                                │
//! │  (InputPin)      (Watchdog)                                  │
//! │                                                              │
//! │  ──────────────── Port Trait Boundary ───────────────────    │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │             Controller (pure logic)                    │  │
//! │  │  LinkManager · InputMonitor · NotificationClient       │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::{PinDriver, Pull};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::EspWifi;
use log::{error, info};

use pressnotify::adapters::https::HttpsTransport;
use pressnotify::adapters::log_sink::LogEventSink;
use pressnotify::adapters::time::SystemClock;
use pressnotify::adapters::wifi::WifiLink;
use pressnotify::app::service::Controller;
use pressnotify::config::NotifierConfig;
use pressnotify::drivers::watchdog::{TaskWatchdog, DEFAULT_TIMEOUT_MS};
use pressnotify::pins;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("pressnotify v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Configuration (baked in at build time) ─────────────
    let config = NotifierConfig::from_build_env().inspect_err(|e| {
        error!("Config invalid: {}", e);
    })?;
    info!("Config: {:?}", config.credentials);

    // ── 3. Peripherals ────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    let sys_loop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    let wifi = EspWifi::new(peripherals.modem, sys_loop, Some(nvs))?;

    let mut button = PinDriver::input(peripherals.pins.gpio15)?;
    button.set_pull(Pull::Up)?;
    info!("Button on GPIO{} (active low)", pins::BUTTON_GPIO);

    // ── 4. Controller ─────────────────────────────────────────
    let mut controller = Controller::new(
        &config,
        WifiLink::new(wifi),
        HttpsTransport::new(),
        button,
        SystemClock::new(),
        LogEventSink::new(),
    );

    // Returns only when the link never came up.
    let err = match controller.run(&mut FreeRtos, || TaskWatchdog::subscribe(DEFAULT_TIMEOUT_MS)) {
        Ok(never) => match never {},
        Err(e) => e,
    };
    error!("Startup failed: {}", err);
    Err(err.into())
}
