//! Task Watchdog Timer (TWDT) driver.
//!
//! Resets the device if the controller loop stops feeding it for longer
//! than the configured timeout.  Subscribed only once the startup link
//! wait is over, so the wait itself is bounded by the link timeout alone.
//!
//! The gateway request is not covered: the HTTP client's timeout applies
//! per socket operation (DNS is not bounded at all), so the controller
//! unsubscribes around it via [`Watchdog::suspend`] / [`Watchdog::resume`].

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use log::{debug, info};

use crate::app::ports::Watchdog;

/// Default reset timeout.
pub const DEFAULT_TIMEOUT_MS: u32 = 10_000;

pub struct TaskWatchdog {
    subscribed: bool,
    timeout_ms: u32,
}

impl TaskWatchdog {
    /// Configure the TWDT and subscribe the calling task.
    pub fn subscribe(timeout_ms: u32) -> Self {
        #[cfg(target_os = "espidf")]
        {
            unsafe {
                let cfg = esp_task_wdt_config_t {
                    timeout_ms,
                    idle_core_mask: 0,
                    trigger_panic: true,
                };
                let ret = esp_task_wdt_reconfigure(&cfg);
                if ret != ESP_OK {
                    log::warn!(
                        "TWDT reconfigure returned {} (may already be configured)",
                        ret
                    );
                }
            }
        }

        let mut wd = Self {
            subscribed: false,
            timeout_ms,
        };
        wd.add_task();
        if wd.subscribed {
            info!("Watchdog: subscribed ({} ms timeout, panic on trigger)", timeout_ms);
        }
        wd
    }

    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    /// Whether the calling task is currently supervised.
    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn add_task(&mut self) {
        let ret = unsafe { esp_task_wdt_add(core::ptr::null_mut()) };
        self.subscribed = ret == ESP_OK;
        if !self.subscribed {
            log::warn!("Watchdog: failed to subscribe ({})", ret);
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn add_task(&mut self) {
        self.subscribed = true;
    }

    #[cfg(target_os = "espidf")]
    fn delete_task(&mut self) {
        let ret = unsafe { esp_task_wdt_delete(core::ptr::null_mut()) };
        if ret != ESP_OK {
            log::warn!("Watchdog: failed to unsubscribe ({})", ret);
        }
        self.subscribed = false;
    }

    #[cfg(not(target_os = "espidf"))]
    fn delete_task(&mut self) {
        self.subscribed = false;
    }
}

impl Watchdog for TaskWatchdog {
    fn feed(&mut self) {
        #[cfg(target_os = "espidf")]
        {
            if self.subscribed {
                unsafe {
                    esp_task_wdt_reset();
                }
            }
        }
    }

    fn suspend(&mut self) {
        if self.subscribed {
            debug!("Watchdog: suspended");
            self.delete_task();
        }
    }

    fn resume(&mut self) {
        if !self.subscribed {
            self.add_task();
            debug!("Watchdog: resumed");
        }
    }
}
