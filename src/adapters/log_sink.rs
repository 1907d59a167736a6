//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing one human-readable line per
//! application event to the `log` facade (UART / USB-CDC on the device).

use log::{error, info, warn};

use crate::app::events::AppEvent;
use crate::app::notify::DispatchOutcome;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::LinkConnecting { network_id } => {
                info!("LINK  | connecting to '{}'", network_id);
            }
            AppEvent::LinkWaiting { elapsed_ms } => {
                info!("LINK  | still trying ({} ms)", elapsed_ms);
            }
            AppEvent::LinkConnected(addr) => {
                info!("LINK  | connected, address {}", addr);
            }
            AppEvent::LinkTimedOut { waited_ms } => {
                error!("LINK  | gave up after {} ms", waited_ms);
            }
            AppEvent::Activation(a) => {
                info!("PRESS | #{} at {} ms", a.sequence, a.at_ms);
            }
            AppEvent::Dispatch(outcome @ DispatchOutcome::Success) => {
                info!("SMS   | {}", outcome);
            }
            AppEvent::Dispatch(outcome) => {
                warn!("SMS   | {}", outcome);
            }
        }
    }
}
