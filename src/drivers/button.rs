//! Polled, debounced push-button monitor.
//!
//! ## Hardware
//!
//! Active-low momentary switch on a pull-up input: logical low means
//! pressed.  [`InputMonitor::poll`] is called once per controller loop
//! iteration and performs exactly one pin read, so it never blocks.
//!
//! ## Debounce
//!
//! ```text
//!          raw stable ≥ debounce_ms
//!   Idle ─────────────────────────────▶ Pressed   (yields ActivationEvent)
//!        ◀─────────────────────────────           (release, no event)
//!          raw stable ≥ debounce_ms
//! ```
//!
//! Every raw level change restarts the stability timer, so a contact that
//! keeps bouncing never settles and never produces an event.  An
//! Idle → Pressed flip within `cooldown_ms` of the previous activation is
//! swallowed.

use embedded_hal::digital::InputPin;
use log::{debug, warn};

use crate::config::TimingConfig;

/// A debounced not-pressed → pressed transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivationEvent {
    /// Monotonic time at which the press was confirmed.
    pub at_ms: u64,
    /// 1-based count of activations reported since boot.
    pub sequence: u32,
}

/// Sampled and filtered button state.  `true` means pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonState {
    pub raw_level: bool,
    pub debounced: bool,
    pub last_change_ms: u64,
}

pub struct InputMonitor<P> {
    pin: P,
    state: ButtonState,
    debounce_ms: u64,
    cooldown_ms: u64,
    last_activation_ms: Option<u64>,
    activations: u32,
}

impl<P: InputPin> InputMonitor<P> {
    pub fn new(pin: P, timing: &TimingConfig) -> Self {
        Self {
            pin,
            state: ButtonState {
                raw_level: false,
                debounced: false,
                last_change_ms: 0,
            },
            debounce_ms: u64::from(timing.debounce_ms),
            cooldown_ms: u64::from(timing.cooldown_ms),
            last_activation_ms: None,
            activations: 0,
        }
    }

    pub fn state(&self) -> ButtonState {
        self.state
    }

    /// The pin this monitor samples.
    pub fn pin_mut(&mut self) -> &mut P {
        &mut self.pin
    }

    /// Sample the pin once.  `now_ms` is monotonic time in milliseconds.
    /// Returns an event on a debounced, non-cooled-down press.
    pub fn poll(&mut self, now_ms: u64) -> Option<ActivationEvent> {
        match self.pin.is_low() {
            Ok(pressed) => self.sample(pressed, now_ms),
            Err(e) => {
                warn!("Button: pin read failed ({:?}), sample skipped", e);
                None
            }
        }
    }

    fn sample(&mut self, pressed: bool, now_ms: u64) -> Option<ActivationEvent> {
        if pressed != self.state.raw_level {
            self.state.raw_level = pressed;
            self.state.last_change_ms = now_ms;
            return None;
        }

        let stable_ms = now_ms.saturating_sub(self.state.last_change_ms);
        if pressed == self.state.debounced || stable_ms < self.debounce_ms {
            return None;
        }

        self.state.debounced = pressed;
        if !pressed {
            return None;
        }

        if let Some(last) = self.last_activation_ms {
            if now_ms.saturating_sub(last) < self.cooldown_ms {
                debug!("Button: press within cooldown, ignored");
                return None;
            }
        }

        self.last_activation_ms = Some(now_ms);
        self.activations = self.activations.wrapping_add(1);
        Some(ActivationEvent {
            at_ms: now_ms,
            sequence: self.activations,
        })
    }
}
