//! Fuzz target: `InputMonitor` debounce + cooldown
//!
//! Each input byte is one poll: bit 0 is the pin level, the upper bits
//! the time step (0..=127 ms).  Verifies:
//! - No panics, including zero-length time steps
//! - Activation timestamps never go backwards
//! - Two activations are never closer than the cooldown
//! - Sequence numbers count up from 1 without gaps
//!
//! cargo fuzz run fuzz_input_monitor

#![no_main]

use std::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin};
use libfuzzer_sys::fuzz_target;
use pressnotify::config::TimingConfig;
use pressnotify::drivers::button::InputMonitor;

struct Level(bool);

impl ErrorType for Level {
    type Error = Infallible;
}

impl InputPin for Level {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(!self.0)
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(self.0)
    }
}

fuzz_target!(|data: &[u8]| {
    let timing = TimingConfig::default();
    let mut monitor = InputMonitor::new(Level(false), &timing);
    let mut now = 0u64;
    let mut last: Option<(u64, u32)> = None;

    for &byte in data {
        now += u64::from(byte >> 1);
        monitor.pin_mut().0 = byte & 1 == 1;

        if let Some(event) = monitor.poll(now) {
            assert_eq!(event.at_ms, now);
            match last {
                Some((at, seq)) => {
                    assert!(event.at_ms - at >= u64::from(timing.cooldown_ms));
                    assert_eq!(event.sequence, seq + 1);
                }
                None => assert_eq!(event.sequence, 1),
            }
            last = Some((event.at_ms, event.sequence));
        }
    }
});
