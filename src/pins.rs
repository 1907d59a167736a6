//! GPIO assignments.
//!
//! Single source of truth for pin numbers.  `main.rs` takes the matching
//! `Peripherals` field; keep the two in step when rewiring.

// ---------------------------------------------------------------------------
// Push-button (active-low, internal pull-up)
// ---------------------------------------------------------------------------

/// Momentary push-button between this pin and GND.
pub const BUTTON_GPIO: i32 = 15;
