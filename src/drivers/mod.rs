//! Button sampling and the task watchdog.

pub mod button;
pub mod watchdog;
