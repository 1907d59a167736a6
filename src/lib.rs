//! Press-to-notify firmware library.
//!
//! Exposes the pure-logic modules for integration testing. All
//! ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`
//! within each module; host builds get simulation stubs.

#![deny(unused_must_use)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod encoding;
pub mod error;
pub mod pins;
