//! Application core — link lifecycle, notification dispatch, orchestration.
//!
//! All interaction with hardware and the network happens through the
//! **port traits** in [`ports`] (plus `embedded-hal` for GPIO and delays),
//! keeping this layer testable on the host with mock adapters.

pub mod events;
pub mod link;
pub mod notify;
pub mod ports;
pub mod service;
