//! Fuzz target: JSON provisioning blob
//!
//! Feeds arbitrary bytes to `NotifierConfig::from_json` and verifies:
//! - No panics under arbitrary input
//! - Anything accepted also passes `validate()` and survives a
//!   serialise/parse cycle unchanged
//!
//! cargo fuzz run fuzz_config_json

#![no_main]

use libfuzzer_sys::fuzz_target;
use pressnotify::config::NotifierConfig;

fuzz_target!(|data: &[u8]| {
    let Ok(config) = NotifierConfig::from_json(data) else {
        return;
    };
    assert!(config.validate().is_ok());

    let json = serde_json::to_vec(&config).expect("accepted config serialises");
    let again = NotifierConfig::from_json(&json).expect("serialised config parses");
    assert_eq!(config, again);
});
