fn main() {
    // Credentials are baked in at compile time via `option_env!`; rebuild
    // whenever any of them changes.
    for var in [
        "PRESSNOTIFY_WIFI_SSID",
        "PRESSNOTIFY_WIFI_PASSWORD",
        "PRESSNOTIFY_ACCOUNT_SID",
        "PRESSNOTIFY_AUTH_TOKEN",
        "PRESSNOTIFY_FROM",
        "PRESSNOTIFY_TO",
    ] {
        println!("cargo:rerun-if-env-changed={var}");
    }

    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
