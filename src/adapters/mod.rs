//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements                     | Connects to               |
//! |------------|--------------------------------|---------------------------|
//! | `https`    | HttpTransport, HttpConnection  | esp_http_client + mbedTLS |
//! | `log_sink` | EventSink                      | Serial log output         |
//! | `time`     | Clock                          | ESP32 system timer        |
//! | `wifi`     | NetworkLink                    | ESP-IDF WiFi STA          |

pub mod https;
pub mod log_sink;
pub mod time;
pub mod wifi;
