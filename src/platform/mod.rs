//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Run seeds from the wall clock
//! - JS bindings (scene callbacks, LocalStorage) on wasm32

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Seed derived from the current time
#[cfg(target_arch = "wasm32")]
pub fn clock_seed() -> u64 {
    js_sys::Date::now() as u64
}

/// Seed derived from the current time
#[cfg(not(target_arch = "wasm32"))]
pub fn clock_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5EED)
}
