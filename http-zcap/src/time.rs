#[cfg(target_arch = "wasm32")]
pub use instant::SystemTime;
#[cfg(not(target_arch = "wasm32"))]
pub use std::time::SystemTime;

/// The number of seconds an invocation signature stays valid when no explicit
/// expiration is given
pub const DEFAULT_EXPIRATION_WINDOW: u64 = 600;

/// Current POSIX time in whole seconds
pub fn now() -> u64 {
    to_unix_seconds(SystemTime::now())
}

/// Whole seconds since the epoch; times before the epoch clamp to zero
pub fn to_unix_seconds(time: SystemTime) -> u64 {
    time.duration_since(SystemTime::UNIX_EPOCH)
        .map(|duration| duration.as_secs())
        .unwrap_or_default()
}

/// An explicit expiration is used verbatim, otherwise the signature expires
/// `lifetime` seconds after it was created.
pub fn resolve_expiration(created: u64, expiration: Option<u64>, lifetime: u64) -> u64 {
    match expiration {
        Some(expiration) => expiration,
        None => created.saturating_add(lifetime),
    }
}
