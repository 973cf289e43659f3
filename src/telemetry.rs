//! Opt-in `tracing` setup for hosts embedding `statchart`.
//!
//! Rendering emits `debug!`/`trace!` events for layout decisions and `warn!`
//! for ignored JSON fields, but never installs a subscriber itself.

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "statchart=info";

/// Installs a compact subscriber filtered by `RUST_LOG`, or [`DEFAULT_FILTER`].
///
/// Returns `false` without the `telemetry` feature or when the host already
/// installed a global subscriber.
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing(DEFAULT_FILTER)
}

/// Same as [`init_default_tracing`] with an explicit fallback directive such as
/// `"statchart::charts=debug"`.
#[cfg(feature = "telemetry")]
#[must_use]
pub fn init_tracing(fallback: &str) -> bool {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .compact()
        .try_init()
        .is_ok()
}

#[cfg(not(feature = "telemetry"))]
#[must_use]
pub fn init_tracing(_fallback: &str) -> bool {
    false
}
