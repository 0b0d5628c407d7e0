//! Opt-in tracing setup for hosts embedding `gantt-rs`.
//!
//! The library only emits `tracing` events; installing a subscriber is the
//! host's call. These helpers cover the common case behind the `telemetry`
//! feature.

/// Filter used when `RUST_LOG` is unset: engine diagnostics at `debug`,
/// everything else at `info`.
pub const DEFAULT_FILTER: &str = "info,gantt_rs=debug";

/// Installs a compact fmt subscriber filtered by `RUST_LOG`, falling back
/// to [`DEFAULT_FILTER`].
///
/// Returns `false` when the feature is disabled or a global subscriber is
/// already set.
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing_with_filter(DEFAULT_FILTER)
}

/// Same as [`init_default_tracing`] with an explicit fallback directive.
#[must_use]
pub fn init_tracing_with_filter(fallback_directive: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback_directive));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok()
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = fallback_directive;
        false
    }
}
