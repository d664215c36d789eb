//! Logging setup
//!
//! Library code only emits `tracing` events. Native hosts call
//! [`init_tracing`] once at startup; browser hosts install their own
//! subscriber.

/// Default filter directive when `RUST_LOG` is unset
pub const DEFAULT_DIRECTIVE: &str = "dadam_client=info";

/// Install a fmt subscriber filtered by `RUST_LOG`
///
/// Returns false when a global subscriber was already installed.
#[cfg(feature = "native")]
pub fn init_tracing() -> bool {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}

#[cfg(all(test, feature = "native"))]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_refused() {
        init_tracing();
        assert!(!init_tracing());
    }
}
