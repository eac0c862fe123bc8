//! Tracing subscriber bootstrap for hosts embedding the kernel.
//!
//! The kernel itself only emits `tracing` events. Hosts that do not install
//! their own subscriber can call [`init_tracing`].

use tracing_subscriber::{fmt, fmt::format::FmtSpan, prelude::*, EnvFilter};

/// Environment variable selecting `json` (default) or `pretty` output.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "impact_kernel=info";

/// Install a global subscriber.
///
/// Honors `RUST_LOG` and `LOG_FORMAT`. Returns `false` if a global subscriber
/// was already installed, in which case nothing changes.
pub fn init_tracing() -> bool {
    let log_format = std::env::var(LOG_FORMAT_ENV).unwrap_or_else(|_| "json".to_string());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());

    if log_format == "pretty" {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
            .is_ok()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
            .is_ok()
    }
}
