//! Console logging for the `fanline` binary.
//!
//! Log output goes to stderr so that stdout only carries the final report.
//! Verbosity is controlled through `RUST_LOG` (default `info`). Stage-level
//! events from the library are emitted at `debug` and `trace`:
//!
//! ```bash
//! RUST_LOG=fanline=trace fanline --workers 3 --timeout-ms 50
//! ```

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_telemetry() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_thread_names(true)
                .with_line_number(true)
                .with_target(false)
                .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
                .with_file(true)
                .pretty(),
        )
        .try_init()?;

    Ok(())
}
