//! `tracing` subscriber setup shared by the binaries.

use tracing_subscriber::{fmt, EnvFilter};

/// Installs a stderr subscriber.
///
/// With no `-v`, `RUST_LOG` is honoured and the level defaults to `warn`;
/// each `-v` raises it (`info`, `debug`, `trace`). Calling this twice is a
/// no-op.
pub fn init(verbosity: u8) {
    let filter = match verbosity {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}
