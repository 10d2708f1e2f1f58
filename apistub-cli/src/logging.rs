//! Tracing subscriber setup.
//!
//! `RUST_LOG` wins when set; otherwise the `-v` count picks the level.

use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter directive for a verbosity count.
pub fn directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "warn,apistub=info,apistub_cli=info",
        2 => "info,apistub=debug,apistub_cli=debug",
        _ => "debug,apistub=trace,apistub_cli=trace",
    }
}

/// Install the global subscriber, logging to stderr.
pub fn init(verbose: u8) {
    let base_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| directive(verbose).to_string());
    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(verbose >= 2)
                .with_file(verbose >= 3)
                .with_line_number(verbose >= 3)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}
