use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Only installs a subscriber when `RUST_LOG` is set, so the terminal UI is
/// left alone by default. Output goes to stderr, e.g.
/// `RUST_LOG=pocketcalc=debug pocketcalc 2>calc.log`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_ansi(false)
                        .with_target(true),
                )
                .with(filter)
                .init();
        }
    });
}
