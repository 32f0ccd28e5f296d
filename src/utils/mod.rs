use std::sync::Once;

const DEFAULT_DIRECTIVE: &str = "account_master=info";

static TRACING_INIT: Once = Once::new();

/// Installs the global tracing subscriber. Output goes to stderr so scripted stdout stays clean.
/// `RUST_LOG` overrides the default `account_master=info` directive.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}
