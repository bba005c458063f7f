use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber. Output goes to stderr so that
/// shell output on stdout stays clean for scripts. When another subscriber
/// is already installed, the failure is reported on stderr and the existing
/// one is kept.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let mut filter = EnvFilter::from_default_env();
        if std::env::var_os("RUST_LOG").is_none() {
            if let Ok(directive) = "expense_core=info".parse() {
                filter = filter.add_directive(directive);
            }
        }

        if let Err(err) = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
        {
            eprintln!("expense_core: tracing subscriber not installed: {err}");
        }
    });
}
