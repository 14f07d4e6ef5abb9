//! Tracing subscriber setup.
//!
//! Diagnostics always go to stderr so stdout stays clean for results.
//! `RUST_LOG` overrides the level chosen from the CLI flags.

use tracing_subscriber::EnvFilter;

/// Returns the default filter directive for the output flags.
fn default_directive(verbose: bool, quiet: bool, json: bool) -> &'static str {
    if json {
        "off"
    } else if verbose {
        "info,scopex_core=debug,scopex_cli=debug"
    } else if quiet {
        "error"
    } else {
        "warn,scopex_core=warn,scopex_cli=warn"
    }
}

/// Initialize tracing/logging
pub fn init_tracing(verbose: bool, quiet: bool, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet, json)));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(verbose)
        .init();
}
