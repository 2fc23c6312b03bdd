//! The `agc` driver: load a binding description, report what is wrong with
//! it, list it, or write its used part back out.

pub mod commands;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install the global tracing subscriber. Safe to call more than once.
///
/// Nothing is installed unless `RUST_LOG` is set or `verbose` is on;
/// `verbose` also switches to indented span trees and defaults the filter
/// to `debug`. Try `RUST_LOG=ag_ir=trace agc check doc.json`.
pub fn init_tracing(verbose: bool) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) if verbose => EnvFilter::new("debug"),
            Err(_) => return,
        };

        if verbose {
            tracing_subscriber::registry()
                .with(
                    tracing_tree::HierarchicalLayer::new(2)
                        .with_targets(true)
                        .with_writer(std::io::stderr),
                )
                .with(filter)
                .init();
        } else {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_level(true)
                        .with_writer(std::io::stderr),
                )
                .with(filter)
                .init();
        }
    });
}
