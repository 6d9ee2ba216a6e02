//! Tracing setup for tests
//!
//! Call [`init_test_setup`] from a `#[ctor::ctor]` hook or at the start of a
//! test. `RUST_LOG` overrides the default `meshtk=trace` filter.

use std::sync::Once;

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

pub fn init_test_setup() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("meshtk=trace"));
        let layer = fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(filter);

        // another test harness may have installed a subscriber already
        if tracing_subscriber::registry().with(layer).try_init().is_ok() {
            tracing::debug!("test tracing initialised");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_repeated_calls_when_initialising_then_no_panic() {
        init_test_setup();
        init_test_setup();
    }
}
