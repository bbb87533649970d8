//! Tracing subscriber setup for the `budgetcal` binary

use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding the log filter
pub const LOG_ENV_VAR: &str = "BUDGET_CALENDAR_LOG";

const DEFAULT_FILTER: &str = "budget_calendar=info";

static TRACING_INIT: Once = Once::new();

/// Install the global subscriber. Logs go to stderr so command output on
/// stdout stays clean. Later calls are no-ops.
pub fn init() {
    TRACING_INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        // A subscriber installed by an embedding application wins
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}
