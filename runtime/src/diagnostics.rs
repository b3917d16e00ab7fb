/*!
Diagnostics - opt-in tracing for the runtime

Compiled programs own stdout, so runtime events only ever go to stderr and
only when `LATTE_RUNTIME_LOG` holds a filter directive such as `debug`.
*/

use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable holding the `EnvFilter` directive
pub const LOG_ENV: &str = "LATTE_RUNTIME_LOG";

static INIT: Once = Once::new();

/// Install the stderr subscriber the first time any entry point runs.
///
/// A no-op when the variable is unset or another subscriber is already
/// installed.
pub fn init() {
    INIT.call_once(|| {
        let Ok(env_filter) = EnvFilter::try_from_env(LOG_ENV) else {
            return;
        };

        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .with(env_filter)
            .try_init();
    });
}
