use crate::config::app_config::Environment;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "info,tower_http=info,sqlx=warn";

/// Initialize the global tracing subscriber.
///
/// The filter comes from `RUST_LOG` and falls back to `info`. Production writes one JSON
/// object per line; every other environment uses the human readable formatter.
pub fn init_logging(environment: Environment) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let registry = tracing_subscriber::registry().with(env_filter);

    let result = match environment {
        Environment::Production => registry
            .with(fmt::layer().json().with_current_span(true).with_target(true))
            .try_init(),
        Environment::Development | Environment::Test => {
            registry.with(fmt::layer().with_target(true)).try_init()
        }
    };

    if let Err(e) = result {
        eprintln!("Logging already initialized: {}", e);
    }
}
