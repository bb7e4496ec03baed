//! Tracing subscriber setup for binaries and tests.
//!
//! Binaries call [`init_tracing`] once at startup and hold on to the returned
//! guard so buffered log lines are flushed on exit. Tests call
//! [`init_test_tracing`], which is safe to invoke from every test function.

use std::sync::Once;

use helpdesk_config::Environment;
use thiserror::Error;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

/// Filter directives applied when `RUST_LOG` is not set.
const DEFAULT_LOG_DIRECTIVES: &str = "info";

/// Errors that can occur while initializing the tracing stack.
#[derive(Debug, Error)]
pub enum InitTracingError {
    /// Failed to determine the runtime environment (`APP_ENVIRONMENT`).
    #[error("failed to determine runtime environment: {0}")]
    Environment(#[from] std::io::Error),

    /// A global subscriber was already installed.
    #[error("failed to install the global tracing subscriber: {0}")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),
}

/// Initializes the global tracing subscriber for a service binary.
///
/// Log lines go to stdout through a non-blocking writer; the returned
/// [`WorkerGuard`] must be kept alive for the lifetime of the process,
/// otherwise lines buffered at exit are lost. Output formatting follows the
/// runtime environment: human-oriented in dev, machine-oriented in prod.
pub fn init_tracing(service_name: &str) -> Result<WorkerGuard, InitTracingError> {
    let environment = Environment::load()?;
    let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVES));

    let fmt_layer = match environment {
        Environment::Dev => fmt::layer()
            .with_writer(writer)
            .with_target(false)
            .boxed(),
        Environment::Prod => fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    info!(
        service = service_name,
        environment = %environment,
        "tracing initialized"
    );

    Ok(guard)
}

static TEST_TRACING: Once = Once::new();

/// Initializes tracing for tests.
///
/// Installs a subscriber that writes through the test writer so output is
/// captured per test. Subsequent calls are no-ops, so every test can call this
/// unconditionally.
pub fn init_test_tracing() {
    TEST_TRACING.call_once(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVES));

        fmt()
            .with_env_filter(env_filter)
            .with_test_writer()
            .init();
    });
}
