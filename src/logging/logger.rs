// file: src/logging/logger.rs
// version: 1.0.0
// guid: 8b2e4f61-0c3a-4d95-a7e8-1f6b9c2d3e47

//! Logger initialization and configuration

use crate::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the logging system
///
/// Progress and results are printed to stdout directly, so the default
/// level only lets warnings through. `RUST_LOG` overrides the flags.
pub fn init_logger(verbose: bool, quiet: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if quiet {
            EnvFilter::new("error")
        } else if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init()
        .map_err(|e| {
            crate::error::XiToolError::ConfigError(format!("Failed to initialize logger: {}", e))
        })?;

    Ok(())
}

/// Create a scoped logger for operations
pub fn with_operation_span<F, R>(operation: &str, f: F) -> R
where
    F: FnOnce() -> R,
{
    let span = tracing::info_span!("operation", name = operation);
    let _enter = span.enter();
    f()
}

/// Create an async scoped logger for operations
pub async fn with_async_operation_span<F, Fut, R>(operation: &str, f: F) -> R
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = R>,
{
    let span = tracing::info_span!("operation", name = operation);
    async move { f().await }.instrument(span).await
}

use tracing::Instrument;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logger_twice() {
        // The global subscriber can only be installed once per process.
        let first = init_logger(false, false);
        let second = init_logger(true, false);

        assert!(first.is_ok() || second.is_err());
        assert!(second.is_err());
    }

    #[test]
    fn test_with_operation_span() {
        let mut executed = false;

        let result = with_operation_span("export", || {
            executed = true;
            "done"
        });

        assert!(executed);
        assert_eq!(result, "done");
    }

    #[tokio::test]
    async fn test_with_async_operation_span() {
        let result = with_async_operation_span("update", || async { 2 + 2 }).await;
        assert_eq!(result, 4);
    }
}
