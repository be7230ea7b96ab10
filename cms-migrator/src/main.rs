//! CMS Migrator Main Entry Point
//!
//! Runs one migration from the legacy instance to the target instance,
//! resuming from the last checkpoint if there is one.

use cms_migrator::{Dependencies, MigrationError, MigrationSummary};
use dotenv::dotenv;
use std::env;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "cms_migrator=info,cms_migrator_repository=info";

/// Console output format, chosen with `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    fn from_env() -> Self {
        match env::var("LOG_FORMAT") {
            Ok(format) if format.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Pretty,
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .init(),
    }

    info!(
        service_version = env!("CARGO_PKG_VERSION"),
        log_format = ?format,
        "Tracing initialized"
    );
}

/// Point the operator at whatever needs a manual follow-up.
fn report(summary: &MigrationSummary) {
    let incomplete = summary.incomplete_collections();

    if incomplete.is_empty() {
        info!(
            collections = summary.collections.len(),
            records_written = summary.records_written(),
            "Migration finished"
        );
    } else {
        warn!(
            incomplete = ?incomplete,
            failed_batches = summary.failed_batches(),
            records_written = summary.records_written(),
            "Migration finished, incomplete collections are listed in the error logs"
        );
    }
}

#[tokio::main]
async fn main() -> Result<(), MigrationError> {
    dotenv().ok();
    init_tracing(LogFormat::from_env());

    let Dependencies {
        orchestrator,
        context,
    } = Dependencies::new()
        .await
        .inspect_err(|e| error!(error = %e, "Failed to initialize dependencies"))?;

    let summary = orchestrator
        .run(context)
        .await
        .inspect_err(|e| error!(error = %e, "Migration aborted"))?;

    report(&summary);
    Ok(())
}
