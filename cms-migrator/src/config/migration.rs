//! Migration settings read from the environment.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

use crate::orchestrator::OrchestratorConfig;
use crate::MigrationError;
use cms_migrator_repository::ApiConfig;

/// Default checkpoint file.
const DEFAULT_CONTEXT_PATH: &str = "migration-context.json";

/// Default directory for the per-operation error logs.
const DEFAULT_ERROR_LOG_DIR: &str = "logs";

/// Default delay before the single page fetch retry, in milliseconds.
const DEFAULT_FETCH_RETRY_DELAY_MS: u64 = 500;

/// Strategy used to order collections when no explicit order is configured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderingMode {
    /// Many-to-one holders later, junction collections last.
    #[default]
    Heuristic,
    /// Topological order over relation metadata.
    Dependency,
}

impl OrderingMode {
    /// Parse an ordering mode, case-insensitively.
    ///
    /// Unknown values fall back to [`OrderingMode::Heuristic`].
    fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "heuristic" => Self::Heuristic,
            "dependency" | "dependencies" | "topological" => Self::Dependency,
            other => {
                warn!(value = %other, "Invalid ORDERING_STRATEGY, defaulting to 'heuristic'");
                Self::Heuristic
            }
        }
    }
}

/// Everything needed to wire up and run one migration.
#[derive(Debug, Clone)]
pub struct MigrationConfig {
    /// Legacy (v8) API.
    pub source: ApiConfig,
    /// Target (v9) API.
    pub target: ApiConfig,
    pub context_path: PathBuf,
    pub error_log_dir: PathBuf,
    /// JSON file holding the user and file id maps for a fresh run.
    pub id_maps_path: Option<PathBuf>,
    pub orchestrator: OrchestratorConfig,
}

impl MigrationConfig {
    /// Read the configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `V8_API_URL`: legacy API base URL, project path included (required)
    /// - `V8_API_TOKEN`: legacy API token
    /// - `V9_API_URL`: target API base URL (required)
    /// - `V9_API_TOKEN`: target API token
    /// - `COLLECTION_ORDER`: comma-separated explicit collection order
    /// - `SKIP_COLLECTIONS`: comma-separated collections to leave out
    /// - `ORDERING_STRATEGY`: "heuristic" or "dependency" (default: heuristic)
    /// - `CONTEXT_PATH`: checkpoint file (default: migration-context.json)
    /// - `ERROR_LOG_DIR`: error log directory (default: logs)
    /// - `ID_MAPS_PATH`: user and file id maps for a fresh run
    /// - `FETCH_RETRY_DELAY_MS`: delay before the page fetch retry (default: 500)
    pub fn from_env() -> Result<Self, MigrationError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, MigrationError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| {
            non_empty(key).ok_or_else(|| MigrationError::config(format!("{} is not set", key)))
        };

        let source = api_config(required("V8_API_URL")?, non_empty("V8_API_TOKEN"));
        let target = api_config(required("V9_API_URL")?, non_empty("V9_API_TOKEN"));

        let collection_order = non_empty("COLLECTION_ORDER").map(|raw| parse_list(&raw));
        let skip_collections = non_empty("SKIP_COLLECTIONS")
            .map(|raw| parse_list(&raw))
            .unwrap_or_default();
        let ordering = non_empty("ORDERING_STRATEGY")
            .map(|raw| OrderingMode::parse(&raw))
            .unwrap_or_default();
        let fetch_retry_delay_ms = match non_empty("FETCH_RETRY_DELAY_MS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                MigrationError::config(format!("Invalid FETCH_RETRY_DELAY_MS '{}': {}", raw, e))
            })?,
            None => DEFAULT_FETCH_RETRY_DELAY_MS,
        };

        Ok(Self {
            source,
            target,
            context_path: non_empty("CONTEXT_PATH")
                .unwrap_or_else(|| DEFAULT_CONTEXT_PATH.to_string())
                .into(),
            error_log_dir: non_empty("ERROR_LOG_DIR")
                .unwrap_or_else(|| DEFAULT_ERROR_LOG_DIR.to_string())
                .into(),
            id_maps_path: non_empty("ID_MAPS_PATH").map(PathBuf::from),
            orchestrator: OrchestratorConfig {
                collection_order,
                skip_collections,
                ordering,
                fetch_retry_delay: Duration::from_millis(fetch_retry_delay_ms),
            },
        })
    }
}

fn api_config(base_url: String, token: Option<String>) -> ApiConfig {
    let config = ApiConfig::new(base_url.trim());
    match token {
        Some(token) => config.with_token(token.trim()),
        None => config,
    }
}

/// Split a comma-separated list, dropping blanks.
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
