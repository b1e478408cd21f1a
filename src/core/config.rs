use std::path::Path;
use tracing::{debug, info};

use crate::error::SolveHookError;
use crate::models::{Config, ConfigOverrides, Secrets};

/// Load configuration from the given directory with CLI overrides
pub fn load_config(dir: &Path, overrides: ConfigOverrides) -> Result<Config, SolveHookError> {
    let config = Config::load_from_dir(dir)?.with_overrides(overrides);

    info!(
        "Configuration loaded: model={}, llm_url={}, artifact={}, interpreter={:?}",
        config.llm.model,
        config.llm.url,
        config.artifact.path.display(),
        config.execution.interpreter
    );

    Ok(config)
}

/// Read the webhook secret and LLM token, loading `.env` first if present
pub fn load_secrets() -> Result<Secrets, SolveHookError> {
    match dotenvy::dotenv() {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => debug!("No .env file found"),
        Err(e) => debug!("Ignoring unreadable .env file: {}", e),
    }
    Ok(Secrets::from_env()?)
}
