use std::path::Path;
use tracing::info;

use crate::core::{load_config, load_secrets, serve, AppState, Dispatcher, Pipeline};
use crate::error::SolveHookError;
use crate::models::ConfigOverrides;

/// Start the webhook server
pub async fn run_server(project_root: &Path, overrides: ConfigOverrides) -> Result<(), SolveHookError> {
    let config = load_config(project_root, overrides)?;
    let secrets = load_secrets()?;

    let pipeline = Pipeline::new(&config, &secrets)?;
    let state = AppState::new(secrets.webhook_secret.as_str(), Dispatcher::new(pipeline));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Starting webhook server on {}", addr);
    serve(&addr, state).await
}
