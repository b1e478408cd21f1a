use std::path::Path;

use crate::core::{load_config, load_secrets, Dispatcher, Pipeline};
use crate::error::SolveHookError;
use crate::models::{ConfigOverrides, Job, JobOutcome, JobReport};

/// Run one job in the foreground and print what the program produced.
///
/// Skips the webhook and its secret check; the LLM token is still required.
/// Returns `false` only when the pipeline itself failed.
pub async fn solve_once(
    project_root: &Path,
    overrides: ConfigOverrides,
    email: &str,
    url: &str,
) -> Result<bool, SolveHookError> {
    let config = load_config(project_root, overrides)?;
    let secrets = load_secrets()?;

    let pipeline = Pipeline::new(&config, &secrets)?;
    let dispatcher = Dispatcher::new(pipeline);
    let job = Job::new(email, secrets.webhook_secret.as_str(), url);

    let report = dispatcher
        .dispatch(job)
        .wait()
        .await
        .map_err(|e| SolveHookError::Server(format!("job task failed: {}", e)))?;

    Ok(print_report(&report))
}

/// Print a job report. The program's exit code is shown, not judged.
fn print_report(report: &JobReport) -> bool {
    println!("=== SolveHook Result ===\n");
    println!("Job:   {}", report.job_id);
    println!("Email: {}", report.email);
    println!("URL:   {}", report.url);

    match &report.outcome {
        JobOutcome::Completed(result) => {
            let code = result
                .exit_code
                .map(|c| c.to_string())
                .unwrap_or_else(|| "signal".to_string());
            println!("Exit:  {} ({}ms)", code, result.duration_ms);
            println!("\n--- stdout ---\n{}", result.stdout);
            println!("--- stderr ---\n{}", result.stderr);
            true
        }
        JobOutcome::Failed { stage, error } => {
            println!("Failed during {}: {}", stage, error);
            false
        }
    }
}
