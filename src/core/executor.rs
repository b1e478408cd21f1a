//! Execution of generated programs.
//!
//! The runner's whole contract is "run this file, capture its output". The
//! child inherits the host's network, filesystem and privileges; sandboxing
//! and resource limits would wrap [`ExecutionRunner::command_for`].

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;
use tracing::debug;

use crate::error::PipelineError;
use crate::models::{ExecutionConfig, ExecutionResult};

/// Spawns artifacts as child processes and waits for them
#[derive(Debug, Clone)]
pub struct ExecutionRunner {
    interpreter: Option<String>,
    working_dir: Option<PathBuf>,
}

impl ExecutionRunner {
    pub fn new(config: &ExecutionConfig) -> Self {
        let interpreter = config.interpreter.trim();
        Self {
            interpreter: (!interpreter.is_empty()).then(|| interpreter.to_string()),
            working_dir: config.working_dir.clone(),
        }
    }

    /// Whether artifacts are executed themselves rather than through an interpreter
    pub fn runs_directly(&self) -> bool {
        self.interpreter.is_none()
    }

    /// Program that will be spawned for `artifact`
    pub fn program_for(&self, artifact: &Path) -> String {
        match &self.interpreter {
            Some(interpreter) => interpreter.clone(),
            None => artifact.display().to_string(),
        }
    }

    /// Build the command for `artifact`: the interpreter with the artifact
    /// path as its only argument, or the artifact itself.
    pub fn command_for(&self, artifact: &Path) -> Command {
        let mut cmd = match &self.interpreter {
            Some(interpreter) => {
                let mut cmd = Command::new(interpreter);
                cmd.arg(artifact);
                cmd
            }
            None => Command::new(artifact),
        };
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }

    /// Run `artifact` to completion and capture stdout, stderr and exit code.
    ///
    /// Waits for as long as the program runs. Only a failure to spawn is an
    /// error; a non-zero exit is returned as data.
    pub async fn run(&self, artifact: &Path) -> Result<ExecutionResult, PipelineError> {
        let program = self.program_for(artifact);
        debug!("Executing {} ({})", artifact.display(), program);

        let start = Instant::now();
        let output = self
            .command_for(artifact)
            .output()
            .await
            .map_err(|e| PipelineError::ExecutionFailure { program, source: e })?;

        Ok(ExecutionResult {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}
