use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Captured outcome of running a generated program
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionResult {
    /// Exit code; `None` when the child was killed by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub duration_ms: u64,
}

impl ExecutionResult {
    /// Whether the program exited with status zero
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Step of the pipeline a failure happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Prompt rendering and the completion request
    Synthesis,
    /// Writing the artifact file
    Store,
    /// Spawning the artifact
    Execute,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PipelineStage::Synthesis => "synthesis",
            PipelineStage::Store => "store",
            PipelineStage::Execute => "execute",
        };
        write!(f, "{}", name)
    }
}

/// How a dispatched job ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JobOutcome {
    /// The program ran. A non-zero exit code still lands here.
    Completed(ExecutionResult),
    /// The pipeline stopped before or while launching the program
    Failed { stage: PipelineStage, error: String },
}

impl JobOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, JobOutcome::Completed(_))
    }

    pub fn execution(&self) -> Option<&ExecutionResult> {
        match self {
            JobOutcome::Completed(result) => Some(result),
            JobOutcome::Failed { .. } => None,
        }
    }
}

/// Final record of one dispatched job, used only for logging
#[derive(Debug, Clone, Serialize)]
pub struct JobReport {
    pub job_id: Uuid,
    pub email: String,
    pub url: String,
    pub outcome: JobOutcome,
    pub finished_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_with(code: Option<i32>) -> ExecutionResult {
        ExecutionResult {
            exit_code: code,
            stdout: String::new(),
            stderr: String::new(),
            duration_ms: 5,
        }
    }

    #[test]
    fn test_success_only_on_zero() {
        assert!(result_with(Some(0)).success());
        assert!(!result_with(Some(2)).success());
        assert!(!result_with(None).success());
    }

    #[test]
    fn test_nonzero_exit_is_still_completed() {
        let outcome = JobOutcome::Completed(result_with(Some(1)));
        assert!(outcome.is_completed());
        assert_eq!(outcome.execution().unwrap().exit_code, Some(1));
    }

    #[test]
    fn test_failed_outcome_serialization() {
        let outcome = JobOutcome::Failed {
            stage: PipelineStage::Synthesis,
            error: "no choices".to_string(),
        };
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("\"kind\":\"failed\""));
        assert!(json.contains("\"stage\":\"synthesis\""));
        assert!(outcome.execution().is_none());
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(PipelineStage::Synthesis.to_string(), "synthesis");
        assert_eq!(PipelineStage::Store.to_string(), "store");
        assert_eq!(PipelineStage::Execute.to_string(), "execute");
    }
}
