use std::path::PathBuf;
use thiserror::Error;

use crate::models::{ConfigError, PipelineStage};

/// Main error type for SolveHook
#[derive(Error, Debug)]
pub enum SolveHookError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Server(String),
}

/// Rejections produced while validating an incoming job.
///
/// Both variants are answered synchronously; nothing is scheduled.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JobError {
    #[error("Malformed job: {0}")]
    Malformed(String),

    #[error("Unauthorized: secret does not match")]
    Unauthorized,
}

/// Errors raised inside a dispatched pipeline run.
///
/// These never reach the webhook caller; they end the job and are logged.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Synthesis service unavailable: {0}")]
    SynthesisUnavailable(String),

    #[error("Malformed completion: {0}")]
    MalformedCompletion(String),

    #[error("Failed to write artifact {path}: {source}")]
    WriteFailure {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to execute {program}: {source}")]
    ExecutionFailure {
        program: String,
        source: std::io::Error,
    },
}

impl PipelineError {
    /// Pipeline step this error belongs to
    pub fn stage(&self) -> PipelineStage {
        match self {
            PipelineError::SynthesisUnavailable(_) | PipelineError::MalformedCompletion(_) => {
                PipelineStage::Synthesis
            }
            PipelineError::WriteFailure { .. } => PipelineStage::Store,
            PipelineError::ExecutionFailure { .. } => PipelineStage::Execute,
        }
    }
}

impl From<reqwest::Error> for PipelineError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            PipelineError::SynthesisUnavailable(format!("request timed out: {}", err))
        } else if err.is_connect() {
            PipelineError::SynthesisUnavailable(format!("connection failed: {}", err))
        } else if let Some(status) = err.status() {
            PipelineError::SynthesisUnavailable(format!("HTTP {}: {}", status.as_u16(), err))
        } else {
            PipelineError::SynthesisUnavailable(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, SolveHookError>;
