use serde::Serialize;
use std::path::PathBuf;

/// A validated request to synthesize and run a solver for one quiz page.
///
/// Built by the validator from the webhook body and dropped when the pipeline
/// run that owns it ends.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Job {
    /// Requester identity
    pub email: String,
    /// Secret presented by the requester
    #[serde(skip_serializing)]
    pub secret: String,
    /// Page holding the task
    pub url: String,
}

impl Job {
    pub fn new(
        email: impl Into<String>,
        secret: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            secret: secret.into(),
            url: url.into(),
        }
    }
}

impl std::fmt::Debug for Job {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Job")
            .field("email", &self.email)
            .field("secret", &"<redacted>")
            .field("url", &self.url)
            .finish()
    }
}

/// Program text returned by the model and the file it was written to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    pub source: String,
    pub path: PathBuf,
}

impl GeneratedArtifact {
    pub fn line_count(&self) -> usize {
        self.source.lines().count()
    }
}
