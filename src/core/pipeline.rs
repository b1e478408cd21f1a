// One job's path from prompt to process exit

use tracing::{debug, info};

use crate::core::{
    build_solver_prompt, strip_code_fence, ArtifactStore, ExecutionRunner, SolverPromptInput,
    SynthesisClient, SYSTEM_PROMPT_SOLVER,
};
use crate::error::PipelineError;
use crate::models::{Config, ExecutionResult, Job, Secrets};

/// Prompt -> synthesis -> store -> execute, run once per job
#[derive(Clone)]
pub struct Pipeline {
    synthesis: SynthesisClient,
    store: ArtifactStore,
    runner: ExecutionRunner,
    llm_token: String,
    strip_code_fences: bool,
}

impl Pipeline {
    pub fn new(config: &Config, secrets: &Secrets) -> Result<Self, PipelineError> {
        let runner = ExecutionRunner::new(&config.execution);
        Ok(Self {
            synthesis: SynthesisClient::new(config.llm.clone(), secrets.llm_token.clone())?,
            store: ArtifactStore::new(config.artifact.path.clone())
                .with_executable(runner.runs_directly()),
            runner,
            llm_token: secrets.llm_token.clone(),
            strip_code_fences: config.artifact.strip_code_fences,
        })
    }

    /// Render the solver prompt for `job`
    pub fn prompt_for(&self, job: &Job) -> String {
        build_solver_prompt(&SolverPromptInput {
            url: &job.url,
            email: &job.email,
            llm_endpoint: &self.synthesis.config().url,
            llm_token: &self.llm_token,
        })
    }

    /// Run every stage for `job`.
    ///
    /// The first failing stage ends the run; nothing is retried. The artifact
    /// is only written once a well-formed completion has been received.
    pub async fn run(&self, job: &Job) -> Result<ExecutionResult, PipelineError> {
        let prompt = self.prompt_for(job);
        debug!("Solver prompt size: {} chars", prompt.len());

        let completion = self.synthesis.generate(SYSTEM_PROMPT_SOLVER, &prompt).await?;
        let source = if self.strip_code_fences {
            strip_code_fence(&completion)
        } else {
            completion
        };

        let artifact = self.store.write(&source).await?;
        info!(
            "Stored {} line program at {}",
            artifact.line_count(),
            artifact.path.display()
        );

        self.runner.run(&artifact.path).await
    }
}
