use chrono::Utc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{error, info, warn, Instrument};
use uuid::Uuid;

use crate::core::Pipeline;
use crate::models::{Job, JobOutcome, JobReport};

/// Hands validated jobs to background pipeline tasks.
///
/// No concurrency cap, ordering or cancellation: every dispatched job gets its
/// own task and runs until its pipeline ends.
#[derive(Clone)]
pub struct Dispatcher {
    pipeline: Arc<Pipeline>,
    dispatched: Arc<AtomicUsize>,
    reports: Option<UnboundedSender<JobReport>>,
}

/// Handle to a dispatched job. Dropping it detaches the task.
pub struct JobHandle {
    pub job_id: Uuid,
    pub task: JoinHandle<JobReport>,
}

impl JobHandle {
    /// Wait for the job's report
    pub async fn wait(self) -> Result<JobReport, tokio::task::JoinError> {
        self.task.await
    }
}

impl Dispatcher {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            dispatched: Arc::new(AtomicUsize::new(0)),
            reports: None,
        }
    }

    /// Also send every finished job's report to `tx`
    pub fn with_reports(mut self, tx: UnboundedSender<JobReport>) -> Self {
        self.reports = Some(tx);
        self
    }

    /// Number of jobs scheduled since startup
    pub fn dispatched(&self) -> usize {
        self.dispatched.load(Ordering::SeqCst)
    }

    /// Schedule `job` and return immediately
    pub fn dispatch(&self, job: Job) -> JobHandle {
        let job_id = Uuid::new_v4();
        self.dispatched.fetch_add(1, Ordering::SeqCst);

        let pipeline = Arc::clone(&self.pipeline);
        let reports = self.reports.clone();
        let span = tracing::info_span!("job", %job_id, email = %job.email);

        let task = tokio::spawn(
            async move {
                let report = run_job(&pipeline, job_id, job).await;
                if let Some(tx) = reports {
                    if tx.send(report.clone()).is_err() {
                        warn!("Report receiver dropped");
                    }
                }
                report
            }
            .instrument(span),
        );

        JobHandle { job_id, task }
    }
}

async fn run_job(pipeline: &Pipeline, job_id: Uuid, job: Job) -> JobReport {
    info!("Processing request for: {} ({})", job.email, job.url);

    let outcome = match pipeline.run(&job).await {
        Ok(result) => {
            info!(
                "Finished processing for: {} (exit code {:?}, {}ms)",
                job.email, result.exit_code, result.duration_ms
            );
            info!("STDOUT: {}", result.stdout);
            info!("STDERR: {}", result.stderr);
            JobOutcome::Completed(result)
        }
        Err(e) => {
            let stage = e.stage();
            error!("Job for {} failed during {}: {}", job.email, stage, e);
            JobOutcome::Failed {
                stage,
                error: e.to_string(),
            }
        }
    };

    JobReport {
        job_id,
        email: job.email,
        url: job.url,
        outcome,
        finished_at: Utc::now(),
    }
}
