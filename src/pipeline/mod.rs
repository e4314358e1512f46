//! Sequential stage execution with bounded retry.
//!
//! Each stage is one named unit of pipeline work ("resolve identity",
//! "check facts"). A stage moves `Pending → Running → Succeeded | Failed`;
//! while `Running` it is retried up to the configured attempt bound with a
//! fixed delay between attempts. What happens to the remaining stages after
//! a failure is an explicit policy: the default continues to the next stage
//! (stage failure is reported, never fatal), the strict mode skips the rest.

use std::thread;
use std::time::Duration;

use tracing::{info, warn};

/// Lifecycle of one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
    /// Never entered `Running` because an earlier stage failed under
    /// [`FailurePolicy::AbortRemaining`].
    Skipped,
}

impl StageStatus {
    pub fn label(&self) -> &'static str {
        match self {
            StageStatus::Pending => "pending",
            StageStatus::Running => "running",
            StageStatus::Succeeded => "succeeded",
            StageStatus::Failed => "failed",
            StageStatus::Skipped => "skipped",
        }
    }
}

/// What the runner does with the stages after one of them fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Report the failure and move on. Later stages may well depend on the
    /// failed stage's output; continuing anyway is the deliberate default.
    #[default]
    ContinueRemaining,
    /// Stop after the failed stage and report the rest as skipped.
    AbortRemaining,
}

/// Retry bounds applied uniformly to every stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("stage work failed: {0}")]
pub struct StageError(pub String);

impl StageError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// One named unit of work.
pub struct PipelineStage<'a> {
    pub name: &'a str,
    pub work: Box<dyn FnMut() -> Result<(), StageError> + 'a>,
}

impl<'a> PipelineStage<'a> {
    pub fn new(name: &'a str, work: impl FnMut() -> Result<(), StageError> + 'a) -> Self {
        Self {
            name,
            work: Box::new(work),
        }
    }
}

/// Final state of one stage after the runner has finished with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReport {
    pub name: String,
    pub status: StageStatus,
    pub attempts: u32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineRunner {
    pub retry: RetryPolicy,
    pub failure_policy: FailurePolicy,
}

impl PipelineRunner {
    pub fn new(retry: RetryPolicy, failure_policy: FailurePolicy) -> Self {
        Self {
            retry,
            failure_policy,
        }
    }

    /// Runs the stages in declared order and reports every stage's outcome.
    pub fn run(&self, stages: Vec<PipelineStage<'_>>) -> Vec<StageReport> {
        let mut reports = Vec::with_capacity(stages.len());
        let mut aborted = false;

        for mut stage in stages {
            if aborted {
                reports.push(StageReport {
                    name: stage.name.to_string(),
                    status: StageStatus::Skipped,
                    attempts: 0,
                });
                continue;
            }

            let report = self.run_stage(&mut stage);
            if report.status == StageStatus::Failed
                && self.failure_policy == FailurePolicy::AbortRemaining
            {
                aborted = true;
            }
            reports.push(report);
        }

        reports
    }

    fn run_stage(&self, stage: &mut PipelineStage<'_>) -> StageReport {
        let mut status = StageStatus::Running;
        let mut attempts = 0;

        info!(stage = stage.name, "stage started");
        while status == StageStatus::Running {
            attempts += 1;
            match (stage.work)() {
                Ok(()) => {
                    info!(stage = stage.name, attempts, "stage succeeded");
                    status = StageStatus::Succeeded;
                }
                Err(err) if attempts < self.retry.max_attempts => {
                    warn!(
                        stage = stage.name,
                        attempt = attempts,
                        max_attempts = self.retry.max_attempts,
                        %err,
                        "stage attempt failed; retrying"
                    );
                    if self.retry.retry_delay > Duration::ZERO {
                        thread::sleep(self.retry.retry_delay);
                    }
                }
                Err(err) => {
                    warn!(stage = stage.name, attempts, %err, "stage failed after final attempt");
                    status = StageStatus::Failed;
                }
            }
        }

        StageReport {
            name: stage.name.to_string(),
            status,
            attempts,
        }
    }
}
