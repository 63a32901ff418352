//! Runs batches of simulation jobs.

#[cfg(test)]
#[path = "../../tests/unit/evaluation/executor_test.rs"]
mod executor_test;

use crate::evaluation::PostProcessor;
use crate::models::{Job, JobConfiguration, RawResult, RunOutcome, Scenario, SimulationRun};
use crate::utils::{Environment, GenericError, GenericResult, ThreadPool, Timer, parallel_into_collect};
use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

/// A simulation engine which executes a candidate's configuration on a scenario.
pub trait Simulator<P>: Send + Sync {
    /// Runs a single simulation. An error (or a panic) aborts only this run.
    fn simulate(
        &self,
        scenario: &Scenario,
        configuration: &JobConfiguration<P>,
        seed: u64,
    ) -> GenericResult<SimulationRun>;
}

/// Executes every submitted job exactly once, either sequentially or on a pool of workers.
pub struct BatchExecutor<P> {
    simulator: Arc<dyn Simulator<P>>,
    post_processor: Arc<dyn PostProcessor>,
    pool: Option<ThreadPool>,
    environment: Arc<Environment>,
}

impl<P: Send + Sync> BatchExecutor<P> {
    /// Creates a new instance of `BatchExecutor`. When `distributed` is true, jobs are run on
    /// `environment.parallelism` workers.
    pub fn new(
        simulator: Arc<dyn Simulator<P>>,
        post_processor: Arc<dyn PostProcessor>,
        distributed: bool,
        environment: Arc<Environment>,
    ) -> Self {
        let pool = if distributed { Some(ThreadPool::new(environment.parallelism)) } else { None };

        Self { simulator, post_processor, pool, environment }
    }

    /// Returns true if jobs are executed on multiple workers.
    pub fn is_distributed(&self) -> bool {
        self.pool.is_some()
    }

    /// Runs all jobs and blocks until every one has completed or failed. Returns exactly one
    /// result per job. No ordering of results is guaranteed.
    pub fn run(&self, jobs: Vec<Job<P>>) -> Vec<RawResult<P>> {
        let timer = Timer::start();
        let size = jobs.len();

        let results = match &self.pool {
            Some(pool) => pool.execute(|| parallel_into_collect(jobs, |job| self.run_job(job))),
            None => jobs.into_iter().map(|job| self.run_job(job)).collect(),
        };

        let failed = results.iter().filter(|result| result.is_failed()).count();
        self.environment.log(
            format!(
                "[{}ms] executed {size} job(s) ({}), failed: {failed}",
                timer.elapsed_millis(),
                if self.is_distributed() { "distributed" } else { "sequential" },
            )
            .as_str(),
        );

        results
    }

    fn run_job(&self, job: Job<P>) -> RawResult<P> {
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            self.simulator
                .simulate(job.scenario.as_ref(), job.configuration.as_ref(), job.seed)
                .and_then(|run| self.post_processor.collect(run))
        }))
        .unwrap_or_else(|panic| {
            Err(GenericError::from(format!("simulation panicked: {}", panic_message(panic.as_ref()))))
        });

        let outcome = match outcome {
            Ok(output) => RunOutcome::Completed(output),
            Err(err) => {
                self.environment.log(format!("job '{}' failed: {err}", job.id()).as_str());
                RunOutcome::Failed(err)
            }
        };

        RawResult { job, outcome }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown reason".to_string()
    }
}
