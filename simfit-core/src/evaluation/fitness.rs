//! Converts raw results into fitness values.

#[cfg(test)]
#[path = "../../tests/unit/evaluation/fitness_test.rs"]
mod fitness_test;

use crate::evaluation::ObjectiveFunction;
use crate::models::{RawResult, RunOutcome};
use crate::utils::Float;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

/// A fitness assigned to failed and infeasible runs. Strictly worse than any valid outcome.
pub const WORST_FITNESS: Float = Float::MAX;

/// A fitness of a candidate for a single run.
pub struct FitnessRecord<P> {
    /// Candidate id.
    pub candidate_id: String,
    /// Fitness value: lower is better.
    pub fitness: Float,
    /// The raw result used to compute fitness.
    pub result: RawResult<P>,
}

impl<P> FitnessRecord<P> {
    /// Returns true if the record holds the sentinel worst fitness.
    pub fn is_penalized(&self) -> bool {
        self.fitness == WORST_FITNESS
    }
}

/// All fitness records of a single candidate.
pub struct CandidateFitness<P> {
    /// Candidate id.
    pub candidate_id: String,
    /// Records: one per scenario and repetition.
    pub records: Vec<FitnessRecord<P>>,
}

/// Scores raw results with an objective function.
pub struct FitnessScorer {
    objective: Arc<dyn ObjectiveFunction>,
}

impl FitnessScorer {
    /// Creates a new instance of `FitnessScorer`.
    pub fn new(objective: Arc<dyn ObjectiveFunction>) -> Self {
        Self { objective }
    }

    /// Scores a single result. Failed runs, invalid outcomes and outcomes which the objective
    /// function cannot evaluate get `WORST_FITNESS`, otherwise fitness equals objective's cost.
    pub fn score<P>(&self, candidate_id: &str, result: RawResult<P>) -> FitnessRecord<P> {
        let fitness = match &result.outcome {
            RunOutcome::Failed(_) => WORST_FITNESS,
            RunOutcome::Completed(output) => catch_unwind(AssertUnwindSafe(|| {
                let cost = self.objective.compute_cost(&output.statistics);

                if self.objective.is_valid_result(&output.statistics) { cost } else { WORST_FITNESS }
            }))
            .unwrap_or(WORST_FITNESS),
        };

        FitnessRecord { candidate_id: candidate_id.to_string(), fitness, result }
    }
}
