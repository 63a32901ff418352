//! This module reimports commonly used types.

pub use crate::evaluation::{
    BatchExecutor, CandidateFitness, DiagnosticsWriter, Evaluator, EvaluatorConfig, FitnessRecord, FitnessScorer,
    Gendreau06Objective, JobBuilder, ObjectiveFunction, Simulator, WORST_FITNESS,
};
pub use crate::models::{
    Candidate, Job, JobConfiguration, RawResult, RunOutcome, Scenario, ScenarioCatalog, SimulationOutput,
    SimulationRun, SimulationStatistics,
};
pub use crate::utils::{
    Environment, EvaluationError, EvaluationResult, Float, GenericError, GenericResult, InfoLogger,
};
