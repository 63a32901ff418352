//! The evaluator orchestrates fitness evaluation of a population.

#[cfg(test)]
#[path = "../../tests/unit/evaluation/evaluator_test.rs"]
mod evaluator_test;

use crate::evaluation::*;
use crate::models::{AuctionSettings, Candidate, Scenario, ScenarioCatalog, ScenarioFilter, TimeMode};
use crate::utils::{Environment, EvaluationError, EvaluationResult};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Evaluates populations of candidates by running them inside simulations.
pub struct Evaluator<P> {
    catalog: ScenarioCatalog,
    scenarios_per_generation: usize,
    seeds: Vec<u64>,
    time_mode: TimeMode,
    converters: Vec<Arc<dyn ScenarioConverter>>,
    executor: BatchExecutor<P>,
    scorer: FitnessScorer,
    diagnostics: DiagnosticsWriter,
    environment: Arc<Environment>,
}

impl<P: Send + Sync> Evaluator<P> {
    /// Creates an evaluator loading scenario catalog and objective function as specified by config.
    pub fn from_config(
        config: &EvaluatorConfig,
        simulator: Arc<dyn Simulator<P>>,
        environment: Arc<Environment>,
    ) -> EvaluationResult<Self> {
        config.validate()?;

        let filter = ScenarioFilter::new(config.dataset_filter().as_str(), config.dataset_extension().as_str());
        let catalog = ScenarioCatalog::load(config.dataset_path().as_path(), &filter)?;
        let objective = Arc::new(Gendreau06Objective::new(config.vehicle_speed()));

        Self::new(config, catalog, simulator, objective, environment)
    }

    /// Creates a new instance of `Evaluator`.
    pub fn new(
        config: &EvaluatorConfig,
        catalog: ScenarioCatalog,
        simulator: Arc<dyn Simulator<P>>,
        objective: Arc<dyn ObjectiveFunction>,
        environment: Arc<Environment>,
    ) -> EvaluationResult<Self> {
        config.validate()?;

        let environment = match config.threads {
            Some(threads) => Arc::new(Environment::new(environment.logger.clone(), threads)),
            None => environment,
        };

        let mut rng = SmallRng::seed_from_u64(config.seed());
        let seeds = (0..config.repetitions()).map(|_| rng.r#gen::<u64>()).collect();

        let converters = config.converters().iter().map(|converter| converter.create()).collect();
        let post_processor = config.post_processor.unwrap_or_default().create();
        let executor =
            BatchExecutor::new(simulator, post_processor, config.distributed.unwrap_or(false), environment.clone());

        let cache = Arc::new(ScenarioMetadataCache::new(config.metadata_path().as_path()));
        let diagnostics = DiagnosticsWriter::new(
            config.output_dir().as_path(),
            config.is_diagnostics_enabled(),
            cache,
            objective.clone(),
        );

        environment.log(
            format!(
                "evaluator: {} scenario(s) in catalog, {} per generation, {} repetition(s), {} mode",
                catalog.len(),
                config.scenarios_per_generation(),
                config.repetitions(),
                if executor.is_distributed() { "distributed" } else { "sequential" }
            )
            .as_str(),
        );

        Ok(Self {
            catalog,
            scenarios_per_generation: config.scenarios_per_generation(),
            seeds,
            time_mode: config.time_mode.unwrap_or_default(),
            converters,
            executor,
            scorer: FitnessScorer::new(objective),
            diagnostics,
            environment,
        })
    }

    /// Returns scenario catalog.
    pub fn catalog(&self) -> &ScenarioCatalog {
        &self.catalog
    }

    /// Returns diagnostics writer.
    pub fn diagnostics(&self) -> &DiagnosticsWriter {
        &self.diagnostics
    }

    /// Returns random seeds used for repetitions.
    pub fn seeds(&self) -> &[u64] {
        self.seeds.as_slice()
    }

    /// Returns amount of fitness records produced for each candidate per generation.
    pub fn expected_results_per_candidate(&self) -> usize {
        self.scenarios_per_generation * self.seeds.len()
    }

    /// Evaluates population on the scenario window of given generation. Returns fitness records
    /// grouped by candidate (in order of first appearance in population), each group having exactly
    /// `expected_results_per_candidate` records.
    pub fn evaluate_generation(
        &self,
        generation: usize,
        population: &[Arc<Candidate<P>>],
    ) -> EvaluationResult<Vec<CandidateFitness<P>>> {
        let window = self.catalog.window_for(generation, self.scenarios_per_generation)?;

        self.environment.log(
            format!(
                "generation {generation}: scenarios [{}]",
                window.iter().map(|scenario| scenario.name.as_str()).collect::<Vec<_>>().join(", ")
            )
            .as_str(),
        );

        let records = self.evaluate_scenarios(window, population)?;

        let mut groups = FxHashMap::<String, Vec<FitnessRecord<P>>>::default();
        records.into_iter().for_each(|record| groups.entry(record.candidate_id.clone()).or_default().push(record));

        let expected = self.expected_results_per_candidate();
        let mut fitness = Vec::with_capacity(groups.len());

        for candidate in population {
            let Some(records) = groups.remove(&candidate.id) else {
                if fitness.iter().any(|entry: &CandidateFitness<P>| entry.candidate_id == candidate.id) {
                    continue;
                }

                return Err(EvaluationError::Correlation(format!("no results for candidate '{}'", candidate.id)));
            };

            if records.len() != expected {
                return Err(EvaluationError::Correlation(format!(
                    "candidate '{}' has {} result(s), expected {expected}",
                    candidate.id,
                    records.len()
                )));
            }

            fitness.push(CandidateFitness { candidate_id: candidate.id.clone(), records });
        }

        Ok(fitness)
    }

    /// Evaluates population on explicitly given scenarios. Returns one record per
    /// (scenario, distinct candidate, repetition) in no particular order.
    pub fn evaluate_scenarios(
        &self,
        scenarios: &[Arc<Scenario>],
        population: &[Arc<Candidate<P>>],
    ) -> EvaluationResult<Vec<FitnessRecord<P>>> {
        let mut builder = JobBuilder::new(self.time_mode, AuctionSettings::default());
        population.iter().for_each(|candidate| {
            builder.add_candidate(candidate.clone());
        });

        let scenarios = scenarios
            .iter()
            .map(|scenario| Arc::new(convert_scenario(scenario.as_ref(), self.converters.as_slice())))
            .collect::<Vec<_>>();

        self.diagnostics.prepare(scenarios.as_slice())?;

        let jobs = builder.create_jobs(scenarios.as_slice(), self.seeds.as_slice());
        let results = self.executor.run(jobs);

        results.iter().try_for_each(|result| self.diagnostics.on_result(result))?;

        let table = builder.into_table();
        let records = correlate(results, &table)?
            .into_iter()
            .map(|(candidate, result)| self.scorer.score(candidate.id.as_str(), result))
            .collect::<Vec<_>>();

        let penalized = records.iter().filter(|record| record.is_penalized()).count();
        if penalized > 0 {
            self.environment.log(format!("{penalized} of {} run(s) penalized", records.len()).as_str());
        }

        Ok(records)
    }

    /// Finishes evaluation: no diagnostics are written afterwards.
    pub fn close(&self) {
        self.diagnostics.close();
    }
}
