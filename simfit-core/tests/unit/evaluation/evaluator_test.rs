use super::*;
use crate::helpers::models::*;
use crate::helpers::simulator::{ScriptedBehavior, TestSimulator};
use crate::helpers::utils::{create_capturing_environment, create_test_environment};
use crate::models::{AuctionEvent, BidMeasurement, ScenarioCatalog};
use crate::utils::Float;
use std::fs;

fn create_config(scenarios_per_generation: usize, repetitions: usize, distributed: bool) -> EvaluatorConfig {
    EvaluatorConfig {
        scenarios_per_generation: Some(scenarios_per_generation),
        repetitions: Some(repetitions),
        distributed: Some(distributed),
        ..EvaluatorConfig::default()
    }
}

fn create_evaluator(
    config: &EvaluatorConfig,
    catalog: ScenarioCatalog,
    simulator: Arc<TestSimulator>,
) -> Evaluator<TestProgram> {
    let objective = Arc::new(Gendreau06Objective::default());

    Evaluator::new(config, catalog, simulator, objective, create_test_environment()).unwrap()
}

fn expected_cost(distance: Float) -> Float {
    Gendreau06Objective::default().compute_cost(&create_valid_statistics(distance))
}

fn get_fitness_by_instance(fitness: &CandidateFitness<TestProgram>) -> Vec<(u32, Float)> {
    let mut values = fitness
        .records
        .iter()
        .map(|record| (record.result.job.scenario.instance_id, record.fitness))
        .collect::<Vec<_>>();
    values.sort_by_key(|(instance_id, _)| *instance_id);

    values
}

parameterized_test! {can_evaluate_generation_window, distributed, {
    can_evaluate_generation_window_impl(distributed);
}}

can_evaluate_generation_window! {
    case_01_sequential: false,
    case_02_distributed: true,
}

fn can_evaluate_generation_window_impl(distributed: bool) {
    let simulator = Arc::new(TestSimulator::default().with_behavior("b", 8, ScriptedBehavior::Invalid));
    let evaluator = create_evaluator(&create_config(3, 1, distributed), create_test_catalog(10), simulator.clone());
    let population = vec![create_test_candidate("a", 1.), create_test_candidate("b", 2.)];

    let fitness = evaluator.evaluate_generation(2, population.as_slice()).unwrap();

    assert_eq!(fitness.iter().map(|entry| entry.candidate_id.as_str()).collect::<Vec<_>>(), vec!["a", "b"]);
    assert_eq!(fitness.iter().map(|entry| entry.records.len()).sum::<usize>(), 6);
    assert_eq!(
        get_fitness_by_instance(&fitness[0]),
        vec![(7, expected_cost(7.)), (8, expected_cost(8.)), (9, expected_cost(9.))]
    );
    assert_eq!(
        get_fitness_by_instance(&fitness[1]),
        vec![(7, expected_cost(14.)), (8, WORST_FITNESS), (9, expected_cost(18.))]
    );
    assert_eq!(simulator.calls(), 6);
}

parameterized_test! {can_penalize_aborted_runs_only, behavior, {
    can_penalize_aborted_runs_only_impl(behavior);
}}

can_penalize_aborted_runs_only! {
    case_01_error: ScriptedBehavior::Fail,
    case_02_panic: ScriptedBehavior::Panic,
}

fn can_penalize_aborted_runs_only_impl(behavior: ScriptedBehavior) {
    let simulator = Arc::new(TestSimulator::default().with_behavior("b", 1, behavior));
    let evaluator = create_evaluator(&create_config(2, 1, true), create_test_catalog(4), simulator);
    let population = vec![create_test_candidate("a", 1.), create_test_candidate("b", 1.)];

    let fitness = evaluator.evaluate_generation(0, population.as_slice()).unwrap();

    assert_eq!(get_fitness_by_instance(&fitness[0]), vec![(1, expected_cost(1.)), (2, expected_cost(2.))]);
    assert_eq!(get_fitness_by_instance(&fitness[1]), vec![(1, WORST_FITNESS), (2, expected_cost(2.))]);
    assert!(fitness[1].records.iter().any(|record| record.result.is_failed()));
}

#[test]
fn can_run_each_repetition_with_its_own_seed() {
    let simulator = Arc::new(TestSimulator::default());
    let evaluator = create_evaluator(&create_config(2, 3, false), create_test_catalog(4), simulator.clone());
    let population = vec![create_test_candidate("a", 1.)];

    let fitness = evaluator.evaluate_generation(1, population.as_slice()).unwrap();

    assert_eq!(evaluator.seeds().len(), 3);
    assert_eq!(evaluator.expected_results_per_candidate(), 6);
    assert_eq!(fitness[0].records.len(), 6);
    let executed = simulator.executed();
    assert!(evaluator.seeds().iter().all(|seed| {
        let suffix = format!(":{seed}");
        executed.iter().filter(|entry| entry.ends_with(suffix.as_str())).count() == 2
    }));
    let mut repetitions = fitness[0].records.iter().map(|record| record.result.job.repetition).collect::<Vec<_>>();
    repetitions.sort();
    assert_eq!(repetitions, vec![0, 0, 1, 1, 2, 2]);
}

#[test]
fn can_derive_same_seeds_from_same_master_seed() {
    let config = EvaluatorConfig { seed: Some(7), repetitions: Some(4), ..EvaluatorConfig::default() };
    let other = EvaluatorConfig { seed: Some(8), ..config.clone() };

    let first = create_evaluator(&config, create_test_catalog(1), Arc::new(TestSimulator::default()));
    let second = create_evaluator(&config, create_test_catalog(1), Arc::new(TestSimulator::default()));
    let third = create_evaluator(&other, create_test_catalog(1), Arc::new(TestSimulator::default()));

    assert_eq!(first.seeds(), second.seeds());
    assert_ne!(first.seeds(), third.seeds());
}

#[test]
fn can_reject_generation_beyond_catalog() {
    let simulator = Arc::new(TestSimulator::default());
    let evaluator = create_evaluator(&create_config(3, 1, false), create_test_catalog(10), simulator.clone());

    let result = evaluator.evaluate_generation(3, vec![create_test_candidate("a", 1.)].as_slice());

    assert_eq!(result.err(), Some(EvaluationError::OutOfRange { generation: 3, window_size: 3, catalog_size: 10 }));
    assert_eq!(simulator.calls(), 0);
}

#[test]
fn can_evaluate_duplicate_candidates_once() {
    let simulator = Arc::new(TestSimulator::default());
    let evaluator = create_evaluator(&create_config(3, 1, false), create_test_catalog(3), simulator.clone());
    let candidate = create_test_candidate("a", 1.);
    let population = vec![candidate.clone(), create_test_candidate("b", 1.), candidate];

    let fitness = evaluator.evaluate_generation(0, population.as_slice()).unwrap();

    assert_eq!(fitness.len(), 2);
    assert_eq!(simulator.calls(), 6);
}

#[test]
fn can_evaluate_explicit_scenarios() {
    let simulator = Arc::new(TestSimulator::default());
    let evaluator = create_evaluator(&create_config(1, 1, false), create_test_catalog(5), simulator);
    let scenarios = vec![evaluator.catalog().scenarios()[4].clone(), evaluator.catalog().scenarios()[0].clone()];

    let records = evaluator.evaluate_scenarios(scenarios.as_slice(), &[create_test_candidate("a", 1.)]).unwrap();

    let mut fitness = records.iter().map(|record| record.fitness).collect::<Vec<_>>();
    fitness.sort_by(|a, b| a.total_cmp(b));
    assert_eq!(fitness, vec![expected_cost(1.), expected_cost(5.)]);
}

#[test]
fn can_log_generation_window() {
    let (environment, messages) = create_capturing_environment(1);
    let evaluator = Evaluator::new(
        &create_config(2, 1, false),
        create_test_catalog(4),
        Arc::new(TestSimulator::default()),
        Arc::new(Gendreau06Objective::default()),
        environment,
    )
    .unwrap();

    evaluator.evaluate_generation(1, &[create_test_candidate("a", 1.)]).unwrap();

    let messages = messages.lock().unwrap();
    assert!(messages.iter().any(|msg| msg == "generation 1: scenarios [0.50-20-1.00-3, 0.50-20-1.00-4]"));
}

#[test]
fn can_write_diagnostics_and_stop_after_close() {
    let dir = tempfile::tempdir().unwrap();
    (1..=2).for_each(|id| write_test_metadata(dir.path(), id));
    let config = EvaluatorConfig {
        diagnostics: Some(DiagnosticsConfig {
            enabled: Some(true),
            output_dir: Some(dir.path().join("out")),
            metadata_path: Some(dir.path().to_path_buf()),
        }),
        ..create_config(2, 1, false)
    };
    let simulator = Arc::new(TestSimulator::default());
    let evaluator = create_evaluator(&config, create_test_catalog(2), simulator.clone());
    let population = vec![create_test_candidate("a", 1.)];

    evaluator.evaluate_generation(0, population.as_slice()).unwrap();
    evaluator.close();
    let result = evaluator.evaluate_generation(0, population.as_slice());

    let content = fs::read_to_string(dir.path().join("out").join("ReAuction-RP-EVO-BID-EVO-a.csv")).unwrap();
    assert_eq!(content.lines().count(), 3);
    assert!(matches!(result, Err(EvaluationError::Configuration(_))));
    assert_eq!(simulator.calls(), 2);
}

#[test]
fn can_abort_evaluation_before_simulation_on_missing_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let config = EvaluatorConfig {
        diagnostics: Some(DiagnosticsConfig {
            enabled: Some(true),
            output_dir: Some(dir.path().join("out")),
            metadata_path: Some(dir.path().to_path_buf()),
        }),
        ..create_config(2, 1, false)
    };
    let simulator = Arc::new(TestSimulator::default());
    let evaluator = create_evaluator(&config, create_test_catalog(2), simulator.clone());
    write_test_metadata(dir.path(), 1);

    let result = evaluator.evaluate_generation(0, &[create_test_candidate("a", 1.)]);

    assert!(matches!(result, Err(EvaluationError::Io(_))));
    assert_eq!(simulator.calls(), 0);
}

#[test]
fn can_create_evaluator_from_config() {
    let dir = tempfile::tempdir().unwrap();
    write_test_scenario_files(dir.path(), &[3, 1, 2]);
    fs::write(dir.path().join("0.80-5-1.00-4.scen"), "{}").unwrap();
    let config = EvaluatorConfig {
        dataset: Some(DatasetConfig { path: Some(dir.path().to_path_buf()), filter: None, extension: None }),
        ..create_config(1, 1, false)
    };

    let evaluator =
        Evaluator::<TestProgram>::from_config(&config, Arc::new(TestSimulator::default()), create_test_environment())
            .unwrap();

    assert_eq!(
        evaluator.catalog().scenarios().iter().map(|scenario| scenario.instance_id).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
}

#[test]
fn can_write_computation_stats_for_runs_with_auctions() {
    let dir = tempfile::tempdir().unwrap();
    write_test_metadata(dir.path(), 1);
    let simulator = TestSimulator::default().with_auction_activity(
        vec![AuctionEvent { start_time: 0, end_time: 5000, num_bids: 2 }],
        vec![BidMeasurement { bidder: 3, sim_time: 0, route_length: 4, duration_ns: 1200 }],
    );
    let config = EvaluatorConfig {
        diagnostics: Some(DiagnosticsConfig {
            enabled: Some(true),
            output_dir: Some(dir.path().join("out")),
            metadata_path: Some(dir.path().to_path_buf()),
        }),
        ..create_config(1, 1, false)
    };
    let evaluator = create_evaluator(&config, create_test_catalog(1), Arc::new(simulator));

    evaluator.evaluate_generation(0, &[create_test_candidate("a", 1.)]).unwrap();

    let stats_dir = dir.path().join("out").join(COMPUTATION_TIME_STATS_DIR);
    let prefix = format!("ReAuction-RP-EVO-BID-EVO-a-0.50-20-1.00-1-{}-0", evaluator.seeds()[0]);
    assert!(stats_dir.join(format!("{prefix}-auctions.csv")).exists());
    assert!(stats_dir.join(format!("{prefix}-bid-computations.csv")).exists());
}
