use super::*;
use crate::helpers::models::create_valid_statistics;

#[test]
fn can_compute_cost_as_sum_of_travel_time_tardiness_and_overtime() {
    let mut statistics = create_valid_statistics(100.);
    statistics.pickup_tardiness = 60_000;
    statistics.delivery_tardiness = 120_000;
    statistics.over_time = 30_000;

    let cost = Gendreau06Objective::new(50.).compute_cost(&statistics);

    assert_eq!(cost, 120. + 3. + 0.5);
}

parameterized_test! {can_detect_invalid_result, (modify, expected), {
    can_detect_invalid_result_impl(modify, expected);
}}

can_detect_invalid_result! {
    case_01_valid: (|_: &mut SimulationStatistics| {}, true),
    case_02_not_accepted: (|s: &mut SimulationStatistics| s.accepted_parcels -= 1, false),
    case_03_not_picked_up: (|s: &mut SimulationStatistics| s.total_pickups -= 1, false),
    case_04_not_delivered: (|s: &mut SimulationStatistics| s.total_deliveries -= 1, false),
    case_05_not_finished: (|s: &mut SimulationStatistics| s.sim_finish = false, false),
    case_06_not_at_depot: (|s: &mut SimulationStatistics| s.vehicles_at_depot -= 1, false),
}

fn can_detect_invalid_result_impl(modify: fn(&mut SimulationStatistics), expected: bool) {
    let mut statistics = create_valid_statistics(10.);
    modify(&mut statistics);

    assert_eq!(Gendreau06Objective::default().is_valid_result(&statistics), expected);
}

#[test]
fn can_summarize_statistics_per_output_columns() {
    let objective = Gendreau06Objective::default();
    let statistics = create_valid_statistics(25.);

    let values = objective.summarize(&statistics);

    assert_eq!(values.len(), objective.output_columns().len());
    assert_eq!(values, vec!["30", "30", "0", "0", "true", "100", "2"]);
}

#[test]
#[should_panic(expected = "vehicle speed must be positive")]
fn can_reject_non_positive_vehicle_speed() {
    Gendreau06Objective::new(0.);
}
