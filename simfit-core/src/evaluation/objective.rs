//! Objective functions over simulation statistics.

#[cfg(test)]
#[path = "../../tests/unit/evaluation/objective_test.rs"]
mod objective_test;

use crate::models::SimulationStatistics;
use crate::utils::Float;

const MS_IN_MINUTE: Float = 60_000.;

/// An externally supplied cost and validity evaluator.
pub trait ObjectiveFunction: Send + Sync {
    /// Computes cost of the simulation outcome. Lower is better.
    fn compute_cost(&self, statistics: &SimulationStatistics) -> Float;

    /// Checks whether the outcome is feasible.
    fn is_valid_result(&self, statistics: &SimulationStatistics) -> bool;

    /// Returns names of the columns produced by `summarize`.
    fn output_columns(&self) -> Vec<String>;

    /// Summarizes statistics as values of `output_columns`.
    fn summarize(&self, statistics: &SimulationStatistics) -> Vec<String>;
}

/// An objective function from the dynamic pickup and delivery benchmark of Gendreau et al. (2006):
/// sum of travel time, tardiness and overtime, in minutes.
pub struct Gendreau06Objective {
    vehicle_speed: Float,
}

impl Gendreau06Objective {
    /// Creates a new instance of `Gendreau06Objective` with given vehicle speed (km/h).
    ///
    /// # Panics
    ///
    /// Panics if `vehicle_speed` is not a positive number. `EvaluatorConfig::validate` rejects such
    /// values before an objective is created from config.
    pub fn new(vehicle_speed: Float) -> Self {
        assert!(vehicle_speed > 0., "vehicle speed must be positive, got {vehicle_speed}");

        Self { vehicle_speed }
    }

    /// Returns travel time in minutes.
    pub fn travel_time(&self, statistics: &SimulationStatistics) -> Float {
        statistics.total_distance / self.vehicle_speed * 60.
    }

    /// Returns pickup and delivery tardiness in minutes.
    pub fn tardiness(&self, statistics: &SimulationStatistics) -> Float {
        (statistics.pickup_tardiness + statistics.delivery_tardiness) as Float / MS_IN_MINUTE
    }

    /// Returns overtime in minutes.
    pub fn over_time(&self, statistics: &SimulationStatistics) -> Float {
        statistics.over_time as Float / MS_IN_MINUTE
    }
}

impl Default for Gendreau06Objective {
    fn default() -> Self {
        Self::new(50.)
    }
}

impl ObjectiveFunction for Gendreau06Objective {
    fn compute_cost(&self, statistics: &SimulationStatistics) -> Float {
        self.travel_time(statistics) + self.tardiness(statistics) + self.over_time(statistics)
    }

    fn is_valid_result(&self, statistics: &SimulationStatistics) -> bool {
        statistics.total_parcels == statistics.accepted_parcels
            && statistics.total_parcels == statistics.total_pickups
            && statistics.total_parcels == statistics.total_deliveries
            && statistics.sim_finish
            && statistics.total_vehicles == statistics.vehicles_at_depot
    }

    fn output_columns(&self) -> Vec<String> {
        ["cost", "travel_time", "tardiness", "over_time", "is_valid", "computation_time", "num_vehicles"]
            .iter()
            .map(|name| name.to_string())
            .collect()
    }

    fn summarize(&self, statistics: &SimulationStatistics) -> Vec<String> {
        vec![
            self.compute_cost(statistics).to_string(),
            self.travel_time(statistics).to_string(),
            self.tardiness(statistics).to_string(),
            self.over_time(statistics).to_string(),
            self.is_valid_result(statistics).to_string(),
            statistics.computation_time.to_string(),
            statistics.total_vehicles.to_string(),
        ]
    }
}
