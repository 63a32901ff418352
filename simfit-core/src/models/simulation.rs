//! Data produced by the simulation engine.

use crate::models::{JobConfiguration, Scenario};
use crate::utils::{Float, GenericError};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Statistics of a single simulation run. Distances are in kilometers, times in milliseconds.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimulationStatistics {
    /// Total distance travelled by all vehicles.
    pub total_distance: Float,
    /// Total amount of pickups.
    pub total_pickups: usize,
    /// Total amount of deliveries.
    pub total_deliveries: usize,
    /// Total amount of parcels in the scenario.
    pub total_parcels: usize,
    /// Amount of parcels accepted by vehicles.
    pub accepted_parcels: usize,
    /// Sum of pickup tardiness.
    pub pickup_tardiness: u64,
    /// Sum of delivery tardiness.
    pub delivery_tardiness: u64,
    /// Wall clock time spent on computations (ms).
    pub computation_time: u64,
    /// Simulation time when simulation finished.
    pub simulation_time: u64,
    /// True if the scenario's end condition was reached.
    pub sim_finish: bool,
    /// Amount of vehicles at depot at simulation end.
    pub vehicles_at_depot: usize,
    /// Total time vehicles spent after their time windows closed.
    pub over_time: u64,
    /// Total amount of vehicles.
    pub total_vehicles: usize,
    /// Amount of vehicles which moved at least once.
    pub moved_vehicles: usize,
}

/// A finished auction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuctionEvent {
    /// Simulation time when auction started.
    pub start_time: u64,
    /// Simulation time when auction ended.
    pub end_time: u64,
    /// Amount of received bids.
    pub num_bids: usize,
}

/// A measurement of a single bid computation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BidMeasurement {
    /// An identifier of the bidder assigned by the simulator.
    pub bidder: usize,
    /// Simulation time when computation started.
    pub sim_time: u64,
    /// Length of bidder's current route.
    pub route_length: usize,
    /// Computation duration in nanoseconds.
    pub duration_ns: u64,
}

/// Raw auction counters reported by the simulator's auction model.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuctionCounters {
    /// Amount of auctioned parcels.
    pub num_parcels: usize,
    /// Amount of auctions including re-auctions.
    pub num_auctions: usize,
    /// Amount of auctions which did not change the parcel owner.
    pub num_unsuccessful: usize,
    /// Amount of auctions which failed.
    pub num_failed: usize,
}

/// Auction summary attached to a run's output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuctionStats {
    /// Amount of auctioned parcels.
    pub parcels: usize,
    /// Amount of re-auctions.
    pub reauctions: usize,
    /// Amount of unsuccessful auctions.
    pub unsuccessful: usize,
    /// Amount of failed auctions.
    pub failed: usize,
}

/// What the simulator returns for a single job.
#[derive(Clone, Debug, Default)]
pub struct SimulationRun {
    /// Simulation statistics.
    pub statistics: SimulationStatistics,
    /// Auction counters, present when the configuration uses an auction model.
    pub auction_counters: Option<AuctionCounters>,
    /// Auction activity log.
    pub auction_log: Vec<AuctionEvent>,
    /// Bid computation timings.
    pub bid_timings: Vec<BidMeasurement>,
}

/// A run's output after post processing.
#[derive(Clone, Debug)]
pub struct SimulationOutput {
    /// Simulation statistics.
    pub statistics: SimulationStatistics,
    /// Auction summary.
    pub auction_stats: Option<AuctionStats>,
    /// Auction activity log.
    pub auction_log: Vec<AuctionEvent>,
    /// Bid computation timings.
    pub bid_timings: Vec<BidMeasurement>,
}

/// A unit of execution: one scenario executed with one configuration.
pub struct Job<P> {
    /// A scenario (already converted).
    pub scenario: Arc<Scenario>,
    /// A configuration.
    pub configuration: Arc<JobConfiguration<P>>,
    /// Random seed of the run.
    pub seed: u64,
    /// Repetition index.
    pub repetition: usize,
}

impl<P> Job<P> {
    /// Returns a human readable job id.
    pub fn id(&self) -> String {
        format!("{}-{}-{}-{}", self.configuration.name(), self.scenario.name, self.seed, self.repetition)
    }
}

impl<P> Clone for Job<P> {
    fn clone(&self) -> Self {
        Self {
            scenario: self.scenario.clone(),
            configuration: self.configuration.clone(),
            seed: self.seed,
            repetition: self.repetition,
        }
    }
}

impl<P> Debug for Job<P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id().as_str())
    }
}

/// An outcome of a job execution.
#[derive(Clone, Debug)]
pub enum RunOutcome {
    /// Simulation finished and its output was collected.
    Completed(SimulationOutput),
    /// Simulation was aborted.
    Failed(GenericError),
}

/// A result of a single job, tagged with the job (and, therefore, configuration) which produced it.
pub struct RawResult<P> {
    /// The job.
    pub job: Job<P>,
    /// The outcome.
    pub outcome: RunOutcome,
}

impl<P> Clone for RawResult<P> {
    fn clone(&self) -> Self {
        Self { job: self.job.clone(), outcome: self.outcome.clone() }
    }
}

impl<P> Debug for RawResult<P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawResult").field("job", &self.job).field("outcome", &self.outcome).finish()
    }
}

impl<P> RawResult<P> {
    /// Returns true if the run has failed.
    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, RunOutcome::Failed(_))
    }

    /// Returns output of a completed run.
    pub fn output(&self) -> Option<&SimulationOutput> {
        match &self.outcome {
            RunOutcome::Completed(output) => Some(output),
            RunOutcome::Failed(_) => None,
        }
    }
}
