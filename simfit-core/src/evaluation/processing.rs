//! Stateless strategies applied before (scenario converters) and after (post processors)
//! a simulation run.

#[cfg(test)]
#[path = "../../tests/unit/evaluation/processing_test.rs"]
mod processing_test;

use crate::models::{AuctionStats, Scenario, SimulationOutput, SimulationRun};
use crate::utils::GenericResult;
use serde::Deserialize;
use std::sync::Arc;

/// Default tick length (ms).
pub const DEFAULT_TICK_LENGTH: u64 = 250;
/// Default maximum simulation time (ms): 8 hours.
pub const DEFAULT_MAX_SIM_TIME: u64 = 8 * 60 * 60 * 1000;

/// Adapts a scenario before it is executed.
pub trait ScenarioConverter: Send + Sync {
    /// Returns a converted copy of the scenario.
    fn convert(&self, scenario: &Scenario) -> Scenario;
}

/// Replaces scenario's time model with a fixed tick length.
pub struct TickLengthConverter {
    tick_length: u64,
}

impl TickLengthConverter {
    /// Creates a new instance of `TickLengthConverter`.
    pub fn new(tick_length: u64) -> Self {
        Self { tick_length }
    }
}

impl ScenarioConverter for TickLengthConverter {
    fn convert(&self, scenario: &Scenario) -> Scenario {
        let mut settings = scenario.settings.clone();
        settings.tick_length = Some(self.tick_length);

        scenario.with_settings(settings)
    }
}

/// Adds a simulation time limit to scenario's stop conditions.
pub struct TimeLimitConverter {
    max_time: u64,
}

impl TimeLimitConverter {
    /// Creates a new instance of `TimeLimitConverter`.
    pub fn new(max_time: u64) -> Self {
        Self { max_time }
    }
}

impl ScenarioConverter for TimeLimitConverter {
    fn convert(&self, scenario: &Scenario) -> Scenario {
        let mut settings = scenario.settings.clone();
        // stop conditions are combined with "or", so the earliest limit wins
        settings.time_limit = Some(settings.time_limit.map_or(self.max_time, |limit| limit.min(self.max_time)));

        scenario.with_settings(settings)
    }
}

/// A scenario converter configuration.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "type")]
#[serde(rename_all = "camelCase")]
pub enum ScenarioConverterType {
    /// Fixed tick length.
    #[serde(rename_all = "camelCase")]
    TickLength {
        /// Tick length in ms. Default is 250.
        tick_length: Option<u64>,
    },
    /// Simulation time limit.
    #[serde(rename_all = "camelCase")]
    TimeLimit {
        /// Max simulation time in ms. Default is 8 hours.
        max_time: Option<u64>,
    },
}

impl ScenarioConverterType {
    /// Creates a converter strategy.
    pub fn create(&self) -> Arc<dyn ScenarioConverter> {
        match self {
            ScenarioConverterType::TickLength { tick_length } => {
                Arc::new(TickLengthConverter::new(tick_length.unwrap_or(DEFAULT_TICK_LENGTH)))
            }
            ScenarioConverterType::TimeLimit { max_time } => {
                Arc::new(TimeLimitConverter::new(max_time.unwrap_or(DEFAULT_MAX_SIM_TIME)))
            }
        }
    }
}

/// Applies all converters in order.
pub fn convert_scenario(scenario: &Scenario, converters: &[Arc<dyn ScenarioConverter>]) -> Scenario {
    converters.iter().fold(scenario.clone(), |acc, converter| converter.convert(&acc))
}

/// Collects outputs of a finished simulation run. A returned error aborts the run, but not the batch.
pub trait PostProcessor: Send + Sync {
    /// Converts simulator's run into a job output.
    fn collect(&self, run: SimulationRun) -> GenericResult<SimulationOutput>;
}

/// Collects statistics, auction logs and auction summary.
pub struct AuctionPostProcessor;

impl PostProcessor for AuctionPostProcessor {
    fn collect(&self, run: SimulationRun) -> GenericResult<SimulationOutput> {
        let auction_stats = match run.auction_counters {
            Some(counters) => {
                let reauctions = counters.num_auctions.checked_sub(counters.num_parcels).ok_or_else(|| {
                    format!(
                        "auction model reports {} auctions for {} parcels",
                        counters.num_auctions, counters.num_parcels
                    )
                })?;

                Some(AuctionStats {
                    parcels: counters.num_parcels,
                    reauctions,
                    unsuccessful: counters.num_unsuccessful,
                    failed: counters.num_failed,
                })
            }
            None => None,
        };

        Ok(SimulationOutput {
            statistics: run.statistics,
            auction_stats,
            auction_log: run.auction_log,
            bid_timings: run.bid_timings,
        })
    }
}

/// Keeps only simulation statistics.
pub struct StatisticsOnlyPostProcessor;

impl PostProcessor for StatisticsOnlyPostProcessor {
    fn collect(&self, run: SimulationRun) -> GenericResult<SimulationOutput> {
        Ok(SimulationOutput {
            statistics: run.statistics,
            auction_stats: None,
            auction_log: Vec::default(),
            bid_timings: Vec::default(),
        })
    }
}

/// A post processor configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PostProcessorType {
    /// Uses `AuctionPostProcessor`.
    #[default]
    Auction,
    /// Uses `StatisticsOnlyPostProcessor`.
    StatisticsOnly,
}

impl PostProcessorType {
    /// Creates a post processor strategy.
    pub fn create(&self) -> Arc<dyn PostProcessor> {
        match self {
            PostProcessorType::Auction => Arc::new(AuctionPostProcessor),
            PostProcessorType::StatisticsOnly => Arc::new(StatisticsOnlyPostProcessor),
        }
    }
}
