//! Builds job configurations from candidates and keeps the table used to route results back.

#[cfg(test)]
#[path = "../../tests/unit/evaluation/builder_test.rs"]
mod builder_test;

use crate::models::{AuctionSettings, Candidate, ConfigurationKey, Job, JobConfiguration, Scenario, TimeMode};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Maps configuration keys to the candidates they were built from.
pub struct CorrelationTable<P> {
    candidates: FxHashMap<ConfigurationKey, Arc<Candidate<P>>>,
}

impl<P> CorrelationTable<P> {
    /// Returns a candidate for given configuration key.
    pub fn get(&self, key: &ConfigurationKey) -> Option<&Arc<Candidate<P>>> {
        self.candidates.get(key)
    }

    /// Returns amount of registered candidates.
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Returns true if no candidates are registered.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

impl<P> Default for CorrelationTable<P> {
    fn default() -> Self {
        Self { candidates: FxHashMap::default() }
    }
}

/// Builds one job configuration per distinct candidate within a batch.
pub struct JobBuilder<P> {
    time_mode: TimeMode,
    auction: AuctionSettings,
    configurations: Vec<Arc<JobConfiguration<P>>>,
    table: CorrelationTable<P>,
}

impl<P> JobBuilder<P> {
    /// Creates a new instance of `JobBuilder`.
    pub fn new(time_mode: TimeMode, auction: AuctionSettings) -> Self {
        Self { time_mode, auction, configurations: vec![], table: CorrelationTable::default() }
    }

    /// Derives a configuration from the candidate. Pure function of the candidate.
    pub fn build(&self, candidate: &Candidate<P>) -> JobConfiguration<P> {
        JobConfiguration::new(candidate, self.time_mode, self.auction.clone())
    }

    /// Builds a configuration for the candidate and registers it in the correlation table.
    /// A candidate with an already registered id is not added twice.
    pub fn add_candidate(&mut self, candidate: Arc<Candidate<P>>) -> Arc<JobConfiguration<P>> {
        let key = ConfigurationKey::new(candidate.id.as_str());

        if let Some(existing) = self.configurations.iter().find(|configuration| configuration.key() == &key) {
            return existing.clone();
        }

        let configuration = Arc::new(self.build(candidate.as_ref()));
        self.table.candidates.insert(key, candidate);
        self.configurations.push(configuration.clone());

        configuration
    }

    /// Returns registered configurations in registration order.
    pub fn configurations(&self) -> &[Arc<JobConfiguration<P>>] {
        self.configurations.as_slice()
    }

    /// Creates the cross product of scenarios, configurations and seeds (one seed per repetition).
    pub fn create_jobs(&self, scenarios: &[Arc<Scenario>], seeds: &[u64]) -> Vec<Job<P>> {
        scenarios
            .iter()
            .flat_map(|scenario| {
                self.configurations.iter().flat_map(move |configuration| {
                    seeds.iter().enumerate().map(move |(repetition, &seed)| Job {
                        scenario: scenario.clone(),
                        configuration: configuration.clone(),
                        seed,
                        repetition,
                    })
                })
            })
            .collect()
    }

    /// Consumes the builder and returns its correlation table.
    pub fn into_table(self) -> CorrelationTable<P> {
        self.table
    }
}
