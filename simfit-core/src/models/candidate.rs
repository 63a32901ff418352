//! Candidates and the simulation configurations derived from them.

#[cfg(test)]
#[path = "../../tests/unit/models/candidate_test.rs"]
mod candidate_test;

use serde::Deserialize;
use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A prefix of every job configuration name.
pub const CONFIGURATION_NAME_PREFIX: &str = "ReAuction-RP-EVO-BID-EVO-";

/// A heuristic program produced by the evolutionary search. The program itself is opaque to
/// the evaluator: only the simulator knows how to execute it.
pub struct Candidate<P> {
    /// Unique candidate id.
    pub id: String,
    /// A heuristic program.
    pub program: Arc<P>,
}

impl<P> Candidate<P> {
    /// Creates a new instance of `Candidate`.
    pub fn new(id: &str, program: P) -> Self {
        Self { id: id.to_string(), program: Arc::new(program) }
    }
}

impl<P> Clone for Candidate<P> {
    fn clone(&self) -> Self {
        Self { id: self.id.clone(), program: self.program.clone() }
    }
}

impl<P> Debug for Candidate<P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Candidate").field("id", &self.id).finish_non_exhaustive()
    }
}

/// A stable key which identifies a job configuration. It is derived only from candidate id.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConfigurationKey(String);

impl ConfigurationKey {
    /// Creates a key for given candidate id.
    pub fn new(candidate_id: &str) -> Self {
        Self(candidate_id.to_string())
    }

    /// Returns candidate id.
    pub fn candidate_id(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for ConfigurationKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Specifies how simulation time advances.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimeMode {
    /// Simulated time: route planner and bidders compute synchronously within a tick.
    #[default]
    Simulated,
    /// Real time: computations run concurrently with the simulation clock.
    Realtime,
}

impl TimeMode {
    /// Returns real time solver settings, if the mode needs them.
    pub fn realtime_settings(&self) -> Option<RealtimeSettings> {
        match self {
            TimeMode::Simulated => None,
            TimeMode::Realtime => Some(RealtimeSettings::default()),
        }
    }
}

/// Settings of the solver model used when computations run concurrently with the simulation clock.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RealtimeSettings {
    /// Amount of solver threads shared by all vehicles.
    pub solver_threads: usize,
    /// Whether computations of the same vehicle are kept on one thread.
    pub thread_grouping: bool,
    /// Whether the simulation clock is logged.
    pub clock_logging: bool,
}

impl Default for RealtimeSettings {
    fn default() -> Self {
        Self { solver_threads: 3, thread_grouping: true, clock_logging: true }
    }
}

/// Auction settings used by the bidding agents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuctionSettings {
    /// Minimum amount of bids before an auction can stop.
    pub min_bids: usize,
    /// An auction stops when all bidders answered or when this duration (ms) has passed.
    pub stop_duration: u64,
    /// Maximum auction duration (ms).
    pub max_duration: u64,
    /// A period (ms) during which a parcel cannot be auctioned again.
    pub reauction_cooldown: u64,
}

impl Default for AuctionSettings {
    fn default() -> Self {
        Self { min_bids: 2, stop_duration: 5_000, max_duration: 30 * 60 * 1000, reauction_cooldown: 60_000 }
    }
}

/// A simulation configuration built from a single candidate: the candidate's program wrapped into
/// the actors (route planner and bidder) which the simulator creates for every vehicle.
///
/// Equality and hashing depend only on the configuration key, i.e. on the candidate id.
pub struct JobConfiguration<P> {
    key: ConfigurationKey,
    name: String,
    /// A heuristic program used by route planner and bidder.
    pub program: Arc<P>,
    /// Time mode.
    pub time_mode: TimeMode,
    /// Auction settings.
    pub auction: AuctionSettings,
    /// Real time solver settings, present only in `TimeMode::Realtime`.
    pub realtime: Option<RealtimeSettings>,
}

impl<P> JobConfiguration<P> {
    /// Creates a configuration for given candidate.
    pub fn new(candidate: &Candidate<P>, time_mode: TimeMode, auction: AuctionSettings) -> Self {
        Self {
            key: ConfigurationKey::new(candidate.id.as_str()),
            name: format!("{CONFIGURATION_NAME_PREFIX}{}", candidate.id),
            program: candidate.program.clone(),
            time_mode,
            auction,
            realtime: time_mode.realtime_settings(),
        }
    }

    /// Returns configuration key.
    pub fn key(&self) -> &ConfigurationKey {
        &self.key
    }

    /// Returns configuration name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}

impl<P> PartialEq for JobConfiguration<P> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<P> Eq for JobConfiguration<P> {}

impl<P> Hash for JobConfiguration<P> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl<P> Debug for JobConfiguration<P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobConfiguration")
            .field("name", &self.name)
            .field("time_mode", &self.time_mode)
            .field("auction", &self.auction)
            .field("realtime", &self.realtime)
            .finish_non_exhaustive()
    }
}
