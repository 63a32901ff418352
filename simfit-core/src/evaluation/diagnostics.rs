//! Persists per-run diagnostics: a row per run in a per-configuration file and, for runs with
//! auction activity, auction and bid computation timing files.

#[cfg(test)]
#[path = "../../tests/unit/evaluation/diagnostics_test.rs"]
mod diagnostics_test;

use crate::evaluation::ObjectiveFunction;
use crate::models::{AuctionEvent, BidMeasurement, RawResult, Scenario};
use crate::utils::{EvaluationError, EvaluationResult};
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Metadata keys which every scenario must define.
pub const REQUIRED_METADATA_KEYS: &[&str] = &["dynamism_bin", "urgency", "scale", "AddParcelEvent", "AddVehicleEvent"];

/// A name of the subdirectory with auction and bid computation files.
pub const COMPUTATION_TIME_STATS_DIR: &str = "computation-time-stats";

const RUN_COLUMNS: &[&str] =
    &["scenario_id", "dynamism", "urgency", "scale", "num_orders", "num_vehicles", "random_seed", "repetition"];
const AUCTION_COLUMNS: &[&str] = &["auction_start", "auction_end", "num_bids"];
const BID_COLUMNS: &[&str] = &["bidder_id", "comp_start_sim_time", "route_length", "duration_ns"];

/// Key-value properties of a scenario.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScenarioMetadata {
    properties: BTreeMap<String, String>,
}

impl ScenarioMetadata {
    /// Parses properties written as `key = value` lines. Empty lines and `#` comments are skipped.
    /// Fails when a line has no separator or when a required key is missing.
    pub fn parse(content: &str) -> Result<Self, String> {
        let properties = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|line| {
                line.split_once('=')
                    .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
                    .ok_or_else(|| format!("malformed property line: '{line}'"))
            })
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        let missing = REQUIRED_METADATA_KEYS.iter().filter(|key| !properties.contains_key(**key)).collect::<Vec<_>>();
        if !missing.is_empty() {
            return Err(format!("missing required keys: {missing:?}"));
        }

        Ok(Self { properties })
    }

    /// Returns property value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    fn required(&self, key: &str) -> &str {
        // required keys are checked by `parse`
        self.get(key).unwrap_or_default()
    }
}

/// Caches parsed scenario metadata for the lifetime of an evaluation run. Each metadata file is
/// loaded at most once, even when many jobs complete at the same time.
pub struct ScenarioMetadataCache {
    directory: PathBuf,
    entries: Mutex<FxHashMap<PathBuf, Arc<ScenarioMetadata>>>,
}

impl ScenarioMetadataCache {
    /// Creates a cache over metadata files in given directory.
    pub fn new(directory: &Path) -> Self {
        Self { directory: directory.to_path_buf(), entries: Mutex::new(FxHashMap::default()) }
    }

    /// Returns path of the metadata file of a scenario.
    pub fn metadata_path(&self, scenario_name: &str) -> PathBuf {
        self.directory.join(format!("{scenario_name}.properties"))
    }

    /// Returns metadata of a scenario, loading it on first access.
    pub fn get_metadata(&self, scenario_name: &str) -> EvaluationResult<Arc<ScenarioMetadata>> {
        let path = self.metadata_path(scenario_name);
        let mut entries = self.entries.lock().map_err(|_| EvaluationError::Io("metadata cache is poisoned".into()))?;

        if let Some(metadata) = entries.get(&path) {
            return Ok(metadata.clone());
        }

        let content = fs::read_to_string(&path)
            .map_err(|err| EvaluationError::Io(format!("cannot read metadata file '{}': {err}", path.display())))?;
        let metadata = ScenarioMetadata::parse(content.as_str())
            .map(Arc::new)
            .map_err(|err| EvaluationError::Io(format!("malformed metadata file '{}': {err}", path.display())))?;

        entries.insert(path, metadata.clone());

        Ok(metadata)
    }

    /// Returns amount of loaded metadata files.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or_default()
    }

    /// Returns true if nothing is loaded yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A state of a per-configuration output file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFileState {
    /// Nothing written yet.
    Idle,
    /// Header is written.
    HeaderWritten,
    /// At least one row is appended.
    Appending,
}

/// Writes diagnostics files into an experiment directory. Writes to the same file are serialized.
pub struct DiagnosticsWriter {
    experiment_dir: PathBuf,
    enabled: bool,
    cache: Arc<ScenarioMetadataCache>,
    objective: Arc<dyn ObjectiveFunction>,
    files: Mutex<FxHashMap<PathBuf, Arc<Mutex<OutputFileState>>>>,
    closed: AtomicBool,
}

impl DiagnosticsWriter {
    /// Creates a new instance of `DiagnosticsWriter`.
    pub fn new(
        experiment_dir: &Path,
        enabled: bool,
        cache: Arc<ScenarioMetadataCache>,
        objective: Arc<dyn ObjectiveFunction>,
    ) -> Self {
        Self {
            experiment_dir: experiment_dir.to_path_buf(),
            enabled,
            cache,
            objective,
            files: Mutex::new(FxHashMap::default()),
            closed: AtomicBool::new(false),
        }
    }

    /// Returns the experiment directory.
    pub fn experiment_dir(&self) -> &Path {
        self.experiment_dir.as_path()
    }

    /// Checks that results of given scenarios can be written: the writer is open and metadata of
    /// every scenario is loaded. Does nothing when diagnostics are disabled.
    pub fn prepare(&self, scenarios: &[Arc<Scenario>]) -> EvaluationResult<()> {
        if !self.enabled {
            return Ok(());
        }

        self.ensure_open()?;

        scenarios.iter().try_for_each(|scenario| self.cache.get_metadata(scenario.name.as_str()).map(|_| ()))
    }

    /// Returns a state of the output file of given configuration.
    pub fn file_state(&self, configuration_name: &str) -> OutputFileState {
        let path = self.run_file_path(configuration_name);

        self.files
            .lock()
            .ok()
            .and_then(|files| files.get(&path).cloned())
            .and_then(|state| state.lock().ok().map(|state| *state))
            .unwrap_or(OutputFileState::Idle)
    }

    /// Handles a single raw result: appends a row to the configuration's file and writes auction
    /// and bid computation files when the run has both logs.
    pub fn on_result<P>(&self, result: &RawResult<P>) -> EvaluationResult<()> {
        if !self.enabled {
            return Ok(());
        }

        self.ensure_open()?;

        let job = &result.job;
        let metadata = self.cache.get_metadata(job.scenario.name.as_str())?;

        let mut row = vec![
            job.scenario.name.clone(),
            metadata.required("dynamism_bin").to_string(),
            metadata.required("urgency").to_string(),
            metadata.required("scale").to_string(),
            metadata.required("AddParcelEvent").to_string(),
            metadata.required("AddVehicleEvent").to_string(),
            job.seed.to_string(),
            job.repetition.to_string(),
        ];

        match result.output() {
            Some(output) => row.extend(self.objective.summarize(&output.statistics)),
            None => row.extend(self.objective.output_columns().iter().map(|_| String::new())),
        }

        self.append_run_row(job.configuration.name(), row)?;

        if let Some(output) = result.output() {
            if !output.auction_log.is_empty() && !output.bid_timings.is_empty() {
                let id = format!("{}-{}-{}-{}", job.configuration.name(), job.scenario.name, job.seed, job.repetition);
                let id = escape_file_name(id.as_str());
                self.write_computation_stats(id.as_str(), &output.auction_log, &output.bid_timings)?;
            }
        }

        Ok(())
    }

    /// Closes the writer: any further result is rejected.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }

    /// Returns true if writer is closed.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Returns header of per-configuration files.
    pub fn run_header(&self) -> Vec<String> {
        RUN_COLUMNS.iter().map(|column| column.to_string()).chain(self.objective.output_columns()).collect()
    }

    fn ensure_open(&self) -> EvaluationResult<()> {
        if self.is_closed() {
            return Err(EvaluationError::Configuration("diagnostics writer is already closed".to_string()));
        }

        Ok(())
    }

    fn run_file_path(&self, configuration_name: &str) -> PathBuf {
        self.experiment_dir.join(format!("{}.csv", escape_file_name(configuration_name)))
    }

    fn append_run_row(&self, configuration_name: &str, row: Vec<String>) -> EvaluationResult<()> {
        let path = self.run_file_path(configuration_name);

        let file_lock = {
            let mut files = self.files.lock().map_err(|_| EvaluationError::Io("file registry is poisoned".into()))?;
            files.entry(path.clone()).or_insert_with(|| Arc::new(Mutex::new(OutputFileState::Idle))).clone()
        };

        let mut state = file_lock.lock().map_err(|_| EvaluationError::Io("output file lock is poisoned".into()))?;

        fs::create_dir_all(&self.experiment_dir)?;
        let needs_header = *state == OutputFileState::Idle && !path.exists();

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);

        if needs_header {
            writer.write_record(self.run_header())?;
        }
        *state = OutputFileState::HeaderWritten;

        writer.write_record(row)?;
        writer.flush()?;
        *state = OutputFileState::Appending;

        Ok(())
    }

    fn write_computation_stats(
        &self,
        id: &str,
        auctions: &[AuctionEvent],
        measurements: &[BidMeasurement],
    ) -> EvaluationResult<()> {
        let stats_dir = self.experiment_dir.join(COMPUTATION_TIME_STATS_DIR);
        fs::create_dir_all(&stats_dir)?;

        let mut writer = csv::Writer::from_path(stats_dir.join(format!("{id}-auctions.csv")))?;
        writer.write_record(AUCTION_COLUMNS)?;
        auctions.iter().try_for_each(|event| {
            writer.write_record(&[event.start_time.to_string(), event.end_time.to_string(), event.num_bids.to_string()])
        })?;
        writer.flush()?;

        let mut writer = csv::Writer::from_path(stats_dir.join(format!("{id}-bid-computations.csv")))?;
        writer.write_record(BID_COLUMNS)?;
        sort_by_bidder(measurements).into_iter().try_for_each(|measurement| {
            writer.write_record(&[
                measurement.bidder.to_string(),
                measurement.sim_time.to_string(),
                measurement.route_length.to_string(),
                measurement.duration_ns.to_string(),
            ])
        })?;
        writer.flush()?;

        Ok(())
    }
}

/// Percent encodes characters which cannot be part of a file name (and `%` itself), so that distinct
/// names always map to distinct file names.
pub fn escape_file_name(name: &str) -> String {
    name.chars().fold(String::with_capacity(name.len()), |mut acc, c| {
        if c.is_control() || matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '%') {
            let mut buffer = [0; 4];
            c.encode_utf8(&mut buffer).bytes().for_each(|byte| acc.push_str(format!("%{byte:02X}").as_str()));
        } else {
            acc.push(c);
        }

        acc
    })
}

/// Orders measurements by bidder id keeping measurements of the same bidder in their original order.
fn sort_by_bidder(measurements: &[BidMeasurement]) -> Vec<&BidMeasurement> {
    let mut sorted = measurements.iter().collect::<Vec<_>>();
    sorted.sort_by_key(|measurement| measurement.bidder);

    sorted
}

/// Checks that every scenario has a readable metadata file with all required keys.
/// Returns a list of problems, empty if all metadata is fine.
pub fn check_metadata(cache: &ScenarioMetadataCache, scenarios: &[Arc<Scenario>]) -> Vec<String> {
    scenarios
        .iter()
        .filter_map(|scenario| cache.get_metadata(scenario.name.as_str()).err())
        .map(|err| err.to_string())
        .collect()
}
