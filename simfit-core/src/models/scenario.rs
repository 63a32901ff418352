//! Scenario identifiers and the ordered scenario catalog.

#[cfg(test)]
#[path = "../../tests/unit/models/scenario_test.rs"]
mod scenario_test;

use crate::utils::{EvaluationError, EvaluationResult};
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Simulation settings applied to a scenario before it is executed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SimulationSettings {
    /// Length of a simulation tick in milliseconds. When not set, the scenario's own value is used.
    pub tick_length: Option<u64>,
    /// Simulation time (milliseconds) after which the run is stopped in addition to the
    /// scenario's own stop conditions.
    pub time_limit: Option<u64>,
}

/// A fixed problem instance which is executed against candidates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scenario {
    /// Scenario name: a file stem which embeds problem class and instance id, e.g. `0.50-20-1.00-7`.
    pub name: String,
    /// Numeric instance id extracted from the name.
    pub instance_id: u32,
    /// Path to the scenario definition file.
    pub path: PathBuf,
    /// Simulation settings.
    pub settings: SimulationSettings,
}

impl Scenario {
    /// Creates a scenario from its definition file path.
    /// Fails with `EvaluationError::Parse` if the file name has no trailing instance id.
    pub fn from_path(path: &Path) -> EvaluationResult<Self> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| EvaluationError::Parse(format!("invalid scenario file name: '{}'", path.display())))?;

        let name = match file_name.rsplit_once('.') {
            Some((stem, _)) => stem,
            None => file_name,
        };

        let instance_id = parse_instance_id(name)
            .ok_or_else(|| EvaluationError::Parse(format!("cannot extract instance id from '{file_name}'")))?;

        Ok(Self { name: name.to_string(), instance_id, path: path.to_path_buf(), settings: Default::default() })
    }

    /// Returns a copy of the scenario with given settings.
    pub fn with_settings(&self, settings: SimulationSettings) -> Self {
        Self { settings, ..self.clone() }
    }
}

impl Display for Scenario {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Extracts instance id from the last `-` separated segment of a scenario name.
fn parse_instance_id(name: &str) -> Option<u32> {
    let (_, id) = name.rsplit_once('-')?;

    if id.is_empty() || !id.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    id.parse().ok()
}

/// Specifies which files of a directory are scenario definitions.
#[derive(Clone, Debug)]
pub struct ScenarioFilter {
    /// A substring which a file name must contain.
    pub infix: String,
    /// A file extension (without dot).
    pub extension: String,
}

impl ScenarioFilter {
    /// Creates a new instance of `ScenarioFilter`.
    pub fn new(infix: &str, extension: &str) -> Self {
        Self { infix: infix.to_string(), extension: extension.trim_start_matches('.').to_string() }
    }

    /// Checks whether given path is accepted by the filter.
    pub fn matches(&self, path: &Path) -> bool {
        let has_extension = path.extension().and_then(|ext| ext.to_str()).is_some_and(|ext| ext == self.extension);
        let has_infix =
            path.file_name().and_then(|name| name.to_str()).is_some_and(|name| name.contains(self.infix.as_str()));

        has_extension && has_infix
    }
}

/// An ordered, immutable collection of scenarios sliced into generation sized windows.
#[derive(Clone, Debug)]
pub struct ScenarioCatalog {
    scenarios: Vec<Arc<Scenario>>,
}

impl ScenarioCatalog {
    /// Loads all scenarios from `source` directory accepted by the `filter`, sorted by instance id.
    pub fn load(source: &Path, filter: &ScenarioFilter) -> EvaluationResult<Self> {
        let entries = fs::read_dir(source).map_err(|err| {
            EvaluationError::Configuration(format!("cannot read scenario directory '{}': {err}", source.display()))
        })?;

        let paths = entries
            .map(|entry| entry.map(|entry| entry.path()))
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .filter(|path| path.is_file() && filter.matches(path))
            .collect::<Vec<_>>();

        let scenarios = paths.iter().map(|path| Scenario::from_path(path)).collect::<EvaluationResult<Vec<_>>>()?;

        Self::new(scenarios).map_err(|err| match err {
            EvaluationError::Configuration(_) => EvaluationError::Configuration(format!(
                "no scenarios matching '*{}*.{}' found in '{}'",
                filter.infix,
                filter.extension,
                source.display()
            )),
            err => err,
        })
    }

    /// Creates a catalog from already parsed scenarios. Scenarios are sorted by instance id,
    /// duplicated ids are rejected.
    pub fn new(mut scenarios: Vec<Scenario>) -> EvaluationResult<Self> {
        if scenarios.is_empty() {
            return Err(EvaluationError::Configuration("scenario catalog is empty".to_string()));
        }

        scenarios.sort_by_key(|scenario| scenario.instance_id);

        if let Some(pair) = scenarios.windows(2).find(|pair| pair[0].instance_id == pair[1].instance_id) {
            return Err(EvaluationError::Parse(format!(
                "scenarios '{}' and '{}' share instance id {}",
                pair[0].name, pair[1].name, pair[0].instance_id
            )));
        }

        Ok(Self { scenarios: scenarios.into_iter().map(Arc::new).collect() })
    }

    /// Returns the half open slice `[generation * size, generation * size + size)`.
    pub fn window_for(&self, generation: usize, window_size: usize) -> EvaluationResult<&[Arc<Scenario>]> {
        let out_of_range =
            || EvaluationError::OutOfRange { generation, window_size, catalog_size: self.scenarios.len() };

        let start = generation.checked_mul(window_size).ok_or_else(out_of_range)?;
        let end = start.checked_add(window_size).ok_or_else(out_of_range)?;

        self.scenarios.get(start..end).ok_or_else(out_of_range)
    }

    /// Returns all scenarios in catalog order.
    pub fn scenarios(&self) -> &[Arc<Scenario>] {
        self.scenarios.as_slice()
    }

    /// Returns amount of scenarios.
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    /// Returns true if catalog has no scenarios. Never the case for a successfully created catalog.
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}
