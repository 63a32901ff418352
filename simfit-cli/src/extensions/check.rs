//! Checks that a dataset can be evaluated.

#[cfg(test)]
#[path = "../../tests/unit/extensions/check_test.rs"]
mod check_test;

use super::load_catalog;
use simfit_core::evaluation::{EvaluatorConfig, ScenarioMetadataCache, check_metadata};
use simfit_core::utils::EvaluationResult;

/// Summarizes dataset health.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatasetReport {
    /// Amount of scenarios in catalog.
    pub scenarios: usize,
    /// Amount of generations which can be evaluated before catalog is exhausted.
    pub generations: usize,
    /// Metadata problems, one per broken scenario.
    pub problems: Vec<String>,
}

impl DatasetReport {
    /// Returns true if no problems are found.
    pub fn is_ok(&self) -> bool {
        self.problems.is_empty()
    }
}

/// Loads the catalog specified by config and verifies metadata of every scenario.
pub fn check_dataset(config: &EvaluatorConfig) -> EvaluationResult<DatasetReport> {
    let catalog = load_catalog(config)?;
    let cache = ScenarioMetadataCache::new(config.metadata_path().as_path());
    let problems = check_metadata(&cache, catalog.scenarios());

    Ok(DatasetReport {
        scenarios: catalog.len(),
        generations: catalog.len() / config.scenarios_per_generation(),
        problems,
    })
}
