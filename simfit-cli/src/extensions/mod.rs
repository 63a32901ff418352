//! Contains dataset inspection functionality used by commands.

pub mod check;
pub mod window;

use simfit_core::evaluation::{EvaluatorConfig, read_config};
use simfit_core::models::{ScenarioCatalog, ScenarioFilter};
use simfit_core::utils::EvaluationResult;
use std::io::{BufReader, Read};

/// Reads and validates evaluator config.
pub fn load_config<R: Read>(reader: BufReader<R>) -> EvaluationResult<EvaluatorConfig> {
    read_config(reader)
}

/// Loads a scenario catalog from the dataset specified by config.
pub fn load_catalog(config: &EvaluatorConfig) -> EvaluationResult<ScenarioCatalog> {
    let filter = ScenarioFilter::new(config.dataset_filter().as_str(), config.dataset_extension().as_str());

    ScenarioCatalog::load(config.dataset_path().as_path(), &filter)
}
