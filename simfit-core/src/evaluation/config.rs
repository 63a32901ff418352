//! Evaluator configuration.

#[cfg(test)]
#[path = "../../tests/unit/evaluation/config_test.rs"]
mod config_test;

use crate::evaluation::{PostProcessorType, ScenarioConverterType};
use crate::models::TimeMode;
use crate::utils::{EvaluationError, EvaluationResult, Float};
use serde::Deserialize;
use std::io::{BufReader, Read};
use std::path::PathBuf;

/// Default path to the training dataset.
pub const DEFAULT_DATASET_PATH: &str = "files/train-dataset";
/// Default file name infix of training scenarios.
pub const DEFAULT_DATASET_FILTER: &str = "0.50-20-1.00-";
/// Default scenario file extension.
pub const DEFAULT_DATASET_EXTENSION: &str = "scen";
/// Default diagnostics output directory.
pub const DEFAULT_OUTPUT_DIR: &str = "files/results";

/// An evaluator configuration.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluatorConfig {
    /// Specifies where scenarios are taken from.
    pub dataset: Option<DatasetConfig>,
    /// Amount of scenarios evaluated per generation. Default is 1.
    pub scenarios_per_generation: Option<usize>,
    /// Whether jobs are distributed over workers. Default is false.
    pub distributed: Option<bool>,
    /// Amount of workers used in distributed mode. Default is number of cpus.
    pub threads: Option<usize>,
    /// Amount of repetitions of each (scenario, configuration) pair. Default is 1.
    pub repetitions: Option<usize>,
    /// A master random seed. Default is 123.
    pub seed: Option<u64>,
    /// Time mode of job configurations. Default is simulated.
    pub time_mode: Option<TimeMode>,
    /// Objective function settings.
    pub objective: Option<ObjectiveConfig>,
    /// Scenario converters applied in order. Default is tick length and time limit.
    pub converter: Option<Vec<ScenarioConverterType>>,
    /// A post processor. Default is auction.
    pub post_processor: Option<PostProcessorType>,
    /// Diagnostics settings.
    pub diagnostics: Option<DiagnosticsConfig>,
}

/// A scenario dataset configuration.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetConfig {
    /// A directory with scenario and metadata files.
    pub path: Option<PathBuf>,
    /// A file name infix.
    pub filter: Option<String>,
    /// A scenario file extension.
    pub extension: Option<String>,
}

/// An objective function configuration.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectiveConfig {
    /// Vehicle speed in km/h. Default is 50.
    pub vehicle_speed: Option<Float>,
}

/// A diagnostics configuration.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticsConfig {
    /// Whether diagnostics files are written. Default is false.
    pub enabled: Option<bool>,
    /// An experiment output directory.
    pub output_dir: Option<PathBuf>,
    /// A directory with scenario metadata files. Default is dataset path.
    pub metadata_path: Option<PathBuf>,
}

impl EvaluatorConfig {
    /// Returns dataset directory.
    pub fn dataset_path(&self) -> PathBuf {
        self.dataset.as_ref().and_then(|d| d.path.clone()).unwrap_or_else(|| PathBuf::from(DEFAULT_DATASET_PATH))
    }

    /// Returns dataset file name infix.
    pub fn dataset_filter(&self) -> String {
        self.dataset.as_ref().and_then(|d| d.filter.clone()).unwrap_or_else(|| DEFAULT_DATASET_FILTER.to_string())
    }

    /// Returns scenario file extension.
    pub fn dataset_extension(&self) -> String {
        self.dataset
            .as_ref()
            .and_then(|d| d.extension.clone())
            .unwrap_or_else(|| DEFAULT_DATASET_EXTENSION.to_string())
    }

    /// Returns amount of scenarios per generation.
    pub fn scenarios_per_generation(&self) -> usize {
        self.scenarios_per_generation.unwrap_or(1)
    }

    /// Returns amount of repetitions.
    pub fn repetitions(&self) -> usize {
        self.repetitions.unwrap_or(1)
    }

    /// Returns the master seed.
    pub fn seed(&self) -> u64 {
        self.seed.unwrap_or(123)
    }

    /// Returns vehicle speed used by objective function.
    pub fn vehicle_speed(&self) -> Float {
        self.objective.as_ref().and_then(|o| o.vehicle_speed).unwrap_or(50.)
    }

    /// Returns scenario converters.
    pub fn converters(&self) -> Vec<ScenarioConverterType> {
        self.converter.clone().unwrap_or_else(|| {
            vec![ScenarioConverterType::TickLength { tick_length: None }, ScenarioConverterType::TimeLimit {
                max_time: None,
            }]
        })
    }

    /// Returns true if diagnostics are enabled.
    pub fn is_diagnostics_enabled(&self) -> bool {
        self.diagnostics.as_ref().and_then(|d| d.enabled).unwrap_or(false)
    }

    /// Returns diagnostics output directory.
    pub fn output_dir(&self) -> PathBuf {
        self.diagnostics
            .as_ref()
            .and_then(|d| d.output_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
    }

    /// Returns a directory with scenario metadata files.
    pub fn metadata_path(&self) -> PathBuf {
        self.diagnostics.as_ref().and_then(|d| d.metadata_path.clone()).unwrap_or_else(|| self.dataset_path())
    }

    /// Checks that configuration values are usable.
    pub fn validate(&self) -> EvaluationResult<()> {
        if self.scenarios_per_generation() == 0 {
            return Err(EvaluationError::Configuration("scenariosPerGeneration must be positive".to_string()));
        }

        if self.repetitions() == 0 {
            return Err(EvaluationError::Configuration("repetitions must be positive".to_string()));
        }

        if self.threads == Some(0) {
            return Err(EvaluationError::Configuration("threads must be positive".to_string()));
        }

        let speed = self.vehicle_speed();
        if !speed.is_finite() || speed <= 0. {
            return Err(EvaluationError::Configuration(format!("vehicle speed must be positive, got {speed}")));
        }

        Ok(())
    }
}

/// Reads config from reader.
pub fn read_config<R: Read>(reader: BufReader<R>) -> EvaluationResult<EvaluatorConfig> {
    let config: EvaluatorConfig = serde_json::from_reader(reader)
        .map_err(|err| EvaluationError::Configuration(format!("cannot deserialize config: '{err}'")))?;

    config.validate()?;

    Ok(config)
}
