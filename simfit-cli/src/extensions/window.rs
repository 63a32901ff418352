//! Resolves generation windows of a dataset.

#[cfg(test)]
#[path = "../../tests/unit/extensions/window_test.rs"]
mod window_test;

use super::load_catalog;
use simfit_core::evaluation::{EvaluatorConfig, convert_scenario};
use simfit_core::models::Scenario;
use simfit_core::utils::EvaluationResult;

/// Returns scenarios evaluated in given generation, adapted by the configured converters.
pub fn get_generation_window(config: &EvaluatorConfig, generation: usize) -> EvaluationResult<Vec<Scenario>> {
    let catalog = load_catalog(config)?;
    let converters = config.converters().iter().map(|converter| converter.create()).collect::<Vec<_>>();

    Ok(catalog
        .window_for(generation, config.scenarios_per_generation())?
        .iter()
        .map(|scenario| convert_scenario(scenario.as_ref(), converters.as_slice()))
        .collect())
}

/// Formats window scenarios as csv-like lines: instance id, name, tick length and time limit.
pub fn format_window(scenarios: &[Scenario]) -> Vec<String> {
    scenarios
        .iter()
        .map(|scenario| {
            let settings = &scenario.settings;
            format!(
                "{},{},{},{}",
                scenario.instance_id,
                scenario.name,
                settings.tick_length.map(|value| value.to_string()).unwrap_or_default(),
                settings.time_limit.map(|value| value.to_string()).unwrap_or_default()
            )
        })
        .collect()
}
