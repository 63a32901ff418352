//! Routes raw results back to the candidates which produced them.

#[cfg(test)]
#[path = "../../tests/unit/evaluation/correlation_test.rs"]
mod correlation_test;

use crate::evaluation::CorrelationTable;
use crate::models::{Candidate, RawResult};
use crate::utils::{EvaluationError, EvaluationResult};
use std::sync::Arc;

/// Resolves every raw result to its originating candidate using the configuration key embedded in
/// the result's job. The lookup does not depend on result order. A missing key is an internal
/// invariant violation and is reported as `EvaluationError::Correlation`.
pub fn correlate<P>(
    results: Vec<RawResult<P>>,
    table: &CorrelationTable<P>,
) -> EvaluationResult<Vec<(Arc<Candidate<P>>, RawResult<P>)>> {
    results
        .into_iter()
        .map(|result| {
            let key = result.job.configuration.key().clone();

            table.get(&key).cloned().map(|candidate| (candidate, result)).ok_or_else(|| {
                EvaluationError::Correlation(format!("no candidate registered for configuration with key '{key}'"))
            })
        })
        .collect()
}
