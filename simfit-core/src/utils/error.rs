#[cfg(test)]
#[path = "../../tests/unit/utils/error_test.rs"]
mod error_test;

use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

/// A basic error type which, essentially, a wrapper on String type.
/// Used for failures which are local to a single simulation run.
#[derive(Clone, Debug)]
pub struct GenericError(String);

/// A type alias for result type with `GenericError`.
pub type GenericResult<T> = Result<T, GenericError>;

impl Display for GenericError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for GenericError {}

impl From<String> for GenericError {
    fn from(msg: String) -> Self {
        Self(msg)
    }
}

impl<'a> From<&'a str> for GenericError {
    fn from(value: &'a str) -> Self {
        Self(value.to_string())
    }
}

impl PartialEq<Self> for GenericError {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}

impl Eq for GenericError {}

impl Hash for GenericError {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

/// Specifies fatal errors of the evaluation process. All of them signal a setup problem and
/// terminate the evolutionary run: none of them is retried.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvaluationError {
    /// A scenario file name does not follow the expected instance id pattern.
    Parse(String),
    /// Evaluation is configured in a way which cannot work (e.g. empty catalog).
    Configuration(String),
    /// Requested generation window does not fit into the scenario catalog.
    OutOfRange {
        /// Generation index.
        generation: usize,
        /// Window size.
        window_size: usize,
        /// Amount of scenarios in the catalog.
        catalog_size: usize,
    },
    /// A simulation result cannot be routed back to the candidate which produced it.
    Correlation(String),
    /// Reading or writing of a file has failed (includes malformed metadata files).
    Io(String),
}

/// A type alias for result type with `EvaluationError`.
pub type EvaluationResult<T> = Result<T, EvaluationError>;

impl Display for EvaluationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            EvaluationError::Parse(msg) => write!(f, "parse error: {msg}"),
            EvaluationError::Configuration(msg) => write!(f, "configuration error: {msg}"),
            EvaluationError::OutOfRange { generation, window_size, catalog_size } => write!(
                f,
                "generation {generation} with {window_size} scenario(s) per generation requires {} scenarios, \
                 but catalog has only {catalog_size}",
                generation.saturating_add(1).saturating_mul(*window_size)
            ),
            EvaluationError::Correlation(msg) => write!(f, "correlation error: {msg}"),
            EvaluationError::Io(msg) => write!(f, "io error: {msg}"),
        }
    }
}

impl std::error::Error for EvaluationError {}

impl From<std::io::Error> for EvaluationError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value.to_string())
    }
}

impl From<csv::Error> for EvaluationError {
    fn from(value: csv::Error) -> Self {
        Self::Io(value.to_string())
    }
}

impl From<serde_json::Error> for EvaluationError {
    fn from(value: serde_json::Error) -> Self {
        Self::Configuration(value.to_string())
    }
}
