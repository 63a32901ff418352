//! Contains the evaluation pipeline: building jobs from candidates, executing them, routing results
//! back to candidates, scoring them and writing diagnostics.

mod builder;
pub use self::builder::*;

mod config;
pub use self::config::*;

mod correlation;
pub use self::correlation::*;

mod diagnostics;
pub use self::diagnostics::*;

mod evaluator;
pub use self::evaluator::*;

mod executor;
pub use self::executor::*;

mod fitness;
pub use self::fitness::*;

mod objective;
pub use self::objective::*;

mod processing;
pub use self::processing::*;
