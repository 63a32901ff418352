//! Contains domain models used by the evaluation process.

mod candidate;
pub use self::candidate::*;

mod scenario;
pub use self::scenario::*;

mod simulation;
pub use self::simulation::*;
