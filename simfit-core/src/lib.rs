//! Core crate contains building blocks to evaluate the fitness of evolved heuristics by running them
//! inside discrete-event simulations.
//!
//! The evaluation pipeline of a single generation is:
//!
//! - select a window of scenarios from the [`models::ScenarioCatalog`];
//! - build one [`models::JobConfiguration`] per distinct candidate;
//! - run every (scenario, configuration, repetition) job with a [`evaluation::BatchExecutor`];
//! - route each raw result back to its candidate and score it with an objective function;
//! - optionally persist diagnostics (auction activity, bid computation timings).
//!
//! The simulation engine itself is external and plugged in through the [`evaluation::Simulator`] trait.

#![warn(missing_docs)]

#[cfg(test)]
#[path = "../tests/helpers/mod.rs"]
#[macro_use]
pub mod helpers;

pub mod evaluation;
pub mod models;
pub mod prelude;
pub mod utils;
