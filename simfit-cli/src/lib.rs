//! A command line interface library on top of `simfit-core`: helpers to inspect a scenario dataset
//! as the evaluator sees it.

#![warn(missing_docs)]

pub mod extensions;
