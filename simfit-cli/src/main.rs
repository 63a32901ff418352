//! A command line interface to simulation based fitness evaluation.

mod commands;

use crate::commands::check::{get_check_app, run_check};
use crate::commands::create_write_buffer;
use crate::commands::window::{get_window_app, run_window};
use clap::{ArgMatches, Command};
use std::process;

fn main() {
    run_subcommand(get_app().get_matches());
}

fn get_app() -> Command {
    Command::new("Simulation Fitness Evaluator")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A command line interface to simulation based fitness evaluation")
        .subcommand(get_window_app())
        .subcommand(get_check_app())
}

fn run_subcommand(arg_matches: ArgMatches) {
    let result = match arg_matches.subcommand() {
        Some(("window", matches)) => run_window(matches, create_write_buffer),
        Some(("check", matches)) => run_check(matches, create_write_buffer),
        Some((name, _)) => Err(format!("unknown subcommand: '{name}'")),
        None => Err("no subcommand was used. Use -h to print help information.".to_string()),
    };

    if let Err(err) = result {
        eprintln!("{err}");
        process::exit(1);
    }
}
