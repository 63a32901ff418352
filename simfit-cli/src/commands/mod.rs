use clap::{Arg, ArgMatches, Command};

pub mod check;
pub mod window;

use simfit_cli::extensions::load_config;
use simfit_core::evaluation::EvaluatorConfig;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write, stdout};
use std::str::FromStr;

pub(crate) fn create_write_buffer(out_file: Option<File>) -> BufWriter<Box<dyn Write>> {
    if let Some(out_file) = out_file {
        BufWriter::new(Box::new(out_file))
    } else {
        BufWriter::new(Box::new(stdout()))
    }
}

fn open_file(path: &str, description: &str) -> Result<File, String> {
    File::open(path).map_err(|err| format!("cannot open {description} file '{path}': '{err}'"))
}

fn create_file(path: &str, description: &str) -> Result<File, String> {
    File::create(path).map_err(|err| format!("cannot create {description} file '{path}': '{err}'"))
}

fn parse_int_value<T: FromStr<Err = std::num::ParseIntError>>(
    matches: &ArgMatches,
    arg_name: &str,
    arg_desc: &str,
) -> Result<Option<T>, String> {
    matches
        .get_one::<String>(arg_name)
        .map(|arg| {
            arg.parse::<T>().map_err(|err| format!("cannot get integer value, error: '{err}': '{arg_desc}'")).map(Some)
        })
        .unwrap_or(Ok(None))
}

fn read_config_file(matches: &ArgMatches, arg_name: &str) -> Result<EvaluatorConfig, String> {
    let path = matches.get_one::<String>(arg_name).ok_or_else(|| "config file is not specified".to_string())?;

    load_config(BufReader::new(open_file(path, "config")?)).map_err(|err| format!("cannot read config: '{err}'"))
}

fn create_out_writer(
    matches: &ArgMatches,
    arg_name: &str,
    out_writer_func: fn(Option<File>) -> BufWriter<Box<dyn Write>>,
) -> Result<BufWriter<Box<dyn Write>>, String> {
    let out_file = matches.get_one::<String>(arg_name).map(|path| create_file(path, "out result")).transpose()?;

    Ok(out_writer_func(out_file))
}

fn get_config_arg(arg_name: &'static str) -> Arg {
    Arg::new(arg_name).help("Sets evaluator config file").required(true).index(1)
}

fn get_out_result_arg(arg_name: &'static str) -> Arg {
    Arg::new(arg_name).help("Specifies path to the file for result output").short('o').long(arg_name).required(false)
}
