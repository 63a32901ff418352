#[cfg(test)]
#[path = "../../tests/unit/commands/window_test.rs"]
mod window_test;

use super::*;
use simfit_cli::extensions::window::{format_window, get_generation_window};

const CONFIG_ARG_NAME: &str = "CONFIG";
const GENERATION_ARG_NAME: &str = "generation";
const OUT_RESULT_ARG_NAME: &str = "out-result";

pub fn get_window_app() -> Command {
    Command::new("window")
        .about("Prints scenarios evaluated in the given generation")
        .arg(get_config_arg(CONFIG_ARG_NAME))
        .arg(
            Arg::new(GENERATION_ARG_NAME)
                .help("Specifies generation number, starting from zero")
                .short('g')
                .long(GENERATION_ARG_NAME)
                .required(true),
        )
        .arg(get_out_result_arg(OUT_RESULT_ARG_NAME))
}

pub fn run_window(
    matches: &ArgMatches,
    out_writer_func: fn(Option<File>) -> BufWriter<Box<dyn Write>>,
) -> Result<(), String> {
    let config = read_config_file(matches, CONFIG_ARG_NAME)?;
    let generation = parse_int_value::<usize>(matches, GENERATION_ARG_NAME, "generation")?
        .ok_or_else(|| "generation is not specified".to_string())?;

    let scenarios = get_generation_window(&config, generation)
        .map_err(|err| format!("cannot get window of generation {generation}: '{err}'"))?;

    let mut writer = create_out_writer(matches, OUT_RESULT_ARG_NAME, out_writer_func)?;
    format_window(scenarios.as_slice())
        .iter()
        .try_for_each(|line| writeln!(writer, "{line}"))
        .and_then(|_| writer.flush())
        .map_err(|err| format!("cannot write result: '{err}'"))
}
