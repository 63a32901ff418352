#[cfg(test)]
#[path = "../../tests/unit/commands/check_test.rs"]
mod check_test;

use super::*;
use simfit_cli::extensions::check::check_dataset;

const CONFIG_ARG_NAME: &str = "CONFIG";
const OUT_RESULT_ARG_NAME: &str = "out-result";

pub fn get_check_app() -> Command {
    Command::new("check")
        .about("Checks that the dataset specified by config can be evaluated")
        .arg(get_config_arg(CONFIG_ARG_NAME))
        .arg(get_out_result_arg(OUT_RESULT_ARG_NAME))
}

pub fn run_check(
    matches: &ArgMatches,
    out_writer_func: fn(Option<File>) -> BufWriter<Box<dyn Write>>,
) -> Result<(), String> {
    let config = read_config_file(matches, CONFIG_ARG_NAME)?;
    let report = check_dataset(&config).map_err(|err| format!("cannot load dataset: '{err}'"))?;

    if !report.is_ok() {
        return Err(format!("checker found {} errors:\n{}", report.problems.len(), report.problems.join("\n")));
    }

    let mut writer = create_out_writer(matches, OUT_RESULT_ARG_NAME, out_writer_func)?;
    writeln!(
        writer,
        "dataset is ok: {} scenario(s), {} generation(s) of {} scenario(s)",
        report.scenarios,
        report.generations,
        config.scenarios_per_generation()
    )
    .and_then(|_| writer.flush())
    .map_err(|err| format!("cannot write result: '{err}'"))
}
