use super::*;
use std::fs;

const BASIC_CONFIG_PATH: &str = "tests/data/config.basic.json";

fn run_window_into_file(generation: &str) -> Result<String, String> {
    let tmpfile = tempfile::NamedTempFile::new().unwrap();
    let out_path = tmpfile.path().to_str().unwrap();
    let args = vec!["window", BASIC_CONFIG_PATH, "--generation", generation, "--out-result", out_path];
    let matches = get_window_app().try_get_matches_from(args).unwrap();

    run_window(&matches, create_write_buffer).map(|_| fs::read_to_string(tmpfile.path()).unwrap())
}

#[test]
fn can_print_generation_window() {
    let content = run_window_into_file("1").unwrap();

    assert_eq!(content, "3,0.50-20-1.00-3,250,28800000\n4,0.50-20-1.00-4,250,28800000\n");
}

#[test]
fn can_fail_on_generation_out_of_range() {
    let err = run_window_into_file("7").unwrap_err();

    assert!(err.contains("cannot get window of generation 7"));
}

#[test]
fn can_fail_on_invalid_generation_value() {
    let matches = get_window_app().try_get_matches_from(vec!["window", BASIC_CONFIG_PATH, "-g", "abc"]).unwrap();

    let err = run_window(&matches, create_write_buffer).unwrap_err();

    assert!(err.contains("cannot get integer value"));
}

#[test]
fn can_require_config_and_generation() {
    get_window_app().try_get_matches_from(vec!["window"]).unwrap_err();
    get_window_app().try_get_matches_from(vec!["window", BASIC_CONFIG_PATH]).unwrap_err();
}
