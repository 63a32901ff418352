use super::*;

#[test]
fn can_create_generic_error_from_strings() {
    let first = GenericError::from("scripted failure");
    let second = GenericError::from("scripted failure".to_string());

    assert_eq!(first, second);
    assert_eq!(first.to_string(), "scripted failure");
}

#[test]
fn can_format_out_of_range_error() {
    let error = EvaluationError::OutOfRange { generation: 3, window_size: 3, catalog_size: 10 };

    assert_eq!(
        error.to_string(),
        "generation 3 with 3 scenario(s) per generation requires 12 scenarios, but catalog has only 10"
    );
}

#[test]
fn can_convert_io_error_into_evaluation_error() {
    let error: EvaluationError = std::io::Error::new(std::io::ErrorKind::NotFound, "no file").into();

    assert_eq!(error, EvaluationError::Io("no file".to_string()));
}
