//! Integration tests for the `validate` command.
use agrinext::cli::handle_validate_command;
use agrinext::log::is_logger_initialised;
use agrinext::settings::Settings;
use std::path::PathBuf;

/// Get the path to the example data.
fn get_data_dir() -> PathBuf {
    PathBuf::from("demos/india")
}

/// An integration test for the `validate` command.
///
/// We also check that the logger is initialised after it is run.
#[test]
fn test_handle_validate_command() {
    unsafe { std::env::set_var("AGRINEXT_LOG_LEVEL", "off") };

    assert!(!is_logger_initialised());

    handle_validate_command(&get_data_dir(), Some(Settings::default())).unwrap();

    assert!(is_logger_initialised());

    // Second time will fail because the logging is already initialised
    assert_eq!(
        handle_validate_command(&get_data_dir(), Some(Settings::default()))
            .unwrap_err()
            .to_string(),
        "Failed to initialise logging."
    );
}
