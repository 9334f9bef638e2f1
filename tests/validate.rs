//! Integration tests for the `validate` command.
use fleetplan::cli::handle_validate_command;
use fleetplan::log::is_logger_initialised;
use fleetplan::settings::Settings;
use std::path::PathBuf;

/// Get the path to the example scenario.
fn get_scenario_dir() -> PathBuf {
    PathBuf::from("scenarios/simple")
}

/// An integration test for the `validate` command.
///
/// We also check that the logger is initialised after it is run.
#[test]
fn test_handle_validate_command() {
    unsafe { std::env::set_var("FLEETPLAN_LOG_LEVEL", "off") };

    assert!(!is_logger_initialised());

    handle_validate_command(&get_scenario_dir(), Some(Settings::default())).unwrap();

    assert!(is_logger_initialised());
}
