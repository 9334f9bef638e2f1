//! Integration tests for the `plan` command.
use fleetplan::cli::{PlanOpts, handle_plan_command};
use fleetplan::settings::Settings;
use std::path::PathBuf;
use tempfile::tempdir;

/// Get the path to the example scenario.
fn get_scenario_dir() -> PathBuf {
    PathBuf::from("scenarios/simple")
}

/// An integration test for the `plan` command: plan the example scenario end
/// to end and check that all output files are written.
#[test]
fn test_handle_plan_command() {
    unsafe { std::env::set_var("FLEETPLAN_LOG_LEVEL", "off") };

    let dir = tempdir().unwrap();
    let output_dir = dir.path().join("results");
    let opts = PlanOpts {
        output_dir: Some(output_dir.clone()),
        overwrite: false,
    };
    handle_plan_command(&get_scenario_dir(), &opts, Some(Settings::default())).unwrap();

    for file_name in [
        "deployment_schedule.csv",
        "decommissioning.csv",
        "capacity.csv",
    ] {
        assert!(
            output_dir.join(file_name).is_file(),
            "missing output file {file_name}"
        );
    }

    // The legacy fleet retires in steps, so the schedule cannot be empty
    let schedule = std::fs::read_to_string(output_dir.join("deployment_schedule.csv")).unwrap();
    assert!(schedule.lines().count() > 1);

    // A second run without --overwrite must refuse to clobber the results
    assert!(handle_plan_command(&get_scenario_dir(), &opts, Some(Settings::default())).is_err());
}
