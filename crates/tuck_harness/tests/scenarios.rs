//! JSON scenarios run through the scenario runner

use tuck_harness::{init_test_logging, run_scenario, ReportStatus, RunOutcome};

fn assert_passes(name: &str, input: &str) {
    init_test_logging();
    let outcome = run_scenario(input).unwrap();
    if let RunOutcome::Failed { report } = &outcome {
        panic!(
            "{name} failed at step {:?} ({:?}): {:?}",
            report.failed_step_index, report.step, report.message
        );
    }
    assert_eq!(outcome.report().status, ReportStatus::Passed);
}

#[test]
fn drag_dismiss_scenario() {
    assert_passes("drag_dismiss", include_str!("scenarios/drag_dismiss.json"));
}

#[test]
fn snap_back_scenario() {
    assert_passes("snap_back", include_str!("scenarios/snap_back.json"));
}

#[test]
fn resize_hide_scenario() {
    assert_passes("resize_hide", include_str!("scenarios/resize_hide.json"));
}

#[test]
fn no_transitions_scenario() {
    assert_passes("no_transitions", include_str!("scenarios/no_transitions.json"));
}

#[test]
fn report_captures_failure_context() {
    let outcome = run_scenario(
        r#"{
            "name": "expects-too-much",
            "steps": [
                { "type": "show" },
                { "type": "tick", "frames": 1 },
                { "type": "assert_notifications", "events": ["before-show", "shown"] }
            ]
        }"#,
    )
    .unwrap();

    let report = outcome.report();
    assert!(outcome.is_failed());
    assert_eq!(report.scenario.as_deref(), Some("expects-too-much"));
    assert_eq!(report.failed_step_index, Some(2));
    assert_eq!(report.state, "showing");
    assert_eq!(report.notifications, vec!["before-show"]);
}

#[test]
fn non_cancelable_prevent_fails_step() {
    let outcome = run_scenario(r#"{ "steps": [{ "type": "prevent_next", "event": "shown" }] }"#)
        .unwrap();
    assert!(outcome.is_failed());
    assert_eq!(outcome.report().step.as_deref(), Some("prevent_next"));
}
