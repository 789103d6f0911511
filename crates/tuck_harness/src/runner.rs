//! Scenario runner that drives a headless sheet step by step.

use std::time::Duration;

use anyhow::{bail, Result};
use tuck_core::ElementId;
use tuck_sheet::{SheetConfig, SheetEventKind};

use crate::assert::{
    evaluate_assert_notifications, evaluate_assert_offset, evaluate_assert_state,
    AssertionResult,
};
use crate::headless::{elements, HeadlessConfig};
use crate::report::ScenarioReport;
use crate::runtime::{HeadlessSheet, DEFAULT_TICK_MS};
use crate::scenario::{ScenarioStep, SheetScenario};

/// Everything a run needs besides the scenario itself.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub headless: HeadlessConfig,
    pub sheet: SheetConfig,
    /// Logical milliseconds between frames.
    pub tick_ms: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            headless: HeadlessConfig::default(),
            sheet: SheetConfig::default(),
            tick_ms: DEFAULT_TICK_MS,
        }
    }
}

/// Final outcome of a scenario run.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Passed { report: ScenarioReport },
    Failed { report: ScenarioReport },
}

impl RunOutcome {
    pub fn report(&self) -> &ScenarioReport {
        match self {
            RunOutcome::Passed { report } => report,
            RunOutcome::Failed { report } => report,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RunOutcome::Failed { .. })
    }
}

/// Execute scenario JSON with default settings.
pub fn run_scenario(input: &str) -> Result<RunOutcome> {
    run_scenario_with_config(input, RunConfig::default())
}

/// Execute scenario JSON with the given settings.
pub fn run_scenario_with_config(input: &str, config: RunConfig) -> Result<RunOutcome> {
    let scenario = SheetScenario::from_json(input)?;
    run_loaded_scenario(&scenario, config)
}

/// Execute a pre-loaded scenario.
pub fn run_loaded_scenario(scenario: &SheetScenario, mut config: RunConfig) -> Result<RunOutcome> {
    if config.tick_ms == 0 {
        bail!("tick_ms must be > 0");
    }
    if let Some(width) = scenario.width {
        config.headless.width = width;
    }
    if scenario.transitions == Some(false) {
        config.headless.transitions_enabled = false;
    }
    if config.headless.width <= 0.0 || config.headless.height <= 0.0 {
        bail!("viewport dimensions must be positive");
    }

    let mut harness = HeadlessSheet::new(config.headless, config.sheet)
        .with_tick(Duration::from_millis(config.tick_ms));
    tracing::debug!(
        "running scenario {} ({} steps)",
        scenario.name.as_deref().unwrap_or("<unnamed>"),
        scenario.steps.len()
    );

    for (step_index, step) in scenario.steps.iter().enumerate() {
        if let Err(message) = run_step(&mut harness, step) {
            tracing::debug!("step {} ({}) failed: {}", step_index, step.name(), message);
            let report = summarize(scenario, &harness).fail(step_index, step.name(), message);
            return Ok(RunOutcome::Failed { report });
        }
    }

    Ok(RunOutcome::Passed {
        report: summarize(scenario, &harness),
    })
}

fn summarize(scenario: &SheetScenario, harness: &HeadlessSheet) -> ScenarioReport {
    ScenarioReport::passed(
        scenario.name.clone(),
        harness.state().to_string(),
        harness
            .notification_kinds()
            .iter()
            .map(|kind| kind.as_str().to_string())
            .collect(),
        harness.elapsed_frames(),
        harness.elapsed().as_millis() as u64,
    )
}

fn element(name: &str) -> Result<ElementId, String> {
    elements::by_name(name).ok_or_else(|| format!("unknown element '{name}'"))
}

fn optional_element(name: Option<&String>) -> Result<Option<ElementId>, String> {
    name.map(|name| element(name)).transpose()
}

fn check(result: AssertionResult) -> Result<(), String> {
    match result {
        AssertionResult::Passed => Ok(()),
        AssertionResult::Failed { message, .. } => Err(message),
    }
}

fn run_step(harness: &mut HeadlessSheet, step: &ScenarioStep) -> Result<(), String> {
    match step {
        ScenarioStep::Show { trigger } => {
            let trigger = optional_element(trigger.as_ref())?;
            match harness.show(trigger) {
                Ok(request) if !request.is_accepted() => {
                    tracing::debug!("show cancelled by a listener")
                }
                Ok(_) => {}
                Err(err) => tracing::debug!("show refused: {}", err),
            }
        }
        ScenarioStep::Hide { trigger } => {
            let trigger = optional_element(trigger.as_ref())?;
            match harness.hide(trigger) {
                Ok(request) if !request.is_accepted() => {
                    tracing::debug!("hide cancelled by a listener")
                }
                Ok(_) => {}
                Err(err) => tracing::debug!("hide refused: {}", err),
            }
        }
        ScenarioStep::TouchStart { target, y } => {
            harness.touch_start(element(target)?, *y);
        }
        ScenarioStep::TouchMove { y } => {
            harness.touch_move(*y);
        }
        ScenarioStep::TouchEnd => {
            harness.touch_end();
        }
        ScenarioStep::TouchCancel => {
            harness.touch_cancel();
        }
        ScenarioStep::ScrollContent { top } => harness.scroll_content(*top),
        ScenarioStep::Resize { width } => {
            harness.resize(*width);
        }
        ScenarioStep::SetAttribute { name, value } => {
            harness.set_attribute(name, value.as_deref());
        }
        ScenarioStep::Click { target, x, y } => {
            harness.click(element(target)?, *x, *y);
        }
        ScenarioStep::Escape => {
            harness.escape();
        }
        ScenarioStep::PreventNext { event } => match SheetEventKind::parse(event) {
            Some(kind) if kind.is_cancelable() => harness.prevent_next(kind),
            _ => return Err(format!("'{event}' is not a cancelable notification")),
        },
        ScenarioStep::Wait { ms } => harness.wait(Duration::from_millis(*ms)),
        ScenarioStep::Tick { frames } => harness.ticks(*frames),
        ScenarioStep::AssertState { state } => {
            check(evaluate_assert_state(state, harness.state()))?;
        }
        ScenarioStep::AssertOffset { value, tolerance } => {
            check(evaluate_assert_offset(*value, *tolerance, harness.offset()))?;
        }
        ScenarioStep::AssertNotifications { events } => {
            check(evaluate_assert_notifications(
                events,
                &harness.notification_kinds(),
            ))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ReportStatus;

    #[test]
    fn test_passing_scenario_reports_final_state() {
        let outcome = run_scenario(
            r#"{ "steps": [
                { "type": "show", "trigger": "trigger" },
                { "type": "wait", "ms": 800 },
                { "type": "assert_state", "state": "shown" }
            ] }"#,
        )
        .unwrap();
        let report = outcome.report();
        assert_eq!(report.status, ReportStatus::Passed);
        assert_eq!(report.state, "shown");
        assert_eq!(report.notifications, vec!["before-show", "shown"]);
    }

    #[test]
    fn test_failing_assertion_names_step() {
        let outcome = run_scenario(
            r#"{ "steps": [
                { "type": "tick", "frames": 2 },
                { "type": "assert_state", "state": "shown" }
            ] }"#,
        )
        .unwrap();
        assert!(outcome.is_failed());
        let report = outcome.report();
        assert_eq!(report.failed_step_index, Some(1));
        assert_eq!(report.step.as_deref(), Some("assert_state"));
        assert_eq!(report.elapsed_frames, 2);
    }

    #[test]
    fn test_unknown_element_fails_step() {
        let outcome = run_scenario(
            r#"{ "steps": [{ "type": "click", "target": "footer" }] }"#,
        )
        .unwrap();
        assert!(outcome.is_failed());
        assert!(outcome.report().message.as_deref().unwrap().contains("footer"));
    }

    #[test]
    fn test_zero_tick_is_rejected() {
        let scenario = SheetScenario::from_json(r#"{ "steps": [] }"#).unwrap();
        let config = RunConfig {
            tick_ms: 0,
            ..RunConfig::default()
        };
        assert!(run_loaded_scenario(&scenario, config).is_err());
    }
}
