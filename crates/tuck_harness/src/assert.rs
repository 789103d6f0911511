//! Assertion helpers for scenario steps.

use tuck_sheet::{PanelState, SheetEventKind};

/// Assertion result with structured failure details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssertionResult {
    Passed,
    Failed { code: String, message: String },
}

impl AssertionResult {
    fn failed(code: &str, message: String) -> Self {
        AssertionResult::Failed {
            code: code.to_string(),
            message,
        }
    }
}

pub fn evaluate_assert_state(expected: &str, actual: PanelState) -> AssertionResult {
    let known = [
        PanelState::Hidden,
        PanelState::Showing,
        PanelState::Shown,
        PanelState::Hiding,
    ];
    if !known.iter().any(|state| state.as_str() == expected) {
        return AssertionResult::failed("unknown_state", format!("no such state '{expected}'"));
    }
    if actual.as_str() == expected {
        AssertionResult::Passed
    } else {
        AssertionResult::failed(
            "state_mismatch",
            format!("expected state '{expected}', got '{actual}'"),
        )
    }
}

pub fn evaluate_assert_offset(expected: f32, tolerance: f32, actual: f32) -> AssertionResult {
    if (expected - actual).abs() <= tolerance {
        AssertionResult::Passed
    } else {
        AssertionResult::failed(
            "offset_mismatch",
            format!("expected panel offset {expected}±{tolerance}, got {actual}"),
        )
    }
}

pub fn evaluate_assert_notifications(
    expected: &[String],
    actual: &[SheetEventKind],
) -> AssertionResult {
    if let Some(unknown) = expected
        .iter()
        .find(|name| SheetEventKind::parse(name).is_none())
    {
        return AssertionResult::failed(
            "unknown_notification",
            format!("no such notification '{unknown}'"),
        );
    }
    let matches = expected.len() == actual.len()
        && expected
            .iter()
            .zip(actual)
            .all(|(name, kind)| name == kind.as_str());
    if matches {
        AssertionResult::Passed
    } else {
        let actual: Vec<&str> = actual.iter().map(SheetEventKind::as_str).collect();
        AssertionResult::failed(
            "notification_mismatch",
            format!("expected notifications {expected:?}, got {actual:?}"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_assertion() {
        assert_eq!(
            evaluate_assert_state("shown", PanelState::Shown),
            AssertionResult::Passed
        );
        assert!(matches!(
            evaluate_assert_state("open", PanelState::Shown),
            AssertionResult::Failed { code, .. } if code == "unknown_state"
        ));
        assert!(matches!(
            evaluate_assert_state("hidden", PanelState::Hiding),
            AssertionResult::Failed { code, .. } if code == "state_mismatch"
        ));
    }

    #[test]
    fn test_offset_tolerance() {
        assert_eq!(evaluate_assert_offset(0.0, 0.5, 0.4), AssertionResult::Passed);
        assert!(matches!(
            evaluate_assert_offset(0.0, 0.5, 60.0),
            AssertionResult::Failed { .. }
        ));
    }

    #[test]
    fn test_notification_sequence() {
        let expected = vec!["before-show".to_string(), "shown".to_string()];
        assert_eq!(
            evaluate_assert_notifications(
                &expected,
                &[SheetEventKind::BeforeShow, SheetEventKind::Shown]
            ),
            AssertionResult::Passed
        );
        assert!(matches!(
            evaluate_assert_notifications(&expected, &[SheetEventKind::BeforeShow]),
            AssertionResult::Failed { code, .. } if code == "notification_mismatch"
        ));
    }
}
