//! Scenario definition for headless sheet runs.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Sequence of steps run against one sheet.
#[derive(Debug, Clone, Deserialize)]
pub struct SheetScenario {
    #[serde(default)]
    pub name: Option<String>,
    /// Starting viewport width; the run config's width when absent
    #[serde(default)]
    pub width: Option<f32>,
    /// Start with `transition: none` on the panel
    #[serde(default)]
    pub transitions: Option<bool>,
    pub steps: Vec<ScenarioStep>,
}

impl SheetScenario {
    /// Load a scenario from JSON text.
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Load a scenario from file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("invalid scenario {}", path.display()))
    }
}

/// One scenario step. Elements are named as in [`crate::headless::elements::by_name`].
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioStep {
    Show {
        #[serde(default)]
        trigger: Option<String>,
    },
    Hide {
        #[serde(default)]
        trigger: Option<String>,
    },
    TouchStart { target: String, y: f32 },
    TouchMove { y: f32 },
    TouchEnd,
    TouchCancel,
    ScrollContent { top: f32 },
    Resize { width: f32 },
    SetAttribute {
        name: String,
        #[serde(default)]
        value: Option<String>,
    },
    Click {
        target: String,
        #[serde(default)]
        x: f32,
        #[serde(default)]
        y: f32,
    },
    Escape,
    /// Cancel the next `before-show` / `before-hide`
    PreventNext { event: String },
    Wait { ms: u64 },
    Tick { frames: u32 },
    AssertState { state: String },
    AssertOffset {
        value: f32,
        #[serde(default = "default_tolerance")]
        tolerance: f32,
    },
    /// Exact sequence of notifications emitted so far
    AssertNotifications { events: Vec<String> },
}

fn default_tolerance() -> f32 {
    0.5
}

impl ScenarioStep {
    /// Snake-case step name used in reports
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioStep::Show { .. } => "show",
            ScenarioStep::Hide { .. } => "hide",
            ScenarioStep::TouchStart { .. } => "touch_start",
            ScenarioStep::TouchMove { .. } => "touch_move",
            ScenarioStep::TouchEnd => "touch_end",
            ScenarioStep::TouchCancel => "touch_cancel",
            ScenarioStep::ScrollContent { .. } => "scroll_content",
            ScenarioStep::Resize { .. } => "resize",
            ScenarioStep::SetAttribute { .. } => "set_attribute",
            ScenarioStep::Click { .. } => "click",
            ScenarioStep::Escape => "escape",
            ScenarioStep::PreventNext { .. } => "prevent_next",
            ScenarioStep::Wait { .. } => "wait",
            ScenarioStep::Tick { .. } => "tick",
            ScenarioStep::AssertState { .. } => "assert_state",
            ScenarioStep::AssertOffset { .. } => "assert_offset",
            ScenarioStep::AssertNotifications { .. } => "assert_notifications",
        }
    }
}
