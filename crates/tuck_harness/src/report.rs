//! Report output model for scenario runs.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Component, Path};

/// Report status for a scenario run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Passed,
    Failed,
}

/// Machine-readable result of a scenario run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub scenario: Option<String>,
    pub status: ReportStatus,
    pub failed_step_index: Option<usize>,
    /// Name of the failing step
    pub step: Option<String>,
    pub message: Option<String>,
    /// Final lifecycle state
    pub state: String,
    pub notifications: Vec<String>,
    pub elapsed_frames: u64,
    pub elapsed_ms: u64,
}

impl ScenarioReport {
    pub fn passed(
        scenario: Option<String>,
        state: String,
        notifications: Vec<String>,
        elapsed_frames: u64,
        elapsed_ms: u64,
    ) -> Self {
        Self {
            scenario,
            status: ReportStatus::Passed,
            failed_step_index: None,
            step: None,
            message: None,
            state,
            notifications,
            elapsed_frames,
            elapsed_ms,
        }
    }

    /// Turn a passing report into a failure at `step_index`
    pub fn fail(mut self, step_index: usize, step: &str, message: String) -> Self {
        self.status = ReportStatus::Failed;
        self.failed_step_index = Some(step_index);
        self.step = Some(step.to_string());
        self.message = Some(message);
        self
    }

    pub fn is_passed(&self) -> bool {
        self.status == ReportStatus::Passed
    }

    pub fn write_to_path(&self, path: &Path) -> Result<()> {
        if path.is_absolute() || path.has_root() {
            bail!("report path must be relative and must not start with a separator");
        }
        if path
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
        {
            bail!("report path cannot contain '..' or drive prefixes");
        }
        let payload = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, payload)?;
        Ok(())
    }

    pub fn write_to_writer<W: Write>(&self, writer: &mut W) -> Result<()> {
        let payload = serde_json::to_string_pretty(self)?;
        writer.write_all(payload.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> ScenarioReport {
        ScenarioReport::passed(None, "shown".to_string(), vec!["shown".to_string()], 3, 48)
    }

    #[test]
    fn test_rejects_escaping_paths() {
        assert!(report().write_to_path(Path::new("/tmp/report.json")).is_err());
        assert!(report().write_to_path(Path::new("../report.json")).is_err());
    }

    #[test]
    fn test_failed_report_serializes_status() {
        let failed = report().fail(4, "assert_state", "expected hidden".to_string());
        let mut out = Vec::new();
        failed.write_to_writer(&mut out).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["failed_step_index"], 4);
        assert_eq!(json["step"], "assert_state");
    }
}
