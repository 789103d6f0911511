//! Tuck Headless Harness
//!
//! Runs a bottom sheet without a UI toolkit: a simulated document, a virtual
//! clock and a JSON scenario runner. Used by the integration tests and by the
//! `tuck` CLI.
//!
//! # Example
//!
//! ```ignore
//! use tuck_harness::{elements, HeadlessConfig, HeadlessSheet};
//! use tuck_sheet::{PanelState, SheetConfig};
//!
//! let mut harness = HeadlessSheet::new(HeadlessConfig::default(), SheetConfig::default());
//! harness.open()?;
//! harness.drag(elements::HEADER, 500.0, 650.0);
//! harness.wait(std::time::Duration::from_millis(800));
//! assert_eq!(harness.state(), PanelState::Hidden);
//! ```

pub mod assert;
pub mod headless;
pub mod report;
pub mod runner;
pub mod runtime;
pub mod scenario;

pub use headless::{elements, HeadlessConfig, HeadlessDialog, HeadlessHost};
pub use report::{ReportStatus, ScenarioReport};
pub use runner::{run_loaded_scenario, run_scenario, run_scenario_with_config, RunConfig, RunOutcome};
pub use runtime::HeadlessSheet;
pub use scenario::{ScenarioStep, SheetScenario};

/// Install a `tracing` subscriber for tests; safe to call more than once.
///
/// Honors `RUST_LOG`, defaulting to `debug` for the tuck crates.
pub fn init_test_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("tuck_sheet=debug,tuck_harness=debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
