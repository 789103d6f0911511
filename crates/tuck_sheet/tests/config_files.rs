//! Loading sheet configuration from disk

use std::path::PathBuf;
use std::time::Duration;

use tuck_sheet::{ConfigError, DisplayWidth, ResistanceCurve, SheetConfig};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn loads_fixture_with_defaults_for_missing_keys() {
    let config = SheetConfig::from_path(&fixture("sheet.toml")).unwrap();

    assert_eq!(config.max_display_width, DisplayWidth::Max(600.0));
    assert_eq!(config.drag_threshold, 120.0);
    assert_eq!(config.resistance_curve, ResistanceCurve::Staged { knee: 100.0 });
    assert_eq!(config.transition_fallback(), Duration::from_millis(500));
    assert_eq!(config.resize_throttle(), Duration::from_millis(100));
    assert_eq!(config.hide_marker, "data-sheet-hide");
}

#[test]
fn missing_file_is_an_io_error() {
    let err = SheetConfig::from_path(&fixture("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}
