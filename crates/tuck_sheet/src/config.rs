//! Sheet configuration
//!
//! Values come from three places: [`SheetConfig::default`], a TOML file
//! (`sheet.toml`), and the `max-display-width` attribute at runtime.
//!
//! ```toml
//! max_display_width = 600
//! drag_threshold = 120.0
//! resistance_curve = { staged = { knee = 100.0 } }
//! transition_fallback_ms = 700
//! ```

use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ConfigError;

/// Name of the attribute carrying the display width threshold
pub const MAX_DISPLAY_WIDTH_ATTR: &str = "max-display-width";

/// Viewport width above which the sheet refuses to show
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DisplayWidth {
    /// No limit (attribute absent, `"none"` or unparsable)
    #[default]
    Unlimited,
    /// Maximum viewport width in pixels
    Max(f32),
}

impl DisplayWidth {
    /// Parse the `max-display-width` attribute value
    ///
    /// Reads the leading integer like `parseInt` does (`"600px"` and `"+600"`
    /// are 600). Anything else, negatives included, falls back to unlimited.
    pub fn parse_attr(value: Option<&str>) -> Self {
        let Some(raw) = value.map(str::trim) else {
            return DisplayWidth::Unlimited;
        };
        if raw.eq_ignore_ascii_case("none") {
            return DisplayWidth::Unlimited;
        }

        let raw = raw.strip_prefix('+').unwrap_or(raw);
        let end = raw
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(raw.len());
        match raw[..end].parse::<u32>() {
            Ok(px) => DisplayWidth::Max(px as f32),
            Err(_) => DisplayWidth::Unlimited,
        }
    }

    /// Whether a viewport of `width` pixels is too wide for the sheet
    pub fn is_exceeded_by(&self, width: f32) -> bool {
        match self {
            DisplayWidth::Unlimited => false,
            DisplayWidth::Max(max) => width > *max,
        }
    }

    pub fn max(&self) -> Option<f32> {
        match self {
            DisplayWidth::Unlimited => None,
            DisplayWidth::Max(max) => Some(*max),
        }
    }
}

impl fmt::Display for DisplayWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayWidth::Unlimited => f.write_str("none"),
            DisplayWidth::Max(px) => write!(f, "{px}"),
        }
    }
}

/// Anything a config file might put in the width slot
#[derive(Deserialize)]
#[serde(untagged)]
enum RawWidth {
    Int(i64),
    Float(f64),
    Text(String),
    Other(IgnoredAny),
}

impl<'de> Deserialize<'de> for DisplayWidth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let width = match RawWidth::deserialize(deserializer)? {
            RawWidth::Int(px) if px >= 0 => DisplayWidth::Max(px as f32),
            RawWidth::Float(px) if px.is_finite() && px >= 0.0 => {
                DisplayWidth::Max(px.trunc() as f32)
            }
            RawWidth::Text(text) => DisplayWidth::parse_attr(Some(&text)),
            _ => DisplayWidth::Unlimited,
        };
        Ok(width)
    }
}

impl Serialize for DisplayWidth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DisplayWidth::Unlimited => serializer.serialize_str("none"),
            DisplayWidth::Max(px) => serializer.serialize_u32(*px as u32),
        }
    }
}

/// Mapping from downward drag distance to panel offset
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResistanceCurve {
    /// Panel follows the finger 1:1
    #[default]
    Linear,
    /// 1:1 up to `knee` pixels, square-root resistance beyond it
    Staged { knee: f32 },
}

/// Complete sheet configuration
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SheetConfig {
    /// Viewport width above which the sheet will not show
    pub max_display_width: DisplayWidth,
    /// Downward drag distance (px) past which release dismisses
    pub drag_threshold: f32,
    /// Scale of the rubber-band effect
    pub resistance_factor: f32,
    pub resistance_curve: ResistanceCurve,
    /// Completes show/hide if no transition-end arrives
    pub transition_fallback_ms: u64,
    /// Minimum interval between resize evaluations
    pub resize_throttle_ms: u64,
    /// Property whose transition-end settles a show/hide
    pub animated_property: String,
    /// Attribute marking descendants that close the sheet on click
    pub hide_marker: String,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            max_display_width: DisplayWidth::Unlimited,
            drag_threshold: 100.0,
            resistance_factor: 0.1,
            resistance_curve: ResistanceCurve::Linear,
            transition_fallback_ms: 700,
            resize_throttle_ms: 100,
            animated_property: "transform".to_string(),
            hide_marker: "data-sheet-hide".to_string(),
        }
    }
}

impl SheetConfig {
    /// Parse a TOML document
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    /// Load a TOML file
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Render as TOML
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn with_max_display_width(mut self, width: DisplayWidth) -> Self {
        self.max_display_width = width;
        self
    }

    pub fn with_drag_threshold(mut self, threshold: f32) -> Self {
        self.drag_threshold = threshold;
        self
    }

    pub fn with_resistance_curve(mut self, curve: ResistanceCurve) -> Self {
        self.resistance_curve = curve;
        self
    }

    pub fn with_transition_fallback(mut self, fallback: Duration) -> Self {
        self.transition_fallback_ms = fallback.as_millis() as u64;
        self
    }

    pub fn transition_fallback(&self) -> Duration {
        Duration::from_millis(self.transition_fallback_ms)
    }

    pub fn resize_throttle(&self) -> Duration {
        Duration::from_millis(self.resize_throttle_ms)
    }
}
