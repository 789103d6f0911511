//! Sheet error types

use thiserror::Error;

use crate::panel::PanelState;

/// Why a show/hide request was refused
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PanelError {
    /// The opposite transition is still in flight
    #[error("panel is {state}; the running transition must settle first")]
    Busy { state: PanelState },

    /// Viewport is wider than `max-display-width`
    #[error("viewport width {width}px exceeds max-display-width {max}px")]
    TooWide { width: f32, max: f32 },

    /// Required structure is missing or the sheet was detached
    #[error("sheet is inert: {0}")]
    Inert(&'static str),
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}
