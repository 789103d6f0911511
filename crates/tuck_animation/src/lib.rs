//! Tuck Animation Support
//!
//! The sheet itself never interpolates: the platform's transition engine
//! animates the panel. This crate models that engine for hosts that have to
//! provide one themselves (the headless harness):
//!
//! - **Timing Functions**: CSS `transition-timing-function` keywords and `cubic-bezier()`
//! - **Tweens**: a single property animating from one value to another
//! - **Scheduler**: a virtual clock delivering frame callbacks and one-shot timers

pub mod scheduler;
pub mod timing;
pub mod tween;

pub use scheduler::{FrameId, FrameScheduler, Tick, TimerId};
pub use timing::{TimingFunction, TimingParseError};
pub use tween::Tween;
