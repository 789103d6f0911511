//! CSS timing functions
//!
//! Mirrors `transition-timing-function`: the named keywords are the CSS
//! cubic-bezier presets, so everything except `linear` is solved through the
//! same bezier path the browser uses.

use std::str::FromStr;

use thiserror::Error;

/// Error returned when a timing function string cannot be parsed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimingParseError {
    #[error("unknown timing function: {0}")]
    Unknown(String),

    #[error("cubic-bezier() expects 4 numbers, got: {0}")]
    BadArguments(String),

    #[error("cubic-bezier() x coordinates must lie in [0, 1]")]
    OutOfRange,
}

/// Timing function for a property transition
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum TimingFunction {
    Linear,
    /// CSS default: `cubic-bezier(0.25, 0.1, 0.25, 1)`
    #[default]
    Ease,
    EaseIn,
    EaseOut,
    EaseInOut,
    CubicBezier(f32, f32, f32, f32),
}

impl TimingFunction {
    /// Control points of the equivalent cubic bezier (None for linear)
    pub fn control_points(&self) -> Option<(f32, f32, f32, f32)> {
        match *self {
            TimingFunction::Linear => None,
            TimingFunction::Ease => Some((0.25, 0.1, 0.25, 1.0)),
            TimingFunction::EaseIn => Some((0.42, 0.0, 1.0, 1.0)),
            TimingFunction::EaseOut => Some((0.0, 0.0, 0.58, 1.0)),
            TimingFunction::EaseInOut => Some((0.42, 0.0, 0.58, 1.0)),
            TimingFunction::CubicBezier(x1, y1, x2, y2) => Some((x1, y1, x2, y2)),
        }
    }

    /// Map linear progress `t` (clamped to 0..=1) to eased progress
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self.control_points() {
            None => t,
            Some((x1, y1, x2, y2)) => solve_bezier(t, x1, y1, x2, y2),
        }
    }
}

impl FromStr for TimingFunction {
    type Err = TimingParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "linear" => return Ok(TimingFunction::Linear),
            "ease" => return Ok(TimingFunction::Ease),
            "ease-in" => return Ok(TimingFunction::EaseIn),
            "ease-out" => return Ok(TimingFunction::EaseOut),
            "ease-in-out" => return Ok(TimingFunction::EaseInOut),
            _ => {}
        }

        let Some(args) = s
            .strip_prefix("cubic-bezier(")
            .and_then(|rest| rest.strip_suffix(')'))
        else {
            return Err(TimingParseError::Unknown(s.to_string()));
        };

        let values: Vec<f32> = args
            .split(',')
            .map(|part| part.trim().parse::<f32>())
            .collect::<Result<_, _>>()
            .map_err(|_| TimingParseError::BadArguments(args.to_string()))?;
        let [x1, y1, x2, y2] = values[..] else {
            return Err(TimingParseError::BadArguments(args.to_string()));
        };
        if !(0.0..=1.0).contains(&x1) || !(0.0..=1.0).contains(&x2) {
            return Err(TimingParseError::OutOfRange);
        }
        Ok(TimingFunction::CubicBezier(x1, y1, x2, y2))
    }
}

/// Solve the bezier for the parameter whose x equals `t`, then return its y.
///
/// Newton-Raphson first, bisection when the slope flattens out. f64 inside.
fn solve_bezier(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    let target = t as f64;
    let (x1, y1, x2, y2) = (x1 as f64, y1 as f64, x2 as f64, y2 as f64);

    let mut p = target;
    for _ in 0..8 {
        let err = sample(p, x1, x2) - target;
        if err.abs() < 1e-7 {
            return sample(p, y1, y2) as f32;
        }
        let d = slope(p, x1, x2);
        if d.abs() < 1e-7 {
            break;
        }
        p -= err / d;
    }

    let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
    p = target;
    for _ in 0..24 {
        let x = sample(p, x1, x2);
        if (x - target).abs() < 1e-7 {
            break;
        }
        if x < target {
            lo = p;
        } else {
            hi = p;
        }
        p = (lo + hi) * 0.5;
    }

    sample(p, y1, y2) as f32
}

/// B(p) for one axis with endpoints 0 and 1
#[inline]
fn sample(p: f64, c1: f64, c2: f64) -> f64 {
    let a = 1.0 - 3.0 * c2 + 3.0 * c1;
    let b = 3.0 * c2 - 6.0 * c1;
    let c = 3.0 * c1;
    ((a * p + b) * p + c) * p
}

/// B'(p) for one axis
#[inline]
fn slope(p: f64, c1: f64, c2: f64) -> f64 {
    let a = 1.0 - 3.0 * c2 + 3.0 * c1;
    let b = 3.0 * c2 - 6.0 * c1;
    let c = 3.0 * c1;
    (3.0 * a * p + 2.0 * b) * p + c
}
