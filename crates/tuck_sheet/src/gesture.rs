//! Drag gesture tracking
//!
//! Turns a touch-start / touch-move* / touch-end sequence into either a
//! panel drag (with a live offset) or nothing at all, so that ordinary content
//! scrolling is never hijacked.
//!
//! A session becomes active only when the panel is [`PanelState::Shown`] and
//! the touch starts on the header, on the backdrop, or on the content while
//! the content is scrolled exactly to the top. The direction of the first move
//! is locked for the rest of the session.

use crate::config::{ResistanceCurve, SheetConfig};
use crate::panel::PanelState;

/// Where a touch started
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Zone {
    Header,
    Backdrop,
    Content,
}

/// Direction locked on the first move of a session
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    None,
    Up,
    Down,
}

/// One touch interaction from first contact to release
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DragSession {
    pub active: bool,
    pub start_position: f32,
    pub current_position: f32,
    /// current - start
    pub delta: f32,
    pub direction: Direction,
    pub origin_zone: Option<Zone>,
    /// Content scroll offset was exactly zero at touch-start
    pub content_was_at_top: bool,
}

/// What to do with a touch-move
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MoveOutcome {
    /// No drag in progress
    Ignored,
    /// Let the platform scroll natively
    Passthrough,
    /// Suppress the default action, stop propagation and move the panel
    Intercept { offset: f32 },
}

/// Outcome of a completed drag
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Dismiss,
    SnapBack,
}

/// Offset for an upward pull past the open position
///
/// `-sqrt(|delta|) * 10 * factor`: grows sub-linearly so large pulls barely
/// move the panel.
pub fn upward_resistance(delta: f32, factor: f32) -> f32 {
    -(delta.abs().sqrt() * 10.0 * factor)
}

/// Offset for a downward drag
pub fn downward_offset(delta: f32, factor: f32, curve: ResistanceCurve) -> f32 {
    match curve {
        ResistanceCurve::Linear => delta,
        ResistanceCurve::Staged { knee } if delta > knee => {
            knee + (delta - knee).sqrt() * 10.0 * factor
        }
        ResistanceCurve::Staged { .. } => delta,
    }
}

/// Classifies touches and computes the drag offset
#[derive(Clone, Debug)]
pub struct GestureTracker {
    session: DragSession,
    drag_threshold: f32,
    resistance_factor: f32,
    curve: ResistanceCurve,
}

impl GestureTracker {
    pub fn new(config: &SheetConfig) -> Self {
        Self {
            session: DragSession::default(),
            drag_threshold: config.drag_threshold,
            resistance_factor: config.resistance_factor,
            curve: config.resistance_curve,
        }
    }

    pub fn session(&self) -> &DragSession {
        &self.session
    }

    pub fn is_active(&self) -> bool {
        self.session.active
    }

    /// Start a new session, discarding whatever the last one left behind
    ///
    /// Returns whether the session is eligible for dragging.
    pub fn touch_start(
        &mut self,
        zone: Option<Zone>,
        y: f32,
        content_scroll_top: f32,
        state: PanelState,
    ) -> bool {
        let content_was_at_top = content_scroll_top == 0.0;
        let eligible = state == PanelState::Shown
            && match zone {
                Some(Zone::Header) | Some(Zone::Backdrop) => true,
                Some(Zone::Content) => content_was_at_top,
                None => false,
            };

        self.session = DragSession {
            active: eligible,
            start_position: y,
            current_position: y,
            delta: 0.0,
            direction: Direction::None,
            origin_zone: zone,
            content_was_at_top,
        };

        tracing::trace!(
            "touch start at y={} zone={:?} state={:?} eligible={}",
            y,
            zone,
            state,
            eligible
        );
        eligible
    }

    pub fn touch_move(&mut self, y: f32) -> MoveOutcome {
        let session = &mut self.session;
        if !session.active {
            return MoveOutcome::Ignored;
        }

        session.current_position = y;
        session.delta = y - session.start_position;
        if session.direction == Direction::None {
            session.direction = if session.delta >= 0.0 {
                Direction::Down
            } else {
                Direction::Up
            };
        }

        if session.origin_zone == Some(Zone::Content)
            && (session.direction == Direction::Up || !session.content_was_at_top)
        {
            // Scrolling into the content: the direction lock means this
            // session can never become a drag.
            session.active = false;
            return MoveOutcome::Passthrough;
        }

        let offset = if session.delta < 0.0 {
            upward_resistance(session.delta, self.resistance_factor)
        } else {
            downward_offset(session.delta, self.resistance_factor, self.curve)
        };
        tracing::trace!("drag delta={} offset={}", session.delta, offset);
        MoveOutcome::Intercept { offset }
    }

    /// Finish the session (touch-end and touch-cancel alike)
    pub fn touch_end(&mut self) -> Option<Decision> {
        if !self.session.active {
            return None;
        }
        self.session.active = false;

        let delta = self.session.delta;
        let decision = if delta < 0.0 {
            Decision::SnapBack
        } else if delta > self.drag_threshold {
            Decision::Dismiss
        } else {
            Decision::SnapBack
        };

        self.session.delta = 0.0;
        self.session.direction = Direction::None;
        tracing::debug!("drag released at delta={}: {:?}", delta, decision);
        Some(decision)
    }

    /// Drop any session without a decision
    pub fn reset(&mut self) {
        self.session = DragSession::default();
    }
}
