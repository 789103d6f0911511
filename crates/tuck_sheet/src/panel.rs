//! Panel lifecycle state machine
//!
//! ```text
//!            Open              FramesCommitted
//!   Hidden ───────▶ Showing ───────────────────▶ Shown
//!     ▲                                            │
//!     │ Settled                           Close    │
//!     └──────────────── Hiding ◀───────────────────┘
//! ```
//!
//! [`PanelMachine`] owns the state and the bookkeeping for the asynchronous
//! half of each transition: the frames to wait before committing an open,
//! and the transition-end (or fallback timer) that settles it. It does not
//! touch the host; [`crate::BottomSheet`] performs the side effects.

use std::fmt;

use tuck_animation::{FrameId, TimerId};
use tuck_core::fsm::{StateMachine, StateTransitions, TransitionRecord};
use tuck_core::ElementId;

use crate::host::PanelTransform;

/// Frames to let pass between entering `Showing` and applying the open
/// transform, so the off-screen position is rendered before it animates.
pub const COMMIT_FRAMES: u8 = 2;

/// Lifecycle phase of the panel
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PanelState {
    #[default]
    Hidden,
    Showing,
    Shown,
    Hiding,
}

impl PanelState {
    /// Marker value written for the stylesheet
    pub fn as_str(&self) -> &'static str {
        match self {
            PanelState::Hidden => "hidden",
            PanelState::Showing => "showing",
            PanelState::Shown => "shown",
            PanelState::Hiding => "hiding",
        }
    }

    /// Showing or Shown
    pub fn is_open(&self) -> bool {
        matches!(self, PanelState::Showing | PanelState::Shown)
    }

    /// Transform matching this state when nothing is dragging the panel
    pub fn resting_transform(&self) -> PanelTransform {
        match self {
            PanelState::Shown => PanelTransform::Identity,
            PanelState::Hidden | PanelState::Hiding => PanelTransform::OffScreen,
            PanelState::Showing => PanelTransform::Cleared,
        }
    }
}

impl fmt::Display for PanelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Events driving [`PanelState`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Open,
    FramesCommitted,
    Close,
    Settled,
}

impl StateTransitions for PanelState {
    type Event = Lifecycle;

    fn on_event(&self, event: Lifecycle) -> Option<Self> {
        match (self, event) {
            (PanelState::Hidden, Lifecycle::Open) => Some(PanelState::Showing),
            (PanelState::Showing, Lifecycle::FramesCommitted) => Some(PanelState::Shown),
            (PanelState::Shown, Lifecycle::Close) => Some(PanelState::Hiding),
            (PanelState::Hiding, Lifecycle::Settled) => Some(PanelState::Hidden),
            _ => None,
        }
    }
}

/// Result of an accepted show/hide request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Request {
    /// Transition started
    Started,
    /// Already there (or on the way); nothing happened
    Unchanged,
    /// A listener prevented the before-show/before-hide notification
    Cancelled,
}

impl Request {
    /// Started or Unchanged
    pub fn is_accepted(&self) -> bool {
        matches!(self, Request::Started | Request::Unchanged)
    }
}

/// Whether a request may start given the current state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Admission {
    Proceed,
    Unchanged,
    Busy,
}

/// Which half of the lifecycle is waiting to settle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettleKind {
    Show,
    Hide,
}

/// Result of a frame callback
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameStep {
    /// Not the frame we are waiting for
    Stale,
    /// Request another frame and call [`PanelMachine::rearm_frame`]
    Again,
    /// Enough frames rendered; commit the open
    Commit,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum Pending {
    #[default]
    Idle,
    Frames {
        frame: FrameId,
        remaining: u8,
    },
    Settle {
        kind: SettleKind,
        timer: TimerId,
    },
}

/// Lifecycle state plus the in-flight transition bookkeeping
#[derive(Debug)]
pub struct PanelMachine {
    fsm: StateMachine<PanelState>,
    pending: Pending,
    /// Trigger of the request currently in flight
    trigger: Option<ElementId>,
    /// Element to focus once the panel is hidden again
    return_focus: Option<ElementId>,
}

impl PanelMachine {
    pub fn new() -> Self {
        Self {
            fsm: StateMachine::new(PanelState::Hidden),
            pending: Pending::Idle,
            trigger: None,
            return_focus: None,
        }
    }

    pub fn state(&self) -> PanelState {
        self.fsm.current_state()
    }

    pub fn history(&self) -> impl Iterator<Item = &TransitionRecord<PanelState>> {
        self.fsm.history()
    }

    pub fn trigger(&self) -> Option<ElementId> {
        self.trigger
    }

    pub fn admit_show(&self) -> Admission {
        match self.state() {
            PanelState::Hidden => Admission::Proceed,
            PanelState::Showing | PanelState::Shown => Admission::Unchanged,
            PanelState::Hiding => Admission::Busy,
        }
    }

    pub fn admit_hide(&self) -> Admission {
        match self.state() {
            PanelState::Shown => Admission::Proceed,
            PanelState::Hiding | PanelState::Hidden => Admission::Unchanged,
            PanelState::Showing => Admission::Busy,
        }
    }

    /// Hidden → Showing, then wait [`COMMIT_FRAMES`] frames starting with `frame`
    pub fn open(&mut self, trigger: Option<ElementId>, frame: FrameId) -> bool {
        if self.fsm.send(Lifecycle::Open).is_none() {
            return false;
        }
        self.trigger = trigger;
        self.return_focus = trigger;
        self.pending = Pending::Frames {
            frame,
            remaining: COMMIT_FRAMES,
        };
        true
    }

    pub fn frame_elapsed(&mut self, id: FrameId) -> FrameStep {
        let Pending::Frames { frame, remaining } = self.pending else {
            return FrameStep::Stale;
        };
        if frame != id {
            return FrameStep::Stale;
        }
        if remaining > 1 {
            FrameStep::Again
        } else {
            self.pending = Pending::Idle;
            FrameStep::Commit
        }
    }

    /// Continue waiting on a freshly requested frame
    pub fn rearm_frame(&mut self, id: FrameId) {
        if let Pending::Frames { remaining, .. } = self.pending {
            self.pending = Pending::Frames {
                frame: id,
                remaining: remaining.saturating_sub(1),
            };
        }
    }

    /// Showing → Shown; settles on transition-end or `fallback`
    pub fn commit(&mut self, fallback: TimerId) -> bool {
        if self.fsm.send(Lifecycle::FramesCommitted).is_none() {
            return false;
        }
        self.pending = Pending::Settle {
            kind: SettleKind::Show,
            timer: fallback,
        };
        true
    }

    /// Shown → Hiding; settles on transition-end or `fallback`
    pub fn close(&mut self, trigger: Option<ElementId>, fallback: TimerId) -> bool {
        if self.fsm.send(Lifecycle::Close).is_none() {
            return false;
        }
        self.trigger = trigger;
        self.pending = Pending::Settle {
            kind: SettleKind::Hide,
            timer: fallback,
        };
        true
    }

    /// Kind and fallback timer of the settle being waited on
    pub fn settling(&self) -> Option<(SettleKind, TimerId)> {
        match self.pending {
            Pending::Settle { kind, timer } => Some((kind, timer)),
            _ => None,
        }
    }

    /// Finish the pending settle. A hide also moves Hiding → Hidden.
    pub fn settle(&mut self) -> Option<SettleKind> {
        let (kind, _) = self.settling()?;
        self.pending = Pending::Idle;
        if kind == SettleKind::Hide {
            self.fsm.send(Lifecycle::Settled);
        }
        Some(kind)
    }

    pub fn take_return_focus(&mut self) -> Option<ElementId> {
        self.return_focus.take()
    }

    /// Back to Hidden with nothing pending; returns the abandoned fallback timer
    pub fn reset(&mut self) -> Option<TimerId> {
        let timer = self.settling().map(|(_, timer)| timer);
        self.fsm.reset();
        self.pending = Pending::Idle;
        self.trigger = None;
        self.return_focus = None;
        timer
    }
}

impl Default for PanelMachine {
    fn default() -> Self {
        Self::new()
    }
}
