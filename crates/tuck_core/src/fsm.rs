//! State Machine Runtime
//!
//! Table-driven state machines for component lifecycle states.
//! Supports:
//! - Typed states and events (the table lives in [`StateTransitions::on_event`])
//! - Rejection of events with no matching transition
//! - Bounded transition history
//! - Out-of-table resets (detach, teardown)

use std::collections::VecDeque;
use std::fmt::Debug;
use std::hash::Hash;

/// Default number of transitions retained in history
pub const DEFAULT_HISTORY_LIMIT: usize = 32;

/// Trait for state types that define their own transition table
///
/// Return `Some(next)` for every legal `(state, event)` pair and `None`
/// otherwise. The machine never moves on `None`.
pub trait StateTransitions: Clone + Copy + PartialEq + Eq + Hash + Debug + 'static {
    /// Event type driving the transitions
    type Event: Clone + Copy + PartialEq + Debug;

    /// Handle an event and return the new state, or None if no transition
    fn on_event(&self, event: Self::Event) -> Option<Self>;
}

/// A recorded transition
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionRecord<S: StateTransitions> {
    pub from: S,
    pub event: S::Event,
    pub to: S,
}

/// A state machine instance
#[derive(Debug)]
pub struct StateMachine<S: StateTransitions> {
    initial_state: S,
    current_state: S,
    /// History of state transitions (for debugging)
    history: VecDeque<TransitionRecord<S>>,
    history_limit: usize,
}

impl<S: StateTransitions> StateMachine<S> {
    /// Create a new state machine in its initial state
    pub fn new(initial_state: S) -> Self {
        Self {
            initial_state,
            current_state: initial_state,
            history: VecDeque::new(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    /// Set how many transitions are retained (0 disables history)
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self.history.truncate(limit);
        self
    }

    /// Get the current state
    pub fn current_state(&self) -> S {
        self.current_state
    }

    /// Check if we're in a specific state
    pub fn is_in(&self, state: S) -> bool {
        self.current_state == state
    }

    /// Get transition history, oldest first
    pub fn history(&self) -> impl Iterator<Item = &TransitionRecord<S>> {
        self.history.iter()
    }

    /// Clear transition history
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Check if an event can trigger a transition from current state
    pub fn can_send(&self, event: S::Event) -> bool {
        self.current_state.on_event(event).is_some()
    }

    /// Send an event to the state machine
    ///
    /// Returns the new state, or `None` if the event is not legal in the
    /// current state (the state is left untouched).
    pub fn send(&mut self, event: S::Event) -> Option<S> {
        let from = self.current_state;
        let Some(to) = from.on_event(event) else {
            tracing::trace!("fsm: {:?} ignores {:?}", from, event);
            return None;
        };

        self.current_state = to;
        self.record(TransitionRecord { from, event, to });
        tracing::trace!("fsm: {:?} --{:?}--> {:?}", from, event, to);
        Some(to)
    }

    /// Force the machine back to its initial state, bypassing the table
    ///
    /// Used on teardown. Clears history.
    pub fn reset(&mut self) {
        self.current_state = self.initial_state;
        self.history.clear();
    }

    fn record(&mut self, record: TransitionRecord<S>) {
        if self.history_limit == 0 {
            return;
        }
        if self.history.len() == self.history_limit {
            self.history.pop_front();
        }
        self.history.push_back(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    enum Button {
        Idle,
        Hovered,
        Pressed,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Pointer {
        Enter,
        Leave,
        Down,
        Up,
    }

    impl StateTransitions for Button {
        type Event = Pointer;

        fn on_event(&self, event: Pointer) -> Option<Self> {
            match (self, event) {
                (Button::Idle, Pointer::Enter) => Some(Button::Hovered),
                (Button::Hovered, Pointer::Leave) => Some(Button::Idle),
                (Button::Hovered, Pointer::Down) => Some(Button::Pressed),
                (Button::Pressed, Pointer::Up) => Some(Button::Hovered),
                _ => None,
            }
        }
    }

    #[test]
    fn test_simple_transitions() {
        let mut fsm = StateMachine::new(Button::Idle);
        assert_eq!(fsm.current_state(), Button::Idle);

        assert_eq!(fsm.send(Pointer::Enter), Some(Button::Hovered));
        assert_eq!(fsm.send(Pointer::Down), Some(Button::Pressed));
        assert_eq!(fsm.send(Pointer::Up), Some(Button::Hovered));
        assert_eq!(fsm.send(Pointer::Leave), Some(Button::Idle));
    }

    #[test]
    fn test_invalid_event_no_transition() {
        let mut fsm = StateMachine::new(Button::Idle);

        // Down is not valid in Idle
        assert_eq!(fsm.send(Pointer::Down), None);
        assert!(fsm.is_in(Button::Idle));
        assert_eq!(fsm.history().count(), 0);
    }

    #[test]
    fn test_can_send() {
        let fsm = StateMachine::new(Button::Idle);
        assert!(fsm.can_send(Pointer::Enter));
        assert!(!fsm.can_send(Pointer::Up));
    }

    #[test]
    fn test_history() {
        let mut fsm = StateMachine::new(Button::Idle);
        fsm.send(Pointer::Enter);
        fsm.send(Pointer::Down);

        let history: Vec<_> = fsm.history().copied().collect();
        assert_eq!(history.len(), 2);
        assert_eq!(
            history[0],
            TransitionRecord {
                from: Button::Idle,
                event: Pointer::Enter,
                to: Button::Hovered
            }
        );
        assert_eq!(history[1].to, Button::Pressed);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut fsm = StateMachine::new(Button::Idle).with_history_limit(3);
        for _ in 0..5 {
            fsm.send(Pointer::Enter);
            fsm.send(Pointer::Leave);
        }

        let history: Vec<_> = fsm.history().copied().collect();
        assert_eq!(history.len(), 3);
        assert_eq!(history[2].event, Pointer::Leave);
    }

    #[test]
    fn test_reset_returns_to_initial_state() {
        let mut fsm = StateMachine::new(Button::Idle);
        fsm.send(Pointer::Enter);
        fsm.send(Pointer::Down);

        fsm.reset();
        assert!(fsm.is_in(Button::Idle));
        assert_eq!(fsm.history().count(), 0);
    }
}
