//! Tuck Core Runtime
//!
//! This crate provides the foundational primitives shared by the Tuck sheet
//! components:
//!
//! - **Event Messages**: platform input (touch, click, resize, transition end)
//!   delivered as discrete, mutable messages
//! - **Listener Dispatch**: per-kind listener registries with symmetric removal
//! - **State Machines**: table-driven typed state machines with history
//!
//! # Example
//!
//! ```rust
//! use tuck_core::fsm::{StateMachine, StateTransitions};
//!
//! #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
//! enum Door {
//!     Closed,
//!     Open,
//! }
//!
//! #[derive(Clone, Copy, Debug, PartialEq, Eq)]
//! enum Push {
//!     Pull,
//!     Shove,
//! }
//!
//! impl StateTransitions for Door {
//!     type Event = Push;
//!
//!     fn on_event(&self, event: Push) -> Option<Self> {
//!         match (self, event) {
//!             (Door::Closed, Push::Pull) => Some(Door::Open),
//!             (Door::Open, Push::Shove) => Some(Door::Closed),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let mut door = StateMachine::new(Door::Closed);
//! assert_eq!(door.send(Push::Pull), Some(Door::Open));
//! assert_eq!(door.send(Push::Pull), None);
//! assert!(door.is_in(Door::Open));
//! ```

pub mod events;
pub mod fsm;

pub use events::{ElementId, Event, EventData, EventDispatcher, EventType, ListenerId};
pub use fsm::{StateMachine, StateTransitions};
