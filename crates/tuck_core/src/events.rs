//! Event messages and listener dispatch
//!
//! Platform input reaches components as discrete [`Event`] messages. The
//! delivery mechanism (DOM listeners, a channel, a test driver) is up to the
//! host; components only see the message and may flag it as
//! default-prevented or propagation-stopped for the host to honour.

use std::hash::Hash;

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

/// Event type identifier
pub type EventType = u32;

/// Common event types
pub mod event_types {
    use super::EventType;

    pub const TOUCH_START: EventType = 1;
    pub const TOUCH_MOVE: EventType = 2;
    pub const TOUCH_END: EventType = 3;
    /// Touch interrupted by the platform (treated like an end)
    pub const TOUCH_CANCEL: EventType = 4;
    pub const CLICK: EventType = 10;
    pub const RESIZE: EventType = 20;
    /// A visual transition finished animating one property
    pub const TRANSITION_END: EventType = 30;
    /// Native dialog cancel request (escape key)
    pub const DIALOG_CANCEL: EventType = 40;
    pub const ATTRIBUTE_CHANGED: EventType = 50;
}

/// Opaque handle for a host element
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A UI event with associated data
#[derive(Clone, Debug)]
pub struct Event {
    pub event_type: EventType,
    pub target: ElementId,
    pub data: EventData,
    /// Milliseconds on the host clock
    pub timestamp: u64,
    pub propagation_stopped: bool,
    pub default_prevented: bool,
}

/// Event-specific data
#[derive(Clone, Debug, PartialEq)]
pub enum EventData {
    Touch {
        x: f32,
        y: f32,
    },
    Pointer {
        x: f32,
        y: f32,
    },
    Resize {
        width: f32,
        height: f32,
    },
    Transition {
        /// Name of the animated property (`"transform"`, `"opacity"`, ...)
        property: String,
    },
    Attribute {
        name: String,
        value: Option<String>,
    },
    None,
}

impl Event {
    pub fn new(event_type: EventType, target: ElementId, data: EventData) -> Self {
        Self {
            event_type,
            target,
            data,
            timestamp: 0,
            propagation_stopped: false,
            default_prevented: false,
        }
    }

    pub fn at(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn touch_start(target: ElementId, x: f32, y: f32) -> Self {
        Self::new(event_types::TOUCH_START, target, EventData::Touch { x, y })
    }

    pub fn touch_move(target: ElementId, x: f32, y: f32) -> Self {
        Self::new(event_types::TOUCH_MOVE, target, EventData::Touch { x, y })
    }

    pub fn touch_end(target: ElementId) -> Self {
        Self::new(event_types::TOUCH_END, target, EventData::None)
    }

    pub fn touch_cancel(target: ElementId) -> Self {
        Self::new(event_types::TOUCH_CANCEL, target, EventData::None)
    }

    pub fn click(target: ElementId, x: f32, y: f32) -> Self {
        Self::new(event_types::CLICK, target, EventData::Pointer { x, y })
    }

    pub fn resize(target: ElementId, width: f32, height: f32) -> Self {
        Self::new(event_types::RESIZE, target, EventData::Resize { width, height })
    }

    pub fn transition_end(target: ElementId, property: impl Into<String>) -> Self {
        Self::new(
            event_types::TRANSITION_END,
            target,
            EventData::Transition {
                property: property.into(),
            },
        )
    }

    pub fn dialog_cancel(target: ElementId) -> Self {
        Self::new(event_types::DIALOG_CANCEL, target, EventData::None)
    }

    pub fn attribute_changed(
        target: ElementId,
        name: impl Into<String>,
        value: Option<String>,
    ) -> Self {
        Self::new(
            event_types::ATTRIBUTE_CHANGED,
            target,
            EventData::Attribute {
                name: name.into(),
                value,
            },
        )
    }

    /// Vertical coordinate of touch and pointer events
    pub fn y(&self) -> Option<f32> {
        match self.data {
            EventData::Touch { y, .. } | EventData::Pointer { y, .. } => Some(y),
            _ => None,
        }
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }
}

new_key_type! {
    /// Handle returned on registration, used for symmetric removal
    pub struct ListenerId;
}

/// Listener function type
pub type Listener<E> = Box<dyn Fn(&mut E) + Send + Sync>;

/// Dispatches payloads of type `E` to listeners registered per kind `K`
///
/// Listeners run in registration order.
pub struct EventDispatcher<K, E> {
    listeners: SlotMap<ListenerId, (K, Listener<E>)>,
    by_kind: FxHashMap<K, SmallVec<[ListenerId; 4]>>,
}

impl<K: Copy + Eq + Hash, E> EventDispatcher<K, E> {
    pub fn new() -> Self {
        Self {
            listeners: SlotMap::with_key(),
            by_kind: FxHashMap::default(),
        }
    }

    /// Register a listener for a kind
    pub fn register<F>(&mut self, kind: K, listener: F) -> ListenerId
    where
        F: Fn(&mut E) + Send + Sync + 'static,
    {
        let id = self.listeners.insert((kind, Box::new(listener)));
        self.by_kind.entry(kind).or_default().push(id);
        id
    }

    /// Remove a listener. Returns false if it was already gone.
    pub fn unregister(&mut self, id: ListenerId) -> bool {
        let Some((kind, _)) = self.listeners.remove(id) else {
            return false;
        };
        if let Some(ids) = self.by_kind.get_mut(&kind) {
            ids.retain(|other| *other != id);
            if ids.is_empty() {
                self.by_kind.remove(&kind);
            }
        }
        true
    }

    /// Remove every listener
    pub fn clear(&mut self) {
        self.listeners.clear();
        self.by_kind.clear();
    }

    /// Dispatch a payload to all listeners of `kind`
    ///
    /// Returns the number of listeners invoked.
    pub fn dispatch(&self, kind: K, payload: &mut E) -> usize {
        let Some(ids) = self.by_kind.get(&kind) else {
            return 0;
        };
        let mut invoked = 0;
        for id in ids {
            if let Some((_, listener)) = self.listeners.get(*id) {
                listener(payload);
                invoked += 1;
            }
        }
        invoked
    }

    /// Number of listeners registered for `kind`
    pub fn listener_count(&self, kind: K) -> usize {
        self.by_kind.get(&kind).map_or(0, |ids| ids.len())
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl<K: Copy + Eq + Hash, E> Default for EventDispatcher<K, E> {
    fn default() -> Self {
        Self::new()
    }
}
