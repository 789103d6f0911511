//! Lifecycle notifications emitted by the sheet

use std::fmt;

use tuck_core::events::{EventDispatcher, ListenerId};
use tuck_core::ElementId;

use crate::panel::PanelState;

/// Notification kinds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SheetEventKind {
    /// Cancelable; emitted before a show starts
    BeforeShow,
    /// The open transition has finished
    Shown,
    /// Cancelable; emitted before a hide starts
    BeforeHide,
    /// The close transition has finished and the dialog is closed
    Hidden,
}

impl SheetEventKind {
    pub const ALL: [SheetEventKind; 4] = [
        SheetEventKind::BeforeShow,
        SheetEventKind::Shown,
        SheetEventKind::BeforeHide,
        SheetEventKind::Hidden,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SheetEventKind::BeforeShow => "before-show",
            SheetEventKind::Shown => "shown",
            SheetEventKind::BeforeHide => "before-hide",
            SheetEventKind::Hidden => "hidden",
        }
    }

    pub fn is_cancelable(&self) -> bool {
        matches!(self, SheetEventKind::BeforeShow | SheetEventKind::BeforeHide)
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

impl fmt::Display for SheetEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload delivered to listeners
#[derive(Clone, Debug, PartialEq)]
pub struct SheetEvent {
    pub kind: SheetEventKind,
    /// Lifecycle state at emission time
    pub state: PanelState,
    /// Element that triggered the request, if any
    pub trigger: Option<ElementId>,
    pub cancelable: bool,
    pub default_prevented: bool,
}

impl SheetEvent {
    pub fn new(kind: SheetEventKind, state: PanelState, trigger: Option<ElementId>) -> Self {
        Self {
            kind,
            state,
            trigger,
            cancelable: kind.is_cancelable(),
            default_prevented: false,
        }
    }

    /// Abort the pending transition. No effect on non-cancelable events.
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }
}

/// Listener registry for sheet notifications
#[derive(Default)]
pub struct Notifier {
    dispatcher: EventDispatcher<SheetEventKind, SheetEvent>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, kind: SheetEventKind, listener: F) -> ListenerId
    where
        F: Fn(&mut SheetEvent) + Send + Sync + 'static,
    {
        self.dispatcher.register(kind, listener)
    }

    pub fn unregister(&mut self, id: ListenerId) -> bool {
        self.dispatcher.unregister(id)
    }

    /// Emit and hand back the payload so the caller can check cancellation
    pub fn emit(
        &self,
        kind: SheetEventKind,
        state: PanelState,
        trigger: Option<ElementId>,
    ) -> SheetEvent {
        let mut event = SheetEvent::new(kind, state, trigger);
        let listeners = self.dispatcher.dispatch(kind, &mut event);
        tracing::debug!(
            "emit {} (state={}, listeners={}, prevented={})",
            kind,
            state,
            listeners,
            event.default_prevented
        );
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_before_events_cancel() {
        let mut notifier = Notifier::new();
        for kind in SheetEventKind::ALL {
            notifier.register(kind, |event| event.prevent_default());
        }

        assert!(notifier.emit(SheetEventKind::BeforeShow, PanelState::Hidden, None).default_prevented);
        assert!(notifier.emit(SheetEventKind::BeforeHide, PanelState::Shown, None).default_prevented);
        assert!(!notifier.emit(SheetEventKind::Shown, PanelState::Shown, None).default_prevented);
        assert!(!notifier.emit(SheetEventKind::Hidden, PanelState::Hidden, None).default_prevented);
    }

    #[test]
    fn test_payload_carries_state_and_trigger() {
        let notifier = Notifier::new();
        let event = notifier.emit(SheetEventKind::Shown, PanelState::Shown, Some(ElementId(7)));
        assert_eq!(event.state, PanelState::Shown);
        assert_eq!(event.trigger, Some(ElementId(7)));
        assert!(!event.cancelable);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(SheetEventKind::parse("before-hide"), Some(SheetEventKind::BeforeHide));
        assert_eq!(SheetEventKind::parse("closed"), None);
        assert_eq!(SheetEventKind::Shown.to_string(), "shown");
    }
}
