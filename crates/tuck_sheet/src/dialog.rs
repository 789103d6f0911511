//! Native modal dialog adapter
//!
//! The sheet lives inside a platform modal dialog which supplies the focus
//! trap, inertness of the page behind it and the escape key. The adapter
//! keeps that primitive in lockstep with the panel lifecycle and redirects
//! its own ways of closing (cancel signal, backdrop clicks) through the
//! animated hide path.

use tuck_core::events::{EventDispatcher, ListenerId};
use tuck_core::{ElementId, Event};

/// Axis-aligned rectangle in viewport coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Edges are inside
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

/// The platform's modal dialog primitive
pub trait ModalDialog {
    /// The dialog element itself
    fn element(&self) -> ElementId;

    /// Open modally (focus trap, backdrop, inert page)
    fn show_modal(&mut self);

    /// Close immediately
    fn close(&mut self);

    fn is_open(&self) -> bool;

    /// Box of the visible dialog content
    fn bounding_box(&self) -> Rect;

    /// Declared backdrop element, if any
    fn backdrop(&self) -> Option<ElementId>;

    /// Create a backdrop element inside the dialog and return it
    fn create_backdrop(&mut self) -> ElementId;
}

/// Dialog lifecycle notifications
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DialogLifecycle {
    Opened,
    Closed,
}

/// Handle for a dialog lifecycle listener
///
/// Kept apart from sheet [`ListenerId`]s: both come from independent
/// registries and would otherwise collide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DialogListenerId(ListenerId);

/// Keeps a [`ModalDialog`] in step with the panel
pub struct DialogAdapter<D: ModalDialog> {
    dialog: D,
    backdrop: ElementId,
    listeners: EventDispatcher<DialogLifecycle, ElementId>,
}

impl<D: ModalDialog> DialogAdapter<D> {
    /// Wrap a dialog, creating a backdrop if it does not declare one
    pub fn new(mut dialog: D) -> Self {
        let backdrop = match dialog.backdrop() {
            Some(backdrop) => backdrop,
            None => {
                let created = dialog.create_backdrop();
                tracing::debug!("dialog {} had no backdrop; created {}", dialog.element(), created);
                created
            }
        };
        Self {
            dialog,
            backdrop,
            listeners: EventDispatcher::new(),
        }
    }

    pub fn element(&self) -> ElementId {
        self.dialog.element()
    }

    pub fn backdrop(&self) -> ElementId {
        self.backdrop
    }

    pub fn is_open(&self) -> bool {
        self.dialog.is_open()
    }

    pub fn dialog(&self) -> &D {
        &self.dialog
    }

    /// Observe open/close of the primitive. Listeners receive the dialog element.
    pub fn on<F>(&mut self, lifecycle: DialogLifecycle, listener: F) -> DialogListenerId
    where
        F: Fn(&mut ElementId) + Send + Sync + 'static,
    {
        DialogListenerId(self.listeners.register(lifecycle, listener))
    }

    pub fn off(&mut self, id: DialogListenerId) -> bool {
        self.listeners.unregister(id.0)
    }

    /// Open modally unless already open
    pub fn open(&mut self) {
        if self.dialog.is_open() {
            return;
        }
        self.dialog.show_modal();
        self.notify(DialogLifecycle::Opened);
    }

    /// Close unless already closed
    pub fn close(&mut self) {
        if !self.dialog.is_open() {
            return;
        }
        self.dialog.close();
        self.notify(DialogLifecycle::Closed);
    }

    /// Stop the primitive's own unanimated close on cancel (escape)
    ///
    /// Returns true when the caller should run the animated hide instead.
    pub fn intercept_cancel(&self, event: &mut Event) -> bool {
        event.prevent_default();
        self.dialog.is_open()
    }

    /// Whether a click at (x, y) landed outside the dialog box
    pub fn is_backdrop_click(&self, x: f32, y: f32) -> bool {
        self.dialog.is_open() && !self.dialog.bounding_box().contains(x, y)
    }

    fn notify(&self, lifecycle: DialogLifecycle) {
        let mut element = self.dialog.element();
        tracing::debug!("dialog {} {:?}", element, lifecycle);
        self.listeners.dispatch(lifecycle, &mut element);
    }
}
