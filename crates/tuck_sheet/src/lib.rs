//! Tuck Bottom Sheet
//!
//! A panel that slides up from the bottom of the viewport inside a native
//! modal dialog, dismissable by dragging it down.
//!
//! The component is platform-neutral: everything it needs from the outside
//! world goes through [`SheetHost`] and [`ModalDialog`], and everything the
//! outside world tells it arrives as a message ([`tuck_core::Event`], frame
//! callbacks, timer callbacks).
//!
//! # Example
//!
//! ```ignore
//! use tuck_sheet::prelude::*;
//!
//! let mut sheet = BottomSheet::attach(host, Some(dialog), roles, SheetConfig::default());
//!
//! sheet.on(SheetEventKind::BeforeHide, |event| {
//!     if unsaved_changes() {
//!         event.prevent_default();
//!     }
//! });
//!
//! sheet.show(Some(button))?;
//!
//! // From the platform event loop:
//! sheet.handle_event(&mut event);
//! sheet.on_frame(frame_id);
//! sheet.on_timer(timer_id);
//! ```

pub mod config;
pub mod dialog;
pub mod error;
pub mod gesture;
pub mod host;
pub mod notify;
pub mod panel;
pub mod sheet;

pub use config::{DisplayWidth, ResistanceCurve, SheetConfig};
pub use dialog::{DialogAdapter, DialogLifecycle, DialogListenerId, ModalDialog, Rect};
pub use error::{ConfigError, PanelError};
pub use gesture::{Decision, Direction, DragSession, GestureTracker, MoveOutcome, Zone};
pub use host::{PanelTransform, SheetHost, SheetRoles};
pub use notify::{SheetEvent, SheetEventKind};
pub use panel::{PanelMachine, PanelState, Request};
pub use sheet::BottomSheet;

/// Common imports for sheet users
pub mod prelude {
    pub use crate::{
        BottomSheet, DisplayWidth, ModalDialog, PanelError, PanelState, PanelTransform, Rect,
        Request, SheetConfig, SheetEvent, SheetEventKind, SheetHost, SheetRoles,
    };
    pub use tuck_core::{ElementId, Event};
}
