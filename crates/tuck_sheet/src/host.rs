//! Platform collaborator interface
//!
//! The sheet reaches the platform only through [`SheetHost`]. A DOM host maps
//! these calls onto element attributes, inline styles, `requestAnimationFrame`
//! and `setTimeout`; the headless harness simulates them.

use std::time::Duration;

use tuck_animation::{FrameId, TimerId};
use tuck_core::ElementId;

use crate::panel::PanelState;

/// Value of the panel's inline transform slot
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PanelTransform {
    /// No inline transform; the stylesheet positions the panel by state
    Cleared,
    /// Resting on-screen position
    Identity,
    /// Resting off-screen position
    OffScreen,
    /// Live drag offset in pixels (positive is down)
    Offset(f32),
}

/// Elements the sheet is built from
///
/// Only `root` and `panel` are required. A missing header, content or
/// backdrop only disables dragging from that zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SheetRoles {
    /// The component element; carries the state marker and aria attributes
    pub root: ElementId,
    /// The sliding panel; owns the inline transform
    pub panel: ElementId,
    pub header: Option<ElementId>,
    pub content: Option<ElementId>,
    pub backdrop: Option<ElementId>,
}

impl SheetRoles {
    pub fn new(root: ElementId, panel: ElementId) -> Self {
        Self {
            root,
            panel,
            header: None,
            content: None,
            backdrop: None,
        }
    }

    pub fn header(mut self, header: ElementId) -> Self {
        self.header = Some(header);
        self
    }

    pub fn content(mut self, content: ElementId) -> Self {
        self.content = Some(content);
        self
    }

    pub fn backdrop(mut self, backdrop: ElementId) -> Self {
        self.backdrop = Some(backdrop);
        self
    }
}

/// Everything the sheet needs from the platform
pub trait SheetHost {
    /// Current viewport width in pixels
    fn viewport_width(&self) -> f32;

    /// Whether `target` is `ancestor` or one of its descendants
    fn contains(&self, ancestor: ElementId, target: ElementId) -> bool;

    /// Nearest element from `target` upwards carrying `attribute`
    fn closest_with_attribute(&self, target: ElementId, attribute: &str) -> Option<ElementId>;

    /// Vertical scroll offset of a scroll container
    fn scroll_top(&self, element: ElementId) -> f32;

    /// Write the panel's inline transform
    fn write_transform(&mut self, panel: ElementId, transform: PanelTransform);

    /// Write the lifecycle marker the stylesheet keys on
    fn write_state(&mut self, root: ElementId, state: PanelState);

    /// Toggle the dragging marker (transitions are suspended while set)
    fn set_dragging(&mut self, panel: ElementId, dragging: bool);

    /// Lock or release scrolling of the page behind the sheet
    fn set_scroll_lock(&mut self, locked: bool);

    fn set_aria_hidden(&mut self, root: ElementId, hidden: bool);

    fn focus(&mut self, element: ElementId);

    /// Ask for a callback before the next paint; delivered via `BottomSheet::on_frame`
    fn request_frame(&mut self) -> FrameId;

    /// One-shot timer; delivered via `BottomSheet::on_timer`
    fn start_timer(&mut self, delay: Duration) -> TimerId;

    fn cancel_timer(&mut self, id: TimerId);
}
