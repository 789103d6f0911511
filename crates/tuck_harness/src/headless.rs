//! Headless host for driving a sheet without a real UI toolkit
//!
//! [`HeadlessHost`] stands in for a DOM document holding one bottom sheet.
//! It keeps a fixed element tree, applies the sheet's writes lazily at render
//! time the way a browser flushes styles, and animates the panel with a CSS
//! style transition so that `transitionend` arrives when it would in a page.
//!
//! ```text
//! root (1)
//! └── dialog (2)
//!     ├── panel (3)
//!     │   ├── header (4)
//!     │   │   └── close button (8, data-sheet-hide)
//!     │   │       └── close icon (9)
//!     │   └── content (5)
//!     │       └── content item (10)
//!     └── backdrop (6, created on attach)
//! trigger button (7, outside the sheet)
//! ```

use std::time::Duration;

use rustc_hash::FxHashMap;
use tuck_animation::{FrameId, FrameScheduler, TimerId, TimingFunction, Tween};
use tuck_core::{ElementId, Event};
use tuck_sheet::{ModalDialog, PanelState, PanelTransform, Rect, SheetHost, SheetRoles};

/// Element ids of the headless document
pub mod elements {
    use tuck_core::ElementId;

    pub const ROOT: ElementId = ElementId(1);
    pub const DIALOG: ElementId = ElementId(2);
    pub const PANEL: ElementId = ElementId(3);
    pub const HEADER: ElementId = ElementId(4);
    pub const CONTENT: ElementId = ElementId(5);
    pub const BACKDROP: ElementId = ElementId(6);
    pub const TRIGGER: ElementId = ElementId(7);
    pub const CLOSE_BUTTON: ElementId = ElementId(8);
    pub const CLOSE_ICON: ElementId = ElementId(9);
    pub const CONTENT_ITEM: ElementId = ElementId(10);

    /// Look up an element by its scenario name
    pub fn by_name(name: &str) -> Option<ElementId> {
        let id = match name {
            "root" => ROOT,
            "dialog" => DIALOG,
            "panel" => PANEL,
            "header" => HEADER,
            "content" => CONTENT,
            "backdrop" => BACKDROP,
            "trigger" => TRIGGER,
            "close_button" => CLOSE_BUTTON,
            "close_icon" => CLOSE_ICON,
            "content_item" => CONTENT_ITEM,
            _ => return None,
        };
        Some(id)
    }
}

use elements::*;

/// Document and stylesheet parameters for a headless run
#[derive(Clone, Debug)]
pub struct HeadlessConfig {
    /// Viewport width in pixels
    pub width: f32,
    /// Viewport height in pixels
    pub height: f32,
    /// Height of the sliding panel
    pub panel_height: f32,
    /// Scrollable overflow of the content area
    pub content_scroll_height: f32,
    /// `transition-duration` of the panel transform
    pub transition_duration: Duration,
    /// `transition-timing-function` of the panel transform
    pub timing: TimingFunction,
    /// When false the panel behaves as if styled with `transition: none`
    pub transitions_enabled: bool,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            width: 390.0,
            height: 844.0,
            panel_height: 444.0,
            content_scroll_height: 600.0,
            transition_duration: Duration::from_millis(300),
            timing: TimingFunction::Ease,
            transitions_enabled: true,
        }
    }
}

impl HeadlessConfig {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn with_transition(mut self, duration: Duration, timing: TimingFunction) -> Self {
        self.transition_duration = duration;
        self.timing = timing;
        self
    }

    pub fn without_transitions(mut self) -> Self {
        self.transitions_enabled = false;
        self
    }

    /// Box of the panel when fully open
    pub fn panel_rect(&self) -> Rect {
        Rect::new(
            0.0,
            self.height - self.panel_height,
            self.width,
            self.panel_height,
        )
    }

    /// Roles matching the headless document
    pub fn roles(&self) -> SheetRoles {
        SheetRoles::new(ROOT, PANEL).header(HEADER).content(CONTENT)
    }
}

/// Simulated document hosting the sheet
pub struct HeadlessHost {
    config: HeadlessConfig,
    scheduler: FrameScheduler,
    parents: FxHashMap<ElementId, ElementId>,
    attributes: FxHashMap<ElementId, Vec<String>>,

    state_marker: PanelState,
    inline_transform: PanelTransform,
    dragging: bool,
    /// Rendered translateY of the panel; 0 is fully open
    position: f32,
    transition: Option<Tween>,

    content_scroll_top: f32,
    scroll_locked: bool,
    aria_hidden: bool,
    focused: Option<ElementId>,
    transform_writes: Vec<PanelTransform>,
}

impl HeadlessHost {
    pub fn new(config: HeadlessConfig) -> Self {
        let parents: FxHashMap<ElementId, ElementId> = [
            (DIALOG, ROOT),
            (PANEL, DIALOG),
            (HEADER, PANEL),
            (CONTENT, PANEL),
            (BACKDROP, DIALOG),
            (CLOSE_BUTTON, HEADER),
            (CLOSE_ICON, CLOSE_BUTTON),
            (CONTENT_ITEM, CONTENT),
        ]
        .into_iter()
        .collect();

        let mut attributes = FxHashMap::default();
        attributes.insert(CLOSE_BUTTON, vec!["data-sheet-hide".to_string()]);

        Self {
            position: config.panel_height,
            config,
            scheduler: FrameScheduler::new(),
            parents,
            attributes,
            state_marker: PanelState::Hidden,
            inline_transform: PanelTransform::Cleared,
            dragging: false,
            transition: None,
            content_scroll_top: 0.0,
            scroll_locked: false,
            aria_hidden: false,
            focused: None,
            transform_writes: Vec::new(),
        }
    }

    pub fn config(&self) -> &HeadlessConfig {
        &self.config
    }

    pub fn scheduler_mut(&mut self) -> &mut FrameScheduler {
        &mut self.scheduler
    }

    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    pub fn set_viewport_width(&mut self, width: f32) {
        self.config.width = width;
    }

    /// Mark an element with an attribute (e.g. another hide marker)
    pub fn set_attribute(&mut self, element: ElementId, attribute: &str) {
        let attrs = self.attributes.entry(element).or_default();
        if !attrs.iter().any(|a| a == attribute) {
            attrs.push(attribute.to_string());
        }
    }

    /// Rendered panel displacement in pixels; 0 is fully open
    pub fn panel_offset(&self) -> f32 {
        self.position
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    pub fn state_marker(&self) -> PanelState {
        self.state_marker
    }

    pub fn inline_transform(&self) -> PanelTransform {
        self.inline_transform
    }

    /// Every transform written to the panel, oldest first
    pub fn transform_writes(&self) -> &[PanelTransform] {
        &self.transform_writes
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    pub fn is_aria_hidden(&self) -> bool {
        self.aria_hidden
    }

    pub fn focused(&self) -> Option<ElementId> {
        self.focused
    }

    pub fn content_scroll_top(&self) -> f32 {
        self.content_scroll_top
    }

    /// Scroll the content area, clamped to its overflow
    pub fn scroll_content_to(&mut self, top: f32) {
        let max = (self.config.content_scroll_height - self.config.panel_height).max(0.0);
        self.content_scroll_top = top.clamp(0.0, max);
    }

    /// Whether `target` is the content area or inside it
    pub fn contains_content(&self, target: ElementId) -> bool {
        self.is_ancestor_or_self(CONTENT, target)
    }

    /// Native scroll for a touch move the sheet did not consume
    pub fn scroll_content_by(&mut self, dy: f32) {
        self.scroll_content_to(self.content_scroll_top + dy);
    }

    /// Where the stylesheet puts the panel for the current state and inline style
    fn computed_position(&self) -> f32 {
        let off_screen = self.config.panel_height;
        match self.inline_transform {
            PanelTransform::Identity => 0.0,
            PanelTransform::OffScreen => off_screen,
            PanelTransform::Offset(px) => px,
            PanelTransform::Cleared => match self.state_marker {
                PanelState::Shown => 0.0,
                PanelState::Hidden | PanelState::Showing | PanelState::Hiding => off_screen,
            },
        }
    }

    /// Advance running transitions and flush pending style changes
    ///
    /// Returns the transition-end events that fired during this frame.
    pub fn render(&mut self, dt: Duration) -> Vec<Event> {
        let mut fired = Vec::new();

        if let Some(tween) = self.transition.as_mut() {
            if tween.advance(dt) {
                self.position = tween.target();
                self.transition = None;
                fired.push(Event::transition_end(PANEL, "transform"));
            } else {
                self.position = tween.value();
            }
        }

        let target = self.computed_position();
        let animate = self.config.transitions_enabled
            && !self.dragging
            && !self.config.transition_duration.is_zero();
        match self.transition.as_mut() {
            Some(tween) if tween.target() != target => {
                if animate {
                    tween.retarget(target);
                } else {
                    self.position = target;
                    self.transition = None;
                }
            }
            Some(_) => {}
            None if target != self.position => {
                if animate {
                    self.transition = Some(Tween::new(
                        self.position,
                        target,
                        self.config.transition_duration,
                        self.config.timing,
                    ));
                } else {
                    self.position = target;
                }
            }
            None => {}
        }

        fired
    }

    fn is_ancestor_or_self(&self, ancestor: ElementId, mut node: ElementId) -> bool {
        loop {
            if node == ancestor {
                return true;
            }
            match self.parents.get(&node) {
                Some(parent) => node = *parent,
                None => return false,
            }
        }
    }
}

impl SheetHost for HeadlessHost {
    fn viewport_width(&self) -> f32 {
        self.config.width
    }

    fn contains(&self, ancestor: ElementId, target: ElementId) -> bool {
        self.is_ancestor_or_self(ancestor, target)
    }

    fn closest_with_attribute(&self, target: ElementId, attribute: &str) -> Option<ElementId> {
        let mut node = Some(target);
        while let Some(element) = node {
            let marked = self
                .attributes
                .get(&element)
                .is_some_and(|attrs| attrs.iter().any(|a| a == attribute));
            if marked {
                return Some(element);
            }
            node = self.parents.get(&element).copied();
        }
        None
    }

    fn scroll_top(&self, element: ElementId) -> f32 {
        if element == CONTENT {
            self.content_scroll_top
        } else {
            0.0
        }
    }

    fn write_transform(&mut self, _panel: ElementId, transform: PanelTransform) {
        self.inline_transform = transform;
        self.transform_writes.push(transform);
        if self.dragging {
            // No transition while dragging: the panel tracks the finger
            self.position = self.computed_position();
            self.transition = None;
        }
    }

    fn write_state(&mut self, _root: ElementId, state: PanelState) {
        self.state_marker = state;
    }

    fn set_dragging(&mut self, _panel: ElementId, dragging: bool) {
        self.dragging = dragging;
    }

    fn set_scroll_lock(&mut self, locked: bool) {
        self.scroll_locked = locked;
    }

    fn set_aria_hidden(&mut self, _root: ElementId, hidden: bool) {
        self.aria_hidden = hidden;
    }

    fn focus(&mut self, element: ElementId) {
        self.focused = Some(element);
    }

    fn request_frame(&mut self) -> FrameId {
        self.scheduler.request_frame()
    }

    fn start_timer(&mut self, delay: Duration) -> TimerId {
        self.scheduler.start_timer(delay)
    }

    fn cancel_timer(&mut self, id: TimerId) {
        self.scheduler.cancel_timer(id);
    }
}

/// Modal dialog primitive of the headless document
#[derive(Debug)]
pub struct HeadlessDialog {
    open: bool,
    bounds: Rect,
    backdrop: Option<ElementId>,
    show_calls: usize,
    close_calls: usize,
}

impl HeadlessDialog {
    pub fn new(config: &HeadlessConfig) -> Self {
        Self {
            open: false,
            bounds: config.panel_rect(),
            backdrop: None,
            show_calls: 0,
            close_calls: 0,
        }
    }

    pub fn show_calls(&self) -> usize {
        self.show_calls
    }

    pub fn close_calls(&self) -> usize {
        self.close_calls
    }
}

impl ModalDialog for HeadlessDialog {
    fn element(&self) -> ElementId {
        DIALOG
    }

    fn show_modal(&mut self) {
        self.open = true;
        self.show_calls += 1;
    }

    fn close(&mut self) {
        self.open = false;
        self.close_calls += 1;
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn bounding_box(&self) -> Rect {
        self.bounds
    }

    fn backdrop(&self) -> Option<ElementId> {
        self.backdrop
    }

    fn create_backdrop(&mut self) -> ElementId {
        self.backdrop = Some(BACKDROP);
        BACKDROP
    }
}
