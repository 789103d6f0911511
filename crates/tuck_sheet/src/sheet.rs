//! The bottom sheet component
//!
//! [`BottomSheet`] ties the gesture tracker, the panel state machine and the
//! dialog adapter together and performs every side effect on the host. It is
//! driven entirely by messages: [`BottomSheet::handle_event`] for input,
//! [`BottomSheet::on_frame`] and [`BottomSheet::on_timer`] for callbacks the
//! sheet itself requested.

use tuck_animation::{FrameId, TimerId};
use tuck_core::events::{event_types, EventData, ListenerId};
use tuck_core::{ElementId, Event};

use crate::config::{DisplayWidth, SheetConfig, MAX_DISPLAY_WIDTH_ATTR};
use crate::dialog::{DialogAdapter, DialogLifecycle, DialogListenerId, ModalDialog};
use crate::error::PanelError;
use crate::gesture::{Decision, DragSession, GestureTracker, MoveOutcome, Zone};
use crate::host::{PanelTransform, SheetHost, SheetRoles};
use crate::notify::{Notifier, SheetEvent, SheetEventKind};
use crate::panel::{Admission, FrameStep, PanelMachine, PanelState, Request, SettleKind};

/// A draggable bottom sheet bound to one host and one modal dialog
pub struct BottomSheet<H: SheetHost, D: ModalDialog> {
    host: H,
    dialog: Option<DialogAdapter<D>>,
    roles: SheetRoles,
    config: SheetConfig,
    panel: PanelMachine,
    tracker: GestureTracker,
    notifier: Notifier,
    resize_timer: Option<TimerId>,
    dragging: bool,
    attached: bool,
}

impl<H: SheetHost, D: ModalDialog> BottomSheet<H, D> {
    /// Bind the sheet to its elements and put it in the hidden state
    ///
    /// Without a dialog the sheet is inert: it logs a warning, refuses
    /// show/hide and ignores every message.
    pub fn attach(mut host: H, dialog: Option<D>, mut roles: SheetRoles, config: SheetConfig) -> Self {
        let dialog = dialog.map(DialogAdapter::new);
        match &dialog {
            Some(adapter) => {
                if roles.backdrop.is_none() {
                    roles.backdrop = Some(adapter.backdrop());
                }
            }
            None => tracing::warn!(
                "bottom sheet {} has no dialog element; show and hide are disabled",
                roles.root
            ),
        }

        host.write_state(roles.root, PanelState::Hidden);
        host.write_transform(roles.panel, PanelTransform::Cleared);
        host.set_aria_hidden(roles.root, true);

        tracing::debug!(
            "attached sheet {} (panel {}, max-display-width {})",
            roles.root,
            roles.panel,
            config.max_display_width
        );

        Self {
            host,
            dialog,
            roles,
            tracker: GestureTracker::new(&config),
            config,
            panel: PanelMachine::new(),
            notifier: Notifier::new(),
            resize_timer: None,
            dragging: false,
            attached: true,
        }
    }

    /// Cancel everything in flight and return to the hidden state
    ///
    /// Listeners stay registered. A detached sheet behaves like an inert one.
    pub fn detach(&mut self) {
        if !self.attached {
            return;
        }
        let was = self.panel.state();

        if let Some(timer) = self.resize_timer.take() {
            self.host.cancel_timer(timer);
        }
        if let Some(timer) = self.panel.reset() {
            self.host.cancel_timer(timer);
        }
        self.tracker.reset();
        self.release_drag();

        if let Some(dialog) = self.dialog.as_mut() {
            dialog.close();
        }
        if was != PanelState::Hidden {
            self.host.set_scroll_lock(false);
        }
        self.host.write_state(self.roles.root, PanelState::Hidden);
        self.host.write_transform(self.roles.panel, PanelTransform::Cleared);
        self.host.set_aria_hidden(self.roles.root, true);
        self.attached = false;
        tracing::debug!("detached sheet {} (was {})", self.roles.root, was);
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Detached, or attached without a dialog
    pub fn is_inert(&self) -> bool {
        !self.attached || self.dialog.is_none()
    }

    pub fn state(&self) -> PanelState {
        self.panel.state()
    }

    /// Lifecycle transitions taken so far, oldest first
    pub fn history(&self) -> impl Iterator<Item = (PanelState, PanelState)> + '_ {
        self.panel.history().map(|record| (record.from, record.to))
    }

    pub fn session(&self) -> &DragSession {
        self.tracker.session()
    }

    pub fn config(&self) -> &SheetConfig {
        &self.config
    }

    pub fn roles(&self) -> &SheetRoles {
        &self.roles
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn dialog(&self) -> Option<&D> {
        self.dialog.as_ref().map(DialogAdapter::dialog)
    }

    /// Subscribe to a lifecycle notification
    pub fn on<F>(&mut self, kind: SheetEventKind, listener: F) -> ListenerId
    where
        F: Fn(&mut SheetEvent) + Send + Sync + 'static,
    {
        self.notifier.register(kind, listener)
    }

    pub fn off(&mut self, id: ListenerId) -> bool {
        self.notifier.unregister(id)
    }

    /// Subscribe to the dialog primitive opening or closing
    ///
    /// Returns `None` when the sheet has no dialog.
    pub fn on_dialog<F>(
        &mut self,
        lifecycle: DialogLifecycle,
        listener: F,
    ) -> Option<DialogListenerId>
    where
        F: Fn(&mut ElementId) + Send + Sync + 'static,
    {
        self.dialog.as_mut().map(|dialog| dialog.on(lifecycle, listener))
    }

    pub fn off_dialog(&mut self, id: DialogListenerId) -> bool {
        self.dialog.as_mut().is_some_and(|dialog| dialog.off(id))
    }

    /// Replace the display width threshold
    ///
    /// Applies to the next `show` right away and schedules the same throttled
    /// check a resize does.
    pub fn set_max_display_width(&mut self, width: DisplayWidth) {
        if self.config.max_display_width != width {
            tracing::debug!(
                "max-display-width {} -> {}",
                self.config.max_display_width,
                width
            );
        }
        self.config.max_display_width = width;
        self.schedule_width_check();
    }

    /// Open the sheet
    pub fn show(&mut self, trigger: Option<ElementId>) -> Result<Request, PanelError> {
        self.ensure_live()?;
        let state = self.panel.state();
        match self.panel.admit_show() {
            Admission::Proceed => {}
            Admission::Unchanged => return Ok(Request::Unchanged),
            Admission::Busy => return Err(PanelError::Busy { state }),
        }

        let width = self.host.viewport_width();
        if let DisplayWidth::Max(max) = self.config.max_display_width {
            if width > max {
                tracing::debug!("not showing: viewport {}px wider than {}px", width, max);
                return Err(PanelError::TooWide { width, max });
            }
        }

        let before = self.notifier.emit(SheetEventKind::BeforeShow, state, trigger);
        if before.default_prevented {
            tracing::debug!("before-show prevented; staying {}", state);
            return Ok(Request::Cancelled);
        }

        let frame = self.host.request_frame();
        self.panel.open(trigger, frame);
        if let Some(dialog) = self.dialog.as_mut() {
            dialog.open();
        }
        self.host.set_scroll_lock(true);
        self.host.set_aria_hidden(self.roles.root, false);
        self.host.write_state(self.roles.root, PanelState::Showing);
        self.host.write_transform(self.roles.panel, PanelTransform::Cleared);
        Ok(Request::Started)
    }

    /// Close the sheet
    pub fn hide(&mut self, trigger: Option<ElementId>) -> Result<Request, PanelError> {
        self.ensure_live()?;
        let state = self.panel.state();
        match self.panel.admit_hide() {
            Admission::Proceed => {}
            Admission::Unchanged => return Ok(Request::Unchanged),
            Admission::Busy => return Err(PanelError::Busy { state }),
        }

        // The open transition has not reported yet; deliver its `shown` first
        if let Some((SettleKind::Show, timer)) = self.panel.settling() {
            self.host.cancel_timer(timer);
            self.settle();
        }

        let before = self.notifier.emit(SheetEventKind::BeforeHide, state, trigger);
        if before.default_prevented {
            tracing::debug!("before-hide prevented; staying {}", state);
            return Ok(Request::Cancelled);
        }

        self.tracker.reset();
        self.release_drag();
        self.host.write_transform(self.roles.panel, PanelTransform::Cleared);
        let fallback = self.host.start_timer(self.config.transition_fallback());
        self.panel.close(trigger, fallback);
        self.host.write_state(self.roles.root, PanelState::Hiding);
        self.host
            .write_transform(self.roles.panel, PanelState::Hiding.resting_transform());
        Ok(Request::Started)
    }

    /// Deliver a frame callback requested through the host
    pub fn on_frame(&mut self, id: FrameId) {
        match self.panel.frame_elapsed(id) {
            FrameStep::Stale => tracing::trace!("ignoring stale frame {:?}", id),
            FrameStep::Again => {
                let next = self.host.request_frame();
                self.panel.rearm_frame(next);
            }
            FrameStep::Commit => {
                let fallback = self.host.start_timer(self.config.transition_fallback());
                if self.panel.commit(fallback) {
                    self.host.write_state(self.roles.root, PanelState::Shown);
                    self.host
                        .write_transform(self.roles.panel, PanelState::Shown.resting_transform());
                } else {
                    self.host.cancel_timer(fallback);
                }
            }
        }
    }

    /// Deliver a timer callback started through the host
    pub fn on_timer(&mut self, id: TimerId) {
        if self.resize_timer == Some(id) {
            self.resize_timer = None;
            self.check_width();
            return;
        }
        match self.panel.settling() {
            Some((kind, timer)) if timer == id => {
                tracing::debug!("no transition end for {:?}; settling on fallback", kind);
                self.settle();
            }
            _ => tracing::trace!("ignoring stale timer {:?}", id),
        }
    }

    /// Deliver an input message
    ///
    /// Sets `default_prevented` and `propagation_stopped` on the event when
    /// the sheet consumes it.
    pub fn handle_event(&mut self, event: &mut Event) {
        if self.is_inert() {
            tracing::trace!("inert sheet ignoring event {}", event.event_type);
            return;
        }
        match event.event_type {
            event_types::TOUCH_START => self.touch_start(event),
            event_types::TOUCH_MOVE => self.touch_move(event),
            event_types::TOUCH_END | event_types::TOUCH_CANCEL => self.touch_end(),
            event_types::CLICK => self.click(event),
            event_types::DIALOG_CANCEL => self.dialog_cancel(event),
            event_types::RESIZE => self.schedule_width_check(),
            event_types::TRANSITION_END => self.transition_end(event),
            event_types::ATTRIBUTE_CHANGED => self.attribute_changed(event),
            _ => {}
        }
    }

    fn ensure_live(&self) -> Result<(), PanelError> {
        if !self.attached {
            return Err(PanelError::Inert("sheet is detached"));
        }
        if self.dialog.is_none() {
            return Err(PanelError::Inert("no dialog element"));
        }
        Ok(())
    }

    fn zone_of(&self, target: ElementId) -> Option<Zone> {
        let within = |role: Option<ElementId>| {
            role.is_some_and(|element| self.host.contains(element, target))
        };
        if within(self.roles.header) {
            Some(Zone::Header)
        } else if within(self.roles.backdrop) {
            Some(Zone::Backdrop)
        } else if within(self.roles.content) {
            Some(Zone::Content)
        } else {
            None
        }
    }

    fn touch_start(&mut self, event: &Event) {
        let Some(y) = event.y() else {
            return;
        };
        if self.dragging {
            // The last session never ended
            self.release_drag();
            self.snap_back();
        }
        let zone = self.zone_of(event.target);
        let scroll_top = self
            .roles
            .content
            .map(|content| self.host.scroll_top(content))
            .unwrap_or(0.0);
        self.tracker
            .touch_start(zone, y, scroll_top, self.panel.state());
    }

    fn touch_move(&mut self, event: &mut Event) {
        let Some(y) = event.y() else {
            return;
        };
        match self.tracker.touch_move(y) {
            MoveOutcome::Ignored => {}
            MoveOutcome::Passthrough => tracing::trace!("content scroll passes through"),
            MoveOutcome::Intercept { offset } => {
                event.prevent_default();
                event.stop_propagation();
                if !self.dragging {
                    self.dragging = true;
                    self.host.set_dragging(self.roles.panel, true);
                }
                self.host
                    .write_transform(self.roles.panel, PanelTransform::Offset(offset));
            }
        }
    }

    fn touch_end(&mut self) {
        let Some(decision) = self.tracker.touch_end() else {
            return;
        };
        self.release_drag();
        match decision {
            Decision::Dismiss => match self.hide(None) {
                Ok(Request::Started) => {}
                outcome => {
                    tracing::debug!("dismiss did not start a hide ({:?}); snapping back", outcome);
                    self.snap_back();
                }
            },
            Decision::SnapBack => self.snap_back(),
        }
    }

    fn click(&mut self, event: &Event) {
        let target = event.target;
        let marked = self
            .host
            .closest_with_attribute(target, &self.config.hide_marker)
            .is_some_and(|element| self.host.contains(self.roles.root, element));
        if marked {
            tracing::debug!("hide marker clicked at {}", target);
            self.request_hide(Some(target));
            return;
        }

        let EventData::Pointer { x, y } = event.data else {
            return;
        };
        let backdrop_click = self.dialog.as_ref().is_some_and(|dialog| {
            (target == dialog.element() || target == dialog.backdrop())
                && dialog.is_backdrop_click(x, y)
        });
        if backdrop_click {
            tracing::debug!("backdrop clicked at ({}, {})", x, y);
            self.request_hide(None);
        }
    }

    fn dialog_cancel(&mut self, event: &mut Event) {
        let redirect = self
            .dialog
            .as_ref()
            .is_some_and(|dialog| dialog.intercept_cancel(event));
        if redirect {
            self.request_hide(None);
        }
    }

    fn transition_end(&mut self, event: &Event) {
        let EventData::Transition { property } = &event.data else {
            return;
        };
        if *property != self.config.animated_property || event.target != self.roles.panel {
            tracing::trace!("ignoring transition end of {} on {}", property, event.target);
            return;
        }
        let Some((kind, timer)) = self.panel.settling() else {
            tracing::trace!("transition end with nothing to settle");
            return;
        };
        self.host.cancel_timer(timer);
        tracing::debug!("transition end settles {:?}", kind);
        self.settle();
    }

    fn attribute_changed(&mut self, event: &Event) {
        if event.target != self.roles.root {
            return;
        }
        if let EventData::Attribute { name, value } = &event.data {
            if name == MAX_DISPLAY_WIDTH_ATTR {
                self.set_max_display_width(DisplayWidth::parse_attr(value.as_deref()));
            }
        }
    }

    fn request_hide(&mut self, trigger: Option<ElementId>) {
        if let Err(err) = self.hide(trigger) {
            tracing::debug!("hide refused: {}", err);
        }
    }

    fn settle(&mut self) {
        match self.panel.settle() {
            Some(SettleKind::Show) => {
                self.notifier
                    .emit(SheetEventKind::Shown, self.panel.state(), self.panel.trigger());
            }
            Some(SettleKind::Hide) => {
                if let Some(dialog) = self.dialog.as_mut() {
                    dialog.close();
                }
                self.host.set_scroll_lock(false);
                self.host.set_aria_hidden(self.roles.root, true);
                self.host.write_state(self.roles.root, PanelState::Hidden);
                self.notifier
                    .emit(SheetEventKind::Hidden, self.panel.state(), self.panel.trigger());
                if let Some(element) = self.panel.take_return_focus() {
                    self.host.focus(element);
                }
            }
            None => {}
        }
    }

    fn release_drag(&mut self) {
        if self.dragging {
            self.dragging = false;
            self.host.set_dragging(self.roles.panel, false);
        }
    }

    fn snap_back(&mut self) {
        let state = self.panel.state();
        self.host
            .write_transform(self.roles.panel, state.resting_transform());
    }

    /// Arm the resize throttle; only an open, settled panel can be forced shut
    fn schedule_width_check(&mut self) {
        let state = self.panel.state();
        if state != PanelState::Shown {
            tracing::trace!("width change while {}; not checking", state);
            return;
        }
        if self.resize_timer.is_none() {
            let timer = self.host.start_timer(self.config.resize_throttle());
            self.resize_timer = Some(timer);
        }
    }

    fn check_width(&mut self) {
        let width = self.host.viewport_width();
        if !self.config.max_display_width.is_exceeded_by(width) {
            return;
        }
        match self.panel.state() {
            PanelState::Shown => {
                tracing::debug!(
                    "viewport {}px exceeds {}; hiding",
                    width,
                    self.config.max_display_width
                );
                self.request_hide(None);
            }
            state => tracing::debug!("viewport too wide while {}; leaving it", state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::Rect;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tuck_animation::FrameScheduler;

    const ROOT: ElementId = ElementId(1);
    const PANEL: ElementId = ElementId(3);
    const HEADER: ElementId = ElementId(4);
    const CONTENT: ElementId = ElementId(5);
    const BUTTON: ElementId = ElementId(7);

    /// Host that records writes and lets the test pump frames and timers by hand
    struct RecordingHost {
        width: f32,
        scroll_top: f32,
        scheduler: FrameScheduler,
        transforms: Vec<PanelTransform>,
        states: Vec<PanelState>,
        scroll_locked: bool,
        aria_hidden: bool,
        focused: Option<ElementId>,
    }

    impl RecordingHost {
        fn new(width: f32) -> Self {
            Self {
                width,
                scroll_top: 0.0,
                scheduler: FrameScheduler::new(),
                transforms: Vec::new(),
                states: Vec::new(),
                scroll_locked: false,
                aria_hidden: false,
                focused: None,
            }
        }
    }

    impl SheetHost for RecordingHost {
        fn viewport_width(&self) -> f32 {
            self.width
        }

        fn contains(&self, ancestor: ElementId, target: ElementId) -> bool {
            ancestor == target || (ancestor == ROOT && target.0 <= 10 && target != BUTTON)
        }

        fn closest_with_attribute(&self, _target: ElementId, _attribute: &str) -> Option<ElementId> {
            None
        }

        fn scroll_top(&self, _element: ElementId) -> f32 {
            self.scroll_top
        }

        fn write_transform(&mut self, _panel: ElementId, transform: PanelTransform) {
            self.transforms.push(transform);
        }

        fn write_state(&mut self, _root: ElementId, state: PanelState) {
            self.states.push(state);
        }

        fn set_dragging(&mut self, _panel: ElementId, _dragging: bool) {}

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

    struct StubDialog {
        open: bool,
    }

    impl ModalDialog for StubDialog {
        fn element(&self) -> ElementId {
            ElementId(2)
        }

        fn show_modal(&mut self) {
            self.open = true;
        }

        fn close(&mut self) {
            self.open = false;
        }

        fn is_open(&self) -> bool {
            self.open
        }

        fn bounding_box(&self) -> Rect {
            Rect::new(0.0, 400.0, 390.0, 444.0)
        }

        fn backdrop(&self) -> Option<ElementId> {
            Some(ElementId(6))
        }

        fn create_backdrop(&mut self) -> ElementId {
            ElementId(6)
        }
    }

    type Sheet = BottomSheet<RecordingHost, StubDialog>;

    fn sheet(config: SheetConfig) -> Sheet {
        let roles = SheetRoles::new(ROOT, PANEL).header(HEADER).content(CONTENT);
        BottomSheet::attach(
            RecordingHost::new(390.0),
            Some(StubDialog { open: false }),
            roles,
            config,
        )
    }

    fn pump(sheet: &mut Sheet, dt_ms: u64) {
        let tick = sheet.host_mut().scheduler.tick(Duration::from_millis(dt_ms));
        for timer in tick.timers {
            sheet.on_timer(timer);
        }
        for frame in tick.frames {
            sheet.on_frame(frame);
        }
    }

    fn counter(sheet: &mut Sheet, kind: SheetEventKind) -> Arc<AtomicUsize> {
        let count = Arc::new(AtomicUsize::new(0));
        let handle = count.clone();
        sheet.on(kind, move |_| {
            handle.fetch_add(1, Ordering::SeqCst);
        });
        count
    }

    fn open(sheet: &mut Sheet) {
        assert_eq!(sheet.show(Some(BUTTON)), Ok(Request::Started));
        pump(sheet, 16);
        pump(sheet, 16);
        sheet.handle_event(&mut Event::transition_end(PANEL, "transform"));
        assert_eq!(sheet.state(), PanelState::Shown);
    }

    #[test]
    fn test_attach_writes_hidden() {
        let sheet = sheet(SheetConfig::default());
        assert_eq!(sheet.host().states, vec![PanelState::Hidden]);
        assert!(sheet.host().aria_hidden);
        assert_eq!(sheet.roles().backdrop, Some(ElementId(6)));
    }

    #[test]
    fn test_show_commits_after_two_frames() {
        let mut sheet = sheet(SheetConfig::default());
        let shown = counter(&mut sheet, SheetEventKind::Shown);

        sheet.show(Some(BUTTON)).unwrap();
        assert_eq!(sheet.state(), PanelState::Showing);
        assert!(sheet.host().scroll_locked);
        assert!(sheet.dialog().unwrap().open);

        pump(&mut sheet, 16);
        assert_eq!(sheet.state(), PanelState::Showing);
        pump(&mut sheet, 16);
        assert_eq!(sheet.state(), PanelState::Shown);
        assert_eq!(sheet.host().transforms.last(), Some(&PanelTransform::Identity));
        assert_eq!(shown.load(Ordering::SeqCst), 0);

        // Unrelated transitions do not settle it
        sheet.handle_event(&mut Event::transition_end(PANEL, "opacity"));
        sheet.handle_event(&mut Event::transition_end(HEADER, "transform"));
        assert_eq!(shown.load(Ordering::SeqCst), 0);

        sheet.handle_event(&mut Event::transition_end(PANEL, "transform"));
        assert_eq!(shown.load(Ordering::SeqCst), 1);

        // The fallback was cancelled
        pump(&mut sheet, 1000);
        assert_eq!(shown.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_fallback_timer_settles_show() {
        let mut sheet = sheet(SheetConfig::default());
        let shown = counter(&mut sheet, SheetEventKind::Shown);
        sheet.show(None).unwrap();
        pump(&mut sheet, 16);
        pump(&mut sheet, 16);
        pump(&mut sheet, 699);
        assert_eq!(shown.load(Ordering::SeqCst), 0);
        pump(&mut sheet, 1);
        assert_eq!(shown.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_too_wide_refuses_silently() {
        let config = SheetConfig::default().with_max_display_width(DisplayWidth::Max(300.0));
        let mut sheet = sheet(config);
        let before = counter(&mut sheet, SheetEventKind::BeforeShow);
        assert_eq!(
            sheet.show(None),
            Err(PanelError::TooWide {
                width: 390.0,
                max: 300.0
            })
        );
        assert_eq!(before.load(Ordering::SeqCst), 0);
        assert_eq!(sheet.state(), PanelState::Hidden);
    }

    #[test]
    fn test_hide_returns_focus_to_trigger() {
        let mut sheet = sheet(SheetConfig::default());
        open(&mut sheet);

        assert_eq!(sheet.hide(None), Ok(Request::Started));
        assert_eq!(sheet.state(), PanelState::Hiding);
        assert_eq!(sheet.show(None), Err(PanelError::Busy { state: PanelState::Hiding }));

        sheet.handle_event(&mut Event::transition_end(PANEL, "transform"));
        assert_eq!(sheet.state(), PanelState::Hidden);
        assert!(!sheet.host().scroll_locked);
        assert!(sheet.host().aria_hidden);
        assert!(!sheet.dialog().unwrap().open);
        assert_eq!(sheet.host().focused, Some(BUTTON));
    }

    #[test]
    fn test_hide_flushes_pending_shown() {
        let mut sheet = sheet(SheetConfig::default());
        let shown = counter(&mut sheet, SheetEventKind::Shown);
        sheet.show(None).unwrap();
        pump(&mut sheet, 16);
        pump(&mut sheet, 16);

        sheet.hide(None).unwrap();
        assert_eq!(shown.load(Ordering::SeqCst), 1);
        pump(&mut sheet, 1000);
        assert_eq!(shown.load(Ordering::SeqCst), 1);
        assert_eq!(sheet.state(), PanelState::Hidden);
    }

    #[test]
    fn test_drag_intercepts_and_snaps_back() {
        let mut sheet = sheet(SheetConfig::default());
        open(&mut sheet);

        sheet.handle_event(&mut Event::touch_start(HEADER, 100.0, 500.0));
        let mut mv = Event::touch_move(HEADER, 100.0, 560.0);
        sheet.handle_event(&mut mv);
        assert!(mv.default_prevented);
        assert!(mv.propagation_stopped);
        assert_eq!(sheet.host().transforms.last(), Some(&PanelTransform::Offset(60.0)));

        sheet.handle_event(&mut Event::touch_end(HEADER));
        assert_eq!(sheet.state(), PanelState::Shown);
        assert_eq!(sheet.host().transforms.last(), Some(&PanelTransform::Identity));
    }

    #[test]
    fn test_scrolled_content_never_moves_panel() {
        let mut sheet = sheet(SheetConfig::default());
        open(&mut sheet);
        sheet.host_mut().scroll_top = 120.0;
        let writes = sheet.host().transforms.len();

        sheet.handle_event(&mut Event::touch_start(CONTENT, 100.0, 500.0));
        let mut mv = Event::touch_move(CONTENT, 100.0, 700.0);
        sheet.handle_event(&mut mv);
        sheet.handle_event(&mut Event::touch_end(CONTENT));

        assert!(!mv.default_prevented);
        assert_eq!(sheet.host().transforms.len(), writes);
        assert_eq!(sheet.state(), PanelState::Shown);
    }

    #[test]
    fn test_cancelled_dismiss_snaps_back() {
        let mut sheet = sheet(SheetConfig::default());
        open(&mut sheet);
        sheet.on(SheetEventKind::BeforeHide, |event| event.prevent_default());

        sheet.handle_event(&mut Event::touch_start(HEADER, 100.0, 500.0));
        sheet.handle_event(&mut Event::touch_move(HEADER, 100.0, 700.0));
        sheet.handle_event(&mut Event::touch_end(HEADER));

        assert_eq!(sheet.state(), PanelState::Shown);
        assert_eq!(sheet.host().transforms.last(), Some(&PanelTransform::Identity));
    }

    #[test]
    fn test_resize_only_counts_once_shown() {
        let config = SheetConfig::default().with_max_display_width(DisplayWidth::Max(600.0));
        let mut sheet = sheet(config);

        sheet.show(None).unwrap();
        sheet.host_mut().width = 700.0;
        sheet.handle_event(&mut Event::resize(ROOT, 700.0, 844.0));
        pump(&mut sheet, 16);
        pump(&mut sheet, 16);
        pump(&mut sheet, 200);
        assert_eq!(sheet.state(), PanelState::Shown);

        sheet.handle_event(&mut Event::resize(ROOT, 700.0, 844.0));
        sheet.handle_event(&mut Event::resize(ROOT, 710.0, 844.0));
        pump(&mut sheet, 99);
        assert_eq!(sheet.state(), PanelState::Shown);
        pump(&mut sheet, 1);
        assert_eq!(sheet.state(), PanelState::Hiding);
    }

    #[test]
    fn test_attribute_change_updates_threshold() {
        let mut sheet = sheet(SheetConfig::default());
        sheet.handle_event(&mut Event::attribute_changed(
            ROOT,
            MAX_DISPLAY_WIDTH_ATTR,
            Some("320px".to_string()),
        ));
        assert_eq!(sheet.config().max_display_width, DisplayWidth::Max(320.0));
        assert!(matches!(sheet.show(None), Err(PanelError::TooWide { .. })));
    }

    #[test]
    fn test_dialog_listener_removal_leaves_sheet_listeners() {
        let mut sheet = sheet(SheetConfig::default());
        let before = Arc::new(AtomicUsize::new(0));
        let handle = before.clone();
        let sheet_id = sheet.on(SheetEventKind::BeforeShow, move |_| {
            handle.fetch_add(1, Ordering::SeqCst);
        });
        let opened = Arc::new(AtomicUsize::new(0));
        let handle = opened.clone();
        let dialog_id = sheet
            .on_dialog(DialogLifecycle::Opened, move |_| {
                handle.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        assert!(sheet.off_dialog(dialog_id));
        assert!(!sheet.off_dialog(dialog_id));
        open(&mut sheet);
        assert_eq!(before.load(Ordering::SeqCst), 1);
        assert_eq!(opened.load(Ordering::SeqCst), 0);

        sheet.hide(None).unwrap();
        sheet.handle_event(&mut Event::transition_end(PANEL, "transform"));
        assert!(sheet.off(sheet_id));
        open(&mut sheet);
        assert_eq!(before.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_without_dialog_is_inert() {
        let roles = SheetRoles::new(ROOT, PANEL).header(HEADER);
        let mut sheet: Sheet =
            BottomSheet::attach(RecordingHost::new(390.0), None, roles, SheetConfig::default());
        assert!(sheet.is_inert());
        assert!(matches!(sheet.show(None), Err(PanelError::Inert(_))));
        assert!(matches!(sheet.hide(None), Err(PanelError::Inert(_))));

        let mut cancel = Event::dialog_cancel(ElementId(2));
        sheet.handle_event(&mut cancel);
        assert!(!cancel.default_prevented);
    }

    #[test]
    fn test_detach_abandons_show() {
        let mut sheet = sheet(SheetConfig::default());
        let shown = counter(&mut sheet, SheetEventKind::Shown);
        sheet.show(None).unwrap();
        sheet.detach();

        pump(&mut sheet, 16);
        pump(&mut sheet, 1000);
        assert_eq!(sheet.state(), PanelState::Hidden);
        assert_eq!(shown.load(Ordering::SeqCst), 0);
        assert!(!sheet.host().scroll_locked);
        assert!(matches!(sheet.show(None), Err(PanelError::Inert(_))));
    }
}
