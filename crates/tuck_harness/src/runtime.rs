//! Deterministic driver for a headless sheet

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tuck_core::{ElementId, Event};
use tuck_sheet::{
    BottomSheet, PanelError, PanelState, Request, SheetConfig, SheetEvent, SheetEventKind,
};

use crate::headless::{elements, HeadlessConfig, HeadlessDialog, HeadlessHost};

/// Logical milliseconds between frames
pub const DEFAULT_TICK_MS: u64 = 16;

type Recorded = Arc<Mutex<Vec<SheetEvent>>>;
type Prevent = Arc<Mutex<Option<SheetEventKind>>>;

/// A [`BottomSheet`] on a [`HeadlessHost`] plus a virtual clock
///
/// Every notification is recorded. Time only moves through [`tick`](Self::tick)
/// and [`wait`](Self::wait); each tick delivers due timers, then due frames,
/// then renders and feeds transition ends back to the sheet.
pub struct HeadlessSheet {
    sheet: BottomSheet<HeadlessHost, HeadlessDialog>,
    notifications: Recorded,
    prevent_next: Prevent,
    tick: Duration,
    touch: Option<(ElementId, f32)>,
    elapsed_frames: u64,
}

impl HeadlessSheet {
    pub fn new(config: HeadlessConfig, sheet_config: SheetConfig) -> Self {
        let dialog = HeadlessDialog::new(&config);
        Self::build(config, Some(dialog), sheet_config)
    }

    /// A sheet whose document lacks the dialog element
    pub fn without_dialog(config: HeadlessConfig, sheet_config: SheetConfig) -> Self {
        Self::build(config, None, sheet_config)
    }

    fn build(config: HeadlessConfig, dialog: Option<HeadlessDialog>, sheet_config: SheetConfig) -> Self {
        let roles = config.roles();
        let host = HeadlessHost::new(config);
        let mut sheet = BottomSheet::attach(host, dialog, roles, sheet_config);

        let prevent_next: Prevent = Arc::new(Mutex::new(None));
        for kind in [SheetEventKind::BeforeShow, SheetEventKind::BeforeHide] {
            let pending = prevent_next.clone();
            sheet.on(kind, move |event| {
                let mut pending = pending.lock().unwrap_or_else(PoisonError::into_inner);
                if *pending == Some(event.kind) {
                    *pending = None;
                    event.prevent_default();
                }
            });
        }

        let notifications: Recorded = Arc::new(Mutex::new(Vec::new()));
        for kind in SheetEventKind::ALL {
            let log = notifications.clone();
            sheet.on(kind, move |event| {
                log.lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(event.clone());
            });
        }

        Self {
            sheet,
            notifications,
            prevent_next,
            tick: Duration::from_millis(DEFAULT_TICK_MS),
            touch: None,
            elapsed_frames: 0,
        }
    }

    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    pub fn sheet(&self) -> &BottomSheet<HeadlessHost, HeadlessDialog> {
        &self.sheet
    }

    pub fn sheet_mut(&mut self) -> &mut BottomSheet<HeadlessHost, HeadlessDialog> {
        &mut self.sheet
    }

    pub fn host(&self) -> &HeadlessHost {
        self.sheet.host()
    }

    pub fn state(&self) -> PanelState {
        self.sheet.state()
    }

    /// Rendered panel displacement; 0 is fully open
    pub fn offset(&self) -> f32 {
        self.host().panel_offset()
    }

    pub fn elapsed_frames(&self) -> u64 {
        self.elapsed_frames
    }

    pub fn elapsed(&self) -> Duration {
        self.host().now()
    }

    /// Every notification so far, oldest first
    pub fn notifications(&self) -> Vec<SheetEvent> {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn notification_kinds(&self) -> Vec<SheetEventKind> {
        self.notifications().into_iter().map(|event| event.kind).collect()
    }

    pub fn count(&self, kind: SheetEventKind) -> usize {
        self.notifications()
            .iter()
            .filter(|event| event.kind == kind)
            .count()
    }

    pub fn clear_notifications(&mut self) {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Have the next before-show or before-hide listener call prevent_default
    pub fn prevent_next(&mut self, kind: SheetEventKind) {
        *self.prevent_next.lock().unwrap_or_else(PoisonError::into_inner) = Some(kind);
    }

    pub fn show(&mut self, trigger: Option<ElementId>) -> Result<Request, PanelError> {
        self.sheet.show(trigger)
    }

    pub fn hide(&mut self, trigger: Option<ElementId>) -> Result<Request, PanelError> {
        self.sheet.hide(trigger)
    }

    /// Show from the trigger button and wait for `shown`
    pub fn open(&mut self) -> Result<Request, PanelError> {
        let request = self.show(Some(elements::TRIGGER))?;
        self.wait(Duration::from_millis(1000));
        Ok(request)
    }

    pub fn dispatch(&mut self, mut event: Event) -> Event {
        self.sheet.handle_event(&mut event);
        event
    }

    pub fn touch_start(&mut self, target: ElementId, y: f32) -> Event {
        self.touch = Some((target, y));
        self.dispatch(Event::touch_start(target, 0.0, y))
    }

    /// Move the active touch; unconsumed moves over the content scroll it
    pub fn touch_move(&mut self, y: f32) -> Event {
        let (target, last_y) = self.touch.unwrap_or((elements::ROOT, y));
        self.touch = Some((target, y));
        let event = self.dispatch(Event::touch_move(target, 0.0, y));
        if !event.default_prevented && self.host().contains_content(target) {
            // Finger moving up scrolls further into the content
            self.sheet.host_mut().scroll_content_by(last_y - y);
        }
        event
    }

    pub fn touch_end(&mut self) -> Event {
        let target = self.touch.take().map_or(elements::ROOT, |(target, _)| target);
        self.dispatch(Event::touch_end(target))
    }

    pub fn touch_cancel(&mut self) -> Event {
        let target = self.touch.take().map_or(elements::ROOT, |(target, _)| target);
        self.dispatch(Event::touch_cancel(target))
    }

    /// Start, move and release in one go
    pub fn drag(&mut self, target: ElementId, from_y: f32, to_y: f32) -> Event {
        self.touch_start(target, from_y);
        self.touch_move(to_y);
        self.touch_end()
    }

    pub fn scroll_content(&mut self, top: f32) {
        self.sheet.host_mut().scroll_content_to(top);
    }

    pub fn resize(&mut self, width: f32) -> Event {
        self.sheet.host_mut().set_viewport_width(width);
        let height = self.host().config().height;
        self.dispatch(Event::resize(elements::ROOT, width, height))
    }

    pub fn set_attribute(&mut self, name: &str, value: Option<&str>) -> Event {
        self.dispatch(Event::attribute_changed(
            elements::ROOT,
            name,
            value.map(str::to_string),
        ))
    }

    pub fn click(&mut self, target: ElementId, x: f32, y: f32) -> Event {
        self.dispatch(Event::click(target, x, y))
    }

    /// Click the backdrop area above the panel
    pub fn click_backdrop(&mut self) -> Event {
        self.click(elements::BACKDROP, 10.0, 10.0)
    }

    /// Escape key on the modal dialog
    pub fn escape(&mut self) -> Event {
        self.dispatch(Event::dialog_cancel(elements::DIALOG))
    }

    /// Advance one frame
    pub fn tick(&mut self) {
        self.advance(self.tick);
    }

    pub fn ticks(&mut self, frames: u32) {
        for _ in 0..frames {
            self.tick();
        }
    }

    /// Advance `duration` in frame-sized steps; the last step may be shorter
    pub fn wait(&mut self, duration: Duration) {
        let mut remaining = duration;
        while !remaining.is_zero() {
            let step = remaining.min(self.tick);
            self.advance(step);
            remaining -= step;
        }
    }

    fn advance(&mut self, dt: Duration) {
        let due = self.sheet.host_mut().scheduler_mut().tick(dt);
        for timer in due.timers {
            self.sheet.on_timer(timer);
        }
        for frame in due.frames {
            self.sheet.on_frame(frame);
        }
        let ended = self.sheet.host_mut().render(dt);
        for mut event in ended {
            self.sheet.handle_event(&mut event);
        }
        self.elapsed_frames += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_runs_full_show() {
        let mut harness = HeadlessSheet::new(HeadlessConfig::default(), SheetConfig::default());
        assert_eq!(harness.open(), Ok(Request::Started));
        assert_eq!(harness.state(), PanelState::Shown);
        assert_eq!(harness.offset(), 0.0);
        assert_eq!(
            harness.notification_kinds(),
            vec![SheetEventKind::BeforeShow, SheetEventKind::Shown]
        );
    }

    #[test]
    fn test_prevent_next_applies_once() {
        let mut harness = HeadlessSheet::new(HeadlessConfig::default(), SheetConfig::default());
        harness.prevent_next(SheetEventKind::BeforeShow);
        assert_eq!(harness.show(None), Ok(Request::Cancelled));
        assert_eq!(harness.show(None), Ok(Request::Started));
    }

    #[test]
    fn test_wait_uses_partial_last_step() {
        let mut harness = HeadlessSheet::new(HeadlessConfig::default(), SheetConfig::default());
        harness.wait(Duration::from_millis(40));
        assert_eq!(harness.elapsed_frames(), 3);
        assert_eq!(harness.elapsed(), Duration::from_millis(40));
    }
}
