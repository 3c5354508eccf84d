//! Scroll-driven profile header
//!
//! Turns the scroll offset of a list into the collapse state of a large
//! profile header (avatar, name, bio) that merges into the navigation bar
//! title:
//!
//! - `progress` in `[0, 1]`: 0 fully shown, 1 fully collapsed
//! - `offset`: vertical translation of the header, `0` when shown and
//!   `-max_offset` once the title has reached the navigation bar
//!
//! When scrolling stops with the header half collapsed, the controller snaps
//! the list to whichever rest state is nearer.
//!
//! # Example
//!
//! ```rust
//! use navbar_core::Rect;
//! use navbar_layout::prelude::*;
//!
//! let mut header = ScrollProfileController::new(ProfileHeaderConfig::default());
//! header.set_title_rect(Rect::new(16.0, 136.0, 240.0, 24.0));
//! header.set_profile_height(120.0);
//!
//! header.report_scroll_offset(60.0);
//! assert_eq!(header.progress(), 0.5);
//! assert_eq!(header.offset(), -60.0);
//! ```
//!
//! All entry points must be called from the thread that created the
//! controller; debug builds assert this.

use std::time::Duration;

use navbar_animation::{Cooldown, Debouncer, TimerScheduler};
use navbar_core::events::event_types;
use navbar_core::{
    CoordinateSpace, Event, EventData, MeasuredRegion, Observable, Rect, SubscriptionId,
    ThreadAffinity,
};

use crate::config::ProfileHeaderConfig;
use crate::scroll::ScrollableHandle;

/// Coordinate space name the header measures its title in
pub const HEADER_SPACE: &str = "navbar_profile_header";

// ============================================================================
// State
// ============================================================================

/// Scroll position as seen by the header
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollMetrics {
    /// Offset reported by the container
    pub raw_offset_y: f32,
    /// Offset the container rests at (negated content inset)
    pub top_inset: f32,
    /// `raw_offset_y - top_inset`: 0 with the list at its top
    pub normalized_offset: f32,
}

/// Measured header geometry
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProfileLayout {
    /// Username frame, header-local
    pub title_rect: Rect,
    /// Header height; `None` until the first layout pass
    pub profile_height: Option<f32>,
    /// Header top edge in global space
    pub header_global_min_y: Option<f32>,
}

impl ProfileLayout {
    /// Height, treating zero as not yet measured
    pub fn measured_height(&self) -> Option<f32> {
        self.profile_height.filter(|h| *h != 0.0)
    }
}

/// Values driving the header's visual transform
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DerivedState {
    pub progress: f32,
    pub offset: f32,
}

/// Rest position chosen when scrolling settled mid-collapse
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapTarget {
    /// Normalized offset to rest at: 0 (shown) or the header height (collapsed)
    pub target_offset: f32,
}

/// Observable outputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DerivedField {
    Progress,
    Offset,
}

/// Returned by [`ScrollProfileController::on_change`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription {
    field: DerivedField,
    id: SubscriptionId,
}

impl Subscription {
    pub fn field(&self) -> DerivedField {
        self.field
    }
}

/// Interaction phase of the header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HeaderPhase {
    #[default]
    Idle,
    /// Offsets are arriving; a settle check is pending
    Scrolling,
    /// A snap was issued and its cool-down is running
    Snapping,
}

/// Header phase events
pub mod header_events {
    pub const SCROLL: u32 = navbar_core::events::event_types::SCROLL;
    pub const SETTLED: u32 = 100;
    pub const SNAP: u32 = 101;
    pub const COOLDOWN_ELAPSED: u32 = 102;
}

impl HeaderPhase {
    /// Transition for `event`, or `None` if the event does not apply
    pub fn on_event(&self, event: u32) -> Option<Self> {
        use header_events::*;
        match (self, event) {
            (HeaderPhase::Idle, SCROLL) => Some(HeaderPhase::Scrolling),
            (HeaderPhase::Scrolling, SETTLED) => Some(HeaderPhase::Idle),
            (HeaderPhase::Idle | HeaderPhase::Scrolling, SNAP) => Some(HeaderPhase::Snapping),
            (HeaderPhase::Snapping, COOLDOWN_ELAPSED) => Some(HeaderPhase::Idle),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeaderTimer {
    Settle,
    SnapCooldown,
}

// ============================================================================
// Controller
// ============================================================================

/// Scroll-offset to header-collapse state machine
pub struct ScrollProfileController {
    config: ProfileHeaderConfig,
    metrics: ScrollMetrics,
    layout: ProfileLayout,
    progress: Observable<f32>,
    offset: Observable<f32>,
    phase: HeaderPhase,
    handle: Option<ScrollableHandle>,
    timers: TimerScheduler<HeaderTimer>,
    settle: Debouncer,
    snap_cooldown: Cooldown,
    affinity: ThreadAffinity,
}

impl ScrollProfileController {
    pub fn new(config: ProfileHeaderConfig) -> Self {
        Self {
            settle: Debouncer::new(config.settle_debounce()),
            snap_cooldown: Cooldown::new(config.snap_cooldown()),
            config,
            metrics: ScrollMetrics::default(),
            layout: ProfileLayout::default(),
            progress: Observable::new(0.0),
            offset: Observable::new(0.0),
            phase: HeaderPhase::Idle,
            handle: None,
            timers: TimerScheduler::new(),
            affinity: ThreadAffinity::current(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn config(&self) -> &ProfileHeaderConfig {
        &self.config
    }

    pub fn metrics(&self) -> ScrollMetrics {
        self.metrics
    }

    pub fn layout(&self) -> ProfileLayout {
        self.layout
    }

    pub fn progress(&self) -> f32 {
        self.progress.value()
    }

    pub fn offset(&self) -> f32 {
        self.offset.value()
    }

    pub fn derived(&self) -> DerivedState {
        DerivedState {
            progress: self.progress(),
            offset: self.offset(),
        }
    }

    pub fn phase(&self) -> HeaderPhase {
        self.phase
    }

    /// Whether a snap is in flight
    pub fn is_snapping(&self) -> bool {
        self.snap_cooldown.is_active()
    }

    /// Whether a live scroll container is bound
    pub fn is_bound(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| h.is_alive())
    }

    pub fn handle(&self) -> Option<&ScrollableHandle> {
        self.handle.as_ref()
    }

    /// Height of the backdrop painted behind the navigation bar once collapsed
    pub fn nav_backdrop_height(&self) -> f32 {
        self.layout.header_global_min_y.unwrap_or(0.0).max(0.0)
    }

    /// Translation at which the title lines up with the navigation bar
    pub fn max_offset(&self) -> f32 {
        let title = self.layout.title_rect;
        title.max_y() + (self.config.nav_bar_height - title.height()) / 2.0
    }

    // =========================================================================
    // Observation
    // =========================================================================

    /// Observe one of the derived values. Observers run in subscription
    /// order and only on actual changes.
    pub fn on_change<F>(&mut self, field: DerivedField, mut callback: F) -> Subscription
    where
        F: FnMut(f32) + 'static,
    {
        let cell = match field {
            DerivedField::Progress => &mut self.progress,
            DerivedField::Offset => &mut self.offset,
        };
        let id = cell.subscribe(move |value| callback(*value));
        Subscription { field, id }
    }

    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        match subscription.field {
            DerivedField::Progress => self.progress.unsubscribe(subscription.id),
            DerivedField::Offset => self.offset.unsubscribe(subscription.id),
        }
    }

    // =========================================================================
    // Inputs
    // =========================================================================

    /// Feed a raw content offset from the scroll container.
    ///
    /// Changes within the dead zone are dropped entirely. Returns whether the
    /// offset was accepted.
    pub fn report_scroll_offset(&mut self, raw_y: f32) -> bool {
        self.affinity.check("report_scroll_offset");

        let new_value = raw_y - self.metrics.top_inset;
        if (new_value - self.metrics.normalized_offset).abs() <= self.config.dead_zone {
            return false;
        }

        self.metrics.raw_offset_y = raw_y;
        self.metrics.normalized_offset = new_value;
        self.transition(header_events::SCROLL);
        tracing::trace!(
            "scroll offset raw={:.1} normalized={:.1}",
            raw_y,
            new_value
        );

        self.recompute();
        self.settle.poke(&mut self.timers, HeaderTimer::Settle);
        true
    }

    /// Recompute the derived state; observers hear only about values that
    /// changed. Returns whether anything changed.
    pub fn recompute(&mut self) -> bool {
        let derived = self.compute_derived();
        let progress_changed = self.progress.set(derived.progress);
        let offset_changed = self.offset.set(derived.offset);
        progress_changed || offset_changed
    }

    /// Derived state for the current metrics and layout
    pub fn compute_derived(&self) -> DerivedState {
        let Some(height) = self.layout.measured_height() else {
            return DerivedState::default();
        };

        let normalized = self.metrics.normalized_offset;
        let offset = -normalized.min(self.max_offset());
        DerivedState {
            progress: (normalized / height).clamp(0.0, 1.0),
            // Avoid handing out -0.0
            offset: if offset == 0.0 { 0.0 } else { offset },
        }
    }

    pub fn set_profile_height(&mut self, height: f32) {
        self.affinity.check("set_profile_height");
        if self.layout.profile_height == Some(height) {
            return;
        }
        tracing::debug!("profile height {:?} -> {:.1}", self.layout.profile_height, height);
        self.layout.profile_height = Some(height);
        self.recompute();
    }

    pub fn set_title_rect(&mut self, rect: Rect) {
        self.affinity.check("set_title_rect");
        if self.layout.title_rect == rect {
            return;
        }
        tracing::debug!("title rect -> {:?}", rect);
        self.layout.title_rect = rect;
        self.recompute();
    }

    /// Layout measurement callback.
    ///
    /// Title frames are expected in [`HEADER_SPACE`]; a global title frame is
    /// converted using the last measured header position. Header frames give
    /// the header height, and its global position when measured globally.
    pub fn report_frame(&mut self, region: MeasuredRegion, rect: Rect, space: CoordinateSpace) {
        match region {
            MeasuredRegion::Header => {
                if space == CoordinateSpace::Global {
                    self.layout.header_global_min_y = Some(rect.min_y());
                }
                self.set_profile_height(rect.height());
            }
            MeasuredRegion::Title => match space {
                CoordinateSpace::Named(_) if space.is_named(HEADER_SPACE) => {
                    self.set_title_rect(rect)
                }
                CoordinateSpace::Global => match self.layout.header_global_min_y {
                    Some(header_y) => self.set_title_rect(rect.offset_by(0.0, -header_y)),
                    None => tracing::debug!(
                        "global title frame dropped: header position not measured yet"
                    ),
                },
                CoordinateSpace::Named(other) => {
                    tracing::debug!("title frame in unrelated space `{}` dropped", other)
                }
            },
        }
    }

    /// Dispatch a host event
    pub fn handle_event(&mut self, event: &Event) {
        match (event.event_type, &event.data) {
            (event_types::SCROLL, EventData::ScrollOffset { y }) => {
                self.report_scroll_offset(*y);
            }
            (
                event_types::LAYOUT,
                EventData::Frame {
                    region,
                    rect,
                    space,
                },
            ) => self.report_frame(*region, *rect, *space),
            (event_types::UNMOUNT, _) => self.unbind(),
            _ => {}
        }
    }

    // =========================================================================
    // Scroll container binding
    // =========================================================================

    /// Bind the scroll container found by introspection.
    ///
    /// Rebinding the container already bound is a no-op. Returns whether a
    /// new container was bound.
    pub fn bind(&mut self, handle: ScrollableHandle) -> bool {
        self.affinity.check("bind");
        if self
            .handle
            .as_ref()
            .is_some_and(|current| current.same_container(&handle))
        {
            return false;
        }

        let Some(inset) = handle.content_inset_top() else {
            tracing::debug!("bind ignored: scroll container already torn down");
            return false;
        };

        tracing::debug!("bound scroll container at {:?} (inset {:.1})", handle.node(), inset);
        self.metrics.top_inset = -inset;
        let current = handle.offset_y();
        self.handle = Some(handle);

        match current {
            Some(y) => self.sync_scroll_offset(y),
            None => {
                self.metrics.normalized_offset =
                    self.metrics.raw_offset_y - self.metrics.top_inset;
                self.recompute();
            }
        }
        true
    }

    /// Adopt an offset exactly, bypassing the dead zone and without starting
    /// a settle check. Used when a container is bound and when a
    /// programmatic scroll comes to rest.
    pub fn sync_scroll_offset(&mut self, raw_y: f32) {
        self.affinity.check("sync_scroll_offset");
        self.metrics.raw_offset_y = raw_y;
        self.metrics.normalized_offset = raw_y - self.metrics.top_inset;
        self.recompute();
    }

    /// Alias for [`bind`](Self::bind)
    pub fn set_scrollable_handle(&mut self, handle: ScrollableHandle) -> bool {
        self.bind(handle)
    }

    /// Forget the container (unmount). Pending settle checks are dropped.
    pub fn unbind(&mut self) {
        self.affinity.check("unbind");
        if self.handle.take().is_some() {
            tracing::debug!("scroll container unbound");
        }
        self.settle.cancel(&mut self.timers);
    }

    // =========================================================================
    // Settling
    // =========================================================================

    /// Advance the controller clock, running settle checks and cool-down
    /// releases that came due. Returns the snap issued during this tick.
    pub fn advance(&mut self, dt: Duration) -> Option<SnapTarget> {
        self.affinity.check("advance");
        let mut issued = None;
        for timer in self.timers.advance(dt) {
            match timer {
                HeaderTimer::Settle => {
                    self.settle.fired();
                    if let Some(snap) = self.on_scroll_settled() {
                        issued = Some(snap);
                    }
                }
                HeaderTimer::SnapCooldown => {
                    self.snap_cooldown.release();
                    self.transition(header_events::COOLDOWN_ELAPSED);
                    // Offsets arrived during the snap; their settle check is still due
                    if self.settle.is_pending(&self.timers) {
                        self.transition(header_events::SCROLL);
                    }
                    tracing::trace!("snap cool-down elapsed");
                }
            }
        }
        issued
    }

    /// Rest position for the current offset, or `None` when the header is
    /// already at rest (or not measured).
    ///
    /// Offsets below `height * snap_threshold` snap open; the threshold
    /// itself snaps collapsed.
    pub fn snap_target(&self) -> Option<SnapTarget> {
        let height = self.layout.measured_height()?;
        let normalized = self.metrics.normalized_offset;
        if normalized <= 0.0 || normalized >= height {
            return None;
        }
        let target_offset = if normalized < height * self.config.snap_threshold {
            0.0
        } else {
            height
        };
        Some(SnapTarget { target_offset })
    }

    /// Scrolling went quiet: snap a half-collapsed header to the nearer rest
    /// state. Dropped while a previous snap is in flight.
    pub fn on_scroll_settled(&mut self) -> Option<SnapTarget> {
        self.affinity.check("on_scroll_settled");
        if self.snap_cooldown.is_active() {
            tracing::trace!("settle ignored: snap in flight");
            return None;
        }

        let Some(snap) = self.snap_target() else {
            self.transition(header_events::SETTLED);
            return None;
        };

        let Some(handle) = self.handle.as_ref().filter(|h| h.is_alive()) else {
            tracing::debug!("snap to {:.1} skipped: no live scroll container", snap.target_offset);
            self.transition(header_events::SETTLED);
            return None;
        };

        let command_y = snap.target_offset + self.metrics.top_inset;
        if !handle.scroll_to(command_y, self.config.snap_animated) {
            self.transition(header_events::SETTLED);
            return None;
        }

        self.snap_cooldown
            .try_acquire(&mut self.timers, HeaderTimer::SnapCooldown);
        self.transition(header_events::SNAP);
        tracing::debug!(
            "snapping from {:.1} to {:.1}",
            self.metrics.normalized_offset,
            snap.target_offset
        );
        Some(snap)
    }

    fn transition(&mut self, event: u32) {
        if let Some(next) = self.phase.on_event(event) {
            self.phase = next;
        }
    }
}

impl Default for ScrollProfileController {
    fn default() -> Self {
        Self::new(ProfileHeaderConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scroll::{ScrollContainer, ScrollTarget, SharedScrollTarget};
    use crate::tree::{NodeKind, ViewTree};
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::{Arc, Mutex};

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    /// Title bottom at 40 and nav bar height equal to the title height:
    /// max_offset = 40
    fn controller(height: f32) -> ScrollProfileController {
        let config = ProfileHeaderConfig {
            nav_bar_height: 20.0,
            ..Default::default()
        };
        let mut c = ScrollProfileController::new(config);
        c.set_title_rect(Rect::new(0.0, 20.0, 100.0, 20.0));
        c.set_profile_height(height);
        c
    }

    fn bound(height: f32, inset: f32) -> (ScrollProfileController, Arc<Mutex<ScrollContainer>>) {
        let mut container = ScrollContainer::default();
        container.set_content_inset_top(inset);
        container.set_content_size(5000.0, 800.0);
        let concrete = Arc::new(Mutex::new(container));
        let shared: SharedScrollTarget = concrete.clone();

        let mut tree = ViewTree::new();
        let node = tree.create_node(NodeKind::Scrollable);
        let mut c = controller(height);
        assert!(c.bind(ScrollableHandle::from_shared(node, &shared)));
        (c, concrete)
    }

    #[test]
    fn test_unmeasured_layout_yields_zero() {
        let mut c = ScrollProfileController::default();
        c.report_scroll_offset(50.0);
        assert_eq!(c.derived(), DerivedState::default());

        c.set_profile_height(0.0);
        assert_eq!(c.derived(), DerivedState::default());
    }

    #[test]
    fn test_progress_and_offset() {
        let mut c = controller(100.0);
        c.report_scroll_offset(25.0);
        assert_eq!(c.progress(), 0.25);
        assert_eq!(c.offset(), -25.0);

        // Offset stops at max_offset, progress keeps going
        c.report_scroll_offset(80.0);
        assert_eq!(c.progress(), 0.8);
        assert_eq!(c.offset(), -40.0);

        c.report_scroll_offset(250.0);
        assert_eq!(c.progress(), 1.0);
        assert_eq!(c.offset(), -40.0);
    }

    #[test]
    fn test_max_offset_centers_title_in_nav_bar() {
        let config = ProfileHeaderConfig {
            nav_bar_height: 91.0,
            ..Default::default()
        };
        let mut c = ScrollProfileController::new(config);
        c.set_title_rect(Rect::new(16.0, 136.0, 240.0, 24.0));
        assert_eq!(c.max_offset(), 160.0 + (91.0 - 24.0) / 2.0);
    }

    #[test]
    fn test_dead_zone_leaves_state_untouched() {
        let mut c = controller(100.0);
        assert!(c.report_scroll_offset(10.0));
        let before = c.metrics();

        assert!(!c.report_scroll_offset(10.4));
        assert!(!c.report_scroll_offset(9.6));
        assert_eq!(c.metrics(), before);
        assert_eq!(c.progress(), 0.1);

        assert!(c.report_scroll_offset(10.5));
    }

    #[test]
    fn test_overscroll_keeps_progress_at_zero() {
        let mut c = controller(100.0);
        c.report_scroll_offset(-30.0);
        assert_eq!(c.progress(), 0.0);
        // Header follows the pull-down
        assert_eq!(c.offset(), 30.0);
    }

    #[test]
    fn test_no_duplicate_notifications() {
        let mut c = controller(100.0);
        let calls = Rc::new(RefCell::new(Vec::new()));
        let calls_clone = calls.clone();
        c.on_change(DerivedField::Progress, move |p| calls_clone.borrow_mut().push(p));

        c.report_scroll_offset(50.0);
        assert!(!c.recompute());
        assert!(!c.recompute());
        c.set_profile_height(100.0);
        assert_eq!(*calls.borrow(), vec![0.5]);
    }

    #[test]
    fn test_unsubscribe() {
        let mut c = controller(100.0);
        let count = Rc::new(RefCell::new(0));
        let count_clone = count.clone();
        let sub = c.on_change(DerivedField::Offset, move |_| *count_clone.borrow_mut() += 1);

        c.report_scroll_offset(10.0);
        assert!(c.unsubscribe(sub));
        c.report_scroll_offset(20.0);
        assert_eq!(*count.borrow(), 1);
        assert_eq!(sub.field(), DerivedField::Offset);
    }

    #[test]
    fn test_snap_rule() {
        let mut c = controller(100.0);
        for (offset, expected) in [(30.0, Some(0.0)), (60.0, Some(100.0)), (50.0, Some(100.0))] {
            c.report_scroll_offset(offset);
            assert_eq!(c.snap_target().map(|s| s.target_offset), expected, "offset {offset}");
        }

        c.report_scroll_offset(0.0);
        assert_eq!(c.snap_target(), None);
        c.report_scroll_offset(100.0);
        assert_eq!(c.snap_target(), None);
        c.report_scroll_offset(140.0);
        assert_eq!(c.snap_target(), None);
    }

    #[test]
    fn test_settle_snaps_after_quiet_window() {
        let (mut c, container) = bound(100.0, 0.0);
        c.report_scroll_offset(30.0);
        assert_eq!(c.phase(), HeaderPhase::Scrolling);

        assert_eq!(c.advance(ms(40)), None);
        // Activity restarts the window
        c.report_scroll_offset(35.0);
        assert_eq!(c.advance(ms(40)), None);

        let snap = c.advance(ms(10));
        assert_eq!(snap, Some(SnapTarget { target_offset: 0.0 }));
        assert!(c.is_snapping());
        assert_eq!(c.phase(), HeaderPhase::Snapping);
        assert!(container.lock().unwrap().is_animating());
    }

    #[test]
    fn test_snap_command_includes_top_inset() {
        let config = ProfileHeaderConfig {
            snap_animated: false,
            nav_bar_height: 20.0,
            ..Default::default()
        };
        let mut container = ScrollContainer::default();
        container.set_content_inset_top(91.0);
        container.set_content_size(5000.0, 800.0);
        let concrete = Arc::new(Mutex::new(container));
        let shared: SharedScrollTarget = concrete.clone();
        let mut tree = ViewTree::new();
        let node = tree.create_node(NodeKind::Scrollable);

        let mut c = ScrollProfileController::new(config);
        c.set_profile_height(100.0);
        c.bind(ScrollableHandle::from_shared(node, &shared));
        assert_eq!(
            c.metrics(),
            ScrollMetrics {
                raw_offset_y: -91.0,
                top_inset: -91.0,
                normalized_offset: 0.0,
            }
        );

        // Normalized 60 is raw -31 under a 91pt inset
        c.report_scroll_offset(-31.0);
        assert_eq!(c.metrics().normalized_offset, 60.0);
        c.advance(ms(50));

        // Collapsed rest = 100 normalized = 9 raw
        assert_eq!(concrete.lock().unwrap().offset_y(), 9.0);
    }

    #[test]
    fn test_settle_while_snapping_is_dropped() {
        let (mut c, container) = bound(100.0, 0.0);
        c.report_scroll_offset(60.0);
        assert!(c.on_scroll_settled().is_some());
        assert!(c.is_snapping());

        container.lock().unwrap().scroll_by(-5.0);
        assert_eq!(c.on_scroll_settled(), None);

        // Cool-down elapses, snapping is allowed again
        c.advance(ms(400));
        assert!(!c.is_snapping());
        assert_eq!(c.phase(), HeaderPhase::Idle);
        assert!(c.on_scroll_settled().is_some());
    }

    #[test]
    fn test_phase_tracks_snap_after_drag_during_cooldown() {
        let (mut c, _container) = bound(100.0, 0.0);
        c.report_scroll_offset(30.0);
        assert!(c.advance(ms(50)).is_some());
        c.advance(ms(370));
        assert_eq!(c.phase(), HeaderPhase::Snapping);

        // Drag while the first snap's cool-down is still running
        c.report_scroll_offset(40.0);
        c.advance(ms(30));
        assert!(!c.is_snapping());
        assert_eq!(c.phase(), HeaderPhase::Scrolling);

        let second = c.advance(ms(30));
        assert_eq!(second, Some(SnapTarget { target_offset: 0.0 }));
        assert!(c.is_snapping());
        assert_eq!(c.phase(), HeaderPhase::Snapping);
    }

    #[test]
    fn test_bind_keeps_metrics_consistent_inside_dead_zone() {
        let mut c = controller(100.0);
        // Normalized offset 0.2 before binding
        c.sync_scroll_offset(0.2);

        let mut container = ScrollContainer::default();
        container.set_content_inset_top(91.0);
        container.set_content_size(5000.0, 800.0);
        let shared: SharedScrollTarget = Arc::new(Mutex::new(container));
        let mut tree = ViewTree::new();
        let node = tree.create_node(NodeKind::Scrollable);
        assert!(c.bind(ScrollableHandle::from_shared(node, &shared)));

        let m = c.metrics();
        assert_eq!(m.raw_offset_y, -91.0);
        assert_eq!(m.normalized_offset, m.raw_offset_y - m.top_inset);
        assert_eq!(c.progress(), 0.0);
    }

    #[test]
    fn test_sync_bypasses_dead_zone_without_settle() {
        let (mut c, container) = bound(100.0, 0.0);
        c.report_scroll_offset(100.3);
        assert!(c.advance(ms(50)).is_none());

        c.sync_scroll_offset(100.0);
        assert_eq!(c.progress(), 1.0);
        assert_eq!(c.metrics().normalized_offset, 100.0);
        assert_eq!(c.advance(ms(100)), None);
        assert!(!container.lock().unwrap().is_animating());
    }

    #[test]
    fn test_settle_at_rest_is_noop() {
        let (mut c, container) = bound(100.0, 0.0);
        c.report_scroll_offset(100.0);
        assert_eq!(c.advance(ms(50)), None);
        assert!(!c.is_snapping());
        assert_eq!(c.phase(), HeaderPhase::Idle);
        assert!(!container.lock().unwrap().is_animating());
    }

    #[test]
    fn test_stale_handle_is_noop() {
        let (mut c, container) = bound(100.0, 0.0);
        drop(container);
        assert!(!c.is_bound());

        c.report_scroll_offset(40.0);
        assert_eq!(c.advance(ms(50)), None);
        assert!(!c.is_snapping());
        assert_eq!(c.progress(), 0.4);
    }

    #[test]
    fn test_rebinding_same_container_is_noop() {
        let mut container = ScrollContainer::default();
        container.set_content_size(5000.0, 800.0);
        let shared: SharedScrollTarget = Arc::new(Mutex::new(container));
        let mut tree = ViewTree::new();
        let node = tree.create_node(NodeKind::Scrollable);

        let mut c = controller(100.0);
        assert!(c.bind(ScrollableHandle::from_shared(node, &shared)));
        assert!(!c.bind(ScrollableHandle::from_shared(node, &shared)));
        assert!(c.is_bound());

        let other: SharedScrollTarget = Arc::new(Mutex::new(ScrollContainer::default()));
        assert!(c.bind(ScrollableHandle::from_shared(node, &other)));
    }

    #[test]
    fn test_unbind_cancels_pending_settle() {
        let (mut c, container) = bound(100.0, 0.0);
        c.report_scroll_offset(30.0);
        c.unbind();
        assert_eq!(c.advance(ms(100)), None);
        assert!(!container.lock().unwrap().is_animating());
        assert!(c.handle().is_none());
    }

    #[test]
    fn test_report_frame_coordinate_spaces() {
        let mut c = controller(100.0);

        // Global title before the header position is known is dropped
        c.report_frame(
            MeasuredRegion::Title,
            Rect::new(16.0, 200.0, 240.0, 24.0),
            CoordinateSpace::Global,
        );
        assert_eq!(c.layout().title_rect, Rect::new(0.0, 20.0, 100.0, 20.0));

        c.report_frame(
            MeasuredRegion::Header,
            Rect::new(0.0, 64.0, 390.0, 220.0),
            CoordinateSpace::Global,
        );
        assert_eq!(c.layout().profile_height, Some(220.0));
        assert_eq!(c.nav_backdrop_height(), 64.0);

        c.report_frame(
            MeasuredRegion::Title,
            Rect::new(16.0, 200.0, 240.0, 24.0),
            CoordinateSpace::Global,
        );
        assert_eq!(c.layout().title_rect, Rect::new(16.0, 136.0, 240.0, 24.0));

        c.report_frame(
            MeasuredRegion::Title,
            Rect::new(16.0, 130.0, 240.0, 24.0),
            CoordinateSpace::Named(HEADER_SPACE),
        );
        assert_eq!(c.layout().title_rect.y(), 130.0);

        c.report_frame(
            MeasuredRegion::Title,
            Rect::new(0.0, 0.0, 1.0, 1.0),
            CoordinateSpace::Named("list"),
        );
        assert_eq!(c.layout().title_rect.y(), 130.0);
    }

    #[test]
    fn test_handle_event_dispatch() {
        let mut c = controller(100.0);
        c.handle_event(&Event::scroll(50.0));
        assert_eq!(c.progress(), 0.5);

        c.handle_event(&Event::frame(
            MeasuredRegion::Header,
            Rect::new(0.0, 0.0, 390.0, 200.0),
            CoordinateSpace::Named(HEADER_SPACE),
        ));
        assert_eq!(c.progress(), 0.25);

        c.handle_event(&Event::unmount());
        assert!(c.handle().is_none());
    }

    #[test]
    fn test_phase_transitions() {
        use header_events::*;
        assert_eq!(HeaderPhase::Idle.on_event(SCROLL), Some(HeaderPhase::Scrolling));
        assert_eq!(HeaderPhase::Scrolling.on_event(SNAP), Some(HeaderPhase::Snapping));
        assert_eq!(HeaderPhase::Snapping.on_event(SCROLL), None);
        assert_eq!(
            HeaderPhase::Snapping.on_event(COOLDOWN_ELAPSED),
            Some(HeaderPhase::Idle)
        );
        assert_eq!(HeaderPhase::Idle.on_event(SNAP), Some(HeaderPhase::Snapping));
    }
}
