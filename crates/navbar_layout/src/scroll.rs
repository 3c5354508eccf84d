//! Scroll containers
//!
//! [`ScrollTarget`] is the command surface the header controller needs from
//! a platform scroll view. [`ScrollContainer`] is the in-process
//! implementation used by [`ProfileScreen`](crate::screen::ProfileScreen).
//!
//! The controller never owns a container: it holds a [`ScrollableHandle`]
//! wrapping a `Weak`, and every command checks liveness first.

use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use navbar_animation::{Easing, ScrollTween};
use serde::{Deserialize, Serialize};

use crate::tree::NodeId;

/// Commands and queries a scroll container must support
pub trait ScrollTarget {
    /// Current vertical content offset
    fn offset_y(&self) -> f32;

    /// Top content inset (content rests at `-content_inset_top`)
    fn content_inset_top(&self) -> f32;

    /// Move the content offset, optionally animated
    fn scroll_to(&mut self, y: f32, animated: bool);
}

/// Shared scroll container, owned by the view system
pub type SharedScrollTarget = Arc<Mutex<dyn ScrollTarget + Send>>;

/// Non-owning reference to a scroll container
pub type WeakScrollTarget = Weak<Mutex<dyn ScrollTarget + Send>>;

/// Non-owning handle to the scroll container found for a marker
#[derive(Clone)]
pub struct ScrollableHandle {
    node: NodeId,
    target: WeakScrollTarget,
}

impl ScrollableHandle {
    pub fn new(node: NodeId, target: WeakScrollTarget) -> Self {
        Self { node, target }
    }

    /// Handle to a shared container
    pub fn from_shared(node: NodeId, target: &SharedScrollTarget) -> Self {
        Self::new(node, Arc::downgrade(target))
    }

    /// Tree node the container was found at
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Whether the container is still alive
    pub fn is_alive(&self) -> bool {
        self.target.strong_count() > 0
    }

    /// Whether both handles refer to the same container
    pub fn same_container(&self, other: &ScrollableHandle) -> bool {
        Weak::ptr_eq(&self.target, &other.target)
    }

    pub fn offset_y(&self) -> Option<f32> {
        let target = self.target.upgrade()?;
        let guard = target.lock().ok()?;
        Some(guard.offset_y())
    }

    pub fn content_inset_top(&self) -> Option<f32> {
        let target = self.target.upgrade()?;
        let guard = target.lock().ok()?;
        Some(guard.content_inset_top())
    }

    /// Issue a scroll command. Returns false (and does nothing) when the
    /// container is gone.
    pub fn scroll_to(&self, y: f32, animated: bool) -> bool {
        let Some(target) = self.target.upgrade() else {
            tracing::debug!("scroll_to({:.1}) ignored: container torn down", y);
            return false;
        };
        let Ok(mut guard) = target.lock() else {
            tracing::debug!("scroll_to({:.1}) ignored: container lock poisoned", y);
            return false;
        };
        guard.scroll_to(y, animated);
        true
    }
}

impl std::fmt::Debug for ScrollableHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollableHandle")
            .field("node", &self.node)
            .field("alive", &self.is_alive())
            .finish()
    }
}

// ============================================================================
// Scroll Configuration
// ============================================================================

/// Configuration for programmatic scrolling
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Duration of an animated `scroll_to`
    pub snap_duration_ms: u64,
    /// Curve of an animated `scroll_to`
    pub easing: Easing,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            snap_duration_ms: 300,
            easing: Easing::EaseOutCubic,
        }
    }
}

impl ScrollConfig {
    pub fn snap_duration(&self) -> Duration {
        Duration::from_millis(self.snap_duration_ms)
    }
}

// ============================================================================
// Scroll Container
// ============================================================================

/// Vertical scroll container with animated programmatic scrolling
#[derive(Debug)]
pub struct ScrollContainer {
    offset_y: f32,
    content_inset_top: f32,
    content_height: f32,
    viewport_height: f32,
    animation: Option<ScrollTween>,
    config: ScrollConfig,
}

impl ScrollContainer {
    pub fn new(config: ScrollConfig) -> Self {
        Self {
            offset_y: 0.0,
            content_inset_top: 0.0,
            content_height: 0.0,
            viewport_height: 0.0,
            animation: None,
            config,
        }
    }

    /// Set the top inset; content snaps back to its resting position
    pub fn set_content_inset_top(&mut self, inset: f32) {
        self.content_inset_top = inset;
        self.offset_y = self.min_offset_y();
        self.animation = None;
    }

    pub fn set_content_size(&mut self, content_height: f32, viewport_height: f32) {
        self.content_height = content_height;
        self.viewport_height = viewport_height;
        self.offset_y = self.clamp(self.offset_y);
    }

    /// Resting offset with content at the top
    pub fn min_offset_y(&self) -> f32 {
        -self.content_inset_top
    }

    /// Offset with content scrolled to the bottom
    pub fn max_offset_y(&self) -> f32 {
        (self.content_height - self.viewport_height).max(self.min_offset_y())
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    fn clamp(&self, y: f32) -> f32 {
        y.clamp(self.min_offset_y(), self.max_offset_y())
    }

    /// Apply a user drag. Cancels any programmatic animation.
    ///
    /// Positive `dy` moves content up (offset grows).
    pub fn scroll_by(&mut self, dy: f32) -> f32 {
        if self.animation.take().is_some() {
            tracing::trace!("user scroll interrupted programmatic scroll");
        }
        self.offset_y = self.clamp(self.offset_y + dy);
        self.offset_y
    }

    /// Advance a running animation. Returns the new offset when it moved.
    pub fn tick(&mut self, dt: Duration) -> Option<f32> {
        let tween = self.animation.as_mut()?;
        let next = tween.advance(dt);
        if tween.is_done() {
            self.animation = None;
        }
        let next = self.clamp(next);
        if next == self.offset_y {
            return None;
        }
        self.offset_y = next;
        Some(next)
    }
}

impl Default for ScrollContainer {
    fn default() -> Self {
        Self::new(ScrollConfig::default())
    }
}

impl ScrollTarget for ScrollContainer {
    fn offset_y(&self) -> f32 {
        self.offset_y
    }

    fn content_inset_top(&self) -> f32 {
        self.content_inset_top
    }

    fn scroll_to(&mut self, y: f32, animated: bool) {
        let y = self.clamp(y);
        if animated {
            match self.animation.as_mut() {
                Some(tween) => tween.retarget(y, self.config.snap_duration()),
                None => {
                    self.animation = Some(ScrollTween::new(
                        self.offset_y,
                        y,
                        self.config.snap_duration(),
                        self.config.easing,
                    ))
                }
            }
        } else {
            self.animation = None;
            self.offset_y = y;
        }
        tracing::debug!("scroll_to {:.1} (animated: {})", y, animated);
    }
}
