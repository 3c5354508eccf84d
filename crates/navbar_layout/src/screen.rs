//! Profile screen
//!
//! Wires the pieces together the way a host screen would: a view tree with a
//! scrollable list, the profile header as the list's first row, a marker next
//! to the list, and a controller bound through an introspection hook.
//!
//! Tree shapes, depending on [`FinderCapabilities::scrollable_sibling_of_marker`]:
//!
//! ```text
//! current:  root > clip > host > [content > list > stack, overlay > marker]
//! legacy:   root > clip > [list > stack, overlay > marker]
//! ```
//!
//! [`FinderCapabilities::scrollable_sibling_of_marker`]: crate::finder::FinderCapabilities

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use navbar_core::{CoordinateSpace, Event, MeasuredRegion, Rect};

use crate::config::ScreenConfig;
use crate::finder::ViewFinder;
use crate::introspect::{HookId, Introspector};
use crate::scroll::{ScrollContainer, ScrollTarget, SharedScrollTarget};
use crate::tree::{NodeId, NodeKind, ViewTree};
use crate::widgets::header_transform::HeaderTransform;
use crate::widgets::profile_header::{ScrollProfileController, HEADER_SPACE};

/// Node ids the screen needs after building its tree
#[derive(Debug, Clone, Copy)]
struct ScreenNodes {
    list: NodeId,
    stack: NodeId,
    marker: NodeId,
}

/// A scrollable profile screen with a collapsing header
pub struct ProfileScreen {
    config: ScreenConfig,
    tree: ViewTree,
    nodes: ScreenNodes,
    container: Option<Arc<Mutex<ScrollContainer>>>,
    controller: Rc<RefCell<ScrollProfileController>>,
    introspector: Introspector,
    hook: HookId,
    rows: usize,
}

impl ProfileScreen {
    pub fn new(config: ScreenConfig) -> Self {
        let mut tree = ViewTree::new();
        let nodes = build_tree(&mut tree, &config);

        let controller = Rc::new(RefCell::new(ScrollProfileController::new(config.header)));
        let mut introspector = Introspector::new(ViewFinder::new(config.finder));

        let weak = Rc::downgrade(&controller);
        let hook = introspector.introspect_scroll_view(nodes.marker, move |tree, node| {
            let Some(controller) = weak.upgrade() else {
                return;
            };
            match tree.scrollable_handle(node) {
                Some(handle) => {
                    controller.borrow_mut().bind(handle);
                }
                None => tracing::debug!("scroll view {:?} has no live container", node),
            }
        });

        Self {
            rows: config.rows,
            config,
            tree,
            nodes,
            container: None,
            controller,
            introspector,
            hook,
        }
    }

    pub fn from_toml_str(source: &str) -> crate::Result<Self> {
        Ok(Self::new(ScreenConfig::from_toml_str(source)?))
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Create the scroll container and run introspection
    pub fn mount(&mut self) {
        if self.container.is_none() {
            let mut container = ScrollContainer::new(self.config.scroll);
            container.set_content_inset_top(self.config.content_inset_top);
            container.set_content_size(self.content_height(), self.config.viewport_height);

            let container = Arc::new(Mutex::new(container));
            let shared: SharedScrollTarget = container.clone();
            self.tree
                .attach_scroll_target(self.nodes.list, Arc::downgrade(&shared));
            self.container = Some(container);
        }

        if self.introspector.on_mount(&self.tree) == 0 {
            tracing::debug!("profile header is not tracking any scroll view");
        }
    }

    /// Tear the scroll container down
    pub fn unmount(&mut self) {
        self.container = None;
        self.controller.borrow_mut().handle_event(&Event::unmount());
    }

    // =========================================================================
    // Host input
    // =========================================================================

    /// User drag by `dy` points (positive scrolls content up)
    pub fn drag(&mut self, dy: f32) {
        if self.with_container(|c| c.scroll_by(dy)).is_some() {
            self.sync_offset();
        }
    }

    /// Layout pass: title frame in header space, header frame in global space
    pub fn measure(&mut self, title: Rect, header: Rect) {
        let mut controller = self.controller.borrow_mut();
        controller.report_frame(MeasuredRegion::Header, header, CoordinateSpace::Global);
        controller.report_frame(
            MeasuredRegion::Title,
            title,
            CoordinateSpace::Named(HEADER_SPACE),
        );
    }

    /// Frame tick: advance the scroll animation and the controller clock
    pub fn tick(&mut self, dt: Duration) {
        let step = self.with_container(|c| {
            let was_animating = c.is_animating();
            let moved = c.tick(dt);
            (moved, was_animating && !c.is_animating(), c.offset_y())
        });
        match step {
            // A finished scroll lands exactly, dead zone or not
            Some((_, true, y)) => self.controller.borrow_mut().sync_scroll_offset(y),
            Some((Some(_), false, _)) => self.sync_offset(),
            _ => {}
        }
        let snap = self.controller.borrow_mut().advance(dt);
        if snap.is_some() {
            self.sync_offset();
        }
    }

    /// Append list rows; the changed tree re-runs introspection
    pub fn append_rows(&mut self, count: usize) {
        for _ in 0..count {
            let cell = self.tree.add(self.nodes.stack, NodeKind::Cell);
            self.tree.add(cell, NodeKind::Container);
        }
        self.rows += count;

        let content_height = self.content_height();
        let viewport_height = self.config.viewport_height;
        self.with_container(|c| c.set_content_size(content_height, viewport_height));
        self.introspector.on_update(&self.tree);
    }

    // =========================================================================
    // State
    // =========================================================================

    /// Whether the header is bound to a live scroll container
    pub fn is_tracking(&self) -> bool {
        self.controller.borrow().is_bound()
    }

    pub fn transform(&self) -> HeaderTransform {
        HeaderTransform::from_state(&self.controller.borrow().derived())
    }

    pub fn controller(&self) -> Ref<'_, ScrollProfileController> {
        self.controller.borrow()
    }

    pub fn controller_mut(&self) -> RefMut<'_, ScrollProfileController> {
        self.controller.borrow_mut()
    }

    pub fn tree(&self) -> &ViewTree {
        &self.tree
    }

    /// Scroll view the introspection hook resolved to
    pub fn scroll_view(&self) -> Option<NodeId> {
        self.introspector.resolved(self.hook)
    }

    pub fn container_offset(&self) -> Option<f32> {
        self.with_container(|c| c.offset_y())
    }

    pub fn is_animating(&self) -> bool {
        self.with_container(|c| c.is_animating()).unwrap_or(false)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    fn content_height(&self) -> f32 {
        self.rows as f32 * self.config.row_height
    }

    fn with_container<R>(&self, f: impl FnOnce(&mut ScrollContainer) -> R) -> Option<R> {
        let container = self.container.as_ref()?;
        let mut guard = container.lock().ok()?;
        Some(f(&mut *guard))
    }

    /// Forward the container offset to the controller. The lock is released
    /// first since the controller may issue commands back to the container.
    fn sync_offset(&mut self) {
        if let Some(y) = self.container_offset() {
            self.controller.borrow_mut().report_scroll_offset(y);
        }
    }
}

fn build_tree(tree: &mut ViewTree, config: &ScreenConfig) -> ScreenNodes {
    let root = tree.create_node(NodeKind::Container);
    let backdrop = tree.add(root, NodeKind::Container);
    tree.set_label(backdrop, "nav_backdrop");
    let clip = tree.add(root, NodeKind::Container);

    let (list_parent, marker_host) = if config.finder.scrollable_sibling_of_marker {
        (clip, clip)
    } else {
        let host = tree.add(clip, NodeKind::Container);
        let content = tree.add(host, NodeKind::Container);
        (content, host)
    };

    let list = tree.add(list_parent, NodeKind::Scrollable);
    tree.set_label(list, "profile_list");
    let stack = tree.add(list, NodeKind::Container);

    let header = tree.add(stack, NodeKind::Container);
    tree.set_label(header, "profile_header");
    for label in ["avatar", "username", "bio"] {
        let child = tree.add(header, NodeKind::Unknown);
        tree.set_label(child, label);
    }

    for _ in 0..config.rows {
        let cell = tree.add(stack, NodeKind::Cell);
        tree.add(cell, NodeKind::Container);
    }

    let marker = tree
        .inject_marker(marker_host)
        .unwrap_or_else(|| tree.create_node(NodeKind::Marker));

    ScreenNodes {
        list,
        stack,
        marker,
    }
}
