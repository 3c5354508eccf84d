//! Rendered view tree
//!
//! A minimal model of the platform view hierarchy: every node carries a kind
//! tag from a closed set, children are kept in paint order, and scrollable
//! nodes may have a live scroll container attached.

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::scroll::{ScrollableHandle, WeakScrollTarget};

new_key_type! {
    pub struct NodeId;
}

/// Kind of a rendered view
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Plain layout or hosting wrapper
    Container,
    /// Generic scroll view
    Scrollable,
    /// Grid/list scroll view
    Collection,
    /// Table scroll view
    Table,
    /// Multi-line text editor (scrolls its content)
    TextView,
    /// Single-line text input
    TextField,
    /// Cell of a collection or table
    Cell,
    /// Invisible introspection marker
    Marker,
    Unknown,
}

impl NodeKind {
    /// Whether a node of this kind satisfies a request for `target`.
    ///
    /// Collections, tables and text views are all scroll views, so they
    /// satisfy a request for [`NodeKind::Scrollable`].
    pub fn is_a(self, target: NodeKind) -> bool {
        self == target
            || (target == NodeKind::Scrollable
                && matches!(
                    self,
                    NodeKind::Collection | NodeKind::Table | NodeKind::TextView
                ))
    }
}

/// A node of the view tree
pub struct ViewNode {
    pub kind: NodeKind,
    parent: Option<NodeId>,
    children: SmallVec<[NodeId; 4]>,
    /// Excluded from painting
    pub hidden: bool,
    /// Receives touches
    pub interactive: bool,
    label: Option<String>,
    scroll_target: Option<WeakScrollTarget>,
}

impl ViewNode {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: SmallVec::new(),
            hidden: false,
            interactive: true,
            label: None,
            scroll_target: None,
        }
    }
}

/// Arena-backed view tree.
///
/// Every structural change bumps [`ViewTree::generation`], which introspection
/// hooks use to decide when to look again.
pub struct ViewTree {
    nodes: SlotMap<NodeId, ViewNode>,
    labels: FxHashMap<String, NodeId>,
    generation: u64,
}

impl ViewTree {
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            labels: FxHashMap::default(),
            generation: 0,
        }
    }

    /// Create a detached node
    pub fn create_node(&mut self, kind: NodeKind) -> NodeId {
        self.generation += 1;
        self.nodes.insert(ViewNode::new(kind))
    }

    /// Create a node and append it as the last child of `parent`
    pub fn add(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = self.create_node(kind);
        self.add_child(parent, id);
        id
    }

    /// Append `child` to `parent`, detaching it from any previous parent.
    ///
    /// Refused (returns false) when either node is unknown or when `parent`
    /// lies inside `child`'s subtree.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if !self.nodes.contains_key(parent) || !self.nodes.contains_key(child) {
            return false;
        }
        if self.ancestors(parent).any(|n| n == child) {
            tracing::debug!("add_child({:?}, {:?}) refused: would create a cycle", parent, child);
            return false;
        }
        self.detach(child);
        self.nodes[parent].children.push(child);
        self.nodes[child].parent = Some(parent);
        self.generation += 1;
        true
    }

    /// Remove `child` from its parent's children, keeping the node alive
    pub fn detach(&mut self, child: NodeId) {
        let Some(parent) = self.nodes.get(child).and_then(|n| n.parent) else {
            return;
        };
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.retain(|c| *c != child);
        }
        self.nodes[child].parent = None;
        self.generation += 1;
    }

    /// Remove a node and everything beneath it
    pub fn remove_subtree(&mut self, id: NodeId) {
        self.detach(id);
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(next) {
                stack.extend(node.children.iter().copied());
                if let Some(label) = node.label {
                    if self.labels.get(&label) == Some(&next) {
                        self.labels.remove(&label);
                    }
                }
            }
        }
        self.generation += 1;
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node(&self, id: NodeId) -> Option<&ViewNode> {
        self.nodes.get(id)
    }

    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.nodes.get(id).map(|n| n.kind)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    /// Children in paint order (empty for unknown ids)
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).last().copied()
    }

    /// `id` followed by each of its ancestors, nearest first
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.contains(id).then_some(id), move |&n| self.parent(n))
    }

    /// Attach a lookup label (replaces any node previously holding it)
    pub fn set_label(&mut self, id: NodeId, label: impl Into<String>) {
        let label = label.into();
        if !self.nodes.contains_key(id) {
            return;
        }
        if let Some(old) = self.nodes[id].label.take() {
            if self.labels.get(&old) == Some(&id) {
                self.labels.remove(&old);
            }
        }
        if let Some(previous) = self.labels.insert(label.clone(), id) {
            if previous != id {
                if let Some(node) = self.nodes.get_mut(previous) {
                    node.label = None;
                }
            }
        }
        self.nodes[id].label = Some(label);
    }

    pub fn label(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(id).and_then(|n| n.label.as_deref())
    }

    /// O(1) lookup by label
    pub fn find_by_label(&self, label: &str) -> Option<NodeId> {
        self.labels.get(label).copied()
    }

    /// Link a live scroll container to a node
    pub fn attach_scroll_target(&mut self, id: NodeId, target: WeakScrollTarget) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.scroll_target = Some(target);
        }
    }

    /// Handle to the scroll container attached to `id`, if it is still alive
    pub fn scrollable_handle(&self, id: NodeId) -> Option<ScrollableHandle> {
        let target = self.nodes.get(id)?.scroll_target.as_ref()?;
        let handle = ScrollableHandle::new(id, target.clone());
        handle.is_alive().then_some(handle)
    }

    /// Insert an introspection marker as the last child of `host`.
    ///
    /// The marker is hidden, non-interactive and wrapped in a zero-size
    /// overlay container, so it sits two levels below `host`.
    pub fn inject_marker(&mut self, host: NodeId) -> Option<NodeId> {
        if !self.contains(host) {
            return None;
        }
        let overlay = self.add(host, NodeKind::Container);
        self.nodes[overlay].interactive = false;
        let marker = self.add(overlay, NodeKind::Marker);
        let node = &mut self.nodes[marker];
        node.hidden = true;
        node.interactive = false;
        Some(marker)
    }

    /// Counter bumped on every structural change
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Default for ViewTree {
    fn default() -> Self {
        Self::new()
    }
}
