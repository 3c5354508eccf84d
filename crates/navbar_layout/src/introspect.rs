//! Introspection hooks
//!
//! A hook pairs a marker with the kind of view it is attached to and an
//! action to run with the node the finder resolves. Hooks run once when the
//! screen mounts and again whenever the tree changed since their last run,
//! because the host is free to rebuild the views beneath the marker.

use slotmap::{new_key_type, SlotMap};

use crate::error::FindError;
use crate::finder::ViewFinder;
use crate::tree::{NodeId, NodeKind, ViewTree};

new_key_type! {
    /// Handle to a registered hook
    pub struct HookId;
}

/// Action invoked with the resolved node
pub type IntrospectAction = Box<dyn FnMut(&ViewTree, NodeId)>;

struct Hook {
    marker: NodeId,
    target: NodeKind,
    action: IntrospectAction,
    /// Tree generation of the last run
    last_generation: Option<u64>,
    resolved: Option<NodeId>,
}

/// Runs registered hooks against a [`ViewTree`]
pub struct Introspector {
    finder: ViewFinder,
    hooks: SlotMap<HookId, Hook>,
}

impl Introspector {
    pub fn new(finder: ViewFinder) -> Self {
        Self {
            finder,
            hooks: SlotMap::with_key(),
        }
    }

    pub fn finder(&self) -> &ViewFinder {
        &self.finder
    }

    /// Register a hook for the `target` view attached to `marker`
    pub fn register<F>(&mut self, marker: NodeId, target: NodeKind, action: F) -> HookId
    where
        F: FnMut(&ViewTree, NodeId) + 'static,
    {
        self.hooks.insert(Hook {
            marker,
            target,
            action: Box::new(action),
            last_generation: None,
            resolved: None,
        })
    }

    pub fn introspect_scroll_view<F>(&mut self, marker: NodeId, action: F) -> HookId
    where
        F: FnMut(&ViewTree, NodeId) + 'static,
    {
        self.register(marker, NodeKind::Scrollable, action)
    }

    pub fn introspect_table_view<F>(&mut self, marker: NodeId, action: F) -> HookId
    where
        F: FnMut(&ViewTree, NodeId) + 'static,
    {
        self.register(marker, NodeKind::Table, action)
    }

    pub fn introspect_collection_view<F>(&mut self, marker: NodeId, action: F) -> HookId
    where
        F: FnMut(&ViewTree, NodeId) + 'static,
    {
        self.register(marker, NodeKind::Collection, action)
    }

    pub fn introspect_text_view<F>(&mut self, marker: NodeId, action: F) -> HookId
    where
        F: FnMut(&ViewTree, NodeId) + 'static,
    {
        self.register(marker, NodeKind::TextView, action)
    }

    pub fn introspect_text_field<F>(&mut self, marker: NodeId, action: F) -> HookId
    where
        F: FnMut(&ViewTree, NodeId) + 'static,
    {
        self.register(marker, NodeKind::TextField, action)
    }

    pub fn introspect_cell<F>(&mut self, marker: NodeId, action: F) -> HookId
    where
        F: FnMut(&ViewTree, NodeId) + 'static,
    {
        self.register(marker, NodeKind::Cell, action)
    }

    pub fn remove(&mut self, id: HookId) -> bool {
        self.hooks.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Node the hook resolved to on its last run
    pub fn resolved(&self, id: HookId) -> Option<NodeId> {
        self.hooks.get(id).and_then(|hook| hook.resolved)
    }

    /// Run every hook. Returns how many found their view.
    pub fn on_mount(&mut self, tree: &ViewTree) -> usize {
        let finder = self.finder;
        self.hooks
            .values_mut()
            .map(|hook| run_hook(&finder, tree, hook))
            .filter(Result::is_ok)
            .count()
    }

    /// Re-run hooks that have not seen the current tree generation.
    /// Returns how many found their view.
    pub fn on_update(&mut self, tree: &ViewTree) -> usize {
        let finder = self.finder;
        let generation = tree.generation();
        self.hooks
            .values_mut()
            .filter(|hook| hook.last_generation != Some(generation))
            .map(|hook| run_hook(&finder, tree, hook))
            .filter(Result::is_ok)
            .count()
    }
}

impl Default for Introspector {
    fn default() -> Self {
        Self::new(ViewFinder::default())
    }
}

fn run_hook(finder: &ViewFinder, tree: &ViewTree, hook: &mut Hook) -> Result<NodeId, FindError> {
    hook.last_generation = Some(tree.generation());
    let found = finder.find(tree, hook.marker, hook.target);
    hook.resolved = found.as_ref().ok().copied();
    if let Ok(node) = found {
        (hook.action)(tree, node);
    }
    found
}
