//! Marker-based view lookup
//!
//! A marker is an invisible node dropped into the tree next to the view we
//! want access to. Layout wrappers (hosting views, clipping containers) sit
//! between the two, so the target is rarely an ancestor of the marker.
//! Instead it is the nearest node of the requested kind that paints before
//! the marker on the marker's level.
//!
//! Several marker/target pairs can share a level:
//!
//! ```text
//! [0] TextView   <- target of marker 1
//! [1] Marker 1
//! [2] TextView   <- target of marker 2
//! [3] Marker 2
//! ```
//!
//! so candidates are resolved nearest-first.

use serde::{Deserialize, Serialize};

use crate::error::FindError;
use crate::tree::{NodeId, NodeKind, ViewTree};

/// Platform quirks the finder must account for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FinderCapabilities {
    /// The scroll view sits on the level of the marker's parent instead of
    /// the marker's own level (older platform releases).
    pub scrollable_sibling_of_marker: bool,
}

impl FinderCapabilities {
    pub const MODERN: Self = Self {
        scrollable_sibling_of_marker: false,
    };

    pub const LEGACY: Self = Self {
        scrollable_sibling_of_marker: true,
    };
}

/// Resolves markers to the views they are attached to
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewFinder {
    capabilities: FinderCapabilities,
}

impl ViewFinder {
    pub fn new(capabilities: FinderCapabilities) -> Self {
        Self { capabilities }
    }

    pub fn capabilities(&self) -> FinderCapabilities {
        self.capabilities
    }

    /// Find the node of kind `target` that `marker` is attached to.
    ///
    /// Not finding one is a developer error (the marker was placed where no
    /// such view exists); it is reported through tracing, never by panicking.
    pub fn find(
        &self,
        tree: &ViewTree,
        marker: NodeId,
        target: NodeKind,
    ) -> Result<NodeId, FindError> {
        let result = self.find_inner(tree, marker, target);
        match &result {
            Ok(found) => tracing::debug!("marker {:?} resolved to {:?} {:?}", marker, target, found),
            Err(err) => report_not_found(marker, target, err),
        }
        result
    }

    fn find_inner(
        &self,
        tree: &ViewTree,
        marker: NodeId,
        target: NodeKind,
    ) -> Result<NodeId, FindError> {
        if !tree.contains(marker) {
            return Err(FindError::UnknownNode);
        }
        let marker_parent = tree.parent(marker).ok_or(FindError::NoSearchRoot)?;
        let search_root = tree.parent(marker_parent).ok_or(FindError::NoSearchRoot)?;

        // Cells are always strict ancestors
        if target == NodeKind::Cell {
            return tree
                .ancestors(search_root)
                .find(|&n| tree.kind(n).is_some_and(|k| k.is_a(target)))
                .ok_or(FindError::NoCandidate(target));
        }

        self.scan_levels(tree, marker, marker_parent, search_root, target)
    }

    /// Breadth-first, level by level, until the marker's level is reached
    fn scan_levels(
        &self,
        tree: &ViewTree,
        marker: NodeId,
        marker_parent: NodeId,
        search_root: NodeId,
        target: NodeKind,
    ) -> Result<NodeId, FindError> {
        // One more level up to reach views clipped by a container
        let start = tree.parent(search_root).unwrap_or(search_root);
        let mut level: Vec<NodeId> = vec![start];

        while !level.is_empty() {
            if self.capabilities.scrollable_sibling_of_marker && target == NodeKind::Scrollable {
                if let Some(found) = last_match_before(tree, &level, marker_parent, target) {
                    return Ok(found);
                }
            }

            if let Some(index) = level.iter().position(|&n| n == marker) {
                return disambiguate(tree, &level[..index], target);
            }

            level = level
                .iter()
                .flat_map(|&n| tree.children(n).iter().copied())
                .collect();
        }

        Err(FindError::MarkerNotInTree)
    }
}

/// Last node of kind `target` preceding `anchor` on `level`
fn last_match_before(
    tree: &ViewTree,
    level: &[NodeId],
    anchor: NodeId,
    target: NodeKind,
) -> Option<NodeId> {
    let index = level.iter().position(|&n| n == anchor)?;
    level[..index]
        .iter()
        .rev()
        .copied()
        .find(|&n| tree.kind(n).is_some_and(|k| k.is_a(target)))
}

/// Nearest-first: a candidate qualifies if it, or its last child, has the
/// requested kind.
fn disambiguate(
    tree: &ViewTree,
    candidates: &[NodeId],
    target: NodeKind,
) -> Result<NodeId, FindError> {
    let matches = |n: NodeId| tree.kind(n).is_some_and(|k| k.is_a(target));

    candidates
        .iter()
        .rev()
        .find_map(|&candidate| {
            if matches(candidate) {
                return Some(candidate);
            }
            tree.last_child(candidate).filter(|&last| matches(last))
        })
        .ok_or(FindError::NoCandidate(target))
}

fn report_not_found(marker: NodeId, target: NodeKind, err: &FindError) {
    if cfg!(debug_assertions) {
        tracing::error!(
            "introspection failed: marker {:?} found no {:?} view: {}",
            marker,
            target,
            err
        );
    } else {
        tracing::debug!("marker {:?} found no {:?} view: {}", marker, target, err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn modern() -> ViewFinder {
        ViewFinder::new(FinderCapabilities::MODERN)
    }

    /// root > clip > host > [wrapper > target, overlay > marker]
    fn sibling_tree(target_kind: NodeKind) -> (ViewTree, NodeId, NodeId) {
        let mut tree = ViewTree::new();
        let root = tree.create_node(NodeKind::Container);
        let clip = tree.add(root, NodeKind::Container);
        let host = tree.add(clip, NodeKind::Container);
        let wrapper = tree.add(host, NodeKind::Container);
        let target = tree.add(wrapper, target_kind);
        let marker = tree.inject_marker(host).unwrap();
        (tree, target, marker)
    }

    #[test]
    fn test_finds_preceding_target_on_marker_level() {
        let (tree, target, marker) = sibling_tree(NodeKind::Scrollable);
        assert_eq!(modern().find(&tree, marker, NodeKind::Scrollable), Ok(target));
    }

    #[test]
    fn test_subkind_satisfies_scrollable_request() {
        let (tree, target, marker) = sibling_tree(NodeKind::Table);
        assert_eq!(modern().find(&tree, marker, NodeKind::Scrollable), Ok(target));
        assert_eq!(modern().find(&tree, marker, NodeKind::Table), Ok(target));
        assert_eq!(
            modern().find(&tree, marker, NodeKind::Collection),
            Err(FindError::NoCandidate(NodeKind::Collection))
        );
    }

    #[test]
    fn test_no_target_kind_is_not_found() {
        let (tree, _, marker) = sibling_tree(NodeKind::Unknown);
        assert_eq!(
            modern().find(&tree, marker, NodeKind::Scrollable),
            Err(FindError::NoCandidate(NodeKind::Scrollable))
        );
    }

    #[test]
    fn test_shallow_marker_has_no_search_root() {
        let mut tree = ViewTree::new();
        let root = tree.create_node(NodeKind::Container);
        let marker = tree.add(root, NodeKind::Marker);
        assert_eq!(
            modern().find(&tree, marker, NodeKind::Scrollable),
            Err(FindError::NoSearchRoot)
        );

        let detached = tree.create_node(NodeKind::Marker);
        assert_eq!(
            modern().find(&tree, detached, NodeKind::Scrollable),
            Err(FindError::NoSearchRoot)
        );
    }

    #[test]
    fn test_removed_marker_is_unknown() {
        let (mut tree, _, marker) = sibling_tree(NodeKind::Scrollable);
        tree.remove_subtree(marker);
        assert_eq!(
            modern().find(&tree, marker, NodeKind::Scrollable),
            Err(FindError::UnknownNode)
        );
    }

    #[test]
    fn test_pairs_on_one_level_resolve_to_nearest() {
        // host > [wrap1 > [text1, marker1], wrap2 > [text2, marker2]]
        // The host is the search root of both markers.
        let mut tree = ViewTree::new();
        let root = tree.create_node(NodeKind::Container);
        let host = tree.add(root, NodeKind::Container);
        let wrap1 = tree.add(host, NodeKind::Container);
        let text1 = tree.add(wrap1, NodeKind::TextView);
        let marker1 = tree.add(wrap1, NodeKind::Marker);
        let wrap2 = tree.add(host, NodeKind::Container);
        let text2 = tree.add(wrap2, NodeKind::TextView);
        let marker2 = tree.add(wrap2, NodeKind::Marker);

        // Level below the host: [text1, marker1, text2, marker2]
        assert_eq!(modern().find(&tree, marker1, NodeKind::TextView), Ok(text1));
        assert_eq!(modern().find(&tree, marker2, NodeKind::TextView), Ok(text2));
    }

    #[test]
    fn test_last_child_of_candidate_is_accepted() {
        // Level holding the marker: [field_wrapper, marker];
        // the text field is the wrapper's last child.
        let mut tree = ViewTree::new();
        let root = tree.create_node(NodeKind::Container);
        let host = tree.add(root, NodeKind::Container);
        let row = tree.add(host, NodeKind::Container);
        let field_wrapper = tree.add(row, NodeKind::Container);
        tree.add(field_wrapper, NodeKind::Unknown);
        let field = tree.add(field_wrapper, NodeKind::TextField);
        let marker = tree.add(row, NodeKind::Marker);

        assert_eq!(modern().find(&tree, marker, NodeKind::TextField), Ok(field));
    }

    #[test]
    fn test_legacy_scrollable_beside_marker_parent() {
        // root > clip > [scroll, overlay > marker]
        let mut tree = ViewTree::new();
        let root = tree.create_node(NodeKind::Container);
        let clip = tree.add(root, NodeKind::Container);
        let scroll = tree.add(clip, NodeKind::Scrollable);
        tree.add(scroll, NodeKind::Container);
        let marker = tree.inject_marker(clip).unwrap();

        let legacy = ViewFinder::new(FinderCapabilities::LEGACY);
        assert_eq!(legacy.find(&tree, marker, NodeKind::Scrollable), Ok(scroll));

        // Without the capability the marker's own level has nothing before it
        assert_eq!(
            modern().find(&tree, marker, NodeKind::Scrollable),
            Err(FindError::NoCandidate(NodeKind::Scrollable))
        );
    }

    #[test]
    fn test_legacy_rule_only_applies_to_scrollable() {
        let mut tree = ViewTree::new();
        let root = tree.create_node(NodeKind::Container);
        let clip = tree.add(root, NodeKind::Container);
        tree.add(clip, NodeKind::TextView);
        let marker = tree.inject_marker(clip).unwrap();

        let legacy = ViewFinder::new(FinderCapabilities::LEGACY);
        assert_eq!(
            legacy.find(&tree, marker, NodeKind::TextView),
            Err(FindError::NoCandidate(NodeKind::TextView))
        );
    }

    #[test]
    fn test_cell_walks_ancestors() {
        // collection > cell > content > row > overlay > marker
        let mut tree = ViewTree::new();
        let collection = tree.create_node(NodeKind::Collection);
        let cell = tree.add(collection, NodeKind::Cell);
        let content = tree.add(cell, NodeKind::Container);
        let row = tree.add(content, NodeKind::Container);
        let marker = tree.inject_marker(row).unwrap();

        assert_eq!(modern().find(&tree, marker, NodeKind::Cell), Ok(cell));
    }

    #[test]
    fn test_cell_search_root_itself_counts() {
        let mut tree = ViewTree::new();
        let cell = tree.create_node(NodeKind::Cell);
        let marker = tree.inject_marker(cell).unwrap();
        assert_eq!(modern().find(&tree, marker, NodeKind::Cell), Ok(cell));
    }

    #[test]
    fn test_cell_missing() {
        let (tree, _, marker) = sibling_tree(NodeKind::Scrollable);
        assert_eq!(
            modern().find(&tree, marker, NodeKind::Cell),
            Err(FindError::NoCandidate(NodeKind::Cell))
        );
    }
}
