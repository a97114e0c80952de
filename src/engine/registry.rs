//! Node Registry - storage and tree links for scene nodes.
//!
//! Manages the lifecycle of scene nodes:
//! - Id allocation (ids are never reused on a thread)
//! - Parent/child links (parents are plain ids, never owning references)
//! - Per-node computation sets
//! - Document-order traversal
//!
//! Accessors never hold a registry borrow while user code runs: callers copy
//! out what they need (ids, `Rc`s) and release the borrow first.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use tracing::warn;

use super::node::{Node, NodeKind, SceneNode};
use crate::reactive::{Computation, scope};
use crate::types::NodeId;

// =============================================================================
// Registry State
// =============================================================================

thread_local! {
    /// All registered scene nodes.
    static NODES: RefCell<HashMap<NodeId, SceneNode>> = RefCell::new(HashMap::new());

    /// Next node id to hand out.
    static NEXT_NODE_ID: Cell<u64> = const { Cell::new(1) };
}

// =============================================================================
// Registration
// =============================================================================

/// Register a new, unattached node owned by the node currently expanding.
pub(crate) fn register(kind: NodeKind) -> Node {
    let id = NEXT_NODE_ID.with(|next| {
        let id = next.get();
        next.set(id + 1);
        NodeId(id)
    });
    let owner = scope::current_scope().owner_node();
    NODES.with(|nodes| nodes.borrow_mut().insert(id, SceneNode::new(kind, owner)));
    Node(Some(id))
}

/// Check whether `id` is registered.
pub fn is_registered(id: NodeId) -> bool {
    NODES.with(|nodes| nodes.borrow().contains_key(&id))
}

/// Number of registered nodes.
pub fn node_count() -> usize {
    NODES.with(|nodes| nodes.borrow().len())
}

/// Remove a node from the registry. Its links are not touched.
pub(crate) fn release(id: NodeId) {
    // Dropped outside the borrow: the node's closures may own other handles.
    let node = NODES.with(|nodes| nodes.borrow_mut().remove(&id));
    drop(node);
}

pub(crate) fn owner_of(id: NodeId) -> Option<NodeId> {
    with_node(id, |node| node.owner).flatten()
}

/// Drop every node (for testing).
pub fn reset_registry() {
    // Take the map out first so dropping nodes can't re-enter the registry.
    let nodes = NODES.with(|nodes| std::mem::take(&mut *nodes.borrow_mut()));
    drop(nodes);
}

// =============================================================================
// Access
// =============================================================================

/// Read a node. Returns `None` if it is not registered.
pub(crate) fn with_node<R>(id: NodeId, f: impl FnOnce(&SceneNode) -> R) -> Option<R> {
    NODES.with(|nodes| nodes.borrow().get(&id).map(f))
}

/// Mutate a node. Returns `None` if it is not registered.
pub(crate) fn with_node_mut<R>(id: NodeId, f: impl FnOnce(&mut SceneNode) -> R) -> Option<R> {
    NODES.with(|nodes| nodes.borrow_mut().get_mut(&id).map(f))
}

pub fn parent_of(id: NodeId) -> Option<NodeId> {
    with_node(id, |node| node.parent).flatten()
}

pub fn children_of(id: NodeId) -> Vec<NodeId> {
    with_node(id, |node| node.children.clone()).unwrap_or_default()
}

// =============================================================================
// Tree Links
// =============================================================================

/// Attach `id` as the last child of `parent`.
///
/// Returns `false` (and logs a warning) when the link would make a node its
/// own ancestor.
pub(crate) fn set_parent(id: NodeId, parent: NodeId) -> bool {
    if id == parent {
        warn!(node = %id, "a node cannot be its own parent");
        return false;
    }

    let mut ancestor = Some(parent);
    while let Some(current) = ancestor {
        if current == id {
            warn!(node = %id, parent = %parent, "a node cannot be attached below its own descendant");
            return false;
        }
        ancestor = parent_of(current);
    }

    let previous = parent_of(id);
    if previous == Some(parent) {
        return true;
    }
    if let Some(previous) = previous {
        with_node_mut(previous, |node| node.children.retain(|child| *child != id));
    }

    with_node_mut(id, |node| node.parent = Some(parent));
    with_node_mut(parent, |node| node.children.push(id));
    true
}

/// Clear a node's parent link without touching the parent's child list.
pub(crate) fn clear_parent(id: NodeId) {
    with_node_mut(id, |node| node.parent = None);
}

/// Forget a node's children without touching their parent links.
pub(crate) fn clear_children(id: NodeId) {
    with_node_mut(id, |node| node.children.clear());
}

// =============================================================================
// Computations
// =============================================================================

/// Register a computation on a node.
pub(crate) fn add_computation(id: NodeId, computation: Computation) {
    let added = with_node_mut(id, |node| {
        node.computations.get_or_insert_with(Vec::new).push(computation);
    });
    if added.is_none() {
        warn!(node = %id, "computation registered on an unknown node");
    }
}

pub(crate) fn computations_of(id: NodeId) -> Vec<Computation> {
    with_node(id, |node| node.computations.clone().unwrap_or_default()).unwrap_or_default()
}

/// Remove and return a node's computations.
pub(crate) fn take_computations(id: NodeId) -> Vec<Computation> {
    with_node_mut(id, |node| node.computations.take().unwrap_or_default()).unwrap_or_default()
}

// =============================================================================
// Traversal
// =============================================================================

/// Nodes below `id` in document order (pre-order), optionally including `id`.
pub fn descendants(id: NodeId, inclusive: bool) -> Vec<NodeId> {
    let mut out = Vec::new();
    let mut stack = vec![id];
    while let Some(current) = stack.pop() {
        if current != id || inclusive {
            out.push(current);
        }
        let children = children_of(current);
        stack.extend(children.into_iter().rev());
    }
    out
}

/// Element nodes in document order, without descending below matches.
pub(crate) fn match_until(id: NodeId, inclusive: bool) -> Vec<NodeId> {
    let mut out = Vec::new();
    let mut stack = vec![(id, true)];
    while let Some((current, is_start)) = stack.pop() {
        let is_element = with_node(current, SceneNode::is_element).unwrap_or(false);
        if is_element && (!is_start || inclusive) {
            out.push(current);
            continue;
        }
        let children = children_of(current);
        stack.extend(children.into_iter().rev().map(|child| (child, false)));
    }
    out
}

/// Every element node in document order.
pub(crate) fn match_all(id: NodeId, inclusive: bool) -> Vec<NodeId> {
    descendants(id, inclusive)
        .into_iter()
        .filter(|current| with_node(*current, SceneNode::is_element).unwrap_or(false))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::error::Result;

    fn component() -> NodeId {
        let producer: Rc<dyn Fn() -> Result<Node>> = Rc::new(|| Ok(Node::EMPTY));
        register(NodeKind::Component(producer)).0.unwrap()
    }

    #[test]
    fn test_register_and_release() {
        reset_registry();
        let id = component();
        assert!(is_registered(id));
        assert_eq!(node_count(), 1);
        release(id);
        assert!(!is_registered(id));
    }

    #[test]
    fn test_set_parent_rejects_cycles() {
        reset_registry();
        let a = component();
        let b = component();
        let c = component();

        assert!(!set_parent(a, a));
        assert!(set_parent(b, a));
        assert!(set_parent(c, b));
        assert!(!set_parent(a, c));

        assert_eq!(parent_of(a), None);
        assert_eq!(children_of(a), vec![b]);
    }

    #[test]
    fn test_reparenting_moves_child() {
        reset_registry();
        let a = component();
        let b = component();
        let child = component();

        set_parent(child, a);
        set_parent(child, a);
        assert_eq!(children_of(a), vec![child]);

        set_parent(child, b);
        assert!(children_of(a).is_empty());
        assert_eq!(children_of(b), vec![child]);
    }

    #[test]
    fn test_descendants_document_order() {
        reset_registry();
        let root = component();
        let a = component();
        let a1 = component();
        let b = component();
        set_parent(a, root);
        set_parent(a1, a);
        set_parent(b, root);

        assert_eq!(descendants(root, true), vec![root, a, a1, b]);
        assert_eq!(descendants(root, false), vec![a, a1, b]);
    }
}
