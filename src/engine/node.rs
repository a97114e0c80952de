//! Scene nodes.
//!
//! A [`Node`] is the cheap handle user code passes around. The registry maps
//! it to a [`SceneNode`] holding the node's kind, its tree links and the
//! computations registered while it was expanded.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::error::Result;
use crate::layout::LayoutRects;
use crate::primitives::element::Element;
use crate::reactive::Computation;
use crate::types::NodeId;

// =============================================================================
// Public Handle
// =============================================================================

/// Handle to a declarative node.
///
/// The default node is empty and renders nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Node(pub(crate) Option<NodeId>);

impl Node {
    /// A node that renders nothing.
    pub const EMPTY: Node = Node(None);

    pub fn id(&self) -> Option<NodeId> {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }
}

impl From<NodeId> for Node {
    fn from(id: NodeId) -> Self {
        Node(Some(id))
    }
}

impl From<Option<Node>> for Node {
    fn from(node: Option<Node>) -> Self {
        node.unwrap_or_default()
    }
}

// =============================================================================
// Node Kinds
// =============================================================================

/// Identifies a context. `ContextId::ROOT` is reserved for the scene root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(pub(crate) u64);

impl ContextId {
    pub const ROOT: ContextId = ContextId(0);
}

pub(crate) type Producer = Rc<dyn Fn() -> Result<Node>>;

/// State of a dynamic node between reparses.
pub(crate) struct DynamicState {
    pub producer: Rc<dyn Fn() -> Node>,
    /// Last resolved contents. `None` until the first expansion.
    pub current: Option<Node>,
}

pub(crate) enum NodeKind {
    Element {
        element: Rc<dyn Element>,
        rects: LayoutRects,
    },
    Component(Producer),
    Dynamic(DynamicState),
    Context {
        context: ContextId,
        value: Rc<dyn Any>,
        child: Producer,
    },
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Element { .. } => "element",
            NodeKind::Component(_) => "component",
            NodeKind::Dynamic(_) => "dynamic",
            NodeKind::Context { .. } => "context",
        }
    }
}

/// A node of the scene tree.
pub(crate) struct SceneNode {
    pub kind: NodeKind,
    /// Node whose expansion created this one. Nodes are released together
    /// with their owner, so handles built outside a subtree survive it.
    pub owner: Option<NodeId>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub computations: Option<Vec<Computation>>,
}

impl SceneNode {
    pub fn new(kind: NodeKind, owner: Option<NodeId>) -> Self {
        Self {
            kind,
            owner,
            parent: None,
            children: Vec::new(),
            computations: None,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Element { .. })
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self.kind, NodeKind::Dynamic(_))
    }

    pub fn is_root_context(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Context {
                context: ContextId::ROOT,
                ..
            }
        )
    }
}

impl fmt::Debug for SceneNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneNode")
            .field("kind", &self.kind.name())
            .field("owner", &self.owner)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field(
                "computations",
                &self.computations.as_ref().map_or(0, Vec::len),
            )
            .finish()
    }
}
