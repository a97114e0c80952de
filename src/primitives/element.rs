//! Elements - drawable scene nodes.
//!
//! An element supplies layout props, a child list, a mount hook and a render
//! hook. The engine gives every mounted element a layout-sync effect: reads
//! made by [`Element::layout_props`] are tracked, and a change after mount
//! reruns the layout pass.

use std::rc::Rc;

use crate::engine::node::NodeKind;
use crate::engine::{Node, registry};
use crate::layout::{LayoutProps, LayoutRects};
use crate::renderer::Context2d;
use crate::types::NodeId;

/// A drawable scene node.
pub trait Element: 'static {
    /// Current layout props. Signal reads here are tracked.
    fn layout_props(&self) -> LayoutProps;

    /// Declared children, laid out inside this element's content rect.
    fn children(&self) -> Vec<Node> {
        Vec::new()
    }

    /// Called while the element is expanded, with the element as scope.
    fn mount(&self, _handle: &ElementHandle) {}

    /// Draw into the surface using the rects of the last layout pass.
    fn render(&self, _context: &mut dyn Context2d, _rects: &LayoutRects) {}
}

/// Register an element as a scene node.
pub fn create_element(element: impl Element) -> Node {
    registry::register(NodeKind::Element {
        element: Rc::new(element),
        rects: LayoutRects::default(),
    })
}

/// Handle to a mounted element, handed to refs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementHandle {
    id: NodeId,
}

impl ElementHandle {
    pub(crate) fn new(id: NodeId) -> Self {
        Self { id }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn node(&self) -> Node {
        Node(Some(self.id))
    }

    /// Rects from the last layout pass, `None` once the element is released.
    pub fn rects(&self) -> Option<LayoutRects> {
        registry::with_node(self.id, |node| match &node.kind {
            NodeKind::Element { rects, .. } => Some(*rects),
            _ => None,
        })
        .flatten()
    }
}
