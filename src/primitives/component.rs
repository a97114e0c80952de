//! Components - nodes produced by a function.
//!
//! The producer runs when the node is expanded, with the component node as
//! the current scope: effects and cleanups it registers belong to it and are
//! torn down when the component leaves the tree.

use std::rc::Rc;

use crate::engine::node::NodeKind;
use crate::engine::{Node, registry};
use crate::error::Result;

/// Wrap a producer into a component node.
///
/// ```
/// use spark_canvas::{BoxProps, box_primitive, component};
///
/// let node = component(|| box_primitive(BoxProps::default()));
/// assert!(!node.is_empty());
/// ```
pub fn component(f: impl Fn() -> Node + 'static) -> Node {
    try_component(move || Ok(f()))
}

/// Like [`component`], for producers that can fail with a structural error.
pub fn try_component(f: impl Fn() -> Result<Node> + 'static) -> Node {
    registry::register(NodeKind::Component(Rc::new(f)))
}
