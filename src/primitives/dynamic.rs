//! Dynamic nodes - contents that follow reactive state.
//!
//! The contents producer is wrapped in a memo when the node is first
//! expanded. When the memoised node changes after mount, the dynamic node
//! reparses itself through the engine that mounted it: the previous
//! contents are torn down and the new contents are expanded in place.
//!
//! ```ignore
//! let open = signal(false);
//! let toggle = open.clone();
//! dynamic(move || if toggle.get() { panel() } else { Node::EMPTY })
//! ```

use std::rc::Rc;

use crate::engine::node::{DynamicState, NodeKind};
use crate::engine::{Node, registry};

/// Create a dynamic node whose contents are re-evaluated reactively.
pub fn dynamic(contents: impl Fn() -> Node + 'static) -> Node {
    registry::register(NodeKind::Dynamic(DynamicState {
        producer: Rc::new(contents),
        current: None,
    }))
}
