//! Scene to layout bridge.
//!
//! Every top-level element (an element with no element ancestor) is laid
//! out as an independent root. Element children are gathered through
//! non-element nodes, so components, dynamics and providers are transparent
//! to layout.

use std::rc::Rc;

use crate::engine::node::NodeKind;
use crate::engine::registry;
use crate::layout::{LayoutItem, compute_layout};
use crate::primitives::element::Element;
use crate::types::NodeId;

/// Lay out the tree below `root` and store the rects on each element.
/// Returns the number of elements laid out.
pub(crate) fn run(root: NodeId) -> usize {
    let mut count = 0;
    for id in registry::match_until(root, true) {
        let Some(mut item) = build(id) else {
            continue;
        };
        compute_layout(&mut item, |id, rects| {
            registry::with_node_mut(*id, |node| {
                if let NodeKind::Element { rects: slot, .. } = &mut node.kind {
                    *slot = *rects;
                }
            });
            count += 1;
        });
    }
    count
}

fn element(id: NodeId) -> Option<Rc<dyn Element>> {
    registry::with_node(id, |node| match &node.kind {
        NodeKind::Element { element, .. } => Some(element.clone()),
        _ => None,
    })
    .flatten()
}

fn build(id: NodeId) -> Option<LayoutItem<NodeId>> {
    let props = element(id)?.layout_props();
    let children = registry::match_until(id, false)
        .into_iter()
        .filter_map(build)
        .collect();
    Some(LayoutItem::new(id, props, children))
}
