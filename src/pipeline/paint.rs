//! Paint pass.
//!
//! One synchronous walk over every element in document order. The surface
//! transform is reset and scaled by the pixel ratio first, and the element
//! render calls are bracketed by save/restore so state set by one pass does
//! not leak into the next.

use std::rc::Rc;

use crate::engine::node::NodeKind;
use crate::engine::registry;
use crate::layout::LayoutRects;
use crate::primitives::element::Element;
use crate::renderer::{Context2d, Transform};
use crate::types::{NodeId, Rect};

/// Paint every element below `root`. Returns the number of elements drawn.
pub(crate) fn paint(
    context: &mut dyn Context2d,
    width: u32,
    height: u32,
    pixel_ratio: f64,
    root: NodeId,
) -> usize {
    let elements: Vec<(Rc<dyn Element>, LayoutRects)> = registry::match_all(root, true)
        .into_iter()
        .filter_map(|id| {
            registry::with_node(id, |node| match &node.kind {
                NodeKind::Element { element, rects } => Some((element.clone(), *rects)),
                _ => None,
            })
            .flatten()
        })
        .collect();

    context.reset_transform();
    context.clear_rect(Rect::new(0.0, 0.0, width as f64, height as f64));
    context.set_transform(Transform::scale(pixel_ratio, pixel_ratio));

    context.save();
    for (element, rects) in &elements {
        element.render(context, rects);
    }
    context.restore();

    elements.len()
}
