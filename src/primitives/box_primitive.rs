//! Box Primitive - Container element with flow layout.
//!
//! The fundamental container element. Lays out its children in rows and can
//! fill its client rect with a solid color.
//!
//! # Reactivity
//!
//! Layout props are read by the element's layout-sync effect, so changing a
//! signal bound to width, margin, etc. re-runs layout. The fill style is read
//! at paint time.
//!
//! # Example
//!
//! ```ignore
//! use spark_canvas::{box_primitive, signal, BoxProps};
//! use spark_canvas::types::{Dimension, Rgba};
//!
//! let width = signal(Dimension::Fixed(40.0));
//!
//! let node = box_primitive(BoxProps {
//!     width: width.clone().into(),
//!     height: 10.into(),
//!     fill_style: Some(Rgba::BLUE.into()),
//!     ..Default::default()
//! });
//!
//! // Update width - layout follows once mounted
//! width.set(Dimension::Fixed(80.0))?;
//! ```

use crate::engine::Node;
use crate::layout::{LayoutProps, LayoutRects};
use crate::renderer::Context2d;
use crate::types::FillStyle;

use super::element::{Element, ElementHandle, create_element};
use super::types::BoxProps;

struct BoxElement {
    props: BoxProps,
}

impl Element for BoxElement {
    fn layout_props(&self) -> LayoutProps {
        LayoutProps {
            display: self.props.display.get(),
            width: self.props.width.get(),
            height: self.props.height.get(),
            margin: self.props.margin.get(),
            padding: self.props.padding.get(),
        }
    }

    fn children(&self) -> Vec<Node> {
        self.props.children.clone()
    }

    fn mount(&self, handle: &ElementHandle) {
        if let Some(node_ref) = &self.props.node_ref {
            node_ref.set(*handle);
        }
    }

    fn render(&self, context: &mut dyn Context2d, rects: &LayoutRects) {
        let Some(fill_style) = &self.props.fill_style else {
            return;
        };
        if let FillStyle::Color(color) = fill_style.get() {
            context.set_fill_style(color);
        }
        context.fill_rect(rects.client);
    }
}

/// Create a box element.
pub fn box_primitive(props: BoxProps) -> Node {
    create_element(BoxElement { props })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::node::NodeKind;
    use crate::engine::registry;
    use crate::primitives::types::{PropValue, create_ref};
    use crate::reactive::signal;
    use crate::renderer::{RasterSurface, Surface};
    use crate::types::{Dimension, Display, Edges, Rect, Rgba};

    fn element_of(node: Node) -> std::rc::Rc<dyn Element> {
        registry::with_node(node.id().unwrap(), |n| match &n.kind {
            NodeKind::Element { element, .. } => Some(element.clone()),
            _ => None,
        })
        .flatten()
        .unwrap()
    }

    #[test]
    fn test_box_defaults_to_block() {
        registry::reset_registry();
        let node = box_primitive(BoxProps::default());
        let props = element_of(node).layout_props();
        assert_eq!(props.display, Display::Block);
        assert_eq!(props.width, Dimension::Intrinsic);
        assert_eq!(props.margin, Edges::ZERO);
    }

    #[test]
    fn test_box_reactive_props() {
        registry::reset_registry();
        let width = signal(Dimension::Fixed(10.0));
        let node = box_primitive(BoxProps {
            width: width.clone().into(),
            padding: PropValue::getter(|| Edges::all(2.0)),
            ..Default::default()
        });
        let element = element_of(node);
        width.set(Dimension::Fill).unwrap();
        let props = element.layout_props();
        assert_eq!(props.width, Dimension::Fill);
        assert_eq!(props.padding, Edges::all(2.0));
    }

    #[test]
    fn test_box_fills_client_rect() {
        registry::reset_registry();
        let node = box_primitive(BoxProps {
            fill_style: Some(Rgba::RED.into()),
            ..Default::default()
        });
        let rects = LayoutRects {
            outer: Rect::new(0.0, 0.0, 4.0, 4.0),
            client: Rect::new(1.0, 1.0, 2.0, 2.0),
            content: Rect::new(1.0, 1.0, 2.0, 2.0),
        };

        let mut surface = RasterSurface::new(4, 4);
        let context = surface.context_2d().unwrap();
        element_of(node).render(context, &rects);

        assert_eq!(surface.pixel(0, 0), Some(Rgba::TRANSPARENT));
        assert_eq!(surface.pixel(1, 1), Some(Rgba::RED));
        assert_eq!(surface.pixel(2, 2), Some(Rgba::RED));
        assert_eq!(surface.pixel(3, 3), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn test_box_sets_ref_on_mount() {
        registry::reset_registry();
        let node_ref = create_ref();
        let node = box_primitive(BoxProps {
            node_ref: Some(node_ref.clone()),
            ..Default::default()
        });
        let handle = ElementHandle::new(node.id().unwrap());
        element_of(node).mount(&handle);
        assert_eq!(node_ref.get(), Some(handle));
    }
}
