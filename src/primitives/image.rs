//! Image Primitive - Draws an image source into its content rect.
//!
//! An image whose width or height is intrinsic takes the source's natural
//! size (plus its own padding and margin) once the source has loaded. The
//! load notification bumps a signal read by `layout_props`, so a late load
//! reruns layout through the element's layout-sync effect.
//!
//! Load and error listeners live as long as the element is mounted.

use tracing::{trace, warn};

use crate::engine::Node;
use crate::layout::{LayoutProps, LayoutRects};
use crate::reactive::{Signal, on_cleanup, signal};
use crate::renderer::Context2d;
use crate::types::Dimension;

use super::element::{Element, ElementHandle, create_element};
use super::types::ImageProps;

struct ImageElement {
    props: ImageProps,
    /// Bumped on every load notification.
    loaded: Signal<u64>,
}

impl ImageElement {
    fn natural(&self, value: Dimension, natural: u32, edges: f64) -> Dimension {
        match value {
            Dimension::Intrinsic if self.props.source.is_complete() => {
                Dimension::Fixed(natural as f64 + edges)
            }
            other => other,
        }
    }
}

impl Element for ImageElement {
    fn layout_props(&self) -> LayoutProps {
        self.loaded.get();
        let margin = self.props.margin.get();
        let padding = self.props.padding.get();
        let source = &self.props.source;
        LayoutProps {
            display: self.props.display.get(),
            width: self.natural(
                self.props.width.get(),
                source.width(),
                margin.horizontal() + padding.horizontal(),
            ),
            height: self.natural(
                self.props.height.get(),
                source.height(),
                margin.vertical() + padding.vertical(),
            ),
            margin,
            padding,
        }
    }

    fn mount(&self, handle: &ElementHandle) {
        let source = self.props.source.clone();
        let counter = self.loaded.clone();
        let load = source.on_load(Box::new(move || {
            trace!("image loaded");
            if let Err(error) = counter.update(|n| n + 1) {
                warn!(%error, "relayout after image load failed");
            }
        }));
        let error = source.on_error(Box::new(|message: &str| {
            warn!(reason = message, "image failed to load");
        }));
        on_cleanup(move || {
            source.remove_listener(load);
            source.remove_listener(error);
        });

        if let Some(node_ref) = &self.props.node_ref {
            node_ref.set(*handle);
        }
    }

    fn render(&self, context: &mut dyn Context2d, rects: &LayoutRects) {
        if !self.props.source.is_complete() {
            return;
        }
        context.draw_image(self.props.source.as_ref(), rects.content);
    }
}

/// Create an image element.
pub fn image(props: ImageProps) -> Node {
    create_element(ImageElement {
        props,
        loaded: signal(0),
    })
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::engine::node::NodeKind;
    use crate::engine::registry;
    use crate::pipeline::mount::{MountOptions, mount};
    use crate::primitives::dynamic::dynamic;
    use crate::reactive::{Scope, create_computed, with_scope};
    use crate::renderer::{Bitmap, RasterSurface, Surface};
    use crate::types::{Edges, Rect, Rgba};

    fn element_of(node: Node) -> Rc<dyn Element> {
        registry::with_node(node.id().unwrap(), |n| match &n.kind {
            NodeKind::Element { element, .. } => Some(element.clone()),
            _ => None,
        })
        .flatten()
        .unwrap()
    }

    fn mounted(node: Node) -> Rc<dyn Element> {
        let id = node.id().unwrap();
        let element = element_of(node);
        with_scope(Scope::Node(id), || element.mount(&ElementHandle::new(id)));
        element
    }

    #[test]
    fn test_intrinsic_size_follows_natural_size() {
        registry::reset_registry();
        let bitmap = Bitmap::solid(8, 4, Rgba::RED);
        let mut props = ImageProps::new(Rc::new(bitmap));
        props.padding = Edges::all(1.0).into();
        props.margin = Edges::symmetric(2.0, 0.0).into();
        let element = element_of(image(props));

        let layout = element.layout_props();
        assert_eq!(layout.width, Dimension::Fixed(10.0));
        assert_eq!(layout.height, Dimension::Fixed(10.0));
    }

    #[test]
    fn test_explicit_size_wins() {
        registry::reset_registry();
        let mut props = ImageProps::new(Rc::new(Bitmap::solid(8, 4, Rgba::RED)));
        props.width = Dimension::Percent(50.0).into();
        let layout = element_of(image(props)).layout_props();
        assert_eq!(layout.width, Dimension::Percent(50.0));
        assert_eq!(layout.height, Dimension::Fixed(4.0));
    }

    #[test]
    fn test_late_load_is_tracked() {
        registry::reset_registry();
        let bitmap = Bitmap::pending();
        let element = mounted(image(ImageProps::new(Rc::new(bitmap.clone()))));
        assert_eq!(element.layout_props().width, Dimension::Intrinsic);

        let seen = Rc::new(std::cell::RefCell::new(Vec::new()));
        let (log, tracked) = (seen.clone(), element.clone());
        create_computed(move || log.borrow_mut().push(tracked.layout_props().width));

        bitmap.load(3, 3, vec![Rgba::BLUE; 9]);
        assert_eq!(*seen.borrow(), vec![Dimension::Intrinsic, Dimension::Fixed(3.0)]);
    }

    #[test]
    fn test_draws_into_content_rect() {
        registry::reset_registry();
        let element = element_of(image(ImageProps::new(Rc::new(Bitmap::solid(1, 1, Rgba::GREEN)))));
        let rects = LayoutRects {
            outer: Rect::new(0.0, 0.0, 4.0, 4.0),
            client: Rect::new(0.0, 0.0, 4.0, 4.0),
            content: Rect::new(1.0, 1.0, 2.0, 2.0),
        };

        let mut surface = RasterSurface::new(4, 4);
        element.render(surface.context_2d().unwrap(), &rects);

        assert_eq!(surface.pixel(0, 0), Some(Rgba::TRANSPARENT));
        assert_eq!(surface.pixel(1, 2), Some(Rgba::GREEN));
        assert_eq!(surface.pixel(3, 3), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn test_pending_image_draws_nothing() {
        registry::reset_registry();
        let element = element_of(image(ImageProps::new(Rc::new(Bitmap::pending()))));
        let rects = LayoutRects {
            outer: Rect::new(0.0, 0.0, 2.0, 2.0),
            client: Rect::new(0.0, 0.0, 2.0, 2.0),
            content: Rect::new(0.0, 0.0, 2.0, 2.0),
        };
        let mut surface = RasterSurface::new(2, 2);
        element.render(surface.context_2d().unwrap(), &rects);
        assert!(surface.pixels().iter().all(|p| *p == Rgba::TRANSPARENT));
    }

    #[test]
    fn test_load_error_is_logged() {
        registry::reset_registry();
        let bitmap = Bitmap::pending();
        mounted(image(ImageProps::new(Rc::new(bitmap.clone()))));

        let (_, logs) = crate::testing::capture_logs(|| bitmap.fail("truncated data"));
        assert!(
            logs.iter()
                .any(|line| line.contains("image failed to load") && line.contains("truncated data")),
            "{logs:?}"
        );
    }

    #[test]
    fn test_listeners_released_with_element() {
        registry::reset_registry();
        let bitmap = Bitmap::pending();
        let tick = signal(0);

        let (source, shared) = (tick.clone(), bitmap.clone());
        let handle = mount(
            RasterSurface::new(4, 4),
            move || {
                let (source, shared) = (source.clone(), shared.clone());
                dynamic(move || {
                    source.get();
                    image(ImageProps::new(Rc::new(shared.clone())))
                })
            },
            MountOptions::default().with_rapid_reparse_limit(0),
        )
        .unwrap();
        assert_eq!(bitmap.listener_count(), 2);

        for n in 1..=100 {
            tick.set(n).unwrap();
        }
        assert_eq!(bitmap.listener_count(), 2);

        handle.unmount();
        assert_eq!(bitmap.listener_count(), 0);
    }
}
