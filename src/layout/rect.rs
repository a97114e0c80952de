//! Rect bookkeeping for the flow algorithm.

use crate::types::{Edges, Rect};

use super::types::LayoutRects;

/// The outer rect of an item plus the offsets deriving client and content.
///
/// Only the outer rect is stored. Writing a content size grows the outer
/// rect by the paddings and margins around it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct LayoutFrame {
    pub outer: Rect,
    pub margin: Edges,
    pub padding: Edges,
}

impl LayoutFrame {
    pub fn new(margin: Edges, padding: Edges) -> Self {
        Self {
            outer: Rect::ZERO,
            margin,
            padding,
        }
    }

    pub fn client(&self) -> Rect {
        self.outer.inset(self.margin)
    }

    pub fn content(&self) -> Rect {
        self.client().inset(self.padding)
    }

    pub fn set_content_width(&mut self, width: f64) {
        let client = (width + self.padding.horizontal()).max(0.0);
        self.outer.width = (client + self.margin.horizontal()).max(0.0);
    }

    pub fn set_content_height(&mut self, height: f64) {
        let client = (height + self.padding.vertical()).max(0.0);
        self.outer.height = (client + self.margin.vertical()).max(0.0);
    }

    pub fn rects(&self) -> LayoutRects {
        LayoutRects {
            outer: self.outer,
            client: self.client(),
            content: self.content(),
        }
    }
}

/// Width and height an item resolves to before intrinsic sizing, `None`
/// where the size comes from its rows. Laying out an item twice with the same
/// key yields the same subtree, up to translation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct SizeKey {
    pub width: Option<f64>,
    pub height: Option<f64>,
}

/// Results of earlier visits within one pass.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct LayoutCache {
    /// Key and outer rect of the last full layout of the subtree.
    pub laid_out: Option<(SizeKey, Rect)>,
    /// Outer size measured for a tentative placement.
    pub measured: Option<(SizeKey, f64, f64)>,
}

impl LayoutCache {
    /// Size of the item for `key`, if an earlier visit already settled it.
    pub fn size_for(&self, key: SizeKey) -> Option<(f64, f64)> {
        match (self.measured, self.laid_out) {
            (Some((measured, width, height)), _) if measured == key => Some((width, height)),
            (_, Some((laid_out, outer))) if laid_out == key => Some((outer.width, outer.height)),
            _ => None,
        }
    }
}

/// Running bounding box of rows and row members.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct BBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    initial: bool,
}

impl Default for BBox {
    fn default() -> Self {
        Self {
            x1: 0.0,
            y1: 0.0,
            x2: 0.0,
            y2: 0.0,
            initial: true,
        }
    }
}

impl BBox {
    pub fn join(&mut self, other: BBox) {
        if self.initial {
            *self = BBox {
                initial: false,
                ..other
            };
            return;
        }
        self.x1 = self.x1.min(self.x2).min(other.x1);
        self.y1 = self.y1.min(self.y2).min(other.y1);
        self.x2 = self.x1.max(self.x2).max(other.x2);
        self.y2 = self.y1.max(self.y2).max(other.y2);
    }

    pub fn join_rect(&mut self, rect: Rect) {
        self.join(BBox::from(rect));
    }
}

impl From<Rect> for BBox {
    fn from(rect: Rect) -> Self {
        Self {
            x1: rect.x,
            y1: rect.y,
            x2: rect.x2(),
            y2: rect.y2(),
            initial: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_size_grows_outer() {
        let mut frame = LayoutFrame::new(Edges::all(5.0), Edges::all(10.0));
        frame.set_content_width(100.0);
        frame.set_content_height(40.0);
        assert_eq!(frame.outer.width, 130.0);
        assert_eq!(frame.outer.height, 70.0);
        assert_eq!(frame.content(), Rect::new(15.0, 15.0, 100.0, 40.0));
    }

    #[test]
    fn test_bbox_join() {
        let mut bbox = BBox::default();
        bbox.join_rect(Rect::new(10.0, 10.0, 10.0, 10.0));
        assert_eq!((bbox.x1, bbox.y1, bbox.x2, bbox.y2), (10.0, 10.0, 20.0, 20.0));
        bbox.join_rect(Rect::new(0.0, 30.0, 5.0, 5.0));
        assert_eq!((bbox.x1, bbox.y1, bbox.x2, bbox.y2), (0.0, 10.0, 20.0, 35.0));
    }
}
