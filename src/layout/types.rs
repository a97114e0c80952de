//! Layout input and output types.

use crate::types::{Dimension, Display, Edges, Rect};

use super::rect::{LayoutCache, LayoutFrame};

/// Layout-relevant properties of an item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutProps {
    pub display: Display,
    pub width: Dimension,
    pub height: Dimension,
    pub margin: Edges,
    pub padding: Edges,
}

impl Default for LayoutProps {
    fn default() -> Self {
        Self {
            display: Display::InlineBlock,
            width: Dimension::Intrinsic,
            height: Dimension::Intrinsic,
            margin: Edges::ZERO,
            padding: Edges::ZERO,
        }
    }
}

/// The three nested rectangles of a laid out item.
///
/// `client` is `outer` minus margins, `content` is `client` minus paddings.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutRects {
    pub outer: Rect,
    pub client: Rect,
    pub content: Rect,
}

/// One node of the layout tree, rebuilt for every pass.
#[derive(Debug, Clone)]
pub struct LayoutItem<T> {
    pub target: T,
    pub props: LayoutProps,
    pub children: Vec<LayoutItem<T>>,
    pub(crate) frame: LayoutFrame,
    pub(crate) cache: LayoutCache,
}

impl<T> LayoutItem<T> {
    /// Create an item. Negative margins and paddings are clamped to zero.
    pub fn new(target: T, props: LayoutProps, children: Vec<LayoutItem<T>>) -> Self {
        let props = LayoutProps {
            margin: props.margin.non_negative(),
            padding: props.padding.non_negative(),
            ..props
        };
        Self {
            target,
            props,
            children,
            frame: LayoutFrame::new(props.margin, props.padding),
            cache: LayoutCache::default(),
        }
    }

    /// Rectangles from the last pass.
    pub fn rects(&self) -> LayoutRects {
        self.frame.rects()
    }

    pub(crate) fn reset(&mut self) {
        self.frame.outer = Rect::ZERO;
        self.cache = LayoutCache::default();
        for child in &mut self.children {
            child.reset();
        }
    }
}
