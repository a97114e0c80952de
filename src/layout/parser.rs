//! Row-flow layout.
//!
//! Each item is parsed in two phases:
//!
//! 1. Children are placed left to right into rows. A child starts a new row
//!    when it is the first child, has block display, follows a block row, or
//!    would overflow the content width (checked by tentative placement).
//!    Intrinsic sizes are then taken from the rows' bounding box.
//! 2. Rows are walked again and every child is re-parsed at its final
//!    position, with fill widths and heights resolved against the space left
//!    over in its row or container.
//!
//! A subtree only depends on the size its root resolves to, so visits with
//! a size seen before reuse the earlier result: tentative placements take
//! the measured size, and a final placement at an already laid out size
//! moves the subtree instead of parsing it again.

use crate::types::{Dimension, Display, Rect};

use super::rect::SizeKey;
use super::rows::RowsReducer;
use super::types::{LayoutItem, LayoutRects};

/// Position and size pushed down by a container.
#[derive(Debug, Clone, Copy, Default)]
struct Overrides {
    x: Option<f64>,
    y: Option<f64>,
    width: Option<f64>,
    height: Option<f64>,
}

impl Overrides {
    fn sized(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            width: Some(width),
            height: Some(height),
        }
    }

    fn origin(&self) -> (f64, f64) {
        (self.x.unwrap_or(0.0), self.y.unwrap_or(0.0))
    }
}

/// Resolve a declared size to a fixed value.
///
/// Fill and intrinsic sizes start at 0 and are settled later in the pass.
fn resolve(value: Dimension, container: Option<f64>, override_value: Option<f64>) -> f64 {
    if let Some(value) = override_value {
        return value;
    }
    match value {
        Dimension::Fixed(value) => value,
        Dimension::Percent(percent) => {
            let ratio = percent / 100.0;
            if ratio > 0.0 {
                container.unwrap_or(0.0) * ratio
            } else {
                0.0
            }
        }
        Dimension::Fill | Dimension::Intrinsic => 0.0,
    }
}

fn size_key<T>(item: &LayoutItem<T>, container: Option<Rect>, overrides: Overrides) -> SizeKey {
    let axis = |value: Dimension, container: Option<f64>, override_value: Option<f64>| {
        if override_value.is_none() && value == Dimension::Intrinsic {
            None
        } else {
            Some(resolve(value, container, override_value).max(0.0))
        }
    };
    SizeKey {
        width: axis(item.props.width, container.map(|c| c.width), overrides.width),
        height: axis(item.props.height, container.map(|c| c.height), overrides.height),
    }
}

/// Move an already laid out subtree.
fn translate<T>(item: &mut LayoutItem<T>, dx: f64, dy: f64) {
    item.frame.outer.x += dx;
    item.frame.outer.y += dy;
    if let Some((_, outer)) = &mut item.cache.laid_out {
        outer.x += dx;
        outer.y += dy;
    }
    for child in &mut item.children {
        translate(child, dx, dy);
    }
}

/// Tentatively place an item at `(x, y)`, reusing a known size.
///
/// Only the item's outer rect is guaranteed to be current afterwards; its
/// descendants are settled by the final [`parse`] of the item.
fn place<T>(item: &mut LayoutItem<T>, container: Option<Rect>, x: f64, y: f64) {
    let overrides = Overrides {
        x: Some(x),
        y: Some(y),
        ..Overrides::default()
    };
    let key = size_key(item, container, overrides);
    match item.cache.size_for(key) {
        Some((width, height)) => item.frame.outer = Rect::new(x, y, width, height),
        None => {
            layout(item, key, x, y);
            let outer = item.frame.outer;
            item.cache.measured = Some((key, outer.width, outer.height));
        }
    }
}

/// Lay out an item and its subtree at its final position.
fn parse<T>(item: &mut LayoutItem<T>, container: Option<Rect>, overrides: Overrides) {
    let key = size_key(item, container, overrides);
    let (x, y) = overrides.origin();

    match item.cache.laid_out {
        Some((laid_out, outer)) if laid_out == key => {
            item.frame.outer = outer;
            let (dx, dy) = (x - outer.x, y - outer.y);
            if dx != 0.0 || dy != 0.0 {
                translate(item, dx, dy);
            }
        }
        _ => layout(item, key, x, y),
    }
}

fn layout<T>(item: &mut LayoutItem<T>, key: SizeKey, x: f64, y: f64) {
    item.frame.outer = Rect::new(
        x,
        y,
        key.width.unwrap_or(0.0),
        key.height.unwrap_or(0.0),
    );

    // Phase 1: place children into rows.
    let mut rows = RowsReducer::default();
    let content = item.frame.content();

    for index in 0..item.children.len() {
        let (display, width) = {
            let props = item.children[index].props;
            (props.display, props.width)
        };

        let Some(last) = rows.last_row().map(|row| (row.bbox, row.common.display)) else {
            place(&mut item.children[index], Some(content), content.x, content.y);
            rows.add_row(index, &item.children[index]);
            continue;
        };
        let (bbox, common_display) = last;

        if display == Display::Block {
            place(&mut item.children[index], Some(content), content.x, bbox.y2);
            rows.add_row(index, &item.children[index]);
            continue;
        }

        let exceeds = |child: &LayoutItem<T>| bbox.x2 + child.frame.outer.width > content.x2();
        let overflows = if common_display == Some(Display::Block) {
            true
        } else if width == Dimension::Fill {
            place(&mut item.children[index], Some(content), bbox.x2, bbox.y1);
            false
        } else {
            place(&mut item.children[index], Some(content), bbox.x2, bbox.y1);
            exceeds(&item.children[index])
        };

        if overflows {
            place(&mut item.children[index], Some(content), content.x, bbox.y2);
            rows.add_row(index, &item.children[index]);
        } else {
            rows.add_item(index, &item.children[index]);
        }
    }

    if key.width.is_none() {
        let width = if rows.is_empty() {
            0.0
        } else {
            rows.bbox.x2 - content.x
        };
        item.frame.set_content_width(width);
    }
    if key.height.is_none() {
        let height = if rows.is_empty() {
            0.0
        } else {
            rows.bbox.y2 - content.y
        };
        item.frame.set_content_height(height);
    }

    // Phase 2: settle fill sizes and final positions.
    let content = item.frame.content();
    let content_y2 = rows.last_row().map_or(content.y, |row| row.bbox.y2);
    let vertical_split = rows.vertical_split.max(1) as f64;
    let mut next_y = content.y;

    for row in rows.rows() {
        let offset_y = next_y - row.bbox.y1;
        let mut next_x = row.bbox.x1;

        for &index in &row.items {
            let child = &item.children[index];
            let as_container = child.props.display == Display::Block || row.items.len() == 1;

            let mut width = child.frame.outer.width;
            if child.props.width == Dimension::Fill {
                width = if as_container {
                    (content.x2() - row.bbox.x1).max(0.0)
                } else {
                    (content.x2() - row.bbox.x2).max(0.0) / row.horizontal_split.max(1) as f64
                };
            }

            let mut height = child.frame.outer.height;
            if child.props.height == Dimension::Fill {
                let shares_container = as_container
                    || (row.common.display == Some(Display::InlineBlock)
                        && row.common.height == Some(Dimension::Fill));
                height = if shares_container {
                    (content.y2() - content_y2).max(0.0) / vertical_split
                } else {
                    (row.bbox.y2 - child.frame.outer.y).max(0.0)
                };
            }

            let y = child.frame.outer.y + offset_y;
            parse(
                &mut item.children[index],
                Some(content),
                Overrides::sized(next_x, y, width, height),
            );

            let outer = item.children[index].frame.outer;
            next_x = next_x.max(outer.x2());
            next_y = next_y.max(outer.y2());
        }
    }

    item.cache.laid_out = Some((key, item.frame.outer));
}

fn visit<T>(item: &LayoutItem<T>, on_layout: &mut impl FnMut(&T, &LayoutRects)) {
    on_layout(&item.target, &item.rects());
    for child in &item.children {
        visit(child, on_layout);
    }
}

/// Lay out `root` (with no container) and report every item's rects.
///
/// `on_layout` is called once per item in document order after the whole
/// tree has been placed. Running the pass again yields identical rects.
///
/// # Example
///
/// ```
/// use spark_canvas::layout::{LayoutItem, LayoutProps, compute_layout};
/// use spark_canvas::types::{Dimension, Display};
///
/// let block = |width: f64, height: f64| LayoutProps {
///     display: Display::Block,
///     width: Dimension::Fixed(width),
///     height: Dimension::Fixed(height),
///     ..LayoutProps::default()
/// };
/// let mut root = LayoutItem::new("root", block(300.0, 300.0), vec![
///     LayoutItem::new("a", block(100.0, 50.0), vec![]),
///     LayoutItem::new("b", block(150.0, 100.0), vec![]),
/// ]);
///
/// let mut placed = Vec::new();
/// compute_layout(&mut root, |name, rects| placed.push((*name, rects.outer.y)));
/// assert_eq!(placed, vec![("root", 0.0), ("a", 0.0), ("b", 50.0)]);
/// ```
pub fn compute_layout<T>(root: &mut LayoutItem<T>, mut on_layout: impl FnMut(&T, &LayoutRects)) {
    root.reset();
    parse(root, None, Overrides::default());
    visit(root, &mut on_layout);
}
