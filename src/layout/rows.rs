//! Rows - horizontal bands of sibling items.

use smallvec::SmallVec;

use super::rect::BBox;
use super::types::LayoutItem;
use crate::types::{Dimension, Display};

/// Properties every member of a row shares, `None` where they diverge.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct CommonProps {
    pub display: Option<Display>,
    pub width: Option<Dimension>,
    pub height: Option<Dimension>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Row {
    /// Indices into the parent's children.
    pub items: SmallVec<[usize; 8]>,
    pub bbox: BBox,
    pub common: CommonProps,
    /// Members whose width fills the remaining row space.
    pub horizontal_split: usize,
}

impl Row {
    fn add<T>(&mut self, index: usize, item: &LayoutItem<T>) {
        let props = item.props;
        self.bbox.join_rect(item.frame.outer);

        if self.items.is_empty() {
            self.common = CommonProps {
                display: Some(props.display),
                width: Some(props.width),
                height: Some(props.height),
            };
        } else {
            let common = &mut self.common;
            if common.display.is_some_and(|display| display != props.display) {
                common.display = None;
            }
            if common.width.is_some_and(|width| width != props.width) {
                common.width = None;
            }
            if common.height.is_some_and(|height| height != props.height) {
                common.height = None;
            }
        }

        if props.width == Dimension::Fill {
            self.horizontal_split += 1;
        }
        self.items.push(index);
    }
}

/// Accumulates rows while a container places its children.
#[derive(Debug, Clone, Default)]
pub(crate) struct RowsReducer {
    rows: Vec<Row>,
    /// Rows sharing the leftover container height.
    pub vertical_split: usize,
    /// An inline fill-height row only counts while it stays alone.
    conditional_divisor: bool,
    pub bbox: BBox,
}

impl RowsReducer {
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn last_row(&self) -> Option<&Row> {
        self.rows.last()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn add_row<T>(&mut self, index: usize, item: &LayoutItem<T>) {
        let mut row = Row::default();
        row.add(index, item);
        self.bbox.join(row.bbox);
        self.rows.push(row);

        if item.props.height == Dimension::Fill {
            if item.props.display == Display::InlineBlock {
                self.conditional_divisor = true;
            }
            self.vertical_split += 1;
        }
    }

    pub fn add_item<T>(&mut self, index: usize, item: &LayoutItem<T>) {
        let Some(row) = self.rows.last_mut() else {
            self.add_row(index, item);
            return;
        };
        row.add(index, item);
        self.bbox.join(row.bbox);

        if self.conditional_divisor {
            self.conditional_divisor = false;
            self.vertical_split = self.vertical_split.saturating_sub(1);
        }
    }
}
