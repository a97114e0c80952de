//! Layout Module - Row-flow layout engine.
//!
//! Items flow left to right in rows. Two display modes (block, inline-block)
//! and four size modes (fixed, percent, fill, intrinsic) are supported.
//!
//! Every item ends a pass with three nested rects:
//!
//! ```text
//! outer   - position and size in the parent's content area
//! client  - outer minus margins
//! content - client minus paddings (where children go)
//! ```
//!
//! Layout items are plain data. The scene graph bridge lives in
//! `pipeline::layout_pass`.

pub mod parser;
pub(crate) mod rect;
pub(crate) mod rows;
pub mod types;

pub use parser::compute_layout;
pub use types::{LayoutItem, LayoutProps, LayoutRects};
