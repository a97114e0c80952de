//! Pipeline
//!
//! This module connects the scene tree to the surface.
//!
//! # Pipeline Architecture
//!
//! ```text
//! Scene tree -> layout_pass -> element rects -> paint -> Surface
//!                   ^
//!       layout-sync effects (prop changes), reparses
//! ```
//!
//! ## Data Flow
//!
//! 1. **layout_pass** - Gathers element props into layout items, runs the
//!    row-flow layout and stores the rects on each element
//! 2. **paint** - Walks elements in document order and calls their render hook
//! 3. **frame** - Frame id, time and pixel ratio shared with the tree
//! 4. **mount** - Entry point tying engine, frame context and surface together
//!
//! Layout reruns automatically; painting happens when the handle is asked
//! to render or a new frame is set.

pub mod frame;
pub(crate) mod layout_pass;
pub mod mount;
pub(crate) mod paint;

// Re-exports
pub use frame::{FrameContext, create_tick, scene_root, use_frame};
pub use mount::{MountHandle, MountOptions, PIXEL_RATIO_ENV, mount};
