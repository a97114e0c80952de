//! # spark-canvas
//!
//! Reactive scene-graph engine for 2D raster surfaces.
//!
//! ## Architecture
//!
//! User code builds a declarative tree of [`Node`]s from components,
//! dynamic nodes, context providers and elements. The [`Engine`] expands it
//! into a scene tree, and a push-based reactive core keeps it in sync:
//!
//! ```text
//! signal write -> computations -> dynamic reparse / layout-sync -> layout pass
//!                                                     render() -> paint pass
//! ```
//!
//! Every write settles synchronously before `set` returns.
//!
//! ## Modules
//!
//! - [`types`] - Core types (Rgba, Dimension, Edges, Rect, NodeId)
//! - [`reactive`] - Signals, memos, effects and the scope stack
//! - [`engine`] - Scene node registry and the mount orchestrator
//! - [`layout`] - Row-flow layout engine
//! - [`pipeline`] - Layout and paint passes, frame driver, mount entry point
//! - [`primitives`] - Components, dynamic nodes, context, box and image elements
//! - [`renderer`] - Surface traits and an in-memory raster surface
//!
//! ## Example
//!
//! ```
//! use spark_canvas::{signal, create_memo};
//!
//! let count = signal(2);
//! let doubled = {
//!     let count = count.clone();
//!     create_memo(move |_| count.get() * 2)
//! };
//! count.set(5)?;
//! assert_eq!(doubled.get(), 10);
//! # Ok::<(), spark_canvas::Error>(())
//! ```

pub mod engine;
pub mod error;
pub mod layout;
pub mod pipeline;
pub mod primitives;
pub mod reactive;
pub mod renderer;
pub mod types;

#[cfg(test)]
mod testing;

// Re-export commonly used items
pub use error::{Error, Result};

pub use engine::{Engine, Node, current_engine};

pub use reactive::{
    Memo, Signal, create_computed, create_effect, create_memo, create_memo_with, on_cleanup,
    on_mount, signal, untrack,
};

pub use pipeline::{
    FrameContext, MountHandle, MountOptions, create_tick, mount, scene_root, use_frame,
};

pub use primitives::{
    BoxProps, Context, Element, ElementHandle, ImageProps, PropValue, Ref, box_primitive,
    component, create_context, create_element, create_ref, dynamic, image, provider,
    try_component, use_context,
};
