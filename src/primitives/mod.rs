//! Primitives - Scene building blocks.
//!
//! This module provides the declarative producers user code builds trees
//! from:
//! - [`component`] - a node produced by a function
//! - [`dynamic`] - a node whose contents follow reactive state
//! - [`provider`] / [`use_context`] - values scoped to a subtree
//! - [`box_primitive`] - container with flow layout and an optional fill
//! - [`image`] - draws an image source
//! - [`create_element`] - registers any [`Element`] implementation
//!
//! # Reactivity
//!
//! Props can be:
//! - Static values: `width: 50.into()`
//! - Signals: `width: my_signal.clone().into()` (stays connected!)
//! - Getters: `width: PropValue::getter(|| compute_width())`
//!
//! Pass the signal itself, not its current value:
//!
//! ```ignore
//! // CORRECT - layout follows the signal
//! box_primitive(BoxProps { width: width_signal.clone().into(), ..Default::default() });
//!
//! // WRONG - reads once, never relayouts
//! box_primitive(BoxProps { width: width_signal.get().into(), ..Default::default() });
//! ```

pub mod box_primitive;
pub mod component;
pub mod context;
pub mod dynamic;
pub mod element;
pub mod image;
pub mod types;

pub use box_primitive::box_primitive;
pub use component::{component, try_component};
pub use context::{Context, create_context, provider, use_context};
pub use dynamic::dynamic;
pub use element::{Element, ElementHandle, create_element};
pub use image::image;
pub use types::{BoxProps, ImageProps, PropValue, Ref, create_ref};
