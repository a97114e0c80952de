//! Renderer - the "blind" output layer.
//!
//! The renderer knows only about draw calls. It doesn't understand
//! components, layout, or reactivity: elements issue fills and blits into a
//! [`Context2d`] and the surface rasterizes them.
//!
//! - [`surface`] - the `Surface` / `Context2d` / `ImageSource` contracts
//! - [`raster`] - an in-memory RGBA implementation plus `Bitmap` images

pub mod raster;
pub mod surface;

pub use raster::{Bitmap, RasterSurface};
pub use surface::{Context2d, ImageSource, ListenerId, Surface, Transform};
