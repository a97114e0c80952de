//! Mount API - Application lifecycle.
//!
//! This module provides the entry point for mounting an application onto a
//! surface: it creates the engine, the frame context and the scene root,
//! mounts the tree and paints it once.
//!
//! # Example
//!
//! ```
//! use spark_canvas::renderer::RasterSurface;
//! use spark_canvas::types::Rgba;
//! use spark_canvas::{BoxProps, MountOptions, box_primitive, mount};
//!
//! let surface = RasterSurface::new(4, 4);
//! let handle = mount(
//!     surface.clone(),
//!     || box_primitive(BoxProps {
//!         width: 2.into(),
//!         height: 2.into(),
//!         fill_style: Some(Rgba::RED.into()),
//!         ..Default::default()
//!     }),
//!     MountOptions::default(),
//! )?;
//!
//! assert_eq!(surface.pixel(1, 1), Some(Rgba::RED));
//! assert_eq!(surface.pixel(2, 2), Some(Rgba::TRANSPARENT));
//!
//! // Drive frames from your own loop
//! handle.set_frame(0, 16.0)?;
//!
//! // Clean up
//! handle.unmount();
//! # Ok::<(), spark_canvas::Error>(())
//! ```

use std::rc::Rc;
use std::time::Duration;

use tracing::{debug, warn};

use super::frame::{FrameContext, scene_root_with};
use crate::engine::{Engine, Node, registry};
use crate::error::{Error, Result};
use crate::renderer::Surface;

/// Environment variable overriding the initial pixel ratio.
pub const PIXEL_RATIO_ENV: &str = "SPARK_CANVAS_PIXEL_RATIO";

// =============================================================================
// Mount Options
// =============================================================================

/// Options for [`mount`] and [`Engine`].
#[derive(Debug, Clone, PartialEq)]
pub struct MountOptions {
    /// Initial device pixels per layout unit.
    pub pixel_ratio: f64,
    /// Consecutive rapid re-evaluations of a dynamic node before warning.
    /// `0` disables the warning.
    pub rapid_reparse_limit: u32,
    /// Two re-evaluations closer than this count as rapid.
    pub rapid_reparse_window: Duration,
    /// Paint once right after mounting.
    pub render_on_mount: bool,
}

impl Default for MountOptions {
    fn default() -> Self {
        Self {
            pixel_ratio: 1.0,
            rapid_reparse_limit: 10,
            rapid_reparse_window: Duration::from_millis(30),
            render_on_mount: true,
        }
    }
}

impl MountOptions {
    /// Defaults, with the pixel ratio taken from `SPARK_CANVAS_PIXEL_RATIO`
    /// when it holds a positive number.
    pub fn from_env() -> Self {
        Self::default().with_pixel_ratio_var(std::env::var(PIXEL_RATIO_ENV).ok())
    }

    fn with_pixel_ratio_var(self, value: Option<String>) -> Self {
        let Some(value) = value else {
            return self;
        };
        match value.trim().parse::<f64>() {
            Ok(ratio) if ratio.is_finite() && ratio > 0.0 => self.with_pixel_ratio(ratio),
            _ => {
                warn!(var = PIXEL_RATIO_ENV, value = %value, "ignoring invalid pixel ratio");
                self
            }
        }
    }

    pub fn with_pixel_ratio(mut self, ratio: f64) -> Self {
        self.pixel_ratio = ratio;
        self
    }

    pub fn with_rapid_reparse_limit(mut self, limit: u32) -> Self {
        self.rapid_reparse_limit = limit;
        self
    }

    pub fn with_rapid_reparse_window(mut self, window: Duration) -> Self {
        self.rapid_reparse_window = window;
        self
    }

    pub fn with_render_on_mount(mut self, render: bool) -> Self {
        self.render_on_mount = render;
        self
    }
}

// =============================================================================
// Mount Handle
// =============================================================================

/// Handle returned by [`mount`]. Dropping it unmounts the tree.
pub struct MountHandle {
    engine: Engine,
    root: Node,
    frame: Rc<FrameContext>,
}

impl MountHandle {
    /// Paint the tree into the surface.
    pub fn render(&self) -> Result<()> {
        self.engine.render()
    }

    /// Recompute layout without painting.
    pub fn layout(&self) {
        self.engine.layout();
    }

    /// Advance to frame `id` at `time`, then paint.
    pub fn set_frame(&self, id: i64, time: f64) -> Result<()> {
        self.frame.set_frame(id, time)?;
        self.render()
    }

    /// Change the pixel ratio, then paint.
    pub fn set_pixel_ratio(&self, ratio: f64) -> Result<()> {
        self.frame.set_pixel_ratio(ratio)?;
        self.render()
    }

    pub fn frame(&self) -> Rc<FrameContext> {
        self.frame.clone()
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn root(&self) -> Node {
        self.root
    }

    /// Tear down the tree and release the root.
    pub fn unmount(self) {
        drop(self);
    }
}

impl Drop for MountHandle {
    fn drop(&mut self) {
        self.engine.unmount();
        if let Some(root) = self.root.id() {
            registry::release(root);
        }
    }
}

/// Mount `app` onto `surface`.
///
/// Fails with [`Error::Unsupported2d`] if the surface has no 2D context.
pub fn mount(
    mut surface: impl Surface + 'static,
    app: impl Fn() -> Node + 'static,
    options: MountOptions,
) -> Result<MountHandle> {
    if surface.context_2d().is_none() {
        return Err(Error::Unsupported2d);
    }

    let frame = Rc::new(FrameContext::new(options.pixel_ratio));
    let root = scene_root_with(frame.clone(), app);
    let render_on_mount = options.render_on_mount;
    let engine = Engine::with_surface(Box::new(surface), options);

    // Constructed before mounting so a failed mount still releases the root.
    let handle = MountHandle { engine, root, frame };
    handle.engine.mount(root)?;
    if render_on_mount {
        handle.render()?;
    }
    debug!(root = ?root.id(), "mounted");
    Ok(handle)
}
