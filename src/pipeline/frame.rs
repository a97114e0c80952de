//! Frame driver.
//!
//! The scene root is a context node carrying a [`FrameContext`]. An external
//! driver (a window's animation callback, a test loop) feeds it increasing
//! frame ids and timestamps; code in the tree reads the frame signal through
//! [`use_frame`] or registers a per-frame callback with [`create_tick`].

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::engine::node::ContextId;
use crate::engine::orchestrator::frame_of;
use crate::engine::{Node, current_engine};
use crate::error::{Error, Result};
use crate::primitives::context::{find_context, provide_raw};
use crate::reactive::{Signal, create_effect, signal, untrack};

/// Per-mount frame state shared with the tree.
pub struct FrameContext {
    pixel_ratio: Signal<f64>,
    frame_id: Signal<i64>,
    time: Cell<f64>,
    delta_time: Cell<f64>,
}

impl FrameContext {
    pub fn new(pixel_ratio: f64) -> Self {
        Self {
            pixel_ratio: signal(pixel_ratio),
            frame_id: signal(-1),
            time: Cell::new(0.0),
            delta_time: Cell::new(0.0),
        }
    }

    /// Device pixels per layout unit (tracked).
    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio.get()
    }

    pub fn pixel_ratio_untracked(&self) -> f64 {
        self.pixel_ratio.get_untracked()
    }

    pub fn set_pixel_ratio(&self, ratio: f64) -> Result<()> {
        self.pixel_ratio.set(ratio)
    }

    /// Id of the last frame (tracked). `-1` before the first frame.
    pub fn frame_id(&self) -> i64 {
        self.frame_id.get()
    }

    /// Timestamp of the last frame.
    pub fn time(&self) -> f64 {
        self.time.get()
    }

    /// Time between the last two frames.
    pub fn delta_time(&self) -> f64 {
        self.delta_time.get()
    }

    /// Advance to frame `id` at `time`.
    ///
    /// Time and delta time are updated before the frame signal is written, so
    /// subscribers see the new values.
    pub fn set_frame(&self, id: i64, time: f64) -> Result<()> {
        let previous = self.time.replace(time);
        self.delta_time.set(time - previous);
        self.frame_id.set(id)
    }
}

impl Default for FrameContext {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl fmt::Debug for FrameContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameContext")
            .field("pixel_ratio", &self.pixel_ratio_untracked())
            .field("frame_id", &self.frame_id.get_untracked())
            .field("time", &self.time.get())
            .field("delta_time", &self.delta_time.get())
            .finish()
    }
}

/// A scene root around `app` with a default frame context.
pub fn scene_root(app: impl Fn() -> Node + 'static) -> Node {
    scene_root_with(Rc::new(FrameContext::default()), app)
}

pub(crate) fn scene_root_with(frame: Rc<FrameContext>, app: impl Fn() -> Node + 'static) -> Node {
    provide_raw(ContextId::ROOT, frame, app)
}

/// Frame context of the tree the current scope belongs to.
///
/// Outside any scene node this falls back to the root of the engine that is
/// mounting; with neither it fails with [`Error::NotMounting`].
pub fn use_frame() -> Result<Rc<FrameContext>> {
    let provided = find_context(ContextId::ROOT).and_then(|value| value.downcast::<FrameContext>().ok());
    if let Some(frame) = provided {
        return Ok(frame);
    }
    let engine = current_engine()?;
    engine.root().and_then(frame_of).ok_or(Error::MissingRoot)
}

/// Run `f` with the delta time on every frame, and once when mounted.
pub fn create_tick(f: impl Fn(f64) + 'static) -> Result<()> {
    let frame = use_frame()?;
    create_effect(move || {
        frame.frame_id();
        untrack(|| f(frame.delta_time()));
    });
    Ok(())
}
