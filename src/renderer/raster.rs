//! In-memory RGBA raster surface and bitmap images.
//!
//! # Design Decisions
//!
//! - **Flat storage**: `Vec<Rgba>` with row-major indexing (`y * width + x`).
//! - **Pixel centers**: a pixel is covered when its center lies inside the
//!   transformed rectangle.
//! - **Alpha blending**: fills and image blits blend over existing pixels;
//!   `clear_rect` overwrites with transparent.
//! - **Shared handle**: [`RasterSurface`] is a cheap clone over shared
//!   storage, so callers can keep one to read pixels after mounting.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use indexmap::IndexMap;

use super::surface::{Context2d, ImageSource, ListenerId, Surface, Transform};
use crate::types::{Rect, Rgba};

// =============================================================================
// Raster
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
struct DrawState {
    transform: Transform,
    fill_style: Rgba,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            transform: Transform::IDENTITY,
            fill_style: Rgba::BLACK,
        }
    }
}

#[derive(Debug)]
struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
    state: DrawState,
    stack: Vec<DrawState>,
}

impl Raster {
    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Device pixels whose centers fall inside `rect` (device space).
    fn covered(&self, rect: Rect) -> Option<(u32, u32, u32, u32)> {
        let clamp_x = |v: f64| v.clamp(0.0, self.width as f64) as u32;
        let clamp_y = |v: f64| v.clamp(0.0, self.height as f64) as u32;
        let x0 = clamp_x((rect.x - 0.5).ceil());
        let x1 = clamp_x((rect.x2() - 0.5).ceil());
        let y0 = clamp_y((rect.y - 0.5).ceil());
        let y1 = clamp_y((rect.y2() - 0.5).ceil());
        (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
    }

    fn fill(&mut self, rect: Rect, color: Rgba) {
        let device = self.state.transform.map_rect(rect);
        let Some((x0, y0, x1, y1)) = self.covered(device) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                let index = self.index(x, y);
                self.pixels[index] = Rgba::blend(color, self.pixels[index]);
            }
        }
    }

    fn clear(&mut self, rect: Rect) {
        let device = self.state.transform.map_rect(rect);
        let Some((x0, y0, x1, y1)) = self.covered(device) else {
            return;
        };
        for y in y0..y1 {
            let start = self.index(x0, y);
            let end = self.index(x1 - 1, y) + 1;
            self.pixels[start..end].fill(Rgba::TRANSPARENT);
        }
    }

    fn blit(&mut self, image: &dyn ImageSource, rect: Rect) {
        let (src_w, src_h) = (image.width(), image.height());
        if !image.is_complete() || src_w == 0 || src_h == 0 {
            return;
        }
        let device = self.state.transform.map_rect(rect);
        if device.width <= 0.0 || device.height <= 0.0 {
            return;
        }
        let Some((x0, y0, x1, y1)) = self.covered(device) else {
            return;
        };
        for y in y0..y1 {
            let v = (y as f64 + 0.5 - device.y) / device.height;
            let sy = ((v * src_h as f64) as u32).min(src_h - 1);
            for x in x0..x1 {
                let u = (x as f64 + 0.5 - device.x) / device.width;
                let sx = ((u * src_w as f64) as u32).min(src_w - 1);
                if let Some(color) = image.sample(sx, sy) {
                    let index = self.index(x, y);
                    self.pixels[index] = Rgba::blend(color, self.pixels[index]);
                }
            }
        }
    }
}

// =============================================================================
// RasterSurface
// =============================================================================

/// An in-memory RGBA surface with a 2D context.
///
/// # Example
///
/// ```
/// use spark_canvas::renderer::{Context2d, RasterSurface};
/// use spark_canvas::types::{Rect, Rgba};
///
/// let mut surface = RasterSurface::new(4, 4);
/// surface.set_fill_style(Rgba::RED);
/// surface.fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0));
/// assert_eq!(surface.pixel(1, 1), Some(Rgba::RED));
/// assert_eq!(surface.pixel(2, 2), Some(Rgba::TRANSPARENT));
/// ```
#[derive(Debug, Clone)]
pub struct RasterSurface {
    inner: Rc<RefCell<Raster>>,
}

impl RasterSurface {
    /// Create a transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Raster {
                width,
                height,
                pixels: vec![Rgba::TRANSPARENT; width as usize * height as usize],
                state: DrawState::default(),
                stack: Vec::new(),
            })),
        }
    }

    /// Get a pixel (returns None if out of bounds).
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        let raster = self.inner.borrow();
        (x < raster.width && y < raster.height).then(|| raster.pixels[raster.index(x, y)])
    }

    /// Copy of all pixels, row-major.
    pub fn pixels(&self) -> Vec<Rgba> {
        self.inner.borrow().pixels.clone()
    }

    /// Depth of the save stack.
    pub fn saved_states(&self) -> usize {
        self.inner.borrow().stack.len()
    }
}

impl Surface for RasterSurface {
    fn width(&self) -> u32 {
        self.inner.borrow().width
    }

    fn height(&self) -> u32 {
        self.inner.borrow().height
    }

    fn context_2d(&mut self) -> Option<&mut dyn Context2d> {
        Some(self)
    }
}

impl Context2d for RasterSurface {
    fn save(&mut self) {
        let mut raster = self.inner.borrow_mut();
        let state = raster.state;
        raster.stack.push(state);
    }

    fn restore(&mut self) {
        let mut raster = self.inner.borrow_mut();
        if let Some(state) = raster.stack.pop() {
            raster.state = state;
        }
    }

    fn set_transform(&mut self, transform: Transform) {
        self.inner.borrow_mut().state.transform = transform;
    }

    fn transform(&self) -> Transform {
        self.inner.borrow().state.transform
    }

    fn set_fill_style(&mut self, color: Rgba) {
        self.inner.borrow_mut().state.fill_style = color;
    }

    fn fill_style(&self) -> Rgba {
        self.inner.borrow().state.fill_style
    }

    fn fill_rect(&mut self, rect: Rect) {
        let mut raster = self.inner.borrow_mut();
        let color = raster.state.fill_style;
        raster.fill(rect, color);
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.inner.borrow_mut().clear(rect);
    }

    fn draw_image(&mut self, image: &dyn ImageSource, rect: Rect) {
        self.inner.borrow_mut().blit(image, rect);
    }
}

// =============================================================================
// Bitmap
// =============================================================================

type LoadCallbacks = RefCell<IndexMap<ListenerId, Rc<dyn Fn()>>>;
type ErrorCallbacks = RefCell<IndexMap<ListenerId, Rc<dyn Fn(&str)>>>;

struct BitmapInner {
    width: Cell<u32>,
    height: Cell<u32>,
    pixels: RefCell<Vec<Rgba>>,
    complete: Cell<bool>,
    next_listener: Cell<u64>,
    on_load: LoadCallbacks,
    on_error: ErrorCallbacks,
}

/// An in-memory image that can be loaded later.
///
/// Decoding is out of scope: pixels are handed over already decoded.
#[derive(Clone)]
pub struct Bitmap {
    inner: Rc<BitmapInner>,
}

impl Bitmap {
    /// A loaded bitmap. `pixels` is row-major and must hold `width * height`
    /// entries; missing pixels read as transparent.
    pub fn new(width: u32, height: u32, pixels: Vec<Rgba>) -> Self {
        let bitmap = Self::pending();
        bitmap.set_pixels(width, height, pixels);
        bitmap.inner.complete.set(true);
        bitmap
    }

    /// A bitmap that has not loaded yet.
    pub fn pending() -> Self {
        Self {
            inner: Rc::new(BitmapInner {
                width: Cell::new(0),
                height: Cell::new(0),
                pixels: RefCell::new(Vec::new()),
                complete: Cell::new(false),
                next_listener: Cell::new(1),
                on_load: RefCell::new(IndexMap::new()),
                on_error: RefCell::new(IndexMap::new()),
            }),
        }
    }

    /// A bitmap filled with one color.
    pub fn solid(width: u32, height: u32, color: Rgba) -> Self {
        Self::new(width, height, vec![color; width as usize * height as usize])
    }

    fn set_pixels(&self, width: u32, height: u32, mut pixels: Vec<Rgba>) {
        pixels.resize(width as usize * height as usize, Rgba::TRANSPARENT);
        self.inner.width.set(width);
        self.inner.height.set(height);
        *self.inner.pixels.borrow_mut() = pixels;
    }

    /// Finish loading and notify load listeners.
    pub fn load(&self, width: u32, height: u32, pixels: Vec<Rgba>) {
        self.set_pixels(width, height, pixels);
        self.inner.complete.set(true);
        let callbacks: Vec<_> = self.inner.on_load.borrow().values().cloned().collect();
        for callback in callbacks {
            callback();
        }
    }

    /// Fail loading and notify error listeners.
    pub fn fail(&self, message: &str) {
        let callbacks: Vec<_> = self.inner.on_error.borrow().values().cloned().collect();
        for callback in callbacks {
            callback(message);
        }
    }

    /// Registered load and error listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.on_load.borrow().len() + self.inner.on_error.borrow().len()
    }

    fn next_listener(&self) -> ListenerId {
        let id = self.inner.next_listener.get();
        self.inner.next_listener.set(id + 1);
        ListenerId(id)
    }
}

impl ImageSource for Bitmap {
    fn width(&self) -> u32 {
        self.inner.width.get()
    }

    fn height(&self) -> u32 {
        self.inner.height.get()
    }

    fn is_complete(&self) -> bool {
        self.inner.complete.get()
    }

    fn on_load(&self, callback: Box<dyn Fn()>) -> ListenerId {
        let id = self.next_listener();
        self.inner.on_load.borrow_mut().insert(id, Rc::from(callback));
        id
    }

    fn on_error(&self, callback: Box<dyn Fn(&str)>) -> ListenerId {
        let id = self.next_listener();
        self.inner.on_error.borrow_mut().insert(id, Rc::from(callback));
        id
    }

    fn remove_listener(&self, id: ListenerId) {
        self.inner.on_load.borrow_mut().shift_remove(&id);
        self.inner.on_error.borrow_mut().shift_remove(&id);
    }

    fn sample(&self, x: u32, y: u32) -> Option<Rgba> {
        let width = self.inner.width.get();
        if x >= width || y >= self.inner.height.get() {
            return None;
        }
        self.inner
            .pixels
            .borrow()
            .get(y as usize * width as usize + x as usize)
            .copied()
    }
}

impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.inner.width.get())
            .field("height", &self.inner.height.get())
            .field("complete", &self.inner.complete.get())
            .finish()
    }
}
