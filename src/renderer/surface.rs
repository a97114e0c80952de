//! Target surface contracts.
//!
//! The engine draws through a small subset of a 2D raster API: transform
//! state, solid fills, clears and image blits. Anything implementing these
//! traits can be mounted.

use crate::types::{Rect, Rgba};

/// 2D affine transform, in the same layout as a canvas matrix:
///
/// ```text
/// | a c e |
/// | b d f |
/// | 0 0 1 |
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub const fn scale(sx: f64, sy: f64) -> Self {
        Self {
            a: sx,
            d: sy,
            ..Self::IDENTITY
        }
    }

    pub const fn translate(tx: f64, ty: f64) -> Self {
        Self {
            e: tx,
            f: ty,
            ..Self::IDENTITY
        }
    }

    /// `self` applied after `other`.
    pub fn then(&self, other: &Transform) -> Transform {
        Transform {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Axis-aligned bounds of `rect` after transformation.
    pub fn map_rect(&self, rect: Rect) -> Rect {
        let corners = [
            self.apply(rect.x, rect.y),
            self.apply(rect.x2(), rect.y),
            self.apply(rect.x, rect.y2()),
            self.apply(rect.x2(), rect.y2()),
        ];
        let (mut x1, mut y1) = corners[0];
        let (mut x2, mut y2) = corners[0];
        for (x, y) in &corners[1..] {
            x1 = x1.min(*x);
            y1 = y1.min(*y);
            x2 = x2.max(*x);
            y2 = y2.max(*y);
        }
        Rect::new(x1, y1, x2 - x1, y2 - y1)
    }
}

/// A 2D drawing context.
pub trait Context2d {
    /// Push the current transform and fill style.
    fn save(&mut self);

    /// Pop the last saved state. No-op on an empty stack.
    fn restore(&mut self);

    fn set_transform(&mut self, transform: Transform);

    fn reset_transform(&mut self) {
        self.set_transform(Transform::IDENTITY);
    }

    fn transform(&self) -> Transform;

    fn set_fill_style(&mut self, color: Rgba);

    fn fill_style(&self) -> Rgba;

    /// Fill `rect` (user space) with the current fill style.
    fn fill_rect(&mut self, rect: Rect);

    /// Reset `rect` (user space) to transparent.
    fn clear_rect(&mut self, rect: Rect);

    /// Draw `image` scaled into `rect` (user space).
    fn draw_image(&mut self, image: &dyn ImageSource, rect: Rect);
}

/// Something the engine can be mounted on.
pub trait Surface {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// The 2D context, or `None` when the surface cannot draw in 2D.
    fn context_2d(&mut self) -> Option<&mut dyn Context2d>;
}

/// Identifies a listener registered on an [`ImageSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// A (possibly still loading) image.
pub trait ImageSource {
    /// Natural width, 0 until loaded.
    fn width(&self) -> u32;

    /// Natural height, 0 until loaded.
    fn height(&self) -> u32;

    fn is_complete(&self) -> bool;

    /// Called when the image finishes loading.
    fn on_load(&self, callback: Box<dyn Fn()>) -> ListenerId;

    /// Called when loading fails.
    fn on_error(&self, callback: Box<dyn Fn(&str)>) -> ListenerId;

    /// Unregister a load or error listener. Unknown ids are ignored.
    fn remove_listener(&self, id: ListenerId);

    /// Pixel at natural coordinates, for software rasterizers.
    fn sample(&self, _x: u32, _y: u32) -> Option<Rgba> {
        None
    }
}
