//! Core types for spark-canvas.
//!
//! These types define the foundation that everything builds on.
//! They flow through the layout engine and define what the renderer understands.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

// =============================================================================
// Node Identity
// =============================================================================

/// Identifier of a registered scene node.
///
/// Ids are never reused within a thread, so a stale id simply stops resolving
/// once its node has been released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u64);

impl NodeId {
    /// Raw numeric value (useful for logging and debugging).
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

// =============================================================================
// Color
// =============================================================================

/// RGBA color with 8-bit channels (0-255).
///
/// Using integers for exact comparison - no floating point epsilon needed.
/// Alpha 255 = fully opaque, 0 = fully transparent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Create a new RGBA color.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Transparent color.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    // Standard colors
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    pub const YELLOW: Self = Self::rgb(255, 255, 0);
    pub const CYAN: Self = Self::rgb(0, 255, 255);
    pub const MAGENTA: Self = Self::rgb(255, 0, 255);
    pub const GRAY: Self = Self::rgb(128, 128, 128);

    /// Check if color is fully opaque.
    #[inline]
    pub const fn is_opaque(&self) -> bool {
        self.a == 255
    }

    /// Check if color is fully transparent.
    #[inline]
    pub const fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// Alpha blend src over dst (Porter-Duff "over" operation).
    #[inline]
    pub fn blend(src: Self, dst: Self) -> Self {
        // Fast path: fully opaque source
        if src.is_opaque() {
            return src;
        }

        // Fast path: fully transparent source
        if src.is_transparent() {
            return dst;
        }

        let sa = src.a as u32;
        let da = dst.a as u32;
        let inv_sa = 255 - sa;

        // out_a = src_a + dst_a * (1 - src_a)
        let out_a = sa + (da * inv_sa) / 255;
        if out_a == 0 {
            return Self::TRANSPARENT;
        }

        // out_rgb = (src_rgb * src_a + dst_rgb * dst_a * (1 - src_a)) / out_a
        let channel = |s: u8, d: u8| -> u8 {
            let value = (s as u32 * sa + d as u32 * da * inv_sa / 255) / out_a;
            value.min(255) as u8
        };

        Self {
            r: channel(src.r, dst.r),
            g: channel(src.g, dst.g),
            b: channel(src.b, dst.b),
            a: out_a.min(255) as u8,
        }
    }
}

impl FromStr for Rgba {
    type Err = Error;

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidValue(format!("invalid color: {s:?}"));
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2).unwrap_or(""), 16);

        match hex.len() {
            3 => {
                let mut channels = [0u8; 3];
                for (slot, c) in channels.iter_mut().zip(hex.chars()) {
                    let v = c.to_digit(16).ok_or_else(invalid)? as u8;
                    *slot = v * 17;
                }
                Ok(Self::rgb(channels[0], channels[1], channels[2]))
            }
            6 | 8 => {
                let r = byte(0).map_err(|_| invalid())?;
                let g = byte(2).map_err(|_| invalid())?;
                let b = byte(4).map_err(|_| invalid())?;
                let a = if hex.len() == 8 {
                    byte(6).map_err(|_| invalid())?
                } else {
                    255
                };
                Ok(Self::new(r, g, b, a))
            }
            _ => Err(invalid()),
        }
    }
}

/// How an element fills its area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillStyle {
    /// Keep whatever fill style the surface currently has.
    Inherit,
    /// Fill with a solid color.
    Color(Rgba),
}

impl From<Rgba> for FillStyle {
    fn from(color: Rgba) -> Self {
        Self::Color(color)
    }
}

// =============================================================================
// Layout Units
// =============================================================================

/// Display mode of a layout item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Display {
    /// Always starts a new row and behaves as a container for fill sizing.
    Block,
    /// Flows left-to-right with siblings, wrapping when the row overflows.
    #[default]
    InlineBlock,
}

/// Width or height of a layout item.
///
/// # Examples
///
/// ```
/// use spark_canvas::types::Dimension;
///
/// let width: Dimension = "50%".parse().unwrap();
/// assert_eq!(width, Dimension::Percent(50.0));
/// assert_eq!(Dimension::from(120.0), Dimension::Fixed(120.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Dimension {
    /// Absolute size in surface units.
    Fixed(f64),
    /// Percentage (0-100) of the container's content size.
    Percent(f64),
    /// Share of the space left over in the row or container.
    Fill,
    /// Bounding box of the item's own children.
    #[default]
    Intrinsic,
}

impl From<f64> for Dimension {
    fn from(value: f64) -> Self {
        Self::Fixed(value)
    }
}

impl From<i32> for Dimension {
    fn from(value: i32) -> Self {
        Self::Fixed(value as f64)
    }
}

impl FromStr for Dimension {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        match s {
            "fill" => Ok(Self::Fill),
            "intrinsic" => Ok(Self::Intrinsic),
            _ => {
                let invalid = || Error::InvalidValue(format!("invalid dimension: {s:?}"));
                if let Some(number) = s.strip_suffix('%') {
                    let value: f64 = number.trim().parse().map_err(|_| invalid())?;
                    if value.is_finite() {
                        return Ok(Self::Percent(value));
                    }
                    return Err(invalid());
                }
                let value: f64 = s.parse().map_err(|_| invalid())?;
                if value.is_finite() {
                    Ok(Self::Fixed(value))
                } else {
                    Err(invalid())
                }
            }
        }
    }
}

/// Four-sided offsets used for margins and paddings.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Edges {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Edges {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Create edges in CSS order (top, right, bottom, left).
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self { top, right, bottom, left }
    }

    /// Same offset on every side.
    pub const fn all(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    /// Vertical and horizontal offsets.
    pub const fn symmetric(vertical: f64, horizontal: f64) -> Self {
        Self::new(vertical, horizontal, vertical, horizontal)
    }

    /// Negative offsets clamped to zero.
    pub fn non_negative(self) -> Self {
        Self {
            top: self.top.max(0.0),
            right: self.right.max(0.0),
            bottom: self.bottom.max(0.0),
            left: self.left.max(0.0),
        }
    }

    #[inline]
    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    #[inline]
    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

// =============================================================================
// Rect
// =============================================================================

/// An axis-aligned rectangle in surface units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Create a new rect.
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[inline]
    pub fn x2(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn y2(&self) -> f64 {
        self.y + self.height
    }

    /// Shrink by `edges`, staying inside `self` when the edges exceed the size.
    pub fn inset(&self, edges: Edges) -> Rect {
        let left = edges.left.min(self.width.max(0.0));
        let top = edges.top.min(self.height.max(0.0));
        Rect {
            x: self.x + left,
            y: self.y + top,
            width: (self.width - edges.horizontal()).max(0.0),
            height: (self.height - edges.vertical()).max(0.0),
        }
    }

    /// Check if `other` lies entirely within this rect.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x && other.y >= self.y && other.x2() <= self.x2() && other.y2() <= self.y2()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_blend() {
        assert_eq!(Rgba::blend(Rgba::RED, Rgba::BLUE), Rgba::RED);
        assert_eq!(Rgba::blend(Rgba::TRANSPARENT, Rgba::BLUE), Rgba::BLUE);

        let half_red = Rgba::new(255, 0, 0, 128);
        let blended = Rgba::blend(half_red, Rgba::BLUE);
        assert_eq!(blended.a, 255);
        assert!(blended.r > 120 && blended.r < 135);
        assert!(blended.b > 120 && blended.b < 135);
    }

    #[test]
    fn test_rgba_parse() {
        assert_eq!("#ff0000".parse::<Rgba>().unwrap(), Rgba::RED);
        assert_eq!("#0f0".parse::<Rgba>().unwrap(), Rgba::GREEN);
        assert_eq!("#0000ff80".parse::<Rgba>().unwrap(), Rgba::new(0, 0, 255, 128));
        assert!("red".parse::<Rgba>().is_err());
        assert!("#12".parse::<Rgba>().is_err());
    }

    #[test]
    fn test_dimension_parse() {
        assert_eq!("fill".parse::<Dimension>().unwrap(), Dimension::Fill);
        assert_eq!("intrinsic".parse::<Dimension>().unwrap(), Dimension::Intrinsic);
        assert_eq!("75%".parse::<Dimension>().unwrap(), Dimension::Percent(75.0));
        assert_eq!("42".parse::<Dimension>().unwrap(), Dimension::Fixed(42.0));
        assert!("abc%".parse::<Dimension>().is_err());
        assert!("auto".parse::<Dimension>().is_err());
    }

    #[test]
    fn test_rect_inset() {
        let rect = Rect::new(0.0, 0.0, 200.0, 200.0);
        assert_eq!(rect.inset(Edges::all(20.0)), Rect::new(20.0, 20.0, 160.0, 160.0));

        // Oversized edges collapse to an empty rect that stays inside.
        let small = Rect::new(10.0, 10.0, 10.0, 10.0);
        let inner = small.inset(Edges::all(20.0));
        assert_eq!(inner.width, 0.0);
        assert!(small.contains_rect(&inner));
    }
}
