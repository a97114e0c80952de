//! Primitive types - Props and refs.
//!
//! These types define the interface for element props.
//! Props support static values, signals, memos and getters for reactivity.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::engine::Node;
use crate::reactive::{Memo, Signal};
use crate::renderer::ImageSource;
use crate::types::{Dimension, Display, Edges, FillStyle, Rgba};

use super::element::ElementHandle;

// =============================================================================
// Prop Value - Reactive property wrapper
// =============================================================================

/// A property value that can be static, a signal, or a getter.
///
/// Reading a prop inside a computation subscribes it, so an element's
/// layout-sync effect follows signal and getter props automatically.
#[derive(Clone)]
pub enum PropValue<T: Clone + 'static> {
    /// Static value (not reactive).
    Static(T),
    /// Reactive signal (changes propagate automatically).
    Signal(Signal<T>),
    /// Getter function (called each time value is needed).
    Getter(Rc<dyn Fn() -> T>),
}

impl<T: Clone + 'static> PropValue<T> {
    /// Get the current value (tracked when read inside a computation).
    pub fn get(&self) -> T {
        match self {
            PropValue::Static(v) => v.clone(),
            PropValue::Signal(s) => s.get(),
            PropValue::Getter(f) => f(),
        }
    }

    /// Wrap a getter closure.
    pub fn getter(f: impl Fn() -> T + 'static) -> Self {
        PropValue::Getter(Rc::new(f))
    }
}

impl<T: Clone + Default + 'static> Default for PropValue<T> {
    fn default() -> Self {
        PropValue::Static(T::default())
    }
}

impl<T: Clone + 'static> From<T> for PropValue<T> {
    fn from(value: T) -> Self {
        PropValue::Static(value)
    }
}

impl<T: Clone + 'static> From<Signal<T>> for PropValue<T> {
    fn from(signal: Signal<T>) -> Self {
        PropValue::Signal(signal)
    }
}

impl<T: Clone + 'static> From<Memo<T>> for PropValue<T> {
    fn from(memo: Memo<T>) -> Self {
        PropValue::Getter(Rc::new(move || memo.get()))
    }
}

impl<T: Clone + fmt::Debug + 'static> fmt::Debug for PropValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Static(v) => f.debug_tuple("Static").field(v).finish(),
            PropValue::Signal(s) => f.debug_tuple("Signal").field(s).finish(),
            PropValue::Getter(_) => f.write_str("Getter(..)"),
        }
    }
}

// Dimension is Copy so these work
impl From<f64> for PropValue<Dimension> {
    fn from(value: f64) -> Self {
        PropValue::Static(Dimension::from(value))
    }
}

impl From<i32> for PropValue<Dimension> {
    fn from(value: i32) -> Self {
        PropValue::Static(Dimension::from(value))
    }
}

impl From<f64> for PropValue<Edges> {
    fn from(value: f64) -> Self {
        PropValue::Static(Edges::all(value))
    }
}

impl From<Rgba> for PropValue<FillStyle> {
    fn from(color: Rgba) -> Self {
        PropValue::Static(FillStyle::Color(color))
    }
}

// =============================================================================
// Refs
// =============================================================================

/// A slot an element fills with its handle when it mounts.
pub struct Ref<T>(Rc<RefCell<Option<T>>>);

/// Create an empty ref.
pub fn create_ref<T>() -> Ref<T> {
    Ref(Rc::new(RefCell::new(None)))
}

impl<T: Clone> Ref<T> {
    pub fn get(&self) -> Option<T> {
        self.0.borrow().clone()
    }
}

impl<T> Ref<T> {
    pub fn set(&self, value: T) {
        *self.0.borrow_mut() = Some(value);
    }

    pub fn clear(&self) {
        self.0.borrow_mut().take();
    }

    pub fn is_set(&self) -> bool {
        self.0.borrow().is_some()
    }
}

impl<T> Clone for Ref<T> {
    fn clone(&self) -> Self {
        Ref(self.0.clone())
    }
}

impl<T: fmt::Debug> fmt::Debug for Ref<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Ref").field(&self.0.borrow()).finish()
    }
}

// =============================================================================
// Box Props
// =============================================================================

/// Properties for the box element.
///
/// Box is the fundamental container: it lays out its children and can fill
/// its client area with a solid color.
///
/// # Example
///
/// ```ignore
/// use spark_canvas::{box_primitive, signal, BoxProps};
/// use spark_canvas::types::{Dimension, Rgba};
///
/// let width = signal(Dimension::Fixed(120.0));
///
/// let node = box_primitive(BoxProps {
///     width: width.clone().into(),
///     height: 40.into(),
///     fill_style: Some(Rgba::RED.into()),
///     ..Default::default()
/// });
/// ```
#[derive(Clone)]
pub struct BoxProps {
    /// Display mode (default block).
    pub display: PropValue<Display>,
    pub width: PropValue<Dimension>,
    pub height: PropValue<Dimension>,
    pub margin: PropValue<Edges>,
    pub padding: PropValue<Edges>,
    /// Fill for the client rect. `None` draws nothing.
    pub fill_style: Option<PropValue<FillStyle>>,
    pub children: Vec<Node>,
    pub node_ref: Option<Ref<ElementHandle>>,
}

impl Default for BoxProps {
    fn default() -> Self {
        Self {
            display: Display::Block.into(),
            width: PropValue::default(),
            height: PropValue::default(),
            margin: PropValue::default(),
            padding: PropValue::default(),
            fill_style: None,
            children: Vec::new(),
            node_ref: None,
        }
    }
}

// =============================================================================
// Image Props
// =============================================================================

/// Properties for the image element.
#[derive(Clone)]
pub struct ImageProps {
    pub source: Rc<dyn ImageSource>,
    /// Display mode (default inline-block).
    pub display: PropValue<Display>,
    /// Intrinsic sizes resolve to the image's natural size once loaded.
    pub width: PropValue<Dimension>,
    pub height: PropValue<Dimension>,
    pub margin: PropValue<Edges>,
    pub padding: PropValue<Edges>,
    pub node_ref: Option<Ref<ElementHandle>>,
}

impl ImageProps {
    pub fn new(source: Rc<dyn ImageSource>) -> Self {
        Self {
            source,
            display: Display::InlineBlock.into(),
            width: PropValue::default(),
            height: PropValue::default(),
            margin: PropValue::default(),
            padding: PropValue::default(),
            node_ref: None,
        }
    }
}
