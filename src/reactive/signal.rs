//! Signals - reactive stores.
//!
//! A signal holds a value and the computations subscribed to it. Reading
//! inside a computation subscribes it; writing a different value reruns every
//! subscriber synchronously, in subscription order, before returning.
//!
//! # Example
//!
//! ```
//! use spark_canvas::signal;
//!
//! let count = signal(1);
//! count.set(2).unwrap();
//! count.update(|n| n * 10).unwrap();
//! assert_eq!(count.get(), 20);
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;

use super::computation::{Computation, ComputationId, Subscription};
use super::scope;
use crate::error::Result;

thread_local! {
    static NEXT_STORE_ID: Cell<u64> = const { Cell::new(1) };
}

struct Store<T> {
    id: u64,
    value: RefCell<T>,
    subscribers: RefCell<IndexMap<ComputationId, Computation>>,
}

impl<T> Subscription for Store<T> {
    fn unsubscribe(&self, computation: ComputationId) {
        self.subscribers.borrow_mut().shift_remove(&computation);
    }
}

/// A reactive value.
pub struct Signal<T>(Rc<Store<T>>);

/// Create a new signal.
pub fn signal<T: 'static>(value: T) -> Signal<T> {
    Signal::new(value)
}

impl<T: 'static> Signal<T> {
    pub fn new(value: T) -> Self {
        let id = NEXT_STORE_ID.with(|next| {
            let id = next.get();
            next.set(id + 1);
            id
        });
        Self(Rc::new(Store {
            id,
            value: RefCell::new(value),
            subscribers: RefCell::new(IndexMap::new()),
        }))
    }

    /// Subscribe the current computation, if any. Idempotent.
    fn track(&self) {
        let Some(computation) = scope::tracking_computation() else {
            return;
        };
        if computation.is_detached() {
            return;
        }
        let id = computation.id();
        let inserted = {
            let mut subscribers = self.0.subscribers.borrow_mut();
            if subscribers.contains_key(&id) {
                false
            } else {
                subscribers.insert(id, computation.clone());
                true
            }
        };
        if inserted {
            let weak: Weak<Store<T>> = Rc::downgrade(&self.0);
            computation.add_dependency(self.0.id, weak);
        }
    }

    /// Read the value, subscribing the current computation.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.track();
        self.0.value.borrow().clone()
    }

    /// Read the value without subscribing.
    pub fn get_untracked(&self) -> T
    where
        T: Clone,
    {
        self.0.value.borrow().clone()
    }

    /// Borrow the value, subscribing the current computation.
    ///
    /// `f` must not write to this same signal.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.track();
        f(&self.0.value.borrow())
    }

    /// Borrow the value without subscribing.
    pub fn with_untracked<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.0.value.borrow())
    }

    /// Store `value` unconditionally and rerun subscribers.
    pub(crate) fn commit(&self, value: T) -> Result<()> {
        *self.0.value.borrow_mut() = value;
        self.notify()
    }

    fn notify(&self) -> Result<()> {
        let snapshot: Vec<Computation> = self.0.subscribers.borrow().values().cloned().collect();
        for computation in snapshot {
            // Skip anything unsubscribed earlier in this same cascade.
            if !self.0.subscribers.borrow().contains_key(&computation.id()) {
                continue;
            }
            computation.run(true)?;
        }
        Ok(())
    }

    pub fn subscriber_count(&self) -> usize {
        self.0.subscribers.borrow().len()
    }
}

impl<T: PartialEq + 'static> Signal<T> {
    /// Write a new value.
    ///
    /// Equal values are ignored. Otherwise every subscriber reruns before
    /// this returns; the first error raised by a subscriber stops the cascade
    /// and is returned.
    pub fn set(&self, value: T) -> Result<()> {
        let unchanged = *self.0.value.borrow() == value;
        if unchanged {
            return Ok(());
        }
        self.commit(value)
    }

    /// Write a value derived from the current one.
    pub fn update(&self, f: impl FnOnce(&T) -> T) -> Result<()> {
        let next = f(&self.0.value.borrow());
        self.set(next)
    }
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: fmt::Debug> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("value", &self.0.value.borrow())
            .field("subscribers", &self.0.subscribers.borrow().len())
            .finish()
    }
}
