//! Computation - a re-runnable unit of reactive work.
//!
//! A computation owns its callback, a list of cleanups and the set of stores
//! it is subscribed to. It moves through three states:
//!
//! ```text
//! Pending --run--> Active --detach--> Detached (terminal)
//! ```
//!
//! Once detached it never runs again; a stray invocation is logged once.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;
use tracing::warn;

use super::scope::{self, Scope, with_scope};
use crate::error::Result;
use crate::types::NodeId;

thread_local! {
    static NEXT_COMPUTATION_ID: Cell<u64> = const { Cell::new(1) };
}

/// Unique identifier of a computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComputationId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComputationKind {
    /// First run deferred until the owning subtree finished mounting.
    Effect,
    /// Runs immediately on creation.
    Computed,
    /// Recomputes a stored value and only commits it when it changed.
    Memo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComputationState {
    Pending,
    Active,
    Detached,
}

pub(crate) type Callback = Rc<dyn Fn() -> Result<()>>;
pub(crate) type Cleanup = Box<dyn FnOnce()>;

/// A store a computation can unsubscribe from.
pub(crate) trait Subscription {
    fn unsubscribe(&self, computation: ComputationId);
}

struct Inner {
    id: ComputationId,
    kind: ComputationKind,
    owner: Option<NodeId>,
    callback: RefCell<Callback>,
    cleanups: RefCell<Vec<Cleanup>>,
    dependencies: RefCell<IndexMap<u64, Weak<dyn Subscription>>>,
    state: Cell<ComputationState>,
    warned: Cell<bool>,
}

/// Shared handle to a computation.
#[derive(Clone)]
pub struct Computation(Rc<Inner>);

impl Computation {
    /// Create a pending computation with a no-op callback.
    ///
    /// The owning scene node is taken from the current scope.
    pub(crate) fn new(kind: ComputationKind) -> Self {
        let id = NEXT_COMPUTATION_ID.with(|next| {
            let id = next.get();
            next.set(id + 1);
            ComputationId(id)
        });
        Self(Rc::new(Inner {
            id,
            kind,
            owner: scope::current_scope().owner_node(),
            callback: RefCell::new(Rc::new(|| Ok(()))),
            cleanups: RefCell::new(Vec::new()),
            dependencies: RefCell::new(IndexMap::new()),
            state: Cell::new(ComputationState::Pending),
            warned: Cell::new(false),
        }))
    }

    pub(crate) fn with_callback(
        kind: ComputationKind,
        callback: impl Fn() -> Result<()> + 'static,
    ) -> Self {
        let computation = Self::new(kind);
        computation.set_callback(callback);
        computation
    }

    pub fn id(&self) -> ComputationId {
        self.0.id
    }

    pub fn kind(&self) -> ComputationKind {
        self.0.kind
    }

    pub fn state(&self) -> ComputationState {
        self.0.state.get()
    }

    pub fn is_detached(&self) -> bool {
        self.state() == ComputationState::Detached
    }

    /// Scene node this computation was created under.
    pub fn owner(&self) -> Option<NodeId> {
        self.0.owner
    }

    pub(crate) fn set_callback(&self, callback: impl Fn() -> Result<()> + 'static) {
        if self.is_detached() {
            return;
        }
        *self.0.callback.borrow_mut() = Rc::new(callback);
    }

    /// Run the callback inside this computation's scope.
    ///
    /// With `cleanup` set, pending cleanups run first (untracked).
    pub fn run(&self, cleanup: bool) -> Result<()> {
        if self.is_detached() {
            if !self.0.warned.replace(true) {
                warn!(computation = ?self.0.id, kind = ?self.0.kind, "detached computation invoked");
            }
            return Ok(());
        }

        with_scope(Scope::Computation(self.clone()), || {
            if cleanup {
                self.cleanup();
            }
            self.0.state.set(ComputationState::Active);
            let callback = self.0.callback.borrow().clone();
            callback()
        })
    }

    /// Evaluate `f` as this computation, subscribing it to everything read.
    pub(crate) fn track<R>(&self, f: impl FnOnce() -> R) -> R {
        with_scope(Scope::Computation(self.clone()), || {
            if !self.is_detached() {
                self.0.state.set(ComputationState::Active);
            }
            f()
        })
    }

    /// Run and clear pending cleanups without running the callback.
    pub fn cleanup(&self) {
        let cleanups = std::mem::take(&mut *self.0.cleanups.borrow_mut());
        if cleanups.is_empty() {
            return;
        }
        let untracked = Scope::Untracked(Box::new(Scope::Computation(self.clone())));
        with_scope(untracked, || {
            for cleanup in cleanups {
                cleanup();
            }
        });
    }

    /// Unsubscribe from every store and never run again.
    pub fn detach(&self) {
        if self.is_detached() {
            return;
        }
        self.0.state.set(ComputationState::Detached);

        let dependencies = std::mem::take(&mut *self.0.dependencies.borrow_mut());
        for store in dependencies.values().filter_map(Weak::upgrade) {
            store.unsubscribe(self.0.id);
        }
        self.0.cleanups.borrow_mut().clear();
        *self.0.callback.borrow_mut() = Rc::new(|| Ok(()));
    }

    pub(crate) fn on_cleanup(&self, cleanup: Cleanup) {
        if self.is_detached() {
            cleanup();
            return;
        }
        self.0.cleanups.borrow_mut().push(cleanup);
    }

    pub(crate) fn add_dependency(&self, store: u64, subscription: Weak<dyn Subscription>) {
        if self.is_detached() {
            return;
        }
        self.0.dependencies.borrow_mut().entry(store).or_insert(subscription);
    }

    pub fn dependency_count(&self) -> usize {
        self.0.dependencies.borrow().len()
    }
}

impl PartialEq for Computation {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Computation {}

impl fmt::Debug for Computation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Computation")
            .field("id", &self.0.id)
            .field("kind", &self.0.kind)
            .field("state", &self.0.state.get())
            .field("dependencies", &self.0.dependencies.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::signal::signal;

    #[test]
    fn test_run_cleanups_before_callback() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let computation = {
            let log = log.clone();
            Computation::with_callback(ComputationKind::Computed, move || {
                log.borrow_mut().push("run");
                Ok(())
            })
        };

        computation.run(false).unwrap();
        let log_cleanup = log.clone();
        computation.on_cleanup(Box::new(move || log_cleanup.borrow_mut().push("cleanup")));
        computation.run(true).unwrap();

        assert_eq!(*log.borrow(), vec!["run", "cleanup", "run"]);
        assert_eq!(computation.state(), ComputationState::Active);
    }

    #[test]
    fn test_cleanup_does_not_subscribe() {
        let count = signal(0);
        let computation = Computation::new(ComputationKind::Computed);
        let read = count.clone();
        computation.on_cleanup(Box::new(move || {
            let _ = read.get();
        }));
        computation.cleanup();
        assert_eq!(computation.dependency_count(), 0);
        assert_eq!(count.subscriber_count(), 0);
    }

    #[test]
    fn test_detach_is_terminal() {
        let count = signal(0);
        let runs = Rc::new(Cell::new(0));
        let computation = {
            let count = count.clone();
            let runs = runs.clone();
            Computation::with_callback(ComputationKind::Computed, move || {
                count.get();
                runs.set(runs.get() + 1);
                Ok(())
            })
        };
        computation.run(false).unwrap();
        assert_eq!(count.subscriber_count(), 1);

        computation.detach();
        computation.detach();
        assert!(computation.is_detached());
        assert_eq!(count.subscriber_count(), 0);

        count.set(1).unwrap();
        computation.run(true).unwrap();
        assert_eq!(runs.get(), 1);
    }
}
