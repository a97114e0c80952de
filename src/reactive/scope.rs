//! Current-scope pointer.
//!
//! Every read, write and hook resolves against a single thread-local scope.
//! [`with_scope`] swaps it for the duration of a closure and restores the
//! previous value through a drop guard, so the pointer is also restored when
//! the closure returns early with an error or unwinds.

use std::cell::RefCell;

use super::computation::Computation;
use crate::types::NodeId;

/// What reactive work is currently attributed to.
#[derive(Clone, Default)]
pub enum Scope {
    /// Outside of any mount or computation.
    #[default]
    None,
    /// Expanding a scene node. Effects and cleanups attach to it.
    Node(NodeId),
    /// Running a computation. Reads subscribe it.
    Computation(Computation),
    /// Reads skip subscription; hooks still resolve to the enclosing scope.
    Untracked(Box<Scope>),
}

impl Scope {
    /// The real scope behind any number of untracked wrappers.
    pub fn resolve(&self) -> &Scope {
        match self {
            Scope::Untracked(inner) => inner.resolve(),
            scope => scope,
        }
    }

    /// Scene node that owns work created under this scope.
    pub fn owner_node(&self) -> Option<NodeId> {
        match self.resolve() {
            Scope::Node(id) => Some(*id),
            Scope::Computation(computation) => computation.owner(),
            _ => None,
        }
    }
}

impl std::fmt::Debug for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scope::None => write!(f, "None"),
            Scope::Node(id) => write!(f, "Node({id})"),
            Scope::Computation(c) => write!(f, "Computation({:?})", c.id()),
            Scope::Untracked(inner) => write!(f, "Untracked({inner:?})"),
        }
    }
}

thread_local! {
    static SCOPE: RefCell<Scope> = RefCell::new(Scope::None);
}

/// Restores the previous scope on drop.
struct ScopeGuard {
    previous: Option<Scope>,
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        let previous = self.previous.take().unwrap_or_default();
        SCOPE.with(|scope| *scope.borrow_mut() = previous);
    }
}

/// Run `f` with `scope` as the current scope.
pub fn with_scope<R>(scope: Scope, f: impl FnOnce() -> R) -> R {
    let previous = SCOPE.with(|current| current.replace(scope));
    let _guard = ScopeGuard {
        previous: Some(previous),
    };
    f()
}

/// Snapshot of the current scope.
pub fn current_scope() -> Scope {
    SCOPE.with(|scope| scope.borrow().clone())
}

/// The computation that reads should subscribe, if any.
pub(crate) fn tracking_computation() -> Option<Computation> {
    SCOPE.with(|scope| match &*scope.borrow() {
        Scope::Computation(computation) => Some(computation.clone()),
        _ => None,
    })
}

/// The scene node being expanded, looking through untracked regions.
pub(crate) fn current_node() -> Option<NodeId> {
    match current_scope().resolve() {
        Scope::Node(id) => Some(*id),
        _ => None,
    }
}

/// Run `f` without subscribing to anything it reads.
///
/// # Example
///
/// ```ignore
/// create_effect(move || {
///     let count = count.get();           // tracked
///     let label = untrack(|| label.get()); // not tracked
/// });
/// ```
pub fn untrack<R>(f: impl FnOnce() -> R) -> R {
    with_scope(Scope::Untracked(Box::new(current_scope())), f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_scope_restores() {
        let id = NodeId(7);
        with_scope(Scope::Node(id), || {
            assert_eq!(current_node(), Some(id));
            untrack(|| {
                assert!(matches!(current_scope(), Scope::Untracked(_)));
                assert_eq!(current_node(), Some(id));
            });
        });
        assert!(matches!(current_scope(), Scope::None));
    }

    #[test]
    fn test_with_scope_restores_on_panic() {
        let result = std::panic::catch_unwind(|| {
            with_scope(Scope::Node(NodeId(1)), || panic!("boom"));
        });
        assert!(result.is_err());
        assert!(matches!(current_scope(), Scope::None));
    }
}
