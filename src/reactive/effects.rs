//! Effects and lifecycle hooks.
//!
//! Effects belong to the scene node being expanded. Their first run is
//! deferred until the node's subtree has been mounted; afterwards they rerun
//! (cleanup first) whenever something they read changes.

use std::cell::Cell;

use tracing::warn;

use super::computation::{Computation, ComputationKind};
use super::scope::{self, Scope, untrack};
use crate::engine::registry;
use crate::error::Result;

/// Attach `computation` to whatever currently owns reactive work.
///
/// Under a scene node it joins the node's computation set. Under another
/// computation it is detached when that computation cleans up.
pub(crate) fn adopt(computation: &Computation) -> bool {
    match scope::current_scope().resolve() {
        Scope::Node(id) => {
            registry::add_computation(*id, computation.clone());
            true
        }
        Scope::Computation(parent) => {
            let child = computation.clone();
            parent.on_cleanup(Box::new(move || {
                child.cleanup();
                child.detach();
            }));
            true
        }
        _ => false,
    }
}

/// Register a fallible effect on the current scene node.
pub(crate) fn try_create_effect(f: impl Fn() -> Result<()> + 'static) -> Option<Computation> {
    let Some(node) = scope::current_node() else {
        warn!("create_effect called outside of a mounting scene node; ignored");
        return None;
    };
    let computation = Computation::with_callback(ComputationKind::Effect, f);
    registry::add_computation(node, computation.clone());
    Some(computation)
}

/// Register an effect on the current scene node.
///
/// The effect first runs once the node's subtree has mounted, then reruns
/// whenever a signal it read changes.
///
/// # Example
///
/// ```ignore
/// component(move || {
///     let count = count.clone();
///     create_effect(move || tracing::info!(count = count.get()));
///     Node::EMPTY
/// })
/// ```
pub fn create_effect(f: impl Fn() + 'static) {
    try_create_effect(move || {
        f();
        Ok(())
    });
}

/// Register and immediately run a fallible computed effect.
pub(crate) fn try_create_computed(f: impl Fn() -> Result<()> + 'static) -> Result<Computation> {
    let computation = Computation::with_callback(ComputationKind::Computed, f);
    if !adopt(&computation) {
        warn!("create_computed called outside of any scope; it will never be disposed");
    }
    computation.run(false)?;
    Ok(computation)
}

/// Run `f` now and again whenever a signal it read changes.
pub fn create_computed(f: impl Fn() + 'static) {
    let computation = Computation::with_callback(ComputationKind::Computed, move || {
        f();
        Ok(())
    });
    if !adopt(&computation) {
        warn!("create_computed called outside of any scope; it will never be disposed");
    }
    if let Err(error) = computation.run(false) {
        warn!(%error, "computed failed on its first run");
    }
}

/// Run `f` once after the current node's subtree has mounted.
pub fn on_mount(f: impl FnOnce() + 'static) {
    let f = Cell::new(Some(f));
    create_effect(move || {
        if let Some(f) = f.take() {
            untrack(f);
        }
    });
}

/// Register `f` to run when the current scope is cleaned up.
///
/// Inside a computation it runs before the computation's next run and on
/// detach. Inside a scene node it runs when the node is torn down.
pub fn on_cleanup(f: impl FnOnce() + 'static) {
    match scope::current_scope().resolve() {
        Scope::Computation(computation) => computation.on_cleanup(Box::new(f)),
        Scope::Node(id) => {
            let computation = Computation::new(ComputationKind::Effect);
            computation.on_cleanup(Box::new(f));
            registry::add_computation(*id, computation);
        }
        _ => warn!("on_cleanup called outside of any scope; ignored"),
    }
}
