//! Context - values provided to a subtree.
//!
//! A provider node carries a value for one context. [`use_context`] walks
//! from the node currently expanding up through its parents and returns the
//! nearest provided value, or the context's default.

use std::any::Any;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::engine::node::{ContextId, NodeKind};
use crate::engine::{Node, registry};
use crate::reactive::scope::current_scope;

thread_local! {
    static NEXT_CONTEXT_ID: Cell<u64> = const { Cell::new(1) };
}

/// A context key with a default value.
pub struct Context<T> {
    id: ContextId,
    default: Rc<T>,
}

impl<T> Context<T> {
    pub fn id(&self) -> ContextId {
        self.id
    }
}

impl<T> Clone for Context<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            default: self.default.clone(),
        }
    }
}

impl<T> fmt::Debug for Context<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context").field("id", &self.id).finish()
    }
}

/// Create a new context with a default value.
pub fn create_context<T: 'static>(default: T) -> Context<T> {
    let id = NEXT_CONTEXT_ID.with(|next| {
        let id = next.get();
        next.set(id + 1);
        ContextId(id)
    });
    Context {
        id,
        default: Rc::new(default),
    }
}

/// A node providing `value` for `context` to everything `child` produces.
pub fn provider<T: 'static>(context: &Context<T>, value: T, child: impl Fn() -> Node + 'static) -> Node {
    provide_raw(context.id, Rc::new(value), child)
}

pub(crate) fn provide_raw(
    context: ContextId,
    value: Rc<dyn Any>,
    child: impl Fn() -> Node + 'static,
) -> Node {
    registry::register(NodeKind::Context {
        context,
        value,
        child: Rc::new(move || Ok(child())),
    })
}

/// Nearest value provided for `context` above the current scene node.
pub fn use_context<T: 'static>(context: &Context<T>) -> Rc<T> {
    find_context(context.id)
        .and_then(|value| value.downcast::<T>().ok())
        .unwrap_or_else(|| context.default.clone())
}

pub(crate) fn find_context(context: ContextId) -> Option<Rc<dyn Any>> {
    let mut cursor = current_scope().owner_node();
    while let Some(id) = cursor {
        let found = registry::with_node(id, |node| match &node.kind {
            NodeKind::Context { context: provided, value, .. } if *provided == context => {
                Some(value.clone())
            }
            _ => None,
        })
        .flatten();
        if found.is_some() {
            return found;
        }
        cursor = registry::parent_of(id);
    }
    None
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::engine::Engine;
    use crate::pipeline::frame::scene_root;
    use crate::pipeline::mount::MountOptions;
    use crate::primitives::component;

    #[test]
    fn test_default_outside_provider() {
        registry::reset_registry();
        let theme = create_context("light");
        assert_eq!(*use_context(&theme), "light");
    }

    #[test]
    fn test_nearest_provider_wins() {
        registry::reset_registry();
        let theme = create_context("light");
        let seen = Rc::new(RefCell::new(Vec::new()));

        let (ctx, log) = (theme.clone(), seen.clone());
        let root = scene_root(move || {
            let (inner_ctx, log) = (ctx.clone(), log.clone());
            provider(&ctx, "dark", move || {
                let (leaf_ctx, log) = (inner_ctx.clone(), log.clone());
                log.borrow_mut().push(*use_context(&inner_ctx));
                provider(&inner_ctx, "contrast", move || {
                    let (ctx, log) = (leaf_ctx.clone(), log.clone());
                    component(move || {
                        log.borrow_mut().push(*use_context(&ctx));
                        Node::EMPTY
                    })
                })
            })
        });

        Engine::new(MountOptions::default()).mount(root).unwrap();
        assert_eq!(*seen.borrow(), vec!["dark", "contrast"]);
    }

    #[test]
    fn test_contexts_are_distinct() {
        registry::reset_registry();
        let a = create_context(1u8);
        let b = create_context(2u8);
        assert_ne!(a.id(), b.id());
        assert_ne!(a.id(), ContextId::ROOT);
    }
}
