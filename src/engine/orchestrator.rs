//! Mount orchestrator.
//!
//! The [`Engine`] walks the declarative tree, materializes scene nodes,
//! registers their computations and re-walks subtrees whose dynamic contents
//! changed. After every structural change it runs a full layout pass; the
//! paint pass runs on demand.
//!
//! Expansion of a node runs with that node as the current scope, so effects
//! and cleanups registered by producers and mount hooks belong to it.
//!
//! # Lifecycle
//!
//! ```text
//! mount(root)      teardown previous tree -> expand -> layout -> effects
//! reparse_node(n)  teardown n's subtree -> expand n -> layout -> new effects
//! unmount()        teardown every node -> release owned nodes
//! ```

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Instant;

use tracing::{debug, trace, warn};

use super::node::{Node, NodeKind, Producer, SceneNode};
use super::registry;
use crate::error::{Error, Result};
use crate::pipeline::frame::FrameContext;
use crate::pipeline::mount::MountOptions;
use crate::pipeline::{layout_pass, paint};
use crate::primitives::element::{Element, ElementHandle};
use crate::reactive::effects::{try_create_computed, try_create_effect};
use crate::reactive::{ComputationKind, ComputationState, Scope, create_memo_with, untrack, with_scope};
use crate::renderer::Surface;
use crate::types::NodeId;

// =============================================================================
// Current Engine
// =============================================================================

thread_local! {
    static CURRENT_ENGINE: RefCell<Option<Engine>> = RefCell::new(None);
    static NEXT_ENGINE_ID: Cell<u64> = const { Cell::new(1) };
}

/// Restores the previously active engine on drop.
struct EngineGuard {
    previous: Option<Engine>,
}

impl Drop for EngineGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        CURRENT_ENGINE.with(|current| *current.borrow_mut() = previous);
    }
}

/// Run `f` with `engine` as the active engine.
///
/// Fails with [`Error::EngineBusy`] if a different engine is active.
pub(crate) fn with_engine<R>(engine: &Engine, f: impl FnOnce() -> Result<R>) -> Result<R> {
    let previous = CURRENT_ENGINE.with(|current| {
        let mut current = current.borrow_mut();
        match current.as_ref() {
            Some(active) if active != engine => Err(Error::EngineBusy),
            _ => Ok(current.replace(engine.clone())),
        }
    })?;
    let _guard = EngineGuard { previous };
    f()
}

/// The engine currently mounting or reparsing.
pub fn current_engine() -> Result<Engine> {
    CURRENT_ENGINE
        .with(|current| current.borrow().clone())
        .ok_or(Error::NotMounting)
}

// =============================================================================
// Engine
// =============================================================================

struct EngineInner {
    id: u64,
    root: Cell<Option<NodeId>>,
    mounted: Cell<bool>,
    surface: RefCell<Option<Box<dyn Surface>>>,
    options: MountOptions,
}

/// Owns one scene tree and drives its expansion, layout and paint.
#[derive(Clone)]
pub struct Engine(Rc<EngineInner>);

/// Where a node is being parsed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseTarget {
    /// Re-expand a node in place.
    Reparse,
    /// Attach as the engine root.
    Root,
    /// Attach below a parent.
    Child(NodeId),
}

/// What expanding a node amounts to, copied out of the registry.
enum Expansion {
    Element(Rc<dyn Element>),
    Produce(Producer),
    Dynamic,
}

impl Engine {
    /// Create an engine without a surface (layout only).
    pub fn new(options: MountOptions) -> Self {
        Self::build(None, options)
    }

    /// Create an engine painting into `surface`.
    pub fn with_surface(surface: Box<dyn Surface>, options: MountOptions) -> Self {
        Self::build(Some(surface), options)
    }

    fn build(surface: Option<Box<dyn Surface>>, options: MountOptions) -> Self {
        let id = NEXT_ENGINE_ID.with(|next| {
            let id = next.get();
            next.set(id + 1);
            id
        });
        Self(Rc::new(EngineInner {
            id,
            root: Cell::new(None),
            mounted: Cell::new(false),
            surface: RefCell::new(surface),
            options,
        }))
    }

    pub fn root(&self) -> Option<NodeId> {
        self.0.root.get()
    }

    pub fn is_mounted(&self) -> bool {
        self.0.mounted.get()
    }

    pub fn options(&self) -> &MountOptions {
        &self.0.options
    }

    fn downgrade(&self) -> Weak<EngineInner> {
        Rc::downgrade(&self.0)
    }

    // =========================================================================
    // Mount / Unmount
    // =========================================================================

    /// Mount `root`, which must be a scene root context node.
    ///
    /// Any previously mounted tree is torn down first. Effects run once the
    /// whole tree has been expanded and laid out, in document order.
    pub fn mount(&self, root: Node) -> Result<()> {
        let Some(root_id) = root.id() else {
            return Err(Error::InvalidRoot);
        };
        self.unmount();

        with_engine(self, || {
            debug!(engine = self.0.id, root = %root_id, "mount");
            self.parse_node(root, ParseTarget::Root)?;
            self.layout();
            for id in registry::descendants(root_id, true) {
                self.run_pending_effects(id)?;
            }
            self.0.mounted.set(true);
            Ok(())
        })
    }

    /// Tear down the whole tree.
    ///
    /// Every computation is cleaned up and detached in document order. Nodes
    /// created while expanding the tree are released; the root stays
    /// registered and can be mounted again.
    pub fn unmount(&self) {
        self.0.mounted.set(false);
        let Some(root) = self.0.root.take() else {
            return;
        };

        let nodes = registry::descendants(root, true);
        for &id in &nodes {
            teardown(id);
        }
        for &id in &nodes {
            registry::clear_parent(id);
            registry::clear_children(id);
        }
        let tree: HashSet<NodeId> = nodes.iter().copied().collect();
        let released = release_owned(nodes, &tree);
        debug!(engine = self.0.id, root = %root, released, "unmount");
    }

    // =========================================================================
    // Parsing
    // =========================================================================

    /// Re-expand a node's subtree after its contents changed.
    ///
    /// Layout reruns for the whole tree; only effects of newly created
    /// descendants run.
    pub fn reparse_node(&self, id: NodeId) -> Result<()> {
        with_engine(self, || {
            debug!(engine = self.0.id, node = %id, "reparse");
            self.parse_node(Node(Some(id)), ParseTarget::Reparse)?;
            self.layout();
            for descendant in registry::descendants(id, false) {
                self.run_pending_effects(descendant)?;
            }
            Ok(())
        })
    }

    fn parse_node(&self, node: Node, target: ParseTarget) -> Result<()> {
        let Some(id) = node.id() else {
            return Ok(());
        };
        if !registry::is_registered(id) {
            return Err(Error::InvalidNode(id));
        }

        match target {
            ParseTarget::Root => {
                let is_root = registry::with_node(id, SceneNode::is_root_context).unwrap_or(false);
                if !is_root {
                    return Err(Error::InvalidRoot);
                }
                self.0.root.set(Some(id));
                self.rebuild(id, false)
            }
            ParseTarget::Child(parent) => {
                let already_attached = registry::parent_of(id).is_some();
                if !registry::set_parent(id, parent) || already_attached {
                    return Ok(());
                }
                self.rebuild(id, false)
            }
            ParseTarget::Reparse => {
                let keep_own = registry::with_node(id, SceneNode::is_dynamic).unwrap_or(false);
                self.rebuild(id, keep_own)
            }
        }
    }

    /// Tear down `id`'s previous subtree and expand it again.
    ///
    /// A dynamic node keeps its own computations (they drive the reparse).
    fn rebuild(&self, id: NodeId, keep_own: bool) -> Result<()> {
        let previous = registry::descendants(id, false);
        if !keep_own {
            teardown(id);
        }
        for &node in &previous {
            teardown(node);
        }
        for &node in &previous {
            registry::clear_parent(node);
            registry::clear_children(node);
        }
        registry::clear_children(id);

        let result = self.expand(id);

        let mut torn_down: HashSet<NodeId> = previous.iter().copied().collect();
        torn_down.insert(id);
        let detached: Vec<NodeId> = previous
            .into_iter()
            .filter(|node| registry::parent_of(*node).is_none())
            .collect();
        release_owned(detached, &torn_down);

        result
    }

    fn expand(&self, id: NodeId) -> Result<()> {
        let expansion = registry::with_node(id, |node| match &node.kind {
            NodeKind::Element { element, .. } => Expansion::Element(element.clone()),
            NodeKind::Component(producer) => Expansion::Produce(producer.clone()),
            NodeKind::Context { child, .. } => Expansion::Produce(child.clone()),
            NodeKind::Dynamic(_) => Expansion::Dynamic,
        })
        .ok_or(Error::InvalidNode(id))?;

        with_scope(Scope::Node(id), || match expansion {
            Expansion::Element(element) => {
                element.mount(&ElementHandle::new(id));
                self.sync_layout(&element);
                for child in element.children() {
                    self.parse_node(child, ParseTarget::Child(id))?;
                }
                Ok(())
            }
            Expansion::Produce(producer) => {
                let child = producer()?;
                self.parse_node(child, ParseTarget::Child(id))
            }
            Expansion::Dynamic => {
                let contents = self.resolve_dynamic(id)?;
                self.parse_node(contents, ParseTarget::Child(id))
            }
        })
    }

    /// Register the effect that re-runs layout when an element's layout
    /// props change after mount.
    fn sync_layout(&self, element: &Rc<dyn Element>) {
        let engine = self.downgrade();
        let element = element.clone();
        let first = Cell::new(true);
        try_create_effect(move || {
            element.layout_props();
            if first.replace(false) {
                return Ok(());
            }
            if let Some(inner) = engine.upgrade() {
                Engine(inner).layout();
            }
            Ok(())
        });
    }

    /// Contents of a dynamic node, setting up its tracking on first use.
    fn resolve_dynamic(&self, id: NodeId) -> Result<Node> {
        let (producer, current) = registry::with_node(id, |node| match &node.kind {
            NodeKind::Dynamic(state) => Some((state.producer.clone(), state.current)),
            _ => None,
        })
        .flatten()
        .ok_or(Error::InvalidNode(id))?;

        if let Some(current) = current {
            return Ok(current);
        }

        let contents = create_memo_with(move |_| producer(), None, |a: &Node, b: &Node| a == b);

        let engine = self.downgrade();
        let budget = ReparseBudget::new(&self.0.options);
        let first = Cell::new(true);
        try_create_computed(move || {
            let next = contents.get();
            registry::with_node_mut(id, |node| {
                if let NodeKind::Dynamic(state) = &mut node.kind {
                    state.current = Some(next);
                }
            });
            budget.record(id);
            if first.replace(false) {
                return Ok(());
            }
            match engine.upgrade() {
                Some(inner) => Engine(inner).reparse_node(id),
                None => Ok(()),
            }
        })?;

        let current = registry::with_node(id, |node| match &node.kind {
            NodeKind::Dynamic(state) => state.current,
            _ => None,
        })
        .flatten();
        Ok(current.unwrap_or_default())
    }

    fn run_pending_effects(&self, id: NodeId) -> Result<()> {
        for computation in registry::computations_of(id) {
            if computation.kind() == ComputationKind::Effect
                && computation.state() == ComputationState::Pending
            {
                computation.run(false)?;
            }
        }
        Ok(())
    }

    // =========================================================================
    // Layout / Paint
    // =========================================================================

    /// Recompute the layout of the whole tree.
    pub fn layout(&self) {
        let Some(root) = self.root() else {
            return;
        };
        let items = untrack(|| layout_pass::run(root));
        trace!(engine = self.0.id, items, "layout pass");
    }

    /// Paint the tree into the surface. No-op without a root or surface.
    pub fn render(&self) -> Result<()> {
        let Some(root) = self.root() else {
            return Ok(());
        };
        let pixel_ratio = frame_of(root)
            .map_or(self.0.options.pixel_ratio, |frame| frame.pixel_ratio_untracked());

        let mut surface = self.0.surface.borrow_mut();
        let Some(surface) = surface.as_mut() else {
            return Ok(());
        };
        let (width, height) = (surface.width(), surface.height());
        let context = surface.context_2d().ok_or(Error::Unsupported2d)?;
        let drawn = untrack(|| paint::paint(context, width, height, pixel_ratio, root));
        trace!(engine = self.0.id, drawn, pixel_ratio, "paint pass");
        Ok(())
    }
}

impl PartialEq for Engine {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("id", &self.0.id)
            .field("root", &self.0.root.get())
            .field("mounted", &self.0.mounted.get())
            .finish()
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Clean up and detach every computation owned by `id`.
fn teardown(id: NodeId) {
    let computations = registry::take_computations(id);
    if !computations.is_empty() {
        with_scope(Scope::Node(id), || {
            for computation in &computations {
                computation.cleanup();
                computation.detach();
            }
        });
    }
    registry::with_node_mut(id, |node| {
        if let NodeKind::Dynamic(state) = &mut node.kind {
            state.current = None;
        }
    });
}

/// Release the nodes among `nodes` whose owner is in `owners`.
fn release_owned(nodes: Vec<NodeId>, owners: &HashSet<NodeId>) -> usize {
    let mut released = 0;
    for id in nodes {
        if registry::owner_of(id).is_some_and(|owner| owners.contains(&owner)) {
            registry::release(id);
            released += 1;
        }
    }
    released
}

/// Frame context carried by a scene root.
pub(crate) fn frame_of(root: NodeId) -> Option<Rc<FrameContext>> {
    registry::with_node(root, |node| match &node.kind {
        NodeKind::Context { value, .. } => value.clone().downcast::<FrameContext>().ok(),
        _ => None,
    })
    .flatten()
}

/// Warns once when a dynamic node keeps changing faster than the window.
struct ReparseBudget {
    limit: u32,
    window: std::time::Duration,
    count: Cell<u32>,
    last: Cell<Option<Instant>>,
    warned: Cell<bool>,
}

impl ReparseBudget {
    fn new(options: &MountOptions) -> Self {
        Self {
            limit: options.rapid_reparse_limit,
            window: options.rapid_reparse_window,
            count: Cell::new(0),
            last: Cell::new(None),
            warned: Cell::new(false),
        }
    }

    fn record(&self, id: NodeId) {
        self.record_at(id, Instant::now());
    }

    /// Count a change at `now`. Returns `true` when this change triggered
    /// the warning.
    fn record_at(&self, id: NodeId, now: Instant) -> bool {
        let rapid = self
            .last
            .replace(Some(now))
            .is_some_and(|last| now.duration_since(last) < self.window);
        let count = if rapid { self.count.get() + 1 } else { 0 };
        self.count.set(count);

        if self.limit == 0 || count < self.limit || self.warned.replace(true) {
            return false;
        }
        warn!(
            node = %id,
            count,
            window = ?self.window,
            "dynamic node contents are changing faster than a frame; \
             consider memoizing its inputs"
        );
        true
    }
}
