//! Engine - Scene tree ownership and reconciliation.
//!
//! The declarative tree user code builds is made of [`Node`] handles. The
//! engine mirrors it as a tree of scene nodes (element, component, dynamic
//! and context nodes) kept in a thread-local registry, and keeps that tree
//! in sync as dynamic contents change.
//!
//! # Modules
//!
//! - [`node`] - node handles and node kinds
//! - [`registry`] - node storage, tree links, traversal
//! - [`orchestrator`] - the [`Engine`]: mount, reparse, unmount, layout, render

pub mod node;
pub mod orchestrator;
pub mod registry;

pub use node::{ContextId, Node};
pub use orchestrator::{Engine, current_engine};
pub use registry::{is_registered, node_count, reset_registry};
