//! Reactivity core.
//!
//! Push-based and fully synchronous: a write settles its whole subscriber
//! cascade before returning. There is no batching and no scheduler.
//!
//! - [`signal`] - stores that track readers and rerun them on writes
//! - [`computation`] - re-runnable units of work with cleanups
//! - [`scope`] - the current-scope pointer reads and hooks resolve against
//! - [`memo`] - cached derived values
//! - [`effects`] - effects, computed effects and lifecycle hooks

pub mod computation;
pub mod effects;
pub mod memo;
pub mod scope;
pub mod signal;

pub use computation::{Computation, ComputationId, ComputationKind, ComputationState};
pub use effects::{create_computed, create_effect, on_cleanup, on_mount};
pub use memo::{Memo, create_memo, create_memo_with};
pub use scope::{Scope, untrack, with_scope};
pub use signal::{Signal, signal};
